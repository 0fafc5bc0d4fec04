use plansym_core::SymError;
use plansym_graph::{canonical_hash, ColoredGraph};

fn path(colors: Vec<u32>) -> Result<ColoredGraph, SymError> {
    let n = colors.len();
    let mut graph = ColoredGraph::with_colors(colors);
    for v in 1..n {
        graph.add_edge(v - 1, v)?;
    }
    Ok(graph)
}

#[test]
fn path_reversal_is_an_automorphism_when_colours_agree() -> Result<(), SymError> {
    let graph = path(vec![0, 1, 1, 0])?;
    assert!(graph.is_automorphism(&[3, 2, 1, 0]));
    assert!(!graph.is_automorphism(&[1, 0, 2, 3]));
    Ok(())
}

#[test]
fn colour_changes_break_symmetry() -> Result<(), SymError> {
    let graph = path(vec![0, 1, 1, 2])?;
    assert!(!graph.is_automorphism(&[3, 2, 1, 0]));
    Ok(())
}

#[test]
fn non_bijections_are_not_automorphisms() -> Result<(), SymError> {
    let graph = ColoredGraph::with_colors(vec![0, 0, 0]);
    assert!(!graph.is_automorphism(&[0, 0, 1]));
    assert!(!graph.is_automorphism(&[0, 1]));
    assert!(!graph.is_automorphism(&[0, 1, 5]));
    Ok(())
}

#[test]
fn hash_tracks_colours_and_edges() -> Result<(), SymError> {
    let a = path(vec![0, 0, 0])?;
    let b = path(vec![0, 0, 1])?;
    let mut c = path(vec![0, 0, 0])?;
    assert_eq!(canonical_hash(&a), canonical_hash(&path(vec![0, 0, 0])?));
    assert_ne!(canonical_hash(&a), canonical_hash(&b));
    c.add_edge(0, 2)?;
    assert_ne!(canonical_hash(&a), canonical_hash(&c));
    Ok(())
}
