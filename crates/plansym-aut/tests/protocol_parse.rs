use plansym_aut::protocol::{parse_cycles, parse_orbits};
use plansym_aut::{parse_output, write_protocol, AutomorphismResult};
use plansym_core::SymError;
use plansym_graph::ColoredGraph;

const FULLY_SYMMETRIC: &str = "(1 2)(3 4)\n1 orbit; grpsize=24; 3 gens; 10 nodes; maxlev=4\n0 1 2 3;\n";

#[test]
fn single_generator_transcript() -> Result<(), SymError> {
    let out = parse_output(FULLY_SYMMETRIC)?;
    assert_eq!(out.generators, vec![vec![vec![1, 2], vec![3, 4]]]);
    assert_eq!(out.group_order, 24);
    assert_eq!(out.orbits, vec![vec![0, 1, 2, 3]]);
    Ok(())
}

#[test]
fn orbit_ranges_expand_and_counts_are_stripped() -> Result<(), SymError> {
    assert_eq!(parse_orbits("0 1 2; 3:5 (3)")?, vec![vec![0, 1, 2], vec![3, 4, 5]]);
    assert!(parse_orbits("0; 5:3").is_err());
    assert!(parse_orbits("0; x").is_err());
    Ok(())
}

#[test]
fn duplicate_cycle_point_is_an_invalid_bijection() -> Result<(), SymError> {
    let cycles = parse_cycles("(1 1)")?;
    let output = parse_output("(1 1)\ngrpsize=1;\n0; 1;\n")?;
    assert_eq!(output.generators, vec![cycles]);
    let err = AutomorphismResult::from_output(output, 2).unwrap_err();
    assert!(matches!(err, SymError::InvalidBijection(_)));
    Ok(())
}

#[test]
fn missing_group_size_is_a_protocol_violation() {
    let err = parse_output("(0 1)\n0 1;\n").unwrap_err();
    assert!(matches!(err, SymError::ProtocolViolation(ref info) if info.code == "missing-grpsize"));
    let err = parse_output("").unwrap_err();
    assert!(matches!(err, SymError::ProtocolViolation(_)));
}

#[test]
fn malformed_cycles_are_protocol_violations() {
    for text in ["(1 2", "1 2)", "((1 2))", "(1 a)"] {
        let err = parse_cycles(text).unwrap_err();
        assert!(matches!(err, SymError::ProtocolViolation(_)), "{text}");
    }
}

#[test]
fn fully_symmetric_four_vertices() -> Result<(), SymError> {
    // four isolated vertices of one colour: the full symmetric group
    let transcript = "(2 3)\n(1 2)\n(0 1)\n1 orbit; grpsize=24; 3 gens; 10 nodes; maxlev=4\n0:3 (4);\n";
    let result = AutomorphismResult::from_output(parse_output(transcript)?, 4)?;
    assert_eq!(result.orbits(), &[vec![0, 1, 2, 3]]);
    assert_eq!(result.group_order(), 24);
    assert_eq!(result.group().len(), 3);

    let metrics = result.metrics();
    assert_eq!(metrics.vertex_symmetry_index, 1.0);
    assert_eq!(metrics.graph_entropy, 0.0);
    assert_eq!(metrics.orbit_homogeneity_index, 1.0);
    assert_eq!(metrics.orbit_deviation_index, 1.0);
    // 4 log2 4 / 4 + log2 24
    assert!((metrics.mowshowitz_symmetry_index - (2.0 + 24f64.log2())).abs() < 1e-12);
    Ok(())
}

#[test]
fn uneven_orbits_metrics() -> Result<(), SymError> {
    let result = AutomorphismResult::from_output(parse_output("(0 1)\ngrpsize=2;\n0 1; 2;\n")?, 3)?;
    let metrics = result.metrics();
    let expected_entropy = -((2.0f64 / 3.0) * (2.0f64 / 3.0).log2() + (1.0 / 3.0) * (1.0f64 / 3.0).log2());
    assert!((metrics.graph_entropy - expected_entropy).abs() < 1e-12);
    assert!((metrics.vertex_symmetry_index - 2.0 / 3.0).abs() < 1e-12);
    assert!((metrics.orbit_homogeneity_index - 0.5).abs() < 1e-12);
    assert!((metrics.orbit_deviation_index - 0.75).abs() < 1e-12);
    assert!((metrics.mowshowitz_symmetry_index - (2.0 / 3.0 + 1.0)).abs() < 1e-12);
    Ok(())
}

#[test]
fn protocol_lists_both_endpoints_and_colour_cells() {
    let mut graph = ColoredGraph::with_colors(vec![3, 1, 1, 3]);
    graph.add_edge(0, 1).unwrap();
    graph.add_edge(1, 2).unwrap();
    graph.add_edge(3, 1).unwrap();
    let mut buf = Vec::new();
    write_protocol(&graph, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "n=4 g",
            "1 ;",
            "0 2 3 ;",
            "1 ;",
            "1 ;",
            "f=[1 2 |0 3 ]",
            "x",
            "o",
            "q"
        ]
    );
}
