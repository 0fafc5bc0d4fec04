use plansym_aut::{Group, Permutation};
use plansym_core::SymError;
use proptest::prelude::*;

fn permutation() -> impl Strategy<Value = Permutation> {
    (1usize..24)
        .prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
        .prop_map(|mapping| Permutation::from_mapping(mapping).expect("shuffle is a bijection"))
}

fn permutation_pair() -> impl Strategy<Value = (Permutation, Permutation)> {
    (1usize..24).prop_flat_map(|n| {
        let shuffled = || Just((0..n).collect::<Vec<_>>()).prop_shuffle();
        (shuffled(), shuffled()).prop_map(|(a, b)| {
            (
                Permutation::from_mapping(a).expect("bijection"),
                Permutation::from_mapping(b).expect("bijection"),
            )
        })
    })
}

proptest! {
    #[test]
    fn apply_is_a_bijection(p in permutation()) {
        let n = p.domain_size();
        let mut images: Vec<usize> = (0..n).map(|i| p.apply(i)).collect();
        images.sort_unstable();
        prop_assert_eq!(images, (0..n).collect::<Vec<_>>());
    }

    #[test]
    fn identity_is_neutral(p in permutation()) {
        let id = Permutation::identity(p.domain_size());
        prop_assert_eq!(id.compose(&p).unwrap(), p.clone());
        prop_assert_eq!(p.compose(&id).unwrap(), p);
    }

    #[test]
    fn cycles_round_trip(p in permutation()) {
        let cycles = p.to_cycles();
        prop_assert!(cycles.iter().all(|cycle| cycle.len() >= 2));
        prop_assert_eq!(Permutation::from_cycles(p.domain_size(), &cycles).unwrap(), p);
    }

    #[test]
    fn inverse_composes_to_identity(p in permutation()) {
        let id = Permutation::identity(p.domain_size());
        prop_assert_eq!(p.compose(&p.inverse()).unwrap(), id.clone());
        prop_assert_eq!(p.inverse().compose(&p).unwrap(), id);
    }

    #[test]
    fn compose_applies_right_first((a, b) in permutation_pair()) {
        let ab = a.compose(&b).unwrap();
        for i in 0..a.domain_size() {
            prop_assert_eq!(ab.apply(i), a.apply(b.apply(i)));
        }
    }

    #[test]
    fn order_returns_to_identity(p in permutation()) {
        let mut power = Permutation::identity(p.domain_size());
        for _ in 0..p.order() {
            power = p.compose(&power).unwrap();
        }
        prop_assert!(power.is_identity());
    }
}

#[test]
fn out_of_range_image_is_rejected() {
    let err = Permutation::from_mapping(vec![0, 3, 1]).unwrap_err();
    assert!(matches!(err, SymError::InvalidBijection(ref info) if info.code == "out-of-range"));
    let err = Permutation::from_mapping(vec![0, 0, 1]).unwrap_err();
    assert!(matches!(err, SymError::InvalidBijection(ref info) if info.code == "not-injective"));
    let err = Permutation::from_cycles(3, &[vec![0, 3]]).unwrap_err();
    assert!(matches!(err, SymError::InvalidBijection(_)));
}

#[test]
fn composing_different_domains_fails() {
    let err = Permutation::identity(3)
        .compose(&Permutation::identity(4))
        .unwrap_err();
    assert!(matches!(err, SymError::DomainMismatch(_)));
}

#[test]
fn group_keeps_generator_order() -> Result<(), SymError> {
    let a = Permutation::from_cycles(4, &[vec![0, 1]])?;
    let b = Permutation::from_cycles(4, &[vec![2, 3]])?;
    let group = Group::new(4, vec![b.clone(), a.clone(), b.clone()])?;
    assert_eq!(group.generators(), &[b.clone(), a, b]);
    assert_eq!(group.len(), 3);
    assert_eq!(group.to_string(), "(2 3),(0 1),(2 3)");
    Ok(())
}

#[test]
fn permutation_json_is_its_mapping() {
    let p = Permutation::from_cycles(3, &[vec![0, 2]]).unwrap();
    assert_eq!(serde_json::to_string(&p).unwrap(), "[2,1,0]");
    assert!(serde_json::from_str::<Permutation>("[1,1,0]").is_err());
}
