use super::support::{identity, manager, APP, MODULE};
use naming_core::{BoundValue, JndiName};
use naming_manager::JndiBinding;
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 64;

/// Directory segments never contain `_`, leaves always do, so a leaf never doubles as a
/// directory.
fn arb_path() -> impl Strategy<Value = (Vec<String>, String)> {
    (
        prop::collection::vec("[a-z]{1,3}", 0..3),
        "x_[a-z]{1,3}",
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn every_bound_name_is_reachable_by_listing(
        paths in prop::collection::vec(arb_path(), 1..6),
    ) {
        let m = manager();
        let full = |(dirs, leaf): &(Vec<String>, String)| {
            let mut name = JndiName::new("java:comp/env");
            for segment in dirs.iter().chain(std::iter::once(leaf)) {
                name = name.join(segment);
            }
            name
        };
        m.bind_to_component_namespace(
            Some(APP),
            Some(MODULE),
            "c1",
            false,
            paths.iter().map(|path| JndiBinding::new(full(path), BoundValue::value(1))),
        )
        .unwrap();

        let id = identity("c1");
        for (dirs, leaf) in &paths {
            let mut parent = JndiName::new("java:comp/env");
            for segment in dirs.iter().chain(std::iter::once(leaf)) {
                let names: Vec<String> = m
                    .list(&id, &parent)
                    .unwrap()
                    .into_iter()
                    .map(|pair| pair.name)
                    .collect();
                prop_assert!(names.contains(segment), "{segment} missing under {parent}: {names:?}");
                parent = parent.join(segment);
            }
            prop_assert!(m.lookup(&id, &parent, None).is_ok());
        }
    }
}
