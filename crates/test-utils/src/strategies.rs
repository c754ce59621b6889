//! `proptest` strategies for random unit sets.

use std::collections::BTreeSet;

use orderdag::units::{CallbackUnit, OrderingRule};
use proptest::prelude::*;

/// A generated callback set plus the `(before, after)` index pairs its rules
/// imply.
#[derive(Debug, Clone)]
pub struct GeneratedUnits {
    pub units: Vec<CallbackUnit>,
    pub edges: BTreeSet<(usize, usize)>,
}

/// Zero-padded type name, so identity order equals index order.
pub fn type_name(i: usize) -> String {
    format!("T{:03}", i)
}

fn build(num: usize, raw_edges: Vec<(usize, usize, bool)>, acyclic: bool) -> GeneratedUnits {
    let mut units: Vec<CallbackUnit> = (0..num)
        .map(|i| CallbackUnit::new(type_name(i), "Run", "Game"))
        .collect();
    let mut edges = BTreeSet::new();

    for (a, b, as_before) in raw_edges {
        let (mut first, mut second) = (a % num, b % num);
        if first == second {
            continue;
        }
        if acyclic && first > second {
            std::mem::swap(&mut first, &mut second);
        }
        // Express "first before second" either as a before-rule on `first`
        // or an after-rule on `second`.
        if as_before {
            units[first]
                .rules
                .push(OrderingRule::RunBeforeClass(type_name(second)));
        } else {
            units[second]
                .rules
                .push(OrderingRule::RunAfterClass(type_name(first)));
        }
        edges.insert((first, second));
    }

    GeneratedUnits { units, edges }
}

/// Callback sets whose rules never form a cycle (edges only go from lower to
/// higher index).
pub fn acyclic_units(max_units: usize) -> impl Strategy<Value = GeneratedUnits> {
    (1..=max_units).prop_flat_map(|num| {
        proptest::collection::vec((any::<usize>(), any::<usize>(), any::<bool>()), 0..num * 2)
            .prop_map(move |raw| build(num, raw, true))
    })
}

/// Callback sets with arbitrary rules, cycles included.
pub fn any_units(max_units: usize) -> impl Strategy<Value = GeneratedUnits> {
    (1..=max_units).prop_flat_map(|num| {
        proptest::collection::vec((any::<usize>(), any::<usize>(), any::<bool>()), 0..num * 2)
            .prop_map(move |raw| build(num, raw, false))
    })
}
