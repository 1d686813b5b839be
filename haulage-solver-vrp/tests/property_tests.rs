//! Property-based tests for the `vrp-core` backend.
//!
//! These tests use `proptest` to assert invariants that must hold for every
//! solution the backend reports, complementing the behavioural scenarios.
//!
//! # Invariants tested
//!
//! - **Capacity:** no route carries more than its vehicle's capacity.
//! - **Route ceiling:** no route is longer than the maximum route distance.
//! - **Coverage:** a reported solution serves every customer exactly once.
//! - **Shape:** one route per vehicle, each starting and ending at the depot.


use std::collections::HashSet;
use std::time::Duration;

use haulage_core::{BackendUnavailable, RoutingBackend, SearchSettings};
use haulage_solver_vrp::VrpBackend;
use proptest::prelude::*;

use proptest_support::scenario_strategy;

fn settings() -> SearchSettings {
    SearchSettings {
        time_budget: Duration::from_secs(1),
        max_generations: Some(50),
        ..SearchSettings::default()
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn reported_solutions_are_feasible(scenario in scenario_strategy(6)) {
        let instance = scenario.instance();
        let settings = settings();
        match VrpBackend::new().solve(&instance, &settings) {
            Ok(solution) => {
                prop_assert_eq!(solution.routes.len(), instance.num_vehicles());
                prop_assert!(solution.unvisited.is_empty());
                let mut seen = HashSet::new();
                for route in &solution.routes {
                    prop_assert_eq!(route.nodes.first(), Some(&instance.depot()));
                    prop_assert_eq!(route.nodes.last(), Some(&instance.depot()));
                    prop_assert!(route.load <= u64::from(scenario.capacity));
                    prop_assert!(route.distance <= settings.max_route_distance);
                    for &node in route.customers() {
                        prop_assert!(seen.insert(node), "node {} served twice", node);
                    }
                }
                prop_assert_eq!(seen, instance.customers().collect::<HashSet<_>>());
            }
            Err(err) => {
                prop_assert!(
                    matches!(err, BackendUnavailable::NoFeasibleSolution { .. }),
                    "unexpected failure: {}",
                    err
                );
            }
        }
    }
}
