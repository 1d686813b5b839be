//! Optional OR-Tools-based routing backend.
//!
//! This crate currently provides a placeholder backend that compiles behind
//! the `solver-ortools` feature flag. It reserves the API surface for a
//! native OR-Tools routing model without pulling native dependencies yet:
//! the instance is translated into a [`BackendModel`] exactly as a linked
//! binding would receive it, and the backend then reports itself missing so
//! that the planner falls back to greedy construction.

#![forbid(unsafe_code)]

use haulage_core::{
    BackendModel, BackendUnavailable, Instance, RoutingBackend, SearchSettings, Solution,
};

/// Reason reported while no OR-Tools binding is linked.
pub const NOT_LINKED: &str = "OR-Tools bindings are not linked";

/// Placeholder backend for the optional OR-Tools integration.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrtoolsBackend;

impl OrtoolsBackend {
    /// Construct a placeholder OR-Tools backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Translate `instance` into the routing model a binding would consume.
    #[must_use]
    pub fn model(&self, instance: &Instance, settings: &SearchSettings) -> BackendModel {
        BackendModel::from_instance(instance, settings)
    }
}

impl RoutingBackend for OrtoolsBackend {
    fn name(&self) -> &'static str {
        "ortools"
    }

    fn solve(
        &self,
        instance: &Instance,
        settings: &SearchSettings,
    ) -> Result<Solution, BackendUnavailable> {
        let model = self.model(instance, settings);
        log::debug!(
            "prepared OR-Tools model with {} nodes, {} vehicles and a {:?} limit",
            model.costs.len(),
            model.num_vehicles,
            model.time_limit
        );
        Err(BackendUnavailable::Missing {
            reason: NOT_LINKED.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haulage_core::test_support::unit_costs;
    use haulage_core::{InstanceBuilder, Planner, SolverKind};
    use rstest::{fixture, rstest};

    #[fixture]
    fn instance() -> Instance {
        InstanceBuilder::new(unit_costs(3))
            .demands(vec![0, 2, 2])
            .vehicle_capacities(vec![4])
            .build()
            .expect("valid instance")
    }

    #[rstest]
    fn reports_missing_bindings(instance: Instance) {
        let err = OrtoolsBackend::new()
            .solve(&instance, &SearchSettings::default())
            .expect_err("bindings are not linked");
        assert_eq!(
            err,
            BackendUnavailable::Missing {
                reason: NOT_LINKED.to_owned()
            }
        );
    }

    #[rstest]
    fn model_carries_both_dimensions(instance: Instance) {
        let model = OrtoolsBackend::new().model(&instance, &SearchSettings::default());
        assert_eq!(model.cost(0, 1), Some(1000));
        assert_eq!(model.distance.limit(0), Some(3_000_000));
        let capacity = model.capacity.expect("demands are positive");
        assert_eq!(capacity.limit(0), Some(4));
    }

    #[rstest]
    fn planner_falls_back_with_reason(instance: Instance) {
        let solution = Planner::new(SearchSettings::default())
            .with_backend(Box::new(OrtoolsBackend::new()))
            .plan(&instance)
            .expect("plan");
        assert_eq!(solution.solver, SolverKind::Greedy);
        assert_eq!(
            solution.note.as_deref(),
            Some("optimization backend not available (OR-Tools bindings are not linked), using greedy solver")
        );
        assert_eq!(solution.total_load, 4);
    }
}
