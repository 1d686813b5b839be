//! `VrpBackend` implementation backed by `vrp-core`.

use std::time::Instant;

use haulage_core::{
    BackendModel, BackendUnavailable, Instance, Route, RoutingBackend, SearchSettings, Solution,
    SolveStatus, SolverKind,
};

use crate::vrp::VrpSolveContext;

/// Configuration for [`VrpBackend`].
#[derive(Debug, Clone)]
pub struct VrpBackendConfig {
    /// Upper bound on `vrp-core` generations when
    /// [`SearchSettings::max_generations`] is unset.
    pub max_generations: usize,
}

impl Default for VrpBackendConfig {
    fn default() -> Self {
        Self {
            max_generations: 500,
        }
    }
}

/// Routing backend using `vrp-core` to search for short feasible routes.
///
/// # Examples
///
/// ```no_run
/// use haulage_core::{InstanceBuilder, RoutingBackend, SearchSettings};
/// use haulage_solver_vrp::VrpBackend;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = InstanceBuilder::new(vec![
///     vec![0.0, 2.0, 3.0],
///     vec![2.0, 0.0, 1.0],
///     vec![3.0, 1.0, 0.0],
/// ])
/// .demands(vec![0, 1, 1])
/// .build()?;
/// let solution = VrpBackend::new().solve(&instance, &SearchSettings::default())?;
/// assert!(solution.unvisited.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpBackend {
    config: VrpBackendConfig,
}

impl VrpBackend {
    /// Construct a backend using default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VrpBackendConfig::default())
    }

    /// Construct a backend with explicit configuration.
    #[must_use]
    pub const fn with_config(config: VrpBackendConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &VrpBackendConfig {
        &self.config
    }
}

impl RoutingBackend for VrpBackend {
    fn name(&self) -> &'static str {
        "vrp-core"
    }

    fn solve(
        &self,
        instance: &Instance,
        settings: &SearchSettings,
    ) -> Result<Solution, BackendUnavailable> {
        let started_at = Instant::now();
        if instance.customers().next().is_none() {
            return depot_only(instance);
        }

        let model = BackendModel::from_instance(instance, settings);
        let generations = settings
            .max_generations
            .unwrap_or(self.config.max_generations);
        let outcome = VrpSolveContext::new(generations).solve(&model)?;
        if outcome.unassigned > 0 {
            log::debug!(
                "vrp-core left {} customers unassigned after {:?}",
                outcome.unassigned,
                started_at.elapsed()
            );
            return Err(BackendUnavailable::NoFeasibleSolution {
                budget: settings.time_budget,
            });
        }

        let routes = outcome
            .tours
            .into_iter()
            .enumerate()
            .map(|(vehicle, tour)| match tour {
                Some(nodes) => Route::evaluated(instance, vehicle, nodes),
                None => Route::depot_only(instance, vehicle),
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| BackendUnavailable::Failed {
                reason: err.to_string(),
            })?;
        let solution = Solution::from_routes(
            routes,
            Vec::new(),
            SolverKind::OptimizationBackend,
            SolveStatus::Optimal,
        );

        if !model.admits(&solution) {
            log::debug!("vrp-core returned routes outside the capacity or distance limits");
            return Err(BackendUnavailable::NoFeasibleSolution {
                budget: settings.time_budget,
            });
        }

        let scaled: i64 = solution
            .routes
            .iter()
            .map(|route| model.path_cost(&route.nodes))
            .fold(0, i64::saturating_add);
        log::debug!(
            "vrp-core solved {} customers in {:?} with backend cost {}",
            solution.num_served(),
            started_at.elapsed(),
            model.unscale(scaled)
        );
        Ok(solution)
    }
}

fn depot_only(instance: &Instance) -> Result<Solution, BackendUnavailable> {
    let routes = (0..instance.num_vehicles())
        .map(|vehicle| Route::depot_only(instance, vehicle))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| BackendUnavailable::Failed {
            reason: err.to_string(),
        })?;
    Ok(Solution::from_routes(
        routes,
        Vec::new(),
        SolverKind::OptimizationBackend,
        SolveStatus::Optimal,
    ))
}
