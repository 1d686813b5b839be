//! Solve orchestration with greedy fallback.
//!
//! A [`Planner`] tries its configured [`RoutingBackend`] first. Any
//! [`BackendUnavailable`] outcome, or the absence of a backend, routes the
//! instance to the [`GreedyConstructor`] instead and records why in
//! [`Solution::note`].

use thiserror::Error;

use crate::evaluator::RouteError;
use crate::{
    BackendUnavailable, GreedyConstructor, Improvement, Instance, InstanceError, RoutingBackend,
    SearchSettings, Solution,
};

/// Note attached when the backend gave up without a feasible assignment.
pub const NO_FEASIBLE_SOLUTION_NOTE: &str =
    "optimization backend could not find a feasible solution, using greedy fallback";

/// Note attached when no backend was configured.
pub const NOT_CONFIGURED_NOTE: &str = "optimization backend not configured, using greedy solver";

/// Errors raised while planning routes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    /// The request did not describe a valid instance.
    #[error(transparent)]
    InvalidInstance(#[from] InstanceError),
    /// A route referenced a node outside the instance.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Runs a backend with greedy fallback.
///
/// # Examples
///
/// ```
/// use haulage_core::{InstanceBuilder, Planner, SearchSettings, SolverKind};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = InstanceBuilder::new(vec![vec![0.0, 2.0], vec![2.0, 0.0]])
///     .demands(vec![0, 1])
///     .build()?;
/// let solution = Planner::new(SearchSettings::default()).plan(&instance)?;
/// assert_eq!(solution.solver, SolverKind::Greedy);
/// assert_eq!(solution.routes[0].nodes, vec![0, 1, 0]);
/// # Ok(())
/// # }
/// ```
pub struct Planner {
    settings: SearchSettings,
    backend: Option<Box<dyn RoutingBackend>>,
    improvement: Improvement,
}

impl Planner {
    /// Planner with no backend and no improvement.
    #[must_use]
    pub fn new(settings: SearchSettings) -> Self {
        Self {
            settings,
            backend: None,
            improvement: Improvement::None,
        }
    }

    /// Try `backend` before falling back to the greedy constructor.
    #[must_use]
    pub fn with_backend(mut self, backend: Box<dyn RoutingBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Post-process greedy solutions with `improvement`.
    #[must_use]
    pub const fn with_improvement(mut self, improvement: Improvement) -> Self {
        self.improvement = improvement;
        self
    }

    /// Settings shared by the backend and the fallback.
    #[must_use]
    pub const fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Produce routes for `instance`.
    ///
    /// Backend failures never surface as errors; they select the greedy
    /// path and are described in the returned note.
    ///
    /// # Errors
    ///
    /// Returns [`SolveError::Route`] if route evaluation fails, which a
    /// validated [`Instance`] never triggers.
    pub fn plan(&self, instance: &Instance) -> Result<Solution, SolveError> {
        let Some(backend) = self.backend.as_deref() else {
            log::warn!("{NOT_CONFIGURED_NOTE}");
            return self.fallback(instance, NOT_CONFIGURED_NOTE.to_owned());
        };

        log::debug!(
            "solving {} nodes with {} vehicles on backend {}",
            instance.num_nodes(),
            instance.num_vehicles(),
            backend.name()
        );
        match backend.solve(instance, &self.settings) {
            Ok(solution) => Ok(solution),
            Err(err) => {
                log::warn!("backend {} unavailable: {err}", backend.name());
                self.fallback(instance, fallback_note(&err))
            }
        }
    }

    fn fallback(&self, instance: &Instance, note: String) -> Result<Solution, SolveError> {
        let mut solution = GreedyConstructor::new(&self.settings).construct(instance)?;
        self.improvement
            .apply(instance, &self.settings, &mut solution)?;
        Ok(solution.with_note(note))
    }
}

impl std::fmt::Debug for Planner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Planner")
            .field("settings", &self.settings)
            .field("backend", &self.backend.as_ref().map(|backend| backend.name()))
            .field("improvement", &self.improvement)
            .finish()
    }
}

fn fallback_note(err: &BackendUnavailable) -> String {
    match err {
        BackendUnavailable::NoFeasibleSolution { .. } => NO_FEASIBLE_SOLUTION_NOTE.to_owned(),
        BackendUnavailable::Missing { reason } | BackendUnavailable::Failed { reason } => {
            format!("optimization backend not available ({reason}), using greedy solver")
        }
    }
}
