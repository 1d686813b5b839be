//! Facade crate for the Haulage routing engine.
//!
//! This crate re-exports the core domain types and exposes the optional
//! optimisation backends and handoff signing behind feature flags.
//!
//! ```
//! use haulage_engine::{InstanceBuilder, Planner, SearchSettings, SolverKind};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let instance = InstanceBuilder::new(vec![
//!     vec![0.0, 1.0, 1.0],
//!     vec![1.0, 0.0, 1.0],
//!     vec![1.0, 1.0, 0.0],
//! ])
//! .demands(vec![0, 1, 1])
//! .vehicle_capacities(vec![1])
//! .build()?;
//! let solution = Planner::new(SearchSettings::default()).plan(&instance)?;
//! assert_eq!(solution.solver, SolverKind::Greedy);
//! assert_eq!(solution.unvisited, vec![2]);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub use haulage_core::{
    BackendModel, BackendUnavailable, Dimension, GreedyConstructor, Improvement, Instance,
    InstanceBuilder, InstanceError, MAX_VEHICLES, Planner, Route, RouteError, RouteMetrics, RoutingBackend,
    SearchSettings, Solution, SolveError, SolveStatus, SolverKind, evaluate, insert_unvisited,
    two_opt,
};

#[cfg(feature = "serde")]
pub use haulage_core::{ErrorResponse, RouteResponse, SolveRequest, SolveResponse};

#[cfg(feature = "solver-vrp")]
pub use haulage_solver_vrp::{VrpBackend, VrpBackendConfig};

#[cfg(feature = "solver-ortools")]
pub use haulage_solver_ortools::OrtoolsBackend;

#[cfg(feature = "handoff")]
pub use haulage_handoff::{HandoffError, HandoffSigner, canonical_json};
