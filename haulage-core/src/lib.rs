//! Core domain types for the Haulage routing engine.
//!
//! The crate models a capacitated vehicle routing instance, evaluates routes
//! over it, and builds solutions either through a pluggable
//! [`RoutingBackend`] or through the deterministic greedy constructor that
//! the [`Planner`] falls back to. Constructors return `Result` to surface
//! invalid input early.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod evaluator;
pub mod greedy;
pub mod improve;
pub mod instance;
pub mod planner;
pub mod route;
pub mod solver;
#[cfg(feature = "serde")]
pub mod wire;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use evaluator::{RouteError, RouteMetrics, evaluate};
pub use greedy::GreedyConstructor;
pub use improve::{Improvement, insert_unvisited, two_opt};
pub use instance::{Instance, InstanceBuilder, InstanceError, MAX_VEHICLES};
pub use planner::{Planner, SolveError};
pub use route::{Route, Solution, SolveStatus, SolverKind};
pub use solver::{
    BackendModel, BackendUnavailable, Dimension, RoutingBackend, SearchSettings,
};
#[cfg(feature = "serde")]
pub use wire::{ErrorResponse, RouteResponse, SolveRequest, SolveResponse};
