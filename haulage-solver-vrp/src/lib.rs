//! `vrp-core` backed routing backend for Haulage.
//!
//! This crate provides [`VrpBackend`], an implementation of the
//! [`RoutingBackend`](haulage_core::RoutingBackend) trait. It models the
//! capacitated routing instance as a `vrp-core` problem with one delivery job
//! per customer and one vehicle per fleet slot, and runs the `vrp-core`
//! metaheuristic within the time budget from
//! [`SearchSettings`](haulage_core::SearchSettings).
//!
//! Distances reach `vrp-core` already scaled by the
//! [`BackendModel`](haulage_core::BackendModel). The per-route distance
//! ceiling is expressed as each vehicle's shift end, with travel duration
//! equal to scaled distance. Solutions that leave any customer unassigned are
//! reported as
//! [`BackendUnavailable::NoFeasibleSolution`](haulage_core::BackendUnavailable)
//! so that the planner falls back to greedy construction.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod solver;
mod vrp;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use solver::{VrpBackend, VrpBackendConfig};
