//! Opt-in improvement of greedy solutions.
//!
//! The greedy constructor is a single forward pass: it never reorders a
//! finished route and never revisits leftover customers. This module is the
//! separate, explicitly requested extension that does both:
//!
//! - [`two_opt`] reverses route segments while doing so shortens the route;
//! - [`insert_unvisited`] places leftover customers at their cheapest
//!   feasible position in any route with spare capacity and distance slack.
//!
//! Neither step touches the solver label or the heuristic status of the
//! solution.

mod repair;
mod two_opt;

pub use repair::insert_unvisited;
pub use two_opt::two_opt;

use crate::evaluator::RouteError;
use crate::{Instance, Route, SearchSettings, Solution};

/// Post-processing applied to greedy output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Improvement {
    /// Return the greedy pass unchanged.
    #[default]
    None,
    /// Run 2-opt on every route, repair unvisited customers by cheapest
    /// insertion, then run 2-opt again on the routes that grew.
    LocalSearch,
}

impl Improvement {
    /// Apply the improvement to `solution` in place.
    ///
    /// # Errors
    ///
    /// Propagates [`RouteError`] from route re-evaluation.
    pub fn apply(
        self,
        instance: &Instance,
        settings: &SearchSettings,
        solution: &mut Solution,
    ) -> Result<(), RouteError> {
        if self == Self::None {
            return Ok(());
        }

        let before = solution.total_distance;
        reorder_routes(instance, solution)?;
        let placed = insert_unvisited(instance, settings, solution)?;
        if placed > 0 {
            reorder_routes(instance, solution)?;
        }
        solution.refresh_totals();
        log::debug!(
            "local search moved total distance from {before} to {} and placed {placed} customers",
            solution.total_distance
        );
        Ok(())
    }
}

fn reorder_routes(instance: &Instance, solution: &mut Solution) -> Result<(), RouteError> {
    for route in &mut solution.routes {
        let nodes = two_opt(instance, &route.nodes);
        if nodes != route.nodes {
            *route = Route::evaluated(instance, route.vehicle, nodes)?;
        }
    }
    Ok(())
}
