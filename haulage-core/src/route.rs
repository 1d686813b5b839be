//! Vehicle routes and whole-fleet solutions.

use std::fmt;

use crate::evaluator::{RouteError, evaluate};
use crate::Instance;

/// One vehicle's tour, starting and ending at the depot.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Index of the vehicle driving the route.
    pub vehicle: usize,
    /// Visited nodes, depot first and last.
    pub nodes: Vec<usize>,
    /// Accumulated travel cost.
    pub distance: f64,
    /// Accumulated demand served.
    pub load: u64,
}

impl Route {
    /// Build a route and compute its metrics with [`evaluate`].
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnknownNode`] when `nodes` strays outside the
    /// instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use haulage_core::{InstanceBuilder, Route};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let instance = InstanceBuilder::new(vec![vec![0.0, 4.0], vec![4.0, 0.0]])
    ///     .demands(vec![0, 3])
    ///     .build()?;
    /// let route = Route::evaluated(&instance, 0, vec![0, 1, 0])?;
    /// assert_eq!(route.distance, 8.0);
    /// assert_eq!(route.load, 3);
    /// # Ok(())
    /// # }
    /// ```
    pub fn evaluated(
        instance: &Instance,
        vehicle: usize,
        nodes: Vec<usize>,
    ) -> Result<Self, RouteError> {
        let metrics = evaluate(instance, &nodes)?;
        Ok(Self {
            vehicle,
            nodes,
            distance: metrics.distance,
            load: metrics.load,
        })
    }

    /// A route that never leaves the depot.
    ///
    /// # Errors
    ///
    /// Propagates [`RouteError`] from evaluation; never fails for a valid
    /// instance.
    pub fn depot_only(instance: &Instance, vehicle: usize) -> Result<Self, RouteError> {
        let depot = instance.depot();
        Self::evaluated(instance, vehicle, vec![depot, depot])
    }

    /// Nodes strictly between the opening and closing depot visits.
    #[must_use]
    pub fn customers(&self) -> &[usize] {
        match self.nodes.as_slice() {
            [_, inner @ .., _] => inner,
            _ => &[],
        }
    }

    /// Whether the route serves no customer.
    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.customers().is_empty()
    }
}

/// Which engine produced a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
    /// An external or in-process optimisation backend.
    OptimizationBackend,
    /// The greedy constructor.
    Greedy,
}

impl SolverKind {
    /// Wire label for the solver kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OptimizationBackend => "optimization-backend",
            Self::Greedy => "greedy",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality claim attached to a [`Solution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Returned by an optimisation backend within its budget.
    Optimal,
    /// Produced by a heuristic with no optimality claim.
    Heuristic,
}

impl SolveStatus {
    /// Wire label for the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Optimal => "optimal",
            Self::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes for the whole fleet plus aggregate totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// One route per vehicle, in vehicle order.
    pub routes: Vec<Route>,
    /// Sum of route distances.
    pub total_distance: f64,
    /// Sum of route loads.
    pub total_load: u64,
    /// Customers no route serves.
    pub unvisited: Vec<usize>,
    /// Engine that produced the routes.
    pub solver: SolverKind,
    /// Quality claim.
    pub status: SolveStatus,
    /// Explanation attached when a fallback occurred.
    pub note: Option<String>,
}

impl Solution {
    /// Assemble a solution, deriving the totals from `routes`.
    #[must_use]
    pub fn from_routes(
        routes: Vec<Route>,
        unvisited: Vec<usize>,
        solver: SolverKind,
        status: SolveStatus,
    ) -> Self {
        let total_distance = routes.iter().map(|route| route.distance).sum();
        let total_load = routes.iter().map(|route| route.load).sum();
        Self {
            routes,
            total_distance,
            total_load,
            unvisited,
            solver,
            status,
            note: None,
        }
    }

    /// Attach an explanatory note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Recompute the totals after routes were edited in place.
    pub fn refresh_totals(&mut self) {
        self.total_distance = self.routes.iter().map(|route| route.distance).sum();
        self.total_load = self.routes.iter().map(|route| route.load).sum();
    }

    /// Number of customers served across all routes.
    #[must_use]
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|route| route.customers().len()).sum()
    }
}
