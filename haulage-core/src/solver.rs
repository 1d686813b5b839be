//! Optimisation backend boundary.
//!
//! A [`RoutingBackend`] receives an [`Instance`] and [`SearchSettings`] and
//! returns a full [`Solution`] or reports itself unavailable. Backends
//! usually want integer arc costs, so [`BackendModel`] carries the shared
//! translation: scaled costs, the capacity and distance dimensions and the
//! search time limit.

use std::time::Duration;

use thiserror::Error;

use crate::{Instance, Solution};

/// Default wall-clock budget for a backend search.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(30);

/// Default per-route distance ceiling, in matrix units.
pub const DEFAULT_MAX_ROUTE_DISTANCE: f64 = 3000.0;

/// Default factor applied to distances before they reach a backend.
pub const DEFAULT_DISTANCE_SCALE: u32 = 1000;

/// Knobs shared by every solve path.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Wall-clock budget for the backend search.
    pub time_budget: Duration,
    /// Per-route distance ceiling in matrix units.
    pub max_route_distance: f64,
    /// Multiplier turning matrix distances into integer backend costs.
    pub distance_scale: u32,
    /// Optional cap on metaheuristic generations.
    pub max_generations: Option<usize>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            time_budget: DEFAULT_TIME_BUDGET,
            max_route_distance: DEFAULT_MAX_ROUTE_DISTANCE,
            distance_scale: DEFAULT_DISTANCE_SCALE,
            max_generations: None,
        }
    }
}

impl SearchSettings {
    /// Per-route distance ceiling in scaled backend units.
    ///
    /// ```
    /// use haulage_core::SearchSettings;
    ///
    /// assert_eq!(SearchSettings::default().scaled_route_limit(), 3_000_000);
    /// ```
    #[must_use]
    pub fn scaled_route_limit(&self) -> i64 {
        scale_cost(self.max_route_distance, self.distance_scale)
    }
}

/// Reasons a backend could not deliver a solution.
///
/// None of these are fatal to a solve: the planner recovers by falling back
/// to the greedy constructor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendUnavailable {
    /// The backend is not present in this build or process.
    #[error("optimization backend is missing: {reason}")]
    Missing {
        /// Human-readable explanation.
        reason: String,
    },
    /// The backend finished its budget without a feasible solution.
    #[error("optimization backend found no feasible solution within {budget:?}")]
    NoFeasibleSolution {
        /// Budget the search ran under.
        budget: Duration,
    },
    /// The backend failed while modelling or searching.
    #[error("optimization backend failed: {reason}")]
    Failed {
        /// Human-readable explanation.
        reason: String,
    },
}

/// Solve a full instance with an optimisation engine.
///
/// Implementations must treat the call as one blocking search bounded by
/// [`SearchSettings::time_budget`], return one route per vehicle, and report
/// [`BackendUnavailable::NoFeasibleSolution`] rather than a partial
/// assignment. Backends must be `Send + Sync` so that independent requests
/// can share them.
pub trait RoutingBackend: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Solve `instance` within the limits in `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendUnavailable`] when the backend is missing, fails, or
    /// cannot find a feasible solution.
    fn solve(
        &self,
        instance: &Instance,
        settings: &SearchSettings,
    ) -> Result<Solution, BackendUnavailable>;
}

/// A cumulative resource tracked along each route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    /// Dimension label.
    pub name: &'static str,
    /// Allowed waiting slack at each node.
    pub slack: i64,
    /// Maximum cumulative value, one entry per vehicle.
    pub vehicle_limits: Vec<i64>,
    /// Whether the cumulative value is pinned to zero at the route origin.
    pub start_cumul_to_zero: bool,
}

impl Dimension {
    /// Ceiling for `vehicle`, or `None` for an unknown vehicle.
    #[must_use]
    pub fn limit(&self, vehicle: usize) -> Option<i64> {
        self.vehicle_limits.get(vehicle).copied()
    }
}

/// Integer-cost translation of an [`Instance`] for optimisation engines.
///
/// # Examples
///
/// ```
/// use haulage_core::{BackendModel, InstanceBuilder, SearchSettings};
///
/// # fn main() -> Result<(), haulage_core::InstanceError> {
/// let instance = InstanceBuilder::new(vec![vec![0.0, 1.25], vec![1.25, 0.0]])
///     .demands(vec![0, 2])
///     .build()?;
/// let model = BackendModel::from_instance(&instance, &SearchSettings::default());
///
/// assert_eq!(model.cost(0, 1), Some(1250));
/// assert!(model.capacity.is_some());
/// assert_eq!(model.unscale(1250), 1.25);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackendModel {
    /// Scaled arc costs.
    pub costs: Vec<Vec<i64>>,
    /// Demand per node, zero at the depot.
    pub demands: Vec<i64>,
    /// Depot node.
    pub depot: usize,
    /// Fleet size.
    pub num_vehicles: usize,
    /// Load dimension; absent when every demand is zero.
    pub capacity: Option<Dimension>,
    /// Travelled-distance dimension in scaled units.
    pub distance: Dimension,
    /// Per-route distance ceiling in matrix units.
    pub max_route_distance: f64,
    /// Wall-clock limit for the search.
    pub time_limit: Duration,
    /// Optional cap on metaheuristic generations.
    pub max_generations: Option<usize>,
    scale: u32,
}

impl BackendModel {
    /// Label of the load dimension.
    pub const CAPACITY: &'static str = "Capacity";
    /// Label of the distance dimension.
    pub const DISTANCE: &'static str = "Distance";

    /// Translate `instance` under `settings`.
    #[must_use]
    pub fn from_instance(instance: &Instance, settings: &SearchSettings) -> Self {
        let nodes = instance.num_nodes();
        let scale = settings.distance_scale;
        let costs = (0..nodes)
            .map(|from| {
                (0..nodes)
                    .map(|to| scale_cost(instance.distance(from, to), scale))
                    .collect()
            })
            .collect();
        let demands = (0..nodes)
            .map(|node| i64::from(instance.demand(node)))
            .collect();
        let vehicles = instance.num_vehicles();

        let capacity = instance.has_positive_demand().then(|| Dimension {
            name: Self::CAPACITY,
            slack: 0,
            vehicle_limits: (0..vehicles)
                .map(|vehicle| i64::from(instance.capacity(vehicle)))
                .collect(),
            start_cumul_to_zero: true,
        });
        let distance = Dimension {
            name: Self::DISTANCE,
            slack: 0,
            vehicle_limits: vec![settings.scaled_route_limit(); vehicles],
            start_cumul_to_zero: true,
        };

        Self {
            costs,
            demands,
            depot: instance.depot(),
            num_vehicles: vehicles,
            capacity,
            distance,
            max_route_distance: settings.max_route_distance,
            time_limit: settings.time_budget,
            max_generations: settings.max_generations,
            scale,
        }
    }

    /// Scaled cost of the arc `from → to`.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> Option<i64> {
        self.costs.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Scaled cost of walking `nodes` in order; unknown nodes cost nothing.
    ///
    /// The total saturates at `i64::MAX`.
    #[must_use]
    pub fn path_cost(&self, nodes: &[usize]) -> i64 {
        nodes
            .windows(2)
            .filter_map(|pair| match *pair {
                [from, to] => self.cost(from, to),
                _ => None,
            })
            .fold(0, i64::saturating_add)
    }

    /// Convert a scaled cost back to matrix units.
    #[must_use]
    pub fn unscale(&self, cost: i64) -> f64 {
        cost as f64 / f64::from(self.scale)
    }

    /// Whether every route in `solution` respects both dimensions.
    ///
    /// Scaled costs truncate, so the evaluated route distance is also held
    /// against [`Self::max_route_distance`].
    #[must_use]
    pub fn admits(&self, solution: &Solution) -> bool {
        solution.routes.iter().all(|route| {
            let within_distance = route.distance <= self.max_route_distance
                && self
                    .distance
                    .limit(route.vehicle)
                    .is_some_and(|limit| self.path_cost(&route.nodes) <= limit);
            let within_capacity = self.capacity.as_ref().is_none_or(|dimension| {
                dimension
                    .limit(route.vehicle)
                    .is_some_and(|limit| i64::try_from(route.load).is_ok_and(|load| load <= limit))
            });
            within_distance && within_capacity
        })
    }
}

// Truncates toward zero; infinite distances saturate at `i64::MAX`.
fn scale_cost(distance: f64, scale: u32) -> i64 {
    (distance * f64::from(scale)) as i64
}
