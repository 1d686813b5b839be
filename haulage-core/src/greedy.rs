//! Nearest-feasible-neighbour route construction.
//!
//! Vehicles are processed in index order and share one pool of unvisited
//! nodes. Each vehicle leaves the depot and repeatedly moves to the nearest
//! unvisited node that still fits its remaining capacity and keeps the route,
//! including the return leg, within the distance ceiling. Ties go to the
//! lowest node index. When nothing fits the route closes at the depot.
//!
//! The pass never revisits a finished vehicle, so nodes left over once every
//! vehicle has closed are reported as unvisited rather than reassigned. The
//! opt-in [`Improvement`](crate::Improvement) pass can repair them.
//!
//! # Complexity
//!
//! O(n²) per vehicle where n is the number of nodes.

use crate::evaluator::RouteError;
use crate::{Instance, Route, SearchSettings, Solution, SolveStatus, SolverKind};

/// Deterministic greedy constructor.
///
/// # Examples
///
/// ```
/// use haulage_core::{GreedyConstructor, InstanceBuilder};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = InstanceBuilder::new(vec![
///     vec![0.0, 1.0, 2.0, 3.0],
///     vec![1.0, 0.0, 1.0, 2.0],
///     vec![2.0, 1.0, 0.0, 1.0],
///     vec![3.0, 2.0, 1.0, 0.0],
/// ])
/// .demands(vec![0, 10, 10, 10])
/// .vehicle_capacities(vec![30])
/// .build()?;
///
/// let solution = GreedyConstructor::default().construct(&instance)?;
/// assert_eq!(solution.routes[0].nodes, vec![0, 1, 2, 3, 0]);
/// assert!(solution.unvisited.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GreedyConstructor {
    max_route_distance: f64,
}

impl Default for GreedyConstructor {
    fn default() -> Self {
        Self::new(&SearchSettings::default())
    }
}

impl GreedyConstructor {
    /// Construct using the route ceiling from `settings`.
    #[must_use]
    pub const fn new(settings: &SearchSettings) -> Self {
        Self {
            max_route_distance: settings.max_route_distance,
        }
    }

    /// Build one route per vehicle.
    ///
    /// Partial infeasibility is not an error: customers that fit no vehicle
    /// are listed in [`Solution::unvisited`].
    ///
    /// # Errors
    ///
    /// Propagates [`RouteError`] from route evaluation; a validated
    /// [`Instance`] never triggers it.
    pub fn construct(&self, instance: &Instance) -> Result<Solution, RouteError> {
        let mut visited = vec![false; instance.num_nodes()];
        if let Some(depot) = visited.get_mut(instance.depot()) {
            *depot = true;
        }

        let routes = (0..instance.num_vehicles())
            .map(|vehicle| {
                let nodes = self.extend_route(instance, vehicle, &mut visited);
                Route::evaluated(instance, vehicle, nodes)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let unvisited: Vec<usize> = instance
            .customers()
            .filter(|&node| !visited.get(node).copied().unwrap_or(false))
            .collect();
        log::debug!(
            "greedy construction served {} customers, {} unvisited",
            instance.customers().count() - unvisited.len(),
            unvisited.len()
        );

        Ok(Solution::from_routes(
            routes,
            unvisited,
            SolverKind::Greedy,
            SolveStatus::Heuristic,
        ))
    }

    fn extend_route(&self, instance: &Instance, vehicle: usize, visited: &mut [bool]) -> Vec<usize> {
        let depot = instance.depot();
        let capacity = u64::from(instance.capacity(vehicle));
        let mut nodes = vec![depot];
        let mut current = depot;
        let mut load = 0_u64;
        let mut travelled = 0.0;

        while let Some((next, leg)) =
            self.nearest_feasible(instance, visited, current, load, capacity, travelled)
        {
            if let Some(flag) = visited.get_mut(next) {
                *flag = true;
            }
            nodes.push(next);
            load += u64::from(instance.demand(next));
            travelled += leg;
            current = next;
        }

        nodes.push(depot);
        nodes
    }

    fn nearest_feasible(
        &self,
        instance: &Instance,
        visited: &[bool],
        current: usize,
        load: u64,
        capacity: u64,
        travelled: f64,
    ) -> Option<(usize, f64)> {
        let depot = instance.depot();
        let mut best: Option<(usize, f64)> = None;
        for (candidate, _) in visited.iter().enumerate().filter(|(_, seen)| !**seen) {
            if load + u64::from(instance.demand(candidate)) > capacity {
                continue;
            }
            let leg = instance.distance(current, candidate);
            if travelled + leg + instance.distance(candidate, depot) > self.max_route_distance {
                continue;
            }
            if best.is_none_or(|(_, best_leg)| leg < best_leg) {
                best = Some((candidate, leg));
            }
        }
        best
    }
}
