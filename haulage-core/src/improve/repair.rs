//! Cheapest-insertion repair of unvisited customers.

use crate::evaluator::RouteError;
use crate::{Instance, Route, SearchSettings, Solution};

#[derive(Debug, Clone, Copy)]
struct Insertion {
    route: usize,
    position: usize,
    delta: f64,
}

/// Insert unvisited customers into existing routes.
///
/// Customers are taken in index order. Each goes to the position with the
/// smallest added distance among routes that keep both their capacity and
/// the route ceiling; ties favour the lower vehicle, then the earlier
/// position. Customers with no feasible position stay unvisited.
///
/// Returns how many customers were placed. Totals on `solution` are left for
/// the caller to refresh.
///
/// # Errors
///
/// Propagates [`RouteError`] from route re-evaluation.
pub fn insert_unvisited(
    instance: &Instance,
    settings: &SearchSettings,
    solution: &mut Solution,
) -> Result<usize, RouteError> {
    let pending = std::mem::take(&mut solution.unvisited);
    let mut placed = 0;

    for node in pending {
        let Some(best) = cheapest_insertion(instance, settings, &solution.routes, node) else {
            solution.unvisited.push(node);
            continue;
        };
        let Some(route) = solution.routes.get_mut(best.route) else {
            solution.unvisited.push(node);
            continue;
        };
        let mut nodes = route.nodes.clone();
        nodes.insert(best.position, node);
        *route = Route::evaluated(instance, route.vehicle, nodes)?;
        placed += 1;
        log::trace!(
            "placed node {node} on vehicle {} at position {}",
            route.vehicle,
            best.position
        );
    }

    Ok(placed)
}

fn cheapest_insertion(
    instance: &Instance,
    settings: &SearchSettings,
    routes: &[Route],
    node: usize,
) -> Option<Insertion> {
    let demand = u64::from(instance.demand(node));
    let mut best: Option<Insertion> = None;

    for (index, route) in routes.iter().enumerate() {
        if route.load + demand > u64::from(instance.capacity(route.vehicle)) {
            continue;
        }
        for (offset, pair) in route.nodes.windows(2).enumerate() {
            let [prev, next] = *pair else { continue };
            let delta = instance.distance(prev, node) + instance.distance(node, next)
                - instance.distance(prev, next);
            if route.distance + delta > settings.max_route_distance {
                continue;
            }
            if best.is_none_or(|current| delta < current.delta) {
                best = Some(Insertion {
                    route: index,
                    position: offset + 1,
                    delta,
                });
            }
        }
    }
    best
}
