//! Distance and load of node sequences.

use thiserror::Error;

use crate::Instance;

/// Aggregates computed for one node sequence.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RouteMetrics {
    /// Sum of consecutive pairwise distances.
    pub distance: f64,
    /// Sum of the demands of non-depot nodes.
    pub load: u64,
}

/// Errors returned by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A node index lies outside the instance.
    #[error("route references node {node} outside the instance")]
    UnknownNode {
        /// Offending node index.
        node: usize,
    },
}

/// Evaluate `nodes` against `instance`.
///
/// The depot contributes no load wherever it appears in the sequence.
///
/// # Errors
///
/// Returns [`RouteError::UnknownNode`] when a node does not index the
/// instance.
///
/// # Examples
///
/// ```
/// use haulage_core::{InstanceBuilder, evaluate};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let instance = InstanceBuilder::new(vec![
///     vec![0.0, 2.0, 3.0],
///     vec![2.0, 0.0, 1.0],
///     vec![3.0, 1.0, 0.0],
/// ])
/// .demands(vec![0, 4, 5])
/// .build()?;
///
/// let metrics = evaluate(&instance, &[0, 1, 2, 0])?;
/// assert_eq!(metrics.distance, 6.0);
/// assert_eq!(metrics.load, 9);
/// # Ok(())
/// # }
/// ```
pub fn evaluate(instance: &Instance, nodes: &[usize]) -> Result<RouteMetrics, RouteError> {
    if let Some(&node) = nodes.iter().find(|&&node| !instance.contains(node)) {
        return Err(RouteError::UnknownNode { node });
    }

    let distance = nodes
        .windows(2)
        .filter_map(|pair| match *pair {
            [from, to] => instance.checked_distance(from, to),
            _ => None,
        })
        .sum();
    let load = nodes
        .iter()
        .map(|&node| u64::from(instance.demand(node)))
        .sum();

    Ok(RouteMetrics { distance, load })
}
