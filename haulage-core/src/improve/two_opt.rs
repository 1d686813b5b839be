//! Segment reversal within a single route.

use crate::Instance;

const IMPROVEMENT_EPSILON: f64 = 1e-10;

/// Reverse interior segments of `nodes` until no reversal shortens the
/// route.
///
/// The opening and closing depot visits stay in place. Segment costs are
/// recomputed in both directions, so asymmetric matrices are handled.
/// Sequences with fewer than two customers are returned unchanged.
///
/// # Examples
///
/// ```
/// use haulage_core::{InstanceBuilder, two_opt};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let positions = [0.0_f64, 2.0, 1.0, 3.0];
/// let matrix = positions
///     .iter()
///     .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
///     .collect();
/// let instance = InstanceBuilder::new(matrix).build()?;
/// assert_eq!(two_opt(&instance, &[0, 1, 2, 3, 0]), vec![0, 2, 1, 3, 0]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn two_opt(instance: &Instance, nodes: &[usize]) -> Vec<usize> {
    let mut current = nodes.to_vec();
    let len = current.len();
    if len < 4 {
        return current;
    }

    let mut improved = true;
    while improved {
        improved = false;
        for i in 1..len - 2 {
            for j in i + 1..len - 1 {
                if reversal_delta(instance, &current, i, j) < -IMPROVEMENT_EPSILON {
                    if let Some(segment) = current.get_mut(i..=j) {
                        segment.reverse();
                        improved = true;
                    }
                }
            }
        }
    }
    current
}

/// Cost change from reversing `nodes[i..=j]`, including the two boundary
/// legs.
fn reversal_delta(instance: &Instance, nodes: &[usize], i: usize, j: usize) -> f64 {
    let Some(window) = nodes.get(i - 1..=j + 1) else {
        return 0.0;
    };
    let before = path_length(instance, window.iter().copied());

    let (head, rest) = window.split_at(1);
    let (inner, tail) = rest.split_at(rest.len() - 1);
    let reversed = head
        .iter()
        .chain(inner.iter().rev())
        .chain(tail.iter())
        .copied();
    path_length(instance, reversed) - before
}

fn path_length(instance: &Instance, nodes: impl Iterator<Item = usize>) -> f64 {
    let mut nodes = nodes.peekable();
    let mut total = 0.0;
    while let Some(from) = nodes.next() {
        if let Some(&to) = nodes.peek() {
            total += instance.distance(from, to);
        }
    }
    total
}
