//! Test-only utilities for `haulage-solver-vrp`.
//!
//! The helpers in this module are available to unit tests and behavioural
//! tests. They are gated behind the `test-support` feature (and `cfg(test)`).

use std::time::Duration;

use haulage_core::SearchSettings;

/// Settings that keep `vrp-core` searches short enough for test suites.
#[must_use]
pub fn quick_settings() -> SearchSettings {
    SearchSettings {
        time_budget: Duration::from_secs(2),
        max_generations: Some(100),
        ..SearchSettings::default()
    }
}

/// Distance matrix for a depot at the origin and `customers` points spaced
/// evenly on a circle of the given `radius`.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "ring coordinates are computed in floating point"
)]
pub fn ring_costs(customers: usize, radius: f64) -> Vec<Vec<f64>> {
    let step = std::f64::consts::TAU / customers.max(1) as f64;
    let points: Vec<(f64, f64)> = std::iter::once((0.0, 0.0))
        .chain((0..customers).map(|index| {
            let angle = step * index as f64;
            (radius * angle.cos(), radius * angle.sin())
        }))
        .collect();
    points
        .iter()
        .map(|&(ax, ay)| {
            points
                .iter()
                .map(|&(bx, by)| (ax - bx).hypot(ay - by))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[expect(clippy::indexing_slicing, reason = "test matrix has known dimensions")]
    fn ring_is_symmetric_with_zero_diagonal() {
        let matrix = ring_costs(6, 5.0);
        for (i, row) in matrix.iter().enumerate() {
            assert_eq!(row.len(), 7);
            assert_eq!(row[i], 0.0);
            for (j, value) in row.iter().enumerate() {
                assert!((value - matrix[j][i]).abs() < 1e-9);
            }
        }
    }

    #[rstest]
    fn quick_settings_shorten_the_budget() {
        assert!(quick_settings().time_budget < SearchSettings::default().time_budget);
    }
}
