//! Read-only view of a capacitated vehicle routing instance.
//!
//! An [`Instance`] bundles the distance matrix, per-node demands, vehicle
//! capacities, depot and fleet size. Short demand and capacity lists are
//! padded rather than rejected: missing demands default to `1` per node and
//! missing capacities reuse the last declared value.

use thiserror::Error;

/// Capacity assumed when a request does not declare any.
pub const DEFAULT_VEHICLE_CAPACITY: u32 = 100;

/// Demand assigned to nodes beyond the end of a declared demand list.
pub const PADDED_DEMAND: u32 = 1;

/// Largest fleet a request may declare.
pub const MAX_VEHICLES: usize = 10_000;

/// Errors returned by [`InstanceBuilder::build`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InstanceError {
    /// The distance matrix has no rows.
    #[error("distance matrix is required")]
    EmptyMatrix,
    /// A matrix row does not match the number of rows.
    #[error("distance matrix must be square: row {row} has {found} entries, expected {expected}")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Number of rows in the matrix.
        expected: usize,
        /// Number of entries found in the row.
        found: usize,
    },
    /// A matrix entry is below zero.
    #[error("distance from node {from} to node {to} is negative ({value})")]
    NegativeDistance {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
        /// Rejected value.
        value: f64,
    },
    /// A matrix entry is NaN or infinite.
    #[error("distance from node {from} to node {to} is not a finite number")]
    NonFiniteDistance {
        /// Origin node.
        from: usize,
        /// Destination node.
        to: usize,
    },
    /// The depot does not index a matrix row.
    #[error("depot {depot} is outside the {nodes} node instance")]
    DepotOutOfRange {
        /// Requested depot index.
        depot: usize,
        /// Number of nodes in the instance.
        nodes: usize,
    },
    /// The fleet is empty.
    #[error("at least one vehicle is required")]
    NoVehicles,
    /// The fleet exceeds [`MAX_VEHICLES`].
    #[error("fleet of {requested} vehicles exceeds the limit of {limit}")]
    TooManyVehicles {
        /// Declared fleet size.
        requested: usize,
        /// Largest accepted fleet.
        limit: usize,
    },
    /// No vehicle capacity was declared.
    #[error("at least one vehicle capacity is required")]
    NoCapacities,
}

/// Validated problem instance shared by every solver.
///
/// # Examples
///
/// ```
/// use haulage_core::InstanceBuilder;
///
/// # fn main() -> Result<(), haulage_core::InstanceError> {
/// let instance = InstanceBuilder::new(vec![
///     vec![0.0, 2.0, 3.0],
///     vec![2.0, 0.0, 1.0],
///     vec![3.0, 1.0, 0.0],
/// ])
/// .demands(vec![0, 4])
/// .vehicle_capacities(vec![10])
/// .num_vehicles(2)
/// .build()?;
///
/// assert_eq!(instance.demand(2), 1);
/// assert_eq!(instance.capacity(1), 10);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    distances: Vec<Vec<f64>>,
    demands: Vec<u32>,
    capacities: Vec<u32>,
    num_vehicles: usize,
    depot: usize,
}

impl Instance {
    /// Number of nodes, depot included.
    #[must_use]
    pub fn num_nodes(&self) -> usize {
        self.distances.len()
    }

    /// Number of vehicles in the fleet.
    #[must_use]
    pub const fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Index of the depot node.
    #[must_use]
    pub const fn depot(&self) -> usize {
        self.depot
    }

    /// Whether `node` indexes this instance.
    #[must_use]
    pub fn contains(&self, node: usize) -> bool {
        node < self.num_nodes()
    }

    /// Travel cost from `from` to `to`, or `None` for unknown nodes.
    #[must_use]
    pub fn checked_distance(&self, from: usize, to: usize) -> Option<f64> {
        self.distances.get(from).and_then(|row| row.get(to)).copied()
    }

    /// Travel cost from `from` to `to`.
    ///
    /// Unknown nodes yield an infinite cost so that they can never be chosen
    /// by a minimum search.
    #[must_use]
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.checked_distance(from, to).unwrap_or_else(|| {
            log::warn!("distance lookup from {from} to {to} is outside the instance");
            f64::INFINITY
        })
    }

    /// Demand of `node`; the depot always contributes zero.
    #[must_use]
    pub fn demand(&self, node: usize) -> u32 {
        if node == self.depot {
            return 0;
        }
        self.demands.get(node).copied().unwrap_or(PADDED_DEMAND)
    }

    /// Capacity of `vehicle`, reusing the last declared capacity for
    /// vehicles beyond the declared list.
    #[must_use]
    pub fn capacity(&self, vehicle: usize) -> u32 {
        self.capacities
            .get(vehicle)
            .or_else(|| self.capacities.last())
            .copied()
            .unwrap_or(DEFAULT_VEHICLE_CAPACITY)
    }

    /// Whether any node carries a positive demand.
    #[must_use]
    pub fn has_positive_demand(&self) -> bool {
        self.customers().any(|node| self.demand(node) > 0)
    }

    /// Sum of all customer demands.
    #[must_use]
    pub fn total_demand(&self) -> u64 {
        self.customers().map(|node| u64::from(self.demand(node))).sum()
    }

    /// Every non-depot node in index order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(move |&node| node != self.depot)
    }
}

/// Builder for [`Instance`] mirroring the optional fields of a request.
#[derive(Debug, Clone)]
pub struct InstanceBuilder {
    distances: Vec<Vec<f64>>,
    demands: Option<Vec<u32>>,
    capacities: Vec<u32>,
    num_vehicles: usize,
    depot: usize,
}

impl InstanceBuilder {
    /// Start from a distance matrix with one vehicle of default capacity
    /// based at node `0` and zero demand everywhere.
    #[must_use]
    pub fn new(distances: Vec<Vec<f64>>) -> Self {
        Self {
            distances,
            demands: None,
            capacities: vec![DEFAULT_VEHICLE_CAPACITY],
            num_vehicles: 1,
            depot: 0,
        }
    }

    /// Declare per-node demands. Nodes past the end of the list demand
    /// [`PADDED_DEMAND`].
    #[must_use]
    pub fn demands(mut self, demands: Vec<u32>) -> Self {
        self.demands = Some(demands);
        self
    }

    /// Declare per-vehicle capacities.
    #[must_use]
    pub fn vehicle_capacities(mut self, capacities: Vec<u32>) -> Self {
        self.capacities = capacities;
        self
    }

    /// Set the fleet size.
    #[must_use]
    pub const fn num_vehicles(mut self, num_vehicles: usize) -> Self {
        self.num_vehicles = num_vehicles;
        self
    }

    /// Set the depot node.
    #[must_use]
    pub const fn depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }

    /// Validate the inputs and produce an [`Instance`].
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError`] when the matrix is empty, not square, or has
    /// negative or non-finite entries, when the depot is out of range, when
    /// the fleet is empty or larger than [`MAX_VEHICLES`], or when the
    /// capacity list is empty.
    pub fn build(self) -> Result<Instance, InstanceError> {
        let nodes = self.distances.len();
        if nodes == 0 {
            return Err(InstanceError::EmptyMatrix);
        }
        validate_matrix(&self.distances)?;
        if self.depot >= nodes {
            return Err(InstanceError::DepotOutOfRange {
                depot: self.depot,
                nodes,
            });
        }
        if self.num_vehicles == 0 {
            return Err(InstanceError::NoVehicles);
        }
        if self.num_vehicles > MAX_VEHICLES {
            return Err(InstanceError::TooManyVehicles {
                requested: self.num_vehicles,
                limit: MAX_VEHICLES,
            });
        }
        if self.capacities.is_empty() {
            return Err(InstanceError::NoCapacities);
        }

        let demands = match self.demands {
            Some(mut declared) => {
                declared.resize(nodes, PADDED_DEMAND);
                declared
            }
            None => vec![0; nodes],
        };

        Ok(Instance {
            distances: self.distances,
            demands,
            capacities: self.capacities,
            num_vehicles: self.num_vehicles,
            depot: self.depot,
        })
    }
}

fn validate_matrix(distances: &[Vec<f64>]) -> Result<(), InstanceError> {
    let expected = distances.len();
    for (from, row) in distances.iter().enumerate() {
        if row.len() != expected {
            return Err(InstanceError::NotSquare {
                row: from,
                expected,
                found: row.len(),
            });
        }
        for (to, &value) in row.iter().enumerate() {
            if !value.is_finite() {
                return Err(InstanceError::NonFiniteDistance { from, to });
            }
            if value < 0.0 {
                return Err(InstanceError::NegativeDistance { from, to, value });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn square() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 1.0, 2.0, 3.0],
            vec![1.0, 0.0, 1.0, 2.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![3.0, 2.0, 1.0, 0.0],
        ]
    }

    #[rstest]
    fn empty_matrix_is_rejected() {
        let err = InstanceBuilder::new(Vec::new())
            .build()
            .expect_err("empty matrix");
        assert_eq!(err, InstanceError::EmptyMatrix);
        assert_eq!(err.to_string(), "distance matrix is required");
    }

    #[rstest]
    fn ragged_matrix_is_rejected() {
        let err = InstanceBuilder::new(vec![vec![0.0, 1.0], vec![1.0]])
            .build()
            .expect_err("ragged matrix");
        assert_eq!(
            err,
            InstanceError::NotSquare {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[rstest]
    fn negative_distance_is_rejected(mut square: Vec<Vec<f64>>) {
        square[2][1] = -0.5;
        let err = InstanceBuilder::new(square)
            .build()
            .expect_err("negative entry");
        assert!(matches!(
            err,
            InstanceError::NegativeDistance { from: 2, to: 1, .. }
        ));
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn non_finite_distance_is_rejected(mut square: Vec<Vec<f64>>, #[case] value: f64) {
        square[0][3] = value;
        let err = InstanceBuilder::new(square)
            .build()
            .expect_err("non-finite entry");
        assert_eq!(err, InstanceError::NonFiniteDistance { from: 0, to: 3 });
    }

    #[rstest]
    fn depot_must_be_in_range(square: Vec<Vec<f64>>) {
        let err = InstanceBuilder::new(square)
            .depot(4)
            .build()
            .expect_err("depot out of range");
        assert_eq!(err, InstanceError::DepotOutOfRange { depot: 4, nodes: 4 });
    }

    #[rstest]
    fn fleet_and_capacities_must_be_non_empty(square: Vec<Vec<f64>>) {
        let no_vehicles = InstanceBuilder::new(square.clone()).num_vehicles(0).build();
        assert_eq!(no_vehicles, Err(InstanceError::NoVehicles));
        let no_capacities = InstanceBuilder::new(square)
            .vehicle_capacities(Vec::new())
            .build();
        assert_eq!(no_capacities, Err(InstanceError::NoCapacities));
    }

    #[rstest]
    #[case(MAX_VEHICLES + 1)]
    #[case(usize::MAX)]
    fn oversized_fleet_is_rejected(#[case] vehicles: usize) {
        let err = InstanceBuilder::new(vec![vec![0.0]])
            .num_vehicles(vehicles)
            .build()
            .expect_err("fleet over the limit");
        assert_eq!(
            err,
            InstanceError::TooManyVehicles {
                requested: vehicles,
                limit: MAX_VEHICLES,
            }
        );
    }

    #[rstest]
    fn fleet_at_the_limit_is_accepted() {
        let instance = InstanceBuilder::new(vec![vec![0.0]])
            .num_vehicles(MAX_VEHICLES)
            .build()
            .expect("fleet at the limit");
        assert_eq!(instance.num_vehicles(), MAX_VEHICLES);
    }

    #[rstest]
    fn absent_demands_default_to_zero(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square).build().expect("valid instance");
        assert!(instance.customers().all(|node| instance.demand(node) == 0));
        assert!(!instance.has_positive_demand());
    }

    #[rstest]
    fn short_demands_are_padded_with_one(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square)
            .demands(vec![0, 5])
            .build()
            .expect("valid instance");
        assert_eq!(instance.demand(1), 5);
        assert_eq!(instance.demand(2), PADDED_DEMAND);
        assert_eq!(instance.demand(3), PADDED_DEMAND);
        assert_eq!(instance.total_demand(), 7);
    }

    #[rstest]
    fn depot_demand_is_ignored(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square)
            .demands(vec![9, 1, 1, 1])
            .depot(0)
            .build()
            .expect("valid instance");
        assert_eq!(instance.demand(0), 0);
        assert_eq!(instance.total_demand(), 3);
    }

    #[rstest]
    fn last_capacity_is_reused(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square)
            .vehicle_capacities(vec![4, 7])
            .num_vehicles(4)
            .build()
            .expect("valid instance");
        assert_eq!(instance.capacity(0), 4);
        assert_eq!(instance.capacity(1), 7);
        assert_eq!(instance.capacity(3), 7);
    }

    #[rstest]
    fn customers_skip_the_depot(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square)
            .depot(2)
            .build()
            .expect("valid instance");
        assert_eq!(instance.customers().collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[rstest]
    fn unknown_nodes_have_infinite_distance(square: Vec<Vec<f64>>) {
        let instance = InstanceBuilder::new(square).build().expect("valid instance");
        assert_eq!(instance.checked_distance(0, 9), None);
        assert!(instance.distance(0, 9).is_infinite());
    }
}
