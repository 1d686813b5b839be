//! JSON request and response shapes.
//!
//! Field names follow the external contract. Optional request fields take
//! the documented defaults, and `unvisited` and `note` are omitted from
//! responses that do not carry them.

use serde::{Deserialize, Serialize};

use crate::instance::DEFAULT_VEHICLE_CAPACITY;
use crate::{Instance, InstanceBuilder, InstanceError, Route, Solution, SolverKind};

fn default_capacities() -> Vec<u32> {
    vec![DEFAULT_VEHICLE_CAPACITY]
}

const fn default_vehicles() -> usize {
    1
}

/// A routing request as submitted by callers.
///
/// # Examples
///
/// ```
/// use haulage_core::SolveRequest;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let request: SolveRequest =
///     serde_json::from_str(r#"{"distance_matrix": [[0, 3], [3, 0]], "demands": [0, 2]}"#)?;
/// let instance = request.into_instance()?;
/// assert_eq!(instance.num_vehicles(), 1);
/// assert_eq!(instance.capacity(0), 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// Square matrix of non-negative distances.
    #[serde(default)]
    pub distance_matrix: Vec<Vec<f64>>,
    /// Per-node demand; absent means every demand is zero.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demands: Option<Vec<u32>>,
    /// Per-vehicle capacity.
    #[serde(default = "default_capacities")]
    pub vehicle_capacities: Vec<u32>,
    /// Fleet size.
    #[serde(default = "default_vehicles")]
    pub num_vehicles: usize,
    /// Depot node index.
    #[serde(default)]
    pub depot: usize,
}

impl Default for SolveRequest {
    fn default() -> Self {
        Self {
            distance_matrix: Vec::new(),
            demands: None,
            vehicle_capacities: default_capacities(),
            num_vehicles: default_vehicles(),
            depot: 0,
        }
    }
}

impl SolveRequest {
    /// Validate the request into an [`Instance`].
    ///
    /// # Errors
    ///
    /// Returns [`InstanceError`] when the request describes no valid
    /// instance.
    pub fn into_instance(self) -> Result<Instance, InstanceError> {
        let mut builder = InstanceBuilder::new(self.distance_matrix)
            .vehicle_capacities(self.vehicle_capacities)
            .num_vehicles(self.num_vehicles)
            .depot(self.depot);
        if let Some(demands) = self.demands {
            builder = builder.demands(demands);
        }
        builder.build()
    }
}

impl TryFrom<SolveRequest> for Instance {
    type Error = InstanceError;

    fn try_from(request: SolveRequest) -> Result<Self, Self::Error> {
        request.into_instance()
    }
}

/// One route in a [`SolveResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Vehicle index.
    pub vehicle: usize,
    /// Node sequence, depot first and last.
    pub route: Vec<usize>,
    /// Route distance in matrix units.
    pub distance: f64,
    /// Demand served.
    pub load: u64,
}

impl From<&Route> for RouteResponse {
    fn from(route: &Route) -> Self {
        Self {
            vehicle: route.vehicle,
            route: route.nodes.clone(),
            distance: route.distance,
            load: route.load,
        }
    }
}

/// A successful solve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    /// One entry per vehicle.
    pub routes: Vec<RouteResponse>,
    /// Sum of route distances.
    pub total_distance: f64,
    /// Sum of route loads.
    pub total_load: u64,
    /// `optimization-backend` or `greedy`.
    pub solver: String,
    /// `optimal` or `heuristic`.
    pub status: String,
    /// Customers left unserved; greedy results only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unvisited: Option<Vec<usize>>,
    /// Fallback explanation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl From<&Solution> for SolveResponse {
    fn from(solution: &Solution) -> Self {
        let unvisited =
            (solution.solver == SolverKind::Greedy).then(|| solution.unvisited.clone());
        Self {
            routes: solution.routes.iter().map(RouteResponse::from).collect(),
            total_distance: solution.total_distance,
            total_load: solution.total_load,
            solver: solution.solver.as_str().to_owned(),
            status: solution.status.as_str().to_owned(),
            unvisited,
            note: solution.note.clone(),
        }
    }
}

/// Body emitted when a request cannot be solved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason.
    pub error: String,
}

impl ErrorResponse {
    /// Wrap any displayable error.
    #[must_use]
    pub fn new(error: impl std::fmt::Display) -> Self {
        Self {
            error: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GreedyConstructor, SolveStatus};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn request_defaults_apply() {
        let request: SolveRequest =
            serde_json::from_value(json!({"distance_matrix": [[0.0]]})).expect("request");
        assert_eq!(request.demands, None);
        assert_eq!(request.vehicle_capacities, vec![100]);
        assert_eq!(request.num_vehicles, 1);
        assert_eq!(request.depot, 0);
    }

    #[rstest]
    fn missing_matrix_is_rejected_on_validation() {
        let request: SolveRequest = serde_json::from_value(json!({})).expect("request");
        let err = request.into_instance().expect_err("matrix is required");
        assert_eq!(err, InstanceError::EmptyMatrix);
        assert_eq!(ErrorResponse::new(err).error, "distance matrix is required");
    }

    #[rstest]
    fn absent_demands_mean_zero_load() {
        let request: SolveRequest = serde_json::from_value(json!({
            "distance_matrix": [[0, 1], [1, 0]]
        }))
        .expect("request");
        let instance = Instance::try_from(request).expect("instance");
        assert_eq!(instance.demand(1), 0);
    }

    #[rstest]
    fn greedy_response_lists_unvisited() {
        let request: SolveRequest = serde_json::from_value(json!({
            "distance_matrix": [[0, 1, 1], [1, 0, 1], [1, 1, 0]],
            "demands": [0, 1, 1],
            "vehicle_capacities": [1]
        }))
        .expect("request");
        let instance = request.into_instance().expect("instance");
        let solution = GreedyConstructor::default()
            .construct(&instance)
            .expect("construction")
            .with_note("fallback");
        let body = serde_json::to_value(SolveResponse::from(&solution)).expect("serialise");
        assert_eq!(body["solver"], "greedy");
        assert_eq!(body["status"], "heuristic");
        assert_eq!(body["unvisited"], json!([2]));
        assert_eq!(body["note"], "fallback");
        assert_eq!(body["total_load"], 1);
        assert_eq!(body["routes"][0]["route"], json!([0, 1, 0]));
    }

    #[rstest]
    fn backend_response_omits_greedy_fields() {
        let instance = InstanceBuilder::new(vec![vec![0.0, 2.0], vec![2.0, 0.0]])
            .demands(vec![0, 4])
            .build()
            .expect("instance");
        let route = Route::evaluated(&instance, 0, vec![0, 1, 0]).expect("route");
        let solution = Solution::from_routes(
            vec![route],
            Vec::new(),
            SolverKind::OptimizationBackend,
            SolveStatus::Optimal,
        );
        let body = serde_json::to_value(SolveResponse::from(&solution)).expect("serialise");
        let Value::Object(fields) = body else {
            panic!("response should be an object");
        };
        assert!(!fields.contains_key("unvisited"));
        assert!(!fields.contains_key("note"));
        assert_eq!(fields["solver"], "optimization-backend");
        assert_eq!(fields["total_distance"], 4.0);
    }
}
