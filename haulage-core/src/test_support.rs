//! Matrices and backends shared by unit and behaviour tests.

use std::sync::Mutex;

use crate::{
    BackendUnavailable, Instance, Route, RoutingBackend, SearchSettings, Solution, SolveStatus,
    SolverKind,
};

/// Matrix where every distinct pair of nodes is one unit apart.
#[must_use]
pub fn unit_costs(nodes: usize) -> Vec<Vec<f64>> {
    (0..nodes)
        .map(|i| (0..nodes).map(|j| if i == j { 0.0 } else { 1.0 }).collect())
        .collect()
}

/// Matrix of absolute differences between points on a line.
#[must_use]
pub fn line_costs(positions: &[f64]) -> Vec<Vec<f64>> {
    positions
        .iter()
        .map(|a| positions.iter().map(|b| (a - b).abs()).collect())
        .collect()
}

#[derive(Debug, Clone)]
enum Script {
    Routes(Vec<Vec<usize>>),
    Fail(BackendUnavailable),
}

/// Backend that replays fixed routes or a fixed failure.
///
/// Vehicles without a scripted route receive a depot-only route. Every call
/// is counted so tests can assert whether the backend was consulted.
#[derive(Debug)]
pub struct ScriptedBackend {
    script: Script,
    calls: Mutex<usize>,
}

impl ScriptedBackend {
    /// Return `routes` in vehicle order.
    #[must_use]
    pub fn routes(routes: Vec<Vec<usize>>) -> Self {
        Self {
            script: Script::Routes(routes),
            calls: Mutex::new(0),
        }
    }

    /// Always fail with `failure`.
    #[must_use]
    pub fn failing(failure: BackendUnavailable) -> Self {
        Self {
            script: Script::Fail(failure),
            calls: Mutex::new(0),
        }
    }

    /// Number of completed `solve` calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.lock().map_or(0, |calls| *calls)
    }
}

impl RoutingBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve(
        &self,
        instance: &Instance,
        _settings: &SearchSettings,
    ) -> Result<Solution, BackendUnavailable> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        let scripted = match &self.script {
            Script::Routes(routes) => routes,
            Script::Fail(failure) => return Err(failure.clone()),
        };

        let failed = |err: crate::RouteError| BackendUnavailable::Failed {
            reason: err.to_string(),
        };
        let routes = (0..instance.num_vehicles())
            .map(|vehicle| match scripted.get(vehicle) {
                Some(nodes) => Route::evaluated(instance, vehicle, nodes.clone()),
                None => Route::depot_only(instance, vehicle),
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(failed)?;
        Ok(Solution::from_routes(
            routes,
            Vec::new(),
            SolverKind::OptimizationBackend,
            SolveStatus::Optimal,
        ))
    }
}
