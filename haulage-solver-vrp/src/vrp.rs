//! `vrp-core` modelling helpers for `VrpBackend`.
//!
//! This module converts a [`BackendModel`] into a `vrp-core` problem, runs the
//! solver, and reads the resulting tours back as node sequences per vehicle.

use std::sync::Arc;

use haulage_core::{BackendModel, BackendUnavailable};
use vrp_core::models::common::{Location, Profile};
use vrp_core::models::problem::TravelTime;
use vrp_core::models::solution::Route as VrpRoute;
use vrp_core::prelude::*;

/// Tours returned by `vrp-core`, indexed by vehicle.
#[derive(Debug, Default)]
pub(super) struct VrpOutcome {
    /// Node sequence per vehicle; `None` for vehicles left at the depot.
    pub(super) tours: Vec<Option<Vec<usize>>>,
    /// Number of customers the search could not assign.
    pub(super) unassigned: usize,
}

fn define_goal(
    transport: Arc<dyn TransportCost>,
    capacitated: bool,
) -> GenericResult<GoalContext> {
    let minimize_unassigned = MinimizeUnassignedBuilder::new("min-unassigned").build()?;
    let transport_feature = TransportFeatureBuilder::new("min-distance")
        .set_transport_cost(transport)
        .set_time_constrained(true)
        .build_minimize_distance()?;

    let mut features = vec![minimize_unassigned, transport_feature];
    if capacitated {
        features.push(CapacityFeatureBuilder::<SingleDimLoad>::new("capacity").build()?);
    }

    GoalContextBuilder::with_features(features.as_slice())?.build()
}

fn saturating_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

#[expect(
    clippy::cast_precision_loss,
    reason = "vrp-core shift times are floating point"
)]
fn shift_end(model: &BackendModel, vehicle: usize) -> f64 {
    model.distance.limit(vehicle).unwrap_or(i64::MAX) as f64
}

fn define_problem(
    model: &BackendModel,
    transport: Arc<dyn TransportCost>,
    goal: GoalContext,
) -> GenericResult<Problem> {
    let jobs = model
        .demands
        .iter()
        .enumerate()
        .filter(|&(node, _)| node != model.depot)
        .map(|(node, &demand)| {
            SingleBuilder::default()
                .id(format!("node{node}").as_str())
                .demand(Demand::delivery(saturating_i32(demand)))
                .location(node)?
                .build_as_job()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let vehicles = (0..model.num_vehicles)
        .map(|vehicle| {
            let capacity = model
                .capacity
                .as_ref()
                .and_then(|dimension| dimension.limit(vehicle))
                .map_or(i32::MAX, saturating_i32);
            VehicleBuilder::default()
                .id(format!("vehicle{vehicle}").as_str())
                .add_detail(
                    VehicleDetailBuilder::default()
                        .set_start_location(model.depot)
                        .set_start_time(0.0)
                        .set_end_location(model.depot)
                        .set_end_time(shift_end(model, vehicle))
                        .build()?,
                )
                .capacity(SingleDimLoad::new(capacity))
                .build()
        })
        .collect::<Result<Vec<_>, _>>()?;

    ProblemBuilder::default()
        .add_jobs(jobs.into_iter())
        .add_vehicles(vehicles.into_iter())
        .with_goal(goal)
        .with_transport_cost(transport)
        .build()
}

/// Scaled arc costs served to `vrp-core` as both distance and duration.
struct ScaledTransportCost {
    costs: Vec<Vec<f64>>,
}

impl ScaledTransportCost {
    #[expect(
        clippy::cast_precision_loss,
        reason = "vrp-core costs are floating point"
    )]
    fn new(model: &BackendModel) -> Self {
        let costs = model
            .costs
            .iter()
            .map(|row| row.iter().map(|&cost| cost as f64).collect())
            .collect();
        Self { costs }
    }

    fn cost(&self, from: Location, to: Location) -> f64 {
        let result = self.costs.get(from).and_then(|row| row.get(to)).copied();
        debug_assert!(result.is_some(), "Matrix lookup failed: from={from}, to={to}");
        result.unwrap_or(f64::MAX)
    }
}

impl TransportCost for ScaledTransportCost {
    // The route and departure parameters are part of the shared `vrp-core`
    // API; a static matrix does not depend on them.
    fn distance(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> Cost {
        self.cost(from, to)
    }

    fn duration(
        &self,
        _route: &VrpRoute,
        from: Location,
        to: Location,
        _departure: TravelTime,
    ) -> f64 {
        self.cost(from, to)
    }

    fn distance_approx(&self, profile: &Profile, from: usize, to: usize) -> f64 {
        self.duration_approx(profile, from, to)
    }

    fn duration_approx(&self, _profile: &Profile, from: usize, to: usize) -> f64 {
        self.cost(from, to)
    }
}

/// Context for running a `vrp-core` solve.
pub(super) struct VrpSolveContext {
    max_generations: usize,
}

impl VrpSolveContext {
    pub(super) const fn new(max_generations: usize) -> Self {
        Self { max_generations }
    }

    /// Run the metaheuristic over `model`.
    pub(super) fn solve(&self, model: &BackendModel) -> Result<VrpOutcome, BackendUnavailable> {
        let transport: Arc<dyn TransportCost> = Arc::new(ScaledTransportCost::new(model));
        let goal = define_goal(transport.clone(), model.capacity.is_some()).map_err(failed)?;
        let problem = Arc::new(define_problem(model, transport, goal).map_err(failed)?);

        let max_time = usize::try_from(model.time_limit.as_secs())
            .unwrap_or(usize::MAX)
            .max(1);
        let vrp_config = VrpConfigBuilder::new(problem.clone())
            .prebuild()
            .map_err(failed)?
            .with_max_time(Some(max_time))
            .with_max_generations(Some(self.max_generations))
            .build()
            .map_err(failed)?;

        let solution = vrp_core::solver::Solver::new(problem.clone(), vrp_config)
            .solve()
            .map_err(failed)?;

        let mut tours = vec![None; model.num_vehicles];
        for route in &solution.routes {
            let Some(vehicle) = problem
                .fleet
                .vehicles
                .iter()
                .position(|candidate| Arc::ptr_eq(candidate, &route.actor.vehicle))
            else {
                log::warn!("vrp-core returned a route for an unknown vehicle");
                continue;
            };
            let nodes: Vec<usize> = route
                .tour
                .all_activities()
                .map(|activity| activity.place.location)
                .collect();
            if let Some(slot) = tours.get_mut(vehicle) {
                *slot = Some(nodes);
            }
        }

        Ok(VrpOutcome {
            tours,
            unassigned: solution.unassigned.len(),
        })
    }
}

fn failed(err: impl std::fmt::Display) -> BackendUnavailable {
    BackendUnavailable::Failed {
        reason: err.to_string(),
    }
}
