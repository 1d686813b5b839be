//! Solve command implementation for the Haulage CLI.

use std::io::{Read, Write};
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use haulage_core::{
    Improvement, Instance, Planner, RoutingBackend, SearchSettings, SolveRequest, SolveResponse,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::input::{parse_json, read_input};
use crate::{
    ARG_BACKEND, ARG_IMPROVE, ARG_MAX_GENERATIONS, ARG_MAX_ROUTE_DISTANCE, ARG_REQUEST,
    ARG_TIME_LIMIT_SECS, CliError, report, write_json,
};

/// Optimisation backend selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum BackendChoice {
    /// Metaheuristic search with `vrp-core`.
    #[default]
    Vrp,
    /// Google OR-Tools routing.
    Ortools,
    /// Skip the backend and run the greedy constructor directly.
    None,
}

/// CLI arguments for the `solve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Solve a capacitated vehicle routing request. The request is \
                 read as JSON from the given path or from standard input, and \
                 the routes are written to standard output as JSON. When the \
                 optimisation backend is unavailable or finds no feasible \
                 solution the greedy constructor answers instead.",
    about = "Build vehicle routes for a JSON request"
)]
#[ortho_config(prefix = "HAULAGE")]
pub(crate) struct SolveArgs {
    /// Path to a JSON file containing a solve request; stdin when omitted.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Optimisation backend to try before the greedy fallback.
    #[arg(long = ARG_BACKEND, value_enum, value_name = "backend")]
    #[serde(default)]
    pub(crate) backend: Option<BackendChoice>,
    /// Wall-clock budget for the backend search, in seconds.
    #[arg(long = ARG_TIME_LIMIT_SECS, value_name = "secs")]
    #[serde(default)]
    pub(crate) time_limit_secs: Option<u64>,
    /// Longest distance a single route may cover.
    #[arg(long = ARG_MAX_ROUTE_DISTANCE, value_name = "distance")]
    #[serde(default)]
    pub(crate) max_route_distance: Option<f64>,
    /// Cap on backend search generations.
    #[arg(long = ARG_MAX_GENERATIONS, value_name = "count")]
    #[serde(default)]
    pub(crate) max_generations: Option<usize>,
    /// Improve greedy routes with 2-opt and cheapest-insertion repair.
    #[arg(
        long = ARG_IMPROVE,
        value_name = "bool",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    #[serde(default)]
    pub(crate) improve: Option<bool>,
}

impl SolveArgs {
    pub(crate) fn into_config(self) -> Result<SolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        SolveConfig::try_from(merged)
    }
}

/// Resolved `solve` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SolveConfig {
    /// Path to the JSON request file; `None` reads stdin.
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Backend to try first.
    pub(crate) backend: BackendChoice,
    /// Settings shared by the backend and the fallback.
    pub(crate) settings: SearchSettings,
    /// Post-processing of greedy routes.
    pub(crate) improvement: Improvement,
}

impl TryFrom<SolveArgs> for SolveConfig {
    type Error = CliError;

    fn try_from(args: SolveArgs) -> Result<Self, Self::Error> {
        let defaults = SearchSettings::default();

        let time_budget = match args.time_limit_secs {
            Some(0) => {
                return Err(CliError::InvalidOption {
                    field: ARG_TIME_LIMIT_SECS,
                    reason: "the time limit must be at least one second".to_owned(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.time_budget,
        };

        let max_route_distance = args
            .max_route_distance
            .unwrap_or(defaults.max_route_distance);
        if !max_route_distance.is_finite() || max_route_distance < 0.0 {
            return Err(CliError::InvalidOption {
                field: ARG_MAX_ROUTE_DISTANCE,
                reason: format!("{max_route_distance} is not a non-negative finite distance"),
            });
        }

        if args.max_generations == Some(0) {
            return Err(CliError::InvalidOption {
                field: ARG_MAX_GENERATIONS,
                reason: "at least one generation is required".to_owned(),
            });
        }

        let improvement = if args.improve.unwrap_or(false) {
            Improvement::LocalSearch
        } else {
            Improvement::None
        };

        Ok(Self {
            request_path: args.request_path,
            backend: args.backend.unwrap_or_default(),
            settings: SearchSettings {
                time_budget,
                max_route_distance,
                max_generations: args.max_generations,
                ..defaults
            },
            improvement,
        })
    }
}

/// Builds the routing backend for the current solve invocation.
pub(super) trait SolveBackendBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Option<Box<dyn RoutingBackend>>, CliError>;
}

pub(super) struct DefaultSolveBackendBuilder;

impl SolveBackendBuilder for DefaultSolveBackendBuilder {
    fn build(&self, config: &SolveConfig) -> Result<Option<Box<dyn RoutingBackend>>, CliError> {
        Ok(match config.backend {
            BackendChoice::Vrp => Some(vrp_backend()),
            BackendChoice::Ortools => Some(ortools_backend()),
            BackendChoice::None => None,
        })
    }
}

#[cfg(feature = "solver-vrp")]
fn vrp_backend() -> Box<dyn RoutingBackend> {
    Box::new(haulage_solver_vrp::VrpBackend::new())
}

#[cfg(not(feature = "solver-vrp"))]
fn vrp_backend() -> Box<dyn RoutingBackend> {
    Box::new(unlinked::UnlinkedBackend::new("vrp-core", "solver-vrp"))
}

#[cfg(feature = "solver-ortools")]
fn ortools_backend() -> Box<dyn RoutingBackend> {
    Box::new(haulage_solver_ortools::OrtoolsBackend::new())
}

#[cfg(not(feature = "solver-ortools"))]
fn ortools_backend() -> Box<dyn RoutingBackend> {
    Box::new(unlinked::UnlinkedBackend::new("ortools", "solver-ortools"))
}

#[cfg(not(all(feature = "solver-vrp", feature = "solver-ortools")))]
mod unlinked {
    use haulage_core::{
        BackendUnavailable, Instance, RoutingBackend, SearchSettings, Solution,
    };

    /// Stands in for a backend whose crate was left out of the build.
    pub(super) struct UnlinkedBackend {
        name: &'static str,
        feature: &'static str,
    }

    impl UnlinkedBackend {
        pub(super) const fn new(name: &'static str, feature: &'static str) -> Self {
            Self { name, feature }
        }
    }

    impl RoutingBackend for UnlinkedBackend {
        fn name(&self) -> &'static str {
            self.name
        }

        fn solve(
            &self,
            _instance: &Instance,
            _settings: &SearchSettings,
        ) -> Result<Solution, BackendUnavailable> {
            Err(BackendUnavailable::Missing {
                reason: format!("built without the `{}` feature", self.feature),
            })
        }
    }
}

pub(super) fn run_solve(args: SolveArgs) -> Result<(), CliError> {
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run_solve_with(args, &DefaultSolveBackendBuilder, &mut stdin, &mut stdout)
}

pub(super) fn run_solve_with(
    args: SolveArgs,
    builder: &dyn SolveBackendBuilder,
    input: &mut dyn Read,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let text = read_input(config.request_path.as_deref(), ARG_REQUEST, input)
        .map_err(|err| report(writer, err))?;
    let instance = decode_instance(&text).map_err(|err| report(writer, err))?;

    let mut planner = Planner::new(config.settings.clone()).with_improvement(config.improvement);
    if let Some(backend) = builder.build(&config)? {
        planner = planner.with_backend(backend);
    }
    let solution = planner.plan(&instance)?;
    log::info!(
        "{} solver served {} customers over {} routes, total distance {}",
        solution.solver.as_str(),
        solution.num_served(),
        solution.routes.len(),
        solution.total_distance
    );
    write_json(writer, &SolveResponse::from(&solution))
}

/// Decodes and validates a JSON-encoded [`SolveRequest`].
pub(super) fn decode_instance(text: &str) -> Result<Instance, CliError> {
    let request: SolveRequest = parse_json(text)?;
    Ok(request.into_instance()?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<SolveConfig, CliError> {
    let merged = SolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    SolveConfig::try_from(merged)
}
