//! Focused unit tests covering solve configuration, input and output.

use super::helpers::{capacity_request, output_json, workspace, write_utf8};
use super::*;
use crate::solve::{
    BackendChoice, SolveBackendBuilder, SolveConfig, config_from_layers_for_test, decode_instance,
    run_solve_with,
};
use haulage_core::test_support::ScriptedBackend;
use haulage_core::{
    Improvement, InstanceError, RoutingBackend, SearchSettings, planner::NOT_CONFIGURED_NOTE,
};
use rstest::rstest;
use std::io::Cursor;
use std::time::Duration;

struct NoBackend;

impl SolveBackendBuilder for NoBackend {
    fn build(&self, _config: &SolveConfig) -> Result<Option<Box<dyn RoutingBackend>>, CliError> {
        Ok(None)
    }
}

struct Scripted(Vec<Vec<usize>>);

impl SolveBackendBuilder for Scripted {
    fn build(&self, _config: &SolveConfig) -> Result<Option<Box<dyn RoutingBackend>>, CliError> {
        Ok(Some(Box::new(ScriptedBackend::routes(self.0.clone()))))
    }
}

#[rstest]
fn defaults_follow_search_settings() {
    let config = SolveConfig::try_from(SolveArgs::default()).expect("config");
    assert_eq!(config.request_path, None);
    assert_eq!(config.backend, BackendChoice::Vrp);
    assert_eq!(config.settings, SearchSettings::default());
    assert_eq!(config.improvement, Improvement::None);
}

#[rstest]
fn options_override_settings() {
    let args = SolveArgs {
        backend: Some(BackendChoice::None),
        time_limit_secs: Some(5),
        max_route_distance: Some(42.5),
        max_generations: Some(10),
        improve: Some(true),
        ..SolveArgs::default()
    };
    let config = SolveConfig::try_from(args).expect("config");
    assert_eq!(config.backend, BackendChoice::None);
    assert_eq!(config.settings.time_budget, Duration::from_secs(5));
    assert_eq!(config.settings.max_route_distance, 42.5);
    assert_eq!(config.settings.max_generations, Some(10));
    assert_eq!(config.improvement, Improvement::LocalSearch);
}

#[rstest]
#[case::zero_time(SolveArgs { time_limit_secs: Some(0), ..SolveArgs::default() }, ARG_TIME_LIMIT_SECS)]
#[case::negative_distance(SolveArgs { max_route_distance: Some(-1.0), ..SolveArgs::default() }, ARG_MAX_ROUTE_DISTANCE)]
#[case::nan_distance(SolveArgs { max_route_distance: Some(f64::NAN), ..SolveArgs::default() }, ARG_MAX_ROUTE_DISTANCE)]
#[case::zero_generations(SolveArgs { max_generations: Some(0), ..SolveArgs::default() }, ARG_MAX_GENERATIONS)]
fn out_of_range_options_are_rejected(#[case] args: SolveArgs, #[case] expected: &'static str) {
    let err = SolveConfig::try_from(args).expect_err("option should be rejected");
    match err {
        CliError::InvalidOption { field, .. } => assert_eq!(field, expected),
        other => panic!("expected InvalidOption, found {other:?}"),
    }
}

#[rstest]
fn decode_instance_reports_invalid_json() {
    let err = decode_instance("{ not valid json").expect_err("invalid json");
    assert!(matches!(err, CliError::ParseInput(_)));
    assert!(err.to_string().starts_with("invalid JSON input: "));
}

#[rstest]
fn decode_instance_reports_missing_matrix() {
    let err = decode_instance("{}").expect_err("matrix is required");
    match err {
        CliError::InvalidSolveRequest(source) => assert_eq!(source, InstanceError::EmptyMatrix),
        other => panic!("expected InvalidSolveRequest, found {other:?}"),
    }
}

#[rstest]
fn solve_reads_stdin_when_no_path_is_given() {
    let mut stdin = Cursor::new(capacity_request().to_string());
    let mut stdout = Vec::new();
    let args = SolveArgs {
        backend: Some(BackendChoice::None),
        ..SolveArgs::default()
    };
    run_solve_with(args, &NoBackend, &mut stdin, &mut stdout).expect("solve succeeds");

    let body = output_json(&stdout);
    assert_eq!(body["solver"], "greedy");
    assert_eq!(body["status"], "heuristic");
    assert_eq!(body["routes"][0]["route"], serde_json::json!([0, 1, 2, 3, 0]));
    assert_eq!(body["unvisited"], serde_json::json!([]));
    assert_eq!(body["total_load"], 3);
    assert_eq!(body["note"], NOT_CONFIGURED_NOTE);
}

#[rstest]
fn unreadable_stdin_is_reported_as_json() {
    let mut stdin = Cursor::new(vec![0xff, 0xfe, b'{']);
    let mut stdout = Vec::new();
    let err = run_solve_with(SolveArgs::default(), &NoBackend, &mut stdin, &mut stdout)
        .expect_err("stdin is not UTF-8");
    assert!(matches!(err, CliError::ReadInput { .. }));
    let body = output_json(&stdout);
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|message| message.starts_with("failed to read input from stdin"))
    );
}

#[rstest]
fn solve_reads_the_request_file() {
    let (_tmp, root) = workspace();
    let request_path = root.join("request.json");
    write_utf8(&request_path, capacity_request().to_string().as_bytes());
    let args = SolveArgs {
        request_path: Some(request_path),
        ..SolveArgs::default()
    };
    let mut stdout = Vec::new();
    run_solve_with(
        args,
        &Scripted(vec![vec![0, 3, 2, 1, 0]]),
        &mut std::io::empty(),
        &mut stdout,
    )
    .expect("solve succeeds");

    let body = output_json(&stdout);
    assert_eq!(body["solver"], "optimization-backend");
    assert_eq!(body["status"], "optimal");
    assert_eq!(body["routes"][0]["route"], serde_json::json!([0, 3, 2, 1, 0]));
    assert!(body.get("unvisited").is_none());
    assert!(body.get("note").is_none());
}

#[rstest]
fn solve_reports_missing_request_files() {
    let (_tmp, root) = workspace();
    let request_path = root.join("absent.json");
    let args = SolveArgs {
        request_path: Some(request_path.clone()),
        ..SolveArgs::default()
    };
    let err = run_solve_with(args, &NoBackend, &mut std::io::empty(), &mut Vec::new())
        .expect_err("missing file");
    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_REQUEST);
            assert_eq!(path, request_path);
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
}

#[rstest]
fn solve_rejects_directories() {
    let (_tmp, root) = workspace();
    let request_path = root.join("request.json");
    std::fs::create_dir(request_path.as_std_path()).expect("request directory");
    let args = SolveArgs {
        request_path: Some(request_path),
        ..SolveArgs::default()
    };
    let err = run_solve_with(args, &NoBackend, &mut std::io::empty(), &mut Vec::new())
        .expect_err("directory is not a request");
    assert!(matches!(err, CliError::SourcePathNotFile { .. }));
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "time_limit_secs": "soon" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    use ortho_config::MergeComposer;
    use serde_json::json;

    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "backend": "ortools",
            "time_limit_secs": 60,
            "max_route_distance": 100.0,
        }),
        None,
    );
    composer.push_environment(json!({
        "backend": "none",
        "time_limit_secs": 10,
    }));
    composer.push_cli(json!({
        "time_limit_secs": 3,
    }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert_eq!(config.backend, BackendChoice::None);
    assert_eq!(config.settings.time_budget, Duration::from_secs(3));
    assert_eq!(config.settings.max_route_distance, 100.0);
}
