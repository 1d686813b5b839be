//! Test helpers for writing request fixtures and reading command output.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use tempfile::TempDir;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write fixture");
}

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Four nodes one unit apart, one vehicle with capacity 3.
pub(super) fn capacity_request() -> Value {
    json!({
        "distance_matrix": [
            [0, 1, 1, 1],
            [1, 0, 1, 1],
            [1, 1, 0, 1],
            [1, 1, 1, 0]
        ],
        "demands": [0, 1, 1, 1],
        "vehicle_capacities": [3],
        "num_vehicles": 1,
        "depot": 0
    })
}

pub(super) fn output_json(buffer: &[u8]) -> Value {
    serde_json::from_slice(buffer).expect("stdout should hold one JSON document")
}
