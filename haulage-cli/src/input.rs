//! Reading JSON input from a file or standard input.

use std::io::{self, Read};

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use serde::de::DeserializeOwned;

use crate::CliError;

/// Origin reported for input read from standard input.
pub(crate) const STDIN_ORIGIN: &str = "stdin";

/// Read the whole input, from `path` when given and from `stdin` otherwise.
pub(crate) fn read_input(
    path: Option<&Utf8Path>,
    field: &'static str,
    stdin: &mut dyn Read,
) -> Result<String, CliError> {
    let mut text = String::new();
    if let Some(file_path) = path {
        require_file(file_path, field)?;
        let mut file = fs_utf8::File::open_ambient(file_path, ambient_authority())
            .map_err(|source| read_error(file_path.as_str(), source))?;
        file.read_to_string(&mut text)
            .map_err(|source| read_error(file_path.as_str(), source))?;
    } else {
        stdin
            .read_to_string(&mut text)
            .map_err(|source| read_error(STDIN_ORIGIN, source))?;
    }
    Ok(text)
}

/// Decode `text` as JSON.
pub(crate) fn parse_json<T: DeserializeOwned>(text: &str) -> Result<T, CliError> {
    serde_json::from_str(text).map_err(CliError::ParseInput)
}

fn read_error(origin: &str, source: io::Error) -> CliError {
    CliError::ReadInput {
        origin: origin.to_owned(),
        source,
    }
}

fn require_file(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Whether `path` names a regular file, resolved through its parent directory.
fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(dir) if !dir.as_str().is_empty() => dir,
        _ => Utf8Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path has no file name"))?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|meta| meta.is_file())
}
