use crate::utils::column_ranges::{
    ColumnError, check_ranges_within, parse_index_list, parse_ranges,
};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COLUMNS_MAP_HEADER: &str = "#ColumnsMap";

/// What to do when an upstream tool left no output file behind.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingSourcePolicy {
    /// A missing file means there was nothing to trim or mask
    #[default]
    Empty,
    /// A missing file is an error
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    RetainedColumns,
    MaskedColumns,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::RetainedColumns => write!(f, "trimAl column map"),
            SourceKind::MaskedColumns => write!(f, "UPP masked columns"),
        }
    }
}

#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("The {kind} file {path:?} does not exist")]
    MissingSource { kind: SourceKind, path: PathBuf },

    #[error("Could not read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid column list in {path:?}")]
    Columns {
        path: PathBuf,
        #[source]
        source: ColumnError,
    },
}

pub fn retained_columns_path(trimal_dir: &Path, base_filename: &str) -> PathBuf {
    trimal_dir.join(format!("{}_alignment.sites", base_filename))
}

pub fn masked_columns_path(masked_dir: &Path, base_filename: &str) -> PathBuf {
    masked_dir.join(format!("{}_insertion_columns.txt", base_filename))
}

/// Reads a file, or returns `None` if it does not exist and the policy allows
/// it. Any other failure to read is an error regardless of the policy.
fn read_source(
    path: &Path,
    kind: SourceKind,
    policy: MissingSourcePolicy,
) -> Result<Option<String>, UpstreamError> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(error) if error.kind() == ErrorKind::NotFound => match policy {
            MissingSourcePolicy::Empty => {
                log::warn!("No {} found at {:?}, treating it as empty", kind, path);
                Ok(None)
            }
            MissingSourcePolicy::Error => Err(UpstreamError::MissingSource {
                kind,
                path: path.to_path_buf(),
            }),
        },
        Err(source) => Err(UpstreamError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Strips the `#ColumnsMap` header from a trimAl column map and parses the
/// retained column indices that follow it.
pub fn parse_columns_map(text: &str) -> Result<Vec<usize>, ColumnError> {
    let body = text.trim_end();
    let body = match body.strip_prefix(COLUMNS_MAP_HEADER) {
        Some(rest) => rest.trim_start(),
        None => body,
    };
    parse_index_list(body)
}

/// Columns kept by trimAl, read from the `-colnumbering` output.
pub fn read_retained_columns(
    path: &Path,
    policy: MissingSourcePolicy,
) -> Result<Option<Vec<usize>>, UpstreamError> {
    let Some(text) = read_source(path, SourceKind::RetainedColumns, policy)? else {
        return Ok(None);
    };

    parse_columns_map(&text)
        .map(Some)
        .map_err(|source| UpstreamError::Columns {
            path: path.to_path_buf(),
            source,
        })
}

/// The already range-encoded list of columns masked by UPP. The text is
/// returned as it was written, but every token is checked first and must lie
/// inside an alignment of `total_columns` columns.
pub fn read_masked_columns(
    path: &Path,
    policy: MissingSourcePolicy,
    total_columns: usize,
) -> Result<String, UpstreamError> {
    let Some(text) = read_source(path, SourceKind::MaskedColumns, policy)? else {
        return Ok(String::new());
    };
    let text = text.trim_end().to_string();

    parse_ranges(&text)
        .and_then(|ranges| check_ranges_within(&ranges, total_columns))
        .map_err(|source| UpstreamError::Columns {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(text)
}
