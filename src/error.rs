// ⚠️ Error Taxonomy - typed failures for dataset loading
// A failed load is reported to the page that asked for it; it never takes
// the process (or any other page) down with it.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning a file on disk into an in-memory table.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path does not resolve to a file.
    #[error("dataset file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Malformed delimiter, quoting or column count.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row's width disagrees with explicitly supplied column names.
    #[error("{}: line {line} has {found} fields, expected {expected}", path.display())]
    ColumnCount {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },

    /// File parsed but the typed schema needs a column it lacks.
    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration or mapping file unreadable or invalid.
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl LoadError {
    /// Map an I/O failure on `path`, distinguishing a missing file.
    pub fn from_io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound { path }
        } else {
            LoadError::Io { path, source: err }
        }
    }

    /// Map a csv failure, unwrapping I/O errors the csv reader surfaced.
    pub fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        let path = path.into();
        if !err.is_io_error() {
            return LoadError::Parse { path, source: err };
        }
        match err.into_kind() {
            csv::ErrorKind::Io(io) => LoadError::from_io(path, io),
            other => LoadError::Io {
                path,
                source: std::io::Error::new(std::io::ErrorKind::Other, format!("{:?}", other)),
            },
        }
    }

    /// Short label for the failure class, used in page notices and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "FileNotFound",
            LoadError::Parse { .. }
            | LoadError::ColumnCount { .. }
            | LoadError::MissingColumn { .. } => "ParseError",
            LoadError::Io { .. } => "IoError",
            LoadError::Config { .. } => "ConfigError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_maps_to_not_found() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "nope");
        let mapped = LoadError::from_io("data/missing.csv", err);

        assert!(matches!(mapped, LoadError::NotFound { .. }));
        assert_eq!(mapped.kind(), "FileNotFound");
        assert!(mapped.to_string().contains("data/missing.csv"));
    }

    #[test]
    fn test_other_io_maps_to_io() {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let mapped = LoadError::from_io("data/locked.csv", err);

        assert!(matches!(mapped, LoadError::Io { .. }));
    }
}
