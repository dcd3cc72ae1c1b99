//! Error type shared by the scanner, the static plotter and the report builder

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("data root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("failed to scan directory tree: {0}")]
    Scan(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to render plot: {0}")]
    Plot(String),

    #[error("invalid report layout: {0}")]
    Layout(String),

    #[error("failed to serialize figure: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for Error
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        Error::Plot(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_root_message_names_path() {
        let err = Error::MissingRoot(PathBuf::from("/no/such/root"));
        assert_eq!(err.to_string(), "data root does not exist: /no/such/root");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
