use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Errors that can occur while extracting a translation block from a verifier log.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    /// The header marker for the obligation does not occur in the log.
    #[error("no SMT translation found for tag `{0}`")]
    TagNotFound(String),
    /// The text following the marker yields no script content.
    #[error("SMT translation of `{0}` is empty")]
    MalformedBlock(String),
    /// No `(check-sat)` command follows the marker.
    #[error("SMT translation of `{0}` has no (check-sat) command")]
    MissingCheckSat(String),
}

/// Errors that can occur while running the solver.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to launch solver {}: {source}", .executable.display())]
    LaunchFailure {
        executable: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The solver did not terminate within the configured bound and was killed.
    #[error("solver did not terminate within {0:?}")]
    Timeout(Duration),
    /// The output of the solver could not be captured.
    #[error("failed to capture solver output: {0}")]
    Capture(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Run(#[from] RunError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_extraction_errors() {
        assert_eq!(
            ExtractionError::TagNotFound("A.m()".into()).to_string(),
            "no SMT translation found for tag `A.m()`"
        );
        assert_eq!(
            ExtractionError::MissingCheckSat("A.m()".into()).to_string(),
            "SMT translation of `A.m()` has no (check-sat) command"
        );
    }

    #[test]
    fn display_launch_failure() {
        let err = RunError::LaunchFailure {
            executable: PathBuf::from("/no/cvc4"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(err.to_string(), "failed to launch solver /no/cvc4: not found");
    }

    #[test]
    fn public_error_is_transparent() {
        let err: Error = ExtractionError::MalformedBlock("t".into()).into();
        assert_eq!(err.to_string(), "SMT translation of `t` is empty");
        assert!(matches!(
            err,
            Error::Extraction(ExtractionError::MalformedBlock(_))
        ));
    }
}
