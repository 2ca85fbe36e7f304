// Typed error taxonomy for the public operations.
//
// The pure core only ever produces MalformedRecord, InvalidArgument and
// Input. CollaboratorFailure is raised at the boundary, where calls to
// external services are wrapped with a timeout (see collaborators::guard).

use thiserror::Error;

/// Errors returned by learnpath's public operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A performance row carried a value that is not a valid number.
    /// The whole analysis run fails; no partial results are returned.
    #[error("malformed record at row {row} (topic {topic:?}): {field} = {value:?} is not a valid number")]
    MalformedRecord {
        /// 0-based index of the data row (header excluded)
        row: usize,
        topic: String,
        field: &'static str,
        value: String,
    },

    /// A caller-supplied argument is outside its domain (non-positive top_n,
    /// ranking against an empty catalog, an unrecognized video URL).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An external service failed or did not answer in time.
    #[error("{service} {}: {message}", outcome(.timed_out))]
    CollaboratorFailure {
        service: &'static str,
        timed_out: bool,
        message: String,
    },

    /// An input document (quiz log or subtopic catalog) could not be read
    /// or does not have the expected columns.
    #[error("could not read {input}: {message}")]
    Input {
        input: &'static str,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

fn outcome(timed_out: &bool) -> &'static str {
    if *timed_out {
        "timed out"
    } else {
        "failed"
    }
}

impl Error {
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidArgument(message.into())
    }

    pub fn input(input: &'static str, err: impl std::fmt::Display) -> Self {
        Error::Input {
            input,
            message: err.to_string(),
        }
    }

    pub fn collaborator(service: &'static str, err: impl std::fmt::Display) -> Self {
        Error::CollaboratorFailure {
            service,
            timed_out: false,
            message: err.to_string(),
        }
    }

    /// True for failures of an external service, including timeouts.
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(self, Error::CollaboratorFailure { .. })
    }
}
