// External collaborators: trait-based seams for every network dependency.
//
// Each trait in `traits` has one production implementation here: YouTube
// search, timed-text transcripts, Gemini summaries, and the quiz-log feed.
// `guard` is the single place where a collaborator call is bounded by a
// timeout and its failure converted into the typed error taxonomy.

pub mod feed;
pub mod gemini;
pub mod rate_limiter;
pub mod traits;
pub mod transcript;
pub mod youtube;

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result};

/// Run a collaborator call under a timeout.
///
/// Service errors and timeouts both become `Error::CollaboratorFailure`;
/// `timed_out` tells them apart. A successful empty answer passes through
/// untouched. No retries happen here.
pub async fn guard<T, F>(service: &'static str, timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = anyhow::Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            warn!(service = service, error = %e, "Collaborator call failed");
            Err(Error::CollaboratorFailure {
                service,
                timed_out: false,
                message: format!("{e:#}"),
            })
        }
        Err(_) => {
            warn!(
                service = service,
                timeout_secs = timeout.as_secs_f64(),
                "Collaborator call timed out"
            );
            Err(Error::CollaboratorFailure {
                service,
                timed_out: true,
                message: format!("no response after {:.1}s", timeout.as_secs_f64()),
            })
        }
    }
}
