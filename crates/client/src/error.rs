use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a cross-service call.
///
/// Callers treat every variant the same way, as "the upstream did not
/// give us a usable answer". The split exists for logging.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure: refused connection, DNS, timeout.
    #[error("upstream unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned {status}")]
    Status { status: StatusCode },

    /// The upstream answered 2xx but the body did not parse.
    #[error("failed to decode upstream response: {0}")]
    Decode(#[source] reqwest::Error),
}
