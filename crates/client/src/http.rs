use std::time::Duration;

use crate::error::ClientError;

/// Settings for the process-wide client used for service-to-service
/// calls. Timeouts are fixed at construction; call sites never extend
/// them and nothing retries a failed call.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Builds the shared reqwest client. Each service builds exactly one
/// of these at boot and clones the handle into its collaborators.
pub fn build_http_client(config: &HttpClientConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(50)
        .connect_timeout(config.connect_timeout)
        .timeout(config.timeout)
        .build()
}

/// Passes through success responses and turns everything else into
/// [`ClientError::Status`].
pub(crate) fn ok_status(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status {
            status: response.status(),
        })
    }
}

/// Joins a base URL and path, tolerating a trailing slash on the base.
pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
