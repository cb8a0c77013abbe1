use std::borrow::Cow;

use super::*;

#[derive(Debug, thiserror::Error)]
enum NotFound {
    #[error("experiment not found: {0}")]
    Experiment(ExperimentId),

    #[error("endpoint not found (is the dashboard running at {0}?)")]
    Endpoint(String),
}

/// A 4xx answer will not change on a second try. 408 and 429 are the
/// exceptions.
fn is_permanent(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if cause.is::<NotFound>() {
            return true;
        }
        cause
            .downcast_ref::<reqwest::Error>()
            .and_then(reqwest::Error::status)
            .is_some_and(|status| {
                status.is_client_error()
                    && status != reqwest::StatusCode::REQUEST_TIMEOUT
                    && status != reqwest::StatusCode::TOO_MANY_REQUESTS
            })
    })
}

/// Retries idempotent reads; mutations go out exactly once.
pub(super) fn with_retries<T>(label: &str, mut f: impl FnMut() -> Result<T>) -> Result<T> {
    const ATTEMPTS: usize = 3;
    let mut last: Option<anyhow::Error> = None;
    for i in 0..ATTEMPTS {
        match f() {
            Ok(v) => return Ok(v),
            Err(err) => {
                tracing::debug!(attempt = i + 1, error = %err, "{} failed", label);
                if is_permanent(&err) {
                    return Err(err.context(label.to_string()));
                }
                last = Some(err);
                if i + 1 < ATTEMPTS {
                    std::thread::sleep(std::time::Duration::from_millis(200 * (1 << i)));
                }
            }
        }
    }
    Err(last
        .unwrap_or_else(|| anyhow::anyhow!("unknown error"))
        .context(label.to_string()))
}

/// Experiment ids travel as single percent-encoded path segments.
pub(super) fn path_segment(id: &ExperimentId) -> Cow<'_, str> {
    urlencoding::encode(id.as_str())
}

impl RemoteClient {
    /// Map a 404 to a readable error, then fail on any other non-success.
    pub(super) fn ensure_ok(
        &self,
        resp: reqwest::blocking::Response,
        label: &str,
        id: Option<&ExperimentId>,
    ) -> Result<reqwest::blocking::Response> {
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(match id {
                Some(id) => NotFound::Experiment(id.clone()),
                None => NotFound::Endpoint(self.base_url.clone()),
            }
            .into());
        }
        resp.error_for_status()
            .with_context(|| format!("{} status", label))
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
