//! Reachability of the application under test
//!
//! The form is a remote service; before spending minutes in a browser the
//! runner makes sure its landing page answers at all.

use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};
use crate::fixtures::Fixture;

/// Handle to the remote application
#[derive(Debug, Clone)]
pub struct RemoteTarget {
    pub base_url: String,
}

impl RemoteTarget {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the landing page
    pub fn landing_url(&self) -> String {
        format!("{}{}", self.base_url, Fixture::ApplicationPage.path())
    }

    /// Poll the landing page until it answers without a server error
    pub async fn probe(&self, timeout_duration: Duration) -> E2eResult<()> {
        let url = self.landing_url();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let start = Instant::now();
        let mut attempts = 0;

        loop {
            attempts += 1;

            match client.get(&url).send().await {
                Ok(resp) if !resp.status().is_server_error() => {
                    info!("Target is up at {} ({})", url, resp.status());
                    return Ok(());
                }
                Ok(resp) => {
                    warn!("Target returned {}", resp.status());
                }
                Err(e) => {
                    if attempts == 1 {
                        info!("Waiting for {} to answer...", url);
                    }
                    if !e.is_connect() && !e.is_timeout() {
                        warn!("Probe error: {}", e);
                    }
                }
            }

            if start.elapsed() >= timeout_duration {
                return Err(E2eError::TargetUnreachable { url, attempts });
            }

            sleep(Duration::from_millis(500)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_url() {
        let target = RemoteTarget::new("https://testapp.fairlo.se/");
        assert_eq!(target.landing_url(), "https://testapp.fairlo.se/application/");
    }

    #[tokio::test]
    async fn test_unreachable_target_reports_attempts() {
        // Port 9 (discard) on localhost is closed in test environments
        let target = RemoteTarget::new("http://127.0.0.1:9");
        let err = target.probe(Duration::from_millis(0)).await.unwrap_err();
        match err {
            E2eError::TargetUnreachable { attempts, url } => {
                assert_eq!(attempts, 1);
                assert!(url.ends_with("/application/"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
