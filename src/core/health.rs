//! Background connectivity checks against the backend's health endpoint.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use reqwest::header::CACHE_CONTROL;
use reqwest::StatusCode;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::HealthReport;
use crate::core::dispatch::Timeouts;
use crate::core::session::Session;

#[derive(Debug)]
pub enum ProbeError {
    TimedOut(Duration),
    Status(StatusCode),
    Transport(reqwest::Error),
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeError::TimedOut(after) => write!(f, "health check timed out after {after:?}"),
            ProbeError::Status(status) => write!(f, "health check returned {status}"),
            ProbeError::Transport(err) => write!(f, "health check failed: {err}"),
        }
    }
}

impl Error for ProbeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProbeError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Issues one health check. Only the status line counts: the call resolves
/// once the response headers arrive, and `timeout` bounds just that part.
pub async fn probe(
    client: &reqwest::Client,
    endpoint: &str,
    timeout: Duration,
) -> Result<reqwest::Response, ProbeError> {
    let attempt = async {
        let response = client
            .get(endpoint)
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(ProbeError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Status(status));
        }
        Ok(response)
    };

    tokio::time::timeout(timeout, attempt)
        .await
        .map_err(|_| ProbeError::TimedOut(timeout))?
}

/// Best-effort decode of a healthy response's body, for display only.
pub async fn read_report(response: reqwest::Response, timeout: Duration) -> Option<HealthReport> {
    match tokio::time::timeout(timeout, response.json::<HealthReport>()).await {
        Ok(Ok(report)) => Some(report),
        Ok(Err(err)) => {
            debug!(error = %err, "health report not decodable");
            None
        }
        Err(_) => {
            debug!("health report body did not arrive in time");
            None
        }
    }
}

/// Owns the polling task. Dropping the poller stops it.
#[derive(Debug)]
pub struct HealthPoller {
    token: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl HealthPoller {
    /// Starts polling: one probe right away, then one per interval.
    pub fn spawn(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        timeouts: &Timeouts,
        session: Session,
    ) -> Self {
        let token = CancellationToken::new();
        let endpoint = endpoint.into();
        let interval = timeouts.health_interval;
        let probe_timeout = timeouts.health_probe;
        let cancel = token.clone();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let result = tokio::select! {
                    _ = cancel.cancelled() => break,
                    result = probe(&client, &endpoint, probe_timeout) => result,
                };

                match result {
                    Ok(_) => session.set_online(true),
                    Err(err @ ProbeError::TimedOut(_)) => {
                        debug!(error = %err, "health probe timed out");
                        session.set_online(false);
                    }
                    Err(err) => {
                        warn!(error = %err, "health probe failed");
                        session.set_online(false);
                    }
                }
            }
            debug!("health poller stopped");
        });

        Self {
            token,
            task: Some(task),
        }
    }

    /// Stops polling and waits for the task to wind down.
    pub async fn shutdown(mut self) {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for HealthPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::{refused_endpoint, test_client, MockResponse, MockServer};

    fn fast_timeouts() -> Timeouts {
        Timeouts {
            health_probe: Duration::from_millis(200),
            health_interval: Duration::from_millis(50),
            ..Timeouts::default()
        }
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        let wait = async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("condition should hold in time");
    }

    #[tokio::test]
    async fn probe_decodes_report_on_success() {
        let server = MockServer::start(vec![MockResponse::json(
            200,
            r#"{"status":"healthy","service":"College Admission Agent","model":"ibm/granite-3-3-8b-instruct"}"#,
        )])
        .await;

        let response = probe(&test_client(), &server.url("/api/health"), Duration::from_secs(1))
            .await
            .expect("healthy");
        let report = read_report(response, Duration::from_secs(1))
            .await
            .expect("report");
        assert_eq!(report.service.as_deref(), Some("College Admission Agent"));

        let requests = server.requests().await;
        assert_eq!(requests[0].request_line, "GET /api/health HTTP/1.1");
        assert_eq!(requests[0].header("cache-control"), Some("no-cache"));
    }

    #[tokio::test]
    async fn probe_ignores_undecodable_body() {
        let server = MockServer::start(vec![MockResponse::text(200, "ok")]).await;
        let response = probe(&test_client(), &server.url("/api/health"), Duration::from_secs(1))
            .await
            .expect("healthy");
        assert_eq!(read_report(response, Duration::from_secs(1)).await, None);
    }

    #[tokio::test]
    async fn slow_body_after_ok_status_is_healthy() {
        let server = MockServer::start(vec![MockResponse::json(
            200,
            r#"{"status":"healthy","service":"College Admission Agent"}"#,
        )
        .stalled_body(Duration::from_secs(3))])
        .await;

        let response = probe(&test_client(), &server.url("/api/health"), Duration::from_millis(300))
            .await
            .expect("status line alone decides health");
        assert_eq!(read_report(response, Duration::from_millis(100)).await, None);
    }

    #[tokio::test]
    async fn poller_stays_online_while_body_stalls() {
        let server = MockServer::start(vec![
            MockResponse::json(503, "{}"),
            MockResponse::json(200, r#"{"status":"healthy"}"#).stalled_body(Duration::from_secs(3)),
        ])
        .await;
        let session = Session::default();
        let timeouts = Timeouts {
            health_probe: Duration::from_millis(300),
            health_interval: Duration::from_millis(100),
            ..Timeouts::default()
        };

        let poller = HealthPoller::spawn(
            test_client(),
            server.url("/api/health"),
            &timeouts,
            session.clone(),
        );

        wait_until(|| !session.is_online()).await;
        wait_until(|| session.is_online()).await;
        // Several more stalled-body probes, each longer than the probe timeout.
        server.wait_for_requests(4).await;
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(session.is_online());
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn probe_classifies_failures() {
        let server = MockServer::start(vec![
            MockResponse::json(503, "{}"),
            MockResponse::json(200, "{}").delayed(Duration::from_secs(2)),
        ])
        .await;
        let client = test_client();
        let url = server.url("/api/health");

        let status = probe(&client, &url, Duration::from_secs(1)).await;
        assert!(matches!(
            status,
            Err(ProbeError::Status(StatusCode::SERVICE_UNAVAILABLE))
        ));

        let slow = probe(&client, &url, Duration::from_millis(100)).await;
        assert!(matches!(slow, Err(ProbeError::TimedOut(_))));

        let refused = probe(&client, &refused_endpoint().await, Duration::from_secs(1)).await;
        assert!(matches!(refused, Err(ProbeError::Transport(_))));
    }

    #[tokio::test]
    async fn poller_tracks_connectivity_without_touching_conversation() {
        let server = MockServer::start(vec![
            MockResponse::json(503, "{}"),
            MockResponse::json(200, "{}"),
        ])
        .await;
        let session = Session::default();

        let poller = HealthPoller::spawn(
            test_client(),
            server.url("/api/health"),
            &fast_timeouts(),
            session.clone(),
        );

        wait_until(|| !session.is_online()).await;
        wait_until(|| session.is_online()).await;
        assert_eq!(session.message_count(), 0);
        poller.shutdown().await;
    }

    #[tokio::test]
    async fn unreachable_backend_goes_offline() {
        let session = Session::default();
        let poller = HealthPoller::spawn(
            test_client(),
            refused_endpoint().await,
            &fast_timeouts(),
            session.clone(),
        );

        wait_until(|| !session.is_online()).await;
        assert_eq!(session.message_count(), 0);
        drop(poller);
    }

    #[tokio::test]
    async fn shutdown_stops_further_probes() {
        let server = MockServer::start(vec![MockResponse::json(200, "{}")]).await;
        let poller = HealthPoller::spawn(
            test_client(),
            server.url("/api/health"),
            &fast_timeouts(),
            Session::default(),
        );

        server.wait_for_requests(2).await;
        poller.shutdown().await;
        // Let a probe that was already on the wire land before counting.
        tokio::time::sleep(Duration::from_millis(50)).await;
        let seen = server.requests().await.len();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(server.requests().await.len(), seen);
    }
}
