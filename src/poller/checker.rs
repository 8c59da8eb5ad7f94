// src/poller/checker.rs
use super::result::{now_iso8601, round_ms, CheckError, CheckResult};
use crate::config::PollerConfig;
use crate::endpoints::Endpoint;
use anyhow::{Context, Result};
use futures::future::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::{header, redirect, Client};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::time::{timeout, Duration};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

const MAX_REDIRECTS: usize = 30;

/// Runs HTTP checks against endpoints with a bounded number in flight.
///
/// Cloning is cheap: clones share the HTTP client (and its connection pool)
/// and the worker limit.
#[derive(Clone)]
pub struct Poller {
    client: Client,
    timeout_secs: u64,
    max_workers: usize,
    limiter: Arc<Semaphore>,
}

impl Poller {
    pub fn new(config: &PollerConfig) -> Result<Self> {
        config.validate()?;

        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .context("Invalid User-Agent header")?;
        let mut headers = header::HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, config.timeout_secs, config.max_workers))
    }

    /// Use a preconfigured client. `max_workers` is clamped to at least one.
    pub fn with_client(client: Client, timeout_secs: u64, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            client,
            timeout_secs,
            max_workers,
            limiter: Arc::new(Semaphore::new(max_workers)),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Issue one GET against `url` and classify the outcome. Never fails:
    /// every error becomes part of the returned result.
    pub async fn check(&self, name: &str, url: &str) -> CheckResult {
        let started_at = now_iso8601();
        let start = Instant::now();

        let outcome = AssertUnwindSafe(self.fetch(url))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(CheckError::Unexpected(panic_message(panic.as_ref()))));

        match outcome {
            Ok(status_code) => {
                let response_time_ms = round_ms(start.elapsed());
                let result = CheckResult::from_response(name, url, status_code, response_time_ms)
                    .started_at(started_at);
                debug!(
                    "{} ({}) -> {} {} in {}ms",
                    name, url, result.status, status_code, response_time_ms
                );
                result
            }
            Err(e) => {
                warn!("{} ({}) failed: {}", name, url, e);
                CheckResult::from_error(name, url, &e).started_at(started_at)
            }
        }
    }

    /// The response body is drained so the timing covers the whole response.
    async fn fetch(&self, url: &str) -> Result<u16, CheckError> {
        let request = async {
            let response = self.client.get(url).send().await?;
            let status_code = response.status().as_u16();
            response.bytes().await?;
            Ok::<u16, reqwest::Error>(status_code)
        };

        match timeout(self.timeout(), request).await {
            Ok(Ok(status_code)) => Ok(status_code),
            Ok(Err(e)) => Err(CheckError::from_reqwest(e, self.timeout_secs)),
            Err(_) => Err(CheckError::Timeout(self.timeout_secs)),
        }
    }

    /// Check every endpoint once and return the results sorted by name.
    pub async fn poll_all<I>(&self, endpoints: I) -> Vec<CheckResult>
    where
        I: IntoIterator<Item = Endpoint>,
    {
        let poller = self.clone();
        self.dispatch(endpoints, move |endpoint| {
            let poller = poller.clone();
            async move { poller.check(&endpoint.name, &endpoint.url).await }
        })
        .await
    }

    /// Fan `check` out over the worker pool. A task that dies without a
    /// result is replaced by a synthetic `error` result for its endpoint.
    async fn dispatch<I, F, Fut>(&self, endpoints: I, check: F) -> Vec<CheckResult>
    where
        I: IntoIterator<Item = Endpoint>,
        F: Fn(Endpoint) -> Fut,
        Fut: Future<Output = CheckResult> + Send + 'static,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("poll_run", %run_id);

        async move {
            let started = Instant::now();
            let mut tasks = FuturesUnordered::new();

            for endpoint in endpoints {
                let limiter = self.limiter.clone();
                let pending = check(endpoint.clone());
                let task_endpoint = endpoint.clone();

                let handle = tokio::spawn(
                    async move {
                        let _permit = match limiter.acquire_owned().await {
                            Ok(permit) => permit,
                            Err(e) => {
                                return CheckResult::dispatch_failure(
                                    &task_endpoint.name,
                                    &task_endpoint.url,
                                    e,
                                )
                            }
                        };
                        pending.await
                    }
                    .in_current_span(),
                );

                tasks.push(async move { (endpoint, handle.await) });
            }

            let total = tasks.len();
            info!(
                "Dispatched {} checks across {} workers",
                total, self.max_workers
            );

            let mut results = Vec::with_capacity(total);
            while let Some((endpoint, joined)) = tasks.next().await {
                match joined {
                    Ok(result) => results.push(result),
                    Err(e) => {
                        error!("Check task for {} failed: {}", endpoint.name, e);
                        results.push(CheckResult::dispatch_failure(
                            &endpoint.name,
                            &endpoint.url,
                            e,
                        ));
                    }
                }
            }

            results.sort_by(|a, b| a.name.cmp(&b.name));

            let healthy = results.iter().filter(|r| r.is_healthy()).count();
            info!(
                "Poll complete: {} healthy, {} unhealthy in {:.2}s",
                healthy,
                total - healthy,
                started.elapsed().as_secs_f64()
            );

            results
        }
        .instrument(span)
        .await
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
