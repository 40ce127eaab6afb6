//! Rate-limited, retrying fan-out over the platform API.
//!
//! One [`BulkExecutor`] serves a whole run. Its semaphore is the global
//! ceiling on in-flight requests, so concurrent pages of one list and
//! concurrent creates of one resource type share the same budget.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::future::try_join_all;
use mkt_client::{PlatformApi, PlatformError};
use mkt_directory::{CreateMethod, ResourceMetadata};
use mkt_model::Record;
use serde_json::Value;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::ExecutorSettings;
use crate::error::Result;

/// Fixed backoff schedule consulted after each retryable failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub delays: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    pub fn none() -> Self {
        Self { delays: Vec::new() }
    }

    /// Total attempts including the first.
    pub fn max_attempts(&self) -> usize {
        self.delays.len() + 1
    }

    /// Delay before retry number `retry` (0-based), or `None` when exhausted.
    pub fn delay(&self, retry: usize) -> Option<Duration> {
        self.delays.get(retry).copied()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(ExecutorSettings::default().retry_delays())
    }
}

/// Receives "N of M processed" updates.
///
/// `begin` starts a new counter; callers invoke it once per resource type.
pub trait ProgressReporter: Send + Sync {
    fn begin(&self, label: &str, total: usize);

    fn advance(&self, processed: usize, total: usize);

    fn finish(&self, label: &str);
}

/// Logs progress at debug level.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn begin(&self, label: &str, total: usize) {
        debug!(resource = label, total, "started");
    }

    fn advance(&self, processed: usize, total: usize) {
        debug!("{processed} of {total} processed");
    }

    fn finish(&self, label: &str) {
        debug!(resource = label, "finished");
    }
}

struct Counter {
    processed: AtomicUsize,
    total: AtomicUsize,
}

#[derive(Clone)]
pub struct BulkExecutor {
    platform: Arc<dyn PlatformApi>,
    limiter: Arc<Semaphore>,
    page_size: u32,
    retry: RetryPolicy,
    progress: Arc<dyn ProgressReporter>,
    counter: Arc<Counter>,
}

impl BulkExecutor {
    pub fn new(platform: Arc<dyn PlatformApi>, settings: &ExecutorSettings) -> Self {
        Self {
            platform,
            limiter: Arc::new(Semaphore::new(settings.concurrency.max(1))),
            page_size: settings.page_size.max(1),
            retry: RetryPolicy::new(settings.retry_delays()),
            progress: Arc::new(LogProgress),
            counter: Arc::new(Counter {
                processed: AtomicUsize::new(0),
                total: AtomicUsize::new(0),
            }),
        }
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    pub fn platform(&self) -> &dyn PlatformApi {
        self.platform.as_ref()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Resets the progress counter for a new resource type.
    pub fn begin(&self, label: &str, total: usize) {
        self.counter.processed.store(0, Ordering::Relaxed);
        self.counter.total.store(total, Ordering::Relaxed);
        self.progress.begin(label, total);
    }

    pub fn finish(&self, label: &str) {
        self.progress.finish(label);
    }

    /// Counts one finished unit of work against the current resource type.
    pub fn advance(&self) {
        let processed = self.counter.processed.fetch_add(1, Ordering::Relaxed) + 1;
        let total = self.counter.total.load(Ordering::Relaxed).max(processed);
        self.progress.advance(processed, total);
    }

    /// Runs one request under the limiter, retrying retryable failures.
    pub async fn call<R, F, Fut>(&self, label: &str, mut request: F) -> Result<R>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<R, PlatformError>>,
    {
        let mut retry = 0;
        loop {
            let outcome = {
                let _permit = self
                    .limiter
                    .acquire()
                    .await
                    .map_err(|_| PlatformError::Client("request limiter closed".to_string()))?;
                request().await
            };
            match outcome {
                Ok(value) => return Ok(value),
                Err(error) if error.is_retryable() => match self.retry.delay(retry) {
                    Some(delay) => {
                        warn!(
                            resource = label,
                            attempt = retry + 1,
                            delay_ms = delay.as_millis() as u64,
                            %error,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        retry += 1;
                    }
                    None => return Err(error.into()),
                },
                Err(error) => return Err(error.into()),
            }
        }
    }

    /// Applies `f` to every item concurrently under the shared limiter.
    ///
    /// Results keep the order of `items`. The first error that survives its
    /// retries is returned and the remaining work is dropped.
    pub async fn run_many<T, R, F, Fut>(&self, label: &str, items: Vec<T>, f: F) -> Result<Vec<R>>
    where
        T: Clone,
        F: Fn(T) -> Fut,
        Fut: Future<Output = std::result::Result<R, PlatformError>>,
    {
        let f = &f;
        let tasks = items.into_iter().map(|item| async move {
            let result = self.call(label, || f(item.clone())).await?;
            self.advance();
            Ok::<R, crate::error::SeedError>(result)
        });
        try_join_all(tasks).await
    }

    /// Every record of a list route: page 1, then the rest concurrently.
    pub async fn list_all(
        &self,
        resource: &ResourceMetadata,
        route_params: &[String],
    ) -> Result<Vec<Record>> {
        let path = resource.path(route_params)?;
        let label = resource.name.as_str();
        let page_size = self.page_size;
        let platform = self.platform.as_ref();

        let first = self
            .call(label, || platform.list_page(&path, 1, page_size))
            .await?;
        let total_pages = first.meta.total_pages;
        let mut records = first.items;
        if total_pages > 1 {
            debug!(resource = label, path = %path, total_pages, "fetching remaining pages");
            let path = path.as_str();
            let pages = try_join_all((2..=total_pages).map(|page| {
                self.call(label, move || platform.list_page(path, page, page_size))
            }))
            .await?;
            records.extend(pages.into_iter().flat_map(|page| page.items));
        }
        Ok(records)
    }

    /// Creates records, each under its own route parameters.
    ///
    /// A `204 No Content` answer yields the record that was sent.
    pub async fn create_all(
        &self,
        resource: &ResourceMetadata,
        items: Vec<(Vec<String>, Record)>,
    ) -> Result<Vec<Record>> {
        let prepared = items
            .into_iter()
            .map(|(params, record)| Ok((resource.path(&params)?, record)))
            .collect::<Result<Vec<(String, Record)>>>()?;
        let platform = self.platform.as_ref();
        let method = resource.create_method;

        self.run_many(resource.name.as_str(), prepared, move |(path, record)| async move {
            let body = Value::Object(record.clone());
            tracing::trace!(path = %path, body = %body, "create");
            let created = match method {
                CreateMethod::Post => platform.create(&path, &body).await?,
                CreateMethod::Put => platform.put(&path, &body).await?,
            };
            Ok::<Record, PlatformError>(match created {
                Value::Object(created) => created,
                _ => record,
            })
        })
        .await
    }
}

impl std::fmt::Debug for BulkExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkExecutor")
            .field("available_permits", &self.limiter.available_permits())
            .field("page_size", &self.page_size)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
