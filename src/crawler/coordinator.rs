//! Crawl orchestration
//!
//! The [`Checker`] owns the shared queue and result store and runs the
//! dispatch loop: it pops tasks, hands them to a bounded pool of spawned
//! workers and stops once every pushed task has completed. The first fatal
//! error stops dispatch, cancels in-flight work and ends the crawl with an
//! aggregate error.

use crate::config::{validate, Options};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::queue::TaskQueue;
use crate::crawler::task::{FetchTask, Task};
use crate::crawler::validator::build_validator;
use crate::crawler::worker::Worker;
use crate::state::{Admission, CheckResult, ResultStore};
use crate::url::{resolve, IgnoreFilter, Resolved};
use crate::CheckerError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};

/// Main checker structure
pub struct Checker {
    seeds: Vec<String>,
    workers: usize,
    queue: Arc<TaskQueue>,
    store: Arc<ResultStore>,
    ignore: Arc<IgnoreFilter>,
    worker: Worker,
}

impl Checker {
    /// Creates a checker from validated options
    ///
    /// # Arguments
    ///
    /// * `options` - The crawl options; validated before anything is built
    ///
    /// # Returns
    ///
    /// * `Ok(Checker)` - Ready to run
    /// * `Err(CheckerError)` - Invalid options or the HTTP client failed to build
    pub fn new(options: Options) -> Result<Self, CheckerError> {
        validate(&options)?;

        let client = build_http_client(&options.http).map_err(CheckerError::Client)?;
        let ignore = Arc::new(IgnoreFilter::new(&options.ignore_urls)?);
        let queue = Arc::new(TaskQueue::new());
        let store = Arc::new(ResultStore::new());
        let validator = build_validator(&client, options.structured_data.as_ref());

        if validator.is_some() {
            tracing::info!("Structured data validation enabled");
        }

        let worker = Worker::new(
            client,
            Arc::clone(&queue),
            Arc::clone(&store),
            Arc::clone(&ignore),
        )
        .with_validator(validator)
        .inspect_external(options.inspect_external)
        .fail_fast(options.fail_fast);

        Ok(Self {
            seeds: options.urls,
            workers: options.workers,
            queue,
            store,
            ignore,
            worker,
        })
    }

    /// Runs the crawl to completion
    ///
    /// # Returns
    ///
    /// * `Ok(CheckResult)` - Every reachable URL was checked
    /// * `Err(CheckerError::Aborted)` - One or more fatal errors; no partial result
    pub async fn run(self) -> Result<CheckResult, CheckerError> {
        self.enqueue_seeds()?;
        tracing::info!(
            "Starting crawl of {} seed(s) with {} workers",
            self.queue.len(),
            self.workers
        );

        let start_time = std::time::Instant::now();
        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut running: JoinSet<Result<(), CheckerError>> = JoinSet::new();
        let mut errors = Vec::new();

        loop {
            while let Some(joined) = running.try_join_next() {
                self.finished(joined, &mut errors);
            }
            if !errors.is_empty() {
                break;
            }

            if let Some(task) = self.queue.pop() {
                // Waits for a free worker slot; a finishing task releases its permit
                let permit = Arc::clone(&semaphore)
                    .acquire_owned()
                    .await
                    .map_err(|e| CheckerError::Worker(e.to_string()))?;
                let guard = self.queue.completion_guard();
                let worker = self.worker.clone();

                tracing::debug!("dispatching {}", task.describe());
                running.spawn(async move {
                    let _permit = permit;
                    let _guard = guard;
                    worker.execute(task).await
                });
                continue;
            }

            if self.queue.is_drained() {
                break;
            }

            tokio::select! {
                _ = self.queue.changed() => {}
                Some(joined) = running.join_next() => self.finished(joined, &mut errors),
            }
        }

        if !errors.is_empty() {
            tracing::warn!("Fatal error, cancelling {} running task(s)", running.len());
            running.abort_all();
        }
        while let Some(joined) = running.join_next().await {
            self.finished(joined, &mut errors);
        }

        if !errors.is_empty() {
            return Err(CheckerError::aborted(errors));
        }

        tracing::info!(
            "Crawl completed: {} URLs checked in {:?}",
            self.store.len(),
            start_time.elapsed()
        );
        Ok(self.store.snapshot())
    }

    /// Resolves the seed URLs and queues the fetchable ones
    fn enqueue_seeds(&self) -> Result<(), CheckerError> {
        let mut errors = Vec::new();

        for seed in &self.seeds {
            match resolve(seed, None) {
                Ok(Resolved::Fetchable(url)) => match self.store.admit(url.as_str(), &self.ignore) {
                    Admission::Scheduled => self.queue.push(Task::Fetch(FetchTask::seed(url))),
                    Admission::Ignored => tracing::warn!("Seed {} is ignored", url),
                    Admission::AlreadySeen => tracing::debug!("Duplicate seed {}", url),
                },
                Ok(Resolved::NonFetchable(raw)) => {
                    tracing::warn!("Seed {} is not an http(s) URL, skipping", raw);
                }
                Err(e) => errors.push(e.into()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(CheckerError::aborted(errors))
        }
    }

    /// Records the outcome of one joined task
    fn finished(
        &self,
        joined: Result<Result<(), CheckerError>, JoinError>,
        errors: &mut Vec<CheckerError>,
    ) {
        match joined {
            Ok(Ok(())) => {
                tracing::info!(
                    "{} checked, {} remaining",
                    self.store.len(),
                    self.queue.outstanding()
                );
            }
            Ok(Err(e)) => {
                tracing::error!("{}", e);
                errors.push(e);
            }
            Err(e) if e.is_cancelled() => {}
            Err(e) => errors.push(CheckerError::Worker(e.to_string())),
        }
    }
}

/// Runs a complete check with the given options
///
/// # Example
///
/// ```no_run
/// use website_checker::config::Options;
/// use website_checker::crawler::check;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = Options {
///     urls: vec!["https://example.com/".to_string()],
///     ..Options::default()
/// };
/// let result = check(options).await?;
/// println!("{} URLs checked", result.len());
/// # Ok(())
/// # }
/// ```
pub async fn check(options: Options) -> Result<CheckResult, CheckerError> {
    Checker::new(options)?.run().await
}
