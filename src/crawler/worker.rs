//! Task execution
//!
//! A [`Worker`] holds everything a task needs: the HTTP client, the shared
//! queue and result store, the ignore filter and the optional validator.
//! Cloning a worker is cheap; the coordinator hands one clone to every
//! spawned task.

use crate::crawler::fetcher::fetch_page;
use crate::crawler::parser::parse_html;
use crate::crawler::queue::TaskQueue;
use crate::crawler::task::{FetchTask, StructuredDataTask, Task};
use crate::crawler::validator::{wrap_json_ld, StructuredDataValidator};
use crate::state::{Admission, PageEntry, ResultStore, StructuredDataReport};
use crate::url::{resolve, IgnoreFilter, Resolved};
use crate::CheckerError;
use reqwest::Client;
use std::sync::Arc;

/// Executes crawl tasks against shared state
#[derive(Clone)]
pub struct Worker {
    client: Client,
    queue: Arc<TaskQueue>,
    store: Arc<ResultStore>,
    ignore: Arc<IgnoreFilter>,
    validator: Option<Arc<dyn StructuredDataValidator>>,
    inspect_external: bool,
    fail_fast: bool,
}

impl Worker {
    pub fn new(
        client: Client,
        queue: Arc<TaskQueue>,
        store: Arc<ResultStore>,
        ignore: Arc<IgnoreFilter>,
    ) -> Self {
        Self {
            client,
            queue,
            store,
            ignore,
            validator: None,
            inspect_external: true,
            fail_fast: false,
        }
    }

    /// Sets the validator used for structured data blocks
    pub fn with_validator(mut self, validator: Option<Arc<dyn StructuredDataValidator>>) -> Self {
        self.validator = validator;
        self
    }

    /// Controls whether pages on other sites are parsed
    pub fn inspect_external(mut self, inspect: bool) -> Self {
        self.inspect_external = inspect;
        self
    }

    /// Controls whether a request without response aborts the crawl
    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Runs one task to completion
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The task finished, including no-op outcomes
    /// * `Err(CheckerError)` - A fatal error; the crawl must stop
    pub async fn execute(&self, task: Task) -> Result<(), CheckerError> {
        match task {
            Task::Fetch(task) => self.fetch(task).await,
            Task::StructuredData(task) => self.check_structured_data(task).await,
        }
    }

    async fn fetch(&self, task: FetchTask) -> Result<(), CheckerError> {
        let key = task.key();
        if self.store.is_recorded(key) {
            tracing::debug!(url = key, "already checked");
            return Ok(());
        }

        tracing::debug!(url = key, "requesting url");
        let page = match fetch_page(&self.client, &task.url).await {
            Ok(page) => page,
            Err(source) if self.fail_fast => {
                return Err(CheckerError::Transport {
                    url: key.to_string(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!(url = key, "request failed: {}", e);
                self.store.record(key, PageEntry::failed(e.to_string()));
                return Ok(());
            }
        };
        tracing::debug!(url = key, status = page.status_code, "got response");

        let Some(entry) = self.store.record(key, PageEntry::new(page.status_code)) else {
            return Ok(());
        };

        if !self.inspect_external && task.is_external() {
            tracing::warn!(url = key, "is external");
            return Ok(());
        }
        if !page.is_html() {
            tracing::debug!(url = key, content_type = ?page.content_type, "not html, skipping body");
            return Ok(());
        }

        let body = match page.text().await {
            Ok(body) => body,
            Err(source) if self.fail_fast => {
                return Err(CheckerError::Transport {
                    url: key.to_string(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!(url = key, "failed to read body: {}", e);
                entry.set_error(e.to_string());
                return Ok(());
            }
        };

        let parsed = parse_html(&body);

        for reference in parsed.references {
            let resolved = resolve(&reference.value, Some(&task.url))?;

            if let Resolved::Fetchable(url) = &resolved {
                match self.store.admit(url.as_str(), &self.ignore) {
                    Admission::Scheduled => {
                        self.queue.push(Task::Fetch(FetchTask::discovered(
                            url.clone(),
                            task.url.clone(),
                        )));
                    }
                    Admission::Ignored => tracing::debug!(url = url.as_str(), "url is ignored"),
                    Admission::AlreadySeen => {}
                }
            }

            entry.push_link(resolved.as_link());
        }

        for (index, content) in parsed.structured_data.into_iter().enumerate() {
            self.queue.push(Task::StructuredData(StructuredDataTask {
                content,
                origin: key.to_string(),
                index,
            }));
        }

        Ok(())
    }

    async fn check_structured_data(&self, task: StructuredDataTask) -> Result<(), CheckerError> {
        let entry = self
            .store
            .page(&task.origin)
            .ok_or_else(|| CheckerError::MissingPage {
                url: task.origin.clone(),
            })?;

        let validation = match &self.validator {
            Some(validator) => {
                tracing::debug!(url = task.origin.as_str(), index = task.index, "validating structured data");
                Some(validator.validate(&wrap_json_ld(&task.content)).await?)
            }
            None => None,
        };

        entry.push_structured_data(
            task.index,
            StructuredDataReport {
                content: task.content,
                validation,
            },
        );
        Ok(())
    }
}
