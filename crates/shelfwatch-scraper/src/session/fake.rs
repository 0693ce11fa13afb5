//! Scripted in-memory [`PageSession`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use super::{ClickMethod, NavigateOptions, PageSession, ScrollStep, WaitOptions, WaitPolicy};
use crate::error::ScraperError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Navigate {
        url: String,
        wait: WaitPolicy,
        timeout_ms: u128,
    },
    Wait { selector: String, visible: bool },
    Count(String),
    QueryAll(String),
    Click(String, ClickMethod),
    Type { selector: String, text: String, delay_ms: u128 },
    Scroll(ScrollStep),
}

#[derive(Default)]
pub(crate) struct FakeSession {
    /// Successive results of `count`; the last value repeats once drained.
    counts: Mutex<VecDeque<usize>>,
    last_count: Mutex<usize>,
    query_results: HashMap<String, Vec<serde_json::Value>>,
    missing: Vec<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeSession {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_counts(self, counts: &[usize]) -> Self {
        *self.counts.lock().unwrap() = counts.iter().copied().collect();
        self
    }

    pub(crate) fn with_query(mut self, selector: &str, rows: Vec<serde_json::Value>) -> Self {
        self.query_results.insert(selector.to_owned(), rows);
        self
    }

    /// Makes waits and clicks on `selector` fail as if it never appeared.
    pub(crate) fn with_missing(mut self, selector: &str) -> Self {
        self.missing.push(selector.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn scroll_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Scroll(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl PageSession for FakeSession {
    async fn navigate(&self, url: &str, opts: NavigateOptions) -> Result<(), ScraperError> {
        self.record(Call::Navigate {
            url: url.to_owned(),
            wait: opts.wait,
            timeout_ms: opts.timeout.as_millis(),
        });
        Ok(())
    }

    async fn wait_for_element(&self, selector: &str, opts: WaitOptions) -> Result<(), ScraperError> {
        self.record(Call::Wait {
            selector: selector.to_owned(),
            visible: opts.visible,
        });
        if self.missing.iter().any(|m| m == selector) {
            return Err(ScraperError::NavigationTimeout {
                target: selector.to_owned(),
                timeout_ms: u64::try_from(opts.timeout.as_millis()).unwrap_or(u64::MAX),
            });
        }
        Ok(())
    }

    async fn count(&self, selector: &str) -> Result<usize, ScraperError> {
        self.record(Call::Count(selector.to_owned()));
        let mut last = self.last_count.lock().unwrap();
        if let Some(next) = self.counts.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(*last)
    }

    async fn query_all(
        &self,
        selector: &str,
        _mapper: &str,
    ) -> Result<Vec<serde_json::Value>, ScraperError> {
        self.record(Call::QueryAll(selector.to_owned()));
        Ok(self.query_results.get(selector).cloned().unwrap_or_default())
    }

    async fn click(&self, selector: &str, method: ClickMethod) -> Result<(), ScraperError> {
        self.record(Call::Click(selector.to_owned(), method));
        if self.missing.iter().any(|m| m == selector) {
            return Err(ScraperError::SelectorMismatch {
                selector: selector.to_owned(),
            });
        }
        Ok(())
    }

    async fn type_text(
        &self,
        selector: &str,
        text: &str,
        inter_key_delay: Duration,
    ) -> Result<(), ScraperError> {
        self.record(Call::Type {
            selector: selector.to_owned(),
            text: text.to_owned(),
            delay_ms: inter_key_delay.as_millis(),
        });
        Ok(())
    }

    async fn scroll(&self, step: ScrollStep) -> Result<(), ScraperError> {
        self.record(Call::Scroll(step));
        Ok(())
    }
}
