//! The page-session contract the scraping pipeline drives.
//!
//! A session wraps exactly one browser tab. It is used serially: every
//! component receives `&S` and awaits each call before issuing the next.

mod chromium;

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

pub use chromium::{ChromiumSession, LaunchOptions};

/// Which document lifecycle point `navigate` waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    DomContentLoaded,
    /// Every subresource has finished loading.
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigateOptions {
    pub wait: WaitPolicy,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Require a rendered, non-hidden element rather than mere presence.
    pub visible: bool,
    pub timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickMethod {
    /// Synthesized pointer events at the element's center.
    Pointer,
    /// `HTMLElement.click()` from page script; works on covered elements.
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollStep {
    /// One `window.innerHeight`.
    Viewport,
    /// A fixed vertical offset; negative values scroll up.
    Pixels(i64),
}

/// Operations the pipeline needs from a live, exclusively owned page.
pub trait PageSession {
    /// Navigates and waits for `opts.wait`, failing with
    /// [`ScraperError::NavigationTimeout`] once `opts.timeout` elapses.
    fn navigate(
        &self,
        url: &str,
        opts: NavigateOptions,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Waits until `selector` matches, failing with
    /// [`ScraperError::NavigationTimeout`] once `opts.timeout` elapses.
    fn wait_for_element(
        &self,
        selector: &str,
        opts: WaitOptions,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Number of elements currently matching `selector`.
    fn count(&self, selector: &str) -> impl Future<Output = Result<usize, ScraperError>> + Send;

    /// Runs the JavaScript function expression `mapper` over every element
    /// matching `selector`, in document order, returning its JSON results.
    fn query_all(
        &self,
        selector: &str,
        mapper: &str,
    ) -> impl Future<Output = Result<Vec<serde_json::Value>, ScraperError>> + Send;

    /// Clicks the first match, failing with [`ScraperError::SelectorMismatch`]
    /// when nothing matches.
    fn click(
        &self,
        selector: &str,
        method: ClickMethod,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Types `text` into the first match one key at a time.
    fn type_text(
        &self,
        selector: &str,
        text: &str,
        inter_key_delay: Duration,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    fn scroll(&self, step: ScrollStep) -> impl Future<Output = Result<(), ScraperError>> + Send;
}

/// Encodes `s` as a JavaScript string literal.
pub(crate) fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_owned()).to_string()
}

#[cfg(test)]
pub(crate) mod fake;
