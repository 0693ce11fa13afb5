//! [`PageSession`] backed by a Chromium tab over the DevTools protocol.

use std::time::{Duration, Instant};

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::NavigateParams;
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::{
    js_string, ClickMethod, NavigateOptions, PageSession, ScrollStep, WaitOptions, WaitPolicy,
};
use crate::error::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Marker set on the outgoing document so a DOM-content-loaded wait does not
/// observe the previous page's `readyState`.
const STALE_MARKER: &str = "__shelfwatchStale";

#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub headless: bool,
    pub user_agent: String,
}

/// One Chromium process with a single tab.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches Chromium and opens a blank tab.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] if the browser cannot be started and
    /// [`ScraperError::Cdp`] if the tab cannot be opened.
    pub async fn launch(opts: &LaunchOptions) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-setuid-sandbox")
            .arg("--disable-gpu")
            .arg("--lang=en-US")
            .arg(format!("--user-agent={}", opts.user_agent));
        if !opts.headless {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(ScraperError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScraperError::Launch(e.to_string()))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = browser.new_page("about:blank").await?;
        tracing::debug!(headless = opts.headless, "browser session ready");

        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    /// Closes the browser and stops the protocol handler.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Cdp`] if the browser rejects the close command.
    pub async fn close(mut self) -> Result<(), ScraperError> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::warn!(error = %e, "browser process did not exit cleanly");
        }
        self.handler.abort();
        closed.map(|_| ()).map_err(ScraperError::from)
    }

    async fn eval_json(&self, expression: String) -> Result<serde_json::Value, ScraperError> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .await_promise(true)
            .build()
            .map_err(ScraperError::Cdp)?;
        let result = self.page.evaluate_expression(params).await?;
        Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
    }

    /// Polls `predicate` (a boolean JS expression) until it holds.
    ///
    /// Evaluation errors count as "not yet": they occur routinely while a
    /// navigation swaps execution contexts.
    async fn poll_until(
        &self,
        predicate: &str,
        target: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let started = Instant::now();
        loop {
            match self.eval_json(predicate.to_owned()).await {
                Ok(serde_json::Value::Bool(true)) => return Ok(()),
                Ok(_) => {}
                Err(e) => tracing::trace!(error = %e, waiting_for = target, "poll evaluation failed"),
            }
            if started.elapsed() >= timeout {
                return Err(ScraperError::NavigationTimeout {
                    target: target.to_owned(),
                    timeout_ms: millis(timeout),
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

impl PageSession for ChromiumSession {
    async fn navigate(&self, url: &str, opts: NavigateOptions) -> Result<(), ScraperError> {
        let navigation = async {
            self.eval_json(format!("window.{STALE_MARKER} = true")).await?;
            self.page.execute(NavigateParams::new(url)).await?;
            self.poll_until(&ready_predicate(opts.wait), url, opts.timeout)
                .await
        };

        match tokio::time::timeout(opts.timeout, navigation).await {
            Ok(result) => result,
            Err(_) => Err(ScraperError::NavigationTimeout {
                target: url.to_owned(),
                timeout_ms: millis(opts.timeout),
            }),
        }
    }

    async fn wait_for_element(&self, selector: &str, opts: WaitOptions) -> Result<(), ScraperError> {
        let predicate = format!(
            r"(function(sel, visible) {{
                var el = document.querySelector(sel);
                if (!el) return false;
                if (!visible) return true;
                var style = window.getComputedStyle(el);
                var rect = el.getBoundingClientRect();
                return style.visibility !== 'hidden' && style.display !== 'none'
                    && (rect.width > 0 || rect.height > 0);
            }})({}, {})",
            js_string(selector),
            opts.visible
        );
        self.poll_until(&predicate, selector, opts.timeout).await
    }

    async fn count(&self, selector: &str) -> Result<usize, ScraperError> {
        let value = self
            .eval_json(format!(
                "document.querySelectorAll({}).length",
                js_string(selector)
            ))
            .await?;
        serde_json::from_value(value).map_err(|e| ScraperError::Deserialize {
            context: format!("element count for {selector}"),
            source: e,
        })
    }

    async fn query_all(
        &self,
        selector: &str,
        mapper: &str,
    ) -> Result<Vec<serde_json::Value>, ScraperError> {
        let value = self
            .eval_json(format!(
                "Array.from(document.querySelectorAll({})).map({mapper})",
                js_string(selector)
            ))
            .await?;
        serde_json::from_value(value).map_err(|e| ScraperError::Deserialize {
            context: format!("query results for {selector}"),
            source: e,
        })
    }

    async fn click(&self, selector: &str, method: ClickMethod) -> Result<(), ScraperError> {
        match method {
            ClickMethod::Pointer => {
                let element = self.page.find_element(selector).await.map_err(|_| {
                    ScraperError::SelectorMismatch {
                        selector: selector.to_owned(),
                    }
                })?;
                element.click().await?;
                Ok(())
            }
            ClickMethod::Script => {
                let clicked = self
                    .eval_json(format!(
                        "(function(sel) {{ var el = document.querySelector(sel); if (!el) return false; el.click(); return true; }})({})",
                        js_string(selector)
                    ))
                    .await?;
                if clicked == serde_json::Value::Bool(true) {
                    Ok(())
                } else {
                    Err(ScraperError::SelectorMismatch {
                        selector: selector.to_owned(),
                    })
                }
            }
        }
    }

    async fn type_text(
        &self,
        selector: &str,
        text: &str,
        inter_key_delay: Duration,
    ) -> Result<(), ScraperError> {
        let element = self.page.find_element(selector).await.map_err(|_| {
            ScraperError::SelectorMismatch {
                selector: selector.to_owned(),
            }
        })?;
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            element.type_str(ch.encode_utf8(&mut buf)).await?;
            if !inter_key_delay.is_zero() {
                tokio::time::sleep(inter_key_delay).await;
            }
        }
        Ok(())
    }

    async fn scroll(&self, step: ScrollStep) -> Result<(), ScraperError> {
        self.eval_json(scroll_script(step)).await?;
        Ok(())
    }
}

/// True once the new document has reached the lifecycle point `wait`.
fn ready_predicate(wait: WaitPolicy) -> String {
    let ready = match wait {
        WaitPolicy::DomContentLoaded => "document.readyState !== 'loading'",
        WaitPolicy::Load => "document.readyState === 'complete'",
    };
    format!("(function() {{ return !window.{STALE_MARKER} && {ready}; }})()")
}

fn scroll_script(step: ScrollStep) -> String {
    match step {
        ScrollStep::Viewport => "window.scrollBy(0, window.innerHeight)".to_owned(),
        ScrollStep::Pixels(dy) => format!("window.scrollBy(0, {dy})"),
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
