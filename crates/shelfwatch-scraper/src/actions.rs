//! Page interactions performed before any extraction.

use std::time::Duration;

use crate::adapter::SiteAdapter;
use crate::error::ScraperError;
use crate::session::{ClickMethod, NavigateOptions, PageSession, WaitOptions, WaitPolicy};

/// Waits for DOM content with `timeout`.
#[must_use]
pub fn dom_ready(timeout: Duration) -> NavigateOptions {
    NavigateOptions {
        wait: WaitPolicy::DomContentLoaded,
        timeout,
    }
}

/// Opens the site's landing page.
///
/// # Errors
///
/// Returns [`ScraperError::NavigationTimeout`] if the document is not ready
/// within `timeout`.
pub async fn navigate_home<S: PageSession>(
    session: &S,
    adapter: &dyn SiteAdapter,
    timeout: Duration,
) -> Result<(), ScraperError> {
    let url = adapter.home_url();
    tracing::info!(url, platform = %adapter.platform(), "opening home page");
    session.navigate(url, dom_ready(timeout)).await
}

/// Sets the delivery location by typing `pincode` and picking the first
/// suggestion.
///
/// # Errors
///
/// Returns [`ScraperError::NavigationTimeout`] if a location control does not
/// appear within `element_timeout`, or [`ScraperError::SelectorMismatch`] if
/// it disappears before it can be clicked.
pub async fn set_pincode<S: PageSession>(
    session: &S,
    adapter: &dyn SiteAdapter,
    pincode: &str,
    element_timeout: Duration,
) -> Result<(), ScraperError> {
    let probes = adapter.location();
    let present = WaitOptions {
        visible: false,
        timeout: element_timeout,
    };
    let visible = WaitOptions {
        visible: true,
        timeout: element_timeout,
    };

    if let Some(opener) = probes.opener {
        session.wait_for_element(opener, present).await?;
        session.click(opener, ClickMethod::Script).await?;
    }

    session.wait_for_element(probes.input, visible).await?;
    session.click(probes.input, ClickMethod::Pointer).await?;
    session
        .type_text(probes.input, pincode, probes.key_delay)
        .await?;

    session.wait_for_element(probes.suggestion, visible).await?;
    session.click(probes.suggestion, ClickMethod::Pointer).await?;

    tracing::info!(pincode, "delivery location set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use shelfwatch_core::{Platform, SelectorOverrides};

    use super::*;
    use crate::adapter::adapter_for;
    use crate::session::fake::{Call, FakeSession};

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn navigate_home_opens_site_root() {
        let adapter = adapter_for(Platform::Blinkit, &SelectorOverrides::default());
        let session = FakeSession::new();
        navigate_home(&session, adapter.as_ref(), TIMEOUT).await.unwrap();
        assert_eq!(
            session.calls(),
            vec![Call::Navigate {
                url: "https://www.blinkit.com".to_owned(),
                wait: WaitPolicy::DomContentLoaded,
                timeout_ms: 30_000,
            }]
        );
    }

    #[tokio::test]
    async fn bigbasket_opens_dropdown_before_typing() {
        let adapter = adapter_for(Platform::BigBasket, &SelectorOverrides::default());
        let session = FakeSession::new();
        set_pincode(&session, adapter.as_ref(), "560001", TIMEOUT)
            .await
            .unwrap();

        let probes = adapter.location();
        let opener = probes.opener.unwrap().to_owned();
        let calls = session.calls();
        assert_eq!(
            calls[..2],
            [
                Call::Wait {
                    selector: opener.clone(),
                    visible: false
                },
                Call::Click(opener, ClickMethod::Script),
            ]
        );
        assert!(calls.contains(&Call::Type {
            selector: probes.input.to_owned(),
            text: "560001".to_owned(),
            delay_ms: 100,
        }));
        assert_eq!(
            calls.last(),
            Some(&Call::Click(
                probes.suggestion.to_owned(),
                ClickMethod::Pointer
            ))
        );
    }

    #[tokio::test]
    async fn blinkit_types_directly_with_slower_keys() {
        let adapter = adapter_for(Platform::Blinkit, &SelectorOverrides::default());
        let session = FakeSession::new();
        set_pincode(&session, adapter.as_ref(), "110001", TIMEOUT)
            .await
            .unwrap();

        let probes = adapter.location();
        let calls = session.calls();
        assert_eq!(
            calls[0],
            Call::Wait {
                selector: probes.input.to_owned(),
                visible: true
            }
        );
        assert!(calls.contains(&Call::Type {
            selector: probes.input.to_owned(),
            text: "110001".to_owned(),
            delay_ms: 500,
        }));
    }

    #[tokio::test]
    async fn missing_suggestion_times_out() {
        let adapter = adapter_for(Platform::Blinkit, &SelectorOverrides::default());
        let session = FakeSession::new().with_missing(adapter.location().suggestion);
        let err = set_pincode(&session, adapter.as_ref(), "110001", TIMEOUT)
            .await
            .unwrap_err();
        assert!(matches!(err, ScraperError::NavigationTimeout { timeout_ms: 30_000, .. }));
    }
}
