//! Category listing capture: load, stabilize, extract, normalize.

use std::time::Duration;

use crate::actions::dom_ready;
use crate::adapter::SiteAdapter;
use crate::convergence::{stabilize, ConvergencePolicy, ConvergenceReport};
use crate::error::ScraperError;
use crate::extract::extract_products;
use crate::normalize::{normalize_all, partition, Partitioned};
use crate::session::PageSession;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub convergence: ConvergenceReport,
    pub products: Partitioned,
}

/// Opens `category_url` and captures every product tile once the list has
/// stopped growing.
///
/// # Errors
///
/// Returns [`ScraperError::NavigationTimeout`] if the page does not load
/// within `navigation_timeout`, or any session error raised while scrolling
/// or extracting.
pub async fn capture_listing<S: PageSession>(
    session: &S,
    adapter: &dyn SiteAdapter,
    category_url: &str,
    navigation_timeout: Duration,
    policy: &ConvergencePolicy,
) -> Result<Listing, ScraperError> {
    tracing::info!(url = category_url, "opening category listing");
    session
        .navigate(category_url, dom_ready(navigation_timeout))
        .await?;

    let convergence = stabilize(session, adapter.product_selector(), policy).await?;
    let raw = extract_products(session, adapter).await?;
    let products = partition(normalize_all(
        raw,
        adapter.name_split(),
        adapter.currency_glyph(),
    ));

    tracing::info!(
        sponsored = products.sponsored.len(),
        organic = products.organic.len(),
        "listing captured"
    );
    Ok(Listing {
        convergence,
        products,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use shelfwatch_core::{assemble, Ad, Demographic, Platform, SelectorOverrides};

    use super::*;
    use crate::adapter::adapter_for;
    use crate::convergence::ConvergenceOutcome;
    use crate::session::fake::{Call, FakeSession};
    use crate::session::WaitPolicy;

    fn policy() -> ConvergencePolicy {
        ConvergencePolicy {
            scroll_delay: Duration::ZERO,
            max_no_change_rounds: 2,
            max_rounds: None,
        }
    }

    #[tokio::test]
    async fn captures_partitions_and_assembles() {
        let adapter = adapter_for(Platform::BigBasket, &SelectorOverrides::default());
        let session = FakeSession::new().with_counts(&[1, 2, 2]).with_query(
            adapter.product_selector(),
            vec![
                json!({
                    "name": "Aashirvaad\nWhole Wheat Atta",
                    "currentPrice": "₹90",
                    "originalPrice": "₹100",
                    "stockTexts": [null],
                    "sponsorText": null
                }),
                json!({
                    "name": "Fortune\nChakki Atta",
                    "currentPrice": "₹50",
                    "originalPrice": "",
                    "stockTexts": [null],
                    "sponsorText": "Sponsored"
                }),
            ],
        );

        let listing = capture_listing(
            &session,
            adapter.as_ref(),
            "https://www.bigbasket.com/pc/foodgrains-oil-masala/atta-flours-sooji/",
            Duration::from_secs(60),
            &policy(),
        )
        .await
        .unwrap();

        assert_eq!(listing.convergence.final_count, 2);
        assert_eq!(listing.convergence.outcome, ConvergenceOutcome::Stable);
        assert_eq!(
            session.calls()[0],
            Call::Navigate {
                url: "https://www.bigbasket.com/pc/foodgrains-oil-masala/atta-flours-sooji/"
                    .to_owned(),
                wait: WaitPolicy::DomContentLoaded,
                timeout_ms: 60_000,
            }
        );

        let mut demographic = Demographic::new();
        demographic.insert("age".to_owned(), json!("25-34"));
        let snapshot = assemble(
            "bigbasket",
            "atta",
            "560001",
            demographic,
            vec![Ad::banner(
                "Flat 50% off Atta".to_owned(),
                "https://www.bbassets.com/media/uploads/banner_images/a.jpg".to_owned(),
            )],
            listing.products.sponsored,
            listing.products.organic,
        );
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(
            value["data"]["products"],
            json!([{
                "productName": "Whole Wheat Atta",
                "brandName": "Aashirvaad",
                "price": "90",
                "discount": "10%",
                "stock": "In Stock"
            }])
        );
        assert_eq!(value["data"]["ads"][0]["type"], "banner");
        assert_eq!(
            value["data"]["ads"][1],
            json!({
                "productName": "Chakki Atta",
                "brandName": "Fortune",
                "price": "50",
                "discount": "0%",
                "stock": "In Stock",
                "sponsored": true
            })
        );
    }

    #[tokio::test]
    async fn empty_listing_yields_empty_partitions() {
        let adapter = adapter_for(Platform::Blinkit, &SelectorOverrides::default());
        let session = FakeSession::new().with_counts(&[0]);
        let listing = capture_listing(
            &session,
            adapter.as_ref(),
            "https://www.blinkit.com/cn/atta/cid/1/2",
            Duration::from_secs(60),
            &policy(),
        )
        .await
        .unwrap();

        assert_eq!(listing.convergence.rounds, 2);
        assert!(listing.products.sponsored.is_empty());
        assert!(listing.products.organic.is_empty());
    }
}
