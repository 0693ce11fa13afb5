use std::time::Duration;

use shelfwatch_core::{Platform, SelectorOverrides};

use super::{
    apply_override, BannerProbe, LocationProbes, PriceProbe, ProductProbes, SiteAdapter,
    SponsorProbe, StockProbe,
};
use crate::normalize::{LeadingTokensBrand, NameSplit};

const HOME_URL: &str = "https://www.blinkit.com";
const PRODUCT_SELECTOR: &str = "div[class*='Product__UpdatedPlpProductContainer']";
const BANNER_SELECTOR: &str = ".SaleCouponList__Container-sc-ezdcvs-1.iSokNd img[src]";
const BANNER_MARKER: &str = "cdn.grofers.com";

/// Blinkit titles start with the brand; its first two words are taken as brand.
static BRAND_TOKENS: LeadingTokensBrand = LeadingTokensBrand { tokens: 2 };

/// blinkit.com: prices are unlabelled sibling `div`s.
pub struct Blinkit {
    location: LocationProbes,
    product_selector: String,
    probes: ProductProbes,
    banner: BannerProbe,
}

impl Blinkit {
    #[must_use]
    pub fn new() -> Self {
        Self {
            location: LocationProbes {
                opener: None,
                input: "input[placeholder='search delivery location']",
                suggestion: "div[class*='LocationSearchList__LocationListContainer']",
                key_delay: Duration::from_millis(500),
            },
            product_selector: PRODUCT_SELECTOR.to_owned(),
            probes: ProductProbes {
                name: "div[class*='Product__UpdatedTitle']",
                price: PriceProbe::Positional {
                    container: "div[class*='Product__UpdatedPriceAndAtcContainer']",
                    row: ":scope > div",
                },
                stock: vec![
                    StockProbe {
                        selector: "div[class*='AddToCart__UpdatedOutOfStockTag']",
                        text_selector: Some("span"),
                        marker: "Out of Stock",
                    },
                    StockProbe {
                        selector: "button[class*='CtaOnDeck___StyledNotifyMeButton']",
                        text_selector: None,
                        marker: "Notify Me",
                    },
                ],
                sponsor: SponsorProbe {
                    selector: "div[class*='ProductTagstyles__Container']",
                    marker: "Ad",
                },
            },
            banner: BannerProbe {
                selector: BANNER_SELECTOR.to_owned(),
                marker: BANNER_MARKER.to_owned(),
                wait_timeout: Duration::from_secs(10),
            },
        }
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &SelectorOverrides) -> Self {
        apply_override(&mut self.product_selector, overrides.product.as_ref());
        apply_override(&mut self.banner.selector, overrides.banner.as_ref());
        apply_override(&mut self.banner.marker, overrides.banner_marker.as_ref());
        self
    }
}

impl Default for Blinkit {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for Blinkit {
    fn platform(&self) -> Platform {
        Platform::Blinkit
    }

    fn home_url(&self) -> &str {
        HOME_URL
    }

    fn location(&self) -> &LocationProbes {
        &self.location
    }

    fn product_selector(&self) -> &str {
        &self.product_selector
    }

    fn product_probes(&self) -> &ProductProbes {
        &self.probes
    }

    fn banner(&self) -> &BannerProbe {
        &self.banner
    }

    fn name_split(&self) -> &dyn NameSplit {
        &BRAND_TOKENS
    }
}
