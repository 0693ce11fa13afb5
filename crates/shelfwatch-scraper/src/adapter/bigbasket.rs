use std::time::Duration;

use shelfwatch_core::{Platform, SelectorOverrides};

use super::{
    apply_override, BannerProbe, LocationProbes, PriceProbe, ProductProbes, SiteAdapter,
    SponsorProbe, StockProbe,
};
use crate::normalize::{FirstLineBrand, NameSplit};

const HOME_URL: &str = "https://www.bigbasket.com";
const PRODUCT_SELECTOR: &str = "li[class*='PaginateItems___StyledLi']";
const BANNER_SELECTOR: &str = "img[src]";
const BANNER_MARKER: &str = "uploads/banner_images/";
const NOTIFY_ME: &str = "button[class*='CtaOnDeck___StyledNotifyMeButton']";

/// bigbasket.com: headings render the brand on the first line.
pub struct BigBasket {
    location: LocationProbes,
    product_selector: String,
    probes: ProductProbes,
    banner: BannerProbe,
}

impl BigBasket {
    #[must_use]
    pub fn new() -> Self {
        Self {
            location: LocationProbes {
                opener: Some("button[class*='AddressDropdown___StyledMenuButton']"),
                input: "input[placeholder='Search for area or street name']",
                suggestion: "li[class*='AddressDropdown___StyledMenuItem']",
                key_delay: Duration::from_millis(100),
            },
            product_selector: PRODUCT_SELECTOR.to_owned(),
            probes: ProductProbes {
                name: "h3",
                price: PriceProbe::Labeled {
                    container: "div[class*='Pricing___StyledDiv']",
                    current: "span[class*='Pricing___StyledLabel-']",
                    original: "span[class*='Pricing___StyledLabel2-']",
                },
                stock: vec![StockProbe {
                    selector: NOTIFY_ME,
                    text_selector: None,
                    marker: "Notify Me",
                }],
                sponsor: SponsorProbe {
                    selector: "span[class*='CitrusAd___StyledTags']",
                    marker: "Sponsored",
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

impl Default for BigBasket {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteAdapter for BigBasket {
    fn platform(&self) -> Platform {
        Platform::BigBasket
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
        &FirstLineBrand
    }
}
