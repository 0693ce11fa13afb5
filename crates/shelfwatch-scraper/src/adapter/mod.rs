//! Site-specific selector adapters.
//!
//! Each supported site supplies the same capability set: how to reach the
//! pincode input, which nodes are product tiles, how to read fields out of a
//! tile, and where banner images live. The variant is chosen once from
//! configuration via [`adapter_for`].

mod bigbasket;
mod blinkit;

use std::time::Duration;

use shelfwatch_core::{Platform, SelectorOverrides};

use crate::normalize::NameSplit;

pub use bigbasket::BigBasket;
pub use blinkit::Blinkit;

/// Glyph stripped from price text on every supported site.
pub const RUPEE: char = '₹';

/// Elements involved in choosing a delivery location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationProbes {
    /// Control that must be clicked before the input appears, if any.
    pub opener: Option<&'static str>,
    pub input: &'static str,
    /// First suggestion row shown after typing.
    pub suggestion: &'static str,
    pub key_delay: Duration,
}

/// Where the current and original prices sit inside a tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceProbe {
    /// Both prices carry their own identifying selector.
    Labeled {
        container: &'static str,
        current: &'static str,
        original: &'static str,
    },
    /// Prices are the first and second `div` under `row` inside `container`.
    Positional {
        container: &'static str,
        row: &'static str,
    },
}

/// A control whose text marks the product as out of stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockProbe {
    pub selector: &'static str,
    /// Descendant of `selector` holding the text; `None` reads the control itself.
    pub text_selector: Option<&'static str>,
    /// Phrase the text must contain; presence of the control alone is not enough.
    pub marker: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorProbe {
    pub selector: &'static str,
    pub marker: &'static str,
}

/// Field probes run against each product tile, relative to the tile root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductProbes {
    pub name: &'static str,
    pub price: PriceProbe,
    /// Checked in order; any match flips the tile to out of stock.
    pub stock: Vec<StockProbe>,
    pub sponsor: SponsorProbe,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerProbe {
    /// Selector matching banner `<img>` elements.
    pub selector: String,
    /// Substring a banner `src` must contain.
    pub marker: String,
    pub wait_timeout: Duration,
}

pub trait SiteAdapter: Send + Sync {
    fn platform(&self) -> Platform;

    fn home_url(&self) -> &str;

    fn location(&self) -> &LocationProbes;

    /// Selector matching one product tile on a category listing.
    fn product_selector(&self) -> &str;

    fn product_probes(&self) -> &ProductProbes;

    fn banner(&self) -> &BannerProbe;

    /// How this site's rendered heading separates brand from title.
    fn name_split(&self) -> &dyn NameSplit;

    fn currency_glyph(&self) -> char {
        RUPEE
    }
}

/// Builds the adapter for `platform`, applying any operator overrides.
#[must_use]
pub fn adapter_for(platform: Platform, overrides: &SelectorOverrides) -> Box<dyn SiteAdapter> {
    match platform {
        Platform::BigBasket => Box::new(BigBasket::new().with_overrides(overrides)),
        Platform::Blinkit => Box::new(Blinkit::new().with_overrides(overrides)),
    }
}

/// Replaces `slot` when `value` is set.
pub(crate) fn apply_override(slot: &mut String, value: Option<&String>) {
    if let Some(v) = value {
        slot.clone_from(v);
    }
}
