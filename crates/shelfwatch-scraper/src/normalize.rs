//! Conversion from raw tile text to site-independent product records.
//!
//! Normalization never fails: malformed prices yield a `"0%"` discount and
//! missing name lines yield empty strings.

use shelfwatch_core::{CanonicalProduct, Product, RawProductNode};

/// Splits a rendered product heading into `(brand, product name)`.
pub trait NameSplit: Send + Sync {
    fn split(&self, raw: &str) -> (String, String);
}

/// Brand on the first line, product name on the second. Later lines are
/// ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLineBrand;

impl NameSplit for FirstLineBrand {
    fn split(&self, raw: &str) -> (String, String) {
        match raw.split_once('\n') {
            Some((brand, rest)) => {
                let name = rest.split('\n').next().unwrap_or_default();
                (brand.trim().to_owned(), name.trim().to_owned())
            }
            None => (raw.trim().to_owned(), String::new()),
        }
    }
}

/// Product name is the first line; brand is its first `tokens` words.
#[derive(Debug, Clone, Copy)]
pub struct LeadingTokensBrand {
    pub tokens: usize,
}

impl NameSplit for LeadingTokensBrand {
    fn split(&self, raw: &str) -> (String, String) {
        let name = raw.split('\n').next().unwrap_or_default().trim().to_owned();
        let brand = raw
            .split_whitespace()
            .take(self.tokens)
            .collect::<Vec<_>>()
            .join(" ");
        (brand, name)
    }
}

/// Removes the first occurrence of `glyph` and nothing else.
#[must_use]
pub fn strip_currency(text: &str, glyph: char) -> String {
    text.replacen(glyph, "", 1)
}

/// Parses a stripped price as a finite number.
fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds half toward positive infinity.
#[allow(clippy::cast_possible_truncation)]
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Percentage markdown from `original` to `current`, e.g. `"10%"`.
///
/// Returns `"0%"` unless both parse and `original` is positive. A current
/// price above the original yields a negative percentage.
#[must_use]
pub fn compute_discount(current: &str, original: &str) -> String {
    match (parse_amount(current), parse_amount(original)) {
        (Some(cur), Some(orig)) if orig > 0.0 => {
            format!("{}%", round_half_up((orig - cur) / orig * 100.0))
        }
        _ => "0%".to_owned(),
    }
}

/// Normalizes one tile.
#[must_use]
pub fn normalize_product(raw: RawProductNode, split: &dyn NameSplit, glyph: char) -> CanonicalProduct {
    let (brand_name, product_name) = split.split(&raw.name);
    let price = strip_currency(&raw.current_price, glyph);
    let original = strip_currency(&raw.original_price, glyph);
    let discount = compute_discount(&price, &original);

    CanonicalProduct {
        product: Product {
            product_name,
            brand_name,
            price,
            discount,
            stock: raw.stock,
        },
        sponsored: raw.sponsored,
    }
}

/// Normalizes every tile, preserving order.
#[must_use]
pub fn normalize_all(
    raw: Vec<RawProductNode>,
    split: &dyn NameSplit,
    glyph: char,
) -> Vec<CanonicalProduct> {
    raw.into_iter()
        .map(|node| normalize_product(node, split, glyph))
        .collect()
}

/// Products separated by sponsorship, each side in original order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    /// Keep their sponsorship flag; destined for `data.ads`.
    pub sponsored: Vec<CanonicalProduct>,
    pub organic: Vec<Product>,
}

#[must_use]
pub fn partition(products: Vec<CanonicalProduct>) -> Partitioned {
    let mut out = Partitioned::default();
    for product in products {
        if product.sponsored {
            out.sponsored.push(product);
        } else {
            out.organic.push(product.into_product());
        }
    }
    out
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
