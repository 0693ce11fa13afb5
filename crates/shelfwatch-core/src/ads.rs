use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::products::CanonicalProduct;

/// Alt text recorded for banner images that carry none.
pub const DEFAULT_ALT_TEXT: &str = "No alt text";

/// A promotional image discovered on the page, before OCR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BannerCandidate {
    /// Absolute `https` image URL.
    pub src: String,
    pub alt: String,
}

impl BannerCandidate {
    /// Builds a candidate, substituting [`DEFAULT_ALT_TEXT`] for a missing or
    /// empty alt attribute.
    #[must_use]
    pub fn new(src: impl Into<String>, alt: Option<&str>) -> Self {
        let alt = match alt {
            Some(a) if !a.is_empty() => a.to_owned(),
            _ => DEFAULT_ALT_TEXT.to_owned(),
        };
        Self {
            src: src.into(),
            alt,
        }
    }
}

/// Keeps the first occurrence of every `(src, alt)` pair, preserving order.
#[must_use]
pub fn dedup_candidates(candidates: Vec<BannerCandidate>) -> Vec<BannerCandidate> {
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(candidates.len());
    candidates
        .into_iter()
        .filter(|c| seen.insert((c.src.clone(), c.alt.clone())))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdKind {
    Banner,
}

/// An OCR-decoded banner, one per deduplicated [`BannerCandidate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ad {
    #[serde(rename = "type")]
    pub kind: AdKind,
    /// Cleaned recognition text; may be empty.
    pub content: String,
    /// The banner's image URL.
    pub link: String,
}

impl Ad {
    #[must_use]
    pub fn banner(content: String, link: String) -> Self {
        Self {
            kind: AdKind::Banner,
            content,
            link,
        }
    }
}

/// One element of `data.ads`.
///
/// Serialized untagged, so banner ads and sponsored products keep their own
/// shapes side by side in the same JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdEntry {
    Banner(Ad),
    SponsoredProduct(CanonicalProduct),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(src: &str, alt: &str) -> BannerCandidate {
        BannerCandidate::new(src, Some(alt))
    }

    #[test]
    fn new_defaults_missing_and_empty_alt() {
        assert_eq!(BannerCandidate::new("https://a", None).alt, DEFAULT_ALT_TEXT);
        assert_eq!(
            BannerCandidate::new("https://a", Some("")).alt,
            DEFAULT_ALT_TEXT
        );
        assert_eq!(BannerCandidate::new("https://a", Some("Sale")).alt, "Sale");
    }

    #[test]
    fn dedup_drops_later_duplicates_of_same_pair() {
        let input = vec![
            candidate("https://cdn/1.jpg", "one"),
            candidate("https://cdn/2.jpg", "two"),
            candidate("https://cdn/1.jpg", "one"),
            candidate("https://cdn/1.jpg", "other alt"),
        ];
        let out = dedup_candidates(input);
        assert_eq!(
            out,
            vec![
                candidate("https://cdn/1.jpg", "one"),
                candidate("https://cdn/2.jpg", "two"),
                candidate("https://cdn/1.jpg", "other alt"),
            ]
        );
    }

    #[test]
    fn dedup_is_idempotent() {
        let input = vec![
            candidate("https://cdn/1.jpg", "a"),
            candidate("https://cdn/1.jpg", "a"),
            candidate("https://cdn/3.jpg", "c"),
        ];
        let once = dedup_candidates(input);
        let twice = dedup_candidates(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn banner_ad_serializes_with_type_key() {
        let ad = Ad::banner("Flat off Atta".to_owned(), "https://cdn/1.jpg".to_owned());
        assert_eq!(
            serde_json::to_value(AdEntry::Banner(ad)).unwrap(),
            serde_json::json!({
                "type": "banner",
                "content": "Flat off Atta",
                "link": "https://cdn/1.jpg"
            })
        );
    }
}
