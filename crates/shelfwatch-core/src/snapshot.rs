//! Final snapshot document and its assembly.

use serde::{Deserialize, Serialize};

use crate::ads::{Ad, AdEntry};
use crate::products::{CanonicalProduct, Product};

/// Free-form demographic attributes copied verbatim into the snapshot.
pub type Demographic = serde_json::Map<String, serde_json::Value>;

/// One run's output for a (platform, category, pincode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub platform: String,
    pub category: String,
    /// Delivery pincode the listing was captured for.
    pub location: String,
    pub demographic: Demographic,
    pub data: SnapshotData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotData {
    /// Banner ads first, then sponsored products in discovery order.
    pub ads: Vec<AdEntry>,
    pub products: Vec<Product>,
}

/// Builds the snapshot, appending sponsored products to the banner ads.
///
/// Sponsored products keep their product shape (including `sponsored`) inside
/// `data.ads`; they are not converted to banner ads.
#[must_use]
pub fn assemble(
    platform: &str,
    category: &str,
    location: &str,
    demographic: Demographic,
    ads: Vec<Ad>,
    sponsored: Vec<CanonicalProduct>,
    organic: Vec<Product>,
) -> Snapshot {
    let mut entries: Vec<AdEntry> = Vec::with_capacity(ads.len() + sponsored.len());
    entries.extend(ads.into_iter().map(AdEntry::Banner));
    entries.extend(sponsored.into_iter().map(AdEntry::SponsoredProduct));

    Snapshot {
        platform: platform.to_owned(),
        category: category.to_owned(),
        location: location.to_owned(),
        demographic,
        data: SnapshotData {
            ads: entries,
            products: organic,
        },
    }
}
