//! Browser-driven capture of grocery category listings and banner images.

pub mod actions;
pub mod adapter;
pub mod convergence;
pub mod error;
pub mod extract;
pub mod listing;
pub mod normalize;
pub mod session;

pub use actions::{navigate_home, set_pincode};
pub use adapter::{adapter_for, SiteAdapter};
pub use convergence::{stabilize, ConvergenceOutcome, ConvergencePolicy, ConvergenceReport};
pub use error::ScraperError;
pub use extract::{extract_banners, extract_products, select_banners};
pub use listing::{capture_listing, Listing};
pub use normalize::{compute_discount, partition, Partitioned};
pub use session::{ChromiumSession, LaunchOptions, PageSession};
