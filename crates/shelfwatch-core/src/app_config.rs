use std::path::PathBuf;

use crate::snapshot::Demographic;

/// Grocery sites with a built-in selector adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    BigBasket,
    Blinkit,
}

impl Platform {
    /// Name written to the snapshot's `platform` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::BigBasket => "bigbasket",
            Platform::Blinkit => "blinkit",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Banner OCR settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Recognition language passed to the OCR engine, e.g. `"eng"`.
    pub language: String,
    /// Width in pixels every banner is resized to before recognition.
    pub target_width: u32,
    /// Banners processed at once; `1` keeps the pipeline strictly sequential.
    pub concurrency: usize,
    /// Skip banners whose fetch or recognition fails instead of aborting the run.
    pub skip_failed: bool,
    pub fetch_timeout_secs: u64,
    pub fetch_max_retries: u32,
    pub fetch_backoff_base_ms: u64,
}

#[derive(Clone)]
pub struct AppConfig {
    pub platform: Platform,
    pub category: String,
    pub category_url: String,
    pub pincode: String,
    pub demographic: Demographic,
    pub log_level: String,
    pub output_path: PathBuf,
    pub scroll_delay_ms: u64,
    pub max_no_change_rounds: u32,
    /// Hard ceiling on convergence rounds; `None` leaves the loop bounded only
    /// by the no-change counter.
    pub max_scroll_rounds: Option<u32>,
    pub navigation_timeout_ms: u64,
    pub element_timeout_ms: u64,
    pub headless: bool,
    pub user_agent: String,
    pub selectors_path: Option<PathBuf>,
    pub ocr: OcrSettings,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Demographic values can describe a real panel member; log keys only.
        let demographic_keys: Vec<&str> = self.demographic.keys().map(String::as_str).collect();
        f.debug_struct("AppConfig")
            .field("platform", &self.platform)
            .field("category", &self.category)
            .field("category_url", &self.category_url)
            .field("pincode", &self.pincode)
            .field("demographic_keys", &demographic_keys)
            .field("log_level", &self.log_level)
            .field("output_path", &self.output_path)
            .field("scroll_delay_ms", &self.scroll_delay_ms)
            .field("max_no_change_rounds", &self.max_no_change_rounds)
            .field("max_scroll_rounds", &self.max_scroll_rounds)
            .field("navigation_timeout_ms", &self.navigation_timeout_ms)
            .field("element_timeout_ms", &self.element_timeout_ms)
            .field("headless", &self.headless)
            .field("user_agent", &self.user_agent)
            .field("selectors_path", &self.selectors_path)
            .field("ocr", &self.ocr)
            .finish()
    }
}
