//! Banner OCR: turns promotional images into text ads.
//!
//! Each banner is fetched over HTTP, normalized to a high-contrast grayscale
//! bitmap, run through a text recognizer, and reduced to readable ad copy.

pub mod bitmap;
pub mod clean;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod recognize;

mod retry;

pub use bitmap::{BitmapNormalizer, GrayscaleNormalizer};
pub use clean::clean_text;
pub use error::OcrError;
pub use fetch::{HttpImageSource, ImageSource};
pub use pipeline::BannerOcr;
pub use recognize::{TesseractCli, TextRecognizer};
