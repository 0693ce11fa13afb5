//! Banner-to-ad resolution: fetch, normalize, recognize, clean.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use shelfwatch_core::{Ad, BannerCandidate};

use crate::bitmap::BitmapNormalizer;
use crate::clean::clean_text;
use crate::error::OcrError;
use crate::fetch::ImageSource;
use crate::recognize::TextRecognizer;

/// Turns deduplicated banner candidates into [`Ad`]s, one per candidate and
/// in candidate order.
///
/// Up to `concurrency` banners are in flight at once; results are still
/// yielded in input order. Bitmap normalization runs on the blocking pool.
pub struct BannerOcr<F, N, R> {
    source: F,
    normalizer: Arc<N>,
    recognizer: R,
    concurrency: usize,
    skip_failed: bool,
}

impl<F, N, R> BannerOcr<F, N, R>
where
    F: ImageSource,
    N: BitmapNormalizer + 'static,
    R: TextRecognizer,
{
    /// Sequential, aborting on the first fetch or decode failure.
    pub fn new(source: F, normalizer: N, recognizer: R) -> Self {
        Self {
            source,
            normalizer: Arc::new(normalizer),
            recognizer,
            concurrency: 1,
            skip_failed: false,
        }
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Drop banners whose image cannot be fetched or decoded instead of
    /// failing the whole batch.
    #[must_use]
    pub fn with_skip_failed(mut self, skip_failed: bool) -> Self {
        self.skip_failed = skip_failed;
        self
    }

    /// # Errors
    ///
    /// Returns the first fetch or image decode error unless `skip_failed` is
    /// set, and [`OcrError::EngineUnavailable`] if the recognizer cannot run
    /// at all. Recognition failures on a single bitmap yield empty content.
    pub async fn resolve_ads(&self, banners: Vec<BannerCandidate>) -> Result<Vec<Ad>, OcrError> {
        let total = banners.len();
        let mut results = stream::iter(banners.into_iter().enumerate())
            .map(|(index, banner)| async move {
                let result = self.decode(index, &banner).await;
                (index, banner, result)
            })
            .buffered(self.concurrency);

        let mut ads = Vec::with_capacity(total);
        while let Some((index, banner, result)) = results.next().await {
            match result {
                Ok(ad) => ads.push(ad),
                Err(e @ OcrError::EngineUnavailable { .. }) => return Err(e),
                Err(e) if self.skip_failed => {
                    tracing::warn!(index, src = %banner.src, error = %e, "skipping banner");
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(banners = total, ads = ads.len(), "banner OCR complete");
        Ok(ads)
    }

    async fn decode(&self, index: usize, banner: &BannerCandidate) -> Result<Ad, OcrError> {
        let bytes = self.source.fetch(&banner.src).await?;
        let normalizer = Arc::clone(&self.normalizer);
        let bitmap = tokio::task::spawn_blocking(move || normalizer.normalize(&bytes)).await??;

        let raw = match self.recognizer.recognize(bitmap).await {
            Ok(text) => text,
            Err(OcrError::Recognition(reason)) => {
                tracing::warn!(
                    index,
                    src = %banner.src,
                    reason = %reason,
                    "recognition failed, using empty content"
                );
                String::new()
            }
            Err(e) => return Err(e),
        };

        let content = clean_text(&raw);
        tracing::debug!(index, src = %banner.src, chars = content.len(), "banner decoded");
        Ok(Ad::banner(content, banner.src.clone()))
    }
}
