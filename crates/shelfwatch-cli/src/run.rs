//! One end-to-end capture: home page, pincode, banners, listing, snapshot.

use std::time::Duration;

use anyhow::Context;
use shelfwatch_core::{assemble, load_selector_overrides, AppConfig, SelectorOverrides, Snapshot};
use shelfwatch_ocr::{
    BannerOcr, BitmapNormalizer, GrayscaleNormalizer, HttpImageSource, ImageSource, TesseractCli,
    TextRecognizer,
};
use shelfwatch_scraper::{
    adapter_for, capture_listing, extract_banners, navigate_home, set_pincode, ChromiumSession,
    ConvergencePolicy, LaunchOptions, PageSession, SiteAdapter,
};

use crate::output::write_snapshot;

/// Captures a snapshot for `config` and writes it to `config.output_path`.
///
/// The browser is closed whether or not the capture succeeds; nothing is
/// written when it fails.
pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let overrides = match &config.selectors_path {
        Some(path) => load_selector_overrides(path)
            .with_context(|| format!("loading selector overrides from {}", path.display()))?,
        None => SelectorOverrides::default(),
    };
    let adapter = adapter_for(config.platform, &overrides);

    let source = HttpImageSource::new(
        config.ocr.fetch_timeout_secs,
        &config.user_agent,
        config.ocr.fetch_max_retries,
        config.ocr.fetch_backoff_base_ms,
    )
    .context("building image fetch client")?;
    let ocr = BannerOcr::new(
        source,
        GrayscaleNormalizer {
            target_width: config.ocr.target_width,
        },
        TesseractCli::new(&config.ocr.language),
    )
    .with_concurrency(config.ocr.concurrency)
    .with_skip_failed(config.ocr.skip_failed);

    tracing::info!(
        platform = %config.platform,
        category = %config.category,
        pincode = %config.pincode,
        "starting capture"
    );
    let session = ChromiumSession::launch(&LaunchOptions {
        headless: config.headless,
        user_agent: config.user_agent.clone(),
    })
    .await
    .context("launching browser")?;

    let captured = capture(&session, adapter.as_ref(), &ocr, config).await;
    if let Err(e) = session.close().await {
        tracing::warn!(error = %e, "browser did not close cleanly");
    }
    let snapshot = captured?;

    write_snapshot(&config.output_path, &snapshot)?;
    tracing::info!(
        ads = snapshot.data.ads.len(),
        products = snapshot.data.products.len(),
        "capture complete"
    );
    Ok(())
}

fn convergence_policy(config: &AppConfig) -> ConvergencePolicy {
    ConvergencePolicy {
        scroll_delay: Duration::from_millis(config.scroll_delay_ms),
        max_no_change_rounds: config.max_no_change_rounds,
        max_rounds: config.max_scroll_rounds,
    }
}

/// Drives `session` through the full capture and assembles the snapshot.
pub(crate) async fn capture<S, F, N, R>(
    session: &S,
    adapter: &dyn SiteAdapter,
    ocr: &BannerOcr<F, N, R>,
    config: &AppConfig,
) -> anyhow::Result<Snapshot>
where
    S: PageSession,
    F: ImageSource,
    N: BitmapNormalizer + 'static,
    R: TextRecognizer,
{
    let navigation_timeout = Duration::from_millis(config.navigation_timeout_ms);
    let element_timeout = Duration::from_millis(config.element_timeout_ms);

    navigate_home(session, adapter, navigation_timeout)
        .await
        .context("opening home page")?;
    set_pincode(session, adapter, &config.pincode, element_timeout)
        .await
        .context("setting delivery pincode")?;

    let banners = extract_banners(session, adapter.banner())
        .await
        .context("collecting banner images")?;
    let ads = ocr
        .resolve_ads(banners)
        .await
        .context("reading banner text")?;

    let listing = capture_listing(
        session,
        adapter,
        &config.category_url,
        navigation_timeout,
        &convergence_policy(config),
    )
    .await
    .context("capturing category listing")?;

    Ok(assemble(
        config.platform.as_str(),
        &config.category,
        &config.pincode,
        config.demographic.clone(),
        ads,
        listing.products.sponsored,
        listing.products.organic,
    ))
}

#[cfg(test)]
#[path = "run_test.rs"]
mod tests;
