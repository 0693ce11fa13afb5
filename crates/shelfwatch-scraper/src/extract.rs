//! Reads banner images and product tiles out of the live page.
//!
//! The page-side mappers only collect text; every marker comparison happens
//! here so the rules are testable without a browser.

use serde::Deserialize;
use serde_json::json;
use shelfwatch_core::{dedup_candidates, BannerCandidate, RawProductNode, StockStatus};

use crate::adapter::{BannerProbe, PriceProbe, ProductProbes, SiteAdapter};
use crate::error::ScraperError;
use crate::session::{js_string, PageSession, WaitOptions};

const SECURE_SCHEME: &str = "https://";

const IMAGE_MAPPER: &str =
    "function (img) { return { src: img.getAttribute('src'), alt: img.getAttribute('alt') }; }";

/// `src`/`alt` attributes of one `<img>` as read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ImageAttrs {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// Keeps images whose `src` is served over https and carries `marker`, then
/// drops repeated `(src, alt)` pairs.
#[must_use]
pub fn select_banners(images: Vec<ImageAttrs>, marker: &str) -> Vec<BannerCandidate> {
    let candidates = images
        .into_iter()
        .filter_map(|img| {
            let src = img.src?;
            (src.starts_with(SECURE_SCHEME) && src.contains(marker))
                .then(|| BannerCandidate::new(src, img.alt.as_deref()))
        })
        .collect();
    dedup_candidates(candidates)
}

/// Waits for the banner region, then collects its distinct promotional images.
///
/// # Errors
///
/// Returns [`ScraperError::NavigationTimeout`] if no banner image appears
/// within the probe's wait, or a session error from the query.
pub async fn extract_banners<S: PageSession>(
    session: &S,
    probe: &BannerProbe,
) -> Result<Vec<BannerCandidate>, ScraperError> {
    session
        .wait_for_element(
            &probe.selector,
            WaitOptions {
                visible: false,
                timeout: probe.wait_timeout,
            },
        )
        .await?;

    let rows = session.query_all(&probe.selector, IMAGE_MAPPER).await?;
    let images = rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<ImageAttrs>(row).map_err(|e| ScraperError::Deserialize {
                context: format!("banner image under {}", probe.selector),
                source: e,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let seen = images.len();
    let banners = select_banners(images, &probe.marker);
    tracing::info!(seen, kept = banners.len(), "collected banner candidates");
    Ok(banners)
}

/// Text collected from one product tile before interpretation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProbedTile {
    pub name: String,
    pub current_price: String,
    pub original_price: String,
    /// One entry per stock probe; `None` when that control is absent.
    pub stock_texts: Vec<Option<String>>,
    pub sponsor_text: Option<String>,
}

/// Applies the adapter's marker rules to collected tile text.
#[must_use]
pub fn interpret_tile(tile: ProbedTile, probes: &ProductProbes) -> RawProductNode {
    let out_of_stock = tile
        .stock_texts
        .iter()
        .zip(&probes.stock)
        .any(|(text, probe)| text.as_deref().is_some_and(|t| t.contains(probe.marker)));
    let sponsored = tile
        .sponsor_text
        .as_deref()
        .is_some_and(|t| t.contains(probes.sponsor.marker));

    RawProductNode {
        name: tile.name,
        current_price: tile.current_price,
        original_price: tile.original_price,
        stock: if out_of_stock {
            StockStatus::OutOfStock
        } else {
            StockStatus::InStock
        },
        sponsored,
    }
}

/// Builds the page-side function that reads one tile according to `probes`.
#[must_use]
pub fn tile_mapper(probes: &ProductProbes) -> String {
    let price = match &probes.price {
        PriceProbe::Labeled {
            container,
            current,
            original,
        } => json!({
            "kind": "labeled",
            "container": container,
            "current": current,
            "original": original,
        }),
        PriceProbe::Positional { container, row } => json!({
            "kind": "positional",
            "container": container,
            "row": row,
        }),
    };
    let stock: Vec<_> = probes
        .stock
        .iter()
        .map(|p| json!({ "selector": p.selector, "textSelector": p.text_selector }))
        .collect();
    let config = json!({
        "name": probes.name,
        "price": price,
        "stock": stock,
        "sponsor": probes.sponsor.selector,
    });

    format!(
        r"(function (cfg) {{
    function text(node) {{ return node ? (node.innerText || node.textContent || '').trim() : ''; }}
    return function (el) {{
        var current = '', original = '';
        var container = el.querySelector(cfg.price.container);
        if (container) {{
            if (cfg.price.kind === 'labeled') {{
                current = text(container.querySelector(cfg.price.current));
                original = text(container.querySelector(cfg.price.original));
            }} else {{
                var row = container.querySelector(cfg.price.row);
                var cells = row ? row.querySelectorAll('div') : [];
                if (cells.length > 0) current = text(cells[0]);
                if (cells.length > 1) original = text(cells[1]);
            }}
        }}
        var stockTexts = cfg.stock.map(function (probe) {{
            var control = el.querySelector(probe.selector);
            if (!control) return null;
            var target = probe.textSelector ? control.querySelector(probe.textSelector) : control;
            return target ? (target.innerText || '') : '';
        }});
        var tag = el.querySelector(cfg.sponsor);
        return {{
            name: text(el.querySelector(cfg.name)),
            currentPrice: current,
            originalPrice: original,
            stockTexts: stockTexts,
            sponsorText: tag ? (tag.textContent || tag.innerText || '') : null
        }};
    }};
}})(JSON.parse({}))",
        js_string(&config.to_string())
    )
}

/// Reads every product tile currently in the DOM, in document order.
///
/// # Errors
///
/// Returns a session error from the query or [`ScraperError::Deserialize`]
/// if the page returns something other than tile objects.
pub async fn extract_products<S: PageSession>(
    session: &S,
    adapter: &dyn SiteAdapter,
) -> Result<Vec<RawProductNode>, ScraperError> {
    let probes = adapter.product_probes();
    let selector = adapter.product_selector();
    let rows = session.query_all(selector, &tile_mapper(probes)).await?;

    let nodes = rows
        .into_iter()
        .map(|row| {
            serde_json::from_value::<ProbedTile>(row)
                .map(|tile| interpret_tile(tile, probes))
                .map_err(|e| ScraperError::Deserialize {
                    context: format!("product tile under {selector}"),
                    source: e,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!(count = nodes.len(), "extracted product tiles");
    Ok(nodes)
}
