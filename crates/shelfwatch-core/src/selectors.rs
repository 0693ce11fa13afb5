use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Per-run replacements for a site adapter's default selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorOverrides {
    /// CSS selector matching one product tile.
    pub product: Option<String>,
    /// CSS selector matching banner `<img>` elements.
    pub banner: Option<String>,
    /// Substring a banner `src` must contain to be kept.
    pub banner_marker: Option<String>,
}

/// Load and validate selector overrides from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or contains an
/// empty selector.
pub fn load_selector_overrides(path: &Path) -> Result<SelectorOverrides, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SelectorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_selector_overrides(&content)
}

fn parse_selector_overrides(content: &str) -> Result<SelectorOverrides, ConfigError> {
    // An empty document deserializes as unit, not as a struct.
    if content.trim().is_empty() {
        return Ok(SelectorOverrides::default());
    }

    let overrides: SelectorOverrides = serde_yaml::from_str(content)?;
    validate_overrides(&overrides)?;
    Ok(overrides)
}

fn validate_overrides(overrides: &SelectorOverrides) -> Result<(), ConfigError> {
    let fields = [
        ("product", &overrides.product),
        ("banner", &overrides.banner),
        ("banner_marker", &overrides.banner_marker),
    ];

    for (name, value) in fields {
        if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(ConfigError::MalformedConfig {
                var: "SHELFWATCH_SELECTORS_PATH".to_string(),
                reason: format!("selector '{name}' must be non-empty when present"),
            });
        }
    }

    Ok(())
}
