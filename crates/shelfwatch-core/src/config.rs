use crate::app_config::{AppConfig, OcrSettings, Platform};
use crate::snapshot::Demographic;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36";

/// Load run configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load run configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build run configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
#[allow(clippy::too_many_lines)]
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        match lookup(var) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => Err(ConfigError::MissingEnvVar(var.to_string())),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_flag = |var: &str, default: &str| -> Result<bool, ConfigError> {
        parse_bool(var, &or_default(var, default))
    };

    let platform = parse_platform(&require("PLATFORM")?)?;
    let category = require("CATEGORY")?;
    let category_url = require("CATEGORY_URL")?;
    if !category_url.starts_with("http://") && !category_url.starts_with("https://") {
        return Err(ConfigError::InvalidEnvVar {
            var: "CATEGORY_URL".to_string(),
            reason: format!("expected an absolute http(s) URL, got \"{category_url}\""),
        });
    }
    let pincode = require("NEW_PINCODE")?.trim().to_string();
    let demographic = parse_demographic(&require("DEMOGRAPHY")?)?;

    let log_level = or_default("SHELFWATCH_LOG_LEVEL", "info");
    let output_path = PathBuf::from(or_default("SHELFWATCH_OUTPUT_PATH", "./output.json"));

    let scroll_delay_ms = parse_u64("SHELFWATCH_SCROLL_DELAY_MS", "1500")?;
    let max_no_change_rounds = parse_u32("SHELFWATCH_MAX_NO_CHANGE_ROUNDS", "6")?;
    if max_no_change_rounds == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SHELFWATCH_MAX_NO_CHANGE_ROUNDS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }
    let max_scroll_rounds = match lookup("SHELFWATCH_MAX_SCROLL_ROUNDS") {
        Ok(raw) => Some(
            raw.parse::<u32>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: "SHELFWATCH_MAX_SCROLL_ROUNDS".to_string(),
                    reason: e.to_string(),
                })?,
        ),
        Err(_) => None,
    };

    let navigation_timeout_ms = parse_u64("SHELFWATCH_NAVIGATION_TIMEOUT_MS", "60000")?;
    let element_timeout_ms = parse_u64("SHELFWATCH_ELEMENT_TIMEOUT_MS", "30000")?;
    let headless = parse_flag("SHELFWATCH_HEADLESS", "true")?;
    let user_agent = or_default("SHELFWATCH_USER_AGENT", DEFAULT_USER_AGENT);
    let selectors_path = lookup("SHELFWATCH_SELECTORS_PATH").ok().map(PathBuf::from);

    let ocr = OcrSettings {
        language: or_default("SHELFWATCH_OCR_LANGUAGE", "eng"),
        target_width: parse_u32("SHELFWATCH_OCR_TARGET_WIDTH", "1000")?,
        concurrency: parse_usize("SHELFWATCH_OCR_CONCURRENCY", "1")?.max(1),
        skip_failed: parse_flag("SHELFWATCH_OCR_SKIP_FAILED", "false")?,
        fetch_timeout_secs: parse_u64("SHELFWATCH_FETCH_TIMEOUT_SECS", "30")?,
        fetch_max_retries: parse_u32("SHELFWATCH_FETCH_MAX_RETRIES", "2")?,
        fetch_backoff_base_ms: parse_u64("SHELFWATCH_FETCH_BACKOFF_BASE_MS", "500")?,
    };

    Ok(AppConfig {
        platform,
        category,
        category_url,
        pincode,
        demographic,
        log_level,
        output_path,
        scroll_delay_ms,
        max_no_change_rounds,
        max_scroll_rounds,
        navigation_timeout_ms,
        element_timeout_ms,
        headless,
        user_agent,
        selectors_path,
        ocr,
    })
}

/// Parse a platform name (case-insensitive) into a [`Platform`].
fn parse_platform(s: &str) -> Result<Platform, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "bigbasket" => Ok(Platform::BigBasket),
        "blinkit" => Ok(Platform::Blinkit),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PLATFORM".to_string(),
            reason: format!("unsupported platform \"{other}\"; expected bigbasket or blinkit"),
        }),
    }
}

/// Parse the demographic mapping, which must be a JSON object.
fn parse_demographic(raw: &str) -> Result<Demographic, ConfigError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| ConfigError::MalformedConfig {
            var: "DEMOGRAPHY".to_string(),
            reason: e.to_string(),
        })?;

    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ConfigError::MalformedConfig {
            var: "DEMOGRAPHY".to_string(),
            reason: format!("expected a JSON object, got {other}"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean, got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
