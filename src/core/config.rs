//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.shelf/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::api::DEFAULT_BASE_URL;
use crate::core::deep_link::DEFAULT_SCHEME;
use crate::core::list::{DEFAULT_PAGE_SIZE, FALLBACK_CATEGORIES};
use crate::core::reminders::{self, DEFAULT_LEAD_HOURS, MAX_LEAD_HOURS};
use crate::core::sort::SortOption;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ShelfConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub reminders: RemindersConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ListConfig {
    pub default_sort: Option<SortOption>,
    pub fence_stale_results: Option<bool>,
    pub fallback_categories: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LinksConfig {
    pub scheme: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct RemindersConfig {
    pub enabled: Option<bool>,
    pub lead_hours: Option<i64>,
    pub store_path: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const MAX_PAGE_SIZE: u32 = 100;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub page_size: u32,
    pub timeout: Duration,
    pub default_sort: SortOption,
    pub fence_stale_results: bool,
    pub fallback_categories: Vec<String>,
    pub link_scheme: String,
    pub reminders_enabled: bool,
    pub reminder_lead_hours: i64,
    pub reminder_store_path: PathBuf,
}

/// Values given on the command line. `None` means not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub page_size: Option<u32>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.shelf/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".shelf").join("config.toml"))
}

/// Load config from `~/.shelf/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ShelfConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ShelfConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ShelfConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<ShelfConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(ShelfConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: ShelfConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Shelf Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [api]
# base_url = "https://dummyjson.com"   # Or set SHELF_API_BASE_URL
# page_size = 20                       # Or set SHELF_PAGE_SIZE (1-100)
# timeout_secs = 15

# [list]
# default_sort = "price-asc"           # "price-asc", "price-desc", "rating-asc", "rating-desc"
# fence_stale_results = false          # Drop results of superseded requests
# fallback_categories = ["smartphones", "laptops"]

# [links]
# scheme = "productsapp"               # Or set SHELF_LINK_SCHEME

# [reminders]
# enabled = true
# lead_hours = 24                      # 0-8760
# store_path = "/home/me/.shelf/reminders.json"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ShelfConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &ShelfConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env("SHELF_API_BASE_URL"))
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Page size: CLI → env → config → default, clamped to what the API accepts
    let env_page_size = env("SHELF_PAGE_SIZE").and_then(|v| match v.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("Ignoring SHELF_PAGE_SIZE={:?}: {}", v, e);
            None
        }
    });
    let page_size = cli
        .page_size
        .or(env_page_size)
        .or(config.api.page_size)
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    // Link scheme: env → config → default
    let link_scheme = env("SHELF_LINK_SCHEME")
        .or_else(|| config.links.scheme.clone())
        .unwrap_or_else(|| DEFAULT_SCHEME.to_string());

    let fallback_categories = config
        .list
        .fallback_categories
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| FALLBACK_CATEGORIES.iter().map(|c| c.to_string()).collect());

    let reminder_lead_hours = match config.reminders.lead_hours {
        Some(hours) if !(0..=MAX_LEAD_HOURS).contains(&hours) => {
            let clamped = hours.clamp(0, MAX_LEAD_HOURS);
            warn!("reminders.lead_hours = {} out of range, using {}", hours, clamped);
            clamped
        }
        Some(hours) => hours,
        None => DEFAULT_LEAD_HOURS,
    };

    let reminder_store_path = config
        .reminders
        .store_path
        .clone()
        .or_else(reminders::default_store_path)
        .unwrap_or_else(|| PathBuf::from("reminders.json"));

    ResolvedConfig {
        base_url,
        page_size,
        timeout: Duration::from_secs(config.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        default_sort: config.list.default_sort.unwrap_or_default(),
        fence_stale_results: config.list.fence_stale_results.unwrap_or(false),
        fallback_categories,
        link_scheme,
        reminders_enabled: config.reminders.enabled.unwrap_or(true),
        reminder_lead_hours,
        reminder_store_path,
    }
}
