use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{IncliError, Result};

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.incident.io";

/// Default number of records requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Command-line client for the incident.io API
#[derive(Parser, Debug, Clone)]
#[command(
    name = "incli",
    about = "Command-line client for the incident.io API",
    version
)]
pub struct Settings {
    /// API key (falls back to ~/.incli/config.json)
    #[arg(long, global = true, env = "INCIDENT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL
    #[arg(long, global = true, env = "INCIDENT_API_URL")]
    pub base_url: Option<String>,

    /// Records requested per page (1-250)
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..=250))]
    pub page_size: u32,

    /// Logging level
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Work with catalog entries
    Catalog {
        #[command(subcommand)]
        action: CatalogCommand,
    },
    /// Work with incidents
    Incidents {
        #[command(subcommand)]
        action: IncidentsCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CatalogCommand {
    /// Get one, many, or all catalog entries, by name/id with or without type name/id
    Get(CatalogGetArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum IncidentsCommand {
    /// Get one or all incidents
    #[command(visible_alias = "list")]
    Get(IncidentGetArgs),
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogGetArgs {
    /// Catalog type id, e.g. 01HE6...
    #[arg(short = 't', long)]
    pub type_id: Option<String>,

    /// Catalog type name, e.g. PagerdutyService
    #[arg(long)]
    pub type_name: Option<String>,

    /// Name of the catalog entry, e.g. "Serving Infra Default"
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Catalog entry id
    #[arg(long)]
    pub id: Option<String>,
}

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentGetArgs {
    /// Incident id, e.g. 01HE6...
    #[arg(long)]
    pub id: Option<String>,

    /// Incident reference number, e.g. 27 for INC-27
    #[arg(long = "ref", allow_negative_numbers = true)]
    pub reference: Option<i64>,

    /// Keep watching non-closed incidents
    #[arg(long)]
    pub watch: bool,
}

// ── StoredConfig ───────────────────────────────────────────────────────────────

/// Optional defaults read from `~/.incli/config.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl StoredConfig {
    /// Default location of the config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".incli").join("config.json")
    }

    /// Load from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit path. A missing file yields the default; an
    /// unreadable or malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map_err(|e| IncliError::Config(format!("{}: {}", path.display(), e)))
    }
}

// ── ApiConfig ──────────────────────────────────────────────────────────────────

/// Fully resolved connection settings for the API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_key: String,
    pub base_url: String,
    pub page_size: u32,
}

impl Settings {
    /// Merge CLI/env values with the stored config. CLI and env always win.
    pub fn api_config(&self, stored: &StoredConfig) -> Result<ApiConfig> {
        let api_key = non_empty(&self.api_key)
            .or_else(|| non_empty(&stored.api_key))
            .ok_or_else(|| {
                IncliError::Config(
                    "missing API key; pass --api-key or set INCIDENT_API_KEY".to_string(),
                )
            })?;

        let base_url = non_empty(&self.base_url)
            .or_else(|| non_empty(&stored.base_url))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(ApiConfig {
            api_key,
            base_url,
            page_size: self.page_size,
        })
    }

    /// Effective log level, with `--debug` overriding `--log-level`.
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            self.log_level.as_str()
        }
    }
}

/// An empty value counts as unset, so it never hides a lower layer.
fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

// ── Tests ──────────────────────────────────────────────────────────────────────
