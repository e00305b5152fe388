use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub output_path: String,
    pub probe_timeout_secs: u64,
    /// Account substituted into raw-content URLs during repair.
    pub canonical_owner: String,
    pub placeholder_url: String,
    pub inspection_pdf_url: String,
    pub inspection_form: bool,
    pub zoom_start: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            canonical_owner: DEFAULT_CANONICAL_OWNER.to_string(),
            placeholder_url: DEFAULT_PLACEHOLDER_URL.to_string(),
            inspection_pdf_url: DEFAULT_INSPECTION_PDF_URL.to_string(),
            inspection_form: true,
            zoom_start: DEFAULT_ZOOM,
        }
    }
}

impl Settings {
    /// Loads `casestudy_map.ini` from beside the executable, or defaults when absent.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Settings::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Parses `key = value` lines. Comments, unknown keys and bad values are skipped.
    pub fn parse(content: &str) -> Self {
        let mut settings = Settings::default();
        let mut config_map = HashMap::new();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') || line.is_empty() {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                config_map.insert(key.trim(), value.trim().trim_matches('"'));
            }
        }

        for (key, value) in config_map {
            match key {
                "output_path" if !value.is_empty() => settings.output_path = value.to_string(),
                "canonical_owner" => settings.canonical_owner = value.to_string(),
                "placeholder_url" if !value.is_empty() => {
                    settings.placeholder_url = value.to_string()
                }
                "inspection_pdf_url" if !value.is_empty() => {
                    settings.inspection_pdf_url = value.to_string()
                }
                "probe_timeout_secs" => match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => settings.probe_timeout_secs = secs,
                    _ => warn!("Ignoring invalid probe_timeout_secs = {}", value),
                },
                "inspection_form" => match value.parse::<bool>() {
                    Ok(enabled) => settings.inspection_form = enabled,
                    Err(_) => warn!("Ignoring invalid inspection_form = {}", value),
                },
                "zoom_start" => match value.parse::<u8>() {
                    Ok(zoom) if zoom <= 19 => settings.zoom_start = zoom,
                    _ => warn!("Ignoring invalid zoom_start = {}", value),
                },
                _ => warn!("Ignoring config entry '{}'", key),
            }
        }

        settings
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn config_path() -> PathBuf {
        let mut path = std::env::current_exe()
            .unwrap_or_default()
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        if path.ends_with("target/debug") || path.ends_with("target/release") {
            path.pop();
            path.pop();
        }
        path.push(CONFIG_FILE_NAME);
        path
    }
}
