use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::classify::{Region, Terrain};

/* ============================ Config ============================ */

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub open_meteo: OpenMeteoConfig,
    #[serde(default)]
    pub app: AppConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct OpenMeteoConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocode_url: default_geocode_url(),
            reverse_url: default_reverse_url(),
            lang: default_lang(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    /// Place names or `lat,lon` pairs.
    #[serde(default)]
    pub locations: Vec<String>,
    #[serde(default)]
    pub region: Region,
    #[serde(default)]
    pub terrain: Terrain,
}

fn default_forecast_url() -> String { "https://api.open-meteo.com/v1/forecast".into() }
fn default_geocode_url() -> String { "https://geocoding-api.open-meteo.com/v1/search".into() }
fn default_reverse_url() -> String { "https://geocoding-api.open-meteo.com/v1/reverse".into() }
fn default_lang() -> String { "vi".into() }
fn default_timeout_secs() -> u64 { 15 }
fn default_cache_ttl_secs() -> u64 { 300 }

/// Candidate config paths, most specific first.
pub fn config_candidates(explicit: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(p) = explicit { candidates.push(p); }
    if let Ok(p) = std::env::var("BULLETIN_CONFIG") { candidates.push(PathBuf::from(p)); }
    candidates.push(PathBuf::from("./config/bulletin.yaml"));
    candidates.push(PathBuf::from("./config.yaml"));
    if let Some(mut d) = dirs::config_dir() {
        d.push("vn-weather-bulletin/config.yaml");
        candidates.push(d);
    }
    candidates
}

/// Loads the first existing candidate. With no file anywhere, the built-in
/// defaults apply and locations must come from the command line.
pub fn load_config(explicit: Option<PathBuf>) -> Result<Config> {
    for path in config_candidates(explicit) {
        if path.exists() {
            let s = std::fs::read_to_string(&path)
                .with_context(|| format!("reading config from {}", path.display()))?;
            let cfg: Config = serde_yaml::from_str(&s)
                .with_context(|| format!("parsing YAML in {}", path.display()))?;
            debug!(path = %path.display(), "loaded config");
            return Ok(cfg);
        }
    }
    debug!("no config file found, using defaults");
    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let cfg: Config = serde_yaml::from_str(
            "open_meteo:\n  timeout_secs: 5\napp:\n  locations: [\"Hà Nội\", \"16.05,108.2\"]\n  region: central_south\n  terrain: mountain\n",
        )
        .unwrap();
        assert_eq!(cfg.open_meteo.timeout_secs, 5);
        assert_eq!(cfg.open_meteo.cache_ttl_secs, 300);
        assert_eq!(cfg.open_meteo.lang, "vi");
        assert_eq!(cfg.app.locations.len(), 2);
        assert_eq!(cfg.app.region, Region::CentralSouth);
        assert_eq!(cfg.app.terrain, Terrain::Mountain);
    }

    #[test]
    fn test_empty_document_is_all_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.open_meteo.forecast_url, "https://api.open-meteo.com/v1/forecast");
        assert!(cfg.app.locations.is_empty());
        assert_eq!(cfg.app.region, Region::North);
    }

    #[test]
    fn test_explicit_path_is_tried_first() {
        let explicit = PathBuf::from("/tmp/custom.yaml");
        assert_eq!(config_candidates(Some(explicit.clone()))[0], explicit);
    }

    #[test]
    fn test_missing_explicit_file_falls_through() {
        let cfg = load_config(Some(PathBuf::from("/nonexistent/bulletin.yaml")));
        assert!(cfg.is_ok());
    }
}
