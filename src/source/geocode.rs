//! Place-name and coordinate resolution against the Open-Meteo geocoder.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::open_meteo::get_json;
use crate::config::OpenMeteoConfig;
use crate::error::SourceError;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub admin1: Option<String>,
}

impl Location {
    /// `name, admin1, country` without the empty parts.
    pub fn label(&self) -> String {
        [Some(self.name.as_str()), self.admin1.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Deserialize, Debug, Default)]
struct GeoResponse {
    #[serde(default)]
    results: Option<Vec<Location>>,
}

/// Accepts `"lat,lon"`; anything else (including out-of-range values) is `None`.
pub fn parse_coordinates(query: &str) -> Option<Location> {
    let (lat, lon) = query.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return None;
    }
    Some(Location {
        name: "Tọa độ".to_string(),
        latitude,
        longitude,
        country: Some("Việt Nam".to_string()),
        admin1: Some(String::new()),
    })
}

pub struct Geocoder {
    http: Client,
    config: OpenMeteoConfig,
}

impl Geocoder {
    pub fn new(http: Client, config: OpenMeteoConfig) -> Self {
        Self { http, config }
    }

    /// First match for a place name.
    pub async fn search(&self, name: &str) -> Result<Location, SourceError> {
        let query = [
            ("name", name.to_string()),
            ("language", self.config.lang.clone()),
            ("count", "1".to_string()),
        ];
        let resp: GeoResponse = get_json(&self.http, &self.config.geocode_url, &query).await?;
        first_result(resp, "Không tìm thấy địa danh")
    }

    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Location, SourceError> {
        let query = [
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("language", self.config.lang.clone()),
        ];
        let resp: GeoResponse = get_json(&self.http, &self.config.reverse_url, &query).await?;
        first_result(resp, "Không tìm thấy địa danh cho tọa độ đã cho")
    }

    /// Coordinates are named through [`Self::reverse`] and keep the literal
    /// `Tọa độ` label when that fails; anything else goes through [`Self::search`].
    pub async fn resolve(&self, query: &str) -> Result<Location, SourceError> {
        if let Some(coords) = parse_coordinates(query) {
            debug!(query, "location given as coordinates");
            let reversed = self.reverse(coords.latitude, coords.longitude).await;
            return Ok(name_coordinates(coords, reversed));
        }
        let loc = self.search(query).await?;
        info!(query, name = %loc.name, lat = loc.latitude, lon = loc.longitude, "resolved location");
        Ok(loc)
    }
}

/// Place names from a reverse lookup; the parsed coordinates always win.
fn name_coordinates(coords: Location, reversed: Result<Location, SourceError>) -> Location {
    match reversed {
        Ok(place) => {
            info!(name = %place.name, lat = coords.latitude, lon = coords.longitude, "named coordinates");
            Location {
                name: place.name,
                country: place.country.or(coords.country),
                admin1: place.admin1.or(coords.admin1),
                ..coords
            }
        }
        Err(e) => {
            warn!(lat = coords.latitude, lon = coords.longitude, "reverse geocoding failed: {e}");
            coords
        }
    }
}

fn first_result(resp: GeoResponse, not_found: &str) -> Result<Location, SourceError> {
    resp.results
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| SourceError::NotFound(not_found.to_string()))
}
