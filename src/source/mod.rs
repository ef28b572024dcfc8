//! Upstream collaborators: forecast fetch, geocoding and their cache.

use std::future::Future;

use chrono::{DateTime, FixedOffset};

use crate::error::SourceError;
use crate::model::ForecastTriple;

pub mod cache;
pub mod geocode;
pub mod open_meteo;

pub use cache::TtlCache;
pub use geocode::{Geocoder, Location, parse_coordinates};
pub use open_meteo::{OpenMeteoClient, RawForecast, normalize_response};

/// Anything that can produce a normalized forecast for a coordinate.
///
/// `now` pins which hourly entry counts as "current".
pub trait WeatherSource {
    fn fetch_forecast(
        &self,
        lat: f64,
        lon: f64,
        now: DateTime<FixedOffset>,
    ) -> impl Future<Output = Result<ForecastTriple, SourceError>> + Send;
}
