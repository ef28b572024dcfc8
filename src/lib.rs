//! Vietnamese weather bulletin engine.
//!
//! A forecast from a [`source::WeatherSource`] is flattened into a
//! [`model::UnifiedRecord`], classified, interpreted and rendered into a
//! [`bulletin::Bulletin`] with a severity verdict and icon.

pub mod alerts;
pub mod blocks;
pub mod bulletin;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod insights;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod readings;
pub mod source;

pub use bulletin::{Bulletin, BulletinIcon, BulletinOptions, build_bulletin, compose_bulletin};
pub use error::SourceError;
