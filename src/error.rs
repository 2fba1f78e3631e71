//! Error types for data loading and configuration.
//!
//! None of these reach the interaction loop: a failed load leaves its layer
//! empty and a bad config override falls back to the defaults.

use thiserror::Error;

/// Failure to turn a layer's URL into features.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("request for {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response body of {url} is not text")]
    Body { url: String },

    #[error("invalid GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("expected a FeatureCollection, found a {0}")]
    NotACollection(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid map config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zoom limits are inverted (min {min}, max {max})")]
    ZoomRange { min: f64, max: f64 },
}
