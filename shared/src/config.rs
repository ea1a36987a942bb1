use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::{KvError, KvKey};
use crate::geo::{Coordinate, CoordinateBounds};

/// Identifier of the single offline region this app manages.
pub const DEFAULT_REGION_ID: &str = "ahmedabad-region";

/// Outdoors style used when building tileset descriptors.
pub const DEFAULT_STYLE_URI: &str = "mapbox://styles/mapbox/outdoors-v12";

/// Corners of the default offline region (south, west, north, east).
pub const DEFAULT_REGION_CORNERS: (f64, f64, f64, f64) = (22.9646, 72.4455, 23.1252, 72.6808);

/// Camera centre used when the shell has no last known location.
pub const FALLBACK_CENTER: (f64, f64) = (23.048_428_968_798_02, 72.524_932_161_030_3);

pub const DEFAULT_MIN_ZOOM: u8 = 0;
pub const DEFAULT_MAX_ZOOM: u8 = 16;

/// Highest zoom level the tile store accepts in a descriptor.
pub const MAX_SUPPORTED_ZOOM: u8 = 22;

pub const INITIAL_CAMERA_ZOOM: f64 = 16.0;
pub const MARKER_FOCUS_ZOOM: f64 = 10.0;
pub const FIT_BOUNDS_PADDING: f64 = 20.0;
pub const FIT_BOUNDS_MAX_ZOOM: f64 = 16.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("region id cannot be empty")]
    EmptyRegionId,

    /// Region ids double as storage keys for the persisted bounds.
    #[error("region id is not a usable storage key: {0}")]
    InvalidRegionId(#[source] KvError),

    #[error("invalid style uri '{uri}': {source}")]
    InvalidStyleUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid zoom range {min}..={max} (maximum supported is 22)")]
    InvalidZoomRange { min: u8, max: u8 },

    #[error("invalid {field}: {value}")]
    InvalidCameraValue { field: &'static str, value: f64 },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings the shell may override with `Event::Configure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub region_id: String,
    pub region_bounds: CoordinateBounds,
    pub style_uri: String,
    pub min_zoom: u8,
    pub max_zoom: u8,
    /// Whether the tile store may satisfy the download with expired tiles.
    pub accept_expired: bool,
    pub fallback_center: Coordinate,
    pub initial_zoom: f64,
    pub marker_zoom: f64,
    pub fit_padding: f64,
    pub fit_max_zoom: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        let (south, west, north, east) = DEFAULT_REGION_CORNERS;
        let (lat, lng) = FALLBACK_CENTER;
        Self {
            region_id: DEFAULT_REGION_ID.to_string(),
            region_bounds: CoordinateBounds::new_unchecked(
                Coordinate::new_unchecked(south, west),
                Coordinate::new_unchecked(north, east),
            ),
            style_uri: DEFAULT_STYLE_URI.to_string(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            accept_expired: false,
            fallback_center: Coordinate::new_unchecked(lat, lng),
            initial_zoom: INITIAL_CAMERA_ZOOM,
            marker_zoom: MARKER_FOCUS_ZOOM,
            fit_padding: FIT_BOUNDS_PADDING,
            fit_max_zoom: FIT_BOUNDS_MAX_ZOOM,
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    pub fn validated(self) -> Result<Self, ConfigError> {
        if self.region_id.trim().is_empty() {
            return Err(ConfigError::EmptyRegionId);
        }
        KvKey::new(self.region_id.as_str()).map_err(ConfigError::InvalidRegionId)?;

        url::Url::parse(&self.style_uri).map_err(|source| ConfigError::InvalidStyleUri {
            uri: self.style_uri.clone(),
            source,
        })?;

        if self.min_zoom > self.max_zoom || self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(ConfigError::InvalidZoomRange {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }

        for (field, value) in [
            ("initial_zoom", self.initial_zoom),
            ("marker_zoom", self.marker_zoom),
            ("fit_max_zoom", self.fit_max_zoom),
        ] {
            if !value.is_finite() || !(0.0..=f64::from(MAX_SUPPORTED_ZOOM)).contains(&value) {
                return Err(ConfigError::InvalidCameraValue { field, value });
            }
        }
        if !self.fit_padding.is_finite() || self.fit_padding < 0.0 {
            return Err(ConfigError::InvalidCameraValue {
                field: "fit_padding",
                value: self.fit_padding,
            });
        }

        Ok(self)
    }

    #[must_use]
    pub fn zoom_range(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }
}
