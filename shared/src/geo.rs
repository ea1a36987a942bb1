use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error("Latitude {0} is out of valid range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("Longitude {0} is out of valid range [-180, 180]")]
    LongitudeOutOfRange(f64),
    #[error("Coordinate value is not finite (NaN or Infinity)")]
    NonFinite,
    #[error("Position needs a longitude and a latitude, got {0} value(s)")]
    MalformedPosition(usize),
    #[error("Southwest corner ({sw_lat}, {sw_lng}) is not south-west of northeast corner ({ne_lat}, {ne_lng})")]
    InvertedBounds {
        sw_lat: f64,
        sw_lng: f64,
        ne_lat: f64,
        ne_lng: f64,
    },
}

// --- Coordinate: validated, NaN-safe ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// For compile-time constants that are known to be in range.
    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub const fn latitude(self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub const fn longitude(self) -> f64 {
        self.longitude
    }

    /// GeoJSON positions are `[longitude, latitude]`.
    #[must_use]
    pub fn to_position(self) -> geojson::Position {
        vec![self.longitude, self.latitude]
    }

    pub fn from_position(position: &[f64]) -> Result<Self, CoordinateError> {
        match position {
            [longitude, latitude, ..] => Self::new(*latitude, *longitude),
            _ => Err(CoordinateError::MalformedPosition(position.len())),
        }
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

/// Axis-aligned rectangle given by its southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBounds")]
pub struct CoordinateBounds {
    southwest: Coordinate,
    northeast: Coordinate,
}

impl CoordinateBounds {
    pub fn new(southwest: Coordinate, northeast: Coordinate) -> Result<Self, CoordinateError> {
        if southwest.latitude > northeast.latitude || southwest.longitude > northeast.longitude {
            return Err(CoordinateError::InvertedBounds {
                sw_lat: southwest.latitude,
                sw_lng: southwest.longitude,
                ne_lat: northeast.latitude,
                ne_lng: northeast.longitude,
            });
        }
        Ok(Self {
            southwest,
            northeast,
        })
    }

    pub(crate) const fn new_unchecked(southwest: Coordinate, northeast: Coordinate) -> Self {
        Self {
            southwest,
            northeast,
        }
    }

    pub fn from_corners(
        sw_lat: f64,
        sw_lng: f64,
        ne_lat: f64,
        ne_lng: f64,
    ) -> Result<Self, CoordinateError> {
        Self::new(Coordinate::new(sw_lat, sw_lng)?, Coordinate::new(ne_lat, ne_lng)?)
    }

    #[must_use]
    pub const fn southwest(&self) -> Coordinate {
        self.southwest
    }

    #[must_use]
    pub const fn northeast(&self) -> Coordinate {
        self.northeast
    }

    /// Closed ring: sw, se, ne, nw, sw.
    #[must_use]
    pub fn outline(&self) -> [Coordinate; 5] {
        let sw = self.southwest;
        let ne = self.northeast;
        let se = Coordinate {
            latitude: sw.latitude,
            longitude: ne.longitude,
        };
        let nw = Coordinate {
            latitude: ne.latitude,
            longitude: sw.longitude,
        };
        [sw, se, ne, nw, sw]
    }

    #[must_use]
    pub fn to_geometry(&self) -> geojson::Geometry {
        let ring = self.outline().iter().map(|c| c.to_position()).collect();
        geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))
    }
}

#[derive(Deserialize)]
struct RawBounds {
    southwest: Coordinate,
    northeast: Coordinate,
}

impl TryFrom<RawBounds> for CoordinateBounds {
    type Error = CoordinateError;

    fn try_from(raw: RawBounds) -> Result<Self, Self::Error> {
        Self::new(raw.southwest, raw.northeast)
    }
}

/// Storage shape of a region's bounds, one flat key per corner component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersistedBounds {
    pub southwest_latitude: f64,
    pub southwest_longitude: f64,
    pub northeast_latitude: f64,
    pub northeast_longitude: f64,
}

impl From<CoordinateBounds> for PersistedBounds {
    fn from(bounds: CoordinateBounds) -> Self {
        Self {
            southwest_latitude: bounds.southwest.latitude,
            southwest_longitude: bounds.southwest.longitude,
            northeast_latitude: bounds.northeast.latitude,
            northeast_longitude: bounds.northeast.longitude,
        }
    }
}

impl TryFrom<PersistedBounds> for CoordinateBounds {
    type Error = CoordinateError;

    fn try_from(value: PersistedBounds) -> Result<Self, Self::Error> {
        Self::from_corners(
            value.southwest_latitude,
            value.southwest_longitude,
            value.northeast_latitude,
            value.northeast_longitude,
        )
    }
}
