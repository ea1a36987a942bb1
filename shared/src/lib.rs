#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]

pub mod app;
pub mod capabilities;
pub mod config;
pub mod event;
pub mod geo;
pub mod model;
pub mod offline_region;
pub mod overlay;
pub mod route_picker;
pub mod search;
pub mod view;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::capabilities::{DirectionsError, KvError, TileStoreError};
use crate::config::ConfigError;
use crate::geo::CoordinateError;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use crux_core::{render::Render, App as CruxApp};
pub use event::Event;
pub use model::Model;
pub use view::ViewModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Download,
    RegionLookup,
    RegionList,
    RegionRemoval,
    Routing,
    Storage,
    NotFound,
    Validation,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Download => "DOWNLOAD_FAILED",
            Self::RegionLookup => "REGION_LOOKUP_FAILED",
            Self::RegionList => "REGION_LIST_FAILED",
            Self::RegionRemoval => "REGION_REMOVAL_FAILED",
            Self::Routing => "ROUTING_FAILED",
            Self::Storage => "STORAGE_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::Validation => "VALIDATION_ERROR",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Alert text. Collaborator reasons are shown verbatim.
    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Download
            | ErrorKind::RegionLookup
            | ErrorKind::RegionList
            | ErrorKind::RegionRemoval
            | ErrorKind::Routing
            | ErrorKind::Validation => self.message.clone(),
            ErrorKind::Storage => {
                format!("Unable to access saved map data. {}", self.message)
            }
            ErrorKind::NotFound => {
                if self.message.is_empty() {
                    "The requested item could not be found.".into()
                } else {
                    self.message.clone()
                }
            }
        }
    }

    pub(crate) fn from_tile_store(kind: ErrorKind, error: &TileStoreError) -> Self {
        match error {
            TileStoreError::RegionNotFound { id } => {
                Self::not_found(error.to_string()).with_context("region_id", id.clone())
            }
            _ => Self::new(kind, error.to_string()),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<CoordinateError> for AppError {
    fn from(error: CoordinateError) -> Self {
        Self::new(ErrorKind::Validation, error.to_string())
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        Self::new(ErrorKind::Validation, error.to_string())
    }
}

impl From<KvError> for AppError {
    fn from(error: KvError) -> Self {
        Self::new(ErrorKind::Storage, error.to_string())
    }
}

impl From<DirectionsError> for AppError {
    fn from(error: DirectionsError) -> Self {
        match error {
            DirectionsError::NoRoute => Self::not_found(error.to_string()),
            _ => Self::new(ErrorKind::Routing, error.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod error_tests {
        use super::*;

        #[test]
        fn test_error_codes() {
            assert_eq!(ErrorKind::NotFound.code(), "NOT_FOUND");
            assert_eq!(ErrorKind::Download.code(), "DOWNLOAD_FAILED");
            assert_eq!(ErrorKind::Validation.code(), "VALIDATION_ERROR");
        }

        #[test]
        fn test_error_context() {
            let error = AppError::new(ErrorKind::RegionLookup, "lookup failed")
                .with_context("region_id", "ahmedabad-region");
            assert_eq!(
                error.context.get("region_id").map(String::as_str),
                Some("ahmedabad-region")
            );
        }

        #[test]
        fn test_error_display() {
            let error = AppError::new(ErrorKind::Download, "disk full");
            assert_eq!(error.to_string(), "[DOWNLOAD_FAILED] disk full");
        }

        #[test]
        fn test_user_facing_message() {
            let download = AppError::new(ErrorKind::Download, "Network is unreachable");
            assert_eq!(download.user_facing_message(), "Network is unreachable");

            let storage = AppError::new(ErrorKind::Storage, "quota");
            assert!(storage.user_facing_message().starts_with("Unable to access"));

            let not_found = AppError::not_found("");
            assert!(not_found.user_facing_message().contains("could not be found"));
        }

        #[test]
        fn test_missing_tile_region_maps_to_not_found() {
            let error = AppError::from_tile_store(
                ErrorKind::RegionLookup,
                &TileStoreError::RegionNotFound {
                    id: "ahmedabad-region".into(),
                },
            );
            assert_eq!(error.kind, ErrorKind::NotFound);

            let error = AppError::from_tile_store(ErrorKind::RegionLookup, &TileStoreError::DiskFull);
            assert_eq!(error.kind, ErrorKind::RegionLookup);
        }

        #[test]
        fn test_conversions() {
            let error: AppError = DirectionsError::NoRoute.into();
            assert_eq!(error.kind, ErrorKind::NotFound);

            let error: AppError = DirectionsError::Network {
                message: "timeout".into(),
            }
            .into();
            assert_eq!(error.kind, ErrorKind::Routing);

            let error: AppError = CoordinateError::NonFinite.into();
            assert_eq!(error.kind, ErrorKind::Validation);

            let error: AppError = KvError::Storage {
                message: "locked".into(),
            }
            .into();
            assert_eq!(error.kind, ErrorKind::Storage);
        }
    }
}
