use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::MapConfig;
use crate::offline_region::OfflineRegionManager;
use crate::overlay::OverlayState;
use crate::route_picker::RoutePicker;
use crate::AppError;

pub const ERROR_ALERT_TITLE: &str = "Error";
pub const DIRECTION_ALERT_TITLE: &str = "Alert";
pub const DIRECTION_ALERT_MESSAGE: &str =
    "Tap on map to select start and end location for direction.";

/// What happens when the user acknowledges an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertAction {
    ArmRoutePicking,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub message: String,
    /// `ErrorKind` code for error alerts.
    pub code: Option<String>,
    pub on_dismiss: Option<AlertAction>,
}

impl Alert {
    #[must_use]
    pub fn error(error: &AppError) -> Self {
        Self {
            title: ERROR_ALERT_TITLE.to_string(),
            message: error.user_facing_message(),
            code: Some(error.code().to_string()),
            on_dismiss: None,
        }
    }

    #[must_use]
    pub fn direction_prompt() -> Self {
        Self {
            title: DIRECTION_ALERT_TITLE.to_string(),
            message: DIRECTION_ALERT_MESSAGE.to_string(),
            code: None,
            on_dismiss: Some(AlertAction::ArmRoutePicking),
        }
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: MapConfig,
    pub regions: OfflineRegionManager,
    pub route_picker: RoutePicker,
    pub overlays: OverlayState,
    /// Oldest first; the view shows the front.
    pub alerts: VecDeque<Alert>,
}

impl Model {
    pub fn push_error(&mut self, error: &AppError) {
        self.alerts.push_back(Alert::error(error));
    }

    #[must_use]
    pub fn current_alert(&self) -> Option<&Alert> {
        self.alerts.front()
    }

    #[must_use]
    pub fn has_pending_direction_prompt(&self) -> bool {
        self.alerts
            .iter()
            .any(|alert| alert.on_dismiss == Some(AlertAction::ArmRoutePicking))
    }

    pub fn dismiss_alert(&mut self) -> Option<Alert> {
        self.alerts.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_alerts_queue_oldest_first() {
        let mut model = Model::default();
        model.push_error(&AppError::new(ErrorKind::Download, "first"));
        model.push_error(&AppError::new(ErrorKind::Routing, "second"));

        assert_eq!(model.current_alert().unwrap().message, "first");
        assert_eq!(model.dismiss_alert().unwrap().message, "first");
        assert_eq!(model.current_alert().unwrap().message, "second");
        model.dismiss_alert();
        assert!(model.dismiss_alert().is_none());
    }

    #[test]
    fn test_error_alert_uses_collaborator_reason() {
        let alert = Alert::error(&AppError::new(ErrorKind::Download, "The network is offline"));
        assert_eq!(alert.title, "Error");
        assert_eq!(alert.message, "The network is offline");
        assert_eq!(alert.code.as_deref(), Some("DOWNLOAD_FAILED"));
        assert_eq!(alert.on_dismiss, None);
    }

    #[test]
    fn test_direction_prompt_arms_picking() {
        let mut model = Model::default();
        assert!(!model.has_pending_direction_prompt());
        model.alerts.push_back(Alert::direction_prompt());
        assert!(model.has_pending_direction_prompt());
        assert_eq!(
            model.current_alert().unwrap().message,
            "Tap on map to select start and end location for direction."
        );
    }
}
