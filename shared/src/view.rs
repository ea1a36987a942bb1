use serde::{Deserialize, Serialize};

use crate::capabilities::LoadProgress;
use crate::model::{Alert, Model};
use crate::overlay::{Marker, RegionOutline, RouteLine};
use crate::route_picker::PickerState;

pub const ALERT_ACTION_LABEL: &str = "Okay";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertView {
    pub title: String,
    pub message: String,
    pub code: Option<String>,
    pub actions: Vec<String>,
}

impl From<&Alert> for AlertView {
    fn from(alert: &Alert) -> Self {
        Self {
            title: alert.title.clone(),
            message: alert.message.clone(),
            code: alert.code.clone(),
            actions: vec![ALERT_ACTION_LABEL.to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutePickingView {
    #[default]
    Inactive,
    AwaitingPickup,
    AwaitingDrop,
    Calculating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub markers: Vec<Marker>,
    pub route_line: Option<RouteLine>,
    pub region_outline: Option<RegionOutline>,
    pub is_loading: bool,
    pub progress_label: Option<String>,
    pub route_picking: RoutePickingView,
    pub alert: Option<AlertView>,
    pub offline_regions: Vec<String>,
}

#[must_use]
pub fn progress_label(progress: LoadProgress) -> String {
    format!(
        "Downloading.... {} / {}",
        progress.completed, progress.required
    )
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let route_picking = match model.route_picker.state() {
            PickerState::Idle => RoutePickingView::Inactive,
            PickerState::Armed(_) => match model.route_picker.pending_pickup() {
                None => RoutePickingView::AwaitingPickup,
                Some(_) => RoutePickingView::AwaitingDrop,
            },
            PickerState::Requesting(_) => RoutePickingView::Calculating,
        };

        Self {
            markers: model.overlays.markers().to_vec(),
            route_line: model.overlays.route_line().cloned(),
            region_outline: model.overlays.region_outline().cloned(),
            is_loading: model.regions.is_downloading(),
            progress_label: model.regions.progress().map(progress_label),
            route_picking,
            alert: model.current_alert().map(AlertView::from),
            offline_regions: model
                .regions
                .known_regions()
                .iter()
                .map(|region| region.id.clone())
                .collect(),
        }
    }
}
