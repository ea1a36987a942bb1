use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, CoordinateBounds};

/// Camera target. `None` leaves that property as the map currently has it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    pub center: Coordinate,
    pub zoom: Option<f64>,
    pub bearing: Option<f64>,
    pub pitch: Option<f64>,
}

impl CameraOptions {
    /// North-up, untilted camera.
    #[must_use]
    pub fn centered(center: Coordinate, zoom: f64) -> Self {
        Self {
            center,
            zoom: Some(zoom),
            bearing: Some(0.0),
            pitch: Some(0.0),
        }
    }

    #[must_use]
    pub fn center_only(center: Coordinate) -> Self {
        Self {
            center,
            zoom: None,
            bearing: None,
            pitch: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeInsets {
    pub top: f64,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
}

impl EdgeInsets {
    #[must_use]
    pub fn uniform(inset: f64) -> Self {
        Self {
            top: inset,
            left: inset,
            bottom: inset,
            right: inset,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MapCameraOperation {
    /// Jump without animation.
    SetCamera(CameraOptions),
    FlyTo(CameraOptions),
    FitBounds {
        bounds: CoordinateBounds,
        padding: EdgeInsets,
        max_zoom: f64,
    },
}

impl Operation for MapCameraOperation {
    type Output = ();
}

/// Camera of the shell's map view. All requests are fire-and-forget.
pub struct MapCamera<Ev> {
    context: CapabilityContext<MapCameraOperation, Ev>,
}

impl<Ev> Capability<Ev> for MapCamera<Ev> {
    type Operation = MapCameraOperation;
    type MappedSelf<MappedEv> = MapCamera<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        MapCamera::new(self.context.map_event(f))
    }
}

impl<Ev> MapCamera<Ev> {
    pub fn new(context: CapabilityContext<MapCameraOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> MapCamera<Ev>
where
    Ev: Send + 'static,
{
    pub fn set_camera(&self, options: CameraOptions) {
        self.notify(MapCameraOperation::SetCamera(options));
    }

    pub fn fly_to(&self, options: CameraOptions) {
        self.notify(MapCameraOperation::FlyTo(options));
    }

    pub fn fit_bounds(&self, bounds: CoordinateBounds, padding: EdgeInsets, max_zoom: f64) {
        self.notify(MapCameraOperation::FitBounds {
            bounds,
            padding,
            max_zoom,
        });
    }

    fn notify(&self, operation: MapCameraOperation) {
        let context = self.context.clone();
        self.context.spawn(async move {
            context.notify_shell(operation).await;
        });
    }
}
