use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{Coordinate, CoordinateError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoutingProfile {
    #[default]
    Driving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DirectionsOperation {
    CalculateRoute {
        waypoints: Vec<Coordinate>,
        profile: RoutingProfile,
    },
}

impl Operation for DirectionsOperation {
    type Output = Result<RouteResponse, DirectionsError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// GeoJSON `LineString` in `[longitude, latitude]` order.
    pub geometry: geojson::Geometry,
    /// Meters.
    pub distance: f64,
    /// Seconds.
    pub expected_travel_time: f64,
}

impl Route {
    pub fn path(&self) -> Result<Vec<Coordinate>, DirectionsError> {
        let geojson::Value::LineString(positions) = &self.geometry.value else {
            return Err(DirectionsError::InvalidGeometry {
                message: "route geometry is not a LineString".to_string(),
            });
        };
        positions
            .iter()
            .map(|p| Coordinate::from_position(p))
            .collect::<Result<_, CoordinateError>>()
            .map_err(|e| DirectionsError::InvalidGeometry {
                message: e.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum DirectionsError {
    #[error("no route found between the selected points")]
    NoRoute,

    #[error("network error: {message}")]
    Network { message: String },

    #[error("route geometry is invalid: {message}")]
    InvalidGeometry { message: String },

    #[error("{message}")]
    Other { message: String },
}

/// Routing engine exposed by the shell's navigation SDK.
pub struct Directions<Ev> {
    context: CapabilityContext<DirectionsOperation, Ev>,
}

impl<Ev> Capability<Ev> for Directions<Ev> {
    type Operation = DirectionsOperation;
    type MappedSelf<MappedEv> = Directions<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Directions::new(self.context.map_event(f))
    }
}

impl<Ev> Directions<Ev> {
    pub fn new(context: CapabilityContext<DirectionsOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Directions<Ev>
where
    Ev: Send + 'static,
{
    pub fn calculate_route<F>(&self, waypoints: Vec<Coordinate>, profile: RoutingProfile, callback: F)
    where
        F: FnOnce(Result<RouteResponse, DirectionsError>) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        self.context.spawn(async move {
            let response = context
                .request_from_shell(DirectionsOperation::CalculateRoute { waypoints, profile })
                .await;
            context.update_app(callback(response));
        });
    }
}
