use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Pickup and drop collected while picking is armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionRoute {
    pub pickup: Option<Coordinate>,
    pub drop: Option<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub pickup: Coordinate,
    pub drop: Coordinate,
}

impl RouteLeg {
    #[must_use]
    pub fn waypoints(&self) -> Vec<Coordinate> {
        vec![self.pickup, self.drop]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PickerState {
    #[default]
    Idle,
    Armed(DirectionRoute),
    Requesting(RouteLeg),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// Picking is not armed.
    Ignored,
    PickupRecorded(Coordinate),
    RouteRequested(RouteLeg),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutePicker {
    state: PickerState,
}

impl RoutePicker {
    #[must_use]
    pub fn state(&self) -> &PickerState {
        &self.state
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        matches!(self.state, PickerState::Armed(_))
    }

    #[must_use]
    pub fn is_requesting(&self) -> bool {
        matches!(self.state, PickerState::Requesting(_))
    }

    #[must_use]
    pub fn pending_pickup(&self) -> Option<Coordinate> {
        match self.state {
            PickerState::Armed(route) => route.pickup,
            _ => None,
        }
    }

    /// Arms the next two taps with an empty route. Returns false if already
    /// armed.
    pub fn enable_picking(&mut self) -> bool {
        if self.is_armed() {
            return false;
        }
        self.state = PickerState::Armed(DirectionRoute::default());
        true
    }

    pub fn consume_tap(&mut self, coordinate: Coordinate) -> TapOutcome {
        let PickerState::Armed(route) = self.state else {
            return TapOutcome::Ignored;
        };

        match route.pickup {
            None => {
                self.state = PickerState::Armed(DirectionRoute {
                    pickup: Some(coordinate),
                    drop: None,
                });
                TapOutcome::PickupRecorded(coordinate)
            }
            Some(pickup) => {
                let leg = RouteLeg {
                    pickup,
                    drop: coordinate,
                };
                self.state = PickerState::Requesting(leg);
                TapOutcome::RouteRequested(leg)
            }
        }
    }

    /// Leaves `Requesting` once the route response arrives. A picker that was
    /// re-armed in the meantime keeps its new route.
    pub fn complete_request(&mut self) {
        if self.is_requesting() {
            self.state = PickerState::Idle;
        }
    }
}
