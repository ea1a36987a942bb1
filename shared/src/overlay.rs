use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, CoordinateBounds};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerIcon {
    #[default]
    Pin,
    Home,
    Work,
    Favorite,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub icon: MarkerIcon,
}

impl Marker {
    #[must_use]
    pub fn pin(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            icon: MarkerIcon::Pin,
        }
    }
}

/// RGBA, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteLine {
    pub path: Vec<Coordinate>,
    pub color: Color,
    pub width: f64,
}

impl RouteLine {
    #[must_use]
    pub fn new(path: Vec<Coordinate>) -> Self {
        Self {
            path,
            color: Color::BLUE,
            width: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOutline {
    pub ring: Vec<Coordinate>,
    pub fill_color: Color,
    pub fill_opacity: f64,
    pub outline_color: Color,
}

impl RegionOutline {
    #[must_use]
    pub fn new(bounds: &CoordinateBounds) -> Self {
        Self {
            ring: bounds.outline().to_vec(),
            fill_color: Color::RED,
            fill_opacity: 0.5,
            outline_color: Color::RED,
        }
    }
}

/// One marker set, one polyline and one polygon; each `show_*` replaces the
/// previous contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayState {
    markers: Vec<Marker>,
    route_line: Option<RouteLine>,
    region_outline: Option<RegionOutline>,
}

impl OverlayState {
    pub fn show_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    pub fn show_route_line(&mut self, path: Vec<Coordinate>) {
        self.route_line = Some(RouteLine::new(path));
    }

    pub fn show_region_outline(&mut self, bounds: &CoordinateBounds) {
        self.region_outline = Some(RegionOutline::new(bounds));
    }

    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    #[must_use]
    pub fn route_line(&self) -> Option<&RouteLine> {
        self.route_line.as_ref()
    }

    #[must_use]
    pub fn region_outline(&self) -> Option<&RegionOutline> {
        self.region_outline.as_ref()
    }
}
