//! Geographic projection onto a drawing surface
//!
//! An affine map from a fixed latitude/longitude box to a `width × height`
//! surface: linear per axis, with the vertical axis flipped so north is up.

use serde::{Deserialize, Serialize};
use topograph_core::Record;

/// Geographic bounding box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    /// Borders of Ukraine
    pub const UKRAINE: GeoBounds = GeoBounds {
        lat_min: 44.3615,
        lat_max: 52.37,
        lon_min: 22.1456,
        lon_max: 40.25,
    };

    pub fn lat_range(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    pub fn lon_range(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.lat_min..=self.lat_max).contains(&latitude)
            && (self.lon_min..=self.lon_max).contains(&longitude)
    }
}

impl Default for GeoBounds {
    fn default() -> Self {
        Self::UKRAINE
    }
}

/// Size of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// A point on the surface
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounds + surface; recompute points after every resize
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    bounds: GeoBounds,
    surface: Surface,
}

impl Projection {
    pub fn new(bounds: GeoBounds, surface: Surface) -> Self {
        Self { bounds, surface }
    }

    pub fn bounds(&self) -> GeoBounds {
        self.bounds
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn resize(&mut self, surface: Surface) {
        self.surface = surface;
    }

    pub fn project(&self, latitude: f64, longitude: f64) -> Point {
        let x = (longitude - self.bounds.lon_min) / self.bounds.lon_range() * self.surface.width;
        let y = self.surface.height
            - (latitude - self.bounds.lat_min) / self.bounds.lat_range() * self.surface.height;
        Point { x, y }
    }

    /// `None` for records without both coordinates
    pub fn project_record(&self, record: &Record) -> Option<Point> {
        record
            .coordinates()
            .map(|(latitude, longitude)| self.project(latitude, longitude))
    }
}
