//! # Geographic Types
//!
//! This module defines the geographic coordinate and envelope types used by the
//! interaction. Latitudes are degrees in [-90, 90]; longitudes are degrees and
//! may exceed [-180, 180] when a drag crosses the antimeridian.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::CameraBridge;

/// Highest latitude representable on the web-mercator plane.
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051129;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LngLat {
    /// Longitude in degrees (unwrapped).
    pub lng: f64,
    /// Latitude in degrees.
    pub lat: f64,
}

impl LngLat {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// An axis-aligned envelope in geographic space.
///
/// Invariant: `south <= north` and `west <= east`. The constructors normalize
/// their inputs, so an envelope built from any two points holds regardless of
/// drag direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl GeoBounds {
    /// Builds the smallest envelope containing both points.
    pub fn from_points(a: LngLat, b: LngLat) -> Self {
        Self {
            west: a.lng.min(b.lng),
            south: a.lat.min(b.lat),
            east: a.lng.max(b.lng),
            north: a.lat.max(b.lat),
        }
    }

    /// Grows the envelope to contain `point`.
    pub fn extend(mut self, point: LngLat) -> Self {
        self.west = self.west.min(point.lng);
        self.south = self.south.min(point.lat);
        self.east = self.east.max(point.lng);
        self.north = self.north.max(point.lat);
        self
    }

    pub fn contains(&self, point: LngLat) -> bool {
        point.lng >= self.west
            && point.lng <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }

    pub fn north_west(&self) -> LngLat {
        LngLat::new(self.west, self.north)
    }

    pub fn north_east(&self) -> LngLat {
        LngLat::new(self.east, self.north)
    }

    pub fn south_west(&self) -> LngLat {
        LngLat::new(self.west, self.south)
    }

    pub fn south_east(&self) -> LngLat {
        LngLat::new(self.east, self.south)
    }
}

/// The four screen-space corners of a projected geographic envelope.
///
/// These are the projections of the envelope's corner coordinates, not the
/// corners of the raw drag rectangle. Under camera rotation the quad is a
/// non-rectangular quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenQuad {
    pub nw: Vec2,
    pub ne: Vec2,
    pub sw: Vec2,
    pub se: Vec2,
}

/// Projects the envelope's corner coordinates back to screen space.
pub fn envelope_quad(camera: &dyn CameraBridge, bounds: &GeoBounds) -> ScreenQuad {
    ScreenQuad {
        nw: camera.project(bounds.north_west()),
        ne: camera.project(bounds.north_east()),
        sw: camera.project(bounds.south_west()),
        se: camera.project(bounds.south_east()),
    }
}
