//! # Camera Bridge
//!
//! This module defines the coordinate bridge to the host map's camera and a
//! concrete web-mercator camera. The bridge is the single source of truth for
//! screen <-> geographic conversions: the interaction never does projection
//! math of its own.

use glam::{DVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::geo::{GeoBounds, LngLat, MAX_MERCATOR_LATITUDE};

/// Side length of the mercator world in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Options for committing a new camera framing.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Request a linear (non-eased) transition. Hosts that animate camera
    /// movement use this to pick the curve; a headless camera jumps either way.
    pub linear: bool,
    /// Padding in screen pixels kept between the bounds and the viewport edge.
    pub padding: f32,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            linear: true,
            padding: 0.0,
        }
    }
}

/// The host map's camera at its interface.
///
/// `project`/`unproject` are pure functions of the current camera state, so a
/// round trip through either returns the original point within floating-point
/// tolerance.
pub trait CameraBridge {
    /// Geographic coordinate to screen pixels.
    fn project(&self, point: LngLat) -> Vec2;
    /// Screen pixels to geographic coordinate.
    fn unproject(&self, point: Vec2) -> LngLat;
    /// Reframes the camera so `bounds` fills the viewport.
    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions);
}

/// A web-mercator camera with pan, zoom, and rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MercatorCamera {
    pub center: LngLat,
    /// Mercator zoom level; world size doubles per level.
    pub zoom: f64,
    /// Rotation in degrees, clockwise from north.
    pub bearing: f64,
    /// Viewport size in screen pixels.
    pub viewport: Vec2,
}

impl MercatorCamera {
    pub fn new(center: LngLat, zoom: f64, viewport: Vec2) -> Self {
        Self {
            center,
            zoom,
            bearing: 0.0,
            viewport,
        }
    }

    pub fn with_bearing(mut self, bearing: f64) -> Self {
        self.bearing = bearing;
        self
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }

    /// Position on the mercator plane in pixels at the current zoom.
    fn world_point(&self, point: LngLat) -> DVec2 {
        mercator(point) * self.world_size()
    }

    fn half_viewport(&self) -> DVec2 {
        DVec2::new(self.viewport.x as f64, self.viewport.y as f64) * 0.5
    }
}

/// Normalized mercator coordinates in [0, 1] on each axis.
fn mercator(point: LngLat) -> DVec2 {
    let lat = point
        .lat
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE);
    let y = (std::f64::consts::FRAC_PI_4 + lat.to_radians() * 0.5).tan().ln();
    DVec2::new(
        (180.0 + point.lng) / 360.0,
        (180.0 - y.to_degrees()) / 360.0,
    )
}

fn inverse_mercator(point: DVec2) -> LngLat {
    let y = (180.0 - point.y * 360.0).to_radians();
    LngLat::new(
        point.x * 360.0 - 180.0,
        (y.exp().atan() * 2.0 - std::f64::consts::FRAC_PI_2).to_degrees(),
    )
}

fn rotate(v: DVec2, radians: f64) -> DVec2 {
    let (sin, cos) = radians.sin_cos();
    DVec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

impl CameraBridge for MercatorCamera {
    fn project(&self, point: LngLat) -> Vec2 {
        let delta = self.world_point(point) - self.world_point(self.center);
        let screen = rotate(delta, self.bearing.to_radians()) + self.half_viewport();
        Vec2::new(screen.x as f32, screen.y as f32)
    }

    fn unproject(&self, point: Vec2) -> LngLat {
        let centered = DVec2::new(point.x as f64, point.y as f64) - self.half_viewport();
        let delta = rotate(centered, -self.bearing.to_radians());
        let world = self.world_point(self.center) + delta;
        inverse_mercator(world / self.world_size())
    }

    fn fit_bounds(&mut self, bounds: GeoBounds, options: FitOptions) {
        let nw = mercator(bounds.north_west());
        let se = mercator(bounds.south_east());
        // Normalized extent; both components are >= 0 by the bounds invariant.
        let extent = se - nw;

        let padded = DVec2::new(
            (self.viewport.x - 2.0 * options.padding).max(1.0) as f64,
            (self.viewport.y - 2.0 * options.padding).max(1.0) as f64,
        );
        let scale_x = if extent.x > f64::EPSILON {
            padded.x / (extent.x * TILE_SIZE)
        } else {
            f64::INFINITY
        };
        let scale_y = if extent.y > f64::EPSILON {
            padded.y / (extent.y * TILE_SIZE)
        } else {
            f64::INFINITY
        };

        let scale = scale_x.min(scale_y);
        if scale.is_finite() {
            self.zoom = scale.log2().clamp(0.0, 25.0);
        }
        // The fit is computed on the unrotated envelope; bearing is preserved.
        self.center = inverse_mercator((nw + se) * 0.5);
    }
}
