//! Viewport calculations for the bounded 2D plane
//!
//! This module contains pure calculation logic that can be unit tested
//! without any rendering backend.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Point, clamp_value};

/// Smallest allowed scale (world units per pixel)
pub const MIN_SCALE: f64 = 1e-5;

/// Viewport parameters as they appear in the settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Canvas width in pixels
    pub pixel_width: f64,
    /// Canvas height in pixels
    pub pixel_height: f64,
    /// World units per pixel
    pub scale: f64,
    /// Half extent of the play area
    pub boundary: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            pixel_width: 1920.0,
            pixel_height: 1080.0,
            scale: 0.005,
            boundary: 15.0,
        }
    }
}

/// A window onto the play area `[-boundary, boundary]²`
#[derive(Debug, Clone)]
pub struct GridView {
    /// World-space top-left corner of the visible window
    position: Point,
    /// World units per pixel
    scale: f64,
    pixel_width: f64,
    pixel_height: f64,
    boundary: f64,
    /// Visible extent in world units, derived from scale and pixel size
    unit_width: f64,
    unit_height: f64,
}

impl Default for GridView {
    fn default() -> Self {
        Self::from_config(&ViewportConfig::default())
    }
}

impl GridView {
    /// Create a view of the given pixel size with default scale and boundary
    pub fn new(pixel_width: f64, pixel_height: f64) -> Self {
        Self::from_config(&ViewportConfig {
            pixel_width,
            pixel_height,
            ..Default::default()
        })
    }

    /// Build a view from settings. A non-finite or non-positive boundary falls
    /// back to the default play area.
    pub fn from_config(config: &ViewportConfig) -> Self {
        let boundary = if config.boundary.is_finite() && config.boundary > 0.0 {
            config.boundary
        } else {
            ViewportConfig::default().boundary
        };
        let mut view = Self {
            position: Point::ZERO,
            scale: config.scale,
            pixel_width: config.pixel_width.max(0.0),
            pixel_height: config.pixel_height.max(0.0),
            boundary,
            unit_width: 0.0,
            unit_height: 0.0,
        };
        view.set_scale(config.scale);
        view
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn boundary(&self) -> f64 {
        self.boundary
    }

    pub fn pixel_size(&self) -> (f64, f64) {
        (self.pixel_width, self.pixel_height)
    }

    /// Visible extent in world units
    pub fn unit_size(&self) -> (f64, f64) {
        (self.unit_width, self.unit_height)
    }

    /// Pan by `delta` world units, then clamp into the play area
    pub fn translate(&mut self, delta: Point) {
        self.position = self.position + delta;
        self.position.x = clamp_value(
            self.position.x,
            -self.boundary,
            self.boundary - self.unit_width,
        );
        self.position.y = clamp_value(
            self.position.y,
            -self.boundary,
            self.boundary - self.unit_height,
        );
    }

    /// Convert world coordinates to pixel coordinates
    pub fn unit_to_pixel(&self, p: Point) -> Point {
        (p - self.position) * (1.0 / self.scale)
    }

    /// Convert pixel coordinates to world coordinates
    pub fn pixel_to_unit(&self, p: Point) -> Point {
        self.position + p * self.scale
    }

    /// The current view as a box, for culling
    pub fn visible_region(&self) -> BBox {
        BBox::new(self.position, self.unit_width, self.unit_height)
    }

    /// Set the scale, limited so the visible extent never exceeds the play area
    pub fn set_scale(&mut self, scale: f64) {
        let widest = self.pixel_width.max(self.pixel_height);
        let max_scale = if widest > 0.0 {
            (2.0 * self.boundary / widest).max(MIN_SCALE)
        } else {
            f64::MAX
        };
        self.scale = if scale.is_finite() {
            clamp_value(scale, MIN_SCALE, max_scale)
        } else {
            max_scale.min(ViewportConfig::default().scale)
        };
        self.recalculate_unit_size();
        // re-clamp the position against the new extent
        self.translate(Point::ZERO);
    }

    /// Multiply the scale by `factor` (>1 zooms out, <1 zooms in)
    pub fn zoom(&mut self, factor: f64) {
        self.set_scale(self.scale * factor);
    }

    /// Zoom while keeping the world point under `pixel` fixed on screen
    /// (as far as the boundary allows)
    pub fn zoom_at(&mut self, pixel: Point, factor: f64) {
        let anchor = self.pixel_to_unit(pixel);
        self.set_scale(self.scale * factor);
        let drift = anchor - self.pixel_to_unit(pixel);
        self.translate(drift);
    }

    /// Resize the canvas dimensions
    pub fn resize(&mut self, pixel_width: f64, pixel_height: f64) {
        self.pixel_width = pixel_width.max(0.0);
        self.pixel_height = pixel_height.max(0.0);
        self.set_scale(self.scale);
    }

    fn recalculate_unit_size(&mut self) {
        self.unit_width = self.scale * self.pixel_width;
        self.unit_height = self.scale * self.pixel_height;
    }
}
