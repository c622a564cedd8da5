//! Simulation parameters and per-run state

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::LayoutError;
use crate::geometry::Point;

// =============================================================================
// Default Constants
// =============================================================================

/// Default mass per unit of radius
pub const DEFAULT_RADIUS_DENSITY: f64 = 1.0;

/// Default spring constant (force per unit of displacement)
pub const DEFAULT_SPRING_CONSTANT: f64 = 0.3;

/// Default downward acceleration scale
pub const DEFAULT_GRAVITY: f64 = 1.0;

/// Default tick rate, also the integration timestep divisor
pub const DEFAULT_STEPS_PER_SECOND: f64 = 60.0;

/// Default fraction of velocity removed each tick
pub const DEFAULT_DAMPING: f64 = 0.1;

/// Default half extent of the play area
pub const DEFAULT_BOUNDARY: f64 = 15.0;

/// Springs within this distance of their rest length apply no force
pub const DEAD_ZONE: f64 = 0.002;

/// Tunable parameters for a layout run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Mass per unit of radius
    pub radius_density: f64,
    /// Force per unit of spring displacement
    pub spring_constant: f64,
    /// Downward acceleration scale (y grows downward)
    pub gravity: f64,
    /// Ticks per simulated second
    pub steps_per_second: f64,
    /// Fraction of velocity removed each tick (0 = none)
    pub damping: f64,
    /// Particles are kept inside `[-boundary, boundary]²`
    pub boundary: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius_density: DEFAULT_RADIUS_DENSITY,
            spring_constant: DEFAULT_SPRING_CONSTANT,
            gravity: DEFAULT_GRAVITY,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            damping: DEFAULT_DAMPING,
            boundary: DEFAULT_BOUNDARY,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let fields = [
            ("radius_density", self.radius_density),
            ("spring_constant", self.spring_constant),
            ("gravity", self.gravity),
            ("steps_per_second", self.steps_per_second),
            ("damping", self.damping),
            ("boundary", self.boundary),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LayoutError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }
        if self.steps_per_second <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "steps_per_second must be positive".to_string(),
            ));
        }
        if self.radius_density <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "radius_density must be positive".to_string(),
            ));
        }
        if self.boundary <= 0.0 {
            return Err(LayoutError::InvalidConfig(
                "boundary must be positive".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.damping) {
            return Err(LayoutError::InvalidConfig(
                "damping must be in [0, 1)".to_string(),
            ));
        }
        self.tick_period()?;
        Ok(())
    }

    /// Simulated seconds per tick
    pub fn timestep(&self) -> f64 {
        1.0 / self.steps_per_second
    }

    /// Wall-clock delay between ticks
    pub fn tick_period(&self) -> Result<Duration, LayoutError> {
        Duration::try_from_secs_f64(self.timestep()).map_err(|_| {
            LayoutError::InvalidConfig(format!(
                "steps_per_second {} gives an unrepresentable tick period",
                self.steps_per_second
            ))
        })
    }
}

/// A simulated body, one per vertex
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    /// Force accumulated during the current tick
    pub force: Point,
    pub mass: f64,
    pub radius: f64,
}

impl Particle {
    pub fn new(position: Point, radius: f64, radius_density: f64) -> Self {
        Self {
            position,
            velocity: Point::ZERO,
            force: Point::ZERO,
            mass: radius_density * radius,
            radius,
        }
    }

    pub fn add_force(&mut self, force: Point) {
        self.force = self.force + force;
    }

    /// Massless particles cannot be accelerated and stay put
    pub fn is_immovable(&self) -> bool {
        self.mass <= 0.0
    }
}

/// A spring between two particle slots
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub a: usize,
    pub b: usize,
    pub rest_length: f64,
}

impl Spring {
    pub fn new(a: usize, b: usize, rest_length: f64) -> Self {
        Self { a, b, rest_length }
    }
}
