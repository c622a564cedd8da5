//! Spring-mass integrator
//!
//! Runs on the CPU, one [`Simulation::step`] per tick. The simulation works on
//! its own copies of the vertex positions and never touches the source graph.

use tracing::trace;

use super::types::{DEAD_ZONE, LayoutConfig, Particle, Spring};
use super::LayoutError;
use crate::geometry::{Point, clamp_value};
use crate::graph::Graph;

/// Particles and springs for one layout run
#[derive(Debug, Clone)]
pub struct Simulation {
    particles: Vec<Particle>,
    springs: Vec<Spring>,
    config: LayoutConfig,
    ticks: u64,
}

impl Simulation {
    /// Snapshot `graph`: one particle per vertex (same slot order) and one
    /// spring per edge, resting at the edge's current length
    pub fn from_graph(graph: &Graph, config: LayoutConfig) -> Result<Self, LayoutError> {
        let particles = graph
            .vertices()
            .iter()
            .map(|v| Particle::new(v.position, v.radius, config.radius_density))
            .collect();
        let springs = graph
            .edges()
            .iter()
            .map(|e| {
                let length =
                    Point::distance(graph.vertices()[e.a].position, graph.vertices()[e.b].position);
                Spring::new(e.a, e.b, length)
            })
            .collect();
        Self::from_parts(particles, springs, config)
    }

    /// Build from explicit particles and springs, e.g. to use an ideal spring
    /// length instead of the captured one
    pub fn from_parts(
        particles: Vec<Particle>,
        springs: Vec<Spring>,
        config: LayoutConfig,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        if let Some(spring) = springs
            .iter()
            .find(|s| s.a >= particles.len() || s.b >= particles.len() || s.a == s.b)
        {
            return Err(LayoutError::InvalidSpring {
                a: spring.a,
                b: spring.b,
                particles: particles.len(),
            });
        }
        Ok(Self {
            particles,
            springs,
            config,
            ticks: 0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Number of completed ticks
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn positions(&self) -> Vec<Point> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Advance one tick and return the new positions in vertex slot order
    pub fn step(&mut self) -> Vec<Point> {
        self.apply_spring_forces();
        self.integrate();
        self.ticks += 1;
        trace!(tick = self.ticks, particles = self.particles.len(), "layout tick");
        self.positions()
    }

    /// Run `n` ticks
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Hooke's law, with no force inside the dead zone
    fn apply_spring_forces(&mut self) {
        let k = self.config.spring_constant;
        for spring in &self.springs {
            let a = self.particles[spring.a].position;
            let b = self.particles[spring.b].position;
            let current = Point::distance(a, b);
            let displacement = current - spring.rest_length;
            // Coincident particles have no direction to push along
            if displacement.abs() <= DEAD_ZONE || current == 0.0 {
                continue;
            }
            // Positive displacement (stretched) pulls a toward b
            let force = Point::normalize(b - a) * (k * displacement);
            self.particles[spring.a].add_force(force);
            self.particles[spring.b].add_force(-force);
        }
    }

    /// Gravity, semi-implicit Euler, damping, then clamp into the play area
    fn integrate(&mut self) {
        let dt = self.config.timestep();
        let retain = 1.0 - self.config.damping;
        let boundary = self.config.boundary;
        let gravity = self.config.gravity;

        for particle in &mut self.particles {
            if !particle.is_immovable() {
                particle.add_force(Point::new(0.0, gravity * particle.mass));
                particle.velocity = particle.velocity + particle.force * (dt / particle.mass);
                particle.velocity = particle.velocity * retain;
                particle.position = particle.position + particle.velocity * dt;
            }
            particle.force = Point::ZERO;

            // immovable particles are still held inside the play area
            let min = -boundary + particle.radius;
            let max = boundary - particle.radius;
            let x = clamp_value(particle.position.x, min, max);
            let y = clamp_value(particle.position.y, min, max);
            if x != particle.position.x {
                particle.velocity.x = 0.0;
            }
            if y != particle.position.y {
                particle.velocity.y = 0.0;
            }
            particle.position = Point::new(x, y);
        }
    }
}
