//! Spring-mass layout of the graph
//!
//! Vertices become particles (mass proportional to radius) and edges become
//! springs whose rest length is the edge's length at the moment the run
//! starts. A graph that starts out stretched therefore keeps that stretch as
//! its equilibrium; callers that want an ideal length can build a
//! [`Simulation`] from explicit [`Spring`]s instead.
//!
//! # Example
//!
//! ```rust,ignore
//! use graphplane::layout::{LayoutConfig, LayoutSimulator};
//!
//! let mut simulator = LayoutSimulator::new(LayoutConfig::default())?;
//! let handle = simulator.start(&graph, |positions| {
//!     println!("{} particles moved", positions.len());
//! })?;
//!
//! // later
//! handle.stop_and_wait().await?;
//! ```
//!
//! # Tick order
//!
//! 1. Springs outside the dead zone push or pull their particles
//! 2. Gravity is added and every particle integrates (semi-implicit Euler)
//! 3. Positions are clamped into the play area, shrunk by each radius
//! 4. Positions are reported to the caller

use thiserror::Error;

mod runner;
mod simulation;
mod types;

pub use runner::{LayoutSimulator, LayoutState, StopHandle};
pub use simulation::Simulation;
pub use types::{
    DEAD_ZONE, DEFAULT_BOUNDARY, DEFAULT_DAMPING, DEFAULT_GRAVITY, DEFAULT_RADIUS_DENSITY,
    DEFAULT_SPRING_CONSTANT, DEFAULT_STEPS_PER_SECOND, LayoutConfig, Particle, Spring,
};

/// Errors that can occur when setting up or running a layout
#[derive(Error, Debug)]
pub enum LayoutError {
    /// A run is already in progress on this simulator
    #[error("layout is already running")]
    AlreadyRunning,

    #[error("invalid layout config: {0}")]
    InvalidConfig(String),

    #[error("spring {a}-{b} does not fit {particles} particles")]
    InvalidSpring { a: usize, b: usize, particles: usize },

    /// `start` was called outside a tokio runtime
    #[error("no async runtime available to drive the layout")]
    NoRuntime,

    #[error("layout task failed: {0}")]
    TaskFailed(String),
}
