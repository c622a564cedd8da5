//! graphplane - a spatial graph engine for editing graphs on a bounded 2D plane.
//!
//! This crate provides the geometry, viewport mapping, graph model, shortest-path
//! search and spring-mass layout behind an interactive graph editor. Rendering and
//! input handling live elsewhere and call into these modules with plain data.

pub mod config;
pub mod geometry;
pub mod graph;
pub mod layout;
pub mod pathfind;
pub mod snapshot;
pub mod viewport;
