//! Core engine types and utilities for SpaceRocks.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Transform, rotator and the craft-local basis convention
//! - Fixed-step clock and per-tick context
//! - Common component types for ECS

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
pub use hecs::{Entity, World};
