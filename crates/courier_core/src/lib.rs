//! Core types and utilities for SkyCourier.
//!
//! This crate provides the foundational types used across the game crates:
//! - Rigid-body pose and orientation helpers
//! - Frame timing and deferred task scheduling
//! - Small gameplay components (countdowns, lives)

pub mod components;
pub mod pose;
pub mod schedule;
pub mod time;

pub use components::*;
pub use pose::*;
pub use schedule::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Quat, Vec2, Vec3};
