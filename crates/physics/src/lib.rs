//! Physics for SkyCourier: the rapier3d world, the drone body, and the
//! collaborator traits the game core drives it through.

pub mod body;
pub mod collision;
pub mod obstacle;
pub mod physics_world;

pub use body::*;
pub use collision::*;
pub use obstacle::*;
pub use physics_world::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};
