//! Top-down minimap projection.

use courier_core::{Vec2, Vec3};

use crate::config::MinimapConfig;

/// Affine map from a world X/Z box to a pixel rectangle.
///
/// World +Z points up the map, so pixel Y is flipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapProjection {
    world_min: Vec2,
    world_max: Vec2,
    size_px: Vec2,
}

impl MinimapProjection {
    pub fn new(world_min: Vec2, world_max: Vec2, size_px: Vec2) -> Self {
        Self {
            world_min,
            world_max,
            size_px,
        }
    }

    pub fn from_config(config: &MinimapConfig) -> Self {
        Self::new(config.world_min, config.world_max, config.size_px)
    }

    /// Pixel position of a world point, clamped to the map edges.
    pub fn to_pixels(&self, world: Vec3) -> Vec2 {
        let extent = (self.world_max - self.world_min).max(Vec2::splat(f32::EPSILON));
        let normalized = ((Vec2::new(world.x, world.z) - self.world_min) / extent).clamp(Vec2::ZERO, Vec2::ONE);
        Vec2::new(
            normalized.x * self.size_px.x,
            (1.0 - normalized.y) * self.size_px.y,
        )
    }

    pub fn size_px(&self) -> Vec2 {
        self.size_px
    }
}

/// Marker positions for one frame, in map pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapFrame {
    pub player: Vec2,
    /// Hidden when there is no active pickup or drop-off.
    pub target: Option<Vec2>,
}

impl MinimapFrame {
    pub fn project(projection: &MinimapProjection, player: Vec3, target: Option<Vec3>) -> Self {
        Self {
            player: projection.to_pixels(player),
            target: target.map(|t| projection.to_pixels(t)),
        }
    }
}
