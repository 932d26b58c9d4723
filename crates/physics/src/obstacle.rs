//! Obstacle descriptors built at world-construction time.
//!
//! Every obstacle declares its kind and its collider shape up front; nothing is
//! inferred from mesh names at runtime.

use courier_core::Vec3;
use serde::{Deserialize, Serialize};

/// Collider geometry for one obstacle, centred on the obstacle's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Cuboid { half_extents: Vec3 },
    Cylinder { half_height: f32, radius: f32 },
    Ball { radius: f32 },
    /// No collider: contact is handled elsewhere (the ground floor clamp).
    None,
}

/// What an obstacle is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Building { width: f32, height: f32, depth: f32 },
    TreeTrunk { height: f32, radius: f32 },
    TreeLeaves { radius: f32 },
    Barrel { height: f32, radius: f32 },
    Terrain { size: f32 },
}

impl ObstacleKind {
    pub fn collider_shape(&self) -> ColliderShape {
        match *self {
            ObstacleKind::Building {
                width,
                height,
                depth,
            } => ColliderShape::Cuboid {
                half_extents: Vec3::new(width, height, depth) * 0.5,
            },
            ObstacleKind::TreeTrunk { height, radius } | ObstacleKind::Barrel { height, radius } => {
                ColliderShape::Cylinder {
                    half_height: height * 0.5,
                    radius,
                }
            }
            ObstacleKind::TreeLeaves { radius } => ColliderShape::Ball { radius },
            ObstacleKind::Terrain { .. } => ColliderShape::None,
        }
    }

    /// Hazards cost a life on contact instead of blocking the drone.
    pub fn is_hazard(&self) -> bool {
        matches!(self, ObstacleKind::Barrel { .. })
    }

    /// Whether the obstacle gets a marker on the minimap.
    pub fn shows_on_map(&self) -> bool {
        !matches!(
            self,
            ObstacleKind::TreeLeaves { .. } | ObstacleKind::Terrain { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            ObstacleKind::Building { .. } => "building",
            ObstacleKind::TreeTrunk { .. } => "tree trunk",
            ObstacleKind::TreeLeaves { .. } => "tree leaves",
            ObstacleKind::Barrel { .. } => "barrel",
            ObstacleKind::Terrain { .. } => "terrain",
        }
    }
}

/// One obstacle placed in the world. `position` is the collider centre.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleDescriptor {
    pub kind: ObstacleKind,
    pub position: Vec3,
}

impl ObstacleDescriptor {
    pub fn new(kind: ObstacleKind, position: Vec3) -> Self {
        Self { kind, position }
    }

    /// Place an obstacle so its base sits at `base` (centre is lifted by half its height).
    pub fn standing_on(kind: ObstacleKind, base: Vec3) -> Self {
        let lift = match kind {
            ObstacleKind::Building { height, .. }
            | ObstacleKind::TreeTrunk { height, .. }
            | ObstacleKind::Barrel { height, .. } => height * 0.5,
            ObstacleKind::TreeLeaves { radius } => radius,
            ObstacleKind::Terrain { .. } => 0.0,
        };
        Self {
            kind,
            position: base + Vec3::Y * lift,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barrel_is_the_only_hazard() {
        let barrel = ObstacleKind::Barrel {
            height: 2.5,
            radius: 1.0,
        };
        assert!(barrel.is_hazard());
        assert!(!ObstacleKind::TreeLeaves { radius: 1.5 }.is_hazard());
        assert!(!ObstacleKind::Terrain { size: 100.0 }.is_hazard());
        assert_eq!(barrel.name(), "barrel");
    }

    #[test]
    fn building_shape_is_half_extents() {
        let kind = ObstacleKind::Building {
            width: 2.2,
            height: 14.0,
            depth: 2.2,
        };
        assert_eq!(
            kind.collider_shape(),
            ColliderShape::Cuboid {
                half_extents: Vec3::new(1.1, 7.0, 1.1)
            }
        );
    }

    #[test]
    fn standing_on_lifts_centre_by_half_height() {
        let d = ObstacleDescriptor::standing_on(
            ObstacleKind::Barrel {
                height: 2.5,
                radius: 1.0,
            },
            Vec3::new(10.0, 0.0, 15.0),
        );
        assert_eq!(d.position, Vec3::new(10.0, 1.25, 15.0));
    }

    #[test]
    fn terrain_has_no_collider() {
        assert_eq!(
            ObstacleKind::Terrain { size: 100.0 }.collider_shape(),
            ColliderShape::None
        );
    }
}
