//! Play-area box, altitude ceiling and floor.

use courier_core::{Pose, Vec3};
use physics::DroneBody;

use crate::config::ArenaConfig;

/// Axis-aligned limits for the drone centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    pub min: Vec3,
    pub max: Vec3,
}

impl PlayArea {
    pub fn from_config(arena: &ArenaConfig) -> Self {
        Self {
            min: Vec3::new(arena.min_x, arena.floor.unwrap_or(f32::NEG_INFINITY), arena.min_z),
            max: Vec3::new(arena.max_x, arena.ceiling, arena.max_z),
        }
    }

    pub fn contains(&self, position: Vec3) -> bool {
        position.cmpge(self.min).all() && position.cmple(self.max).all()
    }
}

/// Result of one clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clamped {
    pub position: Vec3,
    pub velocity: Vec3,
    pub corrected: bool,
}

pub struct BoundaryGuard {
    area: PlayArea,
}

impl BoundaryGuard {
    pub fn new(area: PlayArea) -> Self {
        Self { area }
    }

    pub fn from_config(arena: &ArenaConfig) -> Self {
        Self::new(PlayArea::from_config(arena))
    }

    pub fn area(&self) -> &PlayArea {
        &self.area
    }

    /// Clamp a position into the area.
    ///
    /// Only axes that were out of bounds are touched, and on those only the
    /// velocity component pointing further out is zeroed.
    pub fn clamp(&self, position: Vec3, velocity: Vec3) -> Clamped {
        if self.area.contains(position) {
            return Clamped {
                position,
                velocity,
                corrected: false,
            };
        }
        let mut p = position.to_array();
        let mut v = velocity.to_array();
        let min = self.area.min.to_array();
        let max = self.area.max.to_array();
        let mut corrected = false;

        for axis in 0..3 {
            if p[axis] > max[axis] {
                p[axis] = max[axis];
                v[axis] = v[axis].min(0.0);
                corrected = true;
            } else if p[axis] < min[axis] {
                p[axis] = min[axis];
                v[axis] = v[axis].max(0.0);
                corrected = true;
            }
        }

        Clamped {
            position: Vec3::from_array(p),
            velocity: Vec3::from_array(v),
            corrected,
        }
    }

    /// Clamp the body in place. Returns whether anything changed.
    pub fn apply<B: DroneBody>(&self, body: &mut B) -> bool {
        let pose = body.pose();
        let result = self.clamp(pose.position, body.linear_velocity());
        if result.corrected {
            body.set_pose(Pose::new(result.position, pose.rotation));
            body.set_linear_velocity(result.velocity);
        }
        result.corrected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> BoundaryGuard {
        BoundaryGuard::from_config(&ArenaConfig::default())
    }

    #[test]
    fn boundary_in_bounds_is_unchanged() {
        let p = Vec3::new(10.0, 20.0, -30.0);
        let v = Vec3::new(5.0, -1.0, 2.0);
        let out = guard().clamp(p, v);
        assert_eq!(out.position, p);
        assert_eq!(out.velocity, v);
        assert!(!out.corrected);
    }

    #[test]
    fn boundary_zeroes_only_outward_velocity() {
        let out = guard().clamp(Vec3::new(52.0, 10.0, 0.0), Vec3::new(4.0, 1.0, -3.0));
        assert_eq!(out.position, Vec3::new(49.0, 10.0, 0.0));
        assert_eq!(out.velocity, Vec3::new(0.0, 1.0, -3.0));

        // Already heading back in: keep it.
        let out = guard().clamp(Vec3::new(-50.0, 10.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(out.position.x, -49.0);
        assert_eq!(out.velocity.x, 2.0);
    }

    #[test]
    fn boundary_clamp_is_idempotent() {
        let g = guard();
        let outside = Vec3::new(60.0, 170.0, -55.0);
        let once = g.clamp(outside, Vec3::new(1.0, 3.0, -2.0));
        let twice = g.clamp(once.position, once.velocity);
        assert_eq!(once.position, Vec3::new(49.0, 150.0, -49.0));
        assert!(!g.area().contains(outside));
        assert!(g.area().contains(once.position));
        assert_eq!(twice.position, once.position);
        assert_eq!(twice.velocity, once.velocity);
        assert!(!twice.corrected);
    }

    #[test]
    fn boundary_ceiling_zeroes_upward_only() {
        let out = guard().clamp(Vec3::new(0.0, 151.0, 0.0), Vec3::new(0.0, 6.0, 0.0));
        assert_eq!(out.position.y, 150.0);
        assert_eq!(out.velocity.y, 0.0);
        let out = guard().clamp(Vec3::new(0.0, 151.0, 0.0), Vec3::new(0.0, -6.0, 0.0));
        assert_eq!(out.velocity.y, -6.0);
    }

    #[test]
    fn boundary_floor_stops_descent() {
        let out = guard().clamp(Vec3::new(0.0, -0.2, 0.0), Vec3::new(1.0, -8.0, 0.0));
        assert_eq!(out.position, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(out.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn boundary_without_floor_lets_body_sink() {
        let arena = ArenaConfig {
            floor: None,
            ..Default::default()
        };
        let out = BoundaryGuard::from_config(&arena).clamp(Vec3::new(0.0, -5.0, 0.0), Vec3::NEG_Y);
        assert!(!out.corrected);
    }
}
