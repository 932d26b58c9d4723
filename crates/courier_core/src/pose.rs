//! Rigid-body pose and the orientation helpers the flight controller builds on.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Directions below this squared length are treated as "no direction".
pub const DIRECTION_EPSILON_SQ: f32 = 1.0e-6;

/// World-space position and orientation of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Level (identity-orientation) pose at the given position.
    pub fn level_at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Altitude above the world origin plane.
    pub fn altitude(&self) -> f32 {
        self.position.y
    }

    /// Integrate an angular velocity (rad/s, world frame) over `dt` seconds.
    pub fn integrate_rotation(&mut self, angular_velocity: Vec3, dt: f32) {
        let delta = angular_velocity * dt;
        if delta.length_squared() > 0.0 {
            self.rotation = (Quat::from_scaled_axis(delta) * self.rotation).normalize();
        }
    }
}

/// Drop the vertical component of a vector.
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Project onto the horizontal plane and renormalize. Zero when the vector is (nearly) vertical.
pub fn horizontal_direction(v: Vec3) -> Vec3 {
    let flat = horizontal(v);
    if flat.length_squared() < DIRECTION_EPSILON_SQ {
        Vec3::ZERO
    } else {
        flat.normalize()
    }
}

/// Rotation axis and angle carrying unit vector `from` onto unit vector `to`.
///
/// Returns `None` when the vectors are already aligned, or when they are
/// antiparallel (the shortest arc is undefined there; callers pick their own axis).
pub fn arc_between(from: Vec3, to: Vec3) -> Option<(Vec3, f32)> {
    let dot = from.dot(to).clamp(-1.0, 1.0);
    let axis = from.cross(to);
    if axis.length_squared() < DIRECTION_EPSILON_SQ {
        return None;
    }
    Some((axis.normalize(), dot.acos()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn pose_level_axes_match_world() {
        let pose = Pose::level_at(Vec3::new(1.0, 2.0, 3.0));
        assert!((pose.forward() - -Vec3::Z).length() < 1e-6);
        assert!((pose.right() - Vec3::X).length() < 1e-6);
        assert!((pose.up() - Vec3::Y).length() < 1e-6);
        assert_eq!(pose.altitude(), 2.0);
    }

    #[test]
    fn horizontal_direction_of_vertical_is_zero() {
        assert_eq!(horizontal_direction(Vec3::Y * 4.0), Vec3::ZERO);
        let d = horizontal_direction(Vec3::new(3.0, 10.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert_eq!(d.y, 0.0);
    }

    #[test]
    fn arc_between_quarter_turn_about_y() {
        let (axis, angle) = arc_between(-Vec3::Z, Vec3::X).unwrap();
        assert!((axis - -Vec3::Y).length() < 1e-5);
        assert!((angle - FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn arc_between_antiparallel_is_none() {
        assert!(arc_between(Vec3::X, -Vec3::X).is_none());
        assert!(arc_between(Vec3::X, Vec3::X).is_none());
    }

    #[test]
    fn integrate_rotation_quarter_turn() {
        let mut pose = Pose::default();
        pose.integrate_rotation(Vec3::Y * FRAC_PI_2, 1.0);
        // Rotating -Z by +90° about Y lands on -X.
        assert!((pose.forward() - -Vec3::X).length() < 1e-5);
    }
}
