//! The physics surface the game core is allowed to touch.
//!
//! The core never sees rapier types: it reads and writes the drone through
//! [`DroneBody`] and drives the simulation through [`FlightWorld`].

use courier_core::{Pose, Vec3};

/// One controllable rigid body.
pub trait DroneBody {
    fn pose(&self) -> Pose;
    fn set_pose(&mut self, pose: Pose);
    fn linear_velocity(&self) -> Vec3;
    fn set_linear_velocity(&mut self, velocity: Vec3);
    fn angular_velocity(&self) -> Vec3;
    fn set_angular_velocity(&mut self, velocity: Vec3);
    /// Apply a force for the next simulation step.
    fn apply_force(&mut self, force: Vec3, at_point: Vec3);
    fn mass(&self) -> f32;

    /// Put the body at `position`, level, with no motion.
    fn respawn_at(&mut self, position: Vec3) {
        self.set_pose(Pose::level_at(position));
        self.set_linear_velocity(Vec3::ZERO);
        self.set_angular_velocity(Vec3::ZERO);
    }
}

impl<T: DroneBody + ?Sized> DroneBody for &mut T {
    fn pose(&self) -> Pose {
        (**self).pose()
    }
    fn set_pose(&mut self, pose: Pose) {
        (**self).set_pose(pose)
    }
    fn linear_velocity(&self) -> Vec3 {
        (**self).linear_velocity()
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        (**self).set_linear_velocity(velocity)
    }
    fn angular_velocity(&self) -> Vec3 {
        (**self).angular_velocity()
    }
    fn set_angular_velocity(&mut self, velocity: Vec3) {
        (**self).set_angular_velocity(velocity)
    }
    fn apply_force(&mut self, force: Vec3, at_point: Vec3) {
        (**self).apply_force(force, at_point)
    }
    fn mass(&self) -> f32 {
        (**self).mass()
    }
    fn respawn_at(&mut self, position: Vec3) {
        (**self).respawn_at(position)
    }
}

/// The world the drone flies in: its body, the integrator, and the hazard set.
pub trait FlightWorld {
    type Drone<'a>: DroneBody
    where
        Self: 'a;

    /// The drone, if it has been attached yet.
    fn drone_mut(&mut self) -> Option<Self::Drone<'_>>;

    /// Integrate one step of `dt` seconds.
    fn step(&mut self, dt: f32);

    fn hazard_count(&self) -> usize;

    /// Whether the drone currently overlaps hazard `index` (in `0..hazard_count()`).
    fn drone_intersects_hazard(&self, index: usize) -> bool;
}
