//! Deterministic stand-ins for the physics world and the score store.

use std::cell::Cell;

use courier_core::{Pose, Vec3};
use physics::{DroneBody, FlightWorld};

use crate::score::{MemoryScoreStore, ScoreEntry, ScoreError, ScoreStore};

/// A drone without rapier: forces integrate with semi-implicit Euler.
#[derive(Debug, Clone)]
pub struct PointMass {
    pub pose: Pose,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub mass: f32,
    pub radius: f32,
    pub force: Vec3,
    pub respawns: usize,
}

impl PointMass {
    pub fn at(position: Vec3) -> Self {
        Self {
            pose: Pose::level_at(position),
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            mass: 1.0,
            radius: 0.5,
            force: Vec3::ZERO,
            respawns: 0,
        }
    }
}

impl DroneBody for PointMass {
    fn pose(&self) -> Pose {
        self.pose
    }
    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }
    fn linear_velocity(&self) -> Vec3 {
        self.velocity
    }
    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }
    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }
    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.angular_velocity = velocity;
    }
    fn apply_force(&mut self, force: Vec3, _at_point: Vec3) {
        self.force += force;
    }
    fn mass(&self) -> f32 {
        self.mass
    }
    fn respawn_at(&mut self, position: Vec3) {
        self.respawns += 1;
        self.pose = Pose::level_at(position);
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }
}

/// Sphere hazards around a single point-mass drone.
pub struct PointMassWorld {
    pub drone: Option<PointMass>,
    pub gravity: f32,
    pub hazards: Vec<(Vec3, f32)>,
    pub hazard_queries: Cell<usize>,
    pub steps: usize,
}

impl PointMassWorld {
    pub fn with_drone_at(position: Vec3) -> Self {
        Self {
            drone: Some(PointMass::at(position)),
            gravity: 9.81,
            hazards: Vec::new(),
            hazard_queries: Cell::new(0),
            steps: 0,
        }
    }

    pub fn empty() -> Self {
        Self {
            drone: None,
            ..Self::with_drone_at(Vec3::ZERO)
        }
    }

    pub fn drone(&self) -> &PointMass {
        self.drone.as_ref().expect("test world has a drone")
    }

    /// Put the drone at `position` with no motion, without counting a respawn.
    pub fn place_drone(&mut self, position: Vec3) {
        let drone = self.drone.as_mut().expect("test world has a drone");
        drone.pose = Pose::level_at(position);
        drone.velocity = Vec3::ZERO;
    }
}

impl FlightWorld for PointMassWorld {
    type Drone<'a> = &'a mut PointMass;

    fn drone_mut(&mut self) -> Option<&mut PointMass> {
        self.drone.as_mut()
    }

    fn step(&mut self, dt: f32) {
        self.steps += 1;
        let gravity = self.gravity;
        if let Some(d) = self.drone.as_mut() {
            let accel = d.force / d.mass - Vec3::Y * gravity;
            d.velocity += accel * dt;
            d.pose.position += d.velocity * dt;
            d.pose.integrate_rotation(d.angular_velocity, dt);
            d.force = Vec3::ZERO;
        }
    }

    fn hazard_count(&self) -> usize {
        self.hazards.len()
    }

    fn drone_intersects_hazard(&self, index: usize) -> bool {
        self.hazard_queries.set(self.hazard_queries.get() + 1);
        match (&self.drone, self.hazards.get(index)) {
            (Some(d), Some(&(centre, radius))) => {
                d.pose.position.distance(centre) < radius + d.radius
            }
            _ => false,
        }
    }
}

/// Memory store that counts submissions and can fail reads.
#[derive(Debug, Default)]
pub struct RecordingStore {
    pub inner: MemoryScoreStore,
    pub submissions: usize,
    pub fail_reads: bool,
}

impl ScoreStore for RecordingStore {
    fn submit(&mut self, entry: ScoreEntry) -> Result<bool, ScoreError> {
        self.submissions += 1;
        self.inner.submit(entry)
    }

    fn top_n(&self, n: usize) -> Result<Vec<ScoreEntry>, ScoreError> {
        if self.fail_reads {
            return Err(ScoreError::Io {
                path: "remote".into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "offline"),
            });
        }
        self.inner.top_n(n)
    }
}
