//! Physics world management with Rapier3D.

use crate::body::{DroneBody, FlightWorld};
use crate::collision::{CollisionGroup, PhysicsBody};
use crate::obstacle::{ColliderShape, ObstacleDescriptor};
use courier_core::{Pose, Quat, Vec3};
use rapier3d::na::{Quaternion, UnitQuaternion};
use rapier3d::prelude::*;

/// Standard gravity, in m/s².
pub const STANDARD_GRAVITY: f32 = 9.81;

/// Longest step handed to the solver; longer frames are split.
const MAX_SUBSTEP: f32 = 1.0 / 30.0;

fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn to_rotation(q: Quat) -> Rotation<Real> {
    UnitQuaternion::new_normalize(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn from_rotation(rot: &Rotation<Real>) -> Quat {
    Quat::from_xyzw(rot.i, rot.j, rot.k, rot.w)
}

/// Construction parameters for the drone's rigid body.
#[derive(Debug, Clone, Copy)]
pub struct DroneSpec {
    pub position: Vec3,
    pub radius: f32,
    pub mass: f32,
    pub restitution: f32,
    pub friction: f32,
    pub linear_damping: f32,
    /// Keep the solver from imparting spin; orientation then follows only the
    /// angular velocity set through [`DroneBody::set_angular_velocity`].
    pub fixed_rotation: bool,
}

impl Default for DroneSpec {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            radius: 0.5,
            mass: 1.0,
            restitution: 0.1,
            friction: 0.3,
            linear_damping: 0.01,
            fixed_rotation: true,
        }
    }
}

/// Handles and controller-owned state for the drone body.
#[derive(Debug, Clone, Copy)]
pub struct DroneRig {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
    mass: f32,
    fixed_rotation: bool,
    /// Commanded angular velocity when rotations are locked in the solver.
    angular_velocity: Vec3,
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
    drone: Option<DroneRig>,
    hazards: Vec<ColliderHandle>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with standard gravity.
    pub fn new() -> Self {
        Self::with_gravity(STANDARD_GRAVITY)
    }

    /// Create a physics world whose gravity pulls down with `gravity` m/s².
    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -gravity, 0.0],
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            drone: None,
            hazards: Vec::new(),
        }
    }

    /// Step the simulation by `dt` seconds, splitting long frames.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let substeps = (dt / MAX_SUBSTEP).ceil().max(1.0) as u32;
        let h = dt / substeps as f32;
        for _ in 0..substeps {
            self.step_once(h);
        }
        // Forces applied through `DroneBody::apply_force` last for one frame.
        if let Some(rig) = self.drone {
            if let Some(body) = self.rigid_body_set.get_mut(rig.body) {
                body.reset_forces(true);
            }
        }
    }

    fn step_once(&mut self, h: f32) {
        self.integration_parameters.dt = h;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );

        if let Some(rig) = self.drone {
            if rig.fixed_rotation {
                if let Some(body) = self.rigid_body_set.get_mut(rig.body) {
                    let mut rotation = Pose::new(Vec3::ZERO, from_rotation(body.rotation()));
                    rotation.integrate_rotation(rig.angular_velocity, h);
                    body.set_rotation(to_rotation(rotation.rotation), true);
                }
            }
        }
    }

    /// Create the drone body. Replaces any previous drone.
    pub fn attach_drone(&mut self, spec: DroneSpec) -> DroneRig {
        if let Some(old) = self.drone.take() {
            self.remove_body(old.body);
        }

        let mut builder = RigidBodyBuilder::dynamic()
            .translation(to_vector(spec.position))
            .linear_damping(spec.linear_damping)
            .ccd_enabled(true);
        if spec.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let body = self.rigid_body_set.insert(builder.build());

        let collider = ColliderBuilder::ball(spec.radius)
            .mass(spec.mass)
            .restitution(spec.restitution)
            .friction(spec.friction)
            .collision_groups(CollisionGroup::drone())
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);

        let rig = DroneRig {
            body,
            collider,
            mass: spec.mass,
            fixed_rotation: spec.fixed_rotation,
            angular_velocity: Vec3::ZERO,
        };
        self.drone = Some(rig);
        log::debug!("Drone attached at {:?}", spec.position);
        rig
    }

    /// Drone pose, if a drone is attached.
    pub fn drone_pose(&self) -> Option<Pose> {
        let rig = self.drone.as_ref()?;
        let body = self.rigid_body_set.get(rig.body)?;
        Some(Pose::new(from_vector(body.translation()), from_rotation(body.rotation())))
    }

    /// Borrow the drone body for reading and writing.
    pub fn drone_body_mut(&mut self) -> Option<DroneBodyMut<'_>> {
        let rig = self.drone.as_mut()?;
        let body = self.rigid_body_set.get_mut(rig.body)?;
        Some(DroneBodyMut { body, rig })
    }

    /// Add the collider an obstacle declares. Hazards become sensors and are
    /// registered for [`FlightWorld::drone_intersects_hazard`].
    pub fn add_obstacle(&mut self, obstacle: &ObstacleDescriptor) -> PhysicsBody {
        let builder = match obstacle.kind.collider_shape() {
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::Cylinder {
                half_height,
                radius,
            } => ColliderBuilder::cylinder(half_height, radius),
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::None => return PhysicsBody::none(),
        };

        let hazard = obstacle.kind.is_hazard();
        let groups = if hazard {
            CollisionGroup::hazard()
        } else {
            CollisionGroup::environment()
        };
        let collider = builder
            .translation(to_vector(obstacle.position))
            .sensor(hazard)
            .collision_groups(groups)
            .build();
        let handle = self.collider_set.insert(collider);
        if hazard {
            self.hazards.push(handle);
        }
        PhysicsBody::with_collider(handle)
    }

    /// Hazard sensor colliders, in registration order.
    pub fn hazard_handles(&self) -> &[ColliderHandle] {
        &self.hazards
    }

    /// Shape test between the drone and one collider, using the drone's current
    /// body pose (so a teleport is seen before the next step).
    pub fn drone_intersects(&self, collider: ColliderHandle) -> bool {
        let Some(rig) = self.drone.as_ref() else {
            return false;
        };
        let (Some(body), Some(drone_collider), Some(other)) = (
            self.rigid_body_set.get(rig.body),
            self.collider_set.get(rig.collider),
            self.collider_set.get(collider),
        ) else {
            return false;
        };
        rapier3d::parry::query::intersection_test(
            body.position(),
            drone_collider.shape(),
            other.position(),
            other.shape(),
        )
        .unwrap_or(false)
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

impl FlightWorld for PhysicsWorld {
    type Drone<'a> = DroneBodyMut<'a>;

    fn drone_mut(&mut self) -> Option<DroneBodyMut<'_>> {
        self.drone_body_mut()
    }

    fn step(&mut self, dt: f32) {
        PhysicsWorld::step(self, dt);
    }

    fn hazard_count(&self) -> usize {
        self.hazards.len()
    }

    fn drone_intersects_hazard(&self, index: usize) -> bool {
        self.hazards
            .get(index)
            .is_some_and(|&handle| self.drone_intersects(handle))
    }
}

/// Mutable view of the drone's rigid body.
pub struct DroneBodyMut<'a> {
    body: &'a mut RigidBody,
    rig: &'a mut DroneRig,
}

impl DroneBody for DroneBodyMut<'_> {
    fn pose(&self) -> Pose {
        Pose::new(
            from_vector(self.body.translation()),
            from_rotation(self.body.rotation()),
        )
    }

    fn set_pose(&mut self, pose: Pose) {
        self.body.set_translation(to_vector(pose.position), true);
        self.body.set_rotation(to_rotation(pose.rotation), true);
    }

    fn linear_velocity(&self) -> Vec3 {
        from_vector(self.body.linvel())
    }

    fn set_linear_velocity(&mut self, velocity: Vec3) {
        self.body.set_linvel(to_vector(velocity), true);
    }

    fn angular_velocity(&self) -> Vec3 {
        if self.rig.fixed_rotation {
            self.rig.angular_velocity
        } else {
            from_vector(self.body.angvel())
        }
    }

    fn set_angular_velocity(&mut self, velocity: Vec3) {
        self.rig.angular_velocity = velocity;
        if !self.rig.fixed_rotation {
            self.body.set_angvel(to_vector(velocity), true);
        }
    }

    fn apply_force(&mut self, force: Vec3, at_point: Vec3) {
        self.body
            .add_force_at_point(to_vector(force), point![at_point.x, at_point.y, at_point.z], true);
    }

    fn mass(&self) -> f32 {
        self.rig.mass
    }
}
