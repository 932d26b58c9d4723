//! Drone flight control: turns held directions and the camera heading into a
//! force and an angular velocity for the drone body.
//!
//! `FlightController::command` is pure; `apply` writes the result to a body.
//! The controller knows nothing about missions or scoring.

use courier_core::{arc_between, horizontal, horizontal_direction, Pose, Quat, Vec3};
use input::InputState;
use physics::DroneBody;
use std::f32::consts::PI;

use crate::config::FlightTuning;

/// Squared length under which a summed direction counts as "no intent".
const INTENT_EPSILON_SQ: f32 = 1.0e-6;
/// Dot product below which heading and motion count as opposite.
const OPPOSITE_DOT: f32 = -0.999;
/// Heading errors below this (radians) produce no yaw.
const YAW_DEAD_ZONE: f32 = 1.0e-3;

/// Horizontal camera axes the thrust is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    /// Basis from a camera forward vector alone (right = forward × up).
    pub fn from_forward(forward: Vec3) -> Self {
        let forward = horizontal_direction(forward);
        Self {
            forward,
            right: forward.cross(Vec3::Y),
        }
    }

    /// Camera looking from `eye` toward `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self::from_forward(target - eye)
    }
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_forward(-Vec3::Z)
    }
}

/// What the controller wants done to the body this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightCommand {
    /// Thrust plus vertical force, applied at the centre of mass.
    pub force: Vec3,
    /// Horizontal damping force (zero while a direction is held).
    pub damping: Vec3,
    /// Angular velocity to set on the body.
    pub angular_velocity: Vec3,
    pub has_horizontal_intent: bool,
}

/// Inputs to one controller evaluation.
#[derive(Debug, Clone, Copy)]
pub struct FlightInputs<'a> {
    pub input: &'a InputState,
    pub camera: CameraBasis,
    pub pose: Pose,
    pub velocity: Vec3,
    pub mass: f32,
    pub gravity: f32,
}

pub struct FlightController {
    tuning: FlightTuning,
}

impl FlightController {
    pub fn new(tuning: FlightTuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &FlightTuning {
        &self.tuning
    }

    /// Compute this frame's command.
    pub fn command(&self, f: &FlightInputs<'_>) -> FlightCommand {
        let t = &self.tuning;
        let intent = horizontal_intent(f.input, f.camera);
        let has_intent = intent.length_squared() > INTENT_EPSILON_SQ;

        let thrust = if has_intent {
            intent.normalize() * t.horizontal_force
        } else {
            Vec3::ZERO
        };

        let weight = f.mass * f.gravity;
        let vertical = if f.input.up {
            t.lift_force + weight
        } else if f.input.down {
            weight - t.lift_force * t.descent_fraction
        } else {
            weight * t.idle_gravity_compensation
        };

        let horizontal_velocity = horizontal(f.velocity);
        let damping = if !has_intent
            && horizontal_velocity.length_squared() >= t.damping_dead_band_sq
        {
            -horizontal_velocity * t.stabilization_factor * f.mass
        } else {
            Vec3::ZERO
        };

        let yaw = if has_intent {
            self.yaw_correction(&f.pose, horizontal_velocity)
        } else {
            Vec3::ZERO
        };
        let righting = self.righting_correction(&f.pose);

        FlightCommand {
            force: thrust + Vec3::Y * vertical,
            damping,
            angular_velocity: yaw + righting,
            has_horizontal_intent: has_intent,
        }
    }

    /// Compute and apply this frame's command to `body`.
    pub fn apply<B: DroneBody>(
        &self,
        body: &mut B,
        input: &InputState,
        camera: CameraBasis,
        gravity: f32,
    ) -> FlightCommand {
        let pose = body.pose();
        let command = self.command(&FlightInputs {
            input,
            camera,
            pose,
            velocity: body.linear_velocity(),
            mass: body.mass(),
            gravity,
        });
        body.apply_force(command.force, pose.position);
        if command.damping != Vec3::ZERO {
            body.apply_force(command.damping, pose.position);
        }
        body.set_angular_velocity(command.angular_velocity);
        command
    }

    /// Turn the nose toward the direction of travel.
    fn yaw_correction(&self, pose: &Pose, horizontal_velocity: Vec3) -> Vec3 {
        let t = &self.tuning;
        if horizontal_velocity.length() <= t.yaw_speed_threshold {
            return Vec3::ZERO;
        }
        let heading = horizontal_direction(pose.forward());
        if heading == Vec3::ZERO {
            // Nose straight up or down: let righting bring it back first.
            return Vec3::ZERO;
        }
        let target = horizontal_velocity.normalize();

        if heading.dot(target) < OPPOSITE_DOT {
            // Opposite headings have no shortest arc; always turn the same way.
            return Vec3::Y * PI * t.yaw_rate;
        }
        match arc_between(heading, target) {
            Some((axis, angle)) if angle > YAW_DEAD_ZONE => axis * angle * t.yaw_rate,
            _ => Vec3::ZERO,
        }
    }

    /// Pull the body's up axis back to world up.
    fn righting_correction(&self, pose: &Pose) -> Vec3 {
        let t = &self.tuning;
        let up = pose.up();
        let tilt = up.dot(Vec3::Y).clamp(-1.0, 1.0).acos();
        if tilt <= t.righting_tolerance {
            return Vec3::ZERO;
        }
        match arc_between(up, Vec3::Y) {
            Some((axis, angle)) => axis * angle * t.righting_strength,
            // Upside down: roll back over the body's own right axis.
            None => pose.right().normalize() * PI * t.righting_strength,
        }
    }
}

/// Camera-relative direction from the held keys (unnormalized).
fn horizontal_intent(input: &InputState, camera: CameraBasis) -> Vec3 {
    let mut intent = Vec3::ZERO;
    if input.forward {
        intent += camera.forward;
    }
    if input.backward {
        intent -= camera.forward;
    }
    if input.right {
        intent += camera.right;
    }
    if input.left {
        intent -= camera.right;
    }
    intent
}

/// Cosmetic lean of the drone model in its direction of motion.
///
/// Kept as a local offset from the physics orientation; it never feeds back
/// into the body.
#[derive(Debug, Clone, Copy)]
pub struct VisualTilt {
    local: Quat,
}

impl Default for VisualTilt {
    fn default() -> Self {
        Self {
            local: Quat::IDENTITY,
        }
    }
}

impl VisualTilt {
    /// Move the lean toward the one implied by `velocity` and return it.
    pub fn update(&mut self, tuning: &FlightTuning, pose: &Pose, velocity: Vec3, dt: f32) -> Quat {
        let forward_speed = velocity.dot(horizontal_direction(pose.forward()));
        let right_speed = velocity.dot(horizontal_direction(pose.right()));

        let pitch = (-forward_speed * tuning.tilt_per_speed).clamp(-tuning.max_tilt, tuning.max_tilt);
        let roll = (-right_speed * tuning.tilt_per_speed).clamp(-tuning.max_tilt, tuning.max_tilt);
        let target = Quat::from_rotation_x(pitch) * Quat::from_rotation_z(roll);

        let blend = (dt * tuning.tilt_smoothing).clamp(0.0, 1.0);
        self.local = self.local.slerp(target, blend).normalize();
        self.local
    }

    pub fn reset(&mut self) {
        self.local = Quat::IDENTITY;
    }

    pub fn local(&self) -> Quat {
        self.local
    }

    /// World orientation for the drone model.
    pub fn world(&self, pose: &Pose) -> Quat {
        pose.rotation * self.local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::Action;

    const G: f32 = 9.81;

    fn controller() -> FlightController {
        FlightController::new(FlightTuning::default())
    }

    fn inputs<'a>(input: &'a InputState, pose: Pose, velocity: Vec3) -> FlightInputs<'a> {
        FlightInputs {
            input,
            camera: CameraBasis::default(),
            pose,
            velocity,
            mass: 1.0,
            gravity: G,
        }
    }

    #[test]
    fn flight_forward_thrust_follows_camera() {
        let input = InputState::holding(&[Action::Forward]);
        let mut f = inputs(&input, Pose::default(), Vec3::ZERO);
        f.camera = CameraBasis::from_forward(Vec3::new(1.0, -0.5, 0.0));
        let cmd = controller().command(&f);
        assert!((cmd.force.x - 22.0).abs() < 1e-4);
        assert!(cmd.force.z.abs() < 1e-4);
        assert!(cmd.has_horizontal_intent);
    }

    #[test]
    fn flight_diagonal_thrust_is_normalized() {
        let input = InputState::holding(&[Action::Forward, Action::Right]);
        let cmd = controller().command(&inputs(&input, Pose::default(), Vec3::ZERO));
        let horizontal_force = horizontal(cmd.force).length();
        assert!((horizontal_force - 22.0).abs() < 1e-4);
    }

    #[test]
    fn flight_opposing_keys_cancel() {
        let input = InputState::holding(&[Action::Forward, Action::Backward]);
        let cmd = controller().command(&inputs(&input, Pose::default(), Vec3::new(3.0, 0.0, 0.0)));
        assert!(!cmd.has_horizontal_intent);
        // No intent, so damping opposes the sideways drift.
        assert!(cmd.damping.x < 0.0);
    }

    #[test]
    fn flight_vertical_policies() {
        let c = controller();
        let up = InputState::holding(&[Action::Up]);
        assert!((c.command(&inputs(&up, Pose::default(), Vec3::ZERO)).force.y - (25.0 + G)).abs() < 1e-4);

        let down = InputState::holding(&[Action::Down]);
        let fy = c.command(&inputs(&down, Pose::default(), Vec3::ZERO)).force.y;
        assert!((fy - (G - 15.0)).abs() < 1e-4);
        assert!(fy < G, "descending must leave net downward force");

        let idle = InputState::default();
        let fy = c.command(&inputs(&idle, Pose::default(), Vec3::ZERO)).force.y;
        assert!((fy - 0.1 * G).abs() < 1e-4);
    }

    #[test]
    fn flight_damping_respects_dead_band() {
        let idle = InputState::default();
        let cmd = controller().command(&inputs(&idle, Pose::default(), Vec3::new(0.005, 0.0, 0.0)));
        assert_eq!(cmd.damping, Vec3::ZERO);
        let cmd = controller().command(&inputs(&idle, Pose::default(), Vec3::new(2.0, -5.0, 0.0)));
        assert!((cmd.damping - Vec3::new(-4.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn flight_no_yaw_without_intent() {
        let idle = InputState::default();
        let cmd = controller().command(&inputs(&idle, Pose::default(), Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(cmd.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn flight_yaws_toward_motion() {
        let input = InputState::holding(&[Action::Right]);
        // Facing -Z, moving +X: turn clockwise seen from above (negative Y).
        let cmd = controller().command(&inputs(&input, Pose::default(), Vec3::new(4.0, 0.0, 0.0)));
        assert!(cmd.angular_velocity.y < 0.0);
        assert!(cmd.angular_velocity.x.abs() < 1e-5);
        assert!(cmd.angular_velocity.z.abs() < 1e-5);
    }

    #[test]
    fn flight_yaw_waits_for_speed_threshold() {
        let input = InputState::holding(&[Action::Right]);
        let cmd = controller().command(&inputs(&input, Pose::default(), Vec3::new(0.3, 0.0, 0.0)));
        assert_eq!(cmd.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn flight_reversal_picks_consistent_yaw() {
        let input = InputState::holding(&[Action::Backward]);
        let cmd = controller().command(&inputs(&input, Pose::default(), Vec3::new(0.0, 0.0, 5.0)));
        assert!((cmd.angular_velocity - Vec3::Y * PI * 3.0).length() < 1e-4);
    }

    #[test]
    fn flight_rights_tilted_body() {
        let idle = InputState::default();
        let tilted = Pose::new(Vec3::ZERO, Quat::from_rotation_z(0.5));
        let cmd = controller().command(&inputs(&idle, tilted, Vec3::ZERO));
        // Rolled +Z: correct with negative Z spin, at righting strength.
        assert!((cmd.angular_velocity - Vec3::new(0.0, 0.0, -0.5 * 6.0)).length() < 1e-3);
    }

    #[test]
    fn flight_rights_upside_down_body() {
        let idle = InputState::default();
        let flipped = Pose::new(Vec3::ZERO, Quat::from_rotation_x(PI));
        let cmd = controller().command(&inputs(&idle, flipped, Vec3::ZERO));
        assert!(cmd.angular_velocity.length() > 1.0);
    }

    #[test]
    fn flight_level_body_needs_no_righting() {
        let idle = InputState::default();
        let yawed = Pose::new(Vec3::ZERO, Quat::from_rotation_y(1.0));
        let cmd = controller().command(&inputs(&idle, yawed, Vec3::ZERO));
        assert_eq!(cmd.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn visual_tilt_leans_and_recovers() {
        let tuning = FlightTuning::default();
        let mut tilt = VisualTilt::default();
        let pose = Pose::default();
        for _ in 0..120 {
            tilt.update(&tuning, &pose, Vec3::new(0.0, 0.0, -8.0), 1.0 / 60.0);
        }
        let nose = tilt.world(&pose) * -Vec3::Z;
        assert!(nose.y < -0.1, "moving forward should dip the nose");

        for _ in 0..240 {
            tilt.update(&tuning, &pose, Vec3::ZERO, 1.0 / 60.0);
        }
        assert!(tilt.local().abs_diff_eq(Quat::IDENTITY, 1e-3));
    }
}
