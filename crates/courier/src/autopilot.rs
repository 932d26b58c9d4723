//! Scripted pilot for the headless demo run.
//!
//! Cruises above the rooftops toward the current target, then drops onto it.

use courier_core::{horizontal, Pose, Vec3};
use input::{Action, InputState};

use crate::flight::CameraBasis;
use crate::session::GamePhase;

pub struct Autopilot {
    /// Transit height: clears the 14 m towers.
    pub cruise_altitude: f32,
    /// Horizontal distance at which the descent starts.
    pub approach_radius: f32,
    /// Height above the target the pilot settles at.
    pub landing_offset: f32,
    /// Speed per metre of remaining distance, capped at `max_speed`.
    pub speed_gain: f32,
    pub max_speed: f32,
    camera: CameraBasis,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            cruise_altitude: 18.0,
            approach_radius: 1.0,
            landing_offset: 0.4,
            speed_gain: 0.8,
            max_speed: 12.0,
            camera: CameraBasis::default(),
        }
    }
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys to hold this frame and the camera they are relative to.
    pub fn steer(
        &mut self,
        phase: GamePhase,
        pose: &Pose,
        velocity: Vec3,
        target: Option<Vec3>,
    ) -> (InputState, CameraBasis) {
        match phase {
            GamePhase::PausedForTimeout => {
                return (InputState::holding(&[Action::ConfirmContinue]), self.camera)
            }
            GamePhase::GameOver => return (InputState::holding(&[Action::Restart]), self.camera),
            GamePhase::Normal => {}
        }

        let Some(target) = target else {
            // Between missions: hold height.
            let mut input = InputState::default();
            self.hold_altitude(&mut input, pose.position.y, self.cruise_altitude);
            return (input, self.camera);
        };

        let to_target = horizontal(target - pose.position);
        let distance = to_target.length();
        if distance > self.approach_radius {
            self.camera = CameraBasis::looking_at(pose.position, target);
        }

        let mut input = InputState::default();
        let wanted_speed = (distance * self.speed_gain).min(self.max_speed);
        let closing_speed = horizontal(velocity).dot(self.camera.forward);
        if distance > self.approach_radius && closing_speed < wanted_speed {
            input.set(Action::Forward, true);
        }

        // Stay high until nearly overhead, unless the target is a rooftop above cruise.
        let overhead = distance < self.approach_radius * 3.0;
        let desired = if overhead {
            target.y + self.landing_offset
        } else {
            self.cruise_altitude.max(target.y + self.landing_offset)
        };
        self.hold_altitude(&mut input, pose.position.y, desired);
        (input, self.camera)
    }

    fn hold_altitude(&self, input: &mut InputState, altitude: f32, desired: f32) {
        if altitude < desired - 0.3 {
            input.set(Action::Up, true);
        } else if altitude > desired + 0.3 {
            input.set(Action::Down, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autopilot_heads_for_target_at_cruise() {
        let mut pilot = Autopilot::new();
        let pose = Pose::level_at(Vec3::new(0.0, 5.0, 0.0));
        let (input, camera) = pilot.steer(GamePhase::Normal, &pose, Vec3::ZERO, Some(Vec3::new(20.0, 0.1, 0.0)));
        assert!(input.forward);
        assert!(input.up);
        assert!((camera.forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn autopilot_descends_when_overhead() {
        let mut pilot = Autopilot::new();
        let pose = Pose::level_at(Vec3::new(0.5, 18.0, 0.0));
        let (input, _) = pilot.steer(GamePhase::Normal, &pose, Vec3::ZERO, Some(Vec3::new(0.0, 0.1, 0.0)));
        assert!(input.down);
        assert!(!input.forward);
    }

    #[test]
    fn autopilot_brakes_when_fast() {
        let mut pilot = Autopilot::new();
        let pose = Pose::level_at(Vec3::new(0.0, 18.0, 0.0));
        let (input, _) = pilot.steer(GamePhase::Normal, &pose, Vec3::new(15.0, 0.0, 0.0), Some(Vec3::new(5.0, 0.1, 0.0)));
        assert!(!input.forward);
    }

    #[test]
    fn autopilot_answers_prompts() {
        let mut pilot = Autopilot::new();
        let pose = Pose::default();
        let (input, _) = pilot.steer(GamePhase::PausedForTimeout, &pose, Vec3::ZERO, None);
        assert!(input.confirm_continue);
        let (input, _) = pilot.steer(GamePhase::GameOver, &pose, Vec3::ZERO, None);
        assert!(input.restart);
    }
}
