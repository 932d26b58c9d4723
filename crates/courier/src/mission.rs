//! Delivery missions: go to the pickup, then the drop-off, then on to the next.
//!
//! The runtime state is private. The session drives it only through
//! [`MissionStateMachine::setup`] and [`MissionStateMachine::update`].

use courier_core::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MissionConfig;
use crate::hud::{Objective, ObjectiveTone};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MissionError {
    #[error("mission index {index} out of range ({count} missions)")]
    InvalidIndex { index: usize, count: usize },
}

/// One pickup and drop-off pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionDefinition {
    pub pickup: Vec3,
    pub delivery: Vec3,
    pub start_objective: String,
    pub deliver_objective: String,
}

impl MissionDefinition {
    pub fn new(pickup: Vec3, delivery: Vec3, start: &str, deliver: &str) -> Self {
        Self {
            pickup,
            delivery,
            start_objective: start.to_string(),
            deliver_objective: deliver.to_string(),
        }
    }
}

/// Pickup markers sit just above the ground.
const GROUND_MARKER_Y: f32 = 0.1;
/// Drop-offs on skyscraper roofs.
const ROOF_MARKER_Y: f32 = 14.0 + GROUND_MARKER_Y;

/// The ten missions of the default city.
pub fn default_missions() -> Vec<MissionDefinition> {
    let ground = |x: f32, z: f32| Vec3::new(x, GROUND_MARKER_Y, z);
    let roof = |x: f32, z: f32| Vec3::new(x, ROOF_MARKER_Y, z);
    vec![
        MissionDefinition::new(ground(-23.0, 23.0), roof(15.0, 10.0), "Objective: Go to Pickup", "Objective: Deliver to Skyscraper 1"),
        MissionDefinition::new(ground(30.0, -10.0), roof(-10.0, -15.0), "Objective: Go to Pickup 2", "Objective: Deliver to Skyscraper 2"),
        MissionDefinition::new(ground(-18.0, 8.0), roof(5.0, 25.0), "Objective: Pickup near Tree 1", "Objective: Deliver to Skyscraper 3"),
        MissionDefinition::new(ground(12.0, 17.0), ground(23.0, -27.0), "Objective: Pickup near Barrel 1", "Objective: Deliver near Tree 2"),
        MissionDefinition::new(ground(0.0, 0.0), roof(15.0, 10.0), "Objective: Pickup at Center", "Objective: Deliver to Skyscraper 1 (Top)"),
        MissionDefinition::new(ground(-13.0, -18.0), ground(-8.0, -33.0), "Objective: Pickup near Building 2", "Objective: Deliver near Tree 3"),
        MissionDefinition::new(ground(33.0, 33.0), roof(-10.0, -15.0), "Objective: Pickup near Tree 4", "Objective: Deliver to Skyscraper 2 (Top)"),
        MissionDefinition::new(ground(-40.0, -40.0), roof(5.0, 25.0), "Objective: Pickup at SW Corner", "Objective: Deliver to Skyscraper 3 (Top)"),
        MissionDefinition::new(ground(40.0, 40.0), ground(-7.0, 23.0), "Objective: Pickup at NE Corner", "Objective: Deliver near Barrel 2"),
        MissionDefinition::new(ground(3.0, -13.0), ground(0.0, 0.0), "Objective: Pickup near Barrel 3", "Objective: Deliver to Center"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Pickup,
    Deliver,
    Complete,
}

/// A world marker the renderer draws at a trigger point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub position: Vec3,
    pub visible: bool,
}

impl Default for Marker {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            visible: false,
        }
    }
}

/// What an `update` call changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissionProgress {
    Unchanged,
    PickedUp,
    /// Delivered. `next` is the mission to set up, or `None` when the list is done.
    Delivered { next: Option<usize> },
}

#[derive(Debug, Clone, Copy)]
struct RuntimeState {
    stage: Stage,
    has_package: bool,
}

pub struct MissionStateMachine {
    missions: Vec<MissionDefinition>,
    rules: MissionConfig,
    index: usize,
    state: RuntimeState,
    pickup_marker: Marker,
    delivery_marker: Marker,
    objective: Objective,
}

impl MissionStateMachine {
    pub fn new(missions: Vec<MissionDefinition>, rules: MissionConfig) -> Self {
        Self {
            missions,
            rules,
            index: 0,
            state: RuntimeState {
                stage: Stage::Pickup,
                has_package: false,
            },
            pickup_marker: Marker::default(),
            delivery_marker: Marker::default(),
            objective: Objective::default(),
        }
    }

    /// Make mission `index` current, back at the pickup stage.
    pub fn setup(&mut self, index: usize) -> Result<(), MissionError> {
        let Some(mission) = self.missions.get(index) else {
            let err = MissionError::InvalidIndex {
                index,
                count: self.missions.len(),
            };
            log::error!("Cannot set up mission: {}", err);
            return Err(err);
        };

        self.index = index;
        self.state = RuntimeState {
            stage: Stage::Pickup,
            has_package: false,
        };
        self.pickup_marker = Marker {
            position: mission.pickup,
            visible: true,
        };
        self.delivery_marker = Marker {
            position: mission.delivery,
            visible: false,
        };
        self.objective = Objective::new(mission.start_objective.clone(), ObjectiveTone::Active);
        log::info!("Mission {} set up: {}", index + 1, mission.start_objective);
        Ok(())
    }

    /// Evaluate the triggers against the drone position.
    pub fn update(&mut self, drone: Vec3) -> MissionProgress {
        let Some(mission) = self.missions.get(self.index) else {
            return MissionProgress::Unchanged;
        };
        let radius_sq = self.rules.trigger_radius_sq;

        match self.state.stage {
            Stage::Pickup => {
                let near = drone.distance_squared(mission.pickup) < radius_sq;
                let low = drone.y < mission.pickup.y + self.rules.pickup_altitude_gate;
                if !(near && low) {
                    return MissionProgress::Unchanged;
                }
                self.state = RuntimeState {
                    stage: Stage::Deliver,
                    has_package: true,
                };
                self.pickup_marker.visible = false;
                self.delivery_marker.visible = true;
                self.objective = Objective::new(mission.deliver_objective.clone(), ObjectiveTone::Active);
                log::debug!("Package picked up for mission {}", self.index + 1);
                MissionProgress::PickedUp
            }
            Stage::Deliver => {
                let near = drone.distance_squared(mission.delivery) < radius_sq;
                let level = (drone.y - mission.delivery.y).abs() < self.rules.delivery_vertical_tolerance;
                if !(near && level) {
                    return MissionProgress::Unchanged;
                }
                self.state = RuntimeState {
                    stage: Stage::Complete,
                    has_package: false,
                };
                self.delivery_marker.visible = false;

                let completed = self.index + 1;
                let next = (completed < self.missions.len()).then_some(completed);
                self.objective = match next {
                    Some(_) => Objective::new(
                        format!("Mission {} Complete! Loading next...", completed),
                        ObjectiveTone::Success,
                    ),
                    None => Objective::new("All Missions Complete!", ObjectiveTone::Finished),
                };
                if next.is_some() {
                    self.index = completed;
                }
                log::debug!("Package delivered for mission {}", completed);
                MissionProgress::Delivered { next }
            }
            Stage::Complete => MissionProgress::Unchanged,
        }
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    pub fn has_package(&self) -> bool {
        self.state.has_package
    }

    /// Index of the current mission. After a delivery this already points at the next one.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn pickup_marker(&self) -> Marker {
        self.pickup_marker
    }

    pub fn delivery_marker(&self) -> Marker {
        self.delivery_marker
    }

    /// The point the player should head for, if any.
    pub fn target(&self) -> Option<Vec3> {
        match self.state.stage {
            Stage::Pickup if self.pickup_marker.visible => Some(self.pickup_marker.position),
            Stage::Deliver if self.delivery_marker.visible => Some(self.delivery_marker.position),
            _ => None,
        }
    }
}
