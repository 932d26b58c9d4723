//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for the arena.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static environment (buildings, tree trunks, canopies)
    Environment = 1 << 0,
    /// The player's drone
    Drone = 1 << 1,
    /// Hazard sensors (barrels)
    Hazard = 1 << 2,
}

impl CollisionGroup {
    fn bits(groups: &[CollisionGroup]) -> Group {
        Group::from_bits_retain(groups.iter().fold(0, |acc, g| acc | *g as u32))
    }

    /// Environment collides with everything.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Environment]), Group::ALL)
    }

    /// The drone collides with the environment and is seen by hazards.
    pub fn drone() -> InteractionGroups {
        InteractionGroups::new(
            Self::bits(&[Self::Drone]),
            Self::bits(&[Self::Environment, Self::Hazard]),
        )
    }

    /// Hazards only interact with the drone.
    pub fn hazard() -> InteractionGroups {
        InteractionGroups::new(Self::bits(&[Self::Hazard]), Self::bits(&[Self::Drone]))
    }
}

/// Links a spawned obstacle to its physics handles.
#[derive(Debug, Clone, Copy)]
pub struct PhysicsBody {
    pub rigid_body: Option<RigidBodyHandle>,
    pub collider: Option<ColliderHandle>,
}

impl PhysicsBody {
    /// An obstacle with no physics presence.
    pub fn none() -> Self {
        Self {
            rigid_body: None,
            collider: None,
        }
    }

    pub fn with_collider(collider: ColliderHandle) -> Self {
        Self {
            rigid_body: None,
            collider: Some(collider),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drone_and_hazard_groups_see_each_other() {
        let drone = CollisionGroup::drone();
        let hazard = CollisionGroup::hazard();
        assert!(drone.test(hazard));
        assert!(drone.test(CollisionGroup::environment()));
        assert!(!hazard.test(CollisionGroup::environment()));
    }
}
