//! The city the drone flies in: obstacle layout, ECS entities, and physics.

use courier_core::Vec3;
use hecs::{Entity, World};
use physics::{DroneSpec, ObstacleDescriptor, ObstacleKind, PhysicsBody, PhysicsWorld};

use crate::config::ArenaConfig;

/// Skyscraper footprint centres.
const SKYSCRAPERS: [(f32, f32); 6] = [
    (15.0, 10.0),
    (-10.0, -15.0),
    (5.0, 25.0),
    (-25.0, -5.0),
    (25.0, -10.0),
    (-20.0, 20.0),
];
const TREES: [(f32, f32); 4] = [(-15.0, 5.0), (20.0, -25.0), (-5.0, -30.0), (30.0, 30.0)];
const BARRELS: [(f32, f32); 3] = [(10.0, 15.0), (-5.0, 20.0), (0.0, -10.0)];

const SKYSCRAPER: ObstacleKind = ObstacleKind::Building {
    width: 2.2,
    height: 14.0,
    depth: 2.2,
};
const TRUNK: ObstacleKind = ObstacleKind::TreeTrunk {
    height: 4.0,
    radius: 0.4,
};
const LEAVES: ObstacleKind = ObstacleKind::TreeLeaves { radius: 1.5 };
/// Canopy centre height above the trunk base.
const LEAVES_CENTRE_Y: f32 = 4.5;
const BARREL: ObstacleKind = ObstacleKind::Barrel {
    height: 2.5,
    radius: 1.0,
};

/// Default city: six skyscrapers, four trees, three barrels, and the ground.
pub fn default_city() -> Vec<ObstacleDescriptor> {
    let mut layout = vec![ObstacleDescriptor::new(
        ObstacleKind::Terrain { size: 100.0 },
        Vec3::ZERO,
    )];
    for (x, z) in SKYSCRAPERS {
        layout.push(ObstacleDescriptor::standing_on(SKYSCRAPER, Vec3::new(x, 0.0, z)));
    }
    for (x, z) in TREES {
        layout.push(ObstacleDescriptor::standing_on(TRUNK, Vec3::new(x, 0.0, z)));
        layout.push(ObstacleDescriptor::new(LEAVES, Vec3::new(x, LEAVES_CENTRE_Y, z)));
    }
    for (x, z) in BARRELS {
        layout.push(ObstacleDescriptor::standing_on(BARREL, Vec3::new(x, 0.0, z)));
    }
    layout
}

/// Obstacle entities plus the physics world that backs them.
pub struct Arena {
    pub world: World,
    pub physics: PhysicsWorld,
}

impl Arena {
    /// Spawn every obstacle and attach the drone at the respawn point.
    pub fn build(config: &ArenaConfig, layout: &[ObstacleDescriptor]) -> Self {
        let mut world = World::new();
        let mut physics = PhysicsWorld::with_gravity(config.gravity);

        for obstacle in layout {
            let body = physics.add_obstacle(obstacle);
            log::debug!("Spawned {} at {:?}", obstacle.kind.name(), obstacle.position);
            world.spawn((*obstacle, body));
        }

        physics.attach_drone(DroneSpec {
            position: config.respawn_point,
            radius: config.drone_radius,
            mass: config.drone_mass,
            ..Default::default()
        });

        log::info!(
            "Arena built: {} obstacles, {} hazards",
            layout.len(),
            physics.hazard_handles().len()
        );
        Self { world, physics }
    }

    /// Positions of everything drawn on the minimap.
    pub fn map_markers(&self) -> Vec<Vec3> {
        self.world
            .query::<&ObstacleDescriptor>()
            .iter()
            .filter(|(_, d)| d.kind.shows_on_map())
            .map(|(_, d)| d.position)
            .collect()
    }

    /// Entities whose obstacle has a collider.
    pub fn solid_entities(&self) -> Vec<Entity> {
        self.world
            .query::<&PhysicsBody>()
            .iter()
            .filter(|(_, b)| b.collider.is_some())
            .map(|(e, _)| e)
            .collect()
    }
}
