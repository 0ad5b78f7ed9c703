/// The three shipped levels: platform layouts and spawn schedules.

use crate::enemy::EnemyType;
use crate::entities::{Entity, GROUND_MARGIN, GROUND_THICKNESS, PLAYFIELD_H, PLAYFIELD_W};
use crate::math::Vec2;
use crate::player::{self, PLAYER_SIZE};
use crate::spawn::SpawnAction;
use crate::world::World;

pub const MAX_LEVEL: u32 = 3;

/// Floating platforms are this thick.
const PLATFORM_THICKNESS: f32 = 40.0;
/// Human enemies spawn just past the right edge, standing on the ground.
const HUMAN_ENEMY_SIZE: f32 = 180.0;

#[derive(Clone, Debug)]
pub struct LevelSpec {
    pub number: u32,
    pub name: &'static str,
    pub total_enemies: u32,
    pub spawn_delay: f32,
    /// (x, y, width) of each floating platform; the ground strip is implied.
    pub platforms: Vec<(f32, f32, f32)>,
    pub spawns: Vec<SpawnAction>,
}

/// Y for a human enemy standing on the ground strip.
fn human_spawn_y() -> f32 {
    PLAYFIELD_H - GROUND_THICKNESS - HUMAN_ENEMY_SIZE
}

fn offscreen_right() -> f32 {
    PLAYFIELD_W + 50.0
}

pub fn spec(number: u32) -> Option<LevelSpec> {
    match number {
        1 => Some(level1()),
        2 => Some(level2()),
        3 => Some(level3()),
        _ => None,
    }
}

fn level1() -> LevelSpec {
    let human_y = human_spawn_y();
    let mut spawns = Vec::new();
    for i in 0..4 {
        spawns.push(SpawnAction::new(
            EnemyType::Human,
            offscreen_right(),
            human_y,
        ));
        spawns.push(SpawnAction::new(
            EnemyType::Drone,
            200.0 + (i as f32) * 300.0,
            100.0 + (i as f32) * 30.0,
        ));
    }
    spawns.push(SpawnAction::new(EnemyType::Drone, 600.0, 150.0));

    LevelSpec {
        number: 1,
        name: "Training Ground",
        total_enemies: 9,
        spawn_delay: 0.6,
        platforms: vec![(600.0, 550.0, 400.0), (1200.0, 650.0, 350.0)],
        spawns,
    }
}

fn level2() -> LevelSpec {
    let human_y = human_spawn_y();
    let mut spawns = Vec::new();
    for i in 0..6 {
        spawns.push(SpawnAction::new(
            EnemyType::Human,
            offscreen_right(),
            human_y,
        ));
        spawns.push(SpawnAction::new(
            EnemyType::Ship,
            150.0 + (i as f32) * 200.0,
            80.0 + (i as f32) * 25.0,
        ));
    }
    spawns.push(SpawnAction::new(EnemyType::Ship, 800.0, 120.0));

    LevelSpec {
        number: 2,
        name: "Ship Assault",
        total_enemies: 13,
        spawn_delay: 0.5,
        platforms: vec![
            (300.0, 500.0, 350.0),
            (800.0, 600.0, 400.0),
            (1400.0, 550.0, 350.0),
        ],
        spawns,
    }
}

fn level3() -> LevelSpec {
    let human_y = human_spawn_y();
    let right = offscreen_right();
    let spawns = vec![
        // first boss wave
        SpawnAction::new(EnemyType::Boss, 400.0, 150.0),
        SpawnAction::new(EnemyType::Ship, 300.0, 100.0),
        SpawnAction::new(EnemyType::Drone, 600.0, 130.0),
        SpawnAction::new(EnemyType::Ship, 900.0, 110.0),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Drone, 500.0, 140.0),
        SpawnAction::new(EnemyType::Ship, 800.0, 120.0),
        // second boss wave
        SpawnAction::new(EnemyType::Boss, 1000.0, 150.0),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Human, right, human_y),
        SpawnAction::new(EnemyType::Ship, 700.0, 100.0),
        SpawnAction::new(EnemyType::Ship, 1100.0, 130.0),
    ];

    LevelSpec {
        number: 3,
        name: "Final Boss",
        total_enemies: 15,
        spawn_delay: 0.5,
        platforms: vec![
            (400.0, 480.0, 450.0),
            (1000.0, 580.0, 400.0),
            (1500.0, 520.0, 350.0),
        ],
        spawns,
    }
}

/// Populate a fresh world with the level's static entities, promoting after
/// each phase so everything is live before the first frame draws.
pub fn populate(spec: &LevelSpec, world: &mut World) {
    let player_y = PLAYFIELD_H - GROUND_MARGIN - PLAYER_SIZE;
    world.add(player::spawn(Vec2::new(100.0, player_y)));
    world.promote_pending();

    world.add(Entity::ground());
    for &(x, y, w) in &spec.platforms {
        world.add(Entity::platform(x, y, w, PLATFORM_THICKNESS));
    }
    world.promote_pending();
}
