/// Outbound simulation events.
///
/// Entity logic never spawns objects or touches score/audio directly.
/// Instead each tick produces a finite list of events which the session
/// drains after collision resolution — spawning bullets and pickups,
/// adjusting score, and forwarding sound requests to the audio backend.

use crate::entities::Facing;
use crate::enemy::EnemyType;
use crate::math::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    /// Player pulled the trigger; a bullet should spawn at `origin`.
    PlayerShot { origin: Vec2, facing: Facing },
    /// An enemy fired an aimed bullet with a fixed velocity.
    EnemyShot { origin: Vec2, velocity: Vec2 },
    /// An enemy crossed into the dead state. Emitted exactly once per enemy.
    EnemyKilled {
        enemy_type: EnemyType,
        score: i32,
        position: Vec2,
    },
    /// Player health reached zero. Emitted exactly once per level attempt.
    PlayerDied,
    /// Player collected a health pickup.
    PickupTaken { heal: i32 },
    /// Named sound effect request for the audio backend.
    Sound { name: &'static str, volume: f32 },
}
