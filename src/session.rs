/// Per-level game session: the tick driver and event sink.
///
/// Owns the score, the remaining-enemy counter and the spawn queue, and
/// runs the fixed phase order every tick:
/// spawn -> update -> physics -> collision -> cleanup. The draw pass is
/// the front-end's job and runs even while paused.

use rand::Rng;

use crate::audio::AudioService;
use crate::collision;
use crate::entities::Entity;
use crate::events::GameEvent;
use crate::input::InputState;
use crate::level::LevelSpec;
use crate::math::Vec2;
use crate::physics;
use crate::spawn::SpawnQueue;
use crate::world::World;

/// Chance that a dead enemy drops a health pickup.
const LOOT_DROP_CHANCE: f64 = 0.4;
/// Pickup offset from the corpse's top-left corner.
const LOOT_OFFSET: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// All enemies down and the spawn queue drained.
    LevelComplete,
    PlayerDead,
}

pub struct GameSession {
    pub score: i32,
    pub level_number: u32,
    pub enemies_remaining: u32,
    pub total_enemies: u32,
    pub enemies_killed: u32,
    spawn_queue: SpawnQueue,
    level_complete: bool,
}

impl GameSession {
    /// Start a session for `spec`, carrying the score from earlier levels.
    pub fn start(spec: &LevelSpec, previous_score: i32) -> Self {
        log::info!(
            "level {} start: {} enemies queued",
            spec.number,
            spec.spawns.len()
        );
        GameSession {
            score: previous_score,
            level_number: spec.number,
            enemies_remaining: spec.total_enemies,
            total_enemies: spec.total_enemies,
            enemies_killed: 0,
            spawn_queue: SpawnQueue::from_actions(spec.spawn_delay, spec.spawns.iter().copied()),
            level_complete: false,
        }
    }

    /// One fixed simulation tick.
    pub fn tick(
        &mut self,
        world: &mut World,
        input: InputState,
        dt: f32,
        rng: &mut impl Rng,
        audio: &mut dyn AudioService,
    ) -> TickOutcome {
        if let Some(action) = self.spawn_queue.tick(dt) {
            world.add(action.spawn());
        }

        let mut events = world.update(dt, input);
        physics::apply(world.objects_mut());
        collision::check(world.objects_mut(), &mut events);
        world.cleanup();

        self.apply_events(world, events, rng, audio);

        if world.player_state().map_or(false, |st| st.is_dead) {
            return TickOutcome::PlayerDead;
        }
        if self.enemies_remaining == 0 && self.spawn_queue.is_empty() && !self.level_complete {
            self.level_complete = true;
            return TickOutcome::LevelComplete;
        }
        TickOutcome::Running
    }

    /// Drain one tick's events: spawn bullets and loot, keep score, forward
    /// sound requests.
    fn apply_events(
        &mut self,
        world: &mut World,
        events: Vec<GameEvent>,
        rng: &mut impl Rng,
        audio: &mut dyn AudioService,
    ) {
        for event in events {
            match event {
                GameEvent::PlayerShot { origin, facing } => {
                    world.add(Entity::player_bullet(origin, facing));
                }
                GameEvent::EnemyShot { origin, velocity } => {
                    world.add(Entity::enemy_bullet(origin, velocity));
                }
                GameEvent::EnemyKilled {
                    enemy_type,
                    score,
                    position,
                } => {
                    log::debug!("{:?} down, +{}", enemy_type, score);
                    self.score += score;
                    self.enemies_remaining = self.enemies_remaining.saturating_sub(1);
                    self.enemies_killed += 1;
                    if rng.gen_bool(LOOT_DROP_CHANCE) {
                        world.add(Entity::health_pickup(
                            position + Vec2::new(LOOT_OFFSET, LOOT_OFFSET),
                        ));
                    }
                }
                GameEvent::PlayerDied => {
                    log::info!("player died on level {}", self.level_number);
                }
                GameEvent::PickupTaken { .. } => {}
                GameEvent::Sound { name, volume } => {
                    audio.play_sound(name, volume);
                }
            }
        }
    }

    pub fn spawn_queue_len(&self) -> usize {
        self.spawn_queue.len()
    }
}
