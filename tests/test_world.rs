use space_defender::audio::{AudioService, NullAudio};
use space_defender::enemy::{self, EnemyType};
use space_defender::entities::{Entity, EntityKind, Facing, PLAYFIELD_H};
use space_defender::input::InputState;
use space_defender::level::{self, LevelSpec, MAX_LEVEL};
use space_defender::math::Vec2;
use space_defender::player;
use space_defender::session::{GameSession, TickOutcome};
use space_defender::spawn::{SpawnAction, SpawnQueue};
use space_defender::world::{DrawSurface, World};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: f32 = 0.016;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn empty_level(total_enemies: u32) -> LevelSpec {
    LevelSpec {
        number: 1,
        name: "test",
        total_enemies,
        spawn_delay: 0.5,
        platforms: Vec::new(),
        spawns: Vec::new(),
    }
}

struct TagCollector(Vec<&'static str>);

impl DrawSurface for TagCollector {
    fn draw_entity(&mut self, entity: &Entity) {
        self.0.push(entity.tag);
    }
}

// ── World registry ────────────────────────────────────────────────────────────

#[test]
fn add_buffers_until_promotion() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    assert_eq!(world.pending_len(), 1);
    assert!(world.objects().is_empty());

    world.promote_pending();
    assert_eq!(world.pending_len(), 0);
    assert_eq!(world.objects().len(), 1);
}

#[test]
fn promotion_preserves_insertion_order() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.add(Entity::ground());
    world.promote_pending();
    world.add(Entity::player_bullet(Vec2::new(0.0, 0.0), Facing::Right));
    world.promote_pending();

    let mut collector = TagCollector(Vec::new());
    world.draw(&mut collector);
    assert_eq!(collector.0, vec!["Player", "Ground", "PlayerBullet"]);
}

#[test]
fn update_promotes_pending_first() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.update(DT, InputState::idle());
    assert_eq!(world.objects().len(), 1);
    assert_eq!(world.pending_len(), 0);
}

#[test]
fn cleanup_drops_inactive_entities() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.add(Entity::player_bullet(Vec2::new(1995.0, 100.0), Facing::Right));
    world.promote_pending();

    // The bullet flies past the cull line this tick
    world.update(DT, InputState::idle());
    assert_eq!(world.objects().len(), 2);

    world.cleanup();
    assert_eq!(world.objects().len(), 1);

    // Idempotent: a second pass changes nothing
    world.cleanup();
    assert_eq!(world.objects().len(), 1);
}

#[test]
fn inactive_entities_are_not_drawn() {
    let mut world = World::new();
    world.add(Entity::player_bullet(Vec2::new(1995.0, 100.0), Facing::Right));
    world.promote_pending();
    world.update(DT, InputState::idle()); // culls the bullet

    let mut collector = TagCollector(Vec::new());
    world.draw(&mut collector);
    assert!(collector.0.is_empty());
}

#[test]
fn enemies_chase_the_player_snapshot() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.add(enemy::spawn(
        EnemyType::Human,
        Vec2::new(1000.0, PLAYFIELD_H - 300.0),
    ));
    world.promote_pending();

    let x_before = world.objects()[1].position.x;
    world.update(DT, InputState::idle());
    assert!(world.objects()[1].position.x < x_before);
}

// ── Spawn queue ───────────────────────────────────────────────────────────────

#[test]
fn queue_fires_one_action_per_delay() {
    let a = SpawnAction::new(EnemyType::Human, 10.0, 20.0);
    let b = SpawnAction::new(EnemyType::Ship, 30.0, 40.0);
    let mut queue = SpawnQueue::from_actions(0.5, [a, b]);

    assert_eq!(queue.tick(0.3), None);
    assert_eq!(queue.tick(0.3), Some(a)); // FIFO
    assert_eq!(queue.tick(0.3), None); // accumulator was reset
    assert_eq!(queue.tick(0.3), Some(b));
    assert!(queue.is_empty());
    assert_eq!(queue.tick(10.0), None);
}

#[test]
fn empty_queue_does_not_accumulate() {
    let mut queue = SpawnQueue::new(0.5);
    assert_eq!(queue.tick(10.0), None);

    // The first action still waits its full delay
    queue.enqueue(SpawnAction::new(EnemyType::Drone, 0.0, 0.0));
    assert_eq!(queue.tick(0.3), None);
    assert_eq!(queue.len(), 1);
}

#[test]
fn spawn_action_builds_the_right_enemy() {
    let action = SpawnAction::new(EnemyType::Boss, 400.0, 150.0);
    let entity = action.spawn();
    assert_eq!(entity.position, Vec2::new(400.0, 150.0));
    assert!(matches!(
        &entity.kind,
        EntityKind::Enemy(st) if st.enemy_type == EnemyType::Boss
    ));
}

// ── Levels ────────────────────────────────────────────────────────────────────

#[test]
fn three_levels_exist() {
    for number in 1..=MAX_LEVEL {
        assert!(level::spec(number).is_some());
    }
    assert!(level::spec(0).is_none());
    assert!(level::spec(MAX_LEVEL + 1).is_none());
}

#[test]
fn spawn_counts_match_enemy_totals() {
    for number in 1..=MAX_LEVEL {
        let spec = level::spec(number).unwrap();
        assert_eq!(spec.spawns.len() as u32, spec.total_enemies);
    }
    assert_eq!(level::spec(1).unwrap().total_enemies, 9);
    assert_eq!(level::spec(2).unwrap().total_enemies, 13);
    assert_eq!(level::spec(3).unwrap().total_enemies, 15);
}

#[test]
fn populate_places_player_ground_and_platforms() {
    let spec = level::spec(1).unwrap();
    let mut world = World::new();
    level::populate(&spec, &mut world);

    // player + ground + the level's floating platforms, already live
    assert_eq!(world.objects().len(), 2 + spec.platforms.len());
    assert_eq!(world.pending_len(), 0);

    let p = world.player().unwrap();
    assert_eq!(p.position.x, 100.0);
}

// ── Session ───────────────────────────────────────────────────────────────────

#[test]
fn session_carries_score_between_levels() {
    let spec = level::spec(2).unwrap();
    let session = GameSession::start(&spec, 1250);
    assert_eq!(session.score, 1250);
    assert_eq!(session.enemies_remaining, 13);
    assert_eq!(session.spawn_queue_len(), 13);
}

#[test]
fn tick_runs_while_enemies_remain() {
    let spec = level::spec(1).unwrap();
    let mut world = World::new();
    level::populate(&spec, &mut world);
    let mut session = GameSession::start(&spec, 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    let outcome = session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    assert_eq!(outcome, TickOutcome::Running);
}

#[test]
fn spawn_queue_feeds_the_world() {
    let spec = level::spec(1).unwrap();
    let mut world = World::new();
    level::populate(&spec, &mut world);
    let base_count = world.objects().len();
    let mut session = GameSession::start(&spec, 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    // 1.0 s of ticks comfortably covers the 0.6 s spawn delay
    for _ in 0..63 {
        session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    }
    assert!(world.objects().len() > base_count);
    assert!(session.spawn_queue_len() < spec.spawns.len());
}

#[test]
fn player_shot_event_spawns_a_bullet() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.promote_pending();
    let mut session = GameSession::start(&empty_level(1), 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    let mut input = InputState::idle();
    input.shoot = true;
    session.tick(&mut world, input, DT, &mut rng, &mut audio);

    // The bullet sits in the pending buffer until next tick's promotion
    assert_eq!(world.pending_len(), 1);
    session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    assert!(world
        .objects()
        .iter()
        .any(|e| matches!(e.kind, EntityKind::PlayerBullet { .. })));
}

#[test]
fn killing_the_last_enemy_completes_the_level() {
    let mut world = World::new();
    let mut drone = enemy::spawn(EnemyType::Drone, Vec2::new(500.0, 200.0));
    if let EntityKind::Enemy(st) = &mut drone.kind {
        st.health = 5;
    }
    world.add(drone);
    world.add(Entity::player_bullet(Vec2::new(520.0, 230.0), Facing::Right));
    world.promote_pending();

    let mut session = GameSession::start(&empty_level(1), 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    let outcome = session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    assert_eq!(outcome, TickOutcome::LevelComplete);
    assert_eq!(session.score, 150);
    assert_eq!(session.enemies_killed, 1);
    assert_eq!(session.enemies_remaining, 0);

    // Completion is reported once; afterwards the session just runs
    let outcome = session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    assert_eq!(outcome, TickOutcome::Running);
}

#[test]
fn player_jumps_after_standing_idle() {
    let spec = level::spec(1).unwrap();
    let mut world = World::new();
    level::populate(&spec, &mut world);
    let mut session = GameSession::start(&spec, 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    // One second of resting on the ground with gravity running
    for _ in 0..60 {
        session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    }

    let mut input = InputState::idle();
    input.jump = true;
    session.tick(&mut world, input, DT, &mut rng, &mut audio);

    // Jump impulse is -14; the tick's gravity nibbles a little back
    let vy = world.player().unwrap().velocity.y;
    assert!(vy < -10.0, "jump had no effect: vy = {vy}");
}

struct RecordingAudio {
    sounds: Vec<String>,
}

impl AudioService for RecordingAudio {
    fn play_sound(&mut self, name: &str, _volume: f32) {
        self.sounds.push(name.to_string());
    }
    fn play_music(&mut self, _name: &str, _volume: f32) {}
    fn stop_music(&mut self) {}
}

#[test]
fn sound_requests_reach_the_audio_backend() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.promote_pending();
    let mut session = GameSession::start(&empty_level(1), 0);
    let mut rng = seeded_rng();
    let mut audio = RecordingAudio { sounds: Vec::new() };

    let mut input = InputState::idle();
    input.jump = true;
    session.tick(&mut world, input, DT, &mut rng, &mut audio);

    assert!(audio.sounds.iter().any(|s| s == "Jump"));
}

#[test]
fn player_death_ends_the_run() {
    let mut world = World::new();
    world.add(player::spawn(Vec2::new(100.0, 700.0)));
    world.promote_pending();

    let mut events = Vec::new();
    player::take_damage(&mut world.objects_mut()[0], 200, &mut events);

    let mut session = GameSession::start(&empty_level(1), 0);
    let mut rng = seeded_rng();
    let mut audio = NullAudio;

    let outcome = session.tick(&mut world, InputState::idle(), DT, &mut rng, &mut audio);
    assert_eq!(outcome, TickOutcome::PlayerDead);
}
