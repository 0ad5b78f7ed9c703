use space_defender::enemy::{self, archetype, EnemyType};
use space_defender::entities::{
    Entity, EntityKind, Facing, CULL_MAX_X, PLAYFIELD_H, PLAYFIELD_W,
};
use space_defender::events::GameEvent;
use space_defender::input::InputState;
use space_defender::math::Vec2;
use space_defender::movement::JUMP_FORCE;
use space_defender::physics;
use space_defender::player;
use space_defender::world::{TargetInfo, UpdateCtx};

const DT: f32 = 0.016;

fn ctx_idle() -> UpdateCtx {
    UpdateCtx {
        dt: DT,
        input: InputState::idle(),
        target: None,
    }
}

fn ctx_with_input(input: InputState) -> UpdateCtx {
    UpdateCtx {
        dt: DT,
        input,
        target: None,
    }
}

fn ctx_with_target(x: f32, y: f32) -> UpdateCtx {
    UpdateCtx {
        dt: DT,
        input: InputState::idle(),
        target: Some(TargetInfo {
            position: Vec2::new(x, y),
            size: Vec2::new(180.0, 180.0),
            dead: false,
        }),
    }
}

fn player_state(e: &Entity) -> &player::PlayerState {
    match &e.kind {
        EntityKind::Player(st) => st,
        _ => panic!("not a player"),
    }
}

fn enemy_state(e: &Entity) -> &enemy::EnemyState {
    match &e.kind {
        EntityKind::Enemy(st) => st,
        _ => panic!("not an enemy"),
    }
}

// ── Bullets ───────────────────────────────────────────────────────────────────

#[test]
fn player_bullet_velocity_follows_facing() {
    let right = Entity::player_bullet(Vec2::new(100.0, 100.0), Facing::Right);
    let left = Entity::player_bullet(Vec2::new(100.0, 100.0), Facing::Left);
    let up = Entity::player_bullet(Vec2::new(100.0, 100.0), Facing::Up);
    assert_eq!(right.velocity, Vec2::new(12.0, 0.0));
    assert_eq!(left.velocity, Vec2::new(-12.0, 0.0));
    assert_eq!(up.velocity, Vec2::new(0.0, -12.0));
}

#[test]
fn bullet_culls_past_right_envelope() {
    let mut bullet = Entity::player_bullet(Vec2::new(CULL_MAX_X - 5.0, 100.0), Facing::Right);
    let mut events = Vec::new();
    bullet.update(&ctx_idle(), &mut events);
    assert!(!bullet.active); // moved to 2007, past the cull line
}

#[test]
fn bullet_lives_inside_envelope() {
    let mut bullet = Entity::player_bullet(Vec2::new(500.0, 100.0), Facing::Right);
    let mut events = Vec::new();
    bullet.update(&ctx_idle(), &mut events);
    assert!(bullet.active);
    assert_eq!(bullet.position.x, 512.0);
}

// ── Player ────────────────────────────────────────────────────────────────────

#[test]
fn player_spawns_at_full_health() {
    let p = player::spawn(Vec2::new(100.0, 700.0));
    let st = player_state(&p);
    assert_eq!(st.health, player::MAX_HEALTH);
    assert!(!st.is_dead);
    assert!(!st.is_invincible());
    assert!(p.has_physics);
}

#[test]
fn player_shoots_right_with_cooldown() {
    let mut p = player::spawn(Vec2::new(100.0, 700.0));
    let mut events = Vec::new();
    let mut input = InputState::idle();
    input.shoot = true;

    p.update(&ctx_with_input(input), &mut events);
    let shots: Vec<_> = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerShot { .. }))
        .collect();
    assert_eq!(shots.len(), 1);
    if let GameEvent::PlayerShot { origin, facing } = shots[0] {
        assert_eq!(*facing, Facing::Right);
        // Muzzle sits just past the right edge of the sprite
        assert!((origin.x - (100.0 + 180.0 + 5.0)).abs() < 1e-3);
    }

    // Held trigger: the 0.2 s cooldown blocks an immediate second shot
    events.clear();
    p.update(&ctx_with_input(input), &mut events);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerShot { .. })));
}

#[test]
fn player_shoots_up_from_head() {
    let mut p = player::spawn(Vec2::new(100.0, 700.0));
    let mut events = Vec::new();
    let mut input = InputState::idle();
    input.shoot_up = true;

    p.update(&ctx_with_input(input), &mut events);
    let shot = events
        .iter()
        .find(|e| matches!(e, GameEvent::PlayerShot { .. }))
        .unwrap();
    if let GameEvent::PlayerShot { origin, facing } = shot {
        assert_eq!(*facing, Facing::Up);
        assert!(origin.y < 700.0); // above the sprite
    }
}

#[test]
fn player_facing_tracks_held_direction() {
    let mut p = player::spawn(Vec2::new(500.0, 700.0));
    let mut events = Vec::new();

    let mut input = InputState::idle();
    input.left = true;
    p.update(&ctx_with_input(input), &mut events);
    assert_eq!(player_state(&p).facing, Facing::Left);

    input.left = false;
    input.right = true;
    p.update(&ctx_with_input(input), &mut events);
    assert_eq!(player_state(&p).facing, Facing::Right);
}

#[test]
fn player_clamped_to_playfield() {
    let mut p = player::spawn(Vec2::new(0.0, 700.0));
    let mut events = Vec::new();
    let mut input = InputState::idle();
    input.left = true;

    for _ in 0..10 {
        p.update(&ctx_with_input(input), &mut events);
    }
    assert_eq!(p.position.x, 0.0);

    input.left = false;
    input.right = true;
    for _ in 0..1000 {
        p.update(&ctx_with_input(input), &mut events);
    }
    assert_eq!(p.position.x, PLAYFIELD_W - p.size.x);
}

#[test]
fn standing_player_can_jump_after_resting() {
    // Feet on the ground line, as a level spawns the player
    let ground_y = PLAYFIELD_H - 120.0 - 180.0;
    let mut p = player::spawn(Vec2::new(100.0, ground_y));
    let mut events = Vec::new();

    // A full second of standing still, gravity running each tick. The
    // floor clamp must keep absorbing the fall or the grounded band
    // drifts out of reach and jumping dies for the rest of the level.
    for _ in 0..60 {
        p.update(&ctx_idle(), &mut events);
        physics::apply(std::slice::from_mut(&mut p));
    }
    assert_eq!(p.position.y, ground_y);
    assert!(p.velocity.y <= physics::DEFAULT_GRAVITY + 1e-4);

    let mut input = InputState::idle();
    input.jump = true;
    p.update(&ctx_with_input(input), &mut events);
    assert_eq!(p.velocity.y, JUMP_FORCE);
}

#[test]
fn ground_enemy_settles_on_the_floor() {
    // Spawned exactly on the ground line; chases a far-away target
    let mut human = enemy::spawn(EnemyType::Human, Vec2::new(1000.0, PLAYFIELD_H - 300.0));
    let mut events = Vec::new();

    for _ in 0..120 {
        human.update(&ctx_with_target(100.0, 700.0), &mut events);
        physics::apply(std::slice::from_mut(&mut human));
    }
    assert_eq!(human.position.y, PLAYFIELD_H - 120.0 - human.size.y);
    assert!(human.velocity.y <= physics::DEFAULT_GRAVITY + 1e-4);
}

#[test]
fn invincibility_window_expires() {
    let mut p = player::spawn(Vec2::new(100.0, 700.0));
    let mut events = Vec::new();

    player::take_damage(&mut p, 15, &mut events);
    assert!(player_state(&p).is_invincible());

    // 1.5 s at 16 ms per tick
    for _ in 0..100 {
        p.update(&ctx_idle(), &mut events);
    }
    assert!(!player_state(&p).is_invincible());

    player::take_damage(&mut p, 15, &mut events);
    assert_eq!(player_state(&p).health, 70);
}

#[test]
fn dead_player_ignores_input_and_damage() {
    let mut p = player::spawn(Vec2::new(100.0, 700.0));
    let mut events = Vec::new();
    player::take_damage(&mut p, 200, &mut events);
    assert!(player_state(&p).is_dead);

    let x_before = p.position.x;
    let mut input = InputState::idle();
    input.right = true;
    input.shoot = true;
    p.update(&ctx_with_input(input), &mut events);

    assert_eq!(p.position.x, x_before);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::PlayerShot { .. })));

    let deaths_before = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerDied))
        .count();
    player::take_damage(&mut p, 50, &mut events);
    let deaths_after = events
        .iter()
        .filter(|e| matches!(e, GameEvent::PlayerDied))
        .count();
    assert_eq!(deaths_before, deaths_after); // emitted exactly once
}

// ── Enemy archetypes ──────────────────────────────────────────────────────────

#[test]
fn archetype_table_matches_design() {
    let human = archetype(EnemyType::Human);
    assert_eq!(human.health, 50);
    assert_eq!(human.score_value, 100);
    assert!(human.has_physics);

    let boss = archetype(EnemyType::Boss);
    assert_eq!(boss.health, 400);
    assert_eq!(boss.score_value, 1000);
    assert!(!boss.has_physics);

    assert_eq!(archetype(EnemyType::Ship).score_value, 150);
    assert_eq!(archetype(EnemyType::Drone).health, 30);
}

#[test]
fn only_humans_are_ground_types() {
    assert!(EnemyType::Human.is_ground());
    assert!(!EnemyType::Ship.is_ground());
    assert!(!EnemyType::Drone.is_ground());
    assert!(!EnemyType::Boss.is_ground());
}

// ── Enemy behavior ────────────────────────────────────────────────────────────

#[test]
fn airborne_enemy_fires_at_target_in_range() {
    let mut ship = enemy::spawn(EnemyType::Ship, Vec2::new(800.0, 200.0));
    let mut events = Vec::new();

    // Target 400 units away, inside the 500-unit attack range
    ship.update(&ctx_with_target(400.0, 700.0), &mut events);

    let shot = events
        .iter()
        .find(|e| matches!(e, GameEvent::EnemyShot { .. }))
        .unwrap();
    if let GameEvent::EnemyShot { velocity, .. } = shot {
        assert!((velocity.length() - 5.0).abs() < 1e-3); // non-boss speed
        assert!(velocity.x < 0.0); // aimed leftward at the target
    }
}

#[test]
fn enemy_holds_fire_out_of_range() {
    let mut ship = enemy::spawn(EnemyType::Ship, Vec2::new(1500.0, 200.0));
    let mut events = Vec::new();

    ship.update(&ctx_with_target(100.0, 700.0), &mut events);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyShot { .. })));
}

#[test]
fn ground_enemy_holds_fire_until_on_screen() {
    // Humans spawn off the right edge and walk in
    let mut human = enemy::spawn(
        EnemyType::Human,
        Vec2::new(PLAYFIELD_W + 50.0, PLAYFIELD_H - 300.0),
    );
    let mut events = Vec::new();

    // Target directly below the spawn point would be in range on screen
    human.update(&ctx_with_target(PLAYFIELD_W - 400.0, 700.0), &mut events);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyShot { .. })));
}

#[test]
fn boss_bullets_are_faster() {
    let mut boss = enemy::spawn(EnemyType::Boss, Vec2::new(800.0, 200.0));
    let mut events = Vec::new();

    boss.update(&ctx_with_target(400.0, 700.0), &mut events);
    let shot = events
        .iter()
        .find(|e| matches!(e, GameEvent::EnemyShot { .. }))
        .unwrap();
    if let GameEvent::EnemyShot { velocity, .. } = shot {
        assert!((velocity.length() - 8.0).abs() < 1e-3);
    }
}

#[test]
fn enemy_shot_cooldown_blocks_refire() {
    let mut ship = enemy::spawn(EnemyType::Ship, Vec2::new(800.0, 200.0));
    let mut events = Vec::new();

    ship.update(&ctx_with_target(400.0, 700.0), &mut events);
    events.clear();
    ship.update(&ctx_with_target(400.0, 700.0), &mut events);
    assert!(!events
        .iter()
        .any(|e| matches!(e, GameEvent::EnemyShot { .. })));
}

#[test]
fn dead_enemy_lingers_then_deactivates() {
    let mut drone = enemy::spawn(EnemyType::Drone, Vec2::new(500.0, 200.0));
    let mut events = Vec::new();
    enemy::take_damage(&mut drone, 100, &mut events);
    assert!(enemy_state(&drone).is_dead);
    assert_eq!(drone.velocity, Vec2::ZERO);

    // Corpse lingers for a full second before leaving the field
    for _ in 0..40 {
        drone.update(&ctx_idle(), &mut events);
    }
    assert!(drone.active); // 0.64 s in, still on the field

    for _ in 0..30 {
        drone.update(&ctx_idle(), &mut events);
    }
    assert!(!drone.active); // past the 1 s linger
}

#[test]
fn dead_enemy_stops_shooting() {
    let mut ship = enemy::spawn(EnemyType::Ship, Vec2::new(800.0, 200.0));
    let mut events = Vec::new();
    enemy::take_damage(&mut ship, 100, &mut events);

    events.clear();
    ship.update(&ctx_with_target(700.0, 700.0), &mut events);
    assert!(events.is_empty());
}
