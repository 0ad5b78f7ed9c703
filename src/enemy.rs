/// Enemy archetypes and state machine.
///
/// One enemy representation parameterized by an archetype table instead of
/// a subclass per type. Ground archetypes walk and chase; airborne ones
/// weave or patrol. All of them aim at the target player and fire on a
/// per-archetype cooldown once it is in range.

use crate::animation::{self, Animation, FrameSet};
use crate::audio::{SND_ENEMY_DIE, SND_SHOOT};
use crate::entities::{Entity, EntityKind, GROUND_MARGIN, PLAYFIELD_H, PLAYFIELD_W};
use crate::events::GameEvent;
use crate::math::Vec2;
use crate::movement::Movement;
use crate::world::UpdateCtx;

const DEATH_FRAME_INTERVAL: f32 = 0.12;
/// Corpses linger this long before deactivating.
const DEATH_LINGER: f32 = 1.0;
const SHOOT_ANIM_WINDOW: f32 = 0.5;
const BULLET_SPEED: f32 = 5.0;
const BOSS_BULLET_SPEED: f32 = 8.0;
/// Airborne enemies are kept at least this far above the bottom edge.
const AIR_FLOOR_MARGIN: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyType {
    Human,
    Ship,
    Drone,
    Boss,
}

impl EnemyType {
    /// Ground types walk the ground line and hold fire until they have
    /// entered the screen; airborne types shoot immediately.
    pub fn is_ground(self) -> bool {
        matches!(self, EnemyType::Human)
    }
}

// ── Archetype table ───────────────────────────────────────────────────────────

/// Constructor-time configuration distinguishing enemy types.
#[derive(Clone, Copy, Debug)]
pub struct Archetype {
    pub enemy_type: EnemyType,
    pub size: f32,
    pub health: i32,
    pub score_value: i32,
    pub shoot_cooldown: f32,
    pub attack_range: f32,
    pub has_physics: bool,
    pub frames: FrameSet,
}

pub fn archetype(enemy_type: EnemyType) -> Archetype {
    match enemy_type {
        EnemyType::Human => Archetype {
            enemy_type,
            size: 180.0,
            health: 50,
            score_value: 100,
            shoot_cooldown: 1.5,
            attack_range: 600.0,
            has_physics: true,
            frames: animation::HUMAN_WALK,
        },
        EnemyType::Ship => Archetype {
            enemy_type,
            size: 100.0,
            health: 40,
            score_value: 150,
            shoot_cooldown: 2.0,
            attack_range: 500.0,
            has_physics: false,
            frames: animation::SHIP_FLY,
        },
        EnemyType::Drone => Archetype {
            enemy_type,
            size: 120.0,
            health: 30,
            score_value: 150,
            shoot_cooldown: 2.0,
            attack_range: 500.0,
            has_physics: false,
            frames: animation::DRONE_FLY,
        },
        EnemyType::Boss => Archetype {
            enemy_type,
            size: 220.0,
            health: 400,
            score_value: 1000,
            shoot_cooldown: 1.0,
            attack_range: 800.0,
            has_physics: false,
            frames: animation::BOSS_IDLE,
        },
    }
}

fn default_movement(enemy_type: EnemyType) -> Movement {
    match enemy_type {
        EnemyType::Human => Movement::chase(1.8, 120.0),
        EnemyType::Ship | EnemyType::Drone => {
            Movement::drone(50.0, PLAYFIELD_W - 150.0, 0.8, 30.0, 1.0)
        }
        EnemyType::Boss => Movement::patrol(100.0, PLAYFIELD_W - 300.0, 1.0),
    }
}

// ── State ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct EnemyState {
    pub enemy_type: EnemyType,
    pub health: i32,
    pub max_health: i32,
    pub score_value: i32,
    /// One-way flag; the corpse stays until the death timer elapses.
    pub is_dead: bool,
    pub can_shoot: bool,
    pub shoot_cooldown: f32,
    pub attack_range: f32,
    pub facing_right: bool,
    shoot_timer: f32,
    death_timer: f32,
    is_shooting: bool,
    shoot_anim_timer: f32,
    entered_screen: bool,
}

/// Build an enemy of the given archetype at `position`.
pub fn spawn(enemy_type: EnemyType, position: Vec2) -> Entity {
    let arch = archetype(enemy_type);
    let mut enemy = Entity::base(
        "Enemy",
        position,
        Vec2::new(arch.size, arch.size),
        EntityKind::Enemy(EnemyState {
            enemy_type,
            health: arch.health,
            max_health: arch.health,
            score_value: arch.score_value,
            is_dead: false,
            can_shoot: true,
            shoot_cooldown: arch.shoot_cooldown,
            attack_range: arch.attack_range,
            facing_right: false,
            shoot_timer: 0.0,
            death_timer: 0.0,
            is_shooting: false,
            shoot_anim_timer: 0.0,
            entered_screen: false,
        }),
    );
    enemy.has_physics = arch.has_physics;
    enemy.movement = Some(default_movement(enemy_type));
    enemy.animation = Some(Animation::new(arch.frames, 0.1));
    enemy
}

pub fn update(e: &mut Entity, ctx: &UpdateCtx, events: &mut Vec<GameEvent>) {
    let Entity {
        position,
        velocity,
        size,
        active,
        movement,
        animation,
        kind,
        ..
    } = e;
    let EntityKind::Enemy(st) = kind else { return };

    if st.is_dead {
        st.death_timer += ctx.dt;
        if let Some(anim) = animation {
            anim.pin_frame((st.death_timer / DEATH_FRAME_INTERVAL) as usize);
        }
        if st.death_timer >= DEATH_LINGER {
            *active = false;
        }
        return;
    }

    // Enemies spawn off the right edge; they count as on screen once the
    // whole sprite has crossed in.
    if !st.entered_screen && position.x < PLAYFIELD_W - size.x {
        st.entered_screen = true;
    }

    st.shoot_timer -= ctx.dt;
    if st.is_shooting {
        st.shoot_anim_timer -= ctx.dt;
        if st.shoot_anim_timer <= 0.0 {
            st.is_shooting = false;
        }
    }

    // Face the target while it lives, otherwise the travel direction.
    match &ctx.target {
        Some(t) if !t.dead => st.facing_right = t.position.x > position.x,
        _ => {
            if velocity.x > 0.1 {
                st.facing_right = true;
            } else if velocity.x < -0.1 {
                st.facing_right = false;
            }
        }
    }

    // Ground enemies only open fire after entering the screen; airborne
    // types are not held back (intentional difficulty pacing).
    if st.entered_screen || !st.enemy_type.is_ground() {
        try_shoot(st, *position, *size, ctx, events);
    }

    if let Some(anim) = animation {
        if st.enemy_type.is_ground() {
            if st.is_shooting {
                anim.set_frames(animation::HUMAN_SHOOT);
            } else {
                anim.set_frames(animation::HUMAN_WALK);
            }
        }
        // Airborne archetypes keep their single flight set.
    }

    if let Some(m) = movement {
        m.apply(position, velocity, ctx, events);
    }
    *position = *position + *velocity;

    if let Some(anim) = animation {
        anim.update(ctx.dt);
    }

    // Screen bounds: ground walkers stay on the ground line, fliers get a
    // looser floor.
    position.x = position.x.clamp(0.0, PLAYFIELD_W - size.x);
    position.y = position.y.max(0.0);
    let floor = if st.enemy_type.is_ground() {
        PLAYFIELD_H - GROUND_MARGIN - size.y
    } else {
        PLAYFIELD_H - size.y - AIR_FLOOR_MARGIN
    };
    if position.y >= floor {
        // Landing on the floor line kills the accumulated fall.
        position.y = floor;
        if velocity.y > 0.0 {
            velocity.y = 0.0;
        }
    }
}

fn try_shoot(
    st: &mut EnemyState,
    position: Vec2,
    size: Vec2,
    ctx: &UpdateCtx,
    events: &mut Vec<GameEvent>,
) {
    if !st.can_shoot {
        return;
    }
    let Some(target) = &ctx.target else { return };
    if target.dead {
        return;
    }

    let dist = (target.position.x - position.x).abs();
    if dist > st.attack_range || st.shoot_timer > 0.0 {
        return;
    }

    let origin = Vec2::new(
        if st.facing_right {
            position.x + size.x
        } else {
            position.x
        },
        position.y + size.y / 2.0,
    );
    let aim = (target.position + target.size * 0.5) - origin;
    if aim.length() == 0.0 {
        return;
    }
    let speed = if st.enemy_type == EnemyType::Boss {
        BOSS_BULLET_SPEED
    } else {
        BULLET_SPEED
    };
    events.push(GameEvent::EnemyShot {
        origin,
        velocity: aim.normalized() * speed,
    });
    events.push(GameEvent::Sound {
        name: SND_SHOOT,
        volume: 0.3,
    });

    st.shoot_timer = st.shoot_cooldown;
    st.is_shooting = true;
    st.shoot_anim_timer = SHOOT_ANIM_WINDOW;
}

/// Apply incoming damage. No-op once dead; crossing into the dead state
/// zeroes velocity, switches to the death frames and emits `EnemyKilled`
/// exactly once.
pub fn take_damage(e: &mut Entity, amount: i32, events: &mut Vec<GameEvent>) {
    let Entity {
        velocity,
        position,
        animation,
        kind,
        ..
    } = e;
    let EntityKind::Enemy(st) = kind else { return };
    if st.is_dead {
        return;
    }

    st.health -= amount;
    if st.health <= 0 {
        st.health = 0;
        st.is_dead = true;
        *velocity = Vec2::ZERO;
        if let Some(anim) = animation {
            if st.enemy_type.is_ground() {
                anim.set_frames(animation::HUMAN_DEATH);
            }
        }
        events.push(GameEvent::Sound {
            name: SND_ENEMY_DIE,
            volume: 1.0,
        });
        events.push(GameEvent::EnemyKilled {
            enemy_type: st.enemy_type,
            score: st.score_value,
            position: *position,
        });
    }
}
