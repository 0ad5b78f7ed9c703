/// Player state machine: movement, shooting, damage, death.
///
/// Damage is gated by an invincibility window; death is a one-way
/// transition that freezes the body and hands the rest of the tick's work
/// to the death-animation timer.

use crate::animation::{self, Animation};
use crate::audio::{SND_ENEMY_DIE, SND_SHOOT};
use crate::entities::{Entity, EntityKind, Facing, GROUND_MARGIN, PLAYFIELD_H, PLAYFIELD_W};
use crate::events::GameEvent;
use crate::math::Vec2;
use crate::movement::Movement;
use crate::world::UpdateCtx;

pub const PLAYER_SIZE: f32 = 180.0;
pub const MAX_HEALTH: i32 = 100;
pub const MOVE_SPEED: f32 = 5.0;
pub const SHOOT_COOLDOWN: f32 = 0.2;
pub const INVINCIBILITY_DURATION: f32 = 1.5;
/// Contact with a live enemy costs this much health.
pub const CONTACT_DAMAGE: i32 = 15;
const SHOOT_ANIM_WINDOW: f32 = 0.25;
const DEATH_FRAME_INTERVAL: f32 = 0.15;

#[derive(Clone, Debug)]
pub struct PlayerState {
    pub health: i32,
    pub facing: Facing,
    /// One-way flag; never reset within a level instance.
    pub is_dead: bool,
    pub invincibility_timer: f32,
    pub shoot_timer: f32,
    is_shooting: bool,
    shoot_anim_timer: f32,
    pub death_timer: f32,
}

impl PlayerState {
    pub fn is_invincible(&self) -> bool {
        self.invincibility_timer > 0.0
    }
}

/// Build the player entity standing at `position`.
pub fn spawn(position: Vec2) -> Entity {
    let mut player = Entity::base(
        "Player",
        position,
        Vec2::new(PLAYER_SIZE, PLAYER_SIZE),
        EntityKind::Player(PlayerState {
            health: MAX_HEALTH,
            facing: Facing::Right,
            is_dead: false,
            invincibility_timer: 0.0,
            shoot_timer: 0.0,
            is_shooting: false,
            shoot_anim_timer: 0.0,
            death_timer: 0.0,
        }),
    );
    player.has_physics = true;
    player.movement = Some(Movement::player_input(MOVE_SPEED));
    player.animation = Some(Animation::new(animation::PLAYER_IDLE, 0.1));
    player
}

pub fn update(e: &mut Entity, ctx: &UpdateCtx, events: &mut Vec<GameEvent>) {
    let Entity {
        position,
        velocity,
        size,
        movement,
        animation,
        kind,
        ..
    } = e;
    let EntityKind::Player(st) = kind else { return };

    if st.is_dead {
        // Death animation runs on its own timer; motion code is skipped.
        st.death_timer += ctx.dt;
        if let Some(anim) = animation {
            anim.set_frames(animation::PLAYER_DEATH);
            anim.pin_frame((st.death_timer / DEATH_FRAME_INTERVAL) as usize);
        }
        return;
    }

    st.shoot_timer -= ctx.dt;
    st.invincibility_timer -= ctx.dt;

    if st.is_shooting {
        st.shoot_anim_timer -= ctx.dt;
        if st.shoot_anim_timer <= 0.0 {
            st.is_shooting = false;
        }
    }

    // Facing follows the last held direction.
    if ctx.input.right {
        st.facing = Facing::Right;
    } else if ctx.input.left {
        st.facing = Facing::Left;
    }

    if (ctx.input.shoot || ctx.input.shoot_up) && st.shoot_timer <= 0.0 {
        let (origin, facing) = if ctx.input.shoot_up {
            (
                Vec2::new(position.x + size.x / 2.0 - 12.0, position.y - 30.0),
                Facing::Up,
            )
        } else {
            let bullet_x = match st.facing {
                Facing::Right | Facing::Up => position.x + size.x + 5.0,
                Facing::Left => position.x - 35.0,
            };
            (
                Vec2::new(bullet_x, position.y + size.y / 2.0 - 12.0),
                st.facing,
            )
        };
        events.push(GameEvent::Sound {
            name: SND_SHOOT,
            volume: 0.5,
        });
        events.push(GameEvent::PlayerShot { origin, facing });

        st.shoot_timer = SHOOT_COOLDOWN;
        st.is_shooting = true;
        st.shoot_anim_timer = SHOOT_ANIM_WINDOW;
    }

    if let Some(anim) = animation {
        if st.is_shooting {
            anim.set_frames(animation::PLAYER_SHOOT);
        } else if velocity.x.abs() > 0.1 {
            anim.set_frames(animation::PLAYER_RUN);
        } else {
            anim.set_frames(animation::PLAYER_IDLE);
        }
    }

    if let Some(m) = movement {
        m.apply(position, velocity, ctx, events);
    }
    *position = *position + *velocity;

    if let Some(anim) = animation {
        anim.update(ctx.dt);
    }

    // Keep the player on screen and above the ground line. The floor clamp
    // doubles as landing: the fall accumulated by gravity is zeroed so the
    // grounded band stays reachable.
    position.x = position.x.clamp(0.0, PLAYFIELD_W - size.x);
    position.y = position.y.max(0.0);
    let ground_y = PLAYFIELD_H - GROUND_MARGIN - size.y;
    if position.y >= ground_y {
        position.y = ground_y;
        if velocity.y > 0.0 {
            velocity.y = 0.0;
        }
    }
}

/// Apply incoming damage. No-op while dead or invincible; entering the dead
/// state zeroes velocity and emits `PlayerDied` exactly once.
pub fn take_damage(e: &mut Entity, amount: i32, events: &mut Vec<GameEvent>) {
    let EntityKind::Player(st) = &mut e.kind else {
        return;
    };
    if st.is_dead || st.is_invincible() {
        return;
    }

    st.health -= amount;
    st.invincibility_timer = INVINCIBILITY_DURATION;

    if st.health <= 0 {
        st.health = 0;
        st.is_dead = true;
        e.velocity = Vec2::ZERO;
        events.push(GameEvent::Sound {
            name: SND_ENEMY_DIE,
            volume: 1.0,
        });
        events.push(GameEvent::PlayerDied);
    }
}

/// Restore health, clamped to the maximum. No-op once dead.
pub fn heal(e: &mut Entity, amount: i32) {
    let EntityKind::Player(st) = &mut e.kind else {
        return;
    };
    if st.is_dead {
        return;
    }
    st.health = (st.health + amount).min(MAX_HEALTH);
}
