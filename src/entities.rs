/// The universal simulated object and its kind-specific payloads.
///
/// A single `Entity` carries the shared body fields and an `EntityKind`
/// payload, and behavior branches on the kind. Everything is pure data plus
/// small update methods; spawning, scoring and audio all flow through
/// events.

use crate::animation::{self, Animation};
use crate::enemy::{self, EnemyState};
use crate::events::GameEvent;
use crate::math::{RectF, Vec2};
use crate::movement::Movement;
use crate::player::{self, PlayerState};
use crate::world::UpdateCtx;

// ── Playfield ─────────────────────────────────────────────────────────────────

/// The simulation runs on a fixed virtual playfield; the renderer projects
/// it onto the actual surface.
pub const PLAYFIELD_W: f32 = 1920.0;
pub const PLAYFIELD_H: f32 = 1080.0;

/// Thickness of the ground strip along the bottom edge.
pub const GROUND_THICKNESS: f32 = 60.0;

/// Ground-walking entities are clamped so their feet stay this far above
/// the bottom edge.
pub const GROUND_MARGIN: f32 = 120.0;

/// Bullets are culled once they leave this envelope around the playfield.
pub const CULL_MIN_X: f32 = -50.0;
pub const CULL_MAX_X: f32 = 2000.0;
pub const CULL_MIN_Y: f32 = -50.0;
pub const CULL_MAX_Y: f32 = 1200.0;

// ── Kinds ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
    Up,
}

#[derive(Clone, Debug)]
pub enum EntityKind {
    Player(PlayerState),
    Enemy(EnemyState),
    PlayerBullet { damage: i32 },
    EnemyBullet { damage: i32 },
    HealthPickup { heal: i32 },
    Platform { is_ground: bool },
}

// ── Entity ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Entity {
    pub tag: &'static str,
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub active: bool,
    pub has_physics: bool,
    pub is_rigid_body: bool,
    pub custom_gravity: Option<f32>,
    pub movement: Option<Movement>,
    pub animation: Option<Animation>,
    pub kind: EntityKind,
}

impl Entity {
    /// Bare entity with sane defaults; constructors below fill in the rest.
    pub(crate) fn base(tag: &'static str, position: Vec2, size: Vec2, kind: EntityKind) -> Self {
        Entity {
            tag,
            position,
            velocity: Vec2::ZERO,
            size,
            active: true,
            has_physics: false,
            is_rigid_body: false,
            custom_gravity: None,
            movement: None,
            animation: None,
            kind,
        }
    }

    pub fn bounds(&self) -> RectF {
        RectF::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }

    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }

    pub fn is_player(&self) -> bool {
        matches!(self.kind, EntityKind::Player(_))
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    /// Per-entity update: movement, timers, integration, bounds, animation.
    /// Inactive entities are skipped by the registry, not here.
    pub fn update(&mut self, ctx: &UpdateCtx, events: &mut Vec<GameEvent>) {
        match self.kind {
            EntityKind::Player(_) => player::update(self, ctx, events),
            EntityKind::Enemy(_) => enemy::update(self, ctx, events),
            EntityKind::PlayerBullet { .. } | EntityKind::EnemyBullet { .. } => {
                self.position = self.position + self.velocity;
                if self.position.x > CULL_MAX_X
                    || self.position.x < CULL_MIN_X
                    || self.position.y < CULL_MIN_Y
                    || self.position.y > CULL_MAX_Y
                {
                    self.active = false;
                }
            }
            EntityKind::HealthPickup { .. } => {
                if let Some(anim) = &mut self.animation {
                    anim.update(ctx.dt);
                }
            }
            EntityKind::Platform { .. } => {}
        }
    }
}

// ── Constructors ──────────────────────────────────────────────────────────────

pub const PLAYER_BULLET_SIZE: f32 = 30.0;
pub const PLAYER_BULLET_SPEED: f32 = 12.0;
pub const PLAYER_BULLET_DAMAGE: i32 = 10;

pub const ENEMY_BULLET_SIZE: f32 = 20.0;
pub const ENEMY_BULLET_DAMAGE: i32 = 15;

pub const PICKUP_SIZE: f32 = 40.0;
pub const PICKUP_HEAL: i32 = 25;

impl Entity {
    /// Player bullet with velocity fixed at spawn from the firing direction.
    pub fn player_bullet(origin: Vec2, facing: Facing) -> Self {
        let mut bullet = Entity::base(
            "PlayerBullet",
            origin,
            Vec2::new(PLAYER_BULLET_SIZE, PLAYER_BULLET_SIZE),
            EntityKind::PlayerBullet {
                damage: PLAYER_BULLET_DAMAGE,
            },
        );
        bullet.velocity = match facing {
            Facing::Right => Vec2::new(PLAYER_BULLET_SPEED, 0.0),
            Facing::Left => Vec2::new(-PLAYER_BULLET_SPEED, 0.0),
            Facing::Up => Vec2::new(0.0, -PLAYER_BULLET_SPEED),
        };
        bullet
    }

    /// Enemy bullet with an aimed velocity computed by the shooter.
    pub fn enemy_bullet(origin: Vec2, velocity: Vec2) -> Self {
        let mut bullet = Entity::base(
            "EnemyBullet",
            origin,
            Vec2::new(ENEMY_BULLET_SIZE, ENEMY_BULLET_SIZE),
            EntityKind::EnemyBullet {
                damage: ENEMY_BULLET_DAMAGE,
            },
        );
        bullet.velocity = velocity;
        bullet
    }

    pub fn health_pickup(position: Vec2) -> Self {
        let mut pickup = Entity::base(
            "HealthPickup",
            position,
            Vec2::new(PICKUP_SIZE, PICKUP_SIZE),
            EntityKind::HealthPickup { heal: PICKUP_HEAL },
        );
        pickup.animation = Some(Animation::new(animation::PICKUP_HEART, 0.1));
        pickup
    }

    /// Static platform; rigid so non-rigid colliders get pushed out of it.
    pub fn platform(x: f32, y: f32, w: f32, h: f32) -> Self {
        let mut plat = Entity::base(
            "Ground",
            Vec2::new(x, y),
            Vec2::new(w, h),
            EntityKind::Platform { is_ground: false },
        );
        plat.is_rigid_body = true;
        plat
    }

    /// Full-width ground strip along the bottom of the playfield.
    pub fn ground() -> Self {
        let mut ground = Entity::platform(
            0.0,
            PLAYFIELD_H - GROUND_THICKNESS,
            PLAYFIELD_W,
            GROUND_THICKNESS,
        );
        ground.kind = EntityKind::Platform { is_ground: true };
        ground
    }
}
