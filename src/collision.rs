/// Pairwise AABB collision detection, positional resolution and reaction
/// dispatch.
///
/// O(n^2) over the active entities — fine at tens of entities, and it keeps
/// pair order deterministic (insertion order, i < j). Resolution happens
/// before dispatch, and dispatch always runs in both directions for an
/// intersecting pair, whether or not a push occurred.

use crate::audio::SND_PICKUP;
use crate::entities::{Entity, EntityKind};
use crate::events::GameEvent;
use crate::math::{RectF, Vec2};
use crate::player::{self, CONTACT_DAMAGE};
use crate::enemy;

/// One collision sweep. Called once per tick after physics, before cleanup.
pub fn check(objects: &mut [Entity], events: &mut Vec<GameEvent>) {
    // Fixed snapshot of the entities that were active when the sweep
    // started; deactivation mid-sweep does not remove a pair.
    let live: Vec<usize> = objects
        .iter()
        .enumerate()
        .filter(|(_, e)| e.active)
        .map(|(i, _)| i)
        .collect();

    for a_pos in 0..live.len() {
        for b_pos in (a_pos + 1)..live.len() {
            let (i, j) = (live[a_pos], live[b_pos]);
            // i < j always holds, so splitting at j yields both halves.
            let (head, tail) = objects.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];

            if !a.bounds().intersects(&b.bounds()) {
                continue;
            }

            if let Some(overlap) = a.bounds().intersection(&b.bounds()) {
                resolve(a, b, &overlap);
            }

            react(a, b, events);
            react(b, a, events);
        }
    }
}

// ── Positional resolution ─────────────────────────────────────────────────────

fn resolve(a: &mut Entity, b: &mut Entity, overlap: &RectF) {
    if a.is_rigid_body && !b.is_rigid_body {
        push_out(b, a.position, overlap);
        b.velocity = Vec2::ZERO;
    } else if b.is_rigid_body && !a.is_rigid_body {
        push_out(a, b.position, overlap);
        a.velocity = Vec2::ZERO;
    } else {
        push_apart(a, b, overlap);
    }

    // A rigid body settles for good once it has resolved one overlap.
    if a.is_rigid_body {
        a.velocity = Vec2::ZERO;
        a.has_physics = false;
    }
    if b.is_rigid_body {
        b.velocity = Vec2::ZERO;
        b.has_physics = false;
    }
}

/// Push `movable` fully out of the rigid body along the axis of minimum
/// overlap, away from the rigid body's side.
fn push_out(movable: &mut Entity, rigid_pos: Vec2, overlap: &RectF) {
    if overlap.w < overlap.h {
        if rigid_pos.x < movable.position.x {
            movable.position.x += overlap.w;
        } else {
            movable.position.x -= overlap.w;
        }
    } else if rigid_pos.y < movable.position.y {
        movable.position.y += overlap.h;
    } else {
        movable.position.y -= overlap.h;
    }
}

/// Split the overlap in half along the axis of minimum overlap and push
/// both entities apart by that half.
fn push_apart(a: &mut Entity, b: &mut Entity, overlap: &RectF) {
    if overlap.w < overlap.h {
        let sep = overlap.w / 2.0;
        if a.position.x < b.position.x {
            a.position.x -= sep;
            b.position.x += sep;
        } else {
            a.position.x += sep;
            b.position.x -= sep;
        }
    } else {
        let sep = overlap.h / 2.0;
        if a.position.y < b.position.y {
            a.position.y -= sep;
            b.position.y += sep;
        } else {
            a.position.y += sep;
            b.position.y -= sep;
        }
    }
}

// ── Reaction dispatch ─────────────────────────────────────────────────────────

/// `a`'s reaction to touching `b`. Specific to (self-kind, other-kind);
/// called in both directions for every intersecting pair.
fn react(a: &mut Entity, b: &mut Entity, events: &mut Vec<GameEvent>) {
    match &a.kind {
        EntityKind::Player(_) => match &b.kind {
            EntityKind::Enemy(es) if !es.is_dead => {
                player::take_damage(a, CONTACT_DAMAGE, events);
            }
            EntityKind::EnemyBullet { damage } => {
                let damage = *damage;
                player::take_damage(a, damage, events);
            }
            _ => {}
        },
        EntityKind::Enemy(_) => {
            if let EntityKind::PlayerBullet { damage } = b.kind {
                enemy::take_damage(a, damage, events);
            }
        }
        EntityKind::PlayerBullet { .. } => match &b.kind {
            EntityKind::Enemy(es) if !es.is_dead => a.active = false,
            EntityKind::Platform { .. } => a.active = false,
            _ => {}
        },
        EntityKind::EnemyBullet { .. } => match &b.kind {
            EntityKind::Player(_) => a.active = false,
            EntityKind::Platform { .. } => a.active = false,
            _ => {}
        },
        EntityKind::HealthPickup { heal } => {
            // Collection is handled from the pickup's side so a pair heals
            // exactly once.
            if a.active {
                if let EntityKind::Player(ps) = &b.kind {
                    if !ps.is_dead {
                        let heal = *heal;
                        player::heal(b, heal);
                        a.active = false;
                        events.push(GameEvent::PickupTaken { heal });
                        events.push(GameEvent::Sound {
                            name: SND_PICKUP,
                            volume: 0.7,
                        });
                    }
                }
            }
        }
        EntityKind::Platform { .. } => {}
    }
}
