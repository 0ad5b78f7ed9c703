/// Entity registry.
///
/// Owns the authoritative live list plus a pending-add buffer. Entities
/// spawned mid-tick (bullets, loot) go into the buffer and are promoted at
/// the start of the next update, so the live list is never mutated while it
/// is being iterated. Insertion order doubles as draw z-order.

use crate::entities::{Entity, EntityKind};
use crate::events::GameEvent;
use crate::input::InputState;
use crate::math::Vec2;
use crate::player::PlayerState;

/// Snapshot of the player passed to entity updates (chase targets, aimed
/// shots). Captured once per tick before the sweep.
#[derive(Clone, Debug)]
pub struct TargetInfo {
    pub position: Vec2,
    pub size: Vec2,
    pub dead: bool,
}

/// Read-only per-tick context handed to every entity update.
pub struct UpdateCtx {
    pub dt: f32,
    pub input: InputState,
    pub target: Option<TargetInfo>,
}

/// Rendering seam: the registry drives the draw pass, the surface knows how
/// to draw one entity.
pub trait DrawSurface {
    fn draw_entity(&mut self, entity: &Entity);
}

#[derive(Default)]
pub struct World {
    objects: Vec<Entity>,
    pending: Vec<Entity>,
}

impl World {
    pub fn new() -> Self {
        World::default()
    }

    /// Queue an entity for insertion. Safe to call at any point in the
    /// tick; the entity goes live at the next promotion.
    pub fn add(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    /// Move all pending entities into the live list, preserving insertion
    /// order. Runs at the start of every update and after each setup phase
    /// so initial entities are live before the first frame draws.
    pub fn promote_pending(&mut self) {
        self.objects.append(&mut self.pending);
    }

    /// Advance every active entity by one tick and collect the events they
    /// produced. Entities deactivated mid-sweep still get their update this
    /// tick (the sweep runs over a fixed snapshot).
    pub fn update(&mut self, dt: f32, input: InputState) -> Vec<GameEvent> {
        self.promote_pending();

        let ctx = UpdateCtx {
            dt,
            input,
            target: self.target_info(),
        };

        let live: Vec<usize> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, e)| e.active)
            .map(|(i, _)| i)
            .collect();

        let mut events = Vec::new();
        for i in live {
            self.objects[i].update(&ctx, &mut events);
        }
        events
    }

    /// Drop every deactivated entity. Runs after collision resolution so a
    /// bullet that spent itself this tick is gone before next tick's
    /// promotion.
    pub fn cleanup(&mut self) {
        self.objects.retain(|e| e.active);
    }

    /// Draw pass: active entities in insertion order (z-order).
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for entity in self.objects.iter().filter(|e| e.active) {
            surface.draw_entity(entity);
        }
    }

    pub fn objects(&self) -> &[Entity] {
        &self.objects
    }

    /// Mutable access for the physics and collision phases.
    pub fn objects_mut(&mut self) -> &mut [Entity] {
        &mut self.objects
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn player(&self) -> Option<&Entity> {
        self.objects.iter().find(|e| e.is_player())
    }

    pub fn player_state(&self) -> Option<&PlayerState> {
        self.player().and_then(|e| match &e.kind {
            EntityKind::Player(st) => Some(st),
            _ => None,
        })
    }

    fn target_info(&self) -> Option<TargetInfo> {
        self.player().map(|p| {
            let dead = matches!(&p.kind, EntityKind::Player(st) if st.is_dead);
            TargetInfo {
                position: p.position,
                size: p.size,
                dead,
            }
        })
    }
}
