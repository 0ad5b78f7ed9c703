/// Gravity step.
///
/// Runs after the update phase: entities flagged for physics accumulate a
/// downward velocity adjustment which the next tick's integration applies.
/// Rigid bodies lose this flag permanently once they resolve a collision.

use crate::entities::Entity;

/// Per-tick gravity applied to physics entities without a custom value.
pub const DEFAULT_GRAVITY: f32 = 0.6;

pub fn apply(objects: &mut [Entity]) {
    for obj in objects.iter_mut() {
        if !obj.active || !obj.has_physics {
            continue;
        }
        obj.velocity.y += obj.custom_gravity.unwrap_or(DEFAULT_GRAVITY);
    }
}
