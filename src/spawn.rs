/// Deferred enemy spawning.
///
/// Each level pre-populates a strict FIFO queue of spawn actions; the
/// session ticks the queue's accumulator and fires at most one action per
/// elapsed delay interval. Keeping spawns out of the entity list avoids
/// mid-iteration insertion entirely.

use std::collections::VecDeque;

use crate::enemy::{self, EnemyType};
use crate::entities::Entity;
use crate::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnAction {
    pub enemy_type: EnemyType,
    pub x: f32,
    pub y: f32,
}

impl SpawnAction {
    pub fn new(enemy_type: EnemyType, x: f32, y: f32) -> Self {
        SpawnAction { enemy_type, x, y }
    }

    pub fn spawn(&self) -> Entity {
        enemy::spawn(self.enemy_type, Vec2::new(self.x, self.y))
    }
}

pub struct SpawnQueue {
    queue: VecDeque<SpawnAction>,
    timer: f32,
    delay: f32,
}

impl SpawnQueue {
    pub fn new(delay: f32) -> Self {
        SpawnQueue {
            queue: VecDeque::new(),
            timer: 0.0,
            delay,
        }
    }

    pub fn from_actions(delay: f32, actions: impl IntoIterator<Item = SpawnAction>) -> Self {
        let mut queue = SpawnQueue::new(delay);
        queue.queue.extend(actions);
        queue
    }

    pub fn enqueue(&mut self, action: SpawnAction) {
        self.queue.push_back(action);
    }

    /// Advance the accumulator; fires exactly one queued action when the
    /// delay elapses, resetting the accumulator to zero.
    pub fn tick(&mut self, dt: f32) -> Option<SpawnAction> {
        if self.queue.is_empty() {
            return None;
        }
        self.timer += dt;
        if self.timer >= self.delay {
            self.timer = 0.0;
            self.queue.pop_front()
        } else {
            None
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
