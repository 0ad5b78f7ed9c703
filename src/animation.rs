/// Frame-cycling animation state.
///
/// The core never holds image data. An animation is a named frame set plus
/// a cursor; the renderer resolves (set key, frame index) to whatever it
/// can draw and falls back to a solid primitive for unknown keys.

/// A named, fixed-length sequence of frames. The renderer owns the actual
/// frame content; the core only needs the length to cycle the cursor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameSet {
    pub key: &'static str,
    pub len: usize,
}

impl FrameSet {
    pub const fn new(key: &'static str, len: usize) -> Self {
        FrameSet { key, len }
    }
}

// Frame sets used by the shipped entities. Lengths must match the
// renderer's sprite store; unknown keys degrade to primitives.
pub const PLAYER_IDLE: FrameSet = FrameSet::new("player/idle", 2);
pub const PLAYER_RUN: FrameSet = FrameSet::new("player/run", 2);
pub const PLAYER_SHOOT: FrameSet = FrameSet::new("player/shoot", 2);
pub const PLAYER_DEATH: FrameSet = FrameSet::new("player/death", 3);
pub const HUMAN_WALK: FrameSet = FrameSet::new("enemy/human/walk", 2);
pub const HUMAN_SHOOT: FrameSet = FrameSet::new("enemy/human/shoot", 2);
pub const HUMAN_DEATH: FrameSet = FrameSet::new("enemy/human/death", 3);
pub const SHIP_FLY: FrameSet = FrameSet::new("enemy/ship", 2);
pub const DRONE_FLY: FrameSet = FrameSet::new("enemy/drone", 2);
pub const BOSS_IDLE: FrameSet = FrameSet::new("enemy/boss", 2);
pub const PICKUP_HEART: FrameSet = FrameSet::new("pickup/heart", 2);

#[derive(Clone, Debug)]
pub struct Animation {
    set: FrameSet,
    frame: usize,
    timer: f32,
    interval: f32,
}

impl Animation {
    pub fn new(set: FrameSet, interval: f32) -> Self {
        Animation {
            set,
            frame: 0,
            timer: 0.0,
            interval,
        }
    }

    pub fn set_key(&self) -> &'static str {
        self.set.key
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advance the cursor, wrapping at the end of the set.
    pub fn update(&mut self, dt: f32) {
        if self.set.len == 0 {
            return;
        }
        self.timer += dt;
        if self.timer > self.interval {
            self.timer = 0.0;
            self.frame = (self.frame + 1) % self.set.len;
        }
    }

    /// Switch to a different frame set, restarting from frame zero.
    /// Re-setting the current set keeps the cursor where it is.
    pub fn set_frames(&mut self, set: FrameSet) {
        if self.set == set {
            return;
        }
        self.set = set;
        self.frame = 0;
        self.timer = 0.0;
    }

    /// Pin the cursor to a specific frame, clamped to the set. Used by
    /// death sequences that hold the final frame.
    pub fn pin_frame(&mut self, frame: usize) {
        if self.set.len > 0 {
            self.frame = frame.min(self.set.len - 1);
        }
    }
}
