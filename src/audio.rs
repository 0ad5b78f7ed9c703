/// Audio service boundary.
///
/// The core only ever asks for named sounds; what backs them is the
/// front-end's business. The terminal build installs `NullAudio`.

pub trait AudioService {
    fn play_sound(&mut self, name: &str, volume: f32);
    fn play_music(&mut self, name: &str, volume: f32);
    fn stop_music(&mut self);
}

/// Backend that swallows every request. Missing audio must never stall the
/// simulation, so this is also the documented fallback.
#[derive(Default)]
pub struct NullAudio;

impl AudioService for NullAudio {
    fn play_sound(&mut self, _name: &str, _volume: f32) {}
    fn play_music(&mut self, _name: &str, _volume: f32) {}
    fn stop_music(&mut self) {}
}

// Sound names shared between emitters and backends.
pub const SND_SHOOT: &str = "Shoot";
pub const SND_JUMP: &str = "Jump";
pub const SND_ENEMY_DIE: &str = "EnemyDie";
pub const SND_PICKUP: &str = "Pickup";
pub const MUSIC_LEVEL: &str = "LevelMusic";
pub const MUSIC_MENU: &str = "MenuMusic";
