/// Space Defender — a 2D side-scrolling shooter.
///
/// The library is the whole simulation: entity registry, movement
/// strategies, physics, collision, the player/enemy state machines, level
/// definitions and persistence. The binary adds the terminal front-end
/// (input polling, projection rendering, menus) on top of it.

pub mod animation;
pub mod audio;
pub mod collision;
pub mod enemy;
pub mod entities;
pub mod events;
pub mod input;
pub mod level;
pub mod math;
pub mod movement;
pub mod physics;
pub mod player;
pub mod save;
pub mod session;
pub mod spawn;
pub mod world;
