/// Interchangeable per-entity movement strategies.
///
/// Each variant is a pure function of the entity body and elapsed time,
/// with its private state (timers, waypoints, oscillation phase) carried in
/// the variant itself. Strategies never touch the registry; the chase
/// target comes in as a snapshot through `UpdateCtx`.
///
/// Units: horizontal steps are per-tick amounts (position integrates once
/// per 16 ms tick); only timers and the wander strategy use the dt seconds
/// directly.

use rand::rngs::StdRng;
use rand::Rng;

use crate::audio::SND_JUMP;
use crate::events::GameEvent;
use crate::math::{RectF, Vec2};
use crate::world::UpdateCtx;

/// Chase stops moving inside this horizontal distance of the target.
pub const CHASE_DEAD_ZONE: f32 = 50.0;

/// Jump impulse and the band of vertical velocities treated as "grounded".
pub const JUMP_FORCE: f32 = -14.0;
pub const JUMP_COOLDOWN: f32 = 0.3;
const GROUNDED_VY_MIN: f32 = -0.1;
const GROUNDED_VY_MAX: f32 = 2.0;

#[derive(Clone, Debug)]
pub enum Movement {
    /// Closes horizontal distance to the target at `speed * 0.5` per tick,
    /// never crossing below `min_x`.
    Chase { speed: f32, min_x: f32 },
    /// Bounces between `min_x` and `max_x` at `speed * 0.5` per tick.
    Patrol {
        min_x: f32,
        max_x: f32,
        speed: f32,
        moving_right: bool,
    },
    /// Horizontal patrol at `speed * 0.4` per tick plus sinusoidal vertical
    /// bobbing around the y captured on the first move.
    Drone {
        min_x: f32,
        max_x: f32,
        speed: f32,
        amplitude: f32,
        frequency: f32,
        time: f32,
        base_y: Option<f32>,
        moving_right: bool,
    },
    /// Travels toward uniformly random waypoints inside `bounds`, dwelling
    /// 0.5-2.0 s once within 10 units of each.
    RandomPatrol {
        speed: f32,
        bounds: RectF,
        target: Vec2,
        wait_timer: f32,
        wait_duration: f32,
        rng: StdRng,
    },
    /// Reads directional input each tick; applies the jump impulse when
    /// grounded and off cooldown.
    PlayerInput {
        speed: f32,
        jump_cooldown: f32,
    },
}

impl Movement {
    pub fn chase(speed: f32, min_x: f32) -> Self {
        Movement::Chase { speed, min_x }
    }

    pub fn patrol(min_x: f32, max_x: f32, speed: f32) -> Self {
        Movement::Patrol {
            min_x,
            max_x,
            speed,
            moving_right: true,
        }
    }

    pub fn drone(min_x: f32, max_x: f32, speed: f32, amplitude: f32, frequency: f32) -> Self {
        Movement::Drone {
            min_x: min_x.max(0.0),
            max_x,
            speed,
            amplitude,
            frequency,
            time: 0.0,
            base_y: None,
            moving_right: true,
        }
    }

    pub fn random_patrol(speed: f32, bounds: RectF, mut rng: StdRng) -> Self {
        let (target, wait_duration) = pick_waypoint(&bounds, &mut rng);
        Movement::RandomPatrol {
            speed,
            bounds,
            target,
            wait_timer: 0.0,
            wait_duration,
            rng,
        }
    }

    pub fn player_input(speed: f32) -> Self {
        Movement::PlayerInput {
            speed,
            jump_cooldown: 0.0,
        }
    }

    /// Mutates position and velocity in place for one tick.
    pub fn apply(
        &mut self,
        position: &mut Vec2,
        velocity: &mut Vec2,
        ctx: &UpdateCtx,
        events: &mut Vec<GameEvent>,
    ) {
        match self {
            Movement::Chase { speed, min_x } => {
                let Some(target) = &ctx.target else {
                    velocity.x = 0.0;
                    return;
                };
                let diff = target.position.x - position.x;
                let step = *speed * 0.5;
                if diff.abs() > CHASE_DEAD_ZONE {
                    let dir = if diff < 0.0 { -1.0 } else { 1.0 };
                    position.x += dir * step;
                    velocity.x = dir * step;
                } else {
                    velocity.x = 0.0;
                }
                if position.x < *min_x {
                    position.x = *min_x;
                }
            }
            Movement::Patrol {
                min_x,
                max_x,
                speed,
                moving_right,
            } => {
                let step = *speed * 0.5;
                if *moving_right {
                    position.x += step;
                    velocity.x = step;
                    if position.x >= *max_x {
                        *moving_right = false;
                    }
                } else {
                    position.x -= step;
                    velocity.x = -step;
                    if position.x <= *min_x {
                        *moving_right = true;
                    }
                }
            }
            Movement::Drone {
                min_x,
                max_x,
                speed,
                amplitude,
                frequency,
                time,
                base_y,
                moving_right,
            } => {
                let base = *base_y.get_or_insert(position.y.max(50.0));
                *time += ctx.dt;

                let step = *speed * 0.4;
                if *moving_right {
                    position.x += step;
                    *velocity = Vec2::new(step, 0.0);
                    if position.x >= *max_x {
                        *moving_right = false;
                    }
                } else {
                    position.x -= step;
                    *velocity = Vec2::new(-step, 0.0);
                    if position.x <= *min_x {
                        *moving_right = true;
                    }
                }
                if position.x < 0.0 {
                    position.x = 0.0;
                }

                position.y = (base + (*time * *frequency * 0.5).sin() * *amplitude).max(20.0);
            }
            Movement::RandomPatrol {
                speed,
                bounds,
                target,
                wait_timer,
                wait_duration,
                rng,
            } => {
                if *wait_timer > 0.0 {
                    *wait_timer -= ctx.dt;
                    *velocity = Vec2::ZERO;
                    return;
                }

                let delta = *target - *position;
                let dist = delta.length();
                if dist < 10.0 {
                    *wait_timer = *wait_duration;
                    let (next, dwell) = pick_waypoint(bounds, rng);
                    *target = next;
                    *wait_duration = dwell;
                    return;
                }

                let step = delta.normalized() * (*speed * ctx.dt);
                *position = *position + step;
                *velocity = step;
            }
            Movement::PlayerInput {
                speed,
                jump_cooldown,
            } => {
                let mut vx = 0.0;
                if ctx.input.left {
                    vx = -*speed;
                }
                if ctx.input.right {
                    vx = *speed;
                }
                velocity.x = vx;

                *jump_cooldown -= ctx.dt;

                let grounded =
                    velocity.y >= GROUNDED_VY_MIN && velocity.y <= GROUNDED_VY_MAX;
                if ctx.input.jump && grounded && *jump_cooldown <= 0.0 {
                    velocity.y = JUMP_FORCE;
                    *jump_cooldown = JUMP_COOLDOWN;
                    events.push(GameEvent::Sound {
                        name: SND_JUMP,
                        volume: 0.5,
                    });
                }
            }
        }
    }
}

fn pick_waypoint(bounds: &RectF, rng: &mut StdRng) -> (Vec2, f32) {
    let target = Vec2::new(
        bounds.x + rng.gen::<f32>() * bounds.w,
        bounds.y + rng.gen::<f32>() * bounds.h,
    );
    let dwell = 0.5 + rng.gen::<f32>() * 1.5;
    (target, dwell)
}
