/// Per-tick input snapshot.
///
/// The binary polls the terminal once per frame and condenses the held keys
/// into this struct; the simulation only ever sees the snapshot, never the
/// underlying key events.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    pub shoot_up: bool,
}

impl InputState {
    /// No keys held. Used for ticks where the player entity should coast
    /// (menus, tests, post-death).
    pub fn idle() -> Self {
        InputState::default()
    }
}
