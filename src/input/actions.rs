//! Game action definitions

use serde::{Deserialize, Serialize};

/// Everything a player can ask for. Devices translate physical inputs into
/// these through their `Controls`.
///
/// Default bindings (keyboard / controller):
/// - Move = WASD / left stick (D-pad as fallback)
/// - Shoot = left mouse / RT
/// - Reload = R / Y
/// - Dash = Left Shift / B
/// - Pause = Escape / Start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Shoot,
    Reload,
    Dash,
    Pause,
}

impl Action {
    pub const ALL: [Action; 8] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Shoot,
        Action::Reload,
        Action::Dash,
        Action::Pause,
    ];
}
