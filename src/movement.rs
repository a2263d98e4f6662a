use tracing::debug;

use crate::config::Config;
use crate::map::GridMap;
use crate::player::Player;

/// A single discrete movement request from the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
    /// Back to the spawn point facing angle 0.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Turned,
    /// A translation was rejected by the collision check; the player is unchanged.
    Blocked,
    Reset,
}

/// Offsets around the candidate point that must all land in open cells.
const COLLISION_SAMPLES: [(f64, f64); 7] = [
    (0.0, 0.0),
    (-1.0, 0.0),
    (0.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// Apply `intent` to `player`. Translations are committed only when every
/// collision sample around the destination is open.
pub fn attempt_move(
    player: &mut Player,
    map: &GridMap,
    intent: Intent,
    config: &Config,
) -> MoveOutcome {
    let sign = match intent {
        Intent::Forward => 1.0,
        Intent::Backward => -1.0,
        Intent::TurnLeft => {
            player.angle -= config.turn_step;
            return MoveOutcome::Turned;
        }
        Intent::TurnRight => {
            player.angle += config.turn_step;
            return MoveOutcome::Turned;
        }
        Intent::Reset => {
            *player = Player::at_spawn(config);
            return MoveOutcome::Reset;
        }
    };

    let dx = sign * config.move_speed * player.angle.cos();
    let dy = sign * config.move_speed * player.angle.sin();
    let (x, y) = (player.x + dx, player.y + dy);

    if !is_open(map, config, x, y) {
        debug!(x, y, ?intent, "move blocked");
        return MoveOutcome::Blocked;
    }
    player.x = x;
    player.y = y;
    MoveOutcome::Moved
}

/// True when all seven samples around `(x, y)` fall in open cells.
///
/// Sample cells truncate toward zero, so a sample up to one cell left of or
/// above the map still lands in row/column 0.
pub fn is_open(map: &GridMap, config: &Config, x: f64, y: f64) -> bool {
    let cell = config.cell();
    COLLISION_SAMPLES.iter().all(|&(ox, oy)| {
        let cx = ((x + ox) / cell) as i64;
        let cy = ((y + oy) / cell) as i64;
        !map.is_solid(cx, cy)
    })
}
