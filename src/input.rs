use grid_raycaster::Intent;
use winit::keyboard::KeyCode;

/// Map a pressed key to a movement intent. Unbound keys yield `None`.
pub fn intent_for(code: KeyCode) -> Option<Intent> {
    match code {
        KeyCode::ArrowUp | KeyCode::KeyW => Some(Intent::Forward),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(Intent::Backward),
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(Intent::TurnLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(Intent::TurnRight),
        KeyCode::KeyR => Some(Intent::Reset),
        _ => None,
    }
}
