use crate::config::Config;

/// Viewer state in world pixels. Only movement code mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub angle: f64, // radians, 0 looks along +x, grows toward +y
}

impl Player {
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self { x, y, angle }
    }

    /// Facing angle 0 at the configured spawn point.
    pub fn at_spawn(config: &Config) -> Self {
        Self::new(config.spawn[0], config.spawn[1], 0.0)
    }

    #[inline]
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}
