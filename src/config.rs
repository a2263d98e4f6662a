use std::f64::consts::PI;
use std::time::Duration;

use crate::error::ConfigError;
use crate::framebuffer::pack_rgb;

/// Fixed parameters shared by the raycaster, renderer and movement code.
///
/// Built once by the embedding application and handed to each component at
/// construction. Nothing here changes while the program runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub screen_width: usize,
    pub screen_height: usize,
    /// World pixels per grid cell. Texture tiles are exactly this wide and tall.
    pub cell_size: usize,
    /// Horizontal field of view, radians.
    pub fov: f64,
    /// Packed 0RGB colors for the top and bottom halves of each column.
    pub sky: u32,
    pub ground: u32,
    /// World pixels per forward/backward step.
    pub move_speed: f64,
    /// Radians per turn step.
    pub turn_step: f64,
    /// Reset target, world pixels.
    pub spawn: [f64; 2],
    /// Repaint cadence used by the presentation loop.
    pub tick: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_cell_size(64)
    }
}

impl Config {
    /// Default screen and colors with movement constants derived from `cell_size`.
    pub fn with_cell_size(cell_size: usize) -> Self {
        let cell = cell_size as f64;
        Self {
            screen_width: 640,
            screen_height: 480,
            cell_size,
            fov: PI / 3.0,
            sky: pack_rgb(204, 235, 255),
            ground: pack_rgb(86, 125, 70),
            move_speed: (cell_size / 4) as f64,
            turn_step: PI / 90.0,
            spawn: [cell + cell / 2.0, cell + cell / 2.0],
            tick: Duration::from_millis(50),
        }
    }

    pub fn with_screen(mut self, width: usize, height: usize) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(ConfigError::ZeroScreen {
                width: self.screen_width,
                height: self.screen_height,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if !(self.fov.is_finite() && self.fov > 0.0 && self.fov < PI) {
            return Err(ConfigError::FieldOfView(self.fov));
        }
        for (name, value) in [("move speed", self.move_speed), ("turn step", self.turn_step)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Speed { name, value });
            }
        }
        Ok(())
    }

    /// Distance from the eye to the projection plane, in screen pixels.
    #[inline]
    pub fn projection_distance(&self) -> f64 {
        self.screen_width as f64 / (2.0 * (self.fov / 2.0).tan())
    }

    #[inline]
    pub fn cell(&self) -> f64 {
        self.cell_size as f64
    }
}
