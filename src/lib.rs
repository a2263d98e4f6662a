//! Grid raycaster: a first-person view of a tile map, one ray per screen
//! column, textured from a strip of square wall tiles.

pub mod config;
pub mod error;
pub mod framebuffer;
pub mod game;
pub mod map;
pub mod movement;
pub mod player;
pub mod raycaster;
pub mod renderer;
pub mod scaler;
pub mod texture;

pub use config::Config;
pub use error::{AtlasError, ConfigError, GameError, MapError};
pub use framebuffer::Framebuffer;
pub use game::Game;
pub use map::GridMap;
pub use movement::{Intent, MoveOutcome};
pub use player::Player;
pub use raycaster::{HitRecord, RayHit, Raycaster, Side};
pub use renderer::{Column, Renderer};
pub use texture::TextureAtlas;
