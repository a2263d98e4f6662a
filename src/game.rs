use crate::config::Config;
use crate::error::{AtlasError, GameError};
use crate::framebuffer::Framebuffer;
use crate::map::GridMap;
use crate::movement::{Intent, MoveOutcome, attempt_move};
use crate::player::Player;
use crate::renderer::Renderer;
use crate::texture::TextureAtlas;

/// Owns the world and the single `Player`.
///
/// `apply` is the only path that mutates the player and needs `&mut self`;
/// `render` only reads. Callers on several threads wrap the `Game` in a lock
/// or feed intents through one queue.
#[derive(Debug, Clone)]
pub struct Game {
    map: GridMap,
    atlas: TextureAtlas,
    renderer: Renderer,
    player: Player,
}

impl Game {
    /// Fails when `config` does not validate, or when the atlas tiles do not
    /// match the cell size or cannot cover every wall id in the map.
    pub fn new(config: Config, map: GridMap, atlas: TextureAtlas) -> Result<Self, GameError> {
        config.validate()?;
        if atlas.cell_size() != config.cell_size {
            return Err(AtlasError::Dimensions {
                width: atlas.width(),
                height: atlas.height(),
                cell_size: config.cell_size,
            }
            .into());
        }
        atlas.ensure_covers(map.max_wall_id())?;
        let player = Player::at_spawn(&config);
        Ok(Self {
            map,
            atlas,
            renderer: Renderer::new(config),
            player,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        self.renderer.config()
    }

    #[inline]
    pub fn map(&self) -> &GridMap {
        &self.map
    }

    #[inline]
    pub fn atlas(&self) -> &TextureAtlas {
        &self.atlas
    }

    #[inline]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn apply(&mut self, intent: Intent) -> MoveOutcome {
        attempt_move(&mut self.player, &self.map, intent, self.renderer.config())
    }

    pub fn render(&self, fb: &mut Framebuffer) {
        self.renderer
            .render_frame(&self.player, &self.map, &self.atlas, fb);
    }
}
