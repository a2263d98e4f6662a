use rayon::prelude::*;

use crate::config::Config;
use crate::framebuffer::Framebuffer;
use crate::map::GridMap;
use crate::player::Player;
use crate::raycaster::{RayHit, Raycaster};
use crate::texture::TextureAtlas;

/// Projected heights are clamped here so a viewer pressed against a wall
/// still gets integer screen math.
const MAX_COLUMN_HEIGHT: f64 = (1u64 << 24) as f64;

/// One screen column's projected wall slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub ray_angle: f64,
    pub hit: RayHit,
    /// `hit.record.distance` projected onto the view direction.
    pub corrected_distance: f64,
    /// On-screen wall height in pixels, before clipping. 0 draws nothing.
    pub height: i64,
    /// Top of the unclipped slice; may be negative.
    pub start_y: i64,
    /// Atlas column sampled for this slice.
    pub atlas_x: usize,
}

impl Column {
    #[inline]
    pub fn end_y(&self) -> i64 {
        self.start_y + self.height
    }

    #[inline]
    pub fn covers(&self, y: usize) -> bool {
        let y = y as i64;
        self.height > 0 && y >= self.start_y && y < self.end_y()
    }

    /// Texture row for screen row `y`, mapping the whole unclipped slice onto
    /// `[0, cell_size)`.
    #[inline]
    pub fn texture_row(&self, y: usize, cell_size: usize) -> usize {
        let t = (y as i64 - self.start_y) as f64 / self.height as f64;
        ((t * cell_size as f64) as usize).min(cell_size - 1)
    }
}

/// Draws the scene one ray per screen column.
#[derive(Debug, Clone)]
pub struct Renderer {
    config: Config,
    caster: Raycaster,
}

impl Renderer {
    pub fn new(config: Config) -> Self {
        let caster = Raycaster::new(&config);
        Self { config, caster }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute direction of the ray for screen column `col`.
    #[inline]
    pub fn ray_angle(&self, player: &Player, col: usize) -> f64 {
        let fov = self.config.fov;
        let step = fov / self.config.screen_width as f64;
        player.angle - fov / 2.0 + col as f64 * step
    }

    pub fn project_column(
        &self,
        player: &Player,
        map: &GridMap,
        atlas: &TextureAtlas,
        col: usize,
    ) -> Column {
        let cell_size = self.config.cell_size;
        let screen_h = self.config.screen_height as i64;

        let ray_angle = self.ray_angle(player, col);
        let hit = self.caster.cast(player, ray_angle, map);

        // Fisheye: use the distance along the view direction
        let corrected_distance = hit.record.distance * (ray_angle - player.angle).cos();
        let projected = cell_size as f64 / corrected_distance * self.config.projection_distance();
        let height = if projected.is_nan() {
            0
        } else {
            (projected.min(MAX_COLUMN_HEIGHT) as i64).max(0)
        };

        let offset = hit.texture_offset(cell_size);
        Column {
            ray_angle,
            hit,
            corrected_distance,
            height,
            start_y: (screen_h - height) / 2,
            atlas_x: atlas.column_for(hit.record.wall_id, offset),
        }
    }

    /// Cast every column, then fill the framebuffer row by row: sky above the
    /// horizon, ground below, textured wall wherever a column's slice covers
    /// the row.
    pub fn render_frame(
        &self,
        player: &Player,
        map: &GridMap,
        atlas: &TextureAtlas,
        fb: &mut Framebuffer,
    ) {
        let (width, height) = (self.config.screen_width, self.config.screen_height);
        fb.resize(width, height);
        if width == 0 || height == 0 {
            return;
        }

        let columns: Vec<Column> = (0..width)
            .into_par_iter()
            .map(|col| self.project_column(player, map, atlas, col))
            .collect();

        let cell_size = self.config.cell_size;
        let (sky, ground) = (self.config.sky, self.config.ground);
        let horizon = height / 2;

        fb.pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| {
                let background = if y < horizon { sky } else { ground };
                for (px, column) in row.iter_mut().zip(&columns) {
                    *px = if column.covers(y) {
                        atlas.sample(column.atlas_x, column.texture_row(y, cell_size))
                    } else {
                        background
                    };
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room() -> GridMap {
        GridMap::from_rows(vec![
            vec![1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1],
        ])
        .unwrap()
    }

    fn small_renderer() -> Renderer {
        Renderer::new(Config::default().with_screen(64, 48))
    }

    #[test]
    fn centre_column_looks_straight_ahead() {
        let renderer = small_renderer();
        let player = Player::new(96.0, 96.0, 0.3);
        let angle = renderer.ray_angle(&player, 32);
        assert!((angle - player.angle).abs() < 1e-12);
        assert!((renderer.ray_angle(&player, 0) - (0.3 - renderer.config().fov / 2.0)).abs() < 1e-12);
    }

    #[test]
    fn projected_height_follows_distance() {
        let renderer = small_renderer();
        let atlas = TextureAtlas::procedural(64, 1);
        let player = Player::new(96.0, 96.0, 0.0);
        let column = renderer.project_column(&player, &room(), &atlas, 32);
        let d = renderer.config().projection_distance();
        assert_eq!(column.height, (64.0 / 160.0 * d) as i64);
        assert_eq!(column.start_y, (48 - column.height) / 2);
        // hit_y = 96 -> offset 32 in tile 1
        assert_eq!(column.atlas_x, 32);
    }

    #[test]
    fn texture_row_stays_in_tile_when_clipped() {
        let column = Column {
            ray_angle: 0.0,
            hit: RayHit {
                record: crate::raycaster::HitRecord {
                    hit_x: 0.0,
                    hit_y: 0.0,
                    distance: 1.0,
                    wall_id: 1,
                },
                side: crate::raycaster::Side::Vertical,
            },
            corrected_distance: 1.0,
            height: 1000,
            start_y: -476,
            atlas_x: 0,
        };
        assert!(column.covers(0));
        assert!(column.covers(47));
        assert_eq!(column.texture_row(0, 64), (476.0 / 1000.0 * 64.0) as usize);
        assert!(column.texture_row(523, 64) < 64);
    }

    #[test]
    fn frame_has_sky_ground_and_wall() {
        let renderer = small_renderer();
        let atlas = TextureAtlas::procedural(64, 1);
        let player = Player::new(96.0, 96.0, 0.0);
        let mut fb = Framebuffer::new(1, 1);
        renderer.render_frame(&player, &room(), &atlas, &mut fb);

        assert_eq!((fb.width, fb.height), (64, 48));
        let config = renderer.config();
        let column = renderer.project_column(&player, &room(), &atlas, 10);
        assert!(column.start_y > 0, "wall should not fill the column");
        assert_eq!(fb.get(10, 0), Some(config.sky));
        assert_eq!(fb.get(10, 47), Some(config.ground));
        let mid = column.start_y as usize + 1;
        assert_eq!(
            fb.get(10, mid),
            Some(atlas.sample(column.atlas_x, column.texture_row(mid, 64)))
        );
    }

    #[test]
    fn standing_in_a_wall_does_not_panic() {
        let renderer = small_renderer();
        let atlas = TextureAtlas::procedural(64, 1);
        // On the wall line itself: distance 0 for the centre column
        let player = Player::new(64.0, 96.0, std::f64::consts::PI);
        let mut fb = Framebuffer::new(64, 48);
        renderer.render_frame(&player, &room(), &atlas, &mut fb);
        assert_eq!(fb.pixels.len(), 64 * 48);
    }

    #[test]
    fn empty_screen_renders_nothing() {
        let renderer = Renderer::new(Config::default().with_screen(0, 48));
        let atlas = TextureAtlas::procedural(64, 1);
        let player = Player::new(96.0, 96.0, 0.0);
        let mut fb = Framebuffer::new(64, 48);
        renderer.render_frame(&player, &room(), &atlas, &mut fb);
        assert_eq!((fb.width, fb.height), (0, 48));
        assert!(fb.pixels.is_empty());
    }
}
