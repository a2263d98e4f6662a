//! Wall texture strip: `tiles` square tiles of `cell_size` pixels laid out
//! left to right, tile `n` (1-based wall id) starting at column
//! `(n - 1) * cell_size`.

use std::path::Path;

use crate::error::AtlasError;
use crate::framebuffer::{pack_rgb, unpack_rgb};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAtlas {
    cell_size: usize,
    width: usize,
    height: usize,
    pixels: Vec<u32>, // packed 0RGB, row-major
}

impl TextureAtlas {
    /// Wrap packed pixels. `width` must be a positive multiple of `cell_size`
    /// and `height` must equal it.
    pub fn from_pixels(
        cell_size: usize,
        width: usize,
        height: usize,
        pixels: Vec<u32>,
    ) -> Result<Self, AtlasError> {
        let dims_ok = cell_size > 0
            && height == cell_size
            && width >= cell_size
            && width % cell_size == 0
            && pixels.len() == width * height;
        if !dims_ok {
            return Err(AtlasError::Dimensions {
                width,
                height,
                cell_size,
            });
        }
        Ok(Self {
            cell_size,
            width,
            height,
            pixels,
        })
    }

    /// Decode an image file (PNG) into an atlas.
    pub fn load<P: AsRef<Path>>(path: P, cell_size: usize) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| AtlasError::Decode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let rgb = img.to_rgb8();
        let (width, height) = (rgb.width() as usize, rgb.height() as usize);
        let pixels = rgb.pixels().map(|p| pack_rgb(p[0], p[1], p[2])).collect();

        let atlas = Self::from_pixels(cell_size, width, height, pixels)?;
        tracing::info!(
            path = %path.display(),
            width,
            height,
            tiles = atlas.tiles(),
            "loaded texture atlas"
        );
        Ok(atlas)
    }

    /// Generated brick tiles, one hue per wall id.
    pub fn procedural(cell_size: usize, tiles: usize) -> Self {
        let cell_size = cell_size.max(1);
        let tiles = tiles.max(1);
        let width = cell_size * tiles;
        let mut pixels = vec![0; width * cell_size];

        let brick_h = (cell_size / 4).max(1);
        let brick_w = (cell_size / 2).max(1);
        for tile in 0..tiles {
            let base = tile_color(tile);
            let mortar = shade(base, 96);
            for y in 0..cell_size {
                let course = y / brick_h;
                // Every other course shifts half a brick
                let shift = if course % 2 == 1 { brick_w / 2 } else { 0 };
                for x in 0..cell_size {
                    let on_mortar = y % brick_h == 0 || (x + shift) % brick_w == 0;
                    let c = if on_mortar {
                        mortar
                    } else if (x / 4 + y / 4) % 2 == 0 {
                        base
                    } else {
                        shade(base, 224)
                    };
                    pixels[y * width + tile * cell_size + x] = c;
                }
            }
        }

        Self {
            cell_size,
            width,
            height: cell_size,
            pixels,
        }
    }

    #[inline]
    pub fn cell_size(&self) -> usize {
        self.cell_size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn tiles(&self) -> usize {
        self.width / self.cell_size
    }

    /// Fails when the map references a wall id with no tile.
    pub fn ensure_covers(&self, max_wall_id: u32) -> Result<(), AtlasError> {
        if max_wall_id as usize > self.tiles() {
            return Err(AtlasError::TooFewTiles {
                tiles: self.tiles(),
                required: max_wall_id,
            });
        }
        Ok(())
    }

    /// Atlas column for `offset` inside the tile of `wall_id`, clamped to the strip.
    #[inline]
    pub fn column_for(&self, wall_id: u32, offset: usize) -> usize {
        let tile = (wall_id.max(1) - 1) as usize;
        let x = tile * self.cell_size + offset.min(self.cell_size - 1);
        x.min(self.width - 1)
    }

    /// Texel at `(x, y)`, both clamped into the atlas.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u32 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.pixels[y * self.width + x]
    }
}

fn tile_color(tile: usize) -> u32 {
    const PALETTE: [(u8, u8, u8); 8] = [
        (150, 60, 50),
        (110, 110, 120),
        (60, 90, 150),
        (140, 110, 60),
        (70, 130, 70),
        (120, 70, 130),
        (160, 140, 90),
        (60, 130, 130),
    ];
    let (r, g, b) = PALETTE[tile % PALETTE.len()];
    pack_rgb(r, g, b)
}

/// Scale every channel by `k / 256`.
fn shade(c: u32, k: u32) -> u32 {
    let (r, g, b) = unpack_rgb(c);
    let f = |v: u8| ((v as u32 * k) >> 8) as u8;
    pack_rgb(f(r), f(g), f(b))
}
