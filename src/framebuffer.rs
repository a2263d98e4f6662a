/// Pack an RGB triple into the 0RGB layout softbuffer expects.
#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    // BGRA8 in little-endian memory
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
    // Alpha at 0
}

#[inline]
pub const fn unpack_rgb(c: u32) -> (u8, u8, u8) {
    ((c >> 16) as u8, (c >> 8) as u8, c as u8)
}

/// Row-major `width x height` buffer of packed 0RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Reallocate when the size changed. Contents are unspecified afterwards.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width != self.width || height != self.height {
            tracing::debug!(width, height, "resizing framebuffer");
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height];
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    #[inline]
    pub fn row(&self, y: usize) -> Option<&[u32]> {
        if y < self.height {
            Some(&self.pixels[y * self.width..(y + 1) * self.width])
        } else {
            None
        }
    }
}
