use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

/// Precomputed mapping from window pixels to framebuffer pixels
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScaleLut {
    src_x: Vec<usize>,
    src_row: Vec<usize>, // source row start offsets
}

impl ScaleLut {
    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn dst_width(&self) -> usize {
        self.src_x.len()
    }

    #[inline]
    pub fn dst_height(&self) -> usize {
        self.src_row.len()
    }
}

pub fn build_scale_lut(dst_w: usize, dst_h: usize, src_w: usize, src_h: usize) -> ScaleLut {
    if src_w == 0 || src_h == 0 {
        return ScaleLut::empty();
    }
    let src_x = (0..dst_w)
        .map(|x| (x * src_w / dst_w).min(src_w - 1))
        .collect();
    let src_row = (0..dst_h)
        .map(|y| (y * src_h / dst_h).min(src_h - 1) * src_w)
        .collect();
    ScaleLut { src_x, src_row }
}

/// Parallel nearest-neighbour stretch. Rows are processed in parallel for
/// cache friendly writes; rows or columns the LUT does not cover are left as is.
pub fn blit_nearest_stretch(dst: &mut [u32], dw: usize, src: &[u32], lut: &ScaleLut) {
    if dw == 0 {
        return;
    }
    dst.par_chunks_mut(dw)
        .enumerate()
        .take(lut.dst_height())
        .for_each(|(y, dst_row)| {
            let row = lut.src_row[y];
            for (px, &sx) in dst_row.iter_mut().zip(&lut.src_x) {
                *px = src[row + sx];
            }
        });
}
