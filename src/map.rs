//! Immutable tile grid of wall codes.

use std::path::Path;

use crate::error::MapError;

/// Wall id reported for any lookup outside the grid.
pub const BOUNDARY_WALL: u32 = 1;

/// Rectangular grid of wall codes, row-major. `0` is open floor, `n > 0` is a
/// wall textured with atlas tile `n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMap {
    cols: usize,
    rows: usize,
    cells: Vec<u32>,
}

impl GridMap {
    pub fn from_rows(rows: Vec<Vec<u32>>) -> Result<Self, MapError> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if cols == 0 {
            return Err(MapError::Empty);
        }
        let mut cells = Vec::with_capacity(cols * rows.len());
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MapError::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self {
            cols,
            rows: rows.len(),
            cells,
        })
    }

    /// Parse the text format: one row per line, cells separated by whitespace
    /// or commas, `#` starts a comment line.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let mut rows = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row_index = rows.len();
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .enumerate()
                .map(|(col, token)| {
                    token.parse::<u32>().map_err(|_| MapError::InvalidCell {
                        row: row_index,
                        col,
                        token: token.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            rows.push(row);
        }
        Self::from_rows(rows)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MapError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let map = Self::parse(&text)?;
        tracing::info!(path = %path.display(), cols = map.cols, rows = map.rows, "loaded map");
        Ok(map)
    }

    /// 10x10 demo layout using wall ids 1 through 8.
    pub fn demo() -> Self {
        let rows = vec![
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 0, 3, 3, 0, 1],
            vec![1, 0, 0, 2, 0, 0, 0, 3, 0, 1],
            vec![1, 0, 0, 2, 0, 0, 0, 0, 0, 1],
            vec![1, 0, 0, 0, 0, 4, 4, 0, 0, 1],
            vec![1, 5, 0, 0, 0, 0, 0, 0, 6, 1],
            vec![1, 5, 0, 7, 0, 0, 8, 0, 6, 1],
            vec![1, 0, 0, 0, 0, 0, 0, 0, 0, 1],
            vec![1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ];
        Self {
            cols: 10,
            rows: rows.len(),
            cells: rows.concat(),
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Wall code at cell `(cx, cy)`. Anything outside the grid is solid.
    #[inline]
    pub fn wall_at(&self, cx: i64, cy: i64) -> u32 {
        if cx < 0 || cy < 0 || cx as usize >= self.cols || cy as usize >= self.rows {
            return BOUNDARY_WALL;
        }
        self.cells[cy as usize * self.cols + cx as usize]
    }

    #[inline]
    pub fn is_solid(&self, cx: i64, cy: i64) -> bool {
        self.wall_at(cx, cy) > 0
    }

    /// Largest wall id present (0 for an all-open map).
    pub fn max_wall_id(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }
}
