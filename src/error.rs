use std::fmt;
use std::path::PathBuf;

/// Rejected `Config` values.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Screen width or height is zero.
    ZeroScreen { width: usize, height: usize },
    /// Cell size is zero.
    ZeroCellSize,
    /// Field of view outside the open interval (0, pi).
    FieldOfView(f64),
    /// Move speed or turn step is not a positive finite number.
    Speed { name: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroScreen { width, height } => {
                write!(f, "screen size must be non-zero, got {width}x{height}")
            }
            Self::ZeroCellSize => write!(f, "cell size must be non-zero"),
            Self::FieldOfView(fov) => {
                write!(f, "field of view must be in (0, pi) radians, got {fov}")
            }
            Self::Speed { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Map construction or parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// No rows, or a first row with no cells.
    Empty,
    /// A row whose length differs from the first row.
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A token that is not a non-negative integer.
    InvalidCell {
        row: usize,
        col: usize,
        token: String,
    },
    /// The map file could not be read.
    Io { path: PathBuf, message: String },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "map has no cells"),
            Self::Ragged {
                row,
                expected,
                found,
            } => write!(
                f,
                "map row {row} has {found} cells, expected {expected} (map must be rectangular)"
            ),
            Self::InvalidCell { row, col, token } => {
                write!(f, "map cell ({row}, {col}) is not a wall id: {token:?}")
            }
            Self::Io { path, message } => {
                write!(f, "failed to read map {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Texture atlas load or validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// The image could not be opened or decoded.
    Decode { path: PathBuf, message: String },
    /// Height differs from the cell size, or width is not a multiple of it.
    Dimensions {
        width: usize,
        height: usize,
        cell_size: usize,
    },
    /// The atlas has fewer tiles than the map has wall ids.
    TooFewTiles { tiles: usize, required: u32 },
}

impl fmt::Display for AtlasError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode { path, message } => {
                write!(f, "failed to load texture atlas {}: {message}", path.display())
            }
            Self::Dimensions {
                width,
                height,
                cell_size,
            } => write!(
                f,
                "texture atlas is {width}x{height}, expected height {cell_size} and a width that is a positive multiple of {cell_size}"
            ),
            Self::TooFewTiles { tiles, required } => write!(
                f,
                "texture atlas has {tiles} tiles but the map uses wall id {required}"
            ),
        }
    }
}

impl std::error::Error for AtlasError {}

/// Everything `Game::new` can reject.
#[derive(Debug, Clone, PartialEq)]
pub enum GameError {
    Config(ConfigError),
    Atlas(AtlasError),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::Atlas(e) => write!(f, "unusable texture atlas: {e}"),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Atlas(e) => Some(e),
        }
    }
}

impl From<ConfigError> for GameError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<AtlasError> for GameError {
    fn from(e: AtlasError) -> Self {
        Self::Atlas(e)
    }
}
