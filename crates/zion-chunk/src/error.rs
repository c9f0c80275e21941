use std::error::Error;
use std::fmt;

use zion_world::TileCoord;

/// A tile build that must not be registered. The coordinate is retried later.
#[derive(Clone, Debug, PartialEq)]
pub enum TileBuildError {
    NonFiniteSample { coord: TileCoord, x: f32, z: f32 },
    Generator { coord: TileCoord, generator: String, reason: String },
}

impl TileBuildError {
    pub fn coord(&self) -> TileCoord {
        match self {
            TileBuildError::NonFiniteSample { coord, .. } => *coord,
            TileBuildError::Generator { coord, .. } => *coord,
        }
    }
}

impl fmt::Display for TileBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileBuildError::NonFiniteSample { coord, x, z } => write!(
                f,
                "tile ({}, {}): non-finite height at ({}, {})",
                coord.cx, coord.cz, x, z
            ),
            TileBuildError::Generator {
                coord,
                generator,
                reason,
            } => write!(
                f,
                "tile ({}, {}): decoration generator '{}' failed: {}",
                coord.cx, coord.cz, generator, reason
            ),
        }
    }
}

impl Error for TileBuildError {}
