use std::path::PathBuf;

use thiserror::Error;

use crate::screen::ScreenId;

pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("cannot read picture directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no puzzle pictures (png, jpg, jpeg) found in {dir}")]
    NoAssetsFound { dir: PathBuf },

    #[error("cannot decode image {path}: {source}")]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("picture {path} ({width}x{height}) is too small to slice")]
    PictureTooSmall {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("cannot load font {path}: {reason}")]
    Font { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("audio error: {0}")]
    Audio(String),

    #[error("illegal screen transition: {from:?} -> {to}")]
    IllegalTransition { from: ScreenId, to: String },

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("window error: {0}")]
    Window(String),
}

impl GameError {
    pub fn illegal(from: ScreenId, to: impl Into<String>) -> Self {
        Self::IllegalTransition {
            from,
            to: to.into(),
        }
    }

    /// Errors that can only come from entering the puzzle screen.
    pub fn is_puzzle_setup(&self) -> bool {
        matches!(
            self,
            Self::ReadDir { .. }
                | Self::NoAssetsFound { .. }
                | Self::Image { .. }
                | Self::PictureTooSmall { .. }
        )
    }
}
