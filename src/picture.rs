use glam::*;
use image::RgbaImage;
use log::*;
use rand::seq::SliceRandom;
use rand::*;
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};
use crate::surface::PixelRect;

pub const PICTURE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// One grid cell of a sliced picture. Fragments compare by the cell they
/// were cut from, never by pixel content.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fragment {
    pub source: UVec2, // (column, row) in the sliced picture
    pub rect: PixelRect,
}

pub struct Picture {
    pub path: PathBuf,
    pub image: RgbaImage,
}

fn is_picture(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PICTURE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// All eligible pictures in `dir`, sorted by path.
pub fn list_pictures(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_dir_error = |source: std::io::Error| GameError::ReadDir {
        path: dir.to_owned(),
        source,
    };
    let mut pictures = vec![];
    for entry in std::fs::read_dir(dir).map_err(read_dir_error)? {
        let entry = entry.map_err(read_dir_error)?;
        let path = entry.path();
        if path.is_file() && is_picture(&path) {
            pictures.push(path);
        }
    }
    pictures.sort();
    Ok(pictures)
}

/// Pick one eligible picture uniformly at random.
pub fn choose_picture(dir: &Path, rng: &mut impl Rng) -> Result<PathBuf> {
    let pictures = list_pictures(dir)?;
    debug!("{} candidate pictures in {}", pictures.len(), dir.display());
    pictures
        .choose(rng)
        .cloned()
        .ok_or_else(|| GameError::NoAssetsFound {
            dir: dir.to_owned(),
        })
}

pub fn load_picture(path: &Path) -> Result<Picture> {
    let image = image::open(path)
        .map_err(|source| GameError::Image {
            path: path.to_owned(),
            source,
        })?
        .to_rgba8();
    info!(
        "Loaded picture {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(Picture {
        path: path.to_owned(),
        image,
    })
}

impl Picture {
    /// Tile size for a `rows` x `cols` grid. Remainder pixels on the right
    /// and bottom belong to no tile.
    pub fn tile_size(&self, rows: u32, cols: u32) -> Result<UVec2> {
        let (width, height) = self.image.dimensions();
        let tile = uvec2(width / cols.max(1), height / rows.max(1));
        if tile.x == 0 || tile.y == 0 {
            return Err(GameError::PictureTooSmall {
                path: self.path.clone(),
                width,
                height,
            });
        }
        Ok(tile)
    }

    /// Cut the picture into `rows` x `cols` fragments in row-major order.
    pub fn slice(&self, rows: u32, cols: u32) -> Result<Vec<Fragment>> {
        let tile = self.tile_size(rows, cols)?;
        Ok((0..rows)
            .flat_map(|y| (0..cols).map(move |x| uvec2(x, y)))
            .map(|source| Fragment {
                source,
                rect: PixelRect {
                    pos: (source * tile).as_ivec2(),
                    size: tile,
                },
            })
            .collect())
    }
}
