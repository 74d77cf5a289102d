use image::RgbaImage;
use log::*;
use std::path::{Path, PathBuf};

use crate::error::{GameError, Result};

/// Which typeface the text renderer should use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FontChoice {
    Custom {
        path: PathBuf,
        family: String,
        data: Vec<u8>,
    },
    System,
}

// sfnt version tags of TrueType, OpenType/CFF and font collections
const FONT_MAGIC: [&[u8; 4]; 4] = [b"\x00\x01\x00\x00", b"OTTO", b"true", b"ttcf"];

fn is_font_data(data: &[u8]) -> bool {
    data.len() >= 4 && FONT_MAGIC.iter().any(|magic| data[..4] == magic[..])
}

pub fn load_font(path: &Path, family: &str) -> Result<FontChoice> {
    let data = std::fs::read(path).map_err(|source| GameError::Io {
        path: path.to_owned(),
        source,
    })?;
    if !is_font_data(&data) {
        return Err(GameError::Font {
            path: path.to_owned(),
            reason: "not a TrueType or OpenType file".to_owned(),
        });
    }
    Ok(FontChoice::Custom {
        path: path.to_owned(),
        family: family.to_owned(),
        data,
    })
}

/// Use the configured font if it loaded, the system sans-serif otherwise.
pub fn font_or_fallback(loaded: Result<FontChoice>) -> FontChoice {
    match loaded {
        Ok(choice) => choice,
        Err(error) => {
            warn!("{error}; falling back to the system font");
            FontChoice::System
        }
    }
}

/// Menu backdrop. Unlike fonts and music there is no fallback for it.
pub fn load_background(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|source| GameError::Image {
        path: path.to_owned(),
        source,
    })?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn truetype_header_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"\x00\x01\x00\x00rest-of-font").unwrap();
        let choice = font_or_fallback(load_font(&path, "Custom"));
        assert!(matches!(choice, FontChoice::Custom { family, .. } if family == "Custom"));
    }

    #[test]
    fn missing_font_falls_back_to_system() {
        let dir = tempdir().unwrap();
        let loaded = load_font(&dir.path().join("absent.ttf"), "Custom");
        assert!(matches!(loaded, Err(GameError::Io { .. })));
        assert_eq!(font_or_fallback(loaded), FontChoice::System);
    }

    #[test]
    fn garbage_font_falls_back_to_system() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("font.ttf");
        std::fs::write(&path, b"<html>").unwrap();
        let loaded = load_font(&path, "Custom");
        assert!(matches!(loaded, Err(GameError::Font { .. })));
        assert_eq!(font_or_fallback(loaded), FontChoice::System);
    }

    #[test]
    fn missing_background_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_background(&dir.path().join("menu_background.jpg")).is_err());
    }
}
