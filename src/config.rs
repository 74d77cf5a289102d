use glam::*;
use std::path::PathBuf;
use std::time::Duration;

/// Every tunable of the game. There is no config file; `Config::default()`
/// is what the binary runs with.
#[derive(Clone, Debug)]
pub struct Config {
    pub title: String,
    pub canvas: UVec2,
    pub fps: u32,
    pub splash_delay: Duration,

    pub rows: u32,
    pub cols: u32,
    pub tile_margin: u32,
    pub name_limit: usize,

    pub picture_dir: PathBuf,
    pub font_path: PathBuf,
    pub font_family: String,
    pub title_font_px: f32,
    pub body_font_px: f32,
    pub background_path: PathBuf,
    pub music_path: PathBuf,
    pub music_volume: f32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "Swap Puzzle".to_owned(),
            canvas: uvec2(1000, 800),
            fps: 60,
            splash_delay: Duration::from_millis(2000),

            rows: 5,
            cols: 5,
            tile_margin: 2,
            name_limit: 15,

            picture_dir: PathBuf::from("picture"),
            font_path: PathBuf::from("fonts/TeletactileRus.ttf"),
            font_family: "Teletactile Rus".to_owned(),
            title_font_px: 48.0,
            body_font_px: 32.0,
            background_path: PathBuf::from("assets/menu_background.jpg"),
            music_path: PathBuf::from("assets/scary_music.mp3"),
            music_volume: 0.5,
        }
    }
}
