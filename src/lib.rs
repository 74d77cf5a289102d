pub mod audio;
pub mod board;
pub mod clock;
pub mod config;
pub mod entry;
pub mod error;
pub mod game;
pub mod input;
pub mod menu;
pub mod name_entry;
pub mod picture;
pub mod player;
pub mod puzzle;
pub mod render;
pub mod resources;
pub mod screen;
pub mod splash;
pub mod surface;
