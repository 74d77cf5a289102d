use glam::*;
use log::*;

use crate::error::Result;
use crate::input::*;
use crate::screen::*;
use crate::surface::{Font, PixelRect, Rgb, TextAnchor};

/// Main menu: the background picture stretched over the canvas and three
/// text buttons.
pub struct MenuScreen;

impl MenuScreen {
    fn draw(&self, frame: &mut Frame<'_>) -> Result<()> {
        let background = frame.app.background;
        let canvas = PixelRect {
            pos: IVec2::ZERO,
            size: frame.surface.size(),
        };
        frame
            .surface
            .blit(background.picture, background.bounds(), canvas);
        for item in MenuItem::ALL {
            frame.surface.text(
                item.label(),
                Font::Body,
                Rgb::WHITE,
                TextAnchor::Center(item.rect().center()),
            );
        }
        frame.surface.present()
    }
}

impl Screen for MenuScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Menu
    }

    fn step(&mut self, frame: &mut Frame<'_>) -> Result<Flow> {
        if let Some(item) = frame.events.iter().find_map(menu_item) {
            info!("Menu: {}", item.label());
            return Ok(match item {
                MenuItem::Play => Flow::Goto(ScreenId::Puzzle),
                MenuItem::PlayerName => Flow::Goto(ScreenId::NameEntry),
                MenuItem::Exit => Flow::Terminate,
            });
        }
        self.draw(frame)?;
        Ok(Flow::Stay)
    }
}
