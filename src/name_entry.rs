use glam::*;
use log::*;

use crate::error::Result;
use crate::input::*;
use crate::screen::*;
use crate::surface::{Font, PixelRect, Rgb, TextAnchor};

const FILL_COLOR: Rgb = Rgb(50, 50, 50);
const INPUT_COLOR: Rgb = Rgb(141, 182, 205); // lightskyblue3
const PROMPT: &str = "Enter player name:";
const INPUT_BOX_MIN_WIDTH: u32 = 400;

pub struct NameEntryScreen;

impl NameEntryScreen {
    fn draw(&self, frame: &mut Frame<'_>) -> Result<()> {
        let name = frame.app.player_name.as_str();
        let text_width = frame.surface.measure_text(name, Font::Body).ceil() as u32;
        let input_box = PixelRect::new(300, 350, INPUT_BOX_MIN_WIDTH.max(text_width + 10), 60);

        frame.surface.clear(FILL_COLOR);
        frame.surface.text(
            PROMPT,
            Font::Title,
            Rgb::WHITE,
            TextAnchor::TopLeft(ivec2(300, 250)),
        );
        frame.surface.text(
            name,
            Font::Body,
            INPUT_COLOR,
            TextAnchor::TopLeft(input_box.pos + ivec2(5, 15)),
        );
        frame.surface.outline(INPUT_COLOR, input_box, 2);
        frame.surface.present()
    }
}

impl Screen for NameEntryScreen {
    fn id(&self) -> ScreenId {
        ScreenId::NameEntry
    }

    fn step(&mut self, frame: &mut Frame<'_>) -> Result<Flow> {
        for edit in frame.events.iter().filter_map(name_edit) {
            let name = &mut frame.app.player_name;
            match edit {
                NameEdit::Type(text) => name.push_str(&text),
                NameEdit::Erase => {
                    name.pop();
                }
                NameEdit::Done => {
                    info!("Player name set to {:?}", name.as_str());
                    return Ok(Flow::Goto(ScreenId::Menu));
                }
            }
        }
        self.draw(frame)?;
        Ok(Flow::Stay)
    }
}
