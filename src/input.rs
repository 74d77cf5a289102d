use glam::*;

use crate::surface::PixelRect;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Other,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

/// Platform-neutral input, in the order the window system delivered it.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerDown { pos: Vec2, button: PointerButton },
    KeyDown { key: Key, text: Option<String> },
}

impl InputEvent {
    pub fn key(key: Key) -> InputEvent {
        InputEvent::KeyDown { key, text: None }
    }

    pub fn typed(text: &str) -> InputEvent {
        InputEvent::KeyDown {
            key: Key::Other,
            text: Some(text.to_owned()),
        }
    }

    pub fn click(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerDown {
            pos: vec2(x, y),
            button: PointerButton::Primary,
        }
    }
}

/// Where each tile slot of a puzzle sits on the canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TileLayout {
    pub cols: u32,
    pub rows: u32,
    pub tile: UVec2,
    pub margin: u32,
}

impl TileLayout {
    pub fn len(&self) -> usize {
        (self.cols * self.rows) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canvas rectangle of slot `index`, counted row-major.
    pub fn slot(&self, index: usize) -> PixelRect {
        let index = index as u32;
        let cell = uvec2(index % self.cols, index / self.cols);
        let pos = cell * (self.tile + UVec2::splat(self.margin)) + UVec2::splat(self.margin);
        PixelRect {
            pos: pos.as_ivec2(),
            size: self.tile,
        }
    }

    /// Slot under `pos`. Slot bounds are inclusive on every edge; the first
    /// matching slot wins.
    pub fn hit_test(&self, pos: Vec2) -> Option<usize> {
        (0..self.len()).find(|&i| self.slot(i).contains_inclusive(pos))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PuzzleAction {
    Pick(usize),
    Back,
}

/// Map one event to a puzzle action. Clicks only count with the primary
/// button, on a slot, while the puzzle is unsolved.
pub fn puzzle_action(event: &InputEvent, layout: &TileLayout, completed: bool) -> Option<PuzzleAction> {
    match event {
        InputEvent::KeyDown {
            key: Key::Escape, ..
        } => Some(PuzzleAction::Back),
        InputEvent::PointerDown {
            pos,
            button: PointerButton::Primary,
        } if !completed => layout.hit_test(*pos).map(PuzzleAction::Pick),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameEdit {
    Type(String),
    Erase,
    Done,
}

pub fn name_edit(event: &InputEvent) -> Option<NameEdit> {
    let InputEvent::KeyDown { key, text } = event else {
        return None;
    };
    match key {
        Key::Enter | Key::Escape => Some(NameEdit::Done),
        Key::Backspace => Some(NameEdit::Erase),
        Key::Other => text.clone().map(NameEdit::Type),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Play,
    PlayerName,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 3] = [MenuItem::Play, MenuItem::PlayerName, MenuItem::Exit];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Play => "Play",
            MenuItem::PlayerName => "Player name",
            MenuItem::Exit => "Exit",
        }
    }

    pub fn rect(self) -> PixelRect {
        let top = match self {
            MenuItem::Play => 300,
            MenuItem::PlayerName => 400,
            MenuItem::Exit => 500,
        };
        PixelRect::new(350, top, 300, 60)
    }
}

/// Menu item under a pointer press, with any mouse button.
pub fn menu_item(event: &InputEvent) -> Option<MenuItem> {
    let InputEvent::PointerDown { pos, .. } = event else {
        return None;
    };
    MenuItem::ALL
        .into_iter()
        .find(|item| item.rect().contains(*pos))
}
