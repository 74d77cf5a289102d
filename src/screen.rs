use crate::clock::Clock;
use crate::config::Config;
use crate::error::Result;
use crate::input::InputEvent;
use crate::player::PlayerName;
use crate::surface::{Rgb, Sprite, Surface};

pub const BACKGROUND_COLOR: Rgb = Rgb(30, 30, 30);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScreenId {
    Splash,
    Menu,
    NameEntry,
    Puzzle,
}

impl ScreenId {
    pub const ALL: [ScreenId; 4] = [
        ScreenId::Splash,
        ScreenId::Menu,
        ScreenId::NameEntry,
        ScreenId::Puzzle,
    ];

    /// Screens this one may hand over to.
    pub fn successors(self) -> &'static [ScreenId] {
        match self {
            ScreenId::Splash => &[ScreenId::Menu],
            ScreenId::Menu => &[ScreenId::Puzzle, ScreenId::NameEntry],
            ScreenId::NameEntry => &[ScreenId::Menu],
            ScreenId::Puzzle => &[ScreenId::Menu],
        }
    }

    /// Whether the screen itself can end the process (the menu's "Exit").
    pub fn can_terminate(self) -> bool {
        self == ScreenId::Menu
    }

    /// Whether a quit event polled while this screen runs ends the process.
    /// The splash screen blocks without looking at events.
    pub fn observes_quit(self) -> bool {
        self != ScreenId::Splash
    }
}

/// What a screen wants after one step.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Stay,
    Goto(ScreenId),
    Terminate,
}

/// State that outlives every screen.
pub struct AppState {
    pub player_name: PlayerName,
    pub background: Sprite,
}

/// Everything a screen step gets to work with for one iteration.
pub struct Frame<'a> {
    pub events: &'a [InputEvent],
    pub surface: &'a mut dyn Surface,
    pub clock: &'a mut dyn Clock,
    pub app: &'a mut AppState,
    pub config: &'a Config,
}

pub trait Screen {
    fn id(&self) -> ScreenId;

    /// Consume this iteration's events, update state and draw one frame.
    fn step(&mut self, frame: &mut Frame<'_>) -> Result<Flow>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_is_exact() {
        let mut pairs = vec![];
        for from in ScreenId::ALL {
            for &to in from.successors() {
                pairs.push((from, to));
            }
        }
        assert_eq!(
            pairs,
            [
                (ScreenId::Splash, ScreenId::Menu),
                (ScreenId::Menu, ScreenId::Puzzle),
                (ScreenId::Menu, ScreenId::NameEntry),
                (ScreenId::NameEntry, ScreenId::Menu),
                (ScreenId::Puzzle, ScreenId::Menu),
            ]
        );
    }

    #[test]
    fn every_screen_has_an_exit() {
        for id in ScreenId::ALL {
            assert!(!id.successors().is_empty() || id.can_terminate());
            assert!(!id.successors().contains(&id));
        }
        assert!(ScreenId::Menu.can_terminate());
        assert!(!ScreenId::Puzzle.can_terminate());
    }

    #[test]
    fn only_splash_ignores_quit() {
        let observing: Vec<_> = ScreenId::ALL
            .into_iter()
            .filter(|id| id.observes_quit())
            .collect();
        assert_eq!(
            observing,
            [ScreenId::Menu, ScreenId::NameEntry, ScreenId::Puzzle]
        );
    }
}
