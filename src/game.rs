use log::*;
use rand::*;

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::input::InputEvent;
use crate::menu::MenuScreen;
use crate::name_entry::NameEntryScreen;
use crate::player::PlayerName;
use crate::puzzle::PuzzleScreen;
use crate::screen::*;
use crate::splash::SplashScreen;
use crate::surface::{Sprite, Surface};

/// The screen currently running, with whatever state it owns.
pub enum ActiveScreen {
    Splash(SplashScreen),
    Menu(MenuScreen),
    NameEntry(NameEntryScreen),
    Puzzle(PuzzleScreen),
}

impl ActiveScreen {
    fn screen_mut(&mut self) -> &mut dyn Screen {
        match self {
            ActiveScreen::Splash(screen) => screen,
            ActiveScreen::Menu(screen) => screen,
            ActiveScreen::NameEntry(screen) => screen,
            ActiveScreen::Puzzle(screen) => screen,
        }
    }

    fn screen(&self) -> &dyn Screen {
        match self {
            ActiveScreen::Splash(screen) => screen,
            ActiveScreen::Menu(screen) => screen,
            ActiveScreen::NameEntry(screen) => screen,
            ActiveScreen::Puzzle(screen) => screen,
        }
    }

    pub fn id(&self) -> ScreenId {
        self.screen().id()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Terminated,
}

/// Drives the screen state machine one iteration at a time.
pub struct Game<R> {
    config: Config,
    app: AppState,
    screen: ActiveScreen,
    rng: R,
}

impl<R: Rng> Game<R> {
    pub fn new(config: Config, background: Sprite, rng: R) -> Game<R> {
        let app = AppState {
            player_name: PlayerName::new(config.name_limit),
            background,
        };
        Game {
            config,
            app,
            screen: ActiveScreen::Splash(SplashScreen),
            rng,
        }
    }

    pub fn screen(&self) -> &ActiveScreen {
        &self.screen
    }

    pub fn app(&self) -> &AppState {
        &self.app
    }

    /// Run one iteration with the events polled for it.
    pub fn frame(
        &mut self,
        events: &[InputEvent],
        surface: &mut dyn Surface,
        clock: &mut dyn Clock,
    ) -> Result<Status> {
        let id = self.screen.id();
        if id.observes_quit() && events.contains(&InputEvent::Quit) {
            info!("Quit requested on {id:?}");
            return Ok(Status::Terminated);
        }

        let mut frame = Frame {
            events,
            surface: &mut *surface,
            clock,
            app: &mut self.app,
            config: &self.config,
        };
        let flow = self.screen.screen_mut().step(&mut frame)?;
        self.follow(id, flow, surface)
    }

    // Act on what the screen `id` asked for at the end of its step
    fn follow(&mut self, id: ScreenId, flow: Flow, surface: &mut dyn Surface) -> Result<Status> {
        match flow {
            Flow::Stay => Ok(Status::Running),
            Flow::Terminate if id.can_terminate() => {
                info!("Exit chosen on {id:?}");
                Ok(Status::Terminated)
            }
            Flow::Terminate => Err(GameError::illegal(id, "terminate")),
            Flow::Goto(next) => {
                self.switch(next, surface)?;
                Ok(Status::Running)
            }
        }
    }

    // Build the next screen first, so a failed puzzle setup leaves the
    // current screen in place.
    fn switch(&mut self, next: ScreenId, surface: &mut dyn Surface) -> Result<()> {
        let from = self.screen.id();
        if !from.successors().contains(&next) {
            return Err(GameError::illegal(from, format!("{next:?}")));
        }
        let screen = match next {
            ScreenId::Splash => ActiveScreen::Splash(SplashScreen),
            ScreenId::Menu => ActiveScreen::Menu(MenuScreen),
            ScreenId::NameEntry => ActiveScreen::NameEntry(NameEntryScreen),
            ScreenId::Puzzle => ActiveScreen::Puzzle(PuzzleScreen::enter(
                &self.config,
                surface,
                &mut self.rng,
            )?),
        };
        if let ActiveScreen::Puzzle(puzzle) = std::mem::replace(&mut self.screen, screen) {
            puzzle.leave(surface);
        }
        info!("Screen {from:?} -> {next:?}");
        Ok(())
    }
}
