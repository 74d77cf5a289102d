use log::*;

use crate::error::Result;
use crate::screen::*;
use crate::surface::{Font, Rgb, TextAnchor};

const WELCOME: &str = "Welcome to the puzzle game!";

/// Title card shown once at startup.
pub struct SplashScreen;

impl Screen for SplashScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Splash
    }

    fn step(&mut self, frame: &mut Frame<'_>) -> Result<Flow> {
        let center = (frame.surface.size() / 2).as_ivec2();
        frame.surface.clear(BACKGROUND_COLOR);
        frame
            .surface
            .text(WELCOME, Font::Title, Rgb::WHITE, TextAnchor::Center(center));
        frame.surface.present()?;

        debug!("Holding splash for {:?}", frame.config.splash_delay);
        frame.clock.sleep(frame.config.splash_delay);
        Ok(Flow::Goto(ScreenId::Menu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::InputEvent;
    use crate::screen::testing::Harness;
    use crate::surface::testing::Op;
    use glam::*;
    use std::time::Duration;

    #[test]
    fn draws_once_waits_and_moves_to_menu() {
        let mut harness = Harness::new(Config::default());
        let flow = harness
            .step(&mut SplashScreen, &[InputEvent::Quit, InputEvent::click(1.0, 1.0)])
            .unwrap();
        assert_eq!(flow, Flow::Goto(ScreenId::Menu));
        assert_eq!(
            harness.surface.ops,
            [
                Op::Clear(BACKGROUND_COLOR),
                Op::Text(
                    WELCOME.to_owned(),
                    Font::Title,
                    Rgb::WHITE,
                    TextAnchor::Center(ivec2(500, 400))
                ),
                Op::Present,
            ]
        );
        assert_eq!(harness.clock.sleeps, [Duration::from_millis(2000)]);
    }
}
