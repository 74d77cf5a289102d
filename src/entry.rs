use glam::*;
use log::*;
use rand::{rngs::StdRng, SeedableRng};
use std::time::Duration;
use winit::{
    dpi::{PhysicalPosition, PhysicalSize},
    event::*,
    event_loop::EventLoop,
    keyboard::{Key as WinitKey, NamedKey},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::WindowBuilder,
};

use crate::audio::start_music;
use crate::clock::{Clock, FrameClock};
use crate::config::Config;
use crate::error::{GameError, Result};
use crate::game::{Game, Status};
use crate::input::{InputEvent, Key, PointerButton};
use crate::render::GpuSurface;
use crate::resources::{font_or_fallback, load_background, load_font, FontChoice};
use crate::surface::{Sprite, Surface};

pub fn map_key(key: &WinitKey) -> Key {
    match key {
        WinitKey::Named(NamedKey::Enter) => Key::Enter,
        WinitKey::Named(NamedKey::Escape) => Key::Escape,
        WinitKey::Named(NamedKey::Backspace) => Key::Backspace,
        _ => Key::Other,
    }
}

pub fn map_button(button: MouseButton) -> PointerButton {
    match button {
        MouseButton::Left => PointerButton::Primary,
        MouseButton::Right => PointerButton::Secondary,
        MouseButton::Middle => PointerButton::Middle,
        MouseButton::Back => PointerButton::Other(3),
        MouseButton::Forward => PointerButton::Other(4),
        MouseButton::Other(n) => PointerButton::Other(n),
    }
}

// Window pixels to canvas pixels, in case the window manager resized us
fn to_canvas(position: PhysicalPosition<f64>, window: PhysicalSize<u32>, canvas: UVec2) -> Vec2 {
    let window = uvec2(window.width.max(1), window.height.max(1)).as_vec2();
    vec2(position.x as f32, position.y as f32) * canvas.as_vec2() / window
}

/// Everything one pump of the window system produced.
#[derive(Default)]
struct Polled {
    events: Vec<InputEvent>,
    resized: Option<PhysicalSize<u32>>,
}

struct EventPump {
    event_loop: EventLoop<()>,
    cursor: Vec2,
    window_size: PhysicalSize<u32>,
    canvas: UVec2,
}

impl EventPump {
    // Drain pending window events without blocking
    fn poll(&mut self) -> Polled {
        let mut polled = Polled::default();
        let EventPump {
            event_loop,
            cursor,
            window_size,
            canvas,
        } = self;
        let status = event_loop.pump_events(Some(Duration::ZERO), |event, _target| {
            let Event::WindowEvent { event, .. } = event else {
                return;
            };
            match event {
                WindowEvent::CloseRequested => polled.events.push(InputEvent::Quit),
                WindowEvent::Resized(new_size) => {
                    *window_size = new_size;
                    polled.resized = Some(new_size);
                }
                WindowEvent::CursorMoved { position, .. } => {
                    *cursor = to_canvas(position, *window_size, *canvas);
                }
                WindowEvent::MouseInput {
                    state: ElementState::Pressed,
                    button,
                    ..
                } => polled.events.push(InputEvent::PointerDown {
                    pos: *cursor,
                    button: map_button(button),
                }),
                WindowEvent::Touch(Touch {
                    location,
                    phase: TouchPhase::Started,
                    ..
                }) => {
                    *cursor = to_canvas(location, *window_size, *canvas);
                    polled.events.push(InputEvent::PointerDown {
                        pos: *cursor,
                        button: PointerButton::Primary,
                    });
                }
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            logical_key,
                            text,
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => polled.events.push(InputEvent::KeyDown {
                    key: map_key(&logical_key),
                    text: text.map(|text| text.to_string()),
                }),
                _ => {}
            }
        });
        if let PumpStatus::Exit(code) = status {
            debug!("Event loop exited with {code}");
            polled.events.push(InputEvent::Quit);
        }
        polled
    }
}

/// Open the window and run the game until it terminates.
pub fn run(config: Config) -> Result<()> {
    let event_loop = EventLoop::new().map_err(|e| GameError::Window(e.to_string()))?;
    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.canvas.x, config.canvas.y))
        .with_resizable(false)
        .build(&event_loop)
        .map_err(|e| GameError::Window(e.to_string()))?;

    let mut surface = pollster::block_on(GpuSurface::new(
        &window,
        config.canvas,
        config.title_font_px,
        config.body_font_px,
    ))?;

    let font = font_or_fallback(load_font(&config.font_path, &config.font_family));
    if let Err(error) = surface.use_font(font) {
        warn!("{error}; falling back to the system font");
        surface.use_font(FontChoice::System)?;
    }

    let background = load_background(&config.background_path)?;
    let background = Sprite {
        size: uvec2(background.width(), background.height()),
        picture: surface.load_picture(&background)?,
    };

    let _music = start_music(&config.music_path, config.music_volume);

    let mut pump = EventPump {
        event_loop,
        cursor: Vec2::ZERO,
        window_size: window.inner_size(),
        canvas: config.canvas,
    };
    let mut clock = FrameClock::new();
    let fps = config.fps;
    let mut game = Game::new(config, background, StdRng::from_entropy());

    loop {
        let polled = pump.poll();
        if let Some(new_size) = polled.resized {
            surface.resized(new_size);
        }
        if game.frame(&polled.events, &mut surface, &mut clock)? == Status::Terminated {
            break;
        }
        clock.tick(fps);
    }
    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn only_three_keys_are_named() {
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Enter)), Key::Enter);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Escape)), Key::Escape);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Backspace)), Key::Backspace);
        assert_eq!(map_key(&WinitKey::Named(NamedKey::Space)), Key::Other);
        assert_eq!(map_key(&WinitKey::Character(SmolStr::new("a"))), Key::Other);
    }

    #[test]
    fn left_button_is_primary() {
        assert_eq!(map_button(MouseButton::Left), PointerButton::Primary);
        assert_eq!(map_button(MouseButton::Right), PointerButton::Secondary);
        assert_eq!(map_button(MouseButton::Other(7)), PointerButton::Other(7));
    }

    #[test]
    fn cursor_scales_with_window() {
        let canvas = uvec2(1000, 800);
        let same = to_canvas(
            PhysicalPosition::new(350.0, 300.0),
            PhysicalSize::new(1000, 800),
            canvas,
        );
        assert_eq!(same, vec2(350.0, 300.0));
        let doubled = to_canvas(
            PhysicalPosition::new(700.0, 600.0),
            PhysicalSize::new(2000, 1600),
            canvas,
        );
        assert_eq!(doubled, vec2(350.0, 300.0));
    }
}
