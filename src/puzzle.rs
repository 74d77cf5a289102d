use glam::*;
use log::*;
use rand::*;

use crate::board::*;
use crate::config::Config;
use crate::error::Result;
use crate::input::*;
use crate::picture::*;
use crate::screen::*;
use crate::surface::{Font, PictureId, Rgb, Surface, TextAnchor};

const SELECT_THICKNESS: u32 = 3;
const SOLVED: &str = "Puzzle solved!";

/// The tile-swap game itself. Built fresh every time the screen is
/// entered and dropped when it is left.
pub struct PuzzleScreen {
    board: Board<Fragment>,
    shuffle: ShuffleLog,
    layout: TileLayout,
    picture: PictureId,
}

impl PuzzleScreen {
    /// Pick, slice and shuffle a new picture. Fails before anything is
    /// drawn if there is no usable picture.
    pub fn enter(
        config: &Config,
        surface: &mut dyn Surface,
        rng: &mut impl Rng,
    ) -> Result<PuzzleScreen> {
        let path = choose_picture(&config.picture_dir, rng)?;
        let picture = load_picture(&path)?;
        let tile = picture.tile_size(config.rows, config.cols)?;
        let fragments = picture.slice(config.rows, config.cols)?;
        let (board, shuffle) = Board::new_shuffle(fragments, rng);
        let picture_id = surface.load_picture(&picture.image)?;

        info!(
            "New puzzle from {}: {}x{} tiles of {}x{} px",
            path.display(),
            config.cols,
            config.rows,
            tile.x,
            tile.y
        );

        Ok(PuzzleScreen {
            board,
            shuffle,
            layout: TileLayout {
                cols: config.cols,
                rows: config.rows,
                tile,
                margin: config.tile_margin,
            },
            picture: picture_id,
        })
    }

    /// Give the picture back to the surface.
    pub fn leave(self, surface: &mut dyn Surface) {
        surface.release_picture(self.picture);
    }

    pub fn board(&self) -> &Board<Fragment> {
        &self.board
    }

    pub fn layout(&self) -> &TileLayout {
        &self.layout
    }

    pub fn shuffle_log(&self) -> &ShuffleLog {
        &self.shuffle
    }

    fn pick(&mut self, index: usize) {
        match self.board.click(index) {
            Click::Swapped(a, b) => {
                debug!("Swapped tiles {a} and {b}, {} moves", self.board.moves());
                if self.board.is_completed() {
                    info!("Puzzle solved in {} moves", self.board.moves());
                }
            }
            Click::Selected(i) => debug!("Selected tile {i}"),
            Click::Deselected(i) => debug!("Deselected tile {i}"),
            Click::Ignored => (),
        }
    }

    fn draw(&self, frame: &mut Frame<'_>) -> Result<()> {
        let canvas = frame.surface.size().as_ivec2();
        frame.surface.clear(BACKGROUND_COLOR);

        for (i, fragment) in self.board.tiles().iter().enumerate() {
            let slot = self.layout.slot(i);
            frame.surface.blit(self.picture, fragment.rect, slot);
            if Some(i) == self.board.selected() {
                frame
                    .surface
                    .outline(Rgb::GREEN, slot.inflate(2), SELECT_THICKNESS);
            }
        }

        let name = format!("Player: {}", frame.app.player_name);
        let moves = format!("Moves: {}", self.board.moves());
        frame.surface.text(
            &name,
            Font::Body,
            Rgb::WHITE,
            TextAnchor::TopLeft(ivec2(20, canvas.y - 80)),
        );
        frame.surface.text(
            &moves,
            Font::Body,
            Rgb::WHITE,
            TextAnchor::TopLeft(ivec2(20, canvas.y - 50)),
        );
        if self.board.is_completed() {
            frame.surface.text(
                SOLVED,
                Font::Body,
                Rgb::GREEN,
                TextAnchor::TopLeft(ivec2(canvas.x / 2 - 80, canvas.y - 60)),
            );
        }

        frame.surface.present()
    }
}

impl Screen for PuzzleScreen {
    fn id(&self) -> ScreenId {
        ScreenId::Puzzle
    }

    fn step(&mut self, frame: &mut Frame<'_>) -> Result<Flow> {
        for event in frame.events {
            match puzzle_action(event, &self.layout, self.board.is_completed()) {
                Some(PuzzleAction::Back) => return Ok(Flow::Goto(ScreenId::Menu)),
                Some(PuzzleAction::Pick(index)) => self.pick(index),
                None => (),
            }
        }
        self.draw(frame)?;
        Ok(Flow::Stay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::screen::testing::Harness;
    use crate::surface::testing::{Op, RecordingSurface};
    use crate::surface::PixelRect;
    use image::RgbaImage;
    use rand::{rngs::StdRng, SeedableRng};
    use tempfile::{tempdir, TempDir};

    fn picture_dir(width: u32, height: u32) -> TempDir {
        let dir = tempdir().unwrap();
        RgbaImage::from_fn(width, height, |x, y| image::Rgba([x as u8, y as u8, 0, 255]))
            .save(dir.path().join("only.png"))
            .unwrap();
        dir
    }

    fn enter(dir: &TempDir, harness: &mut Harness, seed: u64) -> PuzzleScreen {
        harness.config.picture_dir = dir.path().to_owned();
        PuzzleScreen::enter(
            &harness.config,
            &mut harness.surface,
            &mut StdRng::seed_from_u64(seed),
        )
        .unwrap()
    }

    fn click_slot(puzzle: &PuzzleScreen, index: usize) -> InputEvent {
        let center = puzzle.layout().slot(index).center().as_vec2();
        InputEvent::click(center.x, center.y)
    }

    #[test]
    fn empty_directory_fails_before_drawing() {
        let dir = tempdir().unwrap();
        let config = Config {
            picture_dir: dir.path().to_owned(),
            ..Config::default()
        };
        let mut surface = RecordingSurface::default();
        let result = PuzzleScreen::enter(&config, &mut surface, &mut StdRng::seed_from_u64(0));
        assert!(matches!(result, Err(GameError::NoAssetsFound { .. })));
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn square_picture_gives_hundred_pixel_tiles() {
        let dir = picture_dir(500, 500);
        let mut harness = Harness::new(Config::default());
        let puzzle = enter(&dir, &mut harness, 3);

        assert_eq!(harness.surface.ops, [Op::Load(PictureId(0), uvec2(500, 500))]);
        assert_eq!(puzzle.layout().tile, uvec2(100, 100));
        assert_eq!(puzzle.board().len(), 25);
        assert!(puzzle
            .board()
            .origin()
            .iter()
            .all(|f| f.rect.size == uvec2(100, 100)));
        assert_ne!(puzzle.board().tiles(), puzzle.board().origin());
        assert!(!puzzle.board().is_completed());
    }

    #[test]
    fn undoing_the_shuffle_solves_the_puzzle() {
        let dir = picture_dir(500, 500);
        let mut harness = Harness::new(Config::default());
        let mut puzzle = enter(&dir, &mut harness, 11);

        let mut events = vec![];
        for &(i, j) in puzzle.shuffle_log().swaps.iter().rev() {
            events.push(click_slot(&puzzle, i));
            events.push(click_slot(&puzzle, j));
        }
        let swaps = puzzle.shuffle_log().swaps.len() as u32;
        assert!(swaps > 0);

        assert_eq!(harness.step(&mut puzzle, &events).unwrap(), Flow::Stay);
        assert!(puzzle.board().is_completed());
        assert_eq!(puzzle.board().moves(), swaps);
        let texts = harness.surface.texts();
        assert!(texts.contains(&SOLVED));
        assert!(texts.contains(&format!("Moves: {swaps}").as_str()));

        // Solved puzzles ignore further clicks
        let before = puzzle.board().tiles().to_vec();
        let clicks = [click_slot(&puzzle, 0), click_slot(&puzzle, 1)];
        harness.step(&mut puzzle, &clicks).unwrap();
        assert_eq!(puzzle.board().tiles(), &before[..]);
        assert_eq!(puzzle.board().selected(), None);
    }

    #[test]
    fn selection_is_highlighted() {
        let dir = picture_dir(250, 250);
        let mut harness = Harness::new(Config::default());
        let mut puzzle = enter(&dir, &mut harness, 5);
        harness.app.player_name.push_str("Ann");

        let events = [click_slot(&puzzle, 6)];
        harness.step(&mut puzzle, &events).unwrap();

        assert_eq!(puzzle.board().selected(), Some(6));
        assert_eq!(
            harness.surface.outlines(),
            [(Rgb::GREEN, PixelRect::new(52, 52, 54, 54), 3)]
        );
        let blits = harness.surface.blits();
        assert_eq!(blits.len(), 25);
        assert_eq!(blits[0].1, PixelRect::new(2, 2, 50, 50));
        assert_eq!(blits[0].0, puzzle.board().tiles()[0].rect);
        assert_eq!(
            harness.surface.texts(),
            ["Player: Ann", "Moves: 0"]
        );
    }

    #[test]
    fn secondary_button_and_margins_are_ignored() {
        let dir = picture_dir(500, 500);
        let mut harness = Harness::new(Config::default());
        let mut puzzle = enter(&dir, &mut harness, 8);
        let events = [
            InputEvent::PointerDown {
                pos: vec2(50.0, 50.0),
                button: PointerButton::Secondary,
            },
            InputEvent::click(103.0, 50.0),
            InputEvent::click(900.0, 50.0),
        ];
        harness.step(&mut puzzle, &events).unwrap();
        assert_eq!(puzzle.board().selected(), None);
        assert_eq!(puzzle.board().moves(), 0);
    }

    #[test]
    fn escape_goes_back_and_releases_picture() {
        let dir = picture_dir(500, 500);
        let mut harness = Harness::new(Config::default());
        let mut puzzle = enter(&dir, &mut harness, 2);
        let events = [InputEvent::key(Key::Escape), click_slot(&puzzle, 0)];
        assert_eq!(
            harness.step(&mut puzzle, &events).unwrap(),
            Flow::Goto(ScreenId::Menu)
        );
        assert_eq!(puzzle.board().selected(), None);
        puzzle.leave(&mut harness.surface);
        assert_eq!(harness.surface.ops.last(), Some(&Op::Release(PictureId(0))));
    }
}
