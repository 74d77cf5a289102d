use rand::*;

/// What a click on a tile did to the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Click {
    Selected(usize),
    Deselected(usize),
    Swapped(usize, usize),
    Ignored,
}

/// Transpositions applied by a shuffle, in the order they were applied.
/// Undoing them in reverse order restores the origin.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShuffleLog {
    pub swaps: Vec<(usize, usize)>,
}

/// A tile-swap board. `tiles` is the working sequence; `origin` is the
/// sliced order captured at creation and never changes afterwards.
/// `tiles` is always a permutation of `origin`.
pub struct Board<T> {
    tiles: Vec<T>,
    origin: Vec<T>,
    selected: Option<usize>,
    moves: u32,
    completed: bool,
}

impl<T: Clone + PartialEq> Board<T> {
    /// Board in solved order. `completed` still starts false: it is only
    /// recomputed after a swap.
    pub fn new(origin: Vec<T>) -> Board<T> {
        Board {
            tiles: origin.clone(),
            origin,
            selected: None,
            moves: 0,
            completed: false,
        }
    }

    pub fn new_shuffle(origin: Vec<T>, rng: &mut impl Rng) -> (Board<T>, ShuffleLog) {
        let mut board = Board::new(origin);
        let log = board.shuffle(rng);
        (board, log)
    }

    // Fisher–Yates. Self-swaps are not recorded.
    fn shuffle(&mut self, rng: &mut impl Rng) -> ShuffleLog {
        let mut log = ShuffleLog::default();
        for i in (1..self.tiles.len()).rev() {
            let j = rng.gen_range(0..=i);
            if i != j {
                self.tiles.swap(i, j);
                log.swaps.push((i, j));
            }
        }
        log
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[T] {
        &self.tiles
    }

    pub fn origin(&self) -> &[T] {
        &self.origin
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Apply a click on tile `index`. Once the board is completed every
    /// click is ignored.
    pub fn click(&mut self, index: usize) -> Click {
        if self.completed || index >= self.tiles.len() {
            return Click::Ignored;
        }
        match self.selected {
            None => {
                self.selected = Some(index);
                Click::Selected(index)
            }
            Some(selected) if selected == index => {
                self.selected = None;
                Click::Deselected(index)
            }
            Some(selected) => {
                self.selected = None;
                self.swap(selected, index);
                Click::Swapped(selected, index)
            }
        }
    }

    // Swap two tiles as one move and refresh the completion flag
    fn swap(&mut self, a: usize, b: usize) {
        self.tiles.swap(a, b);
        self.moves += 1;
        self.completed = self.tiles == self.origin;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn seeded(origin: Vec<u32>, seed: u64) -> (Board<u32>, ShuffleLog) {
        Board::new_shuffle(origin, &mut StdRng::seed_from_u64(seed))
    }

    #[test]
    fn first_click_selects_without_counting() {
        let mut board = Board::new((0..25).collect::<Vec<u32>>());
        assert_eq!(board.click(3), Click::Selected(3));
        assert_eq!(board.selected(), Some(3));
        assert_eq!(board.moves(), 0);
    }

    #[test]
    fn second_click_on_other_tile_swaps() {
        let mut board = Board::new(vec![10, 20, 30]);
        board.click(0);
        assert_eq!(board.click(2), Click::Swapped(0, 2));
        assert_eq!(board.tiles(), &[30, 20, 10]);
        assert_eq!(board.selected(), None);
        assert_eq!(board.moves(), 1);
        assert!(!board.is_completed());
    }

    #[test]
    fn out_of_range_click_is_ignored() {
        let mut board = Board::new(vec![1, 2]);
        assert_eq!(board.click(2), Click::Ignored);
        assert_eq!(board.selected(), None);
    }

    #[test]
    fn undoing_shuffle_log_completes_board() {
        let (mut board, log) = seeded((0..25).collect(), 7);
        assert!(!log.swaps.is_empty());
        assert_ne!(board.tiles(), board.origin());

        for &(i, j) in log.swaps.iter().rev() {
            assert!(!board.is_completed());
            board.click(i);
            assert_eq!(board.click(j), Click::Swapped(i, j));
        }
        assert!(board.is_completed());
        assert_eq!(board.tiles(), board.origin());
        assert_eq!(board.moves(), log.swaps.len() as u32);
    }

    #[test]
    fn completed_board_ignores_clicks() {
        let mut board = Board::new(vec![1, 2, 3]);
        board.click(0);
        board.click(1);
        board.click(0);
        board.click(1);
        assert!(board.is_completed());
        assert_eq!(board.click(2), Click::Ignored);
        assert_eq!(board.selected(), None);
        assert_eq!(board.moves(), 2);
    }

    proptest! {
        #[test]
        fn shuffle_is_permutation_of_origin(len in 0usize..64, seed in any::<u64>()) {
            let (board, _) = seeded((0..len as u32).collect(), seed);
            let mut sorted = board.tiles().to_vec();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, board.origin().to_vec());
        }

        #[test]
        fn completed_iff_tiles_equal_origin(
            len in 2usize..36,
            seed in any::<u64>(),
            clicks in prop::collection::vec(any::<prop::sample::Index>(), 0..80),
        ) {
            let (mut board, _) = seeded((0..len as u32).collect(), seed);
            for click in clicks {
                let before = board.is_completed();
                let outcome = board.click(click.index(len));
                if let Click::Swapped(..) = outcome {
                    prop_assert_eq!(board.is_completed(), board.tiles() == board.origin());
                }
                if before {
                    prop_assert_eq!(outcome, Click::Ignored);
                }
            }
        }

        #[test]
        fn double_swap_is_involution(
            len in 2usize..36,
            seed in any::<u64>(),
            a in any::<prop::sample::Index>(),
            b in any::<prop::sample::Index>(),
        ) {
            let (i, j) = (a.index(len), b.index(len));
            prop_assume!(i != j);
            let (mut board, _) = seeded((0..len as u32).collect(), seed);
            let before = board.tiles().to_vec();

            board.click(i);
            board.click(j);
            // The first swap may solve the board, after which clicks are inert.
            prop_assume!(!board.is_completed());
            board.click(i);
            board.click(j);

            prop_assert_eq!(board.tiles(), &before[..]);
            prop_assert_eq!(board.moves(), 2);
        }

        #[test]
        fn select_then_deselect_changes_nothing(
            len in 1usize..36,
            seed in any::<u64>(),
            a in any::<prop::sample::Index>(),
        ) {
            let i = a.index(len);
            let (mut board, _) = seeded((0..len as u32).collect(), seed);
            let before = board.tiles().to_vec();
            prop_assert_eq!(board.click(i), Click::Selected(i));
            prop_assert_eq!(board.click(i), Click::Deselected(i));
            prop_assert_eq!(board.tiles(), &before[..]);
            prop_assert_eq!(board.moves(), 0);
            prop_assert!(!board.is_completed());
            prop_assert_eq!(board.selected(), None);
        }
    }
}
