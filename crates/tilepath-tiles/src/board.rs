use std::fmt;
use std::str::FromStr;

use enumset::EnumSet;
use rand::seq::IteratorRandom;
use rand::Rng;
use tilepath_core::traits::{Direction, SlidingPuzzle};

use crate::ParseBoardError;

/// Largest supported board width; tiles must fit in a `u8`.
pub const MAX_WIDTH: usize = 16;

/// Square sliding-tile board. Tile `0` is the blank.
///
/// Tiles are stored row-major. Moves name the direction the blank travels.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    width: u8,
    blank: u8,
    tiles: Box<[u8]>,
}

/// Canonical key of a [`Board`]: its row-major tile sequence.
///
/// Displays as the comma separated textual form, e.g. `1,2,3,4,5,6,0,7,8`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct BoardKey(Box<[u8]>);

impl Board {
    /// Builds a board from row-major tiles.
    pub fn new(tiles: Vec<u8>) -> Result<Self, ParseBoardError> {
        let len = tiles.len();
        let width = (1..=MAX_WIDTH)
            .find(|w| w * w >= len)
            .filter(|w| w * w == len && *w >= 2)
            .ok_or(ParseBoardError::NotSquare { len })?;

        let mut seen = [false; MAX_WIDTH * MAX_WIDTH];
        for &tile in &tiles {
            if tile as usize >= len {
                return Err(ParseBoardError::OutOfRange {
                    tile,
                    max: len - 1,
                });
            }
            if std::mem::replace(&mut seen[tile as usize], true) {
                return Err(ParseBoardError::Duplicate { tile });
            }
        }

        // every tile in 0..len is present exactly once, so the blank exists
        let blank = tiles.iter().position(|&t| t == 0).unwrap_or_default();
        Ok(Board {
            width: width as u8,
            blank: blank as u8,
            tiles: tiles.into_boxed_slice(),
        })
    }

    /// The standard goal: tiles in ascending order with the blank last.
    #[track_caller]
    pub fn solved(width: usize) -> Self {
        assert!(
            (2..=MAX_WIDTH).contains(&width),
            "width must be in 2..={MAX_WIDTH}"
        );
        let len = width * width;
        let tiles: Box<[u8]> = (1..len).chain([0]).map(|t| t as u8).collect();
        Board {
            width: width as u8,
            blank: (len - 1) as u8,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// Row and column of the blank.
    pub fn blank(&self) -> (usize, usize) {
        self.coords(self.blank as usize)
    }

    /// Whether `goal` is reachable from this board.
    ///
    /// Horizontal moves keep the number of inversions between the two boards; vertical
    /// moves change it by `width - 1` tiles' worth. On odd widths the inversion parity is
    /// therefore invariant, and on even widths it flips with every change of blank row.
    pub fn is_solvable_to(&self, goal: &Board) -> bool {
        if self.width != goal.width {
            return false;
        }

        let mut goal_index = [0u8; MAX_WIDTH * MAX_WIDTH];
        for (index, &tile) in goal.tiles.iter().enumerate() {
            goal_index[tile as usize] = index as u8;
        }
        let order: Vec<u8> = self
            .tiles
            .iter()
            .filter(|&&t| t != 0)
            .map(|&t| goal_index[t as usize])
            .collect();

        let inversions: usize = order
            .iter()
            .enumerate()
            .map(|(i, &a)| order[i + 1..].iter().filter(|&&b| b < a).count())
            .sum();

        if self.width % 2 == 1 {
            inversions % 2 == 0
        } else {
            let row_distance = self.blank().0.abs_diff(goal.blank().0);
            (inversions + row_distance) % 2 == 0
        }
    }

    /// Random walk of `moves` steps that never immediately undoes its previous move.
    pub fn scramble<R: Rng + ?Sized>(&self, moves: usize, rng: &mut R) -> Board {
        let mut board = self.clone();
        let mut last: Option<Direction> = None;
        for _ in 0..moves {
            let mut options = board.legal_moves();
            if let Some(last) = last {
                options.remove(last.backwards());
            }
            let Some(direction) = options.iter().choose(rng) else {
                break;
            };
            board = board.apply_move(direction);
            last = Some(direction);
        }
        board
    }

    /// Applies a sequence of moves, or returns `None` if one of them is illegal.
    pub fn apply_path(&self, path: &[Direction]) -> Option<Board> {
        let mut board = self.clone();
        for &direction in path {
            if !board.can_move(direction) {
                return None;
            }
            board = board.apply_move(direction);
        }
        Some(board)
    }

    fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.width(), index % self.width())
    }

    fn neighbour(&self, direction: Direction) -> usize {
        let blank = self.blank as usize;
        match direction {
            Direction::Up => blank - self.width(),
            Direction::Right => blank + 1,
            Direction::Down => blank + self.width(),
            Direction::Left => blank - 1,
        }
    }
}

impl SlidingPuzzle for Board {
    type Key = BoardKey;

    fn state_key(&self) -> BoardKey {
        BoardKey(self.tiles.clone())
    }

    fn matches_goal(&self, goal: &Self) -> bool {
        self.tiles == goal.tiles
    }

    fn legal_moves(&self) -> EnumSet<Direction> {
        let (row, col) = self.blank();
        let last = self.width() - 1;
        let mut moves = EnumSet::empty();
        if row > 0 {
            moves |= Direction::Up;
        }
        if col < last {
            moves |= Direction::Right;
        }
        if row < last {
            moves |= Direction::Down;
        }
        if col > 0 {
            moves |= Direction::Left;
        }
        moves
    }

    #[track_caller]
    fn apply_move(&self, direction: Direction) -> Self {
        assert!(self.can_move(direction), "illegal move {direction:?}");
        let target = self.neighbour(direction);
        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank as usize, target);
        Board {
            width: self.width,
            blank: target as u8,
            tiles,
        }
    }

    fn compatible_with(&self, goal: &Self) -> bool {
        self.width == goal.width
    }
}

impl FromStr for Board {
    type Err = ParseBoardError;

    /// Accepts integers separated by commas, whitespace, semicolons or brackets
    /// (`[1,2,3,4,5,6,0,7,8]`), or for boards up to 3x3 a bare digit string (`123456780`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBoardError::Empty);
        }

        let is_separator =
            |c: char| matches!(c, ',' | ';' | '[' | ']') || c.is_whitespace();
        let tiles: Vec<u8> = if s.chars().all(|c| c.is_ascii_digit()) {
            s.bytes().map(|b| b - b'0').collect()
        } else {
            s.split(is_separator)
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse().map_err(|_| ParseBoardError::InvalidToken {
                        token: token.to_owned(),
                    })
                })
                .collect::<Result<_, _>>()?
        };

        if tiles.is_empty() {
            return Err(ParseBoardError::Empty);
        }
        Board::new(tiles)
    }
}

impl fmt::Display for Board {
    /// `{}` prints the canonical comma separated form; `{:#}` prints a grid.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !f.alternate() {
            return write_tiles(&self.tiles, f);
        }

        let cell = (self.tiles.len() - 1).to_string().len();
        for row in self.tiles.chunks(self.width()) {
            for (i, &tile) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                if tile == 0 {
                    write!(f, "{:>cell$}", ".")?;
                } else {
                    write!(f, "{tile:>cell$}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board[{self}]")
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tiles(&self.0, f)
    }
}

fn write_tiles(tiles: &[u8], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, tile) in tiles.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{tile}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn parses_every_accepted_form() {
        let expected = Board::new(vec![1, 2, 3, 4, 5, 6, 0, 7, 8]).unwrap();
        assert_eq!(board("[1,2,3,4,5,6,0,7,8]"), expected);
        assert_eq!(board("1 2 3\n4 5 6\n0 7 8"), expected);
        assert_eq!(board("1,2,3; 4,5,6; 0,7,8"), expected);
        assert_eq!(board("123456078"), expected);
        assert_eq!(expected.to_string(), "1,2,3,4,5,6,0,7,8");
        assert_eq!(expected.blank(), (2, 0));
    }

    #[test]
    fn rejects_malformed_boards() {
        assert_eq!("".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!("[]".parse::<Board>(), Err(ParseBoardError::Empty));
        assert_eq!(
            "1,2,0".parse::<Board>(),
            Err(ParseBoardError::NotSquare { len: 3 })
        );
        assert_eq!("0".parse::<Board>(), Err(ParseBoardError::NotSquare { len: 1 }));
        assert_eq!(
            "1,2,3,9".parse::<Board>(),
            Err(ParseBoardError::OutOfRange { tile: 9, max: 3 })
        );
        assert_eq!(
            "1,1,2,0".parse::<Board>(),
            Err(ParseBoardError::Duplicate { tile: 1 })
        );
        assert_eq!(
            "1,x,2,0".parse::<Board>(),
            Err(ParseBoardError::InvalidToken {
                token: "x".to_owned()
            })
        );
    }

    #[test]
    fn legal_moves_follow_the_blank() {
        use Direction::*;

        assert_eq!(board("0,1,2,3,4,5,6,7,8").legal_moves(), Right | Down);
        assert_eq!(board("1,2,3,4,0,5,6,7,8").legal_moves(), EnumSet::all());
        assert_eq!(board("1,2,3,4,5,6,7,8,0").legal_moves(), Up | Left);
        assert_eq!(
            board("1,2,3,4,5,6,7,8,0").legal_moves().iter().collect::<Vec<_>>(),
            [Up, Left]
        );
    }

    #[test]
    fn moves_slide_the_blank() {
        let start = board("1,2,3,4,5,6,0,7,8");
        let right = start.apply_move(Direction::Right);
        assert_eq!(right.to_string(), "1,2,3,4,5,6,7,0,8");
        assert_eq!(right.apply_move(Direction::Up).to_string(), "1,2,3,4,0,6,7,5,8");
        assert_eq!(right.apply_move(Direction::Left), start);
        assert!(right
            .apply_move(Direction::Right)
            .matches_goal(&Board::solved(3)));
        assert_eq!(
            start.apply_path(&[Direction::Right, Direction::Right]),
            Some(Board::solved(3))
        );
        assert_eq!(start.apply_path(&[Direction::Down]), None);
    }

    #[test]
    fn solvability_uses_permutation_parity() {
        let goal = Board::solved(3);
        assert!(board("1,2,3,4,5,6,0,7,8").is_solvable_to(&goal));
        assert!(!board("2,1,3,4,5,6,7,8,0").is_solvable_to(&goal));

        let goal = Board::solved(4);
        assert!(board("1,2,3,4,5,6,7,8,9,10,11,12,13,14,0,15").is_solvable_to(&goal));
        assert!(board("1,2,3,4,5,6,7,8,9,10,11,0,13,14,15,12").is_solvable_to(&goal));
        assert!(!board("1,2,3,4,5,6,7,8,9,10,11,12,13,15,14,0").is_solvable_to(&goal));

        assert!(!board("2,1,3,0").is_solvable_to(&Board::solved(2)));
        assert!(!Board::solved(2).is_solvable_to(&Board::solved(3)));
    }

    #[test]
    fn scrambled_boards_stay_solvable() {
        let mut rng = Pcg64::seed_from_u64(7);
        for width in 2..=4 {
            let goal = Board::solved(width);
            for _ in 0..20 {
                assert!(goal.scramble(30, &mut rng).is_solvable_to(&goal));
            }
        }
    }

    #[test]
    fn grid_display() {
        assert_eq!(format!("{:#}", board("1,2,3,4,5,6,0,7,8")), "1 2 3\n4 5 6\n. 7 8\n");
        assert_eq!(
            format!("{:#}", Board::solved(4)).lines().last(),
            Some("13 14 15  .")
        );
    }
}
