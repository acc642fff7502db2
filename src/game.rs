use rand::Rng;
use std::fmt;

//
// PUBLIC TYPES
//

/// The symbol a player places on the board. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    X,
    O,
}

impl Mark {
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Marked(Mark),
}

impl Cell {
    fn as_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Marked(mark) => mark.as_char(),
        }
    }
}

/// Result of scanning the board after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Mark),
    Draw,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

//
// CONFIG
//

pub const BOARD_SIZE: usize = 3;

/// Every winning line, rows first, then columns, then both diagonals.
const LINES: [[(usize, usize); 3]; 8] = [
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

//
// BOARD
//

/// 3x3 grid, row-major, addressed by `(row, col)` in `0..3`.
///
/// A marked cell is never reset; the only mutation is [`Board::place`]
/// into an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn in_bounds(row: usize, col: usize) -> bool {
        row < BOARD_SIZE && col < BOARD_SIZE
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if Self::in_bounds(row, col) {
            Some(self.cells[row][col])
        } else {
            None
        }
    }

    /// Puts `mark` at `(row, col)` if the cell exists and is empty.
    ///
    /// Returns whether the board changed.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> bool {
        if !Self::in_bounds(row, col) || self.cells[row][col] != Cell::Empty {
            return false;
        }
        self.cells[row][col] = Cell::Marked(mark);
        true
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|&c| c != Cell::Empty)
    }

    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        (0..BOARD_SIZE)
            .flat_map(|row| (0..BOARD_SIZE).map(move |col| (row, col)))
            .filter(|&(row, col)| self.cells[row][col] == Cell::Empty)
            .collect()
    }

    pub fn evaluate(&self) -> Outcome {
        for line in LINES {
            let [a, b, c] = line.map(|(row, col)| self.cells[row][col]);
            if let Cell::Marked(mark) = a {
                if a == b && b == c {
                    return Outcome::Win(mark);
                }
            }
        }

        if self.is_full() {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    /// Text frame sent to clients: three lines of three characters,
    /// each terminated by `\n`.
    pub fn render(&self) -> String {
        let mut frame = String::with_capacity(BOARD_SIZE * (BOARD_SIZE + 1));
        for row in &self.cells {
            frame.extend(row.iter().map(|c| c.as_char()));
            frame.push('\n');
        }
        frame
    }
}

//
// COMPUTER PLAYER
//

/// Picks a uniformly random empty cell by rejection sampling over the
/// whole grid. Returns `None` only when the board is full.
pub fn random_empty_cell<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<(usize, usize)> {
    if board.is_full() {
        return None;
    }
    loop {
        let row = rng.gen_range(0..BOARD_SIZE);
        let col = rng.gen_range(0..BOARD_SIZE);
        if board.get(row, col) == Some(Cell::Empty) {
            return Some((row, col));
        }
    }
}
