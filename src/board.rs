use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Content of a single grid cell. A unit is any `Owned` cell; walls never change back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Owned(Side),
    Wall,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn symbol(&self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Owned(Side::White) => 'W',
            Cell::Owned(Side::Black) => 'B',
            Cell::Wall => '#',
        }
    }

    pub fn from_symbol(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'W' => Some(Cell::Owned(Side::White)),
            'B' => Some(Cell::Owned(Side::Black)),
            '#' => Some(Cell::Wall),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Position { x, y }
    }

    /// Offsets this position by `(dx, dy)`; `None` if either coordinate would go negative.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<Position> {
        Some(Position {
            x: self.x.checked_add_signed(dx)?,
            y: self.y.checked_add_signed(dy)?,
        })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Position ({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    #[error("Unknown cell symbol '{0}'")]
    InvalidCell(char),
    #[error("Board rows have differing lengths")]
    RaggedRows,
}

/// Fixed-size rectangular grid of cells, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// Parses the textual form produced by `Display`: one row per line,
    /// `.` empty, `W`/`B` units, `#` walls. Blank lines and spaces are skipped.
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        let mut rows: Vec<Vec<Cell>> = Vec::new();

        for line in text.lines() {
            let row = line
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| Cell::from_symbol(c).ok_or(BoardError::InvalidCell(c)))
                .collect::<Result<Vec<_>, _>>()?;
            if !row.is_empty() {
                rows.push(row);
            }
        }

        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return Err(BoardError::RaggedRows);
        }

        Ok(Board {
            width,
            height: rows.len(),
            cells: rows.into_iter().flatten().collect(),
        })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width && pos.y < self.height
    }

    /// Converts raw signed coordinates into a position on this board, if they land on it.
    pub fn position(&self, x: i64, y: i64) -> Option<Position> {
        let pos = Position::new(usize::try_from(x).ok()?, usize::try_from(y).ok()?);
        self.contains(pos).then_some(pos)
    }

    fn index(&self, pos: Position) -> Result<usize, BoardError> {
        if self.contains(pos) {
            Ok(pos.y * self.width + pos.x)
        } else {
            Err(BoardError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, pos: Position) -> Result<Cell, BoardError> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx])
    }

    pub fn set(&mut self, pos: Position, cell: Cell) -> Result<(), BoardError> {
        let idx = self.index(pos)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Moves the content of `from` to `to`, leaving `from` empty. Both
    /// positions are checked before anything is written.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<(), BoardError> {
        let src = self.index(from)?;
        let dst = self.index(to)?;
        self.cells[dst] = self.cells[src];
        if src != dst {
            self.cells[src] = Cell::Empty;
        }
        Ok(())
    }

    /// Every cell with its position, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (Position::new(i % width, i / width), cell))
    }

    /// Positions of every unit owned by `side`, row by row.
    pub fn units(&self, side: Side) -> impl Iterator<Item = Position> + '_ {
        self.cells()
            .filter(move |&(_, cell)| cell == Cell::Owned(side))
            .map(|(pos, _)| pos)
    }

    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell == Cell::Wall).count()
    }

    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width.max(1))
            .map(|row| row.iter().map(Cell::symbol).collect())
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{}", row)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(4, 3);
        assert_eq!(board.dimensions(), (4, 3));
        assert!(board.cells().all(|(_, cell)| cell == Cell::Empty));
        assert_eq!(board.cells().count(), 12);
    }

    #[test]
    fn test_get_and_set() {
        let mut board = Board::new(4, 3);
        board.set(Position::new(3, 2), Cell::Wall).unwrap();
        board
            .set(Position::new(0, 1), Cell::Owned(Side::Black))
            .unwrap();

        assert_eq!(board.get(Position::new(3, 2)), Ok(Cell::Wall));
        assert_eq!(board.get(Position::new(0, 1)), Ok(Cell::Owned(Side::Black)));
        assert_eq!(board.get(Position::new(1, 1)), Ok(Cell::Empty));
    }

    #[test]
    fn test_out_of_bounds_access() {
        let mut board = Board::new(4, 3);
        let err = BoardError::OutOfBounds {
            x: 4,
            y: 0,
            width: 4,
            height: 3,
        };
        assert_eq!(board.get(Position::new(4, 0)), Err(err));
        assert!(board.set(Position::new(0, 3), Cell::Wall).is_err());

        // Failed set leaves the board untouched
        assert_eq!(board, Board::new(4, 3));
    }

    #[test]
    fn test_relocate() {
        let mut board = Board::parse("W..").unwrap();
        board
            .relocate(Position::new(0, 0), Position::new(2, 0))
            .unwrap();
        assert_eq!(board.to_string(), "..W\n");

        // Out-of-range destination writes nothing
        assert!(board
            .relocate(Position::new(2, 0), Position::new(3, 0))
            .is_err());
        assert_eq!(board.to_string(), "..W\n");
    }

    #[test]
    fn test_position_from_raw_coordinates() {
        let board = Board::new(4, 3);
        assert_eq!(board.position(2, 1), Some(Position::new(2, 1)));
        assert_eq!(board.position(-1, 1), None);
        assert_eq!(board.position(1, -5), None);
        assert_eq!(board.position(4, 0), None);
        assert_eq!(board.position(0, 3), None);
    }

    #[test]
    fn test_units_in_row_major_order() {
        let board = Board::parse(
            "
            W..B
            .#..
            B..W
            ",
        )
        .unwrap();

        let white: Vec<_> = board.units(Side::White).collect();
        let black: Vec<_> = board.units(Side::Black).collect();
        assert_eq!(white, vec![Position::new(0, 0), Position::new(3, 2)]);
        assert_eq!(black, vec![Position::new(3, 0), Position::new(0, 2)]);
        assert_eq!(board.wall_count(), 1);
    }

    #[test]
    fn test_display_matches_parse() {
        let text = "W.#\n.B.\n";
        let board = Board::parse(text).unwrap();
        assert_eq!(board.dimensions(), (3, 2));
        assert_eq!(board.to_string(), text);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert_eq!(Board::parse("W.x"), Err(BoardError::InvalidCell('x')));
        assert_eq!(Board::parse("W..\n.."), Err(BoardError::RaggedRows));
    }

    #[test]
    fn test_offset() {
        let pos = Position::new(1, 0);
        assert_eq!(pos.offset(1, 1), Some(Position::new(2, 1)));
        assert_eq!(pos.offset(-1, 0), Some(Position::new(0, 0)));
        assert_eq!(pos.offset(0, -1), None);
    }

    #[test]
    fn test_side_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Side::White).unwrap(), "\"white\"");
        assert_eq!(
            serde_json::from_str::<Side>("\"black\"").unwrap(),
            Side::Black
        );
        assert_eq!(Side::White.opponent(), Side::Black);
    }
}
