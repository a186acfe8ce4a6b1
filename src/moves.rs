use crate::board::{Board, Cell, Position, Side};
use tracing::debug;

/// The eight queen-line directions as `(dx, dy)` steps.
pub const QUEEN_DIRECTIONS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Unit step from `start` toward `end`, if they lie on one horizontal,
/// vertical or diagonal line. Zero-length displacements have no direction.
fn line_step(start: Position, end: Position) -> Option<(isize, isize)> {
    let dx = end.x as isize - start.x as isize;
    let dy = end.y as isize - start.y as isize;

    if dx == 0 && dy == 0 {
        return None;
    }
    if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
        return None;
    }

    Some((dx.signum(), dy.signum()))
}

/// Whether a queen-line move (unit relocation or arrow shot) from `start` to
/// `end` is legal: a straight line, every cell after `start` up to and
/// including `end` empty. The content of `start` itself is not checked.
pub fn is_valid_move(board: &Board, start: Position, end: Position) -> bool {
    if !board.contains(start) || !board.contains(end) {
        debug!(%start, %end, "move leaves the board");
        return false;
    }

    let Some((step_x, step_y)) = line_step(start, end) else {
        debug!(%start, %end, "move is zero-length or not a straight line");
        return false;
    };

    let mut current = start;
    while current != end {
        // Both endpoints are on the board, so every cell between them is too.
        let Some(next) = current.offset(step_x, step_y) else {
            return false;
        };
        current = next;

        match board.get(current) {
            Ok(Cell::Empty) => {}
            Ok(cell) => {
                debug!(%start, %end, blocked_at = %current, ?cell, "path blocked");
                return false;
            }
            Err(_) => return false,
        }
    }

    true
}

/// Every empty cell reachable from `from` along the eight queen rays,
/// stopping before the first occupied cell or the board edge.
pub fn legal_destinations(board: &Board, from: Position) -> Vec<Position> {
    let mut destinations = Vec::new();

    for &(dx, dy) in &QUEEN_DIRECTIONS {
        let mut current = from;
        while let Some(next) = current.offset(dx, dy) {
            match board.get(next) {
                Ok(Cell::Empty) => {
                    destinations.push(next);
                    current = next;
                }
                _ => break,
            }
        }
    }

    destinations
}

/// Total number of legal queen-line destinations across all of `side`'s units.
pub fn mobility_count(board: &Board, side: Side) -> usize {
    board
        .units(side)
        .map(|pos| legal_destinations(board, pos).len())
        .sum()
}
