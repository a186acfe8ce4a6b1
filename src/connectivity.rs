//! 8-connected flood fills over the board.
//!
//! Two fills share the same adjacency rule: a neighbour is passable when it
//! is empty or held by the fill's own side. The separation test stops as soon
//! as a fill touches an enemy unit; the area fill just counts what it visits.

use crate::board::{Board, Cell, Position, Side};
use std::collections::HashSet;
use tracing::debug;

/// The eight king-step neighbours, diagonals included.
const NEIGHBOURS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn neighbours(board: &Board, pos: Position) -> impl Iterator<Item = (Position, Cell)> + '_ {
    NEIGHBOURS.iter().filter_map(move |&(dx, dy)| {
        let next = pos.offset(dx, dy)?;
        board.get(next).ok().map(|cell| (next, cell))
    })
}

fn passable(cell: Cell, side: Side) -> bool {
    matches!(cell, Cell::Empty) || cell == Cell::Owned(side)
}

/// Fill from a single unit. Returns the first enemy unit the fill touches, if any.
fn first_enemy_contact(board: &Board, origin: Position, side: Side) -> Option<Position> {
    let mut stack = vec![origin];
    let mut visited = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        for (next, cell) in neighbours(board, current) {
            match cell {
                Cell::Wall => {}
                Cell::Owned(owner) if owner != side => return Some(next),
                _ => {
                    if !visited.contains(&next) {
                        stack.push(next);
                    }
                }
            }
        }
    }

    None
}

/// True when no unit of either side can reach an enemy unit through empty
/// or same-side cells. Once true it stays true, since walls are never removed.
pub fn all_units_separated(board: &Board) -> bool {
    for (origin, cell) in board.cells() {
        let Cell::Owned(side) = cell else {
            continue;
        };
        if let Some(contact) = first_enemy_contact(board, origin, side) {
            debug!(%origin, %side, %contact, "fill reached an opposing unit");
            return false;
        }
    }
    true
}

/// Number of cells reachable from `origin` through empty or `side`-owned
/// cells, counting `origin` itself whatever it holds.
///
/// Enemy units are simply not passable here, so this is only a territory
/// measure once `all_units_separated` holds.
pub fn flood_fill_area(board: &Board, origin: Position, side: Side) -> usize {
    if !board.contains(origin) {
        return 0;
    }

    let mut stack = vec![origin];
    let mut visited = HashSet::new();

    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        stack.extend(
            neighbours(board, current)
                .filter(|&(next, cell)| passable(cell, side) && !visited.contains(&next))
                .map(|(next, _)| next),
        );
    }

    visited.len()
}

/// Sum of `flood_fill_area` over each of `side`'s units. Units sharing a
/// region each count the whole region.
pub fn territory_for_side(board: &Board, side: Side) -> usize {
    board
        .units(side)
        .map(|pos| flood_fill_area(board, pos, side))
        .sum()
}
