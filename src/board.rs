use std::cmp::Ordering;

use enum_map::{enum_map, EnumMap};

use crate::coord::{BoardShape, Col, Coord, Row};
use crate::grid::{Grid, GridItem};
use crate::stone::Stone;


// The 8-neighborhood as (d_row, d_col) steps.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    ( 0, -1),          ( 0, 1),
    ( 1, -1), ( 1, 0), ( 1, 1),
];

// The two diagonals of the center 2x2 square alternate colors. On the standard
// board this puts White on d4/e5 and Black on e4/d5.
pub fn starting_grid(board_shape: BoardShape) -> Grid {
    assert!(board_shape.num_rows >= 2 && board_shape.num_cols >= 2);
    let mut grid = Grid::new(board_shape);
    let top = Row::from_zero_based(board_shape.num_rows as i8 / 2 - 1);
    let left = Col::from_zero_based(board_shape.num_cols as i8 / 2 - 1);
    grid[Coord::new(top, left)] = Some(Stone::White);
    grid[Coord::new(top, left + 1)] = Some(Stone::Black);
    grid[Coord::new(top + 1, left)] = Some(Stone::Black);
    grid[Coord::new(top + 1, left + 1)] = Some(Stone::White);
    grid
}

// Length of the opponent run that placing `stone` on `from` would capture in
// one direction: the contiguous opposite-color stones starting at the adjacent
// cell, provided the run is closed off by a same-color stone. An empty cell or
// the board edge before the closing stone means nothing is captured.
pub fn captures_in_direction(grid: &Grid, from: Coord, dir: (i8, i8), stone: Stone) -> usize {
    let mut pos = from + dir;
    let mut run_len = 0;
    loop {
        match grid.get(pos) {
            GridItem::Stone(s) if s == stone => return run_len,
            GridItem::Stone(_) => run_len += 1,
            GridItem::Empty | GridItem::OutOfBounds => return 0,
        }
        pos = pos + dir;
    }
}

// Total number of stones that placing `stone` on `pos` would flip. The move is
// legal iff the result is positive. An occupied target always yields zero,
// without inspecting neighbors. `pos` must be on the board.
pub fn capture_count(grid: &Grid, pos: Coord, stone: Stone) -> usize {
    if grid[pos].is_some() {
        return 0;
    }
    DIRECTIONS.iter().map(|&dir| captures_in_direction(grid, pos, dir, stone)).sum()
}

// Applies a legal move: occupies `pos` and flips every captured run. The input
// grid is left untouched; flips happen on a private copy that is returned.
// Precondition: `capture_count(grid, pos, stone) > 0`.
pub fn place_stone(grid: &Grid, pos: Coord, stone: Stone) -> Grid {
    debug_assert!(capture_count(grid, pos, stone) > 0);
    let mut new_grid = grid.clone();
    for dir in DIRECTIONS {
        let run_len = captures_in_direction(grid, pos, dir, stone);
        let mut target = pos;
        for _ in 0..run_len {
            target = target + dir;
            new_grid[target] = Some(stone);
        }
    }
    new_grid[pos] = Some(stone);
    new_grid
}

pub fn has_any_legal_move(grid: &Grid, stone: Stone) -> bool {
    grid.shape()
        .coords()
        .any(|pos| grid[pos].is_none() && capture_count(grid, pos, stone) > 0)
}

// The game ends when neither side can place a stone. A full board is
// sufficient but not necessary: both sides can be blocked with cells to spare.
pub fn is_terminal(grid: &Grid, to_move: Stone) -> bool {
    !has_any_legal_move(grid, to_move) && !has_any_legal_move(grid, to_move.opponent())
}

pub fn count_stones(grid: &Grid) -> EnumMap<Stone, usize> {
    let mut counts = enum_map! { _ => 0 };
    for pos in grid.shape().coords() {
        if let Some(stone) = grid[pos] {
            counts[stone] += 1;
        }
    }
    counts
}

// `None` is a draw.
pub fn winner(grid: &Grid) -> Option<Stone> {
    let counts = count_stones(grid);
    match counts[Stone::Black].cmp(&counts[Stone::White]) {
        Ordering::Greater => Some(Stone::Black),
        Ordering::Less => Some(Stone::White),
        Ordering::Equal => None,
    }
}
