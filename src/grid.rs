use std::fmt;
use std::ops;

use ndarray::{Array, Array2};
use serde::{Deserialize, Serialize};

use crate::coord::{BoardShape, Coord};
use crate::stone::Stone;


// Result of a bounds-tolerant cell read. `Empty` and `OutOfBounds` are distinct
// states: both stop a capture walk, but only `Empty` is a playable cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GridItem {
    Stone(Stone),
    Empty,
    OutOfBounds,
}

impl GridItem {
    pub fn is_free(&self) -> bool {
        matches!(self, GridItem::Empty)
    }
}

// A fixed-shape matrix of cells. Dimensions never change after creation.
// Published grids are immutable by convention: `board::place_stone` clones,
// mutates the private copy and returns it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    data: Array2<Option<Stone>>,
}

impl Grid {
    pub fn new(board_shape: BoardShape) -> Self {
        Grid {
            data: Array::from_elem(
                (board_shape.num_rows as usize, board_shape.num_cols as usize),
                None,
            ),
        }
    }

    pub fn shape(&self) -> BoardShape {
        BoardShape {
            num_rows: self.data.shape()[0] as u8,
            num_cols: self.data.shape()[1] as u8,
        }
    }

    pub fn contains_coord(&self, coord: Coord) -> bool {
        self.shape().contains_coord(coord)
    }

    pub fn get(&self, pos: Coord) -> GridItem {
        match self.data.get(coord_to_index(pos)) {
            None => GridItem::OutOfBounds,
            Some(None) => GridItem::Empty,
            Some(Some(stone)) => GridItem::Stone(*stone),
        }
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<Stone>;
    #[track_caller]
    fn index(&self, pos: Coord) -> &Self::Output {
        let shape = self.shape();
        self.data
            .get(coord_to_index(pos))
            .unwrap_or_else(|| panic!("{}", out_of_bound_message(pos, shape)))
    }
}

impl ops::IndexMut<Coord> for Grid {
    #[track_caller]
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output {
        let shape = self.shape();
        self.data
            .get_mut(coord_to_index(pos))
            .unwrap_or_else(|| panic!("{}", out_of_bound_message(pos, shape)))
    }
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    // A negative index wraps to a huge usize, so `Array2::get` rejects it.
    [
        pos.row.to_zero_based() as usize,
        pos.col.to_zero_based() as usize,
    ]
}

fn out_of_bound_message(pos: Coord, board_shape: BoardShape) -> String {
    format!(
        "Coord ({}, {}) is out of bound for {}x{} board",
        pos.row.to_zero_based(),
        pos.col.to_zero_based(),
        board_shape.num_rows,
        board_shape.num_cols
    )
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.shape().coords().filter_map(|coord| {
                self[coord].map(|stone| (coord.to_algebraic(), format!("{:?}", stone)))
            }))
            .finish()
    }
}
