use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::board;
use crate::coord::{BoardShape, Coord};
use crate::grid::Grid;
use crate::stone::Stone;


#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlaceError {
    Occupied,
    NoStonesFlipped,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum GameStatus {
    Active { turn: Stone },
    Over { scores: EnumMap<Stone, usize>, winner: Option<Stone> },
}

// One game session: the ordered history of board snapshots plus the index of
// the snapshot currently on display. The turn color is not stored; it is
// derived from `step_number` parity (Black on even steps), with forced passes
// recomputed on every read. Serialized wholesale, this is the relay payload.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Game {
    history: Vec<Grid>,
    step_number: usize,
}

impl Game {
    pub fn new(board_shape: BoardShape) -> Self {
        Game {
            history: vec![board::starting_grid(board_shape)],
            step_number: 0,
        }
    }

    pub fn standard() -> Self {
        Self::new(BoardShape::standard())
    }

    pub fn from_grid(grid: Grid) -> Self {
        Game { history: vec![grid], step_number: 0 }
    }

    pub fn history(&self) -> &[Grid] {
        &self.history
    }
    pub fn step_number(&self) -> usize {
        self.step_number
    }

    // The snapshot on display (and the one moves are played on).
    pub fn current(&self) -> &Grid {
        &self.history[self.step_number]
    }

    pub fn turn_by_parity(&self) -> Stone {
        if self.step_number % 2 == 0 { Stone::Black } else { Stone::White }
    }

    // The side that actually gets to place a stone: the parity side, unless it
    // has no legal move and its opponent does, in which case the turn silently
    // skips to the opponent without consuming a history entry. `None` means
    // neither side can move.
    pub fn turn_to_move(&self) -> Option<Stone> {
        let grid = self.current();
        let parity_side = self.turn_by_parity();
        if board::has_any_legal_move(grid, parity_side) {
            Some(parity_side)
        } else if board::has_any_legal_move(grid, parity_side.opponent()) {
            Some(parity_side.opponent())
        } else {
            None
        }
    }

    pub fn status(&self) -> GameStatus {
        match self.turn_to_move() {
            Some(turn) => GameStatus::Active { turn },
            None => GameStatus::Over {
                scores: board::count_stones(self.current()),
                winner: board::winner(self.current()),
            },
        }
    }

    // Plays the current side's stone on `pos`. Rejections leave the session
    // untouched. A successful move played from an earlier step discards the
    // overwritten future before appending.
    pub fn try_move(&mut self, pos: Coord) -> Result<(), PlaceError> {
        let grid = self.current();
        if grid[pos].is_some() {
            return Err(PlaceError::Occupied);
        }
        let Some(turn) = self.turn_to_move() else {
            return Err(PlaceError::NoStonesFlipped);
        };
        if board::capture_count(grid, pos, turn) == 0 {
            return Err(PlaceError::NoStonesFlipped);
        }
        let new_grid = board::place_stone(grid, pos, turn);
        self.history.truncate(self.step_number + 1);
        self.history.push(new_grid);
        self.step_number += 1;
        Ok(())
    }

    // Time travel within the existing history. Does not alter the history;
    // the turn is re-derived from the new step's parity.
    pub fn jump_to(&mut self, step: usize) {
        assert!(step < self.history.len());
        self.step_number = step;
    }

    pub fn reset(&mut self) {
        let board_shape = self.current().shape();
        self.history = vec![board::starting_grid(board_shape)];
        self.step_number = 0;
    }
}
