use console::Style;
use itertools::Itertools;

use crate::coord::Coord;
use crate::game::{Game, GameStatus};
use crate::grid::Grid;
use crate::stone::Stone;


pub fn stone_char(stone: Stone) -> char {
    match stone {
        Stone::Black => '●',
        Stone::White => '○',
    }
}

pub fn render_grid(grid: &Grid) -> String {
    // Two tones of board felt, alternating like a checkerboard.
    let felt = [Style::new().on_color256(71), Style::new().on_color256(65)];

    let shape = grid.shape();
    let mut col_names = String::new();
    col_names.push_str(&format_square(' '));
    for col in shape.cols() {
        col_names.push_str(&format_square(col.to_algebraic()));
    }
    col_names.push_str(&format_square(' '));
    col_names.push('\n');

    let mut color_idx = 0;
    let mut ret = String::new();
    ret.push_str(&col_names);
    for row in shape.rows() {
        ret.push_str(&format_square(row.to_algebraic()));
        for col in shape.cols() {
            let square = match grid[Coord::new(row, col)] {
                Some(stone) => {
                    let stone_style = match stone {
                        Stone::Black => felt[color_idx].clone().color256(16),
                        Stone::White => felt[color_idx].clone().color256(255),
                    };
                    stone_style.apply_to(format_square(stone_char(stone))).to_string()
                }
                None => felt[color_idx].apply_to(format_square(' ')).to_string(),
            };
            ret.push_str(&square);
            color_idx = 1 - color_idx;
        }
        ret.push_str(&format_square(row.to_algebraic()));
        color_idx = 1 - color_idx;
        ret.push('\n');
    }
    ret.push_str(&col_names);
    ret
}

pub fn render_status(game: &Game) -> String {
    match game.status() {
        GameStatus::Active { turn } => format!("Next player: {}", stone_char(turn)),
        GameStatus::Over { scores, winner } => {
            let score = format!(
                "{} {}  {} {}",
                stone_char(Stone::Black),
                scores[Stone::Black],
                stone_char(Stone::White),
                scores[Stone::White],
            );
            match winner {
                Some(stone) => format!("Winner: {}  ( {} )", stone_char(stone), score),
                None => format!("Draw  ( {} )", score),
            }
        }
    }
}

// The jump list: one line per snapshot, current step marked.
pub fn render_move_list(game: &Game) -> String {
    (0..game.history().len())
        .map(|step| {
            let marker = if step == game.step_number() { '>' } else { ' ' };
            if step == 0 {
                format!("{} {}: Game start", marker, step)
            } else {
                format!("{} {}: Move #{}", marker, step, step)
            }
        })
        .join("\n")
}

pub fn render_users(users: &[String]) -> String {
    let mut ret = String::from("Logged in players:\n");
    for user in users {
        ret.push_str(&format!("  • {}\n", user));
    }
    ret
}

pub fn render_game(game: &Game) -> String {
    format!("{}\n{}\n", render_grid(game.current()), render_status(game))
}

fn format_square(ch: char) -> String {
    format!(" {} ", ch)
}
