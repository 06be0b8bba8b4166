#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod client;
pub mod client_main;
pub mod coord;
pub mod error;
pub mod event;
pub mod game;
pub mod grid;
pub mod lobby;
pub mod network;
pub mod server;
pub mod server_main;
pub mod stone;
pub mod tui;
