use std::io;

use clap::{arg, Command};

use othello_online::client_main::{self, ClientConfig};
use othello_online::coord::Coord;
use othello_online::game::{Game, GameStatus};
use othello_online::{server_main, tui};


fn main() -> io::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let matches = Command::new("Othello")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Online Othello client/server console app")
        .subcommand_required(true)
        .subcommand(Command::new("server").about("Run as relay server"))
        .subcommand(
            Command::new("client")
                .about("Run as client")
                .arg(arg!(<server_address> "Server address"))
                .arg(arg!(<player_name> "Player name")),
        )
        .subcommand(Command::new("local").about("Run a local hot-seat game"))
        .get_matches();

    match matches.subcommand() {
        Some(("server", _)) => {
            server_main::run();
            Ok(())
        }
        Some(("client", sub)) => client_main::run(ClientConfig {
            server_address: sub.get_one::<String>("server_address").unwrap().clone(),
            player_name: sub.get_one::<String>("player_name").unwrap().clone(),
        }),
        Some(("local", _)) => run_local_game(),
        _ => unreachable!("Unknown subcommand"),
    }
}

// Hot-seat game on stdin: both sides type their moves into one terminal.
fn run_local_game() -> io::Result<()> {
    let mut game = Game::standard();
    println!("{}", tui::render_game(&game));
    loop {
        let mut buffer = String::new();
        if io::stdin().read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        let cmd = buffer.trim();
        if cmd == "quit" {
            return Ok(());
        }
        match Coord::from_algebraic(cmd) {
            Some(pos) if game.current().contains_coord(pos) => {
                if let Err(err) = game.try_move(pos) {
                    println!("Impossible move: {:?}", err);
                } else {
                    println!("{}", tui::render_game(&game));
                }
            }
            _ => println!("Cannot parse cell: {}", cmd),
        }
        if let GameStatus::Over { .. } = game.status() {
            return Ok(());
        }
    }
}
