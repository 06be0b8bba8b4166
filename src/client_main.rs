use std::io::{self, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::style::{self, Stylize};
use crossterm::{cursor, event as term_event, execute, terminal};
use itertools::Itertools;
use scopeguard::defer;
use tungstenite::protocol::Role;

use crate::client::{ClientState, NotableEvent};
use crate::coord::Coord;
use crate::event::OthelloServerEvent;
use crate::network::{self, CommunicationError};
use crate::tui;


pub struct ClientConfig {
    pub server_address: String,
    pub player_name: String,
}

#[derive(Debug)]
enum IncomingEvent {
    Network(OthelloServerEvent),
    Terminal(term_event::Event),
    ConnectionLost(CommunicationError),
    Tick,
}

pub fn run(config: ClientConfig) -> io::Result<()> {
    let my_name = config.player_name.trim().to_owned();
    let server_addr =
        (config.server_address.as_str(), network::PORT).to_socket_addrs()?.collect_vec();
    println!("Connecting to {:?}...", server_addr);
    let stream = TcpStream::connect(&server_addr[..])?;
    let url = format!("ws://{}:{}/", config.server_address, network::PORT);
    let (mut socket_in, _response) = tungstenite::client::client(url, stream).map_err(|err| {
        io::Error::new(io::ErrorKind::Other, format!("Websocket handshake failed: {}", err))
    })?;
    let mut socket_out = network::clone_websocket(&socket_in, Role::Client)?;

    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
    defer! {
        let _ = execute!(io::stdout(), terminal::LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    };
    let app_start_time = Instant::now();

    let (tx, rx) = mpsc::channel();
    let tx_net = tx.clone();
    let tx_local = tx.clone();
    let tx_tick = tx;
    thread::spawn(move || {
        loop {
            match network::read_obj::<OthelloServerEvent, _>(&mut socket_in) {
                Ok(ev) => {
                    if tx_net.send(IncomingEvent::Network(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_net.send(IncomingEvent::ConnectionLost(err));
                    break;
                }
            }
        }
    });
    thread::spawn(move || {
        loop {
            let ev = term_event::read().unwrap();
            if tx_local.send(IncomingEvent::Terminal(ev)).is_err() {
                break;
            }
        }
    });
    thread::spawn(move || {
        loop {
            thread::sleep(Duration::from_millis(100));
            if tx_tick.send(IncomingEvent::Tick).is_err() {
                break;
            }
        }
    });

    let (client_events_tx, client_events_rx) = mpsc::channel();
    thread::spawn(move || {
        for ev in client_events_rx {
            if network::write_obj(&mut socket_out, &ev).is_err() {
                break;
            }
        }
    });

    let mut client_state = ClientState::new(client_events_tx);
    client_state.login(&my_name);

    let mut input = String::new();
    let mut command_error: Option<String> = None;
    for event in rx {
        match event {
            IncomingEvent::ConnectionLost(err) => {
                execute!(stdout, terminal::LeaveAlternateScreen)?;
                writeln!(stdout, "Connection lost: {:?}", err)?;
                std::process::exit(1);
            }
            IncomingEvent::Network(ev) => match client_state.process_server_event(ev) {
                NotableEvent::LoginRejected(rejection) => {
                    execute!(stdout, terminal::LeaveAlternateScreen)?;
                    writeln!(stdout, "Login rejected: {:?}", rejection)?;
                    std::process::exit(1);
                }
                NotableEvent::None
                | NotableEvent::StateUpdated
                | NotableEvent::UsersUpdated => {}
            },
            IncomingEvent::Terminal(term_event::Event::Key(key))
                if key.kind != term_event::KeyEventKind::Release =>
            {
                match key.code {
                    term_event::KeyCode::Char('c')
                        if key.modifiers.contains(term_event::KeyModifiers::CONTROL) =>
                    {
                        client_state.leave();
                        return Ok(());
                    }
                    term_event::KeyCode::Char(ch) => input.push(ch),
                    term_event::KeyCode::Backspace => {
                        input.pop();
                    }
                    term_event::KeyCode::Esc => {
                        client_state.leave();
                        return Ok(());
                    }
                    term_event::KeyCode::Enter => {
                        let cmd = input.trim().to_owned();
                        input.clear();
                        command_error = None;
                        if let Some(exit) = execute_command(&mut client_state, &cmd, &mut command_error) {
                            return exit;
                        }
                    }
                    _ => {}
                }
            }
            IncomingEvent::Terminal(_) | IncomingEvent::Tick => {}
        }

        let now = Instant::now();
        execute!(stdout, cursor::MoveTo(0, 0))?;
        execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;

        let mut frame = String::new();
        frame.push_str(&format!("Playing as: {}\n\n", client_state.my_name().unwrap_or("-")));
        frame.push_str(&tui::render_grid(client_state.game().current()));
        frame.push('\n');
        frame.push_str(&tui::render_status(client_state.game()));
        frame.push_str("\n\n");
        frame.push_str(&tui::render_users(client_state.logged_in_users()));
        frame.push('\n');
        frame.push_str(&tui::render_move_list(client_state.game()));
        frame.push_str("\n\n");
        frame.push_str("Type a cell (e.g. \"c4\"), /jump <step>, /reset or /quit\n");

        // Simulate cursor: real cursor blinking is broken with Show/Hide.
        let show_cursor = now.duration_since(app_start_time).as_millis() % 1000 >= 500;
        let cursor = if show_cursor { '▂' } else { ' ' };
        frame.push_str(&format!("> {}{}\n", input, cursor));
        if let Some(ref err) = command_error {
            frame.push_str(&format!("{}\n", err.clone().with(style::Color::Red)));
        }

        // Raw mode: a bare LF does not return the carriage.
        write!(stdout, "{}", frame.replace('\n', "\r\n"))?;
        stdout.flush()?;
    }
    panic!("Unexpected end of events stream");
}

// `Some(result)` means the client should exit.
fn execute_command(
    client_state: &mut ClientState, cmd: &str, command_error: &mut Option<String>,
) -> Option<io::Result<()>> {
    if cmd.is_empty() {
        return None;
    }
    if cmd == "/quit" {
        client_state.leave();
        return Some(Ok(()));
    }
    if cmd == "/reset" {
        client_state.reset();
        return None;
    }
    if let Some(step_str) = cmd.strip_prefix("/jump") {
        match step_str.trim().parse::<usize>() {
            Ok(step) => {
                if client_state.jump_to(step).is_err() {
                    *command_error = Some(format!("No such step: {}", step));
                }
            }
            Err(_) => *command_error = Some("Usage: /jump <step>".to_owned()),
        }
        return None;
    }
    match Coord::from_algebraic(cmd) {
        Some(pos) if client_state.game().current().contains_coord(pos) => {
            if let Err(err) = client_state.make_move(pos) {
                *command_error = Some(format!("Impossible move {}: {:?}", cmd, err));
            }
        }
        _ => *command_error = Some(format!("Cannot parse cell: {}", cmd)),
    }
    None
}
