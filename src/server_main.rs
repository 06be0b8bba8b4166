use std::net::TcpListener;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use log::{info, warn};
use tungstenite::protocol::Role;

use crate::event::OthelloClientEvent;
use crate::network::{self, CommunicationError};
use crate::server::{Clients, IncomingEvent, ServerState};


pub fn run() {
    let (tx, rx) = mpsc::channel();
    let clients = Arc::new(Mutex::new(Clients::new()));
    let clients_view = Arc::clone(&clients);
    thread::spawn(move || {
        let mut server_state = ServerState::new(clients);
        for event in rx {
            server_state.apply_event(event);
        }
        panic!("Unexpected end of events stream");
    });

    let listener = TcpListener::bind(("0.0.0.0", network::PORT)).unwrap();
    info!("Listening for connections on {}...", listener.local_addr().unwrap());
    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(err) => {
                warn!("Cannot establish connection: {}", err);
                continue;
            }
        };
        let peer_addr = match stream.peer_addr() {
            Ok(addr) => addr.to_string(),
            Err(_) => "<unknown>".to_owned(),
        };
        let mut socket_in = match tungstenite::accept(stream) {
            Ok(socket) => socket,
            Err(err) => {
                warn!("Websocket handshake with {} failed: {}", peer_addr, err);
                continue;
            }
        };
        let mut socket_out = match network::clone_websocket(&socket_in, Role::Server) {
            Ok(socket) => socket,
            Err(err) => {
                warn!("Cannot clone connection to {}: {}", peer_addr, err);
                continue;
            }
        };
        info!("Client connected from {}", peer_addr);

        let (client_tx, client_rx) = mpsc::channel();
        let client_id = clients_view.lock().unwrap().add_client(client_tx);
        let tx_new = tx.clone();
        tx_new.send(IncomingEvent::Connected(client_id)).unwrap();

        thread::spawn(move || {
            loop {
                match network::read_obj::<OthelloClientEvent, _>(&mut socket_in) {
                    Ok(ev) => {
                        tx_new.send(IncomingEvent::Network(client_id, ev)).unwrap();
                    }
                    Err(err) => {
                        match err {
                            CommunicationError::ConnectionClosed => {
                                info!("Client {} disconnected", peer_addr);
                            }
                            err => warn!(
                                "Client {} disconnected due to read error: {:?}",
                                peer_addr, err
                            ),
                        }
                        tx_new.send(IncomingEvent::Disconnected(client_id)).unwrap();
                        break;
                    }
                }
            }
        });
        thread::spawn(move || {
            for ev in client_rx {
                if let Err(err) = network::write_obj(&mut socket_out, &ev) {
                    warn!("Client write failed, dropping connection: {:?}", err);
                    break;
                }
            }
        });
    }
    panic!("Unexpected end of TcpListener::incoming");
}
