use std::collections::{hash_map, HashMap};
use std::ops;
use std::sync::{mpsc, Arc, Mutex};

use log::{info, warn};

use crate::event::{OthelloClientEvent, OthelloServerEvent, OthelloServerRejection};
use crate::game::Game;
use crate::internal_error_message;
use crate::lobby::{self, LoginError};


#[derive(Debug)]
pub enum IncomingEvent {
    Connected(ClientId),
    Network(ClientId, OthelloClientEvent),
    Disconnected(ClientId),
}


#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClientId(usize);

pub struct Client {
    events_tx: mpsc::Sender<OthelloServerEvent>,
    player_name: Option<String>,
}

impl Client {
    fn send(&self, event: OthelloServerEvent) {
        // A dead peer is dropped silently; its reader thread reports the
        // disconnect separately.
        let _ = self.events_tx.send(event);
    }
}

pub struct Clients {
    map: HashMap<ClientId, Client>,
}

impl Clients {
    pub fn new() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn add_client(&mut self, events_tx: mpsc::Sender<OthelloServerEvent>) -> ClientId {
        let client = Client { events_tx, player_name: None };
        loop {
            let id = ClientId(rand::random::<u64>() as usize);
            match self.map.entry(id) {
                hash_map::Entry::Occupied(_) => {}
                hash_map::Entry::Vacant(e) => {
                    e.insert(client);
                    return id;
                }
            }
        }
    }

    // Returns the display name the client held, if any.
    pub fn remove_client(&mut self, id: ClientId) -> Option<String> {
        self.map.remove(&id).and_then(|client| client.player_name)
    }

    fn broadcast(&self, event: &OthelloServerEvent) {
        for client in self.map.values() {
            client.send(event.clone());
        }
    }

    // Sorted for deterministic broadcasts.
    fn player_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.map.values().filter_map(|client| client.player_name.clone()).collect();
        names.sort();
        names
    }

    fn names_taken_by_others(&self, id: ClientId) -> impl Iterator<Item = &str> {
        self.map
            .iter()
            .filter(move |(other_id, _)| **other_id != id)
            .filter_map(|(_, client)| client.player_name.as_deref())
    }
}

impl ops::Index<ClientId> for Clients {
    type Output = Client;
    fn index(&self, id: ClientId) -> &Self::Output {
        &self.map[&id]
    }
}
impl ops::IndexMut<ClientId> for Clients {
    fn index_mut(&mut self, id: ClientId) -> &mut Self::Output {
        self.map.get_mut(&id).unwrap()
    }
}


// The relay. Owns the last broadcast session explicitly: empty at process
// start, replaced wholesale on each incoming update, never persisted and never
// validated (clients enforce the rules; last write wins).
pub struct ServerState {
    clients: Arc<Mutex<Clients>>,
    game_state: Option<Game>,
}

impl ServerState {
    pub fn new(clients: Arc<Mutex<Clients>>) -> Self {
        ServerState { clients, game_state: None }
    }

    pub fn apply_event(&mut self, event: IncomingEvent) {
        let mut clients = self.clients.lock().unwrap();
        match event {
            IncomingEvent::Connected(client_id) => {
                if !clients.map.contains_key(&client_id) {
                    warn!("{}", internal_error_message!("Unknown client {:?} connected", client_id));
                    return;
                }
                clients[client_id]
                    .send(OthelloServerEvent::StateUpdated { game: self.game_state.clone() });
                clients[client_id]
                    .send(OthelloServerEvent::LoggedInUsersUpdated { users: clients.player_names() });
            }
            IncomingEvent::Network(client_id, event) => {
                if !clients.map.contains_key(&client_id) {
                    warn!("{}", internal_error_message!("Event from unknown client {:?}", client_id));
                    return;
                }
                match event {
                    OthelloClientEvent::Login { player_name } => {
                        let login_result = lobby::validate_player_name(
                            &player_name,
                            clients.names_taken_by_others(client_id),
                        );
                        match login_result {
                            Ok(()) => {
                                info!("Player \"{}\" logged in", player_name);
                                clients[client_id].player_name = Some(player_name);
                                clients.broadcast(&OthelloServerEvent::LoggedInUsersUpdated {
                                    users: clients.player_names(),
                                });
                            }
                            Err(err) => {
                                let rejection = match err {
                                    LoginError::EmptyName => OthelloServerRejection::EmptyPlayerName,
                                    LoginError::NameTaken => {
                                        OthelloServerRejection::PlayerNameTaken { player_name }
                                    }
                                };
                                clients[client_id].send(OthelloServerEvent::Rejection(rejection));
                            }
                        }
                    }
                    OthelloClientEvent::UpdateState { game } => {
                        self.game_state = Some(game);
                        clients.broadcast(&OthelloServerEvent::StateUpdated {
                            game: self.game_state.clone(),
                        });
                    }
                    OthelloClientEvent::Leave => {
                        drop_client(&mut clients, client_id);
                    }
                }
            }
            IncomingEvent::Disconnected(client_id) => {
                drop_client(&mut clients, client_id);
            }
        }
    }
}

fn drop_client(clients: &mut Clients, client_id: ClientId) {
    if let Some(player_name) = clients.remove_client(client_id) {
        info!("Player \"{}\" left", player_name);
        clients
            .broadcast(&OthelloServerEvent::LoggedInUsersUpdated { users: clients.player_names() });
    }
}
