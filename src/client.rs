use std::sync::mpsc;

use crate::coord::Coord;
use crate::event::{OthelloClientEvent, OthelloServerEvent, OthelloServerRejection};
use crate::game::{Game, PlaceError};


#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TurnCommandError {
    NotLoggedIn,
    IllegalMove(PlaceError),
    NoSuchStep,
}

#[derive(Clone, Debug)]
pub enum NotableEvent {
    None,
    StateUpdated,
    UsersUpdated,
    LoginRejected(OthelloServerRejection),
}

// Client-side session mirror. The game starts from the local seeded opening
// and is replaced wholesale by whatever the relay broadcasts, including the
// echo of this client's own updates. Login is optimistic, like the original
// web client: the name is assumed good until the server rejects it.
pub struct ClientState {
    my_name: Option<String>,
    events_tx: mpsc::Sender<OthelloClientEvent>,
    game: Game,
    logged_in_users: Vec<String>,
}

impl ClientState {
    pub fn new(events_tx: mpsc::Sender<OthelloClientEvent>) -> Self {
        ClientState {
            my_name: None,
            events_tx,
            game: Game::standard(),
            logged_in_users: Vec::new(),
        }
    }

    pub fn my_name(&self) -> Option<&str> {
        self.my_name.as_deref()
    }
    pub fn is_logged_in(&self) -> bool {
        self.my_name.is_some()
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn logged_in_users(&self) -> &[String] {
        &self.logged_in_users
    }

    pub fn login(&mut self, name: &str) {
        self.my_name = Some(name.to_owned());
        self.send(OthelloClientEvent::Login { player_name: name.to_owned() });
    }

    pub fn leave(&mut self) {
        self.send(OthelloClientEvent::Leave);
    }

    // Applies the move locally (the session enforces legality), then
    // broadcasts the whole session through the relay.
    pub fn make_move(&mut self, pos: Coord) -> Result<(), TurnCommandError> {
        if !self.is_logged_in() {
            return Err(TurnCommandError::NotLoggedIn);
        }
        self.game.try_move(pos).map_err(TurnCommandError::IllegalMove)?;
        self.broadcast_state();
        Ok(())
    }

    // Local-only, like the original: the rewound state is broadcast when (and
    // if) a move is played from it.
    pub fn jump_to(&mut self, step: usize) -> Result<(), TurnCommandError> {
        if step >= self.game.history().len() {
            return Err(TurnCommandError::NoSuchStep);
        }
        self.game.jump_to(step);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.game.reset();
        self.broadcast_state();
    }

    pub fn process_server_event(&mut self, event: OthelloServerEvent) -> NotableEvent {
        match event {
            OthelloServerEvent::Rejection(rejection) => {
                self.my_name = None;
                NotableEvent::LoginRejected(rejection)
            }
            OthelloServerEvent::StateUpdated { game } => match game {
                Some(game) => {
                    self.game = game;
                    NotableEvent::StateUpdated
                }
                // Nothing broadcast yet: keep the locally seeded game.
                None => NotableEvent::None,
            },
            OthelloServerEvent::LoggedInUsersUpdated { users } => {
                self.logged_in_users = users;
                NotableEvent::UsersUpdated
            }
        }
    }

    fn broadcast_state(&self) {
        self.send(OthelloClientEvent::UpdateState { game: self.game.clone() });
    }

    fn send(&self, event: OthelloClientEvent) {
        // The writer thread going away means the connection is gone; the
        // reader side surfaces that as a fatal event.
        let _ = self.events_tx.send(event);
    }
}
