use serde::{Deserialize, Serialize};

use crate::game::Game;


#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OthelloServerRejection {
    // Cannot log in with a blank display name.
    EmptyPlayerName,
    // Cannot log in: another connected client holds this name.
    PlayerNameTaken { player_name: String },
    // Internal error. Should be investigated.
    UnknownError { message: String },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OthelloServerEvent {
    Rejection(OthelloServerRejection),
    // The latest authoritative session, rebroadcast verbatim. `None` is the
    // initial marker a peer gets when nothing has been broadcast yet.
    StateUpdated { game: Option<Game> },
    LoggedInUsersUpdated { users: Vec<String> },
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum OthelloClientEvent {
    Login { player_name: String },
    // Sent on every successful move and on reset. The relay stores and
    // rebroadcasts it without validation.
    UpdateState { game: Game },
    Leave,
}
