use std::io;
use std::net::TcpStream;

use serde::{de, Serialize};
use tungstenite::protocol::{Role, WebSocket};
use tungstenite::Message;


pub const PORT: u16 = 8080;


#[derive(Debug)]
pub enum CommunicationError {
    ConnectionClosed,
    Socket(tungstenite::Error),
    Serde(serde_json::Error),
    Protocol(String),
}

pub fn write_obj<T, S>(socket: &mut WebSocket<S>, obj: &T) -> Result<(), CommunicationError>
where
    T: Serialize,
    S: io::Read + io::Write,
{
    let serialized = serde_json::to_string(obj).map_err(CommunicationError::Serde)?;
    socket.send(Message::text(serialized)).map_err(to_communication_error)
}

pub fn read_obj<T, S>(socket: &mut WebSocket<S>) -> Result<T, CommunicationError>
where
    T: de::DeserializeOwned,
    S: io::Read + io::Write,
{
    let msg = socket.read().map_err(to_communication_error)?;
    match msg {
        Message::Text(msg) => serde_json::from_str(msg.as_str()).map_err(CommunicationError::Serde),
        Message::Close(_) => Err(CommunicationError::ConnectionClosed),
        other => Err(CommunicationError::Protocol(format!("Expected text, got {:?}", other))),
    }
}

fn to_communication_error(err: tungstenite::Error) -> CommunicationError {
    match err {
        tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
            CommunicationError::ConnectionClosed
        }
        err => CommunicationError::Socket(err),
    }
}

// A second handle onto the same connection, so reads and writes can live on
// separate threads.
pub fn clone_websocket(
    socket: &WebSocket<TcpStream>, role: Role,
) -> io::Result<WebSocket<TcpStream>> {
    let stream = socket.get_ref().try_clone()?;
    let config = *socket.get_config();
    Ok(WebSocket::from_raw_socket(stream, role, Some(config)))
}
