use std::sync::{mpsc, Arc, Mutex};

use pretty_assertions::assert_eq;

use othello_online::client::{ClientState, NotableEvent, TurnCommandError};
use othello_online::coord::Coord;
use othello_online::event::{OthelloClientEvent, OthelloServerEvent, OthelloServerRejection};
use othello_online::game::PlaceError;
use othello_online::server::{ClientId, Clients, IncomingEvent, ServerState};


fn coord(s: &str) -> Coord {
    Coord::from_algebraic(s).unwrap()
}


struct Server {
    clients: Arc<Mutex<Clients>>,
    state: ServerState,
}

impl Server {
    fn new() -> Self {
        let clients = Arc::new(Mutex::new(Clients::new()));
        let state = ServerState::new(Arc::clone(&clients));
        Server { clients, state }
    }

    fn connect(&mut self) -> (ClientId, mpsc::Receiver<OthelloServerEvent>) {
        let (tx, rx) = mpsc::channel();
        let id = self.clients.lock().unwrap().add_client(tx);
        self.state.apply_event(IncomingEvent::Connected(id));
        (id, rx)
    }

    fn send_network_event(&mut self, id: ClientId, event: OthelloClientEvent) {
        self.state.apply_event(IncomingEvent::Network(id, event));
    }

    fn disconnect(&mut self, id: ClientId) {
        self.state.apply_event(IncomingEvent::Disconnected(id));
    }
}

// A client-state instance wired to the in-process server through plain
// channels, standing in for the websocket reader/writer threads.
struct TestClient {
    id: ClientId,
    state: ClientState,
    outgoing_rx: mpsc::Receiver<OthelloClientEvent>,
    incoming_rx: mpsc::Receiver<OthelloServerEvent>,
}

impl TestClient {
    fn new(server: &mut Server) -> Self {
        let (id, incoming_rx) = server.connect();
        let (outgoing_tx, outgoing_rx) = mpsc::channel();
        TestClient {
            id,
            state: ClientState::new(outgoing_tx),
            outgoing_rx,
            incoming_rx,
        }
    }

    // Delivers everything this client has queued to the server.
    fn flush_outgoing(&mut self, server: &mut Server) {
        while let Ok(ev) = self.outgoing_rx.try_recv() {
            server.send_network_event(self.id, ev);
        }
    }

    // Applies everything the server has queued for this client.
    fn process_incoming(&mut self) -> Vec<NotableEvent> {
        let mut notable = Vec::new();
        while let Ok(ev) = self.incoming_rx.try_recv() {
            notable.push(self.state.process_server_event(ev));
        }
        notable
    }
}


#[test]
fn first_connect_receives_initial_marker() {
    let mut server = Server::new();
    let (_, rx) = server.connect();
    assert_eq!(rx.try_recv().unwrap(), OthelloServerEvent::StateUpdated { game: None });
    assert_eq!(
        rx.try_recv().unwrap(),
        OthelloServerEvent::LoggedInUsersUpdated { users: vec![] }
    );
    assert!(rx.try_recv().is_err());
}

#[test]
fn login_broadcasts_user_list() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();
    assert_eq!(alice.state.logged_in_users(), ["alice"]);
    assert_eq!(bob.state.logged_in_users(), ["alice"]);

    bob.state.login("bob");
    bob.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();
    assert_eq!(alice.state.logged_in_users(), ["alice", "bob"]);
    assert_eq!(bob.state.logged_in_users(), ["alice", "bob"]);
    assert!(alice.state.is_logged_in());
    assert!(bob.state.is_logged_in());
}

#[test]
fn empty_name_rejected_to_requester_only() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("");
    alice.flush_outgoing(&mut server);
    let notable = alice.process_incoming();
    assert!(matches!(
        notable[..],
        [NotableEvent::LoginRejected(OthelloServerRejection::EmptyPlayerName)]
    ));
    assert!(!alice.state.is_logged_in());
    // Nothing was broadcast to the peer.
    assert!(bob.incoming_rx.try_recv().is_err());
}

#[test]
fn duplicate_name_rejected() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut impostor = TestClient::new(&mut server);
    alice.process_incoming();
    impostor.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    impostor.process_incoming();

    impostor.state.login("alice");
    impostor.flush_outgoing(&mut server);
    let notable = impostor.process_incoming();
    assert!(matches!(
        notable[..],
        [NotableEvent::LoginRejected(OthelloServerRejection::PlayerNameTaken { .. })]
    ));
    assert!(!impostor.state.is_logged_in());
    assert_eq!(alice.state.logged_in_users(), ["alice"]);
}

#[test]
fn relogin_with_own_name_is_idempotent_and_rename_works() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    alice.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    alice.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    let notable = alice.process_incoming();
    assert!(!notable.iter().any(|ev| matches!(ev, NotableEvent::LoginRejected(_))));
    assert_eq!(alice.state.logged_in_users(), ["alice"]);

    alice.state.login("alicia");
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    assert_eq!(alice.state.logged_in_users(), ["alicia"]);
}

#[test]
fn move_broadcast_replaces_every_peer_state() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.make_move(coord("c4")).unwrap();
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    assert_eq!(alice.state.game().step_number(), 1);
    assert_eq!(bob.state.game(), alice.state.game());
}

#[test]
fn late_joiner_receives_last_broadcast_state() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    alice.process_incoming();
    alice.state.login("alice");
    alice.state.make_move(coord("c4")).unwrap();
    alice.flush_outgoing(&mut server);
    alice.process_incoming();

    let mut carol = TestClient::new(&mut server);
    let notable = carol.process_incoming();
    assert!(notable.iter().any(|ev| matches!(ev, NotableEvent::StateUpdated)));
    assert_eq!(carol.state.game(), alice.state.game());
    assert_eq!(carol.state.logged_in_users(), ["alice"]);
}

#[test]
fn disconnect_frees_the_name() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    bob.process_incoming();
    assert_eq!(bob.state.logged_in_users(), ["alice"]);

    server.disconnect(alice.id);
    bob.process_incoming();
    assert!(bob.state.logged_in_users().is_empty());

    bob.state.login("alice");
    bob.flush_outgoing(&mut server);
    let notable = bob.process_incoming();
    assert!(!notable.iter().any(|ev| matches!(ev, NotableEvent::LoginRejected(_))));
    assert_eq!(bob.state.logged_in_users(), ["alice"]);
}

#[test]
fn leave_event_behaves_like_disconnect() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("alice");
    alice.flush_outgoing(&mut server);
    bob.process_incoming();

    alice.state.leave();
    alice.flush_outgoing(&mut server);
    bob.process_incoming();
    assert!(bob.state.logged_in_users().is_empty());
}

#[test]
fn reset_broadcasts_a_fresh_session() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    let mut bob = TestClient::new(&mut server);
    alice.process_incoming();
    bob.process_incoming();

    alice.state.login("alice");
    alice.state.make_move(coord("c4")).unwrap();
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();
    assert_eq!(bob.state.game().step_number(), 1);

    alice.state.reset();
    alice.flush_outgoing(&mut server);
    alice.process_incoming();
    bob.process_incoming();
    assert_eq!(bob.state.game().step_number(), 0);
    assert_eq!(bob.state.game().history().len(), 1);
    assert_eq!(bob.state.game(), alice.state.game());
}

#[test]
fn moves_require_login() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    alice.process_incoming();

    assert_eq!(alice.state.make_move(coord("c4")), Err(TurnCommandError::NotLoggedIn));
    assert!(alice.outgoing_rx.try_recv().is_err());
}

#[test]
fn illegal_moves_are_not_broadcast() {
    let mut server = Server::new();
    let mut alice = TestClient::new(&mut server);
    alice.process_incoming();

    alice.state.login("alice");
    assert_eq!(
        alice.state.make_move(coord("a1")),
        Err(TurnCommandError::IllegalMove(PlaceError::NoStonesFlipped))
    );
    assert_eq!(
        alice.state.make_move(coord("d4")),
        Err(TurnCommandError::IllegalMove(PlaceError::Occupied))
    );
    // Only the login left the client.
    assert!(matches!(
        alice.outgoing_rx.try_recv(),
        Ok(OthelloClientEvent::Login { .. })
    ));
    assert!(alice.outgoing_rx.try_recv().is_err());
}
