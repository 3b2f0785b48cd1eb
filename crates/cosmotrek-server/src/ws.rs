//! WebSocket transport for the diary dispatcher.
//!
//! One listening socket, one thread per client connection. A client asks
//! for a replay with a `start_trip` control frame carrying the diary it
//! was handed by the session layer; the server answers with one
//! `trip_event` frame per entry at animation pace and a single
//! `trip_complete` frame. Errors on one connection never touch another.

use std::io;
use std::net::{TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use cosmotrek_logic::simulation::DiaryEntry;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tungstenite::handshake::HandshakeError;
use tungstenite::protocol::Message;
use tungstenite::{accept, Error as WsError, WebSocket};

use crate::dispatch::{replay, DiarySink, SinkClosed};

/// Inbound control frames.
#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
enum ControlMessage {
    StartTrip { diary: Vec<DiaryEntry> },
}

/// Outbound stream frames.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum StreamMessage<'a> {
    TripEvent { data: &'a DiaryEntry },
    TripComplete,
}

#[derive(Debug, Error)]
pub enum DispatcherError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    WebSocket(#[from] WsError),
}

/// WebSocket dispatcher endpoint.
#[derive(Debug, Clone)]
pub struct WsDispatcher {
    bind_addr: String,
    pace: Duration,
}

impl WsDispatcher {
    pub fn new(bind_addr: impl Into<String>, pace: Duration) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            pace,
        }
    }

    /// Accept connections forever, one replay thread per client.
    pub fn run(&self) -> io::Result<()> {
        let listener = TcpListener::bind(&self.bind_addr)?;
        log::info!("dispatcher listening on ws://{}", self.bind_addr);
        for incoming in listener.incoming() {
            match incoming {
                Ok(stream) => {
                    let pace = self.pace;
                    thread::spawn(move || {
                        if let Err(err) = serve_connection(stream, pace) {
                            log::warn!("connection ended with error: {err}");
                        }
                    });
                }
                Err(err) => log::warn!("failed to accept connection: {err}"),
            }
        }
        Ok(())
    }
}

/// Drive one client until it disconnects.
pub fn serve_connection(stream: TcpStream, pace: Duration) -> Result<(), DispatcherError> {
    let peer = stream.peer_addr().ok();
    let mut websocket = accept(stream).map_err(map_handshake_error)?;
    log::info!("client connected: {peer:?}");

    loop {
        match websocket.read() {
            Ok(Message::Text(text)) => {
                if !handle_control(&mut websocket, &text, pace)? {
                    break;
                }
            }
            Ok(Message::Ping(payload)) => websocket.send(Message::Pong(payload))?,
            Ok(Message::Close(frame)) => {
                // answer the close handshake; the follow-up read reports
                // ConnectionClosed and ends the loop
                match websocket.close(frame) {
                    Ok(()) | Err(WsError::ConnectionClosed) => {}
                    Err(err) => return Err(err.into()),
                }
            }
            Ok(_) => {}
            Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => break,
            Err(err) => return Err(err.into()),
        }
    }

    log::info!("client disconnected: {peer:?}");
    Ok(())
}

/// Parse and act on one inbound text frame. Returns `false` once the
/// client is gone and the connection should wind down.
fn handle_control(
    websocket: &mut WebSocket<TcpStream>,
    text: &str,
    pace: Duration,
) -> Result<bool, DispatcherError> {
    let control: ControlMessage = match serde_json::from_str(text) {
        Ok(control) => control,
        Err(err) => {
            // malformed input is this client's problem only
            log::error!("ignoring malformed control frame: {err}");
            return Ok(true);
        }
    };

    match control {
        ControlMessage::StartTrip { diary } => {
            log::info!("replaying a diary of {} turns", diary.len());
            let mut sink = WsSink { websocket };
            match replay(&mut sink, &diary, pace) {
                Ok(()) => {
                    log::info!("replay complete");
                    Ok(true)
                }
                Err(SinkClosed) => Ok(false),
            }
        }
    }
}

/// Adapts one live WebSocket to the dispatcher's sink trait.
struct WsSink<'a> {
    websocket: &'a mut WebSocket<TcpStream>,
}

impl WsSink<'_> {
    fn send_json(&mut self, message: &StreamMessage<'_>) -> Result<(), SinkClosed> {
        let payload = serde_json::to_string(message).map_err(|_| SinkClosed)?;
        self.websocket
            .send(Message::Text(payload))
            .map_err(|_| SinkClosed)
    }
}

impl DiarySink for WsSink<'_> {
    fn send_entry(&mut self, entry: &DiaryEntry) -> Result<(), SinkClosed> {
        self.send_json(&StreamMessage::TripEvent { data: entry })
    }

    fn send_complete(&mut self) -> Result<(), SinkClosed> {
        self.send_json(&StreamMessage::TripComplete)
    }
}

fn map_handshake_error(
    err: HandshakeError<tungstenite::ServerHandshake<TcpStream, tungstenite::handshake::server::NoCallback>>,
) -> DispatcherError {
    match err {
        HandshakeError::Failure(error) => DispatcherError::WebSocket(error),
        HandshakeError::Interrupted(_) => DispatcherError::Io(io::Error::new(
            io::ErrorKind::Interrupted,
            "websocket handshake interrupted",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmotrek_logic::simulation::ResourceDelta;
    use serde_json::Value;

    fn sample_entry(turn: u32) -> DiaryEntry {
        DiaryEntry {
            turn,
            event_id: "power_surge".to_string(),
            score_delta: -5,
            resources: ResourceDelta {
                energy: 12.5,
                water: 0.0,
                payload_kg: 0.0,
                modules_damaged: 0,
            },
            fatal: false,
        }
    }

    #[test]
    fn control_frame_parses() {
        let text = format!(
            r#"{{"action":"start_trip","diary":[{}]}}"#,
            serde_json::to_string(&sample_entry(1)).unwrap()
        );
        let control: ControlMessage = serde_json::from_str(&text).unwrap();
        let ControlMessage::StartTrip { diary } = control;
        assert_eq!(diary.len(), 1);
        assert_eq!(diary[0].turn, 1);
    }

    #[test]
    fn malformed_control_frame_is_an_error() {
        assert!(serde_json::from_str::<ControlMessage>("not json").is_err());
        assert!(serde_json::from_str::<ControlMessage>(r#"{"action":"warp"}"#).is_err());
    }

    #[test]
    fn stream_frames_have_wire_shape() {
        let entry = sample_entry(3);
        let event = serde_json::to_value(StreamMessage::TripEvent { data: &entry }).unwrap();
        assert_eq!(event["type"], Value::from("trip_event"));
        assert_eq!(event["data"]["turn"], Value::from(3));
        assert_eq!(event["data"]["event_id"], Value::from("power_surge"));

        let complete = serde_json::to_value(StreamMessage::TripComplete).unwrap();
        assert_eq!(complete["type"], Value::from("trip_complete"));
    }

    #[test]
    fn streams_diary_over_a_live_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            serve_connection(stream, Duration::ZERO)
        });

        let (mut socket, _) = tungstenite::connect(format!("ws://{addr}")).unwrap();
        let diary: Vec<DiaryEntry> = (1..=4).map(sample_entry).collect();
        let request = serde_json::json!({ "action": "start_trip", "diary": diary });
        socket
            .send(Message::Text(request.to_string()))
            .unwrap();

        let mut turns = Vec::new();
        loop {
            let message = socket.read().unwrap();
            let Message::Text(text) = message else { continue };
            let value: Value = serde_json::from_str(&text).unwrap();
            match value["type"].as_str() {
                Some("trip_event") => turns.push(value["data"]["turn"].as_u64().unwrap()),
                Some("trip_complete") => break,
                other => panic!("unexpected frame type {other:?}"),
            }
        }
        assert_eq!(turns, vec![1, 2, 3, 4]);

        socket.close(None).unwrap();
        // drain until the close handshake finishes
        loop {
            match socket.read() {
                Ok(_) => continue,
                Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => break,
                Err(err) => panic!("unexpected close error: {err}"),
            }
        }
        server.join().unwrap().unwrap();
    }

    #[test]
    fn malformed_frame_does_not_kill_the_connection() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            serve_connection(stream, Duration::ZERO)
        });

        let (mut socket, _) = tungstenite::connect(format!("ws://{addr}")).unwrap();
        socket
            .send(Message::Text("definitely not json".to_string()))
            .unwrap();

        // the connection survives and still serves a real request
        let request = serde_json::json!({
            "action": "start_trip",
            "diary": [sample_entry(1)],
        });
        socket.send(Message::Text(request.to_string())).unwrap();

        let mut saw_complete = false;
        loop {
            let message = socket.read().unwrap();
            let Message::Text(text) = message else { continue };
            let value: Value = serde_json::from_str(&text).unwrap();
            if value["type"] == Value::from("trip_complete") {
                saw_complete = true;
                break;
            }
        }
        assert!(saw_complete);

        socket.close(None).unwrap();
        loop {
            match socket.read() {
                Ok(_) => continue,
                Err(WsError::ConnectionClosed) | Err(WsError::AlreadyClosed) => break,
                Err(err) => panic!("unexpected close error: {err}"),
            }
        }
        server.join().unwrap().unwrap();
    }
}
