//! Paced replay of a completed mission diary.
//!
//! The simulator always runs to completion before anything is sent; this
//! module only replays finished data. Entries go out strictly in turn
//! order with a fixed delay between them, and exactly one completion
//! signal follows the last entry. The sink trait keeps the pacing loop
//! transport-agnostic: the WebSocket binding implements it, and tests use
//! an in-memory recorder.

use std::thread;
use std::time::Duration;

use cosmotrek_logic::simulation::DiaryEntry;
use thiserror::Error;

/// Default delay between consecutive diary entries.
pub const DEFAULT_PACE: Duration = Duration::from_secs(2);

/// The client went away; its stream stops and nobody else is affected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("client connection closed")]
pub struct SinkClosed;

/// Outbound half of one client connection.
pub trait DiarySink {
    fn send_entry(&mut self, entry: &DiaryEntry) -> Result<(), SinkClosed>;
    fn send_complete(&mut self) -> Result<(), SinkClosed>;
}

/// Replay `diary` into `sink`, pausing `pace` after each entry.
///
/// Returns `Err` as soon as the sink reports the connection closed; no
/// completion signal is sent in that case and no timer is left behind —
/// the loop simply unwinds.
pub fn replay(sink: &mut impl DiarySink, diary: &[DiaryEntry], pace: Duration) -> Result<(), SinkClosed> {
    for entry in diary {
        sink.send_entry(entry)?;
        if !pace.is_zero() {
            thread::sleep(pace);
        }
    }
    sink.send_complete()
}
