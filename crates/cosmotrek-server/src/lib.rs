//! Mission service and real-time dispatcher for Cosmotrek.
//!
//! The session layer confirms departures through [`service::MissionService`],
//! which runs missions to completion synchronously. Completed diaries are
//! then replayed to connected clients at animation pace by [`dispatch`],
//! with [`ws`] providing the WebSocket transport binding.

pub mod dispatch;
pub mod service;
pub mod ws;
