//! Cosmotrek dispatch server.
//!
//! Usage:
//!   cargo run -p cosmotrek-server              # listens on 0.0.0.0:8765
//!   cargo run -p cosmotrek-server -- 127.0.0.1:9000

use cosmotrek_server::dispatch::DEFAULT_PACE;
use cosmotrek_server::ws::WsDispatcher;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let bind_addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "0.0.0.0:8765".to_string());

    let dispatcher = WsDispatcher::new(bind_addr, DEFAULT_PACE);
    if let Err(err) = dispatcher.run() {
        log::error!("dispatcher terminated: {err}");
        std::process::exit(1);
    }
}
