// Library root: shared data model, configuration, wire protocol, local
// storage and the WebSocket transport used by the other schoolhub crates.

pub mod config;
pub mod db;
pub mod models;
pub mod protocol;
pub mod ws_client;
