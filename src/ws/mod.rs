//! WebSocket layer: upgrade handling and per-connection read/write loops.
//!
//! The WebSocket endpoint at `/ws` registers each client as a listener of
//! the hub. Every record creation is pushed to it as a `{type, data}`
//! envelope; text it sends is relayed to all listeners as a `message`.

pub mod connection;
pub mod handler;
