//! # netmon-gateway
//!
//! REST API and WebSocket gateway for monitoring network elements.
//!
//! Clients keep an inventory of network elements, record metric samples
//! against them, and raise and resolve alerts. Every creation is pushed to
//! all connected WebSocket listeners as a typed envelope, and text a
//! listener sends is relayed to every listener.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/) ──► InboundRelay (domain/)
//!     │                              │
//!     ├── RecordService (service/)   │
//!     │         │                    ▼
//!     │         └──────────────► Hub (domain/) ──► listener queues
//!     │
//!     └── RecordStore (persistence/): in-memory or PostgreSQL
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod ws;
