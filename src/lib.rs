//! # gredis
//!
//! Synchronous client for the GRedis key-value server:
//! - `gredis://` connection strings with password and database selection
//! - AUTH / SELECT handshake on connect
//! - Per-call read and write deadlines
//! - String, hash and list commands over a RESP-style protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Client (command table)                      │
//! │        set / get / hset / lpush / lrange / ...              │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ execute (mutex held for the round trip)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Session                               │
//! │         send ─ flush (write deadline) ─ receive             │
//! │                    (read deadline)                          │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     Writer      │                │     Reader      │
//!   │ (encode+buffer) │                │    (decode)     │
//!   └────────┬────────┘                └────────┬────────┘
//!            └──────────────┬───────────────────┘
//!                           ▼
//!                   ┌───────────────┐
//!                   │    Stream     │
//!                   │  (TcpStream)  │
//!                   └───────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use gredis::Client;
//!
//! let client = Client::connect("gredis://:secret@localhost:16379/1")?;
//! client.set("greeting", "hello")?;
//! assert_eq!(client.get("greeting")?.as_deref(), Some(&b"hello"[..]));
//! client.close();
//! # Ok::<(), gredis::GredisError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod network;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GredisError, Result};
pub use config::Options;
pub use client::{Client, InsertPosition, NonEmpty};
pub use network::Session;
pub use protocol::{BulkValue, Message};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of gredis
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
