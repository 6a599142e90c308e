//! # pop-sync
//!
//! Async POP3 client engine for enumerating, fetching and deleting mailbox
//! messages over a strictly sequential session.
//!
//! This crate provides:
//! - A session state machine with `USER`/`PASS` authentication
//! - The full inventory operation set: `LIST`, `TOP`, `RETR`, `DELE` and
//!   composites, plus `STAT`, `UIDL`, `RSET` and `NOOP`
//! - TLS (with optional SOCKS5 proxying) and plaintext connections, with
//!   timeouts imposed at the transport boundary
//! - A [`blocking`] mode mirroring the async API for callers without a
//!   runtime
//!
//! ## Quick Start
//!
//! ```no_run
//! use pop_sync::{Pop3Client, Pop3Config};
//!
//! # async fn example() -> pop_sync::Result<()> {
//! // Configure the client; the POP3 host is discovered from the mail
//! // domain unless set explicitly
//! let config = Pop3Config::builder()
//!     .username("user@gmail.com")
//!     .password("app-password")  // Use app-specific password for Gmail
//!     .build()?;
//!
//! // Connect and authenticate
//! let mut client = Pop3Client::new(config);
//! client.connect().await?;
//!
//! // Enumerate the maildrop and fetch everything
//! let records = client.list_and_retrieve().await?;
//! for record in &records {
//!     println!("message {}: {} bytes", record.sequence_number(), record.size_bytes());
//! }
//!
//! // Clean up
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Fetching headers only
//!
//! ```no_run
//! use pop_sync::{Pop3Client, Pop3Config};
//!
//! # async fn example() -> pop_sync::Result<()> {
//! # let config = Pop3Config::builder().username("a@b.c").password("x").build()?;
//! let mut client = Pop3Client::new(config);
//! client.connect().await?;
//!
//! let mut records = client.list().await?;
//! if let Some(first) = records.first_mut() {
//!     client.retrieve_header(first).await?;
//!     print!("{}", first.raw_header_block());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Session model
//!
//! The protocol is strictly synchronous: one command is outstanding at a
//! time, and every operation runs its command/response exchange to
//! completion before returning. There is no pipelining, no concurrent
//! multiplexing, and no automatic reconnection — a failed operation
//! surfaces immediately and leaves the session wherever it was.
//!
//! Retrieval is append-only: fetching the same message twice accumulates
//! both copies in the record's raw blocks. Message bodies are returned as
//! raw protocol text; dot-stuffed lines are not unescaped and no
//! charset/MIME interpretation is performed.
//!
//! ## Error Handling
//!
//! All errors implement `std::error::Error` and provide context. Use
//! [`Error::is_retryable`] to determine if an operation can be retried:
//!
//! ```
//! use pop_sync::Error;
//!
//! fn handle_error(error: &Error) {
//!     if error.is_retryable() {
//!         println!("Transient error, can retry: {}", error);
//!     } else {
//!         println!("Permanent error: {}", error);
//!     }
//! }
//! ```
//!
//! ## Observability
//!
//! The crate uses `tracing` for instrumentation. All major operations emit
//! spans with structured fields suitable for distributed tracing.
//!
//! ### Span Naming Convention
//!
//! - `Pop3Client::connect` - Connection and authentication
//! - `Pop3Client::list` / `Pop3Client::retrieve` / ... - Inventory operations
//! - `session::connect` / `session::disconnect` - Session state transitions
//! - `transport::open` - Connection establishment
//!
//! ### Standard Fields
//!
//! - `username` - Account name (never the password)
//! - `pop3_host` - POP3 server hostname
//! - `proxy_enabled` - Whether a SOCKS5 proxy is used
//! - `message` - Message sequence number
//!
//! Enable the `observability` feature for OpenTelemetry integration.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
pub mod blocking;
pub mod config;
pub mod error;
pub mod known_servers;
pub mod message;
pub mod proxy;
pub mod transport;

// Internal modules
mod client;
mod command;
mod session;

// Re-exports for ergonomic API
pub use client::Pop3Client;
pub use config::{Pop3Config, Pop3ConfigBuilder, TimeoutConfig, DEFAULT_PORT, DEFAULT_TLS_PORT};
pub use error::{Error, ErrorCategory, Result};
pub use known_servers::ServerRegistry;
pub use message::{MaildropStat, MessageRecord, UniqueIdEntry};
pub use proxy::{ProxyCredentials, Socks5Proxy};
pub use transport::{TcpTransport, Transport};
