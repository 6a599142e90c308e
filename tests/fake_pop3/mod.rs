//! Fake POP3 server for integration testing
//!
//! This module provides an in-process POP3 server that speaks enough of
//! the protocol to test `Pop3Client` end-to-end:
//!
//! TCP (optionally TLS) -> greeting -> USER/PASS -> transactions -> QUIT
//!
//! ## Module layout
//!
//! - `server` -- TCP listener, optional TLS setup, and the command loop
//! - `maildrop` -- test data model (messages, credentials, builder)

pub mod maildrop;
mod server;

pub use maildrop::MaildropBuilder;
pub use server::FakePop3Server;
