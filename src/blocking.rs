//! Blocking mode for callers without an async runtime.
//!
//! [`Pop3Client`] here mirrors the async [`crate::Pop3Client`] method for
//! method; each call drives the same protocol implementation to completion
//! on an owned single-threaded runtime, so the two modes are semantically
//! identical — the only difference is that the caller's thread blocks at
//! the transport I/O points instead of suspending.
//!
//! # Example
//!
//! ```no_run
//! use pop_sync::{blocking, Pop3Config};
//!
//! # fn example() -> pop_sync::Result<()> {
//! let config = Pop3Config::builder()
//!     .username("user@example.com")
//!     .password("secret")
//!     .build()?;
//!
//! let mut client = blocking::Pop3Client::new(config)?;
//! client.connect()?;
//! let records = client.list_and_retrieve_header()?;
//! client.disconnect()?;
//! # Ok(())
//! # }
//! ```
//!
//! Do not use this type from inside an async context; blocking a runtime
//! worker thread stalls every task scheduled on it.

use crate::config::Pop3Config;
use crate::error::{Error, Result};
use crate::message::{MaildropStat, MessageRecord, UniqueIdEntry};

/// Blocking POP3 client.
///
/// Thin facade over the async [`crate::Pop3Client`]: there is exactly one
/// protocol implementation, and this type only changes how it is driven.
#[derive(Debug)]
pub struct Pop3Client {
    inner: crate::Pop3Client,
    runtime: tokio::runtime::Runtime,
}

impl Pop3Client {
    /// Creates a blocking client for the given configuration.
    ///
    /// # Errors
    ///
    /// Fails if the backing single-threaded runtime cannot be created.
    pub fn new(config: Pop3Config) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| Error::Io { source })?;

        Ok(Self {
            inner: crate::Pop3Client::new(config),
            runtime,
        })
    }

    /// Connects and authenticates. See [`crate::Pop3Client::connect`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn connect(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.connect())
    }

    /// Ends the session. See [`crate::Pop3Client::disconnect`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn disconnect(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.disconnect())
    }

    /// Enumerates the maildrop. See [`crate::Pop3Client::list`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn list(&mut self) -> Result<Vec<MessageRecord>> {
        self.runtime.block_on(self.inner.list())
    }

    /// Fetches one header block. See [`crate::Pop3Client::retrieve_header`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn retrieve_header(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.runtime.block_on(self.inner.retrieve_header(record))
    }

    /// Fetches header blocks in order, stopping at the first failure.
    /// See [`crate::Pop3Client::retrieve_headers`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn retrieve_headers(&mut self, records: &mut [MessageRecord]) -> Result<()> {
        self.runtime.block_on(self.inner.retrieve_headers(records))
    }

    /// Fetches one full message. See [`crate::Pop3Client::retrieve`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn retrieve(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.runtime.block_on(self.inner.retrieve(record))
    }

    /// Fetches full messages in order, stopping at the first failure.
    /// See [`crate::Pop3Client::retrieve_all`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn retrieve_all(&mut self, records: &mut [MessageRecord]) -> Result<()> {
        self.runtime.block_on(self.inner.retrieve_all(records))
    }

    /// Marks one message for deletion. See [`crate::Pop3Client::delete`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn delete(&mut self, record: &MessageRecord) -> Result<()> {
        self.runtime.block_on(self.inner.delete(record))
    }

    /// Lists and fetches every header block.
    /// See [`crate::Pop3Client::list_and_retrieve_header`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn list_and_retrieve_header(&mut self) -> Result<Vec<MessageRecord>> {
        self.runtime.block_on(self.inner.list_and_retrieve_header())
    }

    /// Lists and fetches every full message.
    /// See [`crate::Pop3Client::list_and_retrieve`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn list_and_retrieve(&mut self) -> Result<Vec<MessageRecord>> {
        self.runtime.block_on(self.inner.list_and_retrieve())
    }

    /// Fetches the maildrop summary. See [`crate::Pop3Client::stat`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn stat(&mut self) -> Result<MaildropStat> {
        self.runtime.block_on(self.inner.stat())
    }

    /// Fetches the unique-id listing.
    /// See [`crate::Pop3Client::list_unique_ids`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn list_unique_ids(&mut self) -> Result<Vec<UniqueIdEntry>> {
        self.runtime.block_on(self.inner.list_unique_ids())
    }

    /// Unmarks messages marked for deletion. See [`crate::Pop3Client::reset`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn reset(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.reset())
    }

    /// Sends a keepalive. See [`crate::Pop3Client::noop`].
    ///
    /// # Errors
    ///
    /// Same conditions as the async counterpart.
    pub fn noop(&mut self) -> Result<()> {
        self.runtime.block_on(self.inner.noop())
    }

    /// Returns `true` while the session is authenticated.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.inner.is_connected()
    }

    /// Returns the account name used for this connection.
    #[must_use]
    pub fn username(&self) -> &str {
        self.inner.username()
    }
}
