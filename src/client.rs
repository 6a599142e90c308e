//! Async POP3 client for mailbox inventory and retrieval.
//!
//! The [`Pop3Client`] is the main entry point for this crate. It provides
//! async methods to:
//!
//! - Connect to and authenticate against a POP3 server
//! - Enumerate the maildrop and fetch message headers or full bodies
//! - Mark messages for deletion
//!
//! # Example
//!
//! ```no_run
//! use pop_sync::{Pop3Client, Pop3Config};
//!
//! # async fn example() -> pop_sync::Result<()> {
//! let config = Pop3Config::builder()
//!     .username("user@gmail.com")
//!     .password("app-password")
//!     .build()?;
//!
//! let mut client = Pop3Client::new(config);
//! client.connect().await?;
//!
//! let mut records = client.list().await?;
//! for record in &mut records {
//!     client.retrieve_header(record).await?;
//!     println!("{}: {} bytes", record.sequence_number(), record.size_bytes());
//! }
//!
//! client.disconnect().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::Pop3Config;
use crate::error::Result;
use crate::message::{MaildropStat, MessageRecord, UniqueIdEntry};
use crate::session::Session;
use crate::transport::TcpTransport;
use tracing::{debug, instrument};

/// Async POP3 client over a single, strictly sequential session.
///
/// Create with [`Pop3Client::new`], then [`connect`](Self::connect). All
/// operations run one command at a time — the protocol has no notion of a
/// second in-flight exchange — and require an authenticated session.
///
/// # Lifecycle
///
/// 1. Create a client with [`new`](Self::new)
/// 2. Call [`connect`](Self::connect) to authenticate
/// 3. Use the inventory operations ([`list`](Self::list),
///    [`retrieve`](Self::retrieve), [`delete`](Self::delete), ...)
/// 4. Call [`disconnect`](Self::disconnect) when done; dropping the client
///    closes the connection without a `QUIT`
///
/// # Example
///
/// ```no_run
/// use pop_sync::{Pop3Client, Pop3Config};
///
/// # async fn example() -> pop_sync::Result<()> {
/// let config = Pop3Config::builder()
///     .username("user@example.com")
///     .password("secret")
///     .build()?;
///
/// let mut client = Pop3Client::new(config);
/// client.connect().await?;
/// let records = client.list_and_retrieve().await?;
/// client.disconnect().await?;
/// # Ok(())
/// # }
/// ```
pub struct Pop3Client {
    session: Session<TcpTransport>,
    config: Pop3Config,
}

impl Pop3Client {
    /// Creates a client for the given configuration. No I/O happens until
    /// [`connect`](Self::connect).
    #[must_use]
    pub const fn new(config: Pop3Config) -> Self {
        Self {
            session: Session::new(),
            config,
        }
    }

    /// Connects to the server and authenticates with `USER`/`PASS`.
    ///
    /// Opens the transport (TCP, optionally TLS and/or SOCKS5 per the
    /// configuration), checks the server greeting, then authenticates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AlreadyConnected`](crate::Error::AlreadyConnected)
    /// when called on a connected client (the existing transport is left
    /// untouched). Otherwise fails if the connection cannot be established,
    /// the greeting is not a success status, or either credential is
    /// rejected. A rejected `PASS` leaves the connection open but the
    /// session unauthenticated; a subsequent `connect` replaces it.
    #[instrument(
        name = "Pop3Client::connect",
        skip_all,
        fields(
            username = %self.config.username(),
            pop3_host = %self.config.effective_host(),
            proxy_enabled = self.config.proxy.is_some()
        )
    )]
    pub async fn connect(&mut self) -> Result<()> {
        if self.session.is_authenticated() {
            return Err(crate::Error::AlreadyConnected);
        }

        let transport = TcpTransport::open(&self.config).await?;
        self.session
            .connect(transport, self.config.username(), self.config.password())
            .await?;

        debug!("client connected and ready");
        Ok(())
    }

    /// Ends the session with `QUIT` and closes the connection.
    ///
    /// A no-op on an already-disconnected client: no command is issued and
    /// no error raised. The connection is closed and the session reset even
    /// if the `QUIT` transaction fails (the failure is logged and
    /// discarded).
    ///
    /// # Errors
    ///
    /// Currently never fails; the `Result` keeps room for transports whose
    /// teardown can.
    #[instrument(name = "Pop3Client::disconnect", skip_all)]
    pub async fn disconnect(&mut self) -> Result<()> {
        self.session.disconnect().await
    }

    /// Enumerates the maildrop with `LIST`.
    ///
    /// Returns one [`MessageRecord`] per message, in server order, with
    /// sequence number and size filled in and nothing retrieved yet.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::NotConnected`](crate::Error::NotConnected) when
    /// unauthenticated, with a protocol error if the server rejects the
    /// command, or with a parse error on a malformed listing line.
    #[instrument(name = "Pop3Client::list", skip_all)]
    pub async fn list(&mut self) -> Result<Vec<MessageRecord>> {
        let records = self.session.list().await?;
        debug!(message_count = records.len(), "listed maildrop");
        Ok(records)
    }

    /// Fetches the header block of one message with `TOP n 0`.
    ///
    /// The header lines are *appended* to the record's
    /// [`raw_header_block`](MessageRecord::raw_header_block); fetching twice
    /// accumulates both copies. Dot-stuffed lines are not unescaped.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated, when the server rejects the command, or
    /// when the transport fails mid-reply (already-received lines stay in
    /// the record).
    #[instrument(
        name = "Pop3Client::retrieve_header",
        skip_all,
        fields(message = record.sequence_number())
    )]
    pub async fn retrieve_header(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.session.retrieve_header(record).await
    }

    /// Fetches header blocks for each record in order.
    ///
    /// Stops at the first failure; earlier records keep what they received,
    /// later ones are untouched. No partial-success aggregation.
    ///
    /// # Errors
    ///
    /// Same conditions as [`retrieve_header`](Self::retrieve_header).
    #[instrument(
        name = "Pop3Client::retrieve_headers",
        skip_all,
        fields(message_count = records.len())
    )]
    pub async fn retrieve_headers(&mut self, records: &mut [MessageRecord]) -> Result<()> {
        for record in records {
            self.session.retrieve_header(record).await?;
        }
        Ok(())
    }

    /// Fetches the full message with `RETR n`.
    ///
    /// The message lines are *appended* to the record's
    /// [`raw_body_block`](MessageRecord::raw_body_block), and
    /// [`retrieved`](MessageRecord::retrieved) is set only after the whole
    /// reply (including the sentinel) has arrived. Dot-stuffed lines are
    /// not unescaped.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated, when the server rejects the command, or
    /// when the transport fails mid-reply — in which case the record keeps
    /// the lines received so far and `retrieved` stays `false`.
    #[instrument(
        name = "Pop3Client::retrieve",
        skip_all,
        fields(message = record.sequence_number())
    )]
    pub async fn retrieve(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.session.retrieve(record).await
    }

    /// Fetches full messages for each record in order.
    ///
    /// Stops at the first failure, like
    /// [`retrieve_headers`](Self::retrieve_headers).
    ///
    /// # Errors
    ///
    /// Same conditions as [`retrieve`](Self::retrieve).
    #[instrument(
        name = "Pop3Client::retrieve_all",
        skip_all,
        fields(message_count = records.len())
    )]
    pub async fn retrieve_all(&mut self, records: &mut [MessageRecord]) -> Result<()> {
        for record in records {
            self.session.retrieve(record).await?;
        }
        Ok(())
    }

    /// Marks one message for deletion with `DELE n`.
    ///
    /// The server removes it when the session ends with `QUIT`; nothing
    /// changes on the record itself.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated or when the server rejects the command.
    #[instrument(
        name = "Pop3Client::delete",
        skip_all,
        fields(message = record.sequence_number())
    )]
    pub async fn delete(&mut self, record: &MessageRecord) -> Result<()> {
        self.session.delete(record).await
    }

    /// Enumerates the maildrop and fetches every header block.
    ///
    /// Composes [`list`](Self::list) with
    /// [`retrieve_headers`](Self::retrieve_headers) and returns the
    /// populated records.
    ///
    /// # Errors
    ///
    /// Same conditions as the composed operations.
    #[instrument(name = "Pop3Client::list_and_retrieve_header", skip_all)]
    pub async fn list_and_retrieve_header(&mut self) -> Result<Vec<MessageRecord>> {
        let mut records = self.session.list().await?;
        self.retrieve_headers(&mut records).await?;
        Ok(records)
    }

    /// Enumerates the maildrop and fetches every full message.
    ///
    /// Composes [`list`](Self::list) with
    /// [`retrieve_all`](Self::retrieve_all) and returns the populated
    /// records.
    ///
    /// # Errors
    ///
    /// Same conditions as the composed operations.
    #[instrument(name = "Pop3Client::list_and_retrieve", skip_all)]
    pub async fn list_and_retrieve(&mut self) -> Result<Vec<MessageRecord>> {
        let mut records = self.session.list().await?;
        self.retrieve_all(&mut records).await?;
        Ok(records)
    }

    /// Fetches the maildrop summary with `STAT`.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated, when the server rejects the command, or
    /// when the status line does not carry a count and size.
    #[instrument(name = "Pop3Client::stat", skip_all)]
    pub async fn stat(&mut self) -> Result<MaildropStat> {
        self.session.stat().await
    }

    /// Fetches the unique-id listing with `UIDL`.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated, when the server rejects the command, or
    /// on a malformed listing line.
    #[instrument(name = "Pop3Client::list_unique_ids", skip_all)]
    pub async fn list_unique_ids(&mut self) -> Result<Vec<UniqueIdEntry>> {
        self.session.list_unique_ids().await
    }

    /// Unmarks any messages marked for deletion with `RSET`.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated or when the server rejects the command.
    #[instrument(name = "Pop3Client::reset", skip_all)]
    pub async fn reset(&mut self) -> Result<()> {
        self.session.reset().await
    }

    /// Sends a `NOOP` keepalive.
    ///
    /// # Errors
    ///
    /// Fails when unauthenticated or when the server rejects the command.
    #[instrument(name = "Pop3Client::noop", skip_all)]
    pub async fn noop(&mut self) -> Result<()> {
        self.session.noop().await
    }

    /// Returns `true` while the session is authenticated.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Returns the account name used for this connection.
    #[must_use]
    pub fn username(&self) -> &str {
        self.config.username()
    }

    /// Returns the POP3 host used for this connection.
    #[must_use]
    pub fn host(&self) -> String {
        self.config.effective_host()
    }
}

impl std::fmt::Debug for Pop3Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pop3Client")
            .field("username", &self.config.username())
            .field("pop3_host", &self.config.effective_host())
            .field("connected", &self.is_connected())
            .finish_non_exhaustive()
    }
}
