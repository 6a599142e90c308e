//! Internal POP3 session management.
//!
//! This module is the protocol core: the connection state machine, the
//! single-line transaction engine, and the multiline accumulator. Every
//! command reaches the wire through [`Session::execute`]; the inventory
//! operations in [`crate::client`] are thin compositions of the primitives
//! here.

use crate::command::{Command, OK_MARKER, SENTINEL, TERMINATOR};
use crate::error::{Error, Result};
use crate::message::{self, MaildropStat, MessageRecord, UniqueIdEntry};
use crate::transport::Transport;
use tracing::{debug, instrument, trace, warn};

/// Connection status of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    /// Initial and terminal state; no operation except `connect` is valid.
    Disconnected,
    /// Greeting, `USER` and `PASS` all succeeded.
    Authenticated,
}

/// One POP3 session over an exclusively-owned transport.
///
/// The protocol allows a single outstanding command, so every method takes
/// `&mut self` and runs its transaction to completion before returning.
pub(crate) struct Session<T> {
    transport: Option<T>,
    state: State,
}

impl<T: Transport> Session<T> {
    pub(crate) const fn new() -> Self {
        Self {
            transport: None,
            state: State::Disconnected,
        }
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.state == State::Authenticated
    }

    /// Takes ownership of a freshly opened transport and authenticates.
    ///
    /// Reads the server greeting, then runs the `USER` and `PASS`
    /// transactions. Only after all three succeed does the session become
    /// `Authenticated`. A failure partway (greeting rejected, `USER` ok but
    /// `PASS` rejected) leaves the transport in place and the state
    /// `Disconnected`; the transport is released when it is replaced by the
    /// next `connect` or when the session is dropped.
    #[instrument(name = "session::connect", skip_all, fields(username = %username))]
    pub(crate) async fn connect(
        &mut self,
        transport: T,
        username: &str,
        password: &str,
    ) -> Result<()> {
        if self.state == State::Authenticated {
            return Err(Error::AlreadyConnected);
        }
        // Replaces (and thereby drops) a transport left behind by an
        // earlier failed authentication attempt.
        self.transport = Some(transport);

        let greeting = self.read_status().await?;
        debug!(greeting = %greeting.trim_end(), "received server greeting");

        self.execute(Command::User(username)).await?;
        self.execute(Command::Pass(password)).await?;

        self.state = State::Authenticated;
        debug!("authenticated");
        Ok(())
    }

    /// Ends the session.
    ///
    /// A no-op when already disconnected. Otherwise attempts a `QUIT`
    /// transaction, then releases the transport and resets the state
    /// regardless of the `QUIT` outcome; a failing `QUIT` is logged and
    /// discarded. This is the one place a protocol error is swallowed.
    #[instrument(name = "session::disconnect", skip_all)]
    pub(crate) async fn disconnect(&mut self) -> Result<()> {
        if self.state == State::Disconnected {
            return Ok(());
        }

        if let Err(error) = self.execute(Command::Quit).await {
            warn!(error = %error, "QUIT failed; closing transport anyway");
        }

        if let Some(mut transport) = self.transport.take() {
            if let Err(error) = transport.close().await {
                debug!(error = %error, "transport close failed");
            }
        }
        self.state = State::Disconnected;
        debug!("disconnected");
        Ok(())
    }

    /// Runs one command/response transaction.
    ///
    /// Formats the command line, writes it, reads exactly one response line
    /// and classifies it: anything whose first three characters are not
    /// `+OK` — including an empty or missing response — fails with
    /// [`Error::Protocol`] carrying the raw text. This is the sole path by
    /// which commands reach the wire.
    pub(crate) async fn execute(&mut self, command: Command<'_>) -> Result<String> {
        trace!(command = command.name(), "issuing transaction");

        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        let line = format!("{command}{TERMINATOR}");
        transport.write_line(&line).await?;

        self.read_status().await
    }

    /// Reads one status line and requires the success marker.
    async fn read_status(&mut self) -> Result<String> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        let line = match transport.read_line().await {
            Ok(line) => line,
            // A missing response is a protocol failure with an empty payload,
            // not a transport error: the server spoke, just not to us.
            Err(Error::Closed) => String::new(),
            Err(error) => return Err(error),
        };

        if !line.starts_with(OK_MARKER) {
            return Err(Error::Protocol { response: line });
        }
        Ok(line)
    }

    /// Accumulates a multiline reply into an ordered sequence of lines.
    ///
    /// Reads until the sentinel line (a single dot plus terminator), which
    /// is not included in the result. Dot-stuffed lines are passed through
    /// verbatim.
    pub(crate) async fn collect(&mut self) -> Result<Vec<String>> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        let mut lines = Vec::new();
        loop {
            let line = transport.read_line().await?;
            if line == SENTINEL {
                return Ok(lines);
            }
            lines.push(line);
        }
    }

    /// Accumulates a multiline reply by appending each line to `block`.
    ///
    /// Lines are appended as they arrive, so a transport failure mid-reply
    /// leaves the lines received so far in place and the sentinel unseen.
    pub(crate) async fn collect_into(&mut self, block: &mut String) -> Result<()> {
        let transport = self.transport.as_mut().ok_or(Error::NotConnected)?;
        loop {
            let line = transport.read_line().await?;
            if line == SENTINEL {
                return Ok(());
            }
            block.push_str(&line);
        }
    }

    fn ensure_authenticated(&self) -> Result<()> {
        match self.state {
            State::Authenticated => Ok(()),
            State::Disconnected => Err(Error::NotConnected),
        }
    }

    /// `LIST`: enumerates the maildrop into fresh records, server order.
    pub(crate) async fn list(&mut self) -> Result<Vec<MessageRecord>> {
        self.ensure_authenticated()?;
        self.execute(Command::List).await?;
        let lines = self.collect().await?;
        lines
            .iter()
            .map(|line| message::parse_listing_line(line))
            .collect()
    }

    /// `TOP n 0`: appends the header block to the record.
    pub(crate) async fn retrieve_header(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.ensure_authenticated()?;
        self.execute(Command::Top {
            message: record.sequence_number(),
            lines: 0,
        })
        .await?;
        self.collect_into(record.header_block_mut()).await
    }

    /// `RETR n`: appends the full message to the record and marks it
    /// retrieved once the reply has been accumulated completely.
    pub(crate) async fn retrieve(&mut self, record: &mut MessageRecord) -> Result<()> {
        self.ensure_authenticated()?;
        self.execute(Command::Retr(record.sequence_number())).await?;
        self.collect_into(record.body_block_mut()).await?;
        record.mark_retrieved();
        Ok(())
    }

    /// `DELE n`: asks the server to mark the message for deletion at session
    /// end. No local state changes.
    pub(crate) async fn delete(&mut self, record: &MessageRecord) -> Result<()> {
        self.ensure_authenticated()?;
        self.execute(Command::Dele(record.sequence_number())).await?;
        Ok(())
    }

    /// `STAT`: maildrop summary from the status line itself.
    pub(crate) async fn stat(&mut self) -> Result<MaildropStat> {
        self.ensure_authenticated()?;
        let status = self.execute(Command::Stat).await?;
        message::parse_stat_response(&status)
    }

    /// `UIDL`: unique-id listing, server order.
    pub(crate) async fn list_unique_ids(&mut self) -> Result<Vec<UniqueIdEntry>> {
        self.ensure_authenticated()?;
        self.execute(Command::Uidl).await?;
        let lines = self.collect().await?;
        lines
            .iter()
            .map(|line| message::parse_unique_id_line(line))
            .collect()
    }

    /// `RSET`: unmarks any messages marked for deletion in this session.
    pub(crate) async fn reset(&mut self) -> Result<()> {
        self.ensure_authenticated()?;
        self.execute(Command::Rset).await?;
        Ok(())
    }

    /// `NOOP`: keepalive.
    pub(crate) async fn noop(&mut self) -> Result<()> {
        self.ensure_authenticated()?;
        self.execute(Command::Noop).await?;
        Ok(())
    }
}
