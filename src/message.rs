//! Client-side representations of maildrop entries and reply parsing.

use crate::command::OK_MARKER;
use crate::error::{Error, Result};

/// One server-reported mailbox entry.
///
/// Records are created by a `LIST` scan and owned by the caller; retrieval
/// operations borrow them mutably to fill in the raw header/body blocks.
///
/// The raw blocks are append-only: fetching the same message again appends
/// the new lines after the previous ones rather than replacing them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    sequence_number: u32,
    size_bytes: u64,
    retrieved: bool,
    raw_header_block: String,
    raw_body_block: String,
}

impl MessageRecord {
    pub(crate) fn new(sequence_number: u32, size_bytes: u64) -> Self {
        Self {
            sequence_number,
            size_bytes,
            retrieved: false,
            raw_header_block: String::new(),
            raw_body_block: String::new(),
        }
    }

    /// The server-assigned message number, stable for the session.
    #[must_use]
    pub const fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// The message size in bytes as reported by the server.
    #[must_use]
    pub const fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// `true` once a full-body retrieval has completed successfully.
    #[must_use]
    pub const fn retrieved(&self) -> bool {
        self.retrieved
    }

    /// The accumulated header text, terminators included.
    ///
    /// Empty until a header retrieval succeeds.
    #[must_use]
    pub fn raw_header_block(&self) -> &str {
        &self.raw_header_block
    }

    /// The accumulated full-message text, terminators included.
    ///
    /// Empty until a full retrieval succeeds.
    #[must_use]
    pub fn raw_body_block(&self) -> &str {
        &self.raw_body_block
    }

    pub(crate) fn header_block_mut(&mut self) -> &mut String {
        &mut self.raw_header_block
    }

    pub(crate) fn body_block_mut(&mut self) -> &mut String {
        &mut self.raw_body_block
    }

    pub(crate) fn mark_retrieved(&mut self) {
        self.retrieved = true;
    }
}

/// Maildrop summary returned by `STAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaildropStat {
    /// Number of messages in the maildrop.
    pub message_count: u32,
    /// Total size of the maildrop in bytes.
    pub total_size_bytes: u64,
}

/// One line of a `UIDL` unique-id listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIdEntry {
    /// The message number the unique id belongs to.
    pub sequence_number: u32,
    /// The server-assigned unique id, stable across sessions.
    pub unique_id: String,
}

/// Parses one `LIST` scan line, `"<msg> <size>"`.
pub(crate) fn parse_listing_line(line: &str) -> Result<MessageRecord> {
    let malformed = || Error::MalformedListing {
        line: line.to_string(),
    };

    let (number, size) = line.trim_end().split_once(' ').ok_or_else(malformed)?;
    let sequence_number: u32 = number.parse().map_err(|_| malformed())?;
    let size_bytes: u64 = size.parse().map_err(|_| malformed())?;
    if sequence_number == 0 {
        return Err(malformed());
    }

    Ok(MessageRecord::new(sequence_number, size_bytes))
}

/// Parses a `STAT` status line, `"+OK <count> <size>"`.
pub(crate) fn parse_stat_response(response: &str) -> Result<MaildropStat> {
    let malformed = || Error::MalformedStat {
        response: response.to_string(),
    };

    let mut fields = response
        .trim_end()
        .strip_prefix(OK_MARKER)
        .ok_or_else(malformed)?
        .split_whitespace();
    let message_count: u32 = fields
        .next()
        .ok_or_else(malformed)?
        .parse()
        .map_err(|_| malformed())?;
    let total_size_bytes: u64 = fields
        .next()
        .ok_or_else(malformed)?
        .parse()
        .map_err(|_| malformed())?;

    Ok(MaildropStat {
        message_count,
        total_size_bytes,
    })
}

/// Parses one `UIDL` listing line, `"<msg> <unique-id>"`.
pub(crate) fn parse_unique_id_line(line: &str) -> Result<UniqueIdEntry> {
    let malformed = || Error::MalformedUniqueId {
        line: line.to_string(),
    };

    let (number, id) = line.trim_end().split_once(' ').ok_or_else(malformed)?;
    let sequence_number: u32 = number.parse().map_err(|_| malformed())?;
    if id.is_empty() {
        return Err(malformed());
    }

    Ok(UniqueIdEntry {
        sequence_number,
        unique_id: id.to_string(),
    })
}
