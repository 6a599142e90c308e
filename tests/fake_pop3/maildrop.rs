//! Test data model for the fake POP3 server
//!
//! Provides a builder-style API for constructing maildrop state:
//!
//! ```ignore
//! let maildrop = MaildropBuilder::new()
//!     .credentials("testuser", "testpass")
//!     .message(raw_rfc2822_text)
//!     .message(raw_rfc2822_text)
//!     .build();
//! ```
//!
//! The `Maildrop` is shared with the fake server via `Arc<Mutex<..>>`:
//! message numbers are the 1-based positions at session start and stay
//! stable for the whole session; DELE only flips the `deleted` flag, so
//! later messages keep their numbers (real POP3 behavior).

/// A complete maildrop: login credentials plus stored messages.
#[derive(Debug, Clone)]
pub struct Maildrop {
    pub username: String,
    pub password: String,
    pub messages: Vec<TestMessage>,
}

impl Maildrop {
    /// The message with the given 1-based number, if it exists and is not
    /// marked deleted.
    pub fn get(&self, number: usize) -> Option<&TestMessage> {
        self.messages
            .get(number.checked_sub(1)?)
            .filter(|m| !m.deleted)
    }

    /// Numbers and messages that are not marked deleted, in order.
    pub fn live(&self) -> impl Iterator<Item = (usize, &TestMessage)> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| !m.deleted)
            .map(|(i, m)| (i + 1, m))
    }
}

/// A test message stored in the maildrop.
///
/// - `raw`: the complete RFC 2822 message (CRLF line endings, headers,
///   a blank separator line, then the body). Sent verbatim by RETR.
/// - `deleted`: whether a DELE marked it this session. RSET clears it.
#[derive(Debug, Clone)]
pub struct TestMessage {
    pub raw: String,
    pub deleted: bool,
}

impl TestMessage {
    /// The size the server reports in scan listings and STAT.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// The header section: every line up to the blank separator.
    pub fn header_section(&self) -> &str {
        match self.raw.find("\r\n\r\n") {
            Some(pos) => &self.raw[..pos + 2],
            None => &self.raw,
        }
    }
}

/// Builder for constructing a `Maildrop` step by step.
pub struct MaildropBuilder {
    username: String,
    password: String,
    messages: Vec<TestMessage>,
}

impl MaildropBuilder {
    pub fn new() -> Self {
        Self {
            username: "testuser".to_string(),
            password: "testpass".to_string(),
            messages: Vec::new(),
        }
    }

    /// Sets the credentials the server accepts.
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.username = username.to_string();
        self.password = password.to_string();
        self
    }

    /// Adds a message; its number is its 1-based position.
    pub fn message(mut self, raw: impl Into<String>) -> Self {
        self.messages.push(TestMessage {
            raw: raw.into(),
            deleted: false,
        });
        self
    }

    pub fn build(self) -> Maildrop {
        Maildrop {
            username: self.username,
            password: self.password,
            messages: self.messages,
        }
    }
}
