//! POP3 commands and protocol constants (RFC 1939).

use std::fmt;

/// Marker beginning every successful status line.
pub(crate) const OK_MARKER: &str = "+OK";

/// Line terminator for every command and response.
pub(crate) const TERMINATOR: &str = "\r\n";

/// The line ending a multiline response: a single dot plus terminator.
pub(crate) const SENTINEL: &str = ".\r\n";

/// A POP3 command as placed on the wire.
///
/// [`fmt::Display`] produces the exact command line without the trailing
/// terminator; the session appends [`TERMINATOR`] when sending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command<'a> {
    /// `USER <name>`
    User(&'a str),
    /// `PASS <secret>`
    Pass(&'a str),
    /// `STAT`
    Stat,
    /// `LIST` (full scan listing, multiline reply)
    List,
    /// `UIDL` (unique-id listing, multiline reply)
    Uidl,
    /// `TOP <msg> <lines>` (header block plus `lines` body lines, multiline reply)
    Top {
        /// Message sequence number.
        message: u32,
        /// Number of body lines to include after the headers.
        lines: u32,
    },
    /// `RETR <msg>` (full message, multiline reply)
    Retr(u32),
    /// `DELE <msg>`
    Dele(u32),
    /// `RSET`
    Rset,
    /// `NOOP`
    Noop,
    /// `QUIT`
    Quit,
}

impl Command<'_> {
    /// The bare command keyword, safe to log (no arguments, no secrets).
    pub(crate) const fn name(&self) -> &'static str {
        match self {
            Command::User(_) => "USER",
            Command::Pass(_) => "PASS",
            Command::Stat => "STAT",
            Command::List => "LIST",
            Command::Uidl => "UIDL",
            Command::Top { .. } => "TOP",
            Command::Retr(_) => "RETR",
            Command::Dele(_) => "DELE",
            Command::Rset => "RSET",
            Command::Noop => "NOOP",
            Command::Quit => "QUIT",
        }
    }

}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::User(name) => write!(f, "USER {name}"),
            Command::Pass(secret) => write!(f, "PASS {secret}"),
            Command::Top { message, lines } => write!(f, "TOP {message} {lines}"),
            Command::Retr(message) => write!(f, "RETR {message}"),
            Command::Dele(message) => write!(f, "DELE {message}"),
            Command::Stat
            | Command::List
            | Command::Uidl
            | Command::Rset
            | Command::Noop
            | Command::Quit => f.write_str(self.name()),
        }
    }
}
