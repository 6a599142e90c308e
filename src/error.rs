//! Error types for the pop-sync crate.
//!
//! All errors implement [`std::error::Error`] and provide context about what went wrong.
//! Errors are categorized by their retryability - see [`Error::is_retryable`].

use std::time::Duration;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during POP3 operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Configuration / validation errors (NOT retryable)
    // ─────────────────────────────────────────────────────────────────────────
    /// Invalid configuration provided.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the configuration error.
        message: String,
    },

    /// Invalid DNS name for TLS.
    #[error("invalid DNS name for host '{host}'")]
    InvalidDnsName {
        /// The invalid hostname.
        host: String,
        /// The underlying DNS name error.
        #[source]
        source: rustls::client::InvalidDnsNameError,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Network / connection errors (RETRYABLE)
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to establish TCP connection.
    #[error("failed to connect to {target}")]
    TcpConnect {
        /// The target address that failed.
        target: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to establish TLS connection.
    #[error("failed to establish TLS connection to {target}")]
    TlsConnect {
        /// The target address that failed.
        target: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to connect via SOCKS5 proxy.
    #[error("failed to connect via SOCKS5 proxy {proxy_host} to {target}")]
    Socks5Connect {
        /// The SOCKS5 proxy hostname.
        proxy_host: String,
        /// The target address.
        target: String,
        /// The underlying SOCKS5 error.
        #[source]
        source: tokio_socks::Error,
    },

    /// A read or write on an established connection failed.
    #[error("connection I/O failed")]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The server closed the connection before a full line was received.
    #[error("connection closed by server")]
    Closed,

    // ─────────────────────────────────────────────────────────────────────────
    // Timeout errors (RETRYABLE, imposed at the transport boundary)
    // ─────────────────────────────────────────────────────────────────────────
    /// Connection timeout.
    #[error("connection timeout to {target} after {timeout:?}")]
    ConnectTimeout {
        /// The target address.
        target: String,
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Timeout while waiting for a response line.
    #[error("read timeout after {timeout:?}")]
    ReadTimeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Timeout while sending a command line.
    #[error("write timeout after {timeout:?}")]
    WriteTimeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Protocol errors (RETRYABLE - a busy or locked maildrop answers -ERR)
    // ─────────────────────────────────────────────────────────────────────────
    /// The server answered a command with something other than a `+OK` status
    /// line. Carries the raw response text (empty if the server sent nothing).
    #[error("server rejected command: {response:?}")]
    Protocol {
        /// The raw response line as received, terminator included.
        response: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Session state errors (NOT retryable - caller bug, state is unchanged)
    // ─────────────────────────────────────────────────────────────────────────
    /// `connect` was called on a session that is already authenticated.
    #[error("already connected")]
    AlreadyConnected,

    /// An operation requiring an authenticated session was called while
    /// disconnected.
    #[error("not connected")]
    NotConnected,

    // ─────────────────────────────────────────────────────────────────────────
    // Reply parsing errors (NOT retryable - malformed replies won't change)
    // ─────────────────────────────────────────────────────────────────────────
    /// A scan listing line did not contain a message number and size.
    #[error("malformed listing line: {line:?}")]
    MalformedListing {
        /// The offending line.
        line: String,
    },

    /// A STAT status line did not contain a message count and maildrop size.
    #[error("malformed STAT response: {response:?}")]
    MalformedStat {
        /// The offending status line.
        response: String,
    },

    /// A UIDL listing line did not contain a message number and unique id.
    #[error("malformed unique-id listing line: {line:?}")]
    MalformedUniqueId {
        /// The offending line.
        line: String,
    },
}

impl Error {
    /// Returns `true` if this error represents a transient failure that might succeed on retry.
    ///
    /// Use this to implement retry logic:
    ///
    /// ```ignore
    /// if error.is_retryable() {
    ///     // Backoff and retry
    /// } else {
    ///     // Fail permanently
    /// }
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            // RETRYABLE errors: network, timeouts, server rejections
            Error::TcpConnect { .. }
            | Error::TlsConnect { .. }
            | Error::Socks5Connect { .. }
            | Error::Io { .. }
            | Error::Closed
            | Error::ConnectTimeout { .. }
            | Error::ReadTimeout { .. }
            | Error::WriteTimeout { .. }
            | Error::Protocol { .. } => true,

            // NOT retryable: config errors, caller state bugs, malformed replies
            Error::InvalidConfig { .. }
            | Error::InvalidDnsName { .. }
            | Error::AlreadyConnected
            | Error::NotConnected
            | Error::MalformedListing { .. }
            | Error::MalformedStat { .. }
            | Error::MalformedUniqueId { .. } => false,
        }
    }

    /// Returns the error category for metrics/logging purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidConfig { .. } | Error::InvalidDnsName { .. } => {
                ErrorCategory::Configuration
            }

            Error::TcpConnect { .. }
            | Error::TlsConnect { .. }
            | Error::Socks5Connect { .. }
            | Error::Io { .. }
            | Error::Closed => ErrorCategory::Network,

            Error::ConnectTimeout { .. }
            | Error::ReadTimeout { .. }
            | Error::WriteTimeout { .. } => ErrorCategory::Timeout,

            Error::Protocol { .. } => ErrorCategory::Protocol,

            Error::AlreadyConnected | Error::NotConnected => ErrorCategory::State,

            Error::MalformedListing { .. }
            | Error::MalformedStat { .. }
            | Error::MalformedUniqueId { .. } => ErrorCategory::Parse,
        }
    }
}

/// Error categories for metrics and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Configuration or validation errors.
    Configuration,
    /// Network connectivity errors.
    Network,
    /// Timeout errors.
    Timeout,
    /// POP3 protocol errors.
    Protocol,
    /// Session state violations.
    State,
    /// Server reply parsing errors.
    Parse,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Configuration => write!(f, "configuration"),
            ErrorCategory::Network => write!(f, "network"),
            ErrorCategory::Timeout => write!(f, "timeout"),
            ErrorCategory::Protocol => write!(f, "protocol"),
            ErrorCategory::State => write!(f, "state"),
            ErrorCategory::Parse => write!(f, "parse"),
        }
    }
}
