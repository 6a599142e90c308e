//! Configuration for the POP3 client.
//!
//! Use [`Pop3ConfigBuilder`] to create a configuration with sensible defaults:
//!
//! ```
//! use pop_sync::Pop3Config;
//!
//! let config = Pop3Config::builder()
//!     .username("user@example.com")
//!     .password("app-password")
//!     .build()
//!     .expect("valid config");
//! ```

use crate::error::{Error, Result};
use crate::known_servers::ServerRegistry;
use crate::proxy::Socks5Proxy;
use email_address::EmailAddress;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

/// Default port for plaintext POP3.
pub const DEFAULT_PORT: u16 = 110;

/// Default port for POP3 over TLS (POP3S).
pub const DEFAULT_TLS_PORT: u16 = 995;

/// Configuration for connecting to a POP3 server.
///
/// Create using [`Pop3Config::builder()`].
///
/// Note: The `password` field is stored as a [`SecretString`] to prevent
/// accidental logging of sensitive credentials.
#[derive(Clone)]
pub struct Pop3Config {
    /// Account name sent with `USER` (also used for server discovery when it
    /// is a mail address and no explicit host is set).
    username: String,
    /// Account password sent with `PASS` (protected from accidental logging).
    password: SecretString,
    /// POP3 server hostname (discovered from the username's mail domain if not set).
    pub host: Option<String>,
    /// POP3 server port (default: 995 with encryption, 110 without).
    pub port: u16,
    /// Whether to wrap the connection in TLS.
    pub encryption: bool,
    /// Skip TLS certificate verification. Only for servers with self-signed
    /// certificates; defeats the point of TLS against an active attacker.
    pub danger_accept_invalid_certs: bool,
    /// Optional SOCKS5 proxy for the connection.
    pub proxy: Option<Socks5Proxy>,
    /// Timeout configuration, applied at the transport boundary.
    pub timeouts: TimeoutConfig,
}

impl std::fmt::Debug for Pop3Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pop3Config")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("encryption", &self.encryption)
            .field(
                "danger_accept_invalid_certs",
                &self.danger_accept_invalid_certs,
            )
            .field("proxy", &self.proxy)
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Pop3Config {
    /// Returns the account name used for `USER`.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password as a string slice.
    ///
    /// Use this method when you need to pass the password to authentication.
    /// The password is intentionally not directly accessible to prevent accidental logging.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Creates a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use pop_sync::Pop3Config;
    ///
    /// let config = Pop3Config::builder()
    ///     .username("user@gmail.com")
    ///     .password("app-password")
    ///     .build()
    ///     .expect("valid config");
    /// ```
    #[must_use]
    pub fn builder() -> Pop3ConfigBuilder {
        Pop3ConfigBuilder::default()
    }

    /// Returns the effective POP3 host, either explicitly configured or
    /// derived from the username's mail domain.
    #[must_use]
    pub fn effective_host(&self) -> String {
        if let Some(host) = &self.host {
            host.clone()
        } else {
            crate::known_servers::discover_pop3_host(&self.username)
        }
    }

    /// Returns the full server address as "host:port".
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.effective_host(), self.port)
    }
}

/// Timeout configuration for transport-level operations.
///
/// These are the only timeouts in the crate: the protocol engine itself never
/// measures time, so a stuck server surfaces here or not at all.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Timeout for establishing the TCP/TLS connection.
    pub connect: Duration,
    /// Timeout for reading one response line.
    pub read: Duration,
    /// Timeout for writing one command line.
    pub write: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            read: Duration::from_secs(60),
            write: Duration::from_secs(30),
        }
    }
}

/// Validates that a credential can be placed on a single command line.
fn validate_credential(value: &str, what: &str) -> Result<()> {
    if value.contains('\r') || value.contains('\n') {
        return Err(Error::InvalidConfig {
            message: format!("{what} must not contain line breaks"),
        });
    }
    Ok(())
}

/// Builder for [`Pop3Config`].
#[derive(Debug, Default)]
pub struct Pop3ConfigBuilder {
    username: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    encryption: Option<bool>,
    danger_accept_invalid_certs: bool,
    proxy: Option<Socks5Proxy>,
    timeouts: Option<TimeoutConfig>,
    server_registry: Option<ServerRegistry>,
}

impl Pop3ConfigBuilder {
    /// Sets the account name (required).
    ///
    /// When no explicit [`host`](Self::host) is set, the username must be a
    /// mail address; its domain is used to discover the POP3 server.
    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the password (required).
    ///
    /// For Gmail/Outlook, use an app-specific password.
    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Sets the POP3 server hostname explicitly.
    ///
    /// If not set, the server is discovered from the username's mail domain.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the POP3 server port.
    ///
    /// Defaults to 995 with encryption enabled, 110 without.
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables TLS for the connection. Enabled by default.
    #[must_use]
    pub fn encryption(mut self, encryption: bool) -> Self {
        self.encryption = Some(encryption);
        self
    }

    /// Accepts TLS certificates that fail verification (self-signed servers).
    ///
    /// Disabled by default; leave it that way unless you control the server.
    #[must_use]
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.danger_accept_invalid_certs = accept;
        self
    }

    /// Sets a custom server registry for POP3 host discovery.
    ///
    /// The registry is used during [`build()`](Self::build) to resolve the host
    /// if no explicit [`host`](Self::host) is set.
    ///
    /// # Example
    ///
    /// ```
    /// use pop_sync::{Pop3Config, ServerRegistry};
    ///
    /// let mut registry = ServerRegistry::with_defaults();
    /// registry.register("mycompany.com", "mail.internal.mycompany.com");
    ///
    /// let config = Pop3Config::builder()
    ///     .username("user@mycompany.com")
    ///     .password("secret")
    ///     .server_registry(registry)
    ///     .build()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.effective_host(), "mail.internal.mycompany.com");
    /// ```
    #[must_use]
    pub fn server_registry(mut self, registry: ServerRegistry) -> Self {
        self.server_registry = Some(registry);
        self
    }

    /// Sets a SOCKS5 proxy for the connection.
    #[must_use]
    pub fn proxy(mut self, proxy: Socks5Proxy) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Sets timeout configuration.
    #[must_use]
    pub fn timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = Some(timeouts);
        self
    }

    /// Sets the connection timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts
            .get_or_insert_with(TimeoutConfig::default)
            .connect = timeout;
        self
    }

    /// Sets the per-line read timeout.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.get_or_insert_with(TimeoutConfig::default).read = timeout;
        self
    }

    /// Sets the per-line write timeout.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts
            .get_or_insert_with(TimeoutConfig::default)
            .write = timeout;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing or invalid, or if no
    /// host is set and the username is not a mail address to discover one from.
    pub fn build(self) -> Result<Pop3Config> {
        let username = self.username.ok_or_else(|| Error::InvalidConfig {
            message: "username is required".into(),
        })?;
        if username.is_empty() {
            return Err(Error::InvalidConfig {
                message: "username must not be empty".into(),
            });
        }
        validate_credential(&username, "username")?;

        let password = self.password.ok_or_else(|| Error::InvalidConfig {
            message: "password is required".into(),
        })?;
        validate_credential(&password, "password")?;

        // Resolve the host: explicit > registry > discovery at call time.
        // Discovery needs a mail domain, so an email-shaped username is
        // required whenever no explicit host is given.
        let host = match (self.host, self.server_registry) {
            (Some(host), _) => Some(host),
            (None, registry) => {
                if EmailAddress::parse_with_options(&username, email_address::Options::default())
                    .is_err()
                {
                    return Err(Error::InvalidConfig {
                        message: "host is required when username is not a mail address".into(),
                    });
                }
                registry.map(|r| r.discover(&username).into_owned())
            }
        };

        let encryption = self.encryption.unwrap_or(true);
        let port = self.port.unwrap_or(if encryption {
            DEFAULT_TLS_PORT
        } else {
            DEFAULT_PORT
        });

        Ok(Pop3Config {
            username,
            password: SecretString::from(password),
            host,
            port,
            encryption,
            danger_accept_invalid_certs: self.danger_accept_invalid_certs,
            proxy: self.proxy,
            timeouts: self.timeouts.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal() {
        let config = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .build()
            .unwrap();

        assert_eq!(config.username(), "user@example.com");
        assert_eq!(config.password(), "secret");
        assert_eq!(config.port, DEFAULT_TLS_PORT);
        assert!(config.encryption);
        assert!(!config.danger_accept_invalid_certs);
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_builder_full() {
        let config = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .host("mail.example.com")
            .port(2110)
            .encryption(false)
            .proxy(Socks5Proxy::new("proxy.local", 1080))
            .connect_timeout(Duration::from_secs(60))
            .read_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.host, Some("mail.example.com".into()));
        assert_eq!(config.port, 2110);
        assert!(!config.encryption);
        assert!(config.proxy.is_some());
        assert_eq!(config.timeouts.connect, Duration::from_secs(60));
        assert_eq!(config.timeouts.read, Duration::from_secs(5));
    }

    #[test]
    fn test_builder_missing_username() {
        let result = Pop3Config::builder().password("secret").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_missing_password() {
        let result = Pop3Config::builder().username("user@example.com").build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_port_defaults_follow_encryption() {
        let plain = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .encryption(false)
            .build()
            .unwrap();
        assert_eq!(plain.port, DEFAULT_PORT);

        let tls = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .build()
            .unwrap();
        assert_eq!(tls.port, DEFAULT_TLS_PORT);
    }

    #[test]
    fn test_builder_explicit_port_wins() {
        let config = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .encryption(false)
            .port(2110)
            .build()
            .unwrap();
        assert_eq!(config.port, 2110);
    }

    #[test]
    fn test_builder_plain_username_requires_host() {
        let result = Pop3Config::builder()
            .username("alice")
            .password("secret")
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));

        let config = Pop3Config::builder()
            .username("alice")
            .password("secret")
            .host("mail.example.com")
            .build()
            .unwrap();
        assert_eq!(config.effective_host(), "mail.example.com");
    }

    #[test]
    fn test_builder_rejects_line_breaks_in_credentials() {
        let result = Pop3Config::builder()
            .username("user@example.com\r\nPASS injected")
            .password("secret")
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));

        let result = Pop3Config::builder()
            .username("user@example.com")
            .password("se\ncret")
            .build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    fn test_server_address() {
        let config = Pop3Config::builder()
            .username("user@example.com")
            .password("secret")
            .host("mail.example.com")
            .port(995)
            .build()
            .unwrap();

        assert_eq!(config.server_address(), "mail.example.com:995");
    }

    #[test]
    fn test_effective_host_discovery() {
        let config = Pop3Config::builder()
            .username("user@gmail.com")
            .password("secret")
            .build()
            .unwrap();

        assert_eq!(config.effective_host(), "pop.gmail.com");
    }

    #[test]
    fn test_builder_with_server_registry() {
        let mut registry = ServerRegistry::new();
        registry.register("mycompany.com", "mail.internal.mycompany.com");

        let config = Pop3Config::builder()
            .username("user@mycompany.com")
            .password("secret")
            .server_registry(registry)
            .build()
            .unwrap();

        assert_eq!(config.effective_host(), "mail.internal.mycompany.com");
    }

    #[test]
    fn test_builder_explicit_host_overrides_registry() {
        let mut registry = ServerRegistry::new();
        registry.register("mycompany.com", "mail.internal.mycompany.com");

        let config = Pop3Config::builder()
            .username("user@mycompany.com")
            .password("secret")
            .host("custom.host.com")
            .server_registry(registry)
            .build()
            .unwrap();

        // Explicit host takes precedence
        assert_eq!(config.effective_host(), "custom.host.com");
    }

    #[test]
    fn test_password_not_in_debug() {
        let config = Pop3Config::builder()
            .username("user@example.com")
            .password("super-secret-password")
            .build()
            .unwrap();

        let debug_str = format!("{config:?}");
        assert!(!debug_str.contains("super-secret-password"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
