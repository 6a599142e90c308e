//! POP3 server discovery from mail domains.
//!
//! This module provides automatic POP3 server hostname discovery for common
//! email providers, with support for runtime customization.
//!
//! # Example
//!
//! ```
//! use pop_sync::known_servers::{ServerRegistry, discover_pop3_host};
//!
//! // Use built-in discovery
//! assert_eq!(discover_pop3_host("user@gmail.com"), "pop.gmail.com");
//!
//! // Create a custom registry for your application
//! let mut registry = ServerRegistry::with_defaults();
//! registry.register("mycompany.com", "mail.mycompany.com");
//! assert_eq!(registry.discover("user@mycompany.com"), "mail.mycompany.com");
//! ```

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

/// Map of mail domains to their POP3 server hostnames.
static KNOWN_SERVERS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();

    // Google
    m.insert("gmail.com", "pop.gmail.com");

    // Yahoo
    m.insert("yahoo.com", "pop.mail.yahoo.com");

    // Microsoft
    m.insert("hotmail.com", "outlook.office365.com");
    m.insert("outlook.com", "outlook.office365.com");
    m.insert("live.com", "outlook.office365.com");

    // Mail.ru network
    m.insert("mail.ru", "pop.mail.ru");
    m.insert("internet.ru", "pop.mail.ru");
    m.insert("bk.ru", "pop.mail.ru");
    m.insert("inbox.ru", "pop.mail.ru");
    m.insert("list.ru", "pop.mail.ru");

    // AOL
    m.insert("aol.com", "pop.aol.com");

    // Yandex
    m.insert("yandex.ru", "pop.yandex.ru");
    m.insert("yandex.com", "pop.yandex.ru");

    // German providers
    m.insert("web.de", "pop3.web.de");
    m.insert("gmx.de", "pop.gmx.net");
    m.insert("gmx.at", "pop.gmx.net");
    m.insert("gmx.ch", "pop.gmx.net");
    m.insert("gmx.net", "pop.gmx.net");
    m.insert("gmx.com", "pop.gmx.net");
    m.insert("t-online.de", "securepop.t-online.de");

    // Russian providers
    m.insert("rambler.ru", "pop.rambler.ru");

    m
});

/// A customizable registry for POP3 server discovery.
///
/// This allows you to add custom domain-to-POP3-host mappings at runtime,
/// in addition to (or overriding) the built-in defaults.
///
/// # Example
///
/// ```
/// use pop_sync::known_servers::ServerRegistry;
///
/// // Start with defaults and add custom mappings
/// let mut registry = ServerRegistry::with_defaults();
/// registry.register("mycompany.com", "pop.mycompany.internal");
/// registry.register("partner.org", "mail.partner.org");
///
/// assert_eq!(registry.discover("user@mycompany.com"), "pop.mycompany.internal");
/// assert_eq!(registry.discover("user@gmail.com"), "pop.gmail.com"); // Built-in
/// ```
#[derive(Debug, Clone)]
pub struct ServerRegistry {
    custom: HashMap<String, String>,
    use_defaults: bool,
}

impl Default for ServerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerRegistry {
    /// Creates an empty registry without built-in defaults.
    ///
    /// Use [`Self::with_defaults`] if you want to include the standard mappings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            custom: HashMap::new(),
            use_defaults: false,
        }
    }

    /// Creates a registry that includes built-in default mappings.
    ///
    /// Custom mappings added via [`Self::register`] will override defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            custom: HashMap::new(),
            use_defaults: true,
        }
    }

    /// Registers a custom domain-to-POP3-host mapping.
    ///
    /// This will override any existing mapping (including built-in defaults).
    ///
    /// # Example
    ///
    /// ```
    /// use pop_sync::known_servers::ServerRegistry;
    ///
    /// let mut registry = ServerRegistry::with_defaults();
    /// registry.register("custom.org", "pop.custom.org");
    /// ```
    pub fn register(&mut self, domain: impl Into<String>, pop3_host: impl Into<String>) {
        self.custom
            .insert(domain.into().to_lowercase(), pop3_host.into());
    }

    /// Registers multiple domain mappings at once.
    ///
    /// # Example
    ///
    /// ```
    /// use pop_sync::known_servers::ServerRegistry;
    ///
    /// let mut registry = ServerRegistry::with_defaults();
    /// registry.register_many([
    ///     ("corp.com", "mail.corp.com"),
    ///     ("partner.org", "pop.partner.org"),
    /// ]);
    /// ```
    pub fn register_many<I, D, H>(&mut self, mappings: I)
    where
        I: IntoIterator<Item = (D, H)>,
        D: Into<String>,
        H: Into<String>,
    {
        for (domain, host) in mappings {
            self.register(domain, host);
        }
    }

    /// Removes a custom mapping.
    ///
    /// Note: This only removes custom mappings, not built-in defaults.
    pub fn unregister(&mut self, domain: &str) -> Option<String> {
        self.custom.remove(&domain.to_lowercase())
    }

    /// Discovers the POP3 hostname for a mail address.
    ///
    /// Resolution order:
    /// 1. Custom mappings (added via [`Self::register`])
    /// 2. Built-in defaults (if [`Self::with_defaults`] was used)
    /// 3. Fallback to `pop.{domain}`
    #[must_use]
    pub fn discover(&self, address: &str) -> Cow<'_, str> {
        let domain = address.split('@').nth(1).unwrap_or(address).to_lowercase();

        // Check custom mappings first
        if let Some(host) = self.custom.get(&domain) {
            return Cow::Borrowed(host);
        }

        // Check built-in defaults
        if self.use_defaults {
            if let Some(&host) = KNOWN_SERVERS.get(domain.as_str()) {
                return Cow::Borrowed(host);
            }
        }

        // Fallback
        Cow::Owned(format!("pop.{domain}"))
    }

    /// Returns `true` if the domain has a known POP3 server mapping.
    #[must_use]
    pub fn is_known(&self, domain: &str) -> bool {
        let domain_lower = domain.to_lowercase();
        self.custom.contains_key(&domain_lower)
            || (self.use_defaults && KNOWN_SERVERS.contains_key(domain_lower.as_str()))
    }

    /// Returns the number of registered mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        let default_count = if self.use_defaults {
            KNOWN_SERVERS
                .keys()
                .filter(|k| !self.custom.contains_key(**k))
                .count()
        } else {
            0
        };
        self.custom.len() + default_count
    }

    /// Returns `true` if the registry has no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.custom.is_empty() && (!self.use_defaults || KNOWN_SERVERS.is_empty())
    }
}

/// Discovers the POP3 hostname for a mail address.
///
/// If the domain is known, returns the corresponding POP3 server.
/// Otherwise, returns a default of `pop.{domain}`.
///
/// # Example
///
/// ```
/// use pop_sync::known_servers::discover_pop3_host;
///
/// assert_eq!(discover_pop3_host("user@gmail.com"), "pop.gmail.com");
/// assert_eq!(discover_pop3_host("user@custom.org"), "pop.custom.org");
/// ```
#[must_use]
pub fn discover_pop3_host(address: &str) -> String {
    let domain = address.split('@').nth(1).unwrap_or(address).to_lowercase();

    KNOWN_SERVERS
        .get(domain.as_str())
        .map_or_else(|| format!("pop.{domain}"), |&s| s.to_string())
}

/// Returns `true` if the domain has a known POP3 server mapping.
#[must_use]
pub fn is_known_domain(domain: &str) -> bool {
    KNOWN_SERVERS.contains_key(domain.to_lowercase().as_str())
}
