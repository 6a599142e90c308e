//! The line-oriented transport the protocol engine runs on.
//!
//! [`Transport`] is the only boundary the engine requires from its host
//! environment; [`TcpTransport`] is the built-in implementation over TCP,
//! optionally wrapped in TLS and/or routed through a SOCKS5 proxy.
//!
//! Timeouts live here and only here: the protocol engine itself never
//! measures time.

use crate::config::{Pop3Config, TimeoutConfig};
use crate::error::{Error, Result};
use crate::proxy::Socks5Proxy;
use rustls::ClientConfig;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tokio_socks::tcp::Socks5Stream;
use tracing::{debug, instrument};
use webpki_roots::TLS_SERVER_ROOTS;

/// A line-oriented, exclusively-owned connection.
///
/// One logical protocol line per call, in both directions. The engine holds
/// exactly one transport per session and serializes all access to it.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Reads exactly one protocol line, *including* its trailing terminator.
    ///
    /// # Errors
    ///
    /// Fails if the connection errors out or closes before a full line
    /// arrives ([`Error::Closed`]).
    async fn read_line(&mut self) -> Result<String>;

    /// Writes one already-terminated protocol line verbatim.
    ///
    /// # Errors
    ///
    /// Fails if the connection errors out.
    async fn write_line(&mut self, line: &str) -> Result<()>;

    /// Shuts the connection down.
    ///
    /// # Errors
    ///
    /// Fails if the shutdown handshake errors out; the connection is
    /// unusable afterwards either way.
    async fn close(&mut self) -> Result<()>;
}

/// Object-safe bound for the underlying byte stream.
trait RawStream: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> RawStream for T {}

/// The built-in [`Transport`] over TCP, with optional TLS and SOCKS5.
///
/// Created by [`TcpTransport::open`] from a [`Pop3Config`]; the configured
/// connect/read/write timeouts are imposed here, at the transport boundary.
pub struct TcpTransport {
    stream: BufReader<Box<dyn RawStream>>,
    timeouts: TimeoutConfig,
}

impl TcpTransport {
    /// Opens the connection described by the configuration.
    ///
    /// Connects over TCP (optionally through the configured SOCKS5 proxy),
    /// then performs the TLS handshake when encryption is enabled. The whole
    /// establishment is bounded by the configured connect timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the TCP connection, proxy handshake, or TLS
    /// handshake fails or times out.
    #[instrument(
        name = "transport::open",
        skip_all,
        fields(
            target = %config.server_address(),
            encryption = config.encryption,
            proxy_enabled = config.proxy.is_some()
        )
    )]
    pub async fn open(config: &Pop3Config) -> Result<Self> {
        let host = config.effective_host();
        let target = config.server_address();
        let timeouts = config.timeouts.clone();

        let stream = tokio::time::timeout(timeouts.connect, establish(config, &host, &target))
            .await
            .map_err(|_| Error::ConnectTimeout {
                target: target.clone(),
                timeout: timeouts.connect,
            })??;

        Ok(Self {
            stream: BufReader::new(stream),
            timeouts,
        })
    }
}

impl Transport for TcpTransport {
    async fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        let read = tokio::time::timeout(self.timeouts.read, self.stream.read_line(&mut line))
            .await
            .map_err(|_| Error::ReadTimeout {
                timeout: self.timeouts.read,
            })?
            .map_err(|source| Error::Io { source })?;

        if read == 0 {
            return Err(Error::Closed);
        }
        Ok(line)
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        let write = async {
            self.stream.get_mut().write_all(line.as_bytes()).await?;
            self.stream.get_mut().flush().await
        };

        tokio::time::timeout(self.timeouts.write, write)
            .await
            .map_err(|_| Error::WriteTimeout {
                timeout: self.timeouts.write,
            })?
            .map_err(|source| Error::Io { source })
    }

    async fn close(&mut self) -> Result<()> {
        self.stream
            .get_mut()
            .shutdown()
            .await
            .map_err(|source| Error::Io { source })
    }
}

/// Establishes the raw byte stream: TCP (direct or via proxy), then TLS if
/// enabled.
async fn establish(
    config: &Pop3Config,
    host: &str,
    target: &str,
) -> Result<Box<dyn RawStream>> {
    let tcp = connect_tcp(target, config.proxy.as_ref()).await?;

    if !config.encryption {
        return Ok(Box::new(tcp));
    }

    let connector = create_tls_connector(config.danger_accept_invalid_certs);
    let server_name = parse_server_name(host)?;

    debug!("Performing TLS handshake");

    let tls = connector
        .connect(server_name, tcp)
        .await
        .map_err(|source| Error::TlsConnect {
            target: target.to_string(),
            source,
        })?;

    Ok(Box::new(tls))
}

/// Creates a TLS connector with system root certificates, or one that skips
/// verification entirely when the config opted into that.
fn create_tls_connector(accept_invalid_certs: bool) -> TlsConnector {
    let mut root_cert_store = rustls::RootCertStore::empty();
    root_cert_store.add_trust_anchors(TLS_SERVER_ROOTS.iter().map(|ta| {
        rustls::OwnedTrustAnchor::from_subject_spki_name_constraints(
            ta.subject,
            ta.spki,
            ta.name_constraints,
        )
    }));

    let mut tls_config = ClientConfig::builder()
        .with_safe_defaults()
        .with_root_certificates(root_cert_store)
        .with_no_client_auth();

    if accept_invalid_certs {
        tls_config
            .dangerous()
            .set_certificate_verifier(Arc::new(NoCertificateVerification));
    }

    TlsConnector::from(Arc::new(tls_config))
}

/// Certificate verifier that accepts everything (self-signed servers).
struct NoCertificateVerification;

impl rustls::client::ServerCertVerifier for NoCertificateVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &rustls::Certificate,
        _intermediates: &[rustls::Certificate],
        _server_name: &rustls::ServerName,
        _scts: &mut dyn Iterator<Item = &[u8]>,
        _ocsp_response: &[u8],
        _now: std::time::SystemTime,
    ) -> std::result::Result<rustls::client::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::ServerCertVerified::assertion())
    }
}

/// Parses server name for TLS SNI.
fn parse_server_name(host: &str) -> Result<rustls::ServerName> {
    rustls::ServerName::try_from(host).map_err(|source| Error::InvalidDnsName {
        host: host.to_string(),
        source,
    })
}

/// Establishes a TCP connection, optionally through SOCKS5.
#[instrument(
    name = "transport::tcp_connect",
    skip_all,
    fields(
        target = %target,
        via_proxy = proxy.is_some()
    )
)]
async fn connect_tcp(target: &str, proxy: Option<&Socks5Proxy>) -> Result<TcpStream> {
    match proxy {
        Some(proxy) => connect_via_socks5(target, proxy).await,
        None => connect_direct(target).await,
    }
}

/// Direct TCP connection.
async fn connect_direct(target: &str) -> Result<TcpStream> {
    debug!(target = %target, "Establishing direct TCP connection");

    TcpStream::connect(target)
        .await
        .map_err(|source| Error::TcpConnect {
            target: target.to_string(),
            source,
        })
}

/// TCP connection via SOCKS5 proxy.
async fn connect_via_socks5(target: &str, proxy: &Socks5Proxy) -> Result<TcpStream> {
    debug!(
        proxy = %proxy,
        target = %target,
        "Connecting via SOCKS5 proxy"
    );

    let proxy_addr = (proxy.host(), proxy.port());

    let stream = match proxy.credentials() {
        Some(auth) => {
            Socks5Stream::connect_with_password(
                proxy_addr,
                target,
                &auth.username,
                &auth.password,
            )
            .await
        }
        None => Socks5Stream::connect(proxy_addr, target).await,
    };

    stream
        .map(Socks5Stream::into_inner)
        .map_err(|source| Error::Socks5Connect {
            proxy_host: proxy.host().to_string(),
            target: target.to_string(),
            source,
        })
}
