//! In-process fake POP3 server for integration testing
//!
//! # How POP3 works (educational overview)
//!
//! POP3 (Post Office Protocol version 3, RFC 1939) is a line-oriented
//! text protocol for downloading mail from a single maildrop. Unlike
//! IMAP there are no folders or flags: the client lists what is there,
//! pulls messages down, and optionally deletes them.
//!
//! ## Connection lifecycle
//!
//! ```text
//!   Client connects via TCP (or TLS on the pop3s port)
//!       |
//!   Server sends greeting: "+OK server ready\r\n"
//!       |
//!   Client sends USER and PASS (authorization state)
//!       |
//!   Client issues commands: STAT, LIST, TOP, RETR, DELE, ... (transaction state)
//!       |
//!   Client sends QUIT (update state: marked messages are removed)
//! ```
//!
//! ## Response format
//!
//! Every command gets a status line starting with `+OK` or `-ERR`.
//! Commands like LIST and RETR follow a `+OK` with payload lines and a
//! terminating line holding a single dot:
//!
//! ```text
//!   Client:  LIST
//!   Server:  +OK 2 messages
//!   Server:  1 120
//!   Server:  2 340
//!   Server:  .
//! ```
//!
//! Message numbers are fixed for the whole session; DELE only marks a
//! message, so the numbering never shifts underneath the client.

use super::maildrop::Maildrop;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio_rustls::TlsAcceptor;

/// A fake POP3 server that runs on localhost with an OS-assigned port.
///
/// With [`FakePop3Server::start_tls`] the server generates a self-signed
/// certificate at startup using `rcgen`, so no cert files are needed.
/// It speaks enough of the protocol to exercise `Pop3Client`'s full
/// lifecycle: greeting -> USER/PASS -> transactions -> QUIT.
pub struct FakePop3Server {
    port: u16,
    /// Handle to the background task so it lives as long as the server.
    _handle: tokio::task::JoinHandle<()>,
}

impl FakePop3Server {
    /// Start a plaintext fake server with the given maildrop state.
    pub async fn start(maildrop: Maildrop) -> Self {
        Self::launch(maildrop, false).await
    }

    /// Start a TLS fake server with a self-signed certificate for
    /// "localhost".
    pub async fn start_tls(maildrop: Maildrop) -> Self {
        Self::launch(maildrop, true).await
    }

    /// The port the server is listening on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    async fn launch(maildrop: Maildrop, tls: bool) -> Self {
        // Bind to any available port on localhost.
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let acceptor = tls.then(build_tls_acceptor);
        let maildrop = Arc::new(Mutex::new(maildrop));

        // Spawn the accept loop. Each incoming connection gets its own
        // task that runs the POP3 state machine.
        let handle = tokio::spawn(async move {
            loop {
                let Ok((stream, _addr)) = listener.accept().await else {
                    break;
                };
                let acceptor = acceptor.clone();
                let maildrop = maildrop.clone();
                tokio::spawn(async move {
                    match acceptor {
                        Some(acceptor) => {
                            let Ok(tls_stream) = acceptor.accept(stream).await else {
                                return;
                            };
                            handle_session(tls_stream, &maildrop).await;
                        }
                        None => handle_session(stream, &maildrop).await,
                    }
                });
            }
        });

        Self {
            port,
            _handle: handle,
        }
    }
}

/// Build a TLS acceptor around a freshly generated self-signed cert.
fn build_tls_acceptor() -> TlsAcceptor {
    let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()])
        .expect("generate self-signed cert");
    let cert_der = cert.serialize_der().expect("serialize certificate");
    let key_der = cert.serialize_private_key_der();

    let tls_config = rustls::ServerConfig::builder()
        .with_safe_defaults()
        .with_no_client_auth()
        .with_single_cert(
            vec![rustls::Certificate(cert_der)],
            rustls::PrivateKey(key_der),
        )
        .expect("build server TLS config");

    TlsAcceptor::from(Arc::new(tls_config))
}

/// Write a string to the stream and flush.
///
/// Real servers would batch writes for performance, but flushing eagerly
/// keeps the test server simple and deterministic.
async fn write_all<S: AsyncRead + AsyncWrite + Unpin>(
    stream: &mut BufReader<S>,
    text: &str,
) -> std::io::Result<()> {
    stream.get_mut().write_all(text.as_bytes()).await?;
    stream.get_mut().flush().await
}

/// Run the POP3 command loop over an established stream.
async fn handle_session<S: AsyncRead + AsyncWrite + Unpin>(stream: S, maildrop: &Mutex<Maildrop>) {
    let mut reader = BufReader::new(stream);

    if write_all(&mut reader, "+OK fake POP3 server ready\r\n")
        .await
        .is_err()
    {
        return;
    }

    let mut pending_user: Option<String> = None;
    let mut authorized = false;

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let trimmed = line.trim_end();
        let (command, args) = match trimmed.split_once(' ') {
            Some((command, args)) => (command, args),
            None => (trimmed, ""),
        };

        let reply = match command.to_ascii_uppercase().as_str() {
            "USER" => {
                pending_user = Some(args.to_string());
                "+OK send PASS\r\n".to_string()
            }
            "PASS" => {
                let ok = {
                    let state = maildrop.lock().unwrap();
                    pending_user.as_deref() == Some(state.username.as_str())
                        && args == state.password
                };
                if ok {
                    authorized = true;
                    "+OK maildrop locked and ready\r\n".to_string()
                } else {
                    "-ERR invalid credentials\r\n".to_string()
                }
            }
            "STAT" if authorized => {
                let state = maildrop.lock().unwrap();
                let count = state.live().count();
                let size: usize = state.live().map(|(_, m)| m.size()).sum();
                format!("+OK {count} {size}\r\n")
            }
            "LIST" if authorized => {
                let state = maildrop.lock().unwrap();
                let mut reply = format!("+OK {} messages\r\n", state.live().count());
                for (number, message) in state.live() {
                    reply.push_str(&format!("{number} {}\r\n", message.size()));
                }
                reply.push_str(".\r\n");
                reply
            }
            "UIDL" if authorized => {
                let state = maildrop.lock().unwrap();
                let mut reply = "+OK unique-id listing follows\r\n".to_string();
                for (number, _) in state.live() {
                    reply.push_str(&format!("{number} uid{number:04}\r\n"));
                }
                reply.push_str(".\r\n");
                reply
            }
            "TOP" if authorized => {
                // Only the `TOP n 0` header-only form is exercised here.
                let number = parse_number(args);
                let state = maildrop.lock().unwrap();
                match number.and_then(|n| state.get(n)) {
                    Some(message) => format!(
                        "+OK headers follow\r\n{}\r\n.\r\n",
                        message.header_section()
                    ),
                    None => "-ERR no such message\r\n".to_string(),
                }
            }
            "RETR" if authorized => {
                let number = parse_number(args);
                let state = maildrop.lock().unwrap();
                match number.and_then(|n| state.get(n)) {
                    Some(message) => {
                        format!("+OK message follows\r\n{}.\r\n", message.raw)
                    }
                    None => "-ERR no such message\r\n".to_string(),
                }
            }
            "DELE" if authorized => {
                let number = parse_number(args);
                let mut state = maildrop.lock().unwrap();
                match number {
                    Some(n) if state.get(n).is_some() => {
                        state.messages[n - 1].deleted = true;
                        format!("+OK message {n} deleted\r\n")
                    }
                    _ => "-ERR no such message\r\n".to_string(),
                }
            }
            "RSET" if authorized => {
                let mut state = maildrop.lock().unwrap();
                for message in &mut state.messages {
                    message.deleted = false;
                }
                "+OK\r\n".to_string()
            }
            "NOOP" if authorized => "+OK\r\n".to_string(),
            "QUIT" => {
                let _ = write_all(&mut reader, "+OK signing off\r\n").await;
                break;
            }
            _ => "-ERR unknown command or wrong state\r\n".to_string(),
        };

        if write_all(&mut reader, &reply).await.is_err() {
            break;
        }
    }
}

/// First whitespace-separated field of `args` as a message number.
fn parse_number(args: &str) -> Option<usize> {
    args.split_whitespace().next()?.parse().ok()
}
