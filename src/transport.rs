//! Plain-TCP and TLS transports
//!
//! The transport decision is a single port-based rule: port 443 gets a TLS
//! wrap with default trust validation and hostname verification against the
//! configured host, everything else is plaintext. There is no protocol
//! negotiation beyond that.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::Target;
use crate::error::{Error, Result};

/// Upper bound on TCP connect (and TLS handshake) establishment, so a
/// black-holed target cannot hold a worker past shutdown latency.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Opens connections to a single target.
///
/// Built once per run and shared read-only by all workers; each call to
/// [`Connector::connect`] yields a [`Connection`] exclusively owned by the
/// calling worker. The TLS client config (webpki roots, no client auth) and
/// the verified server name are prepared up front.
pub struct Connector {
    target: Target,
    tls: Option<TlsParts>,
}

struct TlsParts {
    connector: TlsConnector,
    server_name: ServerName<'static>,
}

impl Connector {
    /// Build a connector for the target.
    ///
    /// Fails if the target uses TLS and its host is not a valid server name
    /// for certificate verification.
    pub fn new(target: Target) -> Result<Self> {
        let tls = if target.is_tls() {
            let server_name = ServerName::try_from(target.host.clone())
                .map_err(|_| Error::InvalidServerName(target.host.clone()))?;

            let mut roots = RootCertStore::empty();
            roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
            let config = ClientConfig::builder()
                .with_root_certificates(roots)
                .with_no_client_auth();

            Some(TlsParts {
                connector: TlsConnector::from(Arc::new(config)),
                server_name,
            })
        } else {
            None
        };

        Ok(Self { target, tls })
    }

    /// Whether connections from this connector are TLS-wrapped
    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// The target this connector dials
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Open one connection, handshaking TLS when the target requires it.
    pub async fn connect(&self) -> Result<Connection> {
        let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(self.target.addr()))
            .await
            .map_err(|_| Error::Connect(io::Error::new(io::ErrorKind::TimedOut, "connect timed out")))?
            .map_err(Error::Connect)?;

        match &self.tls {
            Some(tls) => {
                let stream = tokio::time::timeout(
                    CONNECT_TIMEOUT,
                    tls.connector.connect(tls.server_name.clone(), stream),
                )
                .await
                .map_err(|_| {
                    Error::TlsHandshake(io::Error::new(io::ErrorKind::TimedOut, "handshake timed out"))
                })?
                .map_err(Error::TlsHandshake)?;
                Ok(Connection::Tls(Box::new(stream)))
            }
            None => Ok(Connection::Plain(stream)),
        }
    }
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("target", &self.target)
            .field("tls", &self.is_tls())
            .finish()
    }
}

/// One open connection, exclusively owned by its worker.
pub enum Connection {
    /// Plaintext TCP
    Plain(TcpStream),
    /// TLS over TCP
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    /// Whether this connection is TLS-wrapped
    pub fn is_tls(&self) -> bool {
        matches!(self, Connection::Tls(_))
    }

    /// Write an entire buffer to the peer.
    pub async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        let res = match self {
            Connection::Plain(stream) => stream.write_all(buf).await,
            Connection::Tls(stream) => stream.write_all(buf).await,
        };
        res.map_err(Error::Write)
    }

    /// Flush and close the connection, consuming it.
    ///
    /// Close errors are reported but a connection is never reused either
    /// way; callers that are already tearing down may ignore the result.
    pub async fn close(mut self) -> Result<()> {
        let res = match &mut self {
            Connection::Plain(stream) => stream.shutdown().await,
            Connection::Tls(stream) => stream.shutdown().await,
        };
        res.map_err(Error::Write)
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("tls", &self.is_tls())
            .finish()
    }
}
