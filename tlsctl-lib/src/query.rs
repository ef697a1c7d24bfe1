//! Live certificate retrieval over a TLS handshake.
//!
//! The handshake configuration is always passed in through [`QueryOptions`];
//! nothing here reads process-wide settings.

use crate::certificate::DecodedCertificate;
use crate::fields::ChainInfo;
use crate::normalize::normalize;
use crate::TlsctlError;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::CryptoProvider;
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, ClientConnection, DigitallySignedStruct, RootCertStore, SignatureScheme};
use std::io;
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Connect and handshake timeout used by [`QueryOptions`] constructors.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one [`query`] call.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub tls_config: Arc<ClientConfig>,
    /// Applies to the TCP connect and to each socket read and write.
    pub timeout: Duration,
}

impl QueryOptions {
    /// Options that verify the server against the Mozilla root store.
    pub fn verified() -> Result<Self, TlsctlError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let config = ClientConfig::builder_with_provider(provider)
            .with_safe_default_protocol_versions()?
            .with_root_certificates(roots)
            .with_no_client_auth();
        Ok(Self::with_config(config))
    }

    /// Options that accept any server certificate.
    ///
    /// Handshake signatures are still checked against the presented leaf, so
    /// the peer must hold the matching private key.
    pub fn insecure() -> Result<Self, TlsctlError> {
        let provider = Arc::new(rustls::crypto::ring::default_provider());
        let config = ClientConfig::builder_with_provider(provider.clone())
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
            .with_no_client_auth();
        Ok(Self::with_config(config))
    }

    /// Options around a caller-built client configuration.
    pub fn with_config(config: ClientConfig) -> Self {
        QueryOptions {
            tls_config: Arc::new(config),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug)]
struct AcceptAnyCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

fn connect(host: &str, port: u16, timeout: Duration) -> Result<TcpStream, TlsctlError> {
    let mut last_err = None;
    for addr in (host, port).to_socket_addrs()? {
        debug!(%addr, "connecting");
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(stream) => {
                stream.set_read_timeout(Some(timeout))?;
                stream.set_write_timeout(Some(timeout))?;
                return Ok(stream);
            }
            Err(e) => last_err = Some(e),
        }
    }
    Err(TlsctlError::Io(last_err.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses found for {}", host),
        )
    })))
}

/// Handshake with `host:port` and normalize the certificates the server sent.
///
/// The chain is reported in the order the server presented it, leaf first.
/// Fails with [`TlsctlError::EmptyChain`] if the server sent no certificates.
pub fn query(host: &str, port: u16, options: &QueryOptions) -> Result<ChainInfo, TlsctlError> {
    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| TlsctlError::InvalidServerName(host.to_string()))?;
    let mut sock = connect(host, port, options.timeout)?;
    let mut conn = ClientConnection::new(options.tls_config.clone(), server_name)?;

    while conn.is_handshaking() {
        conn.complete_io(&mut sock).map_err(TlsctlError::Handshake)?;
    }
    debug!(
        version = ?conn.protocol_version(),
        suite = ?conn.negotiated_cipher_suite().map(|s| s.suite()),
        "handshake complete"
    );

    let peer_der: Vec<Vec<u8>> = conn
        .peer_certificates()
        .unwrap_or_default()
        .iter()
        .map(|c| c.as_ref().to_vec())
        .collect();

    conn.send_close_notify();
    if let Err(e) = conn.complete_io(&mut sock) {
        debug!(error = %e, "close_notify not delivered");
    }

    let certs = peer_der
        .iter()
        .map(|der| DecodedCertificate::from_der(der))
        .collect::<Result<Vec<_>, _>>()?;
    normalize(&certs)
}
