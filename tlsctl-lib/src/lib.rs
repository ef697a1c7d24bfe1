//! tlsctl-lib: Library for inspecting X.509 certificate chains.
//!
//! Certificates come either from a live TLS handshake ([`query`]) or from a
//! PEM bundle ([`decode_pem_chain`]). Both paths hand decoded certificates to
//! [`normalize`], which classifies each one (leaf, intermediate, root) and
//! formats every field into a [`ChainInfo`]. [`render`] turns that model into
//! text, JSON, or YAML.
//!
//! No signature, trust, or revocation checking is performed.

mod certificate;
mod classify;
mod display;
mod fields;
pub mod format;
mod normalize;
mod oid;
mod pem;
mod query;
mod util;

#[cfg(test)]
mod test_support;

pub use certificate::DecodedCertificate;
pub use classify::classify;
pub use display::{display_text, render, render_as, to_json, to_yaml, OutputFormat};
pub use fields::{BasicConstraints, CertRole, CertificateRecord, ChainInfo};
pub use format::encode_pem;
pub use normalize::normalize;
pub use pem::decode_pem_chain;
pub use query::{query, QueryOptions, DEFAULT_TIMEOUT};

/// Errors returned by tlsctl-lib.
#[derive(Debug, thiserror::Error)]
pub enum TlsctlError {
    #[error("no certificates found")]
    EmptyChain,

    #[error("failed to parse certificate: {0}")]
    CertificateParse(#[source] x509_parser::nom::Err<x509_parser::error::X509Error>),

    #[error("unsupported output format: {format:?} (valid: text, json, yaml)")]
    UnsupportedFormat { format: String },

    #[error("invalid server name: {0}")]
    InvalidServerName(String),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
