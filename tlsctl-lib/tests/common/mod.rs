//! Shared helpers for the integration tests.

#![allow(dead_code)]

use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use std::path::PathBuf;

/// Path to a fixture under `tests/certs/`.
pub fn cert_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    p.push("tests");
    p.push("certs");
    p.push(name);
    p
}

pub fn read_fixture(name: &str) -> Vec<u8> {
    std::fs::read(cert_path(name)).unwrap()
}

/// A generated certificate and its signing key.
pub struct Generated {
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
}

impl Generated {
    pub fn der(&self) -> Vec<u8> {
        self.cert.der().to_vec()
    }

    pub fn pem(&self) -> String {
        self.cert.pem()
    }
}

pub fn params(common_name: &str, dns: &[&str]) -> CertificateParams {
    let names = dns.iter().map(|s| s.to_string()).collect::<Vec<_>>();
    let mut params = CertificateParams::new(names).unwrap();
    params.distinguished_name.push(DnType::CommonName, common_name);
    params
}

pub fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = params(common_name, &[]);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

pub fn self_signed(params: CertificateParams) -> Generated {
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    Generated { cert, key }
}

pub fn signed_by(params: CertificateParams, issuer: &Generated) -> Generated {
    let key = KeyPair::generate().unwrap();
    let cert = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
    Generated { cert, key }
}

/// Root, intermediate, and leaf for `host`.
pub fn three_level_chain(host: &str) -> (Generated, Generated, Generated) {
    let root = self_signed(ca_params("Integration Root"));
    let inter = signed_by(ca_params("Integration Intermediate"), &root);
    let leaf = signed_by(params(host, &[host]), &inter);
    (root, inter, leaf)
}
