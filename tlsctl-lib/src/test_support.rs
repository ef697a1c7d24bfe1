//! Certificate builders shared by unit tests.

#![allow(clippy::unwrap_used)]

use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};

pub(crate) const LEAF_PEM: &[u8] = include_bytes!("../tests/certs/leaf.pem");
pub(crate) const CA_PEM: &[u8] = include_bytes!("../tests/certs/ca.pem");

/// DER contents of the first PEM block in `pem`.
pub(crate) fn fixture_der(pem: &[u8]) -> Vec<u8> {
    let (_, block) = x509_parser::pem::parse_x509_pem(pem).unwrap();
    block.contents
}

/// A generated certificate and the key that can sign with it.
pub(crate) struct TestCert {
    pub der: Vec<u8>,
    pub cert: rcgen::Certificate,
    pub key: KeyPair,
}

pub(crate) fn params(common_name: &str) -> CertificateParams {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    params.distinguished_name.push(DnType::CommonName, common_name);
    params
}

pub(crate) fn ca_params(common_name: &str) -> CertificateParams {
    let mut params = params(common_name);
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params
}

pub(crate) fn self_signed(params: CertificateParams) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let cert = params.self_signed(&key).unwrap();
    TestCert {
        der: cert.der().to_vec(),
        cert,
        key,
    }
}

pub(crate) fn signed_by(params: CertificateParams, issuer: &TestCert) -> TestCert {
    let key = KeyPair::generate().unwrap();
    let cert = params.signed_by(&key, &issuer.cert, &issuer.key).unwrap();
    TestCert {
        der: cert.der().to_vec(),
        cert,
        key,
    }
}
