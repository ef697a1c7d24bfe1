//! Chain normalization: decoded certificates in, `ChainInfo` out.

use crate::certificate::DecodedCertificate;
use crate::classify::classify;
use crate::fields::{CertificateRecord, ChainInfo};
use crate::format;
use crate::TlsctlError;
use tracing::debug;

/// Build a [`ChainInfo`] from certificates in chain order.
///
/// Produces exactly one record per certificate, in the order given. Fails
/// with [`TlsctlError::EmptyChain`] when `certs` is empty.
pub fn normalize(certs: &[DecodedCertificate<'_>]) -> Result<ChainInfo, TlsctlError> {
    if certs.is_empty() {
        return Err(TlsctlError::EmptyChain);
    }
    let records = certs
        .iter()
        .enumerate()
        .map(|(position, cert)| build_record(position, cert))
        .collect();
    Ok(ChainInfo::from_records(records))
}

fn build_record(position: usize, cert: &DecodedCertificate<'_>) -> CertificateRecord {
    let role = classify(position, cert);
    let subject = format::format_name(cert.subject());
    debug!(position, %role, %subject, "classified certificate");

    CertificateRecord {
        role,
        version: cert.version(),
        serial_number: format::format_serial(cert.serial_bytes()),
        signature_algorithm: format::signature_algorithm_name(&cert.signature_algorithm_oid()),
        issuer: format::format_name(cert.issuer()),
        issuer_common_name: format::common_name(cert.issuer()),
        common_name: format::common_name(cert.subject()),
        subject,
        not_before: format::format_timestamp(cert.not_before()),
        not_after: format::format_timestamp(cert.not_after()),
        public_key_algorithm: format::public_key_algorithm_name(&cert.public_key_algorithm_oid()),
        key_usage: format::format_key_usage(cert.key_usage_bits()),
        extended_key_usage: format::format_ext_key_usage(&cert.extended_key_usage_oids()),
        basic_constraints: cert.basic_constraints(),
        subject_key_id: format::format_key_id(cert.subject_key_id()),
        authority_key_id: format::format_key_id(cert.authority_key_id()),
        subject_alternative_names: cert.dns_names(),
        email_addresses: cert.email_addresses(),
        ip_addresses: cert
            .ip_addresses()
            .into_iter()
            .map(format::format_ip)
            .collect(),
        ocsp_servers: cert.ocsp_servers(),
        issuing_cert_url: cert.issuing_cert_urls(),
        crl_distribution_points: cert.crl_distribution_points(),
        pem: format::encode_pem(cert.der()),
    }
}
