//! Certificate chain data types.

use serde::Serialize;

/// Role of a certificate within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CertRole {
    /// End-entity certificate; always position 0.
    Leaf,
    /// CA certificate that does not look self-signed.
    Intermediate,
    /// CA certificate whose issuer and subject strings match.
    Root,
}

impl CertRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CertRole::Leaf => "leaf",
            CertRole::Intermediate => "intermediate",
            CertRole::Root => "root",
        }
    }
}

impl std::fmt::Display for CertRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic constraints, recorded only when the extension decoded cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BasicConstraints {
    pub is_ca: bool,
    /// `pathLenConstraint`, absent when the extension leaves it unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_path_len: Option<u32>,
}

/// One certificate of a chain with every field rendered for presentation.
///
/// List fields are always present (possibly empty) in memory; structured
/// renderings leave empty ones out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateRecord {
    #[serde(rename = "type")]
    pub role: CertRole,
    /// Certificate version (1, 2, or 3).
    pub version: u32,
    /// Serial number as colon-separated lowercase hex.
    pub serial_number: String,
    pub signature_algorithm: String,
    pub issuer: String,
    pub issuer_common_name: String,
    pub subject: String,
    /// Subject common name.
    pub common_name: String,
    /// ISO 8601 UTC timestamp.
    pub not_before: String,
    /// ISO 8601 UTC timestamp.
    pub not_after: String,
    pub public_key_algorithm: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub key_usage: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extended_key_usage: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basic_constraints: Option<BasicConstraints>,
    /// Colon-separated uppercase hex, empty when the extension is absent.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub subject_key_id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub authority_key_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subject_alternative_names: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ocsp_servers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issuing_cert_url: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub crl_distribution_points: Vec<String>,
    /// PEM re-encoding of the raw certificate.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pem: String,
}

/// An ordered, non-empty certificate chain.
///
/// Position 0 is the certificate presented first: the server's end-entity
/// certificate for a live query, the first block for a PEM file. Only
/// [`normalize`](crate::normalize) builds one, which keeps it non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainInfo {
    certificates: Vec<CertificateRecord>,
}

impl ChainInfo {
    pub(crate) fn from_records(certificates: Vec<CertificateRecord>) -> Self {
        ChainInfo { certificates }
    }

    /// Records in chain order.
    pub fn certificates(&self) -> &[CertificateRecord] {
        &self.certificates
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    /// Always `false` for a chain built by `normalize`.
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// The record at position 0.
    pub fn leaf(&self) -> Option<&CertificateRecord> {
        self.certificates.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CertificateRecord> {
        self.certificates.iter()
    }

    /// Copy of this chain with every record's PEM text cleared.
    pub fn without_pem(&self) -> ChainInfo {
        let mut copy = self.clone();
        for record in &mut copy.certificates {
            record.pem.clear();
        }
        copy
    }
}

impl<'a> IntoIterator for &'a ChainInfo {
    type Item = &'a CertificateRecord;
    type IntoIter = std::slice::Iter<'a, CertificateRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.certificates.iter()
    }
}
