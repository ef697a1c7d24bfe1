//! Decoded certificate objects handed to the chain normalizer.

use crate::fields::BasicConstraints;
use crate::oid;
use crate::TlsctlError;
use x509_parser::extensions::DistributionPointName;
use x509_parser::nom;
use x509_parser::prelude::*;

/// A parsed X.509 certificate together with the exact DER bytes it came from.
///
/// Both the TLS query and the PEM decoder produce these; the normalizer only
/// reads them.
pub struct DecodedCertificate<'a> {
    der: &'a [u8],
    x509: X509Certificate<'a>,
}

impl std::fmt::Debug for DecodedCertificate<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedCertificate")
            .field("subject", &self.x509.subject().to_string())
            .field("der_len", &self.der.len())
            .finish()
    }
}

impl<'a> DecodedCertificate<'a> {
    /// Parse one DER-encoded certificate.
    ///
    /// The input must hold exactly one certificate; trailing bytes are an
    /// error.
    pub fn from_der(der: &'a [u8]) -> Result<Self, TlsctlError> {
        let (remaining, x509) =
            X509Certificate::from_der(der).map_err(TlsctlError::CertificateParse)?;
        if !remaining.is_empty() {
            return Err(TlsctlError::CertificateParse(nom::Err::Error(
                X509Error::InvalidCertificate,
            )));
        }
        Ok(DecodedCertificate { der, x509 })
    }

    /// Raw DER bytes of the certificate.
    pub fn der(&self) -> &'a [u8] {
        self.der
    }

    /// The underlying `x509-parser` certificate.
    pub fn x509(&self) -> &X509Certificate<'a> {
        &self.x509
    }

    /// Certificate version (1, 2, or 3).
    pub fn version(&self) -> u32 {
        self.x509.version().0 + 1
    }

    /// Serial number as encoded in the DER INTEGER (may carry a sign byte).
    pub fn serial_bytes(&self) -> &[u8] {
        self.x509.tbs_certificate.raw_serial()
    }

    pub fn signature_algorithm_oid(&self) -> String {
        self.x509.signature_algorithm.algorithm.to_id_string()
    }

    pub fn issuer(&self) -> &X509Name<'a> {
        &self.x509.tbs_certificate.issuer
    }

    pub fn subject(&self) -> &X509Name<'a> {
        &self.x509.tbs_certificate.subject
    }

    /// `notBefore` as a Unix timestamp.
    pub fn not_before(&self) -> i64 {
        self.x509.validity().not_before.timestamp()
    }

    /// `notAfter` as a Unix timestamp.
    pub fn not_after(&self) -> i64 {
        self.x509.validity().not_after.timestamp()
    }

    pub fn public_key_algorithm_oid(&self) -> String {
        self.x509.public_key().algorithm.algorithm.to_id_string()
    }

    /// Key usage bitmask, bit 0 = digitalSignature. Zero when absent.
    pub fn key_usage_bits(&self) -> u16 {
        match self.x509.key_usage() {
            Ok(Some(ku)) => ku.value.flags,
            _ => 0,
        }
    }

    /// Extended key usage purposes as dotted OIDs, in certificate order.
    ///
    /// Read from the raw extension value: the parsed `ExtendedKeyUsage`
    /// struct folds well-known purposes into flags and loses their order.
    pub fn extended_key_usage_oids(&self) -> Vec<String> {
        let Some(ext) = self
            .x509
            .extensions()
            .iter()
            .find(|ext| ext.oid.to_id_string() == oid::EXT_EXTENDED_KEY_USAGE)
        else {
            return Vec::new();
        };
        let Ok((_, parsed)) = x509_parser::der_parser::parse_der(ext.value) else {
            return Vec::new();
        };
        let Ok(items) = parsed.as_sequence() else {
            return Vec::new();
        };
        items
            .iter()
            .filter_map(|item| item.as_oid().ok())
            .map(|purpose| purpose.to_id_string())
            .collect()
    }

    /// Basic constraints, present only if the extension decoded cleanly.
    pub fn basic_constraints(&self) -> Option<BasicConstraints> {
        match self.x509.basic_constraints() {
            Ok(Some(bc)) => Some(BasicConstraints {
                is_ca: bc.value.ca,
                max_path_len: bc.value.path_len_constraint,
            }),
            _ => None,
        }
    }

    /// The CA flag; false when basic constraints are absent or malformed.
    pub fn is_ca(&self) -> bool {
        self.basic_constraints().is_some_and(|bc| bc.is_ca)
    }

    /// Subject key identifier bytes, empty when absent.
    pub fn subject_key_id(&self) -> &'a [u8] {
        self.x509
            .extensions()
            .iter()
            .find_map(|ext| match ext.parsed_extension() {
                ParsedExtension::SubjectKeyIdentifier(ki) => Some(ki.0),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Authority key identifier `keyIdentifier` bytes, empty when absent.
    pub fn authority_key_id(&self) -> &'a [u8] {
        self.x509
            .extensions()
            .iter()
            .find_map(|ext| match ext.parsed_extension() {
                ParsedExtension::AuthorityKeyIdentifier(aki) => {
                    aki.key_identifier.as_ref().map(|ki| ki.0)
                }
                _ => None,
            })
            .unwrap_or_default()
    }

    fn san_names(&self) -> Vec<&GeneralName<'a>> {
        match self.x509.subject_alternative_name() {
            Ok(Some(san)) => san.value.general_names.iter().collect(),
            _ => Vec::new(),
        }
    }

    /// SAN DNS names in certificate order.
    pub fn dns_names(&self) -> Vec<String> {
        self.san_names()
            .into_iter()
            .filter_map(|gn| match gn {
                GeneralName::DNSName(name) => Some(name.to_string()),
                _ => None,
            })
            .collect()
    }

    /// SAN rfc822Name entries in certificate order.
    pub fn email_addresses(&self) -> Vec<String> {
        self.san_names()
            .into_iter()
            .filter_map(|gn| match gn {
                GeneralName::RFC822Name(email) => Some(email.to_string()),
                _ => None,
            })
            .collect()
    }

    /// SAN iPAddress entries as raw octets, in certificate order.
    pub fn ip_addresses(&self) -> Vec<&'a [u8]> {
        self.san_names()
            .into_iter()
            .filter_map(|gn| match gn {
                GeneralName::IPAddress(bytes) => Some(*bytes),
                _ => None,
            })
            .collect()
    }

    fn aia_uris(&self, method: &str) -> Vec<String> {
        let mut uris = Vec::new();
        for ext in self.x509.extensions() {
            if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
                for desc in &aia.accessdescs {
                    if desc.access_method.to_id_string() != method {
                        continue;
                    }
                    if let GeneralName::URI(uri) = &desc.access_location {
                        uris.push(uri.to_string());
                    }
                }
            }
        }
        uris
    }

    /// OCSP responder URLs from the AIA extension.
    pub fn ocsp_servers(&self) -> Vec<String> {
        self.aia_uris(oid::ACCESS_OCSP)
    }

    /// CA issuer certificate URLs from the AIA extension.
    pub fn issuing_cert_urls(&self) -> Vec<String> {
        self.aia_uris(oid::ACCESS_CA_ISSUERS)
    }

    /// Full-name URIs from the CRL distribution points extension.
    pub fn crl_distribution_points(&self) -> Vec<String> {
        let mut uris = Vec::new();
        for ext in self.x509.extensions() {
            if let ParsedExtension::CRLDistributionPoints(cdp) = ext.parsed_extension() {
                for point in &cdp.points {
                    if let Some(DistributionPointName::FullName(names)) = &point.distribution_point
                    {
                        for gn in names {
                            if let GeneralName::URI(uri) = gn {
                                uris.push(uri.to_string());
                            }
                        }
                    }
                }
            }
        }
        uris
    }
}
