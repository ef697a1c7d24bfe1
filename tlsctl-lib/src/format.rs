//! Field formatting: turns raw certificate attributes into display strings.
//!
//! Every function here is total. Unknown inputs render as a readable
//! fallback (dotted OID, `Unknown(..)`, `?`-prefixed hex) instead of failing.

use crate::oid;
use crate::util;
use std::borrow::Cow;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use x509_parser::der_parser::asn1_rs::{Tag, ToDer};
use x509_parser::prelude::*;

/// Format a serial number as colon-separated lowercase hex.
///
/// `raw` is the DER INTEGER content; leading zero bytes (the sign byte of a
/// positive integer) are not part of the magnitude and are dropped.
pub fn format_serial(raw: &[u8]) -> String {
    let start = raw.iter().position(|&b| b != 0).unwrap_or(raw.len());
    util::hex_colon_lower(raw.get(start..).unwrap_or_default())
}

/// Format a subject/authority key identifier as colon-separated uppercase hex.
///
/// Uppercase here and lowercase for serials is an output contract.
pub fn format_key_id(id: &[u8]) -> String {
    if id.is_empty() {
        return String::new();
    }
    util::hex_colon_upper(id)
}

/// Format a SAN iPAddress entry.
pub fn format_ip(bytes: &[u8]) -> String {
    if let Ok(octets) = <[u8; 4]>::try_from(bytes) {
        Ipv4Addr::from(octets).to_string()
    } else if let Ok(octets) = <[u8; 16]>::try_from(bytes) {
        IpAddr::V6(Ipv6Addr::from(octets)).to_canonical().to_string()
    } else {
        format!("?{}", hex::encode(bytes))
    }
}

/// Key usage bits in the order they are reported.
const KEY_USAGE_LABELS: [(u16, &str); 7] = [
    (1 << 0, "Digital Signature"),
    (1 << 1, "Non Repudiation"),
    (1 << 2, "Key Encipherment"),
    (1 << 3, "Data Encipherment"),
    (1 << 4, "Key Agreement"),
    (1 << 5, "Certificate Sign"),
    (1 << 6, "CRL Sign"),
];

/// Labels for the key usage bits set in `bits` (bit 0 = digitalSignature).
///
/// encipherOnly and decipherOnly are not reported.
pub fn format_key_usage(bits: u16) -> Vec<String> {
    KEY_USAGE_LABELS
        .iter()
        .filter(|(mask, _)| bits & mask != 0)
        .map(|(_, label)| (*label).to_string())
        .collect()
}

/// Extended key usage purposes with stable integer ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPurpose {
    Any = 0,
    ServerAuth = 1,
    ClientAuth = 2,
    CodeSigning = 3,
    EmailProtection = 4,
    IpsecEndSystem = 5,
    IpsecTunnel = 6,
    IpsecUser = 7,
    TimeStamping = 8,
    OcspSigning = 9,
    MicrosoftServerGatedCrypto = 10,
    NetscapeServerGatedCrypto = 11,
    MicrosoftCommercialCodeSigning = 12,
    MicrosoftKernelCodeSigning = 13,
}

impl KeyPurpose {
    pub fn from_oid(oid_str: &str) -> Option<Self> {
        let purpose = match oid_str {
            oid::EKU_ANY => KeyPurpose::Any,
            oid::EKU_SERVER_AUTH => KeyPurpose::ServerAuth,
            oid::EKU_CLIENT_AUTH => KeyPurpose::ClientAuth,
            oid::EKU_CODE_SIGNING => KeyPurpose::CodeSigning,
            oid::EKU_EMAIL_PROTECTION => KeyPurpose::EmailProtection,
            oid::EKU_IPSEC_END_SYSTEM => KeyPurpose::IpsecEndSystem,
            oid::EKU_IPSEC_TUNNEL => KeyPurpose::IpsecTunnel,
            oid::EKU_IPSEC_USER => KeyPurpose::IpsecUser,
            oid::EKU_TIME_STAMPING => KeyPurpose::TimeStamping,
            oid::EKU_OCSP_SIGNING => KeyPurpose::OcspSigning,
            oid::EKU_MS_SERVER_GATED_CRYPTO => KeyPurpose::MicrosoftServerGatedCrypto,
            oid::EKU_NS_SERVER_GATED_CRYPTO => KeyPurpose::NetscapeServerGatedCrypto,
            oid::EKU_MS_COMMERCIAL_CODE_SIGNING => KeyPurpose::MicrosoftCommercialCodeSigning,
            oid::EKU_MS_KERNEL_CODE_SIGNING => KeyPurpose::MicrosoftKernelCodeSigning,
            _ => return None,
        };
        Some(purpose)
    }

    pub fn id(self) -> u32 {
        self as u32
    }

    /// Display label, for the purposes that have one.
    pub fn label(self) -> Option<&'static str> {
        match self {
            KeyPurpose::ServerAuth => Some("TLS Web Server Authentication"),
            KeyPurpose::ClientAuth => Some("TLS Web Client Authentication"),
            KeyPurpose::CodeSigning => Some("Code Signing"),
            KeyPurpose::EmailProtection => Some("E-mail Protection"),
            KeyPurpose::TimeStamping => Some("Time Stamping"),
            KeyPurpose::OcspSigning => Some("OCSP Signing"),
            _ => None,
        }
    }
}

/// Label one extended key usage purpose given as a dotted OID.
pub fn format_key_purpose(oid_str: &str) -> String {
    match KeyPurpose::from_oid(oid_str) {
        Some(purpose) => match purpose.label() {
            Some(label) => label.to_string(),
            None => format!("Unknown({})", purpose.id()),
        },
        None => format!("Unknown({})", oid_str),
    }
}

/// Label extended key usage purposes, keeping their order.
pub fn format_ext_key_usage<S: AsRef<str>>(oids: &[S]) -> Vec<String> {
    oids.iter().map(|o| format_key_purpose(o.as_ref())).collect()
}

/// Wrap DER bytes in a `CERTIFICATE` PEM block.
pub fn encode_pem(der: &[u8]) -> String {
    format!(
        "-----BEGIN CERTIFICATE-----\n{}\n-----END CERTIFICATE-----\n",
        util::base64_wrap(der)
    )
}

/// Format a Unix timestamp as an ISO 8601 UTC string (`2026-01-21T22:58:43Z`).
pub fn format_timestamp(ts: i64) -> String {
    match ::time::OffsetDateTime::from_unix_timestamp(ts) {
        Ok(dt) => format!(
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            dt.year(),
            u8::from(dt.month()),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        ),
        Err(_) => format!("{}", ts),
    }
}

fn attribute_short_name(oid_str: &str) -> Option<&'static str> {
    match oid_str {
        oid::COMMON_NAME => Some("CN"),
        oid::SERIAL_NUMBER => Some("SERIALNUMBER"),
        oid::COUNTRY => Some("C"),
        oid::LOCALITY => Some("L"),
        oid::STATE_OR_PROVINCE => Some("ST"),
        oid::STREET_ADDRESS => Some("STREET"),
        oid::ORGANIZATION => Some("O"),
        oid::ORGANIZATIONAL_UNIT => Some("OU"),
        oid::POSTAL_CODE => Some("POSTALCODE"),
        oid::DOMAIN_COMPONENT => Some("DC"),
        oid::EMAIL_ADDRESS => Some("emailAddress"),
        _ => None,
    }
}

fn escape_attribute_value(value: &str, out: &mut String) {
    let last = value.chars().count().saturating_sub(1);
    for (i, ch) in value.chars().enumerate() {
        let special = matches!(ch, ',' | '+' | '"' | '\\' | '<' | '>' | ';')
            || (i == 0 && (ch == ' ' || ch == '#'))
            || (i == last && ch == ' ');
        if special {
            out.push('\\');
        }
        out.push(ch);
    }
}

/// Text of a name attribute value, or `None` if it is not a string type.
fn attribute_text<'a>(attr: &AttributeTypeAndValue<'a>) -> Option<Cow<'a, str>> {
    if let Ok(text) = attr.as_str() {
        return Some(Cow::Borrowed(text));
    }
    let data = attr.attr_value().data;
    match attr.attr_value().tag() {
        Tag::BmpString => {
            if data.len() % 2 != 0 {
                return None;
            }
            let units = data
                .chunks_exact(2)
                .map(|pair| pair.iter().fold(0u16, |acc, &b| (acc << 8) | u16::from(b)));
            char::decode_utf16(units)
                .collect::<Result<String, _>>()
                .ok()
                .map(Cow::Owned)
        }
        // Latin-1
        Tag::T61String => Some(Cow::Owned(data.iter().map(|&b| char::from(b)).collect())),
        _ => None,
    }
}

/// Render a distinguished name as an RFC 4514 string.
///
/// RDNs appear most-specific first (`CN=leaf,O=Org,C=US`); attributes of a
/// multi-valued RDN are joined with `+`. Types without a short name, and
/// values that are not strings, render as `<dotted-oid>=#<hex of the DER
/// value>`.
pub fn format_name(name: &X509Name) -> String {
    let rdns: Vec<_> = name.iter().collect();
    let mut out = String::new();
    for (i, rdn) in rdns.iter().rev().enumerate() {
        if i > 0 {
            out.push(',');
        }
        for (j, attr) in rdn.iter().enumerate() {
            if j > 0 {
                out.push('+');
            }
            let type_oid = attr.attr_type().to_id_string();
            match (attribute_short_name(&type_oid), attribute_text(attr)) {
                (Some(short), Some(value)) => {
                    out.push_str(short);
                    out.push('=');
                    escape_attribute_value(&value, &mut out);
                }
                _ => {
                    let value = attr.attr_value();
                    let encoded = value.to_der_vec().unwrap_or_else(|_| value.data.to_vec());
                    out.push_str(&type_oid);
                    out.push_str("=#");
                    out.push_str(&hex::encode(encoded));
                }
            }
        }
    }
    out
}

/// The last common name attribute of `name`, or "" if there is none.
pub fn common_name(name: &X509Name) -> String {
    name.iter_common_name()
        .filter_map(attribute_text)
        .last()
        .map(Cow::into_owned)
        .unwrap_or_default()
}

/// Name of a signature algorithm, or its dotted OID when unrecognised.
pub fn signature_algorithm_name(oid_str: &str) -> String {
    match oid_str {
        oid::MD5_WITH_RSA => "MD5-RSA".into(),
        oid::SHA1_WITH_RSA => "SHA1-RSA".into(),
        oid::SHA256_WITH_RSA => "SHA256-RSA".into(),
        oid::SHA384_WITH_RSA => "SHA384-RSA".into(),
        oid::SHA512_WITH_RSA => "SHA512-RSA".into(),
        oid::RSASSA_PSS => "RSASSA-PSS".into(),
        oid::DSA_WITH_SHA1 => "DSA-SHA1".into(),
        oid::DSA_WITH_SHA256 => "DSA-SHA256".into(),
        oid::ECDSA_WITH_SHA1 => "ECDSA-SHA1".into(),
        oid::ECDSA_WITH_SHA256 => "ECDSA-SHA256".into(),
        oid::ECDSA_WITH_SHA384 => "ECDSA-SHA384".into(),
        oid::ECDSA_WITH_SHA512 => "ECDSA-SHA512".into(),
        oid::ED25519 => "Ed25519".into(),
        oid::ED448 => "Ed448".into(),
        other => other.to_string(),
    }
}

/// Name of a public key algorithm, or its dotted OID when unrecognised.
pub fn public_key_algorithm_name(oid_str: &str) -> String {
    match oid_str {
        oid::RSA_ENCRYPTION => "RSA".into(),
        oid::DSA => "DSA".into(),
        oid::EC_PUBLIC_KEY => "ECDSA".into(),
        oid::ED25519 => "Ed25519".into(),
        oid::ED448 => "Ed448".into(),
        oid::X25519 => "X25519".into(),
        oid::X448 => "X448".into(),
        other => other.to_string(),
    }
}
