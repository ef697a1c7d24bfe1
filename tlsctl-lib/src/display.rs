//! Human-readable, JSON, and YAML rendering of certificate chains.

use crate::fields::{BasicConstraints, CertificateRecord, ChainInfo};
use crate::TlsctlError;
use std::borrow::Cow;
use std::str::FromStr;

/// Output formats accepted by [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = TlsctlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "yaml" => Ok(OutputFormat::Yaml),
            other => Err(TlsctlError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `chain` in the format named by `format`.
///
/// Fails with [`TlsctlError::UnsupportedFormat`] for anything other than
/// `text`, `json`, or `yaml`.
pub fn render(chain: &ChainInfo, format: &str, include_pem: bool) -> Result<String, TlsctlError> {
    render_as(chain, format.parse()?, include_pem)
}

/// Render `chain` as `format`.
///
/// Without `include_pem`, PEM text is cleared on a copy of the chain; `chain`
/// itself is never modified.
pub fn render_as(
    chain: &ChainInfo,
    format: OutputFormat,
    include_pem: bool,
) -> Result<String, TlsctlError> {
    let chain: Cow<'_, ChainInfo> = if include_pem {
        Cow::Borrowed(chain)
    } else {
        Cow::Owned(chain.without_pem())
    };
    match format {
        OutputFormat::Text => Ok(display_text(&chain)),
        OutputFormat::Json => to_json(&chain),
        OutputFormat::Yaml => to_yaml(&chain),
    }
}

fn push_line(out: &mut String, label: &str, value: &str) {
    if value.is_empty() {
        return;
    }
    out.push_str(&format!("{:<23}{}\n", format!("{}:", label), value));
}

fn push_list(out: &mut String, label: &str, values: &[String]) {
    push_line(out, label, &values.join(", "));
}

fn basic_constraints_text(bc: &BasicConstraints) -> String {
    match bc.max_path_len {
        Some(n) => format!("CA: {}, Max Path Length: {}", bc.is_ca, n),
        None => format!("CA: {}", bc.is_ca),
    }
}

fn record_text(out: &mut String, rec: &CertificateRecord) {
    out.push_str(&format!("[{}]\n", rec.role.as_str().to_uppercase()));
    push_line(out, "Version", &rec.version.to_string());
    push_line(out, "Serial Number", &rec.serial_number);
    push_line(out, "Signature Algorithm", &rec.signature_algorithm);
    push_line(out, "Issuer", &rec.issuer);
    push_line(out, "Issuer CN", &rec.issuer_common_name);
    push_line(out, "Subject", &rec.subject);
    push_line(out, "Common Name", &rec.common_name);
    push_line(out, "Valid From", &rec.not_before);
    push_line(out, "Valid Until", &rec.not_after);
    push_line(out, "Public Key Algorithm", &rec.public_key_algorithm);
    push_list(out, "Key Usage", &rec.key_usage);
    push_list(out, "Extended Key Usage", &rec.extended_key_usage);
    if let Some(bc) = &rec.basic_constraints {
        push_line(out, "Basic Constraints", &basic_constraints_text(bc));
    }
    push_line(out, "Subject Key ID", &rec.subject_key_id);
    push_line(out, "Authority Key ID", &rec.authority_key_id);
    push_list(out, "Subject Alt Names", &rec.subject_alternative_names);
    push_list(out, "Email Addresses", &rec.email_addresses);
    push_list(out, "IP Addresses", &rec.ip_addresses);
    push_list(out, "OCSP Servers", &rec.ocsp_servers);
    push_list(out, "CA Issuers", &rec.issuing_cert_url);
    push_list(out, "CRL Dist Points", &rec.crl_distribution_points);
    if !rec.pem.is_empty() {
        out.push_str("PEM:\n");
        out.push_str(&rec.pem);
    }
}

/// Format a chain as human-readable text, one block per certificate.
///
/// Fields that are empty are left out. Blocks are separated by one blank line.
/// PEM text is printed whenever a record carries it.
pub fn display_text(chain: &ChainInfo) -> String {
    let mut out = String::new();
    for (i, rec) in chain.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        record_text(&mut out, rec);
    }
    out
}

/// Serialize a chain to a pretty-printed JSON string ending in a newline.
pub fn to_json(chain: &ChainInfo) -> Result<String, TlsctlError> {
    let mut json = serde_json::to_string_pretty(chain)?;
    json.push('\n');
    Ok(json)
}

/// Serialize a chain to YAML.
pub fn to_yaml(chain: &ChainInfo) -> Result<String, TlsctlError> {
    Ok(serde_yaml::to_string(chain)?)
}
