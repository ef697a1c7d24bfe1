//! Certificate role classification.

use crate::certificate::DecodedCertificate;
use crate::fields::CertRole;
use crate::format::format_name;

/// Determine the role of the certificate at `position` in a chain.
///
/// Position 0 is always the leaf, whatever its CA flag says. Later positions
/// are `Root` when the certificate is a CA and its rendered issuer and subject
/// names are the same string, and `Intermediate` otherwise.
///
/// The self-signed test is a string-equality heuristic on the rendered names.
/// No signature is checked, so a CA whose issuer merely shares its subject's
/// name is also reported as a root.
pub fn classify(position: usize, cert: &DecodedCertificate<'_>) -> CertRole {
    if position == 0 {
        return CertRole::Leaf;
    }
    if cert.is_ca() && format_name(cert.issuer()) == format_name(cert.subject()) {
        CertRole::Root
    } else {
        CertRole::Intermediate
    }
}
