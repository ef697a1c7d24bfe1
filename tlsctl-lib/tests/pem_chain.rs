#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::panic,
    clippy::indexing_slicing
)]
//! PEM bundle decoding against fixture and generated certificates.

mod common;

use std::io::Write;
use tlsctl_lib::*;

#[test]
fn fixture_bundle_has_leaf_then_root() {
    let mut input = common::read_fixture("leaf.pem");
    input.extend(common::read_fixture("ca.pem"));

    let chain = decode_pem_chain(&input).unwrap();
    assert_eq!(chain.len(), 2);
    let roles: Vec<_> = chain.iter().map(|r| r.role).collect();
    assert_eq!(roles, vec![CertRole::Leaf, CertRole::Root]);

    let ca = &chain.certificates()[1];
    assert_eq!(ca.common_name, "testca");
    assert_eq!(ca.issuer_common_name, "testca");
    assert_eq!(
        ca.serial_number,
        "3b:6e:ec:0b:8b:5d:1e:42:be:f1:22:ab:6a:e2:41:dc:36:3d:cd:49"
    );
    assert_eq!(
        ca.subject_key_id,
        "43:63:D7:38:EA:78:32:93:CC:D8:54:A5:B5:BE:77:58:04:37:11:40"
    );
    assert_eq!(ca.not_before, "2026-01-21T22:58:38Z");
    assert!(ca.subject_alternative_names.is_empty());
}

#[test]
fn generated_chain_roles() {
    let (root, inter, leaf) = common::three_level_chain("svc.example.net");
    let input = format!("{}{}{}", leaf.pem(), inter.pem(), root.pem());

    let chain = decode_pem_chain(input.as_bytes()).unwrap();
    let roles: Vec<_> = chain.iter().map(|r| r.role).collect();
    assert_eq!(
        roles,
        vec![CertRole::Leaf, CertRole::Intermediate, CertRole::Root]
    );
    let leaf = chain.leaf().unwrap();
    assert_eq!(leaf.subject_alternative_names, vec!["svc.example.net"]);
    assert_eq!(leaf.issuer_common_name, "Integration Intermediate");
}

#[test]
fn ca_first_is_still_leaf() {
    let (root, _inter, leaf) = common::three_level_chain("a.example");
    let input = format!("{}{}", root.pem(), leaf.pem());
    let chain = decode_pem_chain(input.as_bytes()).unwrap();
    assert_eq!(chain.certificates()[0].role, CertRole::Leaf);
    assert_eq!(chain.certificates()[0].common_name, "Integration Root");
    assert_eq!(chain.certificates()[1].role, CertRole::Intermediate);
}

#[test]
fn reencoded_chain_round_trips() {
    let (root, inter, leaf) = common::three_level_chain("rt.example");
    let input = format!("{}{}{}", leaf.pem(), inter.pem(), root.pem());
    let first = decode_pem_chain(input.as_bytes()).unwrap();

    let reencoded: String = first.iter().map(|r| r.pem.as_str()).collect();
    let second = decode_pem_chain(reencoded.as_bytes()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pem_field_matches_der() {
    let (_root, _inter, leaf) = common::three_level_chain("der.example");
    let chain = decode_pem_chain(leaf.pem().as_bytes()).unwrap();
    assert_eq!(chain.leaf().unwrap().pem, encode_pem(&leaf.der()));
}

#[test]
fn private_key_only_is_empty_chain() {
    let (_root, _inter, leaf) = common::three_level_chain("key.example");
    let err = decode_pem_chain(leaf.key.serialize_pem().as_bytes()).unwrap_err();
    assert!(matches!(err, TlsctlError::EmptyChain));
    assert_eq!(err.to_string(), "no certificates found");
}

#[test]
fn key_blocks_between_certificates_are_skipped() {
    let (_root, inter, leaf) = common::three_level_chain("mixed.example");
    let input = format!(
        "{}{}{}{}",
        leaf.pem(),
        leaf.key.serialize_pem(),
        inter.pem(),
        inter.key.serialize_pem()
    );
    let chain = decode_pem_chain(input.as_bytes()).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.certificates()[1].common_name, "Integration Intermediate");
}

#[test]
fn malformed_certificate_block_fails_whole_decode() {
    let (_root, inter, leaf) = common::three_level_chain("bad.example");
    let input = format!(
        "{}-----BEGIN CERTIFICATE-----\naW52YWxpZA==\n-----END CERTIFICATE-----\n{}",
        leaf.pem(),
        inter.pem()
    );
    let err = decode_pem_chain(input.as_bytes()).unwrap_err();
    assert!(matches!(err, TlsctlError::CertificateParse(_)));
    assert!(err.to_string().starts_with("failed to parse certificate"));
}

#[test]
fn decode_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&common::read_fixture("ca.pem")).unwrap();
    file.flush().unwrap();

    let data = std::fs::read(file.path()).unwrap();
    let chain = decode_pem_chain(&data).unwrap();
    assert_eq!(chain.leaf().unwrap().common_name, "testca");
}

#[test]
fn normalize_direct() {
    let (root, inter, _leaf) = common::three_level_chain("n.example");
    let inter_der = inter.der();
    let root_der = root.der();
    let certs = vec![
        DecodedCertificate::from_der(&inter_der).unwrap(),
        DecodedCertificate::from_der(&root_der).unwrap(),
    ];
    let chain = normalize(&certs).unwrap();
    assert_eq!(chain.len(), 2);
    assert_eq!(chain.certificates()[1].role, CertRole::Root);
    assert!(matches!(normalize(&[]), Err(TlsctlError::EmptyChain)));
}

#[test]
fn classify_matches_normalized_roles() {
    let der = {
        let pem = common::read_fixture("ca.pem");
        let (_, block) = x509_parser::pem::parse_x509_pem(&pem).unwrap();
        block.contents
    };
    let cert = DecodedCertificate::from_der(&der).unwrap();
    assert_eq!(classify(0, &cert), CertRole::Leaf);
    assert_eq!(classify(1, &cert), CertRole::Root);
}
