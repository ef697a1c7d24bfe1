#![no_main]

use libfuzzer_sys::fuzz_target;
use tlsctl_lib::{decode_pem_chain, encode_pem, DecodedCertificate};

fuzz_target!(|data: &[u8]| {
    // If data parses as DER, wrap it in PEM and decode it again
    if let Ok(cert) = DecodedCertificate::from_der(data) {
        let pem = encode_pem(cert.der());
        let chain = decode_pem_chain(pem.as_bytes()).expect("re-encoded certificate must decode");
        assert_eq!(chain.len(), 1);

        // Decoding the record's own PEM text must be stable
        let again = decode_pem_chain(chain.certificates()[0].pem.as_bytes())
            .expect("record PEM must decode");
        assert_eq!(chain, again, "record mismatch after roundtrip");
    }
});
