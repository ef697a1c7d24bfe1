#![no_main]

use libfuzzer_sys::fuzz_target;
use tlsctl_lib::{decode_pem_chain, render};

fuzz_target!(|data: &[u8]| {
    // Decoding must never panic, regardless of input.
    if let Ok(chain) = decode_pem_chain(data) {
        assert!(!chain.is_empty(), "decoded chain is empty");

        // Exercise every renderer, with and without PEM text
        for format in ["text", "json", "yaml"] {
            let _ = render(&chain, format, false);
            let _ = render(&chain, format, true);
        }
    }
});
