#![no_main]

use common::jwt::{peek_session_claims, verify_session_token, MAX_JWT_SIZE_BYTES};
use libfuzzer_sys::fuzz_target;

const FUZZ_SECRET: &[u8] = b"fuzz-signing-secret-0123456789ab";

fuzz_target!(|data: &[u8]| {
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    // Neither path may panic on arbitrary input.
    let peeked = peek_session_claims(token);
    let verified = verify_session_token(token, FUZZ_SECRET);

    if token.len() > MAX_JWT_SIZE_BYTES {
        assert!(peeked.is_err());
        assert!(verified.is_err());
    }

    // Anything that verifies must also be readable without the key.
    if let Ok(claims) = verified {
        assert_eq!(peeked.ok(), Some(claims));
    }
});
