#![no_main]

use gatekeep_types::claims;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Claim tokens arrive from the host; malformed input must be rejected
    // with an error, never a panic.
    let Ok(token) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(attributes) = claims::decode_claim_token(token) {
        // Whatever decodes must re-encode and decode to the same attributes
        let reencoded = claims::encode_claim_token(&attributes).unwrap();
        let decoded = claims::decode_claim_token(&reencoded).unwrap();
        assert_eq!(decoded, attributes);
    }
});
