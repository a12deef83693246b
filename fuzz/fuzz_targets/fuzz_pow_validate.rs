#![no_main]

use libfuzzer_sys::fuzz_target;

use volt_work::{meets_difficulty, validate_work, PowVariant, WorkConfig, WorkGenerator};

fuzz_target!(|data: &[u8]| {
    // Validate arbitrary (variant, nonce, difficulty, payload) tuples.
    // Requires at least 10 bytes: 1 (variant) + 8 (nonce) + 1 (difficulty).
    if data.len() < 10 {
        return;
    }
    let variant = PowVariant::all()[data[0] as usize % 4];
    let mut nonce_bytes = [0u8; 8];
    nonce_bytes.copy_from_slice(&data[1..9]);
    let nonce = u64::from_le_bytes(nonce_bytes);
    let difficulty = u32::from(data[9]);
    let payload = String::from_utf8_lossy(&data[10..]);

    let generator = WorkGenerator::new(WorkConfig::new(variant).with_clockwork_rounds(8));
    let valid = validate_work(&generator, &payload, nonce, difficulty);
    assert_eq!(valid, meets_difficulty(&generator.attempt(&payload, nonce), difficulty));

    // Anything beyond the digest length can never be met.
    if difficulty > 64 {
        assert!(!valid);
    }
});
