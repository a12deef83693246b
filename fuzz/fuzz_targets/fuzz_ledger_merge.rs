#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a serialized ledger: bad lines are reported,
    // never a panic, and each applied line holds at most one entry.
    let mut tangle = volt_ledger::Tangle::new();
    let report = tangle.merge_from_serialized(data);
    assert!(tangle.len() <= report.applied);

    // Whatever was accepted can be serialized and merged again.
    let mut replica = volt_ledger::Tangle::new();
    let _ = replica.merge_from_serialized(&tangle.serialize());

    if let Ok(line) = std::str::from_utf8(data) {
        let _ = volt_ledger::decode_line(line);
    }
});
