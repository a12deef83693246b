#![no_main]

use std::time::{Duration, Instant};

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Single packet decode must never panic.
    let _ = volt_protocol::Packet::decode(data);

    // Feed the input as a stream of length-prefixed packets.
    let start = Instant::now();
    let mut reassembler = volt_protocol::Reassembler::new(Duration::from_secs(5));
    let mut rest = data;
    let mut tick = 0u64;
    while let Some((&len, tail)) = rest.split_first() {
        let take = (len as usize).min(tail.len());
        let (raw, next) = tail.split_at(take);
        let now = start + Duration::from_millis(tick * 250);
        if let Some(done) = reassembler.accept(raw, now) {
            assert!(!done.payload.is_empty());
        }
        let _ = reassembler.expire(now);
        rest = next;
        tick += 1;
    }
});
