#![no_main]

use libfuzzer_sys::fuzz_target;

use volt_ledger::SharedTangle;
use volt_network::GossipMessage;

fuzz_target!(|data: &[u8]| {
    // Neither wire form may panic, and a failed receive leaves the ledger empty.
    let _ = GossipMessage::decode_addressed(data);

    let tangle = SharedTangle::default();
    if volt_network::receive(data, &tangle).is_err() {
        assert!(tangle.is_empty());
    }
});
