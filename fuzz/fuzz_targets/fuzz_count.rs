//! Fuzz target for counting arbitrary bytes.
//!
//! Both strategies must accept any input, count exactly the windows made of
//! alphabet symbols, and agree on every k-mer.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pkt_count_kmers::alphabet::MolType;
use pkt_count_kmers::count::count_with;
use pkt_count_kmers::strategy::{RollingIndex, WindowTally};

fuzz_target!(|data: &[u8]| {
    let Some((&first, seq)) = data.split_first() else {
        return;
    };
    let k = usize::from(first % 8) + 1;
    let dna = MolType::Dna.alphabet();

    let rolling = count_with(&RollingIndex, &dna, seq, k).expect("k is in range");
    let tally = count_with(&WindowTally, &dna, seq, k).expect("k is in range");

    let valid = seq
        .windows(k)
        .filter(|w| w.iter().all(|&b| dna.contains(b)))
        .count() as u64;
    assert_eq!(rolling.total(), valid);
    assert_eq!(rolling.to_map(), tally.to_map());
});
