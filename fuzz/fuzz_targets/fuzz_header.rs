//! Fuzz target for header lookups.
//!
//! `position` must accept arbitrary bytes, and any k-mer it places must
//! decode back to the same (uppercased) k-mer.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pkt_count_kmers::alphabet::MolType;
use pkt_count_kmers::kmer::{HeaderOrder, KmerHeader, KmerLength};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 6 {
        return;
    }
    let Ok(k) = KmerLength::new(data.len()) else {
        return;
    };

    for moltype in [MolType::Dna, MolType::Protein] {
        for order in [HeaderOrder::Lexicographic, HeaderOrder::Colexicographic] {
            let header = KmerHeader::new(moltype.alphabet(), k, order).expect("k is in range");
            if let Some(i) = header.position(data) {
                assert!(i < header.len());
                let kmer = header.kmer_at(i).expect("position is in range");
                assert_eq!(kmer.as_bytes(), data.to_ascii_uppercase().as_slice());
            }
        }
    }
});
