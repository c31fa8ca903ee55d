use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::huffman_coding::symbol::Token;

/// Histogram of a byte sample, indexed by byte value.
///
/// This is the frequency table behind `Codec::from_bytes` and `huffcodec train --alphabet
/// bytes`. Samples over 64k are split into chunks counted in parallel, then summed.
pub fn byte_freqs(data: &[u8]) -> [u64; 256] {
    let tally = |mut freqs: [u64; 256], chunk: &[u8]| {
        chunk.iter().for_each(|&byte| freqs[byte as usize] += 1);
        freqs
    };
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(|| [0_u64; 256], |freqs, chunk| tally(freqs, chunk))
            .reduce(
                || [0_u64; 256],
                |mut total, part| {
                    total.iter_mut().zip(part).for_each(|(t, p)| *t += p);
                    total
                },
            )
    } else {
        tally([0_u64; 256], data)
    }
}

/// Count any symbols. Pairs come back in the order each symbol was first seen.
pub fn count<T, I>(data: I) -> Vec<(T, u64)>
where
    T: Token,
    I: IntoIterator<Item = T>,
{
    let mut index: FxHashMap<T, usize> = FxHashMap::default();
    let mut freqs: Vec<(T, u64)> = Vec::new();
    for symbol in data {
        match index.get(&symbol) {
            Some(&i) => freqs[i].1 += 1,
            None => {
                index.insert(symbol.clone(), freqs.len());
                freqs.push((symbol, 1));
            }
        }
    }
    freqs
}
