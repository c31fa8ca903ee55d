//! Builds a Huffman code table from symbol frequencies.
//!
//! Every symbol starts out as its own node with an empty code. The two lightest nodes
//! are merged over and over: symbols of the first node get a 0 bit in front of their
//! code, symbols of the second one a 1 bit. When one node is left, its symbols carry
//! their final codes.
//!
//! The end-of-stream sentinel takes part in the merging like any other symbol. If the
//! caller did not weight it, it gets weight 1, which also guarantees that a single
//! symbol alphabet still ends up with a 1 bit code.
//!
//! Ties between equal weights go to the node that entered the heap first. The sentinel
//! always enters first, so it loses every tie and ends up with the deepest code its weight
//! allows. Real symbols follow in first-seen order. The result always has optimal total
//! length, but equal-cost alternatives are not canonical.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashMap;

use super::code_table::{Code, CodeTable, MAX_CODE_BITS};
use super::symbol::{Symbol, Token};
use crate::error::{CodecError, Result};

/// A subtree waiting to be merged.
#[derive(Debug)]
struct Node<T> {
    weight: u128,
    /// Heap insertion order, breaks weight ties
    order: usize,
    leaves: Vec<(Symbol<T>, Code)>,
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.order == other.order
    }
}
impl<T> Eq for Node<T> {}

impl<T> PartialOrd for Node<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Node<T> {
    /// Reversed on weight, then insertion order, so the max-heap pops the lightest, oldest node.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Build a code table from (symbol, frequency) pairs.
///
/// Repeated keys are summed. If no `EndOfStream` weight is supplied, the sentinel is
/// added with weight 1. Fails with `EmptyAlphabet` when there is no real symbol.
pub fn build_table<T, I>(frequencies: I) -> Result<CodeTable<T>>
where
    T: Token,
    I: IntoIterator<Item = (Symbol<T>, u64)>,
{
    // Collapse repeated keys, keeping first-seen order
    let mut index: FxHashMap<Symbol<T>, usize> = FxHashMap::default();
    let mut weights: Vec<(Symbol<T>, u64)> = Vec::new();
    for (symbol, freq) in frequencies {
        match index.get(&symbol) {
            Some(&i) => weights[i].1 = weights[i].1.saturating_add(freq),
            None => {
                index.insert(symbol.clone(), weights.len());
                weights.push((symbol, freq));
            }
        }
    }
    if weights.iter().all(|(s, _)| s.is_eof()) {
        return Err(CodecError::EmptyAlphabet);
    }
    // The sentinel goes in front: lowest merge priority among equal weights
    let eof_weight = match index.get(&Symbol::EndOfStream) {
        Some(&i) => weights.remove(i).1,
        None => 1,
    };
    weights.insert(0, (Symbol::EndOfStream, eof_weight));
    let symbol_count = weights.len();

    let mut heap = weights
        .into_iter()
        .enumerate()
        .map(|(order, (symbol, weight))| Node {
            weight: weight as u128,
            order,
            leaves: vec![(symbol, Code::new(0, 0))],
        })
        .collect::<BinaryHeap<_>>();
    let mut next_order = symbol_count;

    // Pare the heap down to a single node. Each merge prefixes one bit to every code below it.
    let root = loop {
        let left = heap.pop().ok_or(CodecError::EmptyAlphabet)?;
        let right = match heap.pop() {
            Some(right) => right,
            None => break left,
        };

        let mut leaves = Vec::with_capacity(left.leaves.len() + right.leaves.len());
        for (symbol, code) in left.leaves {
            leaves.push((symbol, prefixed(code, false)?));
        }
        for (symbol, code) in right.leaves {
            leaves.push((symbol, prefixed(code, true)?));
        }

        heap.push(Node {
            weight: left.weight + right.weight,
            order: next_order,
            leaves,
        });
        next_order += 1;
    };

    let table = CodeTable::new(root.leaves)?;
    debug!(
        "Built code table: {} symbols, longest code {} bits",
        symbol_count,
        table.max_bits()
    );
    Ok(table)
}

/// Put one more bit in front of a partial code.
fn prefixed(code: Code, one: bool) -> Result<Code> {
    if code.bits >= MAX_CODE_BITS {
        return Err(CodecError::InvalidCode {
            symbol: "<merged node>".to_string(),
            bits: code.bits as u32 + 1,
            value: code.value,
        });
    }
    let value = if one {
        (1_u128 << code.bits) + code.value
    } else {
        code.value
    };
    Ok(Code::new(code.bits + 1, value))
}
