//! projection-name shortener
//!
//! deep projection trees concatenate field names into class-name prefixes
//! that can exceed what filesystems and compilers tolerate. when the short
//! names policy is on, overlong prefixes are truncated and, if the truncation
//! collides with the shortened form of a different prefix, disambiguated with
//! a stable hash suffix of the original. results are memoized so a class name
//! and every reference to it shorten identically within a run.

use std::collections::{BTreeMap, BTreeSet};

/// prefixes at or under this length pass through untouched
const MAX_PREFIX_LEN: usize = 48;

/// run-scoped shortener for generated class-name prefixes
#[derive(Debug)]
pub struct Shortener {
    enabled: bool,
    assigned: BTreeMap<String, String>,
    taken: BTreeSet<String>,
}

impl Shortener {
    /// create a shortener; when `enabled` is false every prefix passes through
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            assigned: BTreeMap::new(),
            taken: BTreeSet::new(),
        }
    }

    /// shorten a class-name prefix
    ///
    /// deterministic for a given sequence of calls: the same prefix always
    /// maps to the same result, and two distinct prefixes never map to the
    /// same result.
    pub fn shorten(&mut self, prefix: &str) -> String {
        if !self.enabled || prefix.len() <= MAX_PREFIX_LEN {
            return prefix.to_string();
        }

        if let Some(short) = self.assigned.get(prefix) {
            return short.clone();
        }

        let mut candidate: String = prefix.chars().take(MAX_PREFIX_LEN).collect();
        if self.taken.contains(&candidate) {
            let stem: String = prefix.chars().take(MAX_PREFIX_LEN - 9).collect();
            let digest = fnv1a_hex(prefix);
            candidate = format!("{}_{}", stem, &digest[..8]);
            if self.taken.contains(&candidate) {
                candidate = format!("{stem}_{digest}");
            }
            if self.taken.contains(&candidate) {
                // full-digest collision between distinct prefixes; a run-local
                // counter keeps the name unique
                candidate = format!("{stem}_{digest}_{}", self.assigned.len());
            }
        }

        self.taken.insert(candidate.clone());
        self.assigned.insert(prefix.to_string(), candidate.clone());
        candidate
    }
}

/// hex digest of the 64-bit fnv-1a hash of a string
///
/// inlined rather than taken from std: the std hashers are not specified to
/// produce stable values, and shortened names must not change between runs.
fn fnv1a_hex(input: &str) -> String {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET;
    for byte in input.as_bytes() {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    format!("{hash:016x}")
}
