//! Ratcliff/Obershelp string similarity and the list deduplicator built on it.
//!
//! The ratio is `2·M / T` where `M` is the total size of the matching blocks found by
//! recursively taking the longest common substring, and `T` the combined length.
//! Thresholds elsewhere (0.92 for items, 0.98 for summaries) are tuned to this metric.

use std::collections::HashMap;

use crate::merge::text::normalize;

pub const DEFAULT_DEDUPE_THRESHOLD: f64 = 0.92;

/// Sequences at least this long drop "popular" characters from the match index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Symmetric similarity in `[0, 1]` between two strings, compared in normalized form.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();
    // The block search is asymmetric when popular characters are pruned, so score both
    // directions and keep the better one.
    ratio(&a, &b).max(ratio(&b, &a))
}

/// Keeps items whose similarity to every already-kept item is strictly below
/// `threshold`. Blank items are skipped; the first-seen form of a duplicate wins.
pub fn dedupe<I, S>(items: I, threshold: f64) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept: Vec<String> = Vec::new();
    for item in items {
        let s = item.as_ref().trim();
        if s.is_empty() {
            continue;
        }
        if kept.iter().any(|prev| similarity(s, prev) >= threshold) {
            continue;
        }
        kept.push(s.to_string());
    }
    kept
}

fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(a, b).matched_len();
    2.0 * matched as f64 / total as f64
}

struct BlockMatcher<'a> {
    a: &'a [char],
    b: &'a [char],
    /// Positions of each character in `b`, ascending.
    b2j: HashMap<char, Vec<usize>>,
}

impl<'a> BlockMatcher<'a> {
    fn new(a: &'a [char], b: &'a [char]) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, c) in b.iter().enumerate() {
            b2j.entry(*c).or_default().push(j);
        }
        if b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b2j.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b2j }
    }

    /// Sum of the sizes of all matching blocks.
    fn matched_len(&self) -> usize {
        let mut total = 0;
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.longest_match(alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest block `a[i..i+k] == b[j..j+k]` inside the given windows, preferring the
    /// earliest start in `a`, then in `b`.
    fn longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (a, b) = (self.a, self.b);
        let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
        let mut j2len: HashMap<usize, usize> = HashMap::new();

        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(c) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j.checked_sub(1).and_then(|p| j2len.get(&p)).copied().unwrap_or(0) + 1;
                    next.insert(j, k);
                    if k > best_k {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_k = k;
                    }
                }
            }
            j2len = next;
        }

        // Grow the block over characters left out of the index.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_k += 1;
        }
        while best_i + best_k < ahi && best_j + best_k < bhi && a[best_i + best_k] == b[best_j + best_k] {
            best_k += 1;
        }

        (best_i, best_j, best_k)
    }
}
