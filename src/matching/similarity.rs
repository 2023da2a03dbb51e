//! Gestalt (Ratcliff/Obershelp) string similarity.
//!
//! The score of two sequences is `2 * M / T`, where `T` is their combined
//! length and `M` is the number of characters in the matching blocks found by
//! repeatedly taking the longest common substring and recursing on the pieces
//! to its left and right. Identical sequences score 1.0 and sequences with
//! nothing in common score 0.0.
//!
//! The query side is indexed once ([`QueryMatcher::new`]) and then scored
//! against every reference text, so a catalog scan costs one index build plus
//! one block search per entry.

use std::collections::HashMap;

/// Queries at least this long have their most frequent characters left out
/// of the longest-match index.
pub const POPULAR_CHAR_MIN_LEN: usize = 200;

/// Safely convert usize to f64 for ratio calculations
#[inline]
fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// Lower-case and trim text for comparison
#[must_use]
pub fn normalize(text: &str) -> Vec<char> {
    text.trim().to_lowercase().chars().collect()
}

/// `2 * matches / total`, with two empty sequences counting as identical
#[inline]
fn ratio_of(matches: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        2.0 * count_to_f64(matches) / count_to_f64(total)
    }
}

/// A normalized query with its character position index
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    query: Vec<char>,

    /// char -> ascending positions in `query` (popular chars removed)
    positions: HashMap<char, Vec<usize>>,

    /// char -> occurrence count in `query`
    counts: HashMap<char, usize>,
}

impl QueryMatcher {
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self::from_chars(normalize(query))
    }

    #[must_use]
    pub fn from_chars(query: Vec<char>) -> Self {
        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        let mut counts: HashMap<char, usize> = HashMap::new();

        for (j, &c) in query.iter().enumerate() {
            positions.entry(c).or_default().push(j);
            *counts.entry(c).or_default() += 1;
        }

        if query.len() >= POPULAR_CHAR_MIN_LEN {
            let limit = query.len() / 100 + 1;
            positions.retain(|_, idxs| idxs.len() <= limit);
        }

        Self {
            query,
            positions,
            counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn len(&self) -> usize {
        self.query.len()
    }

    /// Similarity of `reference` to the query in [0, 1]
    #[must_use]
    pub fn ratio(&self, reference: &[char]) -> f64 {
        ratio_of(
            self.matching_characters(reference),
            reference.len() + self.query.len(),
        )
    }

    /// Upper bound on [`ratio`](Self::ratio) from shared character counts
    #[must_use]
    pub fn quick_ratio(&self, reference: &[char]) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        let mut matches = 0usize;

        for &c in reference {
            let left = available
                .entry(c)
                .or_insert_with(|| self.counts.get(&c).copied().unwrap_or(0));
            if *left > 0 {
                *left -= 1;
                matches += 1;
            }
        }

        ratio_of(matches, reference.len() + self.query.len())
    }

    /// Upper bound on [`quick_ratio`](Self::quick_ratio) from lengths alone
    #[must_use]
    pub fn real_quick_ratio(&self, reference: &[char]) -> f64 {
        let la = reference.len();
        let lb = self.query.len();
        ratio_of(la.min(lb), la + lb)
    }

    /// Total size of all matching blocks between `reference` and the query
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut total = 0usize;
        let mut queue = vec![(0, a.len(), 0, self.query.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let (i, j, k) = self.find_longest_match(a, alo, ahi, blo, bhi);
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

    /// Longest common block of `a[alo..ahi]` and `query[blo..bhi]`.
    ///
    /// Returns `(i, j, size)`. Among equally long blocks the one starting
    /// earliest in `a` wins, then earliest in the query.
    fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.query;
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the match ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next: HashMap<usize, usize> = HashMap::new();
            if let Some(indices) = self.positions.get(c) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let prev = if j > 0 {
                        j2len.get(&(j - 1)).copied().unwrap_or(0)
                    } else {
                        0
                    };
                    let k = prev + 1;
                    next.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = next;
        }

        // Popular characters are not indexed; grow the block across them
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        (besti, bestj, bestsize)
    }
}

/// One-off similarity of two strings (case-insensitive, trimmed)
#[must_use]
pub fn similarity(reference: &str, query: &str) -> f64 {
    QueryMatcher::new(query).ratio(&normalize(reference))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_identical_is_one() {
        assert!(close(similarity("solar panels", "solar panels"), 1.0));
        assert!(close(similarity("Solar Panels", "  solar PANELS "), 1.0));
    }

    #[test]
    fn test_disjoint_is_zero() {
        assert!(close(similarity("abc", "xyz"), 0.0));
    }

    #[test]
    fn test_known_ratios() {
        // 2 * 3 / 8
        assert!(close(similarity("abcd", "bcde"), 0.75));
        // "solar panels" is a 12-char block inside a 40-char query
        assert!(close(
            similarity("solar panels", "shipping solar panels from vietnam to us"),
            24.0 / 52.0
        ));
        assert!(close(similarity("laptop computers", "laptop"), 12.0 / 22.0));
    }

    #[test]
    fn test_ratio_is_order_sensitive_but_bounded() {
        let matcher = QueryMatcher::new("screws of steel");
        let reference = normalize("steel screws");

        // Only "screws" or "steel" can be taken as a block, not both
        assert!(close(matcher.ratio(&reference), 12.0 / 27.0));
        assert!(close(matcher.quick_ratio(&reference), 24.0 / 27.0));
        assert!(matcher.ratio(&reference) <= matcher.quick_ratio(&reference));
        assert!(matcher.quick_ratio(&reference) <= matcher.real_quick_ratio(&reference));
    }

    #[test]
    fn test_empty_sequences() {
        let empty = QueryMatcher::new("   ");
        assert!(empty.is_empty());
        assert!(close(empty.ratio(&[]), 1.0));
        assert!(close(empty.ratio(&normalize("solar")), 0.0));
    }

    #[test]
    fn test_long_query_skips_popular_characters() {
        let query = vec!["lithium batteries"; 12].join(" ");
        assert!(query.len() >= POPULAR_CHAR_MIN_LEN);

        let matcher = QueryMatcher::new(&query);
        let reference = normalize("lithium-ion batteries");

        // Every query character is popular, so only the leading "lithium"
        // block survives via extension
        assert!(close(
            matcher.ratio(&reference),
            14.0 / (21.0 + query.len() as f64)
        ));
    }
}
