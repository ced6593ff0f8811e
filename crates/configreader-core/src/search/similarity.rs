//! Ratcliff/Obershelp string similarity.
//!
//! The score of two strings `a` and `b` is `2·M / (|a| + |b|)`, where `M` is
//! the number of characters in their matching blocks.  Matching blocks are
//! found by taking the longest common substring, then recursing into the
//! unmatched text on its left and on its right.  The score is always within
//! `[0, 1]`: identical strings score `1.0`, strings with no character in
//! common score `0.0`, and two empty strings are considered identical.
//!
//! Lengths are measured in `char`s, not bytes.

/// Returns the similarity ratio of `a` and `b` in `[0, 1]`.
///
/// # Examples
///
/// ```rust
/// use configreader_core::search::similarity::ratio;
///
/// assert_eq!(ratio("reader", "reader"), 1.0);
/// assert_eq!(ratio("abc", "xyz"), 0.0);
/// assert!(ratio("confgreader", "configreader") > 0.95);
/// ```
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Sums the lengths of all matching blocks between `a` and `b`.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Finds the longest common substring of `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Returns `(i, j, k)` such that `a[i..i+k] == b[j..j+k]`.  Among equally long
/// blocks the one starting earliest in `a` wins, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // prev[j + 1] = length of the common run ending at a[i - 1], b[j].
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        for j in blo..bhi {
            curr[j + 1] = if a[i] == b[j] { prev[j] + 1 } else { 0 };
            let k = curr[j + 1];
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_k)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
