//! Gestalt (Ratcliff–Obershelp) string similarity
//!
//! `ratio = 2·M / T` where `T` is the combined length of both strings and `M`
//! is the total length of the matching blocks found by repeatedly taking the
//! longest common substring and recursing on the unmatched text either side
//! of it.

/// Similarity ratio of two strings in `[0, 1]`
///
/// Two empty strings are identical (1.0). The pair is matched in a canonical
/// order so the result does not depend on argument order.
pub fn gestalt_ratio(a: &str, b: &str) -> f64 {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();

    let total = first.len() + second.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&first, &second) as f64 / total as f64
}

/// Total length of the matching blocks between `a` and `b`
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut queue = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        matched += size;

        if alo < i && blo < j {
            queue.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            queue.push((i + size, ahi, j + size, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]`
///
/// Returns `(start_in_a, start_in_b, size)`. Ties go to the block that
/// starts earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let mut best = (alo, blo, 0);
    let width = bhi - blo + 1;
    // Run length ending at (i - 1, j) and (i, j), offset by one for j = blo
    let mut prev = vec![0usize; width];
    let mut curr = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let idx = j - blo + 1;
            curr[idx] = if a[i] == b[j] { prev[idx - 1] + 1 } else { 0 };

            let size = curr[idx];
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_ratio_known_values() {
        assert!(approx_eq(gestalt_ratio("abcd", "bcde"), 0.75));
        assert!(approx_eq(gestalt_ratio("netflix", "netflix.com"), 14.0 / 18.0));
        // "WIKIMEDIA" / "WIKIMANIA": "WIKIM" + "IA" = 7 of 18
        assert!(approx_eq(gestalt_ratio("WIKIMEDIA", "WIKIMANIA"), 14.0 / 18.0));
    }

    #[test]
    fn test_ratio_identity() {
        for s in ["a", "netflix", "british gas", "£ symbols ok"] {
            assert_eq!(gestalt_ratio(s, s), 1.0);
        }
    }

    #[test]
    fn test_ratio_empty_strings() {
        assert_eq!(gestalt_ratio("", ""), 1.0);
        assert_eq!(gestalt_ratio("abc", ""), 0.0);
        assert_eq!(gestalt_ratio("", "abc"), 0.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(gestalt_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_ratio_symmetry() {
        let pairs = [
            ("netflix", "spotify"),
            ("tesco stores 3041", "tesco store"),
            ("abab", "baba"),
            ("aaabbb", "bbbaaa"),
            ("council tax", "council tx"),
            ("ee limited", "e.on energy"),
            ("xyzabcxyz", "abcxyzabc"),
        ];
        for (a, b) in pairs {
            assert_eq!(gestalt_ratio(a, b), gestalt_ratio(b, a), "{} / {}", a, b);
        }
    }

    #[test]
    fn test_ratio_in_unit_interval() {
        let pairs = [("a", "ab"), ("hello world", "world hello"), ("x", "y")];
        for (a, b) in pairs {
            let r = gestalt_ratio(a, b);
            assert!((0.0..=1.0).contains(&r));
        }
    }

    #[test]
    fn test_ratio_counts_unicode_chars() {
        // One differing char out of four on each side
        assert!(approx_eq(gestalt_ratio("café", "cafe"), 6.0 / 8.0));
    }

    #[test]
    fn test_longest_match_prefers_earliest_block() {
        let a: Vec<char> = "abxab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();
        assert_eq!(longest_match(&a, &b, 0, a.len(), 0, b.len()), (0, 0, 2));
    }

    #[test]
    fn test_matching_chars_recurses_both_sides() {
        let a: Vec<char> = "qabxcd".chars().collect();
        let b: Vec<char> = "abycdf".chars().collect();
        // "ab" then "cd" on the right
        assert_eq!(matching_chars(&a, &b), 4);
    }
}
