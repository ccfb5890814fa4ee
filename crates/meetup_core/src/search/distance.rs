//! Levenshtein edit distance.
//!
//! # Invariants
//! - Insertion, deletion and substitution each cost 1.
//! - Comparison is over raw `char`s; callers case-fold before calling.
//! - Auxiliary memory is two rows sized by the shorter input.

/// Returns the edit distance between `a` and `b`.
///
/// Identical inputs (including two empty strings) return 0 without
/// allocating.
pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (longer, shorter) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if shorter.is_empty() {
        return longer.len();
    }

    let mut prev_row: Vec<usize> = (0..=shorter.len()).collect();
    let mut curr_row = vec![0; shorter.len() + 1];

    for (i, long_ch) in longer.iter().enumerate() {
        curr_row[0] = i + 1;
        for (j, short_ch) in shorter.iter().enumerate() {
            let cost = usize::from(long_ch != short_ch);
            curr_row[j + 1] = (prev_row[j + 1] + 1)
                .min(curr_row[j] + 1)
                .min(prev_row[j] + cost);
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[shorter.len()]
}

#[cfg(test)]
mod tests {
    use super::levenshtein;

    #[test]
    fn identical_strings_have_zero_distance() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("nickname", "nickname"), 0);
    }

    #[test]
    fn empty_side_costs_full_length() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abcd", ""), 4);
        assert_eq!(levenshtein("", "żółw"), 4);
    }

    #[test]
    fn classic_examples() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("saturday", "sunday"), 3);
        assert_eq!(levenshtein("a", "b"), 1);
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ("kitten", "sitting"),
            ("alice", "alicia"),
            ("", "bob"),
            ("bob@example.com", "rob@example.org"),
        ];
        for (a, b) in pairs {
            assert_eq!(levenshtein(a, b), levenshtein(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn case_is_not_folded() {
        assert_eq!(levenshtein("Alice", "alice"), 1);
    }

    #[test]
    fn multibyte_chars_count_once() {
        assert_eq!(levenshtein("café", "cafe"), 1);
    }
}
