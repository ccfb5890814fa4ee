//! Score/threshold/sort pipeline over arbitrary collections.
//!
//! # Invariants
//! - Elements scoring above the threshold are dropped; equal is kept.
//! - Output is ascending by score; ties keep their input order.
//! - Scores never escape a single call.

/// Threshold used by [`rank`] when the caller has no tighter bound.
pub const DEFAULT_MAX_DISTANCE: usize = 20;

/// Ranks `elements` by `score` using [`DEFAULT_MAX_DISTANCE`].
pub fn rank<T, F>(elements: Vec<T>, score: F) -> Vec<T>
where
    F: FnMut(&T) -> usize,
{
    rank_by(elements, score, DEFAULT_MAX_DISTANCE)
}

/// Scores every element, drops those above `max_distance` and returns the
/// rest ordered by ascending score.
///
/// `Vec::sort_by_key` is stable, so equally scored elements stay in their
/// original relative order.
pub fn rank_by<T, F>(elements: Vec<T>, mut score: F, max_distance: usize) -> Vec<T>
where
    F: FnMut(&T) -> usize,
{
    let mut scored: Vec<(usize, T)> = elements
        .into_iter()
        .filter_map(|element| {
            let distance = score(&element);
            (distance <= max_distance).then_some((distance, element))
        })
        .collect();

    scored.sort_by_key(|(distance, _)| *distance);
    scored.into_iter().map(|(_, element)| element).collect()
}
