//! Score normalisation and dense ranking shared by both ranking modes.

/// Raw similarities are reported on a 0–100 percentage scale.
pub const SCORE_SCALE: f64 = 100.0;

/// Local-mode score: dot product scaled to a percentage, clamped to [0, 100].
/// A NaN similarity (degenerate embedding) scores 0.
pub fn scale_local_score(raw: f32) -> f64 {
    let scaled = f64::from(raw) * SCORE_SCALE;
    if scaled.is_nan() {
        0.0
    } else {
        scaled.clamp(0.0, SCORE_SCALE)
    }
}

/// Database-mode score: similarity scaled to a percentage, not clamped.
pub fn scale_database_score(raw: f32) -> f64 {
    f64::from(raw) * SCORE_SCALE
}

/// Sorts by descending score (stable, so ties keep input order), keeps the first `k`
/// and pairs each item with its 1-based dense rank.
pub fn dense_rank<T, F>(mut items: Vec<T>, score: F, k: usize) -> Vec<(usize, T)>
where
    F: Fn(&T) -> f64,
{
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
    items
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, item)| (i + 1, item))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_score_is_clamped() {
        assert_eq!(scale_local_score(-0.2), 0.0);
        assert_eq!(scale_local_score(1.3), 100.0);
        assert!((scale_local_score(0.5) - 50.0).abs() < 1e-9);
        assert_eq!(scale_local_score(f32::NAN), 0.0);
    }

    #[test]
    fn test_database_score_is_not_clamped() {
        assert!((scale_database_score(1.25) - 125.0).abs() < 1e-9);
        assert!(scale_database_score(-0.5) < 0.0);
    }

    #[test]
    fn test_dense_rank_orders_and_numbers_without_gaps() {
        let items = vec![("a", 10.0), ("b", 90.0), ("c", 50.0)];
        let ranked = dense_rank(items, |(_, s)| *s, 10);
        let view: Vec<(usize, &str)> = ranked.iter().map(|(r, (id, _))| (*r, *id)).collect();
        assert_eq!(view, vec![(1, "b"), (2, "c"), (3, "a")]);
    }

    #[test]
    fn test_dense_rank_ties_keep_input_order() {
        let items = vec![("first", 70.0), ("second", 70.0), ("third", 80.0)];
        let ranked = dense_rank(items, |(_, s)| *s, 10);
        let ids: Vec<&str> = ranked.iter().map(|(_, (id, _))| *id).collect();
        assert_eq!(ids, vec!["third", "first", "second"]);
    }

    #[test]
    fn test_dense_rank_truncates_to_k() {
        let items: Vec<f64> = (0..10).map(f64::from).collect();
        let ranked = dense_rank(items, |s| *s, 3);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0], (1, 9.0));
        assert_eq!(ranked[2], (3, 7.0));
        assert!(dense_rank(vec![1.0], |s: &f64| *s, 0).is_empty());
    }
}
