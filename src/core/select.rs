//! Weighted passage selection.
//!
//! Selection weight is `1 - average`, so badly-scored and never-attempted
//! highlights draw more probability mass. Weights are normalized over the
//! whole list, the list is sorted ascending by weight, and a cumulative array
//! over the full list supports sampling by binary search. Picking is
//! restricted to the least-attempted highlights; draws landing outside that
//! pool are rejected and retried.

use rand::Rng;

use crate::core::engine::Highlight;

/// Bound on rejection draws before falling back to a uniform pool pick. A
/// pool member can carry zero probability mass (a perfect average), in which
/// case rejection sampling alone would never terminate.
const MAX_REJECTION_DRAWS: usize = 32;

/// Recomputes every highlight's cumulative selection weight. Sorts the slice
/// ascending by weight, so callers must not hold indices across this call.
pub fn assign_weights(highlights: &mut [Highlight]) {
    if highlights.is_empty() {
        return;
    }

    let mut total = 0.0;
    for h in highlights.iter_mut() {
        h.cumulative = 1.0 - h.score.average();
        total += h.cumulative;
    }
    if total > f64::EPSILON {
        for h in highlights.iter_mut() {
            h.cumulative /= total;
        }
    } else {
        // every highlight has a perfect average; degrade to uniform
        let uniform = 1.0 / highlights.len() as f64;
        for h in highlights.iter_mut() {
            h.cumulative = uniform;
        }
    }

    highlights.sort_by(|a, b| a.cumulative.total_cmp(&b.cumulative));
    let mut running = 0.0;
    for h in highlights.iter_mut() {
        running += h.cumulative;
        h.cumulative = running;
    }
}

/// Picks the next highlight to quiz, restricted to the highlights whose
/// attempt count equals the global minimum. Returns an index into the slice,
/// or `None` for an empty corpus.
pub fn pick(highlights: &[Highlight], rng: &mut impl Rng) -> Option<usize> {
    let min_count = highlights.iter().map(|h| h.score.count).min()?;
    let pool: Vec<usize> = (0..highlights.len())
        .filter(|&i| highlights[i].score.count == min_count)
        .collect();

    for _ in 0..MAX_REJECTION_DRAWS {
        let target = rng.gen::<f64>();
        let at = highlights
            .partition_point(|h| h.cumulative < target)
            .min(highlights.len() - 1);
        if pool.binary_search(&at).is_ok() {
            return Some(at);
        }
    }
    // the drawn buckets kept missing the pool; pick uniformly within it
    Some(pool[rng.gen_range(0..pool.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Score;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn highlight(index: usize, score: Score) -> Highlight {
        Highlight {
            id: format!("h{index}"),
            content: String::new(),
            tokens: Vec::new(),
            spans: Vec::new(),
            score,
            cumulative: 0.0,
            index,
        }
    }

    #[test]
    fn empty_list_yields_no_pick() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(pick(&[], &mut rng), None);
    }

    #[test]
    fn cumulative_weights_cover_the_unit_interval() {
        let mut highlights = vec![
            highlight(0, Score::new(1.5, 2)),
            highlight(1, Score::default()),
            highlight(2, Score::new(0.5, 1)),
        ];
        assign_weights(&mut highlights);
        let mut previous = 0.0;
        for h in &highlights {
            assert!(h.cumulative >= previous);
            previous = h.cumulative;
        }
        assert!((previous - 1.0).abs() < 1e-9);
    }

    #[test]
    fn never_picks_above_the_minimum_attempt_count() {
        let mut highlights = vec![
            highlight(0, Score::new(2.0, 2)),
            highlight(1, Score::default()),
            highlight(2, Score::new(0.5, 1)),
            highlight(3, Score::default()),
        ];
        assign_weights(&mut highlights);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let at = pick(&highlights, &mut rng).unwrap();
            assert_eq!(highlights[at].score.count, 0);
        }
    }

    #[test]
    fn all_perfect_averages_fall_back_to_uniform() {
        // average 1.0 needs sum = count*(count+1)/2 + 1
        let mut highlights = vec![
            highlight(0, Score::new(2.0, 1)),
            highlight(1, Score::new(2.0, 1)),
        ];
        assign_weights(&mut highlights);
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 2];
        for _ in 0..100 {
            seen[pick(&highlights, &mut rng).unwrap()] = true;
        }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn single_highlight_is_always_picked() {
        let mut highlights = vec![highlight(0, Score::new(1.0, 5))];
        assign_weights(&mut highlights);
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(pick(&highlights, &mut rng), Some(0));
    }
}
