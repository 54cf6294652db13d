/// A unique identifier for a normalized token, assigned in first-seen order
/// during a single corpus load. Ids are not stable across loads; token
/// identity is the content string.
pub type TokenId = usize;

/// Accumulated quiz performance for one highlight.
///
/// `sum` holds decay-weighted score contributions, `count` the number of
/// completed attempts. The average is derived lazily and is dominated by the
/// most recent attempts: each attempt's contribution is weighted by its
/// ordinal, and the denominator is the matching triangular number plus one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub sum: f64,
    pub count: u32,
}

impl Score {
    pub fn new(sum: f64, count: u32) -> Self {
        Self { sum, count }
    }

    /// Decay-weighted average in `[0, 1]`. A never-attempted highlight
    /// averages 0, which gives it maximum selection weight.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let c = self.count as f64;
        self.sum / (c * (c + 1.0) / 2.0 + 1.0)
    }

    /// Records one completed quiz attempt. The raw accuracy fraction is
    /// weighted by the attempt's ordinal, so later attempts contribute more
    /// to the running sum than all earlier ones combined.
    pub fn record(&mut self, correct: usize, total: usize) {
        self.count += 1;
        let fraction = correct as f64 / total.max(1) as f64;
        self.sum += fraction * self.count as f64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unattempted_average_is_zero() {
        assert_eq!(Score::default().average(), 0.0);
    }

    #[test]
    fn single_attempt_halves_the_sum() {
        // denominator for count = 1 is 1*2/2 + 1 = 2
        let mut score = Score::default();
        score.record(3, 4);
        assert_eq!(score.count, 1);
        assert!((score.average() - 0.75 / 2.0).abs() < 1e-12);
    }

    #[test]
    fn later_attempts_dominate() {
        // 1/2 then 2/2: sum = 0.5*1 + 1.0*2 = 2.5, average = 2.5/4
        let mut score = Score::default();
        score.record(1, 2);
        score.record(2, 2);
        assert_eq!(score.count, 2);
        assert!((score.sum - 2.5).abs() < 1e-12);
        assert!((score.average() - 0.625).abs() < 1e-12);
    }

    #[test]
    fn zero_total_does_not_divide_by_zero() {
        let mut score = Score::default();
        score.record(0, 0);
        assert_eq!(score.count, 1);
        assert_eq!(score.sum, 0.0);
    }
}
