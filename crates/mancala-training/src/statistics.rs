//! Summaries of population fitness, reported once per generation.

use serde::Serialize;

/// Descriptive statistics of a set of fitness scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FitnessSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Upper median for an even count.
    pub median: f64,
    pub std_dev: f64,
}

impl FitnessSummary {
    /// Computes the summary of `scores`, or `None` if there are none.
    ///
    /// ```
    /// use mancala_training::statistics::FitnessSummary;
    ///
    /// let summary = FitnessSummary::from_scores([0.25, 0.75, 0.5]).unwrap();
    /// assert_eq!(summary.min, 0.25);
    /// assert_eq!(summary.max, 0.75);
    /// assert_eq!(summary.median, 0.5);
    /// assert!(FitnessSummary::from_scores([]).is_none());
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_scores<I>(scores: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sorted = scores.into_iter().collect::<Vec<_>>();
        sorted.sort_by(f64::total_cmp);

        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let n = sorted.len() as f64;
        let mean = sorted.iter().sum::<f64>() / n;
        let variance = sorted.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: sorted.len(),
            min,
            max,
            mean,
            median: sorted[sorted.len() / 2],
            std_dev: variance.sqrt(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_known_scores() {
        let summary = FitnessSummary::from_scores([0.4, 0.2, 0.8, 0.6]).unwrap();
        assert_eq!(summary.count, 4);
        assert!((summary.mean - 0.5).abs() < 1e-12);
        assert!((summary.median - 0.6).abs() < 1e-12);
        assert!((summary.std_dev - 0.05_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_single_score_has_no_spread() {
        let summary = FitnessSummary::from_scores([0.3]).unwrap();
        assert_eq!(summary.std_dev, 0.0);
        assert_eq!(summary.min, summary.max);
    }
}
