use serde::{Deserialize, Serialize};

/// Confidence scores between 0 and 1 as returned by the analysis service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentScores {
    pub fn new(positive: f64, neutral: f64, negative: f64) -> Self {
        Self {
            positive,
            neutral,
            negative,
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }
}

/// Share of each confidence score in the score total, in percent with one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScorePercentages {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ScorePercentages {
    pub fn from_scores(scores: &SentimentScores) -> Self {
        Self::from_raw(
            Some(scores.positive),
            Some(scores.neutral),
            Some(scores.negative),
        )
    }

    /// A missing score yields all-zero percentages, as does a non-positive total.
    pub fn from_raw(positive: Option<f64>, neutral: Option<f64>, negative: Option<f64>) -> Self {
        let (Some(positive), Some(neutral), Some(negative)) = (positive, neutral, negative) else {
            return Self::default();
        };

        let total = positive + neutral + negative;
        if !total.is_finite() || total <= 0.0 {
            return Self::default();
        }

        Self {
            positive: percentage_of(positive, total),
            neutral: percentage_of(neutral, total),
            negative: percentage_of(negative, total),
        }
    }
}

fn percentage_of(score: f64, total: f64) -> f64 {
    round_half_up_one_decimal(score * 100.0 / total)
}

// f64::round rounds halves away from zero, which is half-up for non-negative values.
fn round_half_up_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentages_from_scores() {
        let percentages = ScorePercentages::from_scores(&SentimentScores::new(2.0, 3.0, 5.0));

        assert_eq!(percentages.positive, 20.0);
        assert_eq!(percentages.neutral, 30.0);
        assert_eq!(percentages.negative, 50.0);
    }

    #[test]
    fn test_missing_score_yields_zero_percentages() {
        let percentages = ScorePercentages::from_raw(Some(0.4), None, Some(0.6));

        assert_eq!(percentages, ScorePercentages::default());
        assert_eq!(percentages.positive, 0.0);
        assert_eq!(percentages.neutral, 0.0);
        assert_eq!(percentages.negative, 0.0);
    }

    #[test]
    fn test_rounds_half_up_to_one_decimal() {
        let percentages = ScorePercentages::from_raw(Some(1.0), Some(5.0), Some(10.0));

        assert_eq!(percentages.positive, 6.3);
        assert_eq!(percentages.neutral, 31.3);
        assert_eq!(percentages.negative, 62.5);
    }

    #[test]
    fn test_thirds_round_down() {
        let percentages = ScorePercentages::from_raw(Some(0.3), Some(0.3), Some(0.3));

        assert_eq!(percentages.positive, 33.3);
        assert_eq!(percentages.neutral, 33.3);
        assert_eq!(percentages.negative, 33.3);
    }

    #[test]
    fn test_zero_total_yields_zero_percentages() {
        let percentages = ScorePercentages::from_raw(Some(0.0), Some(0.0), Some(0.0));

        assert_eq!(percentages, ScorePercentages::default());
    }
}
