use serde::{Deserialize, Serialize};

/// Scores above this are reported as positive.
pub const POSITIVE_THRESHOLD: f64 = 0.2;
/// Scores below this are reported as negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.2;

/// Coarse sentiment bucket used by reports and dashboards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentBand {
    Positive,
    Neutral,
    Negative,
}

impl SentimentBand {
    /// Thresholds are exclusive: exactly 0.2 is still neutral.
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentBand::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentBand::Negative
        } else {
            SentimentBand::Neutral
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SentimentBand::Positive => "Positive",
            SentimentBand::Neutral => "Neutral",
            SentimentBand::Negative => "Negative",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandCounts {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl BandCounts {
    pub fn record(&mut self, score: f64) {
        match SentimentBand::from_score(score) {
            SentimentBand::Positive => self.positive += 1,
            SentimentBand::Neutral => self.neutral += 1,
            SentimentBand::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(SentimentBand::from_score(0.8), SentimentBand::Positive);
        assert_eq!(SentimentBand::from_score(0.2), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_score(0.0), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_score(-0.2), SentimentBand::Neutral);
        assert_eq!(SentimentBand::from_score(-0.2001), SentimentBand::Negative);
        assert_eq!(SentimentBand::Negative.name(), "Negative");
    }

    #[test]
    fn test_band_counts() {
        let mut counts = BandCounts::default();
        for score in [0.5, 0.1, -0.7, -0.3, 0.0] {
            counts.record(score);
        }
        assert_eq!(
            counts,
            BandCounts {
                positive: 1,
                neutral: 2,
                negative: 2
            }
        );
        assert_eq!(counts.total(), 5);
    }
}
