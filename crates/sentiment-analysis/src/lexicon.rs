//! General-purpose lexicon estimator backed by VADER.

use analysis_core::{stats::clamp_unit, AnalysisError, SentimentEstimator};
use async_trait::async_trait;
use vader_sentiment::SentimentIntensityAnalyzer;

/// VADER compound polarity. Needs no external service, so it is always available.
pub struct VaderEstimator {
    analyzer: SentimentIntensityAnalyzer<'static>,
}

impl VaderEstimator {
    pub fn new() -> Self {
        Self {
            analyzer: SentimentIntensityAnalyzer::new(),
        }
    }

    /// Compound score in [-1, 1]; blank text is neutral.
    pub fn compound(&self, text: &str) -> Result<f64, AnalysisError> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }

        let scores = self.analyzer.polarity_scores(text);
        let compound = scores.get("compound").copied().ok_or_else(|| {
            AnalysisError::EstimatorInferenceFailure("VADER returned no compound score".to_string())
        })?;

        if !compound.is_finite() {
            return Err(AnalysisError::EstimatorInferenceFailure(format!(
                "VADER compound score is not finite: {}",
                compound
            )));
        }
        Ok(clamp_unit(compound))
    }
}

impl Default for VaderEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentimentEstimator for VaderEstimator {
    fn name(&self) -> &'static str {
        "vader"
    }

    async fn estimate(&self, text: &str) -> Result<f64, AnalysisError> {
        self.compound(text)
    }
}
