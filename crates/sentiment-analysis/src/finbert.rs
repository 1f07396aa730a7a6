//! Financial-domain estimator: FinBERT served over HTTP by the ML sentiment service.

use analysis_core::{stats::clamp_unit, AnalysisError, SentimentEstimator};
use async_trait::async_trait;
use ml_client::{MLConfig, SentimentClient};

use crate::normalize::truncate_tokens;

/// FinBERT's context window is 512 tokens; longer input is cut before inference.
pub const DEFAULT_MAX_INPUT_TOKENS: usize = 512;

pub struct FinBertEstimator {
    client: SentimentClient,
    max_input_tokens: usize,
}

impl FinBertEstimator {
    /// Build the client and confirm the service answers its health check.
    ///
    /// Any failure here is reported as `EstimatorUnavailable`; the caller decides
    /// whether to run without the domain estimator.
    pub async fn connect(config: &MLConfig, max_input_tokens: usize) -> Result<Self, AnalysisError> {
        let client = SentimentClient::new(config.sentiment_url.clone(), config.timeout)
            .map_err(|e| AnalysisError::EstimatorUnavailable(e.to_string()))?;

        match client.health().await {
            Ok(true) => {
                tracing::info!("FinBERT service reachable at {}", client.base_url());
                Ok(Self::with_client(client, max_input_tokens))
            }
            Ok(false) => Err(AnalysisError::EstimatorUnavailable(format!(
                "FinBERT health check failed at {}",
                client.base_url()
            ))),
            Err(e) => Err(AnalysisError::EstimatorUnavailable(format!(
                "FinBERT unreachable at {}: {}",
                client.base_url(),
                e
            ))),
        }
    }

    /// Wrap an existing client without a health check.
    pub fn with_client(client: SentimentClient, max_input_tokens: usize) -> Self {
        Self {
            client,
            max_input_tokens: max_input_tokens.max(1),
        }
    }
}

#[async_trait]
impl SentimentEstimator for FinBertEstimator {
    fn name(&self) -> &'static str {
        "finbert"
    }

    async fn estimate(&self, text: &str) -> Result<f64, AnalysisError> {
        let input = truncate_tokens(text, self.max_input_tokens);
        if input.is_empty() {
            return Ok(0.0);
        }

        let response = self
            .client
            .predict(vec![input])
            .await
            .map_err(|e| AnalysisError::EstimatorInferenceFailure(e.to_string()))?;

        response
            .predictions
            .first()
            .map(|p| clamp_unit(p.polarity()))
            .ok_or_else(|| {
                AnalysisError::EstimatorInferenceFailure("FinBERT returned no prediction".to_string())
            })
    }
}
