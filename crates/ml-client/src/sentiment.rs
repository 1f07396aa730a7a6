use serde::{Deserialize, Serialize};
use std::time::Duration;
use crate::error::{MLError, MLResult};

/// Class probabilities returned by FinBERT for one input text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub label: String,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    #[serde(default)]
    pub confidence: f64,
}

impl SentimentPrediction {
    /// Signed polarity: positive probability minus negative probability.
    pub fn polarity(&self) -> f64 {
        self.positive - self.negative
    }

    fn validate(&self) -> MLResult<()> {
        let probs = [self.positive, self.negative, self.neutral];
        if probs.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
            return Err(MLError::InvalidResponse(format!(
                "probabilities out of range: positive={} negative={} neutral={}",
                self.positive, self.negative, self.neutral
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentResponse {
    pub predictions: Vec<SentimentPrediction>,
    #[serde(default)]
    pub processing_time_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
struct SentimentRequest {
    texts: Vec<String>,
    use_cache: bool,
}

#[derive(Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

impl SentimentClient {
    pub fn new(base_url: String, timeout: Duration) -> MLResult<Self> {
        if base_url.trim().is_empty() {
            return Err(MLError::InvalidConfig("empty sentiment service URL".to_string()));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Predict sentiment for text(s)
    pub async fn predict(&self, texts: Vec<String>) -> MLResult<SentimentResponse> {
        let expected = texts.len();
        let request = SentimentRequest {
            texts,
            use_cache: true,
        };

        let response = self
            .client
            .post(format!("{}/predict", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MLError::ServiceUnavailable(format!(
                "Status: {}",
                response.status()
            )));
        }

        let result = response.json::<SentimentResponse>().await?;
        if result.predictions.len() != expected {
            return Err(MLError::InvalidResponse(format!(
                "expected {} predictions, got {}",
                expected,
                result.predictions.len()
            )));
        }
        for prediction in &result.predictions {
            prediction.validate()?;
        }

        tracing::debug!(
            "FinBERT scored {} texts in {:.1}ms",
            result.predictions.len(),
            result.processing_time_ms
        );
        Ok(result)
    }

    /// Check service health
    pub async fn health(&self) -> MLResult<bool> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
