pub mod sentiment;
pub mod error;

pub use sentiment::{SentimentClient, SentimentPrediction, SentimentResponse};
pub use error::{MLError, MLResult};

use std::time::Duration;

const DEFAULT_SENTIMENT_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the FinBERT sentiment service
#[derive(Debug, Clone)]
pub struct MLConfig {
    pub sentiment_url: String,
    pub timeout: Duration,
}

impl MLConfig {
    /// Read `ML_SENTIMENT_URL` and `ML_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Self {
        let sentiment_url = std::env::var("ML_SENTIMENT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SENTIMENT_URL.to_string());
        let timeout_secs = std::env::var("ML_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            sentiment_url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for MLConfig {
    fn default() -> Self {
        Self {
            sentiment_url: DEFAULT_SENTIMENT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
