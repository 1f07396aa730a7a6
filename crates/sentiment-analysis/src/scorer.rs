use analysis_core::{
    stats::{clamp_unit, round_score},
    AnalysisError, SentimentEstimator,
};
use ml_client::MLConfig;
use serde::Serialize;

use crate::finbert::{FinBertEstimator, DEFAULT_MAX_INPUT_TOKENS};
use crate::lexicon::VaderEstimator;
use crate::normalize::normalize;

/// Share of the blended score taken from the domain estimator.
pub const DEFAULT_DOMAIN_WEIGHT: f64 = 0.7;

/// Scorer settings, usually read from the environment.
#[derive(Debug, Clone)]
pub struct ScorerConfig {
    pub use_domain_estimator: bool,
    pub domain_weight: f64,
    pub max_input_tokens: usize,
    pub ml: MLConfig,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            use_domain_estimator: true,
            domain_weight: DEFAULT_DOMAIN_WEIGHT,
            max_input_tokens: DEFAULT_MAX_INPUT_TOKENS,
            ml: MLConfig::default(),
        }
    }
}

impl ScorerConfig {
    /// Read `USE_FINBERT`, `FINBERT_WEIGHT` and the ML service settings.
    pub fn from_env() -> Result<Self, AnalysisError> {
        let mut config = Self {
            ml: MLConfig::from_env(),
            ..Self::default()
        };

        if let Ok(raw) = std::env::var("USE_FINBERT") {
            config.use_domain_estimator = parse_flag(&raw).ok_or_else(|| {
                AnalysisError::InvalidConfig(format!("USE_FINBERT must be true/false, got '{}'", raw))
            })?;
        }
        if let Ok(raw) = std::env::var("FINBERT_WEIGHT") {
            config.domain_weight = raw.trim().parse::<f64>().map_err(|_| {
                AnalysisError::InvalidConfig(format!("FINBERT_WEIGHT must be a number, got '{}'", raw))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        validate_weight(self.domain_weight)?;
        if self.max_input_tokens == 0 {
            return Err(AnalysisError::InvalidConfig(
                "max_input_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn validate_weight(weight: f64) -> Result<(), AnalysisError> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(AnalysisError::InvalidConfig(format!(
            "domain weight must be within [0, 1], got {}",
            weight
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScorerMode {
    /// Domain and lexicon estimators blended.
    Hybrid,
    /// Domain estimator disabled or failed to initialize.
    LexiconOnly,
}

/// Blends a financial-domain estimator with a general lexicon estimator.
///
/// Whether the domain estimator participates is decided once, at construction,
/// and never revisited. Individual estimator failures score 0.0 and are logged.
pub struct HybridScorer {
    domain: Option<Box<dyn SentimentEstimator>>,
    general: Box<dyn SentimentEstimator>,
    domain_weight: f64,
}

impl HybridScorer {
    /// `domain` is the outcome of initializing the domain estimator, or `None`
    /// when it was not requested. An `Err` puts the scorer in lexicon-only mode.
    pub fn new(
        domain: Option<Result<Box<dyn SentimentEstimator>, AnalysisError>>,
        general: Box<dyn SentimentEstimator>,
        domain_weight: f64,
    ) -> Result<Self, AnalysisError> {
        validate_weight(domain_weight)?;

        let domain = match domain {
            Some(Ok(estimator)) => {
                tracing::info!(
                    "Sentiment scorer: {} ({:.2}) + {} ({:.2})",
                    estimator.name(),
                    domain_weight,
                    general.name(),
                    1.0 - domain_weight
                );
                Some(estimator)
            }
            Some(Err(e)) => {
                tracing::warn!("{}. Using {} only", e, general.name());
                None
            }
            None => {
                tracing::info!("Sentiment scorer: {} only", general.name());
                None
            }
        };

        Ok(Self {
            domain,
            general,
            domain_weight,
        })
    }

    /// VADER only, no service dependency.
    pub fn lexicon_only() -> Self {
        Self {
            domain: None,
            general: Box::new(VaderEstimator::new()),
            domain_weight: DEFAULT_DOMAIN_WEIGHT,
        }
    }

    /// FinBERT (if enabled and reachable) blended with VADER.
    pub async fn from_config(config: &ScorerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;

        let domain = if config.use_domain_estimator {
            let connected = FinBertEstimator::connect(&config.ml, config.max_input_tokens).await;
            Some(connected.map(|e| Box::new(e) as Box<dyn SentimentEstimator>))
        } else {
            None
        };

        Self::new(domain, Box::new(VaderEstimator::new()), config.domain_weight)
    }

    pub fn mode(&self) -> ScorerMode {
        if self.domain.is_some() {
            ScorerMode::Hybrid
        } else {
            ScorerMode::LexiconOnly
        }
    }

    pub fn domain_weight(&self) -> f64 {
        self.domain_weight
    }

    /// Domain polarity (positive minus negative probability). 0.0 when the
    /// estimator is unavailable or the call fails.
    pub async fn score_domain(&self, text: &str) -> f64 {
        match &self.domain {
            Some(estimator) => run_estimator(estimator.as_ref(), &normalize(text)).await,
            None => 0.0,
        }
    }

    /// Lexicon compound polarity. 0.0 when the call fails.
    pub async fn score_general(&self, text: &str) -> f64 {
        run_estimator(self.general.as_ref(), &normalize(text)).await
    }

    /// Blended score with the configured domain weight, clamped to [-1, 1] and
    /// rounded to 4 decimals.
    pub async fn score_hybrid(&self, text: &str) -> f64 {
        self.blend(text, self.domain_weight).await
    }

    /// Blended score with a per-call domain weight. The weight must lie in
    /// [0, 1], the same rule the scorer's own weight is held to.
    pub async fn score_hybrid_weighted(
        &self,
        text: &str,
        domain_weight: f64,
    ) -> Result<f64, AnalysisError> {
        validate_weight(domain_weight)?;
        Ok(self.blend(text, domain_weight).await)
    }

    async fn blend(&self, text: &str, weight: f64) -> f64 {
        let general = self.score_general(text).await;
        let blended = if self.domain.is_some() {
            let domain = self.score_domain(text).await;
            weight * domain + (1.0 - weight) * general
        } else {
            general
        };

        round_score(clamp_unit(blended))
    }
}

async fn run_estimator(estimator: &dyn SentimentEstimator, text: &str) -> f64 {
    match estimator.estimate(text).await {
        Ok(score) if score.is_finite() => clamp_unit(score),
        Ok(score) => {
            tracing::warn!("{} returned non-finite score {}, using 0.0", estimator.name(), score);
            0.0
        }
        Err(e) => {
            tracing::warn!("{} analysis failed: {}", estimator.name(), e);
            0.0
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// Returns a fixed score and records every text it was asked to score.
    pub(crate) struct StubEstimator {
        pub score: f64,
        pub seen: Arc<Mutex<Vec<String>>>,
    }

    impl StubEstimator {
        pub fn boxed(score: f64) -> Box<dyn SentimentEstimator> {
            Box::new(Self {
                score,
                seen: Arc::new(Mutex::new(Vec::new())),
            })
        }
    }

    #[async_trait]
    impl SentimentEstimator for StubEstimator {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn estimate(&self, text: &str) -> Result<f64, AnalysisError> {
            self.seen.lock().unwrap().push(text.to_string());
            Ok(self.score)
        }
    }

    pub(crate) struct FailingEstimator;

    #[async_trait]
    impl SentimentEstimator for FailingEstimator {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn estimate(&self, _text: &str) -> Result<f64, AnalysisError> {
            Err(AnalysisError::EstimatorInferenceFailure("malformed input".to_string()))
        }
    }

    const SAMPLE_TEXTS: &[&str] = &[
        "Exxon Beats Earnings Estimates",
        "Exxon Faces SEC Lawsuit",
        "<p>Stocks <b>rally</b> as inflation cools</p> https://example.com",
        "",
        "!!! ??? ...",
        "Terrible, horrible, no good, very bad quarter for the bank",
        "Absolutely wonderful record profits, amazing growth, best year ever!!!",
    ];

    #[tokio::test]
    async fn test_blend_uses_domain_weight() {
        let scorer = HybridScorer::new(
            Some(Ok(StubEstimator::boxed(0.5))),
            StubEstimator::boxed(-0.5),
            0.7,
        )
        .unwrap();

        assert_eq!(scorer.mode(), ScorerMode::Hybrid);
        // 0.7 * 0.5 + 0.3 * -0.5
        assert_eq!(scorer.score_hybrid("anything").await, 0.2);
        assert_eq!(scorer.score_hybrid_weighted("anything", 1.0).await.unwrap(), 0.5);
        assert_eq!(scorer.score_hybrid_weighted("anything", 0.0).await.unwrap(), -0.5);
    }

    #[tokio::test]
    async fn test_per_call_weight_is_validated() {
        let scorer = HybridScorer::new(
            Some(Ok(StubEstimator::boxed(0.5))),
            StubEstimator::boxed(-0.5),
            0.7,
        )
        .unwrap();

        for weight in [1.5, -0.1, f64::NAN] {
            let result = scorer.score_hybrid_weighted("anything", weight).await;
            assert!(matches!(result, Err(AnalysisError::InvalidConfig(_))), "weight {}", weight);
        }
        assert!(HybridScorer::new(None, StubEstimator::boxed(0.0), 1.5).is_err());
    }

    #[tokio::test]
    async fn test_output_is_clamped() {
        let scorer = HybridScorer::new(
            Some(Ok(StubEstimator::boxed(5.0))),
            StubEstimator::boxed(3.0),
            0.7,
        )
        .unwrap();
        assert_eq!(scorer.score_hybrid("x").await, 1.0);

        let scorer = HybridScorer::new(
            Some(Ok(StubEstimator::boxed(-9.0))),
            StubEstimator::boxed(-9.0),
            0.5,
        )
        .unwrap();
        assert_eq!(scorer.score_hybrid("x").await, -1.0);
    }

    #[tokio::test]
    async fn test_lexicon_scores_stay_in_range() {
        let scorer = HybridScorer::lexicon_only();
        for text in SAMPLE_TEXTS {
            let score = scorer.score_hybrid(text).await;
            assert!((-1.0..=1.0).contains(&score), "{} out of range for {:?}", score, text);
        }
    }

    #[tokio::test]
    async fn test_rounded_to_four_decimals() {
        let scorer = HybridScorer::new(
            Some(Ok(StubEstimator::boxed(0.123456))),
            StubEstimator::boxed(0.0),
            1.0,
        )
        .unwrap();
        assert_eq!(scorer.score_hybrid("x").await, 0.1235);
    }

    #[tokio::test]
    async fn test_failed_initialization_degrades_to_general() {
        let init = Err(AnalysisError::EstimatorUnavailable("model missing".to_string()));
        let scorer = HybridScorer::new(Some(init), Box::new(VaderEstimator::new()), 0.7).unwrap();

        assert_eq!(scorer.mode(), ScorerMode::LexiconOnly);
        for text in SAMPLE_TEXTS {
            let general = round_score(scorer.score_general(text).await);
            assert_eq!(scorer.score_hybrid(text).await, general);
            assert_eq!(scorer.score_domain(text).await, 0.0);
        }
    }

    #[tokio::test]
    async fn test_disabled_domain_matches_general() {
        let scorer = HybridScorer::new(None, Box::new(VaderEstimator::new()), 0.7).unwrap();
        for text in SAMPLE_TEXTS {
            let general = round_score(scorer.score_general(text).await);
            assert_eq!(scorer.score_hybrid(text).await, general);
        }
    }

    #[tokio::test]
    async fn test_inference_failure_scores_zero() {
        let scorer = HybridScorer::new(
            Some(Ok(Box::new(FailingEstimator) as Box<dyn SentimentEstimator>)),
            StubEstimator::boxed(0.4),
            0.7,
        )
        .unwrap();

        assert_eq!(scorer.score_domain("x").await, 0.0);
        // Domain contributes 0.0, the lexicon share still counts.
        assert_eq!(scorer.score_hybrid("x").await, 0.12);

        let scorer = HybridScorer::new(None, Box::new(FailingEstimator), 0.7).unwrap();
        assert_eq!(scorer.score_hybrid("x").await, 0.0);
    }

    #[tokio::test]
    async fn test_estimators_receive_normalized_text() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let domain = StubEstimator {
            score: 0.0,
            seen: Arc::clone(&seen),
        };
        let scorer = HybridScorer::new(
            Some(Ok(Box::new(domain) as Box<dyn SentimentEstimator>)),
            StubEstimator::boxed(0.0),
            0.7,
        )
        .unwrap();

        scorer.score_hybrid("<b>Apple</b>   beats! http://x.co/y").await;
        assert_eq!(seen.lock().unwrap().as_slice(), ["Apple beats!"]);
    }

    #[tokio::test]
    async fn test_lexicon_reruns_are_bit_identical() {
        let scorer = HybridScorer::lexicon_only();
        for text in SAMPLE_TEXTS {
            let first = scorer.score_hybrid(text).await;
            let second = scorer.score_hybrid(text).await;
            assert_eq!(first.to_bits(), second.to_bits());
        }
    }

    #[tokio::test]
    async fn test_from_config_without_domain() {
        let config = ScorerConfig {
            use_domain_estimator: false,
            ..ScorerConfig::default()
        };
        let scorer = HybridScorer::from_config(&config).await.unwrap();
        assert_eq!(scorer.mode(), ScorerMode::LexiconOnly);
    }

    #[tokio::test]
    async fn test_from_config_unreachable_service_degrades() {
        let config = ScorerConfig {
            ml: MLConfig {
                sentiment_url: "http://127.0.0.1:9".to_string(),
                timeout: std::time::Duration::from_millis(200),
            },
            ..ScorerConfig::default()
        };
        let scorer = HybridScorer::from_config(&config).await.unwrap();
        assert_eq!(scorer.mode(), ScorerMode::LexiconOnly);
    }

    #[test]
    fn test_invalid_weight_rejected() {
        assert!(matches!(
            HybridScorer::new(None, StubEstimator::boxed(0.0), 1.5),
            Err(AnalysisError::InvalidConfig(_))
        ));
        let config = ScorerConfig {
            domain_weight: -0.1,
            ..ScorerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
