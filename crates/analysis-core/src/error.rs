use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Domain estimator could not be initialized; the scorer runs lexicon-only.
    #[error("Estimator unavailable: {0}")]
    EstimatorUnavailable(String),

    /// A single scoring call failed. Callers turn this into a neutral score.
    #[error("Estimator inference failed: {0}")]
    EstimatorInferenceFailure(String),

    #[error("Malformed article: {0}")]
    MalformedArticle(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
