use async_trait::async_trait;
use crate::AnalysisError;

/// A sentiment backend that maps text to a polarity in [-1, 1].
///
/// Implementations report failures as `Err`; the hybrid scorer is responsible
/// for turning those into a neutral score.
#[async_trait]
pub trait SentimentEstimator: Send + Sync {
    /// Short backend name used in log lines.
    fn name(&self) -> &'static str;

    async fn estimate(&self, text: &str) -> Result<f64, AnalysisError>;
}

/// Receives batch progress from the article annotator.
pub trait ProgressObserver: Send + Sync {
    /// Called after each article, `processed` counts from 1.
    fn on_article(&self, processed: usize, total: usize);

    fn on_complete(&self, _total: usize) {}
}
