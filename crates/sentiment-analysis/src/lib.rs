//! Article-level sentiment: text cleanup, FinBERT + VADER scoring, headline
//! categories, and the annotator that applies them to a batch of articles.

pub mod annotator;
pub mod classifier;
pub mod finbert;
pub mod lexicon;
pub mod normalize;
pub mod scorer;

pub use annotator::{ArticleAnnotator, LoggingProgress};
pub use classifier::{classify, CategoryClassifier, CategoryKeywords};
pub use finbert::FinBertEstimator;
pub use lexicon::VaderEstimator;
pub use normalize::normalize;
pub use scorer::{HybridScorer, ScorerConfig, ScorerMode, DEFAULT_DOMAIN_WEIGHT};
