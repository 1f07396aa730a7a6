use analysis_core::{AnnotatedArticle, Article, ProgressObserver};

use crate::classifier::CategoryClassifier;
use crate::scorer::HybridScorer;

/// Logs batch progress every `every` articles and once at the end.
#[derive(Debug, Clone)]
pub struct LoggingProgress {
    every: usize,
}

impl LoggingProgress {
    pub fn new(every: usize) -> Self {
        Self { every: every.max(1) }
    }
}

impl Default for LoggingProgress {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ProgressObserver for LoggingProgress {
    fn on_article(&self, processed: usize, total: usize) {
        if processed % self.every == 0 {
            tracing::info!("Analyzing... {}/{}", processed, total);
        }
    }

    fn on_complete(&self, total: usize) {
        tracing::info!("Analyzed {} articles", total);
    }
}

/// Applies the scorer and the classifier to article records.
pub struct ArticleAnnotator {
    scorer: HybridScorer,
    classifier: CategoryClassifier,
    observer: Option<Box<dyn ProgressObserver>>,
}

impl ArticleAnnotator {
    pub fn new(scorer: HybridScorer, classifier: CategoryClassifier) -> Self {
        Self {
            scorer,
            classifier,
            observer: Some(Box::new(LoggingProgress::default())),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn without_progress(mut self) -> Self {
        self.observer = None;
        self
    }

    pub fn scorer(&self) -> &HybridScorer {
        &self.scorer
    }

    pub async fn annotate(&self, article: &Article) -> AnnotatedArticle {
        if let Err(e) = article.validate() {
            tracing::warn!("{}; scoring as empty text", e);
        }

        let sentiment_score = self.scorer.score_hybrid(&article.scoring_text()).await;
        let category = self.classifier.classify(&article.title);
        tracing::debug!(
            "{} [{}] {:.4} {}",
            article.ticker,
            category,
            sentiment_score,
            article.title
        );

        AnnotatedArticle {
            article: article.clone(),
            sentiment_score,
            category,
        }
    }

    /// Annotate every article in order. Never fails; a bad article scores 0.0.
    pub async fn annotate_batch(&self, articles: &[Article]) -> Vec<AnnotatedArticle> {
        let total = articles.len();
        let mut annotated = Vec::with_capacity(total);

        for (idx, article) in articles.iter().enumerate() {
            annotated.push(self.annotate(article).await);
            if let Some(observer) = &self.observer {
                observer.on_article(idx + 1, total);
            }
        }

        if let Some(observer) = &self.observer {
            observer.on_complete(total);
        }
        annotated
    }
}
