use analysis_core::{AnnotatedArticle, Article, Category, SectorEtf, SectorScore, SectorUniverse};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use sector_aggregation::{aggregate, breakdown, ticker_trends, BandCounts, TrendTable};
use sentiment_analysis::ScorerMode;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct SectorReport {
    #[serde(flatten)]
    pub score: SectorScore,
    pub bands: BandCounts,
    pub categories: BTreeMap<Category, usize>,
}

/// Everything one run produces, written as `Market_Monitor_<date>.json`.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub report_date: NaiveDate,
    pub generated_at: DateTime<Utc>,
    pub scorer_mode: ScorerMode,
    pub domain_weight: f64,
    pub article_count: usize,
    /// Universe sectors first, in universe order, then any others by name.
    pub sectors: Vec<SectorReport>,
    /// Sectors with no articles this run. Not the same as a 0.0 score.
    pub missing_sectors: Vec<SectorEtf>,
    pub trends: TrendTable,
    pub articles: Vec<AnnotatedArticle>,
}

impl MarketReport {
    pub fn build(
        report_date: NaiveDate,
        scorer_mode: ScorerMode,
        domain_weight: f64,
        universe: &SectorUniverse,
        articles: Vec<AnnotatedArticle>,
    ) -> Self {
        let mut scores = aggregate(&articles);
        let mut breakdowns = breakdown(&articles);
        let missing_sectors = universe.missing_sectors(&scores).into_iter().cloned().collect();

        let mut order: Vec<String> = universe
            .sectors()
            .iter()
            .map(|s| s.sector.clone())
            .filter(|sector| scores.contains_key(sector))
            .collect();
        order.extend(
            scores
                .keys()
                .filter(|sector| universe.etf_for(sector).is_none())
                .cloned(),
        );

        let sectors = order
            .into_iter()
            .filter_map(|sector| {
                let score = scores.remove(&sector)?;
                let detail = breakdowns.remove(&sector).unwrap_or_default();
                Some(SectorReport {
                    score,
                    bands: detail.bands,
                    categories: detail.categories,
                })
            })
            .collect();

        Self {
            report_date,
            generated_at: Utc::now(),
            scorer_mode,
            domain_weight,
            article_count: articles.len(),
            sectors,
            missing_sectors,
            trends: ticker_trends(&articles),
            articles,
        }
    }

    pub fn file_name(&self) -> String {
        format!("Market_Monitor_{}.json", self.report_date.format("%Y-%m-%d"))
    }

    pub fn log_summary(&self) {
        for sector in &self.sectors {
            tracing::info!(
                "{} ({}): simple {:+.4}, weighted {:+.4}, {} articles",
                sector.score.sector,
                sector.score.etf,
                sector.score.simple_average,
                sector.score.weighted_average,
                sector.score.article_count
            );
        }
        for missing in &self.missing_sectors {
            tracing::info!("{} ({}): no data", missing.sector, missing.etf);
        }
    }

    /// Write the report into `dir`, creating it if needed. Returns the file path.
    pub fn write_to(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create report directory {}", dir.display()))?;

        let path = dir.join(self.file_name());
        let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(path)
    }
}

/// Load the collector's article dump (a JSON array).
pub fn load_articles(path: &Path) -> anyhow::Result<Vec<Article>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read articles from {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse articles in {}", path.display()))
}
