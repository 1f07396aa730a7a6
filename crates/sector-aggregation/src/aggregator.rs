use analysis_core::{
    clamp_weight,
    stats::{mean, round_score, weighted_mean},
    AnalysisError, AnnotatedArticle, Category, SectorScore,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::bands::BandCounts;

/// Band and category counts for one sector, reported next to its `SectorScore`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectorBreakdown {
    pub sector: String,
    pub bands: BandCounts,
    pub categories: BTreeMap<Category, usize>,
}

/// Group articles by sector. Every article lands in exactly one group.
pub fn group_by_sector(articles: &[AnnotatedArticle]) -> BTreeMap<String, Vec<&AnnotatedArticle>> {
    let mut groups: BTreeMap<String, Vec<&AnnotatedArticle>> = BTreeMap::new();
    for article in articles {
        groups
            .entry(article.article.sector.clone())
            .or_default()
            .push(article);
    }
    groups
}

/// Simple and weight-adjusted sentiment per sector.
///
/// Weights are the owning ticker's portfolio weight. When a sector's weights sum
/// to zero the weighted average falls back to the simple average. Sectors with
/// no articles are absent from the result.
pub fn aggregate(articles: &[AnnotatedArticle]) -> BTreeMap<String, SectorScore> {
    let scores: BTreeMap<String, SectorScore> = group_by_sector(articles)
        .into_iter()
        .map(|(sector, group)| {
            let score = score_group(&sector, &group);
            (sector, score)
        })
        .collect();

    for score in scores.values() {
        tracing::debug!(
            "{}: simple {:.4}, weighted {:.4} ({} articles)",
            score.sector,
            score.simple_average,
            score.weighted_average,
            score.article_count
        );
    }
    scores
}

fn score_group(sector: &str, group: &[&AnnotatedArticle]) -> SectorScore {
    let sentiments: Vec<f64> = group.iter().map(|a| a.sentiment_score).collect();
    let weights: Vec<f64> = group
        .iter()
        .map(|a| {
            let weight = clamp_weight(a.article.weight);
            if weight != a.article.weight {
                let e = AnalysisError::MalformedArticle(format!(
                    "{} weight {} at '{}'",
                    a.article.ticker, a.article.weight, a.article.url
                ));
                tracing::warn!("{}; counted with weight 0", e);
            }
            weight
        })
        .collect();

    let simple = mean(&sentiments);
    let weighted = weighted_mean(&sentiments, &weights).unwrap_or_else(|| {
        tracing::debug!("{}: zero total weight, weighted average uses simple average", sector);
        simple
    });

    SectorScore {
        sector: sector.to_string(),
        etf: group
            .first()
            .map(|a| a.article.etf.clone())
            .unwrap_or_default(),
        simple_average: round_score(simple),
        weighted_average: round_score(weighted),
        article_count: group.len(),
    }
}

/// Sentiment band and category counts per sector.
pub fn breakdown(articles: &[AnnotatedArticle]) -> BTreeMap<String, SectorBreakdown> {
    group_by_sector(articles)
        .into_iter()
        .map(|(sector, group)| {
            let mut entry = SectorBreakdown {
                sector: sector.clone(),
                ..SectorBreakdown::default()
            };
            for article in group {
                entry.bands.record(article.sentiment_score);
                *entry.categories.entry(article.category).or_insert(0) += 1;
            }
            (sector, entry)
        })
        .collect()
}
