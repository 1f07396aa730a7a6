use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::AnalysisError;

/// Sector used when an upstream record carries none.
pub const UNKNOWN_SECTOR: &str = "Unknown";

fn default_sector() -> String {
    UNKNOWN_SECTOR.to_string()
}

fn default_weight() -> f64 {
    1.0
}

/// `null` becomes an empty string.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_sector<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_sector))
}

/// Missing weight is 1.0; negative or non-finite weight is 0.0.
fn lenient_weight<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?
        .map(clamp_weight)
        .unwrap_or_else(default_weight))
}

/// Portfolio weights are never negative. Negative and non-finite values become 0.0.
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Accepts "2025-01-15" or any ISO date-time starting with a date; anything else is `None`.
fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_published_date))
}

/// Parse the date part of an ISO date or date-time string.
pub fn parse_published_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// News article for one holding of a sector ETF, as handed over by the collector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ticker: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: String,
    #[serde(default = "default_sector", deserialize_with = "lenient_sector")]
    pub sector: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub etf: String,
    /// Portfolio share of the ticker within its sector ETF, in percent.
    #[serde(default = "default_weight", deserialize_with = "lenient_weight")]
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_date")]
    pub published_at: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub source: String,
}

impl Article {
    /// Text fed to the sentiment scorer: title and summary joined by a space.
    pub fn scoring_text(&self) -> String {
        format!("{} {}", self.title, self.summary)
    }

    /// An article needs at least a headline to be meaningfully scored.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.title.trim().is_empty() && self.summary.trim().is_empty() {
            return Err(AnalysisError::MalformedArticle(format!(
                "{} article at '{}' has no title or summary",
                self.ticker, self.url
            )));
        }
        Ok(())
    }
}

/// Topical category assigned from an article headline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Earnings,
    #[serde(rename = "M&A")]
    MergersAcquisitions,
    Product,
    Regulatory,
    Analyst,
    General,
}

impl Category {
    /// Keyword categories in classification priority order. `General` is the fallback.
    pub const PRIORITY: [Category; 5] = [
        Category::Earnings,
        Category::MergersAcquisitions,
        Category::Product,
        Category::Regulatory,
        Category::Analyst,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Earnings => "Earnings",
            Category::MergersAcquisitions => "M&A",
            Category::Product => "Product",
            Category::Regulatory => "Regulatory",
            Category::Analyst => "Analyst",
            Category::General => "General",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Article plus its derived sentiment score and category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotatedArticle {
    #[serde(flatten)]
    pub article: Article,
    /// Always within [-1, 1], four decimal places.
    pub sentiment_score: f64,
    pub category: Category,
}

/// Per-sector sentiment for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorScore {
    pub sector: String,
    pub etf: String,
    pub simple_average: f64,
    pub weighted_average: f64,
    pub article_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_defaults_for_missing_fields() {
        let article: Article = serde_json::from_value(json!({
            "ticker": "XOM",
            "title": "Exxon Beats Earnings Estimates",
            "summary": null,
            "sector": null,
        }))
        .unwrap();

        assert_eq!(article.summary, "");
        assert_eq!(article.sector, UNKNOWN_SECTOR);
        assert_eq!(article.weight, 1.0);
        assert_eq!(article.published_at, None);
        assert_eq!(article.scoring_text(), "Exxon Beats Earnings Estimates ");
    }

    #[test]
    fn test_negative_weight_becomes_zero() {
        let article: Article =
            serde_json::from_value(json!({ "sector": "Energy", "weight": -5, "title": "x" })).unwrap();
        assert_eq!(article.weight, 0.0);

        assert_eq!(clamp_weight(f64::NAN), 0.0);
        assert_eq!(clamp_weight(f64::INFINITY), 0.0);
        assert_eq!(clamp_weight(12.5), 12.5);
    }

    #[test]
    fn test_published_date_parsing() {
        assert_eq!(
            parse_published_date("2025-03-04T12:30:00Z"),
            NaiveDate::from_ymd_opt(2025, 3, 4)
        );
        assert_eq!(parse_published_date("2025-03-04"), NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(parse_published_date("Tue, 04 Mar"), None);
        assert_eq!(parse_published_date(""), None);
    }

    #[test]
    fn test_validate_flags_empty_text() {
        let article: Article = serde_json::from_value(json!({ "ticker": "AAPL" })).unwrap();
        assert!(matches!(article.validate(), Err(AnalysisError::MalformedArticle(_))));
    }

    #[test]
    fn test_category_serializes_with_display_names() {
        assert_eq!(serde_json::to_value(Category::MergersAcquisitions).unwrap(), json!("M&A"));
        assert_eq!(Category::Regulatory.to_string(), "Regulatory");
    }

    #[test]
    fn test_annotated_article_flattens_fields() {
        let article: Article = serde_json::from_value(json!({
            "ticker": "AAPL",
            "sector": "Technology",
            "etf": "XLK",
            "weight": 21.5,
            "title": "Apple unveils new product",
            "published_at": "2025-01-15",
        }))
        .unwrap();
        let annotated = AnnotatedArticle {
            article,
            sentiment_score: 0.4215,
            category: Category::Product,
        };

        let value = serde_json::to_value(&annotated).unwrap();
        assert_eq!(value["ticker"], json!("AAPL"));
        assert_eq!(value["published_at"], json!("2025-01-15"));
        assert_eq!(value["category"], json!("Product"));
        assert_eq!(value["sentiment_score"], json!(0.4215));
    }
}
