//! Headline keyword classifier.
//!
//! Keywords are matched as lowercase substrings of the title. Categories are
//! checked in `Category::PRIORITY` order and the first hit wins, so an earnings
//! headline that also mentions a deal stays `Earnings`.

use analysis_core::Category;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

const EARNINGS_KEYWORDS: &[&str] = &[
    "earnings", "revenue", "profit", "quarterly", "q1", "q2", "q3", "q4",
];
const MERGERS_KEYWORDS: &[&str] = &["merger", "acquisition", "buyout", "deal", "acquire"];
const PRODUCT_KEYWORDS: &[&str] = &["product", "launch", "release", "innovation", "unveil"];
const REGULATORY_KEYWORDS: &[&str] = &["regulation", "fda", "sec", "lawsuit", "legal", "court"];
const ANALYST_KEYWORDS: &[&str] = &["analyst", "upgrade", "downgrade", "rating", "target"];

/// Bumped whenever the default keyword lists change.
pub const DEFAULT_KEYWORDS_VERSION: u32 = 1;

static DEFAULT_CLASSIFIER: LazyLock<CategoryClassifier> = LazyLock::new(CategoryClassifier::default);

/// Keyword lists per category, as configuration data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub version: u32,
    pub keywords: BTreeMap<Category, Vec<String>>,
}

impl CategoryKeywords {
    /// Build a table; keywords are lowercased and blanks dropped.
    pub fn new(version: u32, keywords: BTreeMap<Category, Vec<String>>) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|(category, words)| {
                let words = words
                    .into_iter()
                    .map(|w| w.trim().to_lowercase())
                    .filter(|w| !w.is_empty())
                    .collect();
                (category, words)
            })
            .collect();
        Self { version, keywords }
    }

    pub fn for_category(&self, category: Category) -> &[String] {
        self.keywords.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl Default for CategoryKeywords {
    fn default() -> Self {
        let table = [
            (Category::Earnings, EARNINGS_KEYWORDS),
            (Category::MergersAcquisitions, MERGERS_KEYWORDS),
            (Category::Product, PRODUCT_KEYWORDS),
            (Category::Regulatory, REGULATORY_KEYWORDS),
            (Category::Analyst, ANALYST_KEYWORDS),
        ]
        .into_iter()
        .map(|(category, words)| (category, words.iter().map(|w| w.to_string()).collect()))
        .collect();

        Self::new(DEFAULT_KEYWORDS_VERSION, table)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier {
    keywords: CategoryKeywords,
}

impl CategoryClassifier {
    pub fn new(keywords: CategoryKeywords) -> Self {
        Self { keywords }
    }

    pub fn keywords(&self) -> &CategoryKeywords {
        &self.keywords
    }

    /// Category for a headline; `General` when nothing matches.
    pub fn classify(&self, title: &str) -> Category {
        let title_lower = title.to_lowercase();

        Category::PRIORITY
            .into_iter()
            .find(|category| {
                self.keywords
                    .for_category(*category)
                    .iter()
                    .any(|keyword| title_lower.contains(keyword.as_str()))
            })
            .unwrap_or(Category::General)
    }
}

/// Classify with the default keyword table.
pub fn classify(title: &str) -> Category {
    DEFAULT_CLASSIFIER.classify(title)
}
