//! Per-ticker sentiment trend over the most recent publication dates.

use analysis_core::{
    stats::{mean, round_score},
    AnnotatedArticle,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Number of most recent distinct dates the trend looks at.
pub const TREND_DATES: usize = 3;
/// Minimum absolute change for a trend to count as up or down.
pub const TREND_THRESHOLD: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Up,
    Down,
    Flat,
}

impl TrendDirection {
    pub fn from_change(change: f64) -> Self {
        if change > TREND_THRESHOLD {
            TrendDirection::Up
        } else if change < -TREND_THRESHOLD {
            TrendDirection::Down
        } else {
            TrendDirection::Flat
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerTrend {
    pub ticker: String,
    pub company: String,
    pub sector: String,
    /// Mean sentiment per trend date, oldest first; `None` where the ticker had no news.
    pub daily_average: Vec<Option<f64>>,
    pub change: f64,
    pub direction: TrendDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendTable {
    /// Trend dates, oldest first.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<TickerTrend>,
}

struct TickerDays<'a> {
    company: &'a str,
    sector: &'a str,
    days: BTreeMap<NaiveDate, Vec<f64>>,
}

/// Build the trend table from one batch of annotated articles.
///
/// Articles without a ticker or a publication date are ignored. A ticker
/// needs averages on at least two trend dates to get a row, and the table is
/// empty when the batch spans fewer than two dates.
pub fn ticker_trends(articles: &[AnnotatedArticle]) -> TrendTable {
    let mut tickers: BTreeMap<&str, TickerDays> = BTreeMap::new();
    let mut all_dates = BTreeSet::new();

    for annotated in articles {
        let article = &annotated.article;
        let Some(date) = article.published_at else {
            continue;
        };
        if article.ticker.is_empty() {
            continue;
        }

        all_dates.insert(date);
        tickers
            .entry(article.ticker.as_str())
            .or_insert_with(|| TickerDays {
                company: &article.company_name,
                sector: &article.sector,
                days: BTreeMap::new(),
            })
            .days
            .entry(date)
            .or_default()
            .push(annotated.sentiment_score);
    }

    let mut dates: Vec<NaiveDate> = all_dates.into_iter().rev().take(TREND_DATES).collect();
    dates.reverse();
    if dates.len() < 2 {
        return TrendTable::default();
    }

    let rows = tickers
        .into_iter()
        .filter_map(|(ticker, data)| {
            let daily: Vec<Option<f64>> = dates
                .iter()
                .map(|d| data.days.get(d).map(|scores| mean(scores)))
                .collect();
            let valid: Vec<f64> = daily.iter().flatten().copied().collect();
            if valid.len() < 2 {
                return None;
            }

            let change = valid[valid.len() - 1] - valid[0];
            Some(TickerTrend {
                ticker: ticker.to_string(),
                company: data.company.to_string(),
                sector: data.sector.to_string(),
                daily_average: daily.into_iter().map(|v| v.map(round_score)).collect(),
                change: round_score(change),
                direction: TrendDirection::from_change(change),
            })
        })
        .collect();

    TrendTable { dates, rows }
}
