//! Sector-level rollups of annotated articles.

pub mod aggregator;
pub mod bands;
pub mod trend;

pub use aggregator::{aggregate, breakdown, group_by_sector, SectorBreakdown};
pub use bands::{BandCounts, SentimentBand};
pub use trend::{ticker_trends, TickerTrend, TrendDirection, TrendTable};
