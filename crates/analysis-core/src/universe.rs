//! Sector ETF universe and the static fallback holdings table.
//!
//! Live holdings retrieval happens outside this workspace. When it fails the
//! collector falls back to the top holdings listed here, so the table is kept
//! as plain data that can be swapped for a newer snapshot.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::SectorScore;

/// One sector ETF and the sector it tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorEtf {
    pub etf: String,
    pub sector: String,
}

/// A single ETF constituent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub ticker: String,
    pub name: String,
    /// Percent of ETF assets.
    pub weight: f64,
}

/// Holdings collected for one sector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorHoldings {
    pub etf: String,
    pub holdings: Vec<Holding>,
}

/// Flattened holding the news collector iterates over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub sector: String,
    pub etf: String,
    pub ticker: String,
    pub company: String,
    pub weight: f64,
}

#[derive(Debug, Clone)]
pub struct SectorUniverse {
    sectors: Vec<SectorEtf>,
    fallback: HashMap<String, Vec<Holding>>,
}

const SPDR_SECTORS: &[(&str, &str)] = &[
    ("XLK", "Technology"),
    ("XLF", "Financials"),
    ("XLV", "Health Care"),
    ("XLY", "Consumer Discretionary"),
    ("XLE", "Energy"),
    ("XLI", "Industrials"),
    ("XLP", "Consumer Staples"),
    ("XLC", "Communication Services"),
    ("XLRE", "Real Estate"),
    ("XLB", "Materials"),
    ("XLU", "Utilities"),
];

const SPDR_FALLBACK_HOLDINGS: &[(&str, &[(&str, &str, f64)])] = &[
    ("XLK", &[
        ("AAPL", "Apple Inc", 21.5),
        ("MSFT", "Microsoft Corp", 20.8),
        ("NVDA", "NVIDIA Corp", 8.2),
        ("AVGO", "Broadcom Inc", 4.1),
        ("CRM", "Salesforce Inc", 2.3),
    ]),
    ("XLF", &[
        ("BRK.B", "Berkshire Hathaway", 12.4),
        ("JPM", "JPMorgan Chase", 9.8),
        ("V", "Visa Inc", 7.2),
        ("MA", "Mastercard Inc", 6.5),
        ("BAC", "Bank of America", 5.8),
    ]),
    ("XLV", &[
        ("UNH", "UnitedHealth Group", 10.2),
        ("LLY", "Eli Lilly", 8.9),
        ("JNJ", "Johnson & Johnson", 7.6),
        ("ABBV", "AbbVie Inc", 5.4),
        ("MRK", "Merck & Co", 4.8),
    ]),
    ("XLY", &[
        ("AMZN", "Amazon.com Inc", 22.1),
        ("TSLA", "Tesla Inc", 15.3),
        ("HD", "Home Depot", 8.9),
        ("MCD", "McDonald's Corp", 4.2),
        ("NKE", "Nike Inc", 3.7),
    ]),
    ("XLE", &[
        ("XOM", "Exxon Mobil", 22.3),
        ("CVX", "Chevron Corp", 16.8),
        ("COP", "ConocoPhillips", 7.9),
        ("SLB", "Schlumberger", 4.5),
        ("EOG", "EOG Resources", 3.8),
    ]),
    ("XLI", &[
        ("CAT", "Caterpillar Inc", 8.9),
        ("UNP", "Union Pacific", 7.2),
        ("GE", "General Electric", 6.5),
        ("BA", "Boeing Co", 5.8),
        ("HON", "Honeywell Intl", 5.2),
    ]),
    ("XLP", &[
        ("PG", "Procter & Gamble", 14.2),
        ("KO", "Coca-Cola Co", 11.8),
        ("PEP", "PepsiCo Inc", 10.5),
        ("COST", "Costco Wholesale", 9.8),
        ("WMT", "Walmart Inc", 8.9),
    ]),
    ("XLC", &[
        ("META", "Meta Platforms", 24.3),
        ("GOOGL", "Alphabet Inc", 22.1),
        ("NFLX", "Netflix Inc", 8.9),
        ("DIS", "Walt Disney", 6.2),
        ("CMCSA", "Comcast Corp", 4.8),
    ]),
    ("XLRE", &[
        ("AMT", "American Tower", 12.3),
        ("PLD", "Prologis Inc", 10.8),
        ("EQIX", "Equinix Inc", 7.9),
        ("PSA", "Public Storage", 6.5),
        ("SPG", "Simon Property", 5.2),
    ]),
    ("XLB", &[
        ("LIN", "Linde PLC", 18.9),
        ("APD", "Air Products", 9.2),
        ("SHW", "Sherwin-Williams", 8.5),
        ("FCX", "Freeport-McMoRan", 6.8),
        ("NEM", "Newmont Corp", 5.4),
    ]),
    ("XLU", &[
        ("NEE", "NextEra Energy", 15.2),
        ("DUK", "Duke Energy", 8.9),
        ("SO", "Southern Co", 7.6),
        ("D", "Dominion Energy", 6.8),
        ("AEP", "American Electric", 5.9),
    ]),
];

impl SectorUniverse {
    pub fn new(sectors: Vec<SectorEtf>, fallback: HashMap<String, Vec<Holding>>) -> Self {
        Self { sectors, fallback }
    }

    /// The eleven Select Sector SPDR funds with their fallback top-5 holdings.
    pub fn default_spdr() -> Self {
        let sectors = SPDR_SECTORS
            .iter()
            .map(|(etf, sector)| SectorEtf {
                etf: etf.to_string(),
                sector: sector.to_string(),
            })
            .collect();

        let fallback = SPDR_FALLBACK_HOLDINGS
            .iter()
            .map(|(etf, rows)| {
                let holdings = rows
                    .iter()
                    .map(|(ticker, name, weight)| Holding {
                        ticker: ticker.to_string(),
                        name: name.to_string(),
                        weight: *weight,
                    })
                    .collect();
                (etf.to_string(), holdings)
            })
            .collect();

        Self::new(sectors, fallback)
    }

    pub fn sectors(&self) -> &[SectorEtf] {
        &self.sectors
    }

    pub fn etf_for(&self, sector: &str) -> Option<&str> {
        self.sectors
            .iter()
            .find(|s| s.sector == sector)
            .map(|s| s.etf.as_str())
    }

    pub fn sector_for(&self, etf: &str) -> Option<&str> {
        let etf_upper = etf.to_uppercase();
        self.sectors
            .iter()
            .find(|s| s.etf == etf_upper)
            .map(|s| s.sector.as_str())
    }

    /// First `top_n` fallback holdings for an ETF; empty for unknown funds.
    pub fn fallback_holdings(&self, etf: &str, top_n: usize) -> Vec<Holding> {
        self.fallback
            .get(&etf.to_uppercase())
            .map(|h| h.iter().take(top_n).cloned().collect())
            .unwrap_or_default()
    }

    /// Fallback holdings for every sector, keyed by sector name.
    pub fn fallback_sector_holdings(&self, top_n: usize) -> BTreeMap<String, SectorHoldings> {
        self.sectors
            .iter()
            .map(|s| {
                (
                    s.sector.clone(),
                    SectorHoldings {
                        etf: s.etf.clone(),
                        holdings: self.fallback_holdings(&s.etf, top_n),
                    },
                )
            })
            .collect()
    }

    /// Flatten per-sector holdings into the ticker list the news collector walks.
    ///
    /// Sectors are emitted in universe order; sectors outside the universe follow
    /// in name order.
    pub fn portfolio(&self, holdings: &BTreeMap<String, SectorHoldings>) -> Vec<PortfolioEntry> {
        let known = self
            .sectors
            .iter()
            .filter_map(|s| holdings.get_key_value(&s.sector));
        let unknown = holdings
            .iter()
            .filter(|(sector, _)| self.etf_for(sector).is_none());

        known
            .chain(unknown)
            .flat_map(|(sector, data)| {
                data.holdings.iter().map(move |h| PortfolioEntry {
                    sector: sector.clone(),
                    etf: data.etf.clone(),
                    ticker: h.ticker.clone(),
                    company: h.name.clone(),
                    weight: h.weight,
                })
            })
            .collect()
    }

    /// Universe sectors that have no score in this run.
    ///
    /// A missing sector means "no articles", which is not the same as a score of 0.0.
    pub fn missing_sectors<'a>(&'a self, scores: &BTreeMap<String, SectorScore>) -> Vec<&'a SectorEtf> {
        self.sectors
            .iter()
            .filter(|s| !scores.contains_key(&s.sector))
            .collect()
    }
}

impl Default for SectorUniverse {
    fn default() -> Self {
        Self::default_spdr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_has_eleven_sectors() {
        let universe = SectorUniverse::default_spdr();
        assert_eq!(universe.sectors().len(), 11);
        assert_eq!(universe.etf_for("Energy"), Some("XLE"));
        assert_eq!(universe.sector_for("xlre"), Some("Real Estate"));
        assert_eq!(universe.etf_for("Crypto"), None);
    }

    #[test]
    fn test_fallback_holdings_respect_top_n() {
        let universe = SectorUniverse::default_spdr();
        let top = universe.fallback_holdings("XLK", 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].ticker, "AAPL");
        assert_eq!(top[1].weight, 20.8);
        assert!(universe.fallback_holdings("QQQ", 5).is_empty());
    }

    #[test]
    fn test_portfolio_follows_universe_order() {
        let universe = SectorUniverse::default_spdr();
        let holdings = universe.fallback_sector_holdings(1);
        let portfolio = universe.portfolio(&holdings);

        assert_eq!(portfolio.len(), 11);
        assert_eq!(portfolio[0].ticker, "AAPL");
        assert_eq!(portfolio[0].sector, "Technology");
        assert_eq!(portfolio[10].ticker, "NEE");
        assert_eq!(portfolio[10].etf, "XLU");
    }

    #[test]
    fn test_missing_sectors() {
        let universe = SectorUniverse::default_spdr();
        let mut scores = BTreeMap::new();
        scores.insert(
            "Energy".to_string(),
            SectorScore {
                sector: "Energy".to_string(),
                etf: "XLE".to_string(),
                simple_average: 0.0,
                weighted_average: 0.0,
                article_count: 1,
            },
        );

        let missing = universe.missing_sectors(&scores);
        assert_eq!(missing.len(), 10);
        assert!(missing.iter().all(|s| s.sector != "Energy"));
    }
}
