//! sector-report: score collected ETF holding news and write the daily sector report.
//!
//! Reads the collector's article dump, annotates every article with a sentiment
//! score and category, rolls the scores up per sector and writes
//! `Market_Monitor_<date>.json`.
//!
//! Usage:
//!   cargo run -p sector-report -- --input data/raw/news.json
//!   cargo run -p sector-report -- --input news.json --lexicon-only
//!   cargo run -p sector-report -- --input news.json --weight 0.5 --date 2025-01-15

mod report;

use analysis_core::SectorUniverse;
use anyhow::Context;
use chrono::{NaiveDate, Utc};
use sentiment_analysis::{ArticleAnnotator, CategoryClassifier, HybridScorer, ScorerConfig};
use std::path::PathBuf;

use report::{load_articles, MarketReport};

const DEFAULT_REPORT_DIR: &str = "data/reports";

#[derive(Debug, Clone, PartialEq)]
struct RunArgs {
    input: PathBuf,
    output_dir: Option<PathBuf>,
    date: Option<NaiveDate>,
    lexicon_only: bool,
    weight: Option<f64>,
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<RunArgs>> {
    let Some(input) = flag_value(args, "--input") else {
        return Ok(None);
    };

    let date = flag_value(args, "--date")
        .map(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .with_context(|| format!("--date must be YYYY-MM-DD, got '{}'", raw))
        })
        .transpose()?;
    let weight = flag_value(args, "--weight")
        .map(|raw| {
            raw.parse::<f64>()
                .with_context(|| format!("--weight must be a number, got '{}'", raw))
        })
        .transpose()?;

    Ok(Some(RunArgs {
        input: PathBuf::from(input),
        output_dir: flag_value(args, "--output-dir").map(PathBuf::from),
        date,
        lexicon_only: args.iter().any(|a| a == "--lexicon-only"),
        weight,
    }))
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  sector-report --input PATH         Articles JSON array from the news collector");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --output-dir PATH   Report directory (default: $REPORT_DIR or {})", DEFAULT_REPORT_DIR);
    eprintln!("  --date YYYY-MM-DD   Report date (default: today, UTC)");
    eprintln!("  --lexicon-only      Skip FinBERT and score with VADER only");
    eprintln!("  --weight W          FinBERT share of the blended score (default: $FINBERT_WEIGHT or 0.7)");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sector_report=info,sentiment_analysis=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(run) = parse_args(&args)? else {
        print_usage();
        std::process::exit(1);
    };

    let mut config = ScorerConfig::from_env()?;
    if run.lexicon_only {
        config.use_domain_estimator = false;
    }
    if let Some(weight) = run.weight {
        config.domain_weight = weight;
    }

    let output_dir = run
        .output_dir
        .clone()
        .or_else(|| std::env::var("REPORT_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_DIR));
    let report_date = run.date.unwrap_or_else(|| Utc::now().date_naive());

    let articles = load_articles(&run.input)?;
    tracing::info!("Loaded {} articles from {}", articles.len(), run.input.display());

    let scorer = HybridScorer::from_config(&config).await?;
    let scorer_mode = scorer.mode();
    let domain_weight = scorer.domain_weight();
    let annotator = ArticleAnnotator::new(scorer, CategoryClassifier::default());
    let annotated = annotator.annotate_batch(&articles).await;

    let universe = SectorUniverse::default_spdr();
    let report = MarketReport::build(report_date, scorer_mode, domain_weight, &universe, annotated);
    report.log_summary();

    let path = report.write_to(&output_dir)?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        std::iter::once("sector-report")
            .chain(raw.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_missing_input_shows_usage() {
        assert_eq!(parse_args(&args(&["--lexicon-only"])).unwrap(), None);
    }

    #[test]
    fn test_parse_all_flags() {
        let run = parse_args(&args(&[
            "--input",
            "news.json",
            "--output-dir",
            "out",
            "--date",
            "2025-01-15",
            "--lexicon-only",
            "--weight",
            "0.5",
        ]))
        .unwrap()
        .unwrap();

        assert_eq!(
            run,
            RunArgs {
                input: PathBuf::from("news.json"),
                output_dir: Some(PathBuf::from("out")),
                date: NaiveDate::from_ymd_opt(2025, 1, 15),
                lexicon_only: true,
                weight: Some(0.5),
            }
        );
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(parse_args(&args(&["--input", "a.json", "--date", "15/01/2025"])).is_err());
        assert!(parse_args(&args(&["--input", "a.json", "--weight", "heavy"])).is_err());
    }
}
