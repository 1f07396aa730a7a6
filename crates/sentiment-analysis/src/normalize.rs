//! Text cleanup applied before any sentiment estimator sees an article.

use regex::Regex;
use std::sync::LazyLock;

static TAG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+|www\.\S+").expect("valid url regex"));
static DISALLOWED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s.,!?-]").expect("valid charset regex"));
static WHITESPACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Strip HTML tags, URLs and symbols, then collapse whitespace.
///
/// Only word characters, whitespace and `. , ! ? -` survive. The URL pass runs
/// again after symbol stripping because removing a symbol can glue a new
/// `http...` token together; with that second pass the function is idempotent.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = TAG_REGEX.replace_all(text, "");
    let text = URL_REGEX.replace_all(&text, "");
    let text = DISALLOWED_REGEX.replace_all(&text, "");
    let text = URL_REGEX.replace_all(&text, "");
    let text = WHITESPACE_REGEX.replace_all(&text, " ");

    text.trim().to_string()
}

/// Keep at most `max_tokens` whitespace-separated tokens.
pub fn truncate_tokens(text: &str, max_tokens: usize) -> String {
    text.split_whitespace()
        .take(max_tokens)
        .collect::<Vec<_>>()
        .join(" ")
}
