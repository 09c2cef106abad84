//! Splits catalog geographic strings into administrative levels.
//!
//! Two policies exist because the catalog data has been consumed both ways:
//!
//! - [`ParsePolicy::Positional`] splits on the delimiter class and assigns the
//!   first three tokens to country, county and municipality, the rest to
//!   numbered localities. With placeholder dropping on, `norge`/`null` tokens
//!   are removed first and assignment starts at the county slot.
//! - [`ParsePolicy::TokenSet`] treats the string as a comma list of unrelated
//!   place names: `null` substrings and quotes are stripped, tokens are trimmed
//!   and de-duplicated. No positional slots are filled.
//!
//! Neither policy fails; anything unparseable yields empty fields.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{AdminLevel, GeographicFields};

static DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;:,?&\s]+").expect("delimiter pattern"));
static DELIMITERS_NO_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[;:,?&]+").expect("delimiter pattern"));

const PLACEHOLDERS: &[&str] = &["norge", "null"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Fixed country/county/municipality/locality slots
    #[default]
    Positional,
    /// Unordered, de-duplicated place names
    TokenSet,
}

#[derive(Debug, Clone)]
pub struct GeographicParser {
    policy: ParsePolicy,
    split_on_whitespace: bool,
    drop_placeholders: bool,
}

impl GeographicParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self {
            policy,
            split_on_whitespace: true,
            drop_placeholders: false,
        }
    }

    /// Whether whitespace separates tokens (positional policy only)
    pub fn split_on_whitespace(mut self, enabled: bool) -> Self {
        self.split_on_whitespace = enabled;
        self
    }

    /// Remove `norge`/`null` tokens before assignment
    pub fn drop_placeholders(mut self, enabled: bool) -> Self {
        self.drop_placeholders = enabled;
        self
    }

    pub fn policy(&self) -> ParsePolicy {
        self.policy
    }

    pub fn parse(&self, raw: &str) -> GeographicFields {
        match self.policy {
            ParsePolicy::Positional => self.parse_positional(raw),
            ParsePolicy::TokenSet => self.parse_token_set(raw),
        }
    }

    fn parse_positional(&self, raw: &str) -> GeographicFields {
        let delimiters = if self.split_on_whitespace {
            &*DELIMITERS
        } else {
            &*DELIMITERS_NO_SPACE
        };

        let tokens: Vec<&str> = delimiters
            .split(raw)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter(|t| !(self.drop_placeholders && is_placeholder(t)))
            .collect();

        // Without a country token the first value is the county.
        let slots = if self.drop_placeholders {
            &AdminLevel::fixed()[1..]
        } else {
            AdminLevel::fixed()
        };

        let mut fields = GeographicFields::default();
        for (i, token) in tokens.iter().enumerate() {
            let level = slots.get(i).copied().unwrap_or(AdminLevel::Locality);
            fields.set(level, token.to_string());
        }
        fields.tokens = unique(tokens);
        fields
    }

    fn parse_token_set(&self, raw: &str) -> GeographicFields {
        let cleaned = raw
            .replace("null", "")
            .replace(['\'', '"'], "")
            .replace(';', ",");

        let tokens: Vec<&str> = cleaned
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .filter(|t| !(self.drop_placeholders && is_placeholder(t)))
            .collect();

        GeographicFields {
            tokens: unique(tokens),
            ..Default::default()
        }
    }
}

impl Default for GeographicParser {
    fn default() -> Self {
        Self::new(ParsePolicy::Positional)
    }
}

fn is_placeholder(token: &str) -> bool {
    PLACEHOLDERS.iter().any(|p| token.eq_ignore_ascii_case(p))
}

/// De-duplicate keeping first-seen order
fn unique(tokens: Vec<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|t| seen.insert(*t))
        .map(str::to_string)
        .collect()
}
