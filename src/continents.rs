// 🌍 Continent Mapping - Rules as Data
// Nationality → continent bucket. The table is plain data; extend it (or load
// a JSON replacement) without touching aggregation code.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

// ============================================================================
// CONTINENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Continent {
    #[serde(rename = "North America")]
    NorthAmerica,
    #[serde(rename = "South America")]
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
    #[serde(rename = "Multinational/Other")]
    Multinational,
    /// Nationality absent from the table
    Unmapped,
}

impl Continent {
    pub fn label(&self) -> &'static str {
        match self {
            Continent::NorthAmerica => "North America",
            Continent::SouthAmerica => "South America",
            Continent::Europe => "Europe",
            Continent::Africa => "Africa",
            Continent::Asia => "Asia",
            Continent::Oceania => "Oceania",
            Continent::Multinational => "Multinational/Other",
            Continent::Unmapped => "Unmapped",
        }
    }
}

impl fmt::Display for Continent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinentRule {
    /// Nationality to match; `*` is a wildcard, otherwise the whole value must match
    pub pattern: String,

    pub continent: Continent,
}

impl ContinentRule {
    pub fn new(pattern: &str, continent: Continent) -> Self {
        ContinentRule {
            pattern: pattern.to_string(),
            continent,
        }
    }

    /// Case-insensitive, surrounding whitespace ignored
    pub fn matches(&self, nationality: &str) -> bool {
        let pattern = self.pattern.trim().to_lowercase();
        let text = nationality.trim().to_lowercase();

        if !pattern.contains('*') {
            return pattern == text;
        }

        let parts: Vec<&str> = pattern.split('*').collect();
        let (first, last) = (parts[0], parts[parts.len() - 1]);

        if !text.starts_with(first) {
            return false;
        }
        let mut rest = &text[first.len()..];

        for middle in &parts[1..parts.len() - 1] {
            match rest.find(middle) {
                Some(pos) => rest = &rest[pos + middle.len()..],
                None => return false,
            }
        }

        rest.ends_with(last)
    }
}

// ============================================================================
// CONTINENT MAP
// ============================================================================

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinentMap {
    rules: Vec<ContinentRule>,
}

impl ContinentMap {
    /// Empty map: every nationality is unmapped
    pub fn empty() -> Self {
        ContinentMap { rules: Vec::new() }
    }

    /// Load rules from a JSON array of `{ "pattern", "continent" }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;

        let rules: Vec<ContinentRule> =
            serde_json::from_str(&content).map_err(|e| LoadError::Config {
                path: path.to_path_buf(),
                message: format!("failed to parse continent rules: {}", e),
            })?;

        Ok(ContinentMap::from_rules(rules))
    }

    /// Declared order is kept; earlier rules shadow later ones
    pub fn from_rules(rules: Vec<ContinentRule>) -> Self {
        ContinentMap { rules }
    }

    pub fn with_rule(mut self, rule: ContinentRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn bucket(&self, nationality: &str) -> Continent {
        self.rules
            .iter()
            .find(|rule| rule.matches(nationality))
            .map(|rule| rule.continent)
            .unwrap_or(Continent::Unmapped)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[ContinentRule] {
        &self.rules
    }
}

impl Default for ContinentMap {
    /// The hand-curated table for the small museum dataset
    fn default() -> Self {
        use Continent::*;

        const TABLE: &[(&str, Continent)] = &[
            ("American", NorthAmerica),
            ("African-American", NorthAmerica),
            ("Native American", NorthAmerica),
            ("Mexican", NorthAmerica),
            ("Mexican-American", NorthAmerica),
            ("Canadian", NorthAmerica),
            ("Canadian-American", NorthAmerica),
            ("Cuban", NorthAmerica),
            ("Cuban-American", NorthAmerica),
            ("Bahamian", NorthAmerica),
            ("Haitian", NorthAmerica),
            ("American-Haitian", NorthAmerica),
            ("Dominican", NorthAmerica),
            ("Peruvian", SouthAmerica),
            ("Brazilian", SouthAmerica),
            ("Brazilian-American", SouthAmerica),
            ("Venezuelan", SouthAmerica),
            ("Colombian", SouthAmerica),
            ("German", Europe),
            ("German-American", Europe),
            ("Irish-American", Europe),
            ("Italian", Europe),
            ("Italian-American", Europe),
            ("Dutch", Europe),
            ("Norwegian", Europe),
            ("Swedish", Europe),
            ("Danish", Europe),
            ("Finnish", Europe),
            ("Polish-Ukrainian", Europe),
            ("British", Europe),
            ("British-American", Europe),
            ("French", Europe),
            ("Icelandic-Danish", Europe),
            ("English", Europe),
            ("Nigerian", Africa),
            ("Ghanaian", Africa),
            ("Kenyan", Africa),
            ("Ugandan", Africa),
            ("Congolese", Africa),
            ("South African", Africa),
            ("Indian", Asia),
            ("Lebanese", Asia),
            ("Turkish", Asia),
            ("Chinese", Asia),
            ("Chinese-American", Asia),
            ("South Korean", Asia),
            ("Japanese", Asia),
            ("Korean", Asia),
            ("American-Korean", Asia),
            ("Palestinian-American", Asia),
            ("Singaporean", Asia),
            ("Asian-American", Asia),
            ("Australian", Oceania),
            ("Canadian-Ukrainian", Multinational),
            ("Haitian Jamaican", Multinational),
        ];

        ContinentMap::from_rules(
            TABLE
                .iter()
                .map(|(pattern, continent)| ContinentRule::new(pattern, *continent))
                .collect(),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
