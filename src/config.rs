// ⚙️ Dashboard Configuration - where the datasets live and page display bounds
// Every field has a default; a JSON file only needs the keys it overrides.

use crate::error::LoadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default ADEI vocabulary flagged on the mission statement page.
pub const DEFAULT_HIGHLIGHT_WORDS: &[&str] = &[
    "global",
    "diverse",
    "diversity",
    "african",
    "equity",
    "black",
    "women",
    "inclusion",
    "community",
    "culture",
    "cultural",
    "identity",
    "outreach",
    "equitable",
    "discrimination",
    "integrity",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub combined_file: String,
    pub small_museum_file: String,
    pub word_frequency_file: String,

    /// JSON rule list replacing the built-in continent table
    pub continent_rules: Option<PathBuf>,

    pub highlight_words: Vec<String>,

    /// Substring matched against Ethnicity/Nationality for the representation views
    pub representation_term: String,

    pub top_nationalities: usize,
    pub top_nationalities_table: usize,

    pub word_count: RangeSetting,
    pub default_min_count: usize,

    pub server_addr: String,
}

/// Slider bounds with a starting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeSetting {
    pub min: usize,
    pub max: usize,
    pub default: usize,
}

impl RangeSetting {
    pub fn clamp(&self, value: usize) -> usize {
        value.clamp(self.min, self.max.max(self.min))
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_dir: PathBuf::from("data"),
            combined_file: "combinedSmallandLargeFinal.csv".to_string(),
            small_museum_file: "Small Museum Data - Sheet1 (1).csv".to_string(),
            word_frequency_file: "Mission_Statement_Word_Freq.csv".to_string(),
            continent_rules: None,
            highlight_words: DEFAULT_HIGHLIGHT_WORDS.iter().map(|w| w.to_string()).collect(),
            representation_term: "African".to_string(),
            top_nationalities: 20,
            top_nationalities_table: 10,
            word_count: RangeSetting {
                min: 5,
                max: 50,
                default: 25,
            },
            default_min_count: 1,
            server_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;

        serde_json::from_str(&content).map_err(|e| LoadError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Defaults rooted at a different data directory
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        DashboardConfig {
            data_dir: data_dir.into(),
            ..DashboardConfig::default()
        }
    }

    pub fn combined_path(&self) -> PathBuf {
        self.data_dir.join(&self.combined_file)
    }

    pub fn small_museum_path(&self) -> PathBuf {
        self.data_dir.join(&self.small_museum_file)
    }

    pub fn word_frequency_path(&self) -> PathBuf {
        self.data_dir.join(&self.word_frequency_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page_bounds() {
        let config = DashboardConfig::default();

        assert_eq!(config.word_count.min, 5);
        assert_eq!(config.word_count.max, 50);
        assert_eq!(config.word_count.default, 25);
        assert_eq!(config.default_min_count, 1);
        assert_eq!(config.highlight_words.len(), 16);
        assert_eq!(
            config.small_museum_path(),
            PathBuf::from("data").join("Small Museum Data - Sheet1 (1).csv")
        );
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: DashboardConfig =
            serde_json::from_str(r#"{ "data_dir": "fixtures", "top_nationalities": 5 }"#).unwrap();

        assert_eq!(config.data_dir, PathBuf::from("fixtures"));
        assert_eq!(config.top_nationalities, 5);
        assert_eq!(config.representation_term, "African");
        assert_eq!(config.word_count.default, 25);
    }

    #[test]
    fn test_range_clamp() {
        let range = DashboardConfig::default().word_count;

        assert_eq!(range.clamp(1), 5);
        assert_eq!(range.clamp(30), 30);
        assert_eq!(range.clamp(500), 50);
    }

    #[test]
    fn test_from_file_missing() {
        let result = DashboardConfig::from_file("does/not/exist.json");
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }
}
