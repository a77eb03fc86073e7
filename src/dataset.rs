// 📂 Dataset Loader - CSV → typed, normalised, read-only tables
//
// Two kinds of source file:
// - artist tables (combined large/small museum data, small museum sheet)
// - the precomputed mission statement word-frequency table
//
// Cells are trimmed, empty categorical cells become "Unknown", and BeginDate
// values that do not parse as numbers are coerced to missing.

use crate::error::LoadError;
use crate::present::HighlightSet;
use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sentinel for absent categorical values
pub const UNKNOWN: &str = "Unknown";

/// Header used when a table is built in memory rather than read from disk
pub const CANONICAL_COLUMNS: &[&str] = &[
    "Name",
    "Nationality",
    "Gender",
    "Ethnicity",
    "Museum",
    "BeginDate",
    "SmallMuseum",
];

// ============================================================================
// ARTIST RECORD
// ============================================================================

/// One artist-institution observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtistRecord {
    pub name: String,
    pub nationality: String,
    pub gender: String,
    pub ethnicity: Option<String>,
    pub museum: String,
    pub begin_date: Option<i32>,
    pub small_museum: Option<bool>,

    /// Normalised cells in source column order, used for export
    #[serde(skip)]
    cells: Vec<String>,
}

impl ArtistRecord {
    /// Record with the given name and nationality; everything else unknown
    pub fn new(name: &str, nationality: &str) -> Self {
        ArtistRecord {
            name: categorical(name),
            nationality: categorical(nationality),
            gender: UNKNOWN.to_string(),
            ethnicity: None,
            museum: UNKNOWN.to_string(),
            begin_date: None,
            small_museum: None,
            cells: Vec::new(),
        }
    }

    pub fn with_gender(mut self, gender: &str) -> Self {
        self.gender = categorical(gender);
        self
    }

    pub fn with_ethnicity(mut self, ethnicity: &str) -> Self {
        self.ethnicity = optional(ethnicity);
        self
    }

    pub fn with_museum(mut self, museum: &str) -> Self {
        self.museum = categorical(museum);
        self
    }

    pub fn with_begin_date(mut self, year: i32) -> Self {
        self.begin_date = Some(year);
        self
    }

    pub fn with_small_museum(mut self, small: bool) -> Self {
        self.small_museum = Some(small);
        self
    }

    /// Normalised cells, aligned with the owning table's `columns`
    pub fn cells(&self) -> &[String] {
        &self.cells
    }

    fn canonical_cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.nationality.clone(),
            self.gender.clone(),
            self.ethnicity.clone().unwrap_or_default(),
            self.museum.clone(),
            self.begin_date.map(|y| y.to_string()).unwrap_or_default(),
            self.small_museum.map(|s| s.to_string()).unwrap_or_default(),
        ]
    }
}

fn categorical(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN.to_string()
    } else {
        trimmed.to_string()
    }
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a year the way a numeric coercion would: integers and decimals are
/// accepted (decimals floored), anything else is missing.
pub fn parse_year(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    let number: f64 = trimmed.parse().ok()?;
    if !number.is_finite() || number < i32::MIN as f64 || number > i32::MAX as f64 {
        return None;
    }
    Some(number.floor() as i32)
}

/// Parse a non-negative count written as `15` or `15.0` (floored).
pub fn parse_count(value: &str) -> Option<u32> {
    let number: f64 = value.trim().parse().ok()?;
    if !number.is_finite() || number < 0.0 || number > u32::MAX as f64 {
        return None;
    }
    Some(number.floor() as u32)
}

fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_count(&raw).ok_or_else(|| de::Error::custom(format!("invalid count {:?}", raw)))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" => Some(false),
        _ => None,
    }
}

// ============================================================================
// LOAD OPTIONS
// ============================================================================

/// How to read a file whose header may be unusable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct LoadOptions {
    /// Explicit column names; when set, the file has no header row of its own
    pub column_names: Option<Vec<String>>,

    /// Lines dropped before parsing starts
    pub skip_rows: usize,
}

impl LoadOptions {
    /// Combined large + small museum file: header row used as-is
    pub fn combined() -> Self {
        LoadOptions::default()
    }

    /// Small museum sheet: first line is an export artifact, names supplied
    pub fn small_museums() -> Self {
        LoadOptions {
            column_names: Some(
                ["Name", "Nationality", "Gender", "Museum", "SmallMuseum"]
                    .iter()
                    .map(|c| c.to_string())
                    .collect(),
            ),
            skip_rows: 1,
        }
    }
}

// ============================================================================
// ARTIST TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub rows: usize,
    /// Empty categorical cells replaced with "Unknown"
    pub filled_unknown: usize,
    /// Non-empty BeginDate cells that did not parse
    pub coerced_dates: usize,
}

/// Immutable snapshot of an artist file.
#[derive(Debug, Clone)]
pub struct ArtistTable {
    pub source: Option<PathBuf>,
    pub columns: Vec<String>,
    records: Vec<ArtistRecord>,
    /// SHA-256 of the source bytes (or of the canonical cells when built in memory)
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    pub stats: LoadStats,
}

impl ArtistTable {
    /// Build a table from records held in memory (canonical column layout)
    pub fn from_records(records: Vec<ArtistRecord>) -> Self {
        let mut hasher = Sha256::new();
        let records: Vec<ArtistRecord> = records
            .into_iter()
            .map(|mut r| {
                r.cells = r.canonical_cells();
                hasher.update(r.cells.join("\u{1f}"));
                hasher.update("\n");
                r
            })
            .collect();

        ArtistTable {
            source: None,
            columns: CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect(),
            stats: LoadStats {
                rows: records.len(),
                ..LoadStats::default()
            },
            records,
            fingerprint: format!("{:x}", hasher.finalize()),
            loaded_at: Utc::now(),
        }
    }

    pub fn records(&self) -> &[ArtistRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ArtistRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display name of the backing file
    pub fn source_name(&self) -> String {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "in-memory".to_string())
    }
}

/// Where each typed field lives in the source columns
#[derive(Debug)]
struct ColumnIndex {
    name: Option<usize>,
    nationality: usize,
    gender: Option<usize>,
    ethnicity: Option<usize>,
    museum: Option<usize>,
    begin_date: Option<usize>,
    small_museum: Option<usize>,
}

impl ColumnIndex {
    fn resolve(columns: &[String], path: &Path) -> Result<Self, LoadError> {
        let find = |aliases: &[&str]| {
            columns.iter().position(|c| {
                let c = c.trim();
                aliases.iter().any(|a| c.eq_ignore_ascii_case(a))
            })
        };

        let nationality = find(&["Nationality"]).ok_or_else(|| LoadError::MissingColumn {
            path: path.to_path_buf(),
            column: "Nationality".to_string(),
        })?;

        Ok(ColumnIndex {
            name: find(&["Name", "DisplayName", "Artist"]),
            nationality,
            gender: find(&["Gender"]),
            ethnicity: find(&["Ethnicity"]),
            museum: find(&["Museum", "Institution"]),
            begin_date: find(&["BeginDate"]),
            small_museum: find(&["SmallMuseum"]),
        })
    }

    fn is_categorical(&self, idx: usize) -> bool {
        Some(idx) == self.name
            || idx == self.nationality
            || Some(idx) == self.gender
            || Some(idx) == self.museum
    }
}

/// Load an artist file into a typed table.
///
/// # Errors
/// * `NotFound` - the path does not resolve
/// * `Parse` - malformed quoting or rows of unequal length
/// * `MissingColumn` - no Nationality column
pub fn load_artists(path: &Path, options: &LoadOptions) -> Result<ArtistTable, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    let fingerprint = fingerprint(&bytes);
    let body = skip_lines(&bytes, options.skip_rows);

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(options.column_names.is_none())
        .flexible(false)
        .from_reader(body);

    let columns: Vec<String> = match &options.column_names {
        Some(names) => names.clone(),
        None => rdr
            .headers()
            .map_err(|e| LoadError::from_csv(path, e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
    };

    let index = ColumnIndex::resolve(&columns, path)?;
    let mut stats = LoadStats::default();
    let mut records = Vec::new();

    for result in rdr.records() {
        let row = result.map_err(|e| LoadError::from_csv(path, e))?;

        // With explicit names the reader has no header to compare against
        if row.len() != columns.len() {
            return Err(LoadError::ColumnCount {
                path: path.to_path_buf(),
                line: row.position().map(|p| p.line()).unwrap_or(0) + options.skip_rows as u64,
                expected: columns.len(),
                found: row.len(),
            });
        }

        let mut cells: Vec<String> = Vec::with_capacity(row.len());
        for (i, raw) in row.iter().enumerate() {
            let trimmed = raw.trim();
            if trimmed.is_empty() && index.is_categorical(i) {
                stats.filled_unknown += 1;
                cells.push(UNKNOWN.to_string());
            } else {
                cells.push(trimmed.to_string());
            }
        }

        let cell = |idx: Option<usize>| idx.map(|i| cells[i].as_str()).unwrap_or("");

        let begin_raw = cell(index.begin_date);
        let begin_date = parse_year(begin_raw);
        if begin_date.is_none() && !begin_raw.is_empty() {
            stats.coerced_dates += 1;
            debug!(path = %path.display(), value = begin_raw, "BeginDate coerced to missing");
        }

        let record = ArtistRecord {
            name: categorical(cell(index.name)),
            nationality: cells[index.nationality].clone(),
            gender: categorical(cell(index.gender)),
            ethnicity: optional(cell(index.ethnicity)),
            museum: categorical(cell(index.museum)),
            begin_date,
            small_museum: parse_flag(cell(index.small_museum)),
            cells: Vec::new(),
        };

        records.push(ArtistRecord { cells, ..record });
    }

    stats.rows = records.len();

    info!(
        path = %path.display(),
        rows = stats.rows,
        filled_unknown = stats.filled_unknown,
        coerced_dates = stats.coerced_dates,
        "loaded artist table"
    );

    Ok(ArtistTable {
        source: Some(path.to_path_buf()),
        columns,
        records,
        fingerprint,
        loaded_at: Utc::now(),
        stats,
    })
}

// ============================================================================
// WORD FREQUENCIES
// ============================================================================

/// One row of the precomputed mission statement word counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequencyEntry {
    #[serde(rename = "Words")]
    pub word: String,

    #[serde(rename = "Frequency", deserialize_with = "deserialize_count")]
    pub frequency: u32,

    /// True iff the lower-cased word is in the highlight set
    #[serde(skip_deserializing, default)]
    pub highlighted: bool,
}

impl WordFrequencyEntry {
    pub fn new(word: &str, frequency: u32, highlight: &HighlightSet) -> Self {
        WordFrequencyEntry {
            word: word.trim().to_string(),
            frequency,
            highlighted: highlight.contains(word),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WordTable {
    pub source: Option<PathBuf>,
    /// Ordered by frequency, highest first; file order on ties
    pub entries: Vec<WordFrequencyEntry>,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
}

impl WordTable {
    pub fn from_entries(mut entries: Vec<WordFrequencyEntry>) -> Self {
        entries.sort_by(|a, b| b.frequency.cmp(&a.frequency));
        let mut hasher = Sha256::new();
        for e in &entries {
            hasher.update(format!("{}\u{1f}{}\n", e.word, e.frequency));
        }

        WordTable {
            source: None,
            entries,
            fingerprint: format!("{:x}", hasher.finalize()),
            loaded_at: Utc::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `n` most frequent words
    pub fn top(&self, n: usize) -> &[WordFrequencyEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Entries whose word contains `needle`, case-insensitive; all when blank
    pub fn search(&self, needle: &str) -> Vec<WordFrequencyEntry> {
        let needle = needle.trim().to_lowercase();
        self.entries
            .iter()
            .filter(|e| needle.is_empty() || e.word.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Load the `Words,Frequency` table and flag highlighted words.
pub fn load_word_frequencies(path: &Path, highlight: &HighlightSet) -> Result<WordTable, LoadError> {
    let bytes = fs::read(path).map_err(|e| LoadError::from_io(path, e))?;
    let fingerprint = fingerprint(&bytes);

    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes.as_slice());

    let headers = rdr.headers().map_err(|e| LoadError::from_csv(path, e))?;
    for required in ["Words", "Frequency"] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: required.to_string(),
            });
        }
    }

    let mut entries = Vec::new();
    for result in rdr.deserialize() {
        let entry: WordFrequencyEntry = result.map_err(|e| LoadError::from_csv(path, e))?;
        entries.push(WordFrequencyEntry::new(&entry.word, entry.frequency, highlight));
    }

    let mut table = WordTable::from_entries(entries);
    table.source = Some(path.to_path_buf());
    table.fingerprint = fingerprint;

    info!(path = %path.display(), words = table.len(), "loaded word frequencies");

    Ok(table)
}

// ============================================================================
// HELPERS
// ============================================================================

/// SHA-256 of raw file bytes, hex encoded
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

fn skip_lines(bytes: &[u8], count: usize) -> &[u8] {
    let mut rest = bytes;
    for _ in 0..count {
        match rest.iter().position(|&b| b == b'\n') {
            Some(pos) => rest = &rest[pos + 1..],
            None => return &[],
        }
    }
    rest
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_fixture(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1923"), Some(1923));
        assert_eq!(parse_year(" 1928.0 "), Some(1928));
        assert_eq!(parse_year("0"), Some(0));
        assert_eq!(parse_year("c. 1900"), None);
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("nan"), None);
    }

    #[test]
    fn test_load_combined_normalises_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "combined.csv",
            "DisplayName,Nationality,Gender,Ethnicity,BeginDate,Museum\n\
             Romare Bearden, American ,Male,African-American,1911,MoMA\n\
             Anon,,,,unknown,MoMA\n",
        );

        let table = load_artists(&path, &LoadOptions::combined()).unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.name, "Romare Bearden");
        assert_eq!(first.nationality, "American");
        assert_eq!(first.ethnicity.as_deref(), Some("African-American"));
        assert_eq!(first.begin_date, Some(1911));

        let second = &table.records()[1];
        assert_eq!(second.nationality, UNKNOWN);
        assert_eq!(second.gender, UNKNOWN);
        assert_eq!(second.ethnicity, None);
        assert_eq!(second.begin_date, None);

        assert_eq!(table.stats.filled_unknown, 2);
        assert_eq!(table.stats.coerced_dates, 1);
        assert_eq!(second.cells()[1], UNKNOWN);
    }

    #[test]
    fn test_load_small_museums_skips_artifact_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "small.csv",
            "Unnamed: 0,Unnamed: 1\n\
             Kehinde Wiley,American,Male,Seattle Art Museum,TRUE\n\
             Amy Sherald,American, Female ,Frye,TRUE\n",
        );

        let table = load_artists(&path, &LoadOptions::small_museums()).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.columns[0], "Name");
        assert_eq!(table.records()[1].gender, "Female");
        assert_eq!(table.records()[0].museum, "Seattle Art Museum");
        assert_eq!(table.records()[0].small_museum, Some(true));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_artists(Path::new("no/such/file.csv"), &LoadOptions::combined());
        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn test_load_unequal_rows_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "bad.csv", "Name,Nationality\nA,American\nB,French,extra\n");

        let result = load_artists(&path, &LoadOptions::combined());
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_load_without_nationality_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "nonat.csv", "Name,Gender\nA,Female\n");

        let result = load_artists(&path, &LoadOptions::combined());
        assert!(matches!(result, Err(LoadError::MissingColumn { .. })));
    }

    #[test]
    fn test_explicit_names_column_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "short.csv", "junk\nA,American,Male\n");

        let result = load_artists(&path, &LoadOptions::small_museums());
        assert!(matches!(result, Err(LoadError::ColumnCount { expected: 5, found: 3, .. })));
    }

    #[test]
    fn test_load_word_frequencies_sorted_and_flagged() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(
            &dir,
            "words.csv",
            "Words,Frequency\nart,40\nCommunity,15\nmuseum,40\nworld,12\n",
        );
        let highlight = HighlightSet::new(["community"]);

        let table = load_word_frequencies(&path, &highlight).unwrap();

        let words: Vec<&str> = table.entries.iter().map(|e| e.word.as_str()).collect();
        assert_eq!(words, vec!["art", "museum", "Community", "world"]);
        assert!(table.entries[2].highlighted);
        assert!(!table.entries[0].highlighted);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("15"), Some(15));
        assert_eq!(parse_count(" 15.0 "), Some(15));
        assert_eq!(parse_count("9.7"), Some(9));
        assert_eq!(parse_count("-1"), None);
        assert_eq!(parse_count("many"), None);
    }

    #[test]
    fn test_word_frequencies_accept_decimal_counts() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(&dir, "words.csv", "Words,Frequency
community,15.0
art,40
");

        let table = load_word_frequencies(&path, &HighlightSet::default()).unwrap();

        assert_eq!(table.entries[0].frequency, 40);
        assert_eq!(table.entries[1].word, "community");
        assert_eq!(table.entries[1].frequency, 15);

        let bad = write_fixture(&dir, "bad.csv", "Words,Frequency
community,lots
");
        assert!(matches!(
            load_word_frequencies(&bad, &HighlightSet::default()),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_word_table_top_and_search() {
        let highlight = HighlightSet::new(["equity"]);
        let table = WordTable::from_entries(vec![
            WordFrequencyEntry::new("museum", 50, &highlight),
            WordFrequencyEntry::new("Equity", 8, &highlight),
            WordFrequencyEntry::new("equitable", 4, &highlight),
        ]);

        assert_eq!(table.top(2).len(), 2);
        assert_eq!(table.top(99).len(), 3);

        let hits = table.search("EQUIT");
        assert_eq!(hits.len(), 2);
        assert!(hits[0].highlighted);
        assert!(!hits[1].highlighted);
        assert_eq!(table.search("  ").len(), 3);
    }

    #[test]
    fn test_fingerprint_stable() {
        assert_eq!(fingerprint(b"abc"), fingerprint(b"abc"));
        assert_ne!(fingerprint(b"abc"), fingerprint(b"abd"));
    }
}
