// 🧮 Aggregation Engine - value counts, substring filters, grouped proportions
//
// Every function is a single pass (plus a sort) over an immutable table.
// Empty input gives empty output, never an error.

use crate::continents::ContinentMap;
use crate::dataset::{ArtistRecord, ArtistTable};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Years below this are treated as garbage and never bucketed
pub const MIN_VALID_YEAR: i32 = 1000;

// ============================================================================
// COLUMNS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Name,
    Nationality,
    Gender,
    Ethnicity,
    Museum,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Nationality => "Nationality",
            Column::Gender => "Gender",
            Column::Ethnicity => "Ethnicity",
            Column::Museum => "Museum",
        }
    }

    /// Typed accessor; `None` only for an absent ethnicity
    pub fn value<'a>(&self, record: &'a ArtistRecord) -> Option<&'a str> {
        match self {
            Column::Name => Some(&record.name),
            Column::Nationality => Some(&record.nationality),
            Column::Gender => Some(&record.gender),
            Column::Ethnicity => record.ethnicity.as_deref(),
            Column::Museum => Some(&record.museum),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ============================================================================
// FREQUENCY
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Value → count, highest count first, first-seen order on ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
    /// Rows counted (missing values excluded), before any truncation
    pub total: usize,
}

impl FrequencyTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, value: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.value == value).map(|e| e.count)
    }

    /// Fraction of counted rows holding `value`
    pub fn share(&self, value: &str) -> f64 {
        match (self.get(value), self.total) {
            (Some(count), total) if total > 0 => count as f64 / total as f64,
            _ => 0.0,
        }
    }

    /// Drop entries counted fewer than `min_count` times
    pub fn at_least(&self, min_count: usize) -> FrequencyTable {
        FrequencyTable {
            column: self.column.clone(),
            entries: self
                .entries
                .iter()
                .filter(|e| e.count >= min_count)
                .cloned()
                .collect(),
            total: self.total,
        }
    }

    /// First `n` entries
    pub fn head(&self, n: usize) -> FrequencyTable {
        FrequencyTable {
            column: self.column.clone(),
            entries: self.entries.iter().take(n).cloned().collect(),
            total: self.total,
        }
    }
}

/// Count each distinct value of `column`, truncated to `top_n` if given.
pub fn frequency(table: &ArtistTable, column: Column, top_n: Option<usize>) -> FrequencyTable {
    frequency_by(column.header(), table.iter(), |r| column.value(r).map(str::to_string), top_n)
}

/// Frequency over an arbitrary key; `None` keys are skipped.
pub fn frequency_by<'a, I, F>(label: &str, records: I, key: F, top_n: Option<usize>) -> FrequencyTable
where
    I: IntoIterator<Item = &'a ArtistRecord>,
    F: Fn(&ArtistRecord) -> Option<String>,
{
    let mut entries: Vec<FrequencyEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut total = 0;

    for record in records {
        let Some(value) = key(record) else { continue };
        total += 1;
        match positions.get(&value) {
            Some(&i) => entries[i].count += 1,
            None => {
                positions.insert(value.clone(), entries.len());
                entries.push(FrequencyEntry { value, count: 1 });
            }
        }
    }

    // Stable: ties keep first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(n) = top_n {
        entries.truncate(n);
    }

    FrequencyTable {
        column: label.to_string(),
        entries,
        total,
    }
}

/// Continent counts; unmapped nationalities land in the "Unmapped" bucket
pub fn continent_frequency(table: &ArtistTable, map: &ContinentMap, top_n: Option<usize>) -> FrequencyTable {
    frequency_by(
        "Continent",
        table.iter(),
        |r| Some(map.bucket(&r.nationality).label().to_string()),
        top_n,
    )
}

/// Number of distinct non-missing values in `column`
pub fn distinct_count(table: &ArtistTable, column: Column) -> usize {
    table
        .iter()
        .filter_map(|r| column.value(r))
        .collect::<HashSet<&str>>()
        .len()
}

// ============================================================================
// PREDICATES
// ============================================================================

/// Row test used by the counting and grouping operations.
pub trait RowPredicate {
    fn test(&self, record: &ArtistRecord) -> bool;
}

impl<F> RowPredicate for F
where
    F: Fn(&ArtistRecord) -> bool,
{
    fn test(&self, record: &ArtistRecord) -> bool {
        self(record)
    }
}

/// Case-insensitive substring match of any needle in any column (logical OR).
/// Missing values never match. With no non-empty needle every row matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstringFilter {
    needles: Vec<String>,
    columns: Vec<Column>,
}

impl SubstringFilter {
    pub fn new(needle: &str, columns: &[Column]) -> Self {
        SubstringFilter {
            needles: Vec::new(),
            columns: columns.to_vec(),
        }
        .or_needle(needle)
    }

    /// Also match rows containing `needle`
    pub fn or_needle(mut self, needle: &str) -> Self {
        let needle = needle.trim().to_lowercase();
        if !needle.is_empty() && !self.needles.contains(&needle) {
            self.needles.push(needle);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.needles.is_empty()
    }

    pub fn needles(&self) -> &[String] {
        &self.needles
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

impl RowPredicate for SubstringFilter {
    fn test(&self, record: &ArtistRecord) -> bool {
        if self.needles.is_empty() {
            return true;
        }
        self.columns.iter().any(|column| {
            column.value(record).map_or(false, |value| {
                let value = value.to_lowercase();
                self.needles.iter().any(|needle| value.contains(needle.as_str()))
            })
        })
    }
}

/// Rows for which `predicate` holds
pub fn filtered_count<P: RowPredicate + ?Sized>(table: &ArtistTable, predicate: &P) -> usize {
    table.iter().filter(|r| predicate.test(r)).count()
}

/// The matching subset, in table order
pub fn filter_rows<'a, P: RowPredicate + ?Sized>(table: &'a ArtistTable, predicate: &P) -> Vec<&'a ArtistRecord> {
    table.iter().filter(|r| predicate.test(r)).collect()
}

// ============================================================================
// GROUPED PROPORTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketProportion<K = i32> {
    pub bucket: K,
    pub matched: usize,
    pub total: usize,
    /// matched / total, always within [0, 1]
    pub proportion: f64,
}

/// Partition rows by `bucket_fn` and report the matching fraction per bucket,
/// ascending by key. Rows whose key is `None` belong to no bucket.
pub fn grouped_proportion<K, B, P>(table: &ArtistTable, bucket_fn: B, predicate: &P) -> Vec<BucketProportion<K>>
where
    K: Ord,
    B: Fn(&ArtistRecord) -> Option<K>,
    P: RowPredicate + ?Sized,
{
    let mut groups: BTreeMap<K, (usize, usize)> = BTreeMap::new();

    for record in table.iter() {
        let Some(key) = bucket_fn(record) else { continue };
        let slot = groups.entry(key).or_insert((0, 0));
        slot.1 += 1;
        if predicate.test(record) {
            slot.0 += 1;
        }
    }

    groups
        .into_iter()
        .filter(|(_, (_, total))| *total > 0)
        .map(|(bucket, (matched, total))| BucketProportion {
            bucket,
            matched,
            total,
            proportion: matched as f64 / total as f64,
        })
        .collect()
}

/// floor(year / 10) * 10, for years at or after `MIN_VALID_YEAR`
pub fn decade_of(record: &ArtistRecord) -> Option<i32> {
    record
        .begin_date
        .filter(|year| *year >= MIN_VALID_YEAR)
        .map(|year| year.div_euclid(10) * 10)
}

/// Per-decade share of rows matching `predicate`
pub fn decade_trend<P: RowPredicate + ?Sized>(table: &ArtistTable, predicate: &P) -> Vec<BucketProportion<i32>> {
    grouped_proportion(table, decade_of, predicate)
}

// ============================================================================
// REPRESENTATION SPLIT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepresentationSplit {
    pub matched: usize,
    pub unmatched: usize,
    pub total: usize,
}

impl RepresentationSplit {
    pub fn matched_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.matched as f64 / self.total as f64
        }
    }

    pub fn unmatched_share(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.unmatched as f64 / self.total as f64
        }
    }
}

/// Matched vs. remaining rows for `predicate`
pub fn representation_split<P: RowPredicate + ?Sized>(table: &ArtistTable, predicate: &P) -> RepresentationSplit {
    let matched = filtered_count(table, predicate);
    RepresentationSplit {
        matched,
        unmatched: table.len() - matched,
        total: table.len(),
    }
}

// ============================================================================
// TESTS
// ============================================================================
