// 📊 Presentation Adapter - aggregation results → chart series and table grids
// Pure transformations; nothing here can fail.

use crate::aggregate::{BucketProportion, FrequencyTable};
use crate::dataset::WordFrequencyEntry;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

// ============================================================================
// CHART SERIES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Pie,
    Line,
}

/// Labels + values ready for a chart widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Per-point emphasis; empty when the chart has none
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub highlighted: Vec<bool>,
}

impl ChartSeries {
    pub fn new(title: &str, kind: ChartKind, labels: Vec<String>, values: Vec<f64>) -> Self {
        ChartSeries {
            title: title.to_string(),
            kind,
            x_label: String::new(),
            y_label: String::new(),
            labels,
            values,
            highlighted: Vec::new(),
        }
    }

    pub fn with_axes(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn from_frequency(title: &str, kind: ChartKind, table: &FrequencyTable) -> Self {
        let (labels, values) = table
            .entries
            .iter()
            .map(|e| (e.value.clone(), e.count as f64))
            .unzip();
        ChartSeries::new(title, kind, labels, values)
    }

    /// Line series of decade → proportion
    pub fn from_proportions(title: &str, points: &[BucketProportion]) -> Self {
        let (labels, values) = points
            .iter()
            .map(|p| (p.bucket.to_string(), p.proportion))
            .unzip();
        ChartSeries::new(title, ChartKind::Line, labels, values).with_axes("Decade", "Proportion")
    }

    /// Bar series of words; emphasis flags only when highlighting is on
    pub fn from_words(title: &str, entries: &[WordFrequencyEntry], show_highlights: bool) -> Self {
        let labels = entries.iter().map(|e| e.word.clone()).collect();
        let values = entries.iter().map(|e| e.frequency as f64).collect();
        let mut series = ChartSeries::new(title, ChartKind::Bar, labels, values).with_axes("Words", "Frequency");
        if show_highlights {
            series.highlighted = entries.iter().map(|e| e.highlighted).collect();
        }
        series
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Each value's fraction of the series total (pie slices)
    pub fn shares(&self) -> Vec<f64> {
        let total: f64 = self.values.iter().sum();
        if total == 0.0 {
            return vec![0.0; self.values.len()];
        }
        self.values.iter().map(|v| v / total).collect()
    }

    /// "label: 1,234 (56.7%)" for every slice
    pub fn slice_labels(&self) -> Vec<String> {
        self.labels
            .iter()
            .zip(self.values.iter())
            .zip(self.shares())
            .map(|((label, value), share)| {
                format!("{}: {} ({})", label, format_thousands(*value as u64), format_percent(share, 1))
            })
            .collect()
    }

    /// One display line per point: shares for pies, counts for bars,
    /// percentages for proportion lines
    pub fn point_labels(&self) -> Vec<String> {
        match self.kind {
            ChartKind::Pie => self.slice_labels(),
            ChartKind::Bar | ChartKind::HorizontalBar => self
                .labels
                .iter()
                .zip(self.values.iter())
                .map(|(label, value)| format!("{}: {}", label, format_thousands(*value as u64)))
                .collect(),
            ChartKind::Line => self
                .labels
                .iter()
                .zip(self.values.iter())
                .map(|(label, value)| format!("{}: {}", label, format_percent(*value, 1)))
                .collect(),
        }
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// `0.6667, 2` → `"66.67%"`
pub fn format_percent(ratio: f64, precision: usize) -> String {
    format!("{:.*}%", precision, ratio * 100.0)
}

/// `1234567` → `"1,234,567"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ============================================================================
// HIGHLIGHTING
// ============================================================================

/// Fixed, case-insensitive vocabulary flagged for emphasis.
#[derive(Debug, Clone, Default)]
pub struct HighlightSet {
    words: Vec<String>,
    lookup: HashSet<String>,
}

impl HighlightSet {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = HighlightSet::default();
        for word in words {
            let key = word.as_ref().trim().to_lowercase();
            if !key.is_empty() && set.lookup.insert(key.clone()) {
                set.words.push(key);
            }
        }
        set
    }

    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(&word.trim().to_lowercase())
    }

    /// Tracked words in declaration order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct HighlightPartition<'a> {
    pub highlighted: Vec<&'a WordFrequencyEntry>,
    pub regular: Vec<&'a WordFrequencyEntry>,
}

/// Split entries by highlight membership, preserving order within each side
pub fn partition_highlighted<'a>(
    entries: &'a [WordFrequencyEntry],
    set: &HighlightSet,
) -> HighlightPartition<'a> {
    let (highlighted, regular) = entries.iter().partition(|e| set.contains(&e.word));
    HighlightPartition { highlighted, regular }
}

/// First highlighted entry in the given (frequency) order
pub fn top_highlighted<'a>(
    entries: &'a [WordFrequencyEntry],
    set: &HighlightSet,
) -> Option<&'a WordFrequencyEntry> {
    entries.iter().find(|e| set.contains(&e.word))
}

// ============================================================================
// TABLE VIEW
// ============================================================================

/// Sortable grid of display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    pub fn new(title: &str, headers: &[&str]) -> Self {
        TableView {
            title: title.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    /// Value/Count grid with thousands-grouped counts
    pub fn from_frequency(title: &str, value_header: &str, table: &FrequencyTable) -> Self {
        let mut view = TableView::new(title, &[value_header, "Count"]);
        for entry in &table.entries {
            view.push_row(vec![entry.value.clone(), format_thousands(entry.count as u64)]);
        }
        view
    }

    pub fn from_words(title: &str, entries: &[WordFrequencyEntry], show_highlights: bool) -> Self {
        let mut view = TableView::new(title, &["Words", "Frequency", "Highlighted"]);
        for entry in entries {
            let flag = if show_highlights && entry.highlighted { "yes" } else { "" };
            view.push_row(vec![entry.word.clone(), entry.frequency.to_string(), flag.to_string()]);
        }
        view
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable sort on one column; numeric when both cells read as numbers
    pub fn sort_by(&mut self, column: usize, descending: bool) {
        if column >= self.headers.len() {
            return;
        }
        self.rows.sort_by(|a, b| {
            let ord = compare_cells(
                a.get(column).map(String::as_str).unwrap_or(""),
                b.get(column).map(String::as_str).unwrap_or(""),
            );
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }
}

fn numeric_cell(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',' && *c != '%').collect();
    cleaned.trim().parse().ok()
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric_cell(a), numeric_cell(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

// ============================================================================
// TESTS
// ============================================================================
