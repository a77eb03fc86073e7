// Museum Representation Dashboard - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod error;      // Load failures, one kind per cause
pub mod config;     // Dashboard settings (JSON, defaults)
pub mod dataset;    // Artist and word-frequency tables
pub mod cache;      // Memoized loads keyed by path
pub mod continents; // Nationality → continent rules
pub mod aggregate;  // Frequencies, filters, grouped proportions
pub mod present;    // Chart/table view models, highlight sets
pub mod pages;      // Page controllers
pub mod export;     // CSV download

// Re-export commonly used types
pub use error::LoadError;
pub use config::{DashboardConfig, RangeSetting, DEFAULT_HIGHLIGHT_WORDS};
pub use dataset::{
    ArtistRecord, ArtistTable, LoadOptions, LoadStats, WordFrequencyEntry, WordTable,
    load_artists, load_word_frequencies, UNKNOWN,
};
pub use cache::DatasetCache;
pub use continents::{Continent, ContinentMap, ContinentRule};
pub use aggregate::{
    BucketProportion, Column, FrequencyEntry, FrequencyTable, RepresentationSplit, RowPredicate,
    SubstringFilter,
    continent_frequency, decade_trend, distinct_count, filter_rows, filtered_count, frequency,
    grouped_proportion, representation_split,
};
pub use present::{
    ChartKind, ChartSeries, HighlightSet, TableView,
    format_percent, format_thousands, partition_highlighted, top_highlighted,
};
pub use pages::{Dashboard, Dataset, Metric, NoticeLevel, Page, PageParams, PageView, Section};
pub use export::{export_filtered, write_csv, write_words_csv, EXPORT_FILE_NAME};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
