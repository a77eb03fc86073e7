// 🖼️ Page Controllers - Loader → Aggregation → Presentation, one page at a time
//
// Each page is a pure function of (Dashboard, PageParams). A page whose dataset
// fails to load renders an error notice; the other pages are unaffected.

use crate::aggregate::{
    continent_frequency, decade_trend, distinct_count, filter_rows, frequency, representation_split,
    Column, SubstringFilter,
};
use crate::cache::DatasetCache;
use crate::config::DashboardConfig;
use crate::continents::ContinentMap;
use crate::dataset::{ArtistTable, LoadOptions, WordTable};
use crate::error::LoadError;
use crate::present::{
    format_percent, format_thousands, partition_highlighted, top_highlighted, ChartKind, ChartSeries,
    HighlightSet, TableView,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

// ============================================================================
// PAGES & DATASETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    LargeInstitutions,
    SmallInstitutions,
    MissionStatements,
    Framework,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::LargeInstitutions,
        Page::SmallInstitutions,
        Page::MissionStatements,
        Page::Framework,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::LargeInstitutions => "Large Institutions",
            Page::SmallInstitutions => "Small Institutions",
            Page::MissionStatements => "Mission Statements",
            Page::Framework => "Framework",
        }
    }

    /// URL / CLI name
    pub fn slug(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::LargeInstitutions => "large-institutions",
            Page::SmallInstitutions => "small-institutions",
            Page::MissionStatements => "mission-statements",
            Page::Framework => "framework",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Page> {
        Page::ALL.iter().copied().find(|p| p.slug() == slug)
    }

    pub fn next(&self) -> Self {
        let i = Page::ALL.iter().position(|p| p == self).unwrap_or(0);
        Page::ALL[(i + 1) % Page::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        let i = Page::ALL.iter().position(|p| p == self).unwrap_or(0);
        Page::ALL[(i + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dataset {
    Combined,
    SmallMuseums,
    WordFrequencies,
}

impl Dataset {
    pub const ALL: [Dataset; 3] = [Dataset::Combined, Dataset::SmallMuseums, Dataset::WordFrequencies];

    pub fn title(&self) -> &'static str {
        match self {
            Dataset::Combined => "Combined museum artists",
            Dataset::SmallMuseums => "Small museum artists",
            Dataset::WordFrequencies => "Mission statement words",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Dataset::Combined => "combined",
            Dataset::SmallMuseums => "small-museums",
            Dataset::WordFrequencies => "word-frequencies",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Dataset> {
        Dataset::ALL.iter().copied().find(|d| d.slug() == slug)
    }
}

// ============================================================================
// PARAMETERS
// ============================================================================

/// User-controlled display parameters (slider, number input, search box, toggle).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub word_count: usize,
    pub min_count: usize,
    pub search: String,
    pub show_highlights: bool,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams {
            word_count: 25,
            min_count: 1,
            search: String::new(),
            show_highlights: true,
        }
    }
}

impl PageParams {
    /// Pull values back inside the configured bounds
    pub fn clamped(&self, config: &DashboardConfig) -> PageParams {
        PageParams {
            word_count: config.word_count.clamp(self.word_count),
            min_count: self.min_count.max(1),
            search: self.search.trim().to_string(),
            show_highlights: self.show_highlights,
        }
    }
}

// ============================================================================
// PAGE VIEW
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: &str, value: impl Into<String>) -> Self {
        Metric {
            label: label.to_string(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Notice { level: NoticeLevel, message: String },
    Metrics { items: Vec<Metric> },
    Chart(ChartSeries),
    Table(TableView),
    Text { heading: String, body: Vec<String> },
}

impl Section {
    fn text(heading: &str, body: &[&str]) -> Self {
        Section::Text {
            heading: heading.to_string(),
            body: body.iter().map(|line| line.to_string()).collect(),
        }
    }

    fn notice(level: NoticeLevel, message: impl Into<String>) -> Self {
        Section::Notice {
            level,
            message: message.into(),
        }
    }
}

/// Everything a renderer needs to draw one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    pub sections: Vec<Section>,
}

impl PageView {
    fn new(page: Page, title: &str) -> Self {
        PageView {
            page,
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// A page reduced to the reason it could not be built
    pub fn failed(page: Page, err: &LoadError) -> Self {
        let mut view = PageView::new(page, page.title());
        view.push(Section::notice(
            NoticeLevel::Error,
            format!("Unable to load the dataset ({}): {}", err.kind(), err),
        ));
        view
    }

    pub fn is_error(&self) -> bool {
        self.sections
            .iter()
            .any(|s| matches!(s, Section::Notice { level: NoticeLevel::Error, .. }))
    }

    pub fn charts(&self) -> Vec<&ChartSeries> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Chart(chart) => Some(chart),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&TableView> {
        self.sections
            .iter()
            .filter_map(|s| match s {
                Section::Table(table) => Some(table),
                _ => None,
            })
            .collect()
    }

    pub fn metrics(&self) -> Vec<&Metric> {
        self.sections
            .iter()
            .flat_map(|s| match s {
                Section::Metrics { items } => items.iter().collect::<Vec<&Metric>>(),
                _ => Vec::new(),
            })
            .collect()
    }

    pub fn metric(&self, label: &str) -> Option<&Metric> {
        self.metrics().into_iter().find(|m| m.label == label)
    }
}

// ============================================================================
// DASHBOARD
// ============================================================================

/// Configuration, static lookup data and the memoized datasets.
#[derive(Debug)]
pub struct Dashboard {
    pub config: DashboardConfig,
    pub continents: ContinentMap,
    pub highlight: HighlightSet,
    cache: DatasetCache,
}

impl Dashboard {
    /// Build from configuration, reading the continent rule file if one is named
    pub fn new(config: DashboardConfig) -> Result<Self, LoadError> {
        let continents = match &config.continent_rules {
            Some(path) => ContinentMap::from_file(path)?,
            None => ContinentMap::default(),
        };
        let highlight = HighlightSet::new(&config.highlight_words);

        Ok(Dashboard {
            config,
            continents,
            highlight,
            cache: DatasetCache::new(),
        })
    }

    pub fn combined(&self) -> Result<Arc<ArtistTable>, LoadError> {
        self.cache.artists(&self.config.combined_path(), &LoadOptions::combined())
    }

    pub fn small_museums(&self) -> Result<Arc<ArtistTable>, LoadError> {
        self.cache
            .artists(&self.config.small_museum_path(), &LoadOptions::small_museums())
    }

    pub fn words(&self) -> Result<Arc<WordTable>, LoadError> {
        self.cache.words(&self.config.word_frequency_path(), &self.highlight)
    }

    /// Artist table behind an artist dataset; `None` for the word table
    pub fn artist_dataset(&self, dataset: Dataset) -> Option<Result<Arc<ArtistTable>, LoadError>> {
        match dataset {
            Dataset::Combined => Some(self.combined()),
            Dataset::SmallMuseums => Some(self.small_museums()),
            Dataset::WordFrequencies => None,
        }
    }

    /// Drop memoized tables so the next render re-reads storage
    pub fn reload(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    pub fn default_params(&self) -> PageParams {
        PageParams {
            word_count: self.config.word_count.default,
            min_count: self.config.default_min_count,
            ..PageParams::default()
        }
    }

    /// Build one page; load failures become an error view
    pub fn render(&self, page: Page, params: &PageParams) -> PageView {
        let params = params.clamped(&self.config);
        debug!(page = page.slug(), ?params, "rendering page");

        let result = match page {
            Page::Home => Ok(self.home_page()),
            Page::LargeInstitutions => self.large_institutions_page(),
            Page::SmallInstitutions => self.small_institutions_page(&params),
            Page::MissionStatements => self.mission_statements_page(&params),
            Page::Framework => Ok(framework_page()),
        };

        result.unwrap_or_else(|err| {
            error!(page = page.slug(), error = %err, "page failed to load its dataset");
            PageView::failed(page, &err)
        })
    }

    // ------------------------------------------------------------------------
    // Home
    // ------------------------------------------------------------------------

    fn home_page(&self) -> PageView {
        let mut view = PageView::new(Page::Home, "Museum Representation Dashboard");
        view.push(Section::text(
            "Welcome",
            &[
                "Are large art institutions walking the talk on inclusivity? This dashboard compares artist \
                 representation in a major collection with smaller museums and looks at the language of \
                 museum mission statements.",
            ],
        ));

        let mut items = Vec::new();
        for dataset in Dataset::ALL {
            let rows = match dataset {
                Dataset::WordFrequencies => self.words().map(|t| (t.len(), t.fingerprint.clone())),
                _ => match self.artist_dataset(dataset) {
                    Some(result) => result.map(|t| (t.len(), t.fingerprint.clone())),
                    None => continue,
                },
            };

            match rows {
                Ok((count, fingerprint)) => items.push(
                    Metric::new(dataset.title(), format_thousands(count as u64))
                        .with_delta(format!("sha256 {}", &fingerprint[..12.min(fingerprint.len())])),
                ),
                Err(err) => view.push(Section::notice(
                    NoticeLevel::Warning,
                    format!("{} unavailable: {}", dataset.title(), err),
                )),
            }
        }
        view.push(Section::Metrics { items });
        view
    }

    // ------------------------------------------------------------------------
    // Large Institutions
    // ------------------------------------------------------------------------

    fn large_institutions_page(&self) -> Result<PageView, LoadError> {
        let table = self.combined()?;
        let term = self.config.representation_term.as_str();
        let filter = SubstringFilter::new(term, &[Column::Ethnicity, Column::Nationality]);
        let mut view = PageView::new(Page::LargeInstitutions, "Museum Collections Analysis");
        view.push(Section::text(
            "Methodology",
            &[
                "Collection data from the Museum of Modern Art (MoMA) public GitHub repository",
                "Smaller museum data collected by hand at Western Washington University: currently \
                 displayed artists and their self-identified ethnicities",
                "MoMA data downloaded and preprocessed, with names and dates cleaned and standardised",
                "Both datasets merged with institutional attribution kept on every row",
                "Goal: examine artist diversity across institutions and compare major with smaller museums",
            ],
        ));

        // Nationality distribution
        let top = self.config.top_nationalities;
        let nationalities = frequency(&table, Column::Nationality, Some(top));
        view.push(Section::Chart(
            ChartSeries::from_frequency(
                &format!("Top {} Nationality Counts", top),
                ChartKind::HorizontalBar,
                &nationalities,
            )
            .with_axes("Count", "Nationality"),
        ));

        // Representation split
        let split = representation_split(&table, &filter);
        let other = format!("Non-{}", term);
        view.push(Section::Chart(ChartSeries::new(
            &format!("{} Representation in Museum Collections", term),
            ChartKind::Pie,
            vec![term.to_string(), other.clone()],
            vec![split.matched as f64, split.unmatched as f64],
        )));
        view.push(Section::Metrics {
            items: vec![
                Metric::new("Total Artists", format_thousands(split.total as u64)),
                Metric::new(&format!("{} Artists", term), format_thousands(split.matched as u64))
                    .with_delta(format_percent(split.matched_share(), 2)),
                Metric::new(&format!("{} Artists", other), format_thousands(split.unmatched as u64))
                    .with_delta(format_percent(split.unmatched_share(), 2)),
            ],
        });

        let top_table = self.config.top_nationalities_table;
        view.push(Section::Table(TableView::from_frequency(
            &format!("Top {} Nationalities", top_table),
            "Nationality",
            &frequency(&table, Column::Nationality, Some(top_table)),
        )));

        // Historical trend
        let trend = decade_trend(&table, &filter);
        if trend.is_empty() {
            view.push(Section::notice(NoticeLevel::Info, "No records carry a usable BeginDate."));
        } else {
            view.push(Section::Chart(ChartSeries::from_proportions(
                &format!("Proportion of {} Representation Over Time", term),
                &trend,
            )));

            let mut decades = TableView::new("Representation by Decade", &["Decade", "Artists", term, "Proportion"]);
            for point in &trend {
                decades.push_row(vec![
                    point.bucket.to_string(),
                    format_thousands(point.total as u64),
                    format_thousands(point.matched as u64),
                    format_percent(point.proportion, 1),
                ]);
            }
            view.push(Section::Table(decades));
        }

        Ok(view)
    }

    // ------------------------------------------------------------------------
    // Small Institutions
    // ------------------------------------------------------------------------

    fn small_institutions_page(&self, params: &PageParams) -> Result<PageView, LoadError> {
        let table = self.small_museums()?;
        let mut view = PageView::new(Page::SmallInstitutions, "Museum Artists Demographics");

        view.push(Section::Metrics {
            items: vec![
                Metric::new("Total Artists", format_thousands(table.len() as u64)),
                Metric::new(
                    "Museums Represented",
                    distinct_count(&table, Column::Museum).to_string(),
                ),
                Metric::new(
                    "Nationalities",
                    distinct_count(&table, Column::Nationality).to_string(),
                ),
            ],
        });

        // Nationality: pie honours the minimum count, table shows everything
        let nationalities = frequency(&table, Column::Nationality, None);
        let shown = nationalities.at_least(params.min_count);
        view.push(Section::Chart(ChartSeries::from_frequency(
            "Artist Nationality Distribution",
            ChartKind::Pie,
            &shown,
        )));
        view.push(Section::Table(TableView::from_frequency(
            "Nationality Data",
            "Nationality",
            &nationalities,
        )));

        let genders = frequency(&table, Column::Gender, None);
        view.push(Section::Chart(ChartSeries::from_frequency(
            "Artist Gender Distribution",
            ChartKind::Pie,
            &genders,
        )));
        view.push(Section::Table(TableView::from_frequency("Gender Data", "Gender", &genders)));

        let continents = continent_frequency(&table, &self.continents, None);
        view.push(Section::Chart(ChartSeries::from_frequency(
            "Artist Distribution by Continent",
            ChartKind::Pie,
            &continents,
        )));
        view.push(Section::Table(TableView::from_frequency(
            "Continental Data",
            "Continent",
            &continents,
        )));

        // Raw data, searchable by name or nationality
        let search = SubstringFilter::new(&params.search, &[Column::Name, Column::Nationality]);
        let rows = filter_rows(&table, &search);
        let headers: Vec<&str> = table.columns.iter().map(String::as_str).collect();
        let mut raw = TableView::new("Raw Data", &headers);
        for record in &rows {
            raw.push_row(record.cells().to_vec());
        }
        if !search.is_empty() {
            view.push(Section::Metrics {
                items: vec![Metric::new("Matching Artists", format_thousands(rows.len() as u64))
                    .with_delta(format!("search \"{}\"", params.search))],
            });
        }
        view.push(Section::Table(raw));

        Ok(view)
    }

    // ------------------------------------------------------------------------
    // Mission Statements
    // ------------------------------------------------------------------------

    fn mission_statements_page(&self, params: &PageParams) -> Result<PageView, LoadError> {
        let words = self.words()?;
        let mut view = PageView::new(Page::MissionStatements, "Mission Statement Analysis");

        if params.show_highlights {
            view.push(Section::notice(
                NoticeLevel::Info,
                format!("Highlighted words: {}", self.highlight.words().join(", ")),
            ));
        }

        view.push(Section::Chart(ChartSeries::from_words(
            "Distribution of Most Common Words in Mission Statements",
            words.top(params.word_count),
            params.show_highlights,
        )));

        let matches = words.search(&params.search);
        view.push(Section::Table(TableView::from_words(
            "Word Frequency Data",
            &matches,
            params.show_highlights,
        )));

        // Quick statistics are independent of the highlight toggle
        let partition = partition_highlighted(&words.entries, &self.highlight);
        let top = match top_highlighted(&words.entries, &self.highlight) {
            Some(entry) => Metric::new("Top Highlighted Word", entry.word.clone())
                .with_delta(format!("Frequency: {}", entry.frequency)),
            None => Metric::new("Top Highlighted Word", "None found").with_delta("No highlighted words in data"),
        };
        view.push(Section::Metrics {
            items: vec![
                Metric::new("Words That Occur Three or More Times", words.len().to_string()),
                Metric::new("Highlighted Words Found", partition.highlighted.len().to_string())
                    .with_delta(format!("out of {} tracked", self.highlight.len())),
                top,
            ],
        });

        view.push(Section::text(
            "Research Findings",
            &[
                "81 museum mission statements analysed",
                "Most frequent terms: american, cultural, world, community, global",
                "Second tier, under 10 mentions each: diverse, diversity, african, equity",
                "Only about 10% of statements use language that explicitly supports diversity claims",
                "Sentiment (TextBlob, -1 to +1): average 0.1778, minimum -0.2, maximum 0.8",
                "Tone is neutral with a slight positive lean",
            ],
        ));

        Ok(view)
    }
}

// ----------------------------------------------------------------------------
// Framework
// ----------------------------------------------------------------------------

fn framework_page() -> PageView {
    let mut view = PageView::new(Page::Framework, "Museum Diversity Transparency Framework");
    view.push(Section::text(
        "Data Collection & Metrics",
        &[
            "Track and publish the racial, ethnic and geographic background of collected artists",
            "Record annual acquisition demographics and purchasing budgets for artists of color",
            "Monitor solo and group exhibition representation, placement and duration",
        ],
    ));
    view.push(Section::text(
        "Reporting & Goal Setting",
        &[
            "Annual diversity reports, quarterly updates and public-facing databases",
            "Specific, timeline-based diversity targets with external review",
        ],
    ));
    view.push(Section::text(
        "Community Engagement & Implementation",
        &[
            "Community advisory boards, public comment periods and educational partnerships",
            "Diversity database, tracking software, staff training and dedicated budget",
        ],
    ));
    view.push(Section::text(
        "Measurement & Continuous Improvement",
        &[
            "Key performance indicators, benchmark comparisons and visitor demographics",
            "Annual framework review, metric updates and shared case studies",
        ],
    ));
    view.push(Section::text(
        "Getting Started",
        &[
            "1. Assess current data collection capabilities",
            "2. Establish baseline metrics",
            "3. Set initial goals",
            "4. Engage with community stakeholders",
        ],
    ));
    view
}

// ============================================================================
// TESTS
// ============================================================================
