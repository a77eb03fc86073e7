// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::path::PathBuf;

// Use library instead of local modules
use museum_representation::{
    export_filtered, write_words_csv, Column, Dashboard, DashboardConfig, Dataset, Page, PageParams, PageView,
    Section, SubstringFilter, EXPORT_FILE_NAME, VERSION,
};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("");

    // TUI owns the terminal, so only warnings reach stderr there
    let is_tui = command.is_empty() || command.starts_with("--");
    init_logging(if is_tui { "warn" } else { "info" });

    let config = load_config(&args)?;

    match command {
        "summary" => run_summary(config)?,
        "page" => run_page(config, &args)?,
        "export" => run_export(config, &args)?,
        "help" | "-h" | "--help" => print_usage(),
        _ if is_tui => run_ui_mode(config)?,
        other => {
            print_usage();
            bail!("Unknown command: {}", other);
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("🏛️  Museum Representation Dashboard v{}", VERSION);
    println!();
    println!("Usage:");
    println!("  museum-dash [--config <file>]                      Interactive dashboard (TUI)");
    println!("  museum-dash summary [--config <file>]              Dataset overview");
    println!("  museum-dash page <name> [--json] [--search <text>] [--words <n>] [--min <n>] [--no-highlights]");
    println!("  museum-dash export <dataset> [--search <text>] [--out <file>]");
    println!();
    println!("Pages:    {}", Page::ALL.iter().map(|p| p.slug()).collect::<Vec<_>>().join(", "));
    println!("Datasets: {}", Dataset::ALL.iter().map(|d| d.slug()).collect::<Vec<_>>().join(", "));
}

/// Value following `--name`, if present
fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn load_config(args: &[String]) -> Result<DashboardConfig> {
    match flag_value(args, "--config") {
        Some(path) => DashboardConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path)),
        None => Ok(DashboardConfig::default()),
    }
}

fn params_from_args(dashboard: &Dashboard, args: &[String]) -> Result<PageParams> {
    let mut params = dashboard.default_params();

    if let Some(words) = flag_value(args, "--words") {
        params.word_count = words.parse().with_context(|| format!("Invalid --words value: {}", words))?;
    }
    if let Some(min) = flag_value(args, "--min") {
        params.min_count = min.parse().with_context(|| format!("Invalid --min value: {}", min))?;
    }
    if let Some(search) = flag_value(args, "--search") {
        params.search = search.to_string();
    }
    if has_flag(args, "--no-highlights") {
        params.show_highlights = false;
    }

    Ok(params.clamped(&dashboard.config))
}

fn run_summary(config: DashboardConfig) -> Result<()> {
    println!("🏛️  Museum Representation Dashboard - Dataset Summary");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("📂 Data directory: {}", config.data_dir.display());

    let dashboard = Dashboard::new(config).context("Failed to build dashboard")?;
    println!("🗺️  Continent rules: {}", dashboard.continents.rule_count());
    println!("✨ Highlight words: {}", dashboard.highlight.len());

    for dataset in [Dataset::Combined, Dataset::SmallMuseums] {
        println!("\n📊 {}", dataset.title());
        match dashboard.artist_dataset(dataset) {
            Some(Ok(table)) => {
                println!("✓ {} rows from {}", table.len(), table.source_name());
                println!("  Columns: {}", table.columns.join(", "));
                println!("  Filled as Unknown: {}", table.stats.filled_unknown);
                println!("  Unusable BeginDate: {}", table.stats.coerced_dates);
                println!("  Fingerprint: {}", table.fingerprint);
            }
            Some(Err(err)) => println!("❌ {} ({})", err, err.kind()),
            None => {}
        }
    }

    println!("\n📝 {}", Dataset::WordFrequencies.title());
    match dashboard.words() {
        Ok(words) => {
            println!("✓ {} words", words.len());
            if let Some(top) = words.entries.first() {
                println!("  Most frequent: {} ({})", top.word, top.frequency);
            }
            println!("  Fingerprint: {}", words.fingerprint);
        }
        Err(err) => println!("❌ {} ({})", err, err.kind()),
    }

    Ok(())
}

fn run_page(config: DashboardConfig, args: &[String]) -> Result<()> {
    let name = args.get(2).context("Missing page name")?;
    let page = match Page::from_slug(name) {
        Some(page) => page,
        None => {
            print_usage();
            bail!("Unknown page: {}", name);
        }
    };

    let dashboard = Dashboard::new(config).context("Failed to build dashboard")?;
    let params = params_from_args(&dashboard, args)?;
    let view = dashboard.render(page, &params);

    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&view).context("Failed to serialise page")?);
    } else {
        print_view(&view);
    }

    Ok(())
}

fn print_view(view: &PageView) {
    println!("🏛️  {} - {}", view.page.title(), view.title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    for section in &view.sections {
        match section {
            Section::Notice { level, message } => println!("\n[{:?}] {}", level, message),
            Section::Metrics { items } => {
                println!();
                for metric in items {
                    match &metric.delta {
                        Some(delta) => println!("  {}: {} ({})", metric.label, metric.value, delta),
                        None => println!("  {}: {}", metric.label, metric.value),
                    }
                }
            }
            Section::Chart(chart) => {
                println!("\n📈 {}", chart.title);
                for (i, line) in chart.point_labels().iter().enumerate() {
                    let marker = if chart.highlighted.get(i).copied().unwrap_or(false) { "*" } else { " " };
                    println!("  {} {}", marker, line);
                }
            }
            Section::Table(table) => {
                println!("\n📋 {} ({} rows)", table.title, table.len());
                println!("  {}", table.headers.join(" | "));
                for row in &table.rows {
                    println!("  {}", row.join(" | "));
                }
            }
            Section::Text { heading, body } => {
                println!("\n{}", heading);
                for line in body {
                    println!("  • {}", line);
                }
            }
        }
    }
}

fn run_export(config: DashboardConfig, args: &[String]) -> Result<()> {
    let name = args.get(2).context("Missing dataset name")?;
    let dataset = Dataset::from_slug(name).with_context(|| format!("Unknown dataset: {}", name))?;
    let out = flag_value(args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
    let search = flag_value(args, "--search").unwrap_or("");

    println!("💾 Exporting {} → {}", dataset.title(), out.display());

    let dashboard = Dashboard::new(config).context("Failed to build dashboard")?;
    let rows = match dashboard.artist_dataset(dataset) {
        Some(table) => {
            let table = table.with_context(|| format!("Failed to load {}", dataset.title()))?;
            let filter = SubstringFilter::new(search, &[Column::Name, Column::Nationality]);
            let bytes = export_filtered(&table, &filter)?;
            fs::write(&out, bytes).with_context(|| format!("Failed to write {}", out.display()))?;
            museum_representation::filter_rows(&table, &filter).len()
        }
        None => {
            let words = dashboard.words().context("Failed to load word frequencies")?;
            let file = fs::File::create(&out).with_context(|| format!("Failed to create {}", out.display()))?;
            write_words_csv(&words, file)?
        }
    };

    println!("✓ Wrote {} rows", rows);
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: DashboardConfig) -> Result<()> {
    println!("🖥️  Loading Museum Representation Dashboard...\n");

    let dashboard = Dashboard::new(config).context("Failed to build dashboard")?;

    println!("Starting UI... (Press 'q' to quit)\n");

    let mut app = ui::App::new(dashboard);
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: DashboardConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use the API: cargo run --bin museum-server --features server");
    std::process::exit(1);
}
