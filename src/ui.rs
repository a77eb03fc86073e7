use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use museum_representation::{
    export_filtered, ChartKind, ChartSeries, Column, Dashboard, Metric, NoticeLevel, Page, PageParams, PageView,
    Section, SubstringFilter, TableView, EXPORT_FILE_NAME,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
        Wrap,
    },
    Frame, Terminal,
};
use std::fs;
use std::io;
use tracing::{info, warn};

/// Rows drawn per table before the remainder is summarised in the title
const TABLE_ROWS: usize = 15;
/// Widest vertical bar, in columns
const MAX_BAR_WIDTH: u16 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    pub dashboard: Dashboard,
    pub params: PageParams,
    pub current_page: Page,
    pub view: PageView,
    /// Index of the first section drawn
    pub offset: usize,
    pub input_mode: InputMode,
    pub search_buffer: String,
    /// Column every table on the page is sorted by, descending
    pub sort_column: Option<usize>,
    pub status: Option<String>,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let params = dashboard.default_params();
        let view = dashboard.render(Page::Home, &params);

        Self {
            dashboard,
            params,
            current_page: Page::Home,
            view,
            offset: 0,
            input_mode: InputMode::Normal,
            search_buffer: String::new(),
            sort_column: None,
            status: None,
        }
    }

    /// Re-render the current page with the current parameters
    pub fn refresh(&mut self) {
        self.params = self.params.clamped(&self.dashboard.config);
        self.view = self.dashboard.render(self.current_page, &self.params);
        if let Some(column) = self.sort_column {
            for section in &mut self.view.sections {
                if let Section::Table(table) = section {
                    table.sort_by(column, true);
                }
            }
        }
        self.offset = self.offset.min(self.view.sections.len().saturating_sub(1));
    }

    /// Bars drawn per chart: the whole word slider range, or the nationality top-N if larger
    pub fn chart_bar_limit(&self) -> usize {
        let config = &self.dashboard.config;
        config.word_count.max.max(config.top_nationalities)
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.offset = 0;
        self.refresh();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.offset = 0;
        self.refresh();
    }

    pub fn next(&mut self) {
        if self.offset + 1 < self.view.sections.len() {
            self.offset += 1;
        }
    }

    pub fn previous(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn adjust_word_count(&mut self, delta: isize) {
        self.params.word_count = self.params.word_count.saturating_add_signed(delta);
        self.refresh();
    }

    pub fn adjust_min_count(&mut self, delta: isize) {
        self.params.min_count = self.params.min_count.saturating_add_signed(delta);
        self.refresh();
    }

    pub fn toggle_highlights(&mut self) {
        self.params.show_highlights = !self.params.show_highlights;
        self.refresh();
    }

    /// Cycle the sort column: none → 0 → 1 → ... → none
    pub fn cycle_sort(&mut self) {
        let widest = self
            .view
            .tables()
            .iter()
            .map(|t| t.headers.len())
            .max()
            .unwrap_or(0);
        self.sort_column = match self.sort_column {
            None if widest > 0 => Some(0),
            Some(c) if c + 1 < widest => Some(c + 1),
            _ => None,
        };
        self.refresh();
    }

    pub fn reload(&mut self) {
        self.dashboard.reload();
        self.status = Some("Datasets reloaded".to_string());
        info!("datasets reloaded from the TUI");
        self.refresh();
    }

    /// Write the artist rows behind the current page (search applied) to disk
    pub fn export(&mut self) {
        let table = match self.current_page {
            Page::LargeInstitutions => self.dashboard.combined(),
            Page::SmallInstitutions => self.dashboard.small_museums(),
            _ => {
                self.status = Some("Nothing to export on this page".to_string());
                return;
            }
        };

        let filter = SubstringFilter::new(&self.params.search, &[Column::Name, Column::Nationality]);
        let result = table
            .map_err(anyhow::Error::from)
            .and_then(|table| export_filtered(&table, &filter))
            .and_then(|bytes| fs::write(EXPORT_FILE_NAME, bytes).map_err(anyhow::Error::from));

        self.status = Some(match result {
            Ok(()) => format!("Exported to {}", EXPORT_FILE_NAME),
            Err(err) => {
                warn!(error = %err, "export failed");
                format!("Export failed: {}", err)
            }
        });
    }

    /// Apply one key press; returns `true` when the app should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match self.input_mode {
            InputMode::Search => {
                match key.code {
                    KeyCode::Enter => {
                        self.params.search = self.search_buffer.clone();
                        self.input_mode = InputMode::Normal;
                        self.refresh();
                    }
                    KeyCode::Esc => {
                        self.search_buffer.clear();
                        self.params.search.clear();
                        self.input_mode = InputMode::Normal;
                        self.refresh();
                    }
                    KeyCode::Backspace => {
                        self.search_buffer.pop();
                    }
                    KeyCode::Char(c) => self.search_buffer.push(c),
                    _ => {}
                }
                false
            }
            InputMode::Normal => {
                self.status = None;
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return true,
                    KeyCode::Tab => {
                        if key.modifiers.contains(KeyModifiers::SHIFT) {
                            self.previous_page();
                        } else {
                            self.next_page();
                        }
                    }
                    KeyCode::BackTab => self.previous_page(),
                    KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_word_count(1),
                    KeyCode::Char('-') => self.adjust_word_count(-1),
                    KeyCode::Char(']') => self.adjust_min_count(1),
                    KeyCode::Char('[') => self.adjust_min_count(-1),
                    KeyCode::Char('h') => self.toggle_highlights(),
                    KeyCode::Char('s') => self.cycle_sort(),
                    KeyCode::Char('r') => self.reload(),
                    KeyCode::Char('e') => self.export(),
                    KeyCode::Char('/') => {
                        self.search_buffer = self.params.search.clone();
                        self.input_mode = InputMode::Search;
                    }
                    KeyCode::Down | KeyCode::Char('j') => self.next(),
                    KeyCode::Up | KeyCode::Char('k') => self.previous(),
                    KeyCode::Home => self.offset = 0,
                    _ => {}
                }
                false
            }
        }
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Page sections
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_sections(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(format!(" {} ", app.view.title)),
    );

    f.render_widget(header, area);
}

/// Height a section wants, borders included
fn section_height(section: &Section, bar_limit: usize) -> u16 {
    let rows = match section {
        Section::Notice { .. } => 1,
        Section::Metrics { items } => {
            if items.iter().any(|m| m.delta.is_some()) {
                2
            } else {
                1
            }
        }
        Section::Chart(chart) => match chart.kind {
            ChartKind::Line => 12,
            ChartKind::Bar => 10,
            ChartKind::HorizontalBar | ChartKind::Pie => chart.len().min(bar_limit),
        },
        Section::Table(table) => table.len().min(TABLE_ROWS) + 1,
        Section::Text { body, .. } => body.len(),
    };
    (rows.max(1) + 2) as u16
}

fn render_sections(f: &mut Frame, area: Rect, app: &App) {
    let bar_limit = app.chart_bar_limit();
    let mut constraints = Vec::new();
    let mut visible = Vec::new();
    let mut used: u16 = 0;

    for section in app.view.sections.iter().skip(app.offset) {
        if used >= area.height {
            break;
        }
        let height = section_height(section, bar_limit);
        constraints.push(Constraint::Length(height));
        visible.push(section);
        used = used.saturating_add(height);
    }
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (section, chunk) in visible.into_iter().zip(chunks.iter()) {
        match section {
            Section::Notice { level, message } => render_notice(f, *chunk, *level, message),
            Section::Metrics { items } => render_metrics(f, *chunk, items),
            Section::Chart(chart) => render_chart(f, *chunk, chart, bar_limit),
            Section::Table(table) => render_table(f, *chunk, table),
            Section::Text { heading, body } => render_text(f, *chunk, heading, body),
        }
    }
}

fn render_notice(f: &mut Frame, area: Rect, level: NoticeLevel, message: &str) {
    let (label, color) = match level {
        NoticeLevel::Info => ("ℹ", Color::Cyan),
        NoticeLevel::Warning => ("⚠", Color::Yellow),
        NoticeLevel::Error => ("✗", Color::Red),
    };

    let notice = Paragraph::new(Line::from(vec![
        Span::styled(format!("{} ", label), Style::default().fg(color).add_modifier(Modifier::BOLD)),
        Span::raw(message.to_string()),
    ]))
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));

    f.render_widget(notice, area);
}

fn render_metrics(f: &mut Frame, area: Rect, items: &[Metric]) {
    if items.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = items
        .iter()
        .map(|_| Constraint::Ratio(1, items.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (metric, chunk) in items.iter().zip(chunks.iter()) {
        let mut lines = vec![Line::from(Span::styled(
            metric.value.clone(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))];
        if let Some(delta) = &metric.delta {
            lines.push(Line::from(Span::styled(delta.clone(), Style::default().fg(Color::Green))));
        }

        let card = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" {} ", metric.label)),
        );
        f.render_widget(card, *chunk);
    }
}

fn render_chart(f: &mut Frame, area: Rect, chart: &ChartSeries, bar_limit: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(format!(" {} ", chart.title));

    if chart.is_empty() {
        f.render_widget(Paragraph::new("No data").block(block), area);
        return;
    }

    match chart.kind {
        ChartKind::Line => render_line_chart(f, area, chart, block),
        ChartKind::Bar => render_bar_chart(f, area, chart, block, Direction::Vertical, bar_limit),
        ChartKind::HorizontalBar => render_bar_chart(f, area, chart, block, Direction::Horizontal, bar_limit),
        ChartKind::Pie => render_pie(f, area, chart, block, bar_limit),
    }
}

fn bar_style(chart: &ChartSeries, index: usize) -> Style {
    if chart.highlighted.get(index).copied().unwrap_or(false) {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::LightBlue)
    }
}

/// Column width that fits `bars` vertical bars, one-column gaps included, inside a bordered `area`
fn vertical_bar_width(area: Rect, bars: usize) -> u16 {
    let inner = area.width.saturating_sub(2);
    let bars = u16::try_from(bars.max(1)).unwrap_or(u16::MAX);
    ((inner + 1) / bars).saturating_sub(1).clamp(1, MAX_BAR_WIDTH)
}

fn render_bar_chart(
    f: &mut Frame,
    area: Rect,
    chart: &ChartSeries,
    block: Block,
    direction: Direction,
    bar_limit: usize,
) {
    let bars: Vec<Bar> = chart
        .labels
        .iter()
        .zip(chart.values.iter())
        .take(bar_limit)
        .enumerate()
        .map(|(i, (label, value))| {
            Bar::default()
                .label(Line::from(truncate(label, 18)))
                .value(*value as u64)
                .style(bar_style(chart, i))
        })
        .collect();

    let widget = BarChart::default()
        .block(block)
        .direction(direction)
        .bar_width(if direction == Direction::Horizontal {
            1
        } else {
            vertical_bar_width(area, bars.len())
        })
        .bar_gap(if direction == Direction::Horizontal { 0 } else { 1 })
        .data(BarGroup::default().bars(&bars));

    f.render_widget(widget, area);
}

/// Terminal stand-in for a pie: one horizontal bar per slice, labelled with its share
fn render_pie(f: &mut Frame, area: Rect, chart: &ChartSeries, block: Block, bar_limit: usize) {
    let labels = chart.slice_labels();
    let shares = chart.shares();
    let bars: Vec<Bar> = labels
        .iter()
        .zip(shares.iter())
        .take(bar_limit)
        .enumerate()
        .map(|(i, (label, share))| {
            Bar::default()
                .value((share * 1000.0).round() as u64)
                .text_value(label.clone())
                .style(bar_style(chart, i))
        })
        .collect();

    let widget = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(widget, area);
}

fn render_line_chart(f: &mut Frame, area: Rect, chart: &ChartSeries, block: Block) {
    let points: Vec<(f64, f64)> = chart
        .labels
        .iter()
        .zip(chart.values.iter())
        .filter_map(|(label, value)| label.parse::<f64>().ok().map(|x| (x, *value)))
        .collect();

    let x_min = points.first().map(|p| p.0).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.0).unwrap_or(1.0).max(x_min + 1.0);
    let y_max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max).max(0.01);

    let datasets = vec![Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Yellow))
        .data(&points)];

    let widget = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(chart.x_label.clone())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::raw(format!("{}", x_min as i64)),
                    Span::raw(format!("{}", x_max as i64)),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(chart.y_label.clone())
                .bounds([0.0, y_max])
                .labels(vec![Span::raw("0"), Span::raw(format!("{:.2}", y_max))]),
        );

    f.render_widget(widget, area);
}

fn render_table(f: &mut Frame, area: Rect, table: &TableView) {
    let header_cells = table.headers.iter().map(|h| {
        Cell::from(h.clone()).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    });
    let header = Row::new(header_cells).style(Style::default().bg(Color::DarkGray)).height(1);

    let rows = table.rows.iter().take(TABLE_ROWS).map(|row| {
        let cells = row.iter().map(|cell| Cell::from(truncate(cell, 30)));
        Row::new(cells).height(1)
    });

    let widths: Vec<Constraint> = table
        .headers
        .iter()
        .map(|_| Constraint::Ratio(1, table.headers.len().max(1) as u32))
        .collect();

    let title = if table.len() > TABLE_ROWS {
        format!(" {} ({} of {} rows) ", table.title, TABLE_ROWS, table.len())
    } else {
        format!(" {} ", table.title)
    };

    let widget = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(title),
    );

    f.render_widget(widget, area);
}

fn render_text(f: &mut Frame, area: Rect, heading: &str, body: &[String]) {
    let lines: Vec<Line> = body.iter().map(|l| Line::from(format!("• {}", l))).collect();
    let text = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ", heading)),
    );
    f.render_widget(text, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![Span::styled(
        format!(" Section: {}/{} ", app.offset + 1, app.view.sections.len()),
        Style::default().fg(Color::Cyan),
    )];

    if app.input_mode == InputMode::Search {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Search: {}▏", app.search_buffer),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" (Enter apply, Esc clear)"));
    } else {
        if !app.params.search.is_empty() {
            status_spans.push(Span::raw(" | "));
            status_spans.push(Span::styled(
                format!("Search: {}", app.params.search),
                Style::default().fg(Color::Green),
            ));
        }
        status_spans.push(Span::raw(format!(
            " | Words {} | Min {} | Highlights {} | ",
            app.params.word_count,
            app.params.min_count,
            if app.params.show_highlights { "on" } else { "off" }
        )));
        if let Some(message) = &app.status {
            status_spans.push(Span::styled(message.clone(), Style::default().fg(Color::Magenta)));
            status_spans.push(Span::raw(" | "));
        }
        status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Page | "));
        status_spans.push(Span::styled("+/-", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Words | "));
        status_spans.push(Span::styled("[/]", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Min | "));
        status_spans.push(Span::styled("/", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Search | "));
        status_spans.push(Span::styled("h s r e", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_representation::DashboardConfig;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let dashboard = Dashboard::new(DashboardConfig::with_data_dir("no/such/dir")).unwrap();
        App::new(dashboard)
    }

    #[test]
    fn test_tab_cycles_pages() {
        let mut app = app();

        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.current_page, Page::LargeInstitutions);
        assert!(app.view.is_error());

        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.current_page, Page::Framework);
        assert!(!app.view.is_error());
    }

    #[test]
    fn test_word_count_stays_in_range() {
        let mut app = app();
        for _ in 0..40 {
            app.handle_key(key(KeyCode::Char('+')));
        }
        assert_eq!(app.params.word_count, 50);

        for _ in 0..60 {
            app.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(app.params.word_count, 5);
    }

    #[test]
    fn test_search_mode_applies_on_enter() {
        let mut app = app();

        app.handle_key(key(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Search);
        for c in "kenx".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Backspace));
        // 'q' is text while searching
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.params.search, "kenq");
        assert!(app.handle_key(key(KeyCode::Char('q'))));
    }

    #[test]
    fn test_word_chart_draws_every_bar() {
        let app = app();
        let limit = app.chart_bar_limit();
        assert_eq!(limit, 50);

        let labels: Vec<String> = (0..25).map(|i| format!("w{}", i)).collect();
        let values: Vec<f64> = (0..25).map(|i| (60 - i) as f64).collect();
        let chart = ChartSeries::new("Top words", ChartKind::Bar, labels, values);

        let mut terminal = Terminal::new(TestBackend::new(120, 12)).unwrap();
        terminal.draw(|f| render_chart(f, f.size(), &chart, limit)).unwrap();

        let drawn: String = terminal.backend().buffer().content.iter().map(|c| c.symbol()).collect();
        assert!(drawn.contains("w0"));
        assert!(drawn.contains("w24"));
    }

    #[test]
    fn test_section_height_follows_bar_limit() {
        let labels: Vec<String> = (0..30).map(|i| format!("n{}", i)).collect();
        let chart = ChartSeries::new("Nationalities", ChartKind::HorizontalBar, labels, vec![1.0; 30]);
        let section = Section::Chart(chart);

        assert_eq!(section_height(&section, 50), 32);
        assert_eq!(section_height(&section, 10), 12);
    }

    #[test]
    fn test_vertical_bar_width_fits_area() {
        let area = Rect::new(0, 0, 120, 12);
        assert_eq!(vertical_bar_width(area, 25), 3);
        assert_eq!(vertical_bar_width(area, 50), 1);
        assert_eq!(vertical_bar_width(area, 5), MAX_BAR_WIDTH);
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Côte d'Ivoire", 20), "Côte d'Ivoire");
        assert_eq!(truncate("Multinational/Other", 10), "Multina...");
    }
}
