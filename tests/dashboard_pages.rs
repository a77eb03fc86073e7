// End-to-end page assembly over fixture files written into a temp directory.

use museum_representation::{
    export_filtered, ChartKind, Column, Dashboard, DashboardConfig, LoadError, Page, PageParams, PageView, Section,
    SubstringFilter,
};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const COMBINED: &str = "\
DisplayName,Nationality,Gender,Ethnicity,Museum,BeginDate
El Anatsui,Ghanaian,Male,African,MoMA,1944
Kerry James Marshall,American,Male,African American,MoMA,1955
Andy Warhol,American,Male,,MoMA,1928
Wangechi Mutu,Kenyan,Female,,Frye,1972.0
Yayoi Kusama,Japanese,Female,Asian,MoMA,1929
Unknown Maker,,,,MoMA,n.d.
";

const SMALL: &str = "\
Small Museum Data,,,,
Alma Thomas,American,Female,Frye,TRUE
Romare Bearden, American ,Male,Frye,TRUE
El Anatsui,Ghanaian,Male,Bainbridge,TRUE
Zanele Muholi,South African,,Bainbridge,TRUE
Mystery,Atlantean,Female,Frye,TRUE
";

const WORDS: &str = "\
Words,Frequency
art,40
community,15
 Diversity ,15
world,12
culture,9
";

fn write_fixtures(dir: &Path) {
    fs::write(dir.join("combinedSmallandLargeFinal.csv"), COMBINED).unwrap();
    fs::write(dir.join("Small Museum Data - Sheet1 (1).csv"), SMALL).unwrap();
    fs::write(dir.join("Mission_Statement_Word_Freq.csv"), WORDS).unwrap();
}

fn dashboard() -> (TempDir, Dashboard) {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let dashboard = Dashboard::new(DashboardConfig::with_data_dir(dir.path())).unwrap();
    (dir, dashboard)
}

fn metric_value(view: &PageView, label: &str) -> String {
    view.metric(label)
        .unwrap_or_else(|| panic!("missing metric {}", label))
        .value
        .clone()
}

fn text_body<'a>(view: &'a PageView, heading: &str) -> &'a [String] {
    view.sections
        .iter()
        .find_map(|section| match section {
            Section::Text { heading: h, body } if h == heading => Some(body.as_slice()),
            _ => None,
        })
        .unwrap_or_else(|| panic!("missing text section {}", heading))
}

#[test]
fn test_home_lists_every_dataset() {
    let (_dir, dashboard) = dashboard();
    let view = dashboard.render(Page::Home, &PageParams::default());

    assert!(!view.is_error());
    assert_eq!(metric_value(&view, "Combined museum artists"), "6");
    assert_eq!(metric_value(&view, "Small museum artists"), "5");
    assert_eq!(metric_value(&view, "Mission statement words"), "5");
}

#[test]
fn test_large_institutions_page() {
    let (_dir, dashboard) = dashboard();
    let view = dashboard.render(Page::LargeInstitutions, &PageParams::default());
    assert!(!view.is_error());

    let charts = view.charts();
    let nationalities = charts[0];
    assert_eq!(nationalities.kind, ChartKind::HorizontalBar);
    assert_eq!(
        nationalities.labels,
        vec!["American", "Ghanaian", "Kenyan", "Japanese", "Unknown"]
    );
    assert_eq!(nationalities.values[0], 2.0);

    // Ethnicity "African" or "African American"; Kenyan nationality alone does not match
    let split = charts[1];
    assert_eq!(split.kind, ChartKind::Pie);
    assert_eq!(split.values, vec![2.0, 4.0]);
    assert_eq!(metric_value(&view, "Total Artists"), "6");
    assert_eq!(metric_value(&view, "African Artists"), "2");
    assert_eq!(
        view.metric("African Artists").unwrap().delta.as_deref(),
        Some("33.33%")
    );

    let trend = charts[2];
    assert_eq!(trend.kind, ChartKind::Line);
    assert_eq!(trend.labels, vec!["1920", "1940", "1950", "1970"]);
    assert_eq!(trend.values, vec![0.0, 1.0, 1.0, 0.0]);
    assert!(trend.values.iter().all(|p| (0.0..=1.0).contains(p)));

    let methodology = text_body(&view, "Methodology");
    assert!(methodology.iter().any(|line| line.contains("MoMA")));
    assert!(methodology.iter().any(|line| line.contains("Western Washington University")));
}

#[test]
fn test_small_institutions_page() {
    let (_dir, dashboard) = dashboard();
    let params = PageParams {
        min_count: 2,
        ..PageParams::default()
    };
    let view = dashboard.render(Page::SmallInstitutions, &params);
    assert!(!view.is_error());

    assert_eq!(metric_value(&view, "Total Artists"), "5");
    assert_eq!(metric_value(&view, "Museums Represented"), "2");
    assert_eq!(metric_value(&view, "Nationalities"), "4");

    let charts = view.charts();
    // Pie honours the minimum count; the table beside it does not
    assert_eq!(charts[0].labels, vec!["American"]);
    let tables = view.tables();
    assert_eq!(tables[0].len(), 4);

    assert_eq!(charts[1].labels, vec!["Female", "Male", "Unknown"]);
    assert_eq!(charts[2].labels, vec!["North America", "Africa", "Unmapped"]);
    assert_eq!(charts[2].values, vec![2.0, 2.0, 1.0]);

    let raw = tables.last().unwrap();
    assert_eq!(raw.headers, vec!["Name", "Nationality", "Gender", "Museum", "SmallMuseum"]);
    assert_eq!(raw.len(), 5);
    assert_eq!(raw.rows[1][1], "American");
}

#[test]
fn test_small_institutions_search() {
    let (_dir, dashboard) = dashboard();
    let params = PageParams {
        search: "AFRICAN".to_string(),
        ..PageParams::default()
    };
    let view = dashboard.render(Page::SmallInstitutions, &params);

    let raw = view.tables().last().copied().unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw.rows[0][0], "Zanele Muholi");
    assert_eq!(metric_value(&view, "Matching Artists"), "1");
}

#[test]
fn test_mission_statements_page() {
    let (_dir, dashboard) = dashboard();
    let params = PageParams {
        word_count: 2,
        ..PageParams::default()
    };
    let view = dashboard.render(Page::MissionStatements, &params);
    assert!(!view.is_error());

    // Below the slider minimum: clamped up to 5
    let chart = view.charts()[0];
    assert_eq!(chart.labels, vec!["art", "community", "Diversity", "world", "culture"]);
    assert_eq!(chart.highlighted, vec![false, true, true, false, true]);

    assert_eq!(metric_value(&view, "Words That Occur Three or More Times"), "5");
    let found = view.metric("Highlighted Words Found").unwrap();
    assert_eq!(found.value, "3");
    assert_eq!(found.delta.as_deref(), Some("out of 16 tracked"));
    let top = view.metric("Top Highlighted Word").unwrap();
    assert_eq!(top.value, "community");
    assert_eq!(top.delta.as_deref(), Some("Frequency: 15"));

    let findings = text_body(&view, "Research Findings");
    assert!(findings.iter().any(|line| line.starts_with("81 ")));
    assert!(findings.iter().any(|line| line.contains("0.1778")));
    assert!(findings.iter().any(|line| line.contains("10%")));
}

#[test]
fn test_mission_statements_search_and_toggle() {
    let (_dir, dashboard) = dashboard();
    let params = PageParams {
        search: "CULT".to_string(),
        show_highlights: false,
        ..PageParams::default()
    };
    let view = dashboard.render(Page::MissionStatements, &params);

    assert!(view.charts()[0].highlighted.is_empty());
    let table = view.tables()[0];
    assert_eq!(table.rows, vec![vec!["culture".to_string(), "9".to_string(), String::new()]]);

    // Quick stats do not depend on the toggle
    assert_eq!(metric_value(&view, "Highlighted Words Found"), "3");
}

#[test]
fn test_pages_are_idempotent_and_loads_memoized() {
    let (_dir, dashboard) = dashboard();
    let params = PageParams::default();

    let first = dashboard.render(Page::LargeInstitutions, &params);
    let second = dashboard.render(Page::LargeInstitutions, &params);

    assert_eq!(first, second);
    assert_eq!(dashboard.cache().len(), 1);

    // A fresh read of the same bytes aggregates identically
    dashboard.reload();
    assert_eq!(dashboard.render(Page::LargeInstitutions, &params), first);
}

#[test]
fn test_broken_dataset_only_fails_its_page() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    fs::write(
        dir.path().join("combinedSmallandLargeFinal.csv"),
        "DisplayName,Nationality\nA,American\nB,French,extra\n",
    )
    .unwrap();
    let dashboard = Dashboard::new(DashboardConfig::with_data_dir(dir.path())).unwrap();
    let params = PageParams::default();

    assert!(matches!(dashboard.combined(), Err(LoadError::Parse { .. })));
    assert!(dashboard.render(Page::LargeInstitutions, &params).is_error());
    assert!(!dashboard.render(Page::SmallInstitutions, &params).is_error());
    assert!(!dashboard.render(Page::MissionStatements, &params).is_error());

    let home = dashboard.render(Page::Home, &params);
    assert!(!home.is_error());
    assert!(home.metric("Combined museum artists").is_none());
    assert!(home.metric("Small museum artists").is_some());
}

#[test]
fn test_reload_picks_up_new_rows() {
    let (dir, dashboard) = dashboard();
    let params = PageParams::default();
    let before = dashboard.render(Page::SmallInstitutions, &params);

    let mut grown = SMALL.to_string();
    grown.push_str("Kehinde Wiley,American,Male,Frye,TRUE\n");
    fs::write(dir.path().join("Small Museum Data - Sheet1 (1).csv"), grown).unwrap();

    assert_eq!(dashboard.render(Page::SmallInstitutions, &params), before);
    dashboard.reload();
    let after = dashboard.render(Page::SmallInstitutions, &params);
    assert_eq!(metric_value(&after, "Total Artists"), "6");
}

#[test]
fn test_config_file_and_custom_rules() {
    let dir = tempfile::tempdir().unwrap();
    write_fixtures(dir.path());
    let rules = dir.path().join("rules.json");
    fs::write(&rules, r#"[{ "pattern": "Atlant*", "continent": "Europe" }]"#).unwrap();
    let config_path = dir.path().join("dashboard.json");
    fs::write(
        &config_path,
        serde_json::json!({
            "data_dir": dir.path(),
            "continent_rules": rules,
            "representation_term": "Asian",
        })
        .to_string(),
    )
    .unwrap();

    let config = DashboardConfig::from_file(&config_path).unwrap();
    let dashboard = Dashboard::new(config).unwrap();

    let small = dashboard.render(Page::SmallInstitutions, &PageParams::default());
    assert_eq!(small.charts()[2].labels, vec!["Unmapped", "Europe"]);

    let large = dashboard.render(Page::LargeInstitutions, &PageParams::default());
    assert_eq!(metric_value(&large, "Asian Artists"), "1");
}

#[test]
fn test_export_search_subset_keeps_schema() {
    let (_dir, dashboard) = dashboard();
    let table = dashboard.combined().unwrap();
    let filter = SubstringFilter::new("american", &[Column::Name, Column::Nationality]);

    let text = String::from_utf8(export_filtered(&table, &filter).unwrap()).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "DisplayName,Nationality,Gender,Ethnicity,Museum,BeginDate");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "Andy Warhol,American,Male,,MoMA,1928");
}
