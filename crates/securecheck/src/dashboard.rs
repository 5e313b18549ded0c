//! Stateless request handling for the four dashboard sections.
//!
//! Each call to [`handle`] is one user action: it opens whatever store
//! connections it needs, builds a [`Page`], and keeps nothing afterwards.
//! Failures end up as notices on the page rather than as errors.

use std::str::FromStr;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::present::{Block, Chart, Notice, Page};
use crate::query::catalog::OVERVIEW_LABEL;
use crate::query::{Analysis, LogFilter};
use crate::stop::NewStop;
use crate::store::{time_component, Store, StoreStats};

/// Heading of the Home section.
pub const DASHBOARD_TITLE: &str = "SecureCheck: Police Post Dashboard";

const HOME_BLURB: &str = "Welcome to the SecureCheck dashboard. Use it to:\n\
- View traffic stop logs\n\
- Analyze violations and demographics\n\
- Monitor police post efficiency";

/// One user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// The landing section.
    Home,
    /// Browse stop records, optionally filtered.
    ViewLogs(LogFilter),
    /// Run a catalog analysis or the chart overview.
    Analytics(AnalysisChoice),
    /// Append a stop record.
    AddLog(NewStop),
}

/// What the Data Analytics section should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisChoice {
    /// Charts for the three overview entries.
    Overview,
    /// One catalog entry as a table.
    Single(Analysis),
}

impl AnalysisChoice {
    /// Label shown as the page heading.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Overview => OVERVIEW_LABEL,
            Self::Single(analysis) => analysis.label(),
        }
    }
}

impl FromStr for AnalysisChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("overview") || wanted.eq_ignore_ascii_case(OVERVIEW_LABEL) {
            return Ok(Self::Overview);
        }
        wanted.parse().map(Self::Single)
    }
}

/// Serve one request against `store`.
#[must_use]
pub fn handle(store: &Store, request: Request) -> Page {
    match request {
        Request::Home => home(store),
        Request::ViewLogs(filter) => view_logs(store, &filter),
        Request::Analytics(AnalysisChoice::Overview) => overview(store),
        Request::Analytics(AnalysisChoice::Single(analysis)) => analytics(store, analysis),
        Request::AddLog(stop) => add_log(store, &stop),
    }
}

fn home(store: &Store) -> Page {
    let mut page = Page::new(DASHBOARD_TITLE);
    page.push(Block::Text(HOME_BLURB.to_string()));

    match store.stats() {
        Ok(stats) => page.push(Block::Text(stats_text(&stats))),
        Err(e) => {
            warn!(error = %e, "Failed to read store statistics");
            page.notify(Notice::Error(format!("Connection Error: {e}")));
        }
    }
    page
}

fn stats_text(stats: &StoreStats) -> String {
    let range = match (stats.first_stop, stats.last_stop) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "no stops recorded".to_string(),
    };
    format!(
        "Stops recorded: {}\nDate range:     {range}\nDatabase size:  {} bytes",
        stats.total_stops, stats.db_size_bytes
    )
}

fn view_logs(store: &Store, filter: &LogFilter) -> Page {
    let mut page = Page::new("View Logs");
    if filter.is_empty() {
        debug!("Browsing all stop logs");
    } else {
        debug!(?filter, "Browsing filtered stop logs");
    }

    let mut frame = store.fetch(&filter.to_query(), &mut page.notices);
    if frame.is_empty() {
        page.notify(Notice::Warning("No matching logs found.".to_string()));
        return page;
    }

    frame.map_column("stop_time", time_component);
    page.notify(Notice::Success(format!("Showing {} matching logs", frame.len())));
    page.push(Block::Table(frame));
    page
}

fn analytics(store: &Store, analysis: Analysis) -> Page {
    let mut page = Page::new(analysis.label());
    debug!(analysis = analysis.slug(), "Running analysis");

    let frame = store.fetch(&analysis.query(), &mut page.notices);
    if frame.is_empty() {
        page.notify(Notice::Warning("No data found for this query.".to_string()));
    } else {
        page.push(Block::Table(frame));
    }
    page
}

fn overview(store: &Store) -> Page {
    let mut page = Page::new(OVERVIEW_LABEL);

    let mut charts = Vec::new();
    for analysis in Analysis::OVERVIEW {
        let frame = store.fetch(&analysis.query(), &mut page.notices);
        if page.has_errors() {
            break;
        }
        if let Some(chart) = analysis
            .chart()
            .and_then(|spec| Chart::from_frame(&spec, &frame))
        {
            charts.push(chart);
        }
    }

    if charts.is_empty() {
        page.notify(Notice::Warning("No data to analyze.".to_string()));
    }
    for chart in charts {
        page.push(Block::Chart(chart));
    }
    page
}

fn add_log(store: &Store, stop: &NewStop) -> Page {
    let mut page = Page::new("Add Logs");

    match store.insert(stop) {
        Ok(()) => {
            info!(vehicle = %stop.vehicle_number, "Log added");
            page.notify(Notice::Success("Log added successfully!".to_string()));
            page.notify(Notice::Info(stop.summary()));
        }
        Err(e) => {
            warn!(error = %e, "Insert failed");
            page.notify(Notice::Error(format!("Failed to insert log: {e}")));
        }
    }
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::present::ChartKind;
    use crate::stop::tests::sample_stop;
    use crate::stop::{StopDuration, StopOutcome};
    use crate::store::tests::temp_store;
    use crate::store::Cell;

    fn missing_store(dir: &tempfile::TempDir) -> Store {
        Store::new(&StoreConfig {
            database_path: Some(dir.path().join("absent.db")),
            create_if_missing: false,
        })
    }

    fn speeding_arrests(page: &Page) -> i64 {
        page.tables()
            .next()
            .and_then(|frame| {
                let violation = frame.column_index("violation")?;
                let arrests = frame.column_index("arrests")?;
                frame
                    .rows()
                    .iter()
                    .find(|r| r[violation] == Cell::from("Speeding"))
                    .and_then(|r| r[arrests].as_i64())
            })
            .unwrap_or(0)
    }

    #[test]
    fn test_analysis_choice_parse() {
        assert_eq!(
            "overview".parse::<AnalysisChoice>().unwrap(),
            AnalysisChoice::Overview
        );
        assert_eq!(
            OVERVIEW_LABEL.parse::<AnalysisChoice>().unwrap(),
            AnalysisChoice::Overview
        );
        assert_eq!(
            "Time of Day with Most Stops".parse::<AnalysisChoice>().unwrap(),
            AnalysisChoice::Single(Analysis::StopsByHour)
        );
        assert!("bogus".parse::<AnalysisChoice>().is_err());
    }

    #[test]
    fn test_home_shows_blurb_and_stats() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();

        let page = handle(&store, Request::Home);
        assert_eq!(page.title, DASHBOARD_TITLE);
        assert!(page.notices.is_empty());
        let text: Vec<&str> = page
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert!(text[0].contains("Monitor police post efficiency"));
        assert!(text[1].contains("Stops recorded: 1"));
        assert!(text[1].contains("2024-03-09 to 2024-03-09"));
    }

    #[test]
    fn test_view_logs_success_notice() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();
        store.insert(&sample_stop()).unwrap();

        let page = handle(&store, Request::ViewLogs(LogFilter::default()));
        assert_eq!(
            page.notices,
            vec![Notice::Success("Showing 2 matching logs".to_string())]
        );
        assert_eq!(page.tables().next().unwrap().len(), 2);
    }

    #[test]
    fn test_view_logs_shows_time_only() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();

        let page = handle(&store, Request::ViewLogs(LogFilter::default()));
        let frame = page.tables().next().unwrap();
        assert_eq!(frame.column("stop_time").next(), Some(&Cell::from("14:30:00")));
    }

    #[test]
    fn test_view_logs_no_match_warning() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();

        let filter = LogFilter {
            vehicle: "ZZZ".to_string(),
            ..LogFilter::default()
        };
        let page = handle(&store, Request::ViewLogs(filter));
        assert_eq!(
            page.notices,
            vec![Notice::Warning("No matching logs found.".to_string())]
        );
        assert_eq!(page.tables().count(), 0);
    }

    #[test]
    fn test_view_logs_connection_error_then_empty() {
        let dir = tempfile::tempdir().unwrap();
        let page = handle(&missing_store(&dir), Request::ViewLogs(LogFilter::default()));

        assert!(page.has_errors());
        assert!(page.notices[0].message().starts_with("Connection Error:"));
        assert_eq!(page.notices[1], Notice::Warning("No matching logs found.".to_string()));
    }

    #[test]
    fn test_analytics_single_table() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();

        let page = handle(
            &store,
            Request::Analytics(AnalysisChoice::Single(Analysis::ViolationCounts)),
        );
        assert_eq!(page.title, "Violation Counts");
        assert!(page.notices.is_empty());
        assert_eq!(page.tables().count(), 1);
    }

    #[test]
    fn test_analytics_single_no_data() {
        let (_dir, store) = temp_store();
        let page = handle(
            &store,
            Request::Analytics(AnalysisChoice::Single(Analysis::TopDrugVehicles)),
        );
        assert_eq!(
            page.notices,
            vec![Notice::Warning("No data found for this query.".to_string())]
        );
    }

    #[test]
    fn test_overview_charts() {
        let (_dir, store) = temp_store();
        store.insert(&sample_stop()).unwrap();

        let page = handle(&store, Request::Analytics(AnalysisChoice::Overview));
        let kinds: Vec<ChartKind> = page.charts().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Bar, ChartKind::Pie, ChartKind::GroupedBar]);
        assert!(page.notices.is_empty());
    }

    #[test]
    fn test_overview_unreachable_store_reports_once() {
        let dir = tempfile::tempdir().unwrap();
        let page = handle(&missing_store(&dir), Request::Analytics(AnalysisChoice::Overview));

        let errors: Vec<&Notice> = page.notices.iter().filter(|n| n.is_error()).collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message().starts_with("Connection Error:"));
        assert_eq!(page.charts().count(), 0);
        assert_eq!(
            page.notices.last(),
            Some(&Notice::Warning("No data to analyze.".to_string()))
        );
    }

    #[test]
    fn test_overview_empty_store() {
        let (_dir, store) = temp_store();
        let page = handle(&store, Request::Analytics(AnalysisChoice::Overview));
        assert_eq!(page.charts().count(), 0);
        assert_eq!(
            page.notices,
            vec![Notice::Warning("No data to analyze.".to_string())]
        );
    }

    #[test]
    fn test_add_log_success_with_summary() {
        let (_dir, store) = temp_store();
        let stop = sample_stop();

        let page = handle(&store, Request::AddLog(stop.clone()));
        assert_eq!(
            page.notices,
            vec![
                Notice::Success("Log added successfully!".to_string()),
                Notice::Info(stop.summary()),
            ]
        );
        assert_eq!(store.stats().unwrap().total_stops, 1);
    }

    #[test]
    fn test_add_log_failure_notice() {
        let dir = tempfile::tempdir().unwrap();
        let page = handle(&missing_store(&dir), Request::AddLog(sample_stop()));

        assert_eq!(page.notices.len(), 1);
        assert!(page.notices[0].message().starts_with("Failed to insert log:"));
    }

    #[test]
    fn test_insert_then_top_five_counts_the_arrest() {
        let (_dir, store) = temp_store();
        let mut citation = sample_stop();
        citation.stop_outcome = StopOutcome::Citation;
        store.insert(&citation).unwrap();

        let top_five = Request::Analytics(AnalysisChoice::Single(Analysis::TopArrestRateViolations));
        let before = speeding_arrests(&handle(&store, top_five.clone()));

        let mut stop = sample_stop();
        stop.driver_age = 30;
        stop.violation = "Speeding".to_string();
        stop.stop_outcome = StopOutcome::Arrest;
        stop.search_type = String::new();
        stop.drugs_related_stop = false;
        stop.stop_duration = StopDuration::UpTo15;
        let added = handle(&store, Request::AddLog(stop));
        assert!(!added.has_errors());

        let after = speeding_arrests(&handle(&store, top_five));
        assert!(after >= before + 1, "before {before}, after {after}");
    }
}
