use super::*;
use crate::color::{DEFAULT_CONTRIBUTION_EMPTY, DEFAULT_IDLE};

// ============================================================================
// Test Helpers
// ============================================================================

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day(date: &str, typing: u64, active: u64, idle: u64) -> DayMetric {
    DayMetric {
        date: date_key::parse(date).unwrap(),
        counts: ActivityCounts {
            typing,
            active,
            idle,
        },
    }
}

fn contrib(date: &str, count: u64) -> ContributionMetric {
    ContributionMetric {
        date: date_key::parse(date).unwrap(),
        count,
    }
}

fn labelled_columns(labels: &[String]) -> Vec<(usize, &str)> {
    labels
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.is_empty())
        .map(|(i, l)| (i, l.as_str()))
        .collect()
}

// ============================================================================
// Year mode
// ============================================================================

#[test]
fn test_leap_year_scenario() {
    let palettes = ActivityPalettes::default();
    let metrics = vec![day("2024-03-01", 5, 0, 0), day("2024-03-02", 0, 3, 0)];

    let layout = build_activity_grid(GridSpan::Year(2024), &metrics, &palettes).unwrap();

    assert_eq!(layout.cells.len(), 366);
    assert_eq!(layout.padding, 0);
    assert_eq!(layout.day_cells().count(), 366);
    assert_eq!(layout.weeks, 53);

    let typing_day = layout.cell_for("2024-03-01").unwrap();
    assert_eq!(typing_day.color, palettes.typing.last());
    let active_day = layout.cell_for("2024-03-02").unwrap();
    assert_eq!(active_day.color, palettes.active.last());

    let idle_cells = layout
        .cells
        .iter()
        .filter(|c| c.color == DEFAULT_IDLE)
        .count();
    assert_eq!(idle_cells, 364);
}

#[test]
fn test_year_mode_cell_counts() {
    let palettes = ActivityPalettes::default();
    for (year, expected) in [(2023, 365), (2024, 366), (1900, 365), (2000, 366)] {
        let layout = build_activity_grid(GridSpan::Year(year), &[], &palettes).unwrap();
        assert_eq!(layout.cells.len(), expected, "year {year}");
        assert!(layout.cells.iter().all(|c| !c.is_padding()));
        assert_eq!(
            layout.cells.first().unwrap().date_key.as_deref(),
            Some(format!("{year:04}-01-01").as_str())
        );
        assert_eq!(
            layout.cells.last().unwrap().date_key.as_deref(),
            Some(format!("{year:04}-12-31").as_str())
        );
    }
}

#[test]
fn test_year_mode_ignores_jan_first_weekday() {
    // 2023-01-01 is a Sunday; year mode still starts at column 0, row 0.
    let layout =
        build_activity_grid(GridSpan::Year(2023), &[], &ActivityPalettes::default()).unwrap();
    assert_eq!(layout.padding, 0);
    assert_eq!(layout.cells[0].date_key.as_deref(), Some("2023-01-01"));
    assert_eq!(layout.cells[7].date_key.as_deref(), Some("2023-01-08"));
}

#[test]
fn test_year_mode_tooltips() {
    let metrics = vec![day("2024-07-04", 2, 9, 14)];
    let layout =
        build_activity_grid(GridSpan::Year(2024), &metrics, &ActivityPalettes::default()).unwrap();
    assert_eq!(
        layout.cell_for("2024-07-04").unwrap().tooltip,
        "2024-07-04 | typing: 2 | active: 9 | idle: 14"
    );
    assert_eq!(
        layout.cell_for("2024-07-05").unwrap().tooltip,
        "2024-07-05 | typing: 0 | active: 0 | idle: 0"
    );
}

#[test]
fn test_year_mode_month_and_quarter_labels() {
    let layout =
        build_activity_grid(GridSpan::Year(2024), &[], &ActivityPalettes::default()).unwrap();

    assert_eq!(layout.month_labels.len(), layout.weeks);
    assert_eq!(layout.quarter_labels.len(), layout.weeks);

    let months = labelled_columns(&layout.month_labels);
    assert_eq!(months.len(), 12);
    assert_eq!(months[0], (0, "jan"));
    assert_eq!(months[1], (4, "feb")); // day 31
    assert_eq!(months[2], (8, "mar")); // day 60
    assert_eq!(months[5], (21, "jun")); // day 152
    assert_eq!(months[11], (47, "dec")); // day 335

    assert_eq!(
        labelled_columns(&layout.quarter_labels),
        vec![(8, "mar"), (21, "jun"), (34, "sep"), (47, "dec")]
    );

    assert_eq!(layout.range_start_label, "january");
    assert_eq!(layout.range_end_label, "december");
    assert_eq!(layout.range, GridRange::Year { year: 2024 });
}

#[test]
fn test_out_of_span_records_do_not_affect_scaling() {
    let palettes = ActivityPalettes::default();
    let metrics = vec![day("2023-12-31", 100, 0, 0), day("2024-05-05", 2, 0, 0)];
    let layout = build_activity_grid(GridSpan::Year(2024), &metrics, &palettes).unwrap();

    assert!(layout.cell_for("2023-12-31").is_none());
    assert_eq!(
        layout.cell_for("2024-05-05").unwrap().color,
        palettes.typing.last()
    );
}

#[test]
fn test_unsorted_and_duplicate_records() {
    let palettes = ActivityPalettes::default();
    let metrics = vec![
        day("2024-09-10", 1, 0, 0),
        day("2024-02-01", 4, 0, 0),
        day("2024-09-10", 8, 0, 0),
    ];
    let layout = build_activity_grid(GridSpan::Year(2024), &metrics, &palettes).unwrap();

    // Last record for 2024-09-10 wins and becomes the maximum.
    let cell = layout.cell_for("2024-09-10").unwrap();
    assert_eq!(cell.tooltip, "2024-09-10 | typing: 8 | active: 0 | idle: 0");
    assert_eq!(cell.color, palettes.typing.last());
    // 4 / 8 * 3 = 1.5 -> index 1
    assert_eq!(
        layout.cell_for("2024-02-01").unwrap().color,
        palettes.typing.colors()[1]
    );
}

#[test]
fn test_idle_only_day_is_idle_colored() {
    let metrics = vec![day("2024-01-02", 0, 0, 40)];
    let layout =
        build_activity_grid(GridSpan::Year(2024), &metrics, &ActivityPalettes::default()).unwrap();
    assert_eq!(layout.cell_for("2024-01-02").unwrap().color, DEFAULT_IDLE);
}

#[test]
fn test_invalid_year() {
    let palettes = ActivityPalettes::default();
    for year in [0, -4, 10_000] {
        assert!(matches!(
            build_activity_grid(GridSpan::Year(year), &[], &palettes),
            Err(GridError::InvalidRange(_))
        ));
    }
    assert!(matches!(parse_year("20x4"), Err(GridError::InvalidRange(_))));
    assert!(matches!(parse_year("2024.5"), Err(GridError::InvalidRange(_))));
    assert!(matches!(parse_year(""), Err(GridError::InvalidRange(_))));
    assert_eq!(parse_year(" 2024 "), Ok(2024));
}

#[test]
fn test_build_is_deterministic() {
    let palettes = ActivityPalettes::default();
    let metrics = vec![
        day("2024-03-01", 5, 1, 0),
        day("2024-03-02", 0, 3, 0),
        day("2024-11-30", 1, 1, 1),
    ];
    let first = build_activity_grid(GridSpan::Year(2024), &metrics, &palettes).unwrap();
    let second = build_activity_grid(GridSpan::Year(2024), &metrics, &palettes).unwrap();
    assert_eq!(first, second);

    let today = ymd(2024, 6, 12);
    let span = GridSpan::Rolling { today, days: 30 };
    assert_eq!(
        build_activity_grid(span, &metrics, &palettes).unwrap(),
        build_activity_grid(span, &metrics, &palettes).unwrap()
    );
}

// ============================================================================
// Rolling mode
// ============================================================================

#[test]
fn test_rolling_week_scenario() {
    let today = ymd(2024, 6, 12);
    let layout = build_activity_grid(
        GridSpan::Rolling { today, days: 7 },
        &[],
        &ActivityPalettes::default(),
    )
    .unwrap();

    assert_eq!(
        layout.range,
        GridRange::Rolling {
            start: ymd(2024, 6, 6),
            end: today,
            days: 7
        }
    );
    assert_eq!(layout.padding, 2);
    assert_eq!(layout.cells.len(), 9);
    assert_eq!(layout.weeks, 2);

    for cell in &layout.cells[..2] {
        assert!(cell.is_padding());
        assert_eq!(cell.color, TRANSPARENT);
        assert!(cell.tooltip.is_empty());
    }
    assert_eq!(layout.cells[2].date_key.as_deref(), Some("2024-06-06"));
    assert_eq!(layout.cells[8].date_key.as_deref(), Some("2024-06-12"));

    // No month starts inside the window, and rolling mode never has quarters.
    assert!(layout.month_labels.iter().all(String::is_empty));
    assert_eq!(layout.quarter_labels, vec![String::new(); 2]);
}

#[test]
fn test_rolling_month_label_accounts_for_padding() {
    // Starts Monday 2024-06-24 -> 6 padding cells; 2024-07-01 is cell 13.
    let today = ymd(2024, 7, 3);
    let layout = build_activity_grid(
        GridSpan::Rolling { today, days: 10 },
        &[],
        &ActivityPalettes::default(),
    )
    .unwrap();

    assert_eq!(layout.padding, 6);
    assert_eq!(layout.weeks, 3);
    assert_eq!(labelled_columns(&layout.month_labels), vec![(1, "jul")]);
    assert_eq!(layout.range_start_label, "june");
    assert_eq!(layout.range_end_label, "july");
}

#[test]
fn test_rolling_window_across_year_boundary() {
    let today = ymd(2025, 1, 15);
    let metrics = vec![day("2024-12-20", 3, 0, 0), day("2025-01-15", 0, 2, 0)];
    let palettes = ActivityPalettes::default();
    let layout =
        build_activity_grid(GridSpan::Rolling { today, days: 60 }, &metrics, &palettes).unwrap();

    assert_eq!(layout.day_cells().count(), 60);
    let months: Vec<&str> = labelled_columns(&layout.month_labels)
        .into_iter()
        .map(|(_, l)| l)
        .collect();
    assert_eq!(months, vec!["dec", "jan"]);
    assert_eq!(
        layout.cell_for("2024-12-20").unwrap().color,
        palettes.typing.last()
    );
    assert_eq!(
        layout.cell_for("2025-01-15").unwrap().color,
        palettes.active.last()
    );
}

#[test]
fn test_rolling_zero_days_is_empty() {
    let today = ymd(2024, 6, 12);
    let layout = build_activity_grid(
        GridSpan::Rolling { today, days: 0 },
        &[day("2024-06-12", 1, 0, 0)],
        &ActivityPalettes::default(),
    )
    .unwrap();
    assert!(layout.cells.is_empty());
    assert_eq!(layout.weeks, 0);
    assert!(layout.month_labels.is_empty());
}

#[test]
fn test_rolling_window_is_clamped() {
    let today = ymd(2024, 6, 12);
    let layout = build_activity_grid(
        GridSpan::Rolling {
            today,
            days: u32::MAX,
        },
        &[],
        &ActivityPalettes::default(),
    )
    .unwrap();
    assert_eq!(layout.day_cells().count(), MAX_WINDOW_DAYS as usize);
}

#[test]
fn test_negative_rolling_window_rejected() {
    let today = ymd(2024, 6, 12);
    assert!(matches!(
        GridSpan::rolling(today, -1),
        Err(GridError::InvalidRange(_))
    ));
    assert_eq!(
        GridSpan::rolling(today, 90),
        Ok(GridSpan::Rolling { today, days: 90 })
    );
}

// ============================================================================
// Contributions
// ============================================================================

#[test]
fn test_contribution_grid() {
    let palettes = ContributionPalettes::default();
    let metrics = vec![contrib("2023-04-10", 12), contrib("2023-04-11", 3)];
    let layout = build_contribution_grid(GridSpan::Year(2023), &metrics, &palettes).unwrap();

    assert_eq!(layout.cells.len(), 365);
    let busy = layout.cell_for("2023-04-10").unwrap();
    assert_eq!(busy.color, palettes.levels.last());
    assert_eq!(busy.tooltip, "2023-04-10 | contributions: 12");

    // 3 / 12 * 3 = 0.75 -> lowest level, not the empty colour
    assert_eq!(
        layout.cell_for("2023-04-11").unwrap().color,
        palettes.levels.first()
    );
    let quiet = layout.cell_for("2023-04-12").unwrap();
    assert_eq!(quiet.color, DEFAULT_CONTRIBUTION_EMPTY);
    assert_eq!(quiet.tooltip, "2023-04-12 | contributions: 0");
}

#[test]
fn test_contribution_grid_rolling() {
    let today = ymd(2024, 6, 12);
    let layout = build_contribution_grid(
        GridSpan::Rolling { today, days: 7 },
        &[contrib("2024-06-10", 1)],
        &ContributionPalettes::default(),
    )
    .unwrap();
    assert_eq!(layout.cells.len(), 9);
    assert!(layout.cells[0].is_padding());
}

// ============================================================================
// Totals
// ============================================================================

#[test]
fn test_summarize_activity() {
    let metrics = vec![
        day("2024-01-01", 30, 20, 10),
        day("2024-01-02", 0, 0, 0),
        day("2023-12-31", 1000, 0, 0),
    ];
    let totals = summarize_activity(GridSpan::Year(2024), &metrics).unwrap();
    assert_eq!(totals.typing, 30);
    assert_eq!(totals.active, 20);
    assert_eq!(totals.idle, 10);
    assert_eq!(totals.typing_percent, 50);
    assert_eq!(totals.idle_percent, 17);

    let empty = summarize_activity(GridSpan::Year(2024), &[]).unwrap();
    assert_eq!(empty, ActivityTotals::default());
}
