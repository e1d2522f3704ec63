use std::path::PathBuf;

use atp_terminal::config::AppConfig;
use atp_terminal::dataset::{load_csv, load_or_mock, parse_csv_reader};
use atp_terminal::error::EngineError;
use atp_terminal::match_record::YearRange;
use atp_terminal::report::{career_report, head_to_head_report, matrix_lines};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn fixture_rows_are_validated() {
    let loaded = load_csv(&fixture_path("atp_sample.csv")).expect("fixture should load");
    let summary = &loaded.summary;
    assert_eq!(summary.rows_read, 11);
    assert_eq!(summary.loaded, 9);
    assert_eq!(summary.skipped_date, 1);
    assert_eq!(summary.skipped_winner, 1);
    assert_eq!(summary.missing_category, 1);
    assert!(!summary.mock);
    assert_eq!(loaded.store.year_bounds(), Some(YearRange::new(2017, 2019)));
    assert!(loaded.store.players().contains(&"Zverev A.".to_string()));
    assert!(!loaded.store.players().contains(&"Murray A.".to_string()));
}

#[test]
fn fixture_federer_nadal_rivalry() {
    let loaded = load_csv(&fixture_path("atp_sample.csv")).expect("fixture should load");
    let report = head_to_head_report(&loaded.store, None, "Federer R.", "Nadal R.");

    let record = report.record.as_ref().expect("they met");
    assert_eq!(record.total_matches, 5);
    assert_eq!(record.player_one_wins, 4);
    assert_eq!(record.player_two_wins, 1);
    assert_eq!(record.net_wins_annotation("Federer R.").as_deref(), Some("3 net wins"));

    let last = report.trend.last().expect("trend has points");
    assert_eq!((last.player_one_wins, last.player_two_wins), (4, 1));
    let fourth = report.trend.points[3];
    assert_eq!((fourth.player_one_wins, fourth.player_two_wins), (3, 1));

    let matrix = report.matrix.as_ref().expect("categories complete");
    assert_eq!(matrix.surfaces, vec!["Clay", "Grass", "Hard"]);
    assert_eq!(matrix.rounds, vec!["4th Round", "Semifinals", "The Final"]);
    assert_eq!(
        matrix.diff,
        vec![vec![0, -1, 0], vec![0, 1, 0], vec![1, 0, 2]]
    );
}

#[test]
fn fixture_career_and_era_filter() {
    let loaded = load_csv(&fixture_path("atp_sample.csv")).expect("fixture should load");
    let report = career_report(&loaded.store, None, "Federer R.");
    let stats = report.stats.as_ref().expect("federer played");
    assert_eq!(stats.total_matches, 6);
    assert_eq!(stats.total_wins, 4);
    assert_eq!(stats.total_titles(), 2);
    assert_eq!(stats.wins_by_surface[0].surface, "Hard");
    assert_eq!(stats.wins_by_surface[0].wins, 3);

    let era = YearRange::new(2018, 2018);
    let window = loaded.store.filter_years(era);
    let report = career_report(&window, Some(era), "Federer R.");
    assert!(report.stats.is_none());
}

#[test]
fn fixture_missing_surface_reports_incomplete_grid() {
    let loaded = load_csv(&fixture_path("atp_sample.csv")).expect("fixture should load");
    let report = head_to_head_report(&loaded.store, None, "Zverev A.", "Thiem D.");
    assert_eq!(report.record.as_ref().map(|r| r.total_matches), Some(1));
    assert!(report.matrix.is_none());
    assert_eq!(
        report.matrix_error,
        Some(EngineError::IncompleteCategoryData {
            missing_surface: 1,
            missing_round: 0
        })
    );
    assert!(matrix_lines(&report)[0].starts_with("Win-difference grid unavailable"));
}

#[test]
fn missing_required_column_is_an_error() {
    let raw = "Date,Player_1,Player_2\n2019-01-01,A,B\n";
    let err = parse_csv_reader(raw.as_bytes()).expect_err("winner column missing");
    assert!(err.to_string().contains("Winner"));
}

#[test]
fn missing_file_falls_back_to_mock_when_allowed() {
    let cfg = AppConfig {
        data_path: fixture_path("does_not_exist.csv"),
        mock_matches: 50,
        ..AppConfig::default()
    };
    let loaded = load_or_mock(&cfg).expect("mock fallback");
    assert!(loaded.summary.mock);
    assert_eq!(loaded.store.len(), 50);

    let strict = AppConfig {
        allow_mock: false,
        ..cfg
    };
    assert!(load_or_mock(&strict).is_err());
}
