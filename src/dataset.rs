use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

use crate::config::AppConfig;
use crate::match_record::{MatchRecord, MatchStore};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub const MOCK_SURFACES: &[&str] = &["Hard", "Clay", "Grass", "Carpet"];
pub const MOCK_ROUNDS: &[&str] = &[
    "1st Round",
    "2nd Round",
    "3rd Round",
    "4th Round",
    "Quarterfinals",
    "Semifinals",
    "The Final",
];

struct MockPlayer {
    name: &'static str,
    first_year: i32,
    last_year: i32,
    favorite_surface: &'static str,
}

const MOCK_ROSTER: &[MockPlayer] = &[
    MockPlayer { name: "Roger Federer", first_year: 1998, last_year: 2022, favorite_surface: "Grass" },
    MockPlayer { name: "Rafael Nadal", first_year: 2005, last_year: 2024, favorite_surface: "Clay" },
    MockPlayer { name: "Novak Djokovic", first_year: 2003, last_year: 2024, favorite_surface: "Hard" },
    MockPlayer { name: "Andy Murray", first_year: 2005, last_year: 2024, favorite_surface: "Grass" },
    MockPlayer { name: "Stan Wawrinka", first_year: 2005, last_year: 2024, favorite_surface: "Clay" },
];

/// Raw ATP CSV row. Only the columns the engine needs are mapped; extra
/// columns (odds, ranks, score, ...) are ignored.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Tournament", default)]
    tournament: Option<String>,
    #[serde(rename = "Date", default)]
    date: Option<String>,
    #[serde(rename = "Surface", default)]
    surface: Option<String>,
    #[serde(rename = "Round", default)]
    round: Option<String>,
    #[serde(rename = "Player_1", default)]
    player_1: Option<String>,
    #[serde(rename = "Player_2", default)]
    player_2: Option<String>,
    #[serde(rename = "Winner", default)]
    winner: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    pub source: Option<PathBuf>,
    pub mock: bool,
    pub rows_read: usize,
    pub loaded: usize,
    pub skipped_date: usize,
    pub skipped_players: usize,
    pub skipped_winner: usize,
    /// Rows the csv reader could not decode (bad UTF-8, bad quoting).
    pub skipped_malformed: usize,
    /// Kept rows that lack a surface or round.
    pub missing_category: usize,
}

impl LoadSummary {
    pub fn skipped(&self) -> usize {
        self.skipped_date + self.skipped_players + self.skipped_winner + self.skipped_malformed
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub store: MatchStore,
    pub summary: LoadSummary,
}

pub fn load_csv(path: &Path) -> Result<LoadedDataset> {
    let file = File::open(path).with_context(|| format!("open match csv {}", path.display()))?;
    let (records, mut summary) =
        parse_csv_reader(file).with_context(|| format!("parse match csv {}", path.display()))?;
    summary.source = Some(path.to_path_buf());
    tracing::info!(
        path = %path.display(),
        loaded = summary.loaded,
        skipped = summary.skipped(),
        missing_category = summary.missing_category,
        "match csv loaded"
    );
    Ok(LoadedDataset {
        store: MatchStore::new(records),
        summary,
    })
}

pub fn parse_csv_reader<R: Read>(reader: R) -> Result<(Vec<MatchRecord>, LoadSummary)> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("read csv header")?.clone();
    for required in ["Date", "Player_1", "Player_2", "Winner"] {
        if !headers.iter().any(|h| h == required) {
            return Err(anyhow!("missing required column {required}"));
        }
    }

    let mut summary = LoadSummary::default();
    let mut records = Vec::new();
    for (idx, row) in rdr.deserialize::<CsvRow>().enumerate() {
        summary.rows_read += 1;
        let row = match row {
            Ok(row) => row,
            Err(err) => {
                tracing::debug!(row = idx + 2, error = %err, "undecodable csv row");
                summary.skipped_malformed += 1;
                continue;
            }
        };

        let Some(date) = row.date.as_deref().and_then(parse_match_date) else {
            summary.skipped_date += 1;
            continue;
        };
        let (Some(player_a), Some(player_b)) = (non_empty(row.player_1), non_empty(row.player_2))
        else {
            summary.skipped_players += 1;
            continue;
        };
        if player_a == player_b {
            tracing::debug!(row = idx + 2, player = %player_a, "self-match row");
            summary.skipped_players += 1;
            continue;
        }
        let Some(winner) = non_empty(row.winner) else {
            summary.skipped_winner += 1;
            continue;
        };

        let record = MatchRecord {
            date,
            player_a,
            player_b,
            winner,
            surface: non_empty(row.surface),
            round: non_empty(row.round),
            tournament: non_empty(row.tournament),
        };
        if !record.has_valid_winner() {
            tracing::debug!(row = idx + 2, winner = %record.winner, "winner is not a participant");
            summary.skipped_winner += 1;
            continue;
        }
        if record.surface.is_none() || record.round.is_none() {
            summary.missing_category += 1;
        }
        records.push(record);
    }

    summary.loaded = records.len();
    if summary.skipped() > 0 {
        tracing::warn!(
            date = summary.skipped_date,
            players = summary.skipped_players,
            winner = summary.skipped_winner,
            malformed = summary.skipped_malformed,
            "skipped invalid csv rows"
        );
    }
    Ok((records, summary))
}

pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Generated stand-in for the real dataset. Deterministic for a given seed.
pub fn mock_dataset(seed: u64, matches: usize) -> LoadedDataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(matches);

    while records.len() < matches {
        let mut pair: Vec<&MockPlayer> = MOCK_ROSTER.choose_multiple(&mut rng, 2).collect();
        pair.shuffle(&mut rng);
        let (a, b) = (pair[0], pair[1]);

        let first = a.first_year.max(b.first_year);
        let last = a.last_year.min(b.last_year);
        if first > last {
            continue;
        }
        let year = rng.gen_range(first..=last);
        let month = rng.gen_range(1..=12);
        let day = rng.gen_range(1..=28);
        let Some(date) = NaiveDate::from_ymd_opt(year, month, day) else {
            continue;
        };

        let surface = MOCK_SURFACES[rng.gen_range(0..MOCK_SURFACES.len())];
        let round = MOCK_ROUNDS[rng.gen_range(0..MOCK_ROUNDS.len())];
        let edge = |p: &MockPlayer| -> f64 {
            if p.favorite_surface == surface { 0.15 } else { 0.0 }
        };
        let p_a = (0.5 + edge(a) - edge(b)).clamp(0.05, 0.95);
        let winner = if rng.gen_bool(p_a) { a.name } else { b.name };

        records.push(MatchRecord {
            date,
            player_a: a.name.to_string(),
            player_b: b.name.to_string(),
            winner: winner.to_string(),
            surface: Some(surface.to_string()),
            round: Some(round.to_string()),
            tournament: Some(format!("Mock Open {year}")),
        });
    }

    let summary = LoadSummary {
        source: None,
        mock: true,
        rows_read: records.len(),
        loaded: records.len(),
        ..LoadSummary::default()
    };
    LoadedDataset {
        store: MatchStore::new(records),
        summary,
    }
}

/// Loads the configured CSV, falling back to generated data when the file is
/// missing and the configuration allows it.
pub fn load_or_mock(cfg: &AppConfig) -> Result<LoadedDataset> {
    if cfg.data_path.exists() {
        return load_csv(&cfg.data_path);
    }
    if !cfg.allow_mock {
        return Err(anyhow!("match csv not found at {}", cfg.data_path.display()));
    }
    tracing::warn!(path = %cfg.data_path.display(), "match csv not found, using mock data");
    Ok(mock_dataset(cfg.mock_seed, cfg.mock_matches))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_match_date_accepts_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 7, 14);
        assert_eq!(parse_match_date("2019-07-14"), expected);
        assert_eq!(parse_match_date("07/14/2019"), expected);
        assert_eq!(parse_match_date("2019-07-14 00:00:00"), expected);
        assert_eq!(parse_match_date("14th July"), None);
        assert_eq!(parse_match_date("  "), None);
    }

    #[test]
    fn mock_dataset_is_deterministic_and_valid() {
        let a = mock_dataset(7, 200);
        let b = mock_dataset(7, 200);
        assert_eq!(a.store.records(), b.store.records());
        assert_eq!(a.store.len(), 200);
        assert!(a.summary.mock);
        for r in a.store.records() {
            assert!(r.has_valid_winner());
            assert_ne!(r.player_a, r.player_b);
            assert!(r.surface.is_some() && r.round.is_some());
        }
    }

    #[test]
    fn self_match_rows_are_skipped() {
        let raw = "Date,Surface,Round,Player_1,Player_2,Winner\n\
                   2019-01-01,Hard,F,A,A,A\n\
                   2019-01-02,Hard,F,A,B,B\n";
        let (records, summary) = parse_csv_reader(raw.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].winner, "B");
        assert_eq!(summary.skipped_players, 1);
        assert_eq!(summary.skipped(), 1);
    }

    #[test]
    fn undecodable_row_is_skipped_not_fatal() {
        let mut raw = b"Date,Surface,Round,Player_1,Player_2,Winner\n".to_vec();
        raw.extend_from_slice(b"2019-01-01,Hard,F,\xff\xfe,B,B\n");
        raw.extend_from_slice(b"2019-01-02,Clay,F,A,B,A\n");
        let (records, summary) = parse_csv_reader(raw.as_slice()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(summary.rows_read, 2);
        assert_eq!(summary.skipped_malformed, 1);
        assert_eq!(summary.loaded, 1);
    }
}
