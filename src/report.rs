use serde::Serialize;

use crate::career::{PlayerCareerStats, compute_career_stats};
use crate::error::EngineError;
use crate::head_to_head::{HeadToHeadRecord, compute_head_to_head};
use crate::match_record::{MatchStore, YearRange, select_head_to_head};
use crate::matrix::{DiffMatrix, head_to_head_diff};
use crate::trend::{CumulativeTrendSeries, compute_cumulative_trend};

/// Everything the career view shows for one player in one era.
#[derive(Debug, Clone, Serialize)]
pub struct CareerReport {
    pub player: String,
    pub era: Option<YearRange>,
    pub stats: Option<PlayerCareerStats>,
}

/// Everything the head-to-head view shows for a pair in one era.
#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadReport {
    pub player_one: String,
    pub player_two: String,
    pub era: Option<YearRange>,
    pub record: Option<HeadToHeadRecord>,
    pub trend: CumulativeTrendSeries,
    pub matrix: Option<DiffMatrix>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_error: Option<EngineError>,
}

/// `window` is the era-filtered store; `era` is only carried for labels.
pub fn career_report(window: &MatchStore, era: Option<YearRange>, player: &str) -> CareerReport {
    CareerReport {
        player: player.to_string(),
        era,
        stats: compute_career_stats(window.records(), player),
    }
}

pub fn head_to_head_report(
    window: &MatchStore,
    era: Option<YearRange>,
    p1: &str,
    p2: &str,
) -> HeadToHeadReport {
    let meetings = select_head_to_head(window.records(), p1, p2);
    let record = compute_head_to_head(window.records(), p1, p2);
    let trend = compute_cumulative_trend(&meetings, p1, p2);
    let (matrix, matrix_error) = if meetings.is_empty() {
        (None, None)
    } else {
        match head_to_head_diff(&meetings, p1, p2) {
            Ok(m) => (Some(m), None),
            Err(err) => (None, Some(err)),
        }
    };
    HeadToHeadReport {
        player_one: p1.to_string(),
        player_two: p2.to_string(),
        era,
        record,
        trend,
        matrix,
        matrix_error,
    }
}

pub fn career_lines(report: &CareerReport) -> Vec<String> {
    let era = era_label(report.era);
    let Some(stats) = report.stats.as_ref() else {
        return vec![format!("No matches found for {} in {era}.", report.player)];
    };

    let mut lines = vec![
        format!("Career overview: {} ({era})", stats.player),
        format!("Total matches: {}", stats.total_matches),
        format!(
            "Win rate: {:.1}% ({} W / {} L)",
            stats.win_rate,
            stats.total_wins,
            stats.total_losses()
        ),
        format!("Titles: {}", stats.total_titles()),
        format!(
            "Favourite surface: {}",
            stats.favorite_surface().unwrap_or("N/A")
        ),
    ];
    if stats.wins_by_surface.is_empty() {
        lines.push("No wins recorded in this range.".to_string());
    } else {
        lines.push("Wins by surface:".to_string());
        for s in &stats.wins_by_surface {
            lines.push(format!("  {:<10} {}", s.surface, s.wins));
        }
    }
    lines
}

pub fn head_to_head_lines(report: &HeadToHeadReport) -> Vec<String> {
    let era = era_label(report.era);
    let Some(record) = report.record.as_ref() else {
        return vec![format!(
            "No head-to-head matches found between {} and {} in {era}.",
            report.player_one, report.player_two
        )];
    };

    let mut lines = vec![
        format!("{} vs {} ({era})", record.player_one, record.player_two),
        format!("Total matches: {}", record.total_matches),
    ];
    for player in [&record.player_one, &record.player_two] {
        let wins = record.wins_for(player).unwrap_or(0);
        match record.net_wins_annotation(player) {
            Some(note) => lines.push(format!("{player} wins: {wins} (+{note})")),
            None => lines.push(format!("{player} wins: {wins}")),
        }
    }
    if record.excluded > 0 {
        lines.push(format!(
            "{} meeting(s) excluded: winner outside the pair",
            record.excluded
        ));
    }
    lines
}

pub fn trend_lines(trend: &CumulativeTrendSeries) -> Vec<String> {
    if trend.is_empty() {
        return vec!["No head-to-head history.".to_string()];
    }
    let mut lines = vec![format!(
        "{:>4}  {:<10}  {:>6}  {:>6}",
        "#", "Date", "P1", "P2"
    )];
    for p in &trend.points {
        lines.push(format!(
            "{:>4}  {:<10}  {:>6}  {:>6}",
            p.match_number,
            p.date.format("%Y-%m-%d"),
            p.player_one_wins,
            p.player_two_wins
        ));
    }
    lines
}

pub fn matrix_lines(report: &HeadToHeadReport) -> Vec<String> {
    if let Some(err) = report.matrix_error.as_ref() {
        return vec![format!("Win-difference grid unavailable: {err}")];
    }
    let Some(matrix) = report.matrix.as_ref() else {
        return Vec::new();
    };
    if matrix.is_empty() {
        return vec!["No surface/round data.".to_string()];
    }

    let label_width = matrix
        .surfaces
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max("Surface".len());
    let col_width = matrix
        .rounds
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(4);

    let mut header = format!("{:<label_width$}", "Surface");
    for round in &matrix.rounds {
        header.push_str(&format!(" {round:>col_width$}"));
    }
    let mut lines = vec![
        format!(
            "Win difference ({} - {})",
            report.player_one, report.player_two
        ),
        header,
    ];
    for (surface, row) in matrix.surfaces.iter().zip(&matrix.diff) {
        let mut line = format!("{surface:<label_width$}");
        for v in row {
            line.push_str(&format!(" {v:>+col_width$}"));
        }
        lines.push(line);
    }
    lines
}

pub fn era_label(era: Option<YearRange>) -> String {
    era.map(|r| r.label())
        .unwrap_or_else(|| "the selected range".to_string())
}
