use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::report::{CareerReport, HeadToHeadReport, era_label};

pub struct ExportReport {
    pub path: PathBuf,
    pub sheets: usize,
    pub rows: usize,
}

/// Writes the current career and/or head-to-head analysis to an xlsx workbook.
pub fn export_analysis(
    path: &Path,
    career: Option<&CareerReport>,
    head_to_head: Option<&HeadToHeadReport>,
) -> Result<ExportReport> {
    let mut sheets: Vec<(&str, Vec<Vec<String>>)> = Vec::new();

    if let Some(report) = career {
        sheets.push(("Career", career_rows(report)));
        sheets.push(("Surfaces", surface_rows(report)));
        sheets.push(("Titles", title_rows(report)));
    }
    if let Some(report) = head_to_head {
        sheets.push(("Head-to-Head", head_to_head_rows(report)));
        sheets.push(("Trend", trend_rows(report)));
        sheets.push(("Matrix", matrix_rows(report)));
    }

    let mut workbook = Workbook::new();
    let mut rows = 0usize;
    for (name, data) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet
            .set_name(*name)
            .with_context(|| format!("name sheet {name}"))?;
        write_rows(sheet, data)?;
        rows += data.len().saturating_sub(1);
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    tracing::info!(path = %path.display(), sheets = sheets.len(), rows, "analysis exported");

    Ok(ExportReport {
        path: path.to_path_buf(),
        sheets: sheets.len(),
        rows,
    })
}

/// File name for an export of the given selection, e.g.
/// `Roger_Federer_vs_Rafael_Nadal_2004-2019.xlsx`.
pub fn export_file_name(players: &[&str], era: &str) -> String {
    let joined = players
        .iter()
        .map(|p| p.replace(' ', "_"))
        .collect::<Vec<_>>()
        .join("_vs_");
    format!("{joined}_{}.xlsx", era.replace(' ', "_"))
}

fn career_rows(report: &CareerReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "Era".to_string(),
        "Matches".to_string(),
        "Wins".to_string(),
        "Losses".to_string(),
        "Win Rate %".to_string(),
        "Titles".to_string(),
        "Favourite Surface".to_string(),
    ]];
    if let Some(stats) = report.stats.as_ref() {
        rows.push(vec![
            stats.player.clone(),
            era_label(report.era),
            stats.total_matches.to_string(),
            stats.total_wins.to_string(),
            stats.total_losses().to_string(),
            format!("{:.2}", stats.win_rate),
            stats.total_titles().to_string(),
            stats.favorite_surface().unwrap_or_default().to_string(),
        ]);
    }
    rows
}

fn surface_rows(report: &CareerReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Surface".to_string(),
        "Matches".to_string(),
        "Wins".to_string(),
        "Win Rate %".to_string(),
    ]];
    if let Some(stats) = report.stats.as_ref() {
        for s in &stats.surface_breakdown {
            rows.push(vec![
                s.surface.clone(),
                s.matches.to_string(),
                s.wins.to_string(),
                format!("{:.2}", s.win_rate),
            ]);
        }
    }
    rows
}

fn title_rows(report: &CareerReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec!["Year".to_string(), "Titles".to_string()]];
    if let Some(stats) = report.stats.as_ref() {
        for y in &stats.titles_by_year {
            rows.push(vec![y.year.to_string(), y.titles.to_string()]);
        }
    }
    rows
}

fn head_to_head_rows(report: &HeadToHeadReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Player".to_string(),
        "Wins".to_string(),
        "Net Wins".to_string(),
    ]];
    let Some(record) = report.record.as_ref() else {
        return rows;
    };
    for player in [&record.player_one, &record.player_two] {
        rows.push(vec![
            player.clone(),
            record.wins_for(player).unwrap_or(0).to_string(),
            record.net_wins_annotation(player).unwrap_or_default(),
        ]);
    }
    rows.push(vec![
        "Total".to_string(),
        record.total_matches.to_string(),
        String::new(),
    ]);
    rows
}

fn trend_rows(report: &HeadToHeadReport) -> Vec<Vec<String>> {
    let mut rows = vec![vec![
        "Match".to_string(),
        "Date".to_string(),
        report.player_one.clone(),
        report.player_two.clone(),
    ]];
    for p in &report.trend.points {
        rows.push(vec![
            p.match_number.to_string(),
            p.date.format("%Y-%m-%d").to_string(),
            p.player_one_wins.to_string(),
            p.player_two_wins.to_string(),
        ]);
    }
    rows
}

fn matrix_rows(report: &HeadToHeadReport) -> Vec<Vec<String>> {
    if let Some(err) = report.matrix_error.as_ref() {
        return vec![vec!["Unavailable".to_string()], vec![err.to_string()]];
    }
    let Some(matrix) = report.matrix.as_ref() else {
        return vec![vec!["Surface".to_string()]];
    };
    let mut header = vec!["Surface".to_string()];
    header.extend(matrix.rounds.iter().cloned());
    let mut rows = vec![header];
    for (surface, diffs) in matrix.surfaces.iter().zip(&matrix.diff) {
        let mut row = vec![surface.clone()];
        row.extend(diffs.iter().map(|v| v.to_string()));
        rows.push(row);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .context("write xlsx cell")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::export_file_name;

    #[test]
    fn export_file_name_joins_players() {
        assert_eq!(
            export_file_name(&["Roger Federer", "Rafael Nadal"], "2004-2019"),
            "Roger_Federer_vs_Rafael_Nadal_2004-2019.xlsx"
        );
        assert_eq!(export_file_name(&["Andy Murray"], "2012"), "Andy_Murray_2012.xlsx");
    }
}
