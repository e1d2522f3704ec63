use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::match_record::{MatchRecord, select_player};

pub const UNKNOWN_SURFACE: &str = "Unknown";

const FINAL_ROUNDS: &[&str] = &["the final", "final", "f"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceWins {
    pub surface: String,
    pub wins: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceBreakdown {
    pub surface: String,
    pub matches: u32,
    pub wins: u32,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTitles {
    pub year: i32,
    pub titles: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerCareerStats {
    pub player: String,
    pub total_matches: u32,
    pub total_wins: u32,
    /// Percentage in `[0, 100]`.
    pub win_rate: f64,
    /// Surfaces with at least one win, most wins first.
    pub wins_by_surface: Vec<SurfaceWins>,
    /// Every surface the player appeared on, highest win rate first.
    pub surface_breakdown: Vec<SurfaceBreakdown>,
    pub titles_by_year: Vec<YearTitles>,
}

impl PlayerCareerStats {
    pub fn total_losses(&self) -> u32 {
        self.total_matches - self.total_wins
    }

    pub fn favorite_surface(&self) -> Option<&str> {
        self.surface_breakdown.first().map(|s| s.surface.as_str())
    }

    pub fn total_titles(&self) -> u32 {
        self.titles_by_year.iter().map(|y| y.titles).sum()
    }
}

/// Career totals for `player` over `records`. `None` when the player has no
/// matches in the given records.
pub fn compute_career_stats(records: &[MatchRecord], player: &str) -> Option<PlayerCareerStats> {
    let played = select_player(records, player);
    if played.is_empty() {
        tracing::debug!(player, "career query matched no records");
        return None;
    }

    let total_matches = played.len() as u32;
    let total_wins = played.iter().filter(|r| r.won_by(player)).count() as u32;

    let mut surfaces: HashMap<&str, (u32, u32)> = HashMap::new();
    let mut titles: BTreeMap<i32, u32> = BTreeMap::new();
    for r in &played {
        let surface = r.surface.as_deref().unwrap_or(UNKNOWN_SURFACE);
        let entry = surfaces.entry(surface).or_insert((0, 0));
        entry.0 += 1;
        if r.won_by(player) {
            entry.1 += 1;
            if r.round.as_deref().is_some_and(is_final_round) {
                *titles.entry(r.year()).or_insert(0) += 1;
            }
        }
    }

    let mut wins_by_surface: Vec<SurfaceWins> = surfaces
        .iter()
        .filter(|(_, (_, wins))| *wins > 0)
        .map(|(surface, (_, wins))| SurfaceWins {
            surface: surface.to_string(),
            wins: *wins,
        })
        .collect();
    wins_by_surface.sort_by(|a, b| b.wins.cmp(&a.wins).then_with(|| a.surface.cmp(&b.surface)));

    let mut surface_breakdown: Vec<SurfaceBreakdown> = surfaces
        .iter()
        .map(|(surface, (matches, wins))| SurfaceBreakdown {
            surface: surface.to_string(),
            matches: *matches,
            wins: *wins,
            win_rate: win_rate(*wins, *matches),
        })
        .collect();
    surface_breakdown.sort_by(|a, b| {
        b.win_rate
            .total_cmp(&a.win_rate)
            .then_with(|| a.surface.cmp(&b.surface))
    });

    let titles_by_year = titles
        .into_iter()
        .map(|(year, titles)| YearTitles { year, titles })
        .collect();

    Some(PlayerCareerStats {
        player: player.to_string(),
        total_matches,
        total_wins,
        win_rate: win_rate(total_wins, total_matches),
        wins_by_surface,
        surface_breakdown,
        titles_by_year,
    })
}

pub fn win_rate(wins: u32, matches: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    100.0 * f64::from(wins) / f64::from(matches)
}

pub fn is_final_round(round: &str) -> bool {
    let r = round.trim().to_ascii_lowercase();
    FINAL_ROUNDS.contains(&r.as_str())
}
