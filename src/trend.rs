use chrono::NaiveDate;
use serde::Serialize;

use crate::match_record::MatchRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// 1-indexed position in date order.
    pub match_number: u32,
    pub date: NaiveDate,
    pub player_one_wins: u32,
    pub player_two_wins: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CumulativeTrendSeries {
    pub player_one: String,
    pub player_two: String,
    pub points: Vec<TrendPoint>,
}

impl CumulativeTrendSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TrendPoint> {
        self.points.last()
    }

    /// `(match_number, wins)` pairs for plotting one player's line.
    pub fn player_one_line(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (f64::from(p.match_number), f64::from(p.player_one_wins)))
            .collect()
    }

    pub fn player_two_line(&self) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|p| (f64::from(p.match_number), f64::from(p.player_two_wins)))
            .collect()
    }
}

/// Running win counts for `p1` and `p2` over their meetings, one point per
/// match in ascending date order. Same-day meetings keep their input order.
pub fn compute_cumulative_trend(
    meetings: &[&MatchRecord],
    p1: &str,
    p2: &str,
) -> CumulativeTrendSeries {
    let mut ordered: Vec<&MatchRecord> = meetings
        .iter()
        .copied()
        .filter(|r| r.is_meeting_of(p1, p2) && (r.won_by(p1) || r.won_by(p2)))
        .collect();
    ordered.sort_by_key(|r| r.date);

    let mut p1_wins = 0u32;
    let mut p2_wins = 0u32;
    let mut points = Vec::with_capacity(ordered.len());
    for (idx, r) in ordered.iter().enumerate() {
        if r.won_by(p1) {
            p1_wins += 1;
        } else {
            p2_wins += 1;
        }
        points.push(TrendPoint {
            match_number: idx as u32 + 1,
            date: r.date,
            player_one_wins: p1_wins,
            player_two_wins: p2_wins,
        });
    }

    CumulativeTrendSeries {
        player_one: p1.to_string(),
        player_two: p2.to_string(),
        points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(y: i32, m: u32, d: u32, winner: &str) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            player_a: "A".to_string(),
            player_b: "B".to_string(),
            winner: winner.to_string(),
            surface: None,
            round: None,
            tournament: None,
        }
    }

    #[test]
    fn same_day_meetings_keep_input_order() {
        let records = [rec(2014, 3, 1, "B"), rec(2014, 3, 1, "A"), rec(2013, 1, 1, "A")];
        let refs: Vec<&MatchRecord> = records.iter().collect();
        let trend = compute_cumulative_trend(&refs, "A", "B");
        let snapshot: Vec<(u32, u32)> = trend
            .points
            .iter()
            .map(|p| (p.player_one_wins, p.player_two_wins))
            .collect();
        assert_eq!(snapshot, vec![(1, 0), (1, 1), (2, 1)]);
    }

    #[test]
    fn empty_input_is_empty_series() {
        let trend = compute_cumulative_trend(&[], "A", "B");
        assert!(trend.is_empty());
        assert!(trend.player_one_line().is_empty());
    }

    #[test]
    fn lines_are_indexed_by_match_number() {
        let records = [rec(2014, 3, 1, "B"), rec(2015, 3, 1, "A")];
        let refs: Vec<&MatchRecord> = records.iter().collect();
        let trend = compute_cumulative_trend(&refs, "A", "B");
        assert_eq!(trend.player_one_line(), vec![(1.0, 0.0), (2.0, 1.0)]);
        assert_eq!(trend.player_two_line(), vec![(1.0, 1.0), (2.0, 1.0)]);
    }
}
