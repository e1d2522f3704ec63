use serde::Serialize;

use crate::match_record::{MatchRecord, select_head_to_head};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadToHeadRecord {
    pub player_one: String,
    pub player_two: String,
    pub total_matches: u32,
    pub player_one_wins: u32,
    pub player_two_wins: u32,
    /// Meetings dropped because the winner was neither participant.
    pub excluded: u32,
}

impl HeadToHeadRecord {
    pub fn wins_for(&self, player: &str) -> Option<u32> {
        if player == self.player_one {
            Some(self.player_one_wins)
        } else if player == self.player_two {
            Some(self.player_two_wins)
        } else {
            None
        }
    }

    /// Signed `wins[p1] - wins[p2]`.
    pub fn win_margin(&self) -> i64 {
        i64::from(self.player_one_wins) - i64::from(self.player_two_wins)
    }

    pub fn leader(&self) -> Option<&str> {
        match self.win_margin() {
            m if m > 0 => Some(self.player_one.as_str()),
            m if m < 0 => Some(self.player_two.as_str()),
            _ => None,
        }
    }

    /// "N net wins" annotation for the leading player; nothing on a level record.
    pub fn net_wins_annotation(&self, player: &str) -> Option<String> {
        if self.leader()? != player {
            return None;
        }
        Some(format!("{} net wins", self.win_margin().unsigned_abs()))
    }
}

/// Pairwise record between `p1` and `p2`. `None` when they never met (or when
/// every meeting had a winner outside the pair).
pub fn compute_head_to_head(records: &[MatchRecord], p1: &str, p2: &str) -> Option<HeadToHeadRecord> {
    let meetings = select_head_to_head(records, p1, p2);
    if meetings.is_empty() {
        tracing::debug!(p1, p2, "head-to-head query matched no records");
        return None;
    }

    let mut player_one_wins = 0u32;
    let mut player_two_wins = 0u32;
    let mut excluded = 0u32;
    for r in &meetings {
        if r.won_by(p1) {
            player_one_wins += 1;
        } else if r.won_by(p2) {
            player_two_wins += 1;
        } else {
            excluded += 1;
        }
    }
    if excluded > 0 {
        tracing::warn!(p1, p2, excluded, "dropped meetings with a winner outside the pair");
    }

    let total_matches = player_one_wins + player_two_wins;
    if total_matches == 0 {
        return None;
    }

    Some(HeadToHeadRecord {
        player_one: p1.to_string(),
        player_two: p2.to_string(),
        total_matches,
        player_one_wins,
        player_two_wins,
        excluded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(a: &str, b: &str, winner: &str) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::from_ymd_opt(2015, 6, 1).unwrap(),
            player_a: a.to_string(),
            player_b: b.to_string(),
            winner: winner.to_string(),
            surface: Some("Grass".to_string()),
            round: Some("Quarterfinals".to_string()),
            tournament: None,
        }
    }

    #[test]
    fn annotation_goes_to_leader_only() {
        let records = vec![rec("A", "B", "A"), rec("B", "A", "A"), rec("A", "B", "B")];
        let h2h = compute_head_to_head(&records, "A", "B").unwrap();
        assert_eq!(h2h.net_wins_annotation("A").as_deref(), Some("1 net wins"));
        assert_eq!(h2h.net_wins_annotation("B"), None);
    }

    #[test]
    fn level_record_has_no_annotation() {
        let records = vec![rec("A", "B", "A"), rec("A", "B", "B")];
        let h2h = compute_head_to_head(&records, "B", "A").unwrap();
        assert_eq!(h2h.leader(), None);
        assert_eq!(h2h.net_wins_annotation("A"), None);
        assert_eq!(h2h.net_wins_annotation("B"), None);
    }

    #[test]
    fn only_malformed_meetings_is_empty() {
        let records = vec![rec("A", "B", "C")];
        assert_eq!(compute_head_to_head(&records, "A", "B"), None);
    }

    #[test]
    fn same_player_never_matches() {
        let records = vec![rec("A", "B", "A")];
        assert_eq!(compute_head_to_head(&records, "A", "A"), None);
    }
}
