use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub player_a: String,
    pub player_b: String,
    pub winner: String,
    pub surface: Option<String>,
    pub round: Option<String>,
    pub tournament: Option<String>,
}

impl MatchRecord {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn involves(&self, player: &str) -> bool {
        self.player_a == player || self.player_b == player
    }

    /// True when the two participants are `p1` and `p2`, in either order.
    pub fn is_meeting_of(&self, p1: &str, p2: &str) -> bool {
        (self.player_a == p1 && self.player_b == p2) || (self.player_a == p2 && self.player_b == p1)
    }

    pub fn won_by(&self, player: &str) -> bool {
        self.winner == player
    }

    pub fn has_valid_winner(&self) -> bool {
        self.winner == self.player_a || self.winner == self.player_b
    }

    pub fn loser(&self) -> Option<&str> {
        if self.winner == self.player_a {
            Some(self.player_b.as_str())
        } else if self.winner == self.player_b {
            Some(self.player_a.as_str())
        } else {
            None
        }
    }
}

/// Inclusive calendar-year window used to pre-filter the store (an "era").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn new(start: i32, end: i32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        year >= self.start && year <= self.end
    }

    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{}-{}", self.start, self.end)
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchStore {
    records: Vec<MatchRecord>,
}

impl MatchStore {
    pub fn new(records: Vec<MatchRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted, de-duplicated names from both participant columns.
    pub fn players(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .records
            .iter()
            .flat_map(|r| [r.player_a.as_str(), r.player_b.as_str()])
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn year_bounds(&self) -> Option<YearRange> {
        let min = self.records.iter().map(MatchRecord::year).min()?;
        let max = self.records.iter().map(MatchRecord::year).max()?;
        Some(YearRange::new(min, max))
    }

    /// Fresh snapshot holding only the records played inside `range`.
    /// Input record order is preserved.
    pub fn filter_years(&self, range: YearRange) -> MatchStore {
        let records = self
            .records
            .iter()
            .filter(|r| range.contains(r.year()))
            .cloned()
            .collect();
        MatchStore { records }
    }
}

pub fn select_player<'a>(records: &'a [MatchRecord], player: &str) -> Vec<&'a MatchRecord> {
    records.iter().filter(|r| r.involves(player)).collect()
}

/// Head-to-head subset for the unordered pair `{p1, p2}`, in input order.
pub fn select_head_to_head<'a>(
    records: &'a [MatchRecord],
    p1: &str,
    p2: &str,
) -> Vec<&'a MatchRecord> {
    records.iter().filter(|r| r.is_meeting_of(p1, p2)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, a: &str, b: &str, winner: &str) -> MatchRecord {
        MatchRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            player_a: a.to_string(),
            player_b: b.to_string(),
            winner: winner.to_string(),
            surface: Some("Hard".to_string()),
            round: Some("1st Round".to_string()),
            tournament: None,
        }
    }

    #[test]
    fn meeting_is_order_independent() {
        let r = rec("2010-05-01", "X", "Y", "X");
        assert!(r.is_meeting_of("X", "Y"));
        assert!(r.is_meeting_of("Y", "X"));
        assert!(!r.is_meeting_of("X", "Z"));
        assert_eq!(r.loser(), Some("Y"));
    }

    #[test]
    fn filter_years_is_inclusive_and_keeps_order() {
        let store = MatchStore::new(vec![
            rec("2008-01-01", "A", "B", "A"),
            rec("2010-06-01", "C", "D", "D"),
            rec("2009-03-01", "A", "C", "C"),
            rec("2011-01-01", "B", "D", "B"),
        ]);
        let era = store.filter_years(YearRange::new(2009, 2010));
        let years: Vec<i32> = era.records().iter().map(MatchRecord::year).collect();
        assert_eq!(years, vec![2010, 2009]);
        assert_eq!(store.year_bounds(), Some(YearRange::new(2008, 2011)));
    }

    #[test]
    fn players_are_sorted_and_unique() {
        let store = MatchStore::new(vec![
            rec("2008-01-01", "Zed", "Amy", "Amy"),
            rec("2008-01-02", "Amy", "Bob", "Bob"),
        ]);
        assert_eq!(store.players(), vec!["Amy", "Bob", "Zed"]);
    }

    #[test]
    fn year_range_swaps_reversed_bounds() {
        let range = YearRange::new(2015, 2012);
        assert_eq!(range.start, 2012);
        assert_eq!(range.end, 2015);
        assert_eq!(range.label(), "2012-2015");
    }
}
