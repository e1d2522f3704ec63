use std::collections::VecDeque;

use crate::config::AppConfig;
use crate::dataset::LoadedDataset;
use crate::match_record::{MatchStore, YearRange};
use crate::report::{CareerReport, HeadToHeadReport, career_report, head_to_head_report};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Career,
    HeadToHead,
}

/// Which selection the player picker writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerSlot {
    Career,
    PlayerOne,
    PlayerTwo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraEdge {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub screen: Screen,
    pub store: MatchStore,
    pub window: MatchStore,
    pub bounds: Option<YearRange>,
    pub era: Option<YearRange>,
    pub era_edge: EraEdge,
    pub players: Vec<String>,
    pub picker_slot: PickerSlot,
    pub picker_selected: usize,
    pub search: String,
    pub search_active: bool,
    pub career_player: Option<String>,
    pub player_one: Option<String>,
    pub player_two: Option<String>,
    pub career: Option<CareerReport>,
    pub head_to_head: Option<HeadToHeadReport>,
    pub data_label: String,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new(dataset: LoadedDataset, cfg: &AppConfig) -> Self {
        let LoadedDataset { store, summary } = dataset;
        let players = store.players();
        let bounds = store.year_bounds();

        let default_one = pick_default(&players, &cfg.default_player, 0);
        let default_two = pick_default(&players, &cfg.default_opponent, 1);

        let data_label = match summary.source.as_ref() {
            Some(path) if !summary.mock => path.display().to_string(),
            _ => "mock data".to_string(),
        };

        let mut state = Self {
            screen: Screen::Career,
            window: store.clone(),
            store,
            bounds,
            era: bounds,
            era_edge: EraEdge::Start,
            players,
            picker_slot: PickerSlot::Career,
            picker_selected: 0,
            search: String::new(),
            search_active: false,
            career_player: default_one.clone(),
            player_one: default_one,
            player_two: default_two,
            career: None,
            head_to_head: None,
            data_label,
            logs: VecDeque::new(),
            help_overlay: false,
        };

        state.push_log(format!(
            "[INFO] Loaded {} matches, {} players from {}",
            summary.loaded,
            state.players.len(),
            state.data_label
        ));
        if summary.skipped() > 0 {
            state.push_log(format!(
                "[WARN] Skipped {} invalid rows (date {}, players {}, winner {}, malformed {})",
                summary.skipped(),
                summary.skipped_date,
                summary.skipped_players,
                summary.skipped_winner,
                summary.skipped_malformed
            ));
        }
        if summary.missing_category > 0 {
            state.push_log(format!(
                "[WARN] {} matches have no surface or round",
                summary.missing_category
            ));
        }
        state.sync_picker_to_slot();
        state.refresh();
        state
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Recomputes the active view from the current selection.
    pub fn refresh(&mut self) {
        match self.screen {
            Screen::Career => {
                self.head_to_head = None;
                self.career = self
                    .career_player
                    .as_deref()
                    .map(|p| career_report(&self.window, self.era, p));
            }
            Screen::HeadToHead => {
                self.career = None;
                self.head_to_head = match (self.player_one.as_deref(), self.player_two.as_deref()) {
                    (Some(p1), Some(p2)) if p1 != p2 => {
                        Some(head_to_head_report(&self.window, self.era, p1, p2))
                    }
                    _ => None,
                };
            }
        }
    }

    pub fn toggle_screen(&mut self) {
        self.screen = match self.screen {
            Screen::Career => Screen::HeadToHead,
            Screen::HeadToHead => Screen::Career,
        };
        self.picker_slot = match self.screen {
            Screen::Career => PickerSlot::Career,
            Screen::HeadToHead => PickerSlot::PlayerOne,
        };
        self.sync_picker_to_slot();
        self.refresh();
    }

    /// On the head-to-head screen, alternates the picker between both players.
    pub fn cycle_slot(&mut self) {
        self.picker_slot = match self.picker_slot {
            PickerSlot::Career => PickerSlot::Career,
            PickerSlot::PlayerOne => PickerSlot::PlayerTwo,
            PickerSlot::PlayerTwo => PickerSlot::PlayerOne,
        };
        self.sync_picker_to_slot();
    }

    pub fn swap_players(&mut self) {
        std::mem::swap(&mut self.player_one, &mut self.player_two);
        self.refresh();
    }

    pub fn filtered_players(&self) -> Vec<&str> {
        let needle = self.search.trim().to_lowercase();
        self.players
            .iter()
            .map(String::as_str)
            .filter(|p| needle.is_empty() || p.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn select_next(&mut self) {
        let total = self.filtered_players().len();
        if total > 0 {
            self.picker_selected = (self.picker_selected + 1).min(total - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.picker_selected = self.picker_selected.saturating_sub(1);
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.picker_selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.picker_selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.search_active = false;
        self.sync_picker_to_slot();
    }

    /// Assigns the highlighted player to the active slot.
    pub fn pick_selected(&mut self) {
        let Some(name) = self
            .filtered_players()
            .get(self.picker_selected)
            .map(|p| p.to_string())
        else {
            self.push_log("[INFO] No player selected");
            return;
        };

        match self.picker_slot {
            PickerSlot::Career => self.career_player = Some(name.clone()),
            PickerSlot::PlayerOne => self.player_one = Some(name.clone()),
            PickerSlot::PlayerTwo => self.player_two = Some(name.clone()),
        }
        self.search_active = false;

        if self.screen == Screen::HeadToHead && self.player_one == self.player_two {
            self.push_log("[WARN] Select two different players for head-to-head");
        } else {
            self.push_log(format!("[INFO] Selected {name}"));
        }
        self.refresh();
    }

    pub fn selected_name(&self, slot: PickerSlot) -> Option<&str> {
        match slot {
            PickerSlot::Career => self.career_player.as_deref(),
            PickerSlot::PlayerOne => self.player_one.as_deref(),
            PickerSlot::PlayerTwo => self.player_two.as_deref(),
        }
    }

    pub fn toggle_era_edge(&mut self) {
        self.era_edge = match self.era_edge {
            EraEdge::Start => EraEdge::End,
            EraEdge::End => EraEdge::Start,
        };
    }

    /// Moves the active era edge by `delta` years, clamped to the data bounds
    /// and never crossing the other edge.
    pub fn shift_era(&mut self, delta: i32) {
        let (Some(bounds), Some(era)) = (self.bounds, self.era) else {
            return;
        };
        let next = match self.era_edge {
            EraEdge::Start => YearRange {
                start: (era.start + delta).clamp(bounds.start, era.end),
                end: era.end,
            },
            EraEdge::End => YearRange {
                start: era.start,
                end: (era.end + delta).clamp(era.start, bounds.end),
            },
        };
        self.set_era(next);
    }

    pub fn reset_era(&mut self) {
        if let Some(bounds) = self.bounds {
            self.set_era(bounds);
        }
    }

    pub fn set_era(&mut self, era: YearRange) {
        if self.era == Some(era) {
            return;
        }
        self.era = Some(era);
        self.window = self.store.filter_years(era);
        tracing::debug!(start = era.start, end = era.end, matches = self.window.len(), "era changed");
        self.refresh();
    }

    fn sync_picker_to_slot(&mut self) {
        let Some(name) = self.selected_name(self.picker_slot).map(str::to_string) else {
            self.picker_selected = 0;
            return;
        };
        self.picker_selected = self
            .filtered_players()
            .iter()
            .position(|p| *p == name)
            .unwrap_or(0);
    }
}

fn pick_default(players: &[String], preferred: &str, fallback_idx: usize) -> Option<String> {
    if players.iter().any(|p| p == preferred) {
        return Some(preferred.to_string());
    }
    players
        .get(fallback_idx)
        .or_else(|| players.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::pick_default;

    #[test]
    fn pick_default_prefers_configured_name() {
        let players = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(pick_default(&players, "C", 1).as_deref(), Some("C"));
        assert_eq!(pick_default(&players, "Z", 1).as_deref(), Some("B"));
        assert_eq!(pick_default(&players[..1], "Z", 1).as_deref(), Some("A"));
        assert_eq!(pick_default(&[], "Z", 0), None);
    }
}
