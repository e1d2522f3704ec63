use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::EngineError;
use crate::match_record::MatchRecord;

/// Sparse `(surface, round) -> wins` grouping for one player.
pub type SurfaceRoundCounts = BTreeMap<(String, String), u32>;

/// Dense, jointly indexed view of two players' surface/round win counts.
/// Rows follow `surfaces`, columns follow `rounds`; every cell of the grid is
/// present, including cells where both players have zero wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffMatrix {
    pub surfaces: Vec<String>,
    pub rounds: Vec<String>,
    pub left: Vec<Vec<u32>>,
    pub right: Vec<Vec<u32>>,
    pub diff: Vec<Vec<i64>>,
}

impl DiffMatrix {
    pub fn dims(&self) -> (usize, usize) {
        (self.surfaces.len(), self.rounds.len())
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty() || self.rounds.is_empty()
    }

    pub fn get(&self, surface: &str, round: &str) -> Option<i64> {
        let row = self.surfaces.iter().position(|s| s == surface)?;
        let col = self.rounds.iter().position(|r| r == round)?;
        Some(self.diff[row][col])
    }

    /// Largest absolute cell value, used to scale heat colours.
    pub fn max_abs(&self) -> i64 {
        self.diff
            .iter()
            .flatten()
            .map(|v| v.abs())
            .max()
            .unwrap_or(0)
    }
}

/// Per-player surface/round win counts over a head-to-head subset.
///
/// Refuses to run when any record lacks a surface or round: dropping those
/// rows would quietly change the win difference.
pub fn surface_round_counts(
    meetings: &[&MatchRecord],
    p1: &str,
    p2: &str,
) -> Result<(SurfaceRoundCounts, SurfaceRoundCounts), EngineError> {
    let missing_surface = meetings.iter().filter(|r| r.surface.is_none()).count();
    let missing_round = meetings.iter().filter(|r| r.round.is_none()).count();
    if missing_surface > 0 || missing_round > 0 {
        tracing::warn!(p1, p2, missing_surface, missing_round, "surface/round grid refused");
        return Err(EngineError::IncompleteCategoryData {
            missing_surface,
            missing_round,
        });
    }

    let mut left = SurfaceRoundCounts::new();
    let mut right = SurfaceRoundCounts::new();
    for r in meetings {
        let (Some(surface), Some(round)) = (r.surface.as_ref(), r.round.as_ref()) else {
            continue;
        };
        let target = if r.won_by(p1) {
            &mut left
        } else if r.won_by(p2) {
            &mut right
        } else {
            continue;
        };
        *target.entry((surface.clone(), round.clone())).or_insert(0) += 1;
    }
    Ok((left, right))
}

/// Aligns two sparse groupings on the sorted union of their surfaces and
/// rounds, zero-fills absent cells and subtracts `b` from `a`.
pub fn align_and_diff(a: &SurfaceRoundCounts, b: &SurfaceRoundCounts) -> DiffMatrix {
    let surfaces: Vec<String> = a
        .keys()
        .chain(b.keys())
        .map(|(s, _)| s.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let rounds: Vec<String> = a
        .keys()
        .chain(b.keys())
        .map(|(_, r)| r.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let left = densify(a, &surfaces, &rounds);
    let right = densify(b, &surfaces, &rounds);
    let diff = left
        .iter()
        .zip(&right)
        .map(|(row_a, row_b)| {
            row_a
                .iter()
                .zip(row_b)
                .map(|(x, y)| i64::from(*x) - i64::from(*y))
                .collect()
        })
        .collect();

    DiffMatrix {
        surfaces,
        rounds,
        left,
        right,
        diff,
    }
}

/// Head-to-head win-difference grid for `p1` minus `p2`.
pub fn head_to_head_diff(
    meetings: &[&MatchRecord],
    p1: &str,
    p2: &str,
) -> Result<DiffMatrix, EngineError> {
    let (left, right) = surface_round_counts(meetings, p1, p2)?;
    Ok(align_and_diff(&left, &right))
}

fn densify(counts: &SurfaceRoundCounts, surfaces: &[String], rounds: &[String]) -> Vec<Vec<u32>> {
    surfaces
        .iter()
        .map(|s| {
            rounds
                .iter()
                .map(|r| counts.get(&(s.clone(), r.clone())).copied().unwrap_or(0))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(items: &[(&str, &str, u32)]) -> SurfaceRoundCounts {
        items
            .iter()
            .map(|(s, r, n)| ((s.to_string(), r.to_string()), *n))
            .collect()
    }

    #[test]
    fn empty_side_contributes_zero_rows() {
        let a = counts(&[("Clay", "F", 2), ("Hard", "SF", 1)]);
        let b = SurfaceRoundCounts::new();
        let m = align_and_diff(&a, &b);
        assert_eq!(m.dims(), (2, 2));
        assert_eq!(m.right, vec![vec![0, 0], vec![0, 0]]);
        assert_eq!(m.diff, vec![vec![2, 0], vec![0, 1]]);
    }

    #[test]
    fn both_empty_gives_empty_grid() {
        let m = align_and_diff(&SurfaceRoundCounts::new(), &SurfaceRoundCounts::new());
        assert!(m.is_empty());
        assert_eq!(m.max_abs(), 0);
    }

    #[test]
    fn lookup_by_labels() {
        let a = counts(&[("Grass", "QF", 3)]);
        let b = counts(&[("Grass", "QF", 5), ("Clay", "R16", 1)]);
        let m = align_and_diff(&a, &b);
        assert_eq!(m.get("Grass", "QF"), Some(-2));
        assert_eq!(m.get("Clay", "QF"), Some(0));
        assert_eq!(m.get("Carpet", "QF"), None);
        assert_eq!(m.max_abs(), 2);
    }
}
