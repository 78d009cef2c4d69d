//! Merge per-category leaderboard lists into one record per player.
//!
//! The leaders endpoints return a separate ranked list for each category. A
//! player near the top of "points" may be missing from "goals", so records
//! are keyed by id and each category only sets its own stat.

use crate::nhl::{LeaderRow, LeadersResponse};
use crate::{GoalieRecord, SkaterRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkaterCategory {
    Points,
    Goals,
    Assists,
}

impl SkaterCategory {
    /// Merge order. Points first so its ordering drives first-seen order.
    pub const ALL: [SkaterCategory; 3] =
        [SkaterCategory::Points, SkaterCategory::Goals, SkaterCategory::Assists];

    /// Query/response key used by the leaders endpoint.
    pub fn key(&self) -> &'static str {
        match self {
            SkaterCategory::Points => "points",
            SkaterCategory::Goals => "goals",
            SkaterCategory::Assists => "assists",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoalieCategory {
    Wins,
    SavePct,
    GoalsAgainstAverage,
}

impl GoalieCategory {
    pub const ALL: [GoalieCategory; 3] = [
        GoalieCategory::Wins,
        GoalieCategory::SavePct,
        GoalieCategory::GoalsAgainstAverage,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            GoalieCategory::Wins => "wins",
            GoalieCategory::SavePct => "savePctg",
            GoalieCategory::GoalsAgainstAverage => "goalsAgainstAverage",
        }
    }
}

/// Leader rows grouped by category.
pub type LeaderCategories<C> = HashMap<C, Vec<LeaderRow>>;

/// Split a combined goalie leaders response into its three categories.
pub fn goalie_categories(raw: &LeadersResponse) -> LeaderCategories<GoalieCategory> {
    GoalieCategory::ALL
        .iter()
        .map(|c| (*c, raw.rows(c.key())))
        .collect()
}

pub fn aggregate_skaters(categories: &LeaderCategories<SkaterCategory>) -> Vec<SkaterRecord> {
    let mut merged = Merged::default();
    for category in SkaterCategory::ALL {
        for row in categories.get(&category).into_iter().flatten() {
            let record = merged.entry(row, new_skater);
            let value = count(row.value);
            match category {
                SkaterCategory::Points => record.season_points = value,
                SkaterCategory::Goals => record.season_goals = value,
                SkaterCategory::Assists => record.season_assists = value,
            }
        }
    }
    merged.records
}

pub fn aggregate_goalies(categories: &LeaderCategories<GoalieCategory>) -> Vec<GoalieRecord> {
    let mut merged = Merged::default();
    for category in GoalieCategory::ALL {
        for row in categories.get(&category).into_iter().flatten() {
            let record = merged.entry(row, new_goalie);
            match category {
                GoalieCategory::Wins => record.season_wins = count(row.value),
                GoalieCategory::SavePct => record.season_save_pct = row.value.unwrap_or_default(),
                GoalieCategory::GoalsAgainstAverage => {
                    record.season_gaa = row.value.unwrap_or_default()
                }
            }
        }
    }
    merged.records
}

/// Insertion-ordered records with an id index.
struct Merged<R> {
    records: Vec<R>,
    index: HashMap<u64, usize>,
}

impl<R> Default for Merged<R> {
    fn default() -> Self {
        Self { records: Vec::new(), index: HashMap::new() }
    }
}

impl<R> Merged<R> {
    fn entry(&mut self, row: &LeaderRow, init: fn(&LeaderRow) -> R) -> &mut R {
        let idx = *self.index.entry(row.id).or_insert_with(|| {
            self.records.push(init(row));
            self.records.len() - 1
        });
        &mut self.records[idx]
    }
}

fn new_skater(row: &LeaderRow) -> SkaterRecord {
    SkaterRecord {
        id: row.id,
        name: row.full_name(),
        team_abbrev: row.team_abbrev.clone().unwrap_or_default(),
        position: row.position.clone().unwrap_or_default(),
        sweater_number: row.sweater_number,
        headshot: row.headshot.clone(),
        team_logo: row.team_logo.clone(),
        ..Default::default()
    }
}

fn new_goalie(row: &LeaderRow) -> GoalieRecord {
    GoalieRecord {
        id: row.id,
        name: row.full_name(),
        team_abbrev: row.team_abbrev.clone().unwrap_or_default(),
        sweater_number: row.sweater_number,
        headshot: row.headshot.clone(),
        team_logo: row.team_logo.clone(),
        ..Default::default()
    }
}

fn count(value: Option<f64>) -> u32 {
    value.map(|v| v.max(0.0).round() as u32).unwrap_or_default()
}
