pub mod aggregate;
pub mod cache;
pub mod client;
pub mod detail;
pub mod form;
pub mod nhl;
pub mod ranking;
pub mod schedule;
pub mod score;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Domain types, independent of the NHL wire format
// ---------------------------------------------------------------------------

/// A skater merged from the points/goals/assists leaderboards, optionally
/// enriched with recent form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkaterRecord {
    pub id: u64,
    pub name: String,
    pub team_abbrev: String,
    pub position: String, // "C", "L", "R", "D"
    pub sweater_number: Option<u32>,
    pub headshot: Option<String>,
    pub team_logo: Option<String>,
    pub season_goals: u32,
    pub season_assists: u32,
    pub season_points: u32,
    pub recent_stats: Option<RecentSkaterStats>,
    pub recent_points_per_game: f64,
}

/// A goalie merged from the wins/savePctg/goalsAgainstAverage leaderboards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalieRecord {
    pub id: u64,
    pub name: String,
    pub team_abbrev: String,
    pub sweater_number: Option<u32>,
    pub headshot: Option<String>,
    pub team_logo: Option<String>,
    pub season_wins: u32,
    pub season_save_pct: f64,
    pub season_gaa: f64,
    pub recent_stats: Option<RecentGoalieStats>,
    pub hotness_score: f64,
}

/// Season standing for one club, mapped from a standings snapshot row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStanding {
    pub abbrev: String,
    pub name: String,
    pub common_name: String,
    pub logo: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub points: u32,
    pub games_played: u32,
    pub goal_for: i32,
    pub goal_against: i32,
    pub goal_differential: i32,
    pub streak_code: Option<String>,
    pub streak_count: Option<u32>,
    pub l10_wins: u32,
    pub l10_losses: u32,
    pub l10_ot_losses: u32,
    pub division_name: Option<String>,
    pub conference_name: Option<String>,
}

impl TeamStanding {
    pub fn win_pct(&self) -> f64 {
        if self.games_played > 0 {
            f64::from(self.wins) / f64::from(self.games_played)
        } else {
            0.0
        }
    }

    /// Share of available standings points earned (two per game played).
    pub fn point_pct(&self) -> f64 {
        if self.games_played > 0 {
            f64::from(self.points) / f64::from(self.games_played * 2)
        } else {
            0.0
        }
    }

    /// "10-5-1"
    pub fn record(&self) -> String {
        format!("{}-{}-{}", self.wins, self.losses, self.ot_losses)
    }
}

/// A club ranked by recent momentum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRecord {
    pub id: String, // team abbreviation, e.g. "EDM"
    pub name: String,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub points: u32,
    pub games_played: u32,
    pub standing: TeamStanding,
    pub recent_games: Vec<GameResult>,
    pub recent_wins: u32,
    pub recent_losses: u32,
    pub recent_goals_for: i64,
    pub recent_goals_against: i64,
    pub recent_goal_diff: i64,
    pub recent_win_pct: f64,
    pub recent_gd_per_game: f64,
    pub hotness_score: f64,
    pub recent_record: String, // "7-3"
}

/// Counting stats summed over a skater's recent window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecentSkaterStats {
    pub goals: i64,
    pub assists: i64,
    pub points: i64,
    pub plus_minus: i64,
    pub shots: i64,
    pub games: u32,
}

/// Goalie window sums plus the three derived rates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecentGoalieStats {
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub ot_losses: u32,
    pub shots_against: i64,
    pub goals_against: i64,
    /// Signed: upstream occasionally reports more goals than shots.
    pub saves: i64,
    pub shutouts: i64,
    pub save_pct: f64,
    pub gaa: f64,
    pub win_pct: f64,
}

/// One completed game from a club's point of view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameResult {
    pub date: String, // "2025-01-14"
    pub opponent: String,
    pub team_score: u32,
    pub opp_score: u32,
    pub is_win: bool,
    pub is_home: bool,
    pub game_id: u64,
}

/// Upstream game state codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameState {
    #[default]
    Future, // FUT
    Pregame, // PRE
    Live,    // LIVE
    Critical, // CRIT: late in a close game
    Off,     // OFF: final, stats official
    Final,   // FINAL
    Other,
}

impl GameState {
    pub fn parse(code: &str) -> Self {
        match code {
            "FUT" => GameState::Future,
            "PRE" => GameState::Pregame,
            "LIVE" => GameState::Live,
            "CRIT" => GameState::Critical,
            "OFF" => GameState::Off,
            "FINAL" => GameState::Final,
            _ => GameState::Other,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, GameState::Live | GameState::Critical)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, GameState::Off | GameState::Final)
    }

    pub fn is_upcoming(&self) -> bool {
        matches!(self, GameState::Future | GameState::Pregame)
    }

    pub fn label(&self) -> &'static str {
        match self {
            GameState::Future => "FUT",
            GameState::Pregame => "PRE",
            GameState::Live => "LIVE",
            GameState::Critical => "CRIT",
            GameState::Off => "OFF",
            GameState::Final => "FINAL",
            GameState::Other => "?",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodayTeam {
    pub abbrev: String,
    pub name: String,
    pub logo: Option<String>,
    pub score: Option<u32>,
    pub record: Option<String>,
}

/// A game on today's league schedule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodayGame {
    pub id: u64,
    pub start_time: Option<String>,
    pub state: GameState,
    pub period: Option<u8>,
    pub period_type: Option<String>,
    pub clock: Option<String>,
    pub home: TodayTeam,
    pub away: TodayTeam,
}

/// A player hit from the search index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerSearchResult {
    pub player_id: String,
    pub name: String,
    pub team_abbrev: Option<String>,
    pub position_code: Option<String>,
    pub sweater_number: Option<String>,
    pub active: bool,
    pub headshot: Option<String>,
}

/// Season identifier such as "20252026". The season rolls over in October:
/// from October onward the reference year starts the season, before it the
/// previous year does.
pub fn season_label(reference: NaiveDate) -> String {
    let start = if reference.month0() >= 9 {
        reference.year()
    } else {
        reference.year() - 1
    };
    format!("{}{}", start, start + 1)
}
