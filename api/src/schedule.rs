//! One club's upcoming week and what to show for it right now.

use crate::detail::{str_at, u32_at, u8_at};
use crate::form::game_date;
use crate::nhl::{ClubScheduleResponse, ScheduleGame};
use crate::GameState;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::Value;

/// How long after puck drop a finished game is still worth a recap.
const RECAP_WINDOW_HOURS: i64 = 12;
const WEEK_DAYS: i64 = 7;

/// A scheduled game from the focus club's side.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusGame {
    pub id: u64,
    pub date: NaiveDate,
    pub start: Option<DateTime<Utc>>,
    pub state: GameState,
    pub opponent: String,
    pub is_home: bool,
    pub team_score: Option<u32>,
    pub opp_score: Option<u32>,
}

impl FocusGame {
    /// "vs CGY" at home, "@ VAN" on the road.
    pub fn matchup(&self) -> String {
        if self.is_home {
            format!("vs {}", self.opponent)
        } else {
            format!("@ {}", self.opponent)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FocusStatus {
    Live(FocusGame),
    Recap(FocusGame),
    Preview(FocusGame),
    None,
}

impl FocusStatus {
    pub fn game(&self) -> Option<&FocusGame> {
        match self {
            FocusStatus::Live(g) | FocusStatus::Recap(g) | FocusStatus::Preview(g) => Some(g),
            FocusStatus::None => None,
        }
    }
}

/// Every dated game on the club schedule, in schedule order.
pub fn focus_games(schedule: &ClubScheduleResponse, team: &str) -> Vec<FocusGame> {
    schedule
        .games
        .iter()
        .filter_map(|g| focus_game(g, team))
        .collect()
}

/// Games dated from `today` through `today + 7 days`, inclusive.
pub fn week_ahead(schedule: &ClubScheduleResponse, team: &str, today: NaiveDate) -> Vec<FocusGame> {
    let end = today + Duration::days(WEEK_DAYS);
    focus_games(schedule, team)
        .into_iter()
        .filter(|g| g.date >= today && g.date <= end)
        .collect()
}

/// A live game wins, then a game finished within the recap window, then the
/// next upcoming game.
pub fn focus_status(games: &[FocusGame], now: DateTime<Utc>) -> FocusStatus {
    if let Some(live) = games.iter().find(|g| g.state.is_live()) {
        return FocusStatus::Live(live.clone());
    }

    let recap_cutoff = now - Duration::hours(RECAP_WINDOW_HOURS);
    if let Some(done) = games
        .iter()
        .filter(|g| g.state.is_complete())
        .filter(|g| g.start.is_some_and(|s| s >= recap_cutoff && s <= now))
        .max_by_key(|g| g.start)
    {
        return FocusStatus::Recap(done.clone());
    }

    games
        .iter()
        .filter(|g| g.state.is_upcoming())
        .min_by_key(|g| (g.date, g.start))
        .map(|g| FocusStatus::Preview(g.clone()))
        .unwrap_or(FocusStatus::None)
}

/// Score, period and clock read from a gamecenter landing payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveSnapshot {
    pub state: GameState,
    pub home_abbrev: String,
    pub away_abbrev: String,
    pub home_score: u32,
    pub away_score: u32,
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub in_intermission: bool,
}

/// Missing fields read as zero or absent; the landing payload is large and
/// only a handful of keys matter here.
pub fn live_snapshot(landing: &Value) -> LiveSnapshot {
    LiveSnapshot {
        state: str_at(landing, "/gameState")
            .as_deref()
            .map(GameState::parse)
            .unwrap_or(GameState::Other),
        home_abbrev: str_at(landing, "/homeTeam/abbrev").unwrap_or_default(),
        away_abbrev: str_at(landing, "/awayTeam/abbrev").unwrap_or_default(),
        home_score: u32_at(landing, "/homeTeam/score").unwrap_or(0),
        away_score: u32_at(landing, "/awayTeam/score").unwrap_or(0),
        period: u8_at(landing, "/periodDescriptor/number"),
        clock: str_at(landing, "/clock/timeRemaining"),
        in_intermission: landing
            .pointer("/clock/inIntermission")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    }
}

fn focus_game(game: &ScheduleGame, team: &str) -> Option<FocusGame> {
    let date = game_date(game)?;
    let home = game.home_team.clone().unwrap_or_default();
    let away = game.away_team.clone().unwrap_or_default();
    let is_home = home.abbrev.as_deref() == Some(team);
    let (us, them) = if is_home { (home, away) } else { (away, home) };

    Some(FocusGame {
        id: game.id,
        date,
        start: game
            .start_time_utc
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|d| d.with_timezone(&Utc)),
        state: game.game_state.as_deref().map(GameState::parse).unwrap_or(GameState::Other),
        opponent: them.abbrev.unwrap_or_default(),
        is_home,
        team_score: us.score,
        opp_score: them.score,
    })
}
