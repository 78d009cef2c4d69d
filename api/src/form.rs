//! Recent-form reduction: fold the last N games into window totals and rates.

use crate::nhl::{ClubScheduleResponse, GameLogEntry, ScheduleGame};
use crate::{GameResult, GameState, RecentGoalieStats, RecentSkaterStats};
use chrono::NaiveDate;

/// Sum a skater's first `window` log entries. Logs arrive most-recent-first;
/// a shorter log is used whole. Absent fields count as zero.
pub fn reduce_skater(game_log: &[GameLogEntry], window: usize) -> RecentSkaterStats {
    game_log
        .iter()
        .take(window)
        .fold(RecentSkaterStats::default(), |mut acc, game| {
            acc.goals += game.goals.unwrap_or(0);
            acc.assists += game.assists.unwrap_or(0);
            acc.points += game.points.unwrap_or(0);
            acc.plus_minus += game.plus_minus.unwrap_or(0);
            acc.shots += game.shots.unwrap_or(0);
            acc.games += 1;
            acc
        })
}

pub fn points_per_game(stats: &RecentSkaterStats) -> f64 {
    if stats.games > 0 {
        stats.points as f64 / f64::from(stats.games)
    } else {
        0.0
    }
}

/// Sum a goalie's first `window` log entries and derive save %, GAA and win %.
///
/// Saves are `shots_against - goals_against` per game and are not clamped, so
/// a bad upstream row with more goals than shots lowers the total.
pub fn reduce_goalie(game_log: &[GameLogEntry], window: usize) -> RecentGoalieStats {
    let mut stats = game_log
        .iter()
        .take(window)
        .fold(RecentGoalieStats::default(), |mut acc, game| {
            let shots = game.shots_against.unwrap_or(0);
            let goals = game.goals_against.unwrap_or(0);
            acc.games_played += 1;
            match game.decision.as_deref() {
                Some("W") => acc.wins += 1,
                Some("L") => acc.losses += 1,
                Some("O") => acc.ot_losses += 1,
                _ => {}
            }
            acc.shots_against += shots;
            acc.goals_against += goals;
            acc.saves += shots - goals;
            acc.shutouts += game.shutouts.unwrap_or(0);
            acc
        });

    if stats.shots_against > 0 {
        stats.save_pct = stats.saves as f64 / stats.shots_against as f64;
    }
    if stats.games_played > 0 {
        let gp = f64::from(stats.games_played);
        stats.gaa = stats.goals_against as f64 / gp;
        stats.win_pct = f64::from(stats.wins) / gp;
    }
    stats
}

/// A club's record over its recent games.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecentTeamForm {
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_diff: i64,
    pub win_pct: f64,
    pub gd_per_game: f64,
}

impl RecentTeamForm {
    /// "7-3"
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// Any game that isn't a win counts as a loss, overtime included.
pub fn reduce_team(games: &[GameResult]) -> RecentTeamForm {
    let mut form = RecentTeamForm::default();
    for game in games {
        form.games += 1;
        if game.is_win {
            form.wins += 1;
        }
        form.goals_for += i64::from(game.team_score);
        form.goals_against += i64::from(game.opp_score);
    }
    form.losses = form.games - form.wins;
    form.goal_diff = form.goals_for - form.goals_against;
    if form.games > 0 {
        let n = f64::from(form.games);
        form.win_pct = f64::from(form.wins) / n;
        form.gd_per_game = form.goal_diff as f64 / n;
    }
    form
}

/// The last `limit` completed games (OFF/FINAL) played on or before `today`,
/// in schedule order, seen from `team`'s side.
pub fn recent_results(
    schedule: &ClubScheduleResponse,
    team: &str,
    limit: usize,
    today: NaiveDate,
) -> Vec<GameResult> {
    let completed: Vec<&ScheduleGame> = schedule
        .games
        .iter()
        .filter(|g| g.game_state.as_deref().map(GameState::parse).is_some_and(|s| s.is_complete()))
        .filter(|g| game_date(g).is_some_and(|d| d <= today))
        .collect();

    let skip = completed.len().saturating_sub(limit);
    completed
        .into_iter()
        .skip(skip)
        .map(|g| game_result(g, team))
        .collect()
}

pub(crate) fn game_date(game: &ScheduleGame) -> Option<NaiveDate> {
    game.game_date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
}

fn game_result(game: &ScheduleGame, team: &str) -> GameResult {
    let home = game.home_team.clone().unwrap_or_default();
    let away = game.away_team.clone().unwrap_or_default();
    let is_home = home.abbrev.as_deref() == Some(team);
    let (us, them) = if is_home { (home, away) } else { (away, home) };
    let team_score = us.score.unwrap_or(0);
    let opp_score = them.score.unwrap_or(0);

    GameResult {
        date: game.game_date.clone().unwrap_or_default(),
        opponent: them.abbrev.unwrap_or_default(),
        team_score,
        opp_score,
        is_win: team_score > opp_score,
        is_home,
        game_id: game.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skater_game(goals: i64, assists: i64) -> GameLogEntry {
        GameLogEntry {
            goals: Some(goals),
            assists: Some(assists),
            points: Some(goals + assists),
            plus_minus: Some(1),
            shots: Some(3),
            ..Default::default()
        }
    }

    fn goalie_game(decision: Option<&str>, shots: i64, goals: i64) -> GameLogEntry {
        GameLogEntry {
            decision: decision.map(str::to_owned),
            shots_against: Some(shots),
            goals_against: Some(goals),
            shutouts: Some(if goals == 0 { 1 } else { 0 }),
            ..Default::default()
        }
    }

    #[test]
    fn skater_games_is_min_of_window_and_log_length() {
        let log: Vec<GameLogEntry> = (0..7).map(|_| skater_game(1, 1)).collect();
        for window in [1, 5, 7, 10, 82] {
            assert_eq!(reduce_skater(&log, window).games as usize, window.min(log.len()));
        }
    }

    #[test]
    fn skater_window_takes_most_recent_first() {
        let log = vec![skater_game(2, 1), skater_game(0, 0), skater_game(5, 5)];
        let stats = reduce_skater(&log, 2);
        assert_eq!(stats.goals, 2);
        assert_eq!(stats.points, 3);
        assert_eq!(stats.shots, 6);
        assert_eq!(stats.plus_minus, 2);
        assert_eq!(points_per_game(&stats), 1.5);
    }

    #[test]
    fn empty_log_has_zero_points_per_game() {
        let stats = reduce_skater(&[], 10);
        assert_eq!(stats.games, 0);
        assert_eq!(points_per_game(&stats), 0.0);
    }

    #[test]
    fn missing_fields_count_as_zero_without_skipping_the_game() {
        let log = vec![GameLogEntry::default(), skater_game(1, 0)];
        let stats = reduce_skater(&log, 10);
        assert_eq!(stats.games, 2);
        assert_eq!(stats.points, 1);
    }

    #[test]
    fn goalie_decisions_and_rates() {
        let log = vec![
            goalie_game(Some("W"), 30, 2),
            goalie_game(Some("L"), 25, 4),
            goalie_game(Some("O"), 35, 3),
            goalie_game(None, 10, 0),
        ];
        let stats = reduce_goalie(&log, 10);
        assert_eq!(stats.games_played, 4);
        assert_eq!((stats.wins, stats.losses, stats.ot_losses), (1, 1, 1));
        assert_eq!(stats.shots_against, 100);
        assert_eq!(stats.goals_against, 9);
        assert_eq!(stats.saves, 91);
        assert_eq!(stats.shutouts, 1);
        assert!((stats.save_pct - 0.91).abs() < 1e-12);
        assert!((stats.gaa - 2.25).abs() < 1e-12);
        assert!((stats.win_pct - 0.25).abs() < 1e-12);
    }

    #[test]
    fn goalie_unknown_decision_counts_the_game_only() {
        let stats = reduce_goalie(&[goalie_game(Some("T"), 20, 1)], 5);
        assert_eq!(stats.games_played, 1);
        assert_eq!(stats.wins + stats.losses + stats.ot_losses, 0);
    }

    #[test]
    fn goalie_negative_saves_are_kept() {
        let stats = reduce_goalie(&[goalie_game(Some("L"), 2, 5)], 5);
        assert_eq!(stats.saves, -3);
        assert!((stats.save_pct - (-1.5)).abs() < 1e-12);
    }

    #[test]
    fn goalie_empty_log_has_zero_rates() {
        let stats = reduce_goalie(&[], 10);
        assert_eq!(stats, RecentGoalieStats::default());
    }

    #[test]
    fn goalie_no_shots_faced_has_zero_save_pct() {
        let win = GameLogEntry { decision: Some("W".into()), ..Default::default() };
        let stats = reduce_goalie(&[win], 10);
        assert_eq!(stats.save_pct, 0.0);
        assert_eq!(stats.win_pct, 1.0);
    }

    fn schedule() -> ClubScheduleResponse {
        serde_json::from_value(json!({
            "games": [
                {"id": 1, "gameDate": "2025-01-02", "gameState": "OFF",
                 "homeTeam": {"abbrev": "EDM", "score": 4}, "awayTeam": {"abbrev": "CGY", "score": 1}},
                {"id": 2, "gameDate": "2025-01-04", "gameState": "FINAL",
                 "homeTeam": {"abbrev": "VAN", "score": 3}, "awayTeam": {"abbrev": "EDM", "score": 2}},
                {"id": 3, "gameDate": "2025-01-06", "gameState": "OFF",
                 "homeTeam": {"abbrev": "EDM", "score": 5}, "awayTeam": {"abbrev": "SEA", "score": 2}},
                {"id": 4, "gameDate": "2025-01-08", "gameState": "LIVE",
                 "homeTeam": {"abbrev": "EDM", "score": 1}, "awayTeam": {"abbrev": "LAK", "score": 0}},
                {"id": 5, "gameDate": "2025-01-10", "gameState": "FUT",
                 "homeTeam": {"abbrev": "WPG"}, "awayTeam": {"abbrev": "EDM"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn recent_results_keep_the_last_completed_games() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();
        let games = recent_results(&schedule(), "EDM", 2, today);
        let ids: Vec<u64> = games.iter().map(|g| g.game_id).collect();
        assert_eq!(ids, vec![2, 3]);

        assert_eq!(games[0].opponent, "VAN");
        assert!(!games[0].is_home);
        assert!(!games[0].is_win);
        assert_eq!((games[0].team_score, games[0].opp_score), (2, 3));
        assert!(games[1].is_home && games[1].is_win);
    }

    #[test]
    fn recent_results_ignore_games_after_today() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        let games = recent_results(&schedule(), "EDM", 10, today);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_id, 1);
    }

    #[test]
    fn team_form_from_results() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let form = reduce_team(&recent_results(&schedule(), "EDM", 10, today));
        assert_eq!(form.games, 3);
        assert_eq!(form.record(), "2-1");
        assert_eq!((form.goals_for, form.goals_against, form.goal_diff), (11, 6, 5));
        assert!((form.gd_per_game - 5.0 / 3.0).abs() < 1e-12);
        assert_eq!(reduce_team(&[]), RecentTeamForm::default());
    }
}
