//! Hotness rankings: base leaderboard fetch, candidate selection, per-entity
//! recent-form enrichment, scoring and ordering.
//!
//! A failed base fetch yields an empty [`Ranking`] carrying the error message.
//! A failed per-entity fetch never removes the entity: it keeps zeroed recent
//! stats and a score of 0, so the list length only depends on the base data.

use crate::aggregate::{
    GoalieCategory, LeaderCategories, SkaterCategory, aggregate_goalies, aggregate_skaters,
    goalie_categories,
};
use crate::client::{ApiError, NhlApi};
use crate::form::{points_per_game, reduce_goalie, reduce_skater, reduce_team};
use crate::score::{goalie_hotness, skater_hotness, team_hotness};
use crate::{
    GameResult, GoalieRecord, RecentGoalieStats, RecentSkaterStats, SkaterRecord, TeamRecord,
    TeamStanding, season_label,
};
use chrono::{Local, NaiveDate};
use futures_util::future::{join_all, try_join3};
use log::{debug, error, warn};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingConfig {
    /// Rows requested per skater leaderboard category.
    pub skater_leader_limit: u32,
    /// Skaters (by season points) whose game logs are fetched.
    pub skater_candidates: usize,
    pub goalie_leader_limit: u32,
    /// Goalies (by season wins) whose game logs are fetched.
    pub goalie_candidates: usize,
    /// Entries kept in skater and goalie rankings.
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            skater_leader_limit: 100,
            skater_candidates: 50,
            goalie_leader_limit: 30,
            goalie_candidates: 20,
            top_n: 10,
        }
    }
}

/// Ranked entries, hottest first. `error` is set when the base fetch failed
/// and `entries` is therefore empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking<T> {
    pub entries: Vec<T>,
    pub error: Option<String>,
}

impl<T> Default for Ranking<T> {
    fn default() -> Self {
        Self { entries: Vec::new(), error: None }
    }
}

impl<T> Ranking<T> {
    fn ok(entries: Vec<T>) -> Self {
        Self { entries, error: None }
    }

    fn failed(err: &ApiError) -> Self {
        Self { entries: Vec::new(), error: Some(err.to_string()) }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Two clubs' momentum side by side, with their 1-based league ranks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MomentumComparison {
    pub team: Option<TeamRecord>,
    pub team_rank: Option<usize>,
    pub opponent: Option<TeamRecord>,
    pub opponent_rank: Option<usize>,
    pub teams_ranked: usize,
    pub error: Option<String>,
}

impl MomentumComparison {
    /// Positive when `team` is hotter than `opponent`.
    pub fn edge(&self) -> Option<f64> {
        Some(self.team.as_ref()?.hotness_score - self.opponent.as_ref()?.hotness_score)
    }
}

#[derive(Debug, Clone)]
pub struct Ranker {
    api: NhlApi,
    config: RankingConfig,
    reference_date: Option<NaiveDate>,
}

impl Ranker {
    pub fn new(api: NhlApi, config: RankingConfig) -> Self {
        Self { api, config, reference_date: None }
    }

    /// Pin "today" instead of reading the local clock. Drives the season
    /// label, the standings date and which club games count as played.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn api(&self) -> &NhlApi {
        &self.api
    }

    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    pub fn clear_cache(&self) {
        self.api.clear_cache();
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }

    // -----------------------------------------------------------------------
    // Skaters
    // -----------------------------------------------------------------------

    pub async fn rank_skaters(&self, window: usize) -> Ranking<SkaterRecord> {
        let season = season_label(self.today());
        let mut candidates = match self.skater_leaders(&season).await {
            Ok(skaters) => skaters,
            Err(e) => {
                error!("skater leaderboards unavailable: {e}");
                return Ranking::failed(&e);
            }
        };

        candidates.sort_by(|a, b| b.season_points.cmp(&a.season_points));
        candidates.truncate(self.config.skater_candidates);

        let mut ranked = self.enrich_skaters(candidates, &season, window).await;
        ranked.truncate(self.config.top_n);
        Ranking::ok(ranked)
    }

    /// The hottest leaderboard skaters on one club.
    pub async fn team_roster_form(&self, team: &str, window: usize) -> Ranking<SkaterRecord> {
        let season = season_label(self.today());
        let mut candidates: Vec<SkaterRecord> = match self.skater_leaders(&season).await {
            Ok(skaters) => skaters.into_iter().filter(|s| s.team_abbrev == team).collect(),
            Err(e) => {
                error!("skater leaderboards unavailable for {team}: {e}");
                return Ranking::failed(&e);
            }
        };
        candidates.sort_by(|a, b| b.season_points.cmp(&a.season_points));

        let mut ranked = self.enrich_skaters(candidates, &season, window).await;
        ranked.truncate(self.config.top_n);
        Ranking::ok(ranked)
    }

    async fn skater_leaders(&self, season: &str) -> Result<Vec<SkaterRecord>, ApiError> {
        let limit = self.config.skater_leader_limit;
        let (points, goals, assists) = try_join3(
            self.api.fetch_skater_leaders(season, SkaterCategory::Points, limit),
            self.api.fetch_skater_leaders(season, SkaterCategory::Goals, limit),
            self.api.fetch_skater_leaders(season, SkaterCategory::Assists, limit),
        )
        .await?;

        let categories: LeaderCategories<SkaterCategory> = HashMap::from([
            (SkaterCategory::Points, points),
            (SkaterCategory::Goals, goals),
            (SkaterCategory::Assists, assists),
        ]);
        Ok(aggregate_skaters(&categories))
    }

    async fn enrich_skaters(
        &self,
        candidates: Vec<SkaterRecord>,
        season: &str,
        window: usize,
    ) -> Vec<SkaterRecord> {
        debug!("fetching {} skater game logs", candidates.len());
        let mut skaters =
            join_all(candidates.into_iter().map(|s| self.enrich_skater(s, season, window))).await;
        sort_hottest_first(&mut skaters, |s| s.recent_points_per_game);
        skaters
    }

    async fn enrich_skater(
        &self,
        mut skater: SkaterRecord,
        season: &str,
        window: usize,
    ) -> SkaterRecord {
        let stats = match self.api.fetch_game_log(skater.id, season).await {
            Ok(log) => reduce_skater(&log, window),
            Err(e) => {
                warn!("game log for {} ({}) unavailable: {e}", skater.name, skater.id);
                RecentSkaterStats::default()
            }
        };
        skater.recent_points_per_game = skater_hotness(points_per_game(&stats));
        skater.recent_stats = Some(stats);
        skater
    }

    // -----------------------------------------------------------------------
    // Goalies
    // -----------------------------------------------------------------------

    pub async fn rank_goalies(&self, window: usize) -> Ranking<GoalieRecord> {
        let season = season_label(self.today());
        let limit = self.config.goalie_leader_limit;
        let raw = match self.api.fetch_goalie_leaders(&season, limit).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("goalie leaderboards unavailable: {e}");
                return Ranking::failed(&e);
            }
        };

        let categories: LeaderCategories<GoalieCategory> = goalie_categories(&raw);
        let mut candidates = aggregate_goalies(&categories);
        candidates.sort_by(|a, b| b.season_wins.cmp(&a.season_wins));
        candidates.truncate(self.config.goalie_candidates);

        debug!("fetching {} goalie game logs", candidates.len());
        let mut goalies =
            join_all(candidates.into_iter().map(|g| self.enrich_goalie(g, &season, window))).await;
        sort_hottest_first(&mut goalies, |g| g.hotness_score);
        goalies.truncate(self.config.top_n);
        Ranking::ok(goalies)
    }

    async fn enrich_goalie(
        &self,
        mut goalie: GoalieRecord,
        season: &str,
        window: usize,
    ) -> GoalieRecord {
        match self.api.fetch_game_log(goalie.id, season).await {
            Ok(log) => {
                let stats = reduce_goalie(&log, window);
                goalie.hotness_score = goalie_hotness(stats.save_pct, stats.gaa, stats.win_pct);
                goalie.recent_stats = Some(stats);
            }
            Err(e) => {
                warn!("game log for {} ({}) unavailable: {e}", goalie.name, goalie.id);
                goalie.recent_stats = Some(RecentGoalieStats::default());
                goalie.hotness_score = 0.0;
            }
        }
        goalie
    }

    // -----------------------------------------------------------------------
    // Teams
    // -----------------------------------------------------------------------

    /// Every club in the standings scored on its last `window` games, hottest
    /// first, cut to `limit`.
    pub async fn rank_teams(&self, limit: usize, window: usize) -> Ranking<TeamRecord> {
        let today = self.today();
        let standings = match self.api.fetch_standings(today).await {
            Ok(standings) => standings,
            Err(e) => {
                error!("standings unavailable: {e}");
                return Ranking::failed(&e);
            }
        };

        let mut teams = self.enrich_teams(standings, today, window).await;
        teams.truncate(limit);
        Ranking::ok(teams)
    }

    /// One club's momentum, or `None` when it is not in the standings or the
    /// standings can't be fetched.
    pub async fn team_momentum(&self, team: &str, window: usize) -> Option<TeamRecord> {
        let today = self.today();
        let standing = match self.api.fetch_standings(today).await {
            Ok(standings) => standings.into_iter().find(|s| s.abbrev == team)?,
            Err(e) => {
                error!("standings unavailable for {team}: {e}");
                return None;
            }
        };
        Some(self.enrich_team(standing, &season_label(today), today, window).await)
    }

    /// Rank the whole league and pull out two clubs.
    pub async fn momentum_comparison(
        &self,
        team: &str,
        opponent: &str,
        window: usize,
    ) -> MomentumComparison {
        let ranking = self.rank_teams(usize::MAX, window).await;
        let find = |abbrev: &str| {
            ranking
                .entries
                .iter()
                .position(|t| t.id == abbrev)
                .map(|idx| (ranking.entries[idx].clone(), idx + 1))
        };
        let (team, team_rank) = find(team).unzip();
        let (opponent, opponent_rank) = find(opponent).unzip();

        MomentumComparison {
            team,
            team_rank,
            opponent,
            opponent_rank,
            teams_ranked: ranking.entries.len(),
            error: ranking.error,
        }
    }

    async fn enrich_teams(
        &self,
        standings: Vec<TeamStanding>,
        today: NaiveDate,
        window: usize,
    ) -> Vec<TeamRecord> {
        let season = season_label(today);
        debug!("fetching {} club schedules", standings.len());
        let enriched = standings
            .into_iter()
            .map(|s| self.enrich_team(s, &season, today, window));
        let mut teams = join_all(enriched).await;
        sort_hottest_first(&mut teams, |t| t.hotness_score);
        teams
    }

    async fn enrich_team(
        &self,
        standing: TeamStanding,
        season: &str,
        today: NaiveDate,
        window: usize,
    ) -> TeamRecord {
        match self
            .api
            .fetch_team_recent_games(&standing.abbrev, season, window, today)
            .await
        {
            Ok(games) => team_record(standing, games, true),
            Err(e) => {
                warn!("schedule for {} unavailable: {e}", standing.abbrev);
                team_record(standing, Vec::new(), false)
            }
        }
    }
}

/// An unscored record keeps its standing but gets zero hotness.
fn team_record(standing: TeamStanding, games: Vec<GameResult>, scored: bool) -> TeamRecord {
    let form = reduce_team(&games);
    let hotness_score = if scored { team_hotness(form.win_pct, form.gd_per_game) } else { 0.0 };
    TeamRecord {
        id: standing.abbrev.clone(),
        name: standing.name.clone(),
        wins: standing.wins,
        losses: standing.losses,
        ot_losses: standing.ot_losses,
        points: standing.points,
        games_played: standing.games_played,
        recent_wins: form.wins,
        recent_losses: form.losses,
        recent_goals_for: form.goals_for,
        recent_goals_against: form.goals_against,
        recent_goal_diff: form.goal_diff,
        recent_win_pct: form.win_pct,
        recent_gd_per_game: form.gd_per_game,
        recent_record: form.record(),
        recent_games: games,
        hotness_score,
        standing,
    }
}

/// Stable: equal scores keep their candidate order.
fn sort_hottest_first<T>(items: &mut [T], score: impl Fn(&T) -> f64) {
    items.sort_by(|a, b| score(b).total_cmp(&score(a)));
}
