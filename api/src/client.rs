use crate::aggregate::SkaterCategory;
use crate::cache::{DEFAULT_TTL, LIVE_TTL, ResponseCache, SHORT_TTL};
use crate::detail::{GameCenter, PlayerProfile, game_center, player_profile};
use crate::form::recent_results;
use crate::nhl::{
    ClubScheduleResponse, GameLogEntry, GameLogResponse, LeaderRow, LeadersResponse,
    ScheduleGame, ScheduleResponse, ScheduleTeam, SearchPlayer, StandingRow, StandingsResponse,
};
use crate::{GameResult, GameState, PlayerSearchResult, TeamStanding, TodayGame, TodayTeam};
use chrono::NaiveDate;
use futures_util::future::join;
use log::{debug, error, warn};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const NHL_WEB: &str = "https://api-web.nhle.com";
const NHL_SEARCH: &str = "https://search.d3.nhle.com";
/// gameType 2 = regular season.
const REGULAR_SEASON: u8 = 2;
const SEARCH_LIMIT: u32 = 20;
const GOALIE_CATEGORIES: &str = "wins,savePctg,goalsAgainstAverage";
/// Goals and penalties kept for the game center.
const KEY_PLAYS: usize = 8;

/// NHL API client backed by the public api-web and search endpoints.
///
/// Clones share one [`ResponseCache`], so every view in the process sees the
/// same cached responses.
#[derive(Debug, Clone)]
pub struct NhlApi {
    client: Client,
    timeout: Duration,
    stats_base: String,
    search_base: String,
    cache: Arc<ResponseCache>,
}

impl Default for NhlApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("nhltui/0.1 (terminal hockey dashboard)")
                .build()
                .unwrap_or_default(),
            timeout: Duration::from_secs(10),
            stats_base: NHL_WEB.to_owned(),
            search_base: NHL_SEARCH.to_owned(),
            cache: Arc::new(ResponseCache::new()),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
    Shape(serde_json::Error, String),
    /// The payload came back but doesn't describe the requested entity.
    NotFound(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Shape(e, url) => write!(f, "Unexpected payload from {url}: {e}"),
            ApiError::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NhlApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at other hosts, e.g. a local proxy or a test server.
    pub fn with_base_urls(stats_base: impl Into<String>, search_base: impl Into<String>) -> Self {
        Self {
            stats_base: stats_base.into().trim_end_matches('/').to_owned(),
            search_base: search_base.into().trim_end_matches('/').to_owned(),
            ..Self::default()
        }
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Forget every cached response. Call before a manual refresh.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// League standings as of `date`.
    pub async fn fetch_standings(&self, date: NaiveDate) -> ApiResult<Vec<TeamStanding>> {
        let date = date.format("%Y-%m-%d");
        let url = format!("{}/v1/standings/{date}", self.stats_base);
        let raw: StandingsResponse =
            self.fetch_with_cache(&url, &format!("standings-{date}"), DEFAULT_TTL).await?;
        Ok(raw.standings.iter().map(map_standing).collect())
    }

    /// One skater leaderboard category for the regular season.
    pub async fn fetch_skater_leaders(
        &self,
        season: &str,
        category: SkaterCategory,
        limit: u32,
    ) -> ApiResult<Vec<LeaderRow>> {
        let key = category.key();
        let url = format!(
            "{}/v1/skater-stats-leaders/{season}/{REGULAR_SEASON}?categories={key}&limit={limit}",
            self.stats_base
        );
        let raw: LeadersResponse = self
            .fetch_with_cache(&url, &format!("leaders-{season}-{key}-{limit}"), DEFAULT_TTL)
            .await?;
        Ok(raw.rows(key))
    }

    /// Wins, save percentage and GAA leaders in a single request.
    pub async fn fetch_goalie_leaders(
        &self,
        season: &str,
        limit: u32,
    ) -> ApiResult<LeadersResponse> {
        let url = format!(
            "{}/v1/goalie-stats-leaders/{season}/{REGULAR_SEASON}?categories={GOALIE_CATEGORIES}&limit={limit}",
            self.stats_base
        );
        self.fetch_with_cache(&url, &format!("goalie-leaders-{season}-{limit}"), DEFAULT_TTL)
            .await
    }

    /// A player's regular-season game log, most recent game first.
    pub async fn fetch_game_log(
        &self,
        player_id: u64,
        season: &str,
    ) -> ApiResult<Vec<GameLogEntry>> {
        let url = format!(
            "{}/v1/player/{player_id}/game-log/{season}/{REGULAR_SEASON}",
            self.stats_base
        );
        let raw: GameLogResponse = self
            .fetch_with_cache(&url, &format!("gamelog-{season}-{player_id}"), DEFAULT_TTL)
            .await?;
        Ok(raw.game_log)
    }

    pub async fn fetch_club_schedule(
        &self,
        team: &str,
        season: &str,
    ) -> ApiResult<ClubScheduleResponse> {
        let url = format!("{}/v1/club-schedule-season/{team}/{season}", self.stats_base);
        self.fetch_with_cache(&url, &format!("schedule-{season}-{team}"), DEFAULT_TTL)
            .await
    }

    /// The club's last `limit` completed games on or before `today`.
    pub async fn fetch_team_recent_games(
        &self,
        team: &str,
        season: &str,
        limit: usize,
        today: NaiveDate,
    ) -> ApiResult<Vec<GameResult>> {
        let schedule = self.fetch_club_schedule(team, season).await?;
        Ok(recent_results(&schedule, team, limit, today))
    }

    /// League games for `date`, with live state, period and clock.
    pub async fn fetch_todays_games(&self, date: NaiveDate) -> ApiResult<Vec<TodayGame>> {
        let date = date.format("%Y-%m-%d");
        let url = format!("{}/v1/schedule/{date}", self.stats_base);
        let raw: ScheduleResponse =
            self.fetch_with_cache(&url, &format!("schedule-{date}"), SHORT_TTL).await?;
        Ok(raw
            .game_week
            .into_iter()
            .next()
            .map(|day| day.games.iter().map(map_today_game).collect())
            .unwrap_or_default())
    }

    /// Active players matching `query`. Queries under two characters and
    /// failed lookups both yield no results.
    pub async fn search_players(&self, query: &str) -> Vec<PlayerSearchResult> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Vec::new();
        }

        let limit = SEARCH_LIMIT.to_string();
        let url = match Url::parse_with_params(
            &format!("{}/api/v1/search/player", self.search_base),
            &[
                ("culture", "en-us"),
                ("limit", limit.as_str()),
                ("q", query),
                ("active", "true"),
            ],
        ) {
            Ok(url) => url,
            Err(e) => {
                error!("invalid search url for {query:?}: {e}");
                return Vec::new();
            }
        };

        let key = format!("search-player-{query}");
        match self
            .fetch_with_cache::<Vec<SearchPlayer>>(url.as_str(), &key, SHORT_TTL)
            .await
        {
            Ok(players) => players.iter().map(map_search_player).collect(),
            Err(e) => {
                warn!("player search failed: {e}");
                Vec::new()
            }
        }
    }

    /// Full biography plus season and career stats.
    pub async fn fetch_player_landing(&self, player_id: u64) -> ApiResult<Value> {
        let url = format!("{}/v1/player/{player_id}/landing", self.stats_base);
        self.fetch_with_cache(&url, &format!("player-{player_id}"), DEFAULT_TTL).await
    }

    pub async fn fetch_game_landing(&self, game_id: u64) -> ApiResult<Value> {
        let url = format!("{}/v1/gamecenter/{game_id}/landing", self.stats_base);
        self.fetch_with_cache(&url, &format!("live-game-{game_id}"), LIVE_TTL).await
    }

    pub async fn fetch_boxscore(&self, game_id: u64) -> ApiResult<Value> {
        let url = format!("{}/v1/gamecenter/{game_id}/boxscore", self.stats_base);
        self.fetch_with_cache(&url, &format!("boxscore-{game_id}"), LIVE_TTL).await
    }

    pub async fn fetch_play_by_play(&self, game_id: u64) -> ApiResult<Value> {
        let url = format!("{}/v1/gamecenter/{game_id}/play-by-play", self.stats_base);
        self.fetch_with_cache(&url, &format!("pbp-{game_id}"), LIVE_TTL).await
    }

    /// Bio plus season and career lines, read from the player landing.
    pub async fn fetch_player_profile(&self, player_id: u64) -> ApiResult<PlayerProfile> {
        let landing = self.fetch_player_landing(player_id).await?;
        player_profile(&landing).ok_or_else(|| ApiError::NotFound(format!("player {player_id}")))
    }

    /// Boxscore team stats with the latest goals and penalties. The
    /// play-by-play feed is optional; without it there are no key plays.
    pub async fn fetch_game_center(&self, game_id: u64) -> ApiResult<GameCenter> {
        let (boxscore, pbp) =
            join(self.fetch_boxscore(game_id), self.fetch_play_by_play(game_id)).await;
        let boxscore = boxscore?;
        let pbp = match pbp {
            Ok(pbp) => Some(pbp),
            Err(e) => {
                warn!("play-by-play for game {game_id} unavailable: {e}");
                None
            }
        };
        game_center(&boxscore, pbp.as_ref(), KEY_PLAYS)
            .ok_or_else(|| ApiError::NotFound(format!("game {game_id}")))
    }

    /// Serve `key` from the cache when younger than `ttl`, otherwise fetch
    /// `url`. Only successful, well-formed responses are stored.
    pub async fn fetch_with_cache<T: DeserializeOwned>(
        &self,
        url: &str,
        key: &str,
        ttl: Duration,
    ) -> ApiResult<T> {
        if let Some(value) = self.cache.get(key, ttl) {
            return decode(value, url);
        }

        debug!("fetching {url}");
        let value = self.get(url).await?;
        let parsed = decode(value.clone(), url)?;
        self.cache.put(key, value);
        Ok(parsed)
    }

    async fn get(&self, url: &str) -> ApiResult<Value> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        response
            .error_for_status()
            .map_err(|e| ApiError::Api(e, url.to_owned()))?
            .json::<Value>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

fn decode<T: DeserializeOwned>(value: Value, url: &str) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Shape(e, url.to_owned()))
}

// ---------------------------------------------------------------------------
// Mapping: NHL wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_standing(row: &StandingRow) -> TeamStanding {
    TeamStanding {
        abbrev: row.abbrev(),
        name: row.name(),
        common_name: row.common_name(),
        logo: row.team_logo.clone(),
        wins: row.wins.unwrap_or(0),
        losses: row.losses.unwrap_or(0),
        ot_losses: row.ot_losses.unwrap_or(0),
        points: row.points.unwrap_or(0),
        games_played: row.games_played.unwrap_or(0),
        goal_for: row.goal_for.unwrap_or(0),
        goal_against: row.goal_against.unwrap_or(0),
        goal_differential: row.goal_differential.unwrap_or(0),
        streak_code: row.streak_code.clone(),
        streak_count: row.streak_count,
        l10_wins: row.l10_wins.unwrap_or(0),
        l10_losses: row.l10_losses.unwrap_or(0),
        l10_ot_losses: row.l10_ot_losses.unwrap_or(0),
        division_name: row.division_name.clone(),
        conference_name: row.conference_name.clone(),
    }
}

fn map_today_team(team: &Option<ScheduleTeam>) -> TodayTeam {
    let Some(t) = team else {
        return TodayTeam::default();
    };
    TodayTeam {
        abbrev: t.abbrev.clone().unwrap_or_default(),
        name: t.display_name(),
        logo: t.logo.clone(),
        score: t.score,
        record: t.record.clone(),
    }
}

pub(crate) fn map_today_game(g: &ScheduleGame) -> TodayGame {
    TodayGame {
        id: g.id,
        start_time: g.start_time_utc.clone(),
        state: g.game_state.as_deref().map(GameState::parse).unwrap_or(GameState::Other),
        period: g.period_descriptor.as_ref().and_then(|p| p.number),
        period_type: g.period_descriptor.as_ref().and_then(|p| p.period_type.clone()),
        clock: g.clock.as_ref().and_then(|c| c.time_remaining.clone()),
        home: map_today_team(&g.home_team),
        away: map_today_team(&g.away_team),
    }
}

fn map_search_player(p: &SearchPlayer) -> PlayerSearchResult {
    let name = p.name.clone().filter(|n| !n.trim().is_empty()).unwrap_or_else(|| {
        format!(
            "{} {}",
            p.first_name.as_deref().unwrap_or(""),
            p.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_owned()
    });

    PlayerSearchResult {
        player_id: p.player_id.clone().or_else(|| p.id.clone()).unwrap_or_default(),
        name,
        team_abbrev: p
            .team_abbrev
            .clone()
            .or_else(|| p.last_team_abbrev.clone())
            .or_else(|| p.current_team_abbrev.clone()),
        position_code: p.position_code.clone().or_else(|| p.position.clone()),
        sweater_number: p.sweater_number.clone().or_else(|| p.jersey_number.clone()),
        active: p.active != Some(false),
        headshot: p.headshot.clone(),
    }
}
