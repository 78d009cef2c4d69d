use crate::state::messages::{FocusView, NetworkRequest, NetworkResponse};
use chrono::{Local, Utc};
use log::{debug, error, warn};
use nhl_api::client::{ApiError, NhlApi};
use nhl_api::ranking::{MomentumComparison, Ranker, RankingConfig};
use nhl_api::schedule::{FocusStatus, focus_games, focus_status, live_snapshot, week_ahead};
use nhl_api::season_label;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

/// Clubs shown in the Teams tab; the whole league.
const TEAM_LIMIT: usize = 32;

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    ranker: Ranker,
    focus_team: String,
    window: usize,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    pub fn new(
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
        focus_team: String,
        window: usize,
    ) -> Self {
        Self {
            ranker: Ranker::new(NhlApi::new(), RankingConfig::default()),
            focus_team,
            window,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::LoadSkaters => self.handle_load_skaters().await,
                NetworkRequest::LoadGoalies => self.handle_load_goalies().await,
                NetworkRequest::LoadTeams => self.handle_load_teams().await,
                NetworkRequest::RefreshToday => self.handle_refresh_today().await,
                NetworkRequest::RefreshFocus => self.handle_refresh_focus().await,
                NetworkRequest::SearchPlayers { query } => self.handle_search(query).await,
                NetworkRequest::LoadPlayer { player_id } => {
                    self.handle_load_player(player_id).await
                }
                NetworkRequest::LoadGameCenter { game_id } => {
                    self.handle_load_game_center(game_id).await
                }
                NetworkRequest::SetWindow { window } => {
                    debug!("window set to {window} games");
                    self.window = window;
                    Ok(NetworkResponse::Ack)
                }
                NetworkRequest::ClearCache => {
                    debug!("clearing response cache");
                    self.ranker.clear_cache();
                    Ok(NetworkResponse::Ack)
                }
            };

            debug!("network request complete");
            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });
            self.stop_loading_animation(response.is_ok()).await;

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_load_skaters(&self) -> Result<NetworkResponse, ApiError> {
        debug!("ranking skaters over {} games", self.window);
        let ranking = self.ranker.rank_skaters(self.window).await;
        Ok(NetworkResponse::SkatersLoaded { ranking, window: self.window })
    }

    async fn handle_load_goalies(&self) -> Result<NetworkResponse, ApiError> {
        debug!("ranking goalies over {} games", self.window);
        let ranking = self.ranker.rank_goalies(self.window).await;
        Ok(NetworkResponse::GoaliesLoaded { ranking, window: self.window })
    }

    async fn handle_load_teams(&self) -> Result<NetworkResponse, ApiError> {
        debug!("ranking teams over {} games", self.window);
        let ranking = self.ranker.rank_teams(TEAM_LIMIT, self.window).await;
        Ok(NetworkResponse::TeamsLoaded { ranking, window: self.window })
    }

    async fn handle_search(&self, query: String) -> Result<NetworkResponse, ApiError> {
        let results = self.ranker.api().search_players(&query).await;
        debug!("{} players match {query:?}", results.len());
        Ok(NetworkResponse::SearchResults { query, results })
    }

    async fn handle_load_player(&self, player_id: u64) -> Result<NetworkResponse, ApiError> {
        let profile = self.ranker.api().fetch_player_profile(player_id).await?;
        Ok(NetworkResponse::PlayerLoaded { profile: Box::new(profile) })
    }

    async fn handle_load_game_center(&self, game_id: u64) -> Result<NetworkResponse, ApiError> {
        let center = self.ranker.api().fetch_game_center(game_id).await?;
        Ok(NetworkResponse::GameCenterLoaded { center: Box::new(center) })
    }

    async fn handle_refresh_today(&self) -> Result<NetworkResponse, ApiError> {
        let games = self.ranker.api().fetch_todays_games(Local::now().date_naive()).await?;
        Ok(NetworkResponse::TodayLoaded { games })
    }

    async fn handle_refresh_focus(&self) -> Result<NetworkResponse, ApiError> {
        let team = self.focus_team.as_str();
        let today = Local::now().date_naive();
        let api = self.ranker.api();

        let schedule = api.fetch_club_schedule(team, &season_label(today)).await?;
        let status = focus_status(&focus_games(&schedule, team), Utc::now());
        let week = week_ahead(&schedule, team, today);

        let live = match &status {
            FocusStatus::Live(game) => match api.fetch_game_landing(game.id).await {
                Ok(landing) => Some(live_snapshot(&landing)),
                Err(e) => {
                    warn!("live landing for game {} unavailable: {e}", game.id);
                    None
                }
            },
            _ => None,
        };

        let opponent = status
            .game()
            .or_else(|| week.first())
            .map(|g| g.opponent.clone());
        let comparison = match opponent {
            Some(opponent) => {
                self.ranker
                    .momentum_comparison(team, &opponent, self.window)
                    .await
            }
            None => MomentumComparison {
                team: self.ranker.team_momentum(team, self.window).await,
                ..Default::default()
            },
        };
        let roster = self.ranker.team_roster_form(team, self.window).await.entries;

        Ok(NetworkResponse::FocusLoaded {
            focus: Box::new(FocusView {
                team: team.to_string(),
                week,
                status,
                live,
                comparison,
                roster,
            }),
        })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
