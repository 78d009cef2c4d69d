use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use nhl_api::detail::{GameCenter, PlayerProfile};
use nhl_api::ranking::{MomentumComparison, Ranking};
use nhl_api::schedule::{FocusGame, FocusStatus, LiveSnapshot};
use nhl_api::{GoalieRecord, PlayerSearchResult, SkaterRecord, TeamRecord, TodayGame};

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    LoadSkaters,
    LoadGoalies,
    LoadTeams,
    RefreshToday,
    RefreshFocus,
    SearchPlayers { query: String },
    LoadPlayer { player_id: u64 },
    LoadGameCenter { game_id: u64 },
    /// Recent-games window for every later ranking request.
    SetWindow { window: usize },
    /// Drop cached responses so the next requests hit the network.
    ClearCache,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    /// Rankings carry the window they were computed over.
    SkatersLoaded { ranking: Ranking<SkaterRecord>, window: usize },
    GoaliesLoaded { ranking: Ranking<GoalieRecord>, window: usize },
    TeamsLoaded { ranking: Ranking<TeamRecord>, window: usize },
    TodayLoaded { games: Vec<TodayGame> },
    FocusLoaded { focus: Box<FocusView> },
    SearchResults { query: String, results: Vec<PlayerSearchResult> },
    PlayerLoaded { profile: Box<PlayerProfile> },
    GameCenterLoaded { center: Box<GameCenter> },
    Ack,
    Error { message: String },
}

impl NetworkResponse {
    /// Rankings report base failures in-band; count those as errors too.
    pub fn is_ok(&self) -> bool {
        match self {
            NetworkResponse::SkatersLoaded { ranking, .. } => ranking.is_ok(),
            NetworkResponse::GoaliesLoaded { ranking, .. } => ranking.is_ok(),
            NetworkResponse::TeamsLoaded { ranking, .. } => ranking.is_ok(),
            NetworkResponse::Error { .. } => false,
            _ => true,
        }
    }
}

/// Everything the Focus tab shows for one club.
#[derive(Debug, Clone)]
pub struct FocusView {
    pub team: String,
    pub week: Vec<FocusGame>,
    pub status: FocusStatus,
    pub live: Option<LiveSnapshot>,
    pub comparison: MomentumComparison,
    pub roster: Vec<SkaterRecord>,
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
}
