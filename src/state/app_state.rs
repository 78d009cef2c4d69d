use crate::app::MenuItem;
use crate::state::messages::FocusView;
use chrono::Local;
use nhl_api::detail::{GameCenter, PlayerProfile};
use nhl_api::ranking::Ranking;
use nhl_api::{GoalieRecord, PlayerSearchResult, SkaterRecord, TeamRecord, TodayGame};

/// Windows offered by the `w` key, in cycling order.
pub const WINDOWS: [usize; 4] = [5, 10, 15, 20];

pub fn next_window(current: usize) -> usize {
    WINDOWS
        .iter()
        .copied()
        .find(|w| *w > current)
        .unwrap_or(WINDOWS[0])
}

// ---------------------------------------------------------------------------
// Ranked list with a cursor
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct RankingView<T> {
    pub ranking: Option<Ranking<T>>,
    pub selected: usize,
    /// Local "HH:MM" of the last load.
    pub updated_at: Option<String>,
    /// Window the ranking was computed over.
    pub window: usize,
}

impl<T> Default for RankingView<T> {
    fn default() -> Self {
        Self { ranking: None, selected: 0, updated_at: None, window: 0 }
    }
}

impl<T> RankingView<T> {
    pub fn load(&mut self, ranking: Ranking<T>, window: usize) {
        self.ranking = Some(ranking);
        self.window = window;
        self.updated_at = Some(Local::now().format("%H:%M").to_string());
        self.selected = self.selected.min(self.len().saturating_sub(1));
    }

    pub fn entries(&self) -> &[T] {
        self.ranking.as_ref().map(|r| r.entries.as_slice()).unwrap_or(&[])
    }

    pub fn error(&self) -> Option<&str> {
        self.ranking.as_ref().and_then(|r| r.error.as_deref())
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn selected_entry(&self) -> Option<&T> {
        self.entries().get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Today's games
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TodayState {
    pub games: Option<Vec<TodayGame>>,
    pub selected: usize,
    pub updated_at: Option<String>,
}

impl TodayState {
    pub fn load(&mut self, games: Vec<TodayGame>) {
        self.selected = self.selected.min(games.len().saturating_sub(1));
        self.games = Some(games);
        self.updated_at = Some(Local::now().format("%H:%M:%S").to_string());
    }

    pub fn select_next(&mut self) {
        let len = self.games.as_ref().map_or(0, Vec::len);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Player search
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SearchState {
    /// Text in the prompt.
    pub input: String,
    pub editing: bool,
    /// Last query sent; results for any other query are stale.
    pub submitted: Option<String>,
    pub results: Option<Vec<PlayerSearchResult>>,
    pub selected: usize,
}

impl SearchState {
    /// Trimmed prompt text, or None when there is nothing to send.
    pub fn submit(&mut self) -> Option<String> {
        self.editing = false;
        let query = self.input.trim();
        if query.is_empty() {
            return None;
        }
        let query = query.to_string();
        self.submitted = Some(query.clone());
        Some(query)
    }

    /// Returns false and drops the results when they answer an older query.
    pub fn load(&mut self, query: &str, results: Vec<PlayerSearchResult>) -> bool {
        if self.submitted.as_deref() != Some(query) {
            return false;
        }
        self.selected = 0;
        self.results = Some(results);
        true
    }

    pub fn selected_player_id(&self) -> Option<u64> {
        let player = self.results.as_ref()?.get(self.selected)?;
        player.player_id.parse().ok()
    }

    pub fn select_next(&mut self) {
        let len = self.results.as_ref().map_or(0, Vec::len);
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

/// Popup over the active tab.
#[derive(Debug)]
pub enum DetailView {
    Player(Box<PlayerProfile>),
    Game(Box<GameCenter>),
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    pub window: usize,
    pub skaters: RankingView<SkaterRecord>,
    pub goalies: RankingView<GoalieRecord>,
    pub teams: RankingView<TeamRecord>,
    pub today: TodayState,
    pub focus: Option<FocusView>,
    pub focus_updated_at: Option<String>,
    pub search: SearchState,
    pub detail: Option<DetailView>,
}

impl AppState {
    pub fn new(window: usize) -> Self {
        Self { window, ..Self::default() }
    }
}
