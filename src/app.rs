use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, DetailView, next_window};
use crate::state::messages::{FocusView, NetworkRequest};
use chrono::Local;
use log::debug;
use nhl_api::detail::{GameCenter, PlayerProfile};
use nhl_api::ranking::Ranking;
use nhl_api::{GoalieRecord, PlayerSearchResult, SkaterRecord, TeamRecord, TodayGame};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Skaters,
    Goalies,
    Teams,
    Today,
    Focus,
    Search,
    Help,
}

impl MenuItem {
    /// The request that (re)loads this tab's data.
    pub fn load_request(&self) -> Option<NetworkRequest> {
        match self {
            MenuItem::Skaters => Some(NetworkRequest::LoadSkaters),
            MenuItem::Goalies => Some(NetworkRequest::LoadGoalies),
            MenuItem::Teams => Some(NetworkRequest::LoadTeams),
            MenuItem::Today => Some(NetworkRequest::RefreshToday),
            MenuItem::Focus => Some(NetworkRequest::RefreshFocus),
            MenuItem::Search | MenuItem::Help => None,
        }
    }
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(settings.window),
            settings,
        };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_skaters_loaded(&mut self, ranking: Ranking<SkaterRecord>, window: usize) {
        self.note_ranking_error(&ranking.error);
        self.state.skaters.load(ranking, window);
    }

    pub fn on_goalies_loaded(&mut self, ranking: Ranking<GoalieRecord>, window: usize) {
        self.note_ranking_error(&ranking.error);
        self.state.goalies.load(ranking, window);
    }

    pub fn on_teams_loaded(&mut self, ranking: Ranking<TeamRecord>, window: usize) {
        self.note_ranking_error(&ranking.error);
        self.state.teams.load(ranking, window);
    }

    pub fn on_today_loaded(&mut self, games: Vec<TodayGame>) {
        self.state.last_error = None;
        self.state.today.load(games);
    }

    pub fn on_focus_loaded(&mut self, focus: FocusView) {
        self.state.last_error = None;
        self.state.focus = Some(focus);
        self.state.focus_updated_at = Some(Local::now().format("%H:%M:%S").to_string());
    }

    pub fn on_search_results(&mut self, query: String, results: Vec<PlayerSearchResult>) {
        if !self.state.search.load(&query, results) {
            debug!("dropping stale results for {query:?}");
        }
    }

    pub fn on_player_loaded(&mut self, profile: PlayerProfile) {
        self.state.last_error = None;
        self.state.detail = Some(DetailView::Player(Box::new(profile)));
    }

    pub fn on_game_center_loaded(&mut self, center: GameCenter) {
        self.state.last_error = None;
        self.state.detail = Some(DetailView::Game(Box::new(center)));
    }

    pub fn on_error(&mut self, message: String) {
        self.state.last_error = Some(message);
    }

    fn note_ranking_error(&mut self, error: &Option<String>) {
        self.state.last_error = error.clone();
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    /// Switch tabs. Returns the load request when the new tab has no data yet.
    pub fn update_tab(&mut self, next: MenuItem) -> Option<NetworkRequest> {
        if self.state.active_tab == next {
            return None;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;

        let loaded = match next {
            MenuItem::Skaters => self.state.skaters.ranking.is_some(),
            MenuItem::Goalies => self.state.goalies.ranking.is_some(),
            MenuItem::Teams => self.state.teams.ranking.is_some(),
            MenuItem::Today => self.state.today.games.is_some(),
            MenuItem::Focus => self.state.focus.is_some(),
            MenuItem::Search | MenuItem::Help => true,
        };
        if loaded { None } else { next.load_request() }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    // -----------------------------------------------------------------------
    // List navigation
    // -----------------------------------------------------------------------

    pub fn select_next(&mut self) {
        match self.state.active_tab {
            MenuItem::Skaters => self.state.skaters.select_next(),
            MenuItem::Goalies => self.state.goalies.select_next(),
            MenuItem::Teams => self.state.teams.select_next(),
            MenuItem::Today => self.state.today.select_next(),
            MenuItem::Search => self.state.search.select_next(),
            MenuItem::Focus | MenuItem::Help => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.state.active_tab {
            MenuItem::Skaters => self.state.skaters.select_prev(),
            MenuItem::Goalies => self.state.goalies.select_prev(),
            MenuItem::Teams => self.state.teams.select_prev(),
            MenuItem::Today => self.state.today.select_prev(),
            MenuItem::Search => self.state.search.select_prev(),
            MenuItem::Focus | MenuItem::Help => {}
        }
    }

    // -----------------------------------------------------------------------
    // Search prompt
    // -----------------------------------------------------------------------

    /// Jump to the Search tab with the prompt focused.
    pub fn start_search(&mut self) {
        self.update_tab(MenuItem::Search);
        self.state.search.editing = true;
    }

    pub fn search_push(&mut self, c: char) {
        self.state.search.input.push(c);
    }

    pub fn search_pop(&mut self) {
        self.state.search.input.pop();
    }

    pub fn stop_search(&mut self) {
        self.state.search.editing = false;
    }

    pub fn submit_search(&mut self) -> Option<NetworkRequest> {
        let query = self.state.search.submit()?;
        Some(NetworkRequest::SearchPlayers { query })
    }

    // -----------------------------------------------------------------------
    // Detail popup
    // -----------------------------------------------------------------------

    /// Request the detail for whatever is selected on the active tab.
    pub fn open_detail(&self) -> Option<NetworkRequest> {
        let player = |player_id| NetworkRequest::LoadPlayer { player_id };
        let game = |game_id| NetworkRequest::LoadGameCenter { game_id };
        match self.state.active_tab {
            MenuItem::Skaters => self.state.skaters.selected_entry().map(|s| player(s.id)),
            MenuItem::Goalies => self.state.goalies.selected_entry().map(|g| player(g.id)),
            MenuItem::Search => self.state.search.selected_player_id().map(player),
            MenuItem::Today => {
                let games = self.state.today.games.as_ref()?;
                games.get(self.state.today.selected).map(|g| game(g.id))
            }
            MenuItem::Focus => {
                let focus = self.state.focus.as_ref()?;
                focus.status.game().map(|g| game(g.id))
            }
            MenuItem::Teams | MenuItem::Help => None,
        }
    }

    pub fn close_detail(&mut self) {
        self.state.detail = None;
    }

    // -----------------------------------------------------------------------
    // Window and refresh
    // -----------------------------------------------------------------------

    /// Advance to the next window and return the requests that apply it.
    pub fn cycle_window(&mut self) -> Vec<NetworkRequest> {
        self.state.window = next_window(self.state.window);
        let mut requests = vec![NetworkRequest::SetWindow { window: self.state.window }];
        requests.extend(self.reload_requests());
        requests
    }

    /// Clear the cache and reload every tab that has been loaded once.
    pub fn force_refresh(&mut self) -> Vec<NetworkRequest> {
        self.state.last_error = None;
        let mut requests = vec![NetworkRequest::ClearCache];
        requests.extend(self.reload_requests());
        requests
    }

    /// The active tab first, then any other windowed tab already loaded.
    fn reload_requests(&self) -> Vec<NetworkRequest> {
        let active = self.state.active_tab;
        let mut tabs = vec![active];
        let loaded = [
            (MenuItem::Skaters, self.state.skaters.ranking.is_some()),
            (MenuItem::Goalies, self.state.goalies.ranking.is_some()),
            (MenuItem::Teams, self.state.teams.ranking.is_some()),
            (MenuItem::Today, self.state.today.games.is_some()),
            (MenuItem::Focus, self.state.focus.is_some()),
        ];
        tabs.extend(
            loaded
                .into_iter()
                .filter(|(tab, is_loaded)| *is_loaded && *tab != active)
                .map(|(tab, _)| tab),
        );
        tabs.iter().filter_map(MenuItem::load_request).collect()
    }
}
