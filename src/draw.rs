use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs,
};
use tui::{Frame, Terminal};
use tui_logger::{TuiLoggerLevelOutput, TuiLoggerWidget};

use crate::app::{App, MenuItem};
use crate::components::momentum::{MomentumBar, bar_text, heat_color};
use crate::state::app_state::{DetailView, RankingView};
use crate::state::messages::FocusView;
use crate::state::network::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;
use chrono::{DateTime, Local};
use nhl_api::detail::{GameCenter, PlayerProfile, ProfileStats, TeamGameStats};
use nhl_api::schedule::{FocusGame, FocusStatus};
use nhl_api::score::display_percent;
use nhl_api::{GameState, TodayGame, TodayTeam};

static TABS: &[&str; 6] = &["Skaters", "Goalies", "Teams", "Today", "Focus", "Search"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let _ = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
        }

        match app.state.active_tab {
            MenuItem::Skaters => draw_skaters(f, layout.main, app),
            MenuItem::Goalies => draw_goalies(f, layout.main, app),
            MenuItem::Teams => draw_teams(f, layout.main, app),
            MenuItem::Today => draw_today(f, layout.main, app),
            MenuItem::Focus => draw_focus(f, layout.main, app),
            MenuItem::Search => draw_search(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(detail) = &app.state.detail {
            draw_detail(f, layout.main, detail);
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Skaters => 0,
        MenuItem::Goalies => 1,
        MenuItem::Teams => 2,
        MenuItem::Today => 3,
        MenuItem::Focus => 4,
        MenuItem::Search => 5,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new(format!("last {} | Help: ? ", app.state.window))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn ranking_title<T>(name: &str, view: &RankingView<T>) -> String {
    match &view.updated_at {
        Some(at) => format!(" {name} | last {} games | {at} ", view.window),
        None => format!(" {name} "),
    }
}

/// Loading / error placeholder for a ranking that has nothing to show.
/// Returns true when it drew something.
fn draw_ranking_placeholder<T>(
    f: &mut Frame,
    area: Rect,
    view: &RankingView<T>,
    what: &str,
) -> bool {
    let msg = match (&view.ranking, view.error()) {
        (None, _) => format!("Loading {what}..."),
        (Some(_), Some(err)) => format!("Couldn't load {what}:\n{err}\n\nPress r to retry"),
        (Some(_), None) if view.len() == 0 => format!("No {what} yet this season"),
        _ => return false,
    };
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
    true
}

fn table_state(selected: usize) -> TableState {
    TableState::default().with_selected(Some(selected))
}

fn header(cells: &[&'static str]) -> Row<'static> {
    Row::new(cells.iter().map(|c| Cell::from(*c)))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD))
}

fn selected_style() -> Style {
    Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
}

fn heat_cell(score: f64, width: usize) -> Cell<'static> {
    let pct = display_percent(score);
    Cell::from(format!("{} {pct:>3}%", bar_text(pct, width)))
        .style(Style::default().fg(heat_color(pct)))
}

/// ".915"
fn rate(value: f64) -> String {
    let s = format!("{value:.3}");
    s.strip_prefix('0').map(str::to_owned).unwrap_or(s)
}

fn draw_skaters(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.skaters;
    let block = default_border(Color::White).title(ranking_title("Hottest Skaters", view));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_ranking_placeholder(f, inner, view, "skaters") {
        return;
    }

    let rows = view.entries().iter().enumerate().map(|(i, s)| {
        let recent = s.recent_stats.unwrap_or_default();
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(s.name.clone()),
            Cell::from(s.team_abbrev.clone()),
            Cell::from(s.position.clone()),
            Cell::from(format!("{}", recent.games)),
            Cell::from(format!("{}-{}-{}", recent.goals, recent.assists, recent.points)),
            Cell::from(format!("{:+}", recent.plus_minus)),
            Cell::from(format!("{:.2}", s.recent_points_per_game)),
            Cell::from(format!("{}G {}A {}P", s.season_goals, s.season_assists, s.season_points)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(2),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Fill(1),
        ],
    )
    .header(header(&["#", "Player", "Team", "Pos", "GP", "G-A-P", "+/-", "P/GP", "Season"]))
    .row_highlight_style(selected_style());
    f.render_stateful_widget(table, inner, &mut table_state(view.selected));
}

fn draw_goalies(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.goalies;
    let block = default_border(Color::White).title(ranking_title("Hottest Goalies", view));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_ranking_placeholder(f, inner, view, "goalies") {
        return;
    }

    let rows = view.entries().iter().enumerate().map(|(i, g)| {
        let recent = g.recent_stats.unwrap_or_default();
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(g.name.clone()),
            Cell::from(g.team_abbrev.clone()),
            Cell::from(format!("{}", recent.games_played)),
            Cell::from(format!("{}-{}-{}", recent.wins, recent.losses, recent.ot_losses)),
            Cell::from(rate(recent.save_pct)),
            Cell::from(format!("{:.2}", recent.gaa)),
            Cell::from(format!("{}", recent.shutouts)),
            heat_cell(g.hotness_score, 10),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(15),
        ],
    )
    .header(header(&["#", "Goalie", "Team", "GP", "W-L-O", "SV%", "GAA", "SO", "Hotness"]))
    .row_highlight_style(selected_style());
    f.render_stateful_widget(table, inner, &mut table_state(view.selected));
}

fn draw_teams(f: &mut Frame, area: Rect, app: &App) {
    let view = &app.state.teams;
    let block = default_border(Color::White).title(ranking_title("Team Momentum", view));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if draw_ranking_placeholder(f, inner, view, "teams") {
        return;
    }

    let [table_area, detail_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(inner);

    let rows = view.entries().iter().enumerate().map(|(i, t)| {
        Row::new(vec![
            Cell::from(format!("{}", i + 1)),
            Cell::from(t.id.clone()),
            Cell::from(t.name.clone()),
            Cell::from(t.standing.record()),
            Cell::from(format!("{}", t.points)),
            Cell::from(t.recent_record.clone()),
            Cell::from(format!("{}-{}", t.recent_goals_for, t.recent_goals_against)),
            Cell::from(format!("{:+.2}", t.recent_gd_per_game)),
            heat_cell(t.hotness_score, 10),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(8),
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(15),
        ],
    )
    .header(header(&["#", "", "Team", "Season", "PTS", "Recent", "GF-GA", "GD/GP", "Hotness"]))
    .row_highlight_style(selected_style());
    f.render_stateful_widget(table, table_area, &mut table_state(view.selected));

    if let Some(team) = view.selected_entry() {
        let results: Vec<Span> = team
            .recent_games
            .iter()
            .map(|g| {
                let (mark, color) = if g.is_win { ("W", Color::Green) } else { ("L", Color::Red) };
                Span::styled(format!("{mark} "), Style::default().fg(color))
            })
            .collect();
        let streak = match (&team.standing.streak_code, team.standing.streak_count) {
            (Some(code), Some(count)) => format!("streak {code}{count}"),
            _ => String::new(),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", team.name), Style::default().fg(Color::White)),
                Span::styled(
                    format!(
                        "L10 {}-{}-{}  {streak}",
                        team.standing.l10_wins,
                        team.standing.l10_losses,
                        team.standing.l10_ot_losses
                    ),
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
            Line::from(results),
        ];
        f.render_widget(Paragraph::new(lines), detail_area);
    }
}

fn draw_today(f: &mut Frame, area: Rect, app: &App) {
    let today = &app.state.today;
    let title = match &today.updated_at {
        Some(at) => format!(" Today's Games | {at} "),
        None => " Today's Games ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(games) = today.games.as_ref() else {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Schedule load failed:\n{err}"),
            None => "Loading today's schedule...".to_string(),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    if games.is_empty() {
        f.render_widget(
            Paragraph::new("No games today")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = games
        .iter()
        .enumerate()
        .map(|(idx, game)| {
            let marker = if idx == today.selected { ">" } else { " " };
            let status_style = match game.state {
                GameState::Live | GameState::Critical => Style::default().fg(Color::Green),
                GameState::Off | GameState::Final => Style::default().fg(Color::Gray),
                _ => Style::default().fg(Color::DarkGray),
            };
            Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::raw(format!("{} @ {}", team_line(&game.away), team_line(&game.home))),
                Span::styled(format!("  [{}]", game_status(game)), status_style),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn team_line(team: &TodayTeam) -> String {
    let score = team.score.map_or("-".to_string(), |s| s.to_string());
    format!("{:<3} {score:>2}", team.abbrev)
}

fn game_status(game: &TodayGame) -> String {
    match game.state {
        GameState::Live | GameState::Critical => {
            let period = match (game.period, game.period_type.as_deref()) {
                (_, Some("SO")) => "SO".to_string(),
                (Some(p), Some("OT")) if p > 3 => "OT".to_string(),
                (Some(p), _) => format!("P{p}"),
                (None, _) => String::new(),
            };
            format!("LIVE {period} {}", game.clock.clone().unwrap_or_default())
                .trim_end()
                .to_string()
        }
        GameState::Off | GameState::Final => "FINAL".to_string(),
        _ => game
            .start_time
            .as_deref()
            .and_then(local_start)
            .unwrap_or_else(|| game.state.label().to_string()),
    }
}

fn local_start(utc: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(utc)
        .ok()
        .map(|t| t.with_timezone(&Local).format("%I:%M %p").to_string())
}

fn draw_focus(f: &mut Frame, area: Rect, app: &App) {
    let title = match (&app.state.focus, &app.state.focus_updated_at) {
        (Some(focus), Some(at)) => format!(" {} | {at} ", focus.team),
        _ => format!(" {} ", app.settings.focus_team),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(focus) = app.state.focus.as_ref() else {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Focus team load failed:\n{err}"),
            None => format!("Loading {}...", app.settings.focus_team),
        };
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    };

    let [status_area, bars_area, lists_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(inner);

    f.render_widget(Paragraph::new(focus_status_lines(focus)), status_area);
    draw_momentum_bars(f, bars_area, focus);

    let [week_area, roster_area] =
        Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
            .areas(lists_area);
    draw_week(f, week_area, &focus.week);
    draw_roster(f, roster_area, focus);
}

fn focus_status_lines(focus: &FocusView) -> Vec<Line<'static>> {
    let headline = match &focus.status {
        FocusStatus::Live(game) => {
            let score = match &focus.live {
                Some(live) => {
                    let period = live.period.map(|p| format!("P{p}")).unwrap_or_default();
                    let clock = if live.in_intermission {
                        "INT".to_string()
                    } else {
                        live.clock.clone().unwrap_or_default()
                    };
                    format!(
                        "{} {} - {} {}  {period} {clock}",
                        live.away_abbrev, live.away_score, live.home_score, live.home_abbrev
                    )
                }
                None => game_score(game),
            };
            Line::from(vec![
                Span::styled(
                    "LIVE ",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("{} {score}", game.matchup())),
            ])
        }
        FocusStatus::Recap(game) => Line::from(vec![
            Span::styled("FINAL ", Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} {}", game.matchup(), game_score(game))),
        ]),
        FocusStatus::Preview(game) => Line::from(vec![
            Span::styled("NEXT ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(format!("{} {}", game.matchup(), game_when(game))),
        ]),
        FocusStatus::None => Line::from(Span::styled(
            "No games scheduled",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let cmp = &focus.comparison;
    let ranks = match (cmp.team_rank, cmp.opponent_rank) {
        (Some(t), Some(o)) => format!(
            "momentum rank #{t} vs #{o} of {}{}",
            cmp.teams_ranked,
            cmp.edge().map(|e| format!("  edge {e:+.2}")).unwrap_or_default()
        ),
        (Some(t), None) => format!("momentum rank #{t} of {}", cmp.teams_ranked),
        _ => cmp.error.clone().unwrap_or_default(),
    };

    vec![headline, Line::from(Span::styled(ranks, Style::default().fg(Color::DarkGray)))]
}

fn game_score(game: &FocusGame) -> String {
    match (game.team_score, game.opp_score) {
        (Some(us), Some(them)) => format!("{us}-{them}"),
        _ => String::new(),
    }
}

fn game_when(game: &FocusGame) -> String {
    game.start
        .map(|s| s.with_timezone(&Local).format("%a %b %-d %I:%M %p").to_string())
        .unwrap_or_else(|| game.date.format("%a %b %-d").to_string())
}

fn draw_momentum_bars(f: &mut Frame, area: Rect, focus: &FocusView) {
    let rows = Layout::vertical([Constraint::Length(1); 3]).split(area);
    let sides = [&focus.comparison.team, &focus.comparison.opponent];
    for (row, side) in rows.iter().zip(sides) {
        if let Some(team) = side {
            let label = format!("{} {}", team.id, team.recent_record);
            f.render_widget(
                MomentumBar { label: &label, score: team.hotness_score, label_width: 9 },
                *row,
            );
        }
    }
}

fn draw_week(f: &mut Frame, area: Rect, week: &[FocusGame]) {
    let block = default_border(Color::DarkGray).title(" Next 7 days ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    if week.is_empty() {
        f.render_widget(
            Paragraph::new("No games this week").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = week
        .iter()
        .map(|g| {
            let result = if g.state.is_complete() {
                format!("  {}", game_score(g))
            } else if g.state.is_live() {
                "  LIVE".to_string()
            } else {
                String::new()
            };
            Line::from(format!("{}  {}{result}", game_when(g), g.matchup()))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_roster(f: &mut Frame, area: Rect, focus: &FocusView) {
    let block = default_border(Color::DarkGray).title(format!(" {} in form ", focus.team));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if focus.roster.is_empty() {
        f.render_widget(
            Paragraph::new("No leaderboard skaters").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let rows = focus.roster.iter().map(|s| {
        let recent = s.recent_stats.unwrap_or_default();
        Row::new(vec![
            Cell::from(s.name.clone()),
            Cell::from(s.position.clone()),
            Cell::from(format!("{}-{}-{}", recent.goals, recent.assists, recent.points)),
            Cell::from(format!("{:.2}", s.recent_points_per_game)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(3),
            Constraint::Length(9),
            Constraint::Length(5),
        ],
    )
    .header(header(&["Player", "Pos", "G-A-P", "P/GP"]));
    f.render_widget(table, inner);
}

fn draw_search(f: &mut Frame, area: Rect, app: &App) {
    let search = &app.state.search;
    let [prompt_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let (border, cursor) = if search.editing {
        (Color::Yellow, "_")
    } else {
        (Color::DarkGray, "")
    };
    let prompt = Paragraph::new(format!("{}{cursor}", search.input))
        .block(default_border(border).title(" Player search (/) "));
    f.render_widget(prompt, prompt_area);

    let title = match &search.submitted {
        Some(query) => format!(" Results for {query:?} "),
        None => " Results ".to_string(),
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(results_area);
    f.render_widget(block, results_area);

    let msg = match (&search.submitted, &search.results) {
        (None, _) => Some("Press / and type at least two letters of a name"),
        (Some(_), None) => Some("Searching..."),
        (Some(_), Some(results)) if results.is_empty() => Some("No players found"),
        _ => None,
    };
    if let Some(msg) = msg {
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let results = search.results.as_deref().unwrap_or_default();
    let rows = results.iter().map(|p| {
        let style = match p.active {
            true => Style::default(),
            false => Style::default().fg(Color::DarkGray),
        };
        Row::new(vec![
            Cell::from(p.sweater_number.clone().map(|n| format!("#{n}")).unwrap_or_default()),
            Cell::from(p.name.clone()),
            Cell::from(p.position_code.clone().unwrap_or_default()),
            Cell::from(p.team_abbrev.clone().unwrap_or_else(|| "-".to_string())),
        ])
        .style(style)
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(4),
            Constraint::Length(5),
        ],
    )
    .header(header(&["#", "Player", "Pos", "Team"]))
    .row_highlight_style(selected_style());
    f.render_stateful_widget(table, inner, &mut table_state(search.selected));
}

/// A `percent_x` by `percent_y` box centered in `area`.
fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(mid);
    center
}

fn draw_detail(f: &mut Frame, area: Rect, detail: &DetailView) {
    let (title, lines) = match detail {
        DetailView::Player(profile) => (format!(" {} ", profile.name), player_lines(profile)),
        DetailView::Game(center) => (
            format!(" {} @ {} ", center.away.abbrev, center.home.abbrev),
            game_lines(center),
        ),
    };
    let popup = centered(area, 70, 70);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .block(default_border(Color::Yellow).title(title).title_bottom(" Esc closes ")),
        popup,
    );
}

fn label(name: &str) -> Span<'static> {
    Span::styled(format!("{name:<10}"), Style::default().fg(Color::Gray))
}

fn player_lines(profile: &PlayerProfile) -> Vec<Line<'static>> {
    let number = profile.sweater_number.map(|n| format!("#{n} ")).unwrap_or_default();
    let mut bio = vec![format!("{number}{}", profile.position)];
    bio.extend(profile.height());
    bio.extend(profile.weight_pounds.map(|w| format!("{w} lb")));
    bio.extend(profile.age.map(|a| format!("age {a}")));

    let mut lines = vec![
        Line::from(vec![label("Team"), Span::raw(profile.team.clone())]),
        Line::from(vec![label("Bio"), Span::raw(bio.join(", "))]),
    ];
    if !profile.birthplace.is_empty() {
        lines.push(Line::from(vec![label("Born"), Span::raw(profile.birthplace.clone())]));
    }
    lines.push(Line::default());
    for (name, stats) in [("Season", &profile.season), ("Career", &profile.career)] {
        let text = match stats {
            Some(stats) => stat_line(stats, profile.is_goalie()),
            None => "-".to_string(),
        };
        lines.push(Line::from(vec![label(name), Span::raw(text)]));
    }
    lines
}

fn stat_line(stats: &ProfileStats, goalie: bool) -> String {
    if goalie {
        format!(
            "{} GP  {}-{}  {} SV%  {:.2} GAA  {} SO",
            stats.games_played,
            stats.wins,
            stats.losses,
            rate(stats.save_pct),
            stats.gaa,
            stats.shutouts
        )
    } else {
        format!(
            "{} GP  {}-{}-{}  {:+}  {} PIM",
            stats.games_played,
            stats.goals,
            stats.assists,
            stats.points,
            stats.plus_minus,
            stats.pim
        )
    }
}

fn game_lines(center: &GameCenter) -> Vec<Line<'static>> {
    let status = match center.state {
        GameState::Live | GameState::Critical => {
            let period = center.period.map(|p| format!("P{p} ")).unwrap_or_default();
            format!("LIVE {period}{}", center.clock.clone().unwrap_or_default())
        }
        GameState::Off | GameState::Final => "FINAL".to_string(),
        _ => center.state.label().to_string(),
    };
    let mut lines = vec![
        Line::from(Span::styled(status, Style::default().fg(Color::Green))),
        Line::from(vec![
            label(""),
            Span::raw(format!("{:>6} {:>6}", center.away.abbrev, center.home.abbrev)),
        ]),
        team_stat_row("Goals", &center.away, &center.home, |t| Some(t.score.to_string())),
        team_stat_row("Shots", &center.away, &center.home, |t| t.shots.map(|s| s.to_string())),
        team_stat_row("PP", &center.away, &center.home, |t| t.power_play.clone()),
        team_stat_row("Faceoffs", &center.away, &center.home, |t| {
            t.faceoff_pct.map(|p| format!("{:.0}%", p * 100.0))
        }),
    ];
    if !center.key_plays.is_empty() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled("Key plays", Style::default().fg(Color::Gray))));
        lines.extend(center.key_plays.iter().map(|play| {
            let period = play.period.map(|p| format!("P{p}")).unwrap_or_default();
            let team = play.team.clone().unwrap_or_default();
            Line::from(format!("{period:<3} {:>5}  {:<8} {team}", play.time, play.kind))
        }));
    }
    lines
}

fn team_stat_row(
    name: &str,
    away: &TeamGameStats,
    home: &TeamGameStats,
    stat: impl Fn(&TeamGameStats) -> Option<String>,
) -> Line<'static> {
    let cell = |t: &TeamGameStats| stat(t).unwrap_or_else(|| "-".to_string());
    Line::from(vec![label(name), Span::raw(format!("{:>6} {:>6}", cell(away), cell(home)))])
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let keys = [
        ("1-6", "Skaters / Goalies / Teams / Today / Focus / Search"),
        ("j/k", "move selection"),
        ("/", "search players (Enter sends, Esc stops typing)"),
        ("Enter", "player or game detail for the selected row"),
        ("w", "cycle recent-games window (5, 10, 15, 20)"),
        ("r", "reload this tab"),
        ("R", "clear cache and reload everything"),
        ("\"", "toggle log pane"),
        ("f", "toggle full screen"),
        ("Esc", "close detail / leave help"),
        ("q", "quit"),
    ];
    let lines: Vec<Line> = keys
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!("{key:>5}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .output_level(Some(TuiLoggerLevelOutput::Abbreviated))
        .output_target(false)
        .output_file(false)
        .output_line(false)
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(16), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skater_and_goalie_stat_lines() {
        let skater = ProfileStats {
            games_played: 62,
            goals: 26,
            assists: 74,
            points: 100,
            plus_minus: -3,
            pim: 30,
            ..Default::default()
        };
        assert_eq!(stat_line(&skater, false), "62 GP  26-74-100  -3  30 PIM");

        let goalie = ProfileStats {
            games_played: 50,
            wins: 30,
            losses: 15,
            shutouts: 4,
            save_pct: 0.9123,
            gaa: 2.456,
            ..Default::default()
        };
        assert_eq!(stat_line(&goalie, true), "50 GP  30-15  .912 SV%  2.46 GAA  4 SO");
    }

    #[test]
    fn missing_team_stats_show_a_dash() {
        let away = TeamGameStats { abbrev: "VAN".into(), shots: Some(28), ..Default::default() };
        let home = TeamGameStats { abbrev: "EDM".into(), ..Default::default() };
        let line = team_stat_row("Shots", &away, &home, |t| t.shots.map(|s| s.to_string()));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Shots         28      -");
    }

    #[test]
    fn rates_drop_the_leading_zero() {
        assert_eq!(rate(0.9154), ".915");
        assert_eq!(rate(1.0), "1.000");
        assert_eq!(rate(0.0), ".000");
    }

    #[test]
    fn live_status_shows_period_and_clock() {
        let game = TodayGame {
            state: GameState::Live,
            period: Some(2),
            period_type: Some("REG".into()),
            clock: Some("12:34".into()),
            ..Default::default()
        };
        assert_eq!(game_status(&game), "LIVE P2 12:34");

        let ot = TodayGame { period: Some(4), period_type: Some("OT".into()), clock: None, ..game };
        assert_eq!(game_status(&ot), "LIVE OT");
    }

    #[test]
    fn finished_and_unknown_games() {
        let done = TodayGame { state: GameState::Final, ..Default::default() };
        assert_eq!(game_status(&done), "FINAL");
        let tbd = TodayGame { state: GameState::Future, start_time: None, ..Default::default() };
        assert_eq!(game_status(&tbd), "FUT");
    }

    #[test]
    fn team_line_pads_missing_scores() {
        let team = TodayTeam { abbrev: "EDM".into(), score: None, ..Default::default() };
        assert_eq!(team_line(&team), "EDM  -");
    }
}
