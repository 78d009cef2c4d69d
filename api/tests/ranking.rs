use chrono::NaiveDate;
use mockito::{Matcher, Mock, Server, ServerGuard};
use nhl_api::client::NhlApi;
use nhl_api::ranking::{Ranker, RankingConfig};
use serde_json::{Value, json};

const SEASON: &str = "20242025";

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn ranker(server: &ServerGuard, config: RankingConfig) -> Ranker {
    Ranker::new(NhlApi::with_base_urls(server.url(), server.url()), config)
        .with_reference_date(reference_date())
}

fn leader(id: u64, team: &str, value: f64) -> Value {
    json!({
        "id": id,
        "firstName": {"default": format!("Player{id}")},
        "lastName": {"default": "Test"},
        "teamAbbrev": team,
        "positionCode": "C",
        "value": value
    })
}

async fn leaders_mock(
    server: &mut ServerGuard,
    category: &str,
    rows: Vec<Value>,
    hits: usize,
) -> Mock {
    server
        .mock("GET", format!("/v1/skater-stats-leaders/{SEASON}/2").as_str())
        .match_query(Matcher::UrlEncoded("categories".into(), category.into()))
        .with_header("content-type", "application/json")
        .with_body(json!({ category: rows }).to_string())
        .expect(hits)
        .create_async()
        .await
}

/// Five games, each worth `points_per_game` points.
async fn game_log_mock(
    server: &mut ServerGuard,
    id: u64,
    points_per_game: i64,
    hits: usize,
) -> Mock {
    let game = json!({
        "goals": points_per_game,
        "assists": 0,
        "points": points_per_game,
        "shots": 2
    });
    let games: Vec<Value> = (0..5).map(|_| game.clone()).collect();
    server
        .mock("GET", format!("/v1/player/{id}/game-log/{SEASON}/2").as_str())
        .with_body(json!({ "gameLog": games }).to_string())
        .expect(hits)
        .create_async()
        .await
}

async fn failing_game_log_mock(server: &mut ServerGuard, id: u64) -> Mock {
    server
        .mock("GET", format!("/v1/player/{id}/game-log/{SEASON}/2").as_str())
        .with_status(500)
        .create_async()
        .await
}

/// Twelve skaters split between two clubs; season points fall with id and
/// recent points per game is id % 4.
async fn skater_fixture(
    server: &mut ServerGuard,
    failing: Option<u64>,
    hits: usize,
) -> Vec<Mock> {
    let points: Vec<Value> = (1..=12)
        .map(|id| leader(id, if id % 2 == 0 { "CGY" } else { "EDM" }, 60.0 - id as f64))
        .collect();
    let goals: Vec<Value> = (1..=6).map(|id| leader(id, "EDM", 30.0 - id as f64)).collect();
    let assists: Vec<Value> = (7..=12).map(|id| leader(id, "CGY", 20.0)).collect();

    let mut mocks = vec![
        leaders_mock(server, "points", points, hits).await,
        leaders_mock(server, "goals", goals, hits).await,
        leaders_mock(server, "assists", assists, hits).await,
    ];
    for id in 1..=12u64 {
        if Some(id) == failing {
            mocks.push(failing_game_log_mock(server, id).await);
        } else {
            mocks.push(game_log_mock(server, id, (id % 4) as i64, hits).await);
        }
    }
    mocks
}

fn assert_non_increasing(scores: &[f64]) {
    assert!(
        scores.windows(2).all(|w| w[0] >= w[1]),
        "scores not sorted: {scores:?}"
    );
}

#[tokio::test]
async fn skaters_rank_by_recent_points_per_game() {
    let mut server = Server::new_async().await;
    let _mocks = skater_fixture(&mut server, None, 1).await;
    let config = RankingConfig { skater_candidates: 12, ..Default::default() };

    let ranking = ranker(&server, config).rank_skaters(5).await;
    assert!(ranking.is_ok());
    assert_eq!(ranking.entries.len(), 10);

    let scores: Vec<f64> = ranking.entries.iter().map(|s| s.recent_points_per_game).collect();
    assert_non_increasing(&scores);
    assert_eq!(scores[0], 3.0);

    // Ties keep season-points order: ids 3, 7, 11 all average 3.0.
    let top: Vec<u64> = ranking.entries.iter().take(3).map(|s| s.id).collect();
    assert_eq!(top, vec![3, 7, 11]);

    let first = &ranking.entries[0];
    assert_eq!(first.season_points, 57);
    assert_eq!(first.season_goals, 27);
    assert_eq!(first.season_assists, 0);
    assert_eq!(first.recent_stats.map(|s| s.games), Some(5));
}

#[tokio::test]
async fn failed_game_log_degrades_instead_of_dropping() {
    let mut server = Server::new_async().await;
    let _mocks = skater_fixture(&mut server, Some(3), 1).await;
    let config = RankingConfig { skater_candidates: 12, top_n: 12, ..Default::default() };

    let ranking = ranker(&server, config).rank_skaters(5).await;
    assert!(ranking.is_ok());
    assert_eq!(ranking.entries.len(), 12);

    let degraded = ranking.entries.iter().find(|s| s.id == 3).unwrap();
    assert_eq!(degraded.recent_points_per_game, 0.0);
    assert_eq!(degraded.recent_stats.map(|s| s.games), Some(0));
    assert_eq!(degraded.season_points, 57);

    let scores: Vec<f64> = ranking.entries.iter().map(|s| s.recent_points_per_game).collect();
    assert_non_increasing(&scores);
}

#[tokio::test]
async fn one_failure_still_fills_the_top_ten() {
    let mut server = Server::new_async().await;
    let _mocks = skater_fixture(&mut server, Some(7), 1).await;
    let config = RankingConfig { skater_candidates: 12, ..Default::default() };

    let ranking = ranker(&server, config).rank_skaters(5).await;
    assert_eq!(ranking.entries.len(), 10);
}

#[tokio::test]
async fn only_candidates_get_game_logs() {
    let mut server = Server::new_async().await;
    let points: Vec<Value> = (1..=4).map(|id| leader(id, "EDM", 10.0 * id as f64)).collect();
    let _p = leaders_mock(&mut server, "points", points, 1).await;
    let _g = leaders_mock(&mut server, "goals", vec![], 1).await;
    let _a = leaders_mock(&mut server, "assists", vec![], 1).await;
    let hot = game_log_mock(&mut server, 4, 2, 1).await;
    let warm = game_log_mock(&mut server, 3, 1, 1).await;
    let skipped = server
        .mock("GET", Matcher::Regex(r"^/v1/player/[12]/game-log/".into()))
        .expect(0)
        .create_async()
        .await;

    let config = RankingConfig { skater_candidates: 2, ..Default::default() };
    let ranking = ranker(&server, config).rank_skaters(5).await;

    let ids: Vec<u64> = ranking.entries.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![4, 3]);
    hot.assert_async().await;
    warm.assert_async().await;
    skipped.assert_async().await;
}

#[tokio::test]
async fn base_failure_is_an_empty_ranking_with_an_error() {
    let mut server = Server::new_async().await;
    let _p = server
        .mock("GET", format!("/v1/skater-stats-leaders/{SEASON}/2").as_str())
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;
    let logs = server
        .mock("GET", Matcher::Regex(r"/game-log/".into()))
        .expect(0)
        .create_async()
        .await;

    let ranking = ranker(&server, RankingConfig::default()).rank_skaters(10).await;
    assert!(ranking.entries.is_empty());
    assert!(ranking.error.as_deref().is_some_and(|e| e.contains("503")));
    logs.assert_async().await;
}

#[tokio::test]
async fn malformed_leader_row_only_drops_that_row() {
    let mut server = Server::new_async().await;
    let mut bad = leader(3, "EDM", 50.0);
    bad["id"] = Value::Null;
    let points = vec![leader(1, "EDM", 58.0), leader(2, "CGY", 57.0), bad];
    let _mocks = vec![
        leaders_mock(&mut server, "points", points, 1).await,
        leaders_mock(&mut server, "goals", vec![], 1).await,
        leaders_mock(&mut server, "assists", vec![], 1).await,
        game_log_mock(&mut server, 1, 1, 1).await,
        game_log_mock(&mut server, 2, 2, 1).await,
    ];

    let ranking = ranker(&server, RankingConfig::default()).rank_skaters(5).await;
    assert!(ranking.is_ok());
    let points: Vec<(u64, u32)> =
        ranking.entries.iter().map(|s| (s.id, s.season_points)).collect();
    assert_eq!(points, vec![(2, 57), (1, 58)]);
}

#[tokio::test]
async fn repeated_ranking_is_served_from_cache_until_cleared() {
    let mut server = Server::new_async().await;
    let mocks = skater_fixture(&mut server, None, 2).await;
    let ranker = ranker(&server, RankingConfig { skater_candidates: 12, ..Default::default() });

    let first = ranker.rank_skaters(5).await;
    let second = ranker.rank_skaters(5).await;
    assert_eq!(first, second);

    ranker.clear_cache();
    let third = ranker.rank_skaters(5).await;
    assert_eq!(first, third);

    for mock in &mocks {
        mock.assert_async().await;
    }
}

// ---------------------------------------------------------------------------
// Goalies
// ---------------------------------------------------------------------------

fn goalie_log(decisions: &[&str], shots: i64, goals: i64) -> String {
    let games: Vec<Value> = decisions
        .iter()
        .map(|d| json!({"decision": d, "shotsAgainst": shots, "goalsAgainst": goals}))
        .collect();
    json!({ "gameLog": games }).to_string()
}

#[tokio::test]
async fn goalies_rank_by_blended_score_and_degrade_on_failure() {
    let mut server = Server::new_async().await;
    let _leaders = server
        .mock("GET", format!("/v1/goalie-stats-leaders/{SEASON}/2").as_str())
        .match_query(Matcher::UrlEncoded(
            "categories".into(),
            "wins,savePctg,goalsAgainstAverage".into(),
        ))
        .with_body(
            json!({
                "wins": [leader(30, "EDM", 25.0), leader(31, "VAN", 22.0), leader(32, "WPG", 20.0)],
                "savePctg": [leader(31, "VAN", 0.915)],
                "goalsAgainstAverage": [leader(32, "WPG", 2.3)]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _a = server
        .mock("GET", format!("/v1/player/30/game-log/{SEASON}/2").as_str())
        .with_body(goalie_log(&["L", "L", "O"], 25, 4))
        .create_async()
        .await;
    let _b = server
        .mock("GET", format!("/v1/player/31/game-log/{SEASON}/2").as_str())
        .with_body(goalie_log(&["W", "W", "W", "L"], 30, 1))
        .create_async()
        .await;
    let _c = failing_game_log_mock(&mut server, 32).await;

    let ranking = ranker(&server, RankingConfig::default()).rank_goalies(10).await;
    let ids: Vec<u64> = ranking.entries.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![31, 30, 32]);

    let best = &ranking.entries[0];
    let stats = best.recent_stats.unwrap();
    assert_eq!(stats.wins, 3);
    assert!((stats.save_pct - 29.0 / 30.0).abs() < 1e-12);
    assert!((stats.gaa - 1.0).abs() < 1e-12);
    assert_eq!(best.season_save_pct, 0.915);

    let failed = &ranking.entries[2];
    assert_eq!(failed.hotness_score, 0.0);
    assert_eq!(failed.season_gaa, 2.3);
    assert_eq!(failed.recent_stats.unwrap().games_played, 0);
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

fn club_game(id: u64, date: &str, state: &str, home: (&str, u32), away: (&str, u32)) -> Value {
    json!({
        "id": id,
        "gameDate": date,
        "gameState": state,
        "homeTeam": {"abbrev": home.0, "score": home.1},
        "awayTeam": {"abbrev": away.0, "score": away.1}
    })
}

/// Eleven finished games (a 0-10 blowout first), then one still to play.
/// The last ten go 7-3 with a +12 goal difference.
fn edm_schedule() -> String {
    let mut games = vec![club_game(100, "2024-12-20", "OFF", ("EDM", 0), ("CGY", 10))];
    for i in 0..10u64 {
        let date = format!("2025-01-{:02}", i + 1);
        let game = if i < 7 {
            club_game(101 + i, &date, "OFF", ("EDM", 4), ("SEA", 1))
        } else {
            club_game(101 + i, &date, "FINAL", ("VAN", 4), ("EDM", 1))
        };
        games.push(game);
    }
    games.push(club_game(200, "2025-01-20", "FUT", ("EDM", 0), ("CGY", 0)));
    json!({ "games": games }).to_string()
}

async fn team_fixture(server: &mut ServerGuard) -> Vec<Mock> {
    vec![
        server
            .mock("GET", "/v1/standings/2025-01-15")
            .with_body(
                json!({"standings": [
                    {"teamAbbrev": {"default": "CGY"}, "teamName": {"default": "Calgary Flames"},
                     "wins": 25, "losses": 15, "otLosses": 3, "points": 53, "gamesPlayed": 43},
                    {"teamAbbrev": {"default": "EDM"}, "teamName": {"default": "Edmonton Oilers"},
                     "wins": 24, "losses": 16, "otLosses": 3, "points": 51, "gamesPlayed": 43}
                ]})
                .to_string(),
            )
            .create_async()
            .await,
        server
            .mock("GET", format!("/v1/club-schedule-season/EDM/{SEASON}").as_str())
            .with_body(edm_schedule())
            .create_async()
            .await,
        server
            .mock("GET", format!("/v1/club-schedule-season/CGY/{SEASON}").as_str())
            .with_status(500)
            .create_async()
            .await,
    ]
}

#[tokio::test]
async fn hot_team_scores_seventy_over_its_last_ten() {
    let mut server = Server::new_async().await;
    let _mocks = team_fixture(&mut server).await;

    let ranking = ranker(&server, RankingConfig::default()).rank_teams(10, 10).await;
    assert_eq!(ranking.entries.len(), 2);

    let edm = &ranking.entries[0];
    assert_eq!(edm.id, "EDM");
    assert_eq!(edm.recent_record, "7-3");
    assert_eq!(edm.recent_goal_diff, 12);
    assert_eq!(edm.recent_games.len(), 10);
    assert!((edm.recent_gd_per_game - 1.2).abs() < 1e-12);
    assert!((edm.hotness_score - 0.70).abs() < 1e-9);

    let cgy = &ranking.entries[1];
    assert_eq!(cgy.id, "CGY");
    assert_eq!(cgy.hotness_score, 0.0);
    assert_eq!(cgy.points, 53, "standing survives a failed schedule");
}

#[tokio::test]
async fn null_standings_are_an_empty_league_not_a_failure() {
    let mut server = Server::new_async().await;
    let standings = server
        .mock("GET", "/v1/standings/2025-01-15")
        .with_body(r#"{"standings": null}"#)
        .create_async()
        .await;

    let ranking = ranker(&server, RankingConfig::default()).rank_teams(32, 10).await;
    assert!(ranking.is_ok(), "got {:?}", ranking.error);
    assert!(ranking.entries.is_empty());
    standings.assert_async().await;
}

#[tokio::test]
async fn team_limit_truncates() {
    let mut server = Server::new_async().await;
    let _mocks = team_fixture(&mut server).await;
    let ranking = ranker(&server, RankingConfig::default()).rank_teams(1, 10).await;
    assert_eq!(ranking.entries.len(), 1);
    assert_eq!(ranking.entries[0].id, "EDM");
}

#[tokio::test]
async fn comparison_reports_both_ranks() {
    let mut server = Server::new_async().await;
    let _mocks = team_fixture(&mut server).await;
    let ranker = ranker(&server, RankingConfig::default());

    let cmp = ranker.momentum_comparison("CGY", "EDM", 10).await;
    assert_eq!(cmp.team_rank, Some(2));
    assert_eq!(cmp.opponent_rank, Some(1));
    assert_eq!(cmp.teams_ranked, 2);
    assert!(cmp.edge().unwrap() < 0.0);

    let missing = ranker.momentum_comparison("EDM", "XXX", 10).await;
    assert!(missing.opponent.is_none());
    assert_eq!(missing.team_rank, Some(1));
}

#[tokio::test]
async fn single_team_momentum() {
    let mut server = Server::new_async().await;
    let _mocks = team_fixture(&mut server).await;
    let ranker = ranker(&server, RankingConfig::default());

    let edm = ranker.team_momentum("EDM", 5).await.unwrap();
    assert_eq!(edm.recent_games.len(), 5);
    assert_eq!(edm.recent_record, "2-3");
    assert!(ranker.team_momentum("XXX", 5).await.is_none());
}

#[tokio::test]
async fn roster_form_filters_to_one_club() {
    let mut server = Server::new_async().await;
    let _mocks = skater_fixture(&mut server, None, 1).await;

    let ranking = ranker(&server, RankingConfig::default()).team_roster_form("CGY", 5).await;
    assert!(ranking.is_ok());
    assert!(!ranking.entries.is_empty());
    assert_eq!(ranking.entries.len(), 6);
    assert!(ranking.entries.iter().all(|s| s.team_abbrev == "CGY"));
    assert_eq!(ranking.entries[0].id, 2, "2, 6 and 10 tie on form; 2 has the most points");
}
