//! NHL web API raw wire types: serde shapes for api-web.nhle.com and
//! search.d3.nhle.com responses. Every field is optional or defaulted so a
//! partial payload still deserializes. Mapping to domain types lives in client.rs.
use log::warn;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Localized string: `{"default": "Edmonton", "fr": "..."}`.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LocalizedName {
    #[serde(default)]
    pub default: String,
}

fn localized(name: &Option<LocalizedName>) -> String {
    name.as_ref().map(|n| n.default.clone()).unwrap_or_default()
}

/// `null` reads as the empty value, same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Standings  (/v1/standings/{date})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub standings: Vec<StandingRow>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct StandingRow {
    pub team_abbrev: Option<LocalizedName>,
    pub team_name: Option<LocalizedName>,
    pub team_common_name: Option<LocalizedName>,
    pub team_logo: Option<String>,
    pub wins: Option<u32>,
    pub losses: Option<u32>,
    pub ot_losses: Option<u32>,
    pub points: Option<u32>,
    pub games_played: Option<u32>,
    pub goal_for: Option<i32>,
    pub goal_against: Option<i32>,
    pub goal_differential: Option<i32>,
    pub streak_code: Option<String>,
    pub streak_count: Option<u32>,
    pub l10_wins: Option<u32>,
    pub l10_losses: Option<u32>,
    pub l10_ot_losses: Option<u32>,
    pub home_wins: Option<u32>,
    pub home_losses: Option<u32>,
    pub home_ot_losses: Option<u32>,
    pub road_wins: Option<u32>,
    pub road_losses: Option<u32>,
    pub road_ot_losses: Option<u32>,
    pub division_name: Option<String>,
    pub division_abbrev: Option<String>,
    pub conference_name: Option<String>,
    pub conference_abbrev: Option<String>,
    pub league_sequence: Option<u32>,
    pub wildcard_sequence: Option<u32>,
}

impl StandingRow {
    pub fn abbrev(&self) -> String {
        localized(&self.team_abbrev)
    }

    pub fn name(&self) -> String {
        localized(&self.team_name)
    }

    pub fn common_name(&self) -> String {
        localized(&self.team_common_name)
    }
}

// ---------------------------------------------------------------------------
// Leaders  (/v1/skater-stats-leaders/{season}/2, /v1/goalie-stats-leaders/{season}/2)
// ---------------------------------------------------------------------------

/// Category name → leader rows. Categories the API did not return are simply
/// absent from the map; values are kept raw so one odd key can't sink the rest.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LeadersResponse {
    #[serde(flatten)]
    pub categories: HashMap<String, serde_json::Value>,
}

impl LeadersResponse {
    /// Rows for one category, empty when absent or not a list. Rows that
    /// don't parse are dropped one at a time.
    pub fn rows(&self, category: &str) -> Vec<LeaderRow> {
        let Some(serde_json::Value::Array(rows)) = self.categories.get(category) else {
            return Vec::new();
        };
        rows.iter()
            .filter_map(|raw| match LeaderRow::deserialize(raw) {
                Ok(row) => Some(row),
                Err(e) => {
                    warn!("skipping {category} leader row: {e}");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaderRow {
    pub id: u64,
    pub first_name: Option<LocalizedName>,
    pub last_name: Option<LocalizedName>,
    pub sweater_number: Option<u32>,
    pub headshot: Option<String>,
    pub team_abbrev: Option<String>,
    pub team_logo: Option<String>,
    #[serde(alias = "positionCode")]
    pub position: Option<String>,
    /// Points, goals and wins arrive as integers; savePctg and GAA as floats.
    pub value: Option<f64>,
}

impl LeaderRow {
    pub fn full_name(&self) -> String {
        format!("{} {}", localized(&self.first_name), localized(&self.last_name))
            .trim()
            .to_owned()
    }
}

// ---------------------------------------------------------------------------
// Player game log  (/v1/player/{id}/game-log/{season}/2)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameLogResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_log: Vec<GameLogEntry>,
}

/// One game in a player's log, most recent first. Skater and goalie rows share
/// the shape; fields that don't apply are absent.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct GameLogEntry {
    pub game_id: Option<u64>,
    pub game_date: Option<String>,
    pub opponent_abbrev: Option<String>,
    pub home_road_flag: Option<String>,
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub points: Option<i64>,
    pub plus_minus: Option<i64>,
    pub shots: Option<i64>,
    /// "W", "L" or "O" for goalies with a decision.
    pub decision: Option<String>,
    pub shots_against: Option<i64>,
    pub goals_against: Option<i64>,
    pub shutouts: Option<i64>,
}

// ---------------------------------------------------------------------------
// Schedules  (/v1/club-schedule-season/{team}/{season}, /v1/schedule/{date})
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ClubScheduleResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_week: Vec<GameDay>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct GameDay {
    pub date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub games: Vec<ScheduleGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleGame {
    pub id: u64,
    pub game_date: Option<String>,
    #[serde(rename = "startTimeUTC")]
    pub start_time_utc: Option<String>,
    /// "FUT", "PRE", "LIVE", "CRIT", "OFF", "FINAL"
    pub game_state: Option<String>,
    pub home_team: Option<ScheduleTeam>,
    pub away_team: Option<ScheduleTeam>,
    pub venue: Option<LocalizedName>,
    pub period_descriptor: Option<PeriodDescriptor>,
    pub clock: Option<GameClock>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleTeam {
    pub abbrev: Option<String>,
    pub place_name: Option<LocalizedName>,
    pub common_name: Option<LocalizedName>,
    pub logo: Option<String>,
    pub score: Option<u32>,
    pub record: Option<String>,
}

impl ScheduleTeam {
    /// Place name, falling back to the common name ("Edmonton" / "Oilers").
    pub fn display_name(&self) -> String {
        let place = localized(&self.place_name);
        if place.is_empty() { localized(&self.common_name) } else { place }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct PeriodDescriptor {
    pub number: Option<u8>,
    pub period_type: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct GameClock {
    pub time_remaining: Option<String>,
}

// ---------------------------------------------------------------------------
// Player search  (search.d3.nhle.com/api/v1/search/player)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchPlayer {
    #[serde(deserialize_with = "string_or_number")]
    pub player_id: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub team_abbrev: Option<String>,
    pub last_team_abbrev: Option<String>,
    pub current_team_abbrev: Option<String>,
    pub position_code: Option<String>,
    pub position: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub sweater_number: Option<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub jersey_number: Option<String>,
    pub active: Option<bool>,
    pub headshot: Option<String>,
}

/// The search index sends ids and sweater numbers as strings, the stats API as
/// numbers. Accept either.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaders_response_keeps_each_category() {
        let raw = json!({
            "wins": [{"id": 1, "value": 30}],
            "savePctg": [{"id": 2, "value": 0.925}]
        });
        let parsed: LeadersResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.categories.len(), 2);
        assert_eq!(parsed.rows("savePctg")[0].value, Some(0.925));
        assert!(parsed.rows("goalsAgainstAverage").is_empty());
    }

    #[test]
    fn malformed_category_yields_no_rows() {
        let parsed: LeadersResponse = serde_json::from_value(json!({"points": "oops"})).unwrap();
        assert!(parsed.rows("points").is_empty());
    }

    #[test]
    fn bad_rows_are_dropped_without_losing_the_category() {
        let parsed: LeadersResponse = serde_json::from_value(json!({
            "points": [
                {"id": 1, "value": 40},
                {"id": 2, "value": 35},
                {"id": null, "value": 30},
                {"id": 4, "value": "lots"}
            ]
        }))
        .unwrap();
        let ids: Vec<u64> = parsed.rows("points").iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn leader_row_accepts_position_code_alias() {
        let raw = json!({
            "id": 8478402,
            "positionCode": "C",
            "firstName": {"default": "Connor"},
            "lastName": {"default": "McDavid"}
        });
        let row: LeaderRow = serde_json::from_value(raw).unwrap();
        assert_eq!(row.position.as_deref(), Some("C"));
        assert_eq!(row.full_name(), "Connor McDavid");
    }

    #[test]
    fn missing_top_level_keys_deserialize_as_empty() {
        let standings: StandingsResponse = serde_json::from_value(json!({})).unwrap();
        assert!(standings.standings.is_empty());
        let log: GameLogResponse = serde_json::from_value(json!({"seasonId": 20242025})).unwrap();
        assert!(log.game_log.is_empty());
        let schedule: ScheduleResponse = serde_json::from_value(json!({"gameWeek": []})).unwrap();
        assert!(schedule.game_week.is_empty());
    }

    #[test]
    fn null_top_level_lists_deserialize_as_empty() {
        let standings: StandingsResponse =
            serde_json::from_value(json!({"standings": null})).unwrap();
        assert!(standings.standings.is_empty());
        let log: GameLogResponse = serde_json::from_value(json!({"gameLog": null})).unwrap();
        assert!(log.game_log.is_empty());
        let club: ClubScheduleResponse = serde_json::from_value(json!({"games": null})).unwrap();
        assert!(club.games.is_empty());
        let week: ScheduleResponse =
            serde_json::from_value(json!({"gameWeek": [{"date": "2025-01-15", "games": null}]}))
                .unwrap();
        assert!(week.game_week[0].games.is_empty());
        let week: ScheduleResponse = serde_json::from_value(json!({"gameWeek": null})).unwrap();
        assert!(week.game_week.is_empty());
    }

    #[test]
    fn search_player_ids_accept_strings_and_numbers() {
        let a: SearchPlayer =
            serde_json::from_value(json!({"playerId": "8478402", "sweaterNumber": 97})).unwrap();
        assert_eq!(a.player_id.as_deref(), Some("8478402"));
        assert_eq!(a.sweater_number.as_deref(), Some("97"));
        let b: SearchPlayer = serde_json::from_value(json!({"id": 8471214})).unwrap();
        assert_eq!(b.id.as_deref(), Some("8471214"));
        assert!(b.player_id.is_none());
    }

    #[test]
    fn schedule_team_name_falls_back_to_common_name() {
        let team: ScheduleTeam =
            serde_json::from_value(json!({"commonName": {"default": "Oilers"}})).unwrap();
        assert_eq!(team.display_name(), "Oilers");
    }
}
