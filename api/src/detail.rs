//! Player and game detail read out of the raw landing, boxscore and
//! play-by-play payloads. Those documents are large and loosely shaped, so
//! only the handful of keys shown on screen are picked out by JSON pointer.

use crate::GameState;
use serde_json::Value;

pub(crate) fn str_at(doc: &Value, ptr: &str) -> Option<String> {
    doc.pointer(ptr).and_then(Value::as_str).map(str::to_owned)
}

/// Plain strings or localized `{"default": ..}` objects.
pub(crate) fn text_at(doc: &Value, ptr: &str) -> Option<String> {
    match doc.pointer(ptr)? {
        Value::String(s) => Some(s.clone()),
        Value::Object(o) => o.get("default").and_then(Value::as_str).map(str::to_owned),
        _ => None,
    }
}

pub(crate) fn u32_at(doc: &Value, ptr: &str) -> Option<u32> {
    doc.pointer(ptr).and_then(Value::as_u64).and_then(|n| u32::try_from(n).ok())
}

pub(crate) fn u8_at(doc: &Value, ptr: &str) -> Option<u8> {
    doc.pointer(ptr).and_then(Value::as_u64).and_then(|n| u8::try_from(n).ok())
}

fn i32_at(doc: &Value, ptr: &str) -> Option<i32> {
    doc.pointer(ptr).and_then(Value::as_i64).and_then(|n| i32::try_from(n).ok())
}

fn f64_at(doc: &Value, ptr: &str) -> Option<f64> {
    doc.pointer(ptr).and_then(Value::as_f64)
}

// ---------------------------------------------------------------------------
// Player landing  (/v1/player/{id}/landing)
// ---------------------------------------------------------------------------

/// One stat line from a landing payload. Skater and goalie fields share the
/// struct; whichever side doesn't apply stays zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileStats {
    pub games_played: u32,
    pub goals: u32,
    pub assists: u32,
    pub points: u32,
    pub plus_minus: i32,
    pub pim: u32,
    pub wins: u32,
    pub losses: u32,
    pub shutouts: u32,
    pub save_pct: f64,
    pub gaa: f64,
}

impl ProfileStats {
    fn read(doc: &Value, base: &str) -> Option<Self> {
        doc.pointer(base)?.as_object()?;
        let u = |key: &str| u32_at(doc, &format!("{base}/{key}")).unwrap_or(0);
        Some(Self {
            games_played: u("gamesPlayed"),
            goals: u("goals"),
            assists: u("assists"),
            points: u("points"),
            plus_minus: i32_at(doc, &format!("{base}/plusMinus")).unwrap_or(0),
            pim: u("pim"),
            wins: u("wins"),
            losses: u("losses"),
            shutouts: u("shutouts"),
            save_pct: f64_at(doc, &format!("{base}/savePctg")).unwrap_or(0.0),
            gaa: f64_at(doc, &format!("{base}/goalsAgainstAvg")).unwrap_or(0.0),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerProfile {
    pub id: u64,
    pub name: String,
    pub sweater_number: Option<u32>,
    pub team: String,
    pub position: String,
    pub height_inches: Option<u32>,
    pub weight_pounds: Option<u32>,
    pub birthplace: String,
    pub age: Option<u32>,
    pub season: Option<ProfileStats>,
    pub career: Option<ProfileStats>,
}

impl PlayerProfile {
    pub fn is_goalie(&self) -> bool {
        self.position == "G"
    }

    /// `6'1"`
    pub fn height(&self) -> Option<String> {
        self.height_inches.map(|h| format!("{}'{}\"", h / 12, h % 12))
    }
}

/// `None` when the payload carries no player id.
pub fn player_profile(landing: &Value) -> Option<PlayerProfile> {
    let id = landing.pointer("/playerId").and_then(Value::as_u64)?;
    let name = format!(
        "{} {}",
        text_at(landing, "/firstName").unwrap_or_default(),
        text_at(landing, "/lastName").unwrap_or_default()
    );
    let birthplace = [text_at(landing, "/birthCity"), text_at(landing, "/birthCountry")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ");

    Some(PlayerProfile {
        id,
        name: name.trim().to_owned(),
        sweater_number: u32_at(landing, "/sweaterNumber"),
        team: text_at(landing, "/fullTeamName")
            .or_else(|| str_at(landing, "/currentTeamAbbrev"))
            .unwrap_or_default(),
        position: str_at(landing, "/position").unwrap_or_default(),
        height_inches: u32_at(landing, "/heightInInches"),
        weight_pounds: u32_at(landing, "/weightInPounds"),
        birthplace,
        age: u32_at(landing, "/currentAge"),
        season: ProfileStats::read(landing, "/featuredStats/regularSeason/subSeason"),
        career: ProfileStats::read(landing, "/careerTotals/regularSeason"),
    })
}

// ---------------------------------------------------------------------------
// Game center  (/v1/gamecenter/{id}/boxscore + play-by-play)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamGameStats {
    pub abbrev: String,
    pub score: u32,
    pub shots: Option<u32>,
    /// "1/3"
    pub power_play: Option<String>,
    pub faceoff_pct: Option<f64>,
}

impl TeamGameStats {
    fn read(boxscore: &Value, side: &str) -> Self {
        let at = |key: &str| format!("/{side}/{key}");
        let power_play = str_at(boxscore, &at("powerPlayConversion")).or_else(|| {
            let goals = u32_at(boxscore, &at("powerPlayGoals"));
            let chances = u32_at(boxscore, &at("powerPlayOpportunities"));
            (goals.is_some() || chances.is_some())
                .then(|| format!("{}/{}", goals.unwrap_or(0), chances.unwrap_or(0)))
        });
        Self {
            abbrev: str_at(boxscore, &at("abbrev")).unwrap_or_default(),
            score: u32_at(boxscore, &at("score")).unwrap_or(0),
            shots: u32_at(boxscore, &at("sog")),
            power_play,
            faceoff_pct: f64_at(boxscore, &at("faceoffWinningPctg")),
        }
    }
}

/// A goal or penalty from the play-by-play feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPlay {
    pub period: Option<u8>,
    pub time: String,
    pub kind: String,
    pub team: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameCenter {
    pub id: u64,
    pub state: GameState,
    pub period: Option<u8>,
    pub clock: Option<String>,
    pub home: TeamGameStats,
    pub away: TeamGameStats,
    /// Most recent first.
    pub key_plays: Vec<KeyPlay>,
}

const KEY_PLAY_KINDS: [&str; 2] = ["goal", "penalty"];

/// `None` when the boxscore carries no game id. A missing play-by-play feed
/// leaves `key_plays` empty.
pub fn game_center(
    boxscore: &Value,
    play_by_play: Option<&Value>,
    limit: usize,
) -> Option<GameCenter> {
    let id = boxscore.pointer("/id").and_then(Value::as_u64)?;
    Some(GameCenter {
        id,
        state: str_at(boxscore, "/gameState")
            .as_deref()
            .map(GameState::parse)
            .unwrap_or(GameState::Other),
        period: u8_at(boxscore, "/periodDescriptor/number"),
        clock: str_at(boxscore, "/clock/timeRemaining"),
        home: TeamGameStats::read(boxscore, "homeTeam"),
        away: TeamGameStats::read(boxscore, "awayTeam"),
        key_plays: play_by_play.map(|pbp| key_plays(pbp, limit)).unwrap_or_default(),
    })
}

fn key_plays(pbp: &Value, limit: usize) -> Vec<KeyPlay> {
    let team_abbrev = |id: Option<u64>| {
        let id = id?;
        ["homeTeam", "awayTeam"]
            .into_iter()
            .find(|side| {
                let side_id = pbp.pointer(&format!("/{side}/id")).and_then(Value::as_u64);
                side_id == Some(id)
            })
            .and_then(|side| str_at(pbp, &format!("/{side}/abbrev")))
    };

    let Some(plays) = pbp.pointer("/plays").and_then(Value::as_array) else {
        return Vec::new();
    };
    plays
        .iter()
        .rev()
        .filter(|p| {
            p.get("typeDescKey")
                .and_then(Value::as_str)
                .is_some_and(|k| KEY_PLAY_KINDS.contains(&k))
        })
        .take(limit)
        .map(|p| KeyPlay {
            period: u8_at(p, "/periodDescriptor/number"),
            time: str_at(p, "/timeInPeriod").unwrap_or_default(),
            kind: str_at(p, "/typeDescKey").unwrap_or_default(),
            team: team_abbrev(p.pointer("/details/eventOwnerTeamId").and_then(Value::as_u64)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_out_of_range_read_as_absent() {
        let doc = json!({"big": 5_000_000_000u64, "neg": -3, "ok": 12});
        assert_eq!(u32_at(&doc, "/big"), None);
        assert_eq!(u32_at(&doc, "/neg"), None);
        assert_eq!(u8_at(&doc, "/ok"), Some(12));
        assert_eq!(u8_at(&doc, "/big"), None);
    }

    #[test]
    fn skater_profile_reads_bio_and_stat_lines() {
        let landing = json!({
            "playerId": 8478402,
            "firstName": {"default": "Connor"},
            "lastName": {"default": "McDavid"},
            "sweaterNumber": 97,
            "position": "C",
            "fullTeamName": {"default": "Edmonton Oilers"},
            "heightInInches": 73,
            "weightInPounds": 194,
            "birthCity": {"default": "Richmond Hill"},
            "birthCountry": "CAN",
            "currentAge": 28,
            "featuredStats": {"regularSeason": {"subSeason": {
                "gamesPlayed": 40, "goals": 20, "assists": 45, "points": 65, "plusMinus": -4, "pim": 12
            }}},
            "careerTotals": {"regularSeason": {"gamesPlayed": 700, "points": 1000}}
        });
        let p = player_profile(&landing).unwrap();
        assert_eq!(p.name, "Connor McDavid");
        assert_eq!(p.height().as_deref(), Some("6'1\""));
        assert_eq!(p.birthplace, "Richmond Hill, CAN");
        assert!(!p.is_goalie());
        let season = p.season.unwrap();
        assert_eq!((season.points, season.plus_minus), (65, -4));
        assert_eq!(p.career.unwrap().points, 1000);
    }

    #[test]
    fn profile_needs_an_id_and_tolerates_missing_stats() {
        assert!(player_profile(&json!({"firstName": {"default": "X"}})).is_none());
        let p = player_profile(&json!({"playerId": 1, "position": "G"})).unwrap();
        assert!(p.is_goalie());
        assert!(p.season.is_none());
        assert_eq!(p.name, "");
    }

    fn boxscore() -> Value {
        json!({
            "id": 2024020700,
            "gameState": "LIVE",
            "periodDescriptor": {"number": 2},
            "clock": {"timeRemaining": "08:15"},
            "homeTeam": {"abbrev": "EDM", "score": 3, "sog": 25, "powerPlayConversion": "1/3",
                         "faceoffWinningPctg": 0.54},
            "awayTeam": {"abbrev": "CGY", "score": 1, "sog": 18, "powerPlayGoals": 0,
                         "powerPlayOpportunities": 2}
        })
    }

    fn play_by_play() -> Value {
        json!({
            "homeTeam": {"id": 22, "abbrev": "EDM"},
            "awayTeam": {"id": 20, "abbrev": "CGY"},
            "plays": [
                {"typeDescKey": "goal", "periodDescriptor": {"number": 1}, "timeInPeriod": "04:10",
                 "details": {"eventOwnerTeamId": 22}},
                {"typeDescKey": "faceoff", "periodDescriptor": {"number": 1}, "timeInPeriod": "05:00"},
                {"typeDescKey": "penalty", "periodDescriptor": {"number": 1}, "timeInPeriod": "11:20",
                 "details": {"eventOwnerTeamId": 20}},
                {"typeDescKey": "goal", "periodDescriptor": {"number": 2}, "timeInPeriod": "02:02",
                 "details": {"eventOwnerTeamId": 20}}
            ]
        })
    }

    #[test]
    fn game_center_reads_team_stats() {
        let gc = game_center(&boxscore(), None, 5).unwrap();
        assert_eq!(gc.state, GameState::Live);
        assert_eq!(gc.period, Some(2));
        assert_eq!(gc.home.shots, Some(25));
        assert_eq!(gc.home.power_play.as_deref(), Some("1/3"));
        assert_eq!(gc.away.power_play.as_deref(), Some("0/2"));
        assert_eq!(gc.away.faceoff_pct, None);
        assert!(gc.key_plays.is_empty());
        assert!(game_center(&json!({}), None, 5).is_none());
    }

    #[test]
    fn key_plays_are_goals_and_penalties_newest_first() {
        let gc = game_center(&boxscore(), Some(&play_by_play()), 2).unwrap();
        let plays: Vec<(&str, Option<&str>)> =
            gc.key_plays.iter().map(|p| (p.kind.as_str(), p.team.as_deref())).collect();
        assert_eq!(plays, vec![("goal", Some("CGY")), ("penalty", Some("CGY"))]);
        assert_eq!(gc.key_plays[0].period, Some(2));
        assert_eq!(gc.key_plays[0].time, "02:02");
    }
}
