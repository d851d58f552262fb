use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{
    points::ScoreSummary,
    score::{Alliance, RealtimeScore},
};

/// Kind of match being played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchType {
    Test,
    Practice,
    Qualification,
    Elimination,
}

impl MatchType {
    /// Display form used by the announcer.
    pub fn capitalized(self) -> &'static str {
        match self {
            MatchType::Test => "Test",
            MatchType::Practice => "Practice",
            MatchType::Qualification => "Qualification",
            MatchType::Elimination => "Elimination",
        }
    }
}

/// The match currently loaded on the field. Team number 0 marks an empty station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMatch {
    pub id: u32,
    pub match_type: MatchType,
    pub display_name: String,
    #[schema(value_type = Vec<u32>)]
    pub red: [u32; 3],
    #[schema(value_type = Vec<u32>)]
    pub blue: [u32; 3],
}

impl CurrentMatch {
    /// Placeholder loaded at startup so stations always have a match to bind to.
    pub fn test_match() -> Self {
        Self {
            id: 0,
            match_type: MatchType::Test,
            display_name: "T".into(),
            red: [0; 3],
            blue: [0; 3],
        }
    }

    /// Teams of `alliance` in station order.
    pub fn teams(&self, alliance: Alliance) -> &[u32; 3] {
        match alliance {
            Alliance::Red => &self.red,
            Alliance::Blue => &self.blue,
        }
    }

    /// Team per alliance station (`R1`..`R3`, `B1`..`B3`), in that order.
    pub fn roster(&self) -> IndexMap<String, u32> {
        Alliance::ALL
            .into_iter()
            .flat_map(|alliance| {
                let prefix = match alliance {
                    Alliance::Red => 'R',
                    Alliance::Blue => 'B',
                };
                self.teams(alliance)
                    .iter()
                    .enumerate()
                    .map(move |(index, team)| (format!("{prefix}{}", index + 1), *team))
            })
            .collect()
    }
}

/// Period the arena clock is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum MatchState {
    #[default]
    PreMatch,
    StartMatch,
    AutoPeriod,
    PausePeriod,
    TeleopPeriod,
    EndgamePeriod,
    PostMatch,
}

/// Durations of the match periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchTiming {
    pub auto_duration_sec: u32,
    pub pause_duration_sec: u32,
    pub teleop_duration_sec: u32,
}

impl Default for MatchTiming {
    fn default() -> Self {
        Self {
            auto_duration_sec: 10,
            pause_duration_sec: 0,
            teleop_duration_sec: 140,
        }
    }
}

/// Last known state of the arena clock, as reported by the match controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchClock {
    pub state: MatchState,
    pub match_time_sec: f64,
}

/// Final result posted for a match, shown by the announcer.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostedResult {
    pub match_id: u32,
    pub match_type: MatchType,
    pub display_name: String,
    pub red_score: RealtimeScore,
    pub blue_score: RealtimeScore,
    pub red_summary: ScoreSummary,
    pub blue_summary: ScoreSummary,
}

impl PostedResult {
    /// Freeze the two alliance scores of `current` into a result.
    pub fn new(current: &CurrentMatch, red_score: RealtimeScore, blue_score: RealtimeScore) -> Self {
        // Fouls count for the opposing alliance.
        let red_summary = ScoreSummary::compute(&red_score, &blue_score.fouls);
        let blue_summary = ScoreSummary::compute(&blue_score, &red_score.fouls);
        Self {
            match_id: current.id,
            match_type: current.match_type,
            display_name: current.display_name.clone(),
            red_score,
            blue_score,
            red_summary,
            blue_summary,
        }
    }
}
