//! DTO definitions used by the arena control REST API.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::validation::validate_team_id,
    state::{
        arena::{CurrentMatch, MatchState, MatchType, PostedResult},
        points::ScoreSummary,
        score::{Alliance, RealtimeScore},
    },
};

/// Request installing a new match on the field. Team number 0 leaves a station empty.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadMatchRequest {
    pub id: u32,
    pub match_type: MatchType,
    pub display_name: String,
    #[schema(value_type = Vec<u32>)]
    pub red: [u32; 3],
    #[schema(value_type = Vec<u32>)]
    pub blue: [u32; 3],
}

impl Validate for LoadMatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.display_name.trim().is_empty() || self.display_name.len() > 32 {
            let mut err = ValidationError::new("display_name_length");
            err.message = Some("Display name must be between 1 and 32 characters".into());
            errors.add("displayName", err);
        }

        let teams: Vec<u32> = self
            .red
            .iter()
            .chain(self.blue.iter())
            .copied()
            .filter(|team| validate_team_id(*team).is_ok())
            .collect();
        let mut unique = teams.clone();
        unique.sort_unstable();
        unique.dedup();
        if unique.len() != teams.len() {
            let mut err = ValidationError::new("duplicate_team");
            err.message = Some("A team may only appear once per match".into());
            errors.add("teams", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl From<LoadMatchRequest> for CurrentMatch {
    fn from(value: LoadMatchRequest) -> Self {
        Self {
            id: value.id,
            match_type: value.match_type,
            display_name: value.display_name,
            red: value.red,
            blue: value.blue,
        }
    }
}

/// Clock reading reported by the match controller.
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchTimeUpdate {
    pub match_state: MatchState,
    #[validate(range(min = 0.0, max = 3600.0))]
    pub match_time_sec: f64,
}

/// The loaded match as seen by stations.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    #[serde(rename = "match")]
    pub current: CurrentMatch,
    /// Team per alliance station, `R1` to `B3`.
    #[schema(value_type = Object)]
    pub roster: IndexMap<String, u32>,
    pub match_state: MatchState,
    pub match_time_sec: f64,
}

/// One alliance's realtime score with its point breakdown.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScoreView {
    pub alliance: Alliance,
    pub score: RealtimeScore,
    pub summary: ScoreSummary,
}

/// Response returned when a final result is posted.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PostScoreResponse {
    pub result: PostedResult,
}

/// Rule codes referees may assess fouls under.
#[derive(Debug, Serialize, ToSchema)]
pub struct RulesResponse {
    pub rules: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(red: [u32; 3], blue: [u32; 3]) -> LoadMatchRequest {
        LoadMatchRequest {
            id: 3,
            match_type: MatchType::Practice,
            display_name: "P3".into(),
            red,
            blue,
        }
    }

    #[test]
    fn empty_stations_may_repeat() {
        assert!(request([254, 0, 0], [971, 0, 0]).validate().is_ok());
    }

    #[test]
    fn team_cannot_play_twice() {
        let errors = request([254, 1114, 33], [971, 254, 118]).validate().unwrap_err();
        assert!(errors.field_errors().contains_key("teams"));
    }

    #[test]
    fn display_name_is_required() {
        let mut req = request([254, 0, 0], [971, 0, 0]);
        req.display_name = "  ".into();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("displayName"));
    }

    #[test]
    fn match_time_must_be_positive() {
        let update: MatchTimeUpdate =
            serde_json::from_str(r#"{"matchState":"autoPeriod","matchTimeSec":-1}"#).unwrap();
        assert!(update.validate().is_err());
        let update: MatchTimeUpdate =
            serde_json::from_str(r#"{"matchState":"teleopPeriod","matchTimeSec":30.5}"#).unwrap();
        assert!(update.validate().is_ok());
    }

    #[test]
    fn load_request_becomes_current_match() {
        let current = CurrentMatch::from(request([254, 0, 0], [971, 0, 0]));
        assert_eq!(current.display_name, "P3");
        assert_eq!(current.teams(Alliance::Blue), &[971, 0, 0]);
    }
}
