use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use serde_with::{DisplayFromStr, PickFirst, serde_as};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::validation::{validate_rule_code, validate_team_id},
    error::ProtocolError,
    state::{
        arena::{MatchState, MatchTiming},
        score::{Alliance, Foul, RealtimeScore, ScoringCommand},
    },
};

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
/// Envelope of every message sent by a station: `{"type": ..., "payload": ...}`.
pub struct InboundFrame {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub payload: Value,
}

impl InboundFrame {
    /// Parse a text frame into an envelope.
    pub fn from_json_str(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Malformed)
    }

    fn decode_payload<T: DeserializeOwned>(&self) -> Result<T, ProtocolError> {
        serde_json::from_value(self.payload.clone()).map_err(|err| self.invalid(err.to_string()))
    }

    fn invalid(&self, reason: impl Into<String>) -> ProtocolError {
        ProtocolError::InvalidPayload {
            kind: self.kind.clone(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Serialize)]
/// Messages pushed to stations.
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum OutboundMessage {
    /// Full realtime score of the station's alliance.
    Score(Box<RealtimeScore>),
    /// The client should refetch and re-render.
    Reload,
    /// Durations of the match periods.
    MatchTiming(MatchTiming),
    /// Current arena clock.
    MatchTime(MatchTimeMessage),
    /// A command could not be handled.
    Error(String),
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload of the `matchTime` message.
pub struct MatchTimeMessage {
    pub match_state: MatchState,
    pub match_time_sec: u32,
}

#[serde_as]
#[derive(Debug, Deserialize, ToSchema)]
/// Payload of the `preload` command. The count may be sent as a number or a numeric string.
pub struct PreloadPayload {
    #[serde_as(as = "PickFirst<(_, DisplayFromStr)>")]
    #[schema(value_type = u32)]
    pub balls: u32,
}

impl TryFrom<InboundFrame> for ScoringCommand {
    type Error = ProtocolError;

    fn try_from(frame: InboundFrame) -> Result<Self, Self::Error> {
        let command = match frame.kind.as_str() {
            "preload" => {
                let PreloadPayload { balls } = frame.decode_payload()?;
                ScoringCommand::Preload(balls)
            }
            "mobility" => ScoringCommand::Mobility,
            "scoredHighHot" => ScoringCommand::ScoredHighHot,
            "scoredHigh" => ScoringCommand::ScoredHigh,
            "scoredLowHot" => ScoringCommand::ScoredLowHot,
            "scoredLow" => ScoringCommand::ScoredLow,
            "assist" => ScoringCommand::Assist,
            "truss" => ScoringCommand::Truss,
            "catch" => ScoringCommand::Catch,
            "deadBall" => ScoringCommand::DeadBall,
            "commit" => ScoringCommand::Commit,
            "commitMatch" => ScoringCommand::CommitMatch,
            "undo" => ScoringCommand::Undo,
            _ => return Err(ProtocolError::UnknownType(frame.kind)),
        };
        Ok(command)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload of the `addFoul` command. The timestamp comes from the arena clock.
pub struct AddFoulPayload {
    pub alliance: Alliance,
    pub team_id: u32,
    pub rule: String,
    #[serde(default)]
    pub is_technical: bool,
}

impl Validate for AddFoulPayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_rule_code(&self.rule) {
            errors.add("rule", e);
        }
        if let Err(e) = validate_team_id(self.team_id) {
            errors.add("teamId", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
/// Payload of the `deleteFoul` command; every field must match the stored foul.
pub struct DeleteFoulPayload {
    pub alliance: Alliance,
    pub team_id: u32,
    pub rule: String,
    pub time_in_match_sec: f64,
    #[serde(default)]
    pub is_technical: bool,
}

impl DeleteFoulPayload {
    /// The foul this payload identifies.
    pub fn foul(&self) -> Foul {
        Foul {
            team_id: self.team_id,
            rule: self.rule.clone(),
            is_technical: self.is_technical,
            time_in_match_sec: self.time_in_match_sec,
        }
    }
}

/// Commands a referee station can issue.
#[derive(Debug)]
pub enum RefereeCommand {
    /// Record a foul against a team.
    AddFoul(AddFoulPayload),
    /// Remove a previously recorded foul.
    DeleteFoul(DeleteFoulPayload),
    /// Freeze the fouls of both alliances.
    CommitMatch,
}

impl TryFrom<InboundFrame> for RefereeCommand {
    type Error = ProtocolError;

    fn try_from(frame: InboundFrame) -> Result<Self, Self::Error> {
        match frame.kind.as_str() {
            "addFoul" => {
                let payload: AddFoulPayload = frame.decode_payload()?;
                payload
                    .validate()
                    .map_err(|err| frame.invalid(err.to_string()))?;
                Ok(RefereeCommand::AddFoul(payload))
            }
            "deleteFoul" => Ok(RefereeCommand::DeleteFoul(frame.decode_payload()?)),
            "commitMatch" => Ok(RefereeCommand::CommitMatch),
            _ => Err(ProtocolError::UnknownType(frame.kind)),
        }
    }
}
