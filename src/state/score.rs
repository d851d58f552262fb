//! Per-alliance realtime score: autonomous totals, the teleop cycle in progress,
//! committed cycles, undo history, commit flags and the foul ledger.
//!
//! Everything in here is plain data. Concurrency is handled by the
//! [`score_keeper`](crate::state::score_keeper) actor that owns each instance.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Upper bound for assists credited to one cycle.
pub const MAX_ASSISTS: u8 = 3;

/// One of the two competing sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    /// Red alliance.
    Red,
    /// Blue alliance.
    Blue,
}

impl Alliance {
    /// Both alliances, red first.
    pub const ALL: [Alliance; 2] = [Alliance::Red, Alliance::Blue];

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Alliance::Red => "red",
            Alliance::Blue => "blue",
        }
    }

    /// The other alliance.
    pub fn opponent(self) -> Self {
        match self {
            Alliance::Red => Alliance::Blue,
            Alliance::Blue => Alliance::Red,
        }
    }
}

impl fmt::Display for Alliance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a path or payload names something other than `red` or `blue`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid alliance '{0}'")]
pub struct InvalidAlliance(pub String);

impl FromStr for Alliance {
    type Err = InvalidAlliance;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "red" => Ok(Alliance::Red),
            "blue" => Ok(Alliance::Blue),
            other => Err(InvalidAlliance(other.to_string())),
        }
    }
}

/// Derived from the two commit flags of a [`RealtimeScore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScorePhase {
    /// Autonomous counters are still open.
    AutoOpen,
    /// Autonomous is frozen, teleop cycles are being recorded.
    TeleopOpen,
    /// The whole match is frozen.
    MatchCommitted,
}

/// Counters accumulated while the autonomous period is open.
///
/// The `clear_*` counters are also bumped by the leftover-ball rule after
/// autonomous has been committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AutoScore {
    pub mobility_bonuses: u32,
    pub high: u32,
    pub high_hot: u32,
    pub low: u32,
    pub low_hot: u32,
    pub clear_high: u32,
    pub clear_low: u32,
    pub clear_dead: u32,
}

impl AutoScore {
    /// Number of preloaded balls already accounted for (scored or cleared).
    pub fn accounted_balls(&self) -> u32 {
        self.high
            + self.high_hot
            + self.low
            + self.low_hot
            + self.clear_high
            + self.clear_low
            + self.clear_dead
    }
}

/// How a cycle ended. Exactly one of these may be set on a [`Cycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Ball went into the high goal.
    High,
    /// Ball went into the low goal.
    Low,
    /// Ball left play without scoring.
    Dead,
}

/// One teleop scoring cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub assists: u8,
    pub truss: bool,
    pub catch: bool,
    pub scored_high: bool,
    pub scored_low: bool,
    pub dead_ball: bool,
}

impl Cycle {
    /// A cycle without an outcome is never committed.
    pub fn is_empty(&self) -> bool {
        self.outcome().is_none()
    }

    /// Outcome currently recorded on the cycle, if any.
    pub fn outcome(&self) -> Option<CycleOutcome> {
        if self.scored_high {
            Some(CycleOutcome::High)
        } else if self.scored_low {
            Some(CycleOutcome::Low)
        } else if self.dead_ball {
            Some(CycleOutcome::Dead)
        } else {
            None
        }
    }

    fn set_outcome(&mut self, outcome: CycleOutcome) {
        self.scored_high = outcome == CycleOutcome::High;
        self.scored_low = outcome == CycleOutcome::Low;
        self.dead_ball = outcome == CycleOutcome::Dead;
    }
}

/// A foul assessed against a team. Equality is structural over all fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Foul {
    pub team_id: u32,
    pub rule: String,
    pub is_technical: bool,
    pub time_in_match_sec: f64,
}

/// Commands a scoring station can issue against its alliance's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringCommand {
    /// Set the number of balls preloaded for autonomous.
    Preload(u32),
    Mobility,
    ScoredHighHot,
    ScoredHigh,
    ScoredLowHot,
    ScoredLow,
    Assist,
    Truss,
    Catch,
    DeadBall,
    /// Close autonomous, or commit the cycle in progress during teleop.
    Commit,
    /// Freeze the whole match.
    CommitMatch,
    Undo,
}

/// Live score of one alliance for the currently loaded match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeScore {
    pub current_score: AutoScore,
    pub cycles: Vec<Cycle>,
    pub current_cycle: Cycle,
    pub preloaded_balls: u32,
    pub auto_committed: bool,
    pub teleop_committed: bool,
    pub fouls: Vec<Foul>,
    pub fouls_committed: bool,
    #[serde(skip)]
    undo_auto_scores: Vec<AutoScore>,
    #[serde(skip)]
    undo_cycles: Vec<Cycle>,
}

impl RealtimeScore {
    /// Fresh score for a newly loaded match.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase derived from the commit flags.
    pub fn phase(&self) -> ScorePhase {
        match (self.auto_committed, self.teleop_committed) {
            (false, false) => ScorePhase::AutoOpen,
            (true, false) => ScorePhase::TeleopOpen,
            _ => ScorePhase::MatchCommitted,
        }
    }

    /// True once neither scoring nor fouls can change anymore.
    pub fn is_final(&self) -> bool {
        self.teleop_committed && self.fouls_committed
    }

    /// Balls preloaded for autonomous that are still unaccounted for.
    pub fn leftover_balls(&self) -> u32 {
        self.preloaded_balls
            .saturating_sub(self.current_score.accounted_balls())
    }

    /// Apply a scoring command. Commands issued in the wrong phase or that
    /// fail their guard are ignored; the return value tells whether anything
    /// changed.
    pub fn apply(&mut self, command: ScoringCommand) -> bool {
        match command {
            ScoringCommand::Preload(balls) => {
                if self.phase() != ScorePhase::AutoOpen {
                    return false;
                }
                self.preloaded_balls = balls;
                true
            }
            ScoringCommand::Mobility => self.mutate_auto(|auto| auto.mobility_bonuses += 1),
            ScoringCommand::ScoredHighHot => self.mutate_auto(|auto| auto.high_hot += 1),
            ScoringCommand::ScoredLowHot => self.mutate_auto(|auto| auto.low_hot += 1),
            ScoringCommand::ScoredHigh => match self.phase() {
                ScorePhase::AutoOpen => self.mutate_auto(|auto| auto.high += 1),
                _ => self.mutate_cycle(
                    |cycle| !cycle.scored_high,
                    |cycle| cycle.set_outcome(CycleOutcome::High),
                ),
            },
            ScoringCommand::ScoredLow => match self.phase() {
                ScorePhase::AutoOpen => self.mutate_auto(|auto| auto.low += 1),
                _ => self.mutate_cycle(
                    |cycle| !cycle.scored_low,
                    |cycle| cycle.set_outcome(CycleOutcome::Low),
                ),
            },
            ScoringCommand::Assist => self.mutate_cycle(
                |cycle| cycle.assists < MAX_ASSISTS,
                |cycle| cycle.assists += 1,
            ),
            ScoringCommand::Truss => {
                self.mutate_cycle(|cycle| !cycle.truss, |cycle| cycle.truss = true)
            }
            ScoringCommand::Catch => self.mutate_cycle(
                |cycle| !cycle.catch && cycle.truss,
                |cycle| cycle.catch = true,
            ),
            ScoringCommand::DeadBall => self.mutate_cycle(
                |cycle| !cycle.dead_ball,
                |cycle| cycle.set_outcome(CycleOutcome::Dead),
            ),
            ScoringCommand::Commit => self.commit(),
            ScoringCommand::CommitMatch => self.commit_match(),
            ScoringCommand::Undo => self.undo(),
        }
    }

    /// Append a foul. Accepted in every phase.
    pub fn add_foul(&mut self, foul: Foul) {
        self.fouls.push(foul);
    }

    /// Remove the first foul structurally equal to `foul`.
    pub fn delete_foul(&mut self, foul: &Foul) -> bool {
        match self.fouls.iter().position(|existing| existing == foul) {
            Some(index) => {
                self.fouls.remove(index);
                true
            }
            None => false,
        }
    }

    /// Mark the foul list as final for this match.
    pub fn commit_fouls(&mut self) -> bool {
        let changed = !self.fouls_committed;
        self.fouls_committed = true;
        changed
    }

    fn mutate_auto(&mut self, mutate: impl FnOnce(&mut AutoScore)) -> bool {
        if self.phase() != ScorePhase::AutoOpen {
            return false;
        }
        self.undo_auto_scores.push(self.current_score);
        mutate(&mut self.current_score);
        true
    }

    fn mutate_cycle(
        &mut self,
        guard: impl FnOnce(&Cycle) -> bool,
        mutate: impl FnOnce(&mut Cycle),
    ) -> bool {
        if self.phase() != ScorePhase::TeleopOpen || !guard(&self.current_cycle) {
            return false;
        }
        self.undo_cycles.push(self.current_cycle);
        mutate(&mut self.current_cycle);
        true
    }

    fn commit(&mut self) -> bool {
        match self.phase() {
            ScorePhase::AutoOpen => {
                self.auto_committed = true;
                true
            }
            ScorePhase::TeleopOpen => {
                let Some(outcome) = self.current_cycle.outcome() else {
                    return false;
                };
                // A ball left over from autonomous is credited as cleared
                // rather than counted as a teleop cycle.
                if self.leftover_balls() > 0 {
                    match outcome {
                        CycleOutcome::High => self.current_score.clear_high += 1,
                        CycleOutcome::Low => self.current_score.clear_low += 1,
                        CycleOutcome::Dead => self.current_score.clear_dead += 1,
                    }
                } else {
                    self.cycles.push(self.current_cycle);
                }
                self.current_cycle = Cycle::default();
                self.undo_cycles.clear();
                true
            }
            ScorePhase::MatchCommitted => false,
        }
    }

    fn commit_match(&mut self) -> bool {
        let changed = self.phase() != ScorePhase::MatchCommitted || !self.current_cycle.is_empty();
        self.auto_committed = true;
        self.teleop_committed = true;
        if !self.current_cycle.is_empty() {
            self.cycles.push(self.current_cycle);
            self.current_cycle = Cycle::default();
        }
        changed
    }

    fn undo(&mut self) -> bool {
        match self.phase() {
            ScorePhase::AutoOpen => match self.undo_auto_scores.pop() {
                Some(previous) => {
                    self.current_score = previous;
                    true
                }
                None => false,
            },
            ScorePhase::TeleopOpen => match self.undo_cycles.pop() {
                Some(previous) => {
                    self.current_cycle = previous;
                    true
                }
                None => false,
            },
            ScorePhase::MatchCommitted => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teleop_score() -> RealtimeScore {
        let mut score = RealtimeScore::new();
        assert!(score.apply(ScoringCommand::Commit));
        assert_eq!(score.phase(), ScorePhase::TeleopOpen);
        score
    }

    fn foul(team_id: u32, rule: &str, time_in_match_sec: f64) -> Foul {
        Foul {
            team_id,
            rule: rule.into(),
            is_technical: false,
            time_in_match_sec,
        }
    }

    #[test]
    fn fresh_score_is_auto_open() {
        let score = RealtimeScore::new();
        assert_eq!(score.phase(), ScorePhase::AutoOpen);
        assert!(!score.is_final());
        assert_eq!(score.current_score, AutoScore::default());
        assert!(score.cycles.is_empty());
    }

    #[test]
    fn auto_commands_increment_counters() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(3));
        score.apply(ScoringCommand::Mobility);
        score.apply(ScoringCommand::Mobility);
        score.apply(ScoringCommand::ScoredHighHot);
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::ScoredLowHot);
        score.apply(ScoringCommand::ScoredLow);

        assert_eq!(score.preloaded_balls, 3);
        assert_eq!(
            score.current_score,
            AutoScore {
                mobility_bonuses: 2,
                high: 1,
                high_hot: 1,
                low: 1,
                low_hot: 1,
                ..AutoScore::default()
            }
        );
        assert!(score.current_cycle.is_empty());
    }

    #[test]
    fn preload_overwrites_until_auto_commit() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(1));
        score.apply(ScoringCommand::Preload(2));
        assert_eq!(score.preloaded_balls, 2);

        score.apply(ScoringCommand::Commit);
        assert!(!score.apply(ScoringCommand::Preload(3)));
        assert_eq!(score.preloaded_balls, 2);
    }

    #[test]
    fn auto_commit_happens_once_and_closes_auto_commands() {
        let mut score = teleop_score();
        let before = score.clone();

        assert!(!score.apply(ScoringCommand::Mobility));
        assert!(!score.apply(ScoringCommand::ScoredHighHot));
        assert!(!score.apply(ScoringCommand::ScoredLowHot));
        assert!(!score.apply(ScoringCommand::Commit));
        assert_eq!(score, before);
        assert_eq!(score.phase(), ScorePhase::TeleopOpen);
    }

    #[test]
    fn teleop_commands_are_ignored_during_auto() {
        let mut score = RealtimeScore::new();
        for command in [
            ScoringCommand::Assist,
            ScoringCommand::Truss,
            ScoringCommand::Catch,
            ScoringCommand::DeadBall,
        ] {
            assert!(!score.apply(command), "{command:?} should be ignored");
        }
        assert_eq!(score, RealtimeScore::new());
    }

    #[test]
    fn assists_are_capped() {
        let mut score = teleop_score();
        for _ in 0..10 {
            score.apply(ScoringCommand::Assist);
            assert!(score.current_cycle.assists <= MAX_ASSISTS);
        }
        assert_eq!(score.current_cycle.assists, MAX_ASSISTS);
    }

    #[test]
    fn catch_requires_truss() {
        let mut score = teleop_score();
        let before = score.clone();
        assert!(!score.apply(ScoringCommand::Catch));
        assert_eq!(score, before);

        assert!(score.apply(ScoringCommand::Truss));
        assert!(score.apply(ScoringCommand::Catch));
        assert!(score.current_cycle.catch);
        assert!(!score.apply(ScoringCommand::Catch));
        assert!(!score.apply(ScoringCommand::Truss));
    }

    #[test]
    fn outcomes_are_mutually_exclusive() {
        let mut score = teleop_score();

        score.apply(ScoringCommand::ScoredHigh);
        assert_eq!(score.current_cycle.outcome(), Some(CycleOutcome::High));

        score.apply(ScoringCommand::ScoredLow);
        assert!(!score.current_cycle.scored_high);
        assert!(score.current_cycle.scored_low);

        score.apply(ScoringCommand::DeadBall);
        assert!(!score.current_cycle.scored_low);
        assert!(score.current_cycle.dead_ball);

        score.apply(ScoringCommand::ScoredHigh);
        assert!(score.current_cycle.scored_high);
        assert!(!score.current_cycle.dead_ball);

        // Repeating the same outcome is a no-op and pushes no undo snapshot.
        assert!(!score.apply(ScoringCommand::ScoredHigh));
    }

    #[test]
    fn undo_pops_auto_snapshots_in_lifo_order() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Mobility);
        let after_mobility = score.current_score;
        score.apply(ScoringCommand::ScoredHigh);
        let after_high = score.current_score;
        score.apply(ScoringCommand::ScoredLowHot);

        assert!(score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_score, after_high);
        assert!(score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_score, after_mobility);
        assert!(score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_score, AutoScore::default());
        assert!(!score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_score, AutoScore::default());
    }

    #[test]
    fn undo_pops_cycle_snapshots_in_lifo_order() {
        let mut score = teleop_score();
        score.apply(ScoringCommand::Assist);
        score.apply(ScoringCommand::Truss);
        score.apply(ScoringCommand::Catch);
        score.apply(ScoringCommand::ScoredLow);

        assert!(score.apply(ScoringCommand::Undo));
        assert!(score.current_cycle.catch);
        assert!(!score.current_cycle.scored_low);
        assert!(score.apply(ScoringCommand::Undo));
        assert!(score.current_cycle.truss && !score.current_cycle.catch);
        assert!(score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_cycle.assists, 1);
        assert!(!score.current_cycle.truss);
        assert!(score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_cycle, Cycle::default());
        assert!(!score.apply(ScoringCommand::Undo));
    }

    #[test]
    fn undo_does_not_reach_back_into_auto_after_commit() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::Commit);

        assert!(!score.apply(ScoringCommand::Undo));
        assert_eq!(score.current_score.high, 1);
    }

    #[test]
    fn commit_with_empty_cycle_is_a_no_op() {
        let mut score = teleop_score();
        score.apply(ScoringCommand::Assist);
        score.apply(ScoringCommand::Truss);
        let before = score.clone();

        assert!(!score.apply(ScoringCommand::Commit));
        assert_eq!(score, before);
    }

    #[test]
    fn leftover_ball_is_credited_as_cleared() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(2));
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::Commit);

        score.apply(ScoringCommand::ScoredHigh);
        assert!(score.apply(ScoringCommand::Commit));

        assert_eq!(score.current_score.clear_high, 1);
        assert!(score.cycles.is_empty());
        assert_eq!(score.current_cycle, Cycle::default());
        // The cycle undo history is discarded along with the cycle.
        assert!(!score.apply(ScoringCommand::Undo));
    }

    #[test]
    fn cycle_is_appended_when_no_balls_are_left_over() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(2));
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::Commit);

        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::Commit);

        assert_eq!(score.current_score.clear_high, 0);
        assert_eq!(score.cycles.len(), 1);
        assert!(score.cycles[0].scored_high);
    }

    #[test]
    fn leftover_rule_picks_clear_counter_by_outcome() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(3));
        score.apply(ScoringCommand::Commit);

        score.apply(ScoringCommand::ScoredLow);
        score.apply(ScoringCommand::Commit);
        score.apply(ScoringCommand::DeadBall);
        score.apply(ScoringCommand::Commit);
        score.apply(ScoringCommand::ScoredHigh);
        score.apply(ScoringCommand::Commit);
        assert_eq!(score.leftover_balls(), 0);

        score.apply(ScoringCommand::ScoredLow);
        score.apply(ScoringCommand::Commit);

        assert_eq!(score.current_score.clear_low, 1);
        assert_eq!(score.current_score.clear_dead, 1);
        assert_eq!(score.current_score.clear_high, 1);
        assert_eq!(score.cycles.len(), 1);
        assert!(score.cycles[0].scored_low);
    }

    #[test]
    fn commit_match_appends_pending_cycle_without_leftover_check() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Preload(2));
        score.apply(ScoringCommand::Commit);
        score.apply(ScoringCommand::Assist);
        score.apply(ScoringCommand::ScoredHigh);

        assert!(score.apply(ScoringCommand::CommitMatch));

        assert_eq!(score.phase(), ScorePhase::MatchCommitted);
        assert_eq!(score.cycles.len(), 1);
        assert_eq!(score.cycles[0].assists, 1);
        assert_eq!(score.current_score.clear_high, 0);

        // A second commitMatch must not duplicate the cycle.
        assert!(!score.apply(ScoringCommand::CommitMatch));
        assert_eq!(score.cycles.len(), 1);
    }

    #[test]
    fn commit_match_from_auto_freezes_everything() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Mobility);
        score.apply(ScoringCommand::CommitMatch);

        assert!(score.auto_committed && score.teleop_committed);
        assert!(score.cycles.is_empty());
        let before = score.clone();
        for command in [
            ScoringCommand::Preload(4),
            ScoringCommand::Mobility,
            ScoringCommand::ScoredHigh,
            ScoringCommand::Assist,
            ScoringCommand::Commit,
            ScoringCommand::Undo,
        ] {
            assert!(!score.apply(command));
        }
        assert_eq!(score, before);
    }

    #[test]
    fn commit_match_skips_empty_cycle() {
        let mut score = teleop_score();
        score.apply(ScoringCommand::Truss);
        score.apply(ScoringCommand::CommitMatch);
        assert!(score.cycles.is_empty());
    }

    #[test]
    fn delete_foul_removes_first_match_only() {
        let mut score = RealtimeScore::new();
        score.add_foul(foul(254, "G12", 10.0));
        score.add_foul(foul(254, "G12", 10.0));
        score.add_foul(foul(1114, "G3", 12.5));

        assert!(score.delete_foul(&foul(254, "G12", 10.0)));
        assert_eq!(score.fouls.len(), 2);
        assert_eq!(score.fouls[0], foul(254, "G12", 10.0));

        assert!(!score.delete_foul(&foul(254, "G12", 11.0)));
        assert_eq!(score.fouls.len(), 2);
    }

    #[test]
    fn fouls_are_accepted_in_every_phase() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::CommitMatch);
        score.commit_fouls();
        score.add_foul(foul(33, "G28", 140.0));
        assert_eq!(score.fouls.len(), 1);
        assert!(score.is_final());
    }

    #[test]
    fn snapshot_serializes_in_camel_case_without_undo_history() {
        let mut score = RealtimeScore::new();
        score.apply(ScoringCommand::Mobility);
        let json = serde_json::to_value(&score).unwrap();

        assert_eq!(json["currentScore"]["mobilityBonuses"], 1);
        assert_eq!(json["autoCommitted"], false);
        assert!(json["currentCycle"]["catch"].is_boolean());
        assert!(json.get("undoAutoScores").is_none());
        assert!(json.get("undo_auto_scores").is_none());
    }

    #[test]
    fn alliance_parses_only_exact_names() {
        assert_eq!("red".parse::<Alliance>(), Ok(Alliance::Red));
        assert_eq!("blue".parse::<Alliance>(), Ok(Alliance::Blue));
        assert!("Red".parse::<Alliance>().is_err());
        assert!("green".parse::<Alliance>().is_err());
        assert_eq!(Alliance::Red.opponent(), Alliance::Blue);
    }
}
