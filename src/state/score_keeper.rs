//! Single-owner task per alliance that serializes every mutation of its
//! [`RealtimeScore`].
//!
//! Stations never touch the score directly: they submit requests through a
//! [`ScoreHandle`] and receive the resulting snapshot, so concurrent tabs for
//! the same alliance cannot interleave half-applied transitions.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    error::ServiceError,
    state::{
        notifier::{Notifier, ScoreChanged},
        score::{Alliance, Foul, RealtimeScore, ScoringCommand},
    },
};

/// Operation submitted to a score keeper.
#[derive(Debug, Clone)]
enum ScoreOp {
    Snapshot,
    Apply(ScoringCommand),
    AddFoul(Foul),
    DeleteFoul(Foul),
    CommitFouls,
    Reset,
}

#[derive(Debug)]
struct ScoreRequest {
    op: ScoreOp,
    origin: Option<Uuid>,
    reply: oneshot::Sender<ScoreOutcome>,
}

/// Result of a request: whether anything changed and the score afterwards.
#[derive(Debug, Clone)]
pub struct ScoreOutcome {
    /// False when the request was a guarded no-op.
    pub changed: bool,
    /// Snapshot taken right after the request was processed.
    pub score: RealtimeScore,
}

/// Owner of one alliance's [`RealtimeScore`].
pub struct ScoreKeeper {
    alliance: Alliance,
    score: RealtimeScore,
    score_changed: Notifier<ScoreChanged>,
}

impl ScoreKeeper {
    /// Spawn the keeper task and return a handle to it. The task stops once
    /// every handle has been dropped.
    pub fn spawn(
        alliance: Alliance,
        queue_depth: usize,
        score_changed: Notifier<ScoreChanged>,
    ) -> ScoreHandle {
        let (tx, rx) = mpsc::channel(queue_depth.max(1));
        let keeper = ScoreKeeper {
            alliance,
            score: RealtimeScore::new(),
            score_changed,
        };
        tokio::spawn(keeper.run(rx));
        ScoreHandle { alliance, tx }
    }

    async fn run(mut self, mut requests: mpsc::Receiver<ScoreRequest>) {
        while let Some(ScoreRequest { op, origin, reply }) = requests.recv().await {
            let reset = matches!(op, ScoreOp::Reset);
            let changed = self.handle(op);
            // A reset goes out as a match load, not as a score change.
            if changed && !reset {
                self.score_changed.publish(ScoreChanged {
                    alliance: self.alliance,
                    origin,
                });
            }
            let _ = reply.send(ScoreOutcome {
                changed,
                score: self.score.clone(),
            });
        }
        debug!(alliance = %self.alliance, "score keeper stopped");
    }

    fn handle(&mut self, op: ScoreOp) -> bool {
        match op {
            ScoreOp::Snapshot => false,
            ScoreOp::Apply(command) => {
                let changed = self.score.apply(command);
                debug!(alliance = %self.alliance, ?command, changed, "applied scoring command");
                changed
            }
            ScoreOp::AddFoul(foul) => {
                info!(alliance = %self.alliance, team_id = foul.team_id, rule = %foul.rule, "foul added");
                self.score.add_foul(foul);
                true
            }
            ScoreOp::DeleteFoul(foul) => {
                let removed = self.score.delete_foul(&foul);
                info!(alliance = %self.alliance, team_id = foul.team_id, rule = %foul.rule, removed, "foul deleted");
                removed
            }
            ScoreOp::CommitFouls => self.score.commit_fouls(),
            ScoreOp::Reset => {
                self.score = RealtimeScore::new();
                true
            }
        }
    }
}

/// Cheap, cloneable handle for submitting requests to a [`ScoreKeeper`].
#[derive(Debug, Clone)]
pub struct ScoreHandle {
    alliance: Alliance,
    tx: mpsc::Sender<ScoreRequest>,
}

impl ScoreHandle {
    /// Alliance this handle is bound to.
    pub fn alliance(&self) -> Alliance {
        self.alliance
    }

    /// Current score.
    pub async fn snapshot(&self) -> Result<RealtimeScore, ServiceError> {
        Ok(self.request(ScoreOp::Snapshot).await?.score)
    }

    /// Apply a scoring command.
    pub async fn apply(&self, command: ScoringCommand) -> Result<ScoreOutcome, ServiceError> {
        self.request(ScoreOp::Apply(command)).await
    }

    /// Apply a scoring command on behalf of station `origin`. The resulting
    /// [`ScoreChanged`] carries `origin` so that station can skip its own echo.
    pub async fn apply_from(
        &self,
        origin: Uuid,
        command: ScoringCommand,
    ) -> Result<ScoreOutcome, ServiceError> {
        self.send_request(ScoreOp::Apply(command), Some(origin)).await
    }

    /// Append a foul to this alliance's ledger.
    pub async fn add_foul(&self, foul: Foul) -> Result<ScoreOutcome, ServiceError> {
        self.request(ScoreOp::AddFoul(foul)).await
    }

    /// Remove the first foul equal to `foul`.
    pub async fn delete_foul(&self, foul: Foul) -> Result<ScoreOutcome, ServiceError> {
        self.request(ScoreOp::DeleteFoul(foul)).await
    }

    /// Freeze this alliance's foul list.
    pub async fn commit_fouls(&self) -> Result<ScoreOutcome, ServiceError> {
        self.request(ScoreOp::CommitFouls).await
    }

    /// Replace the score with a fresh one for a newly loaded match.
    pub async fn reset(&self) -> Result<ScoreOutcome, ServiceError> {
        self.request(ScoreOp::Reset).await
    }

    async fn request(&self, op: ScoreOp) -> Result<ScoreOutcome, ServiceError> {
        self.send_request(op, None).await
    }

    async fn send_request(
        &self,
        op: ScoreOp,
        origin: Option<Uuid>,
    ) -> Result<ScoreOutcome, ServiceError> {
        let (reply, response) = oneshot::channel();
        self.tx
            .send(ScoreRequest { op, origin, reply })
            .await
            .map_err(|_| self.stopped())?;
        response.await.map_err(|_| self.stopped())
    }

    fn stopped(&self) -> ServiceError {
        ServiceError::Unavailable(format!("{} score keeper stopped", self.alliance))
    }
}

/// The two alliance score handles, looked up by [`Alliance`].
#[derive(Debug, Clone)]
pub struct AllianceScores {
    red: ScoreHandle,
    blue: ScoreHandle,
}

impl AllianceScores {
    /// Spawn one keeper per alliance sharing the same change notifier.
    pub fn spawn(queue_depth: usize, score_changed: &Notifier<ScoreChanged>) -> Self {
        Self {
            red: ScoreKeeper::spawn(Alliance::Red, queue_depth, score_changed.clone()),
            blue: ScoreKeeper::spawn(Alliance::Blue, queue_depth, score_changed.clone()),
        }
    }

    /// Handle for `alliance`.
    pub fn get(&self, alliance: Alliance) -> &ScoreHandle {
        match alliance {
            Alliance::Red => &self.red,
            Alliance::Blue => &self.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::state::score::ScorePhase;

    fn spawn_keeper() -> (ScoreHandle, Notifier<ScoreChanged>) {
        let notifier = Notifier::new("score_changed", 16);
        let handle = ScoreKeeper::spawn(Alliance::Red, 8, notifier.clone());
        (handle, notifier)
    }

    #[tokio::test]
    async fn apply_returns_snapshot_after_command() {
        let (handle, _notifier) = spawn_keeper();
        let outcome = handle.apply(ScoringCommand::Mobility).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.score.current_score.mobility_bonuses, 1);

        let snapshot = handle.snapshot().await.unwrap();
        assert_eq!(snapshot, outcome.score);
    }

    #[tokio::test]
    async fn concurrent_commands_are_serialized() {
        let (handle, _notifier) = spawn_keeper();
        let mut tasks = Vec::new();
        for _ in 0..50 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.apply(ScoringCommand::ScoredHigh).await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }
        assert_eq!(handle.snapshot().await.unwrap().current_score.high, 50);
    }

    #[tokio::test]
    async fn changes_are_published_but_no_ops_are_not() {
        let (handle, notifier) = spawn_keeper();
        let mut listener = notifier.subscribe();

        let outcome = handle.apply(ScoringCommand::Catch).await.unwrap();
        assert!(!outcome.changed);
        handle.apply(ScoringCommand::Commit).await.unwrap();

        let event = listener.recv().await.unwrap();
        assert_eq!(event.alliance, Alliance::Red);
        assert_eq!(event.origin, None);
        let nothing_else =
            tokio::time::timeout(Duration::from_millis(50), listener.recv()).await;
        assert!(nothing_else.is_err());
    }

    #[tokio::test]
    async fn station_commands_carry_their_origin() {
        let (handle, notifier) = spawn_keeper();
        let mut listener = notifier.subscribe();
        let station = Uuid::new_v4();

        let outcome = handle
            .apply_from(station, ScoringCommand::Mobility)
            .await
            .unwrap();
        assert_eq!(outcome.score.current_score.mobility_bonuses, 1);
        assert_eq!(listener.recv().await.unwrap().origin, Some(station));

        handle.apply(ScoringCommand::Mobility).await.unwrap();
        assert_eq!(listener.recv().await.unwrap().origin, None);
    }

    #[tokio::test]
    async fn reset_installs_fresh_score() {
        let (handle, _notifier) = spawn_keeper();
        handle.apply(ScoringCommand::CommitMatch).await.unwrap();
        handle
            .add_foul(Foul {
                team_id: 254,
                rule: "G3".into(),
                is_technical: false,
                time_in_match_sec: 3.0,
            })
            .await
            .unwrap();

        let outcome = handle.reset().await.unwrap();
        assert_eq!(outcome.score.phase(), ScorePhase::AutoOpen);
        assert!(outcome.score.fouls.is_empty());
    }

    #[tokio::test]
    async fn foul_ledger_round_trip() {
        let (handle, _notifier) = spawn_keeper();
        let foul = Foul {
            team_id: 971,
            rule: "G26-1".into(),
            is_technical: true,
            time_in_match_sec: 42.0,
        };
        handle.add_foul(foul.clone()).await.unwrap();
        handle.add_foul(foul.clone()).await.unwrap();

        let outcome = handle.delete_foul(foul.clone()).await.unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.score.fouls, vec![foul]);

        let outcome = handle.commit_fouls().await.unwrap();
        assert!(outcome.score.fouls_committed);
        assert!(!handle.commit_fouls().await.unwrap().changed);
    }

    #[tokio::test]
    async fn alliance_scores_are_independent() {
        let notifier = Notifier::new("score_changed", 16);
        let scores = AllianceScores::spawn(8, &notifier);
        scores
            .get(Alliance::Blue)
            .apply(ScoringCommand::Mobility)
            .await
            .unwrap();

        assert_eq!(scores.get(Alliance::Red).alliance(), Alliance::Red);
        let red = scores.get(Alliance::Red).snapshot().await.unwrap();
        let blue = scores.get(Alliance::Blue).snapshot().await.unwrap();
        assert_eq!(red.current_score.mobility_bonuses, 0);
        assert_eq!(blue.current_score.mobility_bonuses, 1);
    }
}
