use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use crate::{
    error::ServiceError,
    state::{
        notifier::{FoulsChanged, Listener, Notifier},
        score::{Alliance, Foul, RealtimeScore},
        score_keeper::{AllianceScores, ScoreOutcome},
    },
};

/// Arena-level entry point for foul changes.
///
/// Single-alliance edits go straight to that alliance's keeper; committing the
/// fouls for the match touches both keepers and is serialized by a gate so two
/// referees committing at once cannot interleave.
#[derive(Debug, Clone)]
pub struct FoulLedger {
    scores: AllianceScores,
    commit_gate: Arc<Mutex<()>>,
    fouls_changed: Notifier<FoulsChanged>,
}

impl FoulLedger {
    /// Build a ledger over the two alliance keepers.
    pub fn new(scores: AllianceScores, fouls_changed: Notifier<FoulsChanged>) -> Self {
        Self {
            scores,
            commit_gate: Arc::new(Mutex::new(())),
            fouls_changed,
        }
    }

    /// Append `foul` to the ledger of `alliance`.
    pub async fn add(&self, alliance: Alliance, foul: Foul) -> Result<ScoreOutcome, ServiceError> {
        self.scores.get(alliance).add_foul(foul).await
    }

    /// Remove the first foul equal to `foul` from the ledger of `alliance`.
    pub async fn delete(
        &self,
        alliance: Alliance,
        foul: Foul,
    ) -> Result<ScoreOutcome, ServiceError> {
        self.scores.get(alliance).delete_foul(foul).await
    }

    /// Freeze the fouls of both alliances, returning both scores afterwards.
    pub async fn commit_for_match(&self) -> Result<(RealtimeScore, RealtimeScore), ServiceError> {
        let _gate = self.commit_gate.lock().await;
        let red = self.scores.get(Alliance::Red).commit_fouls().await?;
        let blue = self.scores.get(Alliance::Blue).commit_fouls().await?;
        info!(
            red_fouls = red.score.fouls.len(),
            blue_fouls = blue.score.fouls.len(),
            "fouls committed for match"
        );
        Ok((red.score, blue.score))
    }

    /// Ask every referee station to re-render its foul list.
    pub fn notify_changed(&self) {
        self.fouls_changed.publish(FoulsChanged);
    }

    /// Subscribe to foul list changes.
    pub fn subscribe(&self) -> Listener<FoulsChanged> {
        self.fouls_changed.subscribe()
    }

    /// Notifier behind [`FoulLedger::subscribe`].
    pub fn fouls_changed(&self) -> &Notifier<FoulsChanged> {
        &self.fouls_changed
    }
}
