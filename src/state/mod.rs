pub mod arena;
pub mod foul_ledger;
pub mod notifier;
pub mod points;
pub mod score;
pub mod score_keeper;

use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tokio::sync::{RwLock, watch};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;

use self::{
    arena::{CurrentMatch, MatchClock, PostedResult},
    foul_ledger::FoulLedger,
    notifier::{MatchLoaded, MatchTimeTick, Notifier, ScoreChanged, ScorePosted},
    score::Alliance,
    score_keeper::AllianceScores,
};

pub type SharedState = Arc<AppState>;

/// Kind of operator station behind a websocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum StationKind {
    /// Scorer entering one alliance's realtime score.
    Scoring,
    /// Referee entering fouls.
    Referee,
    /// Read-only announcer display.
    Announcer,
}

#[derive(Debug, Clone)]
/// Bookkeeping for a connected station.
pub struct StationInfo {
    pub kind: StationKind,
    pub alliance: Option<Alliance>,
}

/// Registry of connected stations keyed by connection id.
pub type StationRegistry = Arc<DashMap<Uuid, StationInfo>>;

/// Central application state: the arena-facing collaborators every session
/// handler draws its context from.
pub struct AppState {
    config: AppConfig,
    scores: AllianceScores,
    fouls: FoulLedger,
    match_loaded: Notifier<MatchLoaded>,
    match_time: Notifier<MatchTimeTick>,
    score_posted: Notifier<ScorePosted>,
    score_changed: Notifier<ScoreChanged>,
    current_match: RwLock<CurrentMatch>,
    clock: watch::Sender<MatchClock>,
    posted_result: RwLock<Option<PostedResult>>,
    stations: StationRegistry,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// Spawns the two score keepers, so it must be called from within a Tokio runtime.
    pub fn new(config: AppConfig) -> SharedState {
        let capacity = config.notifier_capacity();
        let score_changed = Notifier::new("score_changed", capacity);
        let scores = AllianceScores::spawn(config.score_queue_depth(), &score_changed);
        let fouls = FoulLedger::new(scores.clone(), Notifier::new("fouls_changed", capacity));
        let (clock, _rx) = watch::channel(MatchClock::default());

        Arc::new(Self {
            config,
            scores,
            fouls,
            match_loaded: Notifier::new("match_loaded", capacity),
            match_time: Notifier::new("match_time", capacity),
            score_posted: Notifier::new("score_posted", capacity),
            score_changed,
            current_match: RwLock::new(CurrentMatch::test_match()),
            clock,
            posted_result: RwLock::new(None),
            stations: Arc::new(DashMap::new()),
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Score keepers of both alliances.
    pub fn scores(&self) -> &AllianceScores {
        &self.scores
    }

    /// Foul entry point shared by referee stations and the arena.
    pub fn fouls(&self) -> &FoulLedger {
        &self.fouls
    }

    /// Published whenever a new match is loaded.
    pub fn match_loaded(&self) -> &Notifier<MatchLoaded> {
        &self.match_loaded
    }

    /// Published on every arena clock update.
    pub fn match_time(&self) -> &Notifier<MatchTimeTick> {
        &self.match_time
    }

    /// Published when a final result is posted.
    pub fn score_posted(&self) -> &Notifier<ScorePosted> {
        &self.score_posted
    }

    /// Published by the score keepers after every change.
    pub fn score_changed(&self) -> &Notifier<ScoreChanged> {
        &self.score_changed
    }

    /// Currently loaded match.
    pub async fn current_match(&self) -> CurrentMatch {
        self.current_match.read().await.clone()
    }

    /// Install a newly loaded match.
    pub async fn replace_current_match(&self, current: CurrentMatch) {
        let mut guard = self.current_match.write().await;
        *guard = current;
    }

    /// Last reported arena clock.
    pub fn clock(&self) -> MatchClock {
        *self.clock.borrow()
    }

    /// Record a new arena clock reading.
    pub fn update_clock(&self, clock: MatchClock) {
        self.clock.send_replace(clock);
    }

    /// Result posted for the previous match, if any.
    pub async fn posted_result(&self) -> Option<PostedResult> {
        self.posted_result.read().await.clone()
    }

    /// Store the posted result shown by announcer displays.
    pub async fn set_posted_result(&self, result: PostedResult) {
        let mut guard = self.posted_result.write().await;
        *guard = Some(result);
    }

    /// Listeners subscribed across every notifier. Each connected station
    /// holds at least one; a count above that points at leaked relays.
    pub fn listener_count(&self) -> usize {
        self.match_loaded.listener_count()
            + self.match_time.listener_count()
            + self.score_posted.listener_count()
            + self.score_changed.listener_count()
            + self.fouls.fouls_changed().listener_count()
    }

    /// Registry of connected stations.
    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    /// Record a newly connected station and return its connection id.
    pub fn register_station(&self, kind: StationKind, alliance: Option<Alliance>) -> Uuid {
        let id = Uuid::new_v4();
        self.stations.insert(
            id,
            StationInfo { kind, alliance },
        );
        id
    }

    /// Forget a disconnected station.
    pub fn deregister_station(&self, id: Uuid) -> Option<StationInfo> {
        self.stations.remove(&id).map(|(_, info)| info)
    }
}
