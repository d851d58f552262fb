use axum::extract::ws::WebSocket;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::OutboundMessage,
    error::{ProtocolError, ServiceError},
    services::connection::{Connection, ConnectionError, ConnectionReader, ConnectionWriter},
    state::{
        AppState, SharedState, StationKind,
        notifier::{Listener, MatchLoaded, ScoreChanged},
        score::{Alliance, RealtimeScore, ScoringCommand},
        score_keeper::ScoreHandle,
    },
};

/// Everything a scoring station needs, resolved once when it connects.
pub struct ScoringContext {
    alliance: Alliance,
    score: ScoreHandle,
    match_loaded: Listener<MatchLoaded>,
    score_changed: Listener<ScoreChanged>,
}

impl ScoringContext {
    /// Bind to `alliance`'s score keeper and subscribe to the events that
    /// make a scoring station resync.
    pub fn new(state: &AppState, alliance: Alliance) -> Self {
        Self {
            alliance,
            score: state.scores().get(alliance).clone(),
            match_loaded: state.match_loaded().subscribe(),
            score_changed: state.score_changed().subscribe(),
        }
    }
}

/// Handle the full lifecycle of a scoring station for one alliance.
pub async fn handle_socket(state: SharedState, alliance: Alliance, socket: WebSocket) {
    let ScoringContext {
        alliance,
        score,
        match_loaded,
        score_changed,
    } = ScoringContext::new(&state, alliance);
    let station_id = state.register_station(StationKind::Scoring, Some(alliance));
    let (mut reader, writer, writer_task) =
        Connection::split(socket, state.config().outbound_queue_depth());
    info!(station_id = %station_id, alliance = %alliance, "scoring station connected");

    if send_score(&writer, score.snapshot().await).await.is_ok() {
        let relay = spawn_relay(
            station_id,
            score.clone(),
            match_loaded,
            score_changed,
            writer.clone(),
        );
        run_commands(station_id, &score, &mut reader, &writer).await;
        relay.abort();
        let _ = relay.await;
    }

    drop(reader);
    state.deregister_station(station_id);
    info!(station_id = %station_id, alliance = %alliance, "scoring station disconnected");
    writer_task.finish(writer).await;
}

/// Read-dispatch loop; returns once the connection is gone.
async fn run_commands(
    station_id: Uuid,
    score: &ScoreHandle,
    reader: &mut ConnectionReader,
    writer: &ConnectionWriter,
) {
    loop {
        let frame = match reader.read_message().await {
            Ok(frame) => frame,
            Err(ConnectionError::Malformed(err)) => {
                if reply_protocol_error(station_id, writer, err).await.is_err() {
                    return;
                }
                continue;
            }
            Err(ConnectionError::Closed) => return,
            Err(err @ (ConnectionError::Transport(_) | ConnectionError::Encode(_))) => {
                warn!(station_id = %station_id, error = %err, "scoring station transport error");
                return;
            }
        };

        let command = match ScoringCommand::try_from(frame) {
            Ok(command) => command,
            Err(err) => {
                if reply_protocol_error(station_id, writer, err).await.is_err() {
                    return;
                }
                continue;
            }
        };

        let outcome = score.apply_from(station_id, command).await.map(|outcome| {
            debug!(
                station_id = %station_id,
                alliance = %score.alliance(),
                ?command,
                changed = outcome.changed,
                "scoring command handled"
            );
            outcome.score
        });
        if send_score(writer, outcome).await.is_err() {
            return;
        }
    }
}

/// Forward match loads and score changes of the bound alliance as fresh
/// snapshots. Changes this station caused were already echoed by the command loop.
fn spawn_relay(
    station_id: Uuid,
    score: ScoreHandle,
    match_loaded: Listener<MatchLoaded>,
    score_changed: Listener<ScoreChanged>,
    writer: ConnectionWriter,
) -> JoinHandle<()> {
    let alliance = score.alliance();
    let events = match_loaded.into_stream().map(|_| ()).merge(
        score_changed
            .into_stream()
            .filter(move |event| event.alliance == alliance && event.origin != Some(station_id))
            .map(|_| ()),
    );

    tokio::spawn(async move {
        tokio::pin!(events);
        while events.next().await.is_some() {
            if send_score(&writer, score.snapshot().await).await.is_err() {
                break;
            }
        }
    })
}

/// Write a score snapshot, or the reason it could not be taken.
async fn send_score(
    writer: &ConnectionWriter,
    snapshot: Result<RealtimeScore, ServiceError>,
) -> Result<(), ConnectionError> {
    match snapshot {
        Ok(score) => match writer
            .write_message(&OutboundMessage::Score(Box::new(score)))
            .await
        {
            Err(err @ ConnectionError::Encode(_)) => {
                warn!(error = %err, "score snapshot could not be encoded");
                writer.write_error(err.to_string()).await
            }
            sent => sent,
        },
        Err(err) => {
            warn!(error = %err, "score snapshot unavailable");
            writer.write_error(err.to_string()).await
        }
    }
}

async fn reply_protocol_error(
    station_id: Uuid,
    writer: &ConnectionWriter,
    err: ProtocolError,
) -> Result<(), ConnectionError> {
    debug!(station_id = %station_id, error = %err, "rejected scoring message");
    writer.write_error(err.to_string()).await
}
