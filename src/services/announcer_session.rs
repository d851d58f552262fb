use axum::extract::ws::WebSocket;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

use crate::{
    dto::ws::{MatchTimeMessage, OutboundMessage},
    error::ProtocolError,
    services::connection::{Connection, ConnectionError, ConnectionWriter},
    state::{
        SharedState, StationKind,
        notifier::{Listener, MatchLoaded, MatchTimeTick, ScorePosted},
    },
};

/// Subscriptions of an announcer display, taken when it connects.
pub struct AnnouncerContext {
    match_loaded: Listener<MatchLoaded>,
    match_time: Listener<MatchTimeTick>,
    score_posted: Listener<ScorePosted>,
}

impl AnnouncerContext {
    /// Subscribe to everything an announcer display renders.
    pub fn new(state: &SharedState) -> Self {
        Self {
            match_loaded: state.match_loaded().subscribe(),
            match_time: state.match_time().subscribe(),
            score_posted: state.score_posted().subscribe(),
        }
    }
}

/// Messages relayed to an announcer display.
enum AnnouncerEvent {
    Reload,
    Tick(MatchTimeTick),
}

/// Handle the full lifecycle of a read-only announcer display.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let context = AnnouncerContext::new(&state);
    let station_id = state.register_station(StationKind::Announcer, None);
    let (mut reader, writer, writer_task) =
        Connection::split(socket, state.config().outbound_queue_depth());
    info!(station_id = %station_id, "announcer station connected");

    if send_initial(&state, &writer).await.is_ok() {
        let relay = spawn_relay(state.clone(), context, writer.clone());

        loop {
            let err = match reader.read_message().await {
                // Announcer displays only listen.
                Ok(frame) => ProtocolError::UnknownType(frame.kind),
                Err(ConnectionError::Malformed(err)) => err,
                Err(ConnectionError::Closed) => break,
                Err(err @ (ConnectionError::Transport(_) | ConnectionError::Encode(_))) => {
                    warn!(station_id = %station_id, error = %err, "announcer station transport error");
                    break;
                }
            };
            debug!(station_id = %station_id, error = %err, "rejected announcer message");
            if writer.write_error(err.to_string()).await.is_err() {
                break;
            }
        }

        relay.abort();
        let _ = relay.await;
    }

    drop(reader);
    state.deregister_station(station_id);
    info!(station_id = %station_id, "announcer station disconnected");
    writer_task.finish(writer).await;
}

async fn send_initial(state: &SharedState, writer: &ConnectionWriter) -> Result<(), ConnectionError> {
    writer
        .write_message(&OutboundMessage::MatchTiming(state.config().match_timing()))
        .await?;
    let clock = state.clock();
    writer
        .write_message(&OutboundMessage::MatchTime(MatchTimeMessage {
            match_state: clock.state,
            match_time_sec: clock.match_time_sec as u32,
        }))
        .await
}

fn spawn_relay(
    state: SharedState,
    context: AnnouncerContext,
    writer: ConnectionWriter,
) -> JoinHandle<()> {
    let AnnouncerContext {
        match_loaded,
        match_time,
        score_posted,
    } = context;
    let events = match_loaded
        .into_stream()
        .map(|_| AnnouncerEvent::Reload)
        .merge(score_posted.into_stream().map(|_| AnnouncerEvent::Reload))
        .merge(match_time.into_stream().map(AnnouncerEvent::Tick));

    tokio::spawn(async move {
        tokio::pin!(events);
        while let Some(event) = events.next().await {
            let message = match event {
                AnnouncerEvent::Reload => OutboundMessage::Reload,
                AnnouncerEvent::Tick(tick) => OutboundMessage::MatchTime(MatchTimeMessage {
                    match_state: state.clock().state,
                    match_time_sec: tick.match_time_sec,
                }),
            };
            if writer.write_message(&message).await.is_err() {
                break;
            }
        }
    })
}
