use axum::extract::ws::WebSocket;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::{OutboundMessage, RefereeCommand},
    error::ServiceError,
    services::{
        arena_service,
        connection::{Connection, ConnectionError, ConnectionReader, ConnectionWriter},
    },
    state::{
        AppState, SharedState, StationKind,
        foul_ledger::FoulLedger,
        notifier::{FoulsChanged, Listener, MatchLoaded},
        score::Foul,
    },
};

/// Everything a referee station needs, resolved once when it connects.
pub struct RefereeContext {
    state: SharedState,
    fouls: FoulLedger,
    match_loaded: Listener<MatchLoaded>,
    fouls_changed: Listener<FoulsChanged>,
}

impl RefereeContext {
    /// Bind to the foul ledger and subscribe to the events that make a referee
    /// station reload.
    pub fn new(state: &SharedState) -> Self {
        Self {
            state: state.clone(),
            fouls: state.fouls().clone(),
            match_loaded: state.match_loaded().subscribe(),
            fouls_changed: state.fouls().subscribe(),
        }
    }
}

/// Handle the full lifecycle of a referee station.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let RefereeContext {
        state,
        fouls,
        match_loaded,
        fouls_changed,
    } = RefereeContext::new(&state);
    let station_id = state.register_station(StationKind::Referee, None);
    let (mut reader, writer, writer_task) =
        Connection::split(socket, state.config().outbound_queue_depth());
    info!(station_id = %station_id, "referee station connected");

    let relay = spawn_relay(match_loaded, fouls_changed, writer.clone());
    run_commands(station_id, &state, &fouls, &mut reader, &writer).await;
    relay.abort();
    let _ = relay.await;

    drop(reader);
    state.deregister_station(station_id);
    info!(station_id = %station_id, "referee station disconnected");
    writer_task.finish(writer).await;
}

async fn run_commands(
    station_id: Uuid,
    state: &AppState,
    fouls: &FoulLedger,
    reader: &mut ConnectionReader,
    writer: &ConnectionWriter,
) {
    loop {
        let command = match reader.read_message().await {
            Ok(frame) => RefereeCommand::try_from(frame),
            Err(ConnectionError::Malformed(err)) => Err(err),
            Err(ConnectionError::Closed) => return,
            Err(err @ (ConnectionError::Transport(_) | ConnectionError::Encode(_))) => {
                warn!(station_id = %station_id, error = %err, "referee station transport error");
                return;
            }
        };

        let command = match command {
            Ok(command) => command,
            Err(err) => {
                debug!(station_id = %station_id, error = %err, "rejected referee message");
                if writer.write_error(err.to_string()).await.is_err() {
                    return;
                }
                continue;
            }
        };

        if let Err(err) = apply_command(state, fouls, command).await {
            warn!(station_id = %station_id, error = %err, "referee command failed");
            if writer.write_error(err.to_string()).await.is_err() {
                return;
            }
        }

        // Every referee re-renders its foul list, this one included.
        fouls.notify_changed();
    }
}

async fn apply_command(
    state: &AppState,
    fouls: &FoulLedger,
    command: RefereeCommand,
) -> Result<(), ServiceError> {
    match command {
        RefereeCommand::AddFoul(payload) => {
            let foul = Foul {
                team_id: payload.team_id,
                rule: payload.rule,
                is_technical: payload.is_technical,
                time_in_match_sec: arena_service::match_time_sec(state),
            };
            fouls.add(payload.alliance, foul).await?;
        }
        RefereeCommand::DeleteFoul(payload) => {
            let outcome = fouls.delete(payload.alliance, payload.foul()).await?;
            if !outcome.changed {
                debug!(alliance = %payload.alliance, team_id = payload.team_id, "no matching foul to delete");
            }
        }
        RefereeCommand::CommitMatch => {
            fouls.commit_for_match().await?;
        }
    }
    Ok(())
}

/// Forward match loads and foul list changes as `reload`.
fn spawn_relay(
    match_loaded: Listener<MatchLoaded>,
    fouls_changed: Listener<FoulsChanged>,
    writer: ConnectionWriter,
) -> JoinHandle<()> {
    let events = match_loaded
        .into_stream()
        .map(|_| ())
        .merge(fouls_changed.into_stream().map(|_| ()));

    tokio::spawn(async move {
        tokio::pin!(events);
        while events.next().await.is_some() {
            if writer.write_message(&OutboundMessage::Reload).await.is_err() {
                break;
            }
        }
    })
}
