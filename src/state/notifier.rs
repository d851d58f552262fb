//! Typed fan-out hubs used to push arena events to every connected station.
//!
//! Each [`Notifier`] is backed by a bounded Tokio broadcast channel, so
//! publishing never waits on a listener. A listener that falls more than the
//! channel capacity behind loses the *oldest* undelivered events and keeps
//! going from the most recent ones; since every relayed message either carries
//! the full current state or asks the client to reload, skipping stale events
//! is harmless.

use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tracing::warn;
use uuid::Uuid;

use crate::state::score::Alliance;

/// A new match (and roster) was loaded; clients should refetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchLoaded;

/// The arena clock advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchTimeTick {
    /// Whole seconds elapsed since the match started.
    pub match_time_sec: u32,
}

/// A final match result was posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePosted;

/// The foul list of either alliance may have changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoulsChanged;

/// The realtime score of `alliance` changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreChanged {
    /// Alliance whose score changed.
    pub alliance: Alliance,
    /// Station whose command caused the change; `None` for arena and referee edits.
    pub origin: Option<Uuid>,
}

/// Broadcast hub for a single event type.
#[derive(Debug, Clone)]
pub struct Notifier<E> {
    name: &'static str,
    sender: broadcast::Sender<E>,
}

impl<E: Clone> Notifier<E> {
    /// Create a hub whose listeners buffer at most `capacity` events each.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity.max(1));
        Self { name, sender }
    }

    /// Register a listener that receives every event published from now on.
    pub fn subscribe(&self) -> Listener<E> {
        Listener {
            name: self.name,
            receiver: self.sender.subscribe(),
        }
    }

    /// Deliver `event` to all current listeners and return how many there were.
    pub fn publish(&self, event: E) -> usize {
        // No listeners is not an error.
        self.sender.send(event).unwrap_or(0)
    }

    /// Number of listeners currently subscribed.
    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// Subscription handle. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Listener<E> {
    name: &'static str,
    receiver: broadcast::Receiver<E>,
}

impl<E: Clone> Listener<E> {
    /// Wait for the next event, or `None` once the notifier is gone.
    pub async fn recv(&mut self) -> Option<E> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(notifier = self.name, skipped, "listener lagged; oldest events dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }
}

impl<E: Clone + Send + 'static> Listener<E> {
    /// Turn the listener into a stream, applying the same lag policy as [`Listener::recv`].
    pub fn into_stream(self) -> impl Stream<Item = E> + Send + 'static {
        let name = self.name;
        BroadcastStream::new(self.receiver).filter_map(move |item| match item {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(notifier = name, error = %err, "listener lagged; oldest events dropped");
                None
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_every_listener_in_order() {
        let notifier = Notifier::new("test", 8);
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        assert_eq!(notifier.publish(MatchTimeTick { match_time_sec: 1 }), 2);
        assert_eq!(notifier.publish(MatchTimeTick { match_time_sec: 2 }), 2);

        for listener in [&mut first, &mut second] {
            assert_eq!(listener.recv().await.unwrap().match_time_sec, 1);
            assert_eq!(listener.recv().await.unwrap().match_time_sec, 2);
        }
    }

    #[tokio::test]
    async fn publish_without_listeners_is_fine() {
        let notifier = Notifier::new("test", 4);
        assert_eq!(notifier.publish(MatchLoaded), 0);
    }

    #[tokio::test]
    async fn dropping_listener_unsubscribes() {
        let notifier = Notifier::new("test", 4);
        let listener = notifier.subscribe();
        let _other = notifier.subscribe();
        assert_eq!(notifier.listener_count(), 2);

        drop(listener);
        assert_eq!(notifier.listener_count(), 1);
        assert_eq!(notifier.publish(ScorePosted), 1);
    }

    #[tokio::test]
    async fn slow_listener_drops_oldest_and_does_not_block_publish() {
        let notifier = Notifier::new("test", 2);
        let mut slow = notifier.subscribe();

        for second in 0..5 {
            notifier.publish(MatchTimeTick {
                match_time_sec: second,
            });
        }

        assert_eq!(slow.recv().await.unwrap().match_time_sec, 3);
        assert_eq!(slow.recv().await.unwrap().match_time_sec, 4);
    }

    #[tokio::test]
    async fn listener_ends_when_notifier_dropped() {
        let notifier = Notifier::<FoulsChanged>::new("test", 4);
        let mut listener = notifier.subscribe();
        drop(notifier);
        assert_eq!(listener.recv().await, None);
    }

    #[tokio::test]
    async fn stream_yields_published_events() {
        let notifier = Notifier::new("test", 4);
        let stream = notifier.subscribe().into_stream();
        notifier.publish(ScoreChanged {
            alliance: Alliance::Blue,
            origin: None,
        });
        drop(notifier);

        let events: Vec<_> = stream.collect().await;
        assert_eq!(
            events,
            vec![ScoreChanged {
                alliance: Alliance::Blue,
                origin: None,
            }]
        );
    }
}
