//! Remote Roster Feed
//!
//! Delivers whole-roster snapshots of other players to the host. The host
//! drains the newest snapshot between ticks and hands it to
//! [`crate::game::state::GameState::apply_remote_players`]; positions are
//! never patched field by field.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, info, warn};

use crate::game::actor::Actor;
use crate::network::protocol::{ClientMessage, ServerMessage};

/// Remote feed errors.
#[derive(Debug, thiserror::Error)]
pub enum RemoteFeedError {
    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

/// Host side of the roster channel.
#[derive(Debug)]
pub struct RemoteFeed {
    rosters: mpsc::Receiver<Vec<Actor>>,
    outgoing: Option<mpsc::Sender<ClientMessage>>,
}

/// Producer side of a roster channel.
pub type RosterSender = mpsc::Sender<Vec<Actor>>;

impl RemoteFeed {
    /// Create an unconnected feed; whoever holds the sender supplies rosters.
    pub fn channel(capacity: usize) -> (RosterSender, Self) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            tx,
            Self {
                rosters: rx,
                outgoing: None,
            },
        )
    }

    /// Take the newest pending roster, discarding older ones.
    ///
    /// Returns `None` when nothing arrived since the last drain.
    pub fn drain_latest(&mut self) -> Option<Vec<Actor>> {
        let mut latest = None;
        loop {
            match self.rosters.try_recv() {
                Ok(roster) => latest = Some(roster),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        latest
    }

    /// Queue a message for the relay without waiting.
    ///
    /// Returns false if there is no relay or its queue is full.
    pub fn publish(&self, message: ClientMessage) -> bool {
        let Some(outgoing) = &self.outgoing else {
            return false;
        };
        match outgoing.try_send(message) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                debug!("Relay queue full, dropping message");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        }
    }
}

/// Connect to a roster relay.
///
/// Spawns a reader that turns `roster` messages into snapshots and a writer
/// that forwards published [`ClientMessage`]s.
pub async fn connect_remote_feed(url: &str, capacity: usize) -> Result<RemoteFeed, RemoteFeedError> {
    let (ws_stream, _) = connect_async(url).await?;
    info!("Connected to roster relay at {}", url);

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (roster_tx, mut feed) = RemoteFeed::channel(capacity);
    let (out_tx, mut out_rx) = mpsc::channel::<ClientMessage>(capacity.max(1));
    feed.outgoing = Some(out_tx);

    // Writer
    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let text = match msg.to_json() {
                Ok(t) => t,
                Err(e) => {
                    warn!("Failed to serialize relay message: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader
    tokio::spawn(async move {
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match ServerMessage::from_json(&text) {
                    Ok(ServerMessage::Roster { players }) => {
                        let roster = players.into_iter().map(|p| p.into_actor()).collect();
                        if roster_tx.send(roster).await.is_err() {
                            break;
                        }
                    }
                    Ok(ServerMessage::Error { message }) => {
                        warn!("Relay error: {}", message);
                    }
                    Err(e) => {
                        debug!("Invalid relay message: {}", e);
                    }
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!("Relay connection error: {}", e);
                    break;
                }
            }
        }
        info!("Roster relay closed");
    });

    Ok(feed)
}
