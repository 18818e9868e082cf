//! Game Session
//!
//! Host-side driver around the deterministic simulation. Applies remote
//! rosters between ticks, runs the tick, and turns `RunEnded` into exactly one
//! leaderboard fetch per game over. Fetches run on the tokio runtime and are
//! polled without blocking, so a slow backend never stalls the clock.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info, warn};

use crate::game::events::{GameEvent, RunSummary};
use crate::game::input::InputSource;
use crate::game::state::{GameState, Mode};
use crate::game::tick::{tick, TickResult};
use crate::network::leaderboard::{LeaderboardError, LeaderboardSource};
use crate::network::protocol::{ClientMessage, LeaderboardEntry};
use crate::network::remote::RemoteFeed;

type FetchResult = Result<Vec<LeaderboardEntry>, LeaderboardError>;

/// What the game-over screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LeaderboardView {
    /// Not in game over, or fetching disabled.
    #[default]
    Hidden,
    /// Fetch in flight.
    Loading,
    /// Entries, highest first.
    Ready(Vec<LeaderboardEntry>),
    /// Fetch failed; the list is omitted.
    Unavailable(String),
}

impl LeaderboardView {
    /// Entries to render, if any.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        match self {
            LeaderboardView::Ready(entries) => entries,
            _ => &[],
        }
    }
}

/// One local game plus its non-deterministic collaborators.
pub struct GameSession<L: LeaderboardSource> {
    /// Simulation state.
    state: GameState,
    /// Leaderboard backend; `None` disables fetching.
    leaderboard: Option<L>,
    /// Per-fetch timeout.
    fetch_timeout: Duration,
    /// In-flight fetch.
    pending: Option<oneshot::Receiver<FetchResult>>,
    /// Current game-over display.
    view: LeaderboardView,
    /// Optional roster relay.
    remote: Option<RemoteFeed>,
    /// Last position published to the relay.
    last_published: Option<(i32, i32)>,
    /// Fetches issued so far.
    fetches_started: u32,
}

impl<L: LeaderboardSource> GameSession<L> {
    /// Wrap a game state.
    pub fn new(state: GameState, leaderboard: Option<L>, fetch_timeout: Duration) -> Self {
        Self {
            state,
            leaderboard,
            fetch_timeout,
            pending: None,
            view: LeaderboardView::Hidden,
            remote: None,
            last_published: None,
            fetches_started: 0,
        }
    }

    /// Attach a roster relay.
    pub fn with_remote_feed(mut self, feed: RemoteFeed) -> Self {
        self.remote = Some(feed);
        self
    }

    /// Simulation state (read-only).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consume the session, returning the simulation state.
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Current leaderboard display.
    pub fn view(&self) -> &LeaderboardView {
        &self.view
    }

    /// Leaderboard fetches issued so far.
    pub fn fetches_started(&self) -> u32 {
        self.fetches_started
    }

    /// Run one tick.
    ///
    /// Order: collect a finished fetch, apply the newest roster, tick, react
    /// to the tick's events, publish the local position.
    pub fn step<I: InputSource + ?Sized>(&mut self, input: &I) -> TickResult {
        self.poll_leaderboard();

        if let Some(roster) = self.remote.as_mut().and_then(RemoteFeed::drain_latest) {
            self.state.apply_remote_players(roster);
        }

        let result = tick(&mut self.state, input);

        for event in &result.events {
            match event {
                GameEvent::RunEnded(summary) => self.begin_fetch(summary),
                GameEvent::ModeChanged {
                    from: Mode::GameOver,
                    ..
                } => {
                    self.pending = None;
                    self.view = LeaderboardView::Hidden;
                }
                _ => {}
            }
        }

        self.publish_position();
        result
    }

    /// Pick up a finished fetch without blocking.
    pub fn poll_leaderboard(&mut self) -> &LeaderboardView {
        if let Some(rx) = self.pending.as_mut() {
            match rx.try_recv() {
                Ok(result) => {
                    self.pending = None;
                    self.settle(result);
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    self.pending = None;
                    self.settle(Err(LeaderboardError::Timeout(self.fetch_timeout)));
                }
            }
        }
        &self.view
    }

    /// Wait for the in-flight fetch, if any.
    pub async fn wait_for_leaderboard(&mut self) -> &LeaderboardView {
        if let Some(rx) = self.pending.take() {
            let result = rx
                .await
                .unwrap_or(Err(LeaderboardError::Timeout(self.fetch_timeout)));
            self.settle(result);
        }
        &self.view
    }

    fn begin_fetch(&mut self, summary: &RunSummary) {
        let Some(source) = self.leaderboard.clone() else {
            return;
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!("Leaderboard fetch skipped: {}", e);
                self.view = LeaderboardView::Unavailable("no async runtime".to_string());
                return;
            }
        };

        let (tx, rx) = oneshot::channel();
        let timeout = self.fetch_timeout;
        handle.spawn(async move {
            let result = match tokio::time::timeout(timeout, source.fetch_leaderboard()).await {
                Ok(result) => result,
                Err(_) => Err(LeaderboardError::Timeout(timeout)),
            };
            let _ = tx.send(result);
        });

        self.pending = Some(rx);
        self.view = LeaderboardView::Loading;
        self.fetches_started += 1;
        debug!(
            "Leaderboard fetch {} issued after '{}' scored {}",
            self.fetches_started, summary.name, summary.score
        );
    }

    fn settle(&mut self, result: FetchResult) {
        // A fetch that lands after the player left game over is stale
        if self.state.mode() != Mode::GameOver {
            return;
        }
        self.view = match result {
            Ok(entries) => {
                info!("Leaderboard ready ({} entries)", entries.len());
                LeaderboardView::Ready(entries)
            }
            Err(e) => {
                warn!("Leaderboard unavailable: {}", e);
                LeaderboardView::Unavailable(e.to_string())
            }
        };
    }

    fn publish_position(&mut self) {
        let Some(feed) = &self.remote else {
            return;
        };
        if self.state.mode() != Mode::Playing {
            return;
        }

        let position = (self.state.player.x, self.state.player.y);
        if self.last_published == Some(position) {
            return;
        }
        let sent = feed.publish(ClientMessage::Move {
            name: self.state.player.name.clone(),
            x: position.0,
            y: position.1,
        });
        if sent {
            self.last_published = Some(position);
        }
    }
}
