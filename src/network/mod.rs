//! Network Layer
//!
//! Leaderboard HTTP client, optional roster relay, and the session host that
//! keeps both off the tick path.
//! This layer is **non-deterministic** - all game logic runs through `game/`.

pub mod protocol;
pub mod leaderboard;
pub mod remote;
pub mod session;

pub use protocol::{
    ClientMessage, LeaderboardEntry, PlayerProfile, RosterEntry, ServerMessage,
};
pub use leaderboard::{LeaderboardClient, LeaderboardError, LeaderboardSource};
pub use remote::{connect_remote_feed, RemoteFeed, RemoteFeedError, RosterSender};
pub use session::{GameSession, LeaderboardView};
