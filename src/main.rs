//! Closing Walls Demo Host
//!
//! Headless host for the simulation: drives one scripted run at the real tick
//! rate, shows the leaderboard the game-over screen would render, and checks
//! that replaying the recorded input reproduces the same state hash.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use closing_walls::{
    AppConfig, DeterministicRng, GameState, InputFrame, Key, KeyTracker, Mode, VERSION,
    game::{events::GameEvent, tick::replay_run},
    network::{connect_remote_feed, GameSession, LeaderboardClient, LeaderboardView},
};

/// Give up on the scripted run after this many ticks.
const MAX_DEMO_TICKS: u32 = 60 * 180;

/// Name typed during name entry.
const DEMO_NAME: &str = "Demo";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    info!("Closing Walls v{}", VERSION);
    info!("Tick Rate: {} Hz", config.game.tick_rate);
    info!(
        "Arena: {}x{}, {} npcs, shrink {:?}",
        config.game.screen_width, config.game.screen_height, config.game.npc_count, config.game.shrink
    );

    demo_run(config).await
}

/// Drive one scripted run through a [`GameSession`].
async fn demo_run(config: AppConfig) -> Result<()> {
    info!("=== Starting Demo Run ===");

    let seed = config.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(12345)
    });
    info!("RNG Seed: {}", seed);

    let leaderboard = if config.leaderboard.enabled {
        let client =
            LeaderboardClient::new(&config.leaderboard).context("Failed to build leaderboard client")?;
        info!("Leaderboard backend: {}", client.base_url());
        Some(client)
    } else {
        info!("Leaderboard disabled");
        None
    };

    let state = GameState::new(config.game.clone(), seed);
    let mut session = GameSession::new(state, leaderboard.clone(), config.leaderboard.timeout());

    if let Some(url) = &config.remote.url {
        match connect_remote_feed(url, config.remote.channel_capacity).await {
            Ok(feed) => session = session.with_remote_feed(feed),
            Err(e) => warn!("Playing without remote players: {}", e),
        }
    }

    // Scripted input: title, name, confirm, then wander
    let confirm = config.game.confirm_key.key();
    let mut tracker = KeyTracker::new();
    let mut moves = DeterministicRng::new(seed ^ 0x5EED);
    let mut frames: Vec<InputFrame> = Vec::new();

    let mut ticker = interval(Duration::from_secs_f64(config.game.tick_seconds()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut summary = None;
    for t in 0..MAX_DEMO_TICKS {
        ticker.tick().await;

        let (keys, typed): (Vec<Key>, &str) = match (t, session.state().mode()) {
            (0, _) => (vec![Key::Space], ""),
            (_, Mode::NameEntry) if t == 2 => (vec![], DEMO_NAME),
            (_, Mode::NameEntry) if t == 4 => (vec![confirm], ""),
            (_, Mode::Playing) if t % 10 == 0 => {
                let key = moves
                    .choose(&[Key::Up, Key::Down, Key::Left, Key::Right])
                    .copied()
                    .unwrap_or(Key::Right);
                (vec![key], "")
            }
            _ => (vec![], ""),
        };

        let frame = tracker.advance(&keys, typed);
        let result = session.step(&frame);
        frames.push(frame);

        for event in &result.events {
            match event {
                GameEvent::ModeChanged { from, to } => info!("Tick {}: {:?} -> {:?}", t, from, to),
                GameEvent::RunStarted { name, npc_count } => {
                    info!("Run started for '{}' against {} npcs", name, npc_count)
                }
                GameEvent::RunEnded(run) => summary = Some(run.clone()),
            }
        }

        if result.run_ended {
            break;
        }
        if t > 0 && t % 600 == 0 {
            let run = &session.state().run;
            info!(
                "Tick {}: {:.1}s survived, speed x{:.3}",
                t, run.elapsed_seconds, run.speed_multiplier
            );
        }
    }

    // Print final results
    info!("=== Run Results ===");
    match &summary {
        Some(run) => info!(
            "'{}' hit {:?} after {:.2}s (score {}, {} ticks)",
            run.name, run.cause, run.elapsed_seconds, run.score, run.ticks
        ),
        None => info!("Run still going after {} ticks", MAX_DEMO_TICKS),
    }
    let active = frames.iter().filter(|f| !f.is_idle()).count();
    info!("Recorded {} frames, {} with input", frames.len(), active);

    match session.wait_for_leaderboard().await {
        LeaderboardView::Ready(entries) => {
            for (rank, entry) in entries.iter().enumerate() {
                info!("#{}: {} - {}", rank + 1, entry.name, entry.high_score);
            }
        }
        LeaderboardView::Unavailable(reason) => info!("Leaderboard unavailable: {}", reason),
        LeaderboardView::Loading | LeaderboardView::Hidden => {}
    }

    if let (Some(client), Some(run)) = (&leaderboard, &summary) {
        register_demo_player(client, &run.name).await;
    }

    let state = session.into_state();
    let hash = state.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let (replay_final, replay_events) = replay_run(config.game, seed, &frames);
    let replay_hash = replay_final.compute_hash();
    info!("Replay State Hash: {} ({} events)", hex::encode(replay_hash), replay_events.len());

    if !state.remote_players.is_empty() {
        info!("Remote players were present; replay covers local input only");
    } else if hash != replay_hash {
        bail!("Replay diverged from the live run");
    } else {
        info!("Determinism verified");
    }

    Ok(())
}

/// Register the player with the backend and log their stored best.
async fn register_demo_player(client: &LeaderboardClient, name: &str) {
    let token = match client.register_player(name).await {
        Ok(token) => token,
        Err(e) => {
            warn!("Registration failed: {}", e);
            return;
        }
    };

    match client.fetch_profile(&token).await {
        Ok(profile) => info!("Backend best for '{}': {}", profile.name, profile.high_score),
        Err(e) => warn!("Profile lookup failed: {}", e),
    }
}
