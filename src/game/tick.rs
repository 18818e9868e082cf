//! Simulation Tick
//!
//! One call per 60 Hz frame. Fully synchronous: the leaderboard and remote
//! roster live outside this path, so nothing here can block or fail.

#[cfg(feature = "debug-tracing")]
use tracing::trace;
use tracing::{debug, info};

use crate::config::{ConfirmKey, GameConfig};
use crate::core::rng::RandomSource;
use crate::game::actor::step_npc;
use crate::game::collision::{check_npc_collisions, check_static_collisions, CollisionKind};
use crate::game::events::{GameEvent, RunSummary};
use crate::game::input::{repeating_key_pressed, InputFrame, InputSource, Key};
use crate::game::state::{truncate_lines, GameState, Mode};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the run ended this tick
    pub run_ended: bool,
    /// What ended it
    pub collision: Option<CollisionKind>,
}

impl TickResult {
    /// Mode after the last transition this tick, if any.
    pub fn new_mode(&self) -> Option<Mode> {
        self.events.iter().rev().find_map(|event| match event {
            GameEvent::ModeChanged { to, .. } => Some(*to),
            _ => None,
        })
    }
}

/// Run one simulation tick.
///
/// # Arguments
///
/// * `state` - The game state (will be mutated)
/// * `input` - Edge-triggered input for this tick
///
/// # Determinism
///
/// Given the same state and the same input sequence this produces the same
/// result: all randomness comes from `state.rng`.
pub fn tick<R, I>(state: &mut GameState<R>, input: &I) -> TickResult
where
    R: RandomSource,
    I: InputSource + ?Sized,
{
    let mut result = TickResult::default();

    match state.run.mode {
        Mode::Title => {
            if input.just_pressed(Key::Space) {
                set_mode(state, Mode::NameEntry, &mut result);
            }
        }
        Mode::NameEntry => {
            update_name_entry(state, input);
            if input.just_pressed(state.config.confirm_key.key()) {
                start_run(state, &mut result);
            }
        }
        Mode::Playing => {
            update_playing(state, input, &mut result);
        }
        Mode::GameOver => {
            if input.just_pressed(Key::Space) {
                start_run(state, &mut result);
            }
        }
    }

    result
}

// =============================================================================
// NAME ENTRY
// =============================================================================

fn update_name_entry<R, I>(state: &mut GameState<R>, input: &I)
where
    I: InputSource + ?Sized,
{
    let config = &state.config;
    let typed = input.typed_chars();

    // The confirming space is not part of the name
    if config.confirm_key == ConfirmKey::Space && input.just_pressed(Key::Space) {
        state.run.name_buffer.extend(typed.chars().filter(|c| *c != ' '));
    } else {
        state.run.name_buffer.push_str(typed);
    }
    truncate_lines(&mut state.run.name_buffer, config.max_name_lines);

    let backspace = input.held_duration(Key::Backspace);
    if backspace > 0
        && repeating_key_pressed(
            backspace,
            config.backspace_repeat_delay,
            config.backspace_repeat_interval,
        )
    {
        state.run.name_buffer.pop();
    }

    state.run.blink_counter = state.run.blink_counter.wrapping_add(1);
}

// =============================================================================
// PLAYING
// =============================================================================

fn update_playing<R, I>(state: &mut GameState<R>, input: &I, result: &mut TickResult)
where
    R: RandomSource,
    I: InputSource + ?Sized,
{
    // 1. Advance clocks
    state.run.elapsed_seconds += state.config.tick_seconds();
    state.tick += 1;

    // 2. Discrete moves, axes independent
    apply_movement(state, input);

    // 3. Walls close in
    if let Some(rate) = state.config.shrink.rate() {
        if state.arena.shrink(rate) && state.arena.at_floor() {
            debug!("Arena reached its floor at tick {}", state.tick);
        }
    }

    // 4-5. Walls, then other players
    if let Some(cause) = check_static_collisions(state) {
        end_run(state, cause, result);
        return;
    }

    // 6. NPCs wander, then may catch the player
    let speed = state.run.speed_multiplier;
    for npc in &mut state.npcs {
        step_npc(npc, speed, &mut state.rng, &state.config);
    }
    if let Some(cause) = check_npc_collisions(state) {
        end_run(state, cause, result);
        return;
    }

    // 7. Difficulty ramp, derived from the tick count so it lands on the cap exactly
    state.run.speed_multiplier = (1.0 + state.tick as f64 * state.config.speed_ramp)
        .min(state.config.max_speed_multiplier);

    #[cfg(feature = "debug-tracing")]
    trace!(
        "tick {} player ({}, {}) speed {:.3}",
        state.tick,
        state.player.x,
        state.player.y,
        state.run.speed_multiplier
    );
}

fn apply_movement<R, I>(state: &mut GameState<R>, input: &I)
where
    I: InputSource + ?Sized,
{
    let step = state.config.move_step;
    let player = &mut state.player;

    if input.just_pressed(Key::Up) {
        player.y -= step;
    }
    if input.just_pressed(Key::Down) {
        player.y += step;
    }
    if input.just_pressed(Key::Right) {
        player.x += step;
    }
    if input.just_pressed(Key::Left) {
        player.x -= step;
    }
}

// =============================================================================
// TRANSITIONS
// =============================================================================

fn set_mode<R>(state: &mut GameState<R>, to: Mode, result: &mut TickResult) {
    let from = state.run.mode;
    state.run.mode = to;
    debug!("Mode {:?} -> {:?}", from, to);
    result.events.push(GameEvent::mode_changed(from, to));
}

/// Fresh run: same initialisation as process start, then play.
fn start_run<R: RandomSource>(state: &mut GameState<R>, result: &mut TickResult) {
    state.reset_run();
    state.runs_started += 1;
    set_mode(state, Mode::Playing, result);

    info!(
        "Run {} started for '{}' with {} npcs",
        state.runs_started,
        state.player.name,
        state.npcs.len()
    );
    result.events.push(GameEvent::RunStarted {
        name: state.player.name.clone(),
        npc_count: state.npcs.len() as u32,
    });
}

fn end_run<R>(state: &mut GameState<R>, cause: CollisionKind, result: &mut TickResult) {
    set_mode(state, Mode::GameOver, result);
    state.game_over_entries += 1;

    let summary = RunSummary {
        name: state.player.name.clone(),
        elapsed_seconds: state.run.elapsed_seconds,
        score: state.score(),
        ticks: state.tick,
        cause: cause.clone(),
    };
    state.best_score = state.best_score.max(summary.score);

    info!(
        "Run ended for '{}': {:?} after {:.2}s (score {}, best {})",
        summary.name, summary.cause, summary.elapsed_seconds, summary.score, state.best_score
    );

    result.run_ended = true;
    result.collision = Some(cause);
    result.events.push(GameEvent::RunEnded(summary));
}

// =============================================================================
// REPLAY
// =============================================================================

/// Replay a session from recorded input frames.
///
/// Returns the final state and every event produced along the way.
pub fn replay_run(
    config: GameConfig,
    seed: u64,
    frames: &[InputFrame],
) -> (GameState, Vec<GameEvent>) {
    let mut state = GameState::new(config, seed);
    let mut all_events = Vec::new();

    for frame in frames {
        let result = tick(&mut state, frame);
        all_events.extend(result.events);
    }

    (state, all_events)
}
