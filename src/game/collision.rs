//! Collision Detection
//!
//! Axis-aligned bounding-box tests between the player and everything that
//! can end a run: the four walls, NPCs and remote players.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::game::actor::{Actor, ActorRole};
use crate::game::arena::Arena;
use crate::game::state::GameState;

/// What the player ran into.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollisionKind {
    /// One of the arena walls.
    Wall,
    /// An NPC, by id.
    Npc {
        /// NPC id.
        id: u32,
    },
    /// A remote player, by id.
    RemotePlayer {
        /// Remote player id.
        id: u32,
    },
}

/// Check the player against the four walls.
///
/// Each wall is an independent barrier. The left and top walls are tested
/// against their inner faces (`left_x + wall_width`, `top_y + wall_height`).
/// Touching an inner face is not a collision.
pub fn player_hits_wall(player: &Actor, arena: &Arena, config: &GameConfig) -> bool {
    let x = player.x as f64;
    let y = player.y as f64;
    let right = (player.x + config.player_width) as f64;
    let bottom = (player.y + config.player_height) as f64;

    x < arena.left_x + config.wall_width as f64
        || right > arena.right_x
        || y < arena.top_y + config.wall_height as f64
        || bottom > arena.bottom_y
}

/// Check the player against one NPC's inset hitbox.
pub fn player_hits_npc(player: &Actor, npc: &Actor, config: &GameConfig) -> bool {
    let hitbox = npc.bounds(config).inset(config.npc_collision_inset);
    player.bounds(config).overlaps(&hitbox)
}

/// First NPC the player overlaps, if any.
pub fn first_npc_hit<'a>(player: &Actor, npcs: &'a [Actor], config: &GameConfig) -> Option<&'a Actor> {
    npcs.iter().find(|npc| player_hits_npc(player, npc, config))
}

/// Check the player against another player's full box.
///
/// The local player is never tested against itself.
pub fn player_hits_remote(player: &Actor, other: &Actor, config: &GameConfig) -> bool {
    match other.role {
        ActorRole::LocalPlayer => false,
        ActorRole::Npc | ActorRole::RemotePlayer => {
            player.bounds(config).overlaps(&other.bounds(config))
        }
    }
}

/// First remote player the player overlaps, if any.
pub fn first_remote_hit<'a>(
    player: &Actor,
    others: &'a [Actor],
    config: &GameConfig,
) -> Option<&'a Actor> {
    others.iter().find(|other| player_hits_remote(player, other, config))
}

/// Run the static checks (walls, then remote players) against the current state.
///
/// NPC checks happen after NPCs step, so they live in the tick itself.
pub fn check_static_collisions<R>(state: &GameState<R>) -> Option<CollisionKind> {
    let config = &state.config;

    if player_hits_wall(&state.player, &state.arena, config) {
        return Some(CollisionKind::Wall);
    }

    first_remote_hit(&state.player, &state.remote_players, config)
        .map(|other| CollisionKind::RemotePlayer { id: other.id })
}

/// NPC check against the current NPC positions.
pub fn check_npc_collisions<R>(state: &GameState<R>) -> Option<CollisionKind> {
    first_npc_hit(&state.player, &state.npcs, &state.config).map(|npc| CollisionKind::Npc { id: npc.id })
}

/// Full check in tick order: walls, remote players, NPCs.
pub fn detect_collision<R>(state: &GameState<R>) -> Option<CollisionKind> {
    check_static_collisions(state).or_else(|| check_npc_collisions(state))
}
