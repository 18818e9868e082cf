//! Actors
//!
//! One record shape for the local player, NPCs and remote players. The role
//! is an explicit enum so collision and rendering code can match on it
//! exhaustively.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::core::rect::Rect;
use crate::core::rng::RandomSource;

/// Who an actor is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ActorRole {
    /// The player controlled on this machine.
    LocalPlayer = 0,
    /// Computer-controlled wanderer.
    Npc = 1,
    /// Another player, positioned by the remote roster feed.
    RemotePlayer = 2,
}

/// A positioned entity. Size comes from the config (all actors share it).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Left edge in screen pixels.
    pub x: i32,
    /// Top edge in screen pixels.
    pub y: i32,
    /// Name shown above the sprite.
    pub name: String,
    /// Identifier, unique within its role.
    pub id: u32,
    /// Player, NPC or remote player.
    pub role: ActorRole,
}

impl Actor {
    /// Id of the local player.
    pub const LOCAL_PLAYER_ID: u32 = 0;

    /// Create the local player at the configured spawn point.
    pub fn player(name: &str, config: &GameConfig) -> Self {
        let (x, y) = config.player_spawn;
        Self {
            x,
            y,
            name: name.to_string(),
            id: Self::LOCAL_PLAYER_ID,
            role: ActorRole::LocalPlayer,
        }
    }

    /// Create a remote player at a known position.
    pub fn remote(id: u32, name: &str, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            name: name.to_string(),
            id,
            role: ActorRole::RemotePlayer,
        }
    }

    /// Bounding box at sprite size.
    #[inline]
    pub fn bounds(&self, config: &GameConfig) -> Rect {
        Rect::from_origin_size(self.x, self.y, config.player_width, config.player_height)
    }

    /// Is this the local player?
    #[inline]
    pub fn is_local_player(&self) -> bool {
        matches!(self.role, ActorRole::LocalPlayer)
    }
}

// =============================================================================
// NPC CONTROLLER
// =============================================================================

/// Cardinal step direction, in the order the random draw selects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// -y
    Up,
    /// +y
    Down,
    /// -x
    Left,
    /// +x
    Right,
}

impl Direction {
    /// Map a draw in [0, 4) to a direction.
    pub fn from_draw(draw: u32) -> Self {
        match draw % 4 {
            0 => Direction::Up,
            1 => Direction::Down,
            2 => Direction::Left,
            _ => Direction::Right,
        }
    }
}

/// Spawn an NPC at a random position kept away from the screen edges.
///
/// Each axis is drawn from `[size/2, screen - 1.5*size)`.
pub fn spawn_npc<R: RandomSource>(id: u32, name: &str, rng: &mut R, config: &GameConfig) -> Actor {
    let x = rng.next_in(
        config.player_width / 2,
        config.screen_width - config.player_width * 2 + config.player_width / 2,
    );
    let y = rng.next_in(
        config.player_height / 2,
        config.screen_height - config.player_height * 2 + config.player_height / 2,
    );

    Actor {
        x,
        y,
        name: name.to_string(),
        id,
        role: ActorRole::Npc,
    }
}

/// Take one memoryless random-walk step.
///
/// Picks a direction uniformly, moves `trunc(base_step * speed)` pixels along
/// that axis, then clamps the actor fully on screen. Returns the direction.
pub fn step_npc<R: RandomSource>(
    npc: &mut Actor,
    speed_multiplier: f64,
    rng: &mut R,
    config: &GameConfig,
) -> Direction {
    let direction = Direction::from_draw(rng.next_int(4));
    let amount = (config.npc_base_step * speed_multiplier).trunc() as i32;

    match direction {
        Direction::Up => npc.y -= amount,
        Direction::Down => npc.y += amount,
        Direction::Left => npc.x -= amount,
        Direction::Right => npc.x += amount,
    }

    npc.x = npc.x.clamp(0, config.screen_width - config.player_width);
    npc.y = npc.y.clamp(0, config.screen_height - config.player_height);

    direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::{DeterministicRng, ScriptedRandom};

    #[test]
    fn test_player_spawn() {
        let config = GameConfig::default();
        let player = Actor::player("Ann", &config);
        assert_eq!((player.x, player.y), (100, 100));
        assert_eq!(player.name, "Ann");
        assert!(player.is_local_player());
        assert_eq!(player.bounds(&config), Rect::new(100, 100, 200, 200));
    }

    #[test]
    fn test_npc_spawn_range() {
        let config = GameConfig::default();
        let mut rng = DeterministicRng::new(42);

        for i in 0..500 {
            let npc = spawn_npc(i, "NPC", &mut rng, &config);
            assert!((50..490).contains(&npc.x), "x = {}", npc.x);
            assert!((50..490).contains(&npc.y), "y = {}", npc.y);
            assert_eq!(npc.role, ActorRole::Npc);
        }
    }

    #[test]
    fn test_npc_spawn_scripted() {
        let config = GameConfig::default();
        let mut rng = ScriptedRandom::new(vec![0, 439]);
        let npc = spawn_npc(1, "NPC1", &mut rng, &config);
        assert_eq!((npc.x, npc.y), (50, 489));
    }

    #[test]
    fn test_step_each_direction() {
        let config = GameConfig::default();
        let base = Actor {
            x: 300,
            y: 300,
            name: "NPC1".into(),
            id: 1,
            role: ActorRole::Npc,
        };

        let cases = [
            (0, Direction::Up, (300, 295)),
            (1, Direction::Down, (300, 305)),
            (2, Direction::Left, (295, 300)),
            (3, Direction::Right, (305, 300)),
        ];

        for (draw, expected_dir, expected_pos) in cases {
            let mut npc = base.clone();
            let mut rng = ScriptedRandom::new(vec![draw]);
            let dir = step_npc(&mut npc, 1.0, &mut rng, &config);
            assert_eq!(dir, expected_dir);
            assert_eq!((npc.x, npc.y), expected_pos);
        }
    }

    #[test]
    fn test_step_truncates_toward_zero() {
        let config = GameConfig::default();
        let mut npc = spawn_npc(1, "NPC1", &mut ScriptedRandom::new(vec![250, 250]), &config);
        assert_eq!((npc.x, npc.y), (300, 300));

        // 5.0 * 1.399 = 6.995 -> 6
        step_npc(&mut npc, 1.399, &mut ScriptedRandom::new(vec![3]), &config);
        assert_eq!(npc.x, 306);
    }

    #[test]
    fn test_step_clamps_to_screen() {
        let config = GameConfig::default();
        let mut npc = Actor {
            x: 2,
            y: 538,
            name: "NPC1".into(),
            id: 1,
            role: ActorRole::Npc,
        };

        step_npc(&mut npc, 1.0, &mut ScriptedRandom::new(vec![2]), &config);
        assert_eq!(npc.x, 0);

        step_npc(&mut npc, 1.0, &mut ScriptedRandom::new(vec![1]), &config);
        assert_eq!(npc.y, 540);
    }
}
