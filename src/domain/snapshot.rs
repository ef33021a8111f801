//! Full-state persistence.
//!
//! The whole [`GameState`] serializes to JSON and restores bit-for-bit:
//! seating, hands, hidden six, stacks, trick, flags, wish, pending
//! Dragon gift, and the scoreboard. A restored state behaves
//! identically under any subsequent intent sequence.

use super::state::GameState;

pub fn to_json(state: &GameState) -> serde_json::Result<String> {
    serde_json::to_string(state)
}

pub fn from_json(json: &str) -> serde_json::Result<GameState> {
    serde_json::from_str(json)
}
