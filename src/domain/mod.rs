//! Domain layer: pure rule-engine types and operations.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod combination;
pub mod dealing;
pub mod declarations;
pub mod engine;
pub mod exchange;
pub mod player_view;
pub mod scoring;
pub mod seed_derivation;
pub mod snapshot;
pub mod state;
pub mod tricks;

#[cfg(test)]
mod tests_snapshot_phases;
#[cfg(test)]
mod tests_tricks;

// Re-exports for ergonomics
pub use cards_logic::{card_points, points_of};
pub use cards_parsing::try_parse_cards;
pub use cards_types::{Card, Rank, Suit};
pub use combination::{beats, classify, compare, Bomb, Combination, SingleValue};
pub use dealing::{deal_round, full_deck};
pub use engine::{apply, GameEvent, Intent};
pub use player_view::{view_for, SeatView};
pub use seed_derivation::derive_deal_seed;
pub use state::{partner, team_of, GameState, Phase, Seat, Team};
