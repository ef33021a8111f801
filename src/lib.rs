//! Authoritative rule engine for four-player Tichu.
//!
//! The engine is a pure, synchronous state machine: embedders translate
//! player actions into [`Intent`]s, call [`apply`], and render the
//! returned events plus per-seat views. Rejected intents leave state
//! untouched; the sequence of accepted intents is the canonical history
//! of a match.
//!
//! Transport, lobby, identity, and presentation are external concerns.

pub mod domain;
pub mod errors;

pub use domain::engine::{apply, GameEvent, Intent};
pub use domain::state::{GameState, Phase, Seat, Team};
pub use errors::domain::{DomainError, RejectKind};
