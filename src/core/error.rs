//! Error types.
//!
//! Rule outcomes (a kill that was protected, a roleblocked cop) are never
//! errors; they live in a visit's status. Errors are reserved for misuse of
//! the API and for states the rules cannot get out of.

use thiserror::Error;

use super::config::Phase;
use super::player::PlayerId;
use super::visit::AbilityType;

/// Misuse of the game API, reported before any state changes.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    #[error("{ability} takes {expected} target(s), got {actual}")]
    TargetArity {
        ability: String,
        expected: usize,
        actual: usize,
    },

    #[error("{player} has no {ability_type:?} ability at index {index}")]
    AbilityIndex {
        player: PlayerId,
        ability_type: AbilityType,
        index: usize,
    },

    #[error("phase {0:?} is not part of this game's phase order")]
    UnknownPhase(Phase),

    #[error("chat `{0}` exists and is not private")]
    ChatKind(String),

    #[error("no chat named `{0}`")]
    UnknownChat(String),

    #[error("invalid game configuration: {0}")]
    Config(&'static str),
}

/// Fatal outcome of a resolution pass.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Neither the resolution loop nor cycle-breaking made progress.
    #[error("resolution deadlocked with {pending} visit(s) still pending")]
    Deadlock { pending: usize },
}

/// A modifier applied somewhere it cannot go.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ModifierError {
    #[error("cannot apply {modifier} to ability {target}")]
    Incompatible { modifier: String, target: String },

    #[error("an X-Shot modifier needs at least one use")]
    ZeroUses,

    #[error("unknown modifier `{0}`")]
    Unknown(String),
}
