//! Core engine types: players, visits, chats, configuration, the game
//! aggregate and its errors.
//!
//! Nothing in here knows about specific roles. Game rules live in the
//! abilities attached to roles and alignments; the core only records who
//! did what to whom and when.

pub mod chat;
pub mod config;
pub mod error;
pub mod player;
pub mod snapshot;
pub mod state;
pub mod tags;
pub mod visit;
mod vote;

pub use chat::{Chat, ChatAccess, ChatMessage};
pub use config::{GameConfig, Phase};
pub use error::{GameError, ModifierError, ResolveError};
pub use player::{Player, PlayerId};
pub use snapshot::{GameSnapshot, PlayerSnapshot, VisitRecord};
pub use state::{Game, GLOBAL_CHAT};
pub use tags::TagSet;
pub use visit::{AbilityType, Targets, Visit, VisitId, VisitStatus};
