//! # mafia-engine
//!
//! A resolution engine for Mafia-style social deduction games.
//!
//! Players hold a role and an alignment; each phase they queue *visits*
//! (an actor using an ability on some targets), and the engine resolves all
//! of them into one consistent outcome honoring priority, blocking and
//! protection. Mutual roleblocks that would otherwise deadlock are broken
//! by the Catastrophic Rule.
//!
//! ## Design Principles
//!
//! 1. **Rules live in abilities**: The core records who did what to whom.
//!    Every rule (kills, protection, roleblocks) is an [`abilities::Ability`]
//!    reading and settling visits.
//!
//! 2. **Composable roles**: Roles combine and take modifiers ("1-Shot",
//!    "Personal") that layer behavior without replacing it.
//!
//! 3. **Explicit registration**: The [`catalog::Catalog`] lists every
//!    built-in by id; nothing registers itself.
//!
//! ## Modules
//!
//! - `core`: Players, visits, chats, votes, configuration, the `Game`
//! - `abilities`: The `Ability` trait and target enumeration
//! - `roles`: Roles, alignments, win conditions
//! - `modifiers`: Modifier composition
//! - `resolve`: The fixed-point resolver and vote resolution
//! - `graph`: Cycle detection for the Catastrophic Rule
//! - `catalog`: Standard abilities, roles and factions

pub mod abilities;
pub mod catalog;
pub mod core;
pub mod graph;
pub mod modifiers;
pub mod resolve;
pub mod roles;

// Re-export commonly used types
pub use crate::core::{
    AbilityType, Chat, ChatMessage, Game, GameConfig, GameError, GameSnapshot, ModifierError,
    Phase, Player, PlayerId, ResolveError, TagSet, Visit, VisitId, VisitStatus,
};

pub use crate::abilities::{Ability, AbilityKey, AbilityRef};

pub use crate::catalog::Catalog;

pub use crate::modifiers::{ModifiedAbility, Modifier, NightRule};

pub use crate::resolve::{resolve_vote, Resolver};

pub use crate::roles::{Alignment, NamedRole, Role, WinCondition, WinResult};
