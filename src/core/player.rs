//! Players: identity, role, alignment, and everything the night leaves
//! behind (deaths, use counts, action history, private messages).

use std::collections::BTreeSet;
use std::sync::Arc;

use im::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::chat::Chat;
use super::visit::{AbilityType, Visit};
use crate::abilities::{AbilityKey, AbilityRef};
use crate::roles::{role_name, Alignment, Role};

/// Player identifier.
///
/// Ids are handed out by [`Game::add_player`](super::Game::add_player) in
/// admission order, starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u16);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// A player in a game.
///
/// Ability lists are derived once at admission: role actions then
/// alignment actions, role passives then alignment passives, and the
/// alignment's shared actions.
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    role: Role,
    alignment: Arc<Alignment>,
    actions: Vec<AbilityRef>,
    passives: Vec<AbilityRef>,
    shared_actions: Vec<AbilityRef>,
    death_causes: Vec<String>,
    uses: FxHashMap<AbilityKey, u32>,
    action_history: Vector<Visit>,
    known_players: BTreeSet<PlayerId>,
    private_messages: Chat,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String, role: Role, alignment: Arc<Alignment>) -> Self {
        let actions = role
            .actions()
            .iter()
            .chain(alignment.actions.iter())
            .cloned()
            .collect();
        let passives = role
            .passives()
            .iter()
            .chain(alignment.passives.iter())
            .cloned()
            .collect();
        let shared_actions = alignment.shared_actions.clone();

        Self {
            id,
            name,
            role,
            alignment,
            actions,
            passives,
            shared_actions,
            death_causes: Vec::new(),
            uses: FxHashMap::default(),
            action_history: Vector::new(),
            known_players: BTreeSet::new(),
            private_messages: Chat::private([id]),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn role(&self) -> &Role {
        &self.role
    }

    #[must_use]
    pub fn alignment(&self) -> &Arc<Alignment> {
        &self.alignment
    }

    /// Display name of the role/alignment pair, e.g. "Town Cop" or "Mafia Goon".
    #[must_use]
    pub fn role_name(&self) -> String {
        role_name(&self.role, &self.alignment)
    }

    #[must_use]
    pub fn actions(&self) -> &[AbilityRef] {
        &self.actions
    }

    #[must_use]
    pub fn passives(&self) -> &[AbilityRef] {
        &self.passives
    }

    #[must_use]
    pub fn shared_actions(&self) -> &[AbilityRef] {
        &self.shared_actions
    }

    /// Ability list for one ability type.
    #[must_use]
    pub fn abilities(&self, ability_type: AbilityType) -> &[AbilityRef] {
        match ability_type {
            AbilityType::Action => &self.actions,
            AbilityType::Passive => &self.passives,
            AbilityType::SharedAction => &self.shared_actions,
        }
    }

    /// Every ability the player holds, in list order.
    pub fn all_abilities(&self) -> impl Iterator<Item = &AbilityRef> {
        self.actions
            .iter()
            .chain(self.passives.iter())
            .chain(self.shared_actions.iter())
    }

    /// A player is alive until the first death cause is recorded.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.death_causes.is_empty()
    }

    #[must_use]
    pub fn death_causes(&self) -> &[String] {
        &self.death_causes
    }

    /// Record a death cause. Causes accumulate; death is permanent.
    pub fn kill(&mut self, cause: impl Into<String>) {
        self.death_causes.push(cause.into());
    }

    /// Uses recorded against an ability instance.
    #[must_use]
    pub fn uses(&self, key: AbilityKey) -> u32 {
        self.uses.get(&key).copied().unwrap_or(0)
    }

    pub(crate) fn add_use(&mut self, key: AbilityKey) {
        *self.uses.entry(key).or_insert(0) += 1;
    }

    /// Drop an ability from every list. Returns whether it was held.
    pub(crate) fn forget(&mut self, key: AbilityKey) -> bool {
        let held = self.all_abilities().count();
        self.actions.retain(|a| a.key() != key);
        self.passives.retain(|a| a.key() != key);
        self.shared_actions.retain(|a| a.key() != key);
        self.all_abilities().count() != held
    }

    /// Take on the role abilities of `other`, along with the uses they
    /// already spent on them.
    pub(crate) fn inherit(&mut self, other: &Player) {
        let role = other.role();
        self.actions.extend(role.actions().iter().cloned());
        self.passives.extend(role.passives().iter().cloned());
        for ability in role.actions().iter().chain(role.passives()) {
            let spent = other.uses(ability.key());
            if spent > 0 {
                *self.uses.entry(ability.key()).or_insert(0) += spent;
            }
        }
    }

    /// Snapshots of this player's logged visits, oldest first.
    #[must_use]
    pub fn action_history(&self) -> &Vector<Visit> {
        &self.action_history
    }

    pub(crate) fn record_action(&mut self, visit: Visit) {
        self.action_history.push_back(visit);
    }

    /// Whether this player learned `other`'s identity at admission.
    #[must_use]
    pub fn knows(&self, other: PlayerId) -> bool {
        self.known_players.contains(&other)
    }

    #[must_use]
    pub fn known_players(&self) -> &BTreeSet<PlayerId> {
        &self.known_players
    }

    pub(crate) fn learn(&mut self, other: PlayerId) {
        self.known_players.insert(other);
    }

    #[must_use]
    pub fn private_messages(&self) -> &Chat {
        &self.private_messages
    }

    /// Append a message to this player's private log.
    pub fn notify(&mut self, sender: impl Into<String>, content: impl Into<String>) {
        self.private_messages.send(sender, content);
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
