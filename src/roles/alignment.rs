//! Alignments and win conditions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{modify_all, InitHook};
use crate::abilities::{Ability, AbilityRef};
use crate::core::{Game, GameError, ModifierError, PlayerId, TagSet};
use crate::modifiers::Modifier;

/// Standing of a player with respect to their win condition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinResult {
    Ongoing,
    Win,
    Lose,
}

/// How an alignment decides whether its players have won.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinCondition {
    /// Win by being alive.
    #[default]
    Survive,
    /// Win as a team once no other faction has a living player.
    Faction,
    /// As `Faction`, but also win if nobody at all is left alive.
    LastStanding,
}

impl WinCondition {
    /// Whether alignments with this condition count as opponents of a faction.
    #[must_use]
    pub fn is_faction(self) -> bool {
        matches!(self, WinCondition::Faction | WinCondition::LastStanding)
    }
}

/// A team or self-aligned side.
///
/// Every player of an alignment gets its actions and passives; its shared
/// actions are held by the whole team and queued once per team.
#[derive(Clone, Debug)]
pub struct Alignment {
    pub id: String,
    pub actions: Vec<AbilityRef>,
    pub passives: Vec<AbilityRef>,
    pub shared_actions: Vec<AbilityRef>,
    pub tags: TagSet,
    /// Word used after adjectival roles ("Vanilla Townie"); the id if unset.
    pub demonym: Option<String>,
    /// Full role-name overrides keyed by role id.
    pub role_names: BTreeMap<String, String>,
    pub win: WinCondition,
    pub init: Option<InitHook>,
    pub modifiers: BTreeSet<String>,
}

impl Alignment {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
            passives: Vec::new(),
            shared_actions: Vec::new(),
            tags: TagSet::new(),
            demonym: None,
            role_names: BTreeMap::new(),
            win: WinCondition::Survive,
            init: None,
            modifiers: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_action<A: Ability + 'static>(mut self, ability: A) -> Self {
        self.actions.push(AbilityRef::new(ability));
        self
    }

    #[must_use]
    pub fn with_passive<A: Ability + 'static>(mut self, ability: A) -> Self {
        self.passives.push(AbilityRef::new(ability));
        self
    }

    #[must_use]
    pub fn with_shared_action<A: Ability + 'static>(mut self, ability: A) -> Self {
        self.shared_actions.push(AbilityRef::new(ability));
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().copied());
        self
    }

    #[must_use]
    pub fn with_demonym(mut self, demonym: impl Into<String>) -> Self {
        self.demonym = Some(demonym.into());
        self
    }

    #[must_use]
    pub fn with_role_name(mut self, role: impl Into<String>, name: impl Into<String>) -> Self {
        self.role_names.insert(role.into(), name.into());
        self
    }

    #[must_use]
    pub fn with_win(mut self, win: WinCondition) -> Self {
        self.win = win;
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: InitHook) -> Self {
        self.init = Some(init);
        self
    }

    /// Apply a modifier to every ability of the alignment. The id is kept.
    pub fn modified(mut self, modifier: &Modifier) -> Result<Alignment, ModifierError> {
        modifier.validate()?;
        if *modifier == Modifier::Activated {
            let passives = std::mem::take(&mut self.passives);
            self.actions.extend(passives);
        } else {
            self.actions = modify_all(&self.actions, modifier);
            self.passives = modify_all(&self.passives, modifier);
            self.shared_actions = modify_all(&self.shared_actions, modifier);
        }
        self.tags = self.tags.union(&modifier.tags());
        self.modifiers.insert(modifier.id());
        Ok(self)
    }

    pub fn player_init(&self, game: &mut Game, player: PlayerId) -> Result<(), GameError> {
        match self.init {
            Some(init) => init(game, player, &self.id),
            None => Ok(()),
        }
    }

    /// Evaluate `player`'s win condition.
    #[must_use]
    pub fn check_win(&self, game: &Game, player: PlayerId) -> WinResult {
        match self.win {
            WinCondition::Survive => {
                if game.is_alive(player) {
                    WinResult::Win
                } else {
                    WinResult::Lose
                }
            }
            WinCondition::LastStanding if game.alive_count() == 0 => WinResult::Win,
            WinCondition::Faction | WinCondition::LastStanding => {
                let mut faction_alive = false;
                let mut opponent_alive = false;
                for p in game.alive_players() {
                    if p.alignment().id == self.id {
                        faction_alive = true;
                    } else if p.alignment().win.is_faction() {
                        opponent_alive = true;
                    }
                }
                if !faction_alive {
                    WinResult::Lose
                } else if !opponent_alive {
                    WinResult::Win
                } else {
                    WinResult::Ongoing
                }
            }
        }
    }
}

impl std::fmt::Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}
