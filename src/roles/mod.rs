//! Roles and alignments.
//!
//! A role is a named bundle of actions and passives; an alignment adds the
//! shared actions of a team and decides when a player has won. Both can run
//! a setup hook when a player is admitted.
//!
//! Roles come in three shapes:
//!
//! - [`NamedRole`]: a plain role built from abilities.
//! - [`CombinedRole`]: several roles held by one player at once.
//! - [`ModifiedRole`]: a role with a [`Modifier`] applied to it.
//!
//! Cloning a [`Role`] shares its ability instances, so every player given a
//! clone of the same role holds the same abilities (their use counts stay
//! separate, they live on the player).

mod alignment;

pub use alignment::{Alignment, WinCondition, WinResult};

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::abilities::{Ability, AbilityRef};
use crate::core::{Game, GameError, ModifierError, PlayerId, TagSet};
use crate::modifiers::{ModifiedAbility, Modifier};

/// Setup run when a player with the role or alignment is admitted.
///
/// Receives the id of the role or alignment that registered it.
pub type InitHook = fn(&mut Game, PlayerId, &str) -> Result<(), GameError>;

/// A role built directly from abilities.
#[derive(Clone, Debug)]
pub struct NamedRole {
    pub id: String,
    pub actions: Vec<AbilityRef>,
    pub passives: Vec<AbilityRef>,
    pub tags: TagSet,
    /// Adjectival roles read "Bulletproof Townie" rather than "Town Bulletproof".
    pub adjective: bool,
    pub init: Option<InitHook>,
}

impl NamedRole {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            actions: Vec::new(),
            passives: Vec::new(),
            tags: TagSet::new(),
            adjective: false,
            init: None,
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
    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags.extend(tags.iter().copied());
        self
    }

    #[must_use]
    pub fn adjective(mut self) -> Self {
        self.adjective = true;
        self
    }

    #[must_use]
    pub fn with_init(mut self, init: InitHook) -> Self {
        self.init = Some(init);
        self
    }
}

impl From<NamedRole> for Role {
    fn from(role: NamedRole) -> Self {
        Role::Named(Arc::new(role))
    }
}

/// Several roles at once: abilities are concatenated, tags unioned.
#[derive(Clone, Debug)]
pub struct CombinedRole {
    id: String,
    roles: Vec<Role>,
    actions: Vec<AbilityRef>,
    passives: Vec<AbilityRef>,
    tags: TagSet,
}

impl CombinedRole {
    /// The component roles, in combination order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }
}

/// A role with one modifier applied.
#[derive(Clone, Debug)]
pub struct ModifiedRole {
    id: String,
    base: Role,
    modifier: Modifier,
    actions: Vec<AbilityRef>,
    passives: Vec<AbilityRef>,
    tags: TagSet,
}

impl ModifiedRole {
    #[must_use]
    pub fn base(&self) -> &Role {
        &self.base
    }

    #[must_use]
    pub fn modifier(&self) -> &Modifier {
        &self.modifier
    }
}

/// A role, in one of its three shapes.
#[derive(Clone, Debug)]
pub enum Role {
    Named(Arc<NamedRole>),
    Combined(Arc<CombinedRole>),
    Modified(Arc<ModifiedRole>),
}

impl Role {
    /// Combine roles into one held by a single player.
    ///
    /// The id is the component ids joined by spaces.
    #[must_use]
    pub fn combine(roles: impl IntoIterator<Item = Role>) -> Role {
        let roles: Vec<Role> = roles.into_iter().collect();
        let id = roles.iter().map(Role::id).collect::<Vec<_>>().join(" ");
        Role::combine_as(id, roles)
    }

    /// Combine roles under an explicit id.
    #[must_use]
    pub fn combine_as(id: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Role {
        let id = id.into();
        let roles: Vec<Role> = roles.into_iter().collect();
        let actions = roles.iter().flat_map(|r| r.actions().iter().cloned()).collect();
        let passives = roles.iter().flat_map(|r| r.passives().iter().cloned()).collect();
        let tags = roles.iter().fold(TagSet::new(), |acc, r| acc.union(r.tags()));
        Role::Combined(Arc::new(CombinedRole {
            id,
            roles,
            actions,
            passives,
            tags,
        }))
    }

    /// Apply a modifier to every ability of this role.
    ///
    /// `Activated` instead moves the passives to the end of the actions.
    pub fn modified(self, modifier: &Modifier) -> Result<Role, ModifierError> {
        modifier.validate()?;
        Ok(self.layered(modifier))
    }

    /// [`Role::modified`] for a modifier already known to be valid.
    pub(crate) fn layered(self, modifier: &Modifier) -> Role {
        let (actions, passives) = if *modifier == Modifier::Activated {
            let actions = self
                .actions()
                .iter()
                .chain(self.passives())
                .cloned()
                .collect();
            (actions, Vec::new())
        } else {
            (
                modify_all(self.actions(), modifier),
                modify_all(self.passives(), modifier),
            )
        };
        let id = format!("{} {}", modifier.id(), self.id());
        let tags = self.tags().union(&modifier.tags());
        Role::Modified(Arc::new(ModifiedRole {
            id,
            base: self,
            modifier: modifier.clone(),
            actions,
            passives,
            tags,
        }))
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Role::Named(r) => &r.id,
            Role::Combined(r) => &r.id,
            Role::Modified(r) => &r.id,
        }
    }

    #[must_use]
    pub fn actions(&self) -> &[AbilityRef] {
        match self {
            Role::Named(r) => &r.actions,
            Role::Combined(r) => &r.actions,
            Role::Modified(r) => &r.actions,
        }
    }

    #[must_use]
    pub fn passives(&self) -> &[AbilityRef] {
        match self {
            Role::Named(r) => &r.passives,
            Role::Combined(r) => &r.passives,
            Role::Modified(r) => &r.passives,
        }
    }

    #[must_use]
    pub fn tags(&self) -> &TagSet {
        match self {
            Role::Named(r) => &r.tags,
            Role::Combined(r) => &r.tags,
            Role::Modified(r) => &r.tags,
        }
    }

    /// Combined roles are adjectival only if every component is.
    #[must_use]
    pub fn is_adjective(&self) -> bool {
        match self {
            Role::Named(r) => r.adjective,
            Role::Combined(r) => r.roles.iter().all(Role::is_adjective),
            Role::Modified(r) => r.base.is_adjective(),
        }
    }

    /// Ids of every modifier applied anywhere in this role.
    #[must_use]
    pub fn modifiers(&self) -> BTreeSet<String> {
        match self {
            Role::Named(_) => BTreeSet::new(),
            Role::Combined(r) => r.roles.iter().flat_map(Role::modifiers).collect(),
            Role::Modified(r) => {
                let mut ids = r.base.modifiers();
                ids.insert(r.modifier.id());
                ids
            }
        }
    }

    /// Whether this role is, contains, or was built from the role or
    /// modifier named `id`.
    #[must_use]
    pub fn is_role(&self, id: &str) -> bool {
        self.id() == id
            || match self {
                Role::Named(_) => false,
                Role::Combined(r) => r.roles.iter().any(|c| c.is_role(id)),
                Role::Modified(r) => r.modifier.id() == id || r.base.is_role(id),
            }
    }

    /// Run setup hooks for a newly admitted player.
    pub fn player_init(&self, game: &mut Game, player: PlayerId) -> Result<(), GameError> {
        match self {
            Role::Named(r) => match r.init {
                Some(init) => init(game, player, &r.id),
                None => Ok(()),
            },
            Role::Combined(r) => r.roles.iter().try_for_each(|c| c.player_init(game, player)),
            Role::Modified(r) => r.base.player_init(game, player),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Wrap every ability in a layer of `modifier`. `Activated` is the
/// caller's job.
fn modify_all(abilities: &[AbilityRef], modifier: &Modifier) -> Vec<AbilityRef> {
    abilities
        .iter()
        .map(|a| AbilityRef::new(ModifiedAbility::wrap(a, modifier.clone())))
        .collect()
}

/// Display name of a role held under an alignment.
///
/// An alignment override for the role id wins; adjectival roles are
/// followed by the alignment's demonym; anything else is preceded by the
/// alignment id. Overrides and demonyms may use `{role}` and `{alignment}`.
#[must_use]
pub fn role_name(role: &Role, alignment: &Alignment) -> String {
    let fill = |template: &str| {
        template
            .replace("{role}", role.id())
            .replace("{alignment}", &alignment.id)
    };
    if let Some(name) = alignment.role_names.get(role.id()) {
        return fill(name);
    }
    if role.is_adjective() {
        let demonym = alignment
            .demonym
            .as_deref()
            .map_or_else(|| alignment.id.clone(), fill);
        return format!("{} {demonym}", role.id());
    }
    format!("{} {}", alignment.id, role.id())
}
