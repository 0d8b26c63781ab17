//! Tags: string markers that drive priority and blocking.
//!
//! Abilities carry a fixed tag set; a visit starts from its ability's tags
//! and may gain more while the night resolves (`roleblocked`, `hidden`,
//! `unstoppable`). The resolver and the catalog abilities only ever look
//! tags up by the constants below, but callers may attach arbitrary tags.

use im::OrdSet;
use serde::{Deserialize, Serialize};

/// Kills its target.
pub const KILL: &str = "kill";
/// Blocks kills on its target.
pub const PROTECT: &str = "protect";
/// Fails the target's own kills.
pub const INTERCEPT: &str = "intercept";
/// Fails every non-passive visit of its target.
pub const ROLEBLOCK: &str = "roleblock";
/// Added to a visit that a roleblock failed.
pub const ROLEBLOCKED: &str = "roleblocked";
/// Visits to the target wait until this resolves.
pub const ROLESTOP: &str = "rolestop";
/// Investigation; a failed one earns a "no result" notice.
pub const INVESTIGATE: &str = "investigate";
/// Skips all blocking checks.
pub const UNSTOPPABLE: &str = "unstoppable";
/// Resolves before everything else in a pass.
pub const SIMULTANEOUS: &str = "simultaneous";
/// Fails outright while lazy abilities are disallowed.
pub const LAZY: &str = "lazy";
/// Cannot see or touch factional visits.
pub const PERSONAL: &str = "personal";
/// A visit submitted on behalf of a faction.
pub const FACTIONAL: &str = "factional";
/// The faction's shared kill.
pub const FACTIONAL_KILL: &str = "factional_kill";
/// Everyone visiting the actor waits, then fails.
pub const COMMUTE: &str = "commute";
/// Makes the actor's factional kill unstoppable.
pub const JUGGERNAUT: &str = "juggernaut";
/// Protection on the actor waits, then fails.
pub const MACHO: &str = "macho";
/// Hides the actor's factional kill from investigations.
pub const NINJA: &str = "ninja";
/// Invisible to action-tracking investigations.
pub const HIDDEN: &str = "hidden";
/// Tells someone about the actor.
pub const INFORM: &str = "inform";
/// Holders of the same role or alignment know each other.
pub const INFORMED: &str = "informed";
/// The role or alignment opens a private chat.
pub const CHAT: &str = "chat";
/// Shows up as armed to a Gunsmith.
pub const GUN: &str = "gun";
/// A Mafia ability that does not count as a gun.
pub const MAFIA_NO_GUN: &str = "mafia_no_gun";
/// Town alignment.
pub const TOWN: &str = "town";
/// Mafia alignment.
pub const MAFIA: &str = "mafia";
/// Independent alignment.
pub const THIRD_PARTY: &str = "third_party";
/// Delivers a player-written message.
pub const MESSAGE: &str = "message";

/// Ordered, persistent set of tags.
///
/// Backed by `im::OrdSet` so cloning a visit (or a whole game) shares
/// structure instead of copying strings.
///
/// ```
/// use mafia_engine::core::{tags, TagSet};
///
/// let base = TagSet::of(&[tags::KILL]);
/// let merged = base.union(&TagSet::of(&[tags::GUN]));
/// assert!(merged.contains(tags::KILL));
/// assert!(merged.contains("gun"));
/// assert_eq!(merged.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSet(OrdSet<String>);

impl TagSet {
    /// Create an empty tag set.
    #[must_use]
    pub fn new() -> Self {
        Self(OrdSet::new())
    }

    /// Create a tag set from string slices.
    #[must_use]
    pub fn of(tags: &[&str]) -> Self {
        tags.iter().copied().collect()
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    /// Add a tag. Returns `true` if it was not already present.
    pub fn insert(&mut self, tag: impl Into<String>) -> bool {
        self.0.insert(tag.into()).is_none()
    }

    /// Set union, leaving both operands untouched.
    #[must_use]
    pub fn union(&self, other: &TagSet) -> TagSet {
        TagSet(self.0.clone().union(other.0.clone()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for TagSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagSet(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for TagSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for tag in iter {
            self.insert(tag);
        }
    }
}

impl std::fmt::Display for TagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, tag) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{tag}")?;
        }
        write!(f, "}}")
    }
}
