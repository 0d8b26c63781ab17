//! Modifiers: stackable transformations over abilities, roles and
//! alignments.
//!
//! A modifier never replaces behavior, it layers on top of it. Applying a
//! modifier to an ability yields a [`ModifiedAbility`] that keeps the
//! original as its base; applying a second modifier to that result adds a
//! layer instead of wrapping a wrapper. Roles and alignments are modified
//! by modifying every ability they carry.
//!
//! ## Example Usage
//!
//! ```
//! use mafia_engine::catalog::roles;
//! use mafia_engine::modifiers::Modifier;
//!
//! let one_shot: Modifier = "1-Shot".parse().unwrap();
//! let cop = one_shot.apply_role(roles::cop()).unwrap();
//!
//! assert_eq!(cop.id(), "1-Shot Cop");
//! assert_eq!(cop.actions()[0].id(), "Cop");
//! assert_eq!(cop.actions()[0].max_uses(), Some(1));
//! assert!(cop.is_role("Cop"));
//! ```

mod ability;

pub use ability::ModifiedAbility;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::abilities::AbilityRef;
use crate::core::tags::{self, TagSet};
use crate::core::ModifierError;
use crate::roles::{Alignment, Role};

/// Which nights a [`Modifier::Nights`] ability may be used on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NightRule {
    Even,
    Odd,
    /// Only the listed day numbers.
    Listed(BTreeSet<u32>),
    /// Any night but the first.
    NotFirst,
}

impl NightRule {
    #[must_use]
    pub fn allows(&self, day_no: u32) -> bool {
        match self {
            NightRule::Even => day_no % 2 == 0,
            NightRule::Odd => day_no % 2 == 1,
            NightRule::Listed(nights) => nights.contains(&day_no),
            NightRule::NotFirst => day_no > 1,
        }
    }
}

/// The closed set of modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Usable at most `n` times.
    XShot(u32),
    Nights(NightRule),
    /// Fails unless the target shares the actor's alignment.
    Loyal,
    /// Fails if the target shares the actor's alignment.
    Disloyal,
    /// Cannot interact with factional visits.
    Personal,
    /// Turns passives into actions. Roles and alignments only.
    Activated,
    /// Cannot hit the same target twice in a row.
    Indecisive,
    NonConsecutiveNight,
    /// Fails while lazy abilities are disallowed.
    Lazy,
    /// Dies when used on anyone not aligned with the Town.
    Weak,
}

impl Modifier {
    /// Display id; role ids are prefixed with it.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Modifier::XShot(n) => format!("{n}-Shot"),
            Modifier::Nights(NightRule::Even) => "Even Night".into(),
            Modifier::Nights(NightRule::Odd) => "Odd Night".into(),
            Modifier::Nights(NightRule::NotFirst) => "Not First Night".into(),
            Modifier::Nights(NightRule::Listed(nights)) => {
                let nights: Vec<String> = nights.iter().map(u32::to_string).collect();
                format!("Night {}", nights.join(","))
            }
            Modifier::Loyal => "Loyal".into(),
            Modifier::Disloyal => "Disloyal".into(),
            Modifier::Personal => "Personal".into(),
            Modifier::Activated => "Activated".into(),
            Modifier::Indecisive => "Indecisive".into(),
            Modifier::NonConsecutiveNight => "Non-Consecutive Night".into(),
            Modifier::Lazy => "Lazy".into(),
            Modifier::Weak => "Weak".into(),
        }
    }

    /// Tags this modifier adds to whatever it is applied to.
    #[must_use]
    pub fn tags(&self) -> TagSet {
        match self {
            Modifier::Personal => TagSet::of(&[tags::PERSONAL]),
            Modifier::Lazy => TagSet::of(&[tags::LAZY]),
            _ => TagSet::new(),
        }
    }

    /// Reject modifiers that can never be satisfied.
    pub fn validate(&self) -> Result<(), ModifierError> {
        match self {
            Modifier::XShot(0) => Err(ModifierError::ZeroUses),
            _ => Ok(()),
        }
    }

    /// Layer this modifier onto an ability.
    pub fn apply_ability(&self, ability: AbilityRef) -> Result<AbilityRef, ModifierError> {
        self.validate()?;
        if *self == Modifier::Activated {
            return Err(ModifierError::Incompatible {
                modifier: self.id(),
                target: ability.id().to_string(),
            });
        }
        Ok(AbilityRef::new(ModifiedAbility::wrap(&ability, self.clone())))
    }

    /// Apply to a role, producing a modified role named `"{modifier} {role}"`.
    pub fn apply_role(&self, role: Role) -> Result<Role, ModifierError> {
        role.modified(self)
    }

    /// Apply to an alignment. The alignment keeps its id.
    pub fn apply_alignment(&self, alignment: Alignment) -> Result<Alignment, ModifierError> {
        alignment.modified(self)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id())
    }
}

impl FromStr for Modifier {
    type Err = ModifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ModifierError::Unknown(s.to_string());
        let modifier = match s {
            "Even Night" => Modifier::Nights(NightRule::Even),
            "Odd Night" => Modifier::Nights(NightRule::Odd),
            "Not First Night" => Modifier::Nights(NightRule::NotFirst),
            "Loyal" => Modifier::Loyal,
            "Disloyal" => Modifier::Disloyal,
            "Personal" => Modifier::Personal,
            "Activated" => Modifier::Activated,
            "Indecisive" => Modifier::Indecisive,
            "Non-Consecutive Night" => Modifier::NonConsecutiveNight,
            "Lazy" => Modifier::Lazy,
            "Weak" => Modifier::Weak,
            _ => {
                if let Some(n) = s.strip_suffix("-Shot") {
                    Modifier::XShot(n.parse().map_err(|_| unknown())?)
                } else if let Some(list) = s.strip_prefix("Night ") {
                    let nights = list
                        .split(',')
                        .map(|n| n.trim().parse::<u32>())
                        .collect::<Result<BTreeSet<_>, _>>()
                        .map_err(|_| unknown())?;
                    Modifier::Nights(NightRule::Listed(nights))
                } else {
                    return Err(unknown());
                }
            }
        };
        modifier.validate()?;
        Ok(modifier)
    }
}
