//! The ability protocol.
//!
//! An ability is a stateless rule object shared by every player who holds
//! it. It answers two questions:
//!
//! - `check`: may this actor use me on these targets right now? Pure.
//! - `perform`: apply my effect for this visit and report the outcome.
//!   Returning `Pending` asks the resolver to try again later, after the
//!   visits I depend on have settled.
//!
//! Overridden `check`s only ever tighten [`base_check`]; they never loosen
//! it (self-targeting abilities swap the distinct-target rule for
//! [`self_check`]).
//!
//! Per-player state (use counts, history) lives on the player, keyed by
//! [`AbilityKey`], the identity of the ability instance.
//!
//! ## Example Usage
//!
//! ```
//! use mafia_engine::abilities::Ability;
//! use mafia_engine::core::{Game, TagSet, Visit, VisitStatus};
//!
//! /// Sends the target a fixed note.
//! #[derive(Debug)]
//! struct Postcard {
//!     tags: TagSet,
//! }
//!
//! impl Ability for Postcard {
//!     fn id(&self) -> &str {
//!         "Postcard"
//!     }
//!
//!     fn tags(&self) -> &TagSet {
//!         &self.tags
//!     }
//!
//!     fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
//!         game.notify(visit.target(), self.id(), "Greetings from the night.");
//!         VisitStatus::Success
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::core::{Game, Phase, PlayerId, TagSet, Targets, Visit, VisitStatus};
use crate::modifiers::ModifiedAbility;

/// Capability interface for everything a player can do.
pub trait Ability: fmt::Debug + Send + Sync {
    /// Display id, e.g. "Cop".
    fn id(&self) -> &str;

    fn tags(&self) -> &TagSet;

    fn target_count(&self) -> usize {
        1
    }

    /// Phase the ability can be used in; `None` means any phase.
    fn phase(&self) -> Option<Phase> {
        Some(Phase::Night)
    }

    /// Immediate abilities are performed before anything else resolves.
    fn immediate(&self) -> bool {
        false
    }

    /// Upper bound on uses, if the ability is limited.
    fn max_uses(&self) -> Option<u32> {
        None
    }

    /// Whether `actor` may use this ability on `targets` now.
    ///
    /// `None` targets asks whether the ability is usable at all, which is
    /// how passives are checked.
    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        base_check(self.phase(), game, actor, targets)
    }

    /// Apply the ability for `visit`.
    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus;

    /// Modifier layers wrapped around this ability, if any.
    fn as_modified(&self) -> Option<&ModifiedAbility> {
        None
    }
}

/// The default check: right phase, living actor, living targets that are
/// not the actor.
pub fn base_check(
    phase: Option<Phase>,
    game: &Game,
    actor: PlayerId,
    targets: Option<&[PlayerId]>,
) -> bool {
    phase.map_or(true, |p| p == game.phase())
        && game.is_alive(actor)
        && targets.map_or(true, |ts| {
            ts.iter().all(|&t| game.is_alive(t)) && !ts.contains(&actor)
        })
}

/// Check for abilities that may only target their user.
pub fn self_check(
    phase: Option<Phase>,
    game: &Game,
    actor: PlayerId,
    targets: Option<&[PlayerId]>,
) -> bool {
    phase.map_or(true, |p| p == game.phase())
        && game.is_alive(actor)
        && targets.map_or(true, |ts| {
            ts.iter().all(|&t| game.is_alive(t)) && ts.contains(&actor)
        })
}

/// Whether `actor` has uses of `ability` left under its [`Ability::max_uses`]
/// bound. Uses are counted against the instance passed in, so a wrapper
/// checks its own key rather than its base's.
#[must_use]
pub fn has_uses_left<A: Ability + ?Sized>(ability: &A, game: &Game, actor: PlayerId) -> bool {
    ability.max_uses().map_or(true, |max| {
        game.player(actor)
            .is_some_and(|p| p.uses(AbilityKey::of(ability)) < max)
    })
}

/// Identity of an ability instance, used to key per-player counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AbilityKey(usize);

impl AbilityKey {
    /// Key of the instance behind `ability`.
    pub fn of<A: Ability + ?Sized>(ability: &A) -> Self {
        Self(ability as *const A as *const () as usize)
    }
}

/// Shared handle to an ability. Equality is instance identity.
#[derive(Clone)]
pub struct AbilityRef(Arc<dyn Ability>);

impl AbilityRef {
    pub fn new<A: Ability + 'static>(ability: A) -> Self {
        Self(Arc::new(ability))
    }

    #[must_use]
    pub fn key(&self) -> AbilityKey {
        AbilityKey::of(&*self.0)
    }
}

impl std::ops::Deref for AbilityRef {
    type Target = dyn Ability;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for AbilityRef {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for AbilityRef {}

impl std::hash::Hash for AbilityRef {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for AbilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for AbilityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Every target tuple `actor` could legally use `ability` on.
///
/// Passives are all-or-nothing: they yield the self-target tuple if the
/// untargeted check passes.
pub fn valid_targets(ability: &dyn Ability, game: &Game, actor: PlayerId, passive: bool) -> Vec<Targets> {
    if passive {
        if ability.check(game, actor, None) {
            return vec![Targets::from_elem(actor, ability.target_count())];
        }
        return Vec::new();
    }
    let players: Vec<PlayerId> = game.players().iter().map(|p| p.id()).collect();
    let mut found = Vec::new();
    let mut current = Targets::new();
    collect_targets(ability, game, actor, &players, &mut current, &mut found);
    found
}

fn collect_targets(
    ability: &dyn Ability,
    game: &Game,
    actor: PlayerId,
    players: &[PlayerId],
    current: &mut Targets,
    found: &mut Vec<Targets>,
) {
    if current.len() == ability.target_count() {
        if ability.check(game, actor, Some(current.as_slice())) {
            found.push(current.clone());
        }
        return;
    }
    for &p in players {
        current.push(p);
        collect_targets(ability, game, actor, players, current, found);
        current.pop();
    }
}

/// Whether [`valid_targets`] would return anything.
#[must_use]
pub fn has_valid_targets(ability: &dyn Ability, game: &Game, actor: PlayerId, passive: bool) -> bool {
    !valid_targets(ability, game, actor, passive).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{factions, roles};
    use crate::core::GameConfig;

    fn night_game() -> (Game, PlayerId, PlayerId, PlayerId) {
        let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
        let town = Arc::new(factions::town());
        let a = game.add_player("Alice", roles::cop(), town.clone()).unwrap();
        let b = game.add_player("Bob", roles::commuter(), town.clone()).unwrap();
        let c = game.add_player("Carol", roles::vanilla(), town).unwrap();
        (game, a, b, c)
    }

    #[test]
    fn test_base_check() {
        let (mut game, a, b, c) = night_game();
        let cop = game[a].actions()[0].clone();

        assert!(cop.check(&game, a, Some(&[b])));
        assert!(!cop.check(&game, a, Some(&[a])));

        game.kill(c, "Vote");
        assert!(!cop.check(&game, a, Some(&[c])));

        game.advance_phase();
        assert!(!cop.check(&game, a, Some(&[b])));
    }

    #[test]
    fn test_self_check_requires_actor() {
        let (game, a, b, _) = night_game();
        let commute = game[b].actions()[0].clone();
        assert!(commute.check(&game, b, Some(&[b])));
        assert!(!commute.check(&game, b, Some(&[a])));
    }

    #[test]
    fn test_ability_ref_identity() {
        let first = roles::cop();
        let second = roles::cop();
        let a = first.actions()[0].clone();
        let b = second.actions()[0].clone();

        assert_eq!(a, first.actions()[0]);
        assert_ne!(a, b);
        assert_eq!(a.key(), AbilityKey::of(&*a));
        assert_eq!(a.to_string(), "Cop");
    }

    #[test]
    fn test_valid_targets_excludes_self_and_dead() {
        let (mut game, a, b, c) = night_game();
        game.kill(c, "Vote");
        let cop = game[a].actions()[0].clone();

        let targets = valid_targets(&*cop, &game, a, false);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].as_slice(), &[b]);
        assert!(has_valid_targets(&*cop, &game, a, false));
    }

    #[test]
    fn test_valid_targets_for_passive() {
        let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
        let p = game
            .add_player("Bo", roles::bulletproof(), Arc::new(factions::town()))
            .unwrap();
        let vest = game[p].passives()[0].clone();

        let targets = valid_targets(&*vest, &game, p, true);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].as_slice(), &[p]);
    }
}
