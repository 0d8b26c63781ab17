//! Layered abilities.

use smallvec::SmallVec;

use super::Modifier;
use crate::abilities::{has_uses_left, Ability, AbilityKey, AbilityRef};
use crate::core::tags::{self, TagSet};
use crate::core::{Game, Phase, PlayerId, Targets, Visit, VisitId, VisitStatus};

/// An ability with modifier layers around it.
///
/// Layers are stored innermost first. `check` requires every layer and the
/// base to agree; `perform` runs the layers outermost first, any of which
/// may fail the visit before the base ability sees it.
///
/// Modifying a `ModifiedAbility` again does not nest: the new modifier is
/// pushed onto a copy of the existing layer list around the same base.
#[derive(Debug)]
pub struct ModifiedAbility {
    base: AbilityRef,
    layers: SmallVec<[Modifier; 2]>,
    tags: TagSet,
}

impl ModifiedAbility {
    /// Put `modifier` around `ability`.
    #[must_use]
    pub fn wrap(ability: &AbilityRef, modifier: Modifier) -> Self {
        let (base, mut layers) = match ability.as_modified() {
            Some(inner) => (inner.base.clone(), inner.layers.clone()),
            None => (ability.clone(), SmallVec::new()),
        };
        let tags = ability.tags().union(&modifier.tags());
        layers.push(modifier);
        Self { base, layers, tags }
    }

    /// The unmodified ability.
    #[must_use]
    pub fn base(&self) -> &AbilityRef {
        &self.base
    }

    /// Applied modifiers, innermost first.
    #[must_use]
    pub fn layers(&self) -> &[Modifier] {
        &self.layers
    }

    #[must_use]
    pub fn has_layer(&self, modifier: &Modifier) -> bool {
        self.layers.contains(modifier)
    }

    /// The actor's logged uses of this ability on the current or previous day.
    fn recent_uses<'a>(&'a self, game: &'a Game, actor: PlayerId) -> impl Iterator<Item = &'a Visit> {
        let key = AbilityKey::of(self);
        let day_no = game.day_no();
        game.player(actor)
            .into_iter()
            .flat_map(|p| p.action_history().iter())
            .filter(move |v| v.ability.key() == key && day_no <= v.day_no + 1)
    }

    fn layer_allows(
        &self,
        layer: &Modifier,
        game: &Game,
        actor: PlayerId,
        targets: Option<&[PlayerId]>,
    ) -> bool {
        match layer {
            Modifier::Nights(rule) => rule.allows(game.day_no()),
            Modifier::Indecisive => {
                let targets: Targets = match targets {
                    Some(targets) => Targets::from_slice(targets),
                    None => Targets::from_elem(actor, self.target_count()),
                };
                !self
                    .recent_uses(game, actor)
                    .any(|v| v.targets.iter().zip(&targets).any(|(a, b)| a == b))
            }
            Modifier::NonConsecutiveNight => self.recent_uses(game, actor).next().is_none(),
            _ => true,
        }
    }

    /// Perform the innermost `depth` layers and then the base.
    fn perform_layers(&self, depth: usize, game: &mut Game, visit: &Visit) -> VisitStatus {
        let Some(layer) = depth.checked_sub(1).and_then(|i| self.layers.get(i)) else {
            return self.base.perform(game, visit);
        };
        let inner = depth - 1;
        match layer {
            Modifier::Loyal if !same_alignment(game, visit) => VisitStatus::Failure,
            Modifier::Disloyal if same_alignment(game, visit) => VisitStatus::Failure,
            Modifier::Weak => {
                let anti_town = visit
                    .targets
                    .iter()
                    .any(|&t| game.player(t).is_some_and(|p| !p.alignment().tags.contains(tags::TOWN)));
                if anti_town {
                    game.kill(visit.actor, layer.id());
                }
                self.perform_layers(inner, game, visit)
            }
            Modifier::Personal => {
                let factional: Vec<VisitId> = game
                    .active_visits()
                    .filter(|v| v.has_tag(tags::FACTIONAL))
                    .map(Visit::id)
                    .collect();
                game.shroud(&factional);
                let status = self.perform_layers(inner, game, visit);
                game.unshroud(&factional);
                status
            }
            _ => self.perform_layers(inner, game, visit),
        }
    }
}

fn same_alignment(game: &Game, visit: &Visit) -> bool {
    match (game.player(visit.actor), game.player(visit.target())) {
        (Some(actor), Some(target)) => actor.alignment().id == target.alignment().id,
        _ => false,
    }
}

impl Ability for ModifiedAbility {
    fn id(&self) -> &str {
        self.base.id()
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn target_count(&self) -> usize {
        self.base.target_count()
    }

    fn phase(&self) -> Option<Phase> {
        self.base.phase()
    }

    fn immediate(&self) -> bool {
        self.base.immediate()
    }

    /// The tightest X-Shot bound among the layers and the base.
    fn max_uses(&self) -> Option<u32> {
        self.layers
            .iter()
            .filter_map(|layer| match layer {
                Modifier::XShot(n) => Some(*n),
                _ => None,
            })
            .chain(self.base.max_uses())
            .min()
    }

    /// The base never sees uses logged against this wrapper, so the
    /// combined bound from [`Ability::max_uses`] is enforced here.
    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        has_uses_left(self, game, actor)
            && self
                .layers
                .iter()
                .all(|layer| self.layer_allows(layer, game, actor, targets))
            && self.base.check(game, actor, targets)
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        self.perform_layers(self.layers.len(), game, visit)
    }

    fn as_modified(&self) -> Option<&ModifiedAbility> {
        Some(self)
    }
}
