//! Night resolution.
//!
//! The [`Resolver`] takes every visit queued for the current phase and
//! drives it to `Success` or `Failure`. Abilities may answer `Pending` to
//! ask for a retry, and the resolver itself holds a visit back while
//! something that could still fail it is unresolved (a roleblock on its
//! actor, a rolestop on its target, a commute, a juggernaut). Passes repeat
//! until a pass settles nothing.
//!
//! When every remaining visit waits on another, the Catastrophic Rule
//! breaks the tie: every player sitting on a cycle of active roleblocks is
//! roleblocked. If even that settles nothing, resolution fails with
//! [`ResolveError::Deadlock`].
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use mafia_engine::catalog::{factions, roles};
//! use mafia_engine::core::{AbilityType, Game, GameConfig, Phase};
//! use mafia_engine::resolve::Resolver;
//!
//! let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
//! let town = Arc::new(factions::town());
//! let alice = game.add_player("Alice", roles::cop(), town.clone()).unwrap();
//! let bob = game.add_player("Bob", roles::roleblocker(), town).unwrap();
//! let eve = game.add_player("Eve", roles::vanilla(), Arc::new(factions::mafia())).unwrap();
//!
//! let resolver = Resolver::new();
//! let cop = resolver.make_visit(&game, alice, Some(&[eve]), AbilityType::Action, 0, &[]).unwrap();
//! let block = resolver.make_visit(&game, bob, Some(&[alice]), AbilityType::Action, 0, &[]).unwrap();
//! game.queue_visit(cop);
//! game.queue_visit(block);
//!
//! resolver.resolve_game(&mut game).unwrap();
//! assert_eq!(
//!     game[alice].private_messages().last().unwrap().content,
//!     "Your ability failed, and you did not receive a result."
//! );
//! ```

mod vote;

pub use vote::{resolve_vote, vote_elimination, vote_ongoing};

use std::cmp::Reverse;

use crate::abilities::Ability;
use crate::core::tags;
use crate::core::{
    AbilityType, Game, GameError, PlayerId, ResolveError, Visit, VisitId, VisitStatus,
};
use crate::graph::nodes_in_cycles;

/// Notice sent to the actor of an investigation that failed.
pub const FAILED_INVESTIGATION: &str = "Your ability failed, and you did not receive a result.";

/// Drives queued visits to a terminal status.
///
/// Holds only the lazy flag; everything else lives in the [`Game`].
#[derive(Clone, Debug)]
pub struct Resolver {
    lazy_allowed: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self { lazy_allowed: true }
    }
}

impl Resolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `lazy` abilities may currently succeed.
    #[must_use]
    pub fn lazy_allowed(&self) -> bool {
        self.lazy_allowed
    }

    pub fn set_lazy_allowed(&mut self, allowed: bool) {
        self.lazy_allowed = allowed;
    }

    /// Recompute the lazy flag from the game: lazy abilities work while more
    /// than one living player is not aligned with the Town.
    pub fn check_lazy_allowed(&mut self, game: &Game) -> bool {
        let non_town = game
            .alive_players()
            .filter(|p| !p.alignment().tags.contains(tags::TOWN))
            .count();
        self.lazy_allowed = non_town > 1;
        self.lazy_allowed
    }

    // === Queueing ===

    /// Build a visit for the ability at `index` of `actor`'s `ability_type`
    /// list, at the game's current time.
    ///
    /// Does not run the ability's `check`; callers do that first.
    pub fn make_visit(
        &self,
        game: &Game,
        actor: PlayerId,
        targets: Option<&[PlayerId]>,
        ability_type: AbilityType,
        index: usize,
        extra_tags: &[&str],
    ) -> Result<Visit, GameError> {
        let ability = game
            .try_player(actor)?
            .abilities(ability_type)
            .get(index)
            .cloned()
            .ok_or(GameError::AbilityIndex {
                player: actor,
                ability_type,
                index,
            })?;
        Ok(Visit::new(game, actor, targets, ability, ability_type)?
            .with_tags(extra_tags.iter().copied()))
    }

    /// Queue a self-targeted visit for every usable passive of every player.
    ///
    /// Immediate passives resolve on the spot. Returns the ids of all the
    /// visits created.
    pub fn add_passives(&self, game: &mut Game) -> Result<Vec<VisitId>, GameError> {
        let mut queued = Vec::new();
        for actor in game.players().iter().map(|p| p.id()).collect::<Vec<_>>() {
            // Immediate passives may rewrite the list while it is walked.
            let passives = game[actor].passives().to_vec();
            for ability in passives {
                if !ability.check(game, actor, None) {
                    continue;
                }
                let visit = Visit::new(game, actor, None, ability.clone(), AbilityType::Passive)?;
                let id = game.push_visit(visit);
                if ability.immediate() {
                    self.do_visit(game, id);
                }
                queued.push(id);
            }
        }
        Ok(queued)
    }

    // === Resolution ===

    /// Resolve every visit queued for the current time.
    pub fn resolve_game(&self, game: &mut Game) -> Result<(), ResolveError> {
        let investigations: Vec<VisitId> = game
            .active_visits()
            .filter(|v| v.has_tag(tags::INVESTIGATE))
            .map(Visit::id)
            .collect();

        self.log_visits(game);

        let immediates: Vec<VisitId> = game
            .active_visits()
            .filter(|v| v.ability.immediate())
            .map(Visit::id)
            .collect();
        for id in immediates {
            self.do_visit(game, id);
        }

        while self.attempt_resolve(game)? {}

        for id in investigations {
            let Some(visit) = game.visit(id) else { continue };
            if visit.status() == VisitStatus::Failure {
                let (actor, sender) = (visit.actor, visit.ability.id().to_string());
                game.notify(actor, sender, FAILED_INVESTIGATION);
            }
        }
        Ok(())
    }

    /// Count uses of, and record, every active action about to resolve.
    fn log_visits(&self, game: &mut Game) {
        let logged: Vec<Visit> = game
            .active_visits()
            .filter(|v| !v.is_passive())
            .cloned()
            .collect();
        for visit in logged {
            let player = &mut game[visit.actor];
            player.add_use(visit.ability.key());
            player.record_action(visit);
        }
    }

    /// One pass over the active visits. Returns whether visits are still
    /// pending afterwards, including any created during the pass.
    fn attempt_resolve(&self, game: &mut Game) -> Result<bool, ResolveError> {
        let before = game.settlements();

        let mut order: Vec<(VisitId, bool, bool)> = game
            .active_visits()
            .map(|v| (v.id(), v.has_tag(tags::SIMULTANEOUS), v.has_tag(tags::UNSTOPPABLE)))
            .collect();
        order.sort_by_key(|&(_, simultaneous, unstoppable)| Reverse((simultaneous, unstoppable)));

        for (id, _, _) in order {
            if game.visit(id).is_some_and(|v| v.is_active(game)) {
                self.resolve_visit(game, id);
            }
        }

        let pending = game.active_visits().count();
        if pending > 0 && game.settlements() == before && !self.resolve_cycles(game) {
            tracing::warn!(pending, "resolution deadlocked");
            return Err(ResolveError::Deadlock { pending });
        }
        Ok(pending > 0)
    }

    /// Try one visit, unless something it depends on is unresolved.
    fn resolve_visit(&self, game: &mut Game, id: VisitId) -> VisitStatus {
        let Some(visit) = game.visit(id) else {
            return VisitStatus::Failure;
        };

        if visit.has_tag(tags::LAZY) && !self.lazy_allowed {
            game.settle(id, VisitStatus::Failure);
            return VisitStatus::Failure;
        }
        if visit.ability.immediate() {
            return self.do_visit(game, id);
        }

        let waits_on = |player: PlayerId, tag: &str| {
            game.visitors_of(player)
                .any(|v| v.id() != id && v.has_tag(tag) && v.is_active(game))
        };
        let targets_with = |tag: &str| visit.targets.iter().any(|&t| waits_on(t, tag));

        if targets_with(tags::COMMUTE) {
            return VisitStatus::Pending;
        }
        if visit.has_tag(tags::UNSTOPPABLE) {
            return self.do_visit(game, id);
        }
        if !visit.is_passive() && (waits_on(visit.actor, tags::ROLEBLOCK) || targets_with(tags::ROLESTOP)) {
            return VisitStatus::Pending;
        }
        if visit.has_tag(tags::ROLEBLOCK) && targets_with(tags::JUGGERNAUT) {
            return VisitStatus::Pending;
        }
        self.do_visit(game, id)
    }

    /// Perform a visit's ability and settle the result.
    fn do_visit(&self, game: &mut Game, id: VisitId) -> VisitStatus {
        let Some(visit) = game.visit(id).cloned() else {
            return VisitStatus::Failure;
        };
        let status = visit.ability.perform(game, &visit);
        if !status.is_pending() && game.settle(id, status) && visit.is_passive() && status.is_success() {
            game[visit.actor].add_use(visit.ability.key());
        }
        tracing::debug!(visit = %visit, ?status, "resolved visit");
        status
    }

    /// Catastrophic Rule: roleblock every player on a cycle of active
    /// roleblocks. Returns whether any visit changed.
    fn resolve_cycles(&self, game: &mut Game) -> bool {
        let edges: Vec<(PlayerId, PlayerId)> = game
            .active_visits()
            .filter(|v| v.has_tag(tags::ROLEBLOCK))
            .flat_map(|v| v.targets.iter().map(move |&t| (v.actor, t)))
            .collect();
        let cyclic = nodes_in_cycles(edges);
        if cyclic.is_empty() {
            return false;
        }
        tracing::info!(players = ?cyclic, "breaking roleblock cycle");

        let mut changed = false;
        for player in cyclic {
            changed |= game.roleblock_player(player);
        }
        changed
    }

    /// Log every player's name, role and status.
    pub fn log_players(&self, game: &Game) {
        for player in game.players() {
            tracing::info!(
                id = %player.id(),
                name = player.name(),
                role = %player.role_name(),
                alive = player.is_alive(),
                "player"
            );
        }
    }
}
