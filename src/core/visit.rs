//! Visits: one actor using one ability on its targets at one point in time.
//!
//! Every queued visit stays in the game's history forever. Only its status
//! and tag set change after queueing, and the status only ever moves once,
//! from `Pending` to `Success` or `Failure`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::config::Phase;
use super::error::GameError;
use super::player::PlayerId;
use super::state::Game;
use super::tags::{self, TagSet};
use crate::abilities::AbilityRef;

/// Targets of a visit. Almost every ability takes one target.
pub type Targets = SmallVec<[PlayerId; 2]>;

/// Identifier of a queued visit, unique within its game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisitId(pub u32);

impl VisitId {
    /// Placeholder carried by visits that have not been queued yet.
    pub const UNQUEUED: VisitId = VisitId(u32::MAX);

    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for VisitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Visit({})", self.0)
    }
}

/// Outcome of a visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitStatus {
    /// Not resolved yet; `perform` may also return this to ask for a retry.
    Pending,
    Failure,
    Success,
}

impl VisitStatus {
    /// `Success` if `ok`, `Failure` otherwise.
    #[must_use]
    pub fn from_success(ok: bool) -> Self {
        if ok {
            VisitStatus::Success
        } else {
            VisitStatus::Failure
        }
    }

    #[must_use]
    pub fn is_pending(self) -> bool {
        self == VisitStatus::Pending
    }

    #[must_use]
    pub fn is_success(self) -> bool {
        self == VisitStatus::Success
    }
}

/// Which of the actor's ability lists the visit's ability comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityType {
    Action,
    Passive,
    SharedAction,
}

/// A record of a player using an ability on targets.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use mafia_engine::catalog::{factions, roles};
/// use mafia_engine::core::{AbilityType, Game, GameConfig, Phase, Visit};
///
/// let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
/// let cop = game.add_player("Alice", roles::cop(), Arc::new(factions::town())).unwrap();
/// let eve = game.add_player("Eve", roles::vanilla(), Arc::new(factions::mafia())).unwrap();
///
/// let ability = game[cop].actions()[0].clone();
/// let visit = Visit::new(&game, cop, Some(&[eve]), ability, AbilityType::Action).unwrap();
/// assert_eq!(visit.targets.as_slice(), &[eve]);
/// assert_eq!(visit.time(), (1, Phase::Night));
/// ```
#[derive(Clone, Debug)]
pub struct Visit {
    id: VisitId,
    pub actor: PlayerId,
    pub targets: Targets,
    pub ability: AbilityRef,
    pub ability_type: AbilityType,
    pub phase: Phase,
    pub day_no: u32,
    /// Free-form inputs from the acting player (e.g. a Messenger's text).
    pub player_inputs: Vec<String>,
    status: VisitStatus,
    tags: TagSet,
}

impl Visit {
    /// Build a visit at the game's current time.
    ///
    /// `None` targets means the actor targets themself once per target slot.
    /// Fails if any player is unknown or the arity does not match the
    /// ability's `target_count`.
    pub fn new(
        game: &Game,
        actor: PlayerId,
        targets: Option<&[PlayerId]>,
        ability: AbilityRef,
        ability_type: AbilityType,
    ) -> Result<Self, GameError> {
        game.try_player(actor)?;
        let expected = ability.target_count();
        let targets: Targets = match targets {
            Some(targets) => {
                if targets.len() != expected {
                    return Err(GameError::TargetArity {
                        ability: ability.id().to_string(),
                        expected,
                        actual: targets.len(),
                    });
                }
                for &target in targets {
                    game.try_player(target)?;
                }
                SmallVec::from_slice(targets)
            }
            None => SmallVec::from_elem(actor, expected),
        };
        let tags = ability.tags().clone();

        Ok(Self {
            id: VisitId::UNQUEUED,
            actor,
            targets,
            ability,
            ability_type,
            phase: game.phase(),
            day_no: game.day_no(),
            player_inputs: Vec::new(),
            status: VisitStatus::Pending,
            tags,
        })
    }

    /// Add caller-supplied tags on top of the ability's.
    #[must_use]
    pub fn with_tags<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(extra);
        self
    }

    #[must_use]
    pub fn with_inputs(mut self, inputs: Vec<String>) -> Self {
        self.player_inputs = inputs;
        self
    }

    /// Override the visit's time.
    #[must_use]
    pub fn at(mut self, day_no: u32, phase: Phase) -> Self {
        self.day_no = day_no;
        self.phase = phase;
        self
    }

    /// Assigned when the visit is queued.
    #[must_use]
    pub fn id(&self) -> VisitId {
        self.id
    }

    pub(crate) fn assign_id(&mut self, id: VisitId) {
        self.id = id;
    }

    #[must_use]
    pub fn status(&self) -> VisitStatus {
        self.status
    }

    /// Move out of `Pending`. Returns `false` (and changes nothing) if the
    /// visit was already settled or `status` is itself `Pending`.
    pub(crate) fn settle(&mut self, status: VisitStatus) -> bool {
        if !self.status.is_pending() || status.is_pending() {
            return false;
        }
        self.status = status;
        true
    }

    #[must_use]
    pub fn tags(&self) -> &TagSet {
        &self.tags
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub(crate) fn add_tag(&mut self, tag: &str) -> bool {
        self.tags.insert(tag)
    }

    #[must_use]
    pub fn time(&self) -> (u32, Phase) {
        (self.day_no, self.phase)
    }

    #[must_use]
    pub fn is_passive(&self) -> bool {
        self.ability_type == AbilityType::Passive
    }

    /// Same time as the game and still pending.
    #[must_use]
    pub fn is_active(&self, game: &Game) -> bool {
        self.is_active_time(game) && self.status.is_pending()
    }

    /// Same time as the game, whatever the status.
    #[must_use]
    pub fn is_active_time(&self, game: &Game) -> bool {
        self.time() == game.time()
    }

    #[must_use]
    pub fn is_self_target(&self) -> bool {
        self.targets.iter().all(|&t| t == self.actor)
    }

    #[must_use]
    pub fn targets_player(&self, player: PlayerId) -> bool {
        self.targets.contains(&player)
    }

    /// Whether action-tracking investigations can see this visit.
    #[must_use]
    pub fn is_visible(&self, game: &Game) -> bool {
        !self.is_passive()
            && !self.has_tag(tags::HIDDEN)
            && !self.has_tag(tags::ROLEBLOCKED)
            && !self.is_self_target()
            && self.is_active_time(game)
    }

    /// First target, or the actor for zero-target abilities.
    #[must_use]
    pub fn target(&self) -> PlayerId {
        self.targets.first().copied().unwrap_or(self.actor)
    }
}

impl std::fmt::Display for Visit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?} {} ->", self.actor, self.ability_type, self.ability.id())?;
        for (i, target) in self.targets.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{sep}{target}")?;
        }
        write!(f, " - {:?}", self.status)
    }
}
