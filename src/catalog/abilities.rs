//! Ability implementations used by the standard roles.
//!
//! Most roles are thin wrappers around a handful of ability families: a
//! kill, an investigation seen through some [`Lens`], a [`Shield`] that
//! fails visits to or from its target, a roleblock, and a few
//! informational abilities.

use super::factions::{is_faction_chat, MAFIA_KILL};
use crate::abilities::{base_check, has_uses_left, has_valid_targets, self_check, Ability, AbilityRef};
use crate::core::tags::{self, TagSet};
use crate::core::{
    AbilityType, Game, Phase, Player, PlayerId, Visit, VisitId, VisitStatus, GLOBAL_CHAT,
};

/// Uses left on a limited passive, if the visit is one.
fn passive_uses_left(game: &Game, visit: &Visit) -> Option<u32> {
    if !visit.is_passive() {
        return None;
    }
    let max = visit.ability.max_uses()?;
    let used = game.player(visit.actor).map_or(0, |p| p.uses(visit.ability.key()));
    Some(max.saturating_sub(used))
}

fn names(game: &Game, ids: &[PlayerId]) -> String {
    ids.iter()
        .filter_map(|&id| game.player(id).map(|p| p.name().to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn name_of(game: &Game, id: PlayerId) -> String {
    game.player(id).map_or_else(|| id.to_string(), |p| p.name().to_string())
}

// =============================================================================
// Kill
// =============================================================================

/// Kills the first target unless it is protected.
///
/// Waits while an active `protect` visit targets the victim or an active
/// `intercept` visit targets the killer, unless the kill is `unstoppable`.
/// Known allies cannot be targeted.
#[derive(Debug)]
pub struct Kill {
    id: String,
    killer: String,
    tags: TagSet,
}

impl Kill {
    /// A kill whose death cause is its id.
    pub fn new(id: impl Into<String>, tags: &[&str]) -> Self {
        let id = id.into();
        Self {
            killer: id.clone(),
            id,
            tags: TagSet::of(tags),
        }
    }

    #[must_use]
    pub fn with_killer(mut self, killer: impl Into<String>) -> Self {
        self.killer = killer.into();
        self
    }
}

impl Ability for Kill {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        base_check(self.phase(), game, actor, targets)
            && targets.map_or(true, |ts| {
                let me = &game[actor];
                ts.iter()
                    .all(|&t| !me.knows(t) || game[t].alignment().id != me.alignment().id)
            })
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let target = visit.target();
        if !visit.has_tag(tags::UNSTOPPABLE)
            && (game.is_visited_with(target, tags::PROTECT)
                || game.is_visited_with(visit.actor, tags::INTERCEPT))
        {
            return VisitStatus::Pending;
        }
        game.kill(target, self.killer.as_str());
        VisitStatus::Success
    }
}

// =============================================================================
// Investigations
// =============================================================================

/// What an investigation reports about its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lens {
    /// Town or not (Cop).
    Alignment,
    /// Whom the target visited (Tracker).
    Targets,
    /// Who visited the target (Watcher).
    Visitors,
    /// Whether the target ever tried to kill (Detective).
    Killer,
    /// Vanilla Townie or not (Neapolitan).
    VanillaTownie,
    /// Vanilla or not (Vanilla Cop).
    Vanilla,
    /// Role id (Rolecop).
    Role,
    /// Gun in flavor or not (Gunsmith).
    Gun,
    /// Mafia Goon or not (Goon Cop).
    Goon,
    /// Whether the target visited or was visited (Motion Detector).
    Motion,
    /// Whether the target visited anyone (Reporter).
    Reporter,
    /// Role ids of the target's visitors (Role Watcher).
    VisitorRoles,
    /// Whether the target sits in a private chat (PT Cop).
    PrivateChat,
    /// Whether the target can talk privately at all (Traffic Analyst).
    Traffic,
}

/// Sends the actor a private result about the target.
#[derive(Debug)]
pub struct Investigate {
    id: String,
    lens: Lens,
    tags: TagSet,
}

impl Investigate {
    pub fn new(id: impl Into<String>, lens: Lens) -> Self {
        Self {
            id: id.into(),
            lens,
            tags: TagSet::of(&[tags::INVESTIGATE, tags::GUN]),
        }
    }

    #[must_use]
    pub fn lens(&self) -> Lens {
        self.lens
    }

    fn report(&self, game: &Game, visit: &Visit, target: PlayerId) -> String {
        let player = &game[target];
        let name = player.name();
        let aligned = |tag: &str| player.alignment().tags.contains(tag);
        let seen = |v: &Visit| v.id() != visit.id() && v.is_visible(game);
        let personal = visit.has_tag(tags::PERSONAL);
        // With company, the chat must still hold another living player.
        let private_chat = |with_company: bool| {
            game.chats().any(|(id, chat)| {
                chat.is_private()
                    && chat.has_participant(target)
                    && !(personal && is_faction_chat(id))
                    && (!with_company || chat.write_perms(game).len() > 1)
            })
        };
        match self.lens {
            Lens::Alignment => {
                if aligned(tags::TOWN) {
                    format!("{name} is aligned with the Town.")
                } else {
                    format!("{name} is not aligned with the Town!.")
                }
            }
            Lens::Targets => {
                let visited: Vec<PlayerId> = game
                    .visits_by(target)
                    .filter(|v| v.id() != visit.id() && v.is_visible(game))
                    .flat_map(|v| v.targets.iter().copied())
                    .collect();
                if visited.is_empty() {
                    format!("{name} did not target anyone.")
                } else {
                    format!("{name} targeted {}!", names(game, &visited))
                }
            }
            Lens::Visitors => {
                let visitors: Vec<PlayerId> = game
                    .visitors_of(target)
                    .filter(|v| v.id() != visit.id() && v.is_visible(game))
                    .map(|v| v.actor)
                    .collect();
                if visitors.is_empty() {
                    format!("{name} was not targeted by anyone.")
                } else {
                    format!("{name} was targeted by {}.", names(game, &visitors))
                }
            }
            Lens::Killer => {
                let tried = game
                    .visits_by(target)
                    .any(|v| !v.is_passive() && v.has_tag(tags::KILL));
                if tried {
                    format!("{name} has tried to kill someone!")
                } else {
                    format!("{name} has not tried to kill anyone.")
                }
            }
            Lens::VanillaTownie => {
                if player.role().is_role("Vanilla") && aligned(tags::TOWN) {
                    format!("{name} is a Vanilla Townie.")
                } else {
                    format!("{name} is not a Vanilla Townie.")
                }
            }
            Lens::Vanilla => {
                if player.role().is_role("Vanilla") {
                    format!("{name} is Vanilla.")
                } else {
                    format!("{name} is not Vanilla.")
                }
            }
            Lens::Role => format!("{name} is a {}.", player.role().id()),
            Lens::Gun => {
                let carries = |tag: &str| player.all_abilities().any(|a| a.tags().contains(tag));
                if carries(tags::GUN) || (aligned(tags::MAFIA) && !carries(tags::MAFIA_NO_GUN)) {
                    format!("{name} has a gun!")
                } else {
                    format!("{name} does not have a gun.")
                }
            }
            Lens::Goon => {
                if player.role().is_role("Vanilla") && aligned(tags::MAFIA) {
                    format!("{name} is a Mafia Goon!")
                } else {
                    format!("{name} is not a Mafia Goon.")
                }
            }
            Lens::Motion => {
                if game.visits_by(target).any(seen) || game.visitors_of(target).any(seen) {
                    format!("{name} targeted someone or was targeted by someone.")
                } else {
                    format!("{name} did not target anyone and was not targeted by anyone.")
                }
            }
            Lens::Reporter => {
                if game.visits_by(target).any(seen) {
                    format!("{name} targeted someone this night!")
                } else {
                    format!("{name} did not target anyone this night.")
                }
            }
            Lens::VisitorRoles => {
                let roles: Vec<&str> = game
                    .visitors_of(target)
                    .filter(|&v| seen(v))
                    .filter_map(|v| game.player(v.actor).map(|p| p.role().id()))
                    .collect();
                if roles.is_empty() {
                    format!("{name} was not targeted by anyone.")
                } else {
                    format!("{name} was targeted by the following roles: {}.", roles.join(", "))
                }
            }
            Lens::PrivateChat => {
                if private_chat(false) {
                    format!("{name} is in a Private Chat!")
                } else {
                    format!("{name} is not in a Private Chat.")
                }
            }
            Lens::Traffic => {
                let usable = |ability: &AbilityRef, passive: bool| {
                    ability.tags().contains(tags::MESSAGE)
                        && !(personal && ability.tags().contains(tags::FACTIONAL))
                        && has_valid_targets(&**ability, game, target, passive)
                };
                let messages = player
                    .actions()
                    .iter()
                    .chain(player.shared_actions())
                    .any(|a| usable(a, false))
                    || player.passives().iter().any(|a| usable(a, true));
                if private_chat(true) || messages {
                    format!("{name} can communicate with other players privately!")
                } else {
                    format!("{name} cannot communicate with other players privately.")
                }
            }
        }
    }
}

impl Ability for Investigate {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let target = visit.target();
        let waiting = match self.lens {
            // What the target did depends on whether they get roleblocked.
            Lens::Targets | Lens::Reporter => game.is_visited_with(target, tags::ROLEBLOCK),
            Lens::Visitors | Lens::VisitorRoles => {
                game.visitors_visited_with(target, tags::ROLEBLOCK)
            }
            Lens::Motion => {
                game.is_visited_with(target, tags::ROLEBLOCK)
                    || game.visitors_visited_with(target, tags::ROLEBLOCK)
            }
            // A death may close the target's last private line.
            Lens::Traffic => game
                .active_visits()
                .any(|v| v.id() != visit.id() && v.has_tag(tags::KILL)),
            _ => false,
        };
        if waiting {
            return VisitStatus::Pending;
        }
        let message = self.report(game, visit, target);
        game.notify(visit.actor, self.id.as_str(), message);
        VisitStatus::Success
    }
}

// =============================================================================
// Shields: protection, rolestops, roleblocks
// =============================================================================

/// Which visits to its target a [`Shield`] fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocks {
    /// Everything.
    All,
    /// Kills. Shields that block kills are protection and yield to `macho`.
    Kills,
    /// Protection (Macho).
    Protection,
    /// Everything but kills (Ascetic).
    NonKills,
}

impl Blocks {
    fn matches(self, visit: &Visit) -> bool {
        match self {
            Blocks::All => true,
            Blocks::Kills => visit.has_tag(tags::KILL),
            Blocks::Protection => visit.has_tag(tags::PROTECT),
            Blocks::NonKills => !visit.has_tag(tags::KILL),
        }
    }
}

/// Whose visits a [`Shield`] fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    /// Visits made to the target.
    Visitors,
    /// The target's own actions (Shield).
    Visits,
}

/// Fails stoppable visits to its target, or by it.
///
/// Facing visitors, it waits while a visitor of the target is itself
/// targeted by a juggernaut, since that visitor's visits may be about to
/// become unstoppable. Facing the target's own visits, it waits while the
/// target is the juggernaut.
#[derive(Debug)]
pub struct Shield {
    id: String,
    tags: TagSet,
    blocks: Blocks,
    facing: Facing,
    /// Blocks per use; `None` blocks every match.
    limit: Option<u32>,
    /// Also roleblock the target (Jailkeeper, Alien).
    roleblock: bool,
    /// The user dies if anything was blocked (Bodyguard, Shield).
    lethal: bool,
    /// Leave passive visits alone.
    actions_only: bool,
    /// Fail unless the target holds this role (Medical Student).
    only_for: Option<&'static str>,
}

impl Shield {
    pub fn new(id: impl Into<String>, blocks: Blocks, tags: &[&str]) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(tags),
            blocks,
            facing: Facing::Visitors,
            limit: None,
            roleblock: false,
            lethal: false,
            actions_only: false,
            only_for: None,
        }
    }

    /// A protective shield: blocks kills, tagged `protect`.
    pub fn protect(id: impl Into<String>) -> Self {
        Self::new(id, Blocks::Kills, &[tags::PROTECT])
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, extra: &[&str]) -> Self {
        self.tags.extend(extra.iter().copied());
        self
    }

    #[must_use]
    pub fn roleblocking(mut self) -> Self {
        self.roleblock = true;
        self.tags.insert(tags::ROLEBLOCK);
        self
    }

    #[must_use]
    pub fn lethal(mut self) -> Self {
        self.lethal = true;
        self
    }

    /// Fail the target's own actions instead of its visitors.
    #[must_use]
    pub fn intercepting(mut self) -> Self {
        self.facing = Facing::Visits;
        self.tags.insert(tags::INTERCEPT);
        self
    }

    #[must_use]
    pub fn actions_only(mut self) -> Self {
        self.actions_only = true;
        self
    }

    #[must_use]
    pub fn only_for(mut self, role_id: &'static str) -> Self {
        self.only_for = Some(role_id);
        self
    }

    fn max_blocks(&self, game: &Game, visit: &Visit) -> Option<u32> {
        match (self.limit, passive_uses_left(game, visit)) {
            (Some(limit), Some(left)) => Some(limit.min(left)),
            (limit, left) => limit.or(left),
        }
    }

    fn faces(&self, candidate: &Visit, target: PlayerId) -> bool {
        match self.facing {
            Facing::Visitors => candidate.targets_player(target),
            Facing::Visits => candidate.actor == target && !candidate.is_passive(),
        }
    }
}

impl Ability for Shield {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let target = visit.target();
        if let Some(role_id) = self.only_for {
            if !game[target].role().is_role(role_id) {
                return VisitStatus::Failure;
            }
        }
        let waiting = match self.facing {
            Facing::Visitors => {
                (self.blocks == Blocks::Kills && game.is_visited_with(target, tags::MACHO))
                    || game.visitors_visited_with(target, tags::JUGGERNAUT)
            }
            Facing::Visits => game.is_visited_with(target, tags::JUGGERNAUT),
        };
        if waiting {
            return VisitStatus::Pending;
        }

        let roleblocked = self.roleblock && game.roleblock_player(target);

        let max = self.max_blocks(game, visit).map_or(usize::MAX, |n| n as usize);
        let blocked: Vec<VisitId> = game
            .visits()
            .filter(|v| {
                v.id() != visit.id()
                    && self.faces(v, target)
                    && v.is_active(game)
                    && !v.has_tag(tags::UNSTOPPABLE)
                    && !(self.actions_only && v.is_passive())
                    && self.blocks.matches(v)
            })
            .map(Visit::id)
            .take(max)
            .collect();
        for &id in &blocked {
            game.settle(id, VisitStatus::Failure);
        }
        if self.lethal && !blocked.is_empty() {
            game.kill(visit.actor, self.id.as_str());
        }

        VisitStatus::from_success(roleblocked || !blocked.is_empty())
    }
}

/// Roleblocks the target.
#[derive(Debug)]
pub struct Roleblock {
    id: String,
    tags: TagSet,
}

impl Roleblock {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::ROLEBLOCK]),
        }
    }
}

impl Ability for Roleblock {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        VisitStatus::from_success(game.roleblock_player(visit.target()))
    }
}

/// Stays home: every visit to the user fails, and so do the user's other
/// visits. Self-target only, unstoppable.
#[derive(Debug)]
pub struct Commute {
    id: String,
    tags: TagSet,
}

impl Commute {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::ROLESTOP, tags::COMMUTE, tags::UNSTOPPABLE]),
        }
    }
}

impl Ability for Commute {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        self_check(self.phase(), game, actor, targets)
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let target = visit.target();
        let others = |v: &Visit| v.id() != visit.id() && v.is_active(game);
        let visitors: Vec<VisitId> = game.visitors_of(target).filter(|&v| others(v)).map(Visit::id).collect();
        let own: Vec<VisitId> = game.visits_by(target).filter(|&v| others(v)).map(Visit::id).collect();
        for &id in visitors.iter().chain(&own) {
            game.settle(id, VisitStatus::Failure);
        }
        VisitStatus::from_success(!visitors.is_empty())
    }
}

/// Hides behind the target: kills aimed at the user fail, but the user
/// dies if the target is killed.
///
/// Resolves first and leaves two hidden visits behind: a passive shelter
/// on the user and a lifelink on the target.
#[derive(Debug)]
pub struct Hide {
    id: String,
    tags: TagSet,
    shelter: AbilityRef,
    lifelink: AbilityRef,
}

impl Hide {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            shelter: AbilityRef::new(
                Shield::protect(id.clone())
                    .actions_only()
                    .with_tags(&[tags::HIDDEN]),
            ),
            lifelink: AbilityRef::new(Lifelink::new(id.clone())),
            tags: TagSet::of(&[tags::SIMULTANEOUS]),
            id,
        }
    }
}

impl Ability for Hide {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let shelter = Visit::new(game, visit.actor, None, self.shelter.clone(), AbilityType::Passive);
        let lifelink = Visit::new(
            game,
            visit.actor,
            Some(visit.targets.as_slice()),
            self.lifelink.clone(),
            AbilityType::Action,
        );
        match (shelter, lifelink) {
            (Ok(shelter), Ok(lifelink)) => {
                game.push_visit(shelter);
                game.push_visit(lifelink);
                VisitStatus::Success
            }
            (Err(err), _) | (_, Err(err)) => {
                tracing::warn!(visit = %visit, %err, "hide could not place its visits");
                VisitStatus::Failure
            }
        }
    }
}

/// Kills the user if the target was killed tonight. Waits while a kill on
/// the target is still pending.
#[derive(Debug)]
pub struct Lifelink {
    id: String,
    tags: TagSet,
}

impl Lifelink {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::HIDDEN]),
        }
    }
}

impl Ability for Lifelink {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let kills: Vec<VisitStatus> = game
            .visitors_of(visit.target())
            .filter(|v| !v.is_passive() && v.has_tag(tags::KILL) && v.is_active_time(game))
            .map(Visit::status)
            .collect();
        if kills.contains(&VisitStatus::Success) {
            game.kill(visit.actor, self.id.as_str());
            return VisitStatus::Failure;
        }
        if kills.contains(&VisitStatus::Pending) {
            return VisitStatus::Pending;
        }
        VisitStatus::Success
    }
}

/// Upgrades the user's pending factional kills with a tag.
///
/// Juggernaut makes them `unstoppable`, Ninja makes them `hidden`.
/// Self-target only, unstoppable.
#[derive(Debug)]
pub struct Empower {
    id: String,
    tags: TagSet,
    grants: &'static str,
}

impl Empower {
    pub fn juggernaut(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::JUGGERNAUT, tags::UNSTOPPABLE]),
            grants: tags::UNSTOPPABLE,
        }
    }

    pub fn ninja(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::NINJA, tags::UNSTOPPABLE]),
            grants: tags::HIDDEN,
        }
    }
}

impl Ability for Empower {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        self_check(self.phase(), game, actor, targets)
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let max = passive_uses_left(game, visit).map_or(usize::MAX, |n| n as usize);
        let kills: Vec<VisitId> = game
            .visits_by(visit.target())
            .filter(|v| v.is_active(game) && v.has_tag(tags::FACTIONAL_KILL))
            .map(Visit::id)
            .take(max)
            .collect();
        for &id in &kills {
            game.tag_visit(id, self.grants);
        }
        VisitStatus::from_success(!kills.is_empty())
    }
}

/// Takes over the role abilities of the first ally with abilities to die,
/// preferring victims of the Mafia's kill, then gives itself up.
///
/// An immediate passive usable in any phase.
#[derive(Debug)]
pub struct Inherit {
    id: String,
    tags: TagSet,
}

impl Inherit {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::new(),
        }
    }
}

impl Ability for Inherit {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn target_count(&self) -> usize {
        0
    }

    fn phase(&self) -> Option<Phase> {
        None
    }

    fn immediate(&self) -> bool {
        true
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let heir = &game[visit.actor];
        let mut fallen: Vec<&Player> = game
            .players()
            .iter()
            .filter(|p| {
                !p.is_alive()
                    && p.alignment().id == heir.alignment().id
                    && (!p.role().actions().is_empty() || !p.role().passives().is_empty())
            })
            .collect();
        // Stable: ties keep admission order.
        fallen.sort_by_key(|p| !p.death_causes().iter().any(|c| c == MAFIA_KILL));
        let Some(fallen) = fallen.first().map(|&p| p.clone()) else {
            return VisitStatus::Failure;
        };

        let heir = &mut game[visit.actor];
        heir.forget(visit.ability.key());
        heir.inherit(&fallen);
        tracing::debug!(heir = %heir, role = %fallen.role(), "inherited role");
        VisitStatus::Success
    }
}

// =============================================================================
// Information
// =============================================================================

/// Where an [`Inform`] ability announces the user's alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Audience {
    /// Privately to the target (Friendly Neighbor).
    Target,
    /// To everyone, once, at any time (Innocent Child).
    Everyone,
}

/// Reveals the user's alignment.
#[derive(Debug)]
pub struct Inform {
    id: String,
    tags: TagSet,
    audience: Audience,
}

impl Inform {
    pub fn new(id: impl Into<String>, audience: Audience) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::INFORM]),
            audience,
        }
    }
}

impl Ability for Inform {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn target_count(&self) -> usize {
        match self.audience {
            Audience::Target => 1,
            Audience::Everyone => 0,
        }
    }

    fn phase(&self) -> Option<Phase> {
        match self.audience {
            Audience::Target => Some(Phase::Night),
            Audience::Everyone => None,
        }
    }

    fn immediate(&self) -> bool {
        self.audience == Audience::Everyone
    }

    fn max_uses(&self) -> Option<u32> {
        match self.audience {
            Audience::Target => None,
            Audience::Everyone => Some(1),
        }
    }

    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        base_check(self.phase(), game, actor, targets) && has_uses_left(self, game, actor)
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let actor = &game[visit.actor];
        let message = format!("{} is aligned with the {}!", actor.name(), actor.alignment().id);
        match self.audience {
            Audience::Target => {
                game.notify(visit.target(), self.id.as_str(), message);
                VisitStatus::Success
            }
            Audience::Everyone => {
                VisitStatus::from_success(game.send(GLOBAL_CHAT, self.id.as_str(), message).is_ok())
            }
        }
    }
}

/// Tells the user, once, that a fixed player is aligned with the Town.
#[derive(Debug)]
pub struct Vouch {
    id: String,
    tags: TagSet,
    informed: PlayerId,
}

impl Vouch {
    pub fn new(id: impl Into<String>, informed: PlayerId) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::INFORM]),
            informed,
        }
    }

    #[must_use]
    pub fn informed(&self) -> PlayerId {
        self.informed
    }
}

impl Ability for Vouch {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn target_count(&self) -> usize {
        0
    }

    fn immediate(&self) -> bool {
        true
    }

    fn max_uses(&self) -> Option<u32> {
        Some(1)
    }

    fn check(&self, game: &Game, actor: PlayerId, targets: Option<&[PlayerId]>) -> bool {
        base_check(self.phase(), game, actor, targets) && has_uses_left(self, game, actor)
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let Some(informed) = game.player(self.informed) else {
            return VisitStatus::Failure;
        };
        let message = format!("{} is aligned with the Town.", informed.name());
        game.notify(visit.actor, self.id.as_str(), message);
        VisitStatus::Success
    }
}

/// Adds the target to the user's private neighborhood chat.
#[derive(Debug)]
pub struct Neighborize {
    id: String,
    tags: TagSet,
}

impl Neighborize {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::new(),
        }
    }
}

/// Chat id of a neighborizer's neighborhood.
#[must_use]
pub fn neighborhood(role_id: &str, owner: &str) -> String {
    format!("{role_id}:{owner}")
}

impl Ability for Neighborize {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        let chat_id = neighborhood(&self.id, game[visit.actor].name());
        let target = visit.target();
        let message = format!("{} has been added into the neighborhood.", name_of(game, target));
        let joined = game
            .join_private_chat(&chat_id, visit.actor)
            .map(|chat| {
                chat.add_participant(target);
                chat.send(self.id.as_str(), message);
            });
        VisitStatus::from_success(joined.is_ok())
    }
}

/// Delivers the visit's first player input to the target.
#[derive(Debug)]
pub struct Message {
    id: String,
    tags: TagSet,
}

impl Message {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::of(&[tags::MESSAGE]),
        }
    }
}

impl Ability for Message {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        match visit.player_inputs.first() {
            Some(text) => {
                game.notify(visit.target(), self.id.as_str(), text.as_str());
                VisitStatus::Success
            }
            None => VisitStatus::Failure,
        }
    }
}

/// Sends the target a fixed note without revealing the sender.
#[derive(Debug)]
pub struct Gift {
    id: String,
    tags: TagSet,
    note: &'static str,
}

impl Gift {
    pub fn new(id: impl Into<String>, note: &'static str) -> Self {
        Self {
            id: id.into(),
            tags: TagSet::new(),
            note,
        }
    }
}

impl Ability for Gift {
    fn id(&self) -> &str {
        &self.id
    }

    fn tags(&self) -> &TagSet {
        &self.tags
    }

    fn perform(&self, game: &mut Game, visit: &Visit) -> VisitStatus {
        game.notify(visit.target(), self.id.as_str(), self.note);
        VisitStatus::Success
    }
}
