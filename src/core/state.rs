//! The game aggregate.
//!
//! `Game` owns everything a night resolution touches: players, the full
//! visit history, chats, the vote ledger and the clock. It is a plain owned
//! value; clone it to fork a game (visit history and chats are `im`
//! persistent structures, so forks share storage).
//!
//! ## Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use mafia_engine::catalog::{factions, roles};
//! use mafia_engine::core::{Game, GameConfig, Phase};
//!
//! let mut game = Game::new(GameConfig::new()).unwrap();
//! let town = Arc::new(factions::town());
//! let alice = game.add_player("Alice", roles::cop(), town.clone()).unwrap();
//! game.add_player("Bob", roles::doctor(), town).unwrap();
//!
//! assert_eq!(game.time(), (1, Phase::Day));
//! assert_eq!(game.advance_phase(), (1, Phase::Night));
//! assert_eq!(game.advance_phase(), (2, Phase::Day));
//! assert_eq!(game[alice].role_name(), "Town Cop");
//! ```

use std::collections::BTreeSet;
use std::ops::{Index, IndexMut};
use std::sync::Arc;

use im::{OrdMap, Vector};

use super::chat::Chat;
use super::config::{GameConfig, Phase};
use super::error::GameError;
use super::player::{Player, PlayerId};
use super::tags;
use super::visit::{AbilityType, Visit, VisitId, VisitStatus};
use crate::roles::{Alignment, Role};

/// Id of the public chat every game starts with.
pub const GLOBAL_CHAT: &str = "global";

/// A game of Mafia.
#[derive(Clone, Debug)]
pub struct Game {
    config: GameConfig,
    day_no: u32,
    phase_idx: usize,
    players: Vec<Player>,
    // Full history; never pruned except by `dequeue`/replacement of
    // still-pending visits.
    visits: Vector<Visit>,
    next_visit: u32,
    settlements: u64,
    chats: OrdMap<String, Chat>,
    // Voter and choice, in the order votes were first cast.
    pub(crate) votes: Vector<(PlayerId, Option<PlayerId>)>,
    shrouded: BTreeSet<VisitId>,
}

impl Game {
    /// Create a game with no players and a public `global` chat.
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let phase_idx = config.validate()?;
        let mut chats = OrdMap::new();
        chats.insert(GLOBAL_CHAT.to_string(), Chat::public());

        Ok(Self {
            day_no: config.start_day,
            config,
            phase_idx,
            players: Vec::new(),
            visits: Vector::new(),
            next_visit: 0,
            settlements: 0,
            chats,
            votes: Vector::new(),
            shrouded: BTreeSet::new(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    // === Clock ===

    #[must_use]
    pub fn day_no(&self) -> u32 {
        self.day_no
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.config.phase_order[self.phase_idx]
    }

    #[must_use]
    pub fn time(&self) -> (u32, Phase) {
        (self.day_no, self.phase())
    }

    /// Jump to a specific time.
    pub fn set_time(&mut self, day_no: u32, phase: Phase) -> Result<(), GameError> {
        self.phase_idx = self.config.phase_index(phase)?;
        self.day_no = day_no;
        Ok(())
    }

    /// Move to the next phase, wrapping to the next day, and clear votes.
    pub fn advance_phase(&mut self) -> (u32, Phase) {
        if self.phase_idx + 1 >= self.config.phase_order.len() {
            self.phase_idx = 0;
            self.day_no += 1;
        } else {
            self.phase_idx += 1;
        }
        self.votes.clear();
        tracing::debug!(day = self.day_no, phase = %self.phase(), "advanced phase");
        self.time()
    }

    #[must_use]
    pub fn is_chat_phase(&self) -> bool {
        self.config.chat_phases.contains(&self.phase())
    }

    #[must_use]
    pub fn is_voting_phase(&self) -> bool {
        self.config.voting_phases.contains(&self.phase())
    }

    // === Players ===

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id.index())
    }

    pub fn try_player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.player(id).ok_or(GameError::UnknownPlayer(id))
    }

    #[must_use]
    pub fn find_player(&self, name: &str) -> Option<PlayerId> {
        self.players.iter().find(|p| p.name() == name).map(Player::id)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| p.is_alive())
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }

    #[must_use]
    pub fn is_alive(&self, id: PlayerId) -> bool {
        self.player(id).is_some_and(Player::is_alive)
    }

    /// Admit a player.
    ///
    /// Runs the role's then the alignment's `player_init`, then links the
    /// newcomer with existing players who share an `informed` role or
    /// alignment. If a hook fails, the player and any chat changes the
    /// hooks made are rolled back.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        role: Role,
        alignment: Arc<Alignment>,
    ) -> Result<PlayerId, GameError> {
        let raw = u16::try_from(self.players.len())
            .map_err(|_| GameError::Config("too many players"))?;
        let id = PlayerId::new(raw);
        let chats = self.chats.clone();
        self.players
            .push(Player::new(id, name.into(), role.clone(), alignment.clone()));

        let admitted = role
            .player_init(self, id)
            .and_then(|()| alignment.player_init(self, id));
        if let Err(err) = admitted {
            self.players.pop();
            self.chats = chats;
            return Err(err);
        }
        self.link_informed(id);

        tracing::debug!(player = %self[id], role = %self[id].role_name(), "player admitted");
        Ok(id)
    }

    fn link_informed(&mut self, id: PlayerId) {
        let knows = |a: &Player, b: &Player| {
            (a.alignment().tags.contains(tags::INFORMED) && a.alignment().id == b.alignment().id)
                || (a.role().tags().contains(tags::INFORMED) && a.role().id() == b.role().id())
        };
        let mut learned = Vec::new();
        let mut learners = Vec::new();
        {
            let newcomer = &self[id];
            for other in self.players.iter().filter(|p| p.id() != id) {
                if knows(newcomer, other) {
                    learned.push(other.id());
                }
                if knows(other, newcomer) {
                    learners.push(other.id());
                }
            }
        }
        for other in learned {
            self[id].learn(other);
        }
        for other in learners {
            self[other].learn(id);
        }
    }

    /// Record a death cause for a player.
    pub fn kill(&mut self, id: PlayerId, cause: impl Into<String>) {
        if let Some(player) = self.player_mut(id) {
            let cause = cause.into();
            tracing::debug!(player = %player, %cause, "player killed");
            player.kill(cause);
        }
    }

    /// Append to a player's private log.
    pub fn notify(&mut self, id: PlayerId, sender: impl Into<String>, content: impl Into<String>) {
        if let Some(player) = self.player_mut(id) {
            player.notify(sender, content);
        }
    }

    // === Visits ===

    /// Visits the resolver can currently see, oldest first.
    ///
    /// Visits temporarily shrouded by a personal ability are skipped.
    pub fn visits(&self) -> impl Iterator<Item = &Visit> {
        self.visits
            .iter()
            .filter(move |v| self.shrouded.is_empty() || !self.shrouded.contains(&v.id()))
    }

    /// The complete visit history, shrouded or not.
    #[must_use]
    pub fn history(&self) -> &Vector<Visit> {
        &self.visits
    }

    fn visit_index(&self, id: VisitId) -> Option<usize> {
        self.visits.binary_search_by_key(&id, Visit::id).ok()
    }

    #[must_use]
    pub fn visit(&self, id: VisitId) -> Option<&Visit> {
        self.visit_index(id).and_then(|i| self.visits.get(i))
    }

    pub(crate) fn visit_mut(&mut self, id: VisitId) -> Option<&mut Visit> {
        let i = self.visit_index(id)?;
        self.visits.get_mut(i)
    }

    /// Visits performed by `player`.
    pub fn visits_by(&self, player: PlayerId) -> impl Iterator<Item = &Visit> {
        self.visits().filter(move |v| v.actor == player)
    }

    /// Visits targeting `player`.
    pub fn visitors_of(&self, player: PlayerId) -> impl Iterator<Item = &Visit> {
        self.visits().filter(move |v| v.targets_player(player))
    }

    /// Visits that are pending at the current time.
    pub fn active_visits(&self) -> impl Iterator<Item = &Visit> {
        self.visits().filter(move |v| v.is_active(self))
    }

    /// Whether an active visit carrying `tag` targets `player`.
    #[must_use]
    pub fn is_visited_with(&self, player: PlayerId, tag: &str) -> bool {
        self.visitors_of(player)
            .any(|v| v.has_tag(tag) && v.is_active(self))
    }

    /// Whether any active visitor of `player` is itself targeted by an
    /// active visit carrying `tag`.
    #[must_use]
    pub fn visitors_visited_with(&self, player: PlayerId, tag: &str) -> bool {
        self.visitors_of(player)
            .filter(|v| v.is_active(self))
            .any(|v| self.is_visited_with(v.actor, tag))
    }

    /// Append a visit to the history as-is.
    pub fn push_visit(&mut self, mut visit: Visit) -> VisitId {
        let id = VisitId::new(self.next_visit);
        self.next_visit += 1;
        visit.assign_id(id);
        self.visits.push_back(visit);
        id
    }

    /// Queue a visit, replacing the same ability's pending visit for the
    /// current time.
    ///
    /// Shared actions are replaced across the whole alignment, so a faction
    /// has at most one pending use of each shared ability.
    pub fn queue_visit(&mut self, visit: Visit) -> VisitId {
        let alignment = self.player(visit.actor).map(|p| p.alignment().id.clone());
        let replaced = self.visits.iter().position(|v| {
            v.is_active(self)
                && v.ability_type == visit.ability_type
                && match visit.ability_type {
                    AbilityType::SharedAction => {
                        v.ability.id() == visit.ability.id()
                            && self.player(v.actor).map(|p| &p.alignment().id) == alignment.as_ref()
                    }
                    _ => v.actor == visit.actor && v.ability == visit.ability,
                }
        });
        if let Some(i) = replaced {
            let old = self.visits.remove(i);
            tracing::debug!(visit = %old, "replaced queued visit");
        }
        self.push_visit(visit)
    }

    /// Remove `actor`'s pending, non-immediate visit for the ability at
    /// `index` of its `ability_type` list, if one is queued for the current
    /// time.
    pub fn dequeue(
        &mut self,
        actor: PlayerId,
        ability_type: AbilityType,
        index: usize,
    ) -> Result<Option<Visit>, GameError> {
        let ability = self
            .try_player(actor)?
            .abilities(ability_type)
            .get(index)
            .cloned()
            .ok_or(GameError::AbilityIndex {
                player: actor,
                ability_type,
                index,
            })?;
        let position = self.visits.iter().position(|v| {
            v.actor == actor
                && v.ability_type == ability_type
                && v.ability == ability
                && !v.ability.immediate()
                && v.is_active(self)
        });
        Ok(position.map(|i| self.visits.remove(i)))
    }

    /// Settle a visit's status. Only `Pending` visits change.
    pub fn settle(&mut self, id: VisitId, status: VisitStatus) -> bool {
        let changed = self.visit_mut(id).is_some_and(|v| v.settle(status));
        if changed {
            self.settlements += 1;
        }
        changed
    }

    /// Number of status changes made through [`Game::settle`] so far.
    #[must_use]
    pub fn settlements(&self) -> u64 {
        self.settlements
    }

    /// Add a tag to a visit. Returns `true` if it was new.
    pub fn tag_visit(&mut self, id: VisitId, tag: &str) -> bool {
        self.visit_mut(id).is_some_and(|v| v.add_tag(tag))
    }

    /// Fail every active non-passive, stoppable visit by `player` and tag
    /// it `roleblocked`. Returns `true` if any visit was failed.
    pub fn roleblock_player(&mut self, player: PlayerId) -> bool {
        let blocked: Vec<VisitId> = self
            .visits_by(player)
            .filter(|v| v.is_active(self) && !v.is_passive() && !v.has_tag(tags::UNSTOPPABLE))
            .map(Visit::id)
            .collect();
        for &id in &blocked {
            self.settle(id, VisitStatus::Failure);
            self.tag_visit(id, tags::ROLEBLOCKED);
        }
        !blocked.is_empty()
    }

    pub(crate) fn shroud(&mut self, ids: &[VisitId]) {
        self.shrouded.extend(ids.iter().copied());
    }

    pub(crate) fn unshroud(&mut self, ids: &[VisitId]) {
        for id in ids {
            self.shrouded.remove(id);
        }
    }

    // === Chats ===

    #[must_use]
    pub fn chat(&self, id: &str) -> Option<&Chat> {
        self.chats.get(id)
    }

    pub fn chat_mut(&mut self, id: &str) -> Option<&mut Chat> {
        self.chats.get_mut(id)
    }

    pub fn chats(&self) -> impl Iterator<Item = (&str, &Chat)> {
        self.chats.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Create or replace a chat.
    pub fn insert_chat(&mut self, id: impl Into<String>, chat: Chat) {
        self.chats.insert(id.into(), chat);
    }

    /// Post to a chat.
    pub fn send(
        &mut self,
        chat: &str,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), GameError> {
        self.chats
            .get_mut(chat)
            .ok_or_else(|| GameError::UnknownChat(chat.to_string()))?
            .send(sender, content);
        Ok(())
    }

    /// Add `player` to the private chat `id`, creating it if needed.
    pub fn join_private_chat(&mut self, id: &str, player: PlayerId) -> Result<&mut Chat, GameError> {
        if !self.chats.contains_key(id) {
            self.chats.insert(id.to_string(), Chat::private([player]));
        }
        let chat = self
            .chats
            .get_mut(id)
            .ok_or_else(|| GameError::UnknownChat(id.to_string()))?;
        if !chat.add_participant(player) {
            return Err(GameError::ChatKind(id.to_string()));
        }
        Ok(chat)
    }
}

impl Index<PlayerId> for Game {
    type Output = Player;

    fn index(&self, id: PlayerId) -> &Self::Output {
        &self.players[id.index()]
    }
}

impl IndexMut<PlayerId> for Game {
    fn index_mut(&mut self, id: PlayerId) -> &mut Self::Output {
        &mut self.players[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{factions, roles};
    use crate::roles::NamedRole;

    fn join_global(game: &mut Game, player: PlayerId, _role_id: &str) -> Result<(), GameError> {
        game.join_private_chat(GLOBAL_CHAT, player).map(|_| ())
    }

    fn game_with(phase: Phase) -> Game {
        Game::new(GameConfig::new().with_start_phase(phase)).unwrap()
    }

    #[test]
    fn test_new_game_has_global_chat() {
        let game = game_with(Phase::Day);
        let chat = game.chat(GLOBAL_CHAT).unwrap();
        assert!(!chat.is_private());
        assert!(game.players().is_empty());
    }

    #[test]
    fn test_advance_phase_wraps_and_clears_votes() {
        let mut game = game_with(Phase::Day);
        let town = Arc::new(factions::town());
        let a = game.add_player("A", roles::vanilla(), town.clone()).unwrap();
        let b = game.add_player("B", roles::vanilla(), town).unwrap();
        game.vote(a, Some(b)).unwrap();

        assert_eq!(game.advance_phase(), (1, Phase::Night));
        assert!(game.votes.is_empty());
        assert_eq!(game.advance_phase(), (2, Phase::Day));
    }

    #[test]
    fn test_set_time_rejects_unknown_phase() {
        let mut game = Game::new(GameConfig::new().with_phase_order([Phase::Night])).unwrap();
        assert_eq!(game.set_time(3, Phase::Day), Err(GameError::UnknownPhase(Phase::Day)));
        assert!(game.set_time(3, Phase::Night).is_ok());
        assert_eq!(game.time(), (3, Phase::Night));
    }

    #[test]
    fn test_informed_alignment_links_are_mutual() {
        let mut game = game_with(Phase::Day);
        let mafia = Arc::new(factions::mafia());
        let town = Arc::new(factions::town());
        let eve = game.add_player("Eve", roles::vanilla(), mafia.clone()).unwrap();
        let alice = game.add_player("Alice", roles::vanilla(), town).unwrap();
        let mallory = game.add_player("Mallory", roles::roleblocker(), mafia).unwrap();

        assert!(game[eve].knows(mallory));
        assert!(game[mallory].knows(eve));
        assert!(!game[eve].knows(alice));
        assert!(!game[alice].knows(eve));
    }

    #[test]
    fn test_informed_role_links() {
        let mut game = game_with(Phase::Day);
        let town = Arc::new(factions::town());
        let a = game.add_player("A", roles::mason(), town.clone()).unwrap();
        let b = game.add_player("B", roles::mason(), town.clone()).unwrap();
        let c = game.add_player("C", roles::cop(), town).unwrap();

        assert!(game[a].knows(b));
        assert!(game[b].knows(a));
        assert!(!game[a].knows(c));
    }

    #[test]
    fn test_failed_init_rolls_back_admission() {
        let mut game = game_with(Phase::Day);
        let town = Arc::new(factions::town());
        let crier: Role = NamedRole::new("Crier").with_init(join_global).into();
        let role = Role::combine([roles::mason(), crier]);

        assert_eq!(
            game.add_player("A", role, town.clone()).unwrap_err(),
            GameError::ChatKind(GLOBAL_CHAT.into())
        );
        assert!(game.players().is_empty());
        assert!(game.chat("Mason").is_none());

        let b = game.add_player("B", roles::vanilla(), town).unwrap();
        assert_eq!(b, PlayerId::new(0));
    }

    #[test]
    fn test_join_private_chat_rejects_public() {
        let mut game = game_with(Phase::Day);
        let town = Arc::new(factions::town());
        let a = game.add_player("A", roles::vanilla(), town).unwrap();
        assert_eq!(
            game.join_private_chat(GLOBAL_CHAT, a).unwrap_err(),
            GameError::ChatKind(GLOBAL_CHAT.into())
        );
    }

    #[test]
    fn test_public_write_perms_follow_chat_phases() {
        let mut game = game_with(Phase::Day);
        let town = Arc::new(factions::town());
        let a = game.add_player("A", roles::vanilla(), town.clone()).unwrap();
        let b = game.add_player("B", roles::vanilla(), town).unwrap();
        game.kill(b, "Vote");

        let global = game.chat(GLOBAL_CHAT).unwrap();
        assert_eq!(global.write_perms(&game), vec![a]);
        assert_eq!(global.read_perms(&game), vec![a, b]);
        assert!(!global.has_write_perms(&game, None));

        game.advance_phase();
        let global = game.chat(GLOBAL_CHAT).unwrap();
        assert!(global.write_perms(&game).is_empty());
    }

    #[test]
    fn test_send_to_unknown_chat() {
        let mut game = game_with(Phase::Day);
        assert_eq!(
            game.send("nowhere", "A", "hi"),
            Err(GameError::UnknownChat("nowhere".into()))
        );
    }
}
