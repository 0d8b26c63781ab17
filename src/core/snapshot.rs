//! Serializable, comparable views of a game.
//!
//! Abilities are shared trait objects and cannot be serialized, so a
//! snapshot records them by id. Two games that resolved the same way
//! produce equal snapshots, which is what determinism checks compare.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::chat::ChatMessage;
use super::config::Phase;
use super::player::{Player, PlayerId};
use super::state::Game;
use super::visit::{AbilityType, Visit, VisitId, VisitStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub role_name: String,
    pub alignment: String,
    pub death_causes: Vec<String>,
    /// Use counts keyed by ability id.
    pub uses: BTreeMap<String, u32>,
    pub private_messages: Vec<ChatMessage>,
}

impl From<&Player> for PlayerSnapshot {
    fn from(player: &Player) -> Self {
        let mut uses = BTreeMap::new();
        for ability in player.all_abilities() {
            let count = player.uses(ability.key());
            if count > 0 {
                *uses.entry(ability.id().to_string()).or_insert(0) += count;
            }
        }
        Self {
            id: player.id(),
            name: player.name().to_string(),
            role_name: player.role_name(),
            alignment: player.alignment().id.clone(),
            death_causes: player.death_causes().to_vec(),
            uses,
            private_messages: player.private_messages().messages().cloned().collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub id: VisitId,
    pub actor: PlayerId,
    pub targets: Vec<PlayerId>,
    pub ability: String,
    pub ability_type: AbilityType,
    pub day_no: u32,
    pub phase: Phase,
    pub status: VisitStatus,
    pub tags: Vec<String>,
}

impl From<&Visit> for VisitRecord {
    fn from(visit: &Visit) -> Self {
        Self {
            id: visit.id(),
            actor: visit.actor,
            targets: visit.targets.to_vec(),
            ability: visit.ability.id().to_string(),
            ability_type: visit.ability_type,
            day_no: visit.day_no,
            phase: visit.phase,
            status: visit.status(),
            tags: visit.tags().iter().map(str::to_string).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub day_no: u32,
    pub phase: Phase,
    pub players: Vec<PlayerSnapshot>,
    pub visits: Vec<VisitRecord>,
    pub chats: BTreeMap<String, Vec<ChatMessage>>,
    pub votes: Vec<(PlayerId, Option<PlayerId>)>,
}

impl Game {
    /// Capture the observable state of the game.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            day_no: self.day_no(),
            phase: self.phase(),
            players: self.players().iter().map(PlayerSnapshot::from).collect(),
            visits: self.history().iter().map(VisitRecord::from).collect(),
            chats: self
                .chats()
                .map(|(id, chat)| (id.to_string(), chat.messages().cloned().collect()))
                .collect(),
            votes: self.votes().iter().copied().collect(),
        }
    }
}
