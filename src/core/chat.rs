//! Chat channels.
//!
//! Every game has a public `global` channel. Private channels (faction
//! chats, Mason chats, neighborhoods, each player's private log) are
//! restricted to a participant set.

use std::collections::BTreeSet;

use im::Vector;
use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use super::state::Game;

/// A message in a chat.
///
/// `sender` is a player name or the id of the ability/alignment that
/// produced the message.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// Who may read and write a chat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatAccess {
    /// Readable by anyone; writable by living players during chat phases.
    Public,
    /// Readable by participants; writable by living participants.
    Private(BTreeSet<PlayerId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chat {
    access: ChatAccess,
    messages: Vector<ChatMessage>,
}

impl Chat {
    #[must_use]
    pub fn public() -> Self {
        Self {
            access: ChatAccess::Public,
            messages: Vector::new(),
        }
    }

    pub fn private(participants: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            access: ChatAccess::Private(participants.into_iter().collect()),
            messages: Vector::new(),
        }
    }

    #[must_use]
    pub fn access(&self) -> &ChatAccess {
        &self.access
    }

    #[must_use]
    pub fn is_private(&self) -> bool {
        matches!(self.access, ChatAccess::Private(_))
    }

    /// Add a participant. Returns `false` for public chats.
    pub fn add_participant(&mut self, player: PlayerId) -> bool {
        match &mut self.access {
            ChatAccess::Private(participants) => {
                participants.insert(player);
                true
            }
            ChatAccess::Public => false,
        }
    }

    #[must_use]
    pub fn has_participant(&self, player: PlayerId) -> bool {
        match &self.access {
            ChatAccess::Private(participants) => participants.contains(&player),
            ChatAccess::Public => false,
        }
    }

    /// `None` is an anonymous observer.
    #[must_use]
    pub fn has_read_perms(&self, _game: &Game, player: Option<PlayerId>) -> bool {
        match &self.access {
            ChatAccess::Public => true,
            ChatAccess::Private(participants) => {
                player.is_some_and(|p| participants.contains(&p))
            }
        }
    }

    #[must_use]
    pub fn has_write_perms(&self, game: &Game, player: Option<PlayerId>) -> bool {
        let Some(player) = player else {
            return false;
        };
        let alive = game.player(player).is_some_and(|p| p.is_alive());
        match &self.access {
            ChatAccess::Public => alive && game.is_chat_phase(),
            ChatAccess::Private(participants) => alive && participants.contains(&player),
        }
    }

    /// Players allowed to read, in admission order.
    #[must_use]
    pub fn read_perms(&self, game: &Game) -> Vec<PlayerId> {
        game.players()
            .iter()
            .map(|p| p.id())
            .filter(|&p| self.has_read_perms(game, Some(p)))
            .collect()
    }

    /// Players allowed to write, in admission order.
    #[must_use]
    pub fn write_perms(&self, game: &Game) -> Vec<PlayerId> {
        game.players()
            .iter()
            .map(|p| p.id())
            .filter(|&p| self.has_write_perms(game, Some(p)))
            .collect()
    }

    /// Append a message. Permission checks are the caller's job.
    pub fn send(&mut self, sender: impl Into<String>, content: impl Into<String>) {
        self.messages.push_back(ChatMessage::new(sender, content));
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_appends_in_order() {
        let mut chat = Chat::public();
        chat.send("Alice", "hi");
        chat.send("Bob", "hello");

        let contents: Vec<_> = chat.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, ["hi", "hello"]);
        assert_eq!(chat.last(), Some(&ChatMessage::new("Bob", "hello")));
    }

    #[test]
    fn test_public_chat_has_no_participants() {
        let mut chat = Chat::public();
        assert!(!chat.add_participant(PlayerId::new(0)));
        assert!(!chat.has_participant(PlayerId::new(0)));
        assert!(!chat.is_private());
    }

    #[test]
    fn test_private_chat_participants() {
        let mut chat = Chat::private([PlayerId::new(0)]);
        assert!(chat.add_participant(PlayerId::new(2)));
        assert!(chat.has_participant(PlayerId::new(2)));
        assert!(!chat.has_participant(PlayerId::new(1)));
    }

    #[test]
    fn test_message_serialization() {
        let message = ChatMessage::new("Cop", "Eve is not aligned with the Town!.");
        let json = serde_json::to_string(&message).unwrap();
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(message, back);
    }
}
