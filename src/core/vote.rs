//! The elimination vote ledger.
//!
//! A vote is either for a player or for no elimination (`None`). Votes and
//! unvotes are announced in the global chat; the ledger is cleared every
//! time the phase advances. Deciding the outcome is the resolver's job.
//!
//! The ledger keeps voters in the order they first voted. Changing a vote
//! keeps the voter's place; unvoting gives it up.

use std::collections::BTreeMap;

use im::Vector;

use super::error::GameError;
use super::player::PlayerId;
use super::state::{Game, GLOBAL_CHAT};

impl Game {
    /// Record `player`'s vote, replacing any earlier one.
    pub fn vote(&mut self, player: PlayerId, target: Option<PlayerId>) -> Result<(), GameError> {
        let voter = self.try_player(player)?.name().to_string();
        let message = match target {
            Some(target) => format!("{voter} voted for {}.", self.try_player(target)?.name()),
            None => format!("{voter} voted to not eliminate anyone."),
        };
        match self.votes.iter().position(|&(voter, _)| voter == player) {
            Some(i) => {
                self.votes.set(i, (player, target));
            }
            None => self.votes.push_back((player, target)),
        }
        self.send(GLOBAL_CHAT, "Vote", message)
    }

    /// Withdraw `player`'s vote.
    pub fn unvote(&mut self, player: PlayerId) -> Result<(), GameError> {
        let voter = self.try_player(player)?.name().to_string();
        self.votes.retain(|&(voter, _)| voter != player);
        self.send(GLOBAL_CHAT, "Unvote", format!("{voter} unvoted."))
    }

    /// Current ledger of (voter, target) in voting order; a `None` target
    /// is no elimination.
    #[must_use]
    pub fn votes(&self) -> &Vector<(PlayerId, Option<PlayerId>)> {
        &self.votes
    }

    #[must_use]
    pub fn vote_of(&self, voter: PlayerId) -> Option<Option<PlayerId>> {
        self.votes
            .iter()
            .find(|&&(v, _)| v == voter)
            .map(|&(_, target)| target)
    }

    /// Players currently voting for `target`, in voting order.
    #[must_use]
    pub fn voters(&self, target: Option<PlayerId>) -> Vec<PlayerId> {
        self.votes
            .iter()
            .filter(|&&(_, t)| t == target)
            .map(|&(voter, _)| voter)
            .collect()
    }

    #[must_use]
    pub fn votes_for(&self, target: Option<PlayerId>) -> usize {
        self.votes.iter().filter(|&&(_, t)| t == target).count()
    }

    /// Tally per target.
    #[must_use]
    pub fn vote_counts(&self) -> BTreeMap<Option<PlayerId>, usize> {
        let mut counts = BTreeMap::new();
        for &(_, target) in &self.votes {
            *counts.entry(target).or_insert(0) += 1;
        }
        counts
    }

    /// Human-readable vote count.
    ///
    /// One line per player with votes (voters in voting order), then
    /// no-elimination votes, then the living players who have not voted.
    #[must_use]
    pub fn vote_count(&self) -> String {
        let names = |ids: &[PlayerId]| {
            ids.iter()
                .map(|&id| self[id].name())
                .collect::<Vec<_>>()
                .join(", ")
        };
        let mut message = String::new();
        for player in self.players() {
            let voters = self.voters(Some(player.id()));
            if !voters.is_empty() {
                message += &format!("{} ({}): {}\n", player.name(), voters.len(), names(&voters));
            }
        }
        let no_elim = self.voters(None);
        if !no_elim.is_empty() {
            message += &format!("No Elimination ({}): {}\n\n", no_elim.len(), names(&no_elim));
        }
        let non_voters: Vec<PlayerId> = self
            .alive_players()
            .map(|p| p.id())
            .filter(|&id| self.vote_of(id).is_none())
            .collect();
        if !non_voters.is_empty() {
            message += &format!("Not Voting ({}): {}\n", non_voters.len(), names(&non_voters));
        }
        message.trim_end_matches('\n').to_string()
    }

    /// Post [`Game::vote_count`] to a chat.
    pub fn post_vote_count(&mut self, chat: &str) -> Result<(), GameError> {
        let count = self.vote_count();
        self.send(chat, "Vote Count", count)
    }
}
