//! Deciding elimination votes.
//!
//! A player is eliminated once more than half of the living players vote
//! for them. The vote stays open until that happens or until at least half
//! of the living players vote for no elimination.

use crate::core::{Game, PlayerId};

/// The player a strict majority is voting for, if any.
#[must_use]
pub fn vote_elimination(game: &Game) -> Option<PlayerId> {
    if !game.is_voting_phase() {
        return None;
    }
    let alive = game.alive_count();
    game.vote_counts()
        .into_iter()
        .find_map(|(target, votes)| target.filter(|_| votes * 2 > alive))
}

/// Whether the vote is still undecided.
#[must_use]
pub fn vote_ongoing(game: &Game) -> bool {
    game.is_voting_phase()
        && vote_elimination(game).is_none()
        && game.votes_for(None) * 2 < game.alive_count()
}

/// Close a decided vote: eliminate the majority candidate, if there is one,
/// and move to the next phase.
///
/// Does nothing while the vote is ongoing or outside a voting phase.
pub fn resolve_vote(game: &mut Game) -> Option<PlayerId> {
    if !game.is_voting_phase() || vote_ongoing(game) {
        return None;
    }
    let eliminated = vote_elimination(game);
    if let Some(player) = eliminated {
        game.kill(player, "Vote");
    }
    tracing::info!(?eliminated, day = game.day_no(), "vote resolved");
    game.advance_phase();
    eliminated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{factions, roles};
    use crate::core::{GameConfig, Phase};

    fn four_players() -> (Game, Vec<PlayerId>) {
        let mut game = Game::new(GameConfig::new()).unwrap();
        let town = Arc::new(factions::town());
        let ids = ["Alice", "Bob", "Carol", "Dave"]
            .into_iter()
            .map(|name| game.add_player(name, roles::vanilla(), town.clone()).unwrap())
            .collect();
        (game, ids)
    }

    #[test]
    fn test_half_is_not_a_majority() {
        let (mut game, p) = four_players();
        game.vote(p[0], Some(p[3])).unwrap();
        game.vote(p[1], Some(p[3])).unwrap();
        assert_eq!(vote_elimination(&game), None);
        assert!(vote_ongoing(&game));
        assert_eq!(resolve_vote(&mut game), None);
        assert_eq!(game.time(), (1, Phase::Day));

        game.vote(p[2], Some(p[3])).unwrap();
        assert_eq!(vote_elimination(&game), Some(p[3]));
        assert!(!vote_ongoing(&game));
    }

    #[test]
    fn test_no_elimination_closes_at_half() {
        let (mut game, p) = four_players();
        game.vote(p[0], None).unwrap();
        assert!(vote_ongoing(&game));
        game.vote(p[1], None).unwrap();
        assert!(!vote_ongoing(&game));

        assert_eq!(resolve_vote(&mut game), None);
        assert!(game.players().iter().all(|pl| pl.is_alive()));
        assert_eq!(game.time(), (1, Phase::Night));
    }

    #[test]
    fn test_not_a_voting_phase() {
        let (mut game, p) = four_players();
        game.set_time(1, Phase::Night).unwrap();
        game.vote(p[0], None).unwrap();
        game.vote(p[1], None).unwrap();
        assert!(!vote_ongoing(&game));
        assert_eq!(resolve_vote(&mut game), None);
        assert_eq!(game.time(), (1, Phase::Night));
    }
}
