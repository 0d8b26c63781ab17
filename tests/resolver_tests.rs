//! Resolver property tests.
//!
//! These tests check the guarantees every resolution gives regardless of
//! which roles are in play: statuses only move once, the same night
//! resolves the same way twice, and queueing respects arity and
//! replacement rules.

use std::sync::Arc;

use mafia_engine::catalog::{factions, roles};
use mafia_engine::core::tags;
use mafia_engine::core::{
    AbilityType, Game, GameConfig, GameError, GameSnapshot, Phase, PlayerId, VisitStatus,
};
use mafia_engine::resolve::Resolver;
use mafia_engine::roles::Role;
use proptest::prelude::*;

// =============================================================================
// Helpers
// =============================================================================

/// Six town power roles and two mafia, one role per seat.
fn roster() -> Vec<(Role, bool)> {
    vec![
        (roles::cop(), false),
        (roles::doctor(), false),
        (roles::roleblocker(), false),
        (roles::jailkeeper(), false),
        (roles::tracker(), false),
        (roles::watcher(), false),
        (roles::roleblocker(), true),
        (roles::juggernaut(), true),
    ]
}

fn seat_players() -> (Game, Vec<PlayerId>) {
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let town = Arc::new(factions::town());
    let mafia = Arc::new(factions::mafia());
    let ids = roster()
        .into_iter()
        .enumerate()
        .map(|(i, (role, is_mafia))| {
            let alignment = if is_mafia { mafia.clone() } else { town.clone() };
            game.add_player(format!("P{i}"), role, alignment).unwrap()
        })
        .collect();
    (game, ids)
}

/// Queue every seat's choice; `None` skips the seat. The last entry is the
/// mafia kill target.
fn queue_night(game: &mut Game, ids: &[PlayerId], choices: &[Option<usize>], kill: Option<usize>) {
    let resolver = Resolver::new();
    for (&actor, choice) in ids.iter().zip(choices) {
        let Some(t) = choice else { continue };
        let target = ids[t % ids.len()];
        let Some(ability) = game[actor].actions().first().cloned() else { continue };
        if !ability.check(game, actor, Some(&[target])) {
            continue;
        }
        let visit = resolver
            .make_visit(game, actor, Some(&[target]), AbilityType::Action, 0, &[])
            .unwrap();
        game.queue_visit(visit);
    }
    if let Some(k) = kill {
        let actor = ids[6];
        let target = ids[k % ids.len()];
        if game[actor].shared_actions()[0].check(game, actor, Some(&[target])) {
            let visit = resolver
                .make_visit(game, actor, Some(&[target]), AbilityType::SharedAction, 0, &[tags::FACTIONAL])
                .unwrap();
            game.queue_visit(visit);
        }
    }
    resolver.add_passives(game).unwrap();
}

fn resolve(game: &mut Game) -> Result<GameSnapshot, String> {
    Resolver::new()
        .resolve_game(game)
        .map(|()| game.snapshot())
        .map_err(|e| e.to_string())
}

fn night_strategy() -> impl Strategy<Value = (Vec<Option<usize>>, Option<usize>)> {
    (
        prop::collection::vec(prop::option::of(0usize..8), 8),
        prop::option::of(0usize..8),
    )
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    /// Test that resolving the same night twice gives identical games.
    #[test]
    fn prop_resolution_is_deterministic((choices, kill) in night_strategy()) {
        let (mut game, ids) = seat_players();
        queue_night(&mut game, &ids, &choices, kill);
        let mut fork = game.clone();

        prop_assert_eq!(resolve(&mut game), resolve(&mut fork));
    }

    /// Test that settled statuses never change and a finished night leaves
    /// nothing pending.
    #[test]
    fn prop_statuses_are_monotonic((choices, kill) in night_strategy()) {
        let (mut game, ids) = seat_players();
        queue_night(&mut game, &ids, &choices, kill);

        if let Ok(first) = resolve(&mut game) {
            for visit in &first.visits {
                prop_assert_ne!(visit.status, VisitStatus::Pending);
            }
            let second = resolve(&mut game).unwrap();
            for (a, b) in first.visits.iter().zip(&second.visits) {
                prop_assert_eq!(a.status, b.status);
            }
        }
    }
}

// =============================================================================
// Queueing
// =============================================================================

/// Test that a visit with the wrong number of targets is rejected.
#[test]
fn test_target_arity_enforced() {
    let (game, ids) = seat_players();
    let err = Resolver::new()
        .make_visit(&game, ids[0], Some(&[ids[1], ids[2]]), AbilityType::Action, 0, &[])
        .unwrap_err();
    assert_eq!(
        err,
        GameError::TargetArity {
            ability: "Cop".into(),
            expected: 1,
            actual: 2
        }
    );
}

/// Test that omitted targets default to the actor.
#[test]
fn test_omitted_targets_are_self() {
    let (game, ids) = seat_players();
    let visit = Resolver::new()
        .make_visit(&game, ids[0], None, AbilityType::Action, 0, &[])
        .unwrap();
    assert_eq!(visit.targets.as_slice(), &[ids[0]]);
    assert!(visit.is_self_target());
}

/// Test that unknown players are rejected.
#[test]
fn test_unknown_player_rejected() {
    let (game, ids) = seat_players();
    let ghost = PlayerId::new(99);
    let resolver = Resolver::new();
    assert_eq!(
        resolver
            .make_visit(&game, ghost, None, AbilityType::Action, 0, &[])
            .unwrap_err(),
        GameError::UnknownPlayer(ghost)
    );
    assert_eq!(
        resolver
            .make_visit(&game, ids[0], Some(&[ghost]), AbilityType::Action, 0, &[])
            .unwrap_err(),
        GameError::UnknownPlayer(ghost)
    );
}

/// Test that queueing the same ability again replaces the earlier choice.
#[test]
fn test_requeue_replaces() {
    let (mut game, ids) = seat_players();
    let resolver = Resolver::new();
    let first = resolver
        .make_visit(&game, ids[0], Some(&[ids[6]]), AbilityType::Action, 0, &[])
        .unwrap();
    let second = resolver
        .make_visit(&game, ids[0], Some(&[ids[7]]), AbilityType::Action, 0, &[])
        .unwrap();
    game.queue_visit(first);
    game.queue_visit(second);

    let queued: Vec<_> = game.visits_by(ids[0]).collect();
    assert_eq!(queued.len(), 1);
    assert_eq!(queued[0].target(), ids[7]);
}

/// Test that the faction submits one kill no matter who sends it.
#[test]
fn test_shared_action_replaced_across_faction() {
    let (mut game, ids) = seat_players();
    let resolver = Resolver::new();
    for (actor, target) in [(ids[6], ids[0]), (ids[7], ids[1])] {
        let visit = resolver
            .make_visit(&game, actor, Some(&[target]), AbilityType::SharedAction, 0, &[])
            .unwrap();
        game.queue_visit(visit);
    }

    let kills: Vec<_> = game.active_visits().filter(|v| v.has_tag(tags::KILL)).collect();
    assert_eq!(kills.len(), 1);
    assert_eq!(kills[0].actor, ids[7]);
    assert_eq!(kills[0].target(), ids[1]);
}

/// Test that a dequeued action is not resolved.
#[test]
fn test_dequeue() {
    let (mut game, ids) = seat_players();
    let resolver = Resolver::new();
    let visit = resolver
        .make_visit(&game, ids[0], Some(&[ids[6]]), AbilityType::Action, 0, &[])
        .unwrap();
    game.queue_visit(visit);

    let removed = game.dequeue(ids[0], AbilityType::Action, 0).unwrap();
    assert!(removed.is_some());
    assert!(game.dequeue(ids[0], AbilityType::Action, 0).unwrap().is_none());
    assert!(game.dequeue(ids[0], AbilityType::Action, 3).is_err());

    resolver.resolve_game(&mut game).unwrap();
    assert!(game[ids[0]].private_messages().is_empty());
}

// =============================================================================
// Snapshots
// =============================================================================

/// Test that a resolved night's snapshot survives a JSON round trip.
#[test]
fn test_snapshot_json() {
    let (mut game, ids) = seat_players();
    queue_night(&mut game, &ids, &[Some(6), Some(0), None, None, None, None, None, None], Some(0));
    let snapshot = resolve(&mut game).unwrap();

    let json = serde_json::to_string(&snapshot).unwrap();
    let back: GameSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(back, snapshot);
    assert_eq!(back.players[0].private_messages[0].content, "P6 is not aligned with the Town!.");
    assert!(back.players[0].death_causes.is_empty());
}
