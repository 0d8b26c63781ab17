//! Modifier composition tests.
//!
//! These tests cover applying modifiers through the public API: by id from
//! the catalog, stacked on roles and alignments, and the composition
//! errors they report.

use std::sync::Arc;

use mafia_engine::catalog::{factions, roles, Catalog};
use mafia_engine::core::{
    AbilityType, Game, GameConfig, ModifierError, Phase, VisitStatus, GLOBAL_CHAT,
};
use mafia_engine::modifiers::{Modifier, NightRule};
use mafia_engine::resolve::Resolver;
use mafia_engine::roles::{role_name, Role};

// =============================================================================
// Composition
// =============================================================================

/// Test applying modifiers looked up by id.
#[test]
fn test_modifiers_by_id() {
    let catalog = Catalog::standard();
    let mut role = catalog.role("Vigilante").unwrap();
    for id in ["2-Shot", "Odd Night"] {
        role = catalog.modifier(id).unwrap().apply_role(role).unwrap();
    }

    assert_eq!(role.id(), "Odd Night 2-Shot Vigilante");
    assert_eq!(role_name(&role, &factions::town()), "Town Odd Night 2-Shot Vigilante");
    assert_eq!(role.actions()[0].max_uses(), Some(2));
    assert!(role.is_role("Vigilante"));
    assert!(role.is_role("Odd Night"));
}

/// Test that composition errors surface when the modifier is applied.
#[test]
fn test_composition_errors() {
    let catalog = Catalog::standard();
    assert_eq!(catalog.modifier("0-Shot"), Err(ModifierError::ZeroUses));
    assert_eq!(
        catalog.modifier("Clumsy"),
        Err(ModifierError::Unknown("Clumsy".into()))
    );

    let vest = roles::bulletproof().passives()[0].clone();
    assert!(matches!(
        Modifier::Activated.apply_ability(vest),
        Err(ModifierError::Incompatible { .. })
    ));
}

/// Test that a modified alignment hands its modified abilities to members.
#[test]
fn test_modified_alignment_abilities() {
    let mafia = Modifier::Nights(NightRule::NotFirst)
        .apply_alignment(factions::mafia())
        .unwrap();
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let eve = game.add_player("Eve", roles::vanilla(), Arc::new(mafia)).unwrap();
    let bob = game
        .add_player("Bob", roles::vanilla(), Arc::new(factions::town()))
        .unwrap();

    let kill = game[eve].shared_actions()[0].clone();
    assert!(!kill.check(&game, eve, Some(&[bob])));
    game.set_time(2, Phase::Night).unwrap();
    assert!(kill.check(&game, eve, Some(&[bob])));
    assert_eq!(game[eve].role_name(), "Mafia Goon");
}

/// Test that combined roles keep each component's abilities separate.
#[test]
fn test_combined_modified_components() {
    let role = Role::combine([
        Modifier::XShot(1).apply_role(roles::cop()).unwrap(),
        roles::doctor(),
    ]);
    assert_eq!(role.id(), "1-Shot Cop Doctor");
    assert_eq!(role.actions()[0].max_uses(), Some(1));
    assert_eq!(role.actions()[1].max_uses(), None);
    assert!(role.is_role("1-Shot"));
    assert!(role.is_role("Doctor"));
}

// =============================================================================
// Behavior
// =============================================================================

/// Test a disloyal cop failing against their own alignment.
#[test]
fn test_disloyal_fails_on_own_alignment() {
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let town = Arc::new(factions::town());
    let disloyal = Modifier::Disloyal.apply_role(roles::cop()).unwrap();
    let alice = game.add_player("Alice", disloyal, town.clone()).unwrap();
    let bob = game.add_player("Bob", roles::vanilla(), town).unwrap();
    let eve = game
        .add_player("Eve", roles::vanilla(), Arc::new(factions::mafia()))
        .unwrap();

    let resolver = Resolver::new();
    let on_bob = resolver
        .make_visit(&game, alice, Some(&[bob]), AbilityType::Action, 0, &[])
        .unwrap();
    let on_bob = game.push_visit(on_bob);
    let on_eve = resolver
        .make_visit(&game, alice, Some(&[eve]), AbilityType::Action, 0, &[])
        .unwrap();
    let on_eve = game.push_visit(on_eve);
    resolver.resolve_game(&mut game).unwrap();

    assert_eq!(game.visit(on_bob).unwrap().status(), VisitStatus::Failure);
    assert_eq!(game.visit(on_eve).unwrap().status(), VisitStatus::Success);
}

/// Test that a non-consecutive night ability skips the following night.
#[test]
fn test_non_consecutive_night() {
    let mut game = Game::new(GameConfig::new()).unwrap();
    let town = Arc::new(factions::town());
    let role = Modifier::NonConsecutiveNight.apply_role(roles::doctor()).unwrap();
    let alice = game.add_player("Alice", role, town.clone()).unwrap();
    let bob = game.add_player("Bob", roles::vanilla(), town).unwrap();
    let resolver = Resolver::new();
    let doctor = game[alice].actions()[0].clone();

    game.set_time(1, Phase::Night).unwrap();
    assert!(doctor.check(&game, alice, Some(&[bob])));
    let visit = resolver
        .make_visit(&game, alice, Some(&[bob]), AbilityType::Action, 0, &[])
        .unwrap();
    game.queue_visit(visit);
    resolver.resolve_game(&mut game).unwrap();

    game.set_time(2, Phase::Night).unwrap();
    assert!(!doctor.check(&game, alice, Some(&[bob])));
    game.set_time(3, Phase::Night).unwrap();
    assert!(doctor.check(&game, alice, Some(&[bob])));
}

/// Test a night-listed ability.
#[test]
fn test_listed_nights() {
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let town = Arc::new(factions::town());
    let modifier: Modifier = "Night 1,3".parse().unwrap();
    let alice = game
        .add_player("Alice", modifier.apply_role(roles::cop()).unwrap(), town.clone())
        .unwrap();
    let bob = game.add_player("Bob", roles::vanilla(), town).unwrap();
    let cop = game[alice].actions()[0].clone();

    let usable: Vec<u32> = (1..=4)
        .filter(|&night| {
            game.set_time(night, Phase::Night).unwrap();
            cop.check(&game, alice, Some(&[bob]))
        })
        .collect();
    assert_eq!(usable, [1, 3]);
}

/// Test that a modified one-use reveal cannot be used a second time.
#[test]
fn test_modified_innocent_child_reveals_once() {
    let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
    let child = Modifier::Lazy.apply_role(roles::innocent_child()).unwrap();
    let alice = game
        .add_player("Alice", child, Arc::new(factions::town()))
        .unwrap();
    let resolver = Resolver::new();
    let reveal = game[alice].actions()[0].clone();

    assert!(reveal.check(&game, alice, None));
    let visit = resolver
        .make_visit(&game, alice, None, AbilityType::Action, 0, &[])
        .unwrap();
    game.queue_visit(visit);
    resolver.resolve_game(&mut game).unwrap();
    game.advance_phase();

    assert!(!reveal.check(&game, alice, None));
    let reveals = game
        .chat(GLOBAL_CHAT)
        .unwrap()
        .messages()
        .filter(|m| m.sender == "Innocent Child")
        .count();
    assert_eq!(reveals, 1);
}
