//! Standard roles.
//!
//! Each function builds a fresh role with its own ability instances. Give
//! the same `Role` value (or clones of it) to several players when they
//! should share ability identity.

use super::abilities::{
    neighborhood, Audience, Blocks, Commute, Empower, Gift, Hide, Inform, Inherit, Investigate,
    Kill, Lens, Message, Neighborize, Roleblock, Shield, Vouch,
};
use crate::core::tags;
use crate::core::{Game, GameError, PlayerId};
use crate::modifiers::Modifier;
use crate::roles::{NamedRole, Role};

/// No abilities.
#[must_use]
pub fn vanilla() -> Role {
    NamedRole::new("Vanilla").adjective().into()
}

// === Investigative ===

/// Learns whether the target is aligned with the Town.
#[must_use]
pub fn cop() -> Role {
    NamedRole::new("Cop")
        .with_action(Investigate::new("Cop", Lens::Alignment))
        .with_tags(&[tags::GUN])
        .into()
}

/// Learns whom the target visited.
#[must_use]
pub fn tracker() -> Role {
    NamedRole::new("Tracker")
        .with_action(Investigate::new("Tracker", Lens::Targets))
        .into()
}

/// Learns who visited the target.
#[must_use]
pub fn watcher() -> Role {
    NamedRole::new("Watcher")
        .with_action(Investigate::new("Watcher", Lens::Visitors))
        .into()
}

/// Learns whether the target has ever tried to kill.
#[must_use]
pub fn detective() -> Role {
    NamedRole::new("Detective")
        .with_action(Investigate::new("Detective", Lens::Killer))
        .into()
}

#[must_use]
pub fn neapolitan() -> Role {
    NamedRole::new("Neapolitan")
        .with_action(Investigate::new("Neapolitan", Lens::VanillaTownie))
        .into()
}

#[must_use]
pub fn vanilla_cop() -> Role {
    NamedRole::new("Vanilla Cop")
        .with_action(Investigate::new("Vanilla Cop", Lens::Vanilla))
        .into()
}

#[must_use]
pub fn rolecop() -> Role {
    NamedRole::new("Rolecop")
        .with_action(Investigate::new("Rolecop", Lens::Role))
        .into()
}

#[must_use]
pub fn gunsmith() -> Role {
    NamedRole::new("Gunsmith")
        .with_action(Investigate::new("Gunsmith", Lens::Gun))
        .into()
}

#[must_use]
pub fn goon_cop() -> Role {
    NamedRole::new("Goon Cop")
        .with_action(Investigate::new("Goon Cop", Lens::Goon))
        .into()
}

/// Learns whether the target visited or was visited, without telling which.
#[must_use]
pub fn motion_detector() -> Role {
    NamedRole::new("Motion Detector")
        .with_action(Investigate::new("Motion Detector", Lens::Motion))
        .into()
}

/// Learns whether the target visited anyone tonight.
#[must_use]
pub fn reporter() -> Role {
    NamedRole::new("Reporter")
        .with_action(Investigate::new("Reporter", Lens::Reporter))
        .into()
}

/// Learns the roles of everyone who visited the target.
#[must_use]
pub fn role_watcher() -> Role {
    NamedRole::new("Role Watcher")
        .with_action(Investigate::new("Role Watcher", Lens::VisitorRoles))
        .into()
}

/// Learns whether the target is in a private chat.
#[must_use]
pub fn pt_cop() -> Role {
    NamedRole::new("PT Cop")
        .with_action(Investigate::new("PT Cop", Lens::PrivateChat))
        .into()
}

/// Learns whether the target can talk to anyone privately, through a chat
/// with another living player or a messaging ability.
#[must_use]
pub fn traffic_analyst() -> Role {
    NamedRole::new("Traffic Analyst")
        .with_action(Investigate::new("Traffic Analyst", Lens::Traffic))
        .into()
}

// === Protective ===

/// Saves the target from one kill.
#[must_use]
pub fn doctor() -> Role {
    NamedRole::new("Doctor")
        .with_action(
            Shield::protect("Doctor")
                .with_limit(1)
                .with_tags(&[tags::MAFIA_NO_GUN]),
        )
        .into()
}

/// A Doctor who can only save Vanilla players.
#[must_use]
pub fn medical_student() -> Role {
    NamedRole::new("Medical Student")
        .with_action(
            Shield::protect("Medical Student")
                .with_limit(1)
                .with_tags(&[tags::MAFIA_NO_GUN])
                .only_for("Vanilla"),
        )
        .into()
}

/// Saves the target from one kill and dies doing it.
#[must_use]
pub fn bodyguard() -> Role {
    NamedRole::new("Bodyguard")
        .with_action(Shield::protect("Bodyguard").with_limit(1).lethal())
        .into()
}

/// Survives every stoppable kill.
#[must_use]
pub fn bulletproof() -> Role {
    NamedRole::new("Bulletproof")
        .with_passive(Shield::protect("Bulletproof"))
        .adjective()
        .into()
}

/// Protects and roleblocks the target.
#[must_use]
pub fn jailkeeper() -> Role {
    NamedRole::new("Jailkeeper")
        .with_action(Shield::protect("Jailkeeper").roleblocking())
        .into()
}

/// Cannot be protected.
#[must_use]
pub fn macho() -> Role {
    NamedRole::new("Macho")
        .with_passive(Shield::new(
            "Macho",
            Blocks::Protection,
            &[tags::MACHO, tags::ROLESTOP],
        ))
        .adjective()
        .into()
}

/// Immune to everything but kills.
#[must_use]
pub fn ascetic() -> Role {
    NamedRole::new("Ascetic")
        .with_passive(Shield::new("Ascetic", Blocks::NonKills, &[tags::ROLESTOP]))
        .adjective()
        .into()
}

/// Stops the target's kills and dies in their victim's place.
#[must_use]
pub fn shield() -> Role {
    NamedRole::new("Shield")
        .with_action(Shield::protect("Shield").intercepting().lethal())
        .into()
}

/// Hides behind the target. Safe from direct kills, but dies with the target.
#[must_use]
pub fn hider() -> Role {
    NamedRole::new("Hider").with_action(Hide::new("Hider")).into()
}

/// Stays home and fails every visit to them.
#[must_use]
pub fn commuter() -> Role {
    NamedRole::new("Commuter")
        .with_action(Commute::new("Commuter"))
        .into()
}

// === Blocking ===

#[must_use]
pub fn roleblocker() -> Role {
    NamedRole::new("Roleblocker")
        .with_action(Roleblock::new("Roleblocker"))
        .into()
}

/// Fails every visit to the target.
#[must_use]
pub fn rolestopper() -> Role {
    NamedRole::new("Rolestopper")
        .with_action(Shield::new("Rolestopper", Blocks::All, &[tags::ROLESTOP]))
        .into()
}

/// Roleblocks the target and fails every visit to them.
#[must_use]
pub fn alien() -> Role {
    NamedRole::new("Alien")
        .with_action(Shield::new("Alien", Blocks::All, &[tags::ROLESTOP]).roleblocking())
        .into()
}

// === Killing ===

#[must_use]
pub fn vigilante() -> Role {
    NamedRole::new("Vigilante")
        .with_action(Kill::new("Vigilante", &[tags::KILL, tags::GUN]))
        .into()
}

/// Makes the user's factional kill unstoppable.
#[must_use]
pub fn juggernaut() -> Role {
    NamedRole::new("Juggernaut")
        .with_passive(Empower::juggernaut("Juggernaut"))
        .into()
}

/// Hides the user's factional kill from trackers and watchers.
#[must_use]
pub fn ninja() -> Role {
    NamedRole::new("Ninja")
        .with_passive(Empower::ninja("Ninja"))
        .into()
}

// === Compound ===

/// One use each of Cop, Vigilante, Doctor and Roleblocker.
#[must_use]
pub fn jack_of_all_trades() -> Role {
    let once = Modifier::XShot(1);
    let trades = [cop(), vigilante(), doctor(), roleblocker()];
    let id = trades
        .iter()
        .fold(String::from("Jack of All Trades"), |id, role| format!("{id} {}", role.id()));
    Role::combine_as(id, trades.into_iter().map(|role| role.layered(&once)))
}

/// Inherits the abilities of the first allied power role to die.
#[must_use]
pub fn universal_backup() -> Role {
    NamedRole::new("Universal Backup")
        .with_passive(Inherit::new("Universal Backup"))
        .into()
}

// === Communication ===

#[must_use]
pub fn friendly_neighbor() -> Role {
    NamedRole::new("Friendly Neighbor")
        .with_action(Inform::new("Friendly Neighbor", Audience::Target))
        .into()
}

/// May reveal their alignment to everyone once, at any time.
#[must_use]
pub fn innocent_child() -> Role {
    NamedRole::new("Innocent Child")
        .with_action(Inform::new("Innocent Child", Audience::Everyone))
        .into()
}

/// Told once that `informed` is aligned with the Town.
///
/// Needs a player, so it is not in the standard catalog.
#[must_use]
pub fn companion(informed: PlayerId) -> Role {
    NamedRole::new("Companion")
        .with_action(Vouch::new("Companion", informed))
        .into()
}

/// Masons know each other and share the `Mason` chat.
#[must_use]
pub fn mason() -> Role {
    NamedRole::new("Mason")
        .with_tags(&[tags::CHAT, tags::INFORMED])
        .with_init(join_masons)
        .into()
}

fn join_masons(game: &mut Game, player: PlayerId, role_id: &str) -> Result<(), GameError> {
    let line = format!("{} is a {}.", game[player].name(), game[player].role_name());
    game.join_private_chat(role_id, player)?.send(role_id, line);
    Ok(())
}

/// Neighbors share the `Neighbor` chat without learning each other's
/// alignment.
#[must_use]
pub fn neighbor() -> Role {
    NamedRole::new("Neighbor")
        .with_tags(&[tags::CHAT])
        .with_init(join_neighbors)
        .into()
}

fn join_neighbors(game: &mut Game, player: PlayerId, role_id: &str) -> Result<(), GameError> {
    let line = format!("{} is a {role_id}.", game[player].name());
    game.join_private_chat(role_id, player)?.send(role_id, line);
    Ok(())
}

/// Owns a neighborhood chat and may add one player to it each night.
#[must_use]
pub fn neighborizer() -> Role {
    NamedRole::new("Neighborizer")
        .with_action(Neighborize::new("Neighborizer"))
        .with_tags(&[tags::CHAT])
        .with_init(open_neighborhood)
        .into()
}

fn open_neighborhood(game: &mut Game, player: PlayerId, role_id: &str) -> Result<(), GameError> {
    let name = game[player].name().to_string();
    let chat_id = neighborhood(role_id, &name);
    game.join_private_chat(&chat_id, player)?
        .send(role_id, format!("{name} is a {role_id}."));
    Ok(())
}

/// Sends the target an anonymous message.
#[must_use]
pub fn messenger() -> Role {
    NamedRole::new("Messenger")
        .with_action(Message::new("Messenger"))
        .into()
}

#[must_use]
pub fn fruit_vendor() -> Role {
    NamedRole::new("Fruit Vendor")
        .with_action(Gift::new("Fruit Vendor", "You were given fruit."))
        .into()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::factions;
    use crate::core::{GameConfig, Phase};

    #[test]
    fn test_masons_share_chat_and_know_each_other() {
        let mut game = Game::new(GameConfig::new().with_start_phase(Phase::Night)).unwrap();
        let town = Arc::new(factions::town());
        let masons = mason();
        let a = game.add_player("Alice", masons.clone(), town.clone()).unwrap();
        let b = game.add_player("Bob", masons, town.clone()).unwrap();
        let c = game.add_player("Carol", vanilla(), town).unwrap();

        assert!(game[a].knows(b));
        assert!(game[b].knows(a));
        assert!(!game[a].knows(c));

        let chat = game.chat("Mason").unwrap();
        let lines: Vec<_> = chat.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(lines, ["Alice is a Town Mason.", "Bob is a Town Mason."]);
        assert!(!chat.has_participant(c));
    }

    #[test]
    fn test_neighborizer_opens_own_chat() {
        let mut game = Game::new(GameConfig::new()).unwrap();
        let a = game
            .add_player("Alice", neighborizer(), Arc::new(factions::town()))
            .unwrap();

        let chat = game.chat("Neighborizer:Alice").unwrap();
        assert!(chat.has_participant(a));
        assert_eq!(chat.last().unwrap().content, "Alice is a Neighborizer.");
    }

    #[test]
    fn test_neighbors_share_chat_without_alignment() {
        let mut game = Game::new(GameConfig::new()).unwrap();
        let a = game.add_player("Alice", neighbor(), Arc::new(factions::town())).unwrap();
        let e = game.add_player("Eve", neighbor(), Arc::new(factions::mafia())).unwrap();

        let chat = game.chat("Neighbor").unwrap();
        assert!(chat.has_participant(a) && chat.has_participant(e));
        let lines: Vec<_> = chat.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(lines, ["Alice is a Neighbor.", "Eve is a Neighbor."]);
        assert!(!game[a].knows(e));
    }

    #[test]
    fn test_jack_of_all_trades_is_one_shot_everything() {
        let role = jack_of_all_trades();
        assert_eq!(role.id(), "Jack of All Trades Cop Vigilante Doctor Roleblocker");
        assert_eq!(role.actions().len(), 4);
        assert!(role.actions().iter().all(|a| a.max_uses() == Some(1)));
        assert!(role.is_role("Cop") && role.is_role("1-Shot") && role.is_role("Roleblocker"));
        assert!(role.tags().contains(tags::GUN));
        assert_eq!(
            crate::roles::role_name(&role, &factions::town()),
            "Town Jack of All Trades Cop Vigilante Doctor Roleblocker"
        );
    }

    #[test]
    fn test_adjectives() {
        for role in [vanilla(), bulletproof(), macho(), ascetic()] {
            assert!(role.is_adjective(), "{role}");
        }
        for role in [cop(), doctor(), juggernaut(), mason(), universal_backup(), hider()] {
            assert!(!role.is_adjective(), "{role}");
        }
    }
}
