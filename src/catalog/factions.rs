//! Standard alignments.

use super::abilities::Kill;
use crate::core::tags;
use crate::core::{Game, GameError, PlayerId};
use crate::roles::{Alignment, WinCondition};

/// The uninformed majority.
#[must_use]
pub fn town() -> Alignment {
    Alignment::new("Town")
        .with_tags(&[tags::TOWN])
        .with_demonym("{alignment}ie")
        .with_win(WinCondition::Faction)
}

/// Id of the Mafia's shared kill, and the death cause it leaves.
pub const MAFIA_KILL: &str = "Mafia Factional Kill";

/// The informed minority, sharing one kill per night and a faction chat.
#[must_use]
pub fn mafia() -> Alignment {
    Alignment::new("Mafia")
        .with_shared_action(Kill::new(
            MAFIA_KILL,
            &[tags::KILL, tags::FACTIONAL_KILL],
        ))
        .with_tags(&[tags::MAFIA, tags::CHAT, tags::INFORMED])
        .with_demonym("Mafioso")
        .with_role_name("Vanilla", "{alignment} Goon")
        .with_win(WinCondition::Faction)
        .with_init(join_faction_chat)
}

/// A lone killer who wins by outlasting everyone.
#[must_use]
pub fn serial_killer() -> Alignment {
    Alignment::new("Serial Killer")
        .with_action(Kill::new(
            "Serial Killer",
            &[tags::KILL, tags::FACTIONAL_KILL],
        ))
        .with_tags(&[tags::THIRD_PARTY])
        .with_role_name("Vanilla", "{alignment}")
        .with_win(WinCondition::LastStanding)
}

/// Chat id of an alignment's private chat.
#[must_use]
pub fn faction_chat(alignment_id: &str) -> String {
    format!("faction:{alignment_id}")
}

/// Whether `chat_id` names an alignment's private chat.
#[must_use]
pub fn is_faction_chat(chat_id: &str) -> bool {
    chat_id.starts_with("faction:")
}

fn join_faction_chat(game: &mut Game, player: PlayerId, alignment_id: &str) -> Result<(), GameError> {
    let line = format!("{} is a {}.", game[player].name(), game[player].role_name());
    game.join_private_chat(&faction_chat(alignment_id), player)?
        .send(alignment_id, line);
    Ok(())
}
