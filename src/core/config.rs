//! Game configuration: phases and the phase cycle.
//!
//! A game walks through `phase_order` repeatedly; wrapping past the last
//! phase starts the next day. Which phases allow public chat and which
//! hold an elimination vote are configured alongside.
//!
//! ## Example
//!
//! ```
//! use mafia_engine::core::{GameConfig, Phase};
//!
//! // Night-start game
//! let config = GameConfig::new()
//!     .with_start_day(0)
//!     .with_start_phase(Phase::Night);
//! assert!(config.validate().is_ok());
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Game phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Day,
    Night,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Day => write!(f, "Day"),
            Phase::Night => write!(f, "Night"),
        }
    }
}

/// Configuration for a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Day number the game starts on.
    pub start_day: u32,

    /// Phase the game starts in. `None` means the first of `phase_order`.
    pub start_phase: Option<Phase>,

    /// Phase cycle for one day. Must be non-empty.
    pub phase_order: Vec<Phase>,

    /// Phases in which living players may post in the global chat.
    pub chat_phases: BTreeSet<Phase>,

    /// Phases in which elimination votes are held.
    pub voting_phases: BTreeSet<Phase>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            start_day: 1,
            start_phase: None,
            phase_order: vec![Phase::Day, Phase::Night],
            chat_phases: BTreeSet::from([Phase::Day]),
            voting_phases: BTreeSet::from([Phase::Day]),
        }
    }
}

impl GameConfig {
    /// Day-start game on day 1 with chat and voting during the day.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start_day(mut self, day: u32) -> Self {
        self.start_day = day;
        self
    }

    #[must_use]
    pub fn with_start_phase(mut self, phase: Phase) -> Self {
        self.start_phase = Some(phase);
        self
    }

    #[must_use]
    pub fn with_phase_order(mut self, order: impl IntoIterator<Item = Phase>) -> Self {
        self.phase_order = order.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_chat_phases(mut self, phases: impl IntoIterator<Item = Phase>) -> Self {
        self.chat_phases = phases.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_voting_phases(mut self, phases: impl IntoIterator<Item = Phase>) -> Self {
        self.voting_phases = phases.into_iter().collect();
        self
    }

    /// Index of `phase` in the phase order.
    pub fn phase_index(&self, phase: Phase) -> Result<usize, GameError> {
        self.phase_order
            .iter()
            .position(|&p| p == phase)
            .ok_or(GameError::UnknownPhase(phase))
    }

    /// Check the configuration is usable and return the starting phase index.
    pub fn validate(&self) -> Result<usize, GameError> {
        if self.phase_order.is_empty() {
            return Err(GameError::Config("phase order is empty"));
        }
        match self.start_phase {
            Some(phase) => self.phase_index(phase),
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.start_day, 1);
        assert_eq!(config.phase_order, vec![Phase::Day, Phase::Night]);
        assert!(config.chat_phases.contains(&Phase::Day));
        assert!(!config.voting_phases.contains(&Phase::Night));
        assert_eq!(config.validate(), Ok(0));
    }

    #[test]
    fn test_start_phase_index() {
        let config = GameConfig::new().with_start_phase(Phase::Night);
        assert_eq!(config.validate(), Ok(1));
    }

    #[test]
    fn test_empty_phase_order_rejected() {
        let config = GameConfig::new().with_phase_order(Vec::new());
        assert!(matches!(config.validate(), Err(GameError::Config(_))));
    }

    #[test]
    fn test_start_phase_outside_order_rejected() {
        let config = GameConfig::new()
            .with_phase_order([Phase::Night])
            .with_start_phase(Phase::Day);
        assert_eq!(config.validate(), Err(GameError::UnknownPhase(Phase::Day)));
    }

    #[test]
    fn test_config_serialization() {
        let config = GameConfig::new().with_voting_phases([Phase::Day, Phase::Night]);
        let json = serde_json::to_string(&config).unwrap();
        let back: GameConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
