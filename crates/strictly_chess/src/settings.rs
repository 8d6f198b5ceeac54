//! Widget configuration inputs.

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

use crate::arbiter::PlayerRoster;

/// Externally configured board options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct BoardSettings {
    /// Black's side is drawn at the bottom.
    pub reversed: bool,
    /// White moves with the pointer.
    pub white_player_human: bool,
    /// Black moves with the pointer.
    pub black_player_human: bool,
    /// Draw the last-move arrow.
    pub last_move_visible: bool,
    /// Draw file and rank labels in the margin.
    pub coordinates_visible: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            reversed: false,
            white_player_human: true,
            black_player_human: true,
            last_move_visible: true,
            coordinates_visible: true,
        }
    }
}

impl BoardSettings {
    /// Humanness lookup for the turn arbiter.
    pub fn roster(&self) -> PlayerRoster {
        PlayerRoster::new(self.white_player_human, self.black_player_human)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_setters() {
        let settings = BoardSettings::default()
            .with_reversed(true)
            .with_black_player_human(false);
        assert!(settings.reversed);
        assert!(settings.white_player_human);
        assert!(!settings.black_player_human);
        assert_eq!(settings.roster(), PlayerRoster::new(true, false));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let settings: BoardSettings = serde_json::from_str(r#"{"reversed": true}"#).unwrap();
        assert!(settings.reversed);
        assert!(settings.last_move_visible);
        assert!(settings.coordinates_visible);
    }
}
