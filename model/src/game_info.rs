use std::fmt::Display;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    Werewolves,
    Villagers,
    Unknown,
}

impl Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Werewolves => write!(f, "werewolves"),
            Winner::Villagers => write!(f, "villagers"),
            Winner::Unknown => write!(f, "unknown"),
        }
    }
}

impl Winner {
    pub fn announcement(&self) -> &'static str {
        match self {
            Winner::Werewolves => "Werewolves win!",
            Winner::Villagers => "Villagers win!",
            Winner::Unknown => "Game over",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_type: Option<String>,
    #[serde(default)]
    pub player_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub werewolf_team: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds_played: Option<u32>,
}

impl Display for GameMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} game with {} players [{}], winner: {}, rounds: {}",
            self.game_type.as_deref().unwrap_or("unknown"),
            self.player_names.len(),
            self.player_names.iter().join(", "),
            self.winner.map_or_else(|| "undecided".to_string(), |w| w.to_string()),
            self.rounds_played
                .map_or_else(|| "?".to_string(), |r| r.to_string()),
        )
    }
}
