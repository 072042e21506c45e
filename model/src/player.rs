use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::role::{Role, RoleSource};

/// Position of a player in the registry. Stable for the lifetime of a model
/// because players are never removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub(crate) usize);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerStatus {
    #[default]
    Alive,
    Dead,
}

impl Display for PlayerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerStatus::Alive => write!(f, "alive"),
            PlayerStatus::Dead => write!(f, "dead"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub role: Role,
    pub status: PlayerStatus,
    pub death_round: Option<u32>,
    pub death_reason: Option<String>,
    #[serde(skip)]
    pub(crate) role_source: RoleSource,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: Role::Unknown,
            status: PlayerStatus::Alive,
            death_round: None,
            death_reason: None,
            role_source: RoleSource::Default,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }

    pub fn role_source(&self) -> RoleSource {
        self.role_source
    }
}

impl Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.death_round {
            Some(round) => write!(
                f,
                "{} ({}) dead since round {round}{}",
                self.name,
                self.role,
                self.death_reason
                    .as_deref()
                    .map_or_else(String::new, |reason| format!(": {reason}"))
            ),
            None => write!(f, "{} ({}) {}", self.name, self.role, self.status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_defaults() {
        let player = Player::new("Alice");
        assert_eq!(player.role, Role::Unknown);
        assert!(player.is_alive());
        assert_eq!(player.death_round, None);
        assert_eq!(player.role_source(), RoleSource::Default);
    }

    #[test]
    fn test_player_serializes_without_role_source() {
        let json = serde_json::to_value(Player::new("Bob")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Bob",
                "role": "unknown",
                "status": "alive",
                "death_round": null,
                "death_reason": null,
            })
        );
    }

    #[test]
    fn test_player_display() {
        let mut player = Player::new("Carol");
        assert_eq!(player.to_string(), "Carol (unknown) alive");
        player.status = PlayerStatus::Dead;
        player.death_round = Some(2);
        player.death_reason = Some("eliminated".to_string());
        assert_eq!(player.to_string(), "Carol (unknown) dead since round 2: eliminated");
    }
}
