//! Player state as of a point in the event sequence.
//!
//! A player counts as dead from the first `death_announcement` or
//! `elimination` naming them. Roles are not replayed: the projected role is
//! the one the model ended up with.

use std::collections::HashMap;

use model::{EventModel, PlayerStatus, Role};
use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub status: PlayerStatus,
    pub role: Role,
}

impl PlayerSnapshot {
    pub fn is_alive(&self) -> bool {
        self.status == PlayerStatus::Alive
    }
}

fn role_of(model: &EventModel, name: &str) -> Role {
    model.player_by_name(name).map_or(Role::Unknown, |player| player.role)
}

/// Stateless projection: scans events `0..=event_index` for the first death
/// of `name`. Unknown players project as alive with an unknown role.
pub fn state_at_event(model: &EventModel, name: &str, event_index: usize) -> PlayerSnapshot {
    let died = model
        .events()
        .iter()
        .take_while(|event| event.sequence_index <= event_index)
        .any(|event| event.kind.death_of() == Some(name));
    PlayerSnapshot {
        status: if died {
            PlayerStatus::Dead
        } else {
            PlayerStatus::Alive
        },
        role: role_of(model, name),
    }
}

/// Projection backed by a precomputed index of each player's first death.
#[derive(Debug, Clone)]
pub struct StateProjector<'m> {
    model: &'m EventModel,
    first_death: HashMap<&'m str, usize>,
}

impl<'m> StateProjector<'m> {
    pub fn new(model: &'m EventModel) -> Self {
        let mut first_death = HashMap::new();
        for event in model.events() {
            if let Some(name) = event.kind.death_of() {
                first_death.entry(name).or_insert(event.sequence_index);
            }
        }
        Self { model, first_death }
    }

    pub fn model(&self) -> &'m EventModel {
        self.model
    }

    /// Index of the event at which `name` first died, if any.
    pub fn death_index(&self, name: &str) -> Option<usize> {
        self.first_death.get(name).copied()
    }

    pub fn state_at(&self, name: &str, event_index: usize) -> PlayerSnapshot {
        let dead = self
            .death_index(name)
            .is_some_and(|death| death <= event_index);
        PlayerSnapshot {
            status: if dead {
                PlayerStatus::Dead
            } else {
                PlayerStatus::Alive
            },
            role: role_of(self.model, name),
        }
    }

    /// Every registered player with their projected state, in registry order.
    pub fn roster_at(&self, event_index: usize) -> Vec<(&'m str, PlayerSnapshot)> {
        self.model
            .players()
            .iter()
            .map(|player| (player.name.as_str(), self.state_at(&player.name, event_index)))
            .collect()
    }

    pub fn alive_at(&self, event_index: usize) -> Vec<&'m str> {
        self.roster_at(event_index)
            .into_iter()
            .filter(|(_, snapshot)| snapshot.is_alive())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn dead_at(&self, event_index: usize) -> Vec<&'m str> {
        self.roster_at(event_index)
            .into_iter()
            .filter(|(_, snapshot)| !snapshot.is_alive())
            .map(|(name, _)| name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{EventKind, Phase, Role, RoleSource};

    fn model() -> EventModel {
        let mut model = EventModel::new();
        model.set_player_names(vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()]);
        model.upsert_player_role("Alice", Role::Werewolf, RoleSource::Declared);
        model.append_event(1, Phase::Night, EventKind::PhaseStart { phase: Phase::Night });
        model.append_event(
            1,
            Phase::Morning,
            EventKind::DeathAnnouncement {
                player: "Bob".to_string(),
                reason: None,
            },
        );
        model.append_event(
            1,
            Phase::Voting,
            EventKind::Vote {
                voter: "Carol".to_string(),
                target: "Alice".to_string(),
            },
        );
        model.append_event(
            1,
            Phase::Day,
            EventKind::Elimination {
                player: "Alice".to_string(),
                role: Some(Role::Werewolf),
            },
        );
        model.append_event(
            2,
            Phase::Morning,
            EventKind::DeathAnnouncement {
                player: "Alice".to_string(),
                reason: None,
            },
        );
        model
    }

    #[test]
    fn test_death_boundary() {
        let model = model();
        let projector = StateProjector::new(&model);
        assert_eq!(projector.death_index("Bob"), Some(1));
        assert!(projector.state_at("Bob", 0).is_alive());
        assert!(!projector.state_at("Bob", 1).is_alive());
        assert!(projector.state_at("Alice", 2).is_alive());
        assert!(!projector.state_at("Alice", 3).is_alive());
    }

    #[test]
    fn test_first_death_wins() {
        let model = model();
        let projector = StateProjector::new(&model);
        assert_eq!(projector.death_index("Alice"), Some(3));
    }

    #[test]
    fn test_both_entry_points_agree() {
        let model = model();
        let projector = StateProjector::new(&model);
        for name in ["Alice", "Bob", "Carol", "Nobody"] {
            for idx in 0..model.events().len() + 2 {
                assert_eq!(
                    projector.state_at(name, idx),
                    state_at_event(&model, name, idx),
                    "{name} at {idx}"
                );
            }
        }
    }

    #[test]
    fn test_unknown_player_is_alive_and_unknown() {
        let model = model();
        assert_eq!(
            state_at_event(&model, "Mallory", 10),
            PlayerSnapshot {
                status: PlayerStatus::Alive,
                role: Role::Unknown,
            }
        );
        let empty = EventModel::new();
        assert_eq!(StateProjector::new(&empty).state_at("Mallory", 0), PlayerSnapshot::default());
    }

    #[test]
    fn test_roster_lists() {
        let model = model();
        let projector = StateProjector::new(&model);
        assert_eq!(projector.alive_at(0), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(projector.alive_at(1), vec!["Alice", "Carol"]);
        assert_eq!(projector.dead_at(3), vec!["Alice", "Bob"]);
        let roster = projector.roster_at(3);
        assert_eq!(roster[0].1.role, Role::Werewolf);
    }
}
