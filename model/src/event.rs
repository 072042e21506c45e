use std::{collections::BTreeMap, fmt::Display};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{game_info::Winner, role::Role};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Start,
    Night,
    Morning,
    Day,
    Voting,
    End,
}

impl Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Start => write!(f, "start"),
            Phase::Night => write!(f, "night"),
            Phase::Morning => write!(f, "morning"),
            Phase::Day => write!(f, "day"),
            Phase::Voting => write!(f, "voting"),
            Phase::End => write!(f, "end"),
        }
    }
}

/// Typed payload of an event. On the wire the variant name becomes
/// `event_type` and the fields become the `data` object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    PhaseStart {
        phase: Phase,
    },
    PhaseEnd {
        phase: Phase,
    },
    GuardianAction {
        guardian: String,
        protected: String,
    },
    WerewolfTarget {
        targets: BTreeMap<String, String>,
    },
    SeerCheck {
        seer: String,
        target: String,
    },
    SeerResult {
        seer: String,
        target: String,
        result: String,
    },
    WitchSave {
        witch: String,
        target: String,
        saved: bool,
    },
    WitchPoison {
        witch: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
        used: bool,
    },
    DeathAnnouncement {
        player: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    SafeNight {
        message: String,
    },
    LastWords {
        player: String,
        statement: String,
    },
    AlivePlayers {
        players: Vec<String>,
    },
    Discussion {
        speaker: String,
        statement: String,
    },
    Vote {
        voter: String,
        target: String,
    },
    Elimination {
        player: String,
        role: Option<Role>,
    },
    HunterSkill {
        hunter: String,
        target: String,
    },
    GameEnd {
        winner: Winner,
        message: String,
    },
}

impl EventKind {
    pub fn event_type(&self) -> &'static str {
        match self {
            EventKind::PhaseStart { .. } => "phase_start",
            EventKind::PhaseEnd { .. } => "phase_end",
            EventKind::GuardianAction { .. } => "guardian_action",
            EventKind::WerewolfTarget { .. } => "werewolf_target",
            EventKind::SeerCheck { .. } => "seer_check",
            EventKind::SeerResult { .. } => "seer_result",
            EventKind::WitchSave { .. } => "witch_save",
            EventKind::WitchPoison { .. } => "witch_poison",
            EventKind::DeathAnnouncement { .. } => "death_announcement",
            EventKind::SafeNight { .. } => "safe_night",
            EventKind::LastWords { .. } => "last_words",
            EventKind::AlivePlayers { .. } => "alive_players",
            EventKind::Discussion { .. } => "discussion",
            EventKind::Vote { .. } => "vote",
            EventKind::Elimination { .. } => "elimination",
            EventKind::HunterSkill { .. } => "hunter_skill",
            EventKind::GameEnd { .. } => "game_end",
        }
    }

    /// The player whose death this event records, for the event types that
    /// count as a death when projecting state.
    pub fn death_of(&self) -> Option<&str> {
        match self {
            EventKind::DeathAnnouncement { player, .. } | EventKind::Elimination { player, .. } => {
                Some(player)
            }
            _ => None,
        }
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let string = match self {
            EventKind::PhaseStart { phase } => format!("{phase} begins"),
            EventKind::PhaseEnd { phase } => format!("{phase} ends"),
            EventKind::GuardianAction {
                guardian,
                protected,
            } => format!("{guardian} protects {protected}"),
            EventKind::WerewolfTarget { targets } => format!(
                "Werewolves target: {}",
                targets
                    .iter()
                    .map(|(wolf, target)| format!("{wolf} -> {target}"))
                    .join(", ")
            ),
            EventKind::SeerCheck { seer, target } => format!("{seer} checks {target}"),
            EventKind::SeerResult {
                seer,
                target,
                result,
            } => format!("{seer} learned {target} is {result}"),
            EventKind::WitchSave {
                witch,
                target,
                saved: true,
            } => format!("{witch} saves {target}"),
            EventKind::WitchSave {
                witch,
                target,
                saved: false,
            } => format!("{witch} does not save {target}"),
            EventKind::WitchPoison {
                witch,
                target: Some(target),
                used: true,
            } => format!("{witch} poisons {target}"),
            EventKind::WitchPoison { witch, used, .. } => {
                if *used {
                    format!("{witch} uses poison")
                } else {
                    format!("{witch} does not use poison")
                }
            }
            EventKind::DeathAnnouncement { player, reason } => match reason {
                Some(reason) => format!("{player} died during the night ({reason})"),
                None => format!("{player} died during the night"),
            },
            EventKind::SafeNight { message } => message.clone(),
            EventKind::LastWords { player, statement } => {
                format!("{player}'s last words: {statement}")
            }
            EventKind::AlivePlayers { players } => {
                format!("Alive players: {}", players.iter().join(", "))
            }
            EventKind::Discussion { speaker, statement } => format!("{speaker}: {statement}"),
            EventKind::Vote { voter, target } => format!("{voter} votes for {target}"),
            EventKind::Elimination { player, role } => match role {
                Some(role) => format!("{player} was eliminated ({role})"),
                None => format!("{player} was eliminated"),
            },
            EventKind::HunterSkill { hunter, target } => format!("{hunter} shoots {target}"),
            EventKind::GameEnd { message, .. } => message.clone(),
        };
        write!(f, "{}", string)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub round_num: u32,
    pub phase: Phase,
    #[serde(flatten)]
    pub kind: EventKind,
    #[serde(rename = "timestamp")]
    pub sequence_index: usize,
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "#{} [round {} {}] {}",
            self.sequence_index, self.round_num, self.phase, self.kind
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_shape() {
        let event = Event {
            round_num: 1,
            phase: Phase::Morning,
            kind: EventKind::DeathAnnouncement {
                player: "Bob".to_string(),
                reason: None,
            },
            sequence_index: 3,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "round_num": 1,
                "phase": "morning",
                "event_type": "death_announcement",
                "data": { "player": "Bob" },
                "timestamp": 3,
            })
        );
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn test_elimination_keeps_null_role() {
        let kind = EventKind::Elimination {
            player: "Eve".to_string(),
            role: None,
        };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "event_type": "elimination",
                "data": { "player": "Eve", "role": null },
            })
        );
    }

    #[test]
    fn test_event_type_names_match_serde_tags() {
        let kinds = vec![
            EventKind::PhaseStart { phase: Phase::Night },
            EventKind::WerewolfTarget {
                targets: BTreeMap::from([("Alice".to_string(), "Bob".to_string())]),
            },
            EventKind::WitchPoison {
                witch: "Wendy".to_string(),
                target: None,
                used: false,
            },
            EventKind::HunterSkill {
                hunter: "Hank".to_string(),
                target: "Ivy".to_string(),
            },
        ];
        for kind in kinds {
            let json = serde_json::to_value(&kind).unwrap();
            assert_eq!(json["event_type"], kind.event_type());
        }
    }

    #[test]
    fn test_death_of_only_counts_announcements_and_eliminations() {
        let death = EventKind::DeathAnnouncement {
            player: "Bob".to_string(),
            reason: Some("werewolf".to_string()),
        };
        let shot = EventKind::HunterSkill {
            hunter: "Hank".to_string(),
            target: "Bob".to_string(),
        };
        assert_eq!(death.death_of(), Some("Bob"));
        assert_eq!(shot.death_of(), None);
    }

    #[test]
    fn test_event_display() {
        let event = Event {
            round_num: 2,
            phase: Phase::Voting,
            kind: EventKind::Vote {
                voter: "Alice".to_string(),
                target: "Bob".to_string(),
            },
            sequence_index: 7,
        };
        assert_eq!(event.to_string(), "#7 [round 2 voting] Alice votes for Bob");
    }
}
