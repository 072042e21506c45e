use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
};

use itertools::Itertools;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::{
    event::{Event, EventKind, Phase},
    game_info::{GameMetadata, Winner},
    player::{Player, PlayerId, PlayerStatus},
    role::{Role, RoleSource},
};

/// A parsed game: metadata, the player registry, and the append-only event
/// log. Every write goes through a method that upholds the invariants
/// (sequential indices, non-decreasing rounds, first death wins).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SerializedModel")]
pub struct EventModel {
    game_info: GameMetadata,
    #[serde(serialize_with = "serialize_players")]
    players: Vec<Player>,
    events: Vec<Event>,
    #[serde(skip)]
    index: HashMap<String, PlayerId>,
}

impl EventModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metadata(&self) -> &GameMetadata {
        &self.game_info
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.0]
    }

    pub fn player_id(&self, name: &str) -> Option<PlayerId> {
        self.index.get(name).copied()
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.player_id(name).map(|id| self.player(id))
    }

    /// Round of the most recent event, or 0 before any event was appended.
    pub fn current_round(&self) -> u32 {
        self.events.last().map_or(0, |event| event.round_num)
    }

    pub fn add_player(&mut self, name: &str) -> PlayerId {
        self.register_or_get(name)
    }

    pub fn register_or_get(&mut self, name: &str) -> PlayerId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = PlayerId(self.players.len());
        log::debug!("Registering player {name}");
        self.players.push(Player::new(name));
        self.index.insert(name.to_string(), id);
        id
    }

    /// Sets the role of an already known player when `source` has at least the
    /// precedence of the role currently held. Unknown names are ignored.
    pub fn upsert_player_role(&mut self, name: &str, role: Role, source: RoleSource) -> bool {
        let Some(id) = self.player_id(name) else {
            log::debug!("Ignoring role {role} for unknown player {name}");
            return false;
        };
        let player = &mut self.players[id.0];
        if source < player.role_source {
            log::debug!(
                "Keeping role {} ({:?}) for {name} over {role} ({source:?})",
                player.role,
                player.role_source
            );
            return false;
        }
        player.role = role;
        player.role_source = source;
        true
    }

    /// Marks a player dead, registering the name first if needed. The first
    /// recorded death wins: later calls for a dead player change nothing.
    pub fn mark_death(&mut self, name: &str, round: u32, reason: &str) -> bool {
        let id = self.register_or_get(name);
        let player = &mut self.players[id.0];
        if player.status == PlayerStatus::Dead {
            log::debug!(
                "{name} already died in round {:?}, ignoring death in round {round}",
                player.death_round
            );
            return false;
        }
        player.status = PlayerStatus::Dead;
        player.death_round = Some(round);
        player.death_reason = Some(reason.to_string());
        true
    }

    /// Appends an event and returns its sequence index. A round number lower
    /// than the current one is raised to keep rounds non-decreasing.
    pub fn append_event(&mut self, round_num: u32, phase: Phase, kind: EventKind) -> usize {
        let current = self.current_round();
        let round_num = if round_num < current {
            log::warn!(
                "Event {} for round {round_num} arrived after round {current}, recording it in round {current}",
                kind.event_type()
            );
            current
        } else {
            round_num
        };
        let sequence_index = self.events.len();
        self.events.push(Event {
            round_num,
            phase,
            kind,
            sequence_index,
        });
        sequence_index
    }

    pub fn set_game_type(&mut self, game_type: &str) {
        if self.game_info.game_type.is_none() {
            self.game_info.game_type = Some(game_type.to_string());
        }
    }

    /// Records the roster and registers every name on it, in order.
    pub fn set_player_names(&mut self, names: Vec<String>) {
        if !self.game_info.player_names.is_empty() {
            log::debug!("Roster already recorded, ignoring {names:?}");
            return;
        }
        for name in &names {
            self.register_or_get(name);
        }
        self.game_info.player_names = names;
    }

    pub fn set_werewolf_team(&mut self, names: Vec<String>) {
        if self.game_info.werewolf_team.is_none() {
            self.game_info.werewolf_team = Some(names);
        }
    }

    pub fn set_winner(&mut self, winner: Winner) {
        self.game_info.winner = Some(winner);
    }

    pub fn set_rounds_played(&mut self, rounds: u32) {
        self.game_info.rounds_played = Some(rounds);
    }
}

impl Display for EventModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}\nPlayers:\n{}\nEvents: {}",
            self.game_info,
            self.players.iter().map(|p| format!("  {p}")).join("\n"),
            self.events.len()
        )
    }
}

fn serialize_players<S: Serializer>(players: &[Player], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(players.len()))?;
    for player in players {
        map.serialize_entry(&player.name, player)?;
    }
    map.end()
}

#[derive(Deserialize)]
struct SerializedModel {
    #[serde(default)]
    game_info: GameMetadata,
    #[serde(default)]
    players: BTreeMap<String, Player>,
    #[serde(default)]
    events: Vec<Event>,
}

impl From<SerializedModel> for EventModel {
    fn from(value: SerializedModel) -> Self {
        let SerializedModel {
            game_info,
            mut players,
            events,
        } = value;

        // roster order first, then lazily registered players by name
        let mut ordered: Vec<Player> = game_info
            .player_names
            .iter()
            .filter_map(|name| players.remove(name))
            .collect();
        ordered.extend(players.into_values());

        // role provenance is not part of the wire format; anything known is
        // treated as revealed so later inline mentions cannot downgrade it
        for player in ordered.iter_mut() {
            if player.role != Role::Unknown {
                player.role_source = RoleSource::Revealed;
            }
        }

        let index = ordered
            .iter()
            .enumerate()
            .map(|(idx, player)| (player.name.clone(), PlayerId(idx)))
            .collect();

        Self {
            game_info,
            players: ordered,
            events,
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discussion(speaker: &str) -> EventKind {
        EventKind::Discussion {
            speaker: speaker.to_string(),
            statement: "I have nothing to hide.".to_string(),
        }
    }

    #[test]
    fn test_register_or_get_is_stable() {
        let mut model = EventModel::new();
        let alice = model.register_or_get("Alice");
        let bob = model.add_player("Bob");
        assert_ne!(alice, bob);
        assert_eq!(model.register_or_get("Alice"), alice);
        assert_eq!(model.players().len(), 2);
        assert_eq!(model.player(bob).name, "Bob");
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut model = EventModel::new();
        model.register_or_get("alice");
        model.register_or_get("Alice");
        assert_eq!(model.players().len(), 2);
    }

    #[test]
    fn test_sequence_index_matches_position() {
        let mut model = EventModel::new();
        for idx in 0..5 {
            let seq = model.append_event(1, Phase::Day, discussion("Alice"));
            assert_eq!(seq, idx);
        }
        for (pos, event) in model.events().iter().enumerate() {
            assert_eq!(event.sequence_index, pos);
        }
    }

    #[test]
    fn test_rounds_never_go_backwards() {
        let mut model = EventModel::new();
        model.append_event(3, Phase::Night, EventKind::PhaseStart { phase: Phase::Night });
        model.append_event(2, Phase::Day, discussion("Bob"));
        assert_eq!(model.events()[1].round_num, 3);
        assert_eq!(model.current_round(), 3);
    }

    #[test]
    fn test_first_death_wins() {
        let mut model = EventModel::new();
        model.add_player("Bob");
        assert!(model.mark_death("Bob", 1, "night_death"));
        assert!(!model.mark_death("Bob", 2, "eliminated"));
        let bob = model.player_by_name("Bob").unwrap();
        assert_eq!(bob.status, PlayerStatus::Dead);
        assert_eq!(bob.death_round, Some(1));
        assert_eq!(bob.death_reason.as_deref(), Some("night_death"));
    }

    #[test]
    fn test_mark_death_registers_unknown_player() {
        let mut model = EventModel::new();
        model.mark_death("Zed", 4, "hunter_shot");
        let zed = model.player_by_name("Zed").unwrap();
        assert_eq!(zed.death_round, Some(4));
        assert_eq!(zed.role, Role::Unknown);
    }

    #[test]
    fn test_role_precedence() {
        let mut model = EventModel::new();
        model.add_player("Alice");
        assert!(model.upsert_player_role("Alice", Role::Seer, RoleSource::Declared));
        assert!(!model.upsert_player_role("Alice", Role::Werewolf, RoleSource::Revealed));
        assert!(!model.upsert_player_role("Alice", Role::Villager, RoleSource::Inferred));
        assert_eq!(model.player_by_name("Alice").unwrap().role, Role::Seer);

        // equal precedence overwrites
        assert!(model.upsert_player_role("Alice", Role::Witch, RoleSource::Declared));
        assert_eq!(model.player_by_name("Alice").unwrap().role, Role::Witch);
    }

    #[test]
    fn test_role_for_unknown_player_is_ignored() {
        let mut model = EventModel::new();
        assert!(!model.upsert_player_role("Ghost", Role::Hunter, RoleSource::Declared));
        assert!(model.players().is_empty());
    }

    #[test]
    fn test_roster_is_recorded_once() {
        let mut model = EventModel::new();
        model.set_player_names(vec!["Alice".to_string(), "Bob".to_string()]);
        model.set_player_names(vec!["Mallory".to_string()]);
        assert_eq!(model.metadata().player_names, vec!["Alice", "Bob"]);
        assert!(model.player_by_name("Mallory").is_none());
    }

    #[test]
    fn test_empty_model_serialization() {
        let json = serde_json::to_value(EventModel::new()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "game_info": { "player_names": [] },
                "players": {},
                "events": [],
            })
        );
    }

    #[test]
    fn test_json_round_trip_rebuilds_registry() {
        let mut model = EventModel::new();
        model.set_player_names(vec!["Carol".to_string(), "Alice".to_string()]);
        model.upsert_player_role("Carol", Role::Seer, RoleSource::Declared);
        model.register_or_get("Dave");
        model.append_event(1, Phase::Day, discussion("Dave"));
        model.mark_death("Alice", 1, "eliminated");

        let json = serde_json::to_string(&model).unwrap();
        let back: EventModel = serde_json::from_str(&json).unwrap();

        let names: Vec<_> = back.players().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Dave"]);
        assert_eq!(back.player_id("Dave"), Some(PlayerId(2)));
        assert_eq!(back.events(), model.events());
        assert_eq!(back.player_by_name("Alice").unwrap().death_round, Some(1));
        assert_eq!(
            back.player_by_name("Carol").unwrap().role_source(),
            RoleSource::Revealed
        );
    }
}
