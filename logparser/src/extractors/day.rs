//! Day discussion: the alive roster and every `Speaker: statement` line.

use lazy_static::lazy_static;
use model::{EventKind, Phase};
use regex::Regex;

use crate::{
    context::ParseContext,
    phrases::{first_captures, PhraseTable},
};

use super::marker_window;

lazy_static! {
    static ref SPEECH: Regex =
        Regex::new(r"^(\w+)(?::[ \t]+|：[ \t]*)(.+)$").expect("Valid discussion line regex");
}

/// Reads the alive roster and discussion from the day window, which runs from
/// the day marker to the voting marker. Without a day marker nothing is read,
/// so a bare `Dave: hello` fragment registers no speaker.
pub fn extract(ctx: &mut ParseContext, round: &str) {
    let phrases = ctx.phrases;
    let table = &phrases.table;
    let Some(day) = marker_window(round, &table.day, &[&table.voting]) else {
        return;
    };

    ctx.emit(Phase::Day, EventKind::PhaseStart { phase: Phase::Day });

    if let Some(caps) = first_captures(&phrases.alive_players, day) {
        let players = caps["list"]
            .split([',', '，'])
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
        ctx.emit(Phase::Day, EventKind::AlivePlayers { players });
    }

    for line in day.lines() {
        let Some((speaker, statement)) = discussion_line(table, line) else {
            continue;
        };
        ctx.model.register_or_get(speaker);
        ctx.emit(
            Phase::Day,
            EventKind::Discussion {
                speaker: speaker.to_string(),
                statement: statement.to_string(),
            },
        );
    }
}

/// Splits a discussion line into speaker and statement, rejecting headers,
/// separators and lines too short to carry a statement.
pub fn discussion_line<'l>(table: &PhraseTable, line: &'l str) -> Option<(&'l str, &'l str)> {
    let line = line.trim();
    if line.chars().count() < table.min_line_chars {
        return None;
    }
    if table
        .separators
        .iter()
        .any(|separator| !separator.is_empty() && line.starts_with(separator.as_str()))
    {
        return None;
    }

    let caps = SPEECH.captures(line)?;
    let speaker = caps.get(1)?.as_str();
    let statement = caps.get(2)?.as_str().trim();

    let mut chars = speaker.chars();
    let first = chars.next()?;
    if first.is_lowercase() || !speaker.chars().all(char::is_alphabetic) {
        return None;
    }
    if table.speaker_denylist.iter().any(|denied| denied == speaker) {
        return None;
    }
    if statement.chars().count() < table.min_statement_chars {
        return None;
    }
    Some((speaker, statement))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phrases::Phrases;

    fn run(text: &str) -> model::EventModel {
        let phrases = Phrases::compile(PhraseTable::default()).unwrap();
        let mut ctx = ParseContext::new(&phrases);
        ctx.enter_round(1);
        extract(&mut ctx, text);
        ctx.into_model()
    }

    #[test]
    fn test_discussion_line_filters() {
        let table = PhraseTable::default();
        assert_eq!(
            discussion_line(&table, "  Alice: I think Bob is suspicious."),
            Some(("Alice", "I think Bob is suspicious."))
        );
        assert_eq!(discussion_line(&table, "小明：我是好人"), Some(("小明", "我是好人")));
        // lowercase speaker
        assert_eq!(discussion_line(&table, "note: this is not a player"), None);
        // denylisted header
        assert_eq!(discussion_line(&table, "Discussion: Round 1 begins"), None);
        // separator
        assert_eq!(discussion_line(&table, "--- Alice: hello there"), None);
        // statement too short
        assert_eq!(discussion_line(&table, "Alice: ok"), None);
        // digits in speaker
        assert_eq!(discussion_line(&table, "R2D2: beep boop beep"), None);
        // colon without following space
        assert_eq!(discussion_line(&table, "Alice:nospace here"), None);
    }

    #[test]
    fn test_day_phase_events() {
        let model = run("\
[DAY PHASE]
Alive players: Alice, Bob, Carol
Discussion:
  Alice: Bob was quiet last night.
  Bob: I am the seer, trust me.
  Carol: ok
[VOTING] Voting Phase
  Dave: should not be read
");
        let kinds: Vec<_> = model.events().iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::PhaseStart { phase: Phase::Day },
                EventKind::AlivePlayers {
                    players: vec!["Alice".to_string(), "Bob".to_string(), "Carol".to_string()],
                },
                EventKind::Discussion {
                    speaker: "Alice".to_string(),
                    statement: "Bob was quiet last night.".to_string(),
                },
                EventKind::Discussion {
                    speaker: "Bob".to_string(),
                    statement: "I am the seer, trust me.".to_string(),
                },
            ]
        );
        assert!(model.events().iter().all(|e| e.phase == Phase::Day));
    }

    #[test]
    fn test_speakers_are_registered() {
        let model = run("[DAY PHASE]\n  Dave: I have nothing to hide.\n");
        let dave = model.player_by_name("Dave").unwrap();
        assert!(dave.is_alive());
        assert_eq!(dave.role, model::Role::Unknown);
    }

    #[test]
    fn test_no_day_marker_reads_nothing() {
        let model = run("Dave: hello there\n");
        assert!(model.events().is_empty());
        assert!(model.player_by_name("Dave").is_none());
    }
}
