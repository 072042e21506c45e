use lazy_static::lazy_static;
use model::EventModel;

use crate::{
    context::ParseContext,
    error::ParseError,
    extractors::{game_over, metadata, rounds},
    phrases::{PhraseTable, Phrases},
};

lazy_static! {
    static ref DEFAULT_PARSER: LogParser = LogParser::new();
}

/// Parses `text` with the default phrase table and no size limit.
pub fn parse(text: &str) -> EventModel {
    DEFAULT_PARSER.parse_unbounded(text)
}

#[derive(Debug, Clone)]
pub struct LogParser {
    phrases: Phrases,
    max_input_bytes: Option<usize>,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LogParser {
    /// A parser for both built-in dialects.
    pub fn new() -> Self {
        let phrases = Phrases::compile(PhraseTable::default())
            .expect("Built-in phrase table compiles");
        Self {
            phrases,
            max_input_bytes: None,
        }
    }

    pub fn with_phrase_table(table: PhraseTable) -> Result<Self, ParseError> {
        Ok(Self {
            phrases: Phrases::compile(table)?,
            max_input_bytes: None,
        })
    }

    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = Some(limit);
        self
    }

    pub fn phrases(&self) -> &PhraseTable {
        &self.phrases.table
    }

    /// Builds a fresh EventModel from a transcript. Unrecognised or missing
    /// sections yield fewer events, never an error; only an input over the
    /// configured size limit is rejected.
    pub fn parse(&self, text: &str) -> Result<EventModel, ParseError> {
        if let Some(limit) = self.max_input_bytes {
            if text.len() > limit {
                return Err(ParseError::InputTooLarge {
                    size: text.len(),
                    limit,
                });
            }
        }
        Ok(self.parse_unbounded(text))
    }

    /// Like [`LogParser::parse`] for raw bytes, which must be UTF-8.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<EventModel, ParseError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|err| ParseError::InvalidInput(format!("transcript is not UTF-8: {err}")))?;
        self.parse(text)
    }

    /// Like [`LogParser::parse`] for a transcript that may be absent.
    pub fn parse_optional(&self, text: Option<&str>) -> Result<EventModel, ParseError> {
        let text = text.ok_or_else(|| ParseError::InvalidInput("no transcript given".to_string()))?;
        self.parse(text)
    }

    fn parse_unbounded(&self, text: &str) -> EventModel {
        let mut ctx = ParseContext::new(&self.phrases);
        metadata::extract(&mut ctx, text);
        rounds::extract(&mut ctx, text);
        game_over::extract(&mut ctx, text);
        let model = ctx.into_model();
        log::info!(
            "Parsed {} bytes into {} players and {} events",
            text.len(),
            model.players().len(),
            model.events().len()
        );
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_gives_empty_model() {
        let model = LogParser::new().parse("").unwrap();
        assert!(model.players().is_empty());
        assert!(model.events().is_empty());
        assert_eq!(model.metadata(), &model::GameMetadata::default());
    }

    #[test]
    fn test_input_size_limit() {
        let parser = LogParser::new().with_max_input_bytes(8);
        assert!(parser.parse("12345678").is_ok());
        assert!(matches!(
            parser.parse("123456789"),
            Err(ParseError::InputTooLarge { size: 9, limit: 8 })
        ));
    }

    #[test]
    fn test_invalid_input() {
        let parser = LogParser::new();
        assert!(matches!(
            parser.parse_bytes(&[0xff, 0xfe, 0x00]),
            Err(ParseError::InvalidInput(_))
        ));
        assert!(matches!(
            parser.parse_optional(None),
            Err(ParseError::InvalidInput(_))
        ));
        assert!(parser.parse_optional(Some("Players: Alice")).is_ok());
    }

    #[test]
    fn test_bad_phrase_table_is_rejected() {
        let mut table = PhraseTable::default();
        table.votes = vec!["{actor} votes".to_string()];
        assert!(matches!(
            LogParser::with_phrase_table(table),
            Err(ParseError::InvalidPhrase { .. })
        ));
    }

    #[test]
    fn test_custom_phrase_table() {
        let table = PhraseTable::from_yaml_str(
            "night: [\"<<NIGHT>>\"]\ntargets: [\"{actor} hunts {target}\"]\n",
        )
        .unwrap();
        let parser = LogParser::with_phrase_table(table).unwrap();
        let model = parser.parse("ROUND 1\n<<NIGHT>>\n  Alice hunts Bob\n").unwrap();
        let types: Vec<_> = model.events().iter().map(|e| e.kind.event_type()).collect();
        assert_eq!(types, vec!["phase_start", "werewolf_target"]);
    }
}
