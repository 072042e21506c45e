use model::{EventKind, EventModel, Phase};

use crate::phrases::Phrases;

/// Cursor threaded through the extraction stages: the model being built and
/// the round the stages are currently working in.
#[derive(Debug)]
pub struct ParseContext<'p> {
    pub model: EventModel,
    pub phrases: &'p Phrases,
    pub round: u32,
}

impl<'p> ParseContext<'p> {
    pub fn new(phrases: &'p Phrases) -> Self {
        Self {
            model: EventModel::new(),
            phrases,
            round: 0,
        }
    }

    pub fn emit(&mut self, phase: Phase, kind: EventKind) -> usize {
        log::debug!("Round {} {phase}: {kind}", self.round);
        self.model.append_event(self.round, phase, kind)
    }

    /// Moves to the round declared by a banner. A banner that goes backwards
    /// keeps the current round.
    pub fn enter_round(&mut self, declared: u32) {
        if declared < self.round {
            log::warn!(
                "Round banner {declared} follows round {}, staying in round {}",
                self.round,
                self.round
            );
            return;
        }
        self.round = declared;
    }

    pub fn into_model(self) -> EventModel {
        self.model
    }
}
