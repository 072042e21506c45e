use logparser::StateProjector;
use model::{Event, EventModel};

/// Forward/backward navigation over a parsed game's events.
///
/// The position is always a valid index while the game has events; with no
/// events there is no current event and every move is a no-op.
#[derive(Debug, Clone)]
pub struct ReplayCursor<'m> {
    projector: StateProjector<'m>,
    position: usize,
}

impl<'m> ReplayCursor<'m> {
    pub fn new(model: &'m EventModel) -> Self {
        Self {
            projector: StateProjector::new(model),
            position: 0,
        }
    }

    fn events(&self) -> &'m [Event] {
        self.projector.model().events()
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }

    pub fn position(&self) -> Option<usize> {
        (!self.is_empty()).then_some(self.position)
    }

    pub fn current(&self) -> Option<&'m Event> {
        self.events().get(self.position)
    }

    pub fn projector(&self) -> &StateProjector<'m> {
        &self.projector
    }

    /// Advances one event. Returns the new current event, or `None` when
    /// already at the last event.
    pub fn next(&mut self) -> Option<&'m Event> {
        if self.position + 1 >= self.len() {
            return None;
        }
        self.position += 1;
        self.current()
    }

    pub fn prev(&mut self) -> Option<&'m Event> {
        if self.position == 0 || self.is_empty() {
            return None;
        }
        self.position -= 1;
        self.current()
    }

    /// Moves to `index`, clamped into the event range.
    pub fn jump(&mut self, index: usize) -> Option<&'m Event> {
        self.position = index.min(self.len().saturating_sub(1));
        self.current()
    }

    /// Moves to the first event of `round`. Stays put if the round has no
    /// events.
    pub fn jump_to_round(&mut self, round: u32) -> Option<&'m Event> {
        match self.events().iter().position(|event| event.round_num == round) {
            Some(index) => self.jump(index),
            None => {
                log::debug!("No events in round {round}");
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.position = 0;
    }

    pub fn alive(&self) -> Vec<&'m str> {
        self.position()
            .map_or_else(Vec::new, |idx| self.projector.alive_at(idx))
    }

    pub fn dead(&self) -> Vec<&'m str> {
        self.position()
            .map_or_else(Vec::new, |idx| self.projector.dead_at(idx))
    }
}
