use crate::{
    export::{GameExport, GameSummary},
    ReplayError,
};

/// Destination for exported games.
pub trait GameWriter {
    fn write_game(&mut self, game: &GameExport) -> Result<(), ReplayError>;
    /// Called once after every game was written.
    fn write_index(&mut self, index: &[GameSummary]) -> Result<(), ReplayError>;
}
