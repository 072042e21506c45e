pub mod config;
pub mod cursor;
pub mod error;
pub mod export;
pub mod writers;

pub use config::{ConfigFile, ReplayConfig};
pub use cursor::ReplayCursor;
pub use error::ReplayError;
pub use export::{export_dir, load_game, GameExport, GameSummary};
pub use writers::{GameWriter, JsonDirWriter};

// NoopWriter for dry runs that only need the index
pub struct NoopWriter;

impl writers::GameWriter for NoopWriter {
    fn write_game(&mut self, _game: &export::GameExport) -> Result<(), error::ReplayError> {
        Ok(())
    }

    fn write_index(&mut self, _index: &[export::GameSummary]) -> Result<(), error::ReplayError> {
        Ok(())
    }
}
