use std::path::{Path, PathBuf};

use serde::Serialize;

use super::GameWriter;
use crate::{
    export::{GameExport, GameSummary},
    ReplayError,
};

/// Writes `<root>/games/<id>.json` per game and `<root>/games.json` as the
/// index.
pub struct JsonDirWriter {
    root: PathBuf,
    pretty: bool,
    written: usize,
}

impl JsonDirWriter {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ReplayError> {
        let root = root.into();
        let games = root.join("games");
        std::fs::create_dir_all(&games).map_err(|err| ReplayError::io(&games, err))?;
        Ok(Self {
            root,
            pretty: false,
            written: 0,
        })
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn game_path(&self, id: &str) -> PathBuf {
        self.root.join("games").join(format!("{id}.json"))
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join("games.json")
    }

    fn write_json<T: Serialize + ?Sized>(&self, path: &Path, value: &T) -> Result<(), ReplayError> {
        let json = if self.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        };
        std::fs::write(path, json).map_err(|err| ReplayError::io(path, err))
    }
}

impl GameWriter for JsonDirWriter {
    fn write_game(&mut self, game: &GameExport) -> Result<(), ReplayError> {
        let path = self.game_path(&game.id);
        log::debug!("Writing {}", path.display());
        self.write_json(&path, game)?;
        self.written += 1;
        Ok(())
    }

    fn write_index(&mut self, index: &[GameSummary]) -> Result<(), ReplayError> {
        let path = self.index_path();
        log::info!("Writing index of {} games to {}", index.len(), path.display());
        self.write_json(&path, index)
    }
}
