//! Batch conversion of transcript files into per-game JSON documents.

use std::{
    path::{Path, PathBuf},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use logparser::LogParser;
use model::{EventModel, Winner};
use serde::Serialize;

use crate::{writers::GameWriter, ReplayError};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportMetadata {
    pub total_events: usize,
    pub file_size: u64,
    pub created: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
}

/// One game as published: the parsed model plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct GameExport {
    pub id: String,
    pub filename: String,
    #[serde(flatten)]
    pub model: EventModel,
    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub id: String,
    pub filename: String,
    pub winner: Option<Winner>,
    pub rounds_played: Option<u32>,
    pub total_events: usize,
    #[serde(skip)]
    pub created: DateTime<Utc>,
}

impl GameExport {
    pub fn summary(&self) -> GameSummary {
        let info = self.model.metadata();
        GameSummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            winner: info.winner,
            rounds_played: info.rounds_played,
            total_events: self.metadata.total_events,
            created: self.metadata.created,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.model
            .events()
            .iter()
            .any(|event| event.kind.event_type() == "game_end")
    }
}

/// Parses one transcript file into an export document.
pub fn load_game(parser: &LogParser, path: &Path) -> Result<GameExport, ReplayError> {
    let bytes = std::fs::read(path).map_err(|err| ReplayError::io(path, err))?;
    let file_meta = std::fs::metadata(path).map_err(|err| ReplayError::io(path, err))?;
    let created: DateTime<Utc> = file_meta
        .modified()
        .unwrap_or(SystemTime::UNIX_EPOCH)
        .into();

    let model = parser.parse_bytes(&bytes)?;
    let id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .ok_or_else(|| ReplayError::GameNotFound(path.display().to_string()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| id.clone());

    Ok(GameExport {
        id,
        filename,
        metadata: ExportMetadata {
            total_events: model.events().len(),
            file_size: file_meta.len(),
            created,
            generated_at: Utc::now(),
        },
        model,
    })
}

/// Every `*.txt` file directly inside `dir`, sorted by name.
pub fn list_logs(dir: &Path) -> Result<Vec<PathBuf>, ReplayError> {
    let entries = std::fs::read_dir(dir).map_err(|err| ReplayError::io(dir, err))?;
    let mut logs = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| ReplayError::io(dir, err))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

/// Converts every finished game in `log_dir` and hands it to `writer`.
/// Games without a `game_end` event are skipped. Returns the index, newest
/// first.
pub fn export_dir(
    parser: &LogParser,
    log_dir: &Path,
    writer: &mut dyn GameWriter,
) -> Result<Vec<GameSummary>, ReplayError> {
    let mut index = Vec::new();
    for path in list_logs(log_dir)? {
        let game = match load_game(parser, &path) {
            Ok(game) => game,
            Err(ReplayError::Parse(err)) => {
                log::warn!("Skipping {}: {err}", path.display());
                continue;
            }
            Err(err) => return Err(err),
        };
        if !game.is_complete() {
            log::info!("Skipping incomplete game {}", game.filename);
            continue;
        }
        log::info!(
            "Exporting {} ({} events)",
            game.filename,
            game.metadata.total_events
        );
        writer.write_game(&game)?;
        index.push(game.summary());
    }

    index.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.id.cmp(&b.id)));
    writer.write_index(&index)?;
    Ok(index)
}
