use std::path::{Path, PathBuf};

use logparser::{LogParser, PhraseTable};
use serde::Deserialize;

use crate::ReplayError;

pub const PHRASES_ENV: &str = "WEREWOLF_PHRASES";
pub const MAX_INPUT_BYTES_ENV: &str = "WEREWOLF_MAX_INPUT_BYTES";
pub const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;

/// Settings as they appear in a YAML config file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub phrases: Option<PathBuf>,
    pub max_input_bytes: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let text = std::fs::read_to_string(path).map_err(|err| ReplayError::io(path, err))?;
        Ok(serde_yaml::from_str(&text)?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplayConfig {
    pub phrases: Option<PathBuf>,
    pub max_input_bytes: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            phrases: None,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

impl ReplayConfig {
    pub fn from_cli_or_env_or_yaml(
        cli_phrases: Option<PathBuf>,
        cli_max_input_bytes: Option<usize>,
        yaml_config: Option<ConfigFile>,
    ) -> Self {
        Self::resolve(
            cli_phrases,
            cli_max_input_bytes,
            |key| std::env::var(key).ok(),
            yaml_config,
        )
    }

    fn resolve(
        cli_phrases: Option<PathBuf>,
        cli_max_input_bytes: Option<usize>,
        env: impl Fn(&str) -> Option<String>,
        yaml_config: Option<ConfigFile>,
    ) -> Self {
        let yaml = yaml_config.unwrap_or_default();

        let phrases = if let Some(arg) = cli_phrases {
            Some(arg)
        } else if let Some(value) = env(PHRASES_ENV) {
            Some(PathBuf::from(value))
        } else {
            yaml.phrases
        };

        let env_max = env(MAX_INPUT_BYTES_ENV).and_then(|value| match value.trim().parse::<usize>() {
            Ok(limit) => Some(limit),
            Err(err) => {
                log::warn!("Ignoring {MAX_INPUT_BYTES_ENV}={value}: {err}");
                None
            }
        });
        let max_input_bytes = cli_max_input_bytes
            .or(env_max)
            .or(yaml.max_input_bytes)
            .unwrap_or(DEFAULT_MAX_INPUT_BYTES);

        Self {
            phrases,
            max_input_bytes,
        }
    }

    /// The phrase table: the built-in dialects unless a phrase file is set,
    /// in which case the file's entries replace the matching defaults.
    pub fn phrase_table(&self) -> Result<PhraseTable, ReplayError> {
        let Some(path) = &self.phrases else {
            return Ok(PhraseTable::default());
        };
        log::info!("Loading phrases from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|err| ReplayError::io(path, err))?;
        Ok(PhraseTable::from_yaml_str(&text)?)
    }

    pub fn parser(&self) -> Result<LogParser, ReplayError> {
        Ok(LogParser::with_phrase_table(self.phrase_table()?)?
            .with_max_input_bytes(self.max_input_bytes))
    }
}
