//! Round and game descriptors.
//!
//! Descriptors are plain data loaded from JSON and validated once, up front.
//! Everything downstream assumes a validated descriptor.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::symbol::Symbol;

const BUILTIN: &str = include_str!("default_game.json");

/// How a finished round is classified.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// Won when at least one sequence succeeded.
    #[default]
    AnySuccess,
    /// Won only when every sequence succeeded.
    AllSuccess,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceConfig {
    pub size: usize,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub points: u32,
    /// Fixed targets; random ones of length `size` are drawn when absent.
    #[serde(default)]
    pub symbols: Option<Vec<Symbol>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Side length of the square matrix.
    pub matrix: usize,
    /// Buffer capacity.
    pub buffer: usize,
    /// Deadline in seconds.
    #[serde(rename = "timer")]
    pub timer_secs: u64,
    pub sequences: Vec<SequenceConfig>,
    /// Fixed matrix rows; random ones are drawn when absent.
    #[serde(default)]
    pub grid: Option<Vec<Vec<Symbol>>>,
    #[serde(default)]
    pub win_policy: WinPolicy,
    /// Ignore ticks until the first commit.
    #[serde(default)]
    pub timer_starts_on_commit: bool,
}

impl RoundConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timer_secs)
    }

    fn validate(&self, stage: usize) -> Result<(), ConfigError> {
        if self.matrix == 0 {
            return Err(ConfigError::EmptyMatrix { stage });
        }
        if self.buffer == 0 {
            return Err(ConfigError::EmptyBuffer { stage });
        }
        if self.timer_secs == 0 {
            return Err(ConfigError::NoTime { stage });
        }
        if self.sequences.is_empty() {
            return Err(ConfigError::NoSequences { stage });
        }
        for (sequence, cfg) in self.sequences.iter().enumerate() {
            if cfg.size == 0 {
                return Err(ConfigError::EmptySequence { stage, sequence });
            }
            if let Some(symbols) = &cfg.symbols {
                if symbols.len() != cfg.size {
                    return Err(ConfigError::SequenceLength {
                        stage,
                        sequence,
                        size: cfg.size,
                        found: symbols.len(),
                    });
                }
            }
        }
        if let Some(rows) = &self.grid {
            let square =
                rows.len() == self.matrix && rows.iter().all(|row| row.len() == self.matrix);
            if !square {
                return Err(ConfigError::GridShape {
                    stage,
                    size: self.matrix,
                });
            }
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BriefingConfig {
    #[serde(default)]
    pub title: String,
    pub text: String,
}

/// A closing screen: shows `msg` and offers a restart.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndConfig {
    #[serde(default, alias = "Msg")]
    pub msg: String,
}

/// One entry of the campaign.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "config", rename_all = "snake_case")]
pub enum StageConfig {
    Breach(RoundConfig),
    #[serde(alias = "story")]
    Briefing(BriefingConfig),
    End(EndConfig),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(alias = "models")]
    pub stages: Vec<StageConfig>,
}

impl GameConfig {
    /// Parse and validate a JSON campaign.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!(stages = config.stages.len(), "game config loaded");
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!(path = %path.display(), "reading game config");
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The campaign shipped with the crate.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_json(BUILTIN)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stages.is_empty() {
            return Err(ConfigError::NoStages);
        }
        for (stage, cfg) in self.stages.iter().enumerate() {
            if let StageConfig::Breach(round) = cfg {
                round.validate(stage)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read \"{}\"", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed game config")]
    Parse(#[from] serde_json::Error),
    #[error("a game needs at least one stage")]
    NoStages,
    #[error("stage {stage}: the matrix needs at least one cell")]
    EmptyMatrix { stage: usize },
    #[error("stage {stage}: the buffer needs at least one slot")]
    EmptyBuffer { stage: usize },
    #[error("stage {stage}: the timer must be positive")]
    NoTime { stage: usize },
    #[error("stage {stage}: a round needs at least one sequence")]
    NoSequences { stage: usize },
    #[error("stage {stage}: sequence {sequence} is empty")]
    EmptySequence { stage: usize, sequence: usize },
    #[error("stage {stage}: sequence {sequence} declares {size} symbols but lists {found}")]
    SequenceLength {
        stage: usize,
        sequence: usize,
        size: usize,
        found: usize,
    },
    #[error("stage {stage}: grid must be {size} rows of {size} symbols")]
    GridShape { stage: usize, size: usize },
    #[error("stage {stage}: could not build matrix")]
    Matrix {
        stage: usize,
        #[source]
        source: crate::matrix::Error,
    },
}
