//! Editor defaults, loadable from a TOML file.
//!
//! ```toml
//! value = 500000
//! game = "ds3"
//! dump_dir = "decrypted"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::container::{MAX_VALUE, MIN_VALUE};
use crate::error::{Error, Result};
use crate::profile::GameVariant;

/// Default settings for the editor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Progression value written when none is given
    pub value: u32,
    /// Game used when none is given
    pub game: Option<GameVariant>,
    /// Directory for decrypted entry dumps
    pub dump_dir: Option<PathBuf>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            value: MAX_VALUE,
            game: None,
            dump_dir: None,
        }
    }
}

impl EditorConfig {
    /// Create a new configuration builder
    pub fn builder() -> EditorConfigBuilder {
        EditorConfigBuilder::default()
    }

    /// Load a configuration file. Missing keys take their default values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_VALUE..=MAX_VALUE).contains(&self.value) {
            return Err(Error::ValueOutOfRange {
                value: self.value,
                min: MIN_VALUE,
                max: MAX_VALUE,
            });
        }
        Ok(())
    }
}

/// Builder for EditorConfig
#[derive(Debug, Clone, Default)]
pub struct EditorConfigBuilder {
    value: Option<u32>,
    game: Option<GameVariant>,
    dump_dir: Option<PathBuf>,
}

impl EditorConfigBuilder {
    pub fn value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn game(mut self, game: GameVariant) -> Self {
        self.game = Some(game);
        self
    }

    pub fn dump_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.dump_dir = Some(path.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> EditorConfig {
        let default = EditorConfig::default();
        EditorConfig {
            value: self.value.unwrap_or(default.value),
            game: self.game.or(default.game),
            dump_dir: self.dump_dir.or(default.dump_dir),
        }
    }
}
