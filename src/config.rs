/// Runtime settings, read from an optional TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::flutterers::{self, Flutterer};

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Field size in world units.
    pub width: f32,
    pub height: f32,
    /// Target frame time.
    pub frame_ms: u64,
    pub starting_lives: u32,
    pub flutterer: String,
    /// Where progress counters live; `None` uses the home directory.
    pub save_path: Option<PathBuf>,
    pub log_path: PathBuf,
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            width: 480.0,
            height: 800.0,
            frame_ms: 33,
            starting_lives: 3,
            flutterer: flutterers::STARTER_ID.to_string(),
            save_path: None,
            log_path: PathBuf::from("butterfly_brawl.log"),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.starting_lives == 0 {
            return Err(Error::InvalidSetting {
                field: "starting_lives",
                reason: "a run needs at least one life",
            });
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidSetting {
                field: "width/height",
                reason: "the field must have a positive size",
            });
        }
        Ok(())
    }

    /// Defaults when `path` is `None`; a named file must exist and parse.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Settings::default()),
            Some(p) => Self::from_toml(&std::fs::read_to_string(p)?),
        }
    }

    pub fn flutterer(&self) -> Result<&'static Flutterer> {
        flutterers::flutterer_by_id(&self.flutterer).ok_or_else(|| Error::UnknownFlutterer {
            id: self.flutterer.clone(),
        })
    }
}
