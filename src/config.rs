use crate::converter::contextual::DEFAULT_WINDOW;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const LOCAL_CONFIG: &str = ".britfix.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Convert imperial measurements
    pub units: bool,
    /// Produce curly quotes instead of straightening them
    pub smart_quotes: bool,
    /// Touch only comments and prose in source files
    pub code_aware: bool,
    pub user_dictionary: Option<PathBuf>,
    pub unit_config: Option<PathBuf>,
    /// Words either side inspected for contextual spellings
    pub context_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            units: false,
            smart_quotes: false,
            code_aware: true,
            user_dictionary: None,
            unit_config: None,
            context_window: DEFAULT_WINDOW,
        }
    }
}

/// Settings given on the command line; `None` leaves the file value alone
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub units: Option<bool>,
    pub smart_quotes: Option<bool>,
    pub code_aware: Option<bool>,
    pub user_dictionary: Option<PathBuf>,
    pub unit_config: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: CLI args > local config > global config > defaults
    pub fn load(overrides: Overrides) -> Result<Self> {
        let mut config = Self::default();

        // Load global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = Self::from_file(&global_path)?;
            }
        }

        // Load local config (overrides global)
        let local_path = PathBuf::from(LOCAL_CONFIG);
        if local_path.exists() {
            let local_config = Self::from_file(&local_path)?;
            config = config.merge(local_config);
        }

        config.apply(overrides);

        if config.user_dictionary.is_none() {
            config.user_dictionary = Self::default_user_dict_path();
        }
        if config.unit_config.is_none() {
            config.unit_config = Self::default_unit_config_path().filter(|p| p.exists());
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn merge(mut self, other: Self) -> Self {
        let defaults = Self::default();
        // Fields left at their default do not mask the lower layer
        if other.units != defaults.units {
            self.units = other.units;
        }
        if other.smart_quotes != defaults.smart_quotes {
            self.smart_quotes = other.smart_quotes;
        }
        if other.code_aware != defaults.code_aware {
            self.code_aware = other.code_aware;
        }
        if other.user_dictionary.is_some() {
            self.user_dictionary = other.user_dictionary;
        }
        if other.unit_config.is_some() {
            self.unit_config = other.unit_config;
        }
        if other.context_window != defaults.context_window {
            self.context_window = other.context_window;
        }
        self
    }

    fn apply(&mut self, overrides: Overrides) {
        if let Some(units) = overrides.units {
            self.units = units;
        }
        if let Some(smart_quotes) = overrides.smart_quotes {
            self.smart_quotes = smart_quotes;
        }
        if let Some(code_aware) = overrides.code_aware {
            self.code_aware = code_aware;
        }
        if let Some(path) = overrides.user_dictionary {
            self.user_dictionary = Some(path);
        }
        if let Some(path) = overrides.unit_config {
            self.unit_config = Some(path);
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "britfix")
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn default_user_dict_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("dictionary.json"))
    }

    pub fn default_unit_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("units.json"))
    }
}
