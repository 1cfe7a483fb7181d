//! Settings read from `~/.chess-rules/config.yaml`
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use log::debug;
use serde::{Deserialize, Serialize};

/// How to start and drive the external engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The program to run
    pub command: String,
    /// Its command line arguments
    pub args: Vec<String>,
    /// Search depth sent with each request
    pub depth: u32,
    /// How long to wait for an answer, in milliseconds
    pub timeout_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            command: "gnuchess".to_owned(),
            args: vec!["-x".to_owned()],
            depth: 1,
            timeout_ms: 10_000,
        }
    }
}

/// Everything the command line tool can be configured with. Fields missing from the file take
/// their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// The external engine
    pub engine: EngineConfig,
    /// `Event` tag for games written as PGN
    pub event: String,
    /// `Site` tag for games written as PGN. The host name is used if this is not set.
    pub site: Option<String>,
    /// `Round` tag for games written as PGN
    pub round: String,
    /// Log level used when `--log-level` is not given
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            engine: EngineConfig::default(),
            event: "Casual game".to_owned(),
            site: None,
            round: "-".to_owned(),
            log_level: "info".to_owned(),
        }
    }
}

impl Config {
    /// `~/.chess-rules/config.yaml`, or `None` if there is no home directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".chess-rules").join("config.yaml"))
    }

    /// Reads the configuration at `path`. A file that does not exist gives the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file exists but cannot be read, and `ConfigError::Yaml`
    /// if it is not valid.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(s) => Ok(serde_yaml::from_str(&s)?),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("{}: not found, using defaults", path.display());
                Ok(Config::default())
            },
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the configuration to `path`, creating its directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// The configuration file could not be read or written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading or writing the file failed
    Io(String),
    /// The file is not valid YAML for a `Config`
    Yaml(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(s) => write!(f, "config file: {}", s),
            ConfigError::Yaml(s) => write!(f, "invalid config file: {}", s),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Yaml(err.to_string())
    }
}
