use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::Gregorian;
use crate::error::{Error, ErrorKind, Result};
use crate::grid::default_habits;
use crate::timeline::{SnapshotGenerator, DEFAULT_ENTRY_COUNT};
use crate::tz::Tz;
use crate::widget::{HabgridProvider, Widget};

const CONFIG_PATH_ENV_VAR: &str = "HABGRID_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    let home = dirs::home_dir();

    let config_xdg = match env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home.as_ref().map(|home| home.join(".config")),
    };

    if let Some(dir) = config_xdg {
        locations.push(dir.join("habgrid").join("config.toml"));
    }

    if let Some(home) = home {
        locations.push(home.join(".habgrid.toml"));
    }

    locations
}

fn default_entries() -> i64 {
    DEFAULT_ENTRY_COUNT as i64
}

fn default_display_name() -> String {
    Widget::default().display_name
}

fn default_description() -> String {
    Widget::default().description
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_habits")]
    pub habits: Vec<String>,
    #[serde(default = "default_entries")]
    pub entries: i64,
    #[serde(default)]
    pub timezone: Tz,
    #[serde(default = "default_display_name")]
    pub display_name: String,
    #[serde(default = "default_description")]
    pub description: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            habits: default_habits(),
            entries: default_entries(),
            timezone: Tz::default(),
            display_name: default_display_name(),
            description: default_description(),
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        content.parse().map_err(|e: Error| {
            let msg = format!(
                "{}: {}",
                path.display(),
                e.message.as_deref().unwrap_or_default()
            );
            e.with_msg(&msg)
        })
    }

    pub fn provider(&self) -> HabgridProvider<Gregorian> {
        HabgridProvider::new(Gregorian::new(self.timezone))
            .with_habits(self.habits.clone())
            .with_generator(SnapshotGenerator::new(self.entries))
    }

    pub fn widget(&self) -> Widget {
        Widget {
            display_name: self.display_name.clone(),
            description: self.description.clone(),
            ..Widget::default()
        }
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;

        if config.habits.is_empty() {
            return Err(Error::new(
                ErrorKind::ConfigParse,
                "at least one habit is required",
            ));
        }

        Ok(config)
    }
}

/// Load the config at `path`, or the first one found in the usual locations.
///
/// An explicitly given path must exist; if none of the usual locations holds
/// a file the default config is used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|candidate| candidate.is_file())
    {
        Some(path) => {
            log::info!("Using config file {}", path.display());
            Config::from_path(&path)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
