use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar::{Layout, WeekStart};
use crate::error::{Error, ErrorKind, Result};
use crate::holidays::{
    FileHolidaySource, HolidaySource, HttpHolidaySource, NoHolidays, DEFAULT_HOLIDAY_URL,
};
use crate::symbols::{Palette, Symbol};

const CONFIG_PATH_ENV_VAR: &str = "SPANCAL_CONFIG_FILE";

pub fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("spancal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".spancal.toml"));
    }

    locations
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HolidayConfig {
    pub enabled: bool,
    pub url: String,
    pub file: Option<PathBuf>,
    pub timeout_secs: u64,
}

impl Default for HolidayConfig {
    fn default() -> Self {
        HolidayConfig {
            enabled: true,
            url: DEFAULT_HOLIDAY_URL.to_owned(),
            file: None,
            timeout_secs: 10,
        }
    }
}

impl HolidayConfig {
    pub fn source(&self) -> Box<dyn HolidaySource> {
        if !self.enabled {
            Box::new(NoHolidays)
        } else if let Some(file) = &self.file {
            Box::new(FileHolidaySource::new(file))
        } else {
            Box::new(
                HttpHolidaySource::new(&self.url).timeout(Duration::from_secs(self.timeout_secs)),
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: WeekStart,
    pub layout: Layout,
    pub title: Option<String>,
    pub memo: Option<String>,
    pub holidays: HolidayConfig,
    pub symbols: Vec<Symbol>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            week_start: WeekStart::default(),
            layout: Layout::default(),
            title: None,
            memo: None,
            holidays: HolidayConfig::default(),
            symbols: vec![Symbol::default()],
        }
    }
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::new(ErrorKind::ConfigParse, &format!("{}: {}", path.display(), e)))
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::new(self.symbols.clone())
    }
}

/// Loads `path` if given, otherwise the first existing file of
/// `find_configfile_locations`, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_path(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => {
            log::info!("Using config file {}", path.display());
            Config::from_path(&path)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
