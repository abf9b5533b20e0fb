use chrono::NaiveDate;
use once_cell::unsync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::iter::FromIterator;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::calendar;
use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_HOLIDAY_URL: &str = "https://holidays-jp.github.io/api/v1/date.json";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Public holidays keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayTable(BTreeMap<NaiveDate, String>);

impl HolidayTable {
    /// Parses a JSON object mapping `YYYY-MM-DD` keys to holiday names.
    /// Keys that are not dates are skipped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(json)?;

        Ok(raw
            .into_iter()
            .filter_map(|(key, name)| match calendar::parse_date(&key) {
                Ok(date) => Some((date, name)),
                Err(e) => {
                    log::debug!("Skipping holiday entry: {}", e);
                    None
                }
            })
            .collect())
    }

    pub fn lookup(&self, date: &NaiveDate) -> Option<&str> {
        self.0.get(date).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(NaiveDate, String)> for HolidayTable {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, String)>>(iter: I) -> Self {
        HolidayTable(iter.into_iter().collect())
    }
}

pub trait HolidaySource {
    fn fetch(&self) -> Result<HolidayTable>;
}

pub struct HttpHolidaySource {
    url: String,
    timeout: Duration,
}

impl HttpHolidaySource {
    pub fn new(url: &str) -> Self {
        HttpHolidaySource {
            url: url.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for HttpHolidaySource {
    fn default() -> Self {
        HttpHolidaySource::new(DEFAULT_HOLIDAY_URL)
    }
}

impl HolidaySource for HttpHolidaySource {
    fn fetch(&self) -> Result<HolidayTable> {
        log::debug!("Fetching holidays from {}", self.url);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;

        let response = client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::new(
                ErrorKind::HolidayFetch,
                &format!("{} answered with {}", self.url, status),
            ));
        }

        HolidayTable::from_json(&response.text()?)
    }
}

pub struct FileHolidaySource {
    path: PathBuf,
}

impl FileHolidaySource {
    pub fn new(path: &Path) -> Self {
        FileHolidaySource {
            path: path.to_owned(),
        }
    }
}

impl HolidaySource for FileHolidaySource {
    fn fetch(&self) -> Result<HolidayTable> {
        log::debug!("Reading holidays from {}", self.path.display());
        HolidayTable::from_json(&fs::read_to_string(&self.path)?)
    }
}

pub struct NoHolidays;

impl HolidaySource for NoHolidays {
    fn fetch(&self) -> Result<HolidayTable> {
        Ok(HolidayTable::default())
    }
}

impl HolidaySource for HolidayTable {
    fn fetch(&self) -> Result<HolidayTable> {
        Ok(self.clone())
    }
}

/// Keeps the holiday table for the session once a fetch succeeded.
///
/// Only `load` talks to the source. A failed fetch is logged and leaves the
/// cache empty, so the next `load` tries again; reads never fetch.
pub struct HolidayCache {
    source: Box<dyn HolidaySource>,
    table: OnceCell<HolidayTable>,
    empty: HolidayTable,
}

impl HolidayCache {
    pub fn new(source: Box<dyn HolidaySource>) -> Self {
        HolidayCache {
            source,
            table: OnceCell::new(),
            empty: HolidayTable::default(),
        }
    }

    /// Fetches the table unless an earlier fetch succeeded.
    pub fn load(&self) -> &HolidayTable {
        if let Some(table) = self.table.get() {
            return table;
        }

        match self.source.fetch() {
            Ok(table) => {
                log::info!("Loaded {} holidays", table.len());
                self.table.get_or_init(|| table)
            }
            Err(e) => {
                log::warn!("Continuing without holidays: {}", e);
                &self.empty
            }
        }
    }

    /// The cached table, or an empty one if nothing was loaded yet.
    pub fn table(&self) -> &HolidayTable {
        self.table.get().unwrap_or(&self.empty)
    }

    pub fn lookup(&self, date: &NaiveDate) -> Option<&str> {
        self.table().lookup(date)
    }
}
