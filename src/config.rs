use crate::error::RetentionError;
use serde::{Deserialize, Serialize};
use std::{
    fs::{read_to_string, write},
    path::{Path, PathBuf},
};
use toml::{Table, Value};

/// Dequeue budget of a single root path search.
pub const DEFAULT_MAX_ITERATIONS: usize = 100_000;

/// What a search does with the paths it already found when it runs out of iterations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Return an empty collection
    #[default]
    Discard,
    /// Return the paths completed before the limit, marked as truncated
    KeepPartial,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_iterations: usize,
    pub limit_policy: LimitPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            limit_policy: LimitPolicy::default(),
        }
    }
}

impl SearchConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_limit_policy(mut self, limit_policy: LimitPolicy) -> Self {
        self.limit_policy = limit_policy;
        self
    }
}

pub trait ConfigProvider: Send + Sync {
    fn get_search_config(&self) -> Result<SearchConfig, RetentionError>;
    fn set_search_config(&self, config: SearchConfig) -> Result<(), RetentionError>;
}

/// Reads and writes the `[search]` table of a TOML file. Other tables in the file are preserved.
#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_table(&self) -> Result<Table, RetentionError> {
        if !self.path.exists() {
            tracing::debug!("Config file {:?} not found, using defaults.", &self.path);
            return Ok(Table::new());
        }
        let content = read_to_string(&self.path)?;
        Ok(toml::from_str(&content)?)
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_search_config(&self) -> Result<SearchConfig, RetentionError> {
        tracing::debug!("Attempting to read search config from: {:?}", &self.path);
        match self.read_table()?.remove("search") {
            Some(search @ Value::Table(_)) => Ok(search.try_into()?),
            Some(other) => Err(RetentionError::Config(format!(
                "expected [search] to be a table, found {}",
                other.type_str()
            ))),
            None => Ok(SearchConfig::default()),
        }
    }

    fn set_search_config(&self, config: SearchConfig) -> Result<(), RetentionError> {
        tracing::debug!("Attempting to write search config to: {:?}", &self.path);
        let mut table = self.read_table()?;
        table.insert("search".to_string(), Value::try_from(config)?);
        write(&self.path, toml::to_string(&table)?)?;
        Ok(())
    }
}
