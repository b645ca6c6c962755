use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{engine::DEFAULT_PAGE_SIZE, error::Result};

/// Settings read from `data/config.ron`. Every field is optional.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// The REST backend, e.g. `http://localhost:5000/api`. Without one the
    /// featured jobs are listed.
    pub api_base_url: Option<Url>,
    /// Jobs revealed per "load more".
    pub page_size: usize,
    /// HTTP request timeout.
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 10,
        }
    }
}

impl Config {
    pub const FILE_PATH: &'static str = "data/config.ron";
    pub const API_URL_VAR: &'static str = "LISTINGS_API_URL";

    /// Loads the config file if it exists, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::from_file(Self::FILE_PATH)?;
        if let Ok(url) = std::env::var(Self::API_URL_VAR) {
            config.api_base_url = Some(Url::parse(&url)?);
        }
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_ron(&std::fs::read_to_string(path)?)
    }

    pub fn from_ron(s: &str) -> Result<Self> {
        let mut config: Self = ron::from_str(s)?;
        if config.page_size == 0 {
            log::warn!("page_size must be positive, using {}", DEFAULT_PAGE_SIZE);
            config.page_size = DEFAULT_PAGE_SIZE;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
