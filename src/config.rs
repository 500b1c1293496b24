// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Settings for a collection run.
//!
//! A `Config` starts from its defaults, which reproduce the classic Brazilian-trends setup, and
//! can be adjusted through `TREND_HARVEST_*` environment variables and then command-line flags.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Error, Result};

const ENV_PREFIX: &str = "TREND_HARVEST_";

/// Settings for a collection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Locations whose `country` equals this name are kept.
    pub country_name: String,
    /// Locations whose `countryCode` equals this code are kept.
    pub country_code: String,
    /// Directory the artifacts are written to.
    pub data_dir: PathBuf,
    /// Key of the raw collected trend lines.
    pub raw_artifact: String,
    /// Key of the ranked and grouped trend set.
    pub clean_artifact: String,
    /// Base URL of the Twitter API, including the version segment.
    pub api_base: Url,
    /// Upper bound on any single call to Twitter, in seconds.
    pub request_timeout_secs: u64,
    /// How many locations are fetched at the same time.
    pub max_concurrent_fetches: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            country_name: "Brazil".to_string(),
            country_code: "BR".to_string(),
            data_dir: PathBuf::from("."),
            raw_artifact: "brazilian_trends.json".to_string(),
            clean_artifact: "clean_brazilian_trends.json".to_string(),
            api_base: Url::parse("https://api.twitter.com/1.1/").expect("static URL"),
            request_timeout_secs: 30,
            max_concurrent_fetches: 1,
        }
    }
}

impl Config {
    /// Loads the defaults, overridden by any `TREND_HARVEST_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(format!("{}{}", ENV_PREFIX, name)).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(name) = lookup("COUNTRY_NAME") {
            config.country_name = name;
        }
        if let Some(code) = lookup("COUNTRY_CODE") {
            config.country_code = code;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            config.data_dir = dir.into();
        }
        if let Some(key) = lookup("RAW_ARTIFACT") {
            config.raw_artifact = key;
        }
        if let Some(key) = lookup("CLEAN_ARTIFACT") {
            config.clean_artifact = key;
        }
        if let Some(base) = lookup("API_BASE") {
            config.api_base = parse_base(&base)?;
        }
        if let Some(secs) = lookup("REQUEST_TIMEOUT") {
            config.request_timeout_secs = parse_number("REQUEST_TIMEOUT", &secs)?;
        }
        if let Some(count) = lookup("MAX_CONCURRENT_FETCHES") {
            config.max_concurrent_fetches = parse_number("MAX_CONCURRENT_FETCHES", &count)?;
        }

        Ok(config)
    }

    /// Checks that this configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.country_name.trim().is_empty() && self.country_code.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "a country name or country code is required".to_string(),
            ));
        }
        if self.raw_artifact.trim().is_empty() || self.clean_artifact.trim().is_empty() {
            return Err(Error::InvalidConfig("artifact names must not be empty".to_string()));
        }
        if self.raw_artifact == self.clean_artifact {
            return Err(Error::InvalidConfig(format!(
                "raw and clean artifacts must differ, both are {}",
                self.raw_artifact
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig("request timeout must be positive".to_string()));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(Error::InvalidConfig(
                "at least one concurrent fetch is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The bound on a single call to Twitter.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Parses an API base URL, making sure it ends in a slash so endpoint paths join under it.
pub fn parse_base(base: &str) -> Result<Url> {
    let mut base = base.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Url::parse(&base).map_err(|e| Error::InvalidConfig(format!("invalid API base {}: {}", base, e)))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        Error::InvalidConfig(format!("{}{} = {:?}: {}", ENV_PREFIX, name, value, e))
    })
}
