// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;

use crate::error::Fallible;
use crate::intervals::IntervalTable;

pub const CONFIG_FILE_NAME: &str = "flashdeck.toml";

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    schedule: ScheduleSection,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ScheduleSection {
    intervals_minutes: Option<Vec<i64>>,
}

/// Collection settings, read from `flashdeck.toml`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Config {
    pub intervals: IntervalTable,
}

impl Config {
    /// Load the configuration file in `directory`, if there is one.
    pub fn load(directory: &Path) -> Fallible<Self> {
        let path = directory.join(CONFIG_FILE_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }
        log::debug!("Reading {}.", path.display());
        Config::parse(&read_to_string(path)?)
    }

    pub fn parse(content: &str) -> Fallible<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let intervals = match file.schedule.intervals_minutes {
            Some(minutes) => IntervalTable::new(minutes)?,
            None => IntervalTable::default(),
        };
        Ok(Config { intervals })
    }
}

#[cfg(test)]
mod tests {
    use std::fs::write;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_missing_file() -> Fallible<()> {
        let dir = tempdir()?;
        assert_eq!(Config::load(dir.path())?, Config::default());
        Ok(())
    }

    #[test]
    fn test_empty_file() -> Fallible<()> {
        assert_eq!(Config::parse("")?, Config::default());
        Ok(())
    }

    #[test]
    fn test_custom_intervals() -> Fallible<()> {
        let dir = tempdir()?;
        write(
            dir.path().join(CONFIG_FILE_NAME),
            "[schedule]\nintervals_minutes = [1, 10, 100]\n",
        )?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.intervals.minutes(), &[1, 10, 100]);
        assert_eq!(config.intervals.max_index(), 2);
        Ok(())
    }

    #[test]
    fn test_invalid_intervals() {
        assert!(Config::parse("[schedule]\nintervals_minutes = []\n").is_err());
        assert!(Config::parse("[schedule]\nintervals_minutes = [5, -1]\n").is_err());
        assert!(
            Config::parse("[schedule]\nintervals_minutes = [5, 9223372036854775807]\n").is_err()
        );
    }

    #[test]
    fn test_unknown_key() {
        assert!(Config::parse("[schedule]\ninterval = 5\n").is_err());
    }
}
