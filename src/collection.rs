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

use std::env::current_dir;
use std::path::PathBuf;
use std::time::Instant;

use crate::cards::Cards;
use crate::config::Config;
use crate::db::Database;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::folder::Folder;
use crate::types::id::FolderId;

pub const DATABASE_FILE_NAME: &str = "flashdeck.db";

/// A collection directory: its configuration and its card database.
pub struct Collection {
    pub directory: PathBuf,
    pub config: Config,
    pub db: Database,
}

impl Collection {
    pub fn new(directory: Option<String>) -> Fallible<Self> {
        let directory: PathBuf = match directory {
            Some(dir) => PathBuf::from(dir),
            None => current_dir()?,
        };
        let directory = if directory.exists() {
            directory.canonicalize()?
        } else {
            return fail("directory does not exist.");
        };

        let config = Config::load(&directory)?;

        let db = {
            log::debug!("Opening database...");
            let start = Instant::now();
            let db = Database::new(&directory.join(DATABASE_FILE_NAME), config.intervals.clone())?;
            let duration = start.elapsed().as_millis();
            log::debug!("Database opened in {duration}ms.");
            db
        };

        Ok(Self {
            directory,
            config,
            db,
        })
    }

    /// Load the cards and folders together.
    pub fn load(&self) -> Fallible<(Cards, Vec<Folder>)> {
        let start = Instant::now();
        let cards = self.db.load_cards()?;
        let folders = self.db.load_folders()?;
        let duration = start.elapsed().as_millis();
        log::debug!(
            "Loaded {} cards in {} folders in {duration}ms.",
            cards.len(),
            folders.len()
        );
        Ok((cards, folders))
    }

    /// Resolve a folder given by id or by name.
    pub fn find_folder(&self, key: &str) -> Fallible<Folder> {
        let folders = self.db.load_folders()?;
        let id = FolderId::new(key);
        let found = folders
            .iter()
            .find(|f| f.id == id)
            .or_else(|| folders.iter().find(|f| f.name == key));
        match found {
            Some(folder) => Ok(folder.clone()),
            None => fail(format!("no folder with id or name '{key}'.")),
        }
    }
}
