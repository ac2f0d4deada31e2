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

use std::path::Path;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;

use crate::cards::Cards;
use crate::error::Fallible;
use crate::intervals::IntervalTable;
use crate::types::folder::Folder;
use crate::types::folder::default_folders;
use crate::types::record::parse_cards;

const CARDS_KEY: &str = "flashcards";
const FOLDERS_KEY: &str = "folders";

/// A key-value store of JSON blobs, backed by SQLite.
pub struct Database {
    conn: Connection,
    table: IntervalTable,
}

impl Database {
    pub fn new(database_path: &Path, table: IntervalTable) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {}.", database_path.display());
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn, table })
    }

    /// Load every card, normalizing legacy records. Repeated ids are given
    /// unique suffixes, so that each card can be addressed on its own.
    pub fn load_cards(&self) -> Fallible<Cards> {
        let cards = self.load_stored_cards()?;
        let duplicates = cards.duplicate_ids();
        if duplicates.is_empty() {
            return Ok(cards);
        }
        for id in &duplicates {
            log::warn!("Card id {id} is used by more than one card; renaming the copies.");
        }
        Ok(cards.dedup_ids())
    }

    /// Load every card as stored, repeated ids included.
    pub fn load_stored_cards(&self) -> Fallible<Cards> {
        match self.get(CARDS_KEY)? {
            Some(json) => Ok(Cards::new(parse_cards(&json, &self.table)?)),
            None => Ok(Cards::default()),
        }
    }

    pub fn save_cards(&self, cards: &Cards) -> Fallible<()> {
        let json = serde_json::to_string(cards.as_slice())?;
        self.set(CARDS_KEY, &json)
    }

    /// Load the folder list. A collection that has never saved folders has
    /// the uncategorized folder only.
    pub fn load_folders(&self) -> Fallible<Vec<Folder>> {
        match self.get(FOLDERS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(default_folders()),
        }
    }

    pub fn save_folders(&self, folders: &[Folder]) -> Fallible<()> {
        let json = serde_json::to_string(folders)?;
        self.set(FOLDERS_KEY, &json)
    }

    fn get(&self, key: &str) -> Fallible<Option<String>> {
        let sql = "select value from storage where key = ?;";
        let value: Option<String> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Fallible<()> {
        let sql = "insert into storage (key, value) values (?, ?) on conflict (key) do update set value = excluded.value;";
        self.conn.execute(sql, (key, value))?;
        Ok(())
    }

    #[cfg(test)]
    pub fn set_raw(&self, key: &str, value: &str) -> Fallible<()> {
        self.set(key, value)
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["storage"], |row| row.get(0))?;
    Ok(count > 0)
}
