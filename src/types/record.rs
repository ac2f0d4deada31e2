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

use serde::Deserialize;

use crate::intervals::IntervalTable;
use crate::types::answer::Answer;
use crate::types::card::Flashcard;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

/// A flashcard as persisted. Every field but the id may be absent or null,
/// since records written before spaced repetition existed lack the
/// scheduling fields.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CardRecord {
    pub id: CardId,
    #[serde(default)]
    pub front: Option<String>,
    #[serde(default)]
    pub back: Option<String>,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub shown_count: Option<u32>,
    #[serde(default)]
    pub correct_count: Option<u32>,
    #[serde(default)]
    pub incorrect_count: Option<u32>,
    #[serde(default)]
    pub pass_count: Option<u32>,
    #[serde(default)]
    pub last_answered_at: Option<String>,
    #[serde(default)]
    pub last_result: Option<String>,
    #[serde(default)]
    pub streak: Option<u32>,
    #[serde(default)]
    pub interval_index: Option<usize>,
    #[serde(default)]
    pub next_due: Option<String>,
    #[serde(default)]
    pub mastered: Option<bool>,
}

impl CardRecord {
    /// Fill in defaults for every missing field. Malformed timestamps and
    /// unknown results are dropped with a warning.
    pub fn normalize(self, table: &IntervalTable) -> Flashcard {
        let id = self.id;
        let last_answered_at = parse_timestamp(&id, "lastAnsweredAt", self.last_answered_at);
        let next_due = parse_timestamp(&id, "nextDue", self.next_due);
        let last_result = self.last_result.and_then(|s| match s.as_str() {
            "correct" => Some(Answer::Correct),
            "incorrect" => Some(Answer::Incorrect),
            "pass" => Some(Answer::Pass),
            _ => {
                log::warn!("Card {id}: ignoring unknown lastResult '{s}'.");
                None
            }
        });
        let interval_index = self.interval_index.unwrap_or(0);
        if interval_index > table.max_index() {
            log::warn!(
                "Card {id}: interval index {interval_index} is past the end of the table, clamping."
            );
        }
        Flashcard {
            front: self.front.unwrap_or_default(),
            back: self.back.unwrap_or_default(),
            folder_id: self.folder_id.unwrap_or_else(FolderId::uncategorized),
            shown_count: self.shown_count.unwrap_or(0),
            correct_count: self.correct_count.unwrap_or(0),
            incorrect_count: self.incorrect_count.unwrap_or(0),
            pass_count: self.pass_count.unwrap_or(0),
            last_answered_at,
            last_result,
            streak: self.streak.unwrap_or(0),
            interval_index: table.clamp(interval_index),
            next_due,
            mastered: self.mastered.unwrap_or(false),
            id,
        }
    }
}

fn parse_timestamp(id: &CardId, field: &str, value: Option<String>) -> Option<Timestamp> {
    let value = value?;
    match Timestamp::parse(&value) {
        Ok(ts) => Some(ts),
        Err(e) => {
            log::warn!("Card {id}: treating {field} as absent: {e}");
            None
        }
    }
}

/// Parse a JSON array of card records into normalized cards.
pub fn parse_cards(json: &str, table: &IntervalTable) -> serde_json::Result<Vec<Flashcard>> {
    let records: Vec<CardRecord> = serde_json::from_str(json)?;
    Ok(records.into_iter().map(|r| r.normalize(table)).collect())
}
