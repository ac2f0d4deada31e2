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

use serde::Serialize;

use crate::types::answer::Answer;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

/// A fully-populated flashcard. Legacy records are normalized into this
/// shape once, at load time (see [`crate::types::record::CardRecord`]).
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: CardId,
    pub front: String,
    pub back: String,
    /// The folder this card is grouped under.
    pub folder_id: FolderId,
    pub shown_count: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub pass_count: u32,
    /// When the card last received a terminal answer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_answered_at: Option<Timestamp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<Answer>,
    /// Consecutive correct answers.
    pub streak: u32,
    /// Position in the interval table.
    pub interval_index: usize,
    /// The card is not eligible for review before this time. Absent means
    /// always eligible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_due: Option<Timestamp>,
    /// Mastered cards are excluded from every due-set.
    pub mastered: bool,
}

impl Flashcard {
    /// A card that has never been shown or answered.
    pub fn new(
        id: CardId,
        front: impl Into<String>,
        back: impl Into<String>,
        folder_id: FolderId,
    ) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
            folder_id,
            shown_count: 0,
            correct_count: 0,
            incorrect_count: 0,
            pass_count: 0,
            last_answered_at: None,
            last_result: None,
            streak: 0,
            interval_index: 0,
            next_due: None,
            mastered: false,
        }
    }

    /// Whether the card may be reviewed at `now`, ignoring folders.
    pub fn is_due(&self, now: Timestamp) -> bool {
        if self.mastered {
            return false;
        }
        match self.next_due {
            None => true,
            Some(next_due) => next_due <= now,
        }
    }
}
