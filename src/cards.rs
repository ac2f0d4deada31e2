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

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;

use crate::intervals::IntervalTable;
use crate::schedule::apply_answer;
use crate::types::answer::Answer;
use crate::types::card::Flashcard;
use crate::types::folder::Folder;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

/// An immutable snapshot of the card collection. Cloning is cheap; every
/// mutation produces a new snapshot and leaves existing ones untouched.
#[derive(Clone, Default, Debug)]
pub struct Cards {
    inner: Arc<Vec<Flashcard>>,
}

impl Cards {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            inner: Arc::new(cards),
        }
    }

    pub fn as_slice(&self) -> &[Flashcard] {
        &self.inner
    }

    pub fn iter(&self) -> impl Iterator<Item = &Flashcard> {
        self.inner.iter()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn get(&self, id: &CardId) -> Option<&Flashcard> {
        self.inner.iter().find(|card| &card.id == id)
    }

    pub fn in_folder<'a>(&'a self, folder_id: &'a FolderId) -> impl Iterator<Item = &'a Flashcard> {
        self.inner.iter().filter(move |card| &card.folder_id == folder_id)
    }

    /// Whether both values are the same snapshot.
    pub fn same_snapshot(&self, other: &Cards) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Replace the card with the given id by the result of `updater`. If no
    /// card has that id, the same snapshot is returned.
    pub fn replace<F>(&self, id: &CardId, updater: F) -> Cards
    where
        F: FnOnce(&Flashcard) -> Flashcard,
    {
        let Some(position) = self.inner.iter().position(|card| &card.id == id) else {
            return self.clone();
        };
        let mut cards: Vec<Flashcard> = self.inner.as_ref().clone();
        cards[position] = updater(&self.inner[position]);
        Cards::new(cards)
    }

    /// Apply an answer to the card with the given id.
    pub fn answer(&self, id: &CardId, answer: Answer, now: Timestamp, table: &IntervalTable) -> Cards {
        self.replace(id, |card| apply_answer(card, answer, now, table))
    }

    /// Add a fresh card, deriving its id from the creation time.
    pub fn add(
        &self,
        front: impl Into<String>,
        back: impl Into<String>,
        folder_id: FolderId,
        now: Timestamp,
    ) -> (Cards, CardId) {
        let id = self.fresh_id(now);
        let card = Flashcard::new(id.clone(), front, back, folder_id);
        let mut cards: Vec<Flashcard> = self.inner.as_ref().clone();
        cards.push(card);
        (Cards::new(cards), id)
    }

    pub fn edit(&self, id: &CardId, front: impl Into<String>, back: impl Into<String>) -> Cards {
        let front = front.into();
        let back = back.into();
        self.replace(id, |card| Flashcard {
            front,
            back,
            ..card.clone()
        })
    }

    pub fn remove(&self, id: &CardId) -> Cards {
        if self.get(id).is_none() {
            return self.clone();
        }
        let cards: Vec<Flashcard> = self.inner.iter().filter(|card| &card.id != id).cloned().collect();
        Cards::new(cards)
    }

    /// Move every card of `from` into `to`.
    pub fn reassign_folder(&self, from: &FolderId, to: &FolderId) -> Cards {
        let cards: Vec<Flashcard> = self
            .inner
            .iter()
            .map(|card| {
                if &card.folder_id == from {
                    Flashcard {
                        folder_id: to.clone(),
                        ..card.clone()
                    }
                } else {
                    card.clone()
                }
            })
            .collect();
        Cards::new(cards)
    }

    /// Zero the review statistics of every card in `folder_id`. The
    /// scheduling state (interval index, due time, mastery) is kept.
    pub fn reset_stats(&self, folder_id: &FolderId) -> Cards {
        if self.in_folder(folder_id).next().is_none() {
            return self.clone();
        }
        let cards: Vec<Flashcard> = self
            .inner
            .iter()
            .map(|card| {
                if &card.folder_id == folder_id {
                    Flashcard {
                        shown_count: 0,
                        correct_count: 0,
                        incorrect_count: 0,
                        pass_count: 0,
                        last_answered_at: None,
                        last_result: None,
                        streak: 0,
                        ..card.clone()
                    }
                } else {
                    card.clone()
                }
            })
            .collect();
        Cards::new(cards)
    }

    /// Ids held by more than one card, in order of first appearance.
    pub fn duplicate_ids(&self) -> Vec<CardId> {
        let mut counts: HashMap<&CardId, usize> = HashMap::new();
        for card in self.inner.iter() {
            *counts.entry(&card.id).or_default() += 1;
        }
        let mut seen = HashSet::new();
        self.inner
            .iter()
            .filter(|card| counts[&card.id] > 1 && seen.insert(&card.id))
            .map(|card| card.id.clone())
            .collect()
    }

    /// Give every repeated id after its first occurrence a unique suffix.
    pub fn dedup_ids(&self) -> Cards {
        let mut taken: HashSet<CardId> = self.inner.iter().map(|card| card.id.clone()).collect();
        let mut seen: HashSet<CardId> = HashSet::new();
        let cards: Vec<Flashcard> = self
            .inner
            .iter()
            .map(|card| {
                if seen.insert(card.id.clone()) {
                    return card.clone();
                }
                let id = suffixed(card.id.as_str(), &taken);
                taken.insert(id.clone());
                seen.insert(id.clone());
                Flashcard {
                    id,
                    ..card.clone()
                }
            })
            .collect();
        Cards::new(cards)
    }

    /// Cards whose folder is not in `folders`.
    pub fn orphans(&self, folders: &[Folder]) -> Vec<&Flashcard> {
        let known: HashSet<&FolderId> = folders.iter().map(|f| &f.id).collect();
        self.inner
            .iter()
            .filter(|card| !known.contains(&card.folder_id))
            .collect()
    }

    pub fn to_vec(&self) -> Vec<Flashcard> {
        self.inner.as_ref().clone()
    }

    fn fresh_id(&self, now: Timestamp) -> CardId {
        let taken: HashSet<CardId> = self.inner.iter().map(|card| card.id.clone()).collect();
        let base = now.timestamp_millis().to_string();
        let id = CardId::new(base.clone());
        if taken.contains(&id) {
            suffixed(&base, &taken)
        } else {
            id
        }
    }
}

fn suffixed(base: &str, taken: &HashSet<CardId>) -> CardId {
    let mut n = 1;
    loop {
        let id = CardId::new(format!("{base}_{n}"));
        if !taken.contains(&id) {
            return id;
        }
        n += 1;
    }
}

/// Add a folder, deriving its id from the creation time.
pub fn add_folder(
    folders: &[Folder],
    name: impl Into<String>,
    color: Option<String>,
    icon: Option<String>,
    now: Timestamp,
) -> (Vec<Folder>, FolderId) {
    let base = now.timestamp_millis().to_string();
    let mut id = FolderId::new(base.clone());
    let mut n = 1;
    while folders.iter().any(|f| f.id == id) {
        id = FolderId::new(format!("{base}_{n}"));
        n += 1;
    }
    let mut folders = folders.to_vec();
    folders.push(Folder {
        id: id.clone(),
        name: name.into(),
        color,
        icon,
    });
    (folders, id)
}

/// Delete a folder, moving its cards to the uncategorized folder. Returns
/// `None` if the folder is the uncategorized folder or does not exist.
pub fn remove_folder(
    folders: &[Folder],
    cards: &Cards,
    id: &FolderId,
) -> Option<(Vec<Folder>, Cards)> {
    if id.is_uncategorized() || !folders.iter().any(|f| &f.id == id) {
        return None;
    }
    let mut remaining: Vec<Folder> = folders.iter().filter(|f| &f.id != id).cloned().collect();
    if !remaining.iter().any(|f| f.id.is_uncategorized()) {
        remaining.insert(0, Folder::uncategorized());
    }
    let cards = cards.reassign_folder(id, &FolderId::uncategorized());
    Some((remaining, cards))
}
