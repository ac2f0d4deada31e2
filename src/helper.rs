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

use std::cell::Cell;
use std::cell::RefCell;

use crate::cards::Cards;
use crate::error::Fallible;
use crate::store::CardStore;
use crate::types::card::Flashcard;
use crate::types::folder::Folder;
use crate::types::folder::default_folders;
use crate::types::id::CardId;
use crate::types::id::FolderId;

/// An in-memory card store that counts writes and can be told to drop them.
pub struct MemoryStore {
    cards: RefCell<Cards>,
    folders: Vec<Folder>,
    persist_count: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryStore {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self {
            cards: RefCell::new(Cards::new(cards)),
            folders: default_folders(),
            persist_count: Cell::new(0),
            failing: Cell::new(false),
        }
    }

    /// Stored cards, as of the last successful persist.
    pub fn stored(&self) -> Cards {
        self.cards.borrow().clone()
    }

    pub fn persist_count(&self) -> usize {
        self.persist_count.get()
    }

    /// Make every following persist fail.
    pub fn fail_writes(&self) {
        self.failing.set(true);
    }
}

impl CardStore for MemoryStore {
    fn all_cards(&self) -> Fallible<Cards> {
        Ok(self.stored())
    }

    fn all_folders(&self) -> Fallible<Vec<Folder>> {
        Ok(self.folders.clone())
    }

    fn persist(&self, cards: &Cards) {
        self.persist_count.set(self.persist_count.get() + 1);
        if self.failing.get() {
            log::error!("failed to persist cards: store is failing");
            return;
        }
        *self.cards.borrow_mut() = cards.clone();
    }
}

pub fn card(id: &str, folder: &str) -> Flashcard {
    Flashcard::new(
        CardId::new(id),
        format!("front {id}"),
        format!("back {id}"),
        FolderId::new(folder),
    )
}
