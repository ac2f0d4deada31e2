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

use crate::cards::Cards;
use crate::db::Database;
use crate::error::Fallible;
use crate::types::folder::Folder;

/// Where the card collection lives. Persisting is fire-and-forget: a store
/// reports failures through the log and never to the caller.
pub trait CardStore {
    fn all_cards(&self) -> Fallible<Cards>;

    fn all_folders(&self) -> Fallible<Vec<Folder>>;

    fn persist(&self, cards: &Cards);
}

impl CardStore for Database {
    fn all_cards(&self) -> Fallible<Cards> {
        self.load_cards()
    }

    fn all_folders(&self) -> Fallible<Vec<Folder>> {
        self.load_folders()
    }

    fn persist(&self, cards: &Cards) {
        if let Err(e) = self.save_cards(cards) {
            log::error!("failed to persist cards: {e}");
        }
    }
}
