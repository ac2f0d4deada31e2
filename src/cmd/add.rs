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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::id::CardId;
use crate::types::timestamp::Timestamp;

pub fn add_card(directory: Option<String>, folder: String, front: String, back: String) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let id = add_to_collection(&collection, &folder, &front, &back, Timestamp::now())?;
    println!("{id}");
    Ok(())
}

fn add_to_collection(
    collection: &Collection,
    folder: &str,
    front: &str,
    back: &str,
    now: Timestamp,
) -> Fallible<CardId> {
    let folder = collection.find_folder(folder)?;
    let cards = collection.db.load_cards()?;
    let (cards, id) = cards.add(front.trim(), back.trim(), folder.id, now);
    collection.db.save_cards(&cards)?;
    log::debug!("Added card {id}.");
    Ok(id)
}
