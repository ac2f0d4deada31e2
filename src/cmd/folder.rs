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

use crate::cards::add_folder;
use crate::cards::remove_folder;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

pub fn create_folder(
    directory: Option<String>,
    name: String,
    color: Option<String>,
    icon: Option<String>,
) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let folders = collection.db.load_folders()?;
    let (folders, id) = add_folder(&folders, name.trim(), color, icon, Timestamp::now());
    collection.db.save_folders(&folders)?;
    println!("{id}");
    Ok(())
}

pub fn delete_folder(directory: Option<String>, id: String) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    delete_from_collection(&collection, &FolderId::new(id))
}

fn delete_from_collection(collection: &Collection, id: &FolderId) -> Fallible<()> {
    if id.is_uncategorized() {
        return fail("the uncategorized folder cannot be deleted.");
    }
    let (cards, folders) = collection.load()?;
    let Some((folders, cards)) = remove_folder(&folders, &cards, id) else {
        return fail(format!("no folder with id '{id}'."));
    };
    collection.db.save_cards(&cards)?;
    collection.db.save_folders(&folders)?;
    log::debug!("Deleted folder {id}.");
    Ok(())
}

/// Zero the review statistics of the cards in a folder, given by id or
/// name.
pub fn reset_folder_stats(directory: Option<String>, key: String) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    reset_in_collection(&collection, &key)
}

fn reset_in_collection(collection: &Collection, key: &str) -> Fallible<()> {
    let folder = collection.find_folder(key)?;
    let cards = collection.db.load_cards()?;
    let count = cards.in_folder(&folder.id).count();
    let reset = cards.reset_stats(&folder.id);
    if !reset.same_snapshot(&cards) {
        collection.db.save_cards(&reset)?;
    }
    log::debug!("Reset statistics of {count} cards in folder {}.", folder.id);
    Ok(())
}

pub fn list_folders(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let (cards, folders) = collection.load()?;
    for folder in folders {
        let count = cards.in_folder(&folder.id).count();
        println!("{}\t{}\t{count}", folder.id, folder.name);
    }
    Ok(())
}
