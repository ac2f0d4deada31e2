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

use crate::cards::Cards;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::folder::Folder;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

pub fn print_stats(directory: Option<String>) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let (cards, folders) = collection.load()?;
    let stats = compute_stats(&cards, &folders, Timestamp::now());
    let stats_json = serde_json::to_string_pretty(&stats)?;
    println!("{}", stats_json);
    Ok(())
}

#[derive(Serialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    due_count: usize,
    mastered_count: usize,
    folders: Vec<FolderStats>,
}

#[derive(Serialize, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FolderStats {
    folder_id: FolderId,
    name: String,
    card_count: usize,
    due_count: usize,
    mastered_count: usize,
    correct_count: u32,
    incorrect_count: u32,
    pass_count: u32,
}

pub fn compute_stats(cards: &Cards, folders: &[Folder], now: Timestamp) -> Stats {
    let folders: Vec<FolderStats> = folders
        .iter()
        .map(|folder| {
            let mut stats = FolderStats {
                folder_id: folder.id.clone(),
                name: folder.name.clone(),
                card_count: 0,
                due_count: 0,
                mastered_count: 0,
                correct_count: 0,
                incorrect_count: 0,
                pass_count: 0,
            };
            for card in cards.in_folder(&folder.id) {
                stats.card_count += 1;
                if card.is_due(now) {
                    stats.due_count += 1;
                }
                if card.mastered {
                    stats.mastered_count += 1;
                }
                stats.correct_count += card.correct_count;
                stats.incorrect_count += card.incorrect_count;
                stats.pass_count += card.pass_count;
            }
            stats
        })
        .collect();
    Stats {
        card_count: cards.len(),
        due_count: cards.iter().filter(|c| c.is_due(now)).count(),
        mastered_count: cards.iter().filter(|c| c.mastered).count(),
        folders,
    }
}
