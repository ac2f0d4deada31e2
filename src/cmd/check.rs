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
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::folder::Folder;
use crate::types::id::FolderId;

pub fn check_collection(directory: Option<String>, fix: bool) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let cards = collection.db.load_stored_cards()?;
    let folders = collection.db.load_folders()?;
    let problems = find_problems(&cards, &folders);
    if problems.is_empty() {
        println!("ok");
        return Ok(());
    }
    for problem in &problems {
        println!("{problem}");
    }
    if fix {
        let (cards, folders) = repair(&cards, &folders);
        collection.db.save_cards(&cards)?;
        collection.db.save_folders(&folders)?;
        println!("fixed {} problems", problems.len());
    }
    Ok(())
}

fn find_problems(cards: &Cards, folders: &[Folder]) -> Vec<String> {
    let mut problems = Vec::new();
    for id in cards.duplicate_ids() {
        problems.push(format!("duplicate card id: {id}"));
    }
    for card in cards.orphans(folders) {
        problems.push(format!(
            "card {} belongs to unknown folder: {}",
            card.id, card.folder_id
        ));
    }
    problems
}

/// Give duplicate ids unique suffixes and move orphaned cards to the
/// uncategorized folder.
fn repair(cards: &Cards, folders: &[Folder]) -> (Cards, Vec<Folder>) {
    let mut folders = folders.to_vec();
    if !folders.iter().any(|f| f.id.is_uncategorized()) {
        folders.insert(0, Folder::uncategorized());
    }
    let mut cards = cards.dedup_ids();
    let orphaned: Vec<FolderId> = cards
        .orphans(&folders)
        .into_iter()
        .map(|card| card.folder_id.clone())
        .collect();
    for folder_id in orphaned {
        cards = cards.reassign_folder(&folder_id, &FolderId::uncategorized());
    }
    (cards, folders)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::card;

    #[test]
    fn test_non_existent_directory() {
        assert!(check_collection(Some("./derpherp".to_string()), false).is_err());
    }

    #[test]
    fn test_clean_collection() {
        let cards = Cards::new(vec![card("1", "uncategorized")]);
        assert!(find_problems(&cards, &[Folder::uncategorized()]).is_empty());
    }

    #[test]
    fn test_find_and_repair() {
        let cards = Cards::new(vec![
            card("1", "uncategorized"),
            card("1", "uncategorized"),
            card("2", "gone"),
        ]);
        let folders = vec![Folder::uncategorized()];
        let problems = find_problems(&cards, &folders);
        assert_eq!(
            problems,
            vec![
                "duplicate card id: 1".to_string(),
                "card 2 belongs to unknown folder: gone".to_string(),
            ]
        );
        let (cards, folders) = repair(&cards, &folders);
        assert!(find_problems(&cards, &folders).is_empty());
        assert_eq!(cards.len(), 3);
    }

    #[test]
    fn test_repair_restores_uncategorized() {
        let cards = Cards::new(vec![card("1", "gone")]);
        let (cards, folders) = repair(&cards, &[]);
        assert_eq!(folders, vec![Folder::uncategorized()]);
        assert!(find_problems(&cards, &folders).is_empty());
    }

    #[test]
    fn test_fix_renames_stored_duplicates() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let directory = dir.path().display().to_string();
        let collection = Collection::new(Some(directory.clone()))?;
        collection.db.set_raw(
            "flashcards",
            r#"[{"id":"dup","front":"a","back":"1","folderId":"uncategorized"},{"id":"dup","front":"b","back":"2","folderId":"uncategorized"}]"#,
        )?;
        check_collection(Some(directory.clone()), true)?;
        let stored = collection.db.load_stored_cards()?;
        assert_eq!(stored.len(), 2);
        assert!(stored.duplicate_ids().is_empty());
        Ok(())
    }
}
