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

//! The scheduling rules: which cards are due, and how an answer moves a
//! card through the interval table.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::intervals::IntervalTable;
use crate::types::answer::Answer;
use crate::types::card::Flashcard;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

/// The cards of `folder_id` that are eligible for review at `now`, in a
/// uniformly random order.
pub fn select_due<R: Rng + ?Sized>(
    cards: &[Flashcard],
    folder_id: &FolderId,
    now: Timestamp,
    rng: &mut R,
) -> Vec<Flashcard> {
    let mut due: Vec<Flashcard> = cards
        .iter()
        .filter(|card| &card.folder_id == folder_id && card.is_due(now))
        .cloned()
        .collect();
    due.shuffle(rng);
    due
}

/// Apply an answer to a card, returning the updated card.
pub fn apply_answer(
    card: &Flashcard,
    answer: Answer,
    now: Timestamp,
    table: &IntervalTable,
) -> Flashcard {
    let mut next = card.clone();
    match answer {
        Answer::Correct => {
            let index = table.clamp(card.interval_index + 1);
            next.interval_index = index;
            next.mastered = index == table.max_index();
            next.correct_count += 1;
            next.streak += 1;
        }
        Answer::Incorrect | Answer::Pass => {
            // A mastered card can only come back through a path outside the
            // due-set, but failure still un-masters it.
            next.interval_index = 0;
            next.mastered = false;
            next.streak = 0;
            if answer == Answer::Incorrect {
                next.incorrect_count += 1;
            } else {
                next.pass_count += 1;
            }
        }
    }
    let due = now.plus(table.duration(next.interval_index));
    next.next_due = Some(due);
    next.last_result = Some(answer);
    next.last_answered_at = Some(now);
    log::debug!(
        "{} {} index={} mastered={} due={due}",
        card.id,
        answer,
        next.interval_index,
        next.mastered,
    );
    next
}

/// Count one more display of the card.
pub fn record_shown(card: &Flashcard) -> Flashcard {
    let mut next = card.clone();
    next.shown_count += 1;
    next
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::types::id::CardId;

    fn card(id: &str, folder: &str) -> Flashcard {
        Flashcard::new(CardId::new(id), "front", "back", FolderId::new(folder))
    }

    fn ids(cards: &[Flashcard]) -> Vec<&str> {
        let mut ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn test_select_due_filters() {
        let now = Timestamp::now();
        let mut rng = StdRng::seed_from_u64(7);
        let fresh = card("fresh", "a");
        let mut overdue = card("overdue", "a");
        overdue.next_due = Some(now.minus(Duration::hours(1)));
        let mut later = card("later", "a");
        later.next_due = Some(now.plus(Duration::hours(1)));
        let mut mastered = card("mastered", "a");
        mastered.mastered = true;
        mastered.interval_index = 6;
        mastered.next_due = Some(now.minus(Duration::days(1)));
        let other = card("other", "b");
        let cards = vec![fresh, overdue, later, mastered, other];
        let due = select_due(&cards, &FolderId::new("a"), now, &mut rng);
        assert_eq!(ids(&due), vec!["fresh", "overdue"]);
    }

    #[test]
    fn test_select_due_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        let due = select_due(&[], &FolderId::new("a"), Timestamp::now(), &mut rng);
        assert!(due.is_empty());
    }

    #[test]
    fn test_select_due_is_pure() {
        let now = Timestamp::now();
        let mut rng = StdRng::seed_from_u64(7);
        let cards = vec![card("1", "a"), card("2", "a"), card("3", "a")];
        let before = cards.clone();
        let _ = select_due(&cards, &FolderId::new("a"), now, &mut rng);
        assert_eq!(cards, before);
    }

    #[test]
    fn test_select_due_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(1);
        let cards: Vec<Flashcard> = (0..50).map(|i| card(&i.to_string(), "a")).collect();
        let due = select_due(&cards, &FolderId::new("a"), Timestamp::now(), &mut rng);
        assert_eq!(due.len(), 50);
        assert_eq!(ids(&due), ids(&cards));
    }

    #[test]
    fn test_select_due_order_is_uniform() {
        const N: usize = 4;
        const TRIALS: usize = 40_000;
        let now = Timestamp::now();
        let folder = FolderId::new("a");
        let cards: Vec<Flashcard> = (0..N).map(|i| card(&i.to_string(), "a")).collect();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts = [[0usize; N]; N];
        for _ in 0..TRIALS {
            let due = select_due(&cards, &folder, now, &mut rng);
            for (position, c) in due.iter().enumerate() {
                let item: usize = c.id.as_str().parse().unwrap();
                counts[item][position] += 1;
            }
        }
        let expected = TRIALS as f64 / N as f64;
        for row in counts.iter() {
            for count in row.iter() {
                let deviation = (*count as f64 - expected).abs() / expected;
                assert!(deviation < 0.05, "count {count} too far from {expected}");
            }
        }
    }

    #[test]
    fn test_correct_on_fresh_card() {
        let now = Timestamp::now();
        let table = IntervalTable::default();
        let next = apply_answer(&card("1", "a"), Answer::Correct, now, &table);
        assert_eq!(next.interval_index, 1);
        assert_eq!(next.next_due, Some(now.plus(Duration::minutes(15))));
        assert!(!next.mastered);
        assert_eq!(next.correct_count, 1);
        assert_eq!(next.streak, 1);
        assert_eq!(next.last_result, Some(Answer::Correct));
        assert_eq!(next.last_answered_at, Some(now));
    }

    #[test]
    fn test_correct_reaches_mastery() {
        let now = Timestamp::now();
        let table = IntervalTable::default();
        let mut c = card("1", "a");
        c.interval_index = 5;
        let next = apply_answer(&c, Answer::Correct, now, &table);
        assert_eq!(next.interval_index, 6);
        assert!(next.mastered);
        assert_eq!(next.next_due, Some(now.plus(Duration::days(7))));
    }

    #[test]
    fn test_correct_at_top_stays_at_top() {
        let now = Timestamp::now();
        let table = IntervalTable::default();
        let mut c = card("1", "a");
        c.interval_index = 6;
        let next = apply_answer(&c, Answer::Correct, now, &table);
        assert_eq!(next.interval_index, 6);
        assert!(next.mastered);
        assert_eq!(next.next_due, Some(now.plus(Duration::minutes(10080))));
        let mut rng = StdRng::seed_from_u64(3);
        let later = now.plus(Duration::days(365));
        assert!(select_due(&[next], &FolderId::new("a"), later, &mut rng).is_empty());
    }

    #[test]
    fn test_repeated_correct_is_monotonic() {
        let table = IntervalTable::default();
        let mut now = Timestamp::now();
        let mut c = card("1", "a");
        for _ in 0..20 {
            let next = apply_answer(&c, Answer::Correct, now, &table);
            assert!(next.interval_index >= c.interval_index);
            assert!(next.interval_index <= table.max_index());
            c = next;
            now = now.plus(Duration::days(8));
        }
        assert_eq!(c.streak, 20);
    }

    #[test]
    fn test_incorrect_resets_from_any_state() {
        let now = Timestamp::now();
        let table = IntervalTable::default();
        for index in 0..=table.max_index() {
            for mastered in [false, true] {
                let mut c = card("1", "a");
                c.interval_index = index;
                c.mastered = mastered;
                c.streak = 9;
                let next = apply_answer(&c, Answer::Incorrect, now, &table);
                assert_eq!(next.interval_index, 0);
                assert!(!next.mastered);
                assert_eq!(next.streak, 0);
                assert_eq!(next.incorrect_count, 1);
                assert_eq!(next.next_due, Some(now.plus(Duration::minutes(5))));
                assert_eq!(next.last_result, Some(Answer::Incorrect));
            }
        }
    }

    #[test]
    fn test_pass_resets_without_counting_incorrect() {
        let now = Timestamp::now();
        let table = IntervalTable::default();
        let mut c = card("1", "a");
        c.interval_index = 3;
        c.streak = 3;
        let next = apply_answer(&c, Answer::Pass, now, &table);
        assert_eq!(next.interval_index, 0);
        assert_eq!(next.pass_count, 1);
        assert_eq!(next.incorrect_count, 0);
        assert_eq!(next.streak, 0);
        assert_eq!(next.last_result, Some(Answer::Pass));
        assert_eq!(next.next_due, Some(now.plus(Duration::minutes(5))));
    }

    #[test]
    fn test_record_shown() {
        let c = card("1", "a");
        assert_eq!(record_shown(&c).shown_count, 1);
        assert_eq!(c.shown_count, 0);
    }
}
