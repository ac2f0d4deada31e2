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

//! One study pass through the due cards of a folder.
//!
//! The session owns the live card snapshot. Every state change replaces the
//! snapshot and hands it to the store; the store may fail to write it, but
//! the session carries on with its in-memory state.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cards::Cards;
use crate::error::Fallible;
use crate::intervals::IntervalTable;
use crate::schedule::record_shown;
use crate::schedule::select_due;
use crate::store::CardStore;
use crate::types::answer::Answer;
use crate::types::card::Flashcard;
use crate::types::id::CardId;
use crate::types::id::FolderId;
use crate::types::timestamp::Timestamp;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Finished,
}

/// What the presentation layer renders.
#[derive(Clone, PartialEq, Debug)]
pub struct SessionView {
    /// The current card, as it is now (not as it was when queued).
    pub card: Option<Flashcard>,
    pub position: usize,
    pub total: usize,
    pub finished: bool,
}

/// Answer counts for the current pass.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Summary {
    pub correct: usize,
    pub incorrect: usize,
    pub passed: usize,
}

impl Summary {
    pub fn reviewed(&self) -> usize {
        self.correct + self.incorrect + self.passed
    }
}

pub struct Session<S: CardStore> {
    store: S,
    table: IntervalTable,
    rng: StdRng,
    cards: Cards,
    folder_id: Option<FolderId>,
    /// Cards as they were when the queue was built.
    queue: Vec<Flashcard>,
    position: usize,
    state: SessionState,
    /// The position whose card has already received an answer.
    answered: Option<usize>,
    /// The position whose display has already been counted.
    displayed: Option<usize>,
    /// The last show count this session saw for each card.
    observed_shown: HashMap<CardId, u32>,
    summary: Summary,
}

impl<S: CardStore> Session<S> {
    pub fn new(store: S, table: IntervalTable) -> Self {
        Self::with_rng(store, table, StdRng::from_entropy())
    }

    pub fn with_rng(store: S, table: IntervalTable, rng: StdRng) -> Self {
        Self {
            store,
            table,
            rng,
            cards: Cards::default(),
            folder_id: None,
            queue: Vec::new(),
            position: 0,
            state: SessionState::NotStarted,
            answered: None,
            displayed: None,
            observed_shown: HashMap::new(),
            summary: Summary::default(),
        }
    }

    /// Load the collection from the store and queue the folder's due cards.
    pub fn start(&mut self, folder_id: FolderId, now: Timestamp) -> Fallible<()> {
        self.cards = self.store.all_cards()?;
        log::debug!("Starting session in folder {folder_id}.");
        self.build_queue(folder_id, now);
        Ok(())
    }

    /// Queue the folder's due cards again, from the live in-memory
    /// collection rather than the stale queue or the store.
    pub fn restart(&mut self, folder_id: FolderId, now: Timestamp) {
        log::debug!("Restarting session in folder {folder_id}.");
        self.build_queue(folder_id, now);
    }

    fn build_queue(&mut self, folder_id: FolderId, now: Timestamp) {
        self.queue = select_due(self.cards.as_slice(), &folder_id, now, &mut self.rng);
        self.observed_shown = self
            .queue
            .iter()
            .map(|card| (card.id.clone(), card.shown_count))
            .collect();
        self.folder_id = Some(folder_id);
        self.position = 0;
        self.answered = None;
        self.displayed = None;
        self.summary = Summary::default();
        if self.queue.is_empty() {
            log::debug!("No cards due.");
            self.state = SessionState::Finished;
        } else {
            log::debug!("{} cards due.", self.queue.len());
            self.state = SessionState::InProgress;
            self.show_current();
        }
    }

    /// Count the display of the current card. Repeated calls for the same
    /// position do nothing, and so does a call when the stored count is
    /// already ahead of what this session last saw.
    pub fn show_current(&mut self) {
        if self.state != SessionState::InProgress || self.displayed == Some(self.position) {
            return;
        }
        let Some(id) = self.queue.get(self.position).map(|card| card.id.clone()) else {
            return;
        };
        self.displayed = Some(self.position);
        let Some(live) = self.cards.get(&id) else {
            return;
        };
        let observed = self.observed_shown.get(&id).copied().unwrap_or(live.shown_count);
        if live.shown_count > observed {
            log::debug!("Card {id}: display already counted elsewhere.");
            self.observed_shown.insert(id, live.shown_count);
            return;
        }
        let cards = self.cards.replace(&id, record_shown);
        if let Some(card) = cards.get(&id) {
            self.observed_shown.insert(id.clone(), card.shown_count);
        }
        self.commit(cards);
    }

    /// Apply an answer to the current card. Returns whether the answer was
    /// accepted: answers for any card but the current one, and repeated
    /// answers for the same position, are ignored.
    pub fn answer(&mut self, card_id: &CardId, answer: Answer, now: Timestamp) -> bool {
        if self.state != SessionState::InProgress {
            return false;
        }
        let Some(current) = self.queue.get(self.position) else {
            return false;
        };
        if &current.id != card_id {
            log::debug!("Ignoring {answer} for {card_id}: not the current card.");
            return false;
        }
        if self.answered == Some(self.position) {
            log::debug!("Ignoring repeated {answer} for {card_id}.");
            return false;
        }
        self.answered = Some(self.position);
        match answer {
            Answer::Correct => self.summary.correct += 1,
            Answer::Incorrect => self.summary.incorrect += 1,
            Answer::Pass => self.summary.passed += 1,
        }
        let cards = self.cards.answer(card_id, answer, now, &self.table);
        self.commit(cards);
        true
    }

    pub fn answer_correct(&mut self, card_id: &CardId, now: Timestamp) -> bool {
        self.answer(card_id, Answer::Correct, now)
    }

    pub fn answer_incorrect(&mut self, card_id: &CardId, now: Timestamp) -> bool {
        self.answer(card_id, Answer::Incorrect, now)
    }

    pub fn pass(&mut self, card_id: &CardId, now: Timestamp) -> bool {
        self.answer(card_id, Answer::Pass, now)
    }

    /// Answer the current card and, if the answer was accepted, move on.
    pub fn submit(&mut self, card_id: &CardId, answer: Answer, now: Timestamp) -> bool {
        let accepted = self.answer(card_id, answer, now);
        if accepted {
            self.advance();
        }
        accepted
    }

    /// Move to the next card, or finish after the last one.
    pub fn advance(&mut self) {
        if self.state != SessionState::InProgress {
            return;
        }
        if self.position + 1 < self.queue.len() {
            self.move_to(self.position + 1);
        } else {
            log::debug!(
                "Session completed: {} reviewed in folder {}.",
                self.summary.reviewed(),
                self.folder_id.as_ref().map(FolderId::as_str).unwrap_or_default()
            );
            self.state = SessionState::Finished;
        }
    }

    /// Move forward without answering. Stops at the last card.
    pub fn go_next(&mut self) {
        if self.state == SessionState::InProgress && self.position + 1 < self.queue.len() {
            self.move_to(self.position + 1);
        }
    }

    /// Move back without answering. Stops at the first card.
    pub fn go_previous(&mut self) {
        if self.state == SessionState::InProgress && self.position > 0 {
            self.move_to(self.position - 1);
        }
    }

    /// Finish the session early.
    pub fn end(&mut self) {
        if self.state == SessionState::InProgress {
            log::debug!("Session ended early.");
            self.state = SessionState::Finished;
        }
    }

    fn move_to(&mut self, position: usize) {
        self.position = position;
        self.answered = None;
        self.show_current();
    }

    /// Apply an edit made outside the session (for example, deleting a
    /// card) to the live collection.
    pub fn update_cards<F>(&mut self, update: F)
    where
        F: FnOnce(&Cards) -> Cards,
    {
        let cards = update(&self.cards);
        self.commit(cards);
    }

    fn commit(&mut self, cards: Cards) {
        if cards.same_snapshot(&self.cards) {
            return;
        }
        self.cards = cards;
        self.store.persist(&self.cards);
    }

    pub fn view(&self) -> SessionView {
        let card = match self.state {
            SessionState::InProgress => self.queue.get(self.position).map(|queued| {
                self.cards
                    .get(&queued.id)
                    .cloned()
                    .unwrap_or_else(|| queued.clone())
            }),
            _ => None,
        };
        SessionView {
            card,
            position: self.position,
            total: self.queue.len(),
            finished: self.state == SessionState::Finished,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn folder_id(&self) -> Option<&FolderId> {
        self.folder_id.as_ref()
    }

    pub fn cards(&self) -> &Cards {
        &self.cards
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
