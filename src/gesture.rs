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

//! Turning a swipe into an answer, and sequencing the card's exit so that
//! one gesture produces exactly one answer.

use crate::types::answer::Answer;

/// Horizontal travel, in points, past which a released swipe counts.
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Classify a released swipe by its horizontal translation. Left means the
/// card was known, right means it was not; anything shorter snaps back.
pub fn classify_swipe(translation_x: f64) -> Option<Answer> {
    if translation_x < -SWIPE_THRESHOLD {
        Some(Answer::Correct)
    } else if translation_x > SWIPE_THRESHOLD {
        Some(Answer::Incorrect)
    } else {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Idle,
    /// The card is leaving the screen; further input is ignored.
    AnimatingOut(Answer),
    /// The exit finished; the caller advances and then resets.
    Settled(Answer),
}

#[derive(Debug)]
pub struct Sequencer {
    phase: Phase,
}

impl Sequencer {
    pub fn new() -> Self {
        Self { phase: Phase::Idle }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Begin the exit for an answer. Returns the answer only if nothing else
    /// is in flight, so a repeated trigger yields `None`.
    pub fn trigger(&mut self, answer: Answer) -> Option<Answer> {
        match self.phase {
            Phase::Idle => {
                self.phase = Phase::AnimatingOut(answer);
                Some(answer)
            }
            _ => None,
        }
    }

    /// Handle a released swipe.
    pub fn release(&mut self, translation_x: f64) -> Option<Answer> {
        classify_swipe(translation_x).and_then(|answer| self.trigger(answer))
    }

    /// The exit animation completed.
    pub fn settle(&mut self) -> Option<Answer> {
        match self.phase {
            Phase::AnimatingOut(answer) => {
                self.phase = Phase::Settled(answer);
                Some(answer)
            }
            _ => None,
        }
    }

    /// Ready for the next card.
    pub fn reset(&mut self) {
        if let Phase::Settled(_) = self.phase {
            self.phase = Phase::Idle;
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
