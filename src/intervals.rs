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

use chrono::Duration;

use crate::error::Fallible;
use crate::error::fail;

/// Wait periods, in minutes, indexed by a card's interval index: 5 minutes,
/// 15 minutes, 1 hour, 6 hours, 1 day, 3 days, 7 days.
pub const DEFAULT_INTERVALS_MINUTES: [i64; 7] = [5, 15, 60, 360, 1440, 4320, 10080];

/// The longest allowed wait period: one hundred years.
pub const MAX_INTERVAL_MINUTES: i64 = 100 * 365 * 24 * 60;

/// The escalating table of wait periods. The last index is the mastery
/// index: reaching it through a correct answer retires the card.
#[derive(Clone, PartialEq, Debug)]
pub struct IntervalTable {
    minutes: Vec<i64>,
}

impl IntervalTable {
    pub fn new(minutes: Vec<i64>) -> Fallible<Self> {
        if minutes.is_empty() {
            return fail("the interval table must have at least one entry.");
        }
        for m in minutes.iter().copied() {
            if m <= 0 {
                return fail(format!("interval of {m} minutes is not positive."));
            }
            if m > MAX_INTERVAL_MINUTES || Duration::try_minutes(m).is_none() {
                return fail(format!(
                    "interval of {m} minutes exceeds the maximum of {MAX_INTERVAL_MINUTES}."
                ));
            }
        }
        Ok(Self { minutes })
    }

    /// The highest valid interval index.
    pub fn max_index(&self) -> usize {
        self.minutes.len() - 1
    }

    pub fn clamp(&self, index: usize) -> usize {
        index.min(self.max_index())
    }

    /// The wait period for an index. Indices past the end use the last
    /// entry.
    pub fn duration(&self, index: usize) -> Duration {
        Duration::minutes(self.minutes[self.clamp(index)])
    }

    pub fn minutes(&self) -> &[i64] {
        &self.minutes
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_INTERVALS_MINUTES.to_vec(),
        }
    }
}
