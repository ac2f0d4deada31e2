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

use std::io::BufRead;
use std::io::Write;
use std::io::stdin;
use std::io::stdout;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::session::Session;
use crate::store::CardStore;
use crate::types::answer::Answer;
use crate::types::folder::Folder;
use crate::types::timestamp::Timestamp;

pub fn drill(directory: Option<String>, folder: String) -> Fallible<()> {
    let collection = Collection::new(directory)?;
    let folder = collection.find_folder(&folder)?;
    let table = collection.config.intervals.clone();
    let mut session = Session::new(collection.db, table);
    let mut input = stdin().lock();
    let mut output = stdout().lock();
    run_drill(&mut session, &folder, &mut input, &mut output)
}

/// Drive a session from line-oriented input until the user quits, the
/// input ends, or nothing is left to review.
pub fn run_drill<S, R, W>(
    session: &mut Session<S>,
    folder: &Folder,
    input: &mut R,
    output: &mut W,
) -> Fallible<()>
where
    S: CardStore,
    R: BufRead,
    W: Write,
{
    session.start(folder.id.clone(), Timestamp::now())?;
    loop {
        let view = session.view();
        if view.finished {
            if view.total == 0 {
                writeln!(output, "No cards due in {}.", folder.name)?;
                return Ok(());
            }
            let summary = session.summary();
            writeln!(
                output,
                "Session completed: {} reviewed ({} correct, {} incorrect, {} passed).",
                summary.reviewed(),
                summary.correct,
                summary.incorrect,
                summary.passed
            )?;
            writeln!(output, "(r)estart, (q)uit")?;
            match read_line(input)?.as_deref().map(str::trim) {
                Some("r") => {
                    session.restart(folder.id.clone(), Timestamp::now());
                    continue;
                }
                _ => return Ok(()),
            }
        }
        let Some(card) = view.card else {
            return Ok(());
        };

        writeln!(output, "[{}] {} / {}", folder.name, view.position + 1, view.total)?;
        writeln!(output, "Q: {}", card.front)?;
        writeln!(output, "[press enter to reveal]")?;
        if read_line(input)?.is_none() {
            return Ok(());
        }
        writeln!(output, "A: {}", card.back)?;

        let answer = loop {
            writeln!(output, "(c)orrect, (i)ncorrect, (p)ass, (q)uit")?;
            let Some(line) = read_line(input)? else {
                return Ok(());
            };
            match line.trim() {
                "c" => break Answer::Correct,
                "i" => break Answer::Incorrect,
                "p" => break Answer::Pass,
                "q" => {
                    session.end();
                    return Ok(());
                }
                _ => writeln!(output, "Invalid input.")?,
            }
        };

        session.submit(&card.id, answer, Timestamp::now());
    }
}

/// Read one line, or `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        Ok(None)
    } else {
        Ok(Some(line))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::error::ErrorReport;
    use crate::helper::MemoryStore;
    use crate::helper::card;
    use crate::intervals::IntervalTable;
    use crate::types::card::Flashcard;
    use crate::types::id::CardId;
    use crate::types::id::FolderId;

    fn run(cards: Vec<Flashcard>, script: &str) -> Fallible<(Session<MemoryStore>, String)> {
        let mut session = Session::with_rng(
            MemoryStore::new(cards),
            IntervalTable::default(),
            StdRng::seed_from_u64(5),
        );
        let folder = Folder::new(FolderId::new("de"), "German");
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        run_drill(&mut session, &folder, &mut input, &mut output)?;
        let output = String::from_utf8(output).map_err(|e| ErrorReport::new(e.to_string()))?;
        Ok((session, output))
    }

    #[test]
    fn test_empty_folder() -> Fallible<()> {
        let (_, output) = run(vec![card("1", "fr")], "")?;
        assert_eq!(output, "No cards due in German.\n");
        Ok(())
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let (session, output) = run(vec![card("1", "de"), card("2", "de")], "\nc\n\ni\nq\n")?;
        assert!(output.contains("[German] 1 / 2"));
        assert!(output.contains("[German] 2 / 2"));
        assert!(output.contains("Session completed: 2 reviewed (1 correct, 1 incorrect, 0 passed)."));
        let stored = session.store().stored();
        let correct: u32 = stored.iter().map(|c| c.correct_count).sum();
        let incorrect: u32 = stored.iter().map(|c| c.incorrect_count).sum();
        assert_eq!((correct, incorrect), (1, 1));
        Ok(())
    }

    #[test]
    fn test_each_answer_moves_to_the_next_card() -> Fallible<()> {
        let cards = vec![card("1", "de"), card("2", "de"), card("3", "de")];
        let (session, output) = run(cards, "\nc\n\np\n\nc\nq\n")?;
        assert!(output.contains("[German] 3 / 3"));
        assert!(output.contains("Session completed: 3 reviewed (2 correct, 0 incorrect, 1 passed)."));
        for card in session.store().stored().iter() {
            assert_eq!(card.shown_count, 1);
            assert_eq!(card.correct_count + card.pass_count, 1);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_input_is_retried() -> Fallible<()> {
        let (session, output) = run(vec![card("1", "de")], "\nx\np\nq\n")?;
        assert!(output.contains("Invalid input."));
        let card = session.cards().get(&CardId::new("1")).cloned();
        assert_eq!(card.map(|c| c.pass_count), Some(1));
        Ok(())
    }

    #[test]
    fn test_quit_mid_session() -> Fallible<()> {
        let (session, output) = run(vec![card("1", "de"), card("2", "de")], "\nq\n")?;
        assert!(!output.contains("Session completed"));
        assert!(session.view().finished);
        assert_eq!(session.summary().reviewed(), 0);
        Ok(())
    }

    #[test]
    fn test_restart_requeues_nothing_right_away() -> Fallible<()> {
        // A failed card cools down for five minutes, so an immediate restart
        // finds nothing due.
        let (_, output) = run(vec![card("1", "de")], "\ni\nr\n")?;
        assert!(output.contains("Session completed: 1 reviewed"));
        assert!(output.ends_with("No cards due in German.\n"));
        Ok(())
    }

    #[test]
    fn test_end_of_input() -> Fallible<()> {
        let (session, _) = run(vec![card("1", "de")], "\n")?;
        assert_eq!(session.summary().reviewed(), 0);
        Ok(())
    }
}
