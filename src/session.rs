use tracing::{debug, info};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Typing,
    Completed,
}

/// Final tally reported once the whole sample has been typed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Score {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
}

impl Score {
    /// Percentage of correctly typed characters, rounded. An empty sample counts as 100.
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round()
    }
}

/// represents one pass over the sample text
///
/// Every keystroke consumes exactly one position, right or wrong; there is no
/// way back. `error_count <= cursor` and `verdicts.len() == cursor` hold after
/// every call.
#[derive(Debug, Clone)]
pub struct Session {
    sample: Vec<char>,
    cursor: usize,
    error_count: usize,
    verdicts: Vec<Verdict>,
    completion_reported: bool,
}

impl Session {
    pub fn new(sample: impl Into<String>) -> Self {
        let sample: Vec<char> = sample.into().chars().collect();
        info!(chars = sample.len(), "typing session created");
        Self {
            verdicts: Vec::with_capacity(sample.len()),
            sample,
            cursor: 0,
            error_count: 0,
            completion_reported: false,
        }
    }

    pub fn sample(&self) -> &[char] {
        &self.sample
    }

    pub fn len(&self) -> usize {
        self.sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn verdict_at(&self, idx: usize) -> Option<Verdict> {
        self.verdicts.get(idx).copied()
    }

    pub fn expected_char(&self, idx: usize) -> Option<char> {
        self.sample.get(idx).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.cursor == self.sample.len()
    }

    pub fn phase(&self) -> Phase {
        if self.completion_reported {
            Phase::Completed
        } else {
            Phase::Typing
        }
    }

    /// Current tallies, whether or not completion has been reported yet
    pub fn score(&self) -> Score {
        Score {
            total: self.cursor,
            correct: self.cursor - self.error_count,
            incorrect: self.error_count,
        }
    }

    /// Judge one typed character against the expected one and advance.
    ///
    /// Returns the final score on the keystroke that reaches the end of the
    /// sample; every later call returns `None` and changes nothing.
    pub fn handle_keystroke(&mut self, typed: char) -> Option<Score> {
        if let Some(expected) = self.expected_char(self.cursor) {
            let verdict = if typed == expected {
                Verdict::Correct
            } else {
                self.error_count += 1;
                Verdict::Incorrect
            };
            debug!(pos = self.cursor, ?typed, ?expected, ?verdict, "keystroke");
            self.verdicts.push(verdict);
            self.cursor += 1;
        }

        self.poll_completion()
    }

    /// Periodic completion check. Fires at most once per session.
    pub fn poll_completion(&mut self) -> Option<Score> {
        if self.completion_reported || !self.is_finished() {
            return None;
        }
        self.completion_reported = true;
        let score = self.score();
        info!(
            total = score.total,
            correct = score.correct,
            incorrect = score.incorrect,
            "typing session completed"
        );
        Some(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn type_all(session: &mut Session, keys: &str) -> Vec<Option<Score>> {
        keys.chars().map(|c| session.handle_keystroke(c)).collect()
    }

    #[test]
    fn test_session_new() {
        let session = Session::new("hello");

        assert_eq!(session.len(), 5);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.error_count(), 0);
        assert!(session.verdicts().is_empty());
        assert_eq!(session.phase(), Phase::Typing);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_all_correct() {
        let mut session = Session::new("cat");

        let events = type_all(&mut session, "cat");

        assert!(events[..2].iter().all(Option::is_none));
        assert_eq!(
            events[2],
            Some(Score {
                total: 3,
                correct: 3,
                incorrect: 0
            })
        );
        assert_eq!(session.cursor(), 3);
        assert_eq!(session.error_count(), 0);
        assert_eq!(session.phase(), Phase::Completed);
    }

    #[test]
    fn test_one_mistake() {
        let mut session = Session::new("cat");

        let events = type_all(&mut session, "cxt");

        assert_eq!(
            events[2],
            Some(Score {
                total: 3,
                correct: 2,
                incorrect: 1
            })
        );
        assert_eq!(session.error_count(), 1);
        assert_eq!(
            session.verdicts(),
            [Verdict::Correct, Verdict::Incorrect, Verdict::Correct]
        );
    }

    #[test]
    fn test_incorrect_keystroke_still_advances() {
        let mut session = Session::new("ab");

        assert_eq!(session.handle_keystroke('x'), None);

        assert_eq!(session.cursor(), 1);
        assert_eq!(session.verdict_at(0), Some(Verdict::Incorrect));
        assert_eq!(session.verdict_at(1), None);
    }

    #[test]
    fn test_empty_sample_completes_on_first_poll() {
        let mut session = Session::new("");

        assert!(session.is_finished());
        assert_eq!(
            session.poll_completion(),
            Some(Score {
                total: 0,
                correct: 0,
                incorrect: 0
            })
        );
        assert_eq!(session.poll_completion(), None);
    }

    #[test]
    fn test_completion_fires_once() {
        let mut session = Session::new("hi");
        type_all(&mut session, "hi");

        assert_eq!(session.handle_keystroke('x'), None);
        assert_eq!(session.handle_keystroke('i'), None);
        assert_eq!(session.poll_completion(), None);

        assert_eq!(session.cursor(), 2);
        assert_eq!(session.error_count(), 0);
    }

    #[test]
    fn test_poll_before_finish_is_quiet() {
        let mut session = Session::new("hi");
        session.handle_keystroke('h');

        assert_eq!(session.poll_completion(), None);
        assert_eq!(session.phase(), Phase::Typing);
    }

    #[test]
    fn test_poll_after_inline_completion_is_quiet() {
        let mut session = Session::new("a");
        let _ = session.handle_keystroke('a');

        // already reported inline
        assert_eq!(session.poll_completion(), None);
        assert_matches!(session.phase(), Phase::Completed);
    }

    #[test]
    fn test_multibyte_chars_count_once() {
        let mut session = Session::new("héllo");
        assert_eq!(session.len(), 5);

        let score = type_all(&mut session, "héllo").pop().flatten();

        assert_matches!(score, Some(Score { total: 5, correct: 5, incorrect: 0 }));
    }

    #[test]
    fn test_score_accuracy() {
        let score = Score {
            total: 4,
            correct: 3,
            incorrect: 1,
        };
        assert_eq!(score.accuracy(), 75.0);

        let empty = Score {
            total: 0,
            correct: 0,
            incorrect: 0,
        };
        assert_eq!(empty.accuracy(), 100.0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Typing.to_string(), "Typing");
        assert_eq!(Phase::Completed.to_string(), "Completed");
    }
}
