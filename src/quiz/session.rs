use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::quiz::{AnswerValue, GameMode, Question, QuizError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Phase {
    /// Waiting for the player to pick an option.
    Asking,
    /// Showing whether the pick was right, until the player moves on.
    Revealing,
    Finished,
}

/// Identifies the submission a piece of feedback text belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FeedbackTicket {
    pub round: u64,
    pub question: usize,
}

/// What an accepted submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub ticket: FeedbackTicket,
    pub correct: bool,
    /// Score after this answer was counted.
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinishedResult {
    pub final_score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Not revealing anything, or feedback still on its way; nothing happened.
    Ignored,
    NextQuestion,
    Finished(FinishedResult),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
enum Feedback {
    None,
    Pending(FeedbackTicket),
    Ready(String),
}

/// Source of round ids, unique within the process.
static NEXT_ROUND: AtomicU64 = AtomicU64::new(1);

/// State of one round.
///
/// The only mutating entry points are [`QuizSession::submit_answer`],
/// [`QuizSession::apply_feedback`] and [`QuizSession::advance`]. Calls made in
/// the wrong phase are ignored.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuizSession {
    round: u64,
    mode: GameMode,
    questions: Vec<Question>,
    current_index: usize,
    score: u32,
    phase: Phase,
    selected: Option<AnswerValue>,
    feedback: Feedback,
}

impl QuizSession {
    /// Generate a fresh round for `mode` and start at its first question.
    pub fn start<R: Rng + ?Sized>(mode: GameMode, rng: &mut R) -> Result<Self, QuizError> {
        let questions = mode.generate(rng)?;
        let round = NEXT_ROUND.fetch_add(1, Ordering::Relaxed);
        log::info!("starting {:?} round {:016x}", mode, round);
        Ok(Self {
            round,
            mode,
            questions,
            current_index: 0,
            score: 0,
            phase: Phase::Asking,
            selected: None,
            feedback: Feedback::None,
        })
    }

    /// Record the player's pick for the current question.
    ///
    /// Returns `None` outside [`Phase::Asking`], so a repeated tap on an
    /// option cannot count twice.
    pub fn submit_answer(&mut self, value: AnswerValue) -> Option<Submission> {
        if self.phase != Phase::Asking {
            log::debug!("ignoring answer {} in phase {:?}", value, self.phase);
            return None;
        }
        let correct = self.questions[self.current_index].is_correct(&value);
        if correct {
            self.score += 1;
        }
        let ticket = FeedbackTicket {
            round: self.round,
            question: self.current_index,
        };
        log::debug!(
            "question {} answered {} ({}), score {}",
            self.current_index,
            value,
            if correct { "correct" } else { "wrong" },
            self.score
        );
        self.selected = Some(value);
        self.feedback = Feedback::Pending(ticket);
        self.phase = Phase::Revealing;
        Some(Submission {
            ticket,
            correct,
            score: self.score,
        })
    }

    /// Attach feedback text to the submission identified by `ticket`.
    ///
    /// Text for an earlier question or another round is dropped and `false`
    /// is returned.
    pub fn apply_feedback(&mut self, ticket: FeedbackTicket, text: String) -> bool {
        if self.feedback != Feedback::Pending(ticket) || self.phase != Phase::Revealing {
            log::debug!("discarding stale feedback for {:?}", ticket);
            return false;
        }
        self.feedback = Feedback::Ready(text);
        true
    }

    /// Move past the revealed answer.
    ///
    /// Ignored until the feedback for the current submission has been
    /// applied.
    pub fn advance(&mut self) -> Advance {
        if self.phase != Phase::Revealing {
            return Advance::Ignored;
        }
        if let Feedback::Pending(ticket) = self.feedback {
            log::debug!("feedback for {:?} still pending, not advancing", ticket);
            return Advance::Ignored;
        }
        if self.current_index + 1 >= self.questions.len() {
            self.phase = Phase::Finished;
            let result = FinishedResult {
                final_score: self.score,
            };
            log::info!(
                "round {:016x} finished with {}/{}",
                self.round,
                self.score,
                self.questions.len()
            );
            return Advance::Finished(result);
        }
        self.current_index += 1;
        self.selected = None;
        self.feedback = Feedback::None;
        self.phase = Phase::Asking;
        Advance::NextQuestion
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// The question being asked or revealed; the last one once finished.
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selected_answer(&self) -> Option<&AnswerValue> {
        self.selected.as_ref()
    }

    /// Feedback for the revealed answer, once it has arrived.
    pub fn feedback(&self) -> Option<&str> {
        match &self.feedback {
            Feedback::Ready(text) => Some(text),
            Feedback::None | Feedback::Pending(_) => None,
        }
    }

    pub fn is_feedback_pending(&self) -> bool {
        matches!(self.feedback, Feedback::Pending(_))
    }

    /// Whether `option` should be highlighted as the right answer.
    pub fn is_correct_option(&self, option: &AnswerValue) -> bool {
        self.phase != Phase::Asking && self.current_question().is_correct(option)
    }

    pub fn is_selected_option(&self, option: &AnswerValue) -> bool {
        self.selected.as_ref() == Some(option)
    }

    pub fn finished(&self) -> Option<FinishedResult> {
        (self.phase == Phase::Finished).then_some(FinishedResult {
            final_score: self.score,
        })
    }

    /// Number of questions in the round, shown as "Question i of N".
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::ROUND_LENGTH;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session(mode: GameMode, seed: u64) -> QuizSession {
        QuizSession::start(mode, &mut StdRng::seed_from_u64(seed)).unwrap()
    }

    fn answer_with_feedback(s: &mut QuizSession, value: AnswerValue) -> Submission {
        let submission = s.submit_answer(value).unwrap();
        assert!(s.apply_feedback(submission.ticket, "Nice!".to_string()));
        submission
    }

    fn wrong_option(session: &QuizSession) -> AnswerValue {
        let question = session.current_question();
        question
            .options
            .iter()
            .find(|o| **o != question.answer)
            .cloned()
            .unwrap()
    }

    #[test]
    fn starts_asking_the_first_question() {
        let s = session(GameMode::Math, 1);
        assert_eq!(s.len(), ROUND_LENGTH);
        assert_eq!(s.current_index(), 0);
        assert_eq!(s.score(), 0);
        assert_eq!(s.phase(), Phase::Asking);
        assert_eq!(s.selected_answer(), None);
        assert_eq!(s.finished(), None);
    }

    #[test]
    fn correct_answer_scores_and_reveals() {
        let mut s = session(GameMode::Math, 2);
        let answer = s.current_question().answer.clone();
        let submission = answer_with_feedback(&mut s, answer.clone());
        assert!(submission.correct);
        assert_eq!(submission.score, 1);
        assert_eq!(s.phase(), Phase::Revealing);
        assert_eq!(s.score(), 1);
        assert!(s.is_selected_option(&answer));
        assert!(s.is_correct_option(&answer));

        assert_eq!(s.advance(), Advance::NextQuestion);
        assert_eq!(s.phase(), Phase::Asking);
        assert_eq!(s.current_index(), 1);
        assert_eq!(s.selected_answer(), None);
    }

    #[test]
    fn wrong_answer_keeps_score() {
        let mut s = session(GameMode::Math, 3);
        let wrong = wrong_option(&s);
        let submission = s.submit_answer(wrong.clone()).unwrap();
        assert!(!submission.correct);
        assert_eq!(s.score(), 0);
        assert!(s.is_selected_option(&wrong));
        assert!(!s.is_correct_option(&wrong));
        let answer = s.current_question().answer.clone();
        assert!(s.is_correct_option(&answer));
    }

    #[test]
    fn second_submission_is_ignored() {
        let mut s = session(GameMode::Clock, 4);
        let answer = s.current_question().answer.clone();
        assert!(s.submit_answer(answer.clone()).is_some());
        assert!(s.submit_answer(answer).is_none());
        assert_eq!(s.score(), 1);
    }

    #[test]
    fn advance_while_asking_changes_nothing() {
        let mut s = session(GameMode::Clock, 5);
        let before = s.clone();
        assert_eq!(s.advance(), Advance::Ignored);
        assert_eq!(s, before);
    }

    #[test]
    fn correct_option_is_not_revealed_while_asking() {
        let s = session(GameMode::Math, 6);
        let answer = s.current_question().answer.clone();
        assert!(!s.is_correct_option(&answer));
    }

    #[test]
    fn feedback_only_lands_on_its_own_question() {
        let mut s = session(GameMode::Math, 7);
        let answer = s.current_question().answer.clone();
        let first = answer_with_feedback(&mut s, answer);
        assert_eq!(s.advance(), Advance::NextQuestion);

        let wrong = wrong_option(&s);
        let second = s.submit_answer(wrong).unwrap();
        assert!(!s.apply_feedback(first.ticket, "late".to_string()));
        assert_eq!(s.feedback(), None);

        assert!(s.apply_feedback(second.ticket, "Try again!".to_string()));
        assert_eq!(s.feedback(), Some("Try again!"));
        assert!(!s.apply_feedback(second.ticket, "twice".to_string()));
        assert_eq!(s.feedback(), Some("Try again!"));
    }

    #[test]
    fn advance_waits_for_pending_feedback() {
        let mut s = session(GameMode::Math, 11);
        let answer = s.current_question().answer.clone();
        let submission = s.submit_answer(answer).unwrap();
        assert!(s.is_feedback_pending());

        let before = s.clone();
        assert_eq!(s.advance(), Advance::Ignored);
        assert_eq!(s, before);
        assert_eq!(s.current_index(), 0);

        assert!(s.apply_feedback(submission.ticket, "Well done!".to_string()));
        assert_eq!(s.advance(), Advance::NextQuestion);
        assert_eq!(s.current_index(), 1);
    }

    #[test]
    fn same_seed_sessions_reject_each_others_tickets() {
        let mut first = session(GameMode::Clock, 12);
        let mut second = session(GameMode::Clock, 12);
        assert_eq!(first.questions(), second.questions());

        let answer = first.current_question().answer.clone();
        let first_ticket = first.submit_answer(answer.clone()).unwrap().ticket;
        let second_ticket = second.submit_answer(answer).unwrap().ticket;
        assert_ne!(first_ticket, second_ticket);

        assert!(!second.apply_feedback(first_ticket, "not yours".to_string()));
        assert!(second.is_feedback_pending());
        assert!(first.apply_feedback(first_ticket, "yours".to_string()));
    }

    #[test]
    fn feedback_from_another_round_is_dropped() {
        let mut old = session(GameMode::Math, 8);
        let answer = old.current_question().answer.clone();
        let ticket = old.submit_answer(answer).unwrap().ticket;

        let mut fresh = session(GameMode::Math, 9);
        let answer = fresh.current_question().answer.clone();
        fresh.submit_answer(answer).unwrap();
        assert!(!fresh.apply_feedback(ticket, "stale".to_string()));
        assert!(fresh.is_feedback_pending());
    }

    #[test]
    fn full_round_finishes_with_count_of_correct_answers() {
        let mut s = session(GameMode::Clock, 10);
        let mut expected = 0;
        for i in 0..ROUND_LENGTH {
            assert_eq!(s.current_index(), i);
            assert!(s.score() as usize <= i);
            let pick = if i % 3 == 0 {
                wrong_option(&s)
            } else {
                expected += 1;
                s.current_question().answer.clone()
            };
            answer_with_feedback(&mut s, pick);
            assert!(s.score() as usize <= i + 1);
            let step = s.advance();
            if i + 1 < ROUND_LENGTH {
                assert_eq!(step, Advance::NextQuestion);
            } else {
                assert_eq!(step, Advance::Finished(FinishedResult { final_score: expected }));
            }
        }
        assert_eq!(s.phase(), Phase::Finished);
        assert_eq!(s.finished(), Some(FinishedResult { final_score: expected }));
        assert_eq!(s.current_index(), ROUND_LENGTH - 1);
        assert!(s.submit_answer(s.current_question().answer.clone()).is_none());
        assert_eq!(s.advance(), Advance::Ignored);
    }
}
