pub mod clock;
pub mod engine;
pub mod face;
pub mod math;
pub mod session;

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use thiserror::Error;

pub use clock::{ClockTime, HandAngles};
pub use engine::{QuizEngine, Reveal};
pub use session::{Advance, FeedbackTicket, FinishedResult, Phase, QuizSession, Submission};

/// Number of questions in one round.
pub const ROUND_LENGTH: usize = 10;
/// Number of answer options shown for every question.
pub const OPTION_COUNT: usize = 4;
/// Upper bound on decoy draws before generation gives up.
pub const MAX_DECOY_DRAWS: usize = 256;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("ran out of decoy draws before question {question} had four distinct options")]
    DecoyExhaustion { question: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum GameMode {
    Math,
    Clock,
}

impl GameMode {
    /// Generate a full round for this mode.
    pub fn generate<R: Rng + ?Sized>(self, rng: &mut R) -> Result<Vec<Question>, QuizError> {
        match self {
            GameMode::Math => math::generate(rng),
            GameMode::Clock => clock::generate(rng),
        }
    }

    /// Difficulty tier of the question at `index` within a round.
    ///
    /// The tiers are not the same width in both games: arithmetic stays easy
    /// for three questions, the clock for four (whole hours only).
    pub fn difficulty(self, index: usize) -> Difficulty {
        let easy_until = match self {
            GameMode::Math => 3,
            GameMode::Clock => 4,
        };
        if index < easy_until {
            Difficulty::Easy
        } else if index < 7 {
            Difficulty::Medium
        } else {
            Difficulty::Hard
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Math => write!(f, "Math Master"),
            GameMode::Clock => write!(f, "Time Traveler"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// A candidate answer.
///
/// Ordering follows the option sort order: numbers numerically, times as
/// plain strings (so "10:00" sorts before "2:00").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum AnswerValue {
    Number(u32),
    Time(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Number(n) => write!(f, "{}", n),
            AnswerValue::Time(t) => write!(f, "{}", t),
        }
    }
}

impl From<u32> for AnswerValue {
    fn from(n: u32) -> Self {
        AnswerValue::Number(n)
    }
}

impl From<ClockTime> for AnswerValue {
    fn from(time: ClockTime) -> Self {
        AnswerValue::Time(time.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: usize,
    pub problem: String,
    pub answer: AnswerValue,
    /// Always [`OPTION_COUNT`] distinct values in ascending order, one of them `answer`.
    pub options: Vec<AnswerValue>,
    pub mode: GameMode,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn is_correct(&self, value: &AnswerValue) -> bool {
        &self.answer == value
    }

    /// The clock shown for a clock question, read back from its answer.
    pub fn clock_time(&self) -> Option<ClockTime> {
        match &self.answer {
            AnswerValue::Time(t) => t.parse().ok(),
            AnswerValue::Number(_) => None,
        }
    }

    /// Find the option whose label is `text`, as typed or tapped by the player.
    pub fn option_by_label(&self, text: &str) -> Option<&AnswerValue> {
        let text = text.trim();
        self.options.iter().find(|o| o.to_string() == text)
    }
}

/// Seed a set with `answer` and keep drawing decoys until it holds
/// [`OPTION_COUNT`] distinct values. The set's order is the option order.
pub(crate) fn fill_options<T, F>(question: usize, answer: T, mut draw: F) -> Result<Vec<T>, QuizError>
where
    T: Ord,
    F: FnMut() -> T,
{
    let mut options = BTreeSet::new();
    options.insert(answer);
    let mut draws = 0;
    while options.len() < OPTION_COUNT {
        if draws == MAX_DECOY_DRAWS {
            log::error!("decoy generation exhausted for question {}", question);
            return Err(QuizError::DecoyExhaustion { question });
        }
        options.insert(draw());
        draws += 1;
    }
    Ok(options.into_iter().collect())
}
