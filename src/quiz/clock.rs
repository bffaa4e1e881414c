use std::fmt;
use std::str::FromStr;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::quiz::{self, AnswerValue, Difficulty, GameMode, Question, QuizError, ROUND_LENGTH};

pub const CLOCK_PROBLEM: &str = "What time is it?";

/// Minutes that ever appear on a clock question or decoy.
const QUARTERS: [u8; 4] = [0, 15, 30, 45];

/// A time on a 12-hour analog clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClockTime {
    /// 1..=12
    pub hour: u8,
    pub minute: u8,
}

/// Hand positions in degrees, clockwise from 12 o'clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    pub hour: f64,
    pub minute: f64,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        Self { hour, minute }
    }

    /// The hour hand moves half a degree per minute on top of 30 degrees per hour.
    pub fn hand_angles(self) -> HandAngles {
        HandAngles {
            hour: f64::from(self.hour % 12) * 30.0 + f64::from(self.minute) * 0.5,
            minute: f64::from(self.minute) * 6.0,
        }
    }

    fn random_quarter<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(1..=12), *QUARTERS.choose(rng).unwrap_or(&0))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a clock time: {0:?}")]
pub struct ParseClockTimeError(String);

impl FromStr for ClockTime {
    type Err = ParseClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseClockTimeError(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(invalid)?;
        if minute.len() != 2 {
            return Err(invalid());
        }
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&hour) || minute > 59 {
            return Err(invalid());
        }
        Ok(Self::new(hour, minute))
    }
}

/// Generate a round of clock-reading questions.
///
/// Whole hours first, then half hours, then quarters. Options are sorted as
/// strings, not chronologically.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<Question>, QuizError> {
    (0..ROUND_LENGTH).map(|i| generate_question(rng, i)).collect()
}

fn generate_question<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Result<Question, QuizError> {
    let difficulty = GameMode::Clock.difficulty(index);
    let hour = rng.gen_range(1..=12);
    let minute = match difficulty {
        Difficulty::Easy => 0,
        Difficulty::Medium => {
            if rng.gen_bool(0.5) {
                30
            } else {
                0
            }
        }
        Difficulty::Hard => *QUARTERS.choose(rng).unwrap_or(&0),
    };
    let time = ClockTime::new(hour, minute);
    let answer = time.to_string();

    let options = quiz::fill_options(index, answer.clone(), || {
        ClockTime::random_quarter(rng).to_string()
    })?;

    log::debug!("clock question {}: {}", index, answer);

    Ok(Question {
        id: index,
        problem: CLOCK_PROBLEM.to_string(),
        answer: AnswerValue::Time(answer),
        options: options.into_iter().map(AnswerValue::Time).collect(),
        mode: GameMode::Clock,
        difficulty,
    })
}
