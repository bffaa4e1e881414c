use rand::Rng;

use crate::quiz::{self, AnswerValue, Difficulty, GameMode, Question, QuizError, ROUND_LENGTH};

/// Largest result a question may have.
pub const MAX_RESULT: i32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Add,
    Subtract,
}

/// Generate a round of addition and subtraction questions.
///
/// About 60% of the questions are additions regardless of tier. Operands are
/// bounded per tier so that no result is negative and none exceeds 20.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<Question>, QuizError> {
    (0..ROUND_LENGTH).map(|i| generate_question(rng, i)).collect()
}

fn generate_question<R: Rng + ?Sized>(rng: &mut R, index: usize) -> Result<Question, QuizError> {
    let operator = if rng.gen_bool(0.6) {
        Operator::Add
    } else {
        Operator::Subtract
    };
    let difficulty = GameMode::Math.difficulty(index);
    let (a, b) = operands(rng, difficulty, operator);

    let raw = match operator {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
    };
    let result = raw.clamp(0, MAX_RESULT);
    if result != raw {
        log::warn!("question {} result {} clamped to {}", index, raw, result);
    }

    let problem = match operator {
        Operator::Add => format!("{} + {} = ?", a, b),
        Operator::Subtract => format!("{} - {} = ?", a, b),
    };

    let options = quiz::fill_options(index, result, || {
        (result + rng.gen_range(-3..=3)).max(0)
    })?;

    log::debug!("math question {}: {} -> {}", index, problem, result);

    Ok(Question {
        id: index,
        problem,
        answer: AnswerValue::Number(result as u32),
        options: options
            .into_iter()
            .map(|o| AnswerValue::Number(o as u32))
            .collect(),
        mode: GameMode::Math,
        difficulty,
    })
}

fn operands<R: Rng + ?Sized>(rng: &mut R, difficulty: Difficulty, operator: Operator) -> (i32, i32) {
    match (difficulty, operator) {
        (Difficulty::Easy, Operator::Add) => (rng.gen_range(0..6), rng.gen_range(0..6)),
        (Difficulty::Easy, Operator::Subtract) => {
            let a = rng.gen_range(0..10);
            (a, rng.gen_range(0..=a))
        }
        (Difficulty::Medium, Operator::Add) => (rng.gen_range(1..11), rng.gen_range(0..10)),
        (Difficulty::Medium, Operator::Subtract) => {
            let a = rng.gen_range(5..20);
            (a, rng.gen_range(1..a))
        }
        // a + b <= 20
        (Difficulty::Hard, Operator::Add) => {
            let a = rng.gen_range(5..16);
            (a, rng.gen_range(0..21 - a))
        }
        (Difficulty::Hard, Operator::Subtract) => (rng.gen_range(15..21), rng.gen_range(5..15)),
    }
}
