use std::sync::Arc;

use crate::encouragement::{fallback_phrase, EncouragementProvider, Locale};
use crate::quiz::{AnswerValue, QuizSession};

/// Outcome of an answered question, ready to show to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reveal {
    pub correct: bool,
    pub score: u32,
    pub feedback: String,
}

/// Runs answers through a [`QuizSession`] and fetches feedback for each one.
///
/// The engine holds no round state of its own, so one engine can serve any
/// number of independent sessions.
#[derive(Clone)]
pub struct QuizEngine {
    provider: Arc<dyn EncouragementProvider>,
    locale: Locale,
}

impl QuizEngine {
    pub fn new(provider: Arc<dyn EncouragementProvider>, locale: Locale) -> Self {
        Self { provider, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Submit `value` for the current question and wait for its feedback.
    ///
    /// Returns `None` when the session was not asking, in which case the
    /// provider is not called.
    pub async fn answer(&self, session: &mut QuizSession, value: AnswerValue) -> Option<Reveal> {
        let submission = session.submit_answer(value)?;

        let mut feedback = self
            .provider
            .feedback(submission.correct, submission.score)
            .await;
        if feedback.trim().is_empty() {
            log::warn!("Encouragement provider returned blank text");
            feedback = fallback_phrase(self.locale, submission.correct).to_string();
        }

        session.apply_feedback(submission.ticket, feedback.clone());
        Some(Reveal {
            correct: submission.correct,
            score: submission.score,
            feedback,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{GameMode, Phase};
    use async_trait::async_trait;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EncouragementProvider for Counting {
        async fn feedback(&self, correct: bool, score: u32) -> String {
            self.calls.fetch_add(1, Ordering::SeqCst);
            format!("{correct}:{score}")
        }
    }

    struct Mute;

    #[async_trait]
    impl EncouragementProvider for Mute {
        async fn feedback(&self, _correct: bool, _score: u32) -> String {
            "   ".to_string()
        }
    }

    #[tokio::test]
    async fn one_provider_call_per_answered_question() {
        let provider = Arc::new(Counting::default());
        let engine = QuizEngine::new(provider.clone(), Locale::English);
        let mut session = QuizSession::start(GameMode::Math, &mut StdRng::seed_from_u64(1)).unwrap();

        let answer = session.current_question().answer.clone();
        let reveal = engine.answer(&mut session, answer.clone()).await.unwrap();
        assert_eq!(reveal, Reveal { correct: true, score: 1, feedback: "true:1".to_string() });
        assert_eq!(session.feedback(), Some("true:1"));
        assert_eq!(session.phase(), Phase::Revealing);

        assert!(engine.answer(&mut session, answer).await.is_none());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.score(), 1);
    }

    #[tokio::test]
    async fn blank_feedback_is_replaced() {
        let engine = QuizEngine::new(Arc::new(Mute), Locale::Vietnamese);
        let mut session = QuizSession::start(GameMode::Clock, &mut StdRng::seed_from_u64(2)).unwrap();
        let answer = session.current_question().answer.clone();
        let reveal = engine.answer(&mut session, answer).await.unwrap();
        assert!(Locale::Vietnamese.phrases(true).contains(&reveal.feedback.as_str()));
        assert_eq!(session.feedback(), Some(reveal.feedback.as_str()));
    }
}
