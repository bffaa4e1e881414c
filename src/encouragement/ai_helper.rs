use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chatgpt::client::ChatGPT;
use chatgpt::types::CompletionResponse;
use thiserror::Error;

use crate::encouragement::{fallback_phrase, EncouragementProvider, Locale};
use crate::quiz::ROUND_LENGTH;

/// Replies longer than this are not a short phrase and get replaced.
const MAX_REPLY_CHARS: usize = 160;

#[derive(Debug, Error)]
pub enum EncouragementError {
    #[error(transparent)]
    ChatGpt(#[from] chatgpt::err::Error),
    #[error("no reply within {0:?}")]
    Timeout(Duration),
    #[error("reply was empty")]
    EmptyResponse,
    #[error("reply was {0} characters long")]
    TooLong(usize),
}

/// A remote text model, reduced to the one call the quiz needs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, EncouragementError>;
}

#[async_trait]
impl TextGenerator for ChatGPT {
    async fn complete(&self, prompt: &str) -> Result<String, EncouragementError> {
        let response: CompletionResponse = self.send_message(prompt).await?;
        Ok(response.message().content.clone())
    }
}

#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for Arc<T> {
    async fn complete(&self, prompt: &str) -> Result<String, EncouragementError> {
        (**self).complete(prompt).await
    }
}

/// Encouragement written by a language model in the voice of a friendly
/// character, with a stock phrase whenever the model lets us down.
pub struct AiEncouragement<G = ChatGPT> {
    personality: Personality,
    locale: Locale,
    generator: G,
    timeout: Duration,
}

impl<G: TextGenerator> AiEncouragement<G> {
    pub fn new(generator: G, personality: Personality, locale: Locale) -> Self {
        Self {
            personality,
            locale,
            generator,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn prompt(&self, correct: bool, score: u32) -> String {
        let outcome = if correct {
            "answered correctly"
        } else {
            "got the answer wrong"
        };
        format!(
            "You are a cheerful helper in a learning game for young children (addition, subtraction and reading clocks).
        The child just {} and now has {} out of {} stars.
        Write ONE short encouraging sentence, at most 12 words, in {}, as if you were {}.
        Never mention the wrong answer. Reply with the sentence only.",
            outcome,
            score,
            ROUND_LENGTH,
            self.locale.language(),
            self.personality.get_personality()
        )
    }

    pub async fn generate(&self, correct: bool, score: u32) -> Result<String, EncouragementError> {
        let prompt = self.prompt(correct, score);
        log::debug!("Requesting encouragement (correct: {}, score: {})", correct, score);

        let reply = tokio::time::timeout(self.timeout, self.generator.complete(&prompt))
            .await
            .map_err(|_| EncouragementError::Timeout(self.timeout))??;

        log::debug!("Completion: {:?}", reply);
        clean_reply(&reply)
    }
}

#[async_trait]
impl<G: TextGenerator> EncouragementProvider for AiEncouragement<G> {
    async fn feedback(&self, correct: bool, score: u32) -> String {
        match self.generate(correct, score).await {
            Ok(text) => text,
            Err(err) => {
                log::warn!("Encouragement request failed, using a stock phrase: {}", err);
                fallback_phrase(self.locale, correct).to_string()
            }
        }
    }
}

/// First non-blank line of the reply, without surrounding quotes.
fn clean_reply(reply: &str) -> Result<String, EncouragementError> {
    let line = reply
        .lines()
        .map(|l| l.trim().trim_matches(|c| c == '"' || c == '“' || c == '”').trim())
        .find(|l| !l.is_empty())
        .ok_or(EncouragementError::EmptyResponse)?;
    let chars = line.chars().count();
    if chars > MAX_REPLY_CHARS {
        return Err(EncouragementError::TooLong(chars));
    }
    Ok(line.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Personality {
    #[default]
    Owl,
    Robot,
    Astronaut,
}

impl Personality {
    pub fn get_personality(&self) -> String {
        match self {
            Personality::Owl => "Ollie, a wise and gentle owl",
            Personality::Robot => "Bleep, a friendly little robot",
            Personality::Astronaut => "Captain Nova, a brave astronaut",
        }
        .to_string()
    }
}

impl FromStr for Personality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "owl" => Ok(Personality::Owl),
            "robot" => Ok(Personality::Robot),
            "astronaut" => Ok(Personality::Astronaut),
            other => Err(format!(
                "unknown personality {:?}, expected owl, robot or astronaut",
                other
            )),
        }
    }
}
