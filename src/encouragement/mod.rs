pub mod ai_helper;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use rand::seq::SliceRandom;

use crate::quiz::GameMode;

pub use ai_helper::{AiEncouragement, EncouragementError, Personality, TextGenerator};

/// Something that can cheer the player on after an answer.
///
/// Implementations must always produce a non-empty phrase. Failures are
/// handled inside the provider, usually with [`fallback_phrase`].
#[async_trait]
pub trait EncouragementProvider: Send + Sync {
    async fn feedback(&self, correct: bool, score: u32) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    English,
    Vietnamese,
}

impl Locale {
    pub fn phrases(self, correct: bool) -> &'static [&'static str] {
        match (self, correct) {
            (Locale::English, true) => &["GREAT JOB!", "CORRECT!", "AWESOME!", "WELL DONE!", "EXCELLENT!"],
            (Locale::English, false) => &[
                "KEEP GOING!",
                "TRY AGAIN!",
                "ALMOST THERE!",
                "YOU CAN DO IT!",
                "DON'T GIVE UP!",
            ],
            (Locale::Vietnamese, true) => &["GIỎI QUÁ!", "ĐÚNG RỒI!", "TUYỆT VỜI!", "HAY LẮM!", "XUẤT SẮC!"],
            (Locale::Vietnamese, false) => &[
                "CỐ LÊN NÀO!",
                "THỬ LẠI NHÉ!",
                "SẮP ĐÚNG RỒI!",
                "BẠN LÀM ĐƯỢC!",
                "CỐ GẮNG NÀO!",
            ],
        }
    }

    /// Shown under the final score.
    pub fn educational_note(self, mode: GameMode) -> &'static str {
        match (self, mode) {
            (Locale::English, GameMode::Math) => "Math makes us smarter!",
            (Locale::English, GameMode::Clock) => "Clocks tell us when it's time to play!",
            (Locale::Vietnamese, GameMode::Math) => "Toán học giúp chúng mình thông minh hơn!",
            (Locale::Vietnamese, GameMode::Clock) => "Đồng hồ giúp chúng mình biết giờ chơi!",
        }
    }

    /// Language name used when asking a model to write in this locale.
    pub fn language(self) -> &'static str {
        match self {
            Locale::English => "English",
            Locale::Vietnamese => "Vietnamese",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "vi" | "vietnamese" => Ok(Locale::Vietnamese),
            other => Err(format!("unknown locale {:?}, expected \"en\" or \"vi\"", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::English => write!(f, "en"),
            Locale::Vietnamese => write!(f, "vi"),
        }
    }
}

/// A random stock phrase for `locale`.
pub fn fallback_phrase(locale: Locale, correct: bool) -> &'static str {
    locale
        .phrases(correct)
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(if correct { "👍" } else { "🌈" })
}

/// Answers instantly from the stock phrase list.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalEncouragement {
    locale: Locale,
}

impl LocalEncouragement {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }
}

#[async_trait]
impl EncouragementProvider for LocalEncouragement {
    async fn feedback(&self, correct: bool, _score: u32) -> String {
        fallback_phrase(self.locale, correct).to_string()
    }
}
