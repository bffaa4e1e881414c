use std::sync::Arc;

use chatgpt::{client::ChatGPT, config::ChatGPTEngine};
use dotenv::dotenv;
use kids_quiz_bot::{
    config::Config,
    encouragement::{AiEncouragement, EncouragementProvider, LocalEncouragement},
    quiz::{face, Advance, FinishedResult, GameMode, Phase, QuizEngine, QuizSession, ROUND_LENGTH},
};
use rand::{rngs::StdRng, SeedableRng};
use teloxide::{
    dispatching::dialogue::InMemStorage,
    prelude::*,
    types::{ChatId, KeyboardButton, KeyboardMarkup, ParseMode},
    utils::html,
};

type QuizDialogue = Dialogue<State, InMemStorage<State>>;
type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[derive(Clone, Default)]
pub enum State {
    #[default]
    Start,
    ReceiveGameChoice,
    Playing {
        session: QuizSession,
    },
}

const MATH_GAME: &str = "➕ Math Master";
const CLOCK_GAME: &str = "🕒 Time Traveler";
const NEXT: &str = "Next ➡️";
const HOME: &str = "🏠 Home";

#[tokio::main]
async fn main() {
    dotenv().ok();
    pretty_env_logger::init();
    log::info!("Starting quiz bot...");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let provider: Arc<dyn EncouragementProvider> = match &config.chatgpt_api_key {
        Some(key) => match ChatGPT::new(key) {
            Ok(mut gpt) => {
                gpt.config.engine = ChatGPTEngine::Gpt35Turbo;
                log::info!("Encouragement by ChatGPT as {:?}", config.personality);
                Arc::new(
                    AiEncouragement::new(gpt, config.personality, config.locale)
                        .with_timeout(config.feedback_timeout),
                )
            }
            Err(err) => {
                log::warn!("Unable to set up ChatGPT, using stock phrases: {}", err);
                Arc::new(LocalEncouragement::new(config.locale))
            }
        },
        None => {
            log::info!("No {} set, using stock phrases", kids_quiz_bot::config::CHATGPT_API_KEY);
            Arc::new(LocalEncouragement::new(config.locale))
        }
    };
    let engine = QuizEngine::new(provider, config.locale);

    let bot = Bot::from_env();

    Dispatcher::builder(
        bot,
        Update::filter_message()
            .enter_dialogue::<Message, InMemStorage<State>, State>()
            .branch(dptree::case![State::Start].endpoint(start))
            .branch(dptree::case![State::ReceiveGameChoice].endpoint(receive_game_choice))
            .branch(dptree::case![State::Playing { session }].endpoint(playing)),
    )
    .dependencies(dptree::deps![InMemStorage::<State>::new(), engine])
    .enable_ctrlc_handler()
    .build()
    .dispatch()
    .await;
}

fn menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![
        KeyboardButton::new(MATH_GAME),
        KeyboardButton::new(CLOCK_GAME),
    ]])
}

fn reveal_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![vec![KeyboardButton::new(NEXT), KeyboardButton::new(HOME)]])
}

async fn show_menu(bot: &Bot, chat_id: ChatId, dialogue: &QuizDialogue) -> HandlerResult {
    bot.send_message(chat_id, "What would you like to learn today?")
        .reply_markup(menu_keyboard())
        .await?;
    dialogue.update(State::ReceiveGameChoice).await?;
    Ok(())
}

const GREETING_TEXT: &str = "Hello, Explorer! 👋\n\n\
    ➕ Math Master: add & subtract up to 20!\n\
    🕒 Time Traveler: learn to read analog clocks!\n\n\
    Every round has 10 questions and gets a little harder as you go.";
async fn start(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, GREETING_TEXT).await?;
    show_menu(&bot, msg.chat.id, &dialogue).await
}

async fn receive_game_choice(bot: Bot, dialogue: QuizDialogue, msg: Message) -> HandlerResult {
    let mode = match msg.text() {
        Some(MATH_GAME) => GameMode::Math,
        Some(CLOCK_GAME) => GameMode::Clock,
        _ => {
            bot.send_message(msg.chat.id, "Please pick one of the games 👇")
                .reply_markup(menu_keyboard())
                .await?;
            return Ok(());
        }
    };

    let session = match QuizSession::start(mode, &mut StdRng::from_entropy()) {
        Ok(session) => session,
        Err(err) => {
            log::error!("Could not generate a {:?} round: {}", mode, err);
            bot.send_message(msg.chat.id, "Oops, the questions got lost. Please try again!")
                .reply_markup(menu_keyboard())
                .await?;
            return Ok(());
        }
    };

    send_question(&bot, msg.chat.id, &session).await?;
    dialogue.update(State::Playing { session }).await?;
    Ok(())
}

async fn playing(
    bot: Bot,
    dialogue: QuizDialogue,
    mut session: QuizSession,
    engine: QuizEngine,
    msg: Message,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    if text == HOME {
        log::debug!("Chat {} left the round early", msg.chat.id.0);
        return show_menu(&bot, msg.chat.id, &dialogue).await;
    }

    match session.phase() {
        Phase::Asking => {
            let Some(value) = session.current_question().option_by_label(text).cloned() else {
                bot.send_message(msg.chat.id, "Tap one of the answers below 👇").await?;
                send_question(&bot, msg.chat.id, &session).await?;
                return Ok(());
            };

            if let Some(reveal) = engine.answer(&mut session, value).await {
                let verdict = if reveal.correct {
                    format!("✅ {}", html::escape(&reveal.feedback))
                } else {
                    format!(
                        "❌ {}\nThe answer was <b>{}</b>.",
                        html::escape(&reveal.feedback),
                        session.current_question().answer
                    )
                };
                bot.send_message(
                    msg.chat.id,
                    format!("{}\n\n⭐ {} / {}", verdict, reveal.score, session.len()),
                )
                .parse_mode(ParseMode::Html)
                .reply_markup(reveal_keyboard())
                .await?;
            }
            dialogue.update(State::Playing { session }).await?;
        }
        Phase::Revealing if text != NEXT => {
            bot.send_message(msg.chat.id, format!("Tap {} to continue", NEXT))
                .reply_markup(reveal_keyboard())
                .await?;
        }
        Phase::Revealing => match session.advance() {
            Advance::NextQuestion => {
                send_question(&bot, msg.chat.id, &session).await?;
                dialogue.update(State::Playing { session }).await?;
            }
            Advance::Finished(result) => {
                send_results(&bot, msg.chat.id, &engine, session.mode(), result).await?;
                show_menu(&bot, msg.chat.id, &dialogue).await?;
            }
            Advance::Ignored => {}
        },
        Phase::Finished => show_menu(&bot, msg.chat.id, &dialogue).await?,
    }
    Ok(())
}

async fn send_question(bot: &Bot, chat_id: ChatId, session: &QuizSession) -> HandlerResult {
    let question = session.current_question();

    let mut text = format!(
        "Question {} of {}\n\n",
        session.current_index() + 1,
        session.len()
    );
    if let Some(time) = question.clock_time() {
        text.push_str(&format!("<pre>{}</pre>\n\n", face::render(time)));
    }
    text.push_str(&format!("<b>{}</b>", question.problem));

    let mut rows: Vec<Vec<KeyboardButton>> = question
        .options
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|option| KeyboardButton::new(option.to_string()))
                .collect()
        })
        .collect();
    rows.push(vec![KeyboardButton::new(HOME)]);

    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .reply_markup(KeyboardMarkup::new(rows))
        .await?;
    Ok(())
}

async fn send_results(
    bot: &Bot,
    chat_id: ChatId,
    engine: &QuizEngine,
    mode: GameMode,
    result: FinishedResult,
) -> HandlerResult {
    let lit = result.final_score as usize;
    let stars = format!(
        "{}{}",
        "⭐".repeat(lit),
        "▫️".repeat(ROUND_LENGTH.saturating_sub(lit))
    );
    let text = format!(
        "🏆 Amazing Job!\n\nYou got <b>{}</b> out of {} stars!\n{}\n\n{}",
        result.final_score,
        ROUND_LENGTH,
        stars,
        engine.locale().educational_note(mode)
    );
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::Html)
        .await?;
    Ok(())
}
