//! Quiz core for a children's learning bot.
//!
//! Two mini-games are offered: arithmetic up to 20 and reading an analog
//! clock. A round is ten multiple-choice questions of rising difficulty.
//! After every answer the child gets a short encouragement phrase, either
//! picked from a local list or generated by ChatGPT.
//!
//! The pieces:
//!
//! - [`quiz`] generates rounds and runs the per-round state machine.
//! - [`encouragement`] supplies feedback text and never fails.
//! - [`config`] reads the runtime settings from the environment.

pub mod config;
pub mod encouragement;
pub mod quiz;
