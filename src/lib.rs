/**
 * Adaptive practice for UPSC Prelims multiple-choice questions.
 *
 * The heart of the crate is `repetition::select_next_question`, which decides what to
 * ask next purely from the question catalog and the user's response log. The other
 * modules load those inputs, record new responses and run practice sessions in the
 * terminal.
 */
#[macro_use]
pub mod iohelper;

pub mod chooser;
pub mod common;
pub mod persistence;
pub mod quiz;
pub mod repetition;
pub mod sampler;
pub mod stats;
pub mod topic;
pub mod ui;
pub mod weight;

pub use common::{QuizError, Result};
pub use quiz::{AnswerLabel, Choices, Question, Response};
pub use repetition::{next_question, select_next_question};
pub use topic::Topic;
