/**
 * The question catalog and response log data types, and the interactive practice
 * session that ties them to the question selector.
 */
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::info;
use rand::Rng;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use super::common::{PracticeOptions, QuizError, Result};
use super::persistence::ResponseLog;
use super::repetition;
use super::topic::Topic;
use super::ui::CmdUI;

/// Difficulty assumed for questions that have none, or an out-of-range one.
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// A user's catalog of questions together with their response history.
#[derive(Debug)]
pub struct Quiz {
    pub questions: Vec<Question>,
    /// Every recorded attempt, oldest first.
    pub responses: Vec<Response>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i64,
    #[serde(default)]
    pub collection: Option<String>,
    pub topic: Topic,
    #[serde(rename = "question_text")]
    pub text: String,
    pub options: Choices,
    pub correct_answer: AnswerLabel,
    #[serde(default)]
    pub explanation: String,
    /// Rated 1 (easiest) to 5 (hardest).
    #[serde(default)]
    pub difficulty: Option<u8>,
}

/// The four labelled options of a multiple-choice question.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Choices {
    pub a: String,
    pub b: String,
    pub c: String,
    pub d: String,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

pub const ALL_LABELS: [AnswerLabel; 4] = [AnswerLabel::A, AnswerLabel::B, AnswerLabel::C, AnswerLabel::D];

/// Represents one attempt at a question.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub question_id: i64,
    pub topic: Topic,
    pub user_answer: AnswerLabel,
    pub is_correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// Represents the results of a practice session.
#[derive(Debug)]
pub struct QuizResult {
    pub time_finished: DateTime<Utc>,
    pub total: usize,
    pub total_correct: usize,
    pub total_incorrect: usize,
    /// Percentage of questions answered correctly.
    pub score: f64,
    pub per_question: Vec<Response>,
}

impl Quiz {
    pub fn new(questions: Vec<Question>, responses: Vec<Response>) -> Self {
        Quiz {
            questions,
            responses,
        }
    }

    /// Ask up to `options.num_to_ask` questions, recording every answer in `store`
    /// under `user` as well as in `self.responses`.
    pub fn take<R: Rng>(
        &mut self,
        ui: &mut CmdUI,
        store: &ResponseLog,
        user: &str,
        options: &PracticeOptions,
        rng: &mut R,
    ) -> Result<QuizResult> {
        let mut results = Vec::new();
        while results.len() < options.num_to_ask {
            let question = match repetition::select_next_question(
                &self.questions,
                &self.responses,
                options.topic,
                rng,
            ) {
                Some(question) => question.clone(),
                None => {
                    if results.is_empty() {
                        ui.status("No questions available.")?;
                    }
                    break;
                }
            };

            ui.next();
            let answer = match question.ask(ui) {
                Ok(Some(answer)) => answer,
                Ok(None) | Err(QuizError::ReadlineInterrupted) => break,
                Err(e) => return Err(e),
            };

            let response = Response::new(&question, answer, Utc::now());
            if response.is_correct {
                ui.correct()?;
            } else {
                ui.incorrect(question.correct_answer, question.choice(question.correct_answer))?;
            }
            if !question.explanation.is_empty() {
                ui.explanation(&question.explanation)?;
            }

            store.append(user, &response)?;
            info!(
                "recorded answer to question {} ({}): correct = {}",
                question.id, question.topic, response.is_correct
            );
            self.responses.push(response.clone());
            results.push(response);
        }

        let total = results.len();
        let total_correct = results.iter().filter(|r| r.is_correct).count();
        let score = if total > 0 {
            100.0 * (total_correct as f64) / (total as f64)
        } else {
            0.0
        };
        let ret = QuizResult {
            time_finished: Utc::now(),
            total,
            total_correct,
            total_incorrect: total - total_correct,
            score,
            per_question: results,
        };
        ui.results(&ret)?;
        Ok(ret)
    }
}

impl Question {
    /// The question's difficulty, or `DEFAULT_DIFFICULTY` if it is missing or outside
    /// of 1 to 5.
    pub fn difficulty(&self) -> u8 {
        match self.difficulty {
            Some(d) if d >= 1 && d <= 5 => d,
            _ => DEFAULT_DIFFICULTY,
        }
    }

    pub fn choice(&self, label: AnswerLabel) -> &str {
        match label {
            AnswerLabel::A => &self.options.a,
            AnswerLabel::B => &self.options.b,
            AnswerLabel::C => &self.options.c,
            AnswerLabel::D => &self.options.d,
        }
    }

    /// Print the question and read a choice. `Ok(None)` means the user ended input.
    fn ask(&self, ui: &mut CmdUI) -> Result<Option<AnswerLabel>> {
        ui.text(self.topic, &self.text)?;
        ui.choices(self)?;
        loop {
            match ui.prompt()? {
                Some(guess) => {
                    if let Ok(label) = guess.parse::<AnswerLabel>() {
                        return Ok(Some(label));
                    }
                    ui.status("Please enter a letter.")?;
                }
                None => return Ok(None),
            }
        }
    }
}

impl Response {
    pub fn new(question: &Question, user_answer: AnswerLabel, timestamp: DateTime<Utc>) -> Self {
        Response {
            question_id: question.id,
            topic: question.topic,
            user_answer,
            is_correct: user_answer == question.correct_answer,
            timestamp,
        }
    }
}

impl AnswerLabel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            AnswerLabel::A => "a",
            AnswerLabel::B => "b",
            AnswerLabel::C => "c",
            AnswerLabel::D => "d",
        }
    }
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnswerLabel {
    type Err = ();

    fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
        let normalized = normalize(s);
        let trimmed = normalized.trim_matches(|c: char| c == '(' || c == ')' || c == '.');
        ALL_LABELS
            .iter()
            .find(|label| label.as_str() == trimmed)
            .cloned()
            .ok_or(())
    }
}

fn normalize(guess: &str) -> String {
    guess.trim().to_lowercase().nfc().collect::<String>()
}
