/**
 * The command-line user interface for practice sessions.
 */
use chrono::Local;
use colored::*;

use super::common::Result;
use super::iohelper::{print_wrapped, prompt, Style};
use super::quiz::{AnswerLabel, Question, QuizResult, Response, ALL_LABELS};
use super::topic::Topic;

const TOPIC_STYLE: Style = Style {
    prefix: Some(Color::Cyan),
    text: Some(Color::BrightBlue),
};

pub struct CmdUI {
    number: usize,
}

impl CmdUI {
    pub fn new() -> Self {
        Self { number: 0 }
    }

    pub fn next(&mut self) {
        self.number += 1;
    }

    pub fn text(&mut self, topic: Topic, text: &str) -> Result<()> {
        my_print!("\n")?;
        let prefix = format!("  ({}) ", self.number);
        print_wrapped(&format!("[{}]", topic), &prefix, TOPIC_STYLE)?;
        print_wrapped(text, &" ".repeat(prefix.len()), Style::plain())?;
        my_print!("\n")
    }

    pub fn choices(&mut self, question: &Question) -> Result<()> {
        for label in ALL_LABELS.iter() {
            let prefix = format!("     ({}) ", label);
            print_wrapped(question.choice(*label), &prefix, Style::plain())?;
        }
        my_print!("\n")
    }

    pub fn prompt(&mut self) -> Result<Option<String>> {
        prompt("> ")
    }

    pub fn incorrect(&mut self, label: AnswerLabel, correction: &str) -> Result<()> {
        let message = format!(
            "{} The correct answer was ({}) {}.",
            "Incorrect.".red(),
            label,
            correction.green(),
        );
        print_wrapped(&message, "", Style::plain())
    }

    pub fn correct(&mut self) -> Result<()> {
        print_wrapped(&format!("{}", "Correct!".green()), "", Style::plain())
    }

    pub fn explanation(&mut self, text: &str) -> Result<()> {
        let style = Style {
            prefix: None,
            text: Some(Color::BrightBlack),
        };
        print_wrapped(text, "  ", style)
    }

    pub fn status(&mut self, text: &str) -> Result<()> {
        my_println!("{}", text)
    }

    /// Print a question without asking it.
    pub fn preview(&mut self, question: &Question) -> Result<()> {
        let prefix = format!("  (#{}) ", question.id);
        print_wrapped(&format!("[{}]", question.topic), &prefix, TOPIC_STYLE)?;
        print_wrapped(&question.text, &" ".repeat(prefix.len()), Style::plain())?;
        my_print!("\n")?;
        self.choices(question)
    }

    /// Print one past attempt at `question`, with its attempt number for that question.
    pub fn history_entry(
        &mut self,
        question: &Question,
        response: &Response,
        attempt: usize,
    ) -> Result<()> {
        let verdict = if response.is_correct {
            "correct".green()
        } else {
            "incorrect".red()
        };
        let when = response.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M");
        my_println!(
            "\n  {}  {}  attempt {}  {}",
            when,
            format!("[{}]", response.topic).bright_blue(),
            attempt,
            verdict
        )?;

        let prefix = format!("  (#{}) ", question.id);
        print_wrapped(&question.text, &prefix, Style::plain())?;
        let answer = format!(
            "You answered ({}) {}",
            response.user_answer,
            question.choice(response.user_answer)
        );
        print_wrapped(&answer, &" ".repeat(prefix.len()), Style::plain())
    }

    pub fn results(&mut self, results: &QuizResult) -> Result<()> {
        if results.total > 0 {
            let score_as_str = format!("{:.1}%", results.score);

            my_print!("\n\n")?;
            my_print!("Score: ")?;
            my_print!("{}", score_as_str.cyan())?;
            my_print!(" out of ")?;
            my_print!("{}", format!("{}", results.total).cyan())?;
            if results.total == 1 {
                my_println!(" question")?;
            } else {
                my_println!(" questions")?;
            }
            my_print!("  {}", format!("{}", results.total_correct).green())?;
            my_print!(" correct\n")?;
            my_print!("  {}", format!("{}", results.total_incorrect).red())?;
            my_print!(" incorrect\n")?;
        }
        Ok(())
    }
}
