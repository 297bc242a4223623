/**
 * Practice UPSC Prelims questions from the command line.
 */
use std::collections::HashMap;
use std::path::PathBuf;

use colored::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use structopt::StructOpt;

use prelims::chooser::catalog_topics;
use prelims::common::{
    is_broken_pipe, Command, CountOptions, HistoryOptions, NextOptions, Options,
    PracticeOptions, ResetOptions, Result,
};
use prelims::iohelper::confirm;
use prelims::persistence::{self, ResponseLog};
use prelims::quiz::{Question, Quiz};
use prelims::repetition::{filter_by_topic, select_next_question};
use prelims::stats::attempt_numbers;
use prelims::ui::CmdUI;
use prelims::my_println;

fn main() {
    pretty_env_logger::init();
    let options = Options::from_args();

    if options.no_color {
        colored::control::set_override(false);
    }

    let result = match options.cmd {
        Command::Practice(ref practice) => main_practice(&options, practice),
        Command::Next(ref next) => main_next(&options, next),
        Command::Count(ref count) => main_count(&options, count),
        Command::History(ref history) => main_history(&options, history),
        Command::Reset(ref reset) => main_reset(&options, reset),
    };

    if let Err(e) = result {
        if !is_broken_pipe(&e) {
            eprintln!("{}: {}", "Error".red(), e);
            ::std::process::exit(2);
        }
    }
}

/// The main function for the `practice` subcommand.
fn main_practice(options: &Options, practice: &PracticeOptions) -> Result<()> {
    let questions = load_questions(options)?;
    let store = open_log(options)?;
    let responses = store.load(&options.user, &questions)?;

    let mut quiz = Quiz::new(questions, responses);
    let mut ui = CmdUI::new();
    let mut rng = make_rng(practice.seed);
    quiz.take(&mut ui, &store, &options.user, practice, &mut rng)?;
    Ok(())
}

/// The main function for the `next` subcommand.
fn main_next(options: &Options, next: &NextOptions) -> Result<()> {
    let questions = load_questions(options)?;
    let store = open_log(options)?;
    let responses = store.load(&options.user, &questions)?;

    let mut rng = make_rng(next.seed);
    match select_next_question(&questions, &responses, next.topic, &mut rng) {
        Some(question) => CmdUI::new().preview(question),
        None => my_println!("No questions available."),
    }
}

/// The main function for the `count` subcommand.
fn main_count(options: &Options, count: &CountOptions) -> Result<()> {
    let questions = load_questions(options)?;
    if count.list_topics {
        for topic in catalog_topics(&questions) {
            my_println!("{:>5}  {}", filter_by_topic(&questions, topic).len(), topic)?;
        }
    } else if let Some(topic) = count.topic {
        my_println!("{}", filter_by_topic(&questions, topic).len())?;
    } else {
        my_println!("{}", questions.len())?;
    }
    Ok(())
}

/// The main function for the `history` subcommand.
fn main_history(options: &Options, history: &HistoryOptions) -> Result<()> {
    let questions = load_questions(options)?;
    let store = open_log(options)?;
    let responses = store.load(&options.user, &questions)?;
    if responses.is_empty() {
        return my_println!("No responses recorded yet.");
    }

    let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();
    let numbers = attempt_numbers(&responses);
    let mut ui = CmdUI::new();
    let mut shown = 0;
    for (response, attempt) in responses.iter().zip(numbers.into_iter()).rev() {
        if history.topic.map_or(false, |topic| topic != response.topic) {
            continue;
        }
        if history.attempt.map_or(false, |n| n != attempt) {
            continue;
        }
        if let Some(question) = by_id.get(&response.question_id) {
            ui.history_entry(question, response, attempt)?;
            shown += 1;
        }
    }

    if shown == 0 {
        my_println!("No responses match.")?;
    }
    Ok(())
}

/// The main function for the `reset` subcommand.
fn main_reset(options: &Options, reset: &ResetOptions) -> Result<()> {
    let store = open_log(options)?;
    let count = store.count(&options.user)?;
    if count == 0 {
        return my_println!("No responses have been recorded.");
    }

    let message = format!("Delete all {} responses for '{}'? ", count, options.user);
    if reset.yes || confirm(&message) {
        let deleted = store.clear(&options.user)?;
        my_println!("Deleted {} responses.", deleted)?;
    }
    Ok(())
}

fn load_questions(options: &Options) -> Result<Vec<Question>> {
    let path = match options.questions {
        Some(ref path) => path.clone(),
        None => persistence::default_catalog_path()?,
    };
    persistence::load_catalog(&path)
}

fn open_log(options: &Options) -> Result<ResponseLog> {
    let path: PathBuf = match options.db {
        Some(ref path) => path.clone(),
        None => persistence::default_log_path()?,
    };
    ResponseLog::open(&path)
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
