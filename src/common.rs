/**
 * Definitions of data structures used by several modules, such as `QuizError` and the
 * various structs that hold command-line arguments.
 */
use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use structopt::StructOpt;

use super::topic::Topic;

pub type Result<T> = ::std::result::Result<T, QuizError>;

#[derive(Debug)]
pub enum QuizError {
    /// For when the application directory cannot be created.
    CannotMakeAppDir,
    /// For when the question catalog file does not exist.
    CatalogNotFound(PathBuf),
    /// For JSON errors.
    Json(serde_json::Error),
    /// For errors from the response log database.
    Sql(rusqlite::Error),
    Io(io::Error),
    DuplicateQuestion(i64),
    InvalidQuestion { id: i64, message: String },
    UnknownTopic(String),
    /// The catalog has no topics to choose from.
    NoTopics,
    ReadlineInterrupted,
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            QuizError::CannotMakeAppDir => write!(f, "unable to create application directory"),
            QuizError::CatalogNotFound(ref path) => {
                write!(f, "could not find question catalog at '{}'", path.to_string_lossy())
            }
            QuizError::Json(ref err) => write!(f, "could not parse JSON ({})", err),
            QuizError::Sql(ref err) => write!(f, "database error ({})", err),
            QuizError::Io(ref err) => write!(f, "IO error ({})", err),
            QuizError::DuplicateQuestion(id) => {
                write!(f, "question id {} appears more than once in the catalog", id)
            }
            QuizError::InvalidQuestion { id, ref message } => {
                write!(f, "invalid question {}: {}", id, message)
            }
            QuizError::UnknownTopic(ref name) => write!(f, "unknown topic '{}'", name),
            QuizError::NoTopics => write!(f, "no topics available"),
            QuizError::ReadlineInterrupted => Ok(()),
        }
    }
}

impl error::Error for QuizError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            QuizError::Json(ref err) => Some(err),
            QuizError::Sql(ref err) => Some(err),
            QuizError::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

pub fn is_broken_pipe(e: &QuizError) -> bool {
    if let QuizError::Io(e) = e {
        if let io::ErrorKind::BrokenPipe = e.kind() {
            return true;
        }
    }
    false
}

/// Holds the command-line configuration for the application.
#[derive(StructOpt)]
#[structopt(name = "prelims", about = "Practice UPSC Prelims questions from the command line.")]
pub struct Options {
    /// Path to the question catalog (JSON).
    #[structopt(long = "questions", parse(from_os_str))]
    pub questions: Option<PathBuf>,
    /// Path to the response log database.
    #[structopt(long = "db", parse(from_os_str))]
    pub db: Option<PathBuf>,
    /// Whose response log to use.
    #[structopt(long = "user", default_value = "default")]
    pub user: String,
    /// Do not emit colorized output.
    #[structopt(long = "no-color")]
    pub no_color: bool,
    #[structopt(subcommand)]
    pub cmd: Command,
}

#[derive(StructOpt)]
pub enum Command {
    /// Answer questions chosen by the adaptive selector.
    #[structopt(name = "practice")]
    Practice(PracticeOptions),
    /// Show the question that would be asked next.
    #[structopt(name = "next")]
    Next(NextOptions),
    /// Count questions or topics.
    #[structopt(name = "count")]
    Count(CountOptions),
    /// List past responses, newest first.
    #[structopt(name = "history")]
    History(HistoryOptions),
    /// Delete all recorded responses.
    #[structopt(name = "reset")]
    Reset(ResetOptions),
}

#[derive(StructOpt)]
pub struct PracticeOptions {
    /// Only ask questions from this topic.
    #[structopt(long = "topic")]
    pub topic: Option<Topic>,
    /// Limit the total number of questions.
    #[structopt(short = "n", default_value = "20")]
    pub num_to_ask: usize,
    /// Seed the random number generator.
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(StructOpt)]
pub struct NextOptions {
    /// Only consider questions from this topic.
    #[structopt(long = "topic")]
    pub topic: Option<Topic>,
    /// Seed the random number generator.
    #[structopt(long = "seed")]
    pub seed: Option<u64>,
}

#[derive(StructOpt)]
pub struct CountOptions {
    /// Only count questions from this topic.
    #[structopt(long = "topic")]
    pub topic: Option<Topic>,
    /// List topics with their question counts instead.
    #[structopt(long = "list-topics")]
    pub list_topics: bool,
}

#[derive(StructOpt)]
pub struct HistoryOptions {
    /// Only show responses to questions from this topic.
    #[structopt(long = "topic")]
    pub topic: Option<Topic>,
    /// Only show the given attempt at each question, counting from 1.
    #[structopt(long = "attempt")]
    pub attempt: Option<usize>,
}

#[derive(StructOpt)]
pub struct ResetOptions {
    /// Do not ask for confirmation.
    #[structopt(short = "y", long = "yes")]
    pub yes: bool,
}
