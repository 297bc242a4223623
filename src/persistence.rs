/**
 * Functions and data structures for reading the question catalog and reading and
 * writing the response log.
 *
 * The catalog is a JSON file. The response log is an append-only SQLite table shared
 * by every user, with each row tagged by the user it belongs to.
 */
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{info, warn};
use rusqlite::{params, Connection};
use serde::Deserialize;

use super::common::{QuizError, Result};
use super::quiz::{AnswerLabel, Question, Response};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Catalog {
    questions: Vec<Question>,
}

/// Load the question catalog at `path`.
pub fn load_catalog(path: &Path) -> Result<Vec<Question>> {
    let data = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            QuizError::CatalogNotFound(path.to_path_buf())
        } else {
            QuizError::Io(e)
        }
    })?;
    let questions = load_catalog_from_json(&data)?;
    info!("loaded {} questions from {}", questions.len(), path.to_string_lossy());
    Ok(questions)
}

/// Parse and validate a catalog. Questions keep the order they have in the file.
pub fn load_catalog_from_json(data: &str) -> Result<Vec<Question>> {
    let catalog: Catalog = serde_json::from_str(data).map_err(QuizError::Json)?;

    let mut seen = HashSet::new();
    for question in catalog.questions.iter() {
        if !seen.insert(question.id) {
            return Err(QuizError::DuplicateQuestion(question.id));
        }
        check_question(question)?;
    }
    Ok(catalog.questions)
}

fn check_question(question: &Question) -> Result<()> {
    if question.text.trim().is_empty() {
        return Err(QuizError::InvalidQuestion {
            id: question.id,
            message: String::from("question text is empty"),
        });
    }

    let options = &question.options;
    for (label, text) in ["a", "b", "c", "d"]
        .iter()
        .zip([&options.a, &options.b, &options.c, &options.d].iter())
    {
        if text.trim().is_empty() {
            return Err(QuizError::InvalidQuestion {
                id: question.id,
                message: format!("option ({}) is empty", label),
            });
        }
    }
    Ok(())
}

/// The append-only log of every user's responses.
pub struct ResponseLog {
    connection: Connection,
}

impl ResponseLog {
    pub fn open(path: &Path) -> Result<Self> {
        let connection = Connection::open(path).map_err(QuizError::Sql)?;
        Self::with_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(QuizError::Sql)?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self> {
        connection
            .execute(
                "
            CREATE TABLE IF NOT EXISTS user_responses(
              id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT,
              user_id TEXT NOT NULL CHECK(user_id != ''),
              question_id INTEGER NOT NULL,
              topic TEXT NOT NULL,
              user_answer TEXT NOT NULL CHECK(
                user_answer = 'a' OR
                user_answer = 'b' OR
                user_answer = 'c' OR
                user_answer = 'd'
              ),
              is_correct BOOLEAN NOT NULL,
              timestamp TEXT NOT NULL
            )
            ",
                [],
            )
            .map_err(QuizError::Sql)?;
        Ok(ResponseLog { connection })
    }

    pub fn append(&self, user: &str, response: &Response) -> Result<()> {
        self.connection
            .execute(
                "
            INSERT INTO
              user_responses(user_id, question_id, topic, user_answer, is_correct, timestamp)
            VALUES
              (?1, ?2, ?3, ?4, ?5, ?6)
            ",
                params![
                    user,
                    response.question_id,
                    response.topic.name(),
                    response.user_answer.as_str(),
                    response.is_correct,
                    response.timestamp.to_rfc3339(),
                ],
            )
            .map_err(QuizError::Sql)?;
        Ok(())
    }

    /// Return `user`'s responses, oldest first. Responses to questions that are not in
    /// `questions` are skipped.
    pub fn load(&self, user: &str, questions: &[Question]) -> Result<Vec<Response>> {
        let by_id: HashMap<i64, &Question> = questions.iter().map(|q| (q.id, q)).collect();

        let sql = "
            SELECT
              question_id,
              user_answer,
              is_correct,
              timestamp
            FROM
              user_responses
            WHERE
              user_id = ?1
            ORDER BY
              id
        ";
        let mut stmt = self.connection.prepare(sql).map_err(QuizError::Sql)?;
        let mut rows = stmt.query(params![user]).map_err(QuizError::Sql)?;

        let mut responses = Vec::new();
        while let Some(row) = rows.next().map_err(QuizError::Sql)? {
            let question_id: i64 = row.get(0).map_err(QuizError::Sql)?;
            let answer: String = row.get(1).map_err(QuizError::Sql)?;
            let is_correct: bool = row.get(2).map_err(QuizError::Sql)?;
            let timestamp: String = row.get(3).map_err(QuizError::Sql)?;

            let question = match by_id.get(&question_id) {
                Some(question) => question,
                None => {
                    warn!("skipping response to unknown question {}", question_id);
                    continue;
                }
            };
            let user_answer = match answer.parse::<AnswerLabel>() {
                Ok(label) => label,
                Err(_) => {
                    warn!("skipping response with bad answer '{}'", answer);
                    continue;
                }
            };
            let timestamp = match DateTime::parse_from_rfc3339(&timestamp) {
                Ok(timestamp) => timestamp.with_timezone(&Utc),
                Err(_) => {
                    warn!("skipping response with bad timestamp '{}'", timestamp);
                    continue;
                }
            };

            responses.push(Response {
                question_id,
                topic: question.topic,
                user_answer,
                is_correct,
                timestamp,
            });
        }
        Ok(responses)
    }

    pub fn count(&self, user: &str) -> Result<usize> {
        let count: i64 = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM user_responses WHERE user_id = ?1",
                params![user],
                |row| row.get(0),
            )
            .map_err(QuizError::Sql)?;
        Ok(count as usize)
    }

    /// Delete all of `user`'s responses and return how many there were.
    pub fn clear(&self, user: &str) -> Result<usize> {
        self.connection
            .execute("DELETE FROM user_responses WHERE user_id = ?1", params![user])
            .map_err(QuizError::Sql)
    }
}

/// Return the path to the application directory.
pub fn get_app_dir_path() -> Result<PathBuf> {
    let mut dirpath = dirs::data_dir().ok_or(QuizError::CannotMakeAppDir)?;
    dirpath.push("prelims");
    Ok(dirpath)
}

/// Return the path to the application directory, creating it if it doesn't exist.
pub fn require_app_dir_path() -> Result<PathBuf> {
    let dirpath = get_app_dir_path()?;
    if !dirpath.as_path().exists() {
        fs::create_dir_all(&dirpath).or(Err(QuizError::CannotMakeAppDir))?;
    }
    Ok(dirpath)
}

pub fn default_catalog_path() -> Result<PathBuf> {
    let mut path = require_app_dir_path()?;
    path.push("questions.json");
    Ok(path)
}

pub fn default_log_path() -> Result<PathBuf> {
    let mut path = require_app_dir_path()?;
    path.push("responses.sqlite3");
    Ok(path)
}
