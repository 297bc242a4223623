/**
 * Per-topic and per-question statistics derived from a response log.
 *
 * Nothing here is stored: every value is recomputed from the log on each call, with
 * the position of a response in the log standing in for the time it was given.
 */
use std::collections::{BTreeMap, HashMap};

use super::quiz::Response;
use super::topic::Topic;

/// How many of the most recent attempts count towards `recent_success`.
pub const RECENT_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct TopicStats {
    /// Fraction of attempts answered correctly, or 0 when there are none.
    pub mastery: f64,
    pub attempt_count: usize,
    pub last_attempt_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub is_correct: bool,
    /// Position of the attempt in the response log.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionHistory {
    /// Oldest first.
    pub attempts: Vec<Attempt>,
    pub recent_success: f64,
    pub overall_success: f64,
    pub last_attempt_index: Option<usize>,
}

impl TopicStats {
    pub fn empty() -> Self {
        TopicStats {
            mastery: 0.0,
            attempt_count: 0,
            last_attempt_index: None,
        }
    }
}

impl QuestionHistory {
    /// Whether the most recent attempt was answered correctly. `None` if the question
    /// was never attempted.
    pub fn last_correct(&self) -> Option<bool> {
        self.attempts.last().map(|a| a.is_correct)
    }
}

/// Fold the response log into statistics for every topic that appears in it.
pub fn build_topic_stats(responses: &[Response]) -> BTreeMap<Topic, TopicStats> {
    let mut counts: BTreeMap<Topic, (usize, usize, usize)> = BTreeMap::new();
    for (index, response) in responses.iter().enumerate() {
        let entry = counts.entry(response.topic).or_insert((0, 0, index));
        entry.0 += 1;
        if response.is_correct {
            entry.1 += 1;
        }
        entry.2 = index;
    }

    counts
        .into_iter()
        .map(|(topic, (total, correct, last))| {
            let stats = TopicStats {
                mastery: fraction(correct, total),
                attempt_count: total,
                last_attempt_index: Some(last),
            };
            (topic, stats)
        })
        .collect()
}

/// Collect every attempt at the question with the given id.
pub fn question_history(
    question_id: i64,
    responses: &[Response],
    recent_window: usize,
) -> QuestionHistory {
    let attempts: Vec<Attempt> = responses
        .iter()
        .enumerate()
        .filter(|(_, r)| r.question_id == question_id)
        .map(|(index, r)| Attempt {
            is_correct: r.is_correct,
            index,
        })
        .collect();

    let recent = &attempts[attempts.len().saturating_sub(recent_window)..];
    QuestionHistory {
        recent_success: success_rate(recent),
        overall_success: success_rate(&attempts),
        last_attempt_index: attempts.last().map(|a| a.index),
        attempts,
    }
}

/// Number every response by how many times its question had been attempted up to and
/// including that response, starting from 1.
pub fn attempt_numbers(responses: &[Response]) -> Vec<usize> {
    let mut seen: HashMap<i64, usize> = HashMap::new();
    responses
        .iter()
        .map(|r| {
            let count = seen.entry(r.question_id).or_insert(0);
            *count += 1;
            *count
        })
        .collect()
}

fn success_rate(attempts: &[Attempt]) -> f64 {
    fraction(attempts.iter().filter(|a| a.is_correct).count(), attempts.len())
}

fn fraction(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        (numerator as f64) / (denominator as f64)
    }
}
