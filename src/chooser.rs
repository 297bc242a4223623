/**
 * Choose the topic to draw the next question from.
 *
 * For the first `COLD_START_RESPONSES` responses the goal is even coverage: the
 * least-attempted topics are candidates and one is picked at random, avoiding the
 * previous question's topic when possible. After that every topic gets a need score
 * built from low mastery, time since it was last seen, how little it has been
 * covered, and how rarely it appeared in the last few responses. The topic with the
 * highest score wins; on an exact tie the topic earlier in catalog order wins.
 */
use std::collections::BTreeMap;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use super::common::{QuizError, Result};
use super::quiz::{Question, Response};
use super::stats::TopicStats;
use super::topic::Topic;

/// Below this many responses, topics are balanced rather than scored.
pub const COLD_START_RESPONSES: usize = 40;
/// How many of the latest responses count towards the recent-frequency penalty.
const RECENT_TOPIC_WINDOW: usize = 5;

const MASTERY_WEIGHT: f64 = 1.0;
const SPACING_WEIGHT: f64 = 0.8;
const COVERAGE_WEIGHT: f64 = 0.5;
const RECENCY_WEIGHT: f64 = 1.5;
/// Coverage factor for a topic that was never attempted.
const UNSEEN_COVERAGE: f64 = 2.0;

/// Return the distinct topics of the catalog in order of first appearance.
pub fn catalog_topics(questions: &[Question]) -> Vec<Topic> {
    let mut topics = Vec::new();
    for question in questions.iter() {
        if !topics.contains(&question.topic) {
            topics.push(question.topic);
        }
    }
    topics
}

/// Pick the topic to ask from next. `topics` should be in catalog order, since it
/// decides ties between equal need scores.
pub fn select_topic<R: Rng>(
    topics: &[Topic],
    responses: &[Response],
    topic_stats: &BTreeMap<Topic, TopicStats>,
    rng: &mut R,
) -> Result<Topic> {
    if topics.is_empty() {
        return Err(QuizError::NoTopics);
    }

    if responses.len() < COLD_START_RESPONSES {
        balanced_topic(topics, responses, rng)
    } else {
        Ok(neediest_topic(topics, responses, topic_stats))
    }
}

/// Uniformly choose among the least-attempted topics.
fn balanced_topic<R: Rng>(topics: &[Topic], responses: &[Response], rng: &mut R) -> Result<Topic> {
    let counts: Vec<usize> = topics
        .iter()
        .map(|topic| responses.iter().filter(|r| r.topic == *topic).count())
        .collect();
    let fewest = counts.iter().cloned().min().unwrap_or(0);

    let mut candidates: Vec<Topic> = topics
        .iter()
        .zip(counts.iter())
        .filter(|(_, count)| **count == fewest)
        .map(|(topic, _)| *topic)
        .collect();

    if let Some(previous) = responses.last() {
        if candidates.len() > 1 {
            candidates.retain(|topic| *topic != previous.topic);
        }
    }

    debug!(
        "cold start ({} responses): {} attempts each for {:?}",
        responses.len(),
        fewest,
        candidates
    );
    candidates.choose(rng).cloned().ok_or(QuizError::NoTopics)
}

fn neediest_topic(
    topics: &[Topic],
    responses: &[Response],
    topic_stats: &BTreeMap<Topic, TopicStats>,
) -> Topic {
    let empty = TopicStats::empty();
    let mut best = topics[0];
    let mut best_score = f64::NEG_INFINITY;
    for topic in topics.iter() {
        let stats = topic_stats.get(topic).unwrap_or(&empty);
        let score = need_score(*topic, stats, responses);
        debug!("need score for {}: {:.3}", topic, score);
        if score > best_score {
            best = *topic;
            best_score = score;
        }
    }
    best
}

/// Score how much `topic` needs practice given its statistics and the full log.
pub fn need_score(topic: Topic, stats: &TopicStats, responses: &[Response]) -> f64 {
    let total = responses.len();
    let spacing = match stats.last_attempt_index {
        Some(index) => total.saturating_sub(index),
        None => total + 1,
    };
    let coverage = if stats.attempt_count == 0 {
        UNSEEN_COVERAGE
    } else {
        1.0 / (stats.attempt_count as f64).sqrt()
    };
    let recent_frequency = responses
        .iter()
        .rev()
        .take(RECENT_TOPIC_WINDOW)
        .filter(|r| r.topic == topic)
        .count() as f64;
    let recent_penalty = 1.0 / (recent_frequency * recent_frequency + 1.0);

    (1.0 - stats.mastery) * MASTERY_WEIGHT
        + ((spacing + 1) as f64).ln() * SPACING_WEIGHT
        + coverage * COVERAGE_WEIGHT
        + recent_penalty * RECENCY_WEIGHT
}
