/**
 * Choose the next question to ask based on past responses.
 *
 * Every call starts from scratch: topic statistics are rebuilt from the response log,
 * a topic is chosen (unless the caller pinned one), each question of that topic is
 * weighted by its own history, and one is drawn at random in proportion to its
 * weight. Calling twice with the same inputs differs only in the random draw.
 */
use log::debug;
use rand::thread_rng;
use rand::Rng;

use super::chooser;
use super::quiz::{Question, Response};
use super::sampler::weighted_random_select;
use super::stats::{build_topic_stats, question_history, RECENT_WINDOW};
use super::topic::Topic;
use super::weight::question_weight;

/// Choose the next question, or `None` if there is nothing to ask from the resolved
/// topic (including when `questions` is empty).
pub fn select_next_question<'a, R: Rng>(
    questions: &'a [Question],
    responses: &[Response],
    pinned_topic: Option<Topic>,
    rng: &mut R,
) -> Option<&'a Question> {
    let topic_stats = build_topic_stats(responses);

    let topic = match pinned_topic {
        Some(topic) => topic,
        None => {
            let topics = chooser::catalog_topics(questions);
            chooser::select_topic(&topics, responses, &topic_stats, rng).ok()?
        }
    };

    let candidates = filter_by_topic(questions, topic);
    if candidates.is_empty() {
        debug!("no questions available for {}", topic);
        return None;
    }

    let mastery = topic_stats.get(&topic).map(|s| s.mastery).unwrap_or(0.0);
    let weights: Vec<f64> = candidates
        .iter()
        .map(|question| {
            let history = question_history(question.id, responses, RECENT_WINDOW);
            let weight = question_weight(question, &history, responses.len(), mastery);
            debug!("question {} weight {:.4}", question.id, weight);
            weight
        })
        .collect();

    let chosen = weighted_random_select(&candidates, &weights, rng).cloned();
    if let Some(question) = chosen {
        debug!("chose question {} from {}", question.id, topic);
    }
    chosen
}

/// `select_next_question` with the thread-local random number generator.
pub fn next_question<'a>(
    questions: &'a [Question],
    responses: &[Response],
    pinned_topic: Option<Topic>,
) -> Option<&'a Question> {
    select_next_question(questions, responses, pinned_topic, &mut thread_rng())
}

/// Return the questions belonging to `topic`, in catalog order.
pub fn filter_by_topic(questions: &[Question], topic: Topic) -> Vec<&Question> {
    questions.iter().filter(|q| q.topic == topic).collect()
}
