/**
 * Sampling weights for questions within the chosen topic.
 *
 * Unseen questions get a flat, high weight. Seen questions are weighted by how badly
 * they went recently and overall, by spacing since the last attempt (a missed
 * question comes back after a few other questions, a correct one is held back for
 * longer), by how many times they were asked, and by how close their difficulty is to
 * the user's mastery of the topic. Anything asked in the last few responses is nearly
 * excluded.
 */
use super::quiz::Question;
use super::stats::QuestionHistory;

pub const UNSEEN_WEIGHT: f64 = 10.0;

const RECENT_FAILURE_RATE: f64 = 3.0;
const OVERALL_FAILURE_RATE: f64 = 1.5;

/// After a miss, bring the question back when its spacing falls in this range.
const REVIEW_MIN_SPACING: usize = 3;
const REVIEW_MAX_SPACING: usize = 8;
const REVIEW_BOOST: f64 = 3.0;
const TOO_SOON_PENALTY: f64 = 0.1;

/// After a correct answer, spacing below this is penalised by a factor of 10 per step.
const CORRECT_MIN_SPACING: usize = 8;
const CORRECT_SPACING_RATE: f64 = 0.08;

const MASTERED_DECAY: f64 = 0.4;
const STRUGGLING_DECAY: f64 = 0.2;

const DIFFICULTY_SCALE: f64 = 5.0;
const DIFFICULTY_SENSITIVITY: f64 = 0.3;

/// Questions attempted within this many responses are nearly excluded.
pub const REPEAT_WINDOW: usize = 10;
pub const REPEAT_PENALTY: f64 = 0.01;

/// Relative probability of choosing `question`. Always strictly positive.
pub fn question_weight(
    question: &Question,
    history: &QuestionHistory,
    total_responses: usize,
    topic_mastery: f64,
) -> f64 {
    let weight = spaced_weight(question, history, total_responses, topic_mastery)
        * recency_factor(history, total_responses);
    weight.max(f64::MIN_POSITIVE)
}

/// The weight before the anti-repeat guard is applied.
pub fn spaced_weight(
    question: &Question,
    history: &QuestionHistory,
    total_responses: usize,
    topic_mastery: f64,
) -> f64 {
    let (last_index, last_correct) = match (history.last_attempt_index, history.last_correct()) {
        (Some(index), Some(correct)) => (index, correct),
        _ => return UNSEEN_WEIGHT,
    };

    let mut weight = ((1.0 - history.recent_success) * RECENT_FAILURE_RATE).exp()
        * ((1.0 - history.overall_success) * OVERALL_FAILURE_RATE).exp();

    let spacing = total_responses.saturating_sub(last_index);
    if !last_correct {
        if spacing >= REVIEW_MIN_SPACING && spacing <= REVIEW_MAX_SPACING {
            weight *= REVIEW_BOOST;
        } else if spacing < REVIEW_MIN_SPACING {
            weight *= TOO_SOON_PENALTY;
        }
    } else {
        if spacing < CORRECT_MIN_SPACING {
            weight *= TOO_SOON_PENALTY.powi((CORRECT_MIN_SPACING - spacing) as i32);
        }
        weight *= (spacing as f64 * CORRECT_SPACING_RATE).exp();
    }

    let attempts = history.attempts.len() as f64;
    let success = history.overall_success;
    weight *= success * (-attempts * MASTERED_DECAY).exp()
        + (1.0 - success) * (-attempts * STRUGGLING_DECAY).exp();

    let center = topic_mastery * DIFFICULTY_SCALE;
    let distance = (question.difficulty() as f64 - center).abs();
    weight *= (-distance * DIFFICULTY_SENSITIVITY).exp();

    weight
}

/// `REPEAT_PENALTY` if the question was attempted in the last `REPEAT_WINDOW`
/// responses, otherwise 1.
pub fn recency_factor(history: &QuestionHistory, total_responses: usize) -> f64 {
    match history.last_attempt_index {
        Some(index) if index + REPEAT_WINDOW >= total_responses => REPEAT_PENALTY,
        _ => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{AnswerLabel, Choices, Response};
    use crate::stats::{question_history, RECENT_WINDOW};
    use crate::topic::Topic;

    #[test]
    fn unseen_question_gets_base_weight() {
        let q = question(1, Some(1));
        let history = question_history(1, &[], RECENT_WINDOW);
        assert_eq!(question_weight(&q, &history, 0, 0.0), UNSEEN_WEIGHT);
        assert_eq!(question_weight(&q, &history, 500, 0.9), UNSEEN_WEIGHT);
    }

    #[test]
    fn recent_attempt_is_penalised_by_exact_factor() {
        let q = question(1, None);
        let mut log = filler(20);
        log[15] = response(1, false);
        let history = question_history(1, &log, RECENT_WINDOW);

        let base = spaced_weight(&q, &history, log.len(), 0.5);
        let weight = question_weight(&q, &history, log.len(), 0.5);
        assert!((weight - base * REPEAT_PENALTY).abs() <= base * 1e-12);

        log[15] = response(999, false);
        log[5] = response(1, false);
        let history = question_history(1, &log, RECENT_WINDOW);
        assert_eq!(recency_factor(&history, log.len()), 1.0);
        assert_eq!(
            question_weight(&q, &history, log.len(), 0.5),
            spaced_weight(&q, &history, log.len(), 0.5)
        );
    }

    #[test]
    fn repeat_window_covers_last_ten_responses() {
        let mut log = filler(30);
        log[20] = response(1, true);
        let history = question_history(1, &log, RECENT_WINDOW);
        assert_eq!(recency_factor(&history, log.len()), REPEAT_PENALTY);

        let mut log = filler(30);
        log[19] = response(1, true);
        let history = question_history(1, &log, RECENT_WINDOW);
        assert_eq!(recency_factor(&history, log.len()), 1.0);
    }

    #[test]
    fn missed_question_is_boosted_in_review_window() {
        let q = question(1, None);
        let weight_at = |spacing: usize| {
            let mut log = filler(30);
            log[30 - spacing] = response(1, false);
            let history = question_history(1, &log, RECENT_WINDOW);
            spaced_weight(&q, &history, log.len(), 0.6)
        };

        // Same history everywhere, only the spacing rule differs.
        let neutral = weight_at(12);
        assert!((weight_at(5) - neutral * REVIEW_BOOST).abs() < 1e-9 * neutral);
        assert!((weight_at(3) - neutral * REVIEW_BOOST).abs() < 1e-9 * neutral);
        assert!((weight_at(8) - neutral * REVIEW_BOOST).abs() < 1e-9 * neutral);
        assert!((weight_at(2) - neutral * TOO_SOON_PENALTY).abs() < 1e-9 * neutral);
        assert!((weight_at(9) - neutral).abs() < 1e-9 * neutral);
    }

    #[test]
    fn correct_question_is_held_back() {
        let q = question(1, None);
        let weight_at = |spacing: usize| {
            let mut log = filler(40);
            log[40 - spacing] = response(1, true);
            let history = question_history(1, &log, RECENT_WINDOW);
            spaced_weight(&q, &history, log.len(), 0.6)
        };

        let at_eight = weight_at(8);
        let at_five = weight_at(5);
        let expected = at_eight * 0.1f64.powi(3) * (-3.0 * 0.08f64).exp();
        assert!((at_five - expected).abs() < 1e-9 * at_eight);
        assert!(weight_at(20) > at_eight);
    }

    #[test]
    fn struggling_questions_decay_more_slowly() {
        let q = question(1, None);
        let mut failing = filler(40);
        let mut passing = filler(40);
        for i in [0usize, 5, 10, 15].iter() {
            failing[*i] = response(1, false);
            passing[*i] = response(1, true);
        }
        let failing = question_history(1, &failing, RECENT_WINDOW);
        let passing = question_history(1, &passing, RECENT_WINDOW);

        assert!(spaced_weight(&q, &failing, 40, 0.5) > spaced_weight(&q, &passing, 40, 0.5));
    }

    #[test]
    fn difficulty_near_mastery_is_favoured() {
        let mut log = filler(40);
        log[10] = response(1, false);
        let history = question_history(1, &log, RECENT_WINDOW);

        let easy = question(1, Some(1));
        let hard = question(1, Some(5));
        // Mastery 0.2 centres on difficulty 1.
        assert!(spaced_weight(&easy, &history, 40, 0.2) > spaced_weight(&hard, &history, 40, 0.2));
        assert!(spaced_weight(&hard, &history, 40, 1.0) > spaced_weight(&easy, &history, 40, 1.0));

        let ratio = spaced_weight(&easy, &history, 40, 0.2) / spaced_weight(&hard, &history, 40, 0.2);
        assert!((ratio - (4.0 * 0.3f64).exp()).abs() < 1e-9);
    }

    #[test]
    fn weight_is_always_positive() {
        let outcomes = [true, false];
        for difficulty in &[None, Some(1), Some(3), Some(5), Some(42)] {
            let q = question(1, *difficulty);
            for attempts in 1..12 {
                for first in &outcomes {
                    for last in &outcomes {
                        for mastery in &[0.0, 0.3, 1.0] {
                            let mut log = filler(60);
                            for k in 0..attempts {
                                let correct = if k + 1 == attempts { *last } else { *first };
                                log[59 - k * 5] = response(1, correct);
                            }
                            let history = question_history(1, &log, RECENT_WINDOW);
                            for total in &[60, 61, 200] {
                                assert!(question_weight(&q, &history, *total, *mastery) > 0.0);
                            }
                        }
                    }
                }
            }
        }
    }

    /// A log of `n` responses to some other question.
    fn filler(n: usize) -> Vec<Response> {
        (0..n).map(|_| response(999, true)).collect()
    }

    fn response(question_id: i64, is_correct: bool) -> Response {
        Response {
            question_id,
            topic: Topic::Polity,
            user_answer: AnswerLabel::A,
            is_correct,
            timestamp: chrono::Utc::now(),
        }
    }

    fn question(id: i64, difficulty: Option<u8>) -> Question {
        Question {
            id,
            collection: None,
            topic: Topic::Polity,
            text: format!("Question {}", id),
            options: Choices {
                a: String::from("one"),
                b: String::from("two"),
                c: String::from("three"),
                d: String::from("four"),
            },
            correct_answer: AnswerLabel::A,
            explanation: String::new(),
            difficulty,
        }
    }
}
