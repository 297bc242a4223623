/**
 * The closed set of subject areas that partition the question catalog.
 */
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::common::QuizError;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Topic {
    Polity,
    History,
    Economics,
    #[serde(rename = "Environment and Ecology")]
    EnvironmentAndEcology,
    #[serde(rename = "Science & Technology")]
    ScienceAndTechnology,
    Geography,
    #[serde(rename = "Current Events")]
    CurrentEvents,
}

pub const ALL_TOPICS: [Topic; 7] = [
    Topic::Polity,
    Topic::History,
    Topic::Economics,
    Topic::EnvironmentAndEcology,
    Topic::ScienceAndTechnology,
    Topic::Geography,
    Topic::CurrentEvents,
];

impl Topic {
    pub fn name(&self) -> &'static str {
        match *self {
            Topic::Polity => "Polity",
            Topic::History => "History",
            Topic::Economics => "Economics",
            Topic::EnvironmentAndEcology => "Environment and Ecology",
            Topic::ScienceAndTechnology => "Science & Technology",
            Topic::Geography => "Geography",
            Topic::CurrentEvents => "Current Events",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Topic {
    type Err = QuizError;

    /// Case-insensitive; also accepts the first word of the multi-word topics, e.g.
    /// "science" or "current".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        for topic in ALL_TOPICS.iter() {
            let name = topic.name().to_lowercase();
            let short = name.split_whitespace().next().unwrap_or("");
            if wanted == name || wanted == short {
                return Ok(*topic);
            }
        }
        Err(QuizError::UnknownTopic(String::from(s)))
    }
}
