//! Core product idea domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{Error, store::StoreId};

/// Database identifier for a product idea.
pub type IdeaId = i64;

/// A validated expectation score between 1 and 10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ExpectationScore(u8);

impl ExpectationScore {
    /// Create an expectation score.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidScore] if `score` is outside 1-10.
    pub fn new(score: i64) -> Result<Self, Error> {
        if (1..=10).contains(&score) {
            Ok(Self(score as u8))
        } else {
            Err(Error::InvalidScore(score))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    /// The badge color classes for this score: green for high expectations,
    /// yellow for middling, gray for long shots.
    pub fn badge_class(&self) -> &'static str {
        if self.0 >= 8 {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
        } else if self.0 >= 5 {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-yellow-800 bg-yellow-100 dark:bg-yellow-900 dark:text-yellow-300"
        } else {
            "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
            text-gray-800 bg-gray-100 dark:bg-gray-700 dark:text-gray-300"
        }
    }
}

impl TryFrom<i64> for ExpectationScore {
    type Error = Error;

    fn try_from(score: i64) -> Result<Self, Self::Error> {
        ExpectationScore::new(score)
    }
}

impl From<ExpectationScore> for i64 {
    fn from(score: ExpectationScore) -> i64 {
        score.0 as i64
    }
}

impl Display for ExpectationScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a product idea is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    #[default]
    Idea,
    Todo,
    InProgress,
    Live,
    Abandoned,
}

impl IdeaStatus {
    /// All statuses, in form drop-down order.
    pub const ALL: [IdeaStatus; 5] = [
        IdeaStatus::Idea,
        IdeaStatus::Todo,
        IdeaStatus::InProgress,
        IdeaStatus::Live,
        IdeaStatus::Abandoned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Idea => "idea",
            IdeaStatus::Todo => "todo",
            IdeaStatus::InProgress => "in_progress",
            IdeaStatus::Live => "live",
            IdeaStatus::Abandoned => "abandoned",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IdeaStatus::Idea => "Idea",
            IdeaStatus::Todo => "To Do",
            IdeaStatus::InProgress => "In Progress",
            IdeaStatus::Live => "Live",
            IdeaStatus::Abandoned => "Abandoned",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            IdeaStatus::Idea => {
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
                text-blue-800 bg-blue-100 dark:bg-blue-900 dark:text-blue-300"
            }
            IdeaStatus::Todo => {
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
                text-purple-800 bg-purple-100 dark:bg-purple-900 dark:text-purple-300"
            }
            IdeaStatus::InProgress => {
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
                text-orange-800 bg-orange-100 dark:bg-orange-900 dark:text-orange-300"
            }
            IdeaStatus::Live => {
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
                text-green-800 bg-green-100 dark:bg-green-900 dark:text-green-300"
            }
            IdeaStatus::Abandoned => {
                "inline-flex items-center px-2.5 py-0.5 text-xs font-semibold rounded-full \
                text-red-800 bg-red-100 dark:bg-red-900 dark:text-red-300"
            }
        }
    }

    pub(crate) fn from_sql(raw: &str, column_index: usize) -> Result<Self, rusqlite::Error> {
        match raw {
            "idea" => Ok(IdeaStatus::Idea),
            "todo" => Ok(IdeaStatus::Todo),
            "in_progress" => Ok(IdeaStatus::InProgress),
            "live" => Ok(IdeaStatus::Live),
            "abandoned" => Ok(IdeaStatus::Abandoned),
            other => Err(rusqlite::Error::FromSqlConversionFailure(
                column_index,
                rusqlite::types::Type::Text,
                format!("unknown idea status {other:?}").into(),
            )),
        }
    }
}

/// A product idea attached to one of the seller's stores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub store_id: StoreId,
    pub title: String,
    pub description: Option<String>,
    pub expectation_score: ExpectationScore,
    pub status: IdeaStatus,
}

/// The fields needed to create or update a product idea.
#[derive(Debug, Clone, PartialEq)]
pub struct IdeaDraft {
    pub store_id: StoreId,
    pub title: String,
    pub description: Option<String>,
    pub expectation_score: ExpectationScore,
    pub status: IdeaStatus,
}

#[cfg(test)]
mod expectation_score_tests {
    use crate::Error;

    use super::ExpectationScore;

    #[test]
    fn accepts_scores_in_range() {
        assert!(ExpectationScore::new(1).is_ok());
        assert!(ExpectationScore::new(10).is_ok());
    }

    #[test]
    fn rejects_scores_out_of_range() {
        assert_eq!(ExpectationScore::new(0), Err(Error::InvalidScore(0)));
        assert_eq!(ExpectationScore::new(11), Err(Error::InvalidScore(11)));
        assert_eq!(ExpectationScore::new(-3), Err(Error::InvalidScore(-3)));
    }
}
