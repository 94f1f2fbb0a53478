use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Course categories a question can belong to.
///
/// The set is closed: every storage collection is addressed through
/// [`Category::table_name`], never through caller-provided text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "BMGT")]
    Bmgt,
    #[serde(rename = "DS3850")]
    Ds3850,
    #[serde(rename = "DS3860")]
    Ds3860,
    Accounting,
    History,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("unknown category: {0}")]
    Unknown(String),
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Bmgt,
        Category::Ds3850,
        Category::Ds3860,
        Category::Accounting,
        Category::History,
    ];

    /// Display name shown to administrators and quiz-takers.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Category::Bmgt => "BMGT",
            Category::Ds3850 => "DS3850",
            Category::Ds3860 => "DS3860",
            Category::Accounting => "Accounting",
            Category::History => "History",
        }
    }

    /// SQL table holding this category's questions.
    #[must_use]
    pub fn table_name(self) -> &'static str {
        match self {
            Category::Bmgt => "bmgt_questions",
            Category::Ds3850 => "ds3850_questions",
            Category::Ds3860 => "ds3860_questions",
            Category::Accounting => "accounting_questions",
            Category::History => "history_questions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CategoryError::Unknown(s.to_string()))
    }
}
