//! Review status catalog and message translation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::homework::SubmissionRecord;

/// Review outcome reported by the homework API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// Every code the API is known to emit
    pub const ALL: [HomeworkStatus; 3] = [
        HomeworkStatus::Approved,
        HomeworkStatus::Reviewing,
        HomeworkStatus::Rejected,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "approved",
            HomeworkStatus::Reviewing => "reviewing",
            HomeworkStatus::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat
    pub fn verdict(&self) -> &'static str {
        match self {
            HomeworkStatus::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            HomeworkStatus::Reviewing => "Работа взята на проверку ревьюером.",
            HomeworkStatus::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for HomeworkStatus {
    type Err = crate::HomeworkBotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HomeworkStatus::ALL
            .into_iter()
            .find(|status| status.code() == s)
            .ok_or_else(|| crate::HomeworkBotError::UnknownStatus(s.to_string()))
    }
}

/// Build the chat message for a status change
pub fn translate(record: &SubmissionRecord) -> crate::Result<String> {
    let status: HomeworkStatus = record.status.parse()?;
    Ok(format!(
        "Changed status of submission \"{}\". {}",
        record.homework_name,
        status.verdict()
    ))
}
