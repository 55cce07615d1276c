use crate::error::AdminError;
use crate::store::{Record, Table};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of interactive question shown over a video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    OpenEnded,
    /// Two-answer question with exactly one cycle.
    #[serde(rename = "a_b")]
    Ab,
    Quiz,
}

impl QuestionType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple_choice",
            QuestionType::TrueFalse => "true_false",
            QuestionType::OpenEnded => "open_ended",
            QuestionType::Ab => "a_b",
            QuestionType::Quiz => "quiz",
        }
    }

    #[must_use]
    pub fn is_ab(self) -> bool {
        self == QuestionType::Ab
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "multiple_choice" => Ok(QuestionType::MultipleChoice),
            "true_false" => Ok(QuestionType::TrueFalse),
            "open_ended" => Ok(QuestionType::OpenEnded),
            "a_b" | "ab" => Ok(QuestionType::Ab),
            "quiz" => Ok(QuestionType::Quiz),
            other => Err(AdminError::validation(format!("Unknown question type '{other}'"))),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Row in `item_questions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuestion {
    pub id: String,
    pub item_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    /// Second of the video at which the question appears.
    pub display_timestamp: u32,
    pub order_index: i32,
    pub language: String,
    #[serde(default)]
    pub show_subtitles: bool,
    #[serde(default = "default_true")]
    pub show_question: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for ItemQuestion {
    const TABLE: Table = Table::ItemQuestions;
}

/// Row in `question_cycles`: one timed answer window of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCycle {
    pub id: String,
    pub item_question_id: String,
    pub delay_seconds: u32,
    pub duration_seconds: u32,
    pub order_index: i32,
    pub is_active: bool,
    #[serde(default)]
    pub created_by: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for QuestionCycle {
    const TABLE: Table = Table::QuestionCycles;
}

/// Row in `cycle_answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleAnswer {
    pub id: String,
    pub question_cycle_id: String,
    pub answer_text: String,
    pub is_correct: bool,
    /// Reward granted for this answer.
    pub ondas_reward: u32,
    pub order_index: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl Record for CycleAnswer {
    const TABLE: Table = Table::CycleAnswers;
}

#[derive(Debug, Clone, Default)]
pub struct NewItemQuestion {
    pub item_id: String,
    pub question_text: String,
    pub question_type: QuestionType,
    pub display_timestamp: u32,
    pub order_index: i32,
    /// Defaults to the configured language.
    pub language: Option<String>,
    pub show_subtitles: Option<bool>,
    pub show_question: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemQuestionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_type: Option<QuestionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_timestamp: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_subtitles: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_question: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewQuestionCycle {
    pub item_question_id: String,
    pub delay_seconds: u32,
    pub duration_seconds: u32,
    pub order_index: i32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionCyclePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCycleAnswer {
    pub question_cycle_id: String,
    pub answer_text: String,
    pub is_correct: bool,
    pub ondas_reward: u32,
    pub order_index: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleAnswerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ondas_reward: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
}

/// A cycle together with its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleWithAnswers {
    pub cycle: QuestionCycle,
    pub answers: Vec<CycleAnswer>,
}

/// A question with its whole cycle/answer tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDetails {
    pub question: ItemQuestion,
    pub cycles: Vec<CycleWithAnswers>,
}
