use crate::question::{
    CycleAnswer, CycleAnswerPatch, ItemQuestion, ItemQuestionPatch, NewCycleAnswer,
    NewItemQuestion, NewQuestionCycle, QuestionCycle, QuestionCyclePatch, QuestionType,
};
use serde::Serialize;
use std::fmt;

/// A node of the editor tree and whether the store knows about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Draft<T> {
    /// Held only in editor memory.
    New(T),
    Persisted { id: String, fields: T },
    /// Persisted, with the remote delete pending until save.
    Deleted { id: String, fields: T },
}

impl<T> Draft<T> {
    pub fn persisted(id: impl Into<String>, fields: T) -> Self {
        Draft::Persisted {
            id: id.into(),
            fields,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Draft::New(_) => None,
            Draft::Persisted { id, .. } | Draft::Deleted { id, .. } => Some(id),
        }
    }

    #[must_use]
    pub fn fields(&self) -> &T {
        match self {
            Draft::New(fields)
            | Draft::Persisted { fields, .. }
            | Draft::Deleted { fields, .. } => fields,
        }
    }

    pub fn fields_mut(&mut self) -> &mut T {
        match self {
            Draft::New(fields)
            | Draft::Persisted { fields, .. }
            | Draft::Deleted { fields, .. } => fields,
        }
    }

    #[must_use]
    pub fn is_new(&self) -> bool {
        matches!(self, Draft::New(_))
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        matches!(self, Draft::Deleted { .. })
    }

    /// Mark for deletion. A node the store never saw has nothing to delete
    /// and yields `None`.
    #[must_use]
    pub fn into_deleted(self) -> Option<Self> {
        match self {
            Draft::New(_) => None,
            Draft::Persisted { id, fields } | Draft::Deleted { id, fields } => {
                Some(Draft::Deleted { id, fields })
            }
        }
    }
}

/// Editable fields of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionFields {
    pub question_text: String,
    pub question_type: QuestionType,
    pub display_timestamp: u32,
    pub order_index: i32,
    pub language: String,
    pub show_subtitles: bool,
    pub show_question: bool,
}

impl QuestionFields {
    #[must_use]
    pub fn blank(question_type: QuestionType, language: &str) -> Self {
        Self {
            question_text: String::new(),
            question_type,
            display_timestamp: 0,
            order_index: 0,
            language: language.to_string(),
            show_subtitles: false,
            show_question: true,
        }
    }

    pub(crate) fn to_new(&self, item_id: &str) -> NewItemQuestion {
        NewItemQuestion {
            item_id: item_id.to_string(),
            question_text: self.question_text.clone(),
            question_type: self.question_type,
            display_timestamp: self.display_timestamp,
            order_index: self.order_index,
            language: Some(self.language.clone()),
            show_subtitles: Some(self.show_subtitles),
            show_question: Some(self.show_question),
        }
    }

    pub(crate) fn to_patch(&self) -> ItemQuestionPatch {
        ItemQuestionPatch {
            question_text: Some(self.question_text.trim().to_string()),
            question_type: Some(self.question_type),
            display_timestamp: Some(self.display_timestamp),
            order_index: Some(self.order_index),
            language: Some(self.language.clone()),
            show_subtitles: Some(self.show_subtitles),
            show_question: Some(self.show_question),
        }
    }
}

impl From<&ItemQuestion> for QuestionFields {
    fn from(question: &ItemQuestion) -> Self {
        Self {
            question_text: question.question_text.clone(),
            question_type: question.question_type,
            display_timestamp: question.display_timestamp,
            order_index: question.order_index,
            language: question.language.clone(),
            show_subtitles: question.show_subtitles,
            show_question: question.show_question,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleFields {
    pub delay_seconds: u32,
    pub duration_seconds: u32,
    pub order_index: i32,
    pub is_active: bool,
}

impl CycleFields {
    #[must_use]
    pub fn starting_at(order_index: i32, duration_seconds: u32) -> Self {
        Self {
            delay_seconds: 0,
            duration_seconds,
            order_index,
            is_active: true,
        }
    }

    pub(crate) fn apply(&mut self, patch: &QuestionCyclePatch) {
        if let Some(delay) = patch.delay_seconds {
            self.delay_seconds = delay;
        }
        if let Some(duration) = patch.duration_seconds {
            self.duration_seconds = duration;
        }
        if let Some(order_index) = patch.order_index {
            self.order_index = order_index;
        }
        if let Some(active) = patch.is_active {
            self.is_active = active;
        }
    }

    pub(crate) fn to_new(&self, question_id: &str) -> NewQuestionCycle {
        NewQuestionCycle {
            item_question_id: question_id.to_string(),
            delay_seconds: self.delay_seconds,
            duration_seconds: self.duration_seconds,
            order_index: self.order_index,
            is_active: self.is_active,
        }
    }

    pub(crate) fn to_patch(&self) -> QuestionCyclePatch {
        QuestionCyclePatch {
            delay_seconds: Some(self.delay_seconds),
            duration_seconds: Some(self.duration_seconds),
            order_index: Some(self.order_index),
            is_active: Some(self.is_active),
        }
    }
}

impl From<&QuestionCycle> for CycleFields {
    fn from(cycle: &QuestionCycle) -> Self {
        Self {
            delay_seconds: cycle.delay_seconds,
            duration_seconds: cycle.duration_seconds,
            order_index: cycle.order_index,
            is_active: cycle.is_active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFields {
    pub answer_text: String,
    pub is_correct: bool,
    pub ondas_reward: u32,
    pub order_index: i32,
}

impl AnswerFields {
    #[must_use]
    pub fn empty(order_index: i32, is_correct: bool) -> Self {
        Self {
            answer_text: String::new(),
            is_correct,
            ondas_reward: 0,
            order_index,
        }
    }

    pub(crate) fn to_new(&self, cycle_id: &str) -> NewCycleAnswer {
        NewCycleAnswer {
            question_cycle_id: cycle_id.to_string(),
            answer_text: self.answer_text.clone(),
            is_correct: self.is_correct,
            ondas_reward: self.ondas_reward,
            order_index: self.order_index,
        }
    }

    pub(crate) fn to_patch(&self) -> CycleAnswerPatch {
        CycleAnswerPatch {
            answer_text: Some(self.answer_text.clone()),
            is_correct: Some(self.is_correct),
            ondas_reward: Some(self.ondas_reward),
            order_index: Some(self.order_index),
        }
    }
}

impl From<&CycleAnswer> for AnswerFields {
    fn from(answer: &CycleAnswer) -> Self {
        Self {
            answer_text: answer.answer_text.clone(),
            is_correct: answer.is_correct,
            ondas_reward: answer.ondas_reward,
            order_index: answer.order_index,
        }
    }
}

/// Editor-local handle for a cycle, stable whether or not it has an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CycleKey(pub(crate) u64);

impl fmt::Display for CycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One cycle of the tree with its answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftCycle {
    pub key: CycleKey,
    pub node: Draft<CycleFields>,
    /// Metadata changed locally since load or last save.
    pub dirty: bool,
    pub answers: Vec<Draft<AnswerFields>>,
}

impl DraftCycle {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.node.id()
    }

    #[must_use]
    pub fn fields(&self) -> &CycleFields {
        self.node.fields()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        !self.node.is_deleted()
    }
}
