//! Draft editor for one question and its cycle/answer tree.
//!
//! Question and cycle metadata is staged in memory and written on
//! [`QuestionEditor::save`]. Answers of a saved cycle are written as soon as
//! they change, except for A/B questions whose two answers are upserted on
//! save.

mod draft;
mod error;
mod refresh;
mod save;

pub use draft::{AnswerFields, CycleFields, CycleKey, Draft, DraftCycle, QuestionFields};
pub use error::EditorError;

use crate::context::{AdminContext, ContentDefaults};
use crate::error::AdminError;
use crate::question::{
    create_cycle_answer, create_question_cycle, delete_cycle_answer, fetch_cycle_answers,
    fetch_question_cycles, update_cycle_answer, CycleAnswerPatch, ItemQuestion,
    QuestionCyclePatch, QuestionType,
};
use futures::future::try_join_all;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Number of answers of an A/B question.
pub const AB_ANSWER_COUNT: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorPhase {
    #[default]
    Closed,
    Opened,
    Editing,
    Saving,
}

impl fmt::Display for EditorPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EditorPhase::Closed => "closed",
            EditorPhase::Opened => "opened",
            EditorPhase::Editing => "editing",
            EditorPhase::Saving => "saving",
        };
        f.write_str(name)
    }
}

/// Values used when the editor builds new nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDefaults {
    pub question_type: QuestionType,
    pub language: String,
    pub cycle_duration_seconds: u32,
}

impl From<&ContentDefaults> for EditorDefaults {
    fn from(defaults: &ContentDefaults) -> Self {
        Self {
            question_type: QuestionType::default(),
            language: defaults.language.clone(),
            cycle_duration_seconds: defaults.cycle_duration_seconds,
        }
    }
}

impl Default for EditorDefaults {
    fn default() -> Self {
        Self::from(&ContentDefaults::default())
    }
}

#[derive(Debug)]
pub struct QuestionEditor {
    phase: EditorPhase,
    item_id: String,
    question: Draft<QuestionFields>,
    cycles: Vec<DraftCycle>,
    defaults: EditorDefaults,
    next_key: u64,
    last_error: Option<String>,
}

impl Default for QuestionEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionEditor {
    #[must_use]
    pub fn new() -> Self {
        let defaults = EditorDefaults::default();
        Self {
            phase: EditorPhase::Closed,
            item_id: String::new(),
            question: Draft::New(QuestionFields::blank(
                defaults.question_type,
                &defaults.language,
            )),
            cycles: Vec::new(),
            defaults,
            next_key: 0,
            last_error: None,
        }
    }

    /// Start a session for `item_id`. With `existing`, its cycles and their
    /// answers are loaded; otherwise the tree starts empty, or as the A/B
    /// skeleton when the default type is A/B.
    pub async fn open(
        &mut self,
        ctx: &AdminContext,
        item_id: &str,
        existing: Option<ItemQuestion>,
        defaults: EditorDefaults,
    ) -> Result<(), EditorError> {
        self.expect_phase("open", &[EditorPhase::Closed])?;
        self.reset();
        self.item_id = item_id.to_string();
        self.defaults = defaults;

        match existing {
            Some(question) => {
                let cycles = fetch_question_cycles(ctx, &question.id).await?;
                let answers = try_join_all(
                    cycles
                        .iter()
                        .map(|cycle| fetch_cycle_answers(ctx, &cycle.id)),
                )
                .await?;
                for (cycle, answers) in cycles.iter().zip(answers) {
                    let key = self.allocate_key();
                    self.cycles.push(DraftCycle {
                        key,
                        node: Draft::persisted(cycle.id.clone(), CycleFields::from(cycle)),
                        dirty: false,
                        answers: answers
                            .iter()
                            .map(|a| Draft::persisted(a.id.clone(), AnswerFields::from(a)))
                            .collect(),
                    });
                }
                self.question = Draft::persisted(question.id.clone(), QuestionFields::from(&question));
                debug!(
                    question_id = %question.id,
                    cycles = self.cycles.len(),
                    "Opened question editor"
                );
            }
            None => {
                self.question = Draft::New(QuestionFields::blank(
                    self.defaults.question_type,
                    &self.defaults.language,
                ));
                debug!(item_id, "Opened question editor for a new question");
            }
        }

        if self.question.fields().question_type.is_ab() && self.visible_cycles().next().is_none() {
            self.install_ab_skeleton()?;
        }
        self.phase = EditorPhase::Opened;
        Ok(())
    }

    /// Discard the tree and every unsaved edit.
    pub fn close(&mut self) {
        self.reset();
        self.phase = EditorPhase::Closed;
    }

    #[must_use]
    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    #[must_use]
    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    #[must_use]
    pub fn question(&self) -> &Draft<QuestionFields> {
        &self.question
    }

    /// Error of the last failed save, cleared by the next one.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Every cycle in the tree, including those pending deletion.
    #[must_use]
    pub fn cycles(&self) -> &[DraftCycle] {
        &self.cycles
    }

    pub fn visible_cycles(&self) -> impl Iterator<Item = &DraftCycle> {
        self.cycles.iter().filter(|c| c.is_visible())
    }

    #[must_use]
    pub fn cycle(&self, key: CycleKey) -> Option<&DraftCycle> {
        self.cycles.iter().find(|c| c.key == key)
    }

    pub fn set_question_text(&mut self, text: impl Into<String>) -> Result<(), EditorError> {
        let text = text.into();
        self.edit_question("set question text", |f| f.question_text = text)
    }

    /// Change the type. Switching to A/B with no visible cycles installs one
    /// cycle with two empty answers.
    pub fn set_question_type(&mut self, question_type: QuestionType) -> Result<(), EditorError> {
        self.edit_question("set question type", |f| f.question_type = question_type)?;
        if question_type.is_ab() && self.visible_cycles().next().is_none() {
            self.install_ab_skeleton()?;
        }
        Ok(())
    }

    pub fn set_display_timestamp(&mut self, seconds: u32) -> Result<(), EditorError> {
        self.edit_question("set display timestamp", |f| f.display_timestamp = seconds)
    }

    pub fn set_order_index(&mut self, order_index: i32) -> Result<(), EditorError> {
        self.edit_question("set order", |f| f.order_index = order_index)
    }

    pub fn set_language(&mut self, language: impl Into<String>) -> Result<(), EditorError> {
        let language = language.into();
        self.edit_question("set language", |f| f.language = language)
    }

    pub fn set_show_subtitles(&mut self, show: bool) -> Result<(), EditorError> {
        self.edit_question("set subtitles", |f| f.show_subtitles = show)
    }

    pub fn set_show_question(&mut self, show: bool) -> Result<(), EditorError> {
        self.edit_question("set question visibility", |f| f.show_question = show)
    }

    /// Add a cycle at the end of the tree. On a saved question it is created
    /// in the store right away; on a new one it waits for save.
    pub async fn create_cycle(&mut self, ctx: &AdminContext) -> Result<CycleKey, EditorError> {
        self.expect_editable("create a cycle")?;
        ctx.require_author()?;
        let fields = CycleFields::starting_at(
            index_from(self.cycles.len())?,
            self.defaults.cycle_duration_seconds,
        );

        let node = match self.question.id() {
            Some(question_id) => {
                let created = create_question_cycle(ctx, &fields.to_new(question_id)).await?;
                Draft::persisted(created.id.clone(), CycleFields::from(&created))
            }
            None => Draft::New(fields),
        };
        let key = self.allocate_key();
        self.cycles.push(DraftCycle {
            key,
            node,
            dirty: false,
            answers: Vec::new(),
        });
        self.phase = EditorPhase::Editing;
        Ok(key)
    }

    /// Stage a metadata change for save.
    pub fn update_cycle(
        &mut self,
        key: CycleKey,
        patch: &QuestionCyclePatch,
    ) -> Result<(), EditorError> {
        self.expect_editable("update a cycle")?;
        let cycle = self.cycle_mut(key)?;
        cycle.node.fields_mut().apply(patch);
        cycle.dirty = true;
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    /// Remove a new cycle, or hide a saved one until save deletes it.
    pub fn delete_cycle(&mut self, key: CycleKey) -> Result<(), EditorError> {
        self.expect_editable("delete a cycle")?;
        let position = self
            .cycles
            .iter()
            .position(|c| c.key == key)
            .ok_or(EditorError::UnknownCycle(key))?;
        let DraftCycle {
            key,
            node,
            dirty,
            answers,
        } = self.cycles.remove(position);
        if let Some(node) = node.into_deleted() {
            self.cycles.insert(
                position,
                DraftCycle {
                    key,
                    node,
                    dirty,
                    answers,
                },
            );
        }
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    /// Create an answer on a saved cycle. Returns the new answer id.
    pub async fn add_answer(
        &mut self,
        ctx: &AdminContext,
        key: CycleKey,
        answer_text: &str,
        is_correct: bool,
        ondas_reward: u32,
    ) -> Result<String, EditorError> {
        self.expect_editable("add an answer")?;
        let (cycle_id, order_index) = {
            let cycle = self.cycle_mut(key)?;
            let cycle_id = persisted_id(cycle)?;
            (cycle_id, index_from(cycle.answers.len())?)
        };
        let fields = AnswerFields {
            answer_text: answer_text.trim().to_string(),
            is_correct,
            ondas_reward,
            order_index,
        };
        let created = create_cycle_answer(ctx, &fields.to_new(&cycle_id)).await?;

        let cycle = self.cycle_mut(key)?;
        cycle
            .answers
            .push(Draft::persisted(created.id.clone(), AnswerFields::from(&created)));
        self.phase = EditorPhase::Editing;
        Ok(created.id)
    }

    pub async fn update_answer(
        &mut self,
        ctx: &AdminContext,
        key: CycleKey,
        answer_id: &str,
        patch: &CycleAnswerPatch,
    ) -> Result<(), EditorError> {
        self.expect_editable("update an answer")?;
        let position = self.answer_position(key, answer_id)?;
        let updated = update_cycle_answer(ctx, answer_id, patch).await?;

        let cycle = self.cycle_mut(key)?;
        if let Some(answer) = cycle.answers.get_mut(position) {
            *answer = Draft::persisted(updated.id.clone(), AnswerFields::from(&updated));
        }
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    pub async fn delete_answer(
        &mut self,
        ctx: &AdminContext,
        key: CycleKey,
        answer_id: &str,
    ) -> Result<(), EditorError> {
        self.expect_editable("delete an answer")?;
        let position = self.answer_position(key, answer_id)?;
        delete_cycle_answer(ctx, answer_id).await?;

        let cycle = self.cycle_mut(key)?;
        if position < cycle.answers.len() {
            cycle.answers.remove(position);
        }
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    /// Set the text of A/B answer `index` (0 = "A", 1 = "B") locally.
    pub fn set_ab_answer_text(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<(), EditorError> {
        self.expect_editable("edit an A/B answer")?;
        let text = text.into();
        let answer = self
            .ab_cycle_mut()?
            .answers
            .get_mut(index)
            .ok_or_else(|| EditorError::UnknownAnswer(format!("position {index}")))?;
        answer.fields_mut().answer_text = text;
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    /// Select the correct A/B answer locally.
    pub fn set_ab_correct(&mut self, index: usize) -> Result<(), EditorError> {
        self.expect_editable("select the correct answer")?;
        let cycle = self.ab_cycle_mut()?;
        if index >= cycle.answers.len() {
            return Err(EditorError::UnknownAnswer(format!("position {index}")));
        }
        for (position, answer) in cycle.answers.iter_mut().enumerate() {
            answer.fields_mut().is_correct = position == index;
        }
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    /// Position of the selected A/B answer, if any.
    #[must_use]
    pub fn ab_correct_index(&self) -> Option<usize> {
        self.visible_cycles()
            .next()?
            .answers
            .iter()
            .position(|a| a.fields().is_correct)
    }

    fn install_ab_skeleton(&mut self) -> Result<(), EditorError> {
        // Deleted cycles keep their slot, so the new one goes after them.
        let order_index = index_from(self.cycles.len())?;
        let key = self.allocate_key();
        self.cycles.push(DraftCycle {
            key,
            node: Draft::New(CycleFields::starting_at(
                order_index,
                self.defaults.cycle_duration_seconds,
            )),
            dirty: false,
            answers: vec![
                Draft::New(AnswerFields::empty(0, true)),
                Draft::New(AnswerFields::empty(1, false)),
            ],
        });
        Ok(())
    }

    fn reset(&mut self) {
        self.item_id.clear();
        self.question = Draft::New(QuestionFields::blank(
            self.defaults.question_type,
            &self.defaults.language,
        ));
        self.cycles.clear();
        self.last_error = None;
    }

    fn allocate_key(&mut self) -> CycleKey {
        let key = CycleKey(self.next_key);
        self.next_key = self.next_key.wrapping_add(1);
        key
    }

    fn expect_phase(
        &self,
        action: &'static str,
        allowed: &[EditorPhase],
    ) -> Result<(), EditorError> {
        if allowed.contains(&self.phase) {
            Ok(())
        } else {
            Err(EditorError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn expect_editable(&self, action: &'static str) -> Result<(), EditorError> {
        self.expect_phase(action, &[EditorPhase::Opened, EditorPhase::Editing])
    }

    fn edit_question(
        &mut self,
        action: &'static str,
        edit: impl FnOnce(&mut QuestionFields),
    ) -> Result<(), EditorError> {
        self.expect_editable(action)?;
        edit(self.question.fields_mut());
        self.phase = EditorPhase::Editing;
        Ok(())
    }

    fn cycle_mut(&mut self, key: CycleKey) -> Result<&mut DraftCycle, EditorError> {
        self.cycles
            .iter_mut()
            .find(|c| c.key == key)
            .ok_or(EditorError::UnknownCycle(key))
    }

    fn ab_cycle_mut(&mut self) -> Result<&mut DraftCycle, EditorError> {
        self.cycles
            .iter_mut()
            .find(|c| c.is_visible())
            .ok_or_else(|| AdminError::validation("An A/B question needs a cycle").into())
    }

    fn answer_position(&mut self, key: CycleKey, answer_id: &str) -> Result<usize, EditorError> {
        let cycle = self.cycle_mut(key)?;
        persisted_id(cycle)?;
        cycle
            .answers
            .iter()
            .position(|a| a.id() == Some(answer_id))
            .ok_or_else(|| EditorError::UnknownAnswer(answer_id.to_string()))
    }
}

fn persisted_id(cycle: &DraftCycle) -> Result<String, EditorError> {
    match &cycle.node {
        Draft::Persisted { id, .. } => Ok(id.clone()),
        Draft::New(_) | Draft::Deleted { .. } => Err(EditorError::CycleNotPersisted(cycle.key)),
    }
}

pub(crate) fn index_from(len: usize) -> Result<i32, EditorError> {
    i32::try_from(len).map_err(|_| AdminError::validation("Too many entries to order").into())
}

#[cfg(test)]
#[path = "editor_tests.rs"]
mod tests;
