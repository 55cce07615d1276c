use super::{
    AnswerFields, CycleFields, Draft, EditorError, EditorPhase, QuestionEditor, QuestionFields,
    AB_ANSWER_COUNT,
};
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::question::{
    create_cycle_answer, create_item_question, create_question_cycle, delete_question_cycle,
    update_cycle_answer, update_item_question, update_question_cycle, ItemQuestion,
};
use crate::utils::non_empty;
use tracing::{info, warn};

enum CycleStep {
    Delete(String),
    Create(CycleFields),
    Update(String, CycleFields),
}

impl QuestionEditor {
    /// Write the question, then its cycles (and for A/B its two answers).
    ///
    /// The first failing store call stops the save: the error is kept in
    /// [`QuestionEditor::last_error`], the editor returns to editing and the
    /// tree keeps whatever was already written. On success the editor closes.
    pub async fn save(&mut self, ctx: &AdminContext) -> Result<ItemQuestion, EditorError> {
        self.expect_editable("save")?;
        if let Err(e) = self.validate(ctx) {
            self.last_error = Some(e.to_string());
            self.phase = EditorPhase::Editing;
            return Err(e.into());
        }

        self.phase = EditorPhase::Saving;
        self.last_error = None;
        match self.write(ctx).await {
            Ok(question) => {
                ctx.cache()
                    .invalidate_all(&[
                        QueryKey::ItemQuestions(question.item_id.clone()),
                        QueryKey::QuestionCycles(question.id.clone()),
                        QueryKey::QuestionDetails(question.id.clone()),
                    ])
                    .await;
                info!(
                    question_id = %question.id,
                    question_type = %question.question_type,
                    "Saved question"
                );
                self.close();
                Ok(question)
            }
            Err(e) => {
                warn!(item_id = %self.item_id, "Question save aborted: {}", e);
                self.last_error = Some(e.to_string());
                self.phase = EditorPhase::Editing;
                Err(e.into())
            }
        }
    }

    fn validate(&self, ctx: &AdminContext) -> Result<(), AdminError> {
        let fields = self.question.fields();
        if non_empty(&fields.question_text).is_none() {
            return Err(AdminError::validation("Question text is required"));
        }
        if self.question.is_new() || self.cycles.iter().any(|c| c.node.is_new()) {
            ctx.require_author()?;
        }
        if fields.question_type.is_ab() {
            let mut visible = self.visible_cycles();
            let valid = match (visible.next(), visible.next()) {
                (Some(cycle), None) => cycle.answers.len() == AB_ANSWER_COUNT,
                _ => false,
            };
            if !valid {
                return Err(AdminError::validation(
                    "An A/B question needs exactly one cycle with two answers",
                ));
            }
        }
        Ok(())
    }

    async fn write(&mut self, ctx: &AdminContext) -> Result<ItemQuestion, AdminError> {
        let question = self.write_question(ctx).await?;
        if question.question_type.is_ab() {
            self.write_deletions(ctx).await?;
            self.write_ab(ctx, &question.id).await?;
        } else {
            self.write_cycles(ctx, &question.id).await?;
        }
        Ok(question)
    }

    async fn write_question(&mut self, ctx: &AdminContext) -> Result<ItemQuestion, AdminError> {
        let saved = match self.question.id() {
            Some(id) => update_item_question(ctx, id, &self.question.fields().to_patch()).await?,
            None => {
                let fields = self.question.fields();
                create_item_question(ctx, fields.to_new(&self.item_id)).await?
            }
        };
        self.question = Draft::persisted(saved.id.clone(), QuestionFields::from(&saved));
        Ok(saved)
    }

    async fn write_ab(&mut self, ctx: &AdminContext, question_id: &str) -> Result<(), AdminError> {
        let correct = self.ab_correct_index().unwrap_or(0);
        let cycle = self
            .cycles
            .iter_mut()
            .find(|c| c.is_visible())
            .ok_or_else(|| AdminError::validation("An A/B question needs a cycle"))?;

        let saved = match cycle.node.id() {
            Some(id) => update_question_cycle(ctx, id, &cycle.node.fields().to_patch()).await?,
            None => create_question_cycle(ctx, &cycle.node.fields().to_new(question_id)).await?,
        };
        cycle.node = Draft::persisted(saved.id.clone(), CycleFields::from(&saved));
        cycle.dirty = false;

        for (position, answer) in cycle.answers.iter_mut().enumerate().take(AB_ANSWER_COUNT) {
            let fields = answer.fields_mut();
            fields.is_correct = position == correct;
            fields.order_index = i32::try_from(position)
                .map_err(|_| AdminError::validation("A/B answers are limited to two"))?;
            let written = match answer.id() {
                Some(id) => update_cycle_answer(ctx, id, &answer.fields().to_patch()).await?,
                None => create_cycle_answer(ctx, &answer.fields().to_new(&saved.id)).await?,
            };
            *answer = Draft::persisted(written.id.clone(), AnswerFields::from(&written));
        }
        Ok(())
    }

    /// Cycles left over from before a switch to A/B.
    async fn write_deletions(&mut self, ctx: &AdminContext) -> Result<(), AdminError> {
        while let Some(position) = self.cycles.iter().position(|c| c.node.is_deleted()) {
            if let Some(id) = self.cycles.get(position).and_then(|c| c.id()).map(str::to_string) {
                delete_question_cycle(ctx, &id).await?;
            }
            self.cycles.remove(position);
        }
        Ok(())
    }

    /// Apply every cycle of the tree in order. Answers were already written
    /// as they changed.
    async fn write_cycles(&mut self, ctx: &AdminContext, question_id: &str) -> Result<(), AdminError> {
        let mut index = 0;
        while let Some(cycle) = self.cycles.get(index) {
            let step = match &cycle.node {
                Draft::Deleted { id, .. } => CycleStep::Delete(id.clone()),
                Draft::New(fields) => CycleStep::Create(fields.clone()),
                Draft::Persisted { id, fields } => CycleStep::Update(id.clone(), fields.clone()),
            };

            let saved = match step {
                CycleStep::Delete(id) => {
                    delete_question_cycle(ctx, &id).await?;
                    self.cycles.remove(index);
                    continue;
                }
                CycleStep::Create(fields) => {
                    create_question_cycle(ctx, &fields.to_new(question_id)).await?
                }
                CycleStep::Update(id, fields) => {
                    update_question_cycle(ctx, &id, &fields.to_patch()).await?
                }
            };
            if let Some(cycle) = self.cycles.get_mut(index) {
                cycle.node = Draft::persisted(saved.id.clone(), CycleFields::from(&saved));
                cycle.dirty = false;
            }
            index += 1;
        }
        Ok(())
    }
}
