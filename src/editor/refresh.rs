use super::{AnswerFields, CycleFields, Draft, DraftCycle, EditorError, QuestionEditor};
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::question::{fetch_cycle_answers, load_question_cycles, QuestionCycle};
use std::collections::HashSet;
use tracing::debug;

impl QuestionEditor {
    /// Reload the remote cycle list when its length no longer matches the
    /// saved cycles held locally. Returns whether the tree changed.
    ///
    /// Dirty local metadata wins over the store, answers held locally are
    /// kept, unsaved cycles stay, saved cycles gone from the store are dropped
    /// and cycles only the store knows are appended.
    pub async fn refresh_cycles(&mut self, ctx: &AdminContext) -> Result<bool, EditorError> {
        self.expect_editable("refresh cycles")?;
        let Some(question_id) = self.question.id().map(str::to_string) else {
            return Ok(false);
        };

        let remote = load_question_cycles(ctx, &question_id).await?;
        let local_saved = self.cycles.iter().filter(|c| c.id().is_some()).count();
        if remote.len() == local_saved {
            return Ok(false);
        }
        debug!(
            question_id = %question_id,
            remote = remote.len(),
            local = local_saved,
            "Cycle count changed remotely; merging"
        );
        ctx.cache()
            .invalidate(&QueryKey::QuestionCycles(question_id))
            .await;

        let known: HashSet<String> = self
            .cycles
            .iter()
            .filter_map(|c| c.id().map(str::to_string))
            .collect();
        let old = std::mem::take(&mut self.cycles);
        self.cycles = old
            .into_iter()
            .filter_map(|cycle| merge_cycle(cycle, &remote))
            .collect();

        for cycle in remote.iter().filter(|c| !known.contains(&c.id)) {
            let answers = fetch_cycle_answers(ctx, &cycle.id).await?;
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
        Ok(true)
    }
}

fn merge_cycle(cycle: DraftCycle, remote: &[QuestionCycle]) -> Option<DraftCycle> {
    let Some(id) = cycle.id() else {
        return Some(cycle);
    };
    let found = remote.iter().find(|r| r.id == id)?;
    if cycle.dirty || cycle.node.is_deleted() {
        return Some(cycle);
    }
    Some(DraftCycle {
        node: Draft::persisted(found.id.clone(), CycleFields::from(found)),
        ..cycle
    })
}
