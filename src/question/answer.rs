use super::types::{CycleAnswer, CycleAnswerPatch, NewCycleAnswer};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, select_maybe_single, select_rows, update_row, Query};
use tracing::{debug, info};

/// Answers of a cycle in order.
pub async fn fetch_cycle_answers(
    ctx: &AdminContext,
    cycle_id: &str,
) -> Result<Vec<CycleAnswer>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::CycleAnswers(cycle_id.to_string()), || async {
            debug!(cycle_id, "Fetching cycle answers");
            let query = Query::new()
                .eq("question_cycle_id", cycle_id)
                .order("order_index", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn create_cycle_answer(
    ctx: &AdminContext,
    answer: &NewCycleAnswer,
) -> Result<CycleAnswer, AdminError> {
    let created: CycleAnswer = insert_row(ctx.store(), answer).await?;
    invalidate_cycle(ctx, &created.question_cycle_id).await;
    info!(
        answer_id = %created.id,
        cycle_id = %created.question_cycle_id,
        "Created cycle answer"
    );
    Ok(created)
}

pub async fn update_cycle_answer(
    ctx: &AdminContext,
    id: &str,
    patch: &CycleAnswerPatch,
) -> Result<CycleAnswer, AdminError> {
    let updated: CycleAnswer = update_row(ctx.store(), id, patch).await?;
    invalidate_cycle(ctx, &updated.question_cycle_id).await;
    info!(answer_id = %id, "Updated cycle answer");
    Ok(updated)
}

pub async fn delete_cycle_answer(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let existing: Option<CycleAnswer> = select_maybe_single(ctx.store(), &Query::by_id(id)).await?;
    let Some(answer) = existing else {
        debug!(answer_id = %id, "Cycle answer already absent");
        return Ok(());
    };

    delete_where::<CycleAnswer>(ctx.store(), &Query::by_id(id)).await?;
    invalidate_cycle(ctx, &answer.question_cycle_id).await;
    info!(answer_id = %id, cycle_id = %answer.question_cycle_id, "Deleted cycle answer");
    Ok(())
}

async fn invalidate_cycle(ctx: &AdminContext, cycle_id: &str) {
    let cache = ctx.cache();
    cache
        .invalidate(&QueryKey::CycleAnswers(cycle_id.to_string()))
        .await;
    // Details are keyed by question, which an answer does not carry.
    cache.invalidate_scope(QueryScope::QuestionDetails).await;
}
