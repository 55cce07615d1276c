use super::types::{NewQuestionCycle, QuestionCycle, QuestionCyclePatch};
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, select_maybe_single, select_rows, update_row, Query};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct CycleRow<'a> {
    #[serde(flatten)]
    cycle: &'a NewQuestionCycle,
    created_by: &'a str,
}

/// Cycles of a question in order.
pub async fn fetch_question_cycles(
    ctx: &AdminContext,
    question_id: &str,
) -> Result<Vec<QuestionCycle>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::QuestionCycles(question_id.to_string()), || async {
            debug!(question_id, "Fetching question cycles");
            Ok::<_, AdminError>(load_question_cycles(ctx, question_id).await?)
        })
        .await
}

/// Cycles straight from the store, bypassing the cache.
pub async fn load_question_cycles(
    ctx: &AdminContext,
    question_id: &str,
) -> Result<Vec<QuestionCycle>, AdminError> {
    let query = Query::new()
        .eq("item_question_id", question_id)
        .order("order_index", true);
    Ok(select_rows(ctx.store(), &query).await?)
}

pub async fn create_question_cycle(
    ctx: &AdminContext,
    cycle: &NewQuestionCycle,
) -> Result<QuestionCycle, AdminError> {
    let author = ctx.require_author()?;
    let created: QuestionCycle = insert_row(
        ctx.store(),
        &CycleRow {
            cycle,
            created_by: &author,
        },
    )
    .await?;

    invalidate_question(ctx, &created.item_question_id).await;
    info!(
        cycle_id = %created.id,
        question_id = %created.item_question_id,
        order_index = created.order_index,
        "Created question cycle"
    );
    Ok(created)
}

pub async fn update_question_cycle(
    ctx: &AdminContext,
    id: &str,
    patch: &QuestionCyclePatch,
) -> Result<QuestionCycle, AdminError> {
    let updated: QuestionCycle = update_row(ctx.store(), id, patch).await?;
    invalidate_question(ctx, &updated.item_question_id).await;
    info!(cycle_id = %id, "Updated question cycle");
    Ok(updated)
}

/// Delete a cycle and its answers.
pub async fn delete_question_cycle(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let existing: Option<QuestionCycle> =
        select_maybe_single(ctx.store(), &Query::by_id(id)).await?;
    let Some(cycle) = existing else {
        debug!(cycle_id = %id, "Question cycle already absent");
        return Ok(());
    };

    delete_where::<QuestionCycle>(ctx.store(), &Query::by_id(id)).await?;

    invalidate_question(ctx, &cycle.item_question_id).await;
    ctx.cache()
        .invalidate(&QueryKey::CycleAnswers(cycle.id.clone()))
        .await;
    info!(cycle_id = %id, question_id = %cycle.item_question_id, "Deleted question cycle");
    Ok(())
}

async fn invalidate_question(ctx: &AdminContext, question_id: &str) {
    ctx.cache()
        .invalidate_all(&[
            QueryKey::QuestionCycles(question_id.to_string()),
            QueryKey::QuestionDetails(question_id.to_string()),
        ])
        .await;
}
