use super::types::{ItemQuestion, ItemQuestionPatch, NewItemQuestion, QuestionType};
use crate::cache::{QueryKey, QueryScope};
use crate::context::AdminContext;
use crate::error::AdminError;
use crate::store::{delete_where, insert_row, select_maybe_single, select_rows, update_row, Query, Table};
use crate::utils::non_empty;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Serialize)]
struct QuestionRow<'a> {
    item_id: &'a str,
    question_text: &'a str,
    question_type: QuestionType,
    display_timestamp: u32,
    order_index: i32,
    language: &'a str,
    show_subtitles: bool,
    show_question: bool,
    created_by: &'a str,
}

/// Questions of a playlist item in display order.
pub async fn fetch_item_questions(
    ctx: &AdminContext,
    item_id: &str,
) -> Result<Vec<ItemQuestion>, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::ItemQuestions(item_id.to_string()), || async {
            debug!(item_id, "Fetching item questions");
            let query = Query::new().eq("item_id", item_id).order("order_index", true);
            Ok::<_, AdminError>(select_rows(ctx.store(), &query).await?)
        })
        .await
}

pub async fn fetch_item_question(ctx: &AdminContext, id: &str) -> Result<ItemQuestion, AdminError> {
    select_maybe_single(ctx.store(), &Query::by_id(id))
        .await?
        .ok_or_else(|| AdminError::not_found(Table::ItemQuestions, id))
}

/// Create a question. Language falls back to the configured default,
/// subtitles to off and question visibility to on.
pub async fn create_item_question(
    ctx: &AdminContext,
    question: NewItemQuestion,
) -> Result<ItemQuestion, AdminError> {
    let author = ctx.require_author()?;
    let text = non_empty(&question.question_text)
        .ok_or_else(|| AdminError::validation("Question text is required"))?;

    let row = QuestionRow {
        item_id: &question.item_id,
        question_text: text,
        question_type: question.question_type,
        display_timestamp: question.display_timestamp,
        order_index: question.order_index,
        language: question
            .language
            .as_deref()
            .and_then(non_empty)
            .unwrap_or(ctx.defaults().language.as_str()),
        show_subtitles: question.show_subtitles.unwrap_or(false),
        show_question: question.show_question.unwrap_or(true),
        created_by: &author,
    };
    let created: ItemQuestion = insert_row(ctx.store(), &row).await?;

    ctx.cache()
        .invalidate(&QueryKey::ItemQuestions(created.item_id.clone()))
        .await;
    info!(
        question_id = %created.id,
        item_id = %created.item_id,
        question_type = %created.question_type,
        "Created item question"
    );
    Ok(created)
}

pub async fn update_item_question(
    ctx: &AdminContext,
    id: &str,
    patch: &ItemQuestionPatch,
) -> Result<ItemQuestion, AdminError> {
    if patch
        .question_text
        .as_deref()
        .is_some_and(|text| non_empty(text).is_none())
    {
        return Err(AdminError::validation("Question text cannot be empty"));
    }
    let updated: ItemQuestion = update_row(ctx.store(), id, patch).await?;

    ctx.cache()
        .invalidate_all(&[
            QueryKey::ItemQuestions(updated.item_id.clone()),
            QueryKey::QuestionDetails(updated.id.clone()),
        ])
        .await;
    info!(question_id = %id, "Updated item question");
    Ok(updated)
}

/// Delete a question with its cycles and answers.
pub async fn delete_item_question(ctx: &AdminContext, id: &str) -> Result<(), AdminError> {
    let existing: Option<ItemQuestion> = select_maybe_single(ctx.store(), &Query::by_id(id)).await?;
    let Some(question) = existing else {
        debug!(question_id = %id, "Item question already absent");
        return Ok(());
    };

    delete_where::<ItemQuestion>(ctx.store(), &Query::by_id(id)).await?;

    let cache = ctx.cache();
    cache
        .invalidate_all(&[
            QueryKey::ItemQuestions(question.item_id.clone()),
            QueryKey::QuestionCycles(question.id.clone()),
            QueryKey::QuestionDetails(question.id.clone()),
        ])
        .await;
    cache.invalidate_scope(QueryScope::CycleAnswers).await;
    info!(question_id = %id, item_id = %question.item_id, "Deleted item question");
    Ok(())
}
