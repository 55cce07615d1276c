use super::answer::fetch_cycle_answers;
use super::crud::fetch_item_question;
use super::cycle::load_question_cycles;
use super::types::{CycleWithAnswers, QuestionDetails};
use crate::cache::QueryKey;
use crate::context::AdminContext;
use crate::error::AdminError;
use futures::future::try_join_all;
use tracing::debug;

/// A question with its cycles and each cycle's answers. Answers of all
/// cycles are fetched concurrently.
pub async fn fetch_question_with_details(
    ctx: &AdminContext,
    question_id: &str,
) -> Result<QuestionDetails, AdminError> {
    ctx.cache()
        .get_or_fetch(QueryKey::QuestionDetails(question_id.to_string()), || async {
            debug!(question_id, "Fetching question details");
            let question = fetch_item_question(ctx, question_id).await?;
            let cycles = load_question_cycles(ctx, question_id).await?;

            let cycles = try_join_all(cycles.into_iter().map(|cycle| async move {
                let answers = fetch_cycle_answers(ctx, &cycle.id).await?;
                Ok::<_, AdminError>(CycleWithAnswers { cycle, answers })
            }))
            .await?;

            Ok::<_, AdminError>(QuestionDetails { question, cycles })
        })
        .await
}
