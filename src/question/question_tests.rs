use super::*;
use crate::cache::QueryKey;
use crate::error::AdminError;
use crate::store::{DataStore, Query, Table};
use crate::test_support::{item, playlist, signed_in, signed_out, TestEnv, TEST_USER};

async fn item_id(env: &TestEnv) -> String {
    let playlist_id = playlist(env).await;
    item(env, &playlist_id, "Video").await.id
}

fn new_question(item_id: &str, text: &str) -> NewItemQuestion {
    NewItemQuestion {
        item_id: item_id.to_string(),
        question_text: text.to_string(),
        display_timestamp: 12,
        ..Default::default()
    }
}

fn new_cycle(question_id: &str, order_index: i32) -> NewQuestionCycle {
    NewQuestionCycle {
        item_question_id: question_id.to_string(),
        delay_seconds: 0,
        duration_seconds: 30,
        order_index,
        is_active: true,
    }
}

fn new_answer(cycle_id: &str, text: &str, order_index: i32) -> NewCycleAnswer {
    NewCycleAnswer {
        question_cycle_id: cycle_id.to_string(),
        answer_text: text.to_string(),
        is_correct: order_index == 0,
        ondas_reward: 10,
        order_index,
    }
}

#[test]
fn test_question_type_wire_names() {
    assert_eq!(serde_json::to_value(QuestionType::Ab).unwrap(), "a_b");
    assert_eq!(
        serde_json::to_value(QuestionType::MultipleChoice).unwrap(),
        "multiple_choice"
    );
    assert_eq!("a-b".parse::<QuestionType>().unwrap(), QuestionType::Ab);
    assert_eq!("TRUE_FALSE".parse::<QuestionType>().unwrap(), QuestionType::TrueFalse);
    assert!("essay".parse::<QuestionType>().is_err());
}

#[tokio::test]
async fn test_create_question_applies_defaults() {
    let env = signed_in();
    let item_id = item_id(&env).await;

    let question = create_item_question(&env.ctx, new_question(&item_id, " ¿Qué viste? "))
        .await
        .unwrap();

    assert_eq!(question.question_text, "¿Qué viste?");
    assert_eq!(question.language, "es");
    assert!(!question.show_subtitles);
    assert!(question.show_question);
    assert_eq!(question.display_timestamp, 12);
    assert_eq!(question.created_by.as_deref(), Some(TEST_USER));
}

#[tokio::test]
async fn test_create_question_requires_session() {
    let env = signed_out();
    let err = create_item_question(&env.ctx, new_question("item", "Texto"))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::AuthRequired));
}

#[tokio::test]
async fn test_update_question_refreshes_listing() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = create_item_question(&env.ctx, new_question(&item_id, "Antes"))
        .await
        .unwrap();
    assert_eq!(fetch_item_questions(&env.ctx, &item_id).await.unwrap().len(), 1);

    let patch = ItemQuestionPatch {
        question_text: Some("Después".into()),
        question_type: Some(QuestionType::TrueFalse),
        ..Default::default()
    };
    update_item_question(&env.ctx, &question.id, &patch).await.unwrap();

    let listed = fetch_item_questions(&env.ctx, &item_id).await.unwrap();
    let first = listed.first().unwrap();
    assert_eq!(first.question_text, "Después");
    assert_eq!(first.question_type, QuestionType::TrueFalse);

    let blank = ItemQuestionPatch {
        question_text: Some("  ".into()),
        ..Default::default()
    };
    assert!(matches!(
        update_item_question(&env.ctx, &question.id, &blank).await,
        Err(AdminError::Validation(_))
    ));
}

#[tokio::test]
async fn test_cycle_and_answer_crud_invalidate_their_lists() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = create_item_question(&env.ctx, new_question(&item_id, "Pregunta"))
        .await
        .unwrap();

    let cycle = create_question_cycle(&env.ctx, &new_cycle(&question.id, 0))
        .await
        .unwrap();
    assert_eq!(cycle.created_by.as_deref(), Some(TEST_USER));
    assert_eq!(fetch_question_cycles(&env.ctx, &question.id).await.unwrap().len(), 1);

    let patch = QuestionCyclePatch {
        duration_seconds: Some(45),
        ..Default::default()
    };
    update_question_cycle(&env.ctx, &cycle.id, &patch).await.unwrap();
    let cycles = fetch_question_cycles(&env.ctx, &question.id).await.unwrap();
    assert_eq!(cycles.first().map(|c| c.duration_seconds), Some(45));

    let answer = create_cycle_answer(&env.ctx, &new_answer(&cycle.id, "Sí", 0))
        .await
        .unwrap();
    assert_eq!(fetch_cycle_answers(&env.ctx, &cycle.id).await.unwrap().len(), 1);

    let patch = CycleAnswerPatch {
        answer_text: Some("No".into()),
        ..Default::default()
    };
    update_cycle_answer(&env.ctx, &answer.id, &patch).await.unwrap();
    let answers = fetch_cycle_answers(&env.ctx, &cycle.id).await.unwrap();
    assert_eq!(answers.first().map(|a| a.answer_text.as_str()), Some("No"));

    delete_cycle_answer(&env.ctx, &answer.id).await.unwrap();
    assert!(fetch_cycle_answers(&env.ctx, &cycle.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_answers_need_existing_cycle() {
    let env = signed_in();
    let err = create_cycle_answer(&env.ctx, &new_answer("missing", "A", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Store(_)));
}

#[tokio::test]
async fn test_question_details_nest_answers() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = create_item_question(&env.ctx, new_question(&item_id, "Detalle"))
        .await
        .unwrap();
    let first = create_question_cycle(&env.ctx, &new_cycle(&question.id, 0)).await.unwrap();
    let second = create_question_cycle(&env.ctx, &new_cycle(&question.id, 1)).await.unwrap();
    create_cycle_answer(&env.ctx, &new_answer(&first.id, "A", 0)).await.unwrap();
    create_cycle_answer(&env.ctx, &new_answer(&first.id, "B", 1)).await.unwrap();
    create_cycle_answer(&env.ctx, &new_answer(&second.id, "C", 0)).await.unwrap();

    let details = fetch_question_with_details(&env.ctx, &question.id).await.unwrap();

    assert_eq!(details.question.id, question.id);
    let shape: Vec<(String, usize)> = details
        .cycles
        .iter()
        .map(|c| (c.cycle.id.clone(), c.answers.len()))
        .collect();
    assert_eq!(shape, vec![(first.id.clone(), 2), (second.id.clone(), 1)]);
    assert!(env
        .ctx
        .cache()
        .contains(&QueryKey::QuestionDetails(question.id.clone()))
        .await);

    create_cycle_answer(&env.ctx, &new_answer(&second.id, "D", 1)).await.unwrap();
    assert!(!env
        .ctx
        .cache()
        .contains(&QueryKey::QuestionDetails(question.id.clone()))
        .await);
}

#[tokio::test]
async fn test_delete_question_cascades() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = create_item_question(&env.ctx, new_question(&item_id, "Borrar"))
        .await
        .unwrap();
    let cycle = create_question_cycle(&env.ctx, &new_cycle(&question.id, 0)).await.unwrap();
    create_cycle_answer(&env.ctx, &new_answer(&cycle.id, "A", 0)).await.unwrap();

    delete_item_question(&env.ctx, &question.id).await.unwrap();
    delete_item_question(&env.ctx, &question.id).await.unwrap();

    assert!(fetch_item_questions(&env.ctx, &item_id).await.unwrap().is_empty());
    let answers = env
        .store
        .select(Table::CycleAnswers, &Query::new())
        .await
        .unwrap();
    assert!(answers.is_empty());
}

#[tokio::test]
async fn test_delete_cycle_removes_answers() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = create_item_question(&env.ctx, new_question(&item_id, "Ciclo"))
        .await
        .unwrap();
    let cycle = create_question_cycle(&env.ctx, &new_cycle(&question.id, 0)).await.unwrap();
    create_cycle_answer(&env.ctx, &new_answer(&cycle.id, "A", 0)).await.unwrap();
    fetch_cycle_answers(&env.ctx, &cycle.id).await.unwrap();

    delete_question_cycle(&env.ctx, &cycle.id).await.unwrap();

    assert!(fetch_question_cycles(&env.ctx, &question.id).await.unwrap().is_empty());
    assert!(fetch_cycle_answers(&env.ctx, &cycle.id).await.unwrap().is_empty());
}
