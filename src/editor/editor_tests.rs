use super::*;
use crate::question::{
    create_item_question, fetch_cycle_answers, load_question_cycles, NewItemQuestion,
    NewQuestionCycle,
};
use crate::store::Table;
use crate::test_support::{item, playlist, signed_in, TestEnv};

async fn item_id(env: &TestEnv) -> String {
    let playlist_id = playlist(env).await;
    item(env, &playlist_id, "Video").await.id
}

fn ab_defaults() -> EditorDefaults {
    EditorDefaults {
        question_type: QuestionType::Ab,
        ..EditorDefaults::default()
    }
}

async fn saved_question(env: &TestEnv, item_id: &str) -> ItemQuestion {
    create_item_question(
        &env.ctx,
        NewItemQuestion {
            item_id: item_id.to_string(),
            question_text: "¿Cuál?".into(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_open_new_ab_question_builds_skeleton() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, ab_defaults())
        .await
        .unwrap();

    assert_eq!(editor.phase(), EditorPhase::Opened);
    let cycles: Vec<_> = editor.visible_cycles().collect();
    assert_eq!(cycles.len(), 1);
    let cycle = cycles.first().unwrap();
    assert!(cycle.node.is_new());
    assert_eq!(cycle.fields().duration_seconds, 30);
    assert_eq!(cycle.fields().delay_seconds, 0);
    assert_eq!(cycle.answers.len(), 2);
    assert_eq!(editor.ab_correct_index(), Some(0));
}

#[tokio::test]
async fn test_open_twice_is_rejected() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();

    let err = editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EditorError::InvalidPhase {
            phase: EditorPhase::Opened,
            ..
        }
    ));
}

#[test]
fn test_closed_editor_rejects_edits() {
    let mut editor = QuestionEditor::new();
    assert!(matches!(
        editor.set_question_text("Hola"),
        Err(EditorError::InvalidPhase { .. })
    ));
}

#[tokio::test]
async fn test_switching_to_ab_installs_skeleton_once() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();
    assert_eq!(editor.visible_cycles().count(), 0);

    editor.set_question_type(QuestionType::Ab).unwrap();
    editor.set_question_type(QuestionType::Ab).unwrap();

    assert_eq!(editor.phase(), EditorPhase::Editing);
    assert_eq!(editor.visible_cycles().count(), 1);
}

#[tokio::test]
async fn test_skeleton_goes_after_pending_deletes() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = saved_question(&env, &item_id).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, Some(question.clone()), EditorDefaults::default())
        .await
        .unwrap();
    editor.create_cycle(&env.ctx).await.unwrap();
    editor.close();

    editor
        .open(&env.ctx, &item_id, Some(question), EditorDefaults::default())
        .await
        .unwrap();
    let loaded = editor.visible_cycles().next().unwrap().key;
    editor.delete_cycle(loaded).unwrap();
    editor.set_question_type(QuestionType::Ab).unwrap();

    let skeleton = editor.visible_cycles().next().unwrap();
    assert!(skeleton.node.is_new());
    assert_eq!(skeleton.fields().order_index, 1);
    assert_eq!(skeleton.answers.len(), 2);
}

#[tokio::test]
async fn test_deleting_unsaved_cycle_leaves_no_trace() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();

    let key = editor.create_cycle(&env.ctx).await.unwrap();
    assert!(editor.cycle(key).unwrap().node.is_new());
    editor.delete_cycle(key).unwrap();

    assert!(editor.cycles().is_empty());
    assert_eq!(env.store.count(Table::QuestionCycles).await.unwrap(), 0);
    assert!(matches!(
        editor.delete_cycle(key),
        Err(EditorError::UnknownCycle(_))
    ));
}

#[tokio::test]
async fn test_cycle_on_saved_question_is_created_immediately() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = saved_question(&env, &item_id).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, Some(question.clone()), EditorDefaults::default())
        .await
        .unwrap();

    let first = editor.create_cycle(&env.ctx).await.unwrap();
    let second = editor.create_cycle(&env.ctx).await.unwrap();

    let stored = load_question_cycles(&env.ctx, &question.id).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(editor.cycle(first).unwrap().fields().order_index, 0);
    assert_eq!(editor.cycle(second).unwrap().fields().order_index, 1);
    assert_eq!(editor.cycle(second).unwrap().id(), stored.get(1).map(|c| c.id.as_str()));
}

#[tokio::test]
async fn test_cycle_creation_requires_session() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();
    env.sessions.sign_out();

    let err = editor.create_cycle(&env.ctx).await.unwrap_err();
    assert!(matches!(err, EditorError::Admin(AdminError::AuthRequired)));
    assert!(editor.cycles().is_empty());
}

#[tokio::test]
async fn test_answers_need_a_saved_cycle() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();
    let key = editor.create_cycle(&env.ctx).await.unwrap();

    let err = editor
        .add_answer(&env.ctx, key, "Sí", true, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::CycleNotPersisted(k) if k == key));
}

#[tokio::test]
async fn test_answers_persist_immediately() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = saved_question(&env, &item_id).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, Some(question), EditorDefaults::default())
        .await
        .unwrap();
    let key = editor.create_cycle(&env.ctx).await.unwrap();
    let cycle_id = editor.cycle(key).unwrap().id().unwrap().to_string();

    let first = editor.add_answer(&env.ctx, key, " Rojo ", true, 10).await.unwrap();
    let second = editor.add_answer(&env.ctx, key, "Azul", false, 0).await.unwrap();
    editor
        .update_answer(
            &env.ctx,
            key,
            &second,
            &CycleAnswerPatch {
                answer_text: Some("Verde".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    editor.delete_answer(&env.ctx, key, &first).await.unwrap();

    let stored = fetch_cycle_answers(&env.ctx, &cycle_id).await.unwrap();
    assert_eq!(stored.len(), 1);
    let remaining = stored.first().unwrap();
    assert_eq!(remaining.answer_text, "Verde");
    assert_eq!(remaining.order_index, 1);
    assert_eq!(editor.cycle(key).unwrap().answers.len(), 1);

    assert!(matches!(
        editor.delete_answer(&env.ctx, key, &first).await,
        Err(EditorError::UnknownAnswer(_))
    ));
}

#[tokio::test]
async fn test_ab_save_round_trip() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, None, ab_defaults())
        .await
        .unwrap();
    editor.set_question_text("¿Te gustó?").unwrap();
    editor.set_ab_answer_text(0, "Yes").unwrap();
    editor.set_ab_answer_text(1, "No").unwrap();
    editor.set_ab_correct(1).unwrap();
    assert_eq!(editor.ab_correct_index(), Some(1));

    let saved = editor.save(&env.ctx).await.unwrap();

    assert_eq!(editor.phase(), EditorPhase::Closed);
    assert!(editor.cycles().is_empty());
    let cycles = load_question_cycles(&env.ctx, &saved.id).await.unwrap();
    assert_eq!(cycles.len(), 1);
    let answers = fetch_cycle_answers(&env.ctx, &cycles.first().unwrap().id)
        .await
        .unwrap();
    let shape: Vec<_> = answers
        .iter()
        .map(|a| (a.answer_text.as_str(), a.is_correct, a.order_index))
        .collect();
    assert_eq!(shape, vec![("Yes", false, 0), ("No", true, 1)]);
}

#[tokio::test]
async fn test_ab_resave_updates_in_place() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, None, ab_defaults())
        .await
        .unwrap();
    editor.set_question_text("Primera").unwrap();
    editor.set_ab_answer_text(0, "A").unwrap();
    editor.set_ab_answer_text(1, "B").unwrap();
    let saved = editor.save(&env.ctx).await.unwrap();

    editor
        .open(&env.ctx, &item_id, Some(saved.clone()), ab_defaults())
        .await
        .unwrap();
    assert_eq!(editor.ab_correct_index(), Some(0));
    editor.set_ab_correct(1).unwrap();
    editor.save(&env.ctx).await.unwrap();

    assert_eq!(env.store.count(Table::QuestionCycles).await.unwrap(), 1);
    assert_eq!(env.store.count(Table::CycleAnswers).await.unwrap(), 2);
    let cycles = load_question_cycles(&env.ctx, &saved.id).await.unwrap();
    let answers = fetch_cycle_answers(&env.ctx, &cycles.first().unwrap().id)
        .await
        .unwrap();
    let correct: Vec<_> = answers.iter().map(|a| a.is_correct).collect();
    assert_eq!(correct, vec![false, true]);
}

#[tokio::test]
async fn test_multiple_choice_save_applies_deletes_and_creates() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = saved_question(&env, &item_id).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, Some(question.clone()), EditorDefaults::default())
        .await
        .unwrap();
    let doomed = editor.create_cycle(&env.ctx).await.unwrap();
    let doomed_id = editor.cycle(doomed).unwrap().id().unwrap().to_string();
    editor.close();

    editor
        .open(&env.ctx, &item_id, Some(question.clone()), EditorDefaults::default())
        .await
        .unwrap();
    let loaded = editor.visible_cycles().next().unwrap().key;
    editor.delete_cycle(loaded).unwrap();
    assert_eq!(editor.visible_cycles().count(), 0);
    assert_eq!(editor.cycles().len(), 1);

    // The question is saved, so this cycle is stored right away.
    let fresh = editor.create_cycle(&env.ctx).await.unwrap();
    editor
        .update_cycle(
            fresh,
            &QuestionCyclePatch {
                delay_seconds: Some(5),
                duration_seconds: Some(20),
                is_active: Some(false),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(editor.cycle(fresh).unwrap().dirty);

    editor.save(&env.ctx).await.unwrap();

    let stored = load_question_cycles(&env.ctx, &question.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    let remaining = stored.first().unwrap();
    assert_ne!(remaining.id, doomed_id);
    assert_eq!(
        (remaining.delay_seconds, remaining.duration_seconds, remaining.is_active),
        (5, 20, false)
    );
}

#[tokio::test]
async fn test_new_question_creates_staged_cycles_on_save() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, None, EditorDefaults::default())
        .await
        .unwrap();
    editor.set_question_text("Nueva").unwrap();
    editor.set_display_timestamp(42).unwrap();
    editor.create_cycle(&env.ctx).await.unwrap();
    editor.create_cycle(&env.ctx).await.unwrap();
    assert_eq!(env.store.count(Table::QuestionCycles).await.unwrap(), 0);

    let saved = editor.save(&env.ctx).await.unwrap();

    assert_eq!(saved.display_timestamp, 42);
    let stored = load_question_cycles(&env.ctx, &saved.id).await.unwrap();
    let order: Vec<_> = stored.iter().map(|c| c.order_index).collect();
    assert_eq!(order, vec![0, 1]);
}

#[tokio::test]
async fn test_save_validates_before_writing() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, None, ab_defaults())
        .await
        .unwrap();

    let err = editor.save(&env.ctx).await.unwrap_err();
    assert!(matches!(err, EditorError::Admin(AdminError::Validation(_))));
    assert_eq!(editor.phase(), EditorPhase::Editing);
    assert!(editor.last_error().is_some());

    editor.set_question_text("Texto").unwrap();
    let key = editor.visible_cycles().next().unwrap().key;
    editor.delete_cycle(key).unwrap();
    let err = editor.save(&env.ctx).await.unwrap_err();
    assert!(matches!(err, EditorError::Admin(AdminError::Validation(_))));
    assert_eq!(env.store.count(Table::ItemQuestions).await.unwrap(), 0);
}

#[tokio::test]
async fn test_save_requires_session_for_new_question() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, EditorDefaults::default())
        .await
        .unwrap();
    editor.set_question_text("Texto").unwrap();
    env.sessions.sign_out();

    let err = editor.save(&env.ctx).await.unwrap_err();
    assert!(matches!(err, EditorError::Admin(AdminError::AuthRequired)));
}

#[tokio::test]
async fn test_failed_save_keeps_partial_progress() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    // No such item: the question insert fails its foreign key check.
    editor
        .open(&env.ctx, "missing-item", None, EditorDefaults::default())
        .await
        .unwrap();
    editor.set_question_text("Huérfana").unwrap();
    editor.create_cycle(&env.ctx).await.unwrap();

    let err = editor.save(&env.ctx).await.unwrap_err();

    assert!(matches!(err, EditorError::Admin(AdminError::Store(_))));
    assert_eq!(editor.phase(), EditorPhase::Editing);
    assert!(editor.question().is_new());
    assert_eq!(editor.cycles().len(), 1);
    assert!(editor.last_error().is_some());
}

#[tokio::test]
async fn test_close_discards_edits() {
    let env = signed_in();
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, "item", None, ab_defaults())
        .await
        .unwrap();
    editor.set_question_text("Borrador").unwrap();

    editor.close();

    assert_eq!(editor.phase(), EditorPhase::Closed);
    assert!(editor.cycles().is_empty());
    assert_eq!(editor.question().fields().question_text, "");
    assert_eq!(editor.item_id(), "");
}

#[tokio::test]
async fn test_refresh_merges_remote_cycles() {
    let env = signed_in();
    let item_id = item_id(&env).await;
    let question = saved_question(&env, &item_id).await;
    let mut editor = QuestionEditor::new();
    editor
        .open(&env.ctx, &item_id, Some(question.clone()), EditorDefaults::default())
        .await
        .unwrap();
    let local = editor.create_cycle(&env.ctx).await.unwrap();
    editor
        .update_cycle(
            local,
            &QuestionCyclePatch {
                delay_seconds: Some(9),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(!editor.refresh_cycles(&env.ctx).await.unwrap());

    crate::question::create_question_cycle(
        &env.ctx,
        &NewQuestionCycle {
            item_question_id: question.id.clone(),
            delay_seconds: 1,
            duration_seconds: 15,
            order_index: 1,
            is_active: true,
        },
    )
    .await
    .unwrap();

    assert!(editor.refresh_cycles(&env.ctx).await.unwrap());
    let delays: Vec<_> = editor
        .visible_cycles()
        .map(|c| c.fields().delay_seconds)
        .collect();
    assert_eq!(delays, vec![9, 1]);
}
