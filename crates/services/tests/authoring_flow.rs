use std::sync::Arc;

use gateway::InMemoryGateway;
use quiz_core::model::{DraftError, QuestionKind, TestDraft};
use services::{AuthoringError, AuthoringService};

fn complete_draft() -> TestDraft {
    let mut draft = TestDraft::new();
    draft.title = "Midterm".to_string();
    draft.description = "Units 1-3".to_string();

    let choice = draft.add_question();
    draft.questions[choice].text = "Pick the capital".to_string();
    for (row, text) in ["Lyon", "Paris", "Nice", "Lille"].iter().enumerate() {
        draft.questions[choice].answers[row] = (*text).to_string();
    }
    draft.set_correct(choice, Some(2)).unwrap();

    let open = draft.add_question();
    draft.questions[open].text = "Name the river of Paris".to_string();
    draft.set_kind(open, QuestionKind::Open).unwrap();
    draft.questions[open].correct_text = "Seine".to_string();

    draft
}

#[tokio::test]
async fn publish_posts_the_form_payload() {
    let gateway = Arc::new(InMemoryGateway::new());
    let service = AuthoringService::new(Arc::clone(&gateway) as _);

    service.publish(&complete_draft()).await.expect("publish");

    let created = gateway.created();
    assert_eq!(created.len(), 1);
    let names: Vec<&str> = created[0].iter().map(|(name, _)| name.as_str()).collect();
    assert!(names.contains(&"test_title"));
    assert!(names.contains(&"question_1_answer_4"));
    assert!(names.contains(&"question_1_correct"));
    assert!(names.contains(&"question_2_correct_text"));
    // The open question contributes no stale choice fields.
    assert!(!names.iter().any(|name| name.starts_with("question_2_answer_")));
    assert!(!names.contains(&"question_2_correct"));
}

#[tokio::test]
async fn publish_rejects_incomplete_drafts_without_posting() {
    let gateway = Arc::new(InMemoryGateway::new());
    let service = AuthoringService::new(Arc::clone(&gateway) as _);

    let mut draft = complete_draft();
    draft.questions[0].answers[3].clear();

    let err = service.publish(&draft).await.unwrap_err();
    assert!(matches!(
        err,
        AuthoringError::Draft(DraftError::EmptyAnswer { position: 1, row: 4 })
    ));
    assert!(gateway.created().is_empty());
}

#[tokio::test]
async fn publish_surfaces_server_rejection() {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway.fail_create(true);
    let service = AuthoringService::new(Arc::clone(&gateway) as _);

    let err = service.publish(&complete_draft()).await.unwrap_err();
    assert!(matches!(err, AuthoringError::Gateway(_)));
}
