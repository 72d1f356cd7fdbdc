use gateway::AttemptSessionStore;
use quiz_core::model::{
    AnswerId, AnswerOption, AnswerValue, AttemptReport, OpenCountPolicy, Question, QuestionId,
    QuestionKind, QuestionReview, StudentResult, Test, TestId, TestResults,
};
use quiz_core::time::fixed_now;

use super::take::TakeIntent;
use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_policy};

fn sample_test() -> Test {
    Test {
        id: TestId::new(1),
        title: "География".to_string(),
        description: Some("Столицы и реки".to_string()),
        questions: vec![
            Question {
                id: QuestionId::new(10),
                text: "Выберите столицу Франции".to_string(),
                image: None,
                kind: QuestionKind::Choice,
                answers: vec![
                    AnswerOption {
                        id: AnswerId::new(1),
                        text: "Лион".to_string(),
                    },
                    AnswerOption {
                        id: AnswerId::new(2),
                        text: "Париж".to_string(),
                    },
                ],
            },
            Question {
                id: QuestionId::new(11),
                text: "Назовите реку Парижа".to_string(),
                image: None,
                kind: QuestionKind::Open,
                answers: Vec::new(),
            },
            Question {
                id: QuestionId::new(12),
                text: "Столица Франции, словом".to_string(),
                image: None,
                kind: QuestionKind::Open,
                answers: Vec::new(),
            },
        ],
    }
}

fn sample_report() -> AttemptReport {
    AttemptReport {
        correct: 2,
        total: 3,
        pass_threshold: None,
        time_spent: Some(95),
        level_title: None,
        level_description: None,
        level_recommendations: None,
        details: vec![
            QuestionReview {
                question_text: "Выберите столицу Франции".to_string(),
                user_answer: Some("Париж".to_string()),
                is_correct: true,
                correct_answer: Some("Париж".to_string()),
                is_open: false,
            },
            QuestionReview {
                question_text: "Назовите реку Парижа".to_string(),
                user_answer: None,
                is_correct: false,
                correct_answer: Some("Сена".to_string()),
                is_open: true,
            },
        ],
    }
}

fn sample_results() -> TestResults {
    TestResults {
        test_title: "География".to_string(),
        group_name: "Г-101".to_string(),
        questions_count: 12,
        created_at: "01.03.2025".to_string(),
        total_completed: 2,
        test_description: None,
        results: vec![
            StudentResult {
                student_name: "Анна Петрова".to_string(),
                student_username: "apetrova".to_string(),
                student_group: "Г-101".to_string(),
                score: 10,
                total: 12,
                percentage: 83,
                passed: true,
                time_formatted: "04:20".to_string(),
                completed_at: "02.03.2025 10:00".to_string(),
            },
            StudentResult {
                student_name: "Борис Иванов".to_string(),
                student_username: "bivanov".to_string(),
                student_group: "Г-101".to_string(),
                score: 5,
                total: 12,
                percentage: 42,
                passed: false,
                time_formatted: "07:02".to_string(),
                completed_at: "02.03.2025 10:40".to_string(),
            },
        ],
    }
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_renders_exactly_one_input_form_per_kind() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.rebuild();
    harness.drive_async().await;

    // Choice question: a radio group, no free-text input.
    let html = harness.render();
    assert!(html.contains("Вопрос 1 из 3"), "missing badge in {html}");
    assert!(html.contains("type=\"radio\""), "missing radios in {html}");
    assert!(!html.contains("<textarea"), "unexpected textarea in {html}");
    assert!(html.contains("Лион") && html.contains("Париж"));

    // Open question: a free-text input, no radio group.
    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::JumpTo(1));
    harness.drive();
    let html = harness.render();
    assert!(html.contains("<textarea"), "missing textarea in {html}");
    assert!(!html.contains("type=\"radio\""), "unexpected radios in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_nav_buttons_follow_position() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Далее"), "missing next in {html}");
    assert!(html.contains("Пропустить"), "missing skip in {html}");
    assert!(!html.contains("Завершить тест"), "finish shown early in {html}");

    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::JumpTo(2));
    harness.drive();
    let html = harness.render();
    assert!(!html.contains("Далее"), "next shown on last in {html}");
    assert!(!html.contains("Пропустить"), "skip shown on last in {html}");
    assert!(html.contains("Завершить тест"), "missing finish in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_tracks_progress_and_unanswered_count() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.rebuild();
    harness.drive_async().await;
    assert!(harness.render().contains("0/3"));

    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::SaveAnswer(
        QuestionId::new(10),
        AnswerValue::Choice(AnswerId::new(2)),
    ));
    handles.dispatch().call(TakeIntent::SaveAnswer(
        QuestionId::new(12),
        AnswerValue::Open("париж".to_string()),
    ));
    harness.drive();

    let html = harness.render();
    assert!(html.contains("2/3"), "missing progress in {html}");
    assert!(html.contains("width: 67%"), "missing bar width in {html}");

    // One open question is still blank: the strict policy reports it.
    handles.dispatch().call(TakeIntent::RequestFinish);
    harness.drive();
    let html = harness.render();
    assert!(
        html.contains("осталось 1 неотвеченных вопрос"),
        "missing confirm count in {html}"
    );

    // The stored session can rebuild the same attempt state.
    let snapshot = harness
        .sessions
        .load(fixed_now())
        .unwrap()
        .expect("stored session");
    let vm = handles.vm();
    let state = vm.read();
    let attempt = state.as_ref().expect("attempt present");
    assert_eq!(snapshot.into_state(fixed_now()), *attempt.state());
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_excludes_open_questions_when_configured() {
    let mut harness =
        setup_view_harness_with_policy(ViewKind::Take(1), OpenCountPolicy::ExcludeOpen);
    harness.gateway.put_test(sample_test());
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::SaveAnswer(
        QuestionId::new(10),
        AnswerValue::Choice(AnswerId::new(2)),
    ));
    handles.dispatch().call(TakeIntent::SaveAnswer(
        QuestionId::new(12),
        AnswerValue::Open("париж".to_string()),
    ));
    handles.dispatch().call(TakeIntent::RequestFinish);
    harness.drive();

    let html = harness.render();
    assert!(
        html.contains("Вы ответили на все вопросы"),
        "open question still counted in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_submit_renders_the_result_pane() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.gateway.put_report(sample_report());
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::ConfirmFinish);
    harness.drive();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("67%"), "missing score in {html}");
    assert!(html.contains("2 из 3 правильных"), "missing summary in {html}");
    assert!(html.contains("01:35"), "missing time in {html}");
    assert!(html.contains("Пропущено"), "missing skipped mark in {html}");
    assert!(html.contains("Сена"), "missing expected answer in {html}");
    assert!(html.contains("Вернуться к списку"));
    // Submission clears the stored session.
    assert!(harness.sessions.load(fixed_now()).unwrap().is_none());
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_failed_submit_keeps_the_attempt() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.gateway.fail_submit(true);
    harness.rebuild();
    harness.drive_async().await;

    let handles = harness.take_handles.clone().expect("take handles");
    handles.dispatch().call(TakeIntent::ConfirmFinish);
    harness.drive();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Не удалось отправить результаты"),
        "missing banner in {html}"
    );
    // Still on the question, not on a result pane.
    assert!(html.contains("Вопрос 1 из 3"), "question gone in {html}");
    assert!(handles.report().read().is_none());
    assert!(handles.vm().read().is_some());
    assert!(harness.sessions.load(fixed_now()).unwrap().is_some());
}

#[tokio::test(flavor = "current_thread")]
async fn take_view_fetch_failure_offers_retry() {
    let mut harness = setup_view_harness(ViewKind::Take(1));
    harness.gateway.put_test(sample_test());
    harness.gateway.fail_fetch(true);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Не удалось загрузить тест"),
        "missing error in {html}"
    );
    assert!(html.contains("Повторить"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_renders_header_and_rows() {
    let mut harness = setup_view_harness(ViewKind::Results(1));
    harness.gateway.put_results(sample_results());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("География"), "missing title in {html}");
    assert!(html.contains("12 вопросов"), "missing plural count in {html}");
    assert!(html.contains("Анна Петрова"), "missing row in {html}");
    assert!(html.contains("@bivanov"), "missing username in {html}");
    assert!(html.contains("83%") && html.contains("42%"));
    assert!(html.contains("04:20"), "missing time in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_reports_empty_tables() {
    let mut harness = setup_view_harness(ViewKind::Results(1));
    let mut results = sample_results();
    results.results.clear();
    results.total_completed = 0;
    harness.gateway.put_results(results);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Пока нет результатов"), "missing empty note in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn results_view_surfaces_fetch_errors() {
    let mut harness = setup_view_harness(ViewKind::Results(1));
    harness.gateway.fail_results(true);
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("Не удалось загрузить результаты теста"),
        "missing error in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_announces_a_resumable_session() {
    let harness = setup_view_harness(ViewKind::Home);
    // Write the snapshot before mounting: Home reads it once at startup.
    let mut state = quiz_core::model::AttemptState::new(TestId::new(5), fixed_now());
    state.record_answer(QuestionId::new(1), AnswerValue::Open("x".to_string()));
    harness
        .sessions
        .save(&gateway::SessionSnapshot::from_state(&state))
        .unwrap();

    let mut harness = harness;
    harness.rebuild();
    let html = harness.render();
    assert!(
        html.contains("Найдена незавершённая попытка теста 5"),
        "missing notice in {html}"
    );
    assert!(html.contains("Начать тест"));
}

#[tokio::test(flavor = "current_thread")]
async fn home_view_without_session_has_no_notice() {
    let mut harness = setup_view_harness(ViewKind::Home);
    harness.rebuild();
    let html = harness.render();
    assert!(!html.contains("незавершённая попытка"), "stray notice in {html}");
}
