use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use gateway::InMemoryGateway;
use quiz_core::model::{MAX_ANSWER_ROWS, MIN_ANSWER_ROWS, QuestionKind};
use services::AuthoringService;

use super::actions::{ComposeIntent, use_compose_dispatcher};
use super::state::{ComposeServices, ComposeState, PublishState, use_compose_state};

#[derive(Clone, Default)]
struct HarnessHandles {
    dispatch: Rc<RefCell<Option<Callback<ComposeIntent>>>>,
    state: Rc<RefCell<Option<ComposeState>>>,
}

impl HarnessHandles {
    fn dispatch(&self) -> Callback<ComposeIntent> {
        self.dispatch.borrow().clone().expect("dispatch registered")
    }

    fn state(&self) -> ComposeState {
        self.state.borrow().clone().expect("state registered")
    }
}

#[derive(Props, Clone)]
struct HarnessProps {
    services: ComposeServices,
    handles: HarnessHandles,
}

impl PartialEq for HarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for HarnessProps {}

#[component]
fn ComposeIntentHarness(props: HarnessProps) -> Element {
    let state = use_compose_state();
    let dispatcher = use_compose_dispatcher(&state, &props.services);
    let mut registered = use_signal(|| false);
    if !registered() {
        registered.set(true);
        *props.handles.dispatch.borrow_mut() = Some(dispatcher.dispatch);
        *props.handles.state.borrow_mut() = Some(state.clone());
    }
    rsx! { div {} }
}

#[component]
fn ComposeRouterHarness(props: HarnessProps) -> Element {
    use_context_provider(|| props);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let props = use_context::<HarnessProps>();
    rsx! {
        ComposeIntentHarness { services: props.services.clone(), handles: props.handles.clone() }
    }
}

fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

async fn drive_async(dom: &mut VirtualDom) {
    let _ = tokio::time::timeout(std::time::Duration::from_millis(50), dom.wait_for_work()).await;
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

fn setup(gateway: &Arc<InMemoryGateway>) -> (VirtualDom, HarnessHandles) {
    let services = ComposeServices {
        authoring: Arc::new(AuthoringService::new(Arc::clone(gateway) as _)),
    };
    let handles = HarnessHandles::default();
    let mut dom = VirtualDom::new_with_props(
        ComposeRouterHarness,
        HarnessProps {
            services,
            handles: handles.clone(),
        },
    );
    dom.rebuild_in_place();
    drive_dom(&mut dom);
    (dom, handles)
}

fn fill_choice_question(handles: &HarnessHandles, dom: &mut VirtualDom, index: usize) {
    let dispatch = handles.dispatch();
    dispatch.call(ComposeIntent::SetQuestionText(
        index,
        format!("Вопрос номер {}", index + 1),
    ));
    for row in 0..4 {
        dispatch.call(ComposeIntent::SetAnswerText {
            question: index,
            row,
            text: format!("вариант {}", row + 1),
        });
    }
    dispatch.call(ComposeIntent::SetCorrect(index, Some(2)));
    drive_dom(dom);
}

#[tokio::test(flavor = "current_thread")]
async fn compose_opens_with_one_question_of_four_rows() {
    let gateway = Arc::new(InMemoryGateway::new());
    let (_dom, handles) = setup(&gateway);
    let state = handles.state();

    let draft = state.draft.read().clone();
    assert_eq!(draft.questions.len(), 1);
    assert_eq!(draft.questions[0].answers.len(), 4);
    assert_eq!(draft.questions[0].number, 1);
}

#[tokio::test(flavor = "current_thread")]
async fn answer_row_bounds_raise_the_blocking_alert() {
    let gateway = Arc::new(InMemoryGateway::new());
    let (mut dom, handles) = setup(&gateway);
    let dispatch = handles.dispatch();
    let state = handles.state();

    dispatch.call(ComposeIntent::AddAnswer(0));
    drive_dom(&mut dom);
    assert_eq!(state.draft.read().questions[0].answers.len(), MAX_ANSWER_ROWS);
    assert!(state.alert.read().is_none());

    dispatch.call(ComposeIntent::AddAnswer(0));
    drive_dom(&mut dom);
    assert_eq!(state.draft.read().questions[0].answers.len(), MAX_ANSWER_ROWS);
    assert_eq!(
        state.alert.read().as_deref(),
        Some("Максимум 5 вариантов ответа!")
    );

    dispatch.call(ComposeIntent::DismissAlert);
    for row in (MIN_ANSWER_ROWS..MAX_ANSWER_ROWS).rev() {
        dispatch.call(ComposeIntent::RemoveAnswer { question: 0, row });
    }
    drive_dom(&mut dom);
    assert_eq!(state.draft.read().questions[0].answers.len(), MIN_ANSWER_ROWS);

    dispatch.call(ComposeIntent::RemoveAnswer { question: 0, row: 0 });
    drive_dom(&mut dom);
    assert_eq!(state.draft.read().questions[0].answers.len(), MIN_ANSWER_ROWS);
    assert_eq!(
        state.alert.read().as_deref(),
        Some("Минимум 2 варианта ответа!")
    );
}

#[tokio::test(flavor = "current_thread")]
async fn removing_a_question_keeps_field_numbers() {
    let gateway = Arc::new(InMemoryGateway::new());
    let (mut dom, handles) = setup(&gateway);
    let dispatch = handles.dispatch();
    let state = handles.state();

    dispatch.call(ComposeIntent::AddQuestion);
    dispatch.call(ComposeIntent::AddQuestion);
    dispatch.call(ComposeIntent::RemoveQuestion(1));
    drive_dom(&mut dom);

    let draft = state.draft.read().clone();
    assert_eq!(
        draft.questions.iter().map(|q| q.number).collect::<Vec<_>>(),
        vec![1, 3]
    );
    assert!(draft.deleted_numbers().contains(&2));
}

#[tokio::test(flavor = "current_thread")]
async fn switching_to_open_drops_answer_fields_from_the_payload() {
    let gateway = Arc::new(InMemoryGateway::new());
    let (mut dom, handles) = setup(&gateway);
    let dispatch = handles.dispatch();
    let state = handles.state();

    dispatch.call(ComposeIntent::SetTitle("Опрос".to_string()));
    fill_choice_question(&handles, &mut dom, 0);
    dispatch.call(ComposeIntent::SetKind(0, QuestionKind::Open));
    dispatch.call(ComposeIntent::SetCorrectText(0, "Сена".to_string()));
    drive_dom(&mut dom);

    dispatch.call(ComposeIntent::Publish);
    drive_dom(&mut dom);
    drive_async(&mut dom).await;

    assert_eq!(*state.publish_state.read(), PublishState::Success);
    let created = gateway.created();
    assert_eq!(created.len(), 1);
    let names: Vec<&str> = created[0].iter().map(|(name, _)| name.as_str()).collect();
    assert!(names.contains(&"question_1_correct_text"));
    assert!(!names.iter().any(|name| name.starts_with("question_1_answer_")));
    assert!(!names.contains(&"question_1_correct"));
}

#[tokio::test(flavor = "current_thread")]
async fn publish_validates_before_posting() {
    let gateway = Arc::new(InMemoryGateway::new());
    let (mut dom, handles) = setup(&gateway);
    let dispatch = handles.dispatch();
    let state = handles.state();

    dispatch.call(ComposeIntent::Publish);
    drive_dom(&mut dom);

    assert_eq!(
        state.validation_error.read().as_deref(),
        Some("Укажите название теста.")
    );
    assert!(gateway.created().is_empty());

    dispatch.call(ComposeIntent::SetTitle("Опрос".to_string()));
    fill_choice_question(&handles, &mut dom, 0);
    dispatch.call(ComposeIntent::Publish);
    drive_dom(&mut dom);
    drive_async(&mut dom).await;

    assert_eq!(*state.publish_state.read(), PublishState::Success);
    assert!(state.validation_error.read().is_none());
    assert_eq!(gateway.created().len(), 1);
    // A successful publish resets the form to a single fresh question.
    let draft = state.draft.read().clone();
    assert_eq!(draft.questions.len(), 1);
    assert!(draft.title.is_empty());
}

#[tokio::test(flavor = "current_thread")]
async fn failed_publish_surfaces_an_error_state() {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway.fail_create(true);
    let (mut dom, handles) = setup(&gateway);
    let dispatch = handles.dispatch();
    let state = handles.state();

    dispatch.call(ComposeIntent::SetTitle("Опрос".to_string()));
    fill_choice_question(&handles, &mut dom, 0);
    dispatch.call(ComposeIntent::Publish);
    drive_dom(&mut dom);
    drive_async(&mut dom).await;

    assert!(matches!(
        *state.publish_state.read(),
        PublishState::Error(_)
    ));
    // The draft is kept so the author can retry.
    assert_eq!(state.draft.read().title, "Опрос");
}
