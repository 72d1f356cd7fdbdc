use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};

use gateway::{InMemoryGateway, MemorySessionStore};
use quiz_core::model::OpenCountPolicy;
use quiz_core::time::fixed_clock;
use services::{AttemptService, AuthoringService, ResultsService};

use crate::context::{UiApp, build_app_context};
use crate::views::take::TakeTestHandles;
use crate::views::{ComposeView, HomeView, ResultsView, TakeView};

#[derive(Clone)]
struct TestApp {
    attempts: Arc<AttemptService>,
    authoring: Arc<AuthoringService>,
    results: Arc<ResultsService>,
}

impl UiApp for TestApp {
    fn attempts(&self) -> Arc<AttemptService> {
        Arc::clone(&self.attempts)
    }

    fn authoring(&self) -> Arc<AuthoringService> {
        Arc::clone(&self.authoring)
    }

    fn results(&self) -> Arc<ResultsService> {
        Arc::clone(&self.results)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Home,
    Take(u64),
    Compose,
    Results(u64),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    take_handles: Option<TakeTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view);
    if let Some(handles) = props.take_handles.clone() {
        use_context_provider(|| handles);
    }
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
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Home => rsx! { HomeView {} },
        ViewKind::Take(test_id) => rsx! { TakeView { test_id } },
        ViewKind::Compose => rsx! { ComposeView {} },
        ViewKind::Results(test_id) => rsx! { ResultsView { test_id } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub gateway: Arc<InMemoryGateway>,
    pub sessions: Arc<MemorySessionStore>,
    pub take_handles: Option<TakeTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    pub fn drive(&mut self) {
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind) -> ViewHarness {
    setup_view_harness_with_policy(view, OpenCountPolicy::IncludeOpen)
}

pub fn setup_view_harness_with_policy(view: ViewKind, policy: OpenCountPolicy) -> ViewHarness {
    let gateway = Arc::new(InMemoryGateway::new());
    let sessions = Arc::new(MemorySessionStore::new());

    let attempts = Arc::new(
        AttemptService::new(
            fixed_clock(),
            Arc::clone(&gateway) as _,
            Arc::clone(&sessions) as _,
        )
        .with_policy(policy),
    );
    let authoring = Arc::new(AuthoringService::new(Arc::clone(&gateway) as _));
    let results = Arc::new(ResultsService::new(Arc::clone(&gateway) as _));

    let take_handles = match view {
        ViewKind::Take(_) => Some(TakeTestHandles::default()),
        _ => None,
    };

    let app = Arc::new(TestApp {
        attempts,
        authoring,
        results,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            take_handles: take_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        gateway,
        sessions,
        take_handles,
    }
}
