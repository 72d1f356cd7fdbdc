use std::sync::Arc;

use dioxus::prelude::*;

use quiz_core::model::TestDraft;
use services::AuthoringService;

use crate::views::ViewError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PublishState {
    Idle,
    Publishing,
    Success,
    Error(ViewError),
}

#[derive(Clone)]
pub struct ComposeServices {
    pub authoring: Arc<AuthoringService>,
}

/// Signals of the authoring form. The draft itself is the single source of
/// truth; everything else is presentation state around it.
#[derive(Clone)]
pub struct ComposeState {
    pub draft: Signal<TestDraft>,
    /// Blocking alert raised by the answer-row bounds.
    pub alert: Signal<Option<String>>,
    /// Inline message from the pre-publish validation pass.
    pub validation_error: Signal<Option<String>>,
    pub publish_state: Signal<PublishState>,
}

#[must_use]
pub fn use_compose_state() -> ComposeState {
    let draft = use_signal(|| {
        let mut draft = TestDraft::new();
        // The form opens with one question block already in place.
        draft.add_question();
        draft
    });
    let alert = use_signal(|| None::<String>);
    let validation_error = use_signal(|| None::<String>);
    let publish_state = use_signal(|| PublishState::Idle);

    ComposeState {
        draft,
        alert,
        validation_error,
        publish_state,
    }
}
