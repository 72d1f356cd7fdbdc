use dioxus::prelude::*;

/// Seconds a dismissable error banner stays up before hiding itself.
pub const ERROR_BANNER_SECS: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    TestUnavailable,
    SubmitFailed,
    ResultsUnavailable,
    PublishFailed,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::TestUnavailable => {
                "Не удалось загрузить тест. Попробуйте обновить страницу."
            }
            ViewError::SubmitFailed => {
                "Не удалось отправить результаты. Проверьте подключение и попробуйте снова."
            }
            ViewError::ResultsUnavailable => "Не удалось загрузить результаты теста",
            ViewError::PublishFailed => "Не удалось сохранить тест. Попробуйте снова.",
            ViewError::Unknown => "Что-то пошло не так. Попробуйте снова.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
