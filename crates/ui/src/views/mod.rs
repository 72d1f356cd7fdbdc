mod compose;
mod home;
mod results;
mod state;
mod take;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use compose::ComposeView;
pub use home::HomeView;
pub use results::ResultsView;
pub use state::{ERROR_BANNER_SECS, ViewError, ViewState, view_state_from_resource};
pub use take::TakeView;
