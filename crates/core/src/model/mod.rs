mod attempt;
mod draft;
mod ids;
mod report;
mod results;
mod test;

pub use ids::{AnswerId, ParseIdError, QuestionId, TestId};

pub use attempt::{AnswerValue, AttemptState, OpenCountPolicy, progress_percent};
pub use draft::{
    DraftError, QuestionDraft, TestDraft, INITIAL_ANSWER_ROWS, MAX_ANSWER_ROWS, MIN_ANSWER_ROWS,
};
pub use report::{AttemptReport, QuestionReview, DEFAULT_PASS_THRESHOLD};
pub use results::{filter_results, StatusFilter, StudentResult, TestResults};
pub use test::{AnswerOption, Question, QuestionKind, Test};
