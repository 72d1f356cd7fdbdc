mod nav;
mod report_vm;
mod results_vm;
mod time_fmt;

pub use nav::NavControls;
pub use report_vm::{ReportVm, ReviewVm};
pub use results_vm::{ResultsHeaderVm, status_filter_from_value};
pub use time_fmt::format_elapsed;
