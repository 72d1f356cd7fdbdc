/// Visibility of the taking-flow navigation buttons, as a pure function of
/// the position within the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub prev_disabled: bool,
    pub show_next: bool,
    pub show_skip: bool,
    pub show_finish: bool,
}

impl NavControls {
    /// Last question shows Finish and hides Next/Skip; every other position
    /// shows Next/Skip and hides Finish. Prev is disabled on the first
    /// question.
    #[must_use]
    pub fn at(index: usize, total: usize) -> Self {
        let is_first = index == 0;
        let is_last = index + 1 >= total;
        Self {
            prev_disabled: is_first,
            show_next: !is_last,
            show_skip: !is_last,
            show_finish: is_last,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_of_many_hides_finish() {
        let nav = NavControls::at(0, 3);
        assert!(nav.prev_disabled);
        assert!(nav.show_next);
        assert!(nav.show_skip);
        assert!(!nav.show_finish);
    }

    #[test]
    fn middle_enables_prev() {
        let nav = NavControls::at(1, 3);
        assert!(!nav.prev_disabled);
        assert!(nav.show_next);
        assert!(!nav.show_finish);
    }

    #[test]
    fn last_swaps_next_for_finish() {
        let nav = NavControls::at(2, 3);
        assert!(!nav.prev_disabled);
        assert!(!nav.show_next);
        assert!(!nav.show_skip);
        assert!(nav.show_finish);
    }

    #[test]
    fn single_question_is_first_and_last() {
        let nav = NavControls::at(0, 1);
        assert!(nav.prev_disabled);
        assert!(!nav.show_next);
        assert!(nav.show_finish);
    }
}
