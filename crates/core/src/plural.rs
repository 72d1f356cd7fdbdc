//! Russian three-form pluralization.

/// Picks the plural form for `count`: `one` for 1, 21, 31…, `few` for 2–4,
/// 22–24… (except 11–14), `many` otherwise.
#[must_use]
pub fn plural_form<'a>(count: usize, one: &'a str, few: &'a str, many: &'a str) -> &'a str {
    let tens = count % 100;
    let units = count % 10;
    if units == 1 && tens != 11 {
        return one;
    }
    if (2..=4).contains(&units) && !(11..=14).contains(&tens) {
        return few;
    }
    many
}

/// The noun "вопрос" declined to agree with `count`.
#[must_use]
pub fn question_word(count: usize) -> &'static str {
    plural_form(count, "вопрос", "вопроса", "вопросов")
}
