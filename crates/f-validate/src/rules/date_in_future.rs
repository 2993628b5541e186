// File: src/rules/date_in_future.rs
// Purpose: `data-val-dateInFuture` on a month/year validation group

use chrono::Datelike;

use super::RuleContext;
use crate::dom::{Dom, Locator};

const ATTR: &str = "data-val-dateinfuture";
const TYPE_ATTR: &str = "data-val-dateinfuture-type";

pub(super) fn condition<D: Dom>(dom: &D, field: &D::Node) -> bool {
    dom.has_attribute(field, ATTR)
}

fn month_locator() -> Locator {
    Locator::attribute(TYPE_ATTR, Some("month"))
}

fn year_locator() -> Locator {
    Locator::attribute(TYPE_ATTR, Some("year"))
}

pub(super) fn touched_locators() -> Vec<Locator> {
    vec![month_locator(), year_locator()]
}

fn selected<D: Dom>(cx: &RuleContext<'_, D>, locator: &Locator) -> i32 {
    cx.dom
        .select_first(cx.field, locator)
        .and_then(|node| cx.dom.value(&node))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

/// A future year needs a chosen month; the current month itself counts as future
pub(super) fn test<D: Dom>(cx: &RuleContext<'_, D>) -> bool {
    let month = selected(cx, &month_locator());
    let year = selected(cx, &year_locator());
    let current_year = cx.today.year();
    let current_month = cx.today.month() as i32;

    if year > current_year && month > 0 {
        return true;
    }

    year == current_year && month >= current_month
}

#[cfg(test)]
mod tests {
    use crate::rules::testing::{applies, run};
    use crate::rules::Rule;
    use rstest::rstest;

    fn group(year: &str, month: &str) -> String {
        format!(
            r#"<form><div data-val-group data-val-dateinfuture>
                <select data-val-dateinfuture-type="year">
                    <option value=""></option>
                    <option value="2018" {}>2018</option>
                    <option value="2019" {}>2019</option>
                    <option value="2020" {}>2020</option>
                </select>
                <select data-val-dateinfuture-type="month">
                    <option value=""></option>
                    <option value="09" {}>09</option>
                    <option value="10" {}>10</option>
                    <option value="11" {}>11</option>
                    <option value="01" {}>01</option>
                </select>
            </div></form>"#,
            sel(year, "2018"),
            sel(year, "2019"),
            sel(year, "2020"),
            sel(month, "09"),
            sel(month, "10"),
            sel(month, "11"),
            sel(month, "01"),
        )
    }

    fn sel(chosen: &str, value: &str) -> &'static str {
        if chosen == value {
            "selected"
        } else {
            ""
        }
    }

    #[test]
    fn test_condition() {
        assert!(applies(&group("", ""), "div", Rule::DateInFuture));
    }

    // Today is 2018-10-16 in the rule fixtures
    #[rstest]
    #[case("", "", false)]
    #[case("2020", "01", true)]
    #[case("2018", "10", true)]
    #[case("2018", "11", true)]
    #[case("2018", "09", false)]
    #[case("2019", "", false)]
    fn test_selected_date(#[case] year: &str, #[case] month: &str, #[case] expected: bool) {
        assert_eq!(run(&group(year, month), "div", Rule::DateInFuture), expected);
    }
}
