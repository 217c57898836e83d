//! Base checks behind the annotated assertions
//!
//! Each check is a pure predicate. A failing check returns the standard
//! failure description that heads the report.

use regex::Regex;
use std::fmt::Debug;

/// Outcome of a check: `Err` carries the standard failure description
pub type Verdict = Result<(), String>;

/// Decimal places used by [`almost_equal`] unless told otherwise
pub const DEFAULT_PLACES: i32 = 7;

fn verdict(passed: bool, describe: impl FnOnce() -> String) -> Verdict {
    if passed {
        Ok(())
    } else {
        Err(describe())
    }
}

/// `value` is true
pub fn is_true(value: bool) -> Verdict {
    verdict(value, || "false is not true".to_string())
}

/// `value` is false
pub fn is_false(value: bool) -> Verdict {
    verdict(!value, || "true is not false".to_string())
}

/// `first == second`
pub fn equal<T, U>(first: T, second: U) -> Verdict
where
    T: PartialEq<U> + Debug,
    U: Debug,
{
    verdict(first == second, || format!("{first:?} != {second:?}"))
}

/// `first != second`
pub fn not_equal<T, U>(first: T, second: U) -> Verdict
where
    T: PartialEq<U> + Debug,
    U: Debug,
{
    verdict(first != second, || format!("{first:?} == {second:?}"))
}

/// `value` is `Some`
pub fn is_some<T>(value: &Option<T>) -> Verdict {
    verdict(value.is_some(), || "None is not Some".to_string())
}

/// `value` is `None`
pub fn is_none<T: Debug>(value: &Option<T>) -> Verdict {
    verdict(value.is_none(), || format!("{value:?} is not None"))
}

/// `value` is `Ok`
pub fn is_ok<T, E: Debug>(value: &Result<T, E>) -> Verdict {
    match value {
        Ok(_) => Ok(()),
        Err(e) => Err(format!("Err({e:?}) is not Ok")),
    }
}

/// `value` is `Err`
pub fn is_err<T: Debug, E>(value: &Result<T, E>) -> Verdict {
    match value {
        Ok(v) => Err(format!("Ok({v:?}) is not Err")),
        Err(_) => Ok(()),
    }
}

/// `needle` occurs in `haystack`
pub fn contains(haystack: &str, needle: &str) -> Verdict {
    verdict(haystack.contains(needle), || {
        format!("{needle:?} not found in {haystack:?}")
    })
}

/// `member` is an element of `container`
pub fn is_in<T: PartialEq + Debug>(member: &T, container: &[T]) -> Verdict {
    verdict(container.contains(member), || {
        format!("{member:?} not found in {container:?}")
    })
}

/// `member` is not an element of `container`
pub fn not_in<T: PartialEq + Debug>(member: &T, container: &[T]) -> Verdict {
    verdict(!container.contains(member), || {
        format!("{member:?} unexpectedly found in {container:?}")
    })
}

/// `first > second`
pub fn greater<T, U>(first: T, second: U) -> Verdict
where
    T: PartialOrd<U> + Debug,
    U: Debug,
{
    verdict(first > second, || format!("{first:?} not greater than {second:?}"))
}

/// `first >= second`
pub fn greater_equal<T, U>(first: T, second: U) -> Verdict
where
    T: PartialOrd<U> + Debug,
    U: Debug,
{
    verdict(first >= second, || {
        format!("{first:?} not greater than or equal to {second:?}")
    })
}

/// `first < second`
pub fn less<T, U>(first: T, second: U) -> Verdict
where
    T: PartialOrd<U> + Debug,
    U: Debug,
{
    verdict(first < second, || format!("{first:?} not less than {second:?}"))
}

/// `first <= second`
pub fn less_equal<T, U>(first: T, second: U) -> Verdict
where
    T: PartialOrd<U> + Debug,
    U: Debug,
{
    verdict(first <= second, || {
        format!("{first:?} not less than or equal to {second:?}")
    })
}

/// `first` and `second` agree once their difference is rounded to
/// `places` decimal places
#[allow(clippy::float_cmp)]
pub fn almost_equal(first: f64, second: f64, places: i32) -> Verdict {
    if first == second {
        return Ok(());
    }
    let diff = (first - second).abs();
    let scale = 10f64.powi(places);
    verdict((diff * scale).round() == 0.0, || {
        format!("{first} != {second} within {places} places ({diff} difference)")
    })
}

/// `pattern` matches somewhere in `text`
pub fn matches(text: &str, pattern: &Regex) -> Verdict {
    verdict(pattern.is_match(text), || {
        format!("Regex didn't match: {:?} not found in {text:?}", pattern.as_str())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert_eq!(is_true(true), Ok(()));
        assert_eq!(is_true(false), Err("false is not true".to_string()));
        assert_eq!(is_false(true), Err("true is not false".to_string()));
    }

    #[test]
    fn equality_messages() {
        assert_eq!(equal(5, 7), Err("5 != 7".to_string()));
        assert_eq!(equal("a".to_string(), "a"), Ok(()));
        assert_eq!(not_equal("a", "a"), Err("\"a\" == \"a\"".to_string()));
    }

    #[test]
    fn options_and_results() {
        assert_eq!(is_some(&Some(1)), Ok(()));
        assert_eq!(is_some::<u8>(&None), Err("None is not Some".to_string()));
        assert_eq!(is_none(&Some(3)), Err("Some(3) is not None".to_string()));

        let failed: Result<u8, &str> = Err("boom");
        assert_eq!(is_ok(&failed), Err("Err(\"boom\") is not Ok".to_string()));
        assert_eq!(is_err(&failed), Ok(()));
        assert_eq!(is_err::<u8, ()>(&Ok(2)), Err("Ok(2) is not Err".to_string()));
    }

    #[test]
    fn membership() {
        assert_eq!(contains("hello world", "world"), Ok(()));
        assert_eq!(
            contains("hello", "bye"),
            Err("\"bye\" not found in \"hello\"".to_string())
        );
        assert_eq!(is_in(&2, &[1, 2, 3]), Ok(()));
        assert_eq!(is_in(&4, &[1, 2]), Err("4 not found in [1, 2]".to_string()));
        assert_eq!(
            not_in(&1, &[1, 2]),
            Err("1 unexpectedly found in [1, 2]".to_string())
        );
    }

    #[test]
    fn ordering() {
        assert_eq!(greater(2, 1), Ok(()));
        assert_eq!(greater(1, 1), Err("1 not greater than 1".to_string()));
        assert_eq!(greater_equal(1, 1), Ok(()));
        assert_eq!(less(1, 2), Ok(()));
        assert_eq!(
            less_equal(3, 2),
            Err("3 not less than or equal to 2".to_string())
        );
    }

    #[test]
    fn almost_equal_rounds_difference() {
        assert_eq!(almost_equal(1.0, 1.000_000_01, DEFAULT_PLACES), Ok(()));
        assert_eq!(almost_equal(0.1 + 0.2, 0.3, DEFAULT_PLACES), Ok(()));
        assert!(almost_equal(1.0, 1.1, DEFAULT_PLACES).is_err());
        assert_eq!(almost_equal(1.0, 1.04, 1), Ok(()));
    }

    #[test]
    fn regex_search() {
        let pattern = Regex::new(r"\d{3}").unwrap();
        assert_eq!(matches("code 404", &pattern), Ok(()));
        assert_eq!(
            matches("none", &pattern),
            Err("Regex didn't match: \"\\\\d{3}\" not found in \"none\"".to_string())
        );
    }
}
