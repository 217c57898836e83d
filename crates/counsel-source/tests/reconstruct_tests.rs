//! Reconstruction Tests
//!
//! End-to-end lookups through the file cache.
//!
use counsel_source::{reconstruct, reconstruct_source, SourceCache, SourceError, Window};
use counsel_test_utils::{
    init_tracing, SourceFixture, MULTI_LINE_STRING, SPANNING_END, SPANNING_START,
    SPANNING_STATEMENT,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn test_spanning_statement_from_last_line() {
    let excerpt =
        reconstruct_source(SPANNING_STATEMENT, SPANNING_END, Window::default()).unwrap();

    assert_eq!(excerpt.statement().start_line, SPANNING_START);
    assert_eq!(excerpt.statement().end_line, SPANNING_END);
    assert_eq!(excerpt.line_numbers(), (9..=15).collect::<Vec<_>>());

    let expected = [
        "      9 let c = 3;",
        " >   10 check(",
        "     11     a,",
        "     12     b,",
        "     13     c);",
        "     14 let d = 4;",
        "     15 let e = 5;",
    ]
    .join("\n");
    assert_eq!(excerpt.to_string(), expected);
}

#[test]
fn test_only_first_statement_line_is_marked() {
    let excerpt = reconstruct_source(SPANNING_STATEMENT, 12, Window::default()).unwrap();
    let marked: Vec<_> = excerpt
        .lines()
        .iter()
        .filter(|l| l.marked)
        .map(|l| l.number)
        .collect();
    assert_eq!(marked, vec![SPANNING_START]);
}

#[test]
fn test_custom_window() {
    let excerpt = reconstruct_source(SPANNING_STATEMENT, SPANNING_END, Window::new(0, 0)).unwrap();
    assert_eq!(excerpt.line_numbers(), vec![10, 11, 12, 13]);
    assert_eq!(excerpt.lines()[0].text, "check(");
}

#[test]
fn test_multi_line_string_uses_spanning_statement() {
    let excerpt = reconstruct_source(MULTI_LINE_STRING, 3, Window::default()).unwrap();
    assert_eq!(excerpt.statement().start_line, 2);
    assert_eq!(excerpt.line_numbers(), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_reconstruct_from_file() {
    init_tracing();
    let fixture = SourceFixture::new(SPANNING_STATEMENT);

    let excerpt = reconstruct(fixture.path(), SPANNING_END, Window::default()).unwrap();
    assert_eq!(excerpt.statement().start_line, SPANNING_START);
    assert!(SourceCache::global().contains(fixture.path()));

    assert!(SourceCache::global().invalidate(fixture.path()));
}

#[test]
fn test_reconstruct_missing_file() {
    let err = reconstruct(
        std::path::Path::new("/nonexistent/counsel/test.rs"),
        1,
        Window::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SourceError::Io { .. }));
}

#[test]
fn test_reconstruct_own_source() {
    // Paths from `file!()` are workspace-relative
    let line = line!() as usize;
    let excerpt = reconstruct(std::path::Path::new(file!()), line, Window::default()).unwrap();
    assert!(excerpt.to_string().contains("let line = line!() as usize;"));
}

proptest! {
    #[test]
    fn prop_every_statement_line_marks_statement_start(line in SPANNING_START..=SPANNING_END) {
        let excerpt = reconstruct_source(SPANNING_STATEMENT, line, Window::default()).unwrap();
        prop_assert_eq!(excerpt.statement().start_line, SPANNING_START);
        prop_assert_eq!(excerpt.line_numbers().first().copied(), Some(SPANNING_START - 1));
        prop_assert_eq!(excerpt.line_numbers().last().copied(), Some(line + 2));
    }
}
