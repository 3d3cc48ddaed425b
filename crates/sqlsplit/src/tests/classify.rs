use bstr::BString;

use crate::{
    Classifier, DelimiterError, ExecutableStatement, ScriptParser, Segment, SegmentKind,
    SplitterOptions, SqlDialect, parse_script,
};

fn summary(statements: &[ExecutableStatement]) -> Vec<(usize, bool, String)> {
    statements
        .iter()
        .map(|s| (s.start_line(), s.is_parsed(), s.text().to_string()))
        .collect()
}

#[test]
fn delimiter_commands_are_dropped() {
    let statements = parse_script("DELIMITER $$\nSELECT 1$$\nDELIMITER ;\nSELECT 2;").unwrap();
    assert_eq!(
        summary(&statements),
        vec![
            (2, true, "SELECT 1".to_string()),
            (4, true, "SELECT 2".to_string()),
        ]
    );
    let Some(statement) = statements[0].statement() else {
        panic!("expected a parsed statement");
    };
    assert_eq!(statement.to_string(), "SELECT 1");
}

#[test]
fn malformed_bytes_fall_back() {
    let statements = parse_script(b"\xff\xfe;\nSELECT 1;").unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[0],
        ExecutableStatement::Unparsed(crate::UnparsedStatement {
            text: BString::from(&b"\xff\xfe;"[..]),
            start_line: 1,
        })
    );
    assert!(statements[1].is_parsed());
    assert_eq!(statements[1].start_line(), 2);
}

#[test]
fn parser_errors_keep_original_text() {
    let statements = parse_script("THIS IS NOT SQL;\n\nSELECT 1;").unwrap();
    assert_eq!(
        summary(&statements),
        vec![
            (1, false, "THIS IS NOT SQL;".to_string()),
            (3, true, "SELECT 1".to_string()),
        ]
    );
}

#[test]
fn several_statements_in_one_segment_fall_back() {
    let statements = parse_script("DELIMITER $$\nSELECT 1; SELECT 2$$").unwrap();
    assert_eq!(
        summary(&statements),
        vec![(2, false, "SELECT 1; SELECT 2$$".to_string())]
    );
}

#[test]
fn comments_and_empty_statements_are_dropped() {
    let statements = parse_script("-- header\nSELECT 1;;\n;\n-- footer\n").unwrap();
    assert_eq!(
        summary(&statements),
        vec![(2, true, "-- header\nSELECT 1".to_string())]
    );
}

#[test]
fn invalid_command_in_segments() {
    let segments = [Segment {
        text: BString::from("DELIMITER SELECT"),
        start_line: 7,
        span: 0..16,
        kind: SegmentKind::DelimiterCommand,
    }];
    let err = Classifier::default().classify(&segments).unwrap_err();
    assert_eq!(err.kind(), DelimiterError::ReservedKeyword);
    assert_eq!(err.line(), 7);
}

#[test]
fn classifier_follows_delimiter_per_call() {
    let mut parser = ScriptParser::default();
    let first = parser.parse("DELIMITER //\nSELECT 1//").unwrap();
    assert_eq!(summary(&first), vec![(2, true, "SELECT 1".to_string())]);

    let second = parser.parse("SELECT 2//;").unwrap();
    assert_eq!(summary(&second), vec![(1, false, "SELECT 2//;".to_string())]);
}

#[test]
fn generic_dialect() {
    let mut parser = ScriptParser::new(SplitterOptions {
        dialect: SqlDialect::Generic,
        ..Default::default()
    });
    let statements = parser.parse("SELECT a FROM t;\nSELECT b FROM u").unwrap();
    assert_eq!(
        summary(&statements),
        vec![
            (1, true, "SELECT a FROM t".to_string()),
            (2, true, "SELECT b FROM u".to_string()),
        ]
    );
}

#[test]
fn split_errors_surface_from_parse() {
    let err = parse_script("SELECT 1;\nDELIMITER\n").unwrap_err();
    assert_eq!(err.kind(), DelimiterError::Missing);
    assert_eq!(err.line(), 2);
}
