#![expect(missing_docs)]

mod common;

use sqlsplit::{ExecutableStatement, ScriptParser, parse_script};

use crate::common::DUMP;

fn render(statements: &[ExecutableStatement]) -> String {
    statements
        .iter()
        .map(|s| {
            let state = if s.is_parsed() { "Parsed" } else { "Unparsed" };
            format!("{} {state} {}", s.start_line(), s.text())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn snapshot_classify_script() {
    let script = "CREATE TABLE t (id INT, note VARCHAR(20));\n\
                  INSERT INTO t VALUES (1, 'a;b');\n\
                  DELIMITER $$\n\
                  SELECT id FROM t WHERE note = 'x'$$\n\
                  THIS IS NOT SQL$$\n\
                  SELECT 1; SELECT 2$$\n\
                  DELIMITER ;\n\
                  UPDATE t SET note = 'y' WHERE id = 1;\n";
    let statements = parse_script(script).expect("script parses");
    insta::assert_snapshot!(render(&statements), @r"
    1 Parsed CREATE TABLE t (id INT, note VARCHAR(20))
    2 Parsed INSERT INTO t VALUES (1, 'a;b')
    4 Parsed SELECT id FROM t WHERE note = 'x'
    5 Unparsed THIS IS NOT SQL$$
    6 Unparsed SELECT 1; SELECT 2$$
    8 Parsed UPDATE t SET note = 'y' WHERE id = 1
    ");
}

#[test]
fn dump_statements_keep_their_lines() {
    let statements = ScriptParser::default().parse(DUMP).expect("dump parses");
    let lines: Vec<usize> = statements
        .iter()
        .map(ExecutableStatement::start_line)
        .collect();
    assert_eq!(lines, [5, 6, 7, 12, 16, 19, 24, 25, 26]);

    let last = statements.last().expect("dump has statements");
    assert!(last.is_parsed());
    assert_eq!(last.text(), "COMMIT");
}

#[test]
fn parsed_statements_render_through_the_ast() {
    let statements = parse_script("DELIMITER //\nDROP TABLE IF EXISTS t//").expect("script parses");
    let [statement] = statements.as_slice() else {
        panic!("expected one statement, got {statements:?}");
    };
    insta::assert_snapshot!(
        statement.statement().expect("statement parses").to_string(),
        @"DROP TABLE IF EXISTS t"
    );
}
