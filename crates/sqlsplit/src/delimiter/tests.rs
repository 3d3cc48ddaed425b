use rstest::rstest;

use super::*;

fn first_token(src: &[u8]) -> Token<'_> {
    Lexer::new(src).next_token()
}

#[rstest]
#[case::dollars("$$", TokenKind::Identifier)]
#[case::double_semicolon(";;", TokenKind::Punct(b';'))]
#[case::slashes("//", TokenKind::Punct(b'/'))]
#[case::pipe("|", TokenKind::Punct(b'|'))]
#[case::word("GO", TokenKind::Identifier)]
#[case::glued_keyword("END$$", TokenKind::Identifier)]
#[case::keyword_prefix("END;", TokenKind::End)]
fn set_accepts(#[case] candidate: &str, #[case] anchor: TokenKind) {
    let mut d = Delimiter::default();
    d.set(candidate.as_bytes()).unwrap();
    assert_eq!(d.text(), candidate);
    assert_eq!(d.anchor_kind(), anchor);
    assert!(!d.is_default());
}

#[rstest]
#[case::empty("", DelimiterError::Missing)]
#[case::backslash("a\\b", DelimiterError::ContainsBackslash)]
#[case::backslash_before_blank("\\ x", DelimiterError::ContainsBackslash)]
#[case::space("a b", DelimiterError::ContainsBlankSpace)]
#[case::tab("a\tb", DelimiterError::ContainsBlankSpace)]
#[case::comment_only("#x", DelimiterError::CannotExtractToken)]
#[case::control_byte("\u{1}", DelimiterError::CannotExtractToken)]
#[case::select("SELECT", DelimiterError::ReservedKeyword)]
#[case::lower_case_keyword("end", DelimiterError::ReservedKeyword)]
#[case::equals("=", DelimiterError::ReservedKeyword)]
#[case::and("&&", DelimiterError::ReservedKeyword)]
fn set_rejects(#[case] candidate: &str, #[case] expected: DelimiterError) {
    let mut d = Delimiter::default();
    d.set(b"$$").unwrap();
    assert_eq!(d.set(candidate.as_bytes()), Err(expected));
    assert_eq!(d.text(), "$$", "a rejected candidate keeps the old delimiter");
}

#[test]
fn reset_restores_semicolon() {
    let mut d = Delimiter::default();
    assert!(d.is_default());
    d.set(b"//").unwrap();
    d.reset();
    assert!(d.is_default());
    assert_eq!(d, Delimiter::default());
}

#[test]
fn match_end_on_punctuation_compares_raw_bytes() {
    let mut d = Delimiter::default();
    d.set(b";;").unwrap();
    let src = b"; ;;";
    let mut lexer = Lexer::new(src);
    let single = lexer.next_token();
    let double = lexer.next_token();
    assert_eq!(d.match_end(&single, src), None);
    assert_eq!(d.match_end(&double, src), Some(4));
}

#[test]
fn match_end_inside_identifier() {
    let mut d = Delimiter::default();
    d.set(b"$$").unwrap();
    let src = b"END$$ x";
    let tok = first_token(src);
    assert_eq!(tok.kind, TokenKind::Identifier);
    assert_eq!(d.match_end(&tok, src), Some(5));

    let src = b"a$b";
    assert_eq!(d.match_end(&first_token(src), src), None);
}

#[test]
fn match_end_may_run_past_identifier() {
    let mut d = Delimiter::default();
    d.set(b"go;").unwrap();
    let src = b"go;";
    assert_eq!(d.match_end(&first_token(src), src), Some(3));
}

#[test]
fn match_end_ignores_other_kinds() {
    let mut d = Delimiter::default();
    d.set(b"$$").unwrap();
    let src = b"'$$'";
    assert_eq!(d.match_end(&first_token(src), src), None);
}

#[test]
fn match_end_on_string_literal_anchor() {
    let mut d = Delimiter::default();
    d.set(b"'x'").unwrap();
    assert_eq!(d.anchor_kind(), TokenKind::StringLiteral);
    let src = b"'x' 'xy'";
    let mut lexer = Lexer::new(src);
    let hit = lexer.next_token();
    let miss = lexer.next_token();
    assert_eq!(d.match_end(&hit, src), Some(3));
    assert_eq!(d.match_end(&miss, src), None);
}

#[rstest]
#[case::delimiter("DELIMITER $$\nSELECT 1", Some(" $$"))]
#[case::lower_case("delimiter ;;", Some(" ;;"))]
#[case::crlf("DELIMITER //\r\nx", Some(" //"))]
#[case::tab("DELIMITER\t$$", Some("\t$$"))]
#[case::bare("DELIMITER", Some(""))]
#[case::bare_line("DELIMITER\nSELECT 1", Some(""))]
#[case::short("\\d $$", Some(" $$"))]
#[case::short_at_end("\\d", Some(""))]
#[case::glued("DELIMITER$$", None)]
#[case::short_glued("\\dx", None)]
#[case::short_upper("\\D $$", None)]
#[case::column("delimiter = 1", Some(" = 1"))]
#[case::not_a_command("SELECT 1", None)]
#[case::quoted("`DELIMITER` $$", None)]
fn detects_commands(#[case] src: &str, #[case] expected: Option<&str>) {
    let src = src.as_bytes();
    let first = first_token(src);
    assert_eq!(
        command_argument(&first, src),
        expected.map(str::as_bytes)
    );
}

#[rstest]
#[case::plain(" $$", "$$")]
#[case::trailing_text("  ;;  ignored", ";;")]
#[case::single_quoted(" '$$' x", "$$")]
#[case::double_quoted(" \"a b\"", "a b")]
#[case::backtick(" `//`", "//")]
#[case::unclosed(" 'abc", "abc")]
#[case::escaped_blank(" a\\ b c", "a\\ b")]
#[case::trailing_backslash(" a\\", "a\\")]
#[case::empty("   ", "")]
fn extracts_values(#[case] remainder: &str, #[case] expected: &str) {
    assert_eq!(
        extract_delimiter_value(remainder.as_bytes()).as_bstr(),
        expected
    );
}

#[test]
fn strip_suffix_removes_one_occurrence() {
    let mut d = Delimiter::default();
    assert_eq!(d.strip_suffix(b" SELECT 1;;\n").as_bstr(), "SELECT 1;");
    assert_eq!(d.strip_suffix(b"SELECT 1").as_bstr(), "SELECT 1");
    d.set(b"$$").unwrap();
    assert_eq!(d.strip_suffix(b"END $$").as_bstr(), "END");
    assert_eq!(d.strip_suffix(b"$$").as_bstr(), "");
}

#[quickcheck_macros::quickcheck]
fn extracted_value_comes_from_remainder(remainder: Vec<u8>) -> bool {
    let value = extract_delimiter_value(&remainder);
    let mut d = Delimiter::default();
    let installed = d.set(value).is_ok();
    remainder.find(value).is_some() && (installed || d.is_default())
}
