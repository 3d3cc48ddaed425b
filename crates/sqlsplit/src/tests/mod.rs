mod classify;

use crate::{Segment, SegmentKind, lexer};

/// Renders segments as `(line, text, kind)` triples for table-driven tests.
pub(crate) fn rendered(segments: &[Segment]) -> Vec<(usize, String, SegmentKind)> {
    segments
        .iter()
        .map(|s| (s.start_line, s.text.to_string(), s.kind))
        .collect()
}

/// Checks that `segments` tile `input` from offset 0 and that only
/// whitespace is left over.
pub(crate) fn reconstructs(input: &[u8], segments: &[Segment]) -> bool {
    let mut offset = 0;
    let mut line = 1;
    for segment in segments {
        let span = segment.span.clone();
        if span.start != offset || span.end <= span.start || span.end > input.len() {
            return false;
        }
        if segment.text.as_slice() != lexer::trim_space(&input[span.clone()]) {
            return false;
        }
        if segment.start_line < line {
            return false;
        }
        line = segment.start_line;
        offset = span.end;
    }
    input[offset..].iter().all(|&b| lexer::is_space(b))
}
