use std::ops::Range;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelSpan {
    pub text: String,
    pub matched: bool,
}

impl LabelSpan {
    fn new(text: &str, matched: bool) -> Self {
        Self {
            text: text.to_owned(),
            matched,
        }
    }
}

fn chars_match(left: char, right: char) -> bool {
    left == right || left.to_lowercase().eq(right.to_lowercase())
}

fn find_from(text: &str, needle: &[char], from: usize) -> Option<Range<usize>> {
    for (start, _) in text[from..].char_indices() {
        let start = from + start;
        let mut end = start;
        let mut matched = 0usize;
        for ch in text[start..].chars() {
            if matched == needle.len() || !chars_match(ch, needle[matched]) {
                break;
            }
            matched += 1;
            end += ch.len_utf8();
        }
        if matched == needle.len() {
            return Some(start..end);
        }
    }
    None
}

pub fn find_match(text: &str, query: &str) -> Option<Range<usize>> {
    let needle = query.trim().chars().collect::<Vec<_>>();
    if needle.is_empty() {
        return None;
    }
    find_from(text, &needle, 0)
}

/// Splits `text` into spans, marking every non-overlapping case-insensitive occurrence of
/// the trimmed `query`. An empty query or no occurrence yields one unmatched span.
pub fn highlight_spans(text: &str, query: &str) -> Vec<LabelSpan> {
    let needle = query.trim().chars().collect::<Vec<_>>();
    let mut spans = Vec::new();
    if needle.is_empty() {
        spans.push(LabelSpan::new(text, false));
        return spans;
    }

    let mut cursor = 0usize;
    while cursor < text.len() {
        let Some(range) = find_from(text, &needle, cursor) else {
            break;
        };
        if range.start > cursor {
            spans.push(LabelSpan::new(&text[cursor..range.start], false));
        }
        spans.push(LabelSpan::new(&text[range.clone()], true));
        cursor = range.end;
    }
    if cursor < text.len() || spans.is_empty() {
        spans.push(LabelSpan::new(&text[cursor..], false));
    }
    spans
}

pub fn bracketed(spans: &[LabelSpan]) -> String {
    let mut out = String::new();
    for span in spans {
        if span.matched {
            out.push('[');
            out.push_str(&span.text);
            out.push(']');
        } else {
            out.push_str(&span.text);
        }
    }
    out
}
