use talkscore_core::text::CharOffsets;

/// A trimmed sentence with character offsets into the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

fn is_terminal(c: char) -> bool { matches!(c, '.' | '!' | '?') }

/// Split after runs of `.`/`!`/`?` that are followed by whitespace (or the
/// end of text) and at newlines. Segments shorter than `min_chars` are
/// dropped unless that would leave nothing.
pub fn split_sentences(text: &str, min_chars: usize) -> Vec<Segment> {
    let offsets = CharOffsets::new(text);
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut spans = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < chars.len() {
        let (b, c) = chars[i];
        if c == '\n' {
            spans.push((start, b));
            start = b + 1;
        } else if is_terminal(c) {
            let mut j = i;
            while j + 1 < chars.len() && is_terminal(chars[j + 1].1) { j += 1; }
            if j + 1 == chars.len() || chars[j + 1].1.is_whitespace() {
                let end = chars[j].0 + chars[j].1.len_utf8();
                spans.push((start, end));
                start = end;
            }
            i = j;
        }
        i += 1;
    }
    spans.push((start, text.len()));

    let segments: Vec<Segment> = spans
        .into_iter()
        .filter_map(|(s, e)| {
            let slice = &text[s..e];
            let trimmed = slice.trim();
            if trimmed.is_empty() { return None; }
            let lead = slice.len() - slice.trim_start().len();
            let bs = s + lead;
            let be = bs + trimmed.len();
            Some(Segment { text: trimmed.to_string(), start: offsets.char_at(bs), end: offsets.char_at(be) })
        })
        .collect();

    let long: Vec<Segment> = segments.iter().filter(|s| s.end - s.start >= min_chars).cloned().collect();
    if long.is_empty() { segments } else { long }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(segs: &[Segment]) -> Vec<&str> { segs.iter().map(|s| s.text.as_str()).collect() }

    #[test]
    fn splits_on_terminal_punctuation_and_newlines() {
        let segs = split_sentences("Look at it! Why is it green?? It is 3.5 cm\nnext line", 0);
        assert_eq!(texts(&segs), ["Look at it!", "Why is it green??", "It is 3.5 cm", "next line"]);
    }

    #[test]
    fn offsets_point_back_into_source() {
        let text = "  Hé said hi.   Then we read.";
        for s in split_sentences(text, 0) {
            let slice: String = text.chars().skip(s.start).take(s.end - s.start).collect();
            assert_eq!(slice, s.text);
        }
    }

    #[test]
    fn short_segments_dropped_unless_all_short() {
        let segs = split_sentences("Yes. We planted seeds in the garden.", 8);
        assert_eq!(texts(&segs), ["We planted seeds in the garden."]);
        let segs = split_sentences("Yes. No.", 8);
        assert_eq!(texts(&segs), ["Yes.", "No."]);
    }

    #[test]
    fn blank_text_has_no_segments() {
        assert!(split_sentences(" \n \n", 0).is_empty());
    }
}
