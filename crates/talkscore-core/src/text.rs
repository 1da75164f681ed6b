//! Byte ↔ character offset conversion for spans reported to clients.

/// Converts byte offsets of one string into character offsets.
///
/// ASCII input maps one-to-one and skips building the index.
pub struct CharOffsets {
    starts: Option<Vec<usize>>,
}

impl CharOffsets {
    pub fn new(text: &str) -> Self {
        let starts = if text.is_ascii() { None } else { Some(text.char_indices().map(|(b, _)| b).collect()) };
        Self { starts }
    }

    /// `byte` must lie on a char boundary (or equal `text.len()`).
    pub fn char_at(&self, byte: usize) -> usize {
        match &self.starts {
            None => byte,
            Some(starts) => match starts.binary_search(&byte) {
                Ok(i) | Err(i) => i,
            },
        }
    }
}

pub fn is_blank(text: &str) -> bool { text.trim().is_empty() }
