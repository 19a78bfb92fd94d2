/// Random-access view over the characters of a SQL string.
///
/// Indices are character positions, not byte offsets. Reads past the end
/// return `None`, the end-of-stream sentinel.
#[derive(Debug, Clone)]
pub struct CharStream<'a> {
    text: &'a str,
    chars: Vec<(usize, char)>,
}

impl<'a> CharStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().collect(),
        }
    }

    /// Number of characters in the stream.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    pub fn char_at(&self, index: usize) -> Option<char> {
        self.chars.get(index).map(|&(_, c)| c)
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset of the character at `index`; the text length past the end.
    pub fn byte_offset(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map_or(self.text.len(), |&(offset, _)| offset)
    }

    /// Text of the characters in `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.byte_offset(start)..self.byte_offset(end.max(start))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookahead() {
        let input = CharStream::new("SHOW ü;");

        assert_eq!(input.size(), 7);
        assert_eq!(input.char_at(0), Some('S'));
        assert_eq!(input.char_at(5), Some('ü'));
        assert_eq!(input.char_at(7), None);
        assert_eq!(input.char_at(usize::MAX), None);
    }

    #[test]
    fn offsets_and_slices() {
        let input = CharStream::new("aü;");

        assert_eq!(input.byte_offset(2), 3);
        assert_eq!(input.byte_offset(3), 4);
        assert_eq!(input.byte_offset(10), 4);
        assert_eq!(input.slice(1, 3), "ü;");
        assert_eq!(input.slice(3, 1), "");
    }

    #[test]
    fn empty() {
        let input = CharStream::new("");

        assert_eq!(input.size(), 0);
        assert_eq!(input.char_at(0), None);
        assert_eq!(input.slice(0, 0), "");
    }
}
