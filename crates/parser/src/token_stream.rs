use {
    crate::lexer::{self, Lexer},
    ast::token::{Channel, Token, TokenKind},
};

/// A saved position to [`TokenStream::rewind`] to.
#[derive(Debug)]
#[must_use]
pub struct Mark {
    index: usize,
}

/// Buffers the lexer's tokens so the parser can look ahead and backtrack.
///
/// Tokens are pulled from the lexer lazily, exactly once. Lookahead skips the
/// hidden channel; the buffer keeps every token for editor tooling.
pub struct TokenStream<'a> {
    lexer: Lexer<'a>,
    tokens: Vec<Token<'a>>,
    /// Buffer index of the current default-channel token.
    p: usize,
    open_marks: usize,
    /// Lexer errors paired with the buffer index of their error token.
    lexer_errors: Vec<(lexer::Error, usize)>,
}

impl<'a> TokenStream<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let mut stream = Self {
            lexer,
            tokens: vec![],
            p: 0,
            open_marks: 0,
            lexer_errors: vec![],
        };
        stream.p = stream.next_default(0);

        stream
    }

    /// Kind of the `k`-th token ahead, counting the current one as 1.
    pub fn la(&mut self, k: usize) -> TokenKind {
        self.lt(k).kind
    }

    /// The `k`-th token ahead, counting the current one as 1. Clamped to EOF.
    pub fn lt(&mut self, k: usize) -> &Token<'a> {
        let mut i = self.p;
        for _ in 1..k {
            if self.tokens[i].is_eof() {
                break;
            }
            i = self.next_default(i + 1);
        }

        &self.tokens[i]
    }

    /// The default-channel token before the current one.
    pub fn lt_back(&self) -> Option<&Token<'a>> {
        self.tokens[..self.p]
            .iter()
            .rev()
            .find(|token| token.channel == Channel::Default)
    }

    /// Moves past the current token. Consuming EOF is a no-op.
    pub fn consume(&mut self) {
        if !self.tokens[self.p].is_eof() {
            self.p = self.next_default(self.p + 1);
        }
    }

    pub fn index(&self) -> usize {
        self.p
    }

    pub fn get(&self, index: usize) -> Option<&Token<'a>> {
        self.tokens.get(index)
    }

    pub fn mark(&mut self) -> Mark {
        self.open_marks += 1;
        Mark { index: self.p }
    }

    pub fn rewind(&mut self, mark: &Mark) {
        self.p = mark.index;
    }

    pub fn release(&mut self, mark: Mark) {
        debug_assert!(mark.index <= self.tokens.len());
        self.open_marks = self.open_marks.saturating_sub(1);
    }

    pub fn open_marks(&self) -> usize {
        self.open_marks
    }

    /// Lexes the rest of the input and returns every token, hidden ones included.
    pub fn fill(&mut self) -> &[Token<'a>] {
        while !self.tokens.last().is_some_and(Token::is_eof) {
            self.fetch();
        }

        &self.tokens
    }

    /// Lexer errors found since the last call, with the index of their token.
    pub fn take_lexer_errors(&mut self) -> Vec<(lexer::Error, usize)> {
        std::mem::take(&mut self.lexer_errors)
    }

    pub fn has_lexer_errors(&self) -> bool {
        !self.lexer_errors.is_empty()
    }

    fn fetch(&mut self) {
        let token = self.lexer.next_token();
        let index = self.tokens.len();

        self.lexer_errors.extend(
            self.lexer
                .take_errors()
                .into_iter()
                .map(|error| (error, index)),
        );
        self.tokens.push(token);
    }

    /// Buffer index of the first default-channel token at or after `i`.
    fn next_default(&mut self, mut i: usize) -> usize {
        loop {
            while self.tokens.len() <= i && !self.tokens.last().is_some_and(Token::is_eof) {
                self.fetch();
            }

            // EOF is on the default channel, so this terminates
            let i_clamped = i.min(self.tokens.len() - 1);
            if self.tokens[i_clamped].channel == Channel::Default {
                return i_clamped;
            }
            i = i_clamped + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, ast::token::Keyword};

    fn stream(input: &str) -> TokenStream<'_> {
        TokenStream::new(Lexer::new(input))
    }

    #[test]
    fn lookahead_skips_hidden_tokens() {
        let mut tokens = stream("SHOW  /* c */ PARTITIONS\n t");

        assert_eq!(tokens.la(1), TokenKind::Keyword(Keyword::SHOW));
        assert_eq!(tokens.la(2), TokenKind::Keyword(Keyword::PARTITIONS));
        assert_eq!(tokens.lt(3).text, "t");
        assert_eq!(tokens.la(4), TokenKind::Eof);
        assert_eq!(tokens.la(100), TokenKind::Eof);
    }

    #[test]
    fn consume_and_look_back() {
        let mut tokens = stream("a -- x\n b");

        assert!(tokens.lt_back().is_none());
        tokens.consume();
        assert_eq!(tokens.lt(1).text, "b");
        assert_eq!(tokens.lt_back().map(|token| token.text), Some("a"));

        tokens.consume();
        tokens.consume();
        assert_eq!(tokens.la(1), TokenKind::Eof);
    }

    #[test]
    fn mark_and_rewind() {
        let mut tokens = stream("a b c");
        tokens.consume();

        let mark = tokens.mark();
        assert_eq!(tokens.open_marks(), 1);
        tokens.consume();
        tokens.consume();
        assert_eq!(tokens.la(1), TokenKind::Eof);

        tokens.rewind(&mark);
        tokens.release(mark);
        assert_eq!(tokens.lt(1).text, "b");
        assert_eq!(tokens.open_marks(), 0);
    }

    #[test]
    fn fill_keeps_hidden_tokens() {
        let mut tokens = stream("a  b");

        let kinds = tokens
            .fill()
            .iter()
            .map(|token| token.kind)
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier,
                TokenKind::Whitespace,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens.lt(1).text, "a");
    }

    #[test]
    fn lexer_errors_point_at_their_token() {
        let mut tokens = stream("a $ b");
        tokens.fill();

        let errors = tokens.take_lexer_errors();
        assert_eq!(errors.len(), 1);

        let (error, index) = &errors[0];
        assert_eq!(tokens.get(*index).map(|token| token.text), Some("$"));
        assert_eq!(error.position().column, 2);
        assert!(!tokens.has_lexer_errors());
    }

    #[test]
    fn empty_input() {
        let mut tokens = stream("   ");

        assert_eq!(tokens.la(1), TokenKind::Eof);
        tokens.consume();
        assert_eq!(tokens.la(1), TokenKind::Eof);
    }
}
