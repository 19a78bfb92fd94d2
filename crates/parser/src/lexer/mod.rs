mod error;

pub use self::error::{Error, Position};

use {
    self::error::*,
    crate::char_stream::CharStream,
    ast::token::{Keyword, Token, TokenKind},
    std::str::FromStr,
};

/// Longest error text quoted back in a diagnostic.
const EXCERPT_LEN: usize = 16;

#[derive(Debug, Clone, Copy)]
enum Failure {
    Unrecognized,
    UnterminatedString,
    UnterminatedIdentifier,
    UnterminatedComment,
}

/// Turns SQL text into tokens, hidden ones included.
///
/// Lexing never stops at bad input: the offending characters become an
/// [`TokenKind::Error`] token and an [`Error`] is queued for the parser to
/// report.
pub struct Lexer<'a> {
    input: CharStream<'a>,
    pos: usize,
    line: usize,
    column: usize,
    errors: Vec<Error>,
    exhausted: bool,
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let token = self.next_token();
        self.exhausted = token.is_eof();

        Some(token)
    }
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            input: CharStream::new(src),
            pos: 0,
            line: 1,
            column: 0,
            errors: vec![],
            exhausted: false,
        }
    }

    /// Scans the next token. Returns `Eof` forever once the input is used up.
    pub fn next_token(&mut self) -> Token<'a> {
        let (start, line, column) = (self.pos, self.line, self.column);

        let Some(c) = self.peek_nth(0) else {
            return self.make_token(TokenKind::Eof, start, line, column);
        };

        let scanned = match c {
            c if is_whitespace(c) => {
                self.next_while(is_whitespace);
                Ok(TokenKind::Whitespace)
            }
            '-' if self.peek_nth(1) == Some('-') => {
                self.next_while(|c| c != '\n');
                Ok(TokenKind::LineComment)
            }
            '/' if self.peek_nth(1) == Some('*') => self.scan_block_comment(),
            '\'' => self.scan_string(),
            'u' | 'U' if self.peek_nth(1) == Some('&') && self.peek_nth(2) == Some('\'') => {
                self.advance();
                self.advance();
                self.scan_string().map(|_| TokenKind::UnicodeString)
            }
            'x' | 'X' if self.peek_nth(1) == Some('\'') => {
                self.advance();
                self.scan_string().map(|_| TokenKind::BinaryLiteral)
            }
            '"' => self.scan_quoted('"', TokenKind::QuotedIdentifier),
            '`' => self.scan_quoted('`', TokenKind::BackquotedIdentifier),
            c if c.is_ascii_digit() => self.scan_number(),
            '.' if self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => self.scan_number(),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(start),
            _ => self.scan_symbol(),
        };

        let kind = match scanned {
            Ok(kind) => kind,
            Err(failure) => {
                self.record_error(failure, start, line, column);
                TokenKind::Error
            }
        };

        self.make_token(kind, start, line, column)
    }

    /// Errors found since the last call, in the order they were found.
    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input.char_at(self.pos + n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.char_at(self.pos)?;

        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }

        Some(c)
    }

    fn next_while(&mut self, func: impl Fn(char) -> bool) {
        while self.peek_nth(0).is_some_and(&func) {
            self.advance();
        }
    }

    fn make_token(&self, kind: TokenKind, start: usize, line: usize, column: usize) -> Token<'a> {
        let begin = self.input.byte_offset(start);
        let end = self.input.byte_offset(self.pos);

        Token {
            kind,
            text: self.input.slice(start, self.pos),
            span: begin..=end.saturating_sub(1).max(begin),
            line,
            column,
            channel: kind.channel(),
        }
    }

    fn record_error(&mut self, failure: Failure, start: usize, line: usize, column: usize) {
        let text = self.input.slice(start, self.pos);
        let text = match text.char_indices().nth(EXCERPT_LEN) {
            Some((offset, _)) => format!("{}...", &text[..offset]),
            None => text.to_string(),
        };
        let position = Position {
            line,
            column,
            span: self.input.byte_offset(start)..=self.input.byte_offset(self.pos) - 1,
        };

        let error = match failure {
            Failure::Unrecognized => UnrecognizedInputSnafu { text, position }.build(),
            Failure::UnterminatedString => UnterminatedStringSnafu { text, position }.build(),
            Failure::UnterminatedIdentifier => {
                UnterminatedIdentifierSnafu { text, position }.build()
            }
            Failure::UnterminatedComment => UnterminatedCommentSnafu { text, position }.build(),
        };

        tracing::trace!(%error, "lexical error");
        self.errors.push(error);
    }

    fn scan_block_comment(&mut self) -> Result<TokenKind, Failure> {
        self.advance();
        self.advance();

        loop {
            match self.advance() {
                Some('*') if self.peek_nth(0) == Some('/') => {
                    self.advance();
                    return Ok(TokenKind::BlockComment);
                }
                Some(_) => {}
                None => return Err(Failure::UnterminatedComment),
            }
        }
    }

    fn scan_string(&mut self) -> Result<TokenKind, Failure> {
        self.advance();

        loop {
            match self.advance() {
                // a doubled quote escapes itself
                Some('\'') if self.peek_nth(0) == Some('\'') => _ = self.advance(),
                Some('\'') => return Ok(TokenKind::String),
                Some(_) => {}
                None => return Err(Failure::UnterminatedString),
            }
        }
    }

    fn scan_quoted(&mut self, quote: char, kind: TokenKind) -> Result<TokenKind, Failure> {
        self.advance();

        loop {
            match self.advance() {
                Some(c) if c == quote && self.peek_nth(0) == Some(quote) => _ = self.advance(),
                Some(c) if c == quote => return Ok(kind),
                Some(_) => {}
                None => return Err(Failure::UnterminatedIdentifier),
            }
        }
    }

    fn scan_number(&mut self) -> Result<TokenKind, Failure> {
        let mut kind = TokenKind::Integer;

        self.next_while(|c| c.is_ascii_digit());
        if self.peek_nth(0) == Some('.') {
            self.advance();
            self.next_while(|c| c.is_ascii_digit());
            kind = TokenKind::Decimal;
        }

        if matches!(self.peek_nth(0), Some('e' | 'E')) {
            let digits_at = match self.peek_nth(1) {
                Some('+' | '-') => 2,
                _ => 1,
            };
            if self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..digits_at {
                    self.advance();
                }
                self.next_while(|c| c.is_ascii_digit());
                kind = TokenKind::Double;
            }
        }

        if kind == TokenKind::Integer && self.peek_nth(0).is_some_and(is_identifier_part) {
            self.next_while(is_identifier_part);
            kind = TokenKind::DigitIdentifier;
        }

        Ok(kind)
    }

    fn scan_identifier(&mut self, start: usize) -> Result<TokenKind, Failure> {
        self.next_while(is_identifier_part);

        let ident = self.input.slice(start, self.pos);
        let kind = Keyword::from_str(ident)
            .map(TokenKind::Keyword)
            .unwrap_or(TokenKind::Identifier);

        Ok(kind)
    }

    fn scan_symbol(&mut self) -> Result<TokenKind, Failure> {
        let Some(c) = self.advance() else {
            return Ok(TokenKind::Eof);
        };
        let next = self.peek_nth(0);

        let (kind, two_chars) = match (c, next) {
            ('<', Some('=')) => (TokenKind::LessThanOrEqual, true),
            ('<', Some('>')) => (TokenKind::NotEqual, true),
            ('<', _) => (TokenKind::LessThan, false),
            ('>', Some('=')) => (TokenKind::GreaterThanOrEqual, true),
            ('>', _) => (TokenKind::GreaterThan, false),
            ('=', Some('>')) => (TokenKind::DoubleArrow, true),
            ('=', _) => (TokenKind::Equal, false),
            ('!', Some('=')) => (TokenKind::NotEqual, true),
            ('|', Some('|')) => (TokenKind::Concat, true),
            ('-', Some('>')) => (TokenKind::Arrow, true),
            ('-', _) => (TokenKind::Minus, false),
            ('+', _) => (TokenKind::Plus, false),
            ('*', _) => (TokenKind::Asterisk, false),
            ('/', _) => (TokenKind::Slash, false),
            ('%', _) => (TokenKind::Percent, false),
            ('?', _) => (TokenKind::Question, false),
            ('.', _) => (TokenKind::Period, false),
            (',', _) => (TokenKind::Comma, false),
            (';', _) => (TokenKind::Semicolon, false),
            (':', _) => (TokenKind::Colon, false),
            ('(', _) => (TokenKind::LeftParen, false),
            (')', _) => (TokenKind::RightParen, false),
            ('[', _) => (TokenKind::LeftBracket, false),
            (']', _) => (TokenKind::RightBracket, false),
            _ => return Err(Failure::Unrecognized),
        };

        if two_chars {
            self.advance();
        }

        Ok(kind)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '@'
}

#[cfg(test)]
mod tests {
    use {super::*, ast::token::Channel, std::iter::zip};

    fn default_tokens(input: &str) -> Vec<Token<'_>> {
        Lexer::new(input)
            .filter(|token| token.channel == Channel::Default && !token.is_eof())
            .collect()
    }

    /// Every whitespace separated word of `input` must lex as one token.
    fn make_test(input: &str, kinds: Vec<TokenKind>) {
        let strs = input.split_whitespace().collect::<Vec<_>>();
        let tokens = default_tokens(input);

        assert_eq!(strs.len(), kinds.len());
        assert_eq!(tokens.len(), kinds.len());

        for ((s, kind), token) in zip(zip(strs, kinds), tokens) {
            let begin = input.find(s).unwrap();

            assert_eq!(token.kind, kind);
            assert_eq!(token.text, s);
            assert_eq!(token.span, begin..=begin + s.len() - 1);
        }
    }

    #[test]
    fn scan_string() {
        let input = " 'abc''DEF'  'ABC*DEF' U&'\\00e9' X'0fA1' ";
        let kinds = vec![
            TokenKind::String,
            TokenKind::String,
            TokenKind::UnicodeString,
            TokenKind::BinaryLiteral,
        ];

        make_test(input, kinds);
    }

    #[test]
    fn scan_string_error() {
        let mut lexer = Lexer::new("SELECT 'abc");
        let tokens = lexer.by_ref().collect::<Vec<_>>();

        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].channel, Channel::Hidden);
        assert_eq!(tokens[2].text, "'abc");
        assert!(tokens[3].is_eof());

        let errors = lexer.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].position().column, 7);
        assert_eq!(
            errors[0].to_string(),
            "token recognition error at: ''abc': unterminated string literal"
        );
    }

    #[test]
    fn scan_number() {
        let input = "12 123. .5 123.456e+789 1e10 1abc 2e";
        let kinds = vec![
            TokenKind::Integer,
            TokenKind::Decimal,
            TokenKind::Decimal,
            TokenKind::Double,
            TokenKind::Double,
            TokenKind::DigitIdentifier,
            TokenKind::DigitIdentifier,
        ];

        make_test(input, kinds);
    }

    #[test]
    fn scan_identifier() {
        let input = " SELECT abc FROM def _x a@b Partitions";
        let kinds = vec![
            TokenKind::Keyword(Keyword::SELECT),
            TokenKind::Identifier,
            TokenKind::Keyword(Keyword::FROM),
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Keyword(Keyword::PARTITIONS),
        ];

        make_test(input, kinds);
    }

    #[test]
    fn scan_quoted_identifier() {
        let input = r#""a ""b""" `c``d`"#;
        let tokens = default_tokens(input);

        assert_eq!(tokens[0].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[0].text, r#""a ""b""""#);
        assert_eq!(tokens[1].kind, TokenKind::BackquotedIdentifier);
        assert_eq!(tokens[1].text, "`c``d`");
    }

    #[test]
    fn scan_symbol() {
        let input = "* != < >= <> || -> => : [ ] ; % ?";
        let kinds = vec![
            TokenKind::Asterisk,
            TokenKind::NotEqual,
            TokenKind::LessThan,
            TokenKind::GreaterThanOrEqual,
            TokenKind::NotEqual,
            TokenKind::Concat,
            TokenKind::Arrow,
            TokenKind::DoubleArrow,
            TokenKind::Colon,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Semicolon,
            TokenKind::Percent,
            TokenKind::Question,
        ];

        make_test(input, kinds);
    }

    #[test]
    fn struct_fields_keep_colons_apart() {
        let kinds = default_tokens("struct<a:int>")
            .into_iter()
            .map(|token| token.kind)
            .collect::<Vec<_>>();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::STRUCT),
                TokenKind::LessThan,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::GreaterThan,
            ]
        );
    }

    #[test]
    fn comments_are_hidden_and_tracked() {
        let input = "SELECT -- c\n  a /* x\n y */ b";
        let all = Lexer::new(input).collect::<Vec<_>>();
        let tokens = default_tokens(input);

        assert!(all.iter().any(|token| token.kind == TokenKind::LineComment));
        assert!(all.iter().any(|token| token.kind == TokenKind::BlockComment));
        assert_eq!(tokens.len(), 3);
        assert_eq!((tokens[1].line, tokens[1].column), (2, 2));
        assert_eq!((tokens[2].line, tokens[2].column), (3, 6));
    }

    #[test]
    fn unrecognized_char() {
        let mut lexer = Lexer::new("SELECT # 1");
        let tokens = lexer.by_ref().collect::<Vec<_>>();

        assert_eq!(tokens[2].kind, TokenKind::Error);
        assert_eq!(tokens[2].text, "#");
        assert_eq!(tokens[4].kind, TokenKind::Integer);

        let errors = lexer.take_errors();
        assert_eq!(errors[0].to_string(), "token recognition error at: '#'");
        assert_eq!(errors[0].position().column, 7);
        assert!(lexer.take_errors().is_empty());
    }

    #[test]
    fn alphabet_is_ascii() {
        let mut lexer = Lexer::new("SELECT é\u{3000}1");
        let kinds = lexer.by_ref().map(|token| token.kind).collect::<Vec<_>>();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(Keyword::SELECT),
                TokenKind::Whitespace,
                TokenKind::Error,
                TokenKind::Error,
                TokenKind::Integer,
                TokenKind::Eof,
            ]
        );
        assert_eq!(lexer.take_errors().len(), 2);

        let tokens = Lexer::new("naïve").collect::<Vec<_>>();
        assert_eq!(tokens[0].text, "na");
        assert_eq!((tokens[1].kind, tokens[1].text), (TokenKind::Error, "ï"));
        assert_eq!(tokens[2].text, "ve");
    }

    #[test]
    fn unterminated_comment() {
        let mut lexer = Lexer::new("/* never closed");
        let token = lexer.next_token();

        assert_eq!(token.kind, TokenKind::Error);
        assert!(matches!(
            lexer.errors(),
            [Error::UnterminatedComment { .. }]
        ));
    }

    #[test]
    fn eof_forever() {
        let mut lexer = Lexer::new("a");

        assert_eq!(lexer.next_token().kind, TokenKind::Identifier);
        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
        assert_eq!(Lexer::new("").count(), 1);
    }

    #[test]
    fn multibyte_spans() {
        let tokens = default_tokens("'ü' x");

        assert_eq!(tokens[0].span, 0..=3);
        assert_eq!(tokens[1].span, 5..=5);
        assert_eq!(tokens[1].column, 4);
    }
}
