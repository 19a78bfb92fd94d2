use {
    super::{
        error::{
            DigitIdentifierSnafu, Error, MismatchedInputSnafu, NoViableAlternativeSnafu,
            Offending, Result, TooDeepSnafu,
        },
        ErrorStrategy, Parser, MAX_NESTING_DEPTH,
    },
    crate::listener::ErrorListener,
    ast::{
        token::{Channel, Keyword, Token, TokenKind},
        Identifier, QualifiedName, Span, Spanned,
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    pub(super) fn peek(&mut self) -> TokenKind {
        self.peek_nth(0)
    }

    /// Kind of the `n`-th token after the current one.
    pub(super) fn peek_nth(&mut self, n: usize) -> TokenKind {
        let kind = self.tokens.la(n + 1);
        self.drain_lexer_errors();
        kind
    }

    pub(super) fn current(&mut self) -> Token<'a> {
        let token = self.tokens.lt(1).clone();
        self.drain_lexer_errors();
        token
    }

    pub(super) fn advance(&mut self) -> Token<'a> {
        let token = self.current();
        self.tokens.consume();
        token
    }

    pub(super) fn check(&mut self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    pub(super) fn check_keyword(&mut self, keyword: Keyword) -> bool {
        self.peek().is_keyword(keyword)
    }

    pub(super) fn try_match(&mut self, kind: TokenKind) -> Option<Token<'a>> {
        match self.check(kind) {
            true => Some(self.advance()),
            false => None,
        }
    }

    pub(super) fn try_match_keyword(&mut self, keyword: Keyword) -> bool {
        self.try_match(TokenKind::Keyword(keyword)).is_some()
    }

    /// Consumes the keywords only if all of them are next, in order.
    pub(super) fn match_keyword_sequence(&mut self, keywords: &[Keyword]) -> bool {
        let matched = keywords
            .iter()
            .enumerate()
            .all(|(i, &keyword)| self.peek_nth(i).is_keyword(keyword));

        if matched {
            for _ in keywords {
                self.advance();
            }
        }

        matched
    }

    pub(super) fn must_match_keyword(&mut self, keyword: Keyword) -> Result<Token<'a>> {
        self.must_match(TokenKind::Keyword(keyword))
    }

    /// Consumes a token of `kind`, repairing single-token mistakes outside of
    /// speculation.
    pub(super) fn must_match(&mut self, kind: TokenKind) -> Result<Token<'a>> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        if self.recovering() {
            let current = self.current();

            if !current.is_eof() && self.peek_nth(1) == kind {
                self.report_extraneous(&current, &kind.to_string());
                return Ok(self.advance());
            }

            let closer = matches!(
                kind,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::Keyword(Keyword::END)
            );
            if closer && matches!(current.kind, TokenKind::Eof | TokenKind::Semicolon) {
                let message = format!("missing {} at {}", kind, current.describe());
                self.report_at(&current, &message);
                tracing::debug!(%kind, "conjured missing token");

                return Ok(Token {
                    kind,
                    text: "",
                    channel: Channel::Default,
                    ..current
                });
            }
        }

        Err(self.error_expected(kind.to_string()))
    }

    pub(super) fn skip_semicolons(&mut self) {
        while self.try_match(TokenKind::Semicolon).is_some() {}
    }

    /// Identifiers, including non-reserved keywords.
    pub(super) fn is_identifier(kind: TokenKind) -> bool {
        match kind {
            TokenKind::Identifier
            | TokenKind::QuotedIdentifier
            | TokenKind::BackquotedIdentifier
            | TokenKind::DigitIdentifier => true,
            TokenKind::Keyword(keyword) => !keyword.is_reserved(),
            _ => false,
        }
    }

    pub(super) fn check_identifier(&mut self) -> bool {
        Self::is_identifier(self.peek())
    }

    pub(super) fn identifier_from_token(token: &Token<'a>) -> Identifier {
        let value = match token.kind {
            TokenKind::QuotedIdentifier => unquote(token.text, '"'),
            TokenKind::BackquotedIdentifier => unquote(token.text, '`'),
            _ => token.text.to_string(),
        };

        Spanned(value, token.span.clone())
    }

    pub(super) fn parse_identifier(&mut self) -> Result<Identifier> {
        if !self.check_identifier() && self.recovering() {
            let current = self.current();
            if !current.is_eof() && Self::is_identifier(self.peek_nth(1)) {
                self.report_extraneous(&current, "identifier");
                self.advance();
            }
        }

        match self.peek() {
            TokenKind::DigitIdentifier => DigitIdentifierSnafu {
                offending: self.offending(),
            }
            .fail(),
            kind if Self::is_identifier(kind) => {
                let token = self.advance();
                Ok(Self::identifier_from_token(&token))
            }
            _ => Err(self.error_expected("identifier")),
        }
    }

    pub(super) fn parse_qualified_name(&mut self) -> Result<QualifiedName> {
        let mut parts = vec![self.parse_identifier()?];

        while self.try_match(TokenKind::Period).is_some() {
            parts.push(self.parse_identifier()?);
        }

        Ok(QualifiedName(parts))
    }

    /// `[AS] identifier`, where a bare identifier must not be a word that can
    /// continue the enclosing clause.
    pub(super) fn parse_alias(&mut self) -> Result<Option<Identifier>> {
        if self.try_match_keyword(Keyword::AS) {
            return Ok(Some(self.parse_identifier()?));
        }

        match self.peek() {
            kind if Self::is_identifier(kind) && !Self::is_clause_keyword(kind) => {
                Ok(Some(self.parse_identifier()?))
            }
            _ => Ok(None),
        }
    }

    /// Non-reserved keywords that start a clause after a relation or a
    /// select item, and so never act as an implicit alias.
    fn is_clause_keyword(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Keyword(
                Keyword::LIMIT
                    | Keyword::OFFSET
                    | Keyword::FETCH
                    | Keyword::WINDOW
                    | Keyword::TABLESAMPLE
            )
        )
    }

    pub(super) fn string_from_token(token: &Token<'a>) -> String {
        let text = match token.kind {
            TokenKind::UnicodeString => &token.text[2..],
            TokenKind::BinaryLiteral => &token.text[1..],
            _ => token.text,
        };

        unquote(text, '\'')
    }

    pub(super) fn parse_string(&mut self) -> Result<String> {
        let token = self.must_match(TokenKind::String)?;
        Ok(Self::string_from_token(&token))
    }

    pub(super) fn parse_integer(&mut self) -> Result<String> {
        let token = self.must_match(TokenKind::Integer)?;
        Ok(token.text.to_string())
    }

    pub(super) fn parse_comma_separated_within_parentheses<T, F>(
        &mut self,
        func: F,
        allow_empty: bool,
    ) -> Result<Spanned<Vec<T>>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let begin = *self.must_match(TokenKind::LeftParen)?.span.start();

        if allow_empty {
            if let Some(token) = self.try_match(TokenKind::RightParen) {
                return Ok(Spanned(vec![], begin..=*token.span.end()));
            }
        }

        let result = self.parse_comma_separated(func)?;
        let end = *self.must_match(TokenKind::RightParen)?.span.end();

        Ok(Spanned(result, begin..=end.max(begin)))
    }

    pub(super) fn parse_comma_separated<T, F>(&mut self, mut func: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let mut v = vec![];

        loop {
            v.push(func(self)?);

            if self.try_match(TokenKind::Comma).is_none() {
                break;
            }
        }

        Ok(v)
    }

    /// Tries an alternative, rewinding the token stream if it fails.
    pub(super) fn speculate<T>(&mut self, func: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let mark = self.tokens.mark();
        let parameters = self.parameters;

        self.speculating += 1;
        let result = func(self);
        self.speculating -= 1;

        if let Err(error) = &result {
            tracing::trace!(at = %error.offending().text, "speculation failed, rewinding");
            self.tokens.rewind(&mark);
            self.parameters = parameters;
        }
        self.tokens.release(mark);

        result
    }

    /// Runs a rule one nesting level deeper, failing past the limit.
    pub(super) fn nested<T>(&mut self, func: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return TooDeepSnafu {
                limit: MAX_NESTING_DEPTH,
                offending: self.offending(),
            }
            .fail();
        }

        self.depth += 1;
        let result = func(self);
        self.depth -= 1;

        result
    }

    /// Whether the `n`-th token ahead, after any opening parentheses, starts a
    /// query.
    pub(super) fn looks_like_query(&mut self, mut n: usize) -> bool {
        while self.peek_nth(n) == TokenKind::LeftParen {
            n += 1;
        }

        matches!(
            self.peek_nth(n),
            TokenKind::Keyword(Keyword::SELECT | Keyword::WITH | Keyword::VALUES | Keyword::TABLE)
        )
    }

    pub(super) fn recovering(&self) -> bool {
        self.speculating == 0 && self.options.strategy == ErrorStrategy::Recover
    }

    /// The current token, as errors raised at it report it.
    pub(super) fn offending(&mut self) -> Offending {
        let token = self.current();

        Offending {
            index: self.tokens.index(),
            text: token.describe(),
            line: token.line,
            column: token.column,
            span: token.span,
        }
    }

    pub(super) fn error_expected(&mut self, expected: impl Into<String>) -> Error {
        MismatchedInputSnafu {
            expected: expected.into(),
            offending: self.offending(),
        }
        .build()
    }

    pub(super) fn no_viable_alternative(&mut self) -> Error {
        NoViableAlternativeSnafu {
            offending: self.offending(),
        }
        .build()
    }

    pub(super) fn report(&mut self, error: &Error) {
        let offending = error.offending();
        let token = self.tokens.get(offending.index).cloned();
        let (line, column) = (offending.line, offending.column);

        self.notify(line, column, &error.to_string(), token.as_ref());
    }

    pub(super) fn report_at(&mut self, token: &Token<'a>, message: &str) {
        self.notify(token.line, token.column, message, Some(token));
    }

    fn report_extraneous(&mut self, token: &Token<'a>, expected: &str) {
        let message = format!("extraneous input {} expecting {}", token.describe(), expected);
        tracing::debug!(token = token.text, "deleting extraneous token");
        self.report_at(token, &message);
    }

    pub(super) fn drain_lexer_errors(&mut self) {
        if !self.tokens.has_lexer_errors() {
            return;
        }

        for (error, index) in self.tokens.take_lexer_errors() {
            let position = error.position();
            let token = self.tokens.get(index).cloned();

            self.notify(position.line, position.column, &error.to_string(), token.as_ref());
        }
    }

    fn notify(&mut self, line: usize, column: usize, message: &str, token: Option<&Token<'_>>) {
        if self.bailed() {
            return;
        }

        self.reported += 1;
        self.listener.syntax_error(line, column, message, token);
    }

    pub(super) fn span_from(&mut self, begin: usize) -> Span {
        let end = self
            .tokens
            .lt_back()
            .map_or(begin, |token| *token.span.end());
        begin..=end.max(begin)
    }
}

/// Strips the outer quotes and resolves doubled ones.
fn unquote(text: &str, quote: char) -> String {
    let inner = text
        .strip_prefix(quote)
        .and_then(|s| s.strip_suffix(quote))
        .unwrap_or(text);
    let doubled: String = [quote, quote].iter().collect();

    inner.replace(&doubled, &quote.to_string())
}

/// Matches the current token's kind against the arms, consuming it on a
/// match and failing with a mismatched-input error otherwise.
macro_rules! match_token {
    ( $parser:ident, $expected:expr, { $( $($t:pat_param)|* $(if $cond:expr)? => $e:expr, )* } ) => {
        match $parser.peek() {
            $( $( $t )|* $(if $cond)? => {
                $parser.advance();
                $e
            } )*
            _ => return Err($parser.error_expected($expected)),
        }
    };
}

pub(super) use match_token;

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::listener::MarkerCollector,
        ast::identifier_from_str,
    };

    fn parser_for(sql: &str) -> Parser<'_, MarkerCollector> {
        Parser::new(sql).with_listener(MarkerCollector::new())
    }

    #[test]
    fn identifiers() {
        let mut parser = parser_for(r#"abc "Mixed ""Case""" `back` location"#);

        assert_eq!(parser.parse_identifier().unwrap(), identifier_from_str("abc"));
        assert_eq!(parser.parse_identifier().unwrap().0, r#"Mixed "Case""#);
        assert_eq!(parser.parse_identifier().unwrap().0, "back");
        assert_eq!(parser.parse_identifier().unwrap().0, "location");
    }

    #[test]
    fn digit_identifier() {
        let mut parser = parser_for("1abc");

        let error = parser.parse_identifier().unwrap_err();
        assert!(matches!(error, Error::DigitIdentifier { .. }));
        assert_eq!(error.offending().text, "'1abc'");
    }

    #[test]
    fn reserved_words_are_not_identifiers() {
        let mut parser = parser_for("FROM");

        let error = parser.parse_identifier().unwrap_err();
        assert_eq!(error.to_string(), "mismatched input 'FROM' expecting identifier");
    }

    #[test]
    fn extraneous_token_is_deleted() {
        let mut parser = parser_for("FROM t");

        assert_eq!(parser.parse_qualified_name().unwrap().to_string(), "t");
        assert_eq!(
            parser.listener().markers()[0].message,
            "extraneous input 'FROM' expecting identifier"
        );
    }

    #[test]
    fn missing_closer_is_conjured() {
        let mut parser = parser_for("(a, b");

        let names = parser
            .parse_comma_separated_within_parentheses(Parser::parse_identifier, false)
            .unwrap();
        assert_eq!(names.0.len(), 2);
        assert_eq!(
            parser.listener().markers()[0].message,
            "missing ')' at '<EOF>'"
        );
    }

    #[test]
    fn speculation_rewinds_and_stays_quiet() {
        let mut parser = parser_for("a b");

        let result = parser.speculate(|p| {
            p.parse_identifier()?;
            p.must_match(TokenKind::Comma)
        });

        assert!(result.is_err());
        assert!(parser.listener().is_empty());
        assert_eq!(parser.parse_identifier().unwrap().0, "a");
    }

    #[test]
    fn keyword_sequences_are_all_or_nothing() {
        let mut parser = parser_for("IF NOT x");

        assert!(!parser.match_keyword_sequence(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS]));
        assert!(parser.check_keyword(Keyword::IF));
        assert!(parser.match_keyword_sequence(&[Keyword::IF, Keyword::NOT]));
        assert_eq!(parser.parse_identifier().unwrap().0, "x");
    }

    #[test]
    fn strings() {
        let mut parser = parser_for("'it''s' 42");

        assert_eq!(parser.parse_string().unwrap(), "it's");
        assert_eq!(parser.parse_integer().unwrap(), "42");
        assert!(parser.check(TokenKind::Eof));
    }

    #[test]
    fn query_lookahead() {
        assert!(parser_for("((SELECT 1))").looks_like_query(0));
        assert!(parser_for("(VALUES 1)").looks_like_query(0));
        assert!(!parser_for("((1))").looks_like_query(0));
    }
}
