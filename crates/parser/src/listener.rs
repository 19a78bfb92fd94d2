use {
    ast::{token::Token, Span},
    serde::Serialize,
    std::fmt,
};

/// A syntax problem located in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxErrorMarker {
    pub message: String,
    /// 1-based.
    pub line: usize,
    /// 0-based character offset within the line.
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offending_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl fmt::Display for SyntaxErrorMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}:{} {}", self.line, self.column, self.message)
    }
}

/// Receives every syntax error of a parse, lexical ones included.
pub trait ErrorListener {
    fn syntax_error(
        &mut self,
        line: usize,
        column: usize,
        message: &str,
        offending: Option<&Token<'_>>,
    );
}

impl<L: ErrorListener + ?Sized> ErrorListener for &mut L {
    fn syntax_error(
        &mut self,
        line: usize,
        column: usize,
        message: &str,
        offending: Option<&Token<'_>>,
    ) {
        (**self).syntax_error(line, column, message, offending)
    }
}

/// Logs errors as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleErrorListener;

impl ErrorListener for ConsoleErrorListener {
    fn syntax_error(
        &mut self,
        line: usize,
        column: usize,
        message: &str,
        _offending: Option<&Token<'_>>,
    ) {
        tracing::warn!("line {line}:{column} {message}");
    }
}

/// Collects errors as markers, in the order they are reported.
#[derive(Debug, Default, Clone)]
pub struct MarkerCollector {
    markers: Vec<SyntaxErrorMarker>,
}

impl MarkerCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[SyntaxErrorMarker] {
        &self.markers
    }

    pub fn into_markers(self) -> Vec<SyntaxErrorMarker> {
        self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

impl ErrorListener for MarkerCollector {
    fn syntax_error(
        &mut self,
        line: usize,
        column: usize,
        message: &str,
        offending: Option<&Token<'_>>,
    ) {
        self.markers.push(SyntaxErrorMarker {
            message: message.to_string(),
            line,
            column,
            offending_text: offending.map(|token| match token.is_eof() {
                true => "<EOF>".to_string(),
                false => token.text.to_string(),
            }),
            span: offending.map(|token| token.span.clone()),
        });
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        ast::token::{Channel, TokenKind},
    };

    fn token(kind: TokenKind, text: &str) -> Token<'_> {
        Token {
            kind,
            text,
            span: 5..=8,
            line: 1,
            column: 5,
            channel: Channel::Default,
        }
    }

    #[test]
    fn collects_in_order() {
        let mut collector = MarkerCollector::new();
        let from = token(TokenKind::Keyword(ast::token::Keyword::FROM), "FROM");

        collector.syntax_error(1, 5, "first", Some(&from));
        collector.syntax_error(2, 0, "second", None);

        let markers = collector.into_markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].offending_text.as_deref(), Some("FROM"));
        assert_eq!(markers[0].span, Some(5..=8));
        assert_eq!(markers[1].message, "second");
        assert_eq!(markers[1].to_string(), "line 2:0 second");
    }

    fn report_eof<L: ErrorListener>(mut listener: L) {
        let eof = token(TokenKind::Eof, "");
        listener.syntax_error(1, 0, "missing ')' at '<EOF>'", Some(&eof));
    }

    #[test]
    fn borrowed_listener() {
        let mut collector = MarkerCollector::new();

        report_eof(&mut collector);
        report_eof(ConsoleErrorListener);

        assert_eq!(collector.markers().len(), 1);
        assert_eq!(collector.markers()[0].offending_text.as_deref(), Some("<EOF>"));
    }

    #[test]
    fn serialized_shape() {
        let marker = SyntaxErrorMarker {
            message: "no viable alternative at input 'x'".to_string(),
            line: 3,
            column: 4,
            offending_text: None,
            span: None,
        };

        let value = serde_json::to_value(&marker).unwrap();
        assert_eq!(value["line"], 3);
        assert_eq!(value["column"], 4);
        assert!(value.get("span").is_none());
    }
}
