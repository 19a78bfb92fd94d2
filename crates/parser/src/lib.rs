//! Syntax checking for the Athena SQL dialect: a lexer, a recursive-descent
//! parser and the error listeners that turn syntax errors into markers.
mod char_stream;
pub mod lexer;
pub mod listener;
mod parser;
mod references;
mod token_stream;

pub use self::{
    char_stream::CharStream,
    listener::{ConsoleErrorListener, ErrorListener, MarkerCollector, SyntaxErrorMarker},
    parser::{Error, ErrorStrategy, Offending, ParseOptions, Parser, Result, MAX_NESTING_DEPTH},
    references::{referenced_tables, TableReference},
};

use {
    ast::{token::Token, Statement},
    lexer::Lexer,
};

/// The tree of a single statement together with every syntax error found.
#[derive(Debug)]
pub struct ParseOutcome {
    /// Present whenever the statement rule completed, possibly after repairs.
    pub statement: Option<Statement>,
    pub markers: Vec<SyntaxErrorMarker>,
}

impl ParseOutcome {
    pub fn is_valid(&self) -> bool {
        self.markers.is_empty()
    }
}

/// Parses `sql` as exactly one statement, optionally terminated by `;`.
pub fn parse(sql: &str) -> ParseOutcome {
    let mut parser = Parser::new(sql).with_listener(MarkerCollector::new());
    let statement = parser.single_statement();

    ParseOutcome {
        statement,
        markers: parser.into_listener().into_markers(),
    }
}

/// Syntax errors of `sql` as a single statement; empty when it is valid.
pub fn validate(sql: &str) -> Vec<SyntaxErrorMarker> {
    parse(sql).markers
}

/// Parses a `;` separated script. Statements that fail to parse are skipped
/// and leave their markers behind.
pub fn parse_script(sql: &str) -> (Vec<Statement>, Vec<SyntaxErrorMarker>) {
    let mut parser = Parser::new(sql).with_listener(MarkerCollector::new());
    let statements = parser.statements();

    (statements, parser.into_listener().into_markers())
}

/// Every token of `sql`, hidden ones included, ending with end of input.
pub fn tokenize(sql: &str) -> Vec<Token<'_>> {
    Lexer::new(sql).collect()
}

#[cfg(test)]
mod tests {
    use {super::*, ast::token::TokenKind};

    #[test]
    fn it_works() {
        let outcome = parse("SELECT a, b FROM t WHERE a > 1;");

        assert!(outcome.is_valid());
        assert!(matches!(outcome.statement, Some(Statement::Query(_))));
    }

    #[test]
    fn invalid_statement() {
        let markers = validate("SELECT FROM WHERE");

        assert!(!markers.is_empty());
        assert_eq!(markers[0].line, 1);
    }

    #[test]
    fn script() {
        let (statements, markers) = parse_script("SELECT 1; SELECT FROM; SHOW TABLES");

        assert_eq!(statements.len(), 2);
        assert_eq!(markers.len(), 1);
    }

    #[test]
    fn tokens() {
        let kinds = tokenize("SELECT 1 -- done")
            .into_iter()
            .map(|token| token.kind)
            .collect::<Vec<_>>();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Keyword(ast::token::Keyword::SELECT),
                TokenKind::Whitespace,
                TokenKind::Integer,
                TokenKind::Whitespace,
                TokenKind::LineComment,
                TokenKind::Eof,
            ]
        );
    }
}
