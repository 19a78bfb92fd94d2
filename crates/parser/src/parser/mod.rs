mod common;
mod data_type;
mod ddl;
mod dml;
mod error;
mod expr;
mod metadata;
mod query;

pub use self::error::{Error, Offending, Result};

use {
    self::common::match_token,
    crate::{
        lexer::Lexer,
        listener::{ConsoleErrorListener, ErrorListener},
        token_stream::TokenStream,
    },
    ast::{
        token::{Keyword, Token, TokenKind},
        Statement,
    },
};

/// Deepest nesting of expressions, queries, relations or types accepted.
pub const MAX_NESTING_DEPTH: usize = 32;

/// What the parser does after reporting a syntax error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorStrategy {
    /// Repair single-token mistakes inline and resynchronize at the next
    /// statement, reporting every error found.
    #[default]
    Recover,
    /// Stop at the first error.
    Bail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub strategy: ErrorStrategy,
}

/// Recursive-descent parser for the Athena dialect.
///
/// Syntax errors are not returned. They go to the [`ErrorListener`], and a
/// parse is valid exactly when the listener heard nothing.
pub struct Parser<'a, L = ConsoleErrorListener> {
    src: &'a str,
    tokens: TokenStream<'a>,
    listener: L,
    options: ParseOptions,
    /// Open speculative alternatives; errors are neither reported nor
    /// repaired while nonzero.
    speculating: usize,
    depth: usize,
    /// `?` parameters seen so far.
    parameters: usize,
    reported: usize,
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            tokens: TokenStream::new(Lexer::new(src)),
            listener: ConsoleErrorListener,
            options: ParseOptions::default(),
            speculating: 0,
            depth: 0,
            parameters: 0,
            reported: 0,
        }
    }
}

impl<'a, L: ErrorListener> Parser<'a, L> {
    /// Replaces the listener. Call before parsing.
    pub fn with_listener<M: ErrorListener>(self, listener: M) -> Parser<'a, M> {
        Parser {
            src: self.src,
            tokens: self.tokens,
            listener,
            options: self.options,
            speculating: self.speculating,
            depth: self.depth,
            parameters: self.parameters,
            reported: self.reported,
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Number of errors passed to the listener so far.
    pub fn error_count(&self) -> usize {
        self.reported
    }

    pub fn src(&self) -> &'a str {
        self.src
    }

    /// Every token of the input, hidden ones included.
    pub fn tokens(&mut self) -> &[Token<'a>] {
        self.tokens.fill()
    }

    /// Parses `statement ';'? EOF`.
    ///
    /// Returns the tree whenever the statement rule completed, possibly after
    /// inline repairs; check the listener to tell whether the input was valid.
    pub fn single_statement(&mut self) -> Option<Statement> {
        let span = tracing::debug_span!("single_statement", len = self.src.len());
        let _enter = span.enter();

        let statement = match self.parse_statement() {
            Ok(statement) => {
                self.try_match(TokenKind::Semicolon);
                if self.peek() != TokenKind::Eof {
                    let token = self.current();
                    let message = format!("extraneous input {} expecting <EOF>", token.describe());
                    self.report_at(&token, &message);
                }
                Some(statement)
            }
            Err(error) => {
                self.report(&error);
                None
            }
        };
        self.finish();

        tracing::debug!(errors = self.reported, "parsed single statement");
        statement
    }

    /// Parses a `;` separated script, resynchronizing after each bad statement.
    pub fn statements(&mut self) -> Vec<Statement> {
        let span = tracing::debug_span!("statements", len = self.src.len());
        let _enter = span.enter();

        let statements = self.by_ref().collect::<Vec<_>>();

        tracing::debug!(
            statements = statements.len(),
            errors = self.reported,
            "parsed script"
        );
        statements
    }

    fn bailed(&self) -> bool {
        self.options.strategy == ErrorStrategy::Bail && self.reported > 0
    }

    /// Lexes the remaining input so that every lexical error is reported.
    fn finish(&mut self) {
        self.tokens.fill();
        self.drain_lexer_errors();
    }

    /// Skips to the next `;` or the end of input.
    fn synchronize(&mut self) {
        let mut skipped = 0;
        while !matches!(self.peek(), TokenKind::Semicolon | TokenKind::Eof) {
            self.advance();
            skipped += 1;
        }

        tracing::debug!(skipped, "resynchronized at statement boundary");
    }

    fn parse_statement(&mut self) -> Result<Statement> {
        if self.looks_like_query(0) {
            return Ok(Statement::Query(Box::new(self.parse_query()?)));
        }

        match_token!(self, "statement", {
            TokenKind::Keyword(Keyword::USE) => self.parse_use(),
            TokenKind::Keyword(Keyword::CREATE) => self.parse_create(),
            TokenKind::Keyword(Keyword::DROP) => self.parse_drop(),
            TokenKind::Keyword(Keyword::ALTER) => self.parse_alter(),
            TokenKind::Keyword(Keyword::MSCK) => self.parse_msck_repair(),
            TokenKind::Keyword(Keyword::INSERT) => self.parse_insert(),
            TokenKind::Keyword(Keyword::DELETE) => self.parse_delete(),
            TokenKind::Keyword(Keyword::UPDATE) => self.parse_update(),
            TokenKind::Keyword(Keyword::MERGE) => self.parse_merge(),
            TokenKind::Keyword(Keyword::OPTIMIZE) => self.parse_optimize(),
            TokenKind::Keyword(Keyword::VACUUM) => self.parse_vacuum(),
            TokenKind::Keyword(Keyword::UNLOAD) => self.parse_unload(),
            TokenKind::Keyword(Keyword::SHOW) => self.parse_show(),
            TokenKind::Keyword(Keyword::DESCRIBE | Keyword::DESC) => self.parse_describe(),
            TokenKind::Keyword(Keyword::EXPLAIN) => self.parse_explain(),
            TokenKind::Keyword(Keyword::PREPARE) => self.parse_prepare(),
            TokenKind::Keyword(Keyword::EXECUTE) => self.parse_execute(),
            TokenKind::Keyword(Keyword::DEALLOCATE) => self.parse_deallocate(),
        })
    }
}

impl<'a, L: ErrorListener> Iterator for Parser<'a, L> {
    type Item = Statement;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.skip_semicolons();

            if self.peek() == TokenKind::Eof || self.bailed() {
                self.finish();
                return None;
            }

            let begin = *self.current().span.start();
            match self.parse_statement() {
                Ok(statement) => {
                    debug_assert_eq!(self.tokens.open_marks(), 0);
                    let span = self.span_from(begin);
                    tracing::debug!(?span, "parsed statement");

                    if !matches!(self.peek(), TokenKind::Semicolon | TokenKind::Eof) {
                        let token = self.current();
                        let message = format!("extraneous input {} expecting ';'", token.describe());
                        self.report_at(&token, &message);
                        self.synchronize();
                    }
                    return Some(statement);
                }
                Err(error) => {
                    self.report(&error);
                    self.synchronize();
                }
            }
        }
    }
}
