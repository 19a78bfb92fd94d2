use {
    super::{common::match_token, error::Result, Parser},
    crate::listener::ErrorListener,
    ast::{
        token::{Keyword, TokenKind},
        *,
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    /// Everything after `USE`: `[catalog.]schema`.
    pub(super) fn parse_use(&mut self) -> Result<Statement> {
        let first = self.parse_identifier()?;

        match self.try_match(TokenKind::Period) {
            Some(_) => Ok(Statement::Use {
                catalog: Some(first),
                schema: self.parse_identifier()?,
            }),
            None => Ok(Statement::Use {
                catalog: None,
                schema: first,
            }),
        }
    }

    /// Everything after `SHOW`.
    pub(super) fn parse_show(&mut self) -> Result<Statement> {
        let stmt = match_token!(
            self,
            "'PARTITIONS', 'TABLES', 'SCHEMAS', 'DATABASES', 'CATALOGS', 'COLUMNS', 'CREATE', \
             'TBLPROPERTIES', 'VIEWS', 'FUNCTIONS', 'STATS' or 'SESSION'",
            {
                // Takes the table name directly; `SHOW PARTITIONS FROM t` is an error.
                TokenKind::Keyword(Keyword::PARTITIONS) => {
                    ShowStmt::Partitions(self.parse_qualified_name()?)
                },
                TokenKind::Keyword(Keyword::TABLES) => ShowStmt::Tables {
                    schema: self.parse_show_scope()?,
                    filter: self.parse_show_filter()?,
                },
                TokenKind::Keyword(Keyword::SCHEMAS | Keyword::DATABASES) => ShowStmt::Schemas {
                    catalog: match self.parse_from_or_in() {
                        true => Some(self.parse_identifier()?),
                        false => None,
                    },
                    filter: self.parse_show_filter()?,
                },
                TokenKind::Keyword(Keyword::CATALOGS) => ShowStmt::Catalogs {
                    filter: self.parse_show_filter()?,
                },
                TokenKind::Keyword(Keyword::COLUMNS) => {
                    if !self.parse_from_or_in() {
                        return Err(self.error_expected("'FROM' or 'IN'"));
                    }
                    ShowStmt::Columns {
                        table: self.parse_qualified_name()?,
                        schema: match self.parse_from_or_in() {
                            true => Some(self.parse_identifier()?),
                            false => None,
                        },
                        filter: self.parse_show_filter()?,
                    }
                },
                TokenKind::Keyword(Keyword::CREATE) => {
                    let kind = match_token!(self, "'TABLE', 'VIEW', 'SCHEMA' or 'DATABASE'", {
                        TokenKind::Keyword(Keyword::TABLE) => ShowCreateKind::Table,
                        TokenKind::Keyword(Keyword::VIEW) => ShowCreateKind::View,
                        TokenKind::Keyword(Keyword::SCHEMA | Keyword::DATABASE) => {
                            ShowCreateKind::Schema
                        },
                    });
                    ShowStmt::Create {
                        kind,
                        name: self.parse_qualified_name()?,
                    }
                },
                TokenKind::Keyword(Keyword::TBLPROPERTIES) => {
                    let table = self.parse_qualified_name()?;
                    let property = match self.try_match(TokenKind::LeftParen) {
                        Some(_) => {
                            let property = self.parse_string()?;
                            self.must_match(TokenKind::RightParen)?;
                            Some(property)
                        }
                        None => None,
                    };
                    ShowStmt::TableProperties { table, property }
                },
                TokenKind::Keyword(Keyword::VIEWS) => ShowStmt::Views {
                    schema: self.parse_show_scope()?,
                    filter: self.parse_show_filter()?,
                },
                TokenKind::Keyword(Keyword::FUNCTIONS) => ShowStmt::Functions {
                    schema: self.parse_show_scope()?,
                    filter: self.parse_show_filter()?,
                },
                TokenKind::Keyword(Keyword::STATS) => {
                    self.must_match_keyword(Keyword::FOR)?;
                    let target = match self.check(TokenKind::LeftParen) {
                        true => StatsTarget::Query(Box::new(self.parse_parenthesized_query()?)),
                        false => StatsTarget::Table(self.parse_qualified_name()?),
                    };
                    ShowStmt::Stats(target)
                },
                TokenKind::Keyword(Keyword::SESSION) => ShowStmt::Session {
                    filter: self.parse_show_filter()?,
                },
            }
        );

        Ok(Statement::Show(stmt))
    }

    fn parse_from_or_in(&mut self) -> bool {
        match self.peek() {
            TokenKind::Keyword(Keyword::FROM | Keyword::IN) => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// `[FROM | IN name]`
    fn parse_show_scope(&mut self) -> Result<Option<QualifiedName>> {
        match self.parse_from_or_in() {
            true => Ok(Some(self.parse_qualified_name()?)),
            false => Ok(None),
        }
    }

    /// `LIKE 'pattern' [ESCAPE 'c']`, or a bare Hive regular expression.
    fn parse_show_filter(&mut self) -> Result<Option<ShowFilter>> {
        if self.try_match_keyword(Keyword::LIKE) {
            let pattern = self.parse_string()?;
            let escape = match self.try_match_keyword(Keyword::ESCAPE) {
                true => Some(self.parse_string()?),
                false => None,
            };
            return Ok(Some(ShowFilter::Like { pattern, escape }));
        }

        match self.check(TokenKind::String) {
            true => Ok(Some(ShowFilter::Regex(self.parse_string()?))),
            false => Ok(None),
        }
    }

    /// Everything after `DESCRIBE` or `DESC`.
    pub(super) fn parse_describe(&mut self) -> Result<Statement> {
        let next_is_name = Self::is_identifier(self.peek_nth(1));

        match self.peek() {
            TokenKind::Keyword(Keyword::INPUT) if next_is_name => {
                self.advance();
                return Ok(Statement::DescribeInput {
                    name: self.parse_identifier()?,
                });
            }
            TokenKind::Keyword(Keyword::OUTPUT) if next_is_name => {
                self.advance();
                return Ok(Statement::DescribeOutput {
                    name: self.parse_identifier()?,
                });
            }
            _ => {}
        }

        let detail = match self.peek() {
            TokenKind::Keyword(Keyword::EXTENDED) if next_is_name => Some(DescribeDetail::Extended),
            TokenKind::Keyword(Keyword::FORMATTED) if next_is_name => {
                Some(DescribeDetail::Formatted)
            }
            _ => None,
        };
        if detail.is_some() {
            self.advance();
        }

        let table = self.parse_qualified_name()?;
        let partition = match self.try_match_keyword(Keyword::PARTITION) {
            true => Some(self.parse_partition_spec()?),
            false => None,
        };
        let column = match self.check_identifier() {
            true => Some(self.parse_qualified_name()?),
            false => None,
        };

        Ok(Statement::Describe(DescribeStmt {
            detail,
            table,
            partition,
            column,
        }))
    }

    /// Everything after `EXPLAIN`.
    pub(super) fn parse_explain(&mut self) -> Result<Statement> {
        let analyze = self.try_match_keyword(Keyword::ANALYZE);
        let verbose = self.try_match_keyword(Keyword::VERBOSE);

        let options_ahead = self.check(TokenKind::LeftParen)
            && matches!(
                self.peek_nth(1),
                TokenKind::Keyword(Keyword::FORMAT | Keyword::TYPE)
            );
        let options = match options_ahead {
            true => {
                self.parse_comma_separated_within_parentheses(Self::parse_explain_option, false)?
                    .0
            }
            false => vec![],
        };

        let statement = self.nested(|p| p.parse_statement())?;

        Ok(Statement::Explain {
            analyze,
            verbose,
            options,
            statement: Box::new(statement),
        })
    }

    fn parse_explain_option(&mut self) -> Result<ExplainOption> {
        Ok(match_token!(self, "'FORMAT' or 'TYPE'", {
            TokenKind::Keyword(Keyword::FORMAT) => ExplainOption::Format(self.parse_identifier()?),
            TokenKind::Keyword(Keyword::TYPE) => ExplainOption::Type(self.parse_identifier()?),
        }))
    }

    /// Everything after `PREPARE`: `name FROM statement`.
    pub(super) fn parse_prepare(&mut self) -> Result<Statement> {
        let name = self.parse_identifier()?;
        self.must_match_keyword(Keyword::FROM)?;
        let statement = self.nested(|p| p.parse_statement())?;

        Ok(Statement::Prepare {
            name,
            statement: Box::new(statement),
        })
    }

    /// Everything after `EXECUTE`: `name [USING expr, ...]`.
    pub(super) fn parse_execute(&mut self) -> Result<Statement> {
        let name = self.parse_identifier()?;
        let parameters = match self.try_match_keyword(Keyword::USING) {
            true => self.parse_comma_separated(Self::parse_expr)?,
            false => vec![],
        };

        Ok(Statement::Execute { name, parameters })
    }

    /// Everything after `DEALLOCATE`.
    pub(super) fn parse_deallocate(&mut self) -> Result<Statement> {
        self.must_match_keyword(Keyword::PREPARE)?;

        Ok(Statement::Deallocate {
            name: self.parse_identifier()?,
        })
    }
}
