use {
    super::{common::match_token, error::Result, Parser},
    crate::listener::ErrorListener,
    ast::{
        expr::Expression,
        token::{Keyword, TokenKind},
        *,
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    /// Nesting is counted by the enclosing expression, relation or
    /// parenthesized query, not here.
    pub(super) fn parse_query(&mut self) -> Result<Query> {
        let with = match self.check_keyword(Keyword::WITH) {
            true => Some(self.parse_with()?),
            false => None,
        };
        let body = self.parse_query_term(0)?;

        let order_by = match self.match_keyword_sequence(&[Keyword::ORDER, Keyword::BY]) {
            true => self.parse_comma_separated(Self::parse_sort_item)?,
            false => vec![],
        };

        let offset = match self.try_match_keyword(Keyword::OFFSET) {
            true => {
                let count = self.parse_row_count()?;
                if !self.try_match_keyword(Keyword::ROW) {
                    self.try_match_keyword(Keyword::ROWS);
                }
                Some(count)
            }
            false => None,
        };

        let limit = match self.peek() {
            TokenKind::Keyword(Keyword::LIMIT) => {
                self.advance();
                Some(match self.try_match_keyword(Keyword::ALL) {
                    true => Limit::All,
                    false => Limit::Count(self.parse_row_count()?),
                })
            }
            TokenKind::Keyword(Keyword::FETCH) => Some(self.parse_fetch_first()?),
            _ => None,
        };

        Ok(Query {
            with,
            body,
            order_by,
            offset,
            limit,
        })
    }

    fn parse_with(&mut self) -> Result<With> {
        self.must_match_keyword(Keyword::WITH)?;
        let recursive = self.try_match_keyword(Keyword::RECURSIVE);
        let queries = self.parse_comma_separated(Self::parse_named_query)?;

        Ok(With { recursive, queries })
    }

    fn parse_named_query(&mut self) -> Result<NamedQuery> {
        let name = self.parse_identifier()?;
        let columns = match self.check(TokenKind::LeftParen) {
            true => Some(self.parse_column_aliases()?),
            false => None,
        };
        self.must_match_keyword(Keyword::AS)?;
        let query = self.nested(Self::parse_parenthesized_query)?;

        Ok(NamedQuery {
            name,
            columns,
            query: Box::new(query),
        })
    }

    pub(super) fn parse_column_aliases(&mut self) -> Result<Vec<Identifier>> {
        Ok(self
            .parse_comma_separated_within_parentheses(Self::parse_identifier, false)?
            .0)
    }

    /// Set operations; `INTERSECT` binds tighter than `UNION` and `EXCEPT`.
    fn parse_query_term(&mut self, min_prec: u8) -> Result<QueryBody> {
        let mut lhs = self.parse_query_primary()?;

        loop {
            let (op, prec) = match self.peek() {
                TokenKind::Keyword(Keyword::UNION) => (SetOperator::Union, 1),
                TokenKind::Keyword(Keyword::EXCEPT) => (SetOperator::Except, 1),
                TokenKind::Keyword(Keyword::INTERSECT) => (SetOperator::Intersect, 2),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.advance();

            let quantifier = self.parse_set_quantifier();
            let rhs = self.parse_query_term(prec + 1)?;

            lhs = QueryBody::SetOperation {
                op,
                quantifier,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }

        Ok(lhs)
    }

    fn parse_set_quantifier(&mut self) -> Option<SetQuantifier> {
        match self.peek() {
            TokenKind::Keyword(Keyword::DISTINCT) => {
                self.advance();
                Some(SetQuantifier::Distinct)
            }
            TokenKind::Keyword(Keyword::ALL) => {
                self.advance();
                Some(SetQuantifier::All)
            }
            _ => None,
        }
    }

    fn parse_query_primary(&mut self) -> Result<QueryBody> {
        Ok(match_token!(self, "'SELECT', 'TABLE', 'VALUES' or '('", {
            TokenKind::Keyword(Keyword::SELECT) => {
                QueryBody::Specification(Box::new(self.parse_query_specification()?))
            },
            TokenKind::Keyword(Keyword::TABLE) => QueryBody::Table(self.parse_qualified_name()?),
            TokenKind::Keyword(Keyword::VALUES) => {
                QueryBody::Values(self.parse_comma_separated(Self::parse_expr)?)
            },
            TokenKind::LeftParen => {
                let query = self.nested(Self::parse_query)?;
                self.must_match(TokenKind::RightParen)?;
                QueryBody::Nested(Box::new(query))
            },
        }))
    }

    /// Everything after `SELECT`.
    fn parse_query_specification(&mut self) -> Result<QuerySpecification> {
        let quantifier = match self.peek() {
            TokenKind::Keyword(Keyword::DISTINCT) => self.parse_set_quantifier(),
            TokenKind::Keyword(Keyword::ALL)
                if !matches!(
                    self.peek_nth(1),
                    TokenKind::Comma | TokenKind::Period | TokenKind::Keyword(Keyword::FROM)
                ) =>
            {
                self.parse_set_quantifier()
            }
            _ => None,
        };

        let select = self.parse_comma_separated(Self::parse_select_item)?;

        let from = match self.try_match_keyword(Keyword::FROM) {
            true => self.parse_comma_separated(Self::parse_relation)?,
            false => vec![],
        };

        let filter = match self.try_match_keyword(Keyword::WHERE) {
            true => Some(self.parse_expr()?),
            false => None,
        };

        let group_by = match self.match_keyword_sequence(&[Keyword::GROUP, Keyword::BY]) {
            true => Some(GroupBy {
                quantifier: self.parse_set_quantifier(),
                elements: self.parse_comma_separated(Self::parse_grouping_element)?,
            }),
            false => None,
        };

        let having = match self.try_match_keyword(Keyword::HAVING) {
            true => Some(self.parse_expr()?),
            false => None,
        };

        let windows = match self.try_match_keyword(Keyword::WINDOW) {
            true => self.parse_comma_separated(Self::parse_window_definition)?,
            false => vec![],
        };

        Ok(QuerySpecification {
            quantifier,
            select,
            from,
            filter,
            group_by,
            having,
            windows,
        })
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.try_match(TokenKind::Asterisk).is_some() {
            return Ok(SelectItem::Wildcard);
        }

        let expr = self.parse_expr()?;

        if self.check(TokenKind::Period) && self.peek_nth(1) == TokenKind::Asterisk {
            self.advance();
            self.advance();

            let aliases = match self.try_match_keyword(Keyword::AS) {
                true => Some(self.parse_column_aliases()?),
                false => None,
            };
            return Ok(SelectItem::QualifiedWildcard {
                prefix: expr,
                aliases,
            });
        }

        let alias = self.parse_alias()?;
        Ok(SelectItem::Expr { expr, alias })
    }

    /// A relation with any joins that follow it.
    pub(super) fn parse_relation(&mut self) -> Result<Relation> {
        let mut left = self.parse_sampled_relation()?;

        loop {
            let (join_type, natural) = match self.peek() {
                TokenKind::Keyword(Keyword::CROSS) => {
                    self.advance();
                    (JoinType::Cross, false)
                }
                TokenKind::Keyword(Keyword::NATURAL) => {
                    self.advance();
                    (self.parse_join_type(), true)
                }
                TokenKind::Keyword(
                    Keyword::JOIN
                    | Keyword::INNER
                    | Keyword::LEFT
                    | Keyword::RIGHT
                    | Keyword::FULL,
                ) => (self.parse_join_type(), false),
                _ => return Ok(left),
            };
            self.must_match_keyword(Keyword::JOIN)?;

            let right = self.parse_sampled_relation()?;
            let criteria = match join_type == JoinType::Cross || natural {
                true => None,
                false => Some(self.parse_join_criteria()?),
            };

            left = Relation::Join {
                join_type,
                natural,
                left: Box::new(left),
                right: Box::new(right),
                criteria,
            };
        }
    }

    /// `[INNER] | LEFT [OUTER] | RIGHT [OUTER] | FULL [OUTER]`
    fn parse_join_type(&mut self) -> JoinType {
        let join_type = match self.peek() {
            TokenKind::Keyword(Keyword::LEFT) => JoinType::Left,
            TokenKind::Keyword(Keyword::RIGHT) => JoinType::Right,
            TokenKind::Keyword(Keyword::FULL) => JoinType::Full,
            TokenKind::Keyword(Keyword::INNER) => {
                self.advance();
                return JoinType::Inner;
            }
            _ => return JoinType::Inner,
        };
        self.advance();
        self.try_match_keyword(Keyword::OUTER);

        join_type
    }

    fn parse_join_criteria(&mut self) -> Result<JoinCriteria> {
        Ok(match_token!(self, "'ON' or 'USING'", {
            TokenKind::Keyword(Keyword::ON) => JoinCriteria::On(self.parse_expr()?),
            TokenKind::Keyword(Keyword::USING) => JoinCriteria::Using(self.parse_column_aliases()?),
        }))
    }

    fn parse_sampled_relation(&mut self) -> Result<Relation> {
        let relation = self.parse_aliased_relation()?;

        if !self.try_match_keyword(Keyword::TABLESAMPLE) {
            return Ok(relation);
        }

        let method = match_token!(self, "'BERNOULLI' or 'SYSTEM'", {
            TokenKind::Keyword(Keyword::BERNOULLI) => SampleMethod::Bernoulli,
            TokenKind::Keyword(Keyword::SYSTEM) => SampleMethod::System,
        });
        self.must_match(TokenKind::LeftParen)?;
        let percentage = self.parse_expr()?;
        self.must_match(TokenKind::RightParen)?;

        Ok(Relation::Sampled {
            relation: Box::new(relation),
            method,
            percentage,
        })
    }

    pub(super) fn parse_aliased_relation(&mut self) -> Result<Relation> {
        let mut relation = self.nested(|p| p.parse_relation_primary())?;

        let alias = match self.parse_alias()? {
            Some(name) => {
                let columns = match self.check(TokenKind::LeftParen) {
                    true => Some(self.parse_column_aliases()?),
                    false => None,
                };
                Some(TableAlias { name, columns })
            }
            None => None,
        };

        if let Some(alias) = alias {
            match &mut relation {
                Relation::Table { alias: slot, .. }
                | Relation::Subquery { alias: slot, .. }
                | Relation::Unnest { alias: slot, .. }
                | Relation::Nested { alias: slot, .. } => *slot = Some(alias),
                Relation::Join { .. } | Relation::Sampled { .. } => {
                    relation = Relation::Nested {
                        relation: Box::new(relation),
                        alias: Some(alias),
                    }
                }
            }
        }

        Ok(relation)
    }

    fn parse_relation_primary(&mut self) -> Result<Relation> {
        match self.peek() {
            TokenKind::Keyword(Keyword::LATERAL) if self.peek_nth(1) == TokenKind::LeftParen => {
                self.advance();
                Ok(Relation::Subquery {
                    query: Box::new(self.parse_parenthesized_query()?),
                    lateral: true,
                    alias: None,
                })
            }
            TokenKind::Keyword(Keyword::UNNEST) => {
                self.advance();
                let exprs = self.parse_comma_separated_within_parentheses(Self::parse_expr, false)?;
                let with_ordinality =
                    self.match_keyword_sequence(&[Keyword::WITH, Keyword::ORDINALITY]);

                Ok(Relation::Unnest {
                    exprs: exprs.0,
                    with_ordinality,
                    alias: None,
                })
            }
            TokenKind::LeftParen => {
                if self.looks_like_query(1) {
                    match self.speculate(Self::parse_parenthesized_query) {
                        Ok(query) => {
                            return Ok(Relation::Subquery {
                                query: Box::new(query),
                                lateral: false,
                                alias: None,
                            })
                        }
                        Err(error) => {
                            return self
                                .parse_nested_relation()
                                .map_err(|e| error.furthest(e))
                        }
                    }
                }

                self.parse_nested_relation()
            }
            _ => Ok(Relation::Table {
                name: self.parse_qualified_name()?,
                period: self.parse_query_period()?,
                alias: None,
            }),
        }
    }

    /// `FOR TIMESTAMP AS OF expr` or `FOR VERSION AS OF expr` after a table name.
    fn parse_query_period(&mut self) -> Result<Option<QueryPeriod>> {
        let kind = match (self.peek(), self.peek_nth(1)) {
            (TokenKind::Keyword(Keyword::FOR), TokenKind::Keyword(Keyword::TIMESTAMP)) => {
                QueryPeriodKind::Timestamp
            }
            (TokenKind::Keyword(Keyword::FOR), TokenKind::Keyword(Keyword::VERSION)) => {
                QueryPeriodKind::Version
            }
            _ => return Ok(None),
        };
        self.advance();
        self.advance();
        self.must_match_keyword(Keyword::AS)?;
        self.must_match_keyword(Keyword::OF)?;

        Ok(Some(QueryPeriod {
            kind,
            end: self.parse_value_expr(0)?,
        }))
    }

    fn parse_nested_relation(&mut self) -> Result<Relation> {
        self.must_match(TokenKind::LeftParen)?;
        let relation = self.parse_relation()?;
        self.must_match(TokenKind::RightParen)?;

        Ok(Relation::Nested {
            relation: Box::new(relation),
            alias: None,
        })
    }

    fn parse_grouping_element(&mut self) -> Result<GroupingElement> {
        match self.peek() {
            TokenKind::Keyword(Keyword::ROLLUP) => {
                self.advance();
                let exprs = self.parse_comma_separated_within_parentheses(Self::parse_expr, true)?;
                Ok(GroupingElement::Rollup(exprs.0))
            }
            TokenKind::Keyword(Keyword::CUBE) => {
                self.advance();
                let exprs = self.parse_comma_separated_within_parentheses(Self::parse_expr, true)?;
                Ok(GroupingElement::Cube(exprs.0))
            }
            TokenKind::Keyword(Keyword::GROUPING)
                if self.peek_nth(1).is_keyword(Keyword::SETS) =>
            {
                self.advance();
                self.advance();
                let sets =
                    self.parse_comma_separated_within_parentheses(Self::parse_grouping_set, false)?;
                Ok(GroupingElement::Sets(sets.0))
            }
            _ => Ok(GroupingElement::Expr(self.parse_expr()?)),
        }
    }

    fn parse_grouping_set(&mut self) -> Result<Vec<Expression>> {
        match self.check(TokenKind::LeftParen) {
            true => Ok(self
                .parse_comma_separated_within_parentheses(Self::parse_expr, true)?
                .0),
            false => Ok(vec![self.parse_expr()?]),
        }
    }

    pub(super) fn parse_sort_item(&mut self) -> Result<SortItem> {
        let expr = self.parse_expr()?;

        let ordering = match self.peek() {
            TokenKind::Keyword(Keyword::ASC) => Some(Ordering::Asc),
            TokenKind::Keyword(Keyword::DESC) => Some(Ordering::Desc),
            _ => None,
        };
        if ordering.is_some() {
            self.advance();
        }

        let nulls = match self.try_match_keyword(Keyword::NULLS) {
            true => Some(match_token!(self, "'FIRST' or 'LAST'", {
                TokenKind::Keyword(Keyword::FIRST) => NullOrdering::First,
                TokenKind::Keyword(Keyword::LAST) => NullOrdering::Last,
            })),
            false => None,
        };

        Ok(SortItem {
            expr,
            ordering,
            nulls,
        })
    }

    fn parse_row_count(&mut self) -> Result<RowCount> {
        match self.try_match(TokenKind::Question) {
            Some(_) => {
                self.parameters += 1;
                Ok(RowCount::Parameter)
            }
            None => Ok(RowCount::Literal(self.parse_integer()?)),
        }
    }

    /// `FETCH FIRST|NEXT [n] ROW|ROWS ONLY|WITH TIES`
    fn parse_fetch_first(&mut self) -> Result<Limit> {
        self.must_match_keyword(Keyword::FETCH)?;
        match_token!(self, "'FIRST' or 'NEXT'", {
            TokenKind::Keyword(Keyword::FIRST | Keyword::NEXT) => {},
        });

        let count = match self.peek() {
            TokenKind::Integer | TokenKind::Question => Some(self.parse_row_count()?),
            _ => None,
        };
        match_token!(self, "'ROW' or 'ROWS'", {
            TokenKind::Keyword(Keyword::ROW | Keyword::ROWS) => {},
        });

        let with_ties = match_token!(self, "'ONLY' or 'WITH'", {
            TokenKind::Keyword(Keyword::ONLY) => false,
            TokenKind::Keyword(Keyword::WITH) => {
                self.must_match_keyword(Keyword::TIES)?;
                true
            },
        });

        Ok(Limit::FetchFirst { count, with_ties })
    }

    fn parse_window_definition(&mut self) -> Result<WindowDefinition> {
        let name = self.parse_identifier()?;
        self.must_match_keyword(Keyword::AS)?;
        self.must_match(TokenKind::LeftParen)?;
        let spec = self.parse_window_specification()?;
        self.must_match(TokenKind::RightParen)?;

        Ok(WindowDefinition { name, spec })
    }

    /// The inside of `OVER (...)` or `WINDOW w AS (...)`.
    pub(super) fn parse_window_specification(&mut self) -> Result<WindowSpecification> {
        let starts_clause = matches!(
            self.peek(),
            TokenKind::Keyword(
                Keyword::PARTITION | Keyword::RANGE | Keyword::ROWS | Keyword::GROUPS
            )
        );
        let existing = match self.check_identifier() && !starts_clause {
            true => Some(self.parse_identifier()?),
            false => None,
        };

        let partition_by = match self.match_keyword_sequence(&[Keyword::PARTITION, Keyword::BY]) {
            true => self.parse_comma_separated(Self::parse_expr)?,
            false => vec![],
        };
        let order_by = match self.match_keyword_sequence(&[Keyword::ORDER, Keyword::BY]) {
            true => self.parse_comma_separated(Self::parse_sort_item)?,
            false => vec![],
        };

        let unit = match self.peek() {
            TokenKind::Keyword(Keyword::RANGE) => Some(FrameUnit::Range),
            TokenKind::Keyword(Keyword::ROWS) => Some(FrameUnit::Rows),
            TokenKind::Keyword(Keyword::GROUPS) => Some(FrameUnit::Groups),
            _ => None,
        };
        let frame = match unit {
            Some(unit) => {
                self.advance();
                Some(self.parse_window_frame(unit)?)
            }
            None => None,
        };

        Ok(WindowSpecification {
            existing,
            partition_by,
            order_by,
            frame,
        })
    }

    fn parse_window_frame(&mut self, unit: FrameUnit) -> Result<WindowFrame> {
        if !self.try_match_keyword(Keyword::BETWEEN) {
            return Ok(WindowFrame {
                unit,
                start: self.parse_frame_bound()?,
                end: None,
            });
        }

        let start = self.parse_frame_bound()?;
        self.must_match_keyword(Keyword::AND)?;
        let end = self.parse_frame_bound()?;

        Ok(WindowFrame {
            unit,
            start,
            end: Some(end),
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound> {
        if self.try_match_keyword(Keyword::UNBOUNDED) {
            return Ok(match_token!(self, "'PRECEDING' or 'FOLLOWING'", {
                TokenKind::Keyword(Keyword::PRECEDING) => FrameBound::UnboundedPreceding,
                TokenKind::Keyword(Keyword::FOLLOWING) => FrameBound::UnboundedFollowing,
            }));
        }

        if self.match_keyword_sequence(&[Keyword::CURRENT, Keyword::ROW]) {
            return Ok(FrameBound::CurrentRow);
        }

        let offset = Box::new(self.parse_value_expr(0)?);
        Ok(match_token!(self, "'PRECEDING' or 'FOLLOWING'", {
            TokenKind::Keyword(Keyword::PRECEDING) => FrameBound::Preceding(offset),
            TokenKind::Keyword(Keyword::FOLLOWING) => FrameBound::Following(offset),
        }))
    }
}
