use {
    super::{common::match_token, error::Result, Parser},
    crate::listener::ErrorListener,
    ast::{
        expr::*,
        token::{Keyword, TokenKind},
        QualifiedName, Query,
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    pub(super) fn parse_expr(&mut self) -> Result<Expression> {
        self.nested(|p| p.parse_boolean_expr(0))
    }

    fn parse_boolean_expr(&mut self, min_prec: u8) -> Result<Expression> {
        let mut expr = match self.try_match_operator::<LogicalNot>(min_prec) {
            Some(op) => op.build_expr(self.nested(|p| p.parse_boolean_expr(op.prec()))?),
            None => self.parse_predicated()?,
        };

        while let Some(op) = self.try_match_operator::<LogicalOperator>(min_prec) {
            expr = op.build_expr(expr, self.parse_boolean_expr(op.assoc() + op.prec())?);
        }

        Ok(expr)
    }

    /// A value expression followed by at most one predicate. Comparisons do
    /// not chain.
    fn parse_predicated(&mut self) -> Result<Expression> {
        let expr = self.parse_value_expr(0)?;

        if let Some(op) = <ComparisonOperator as Operator>::from(&self.peek()) {
            self.advance();
            return self.parse_comparison(op, expr);
        }

        let negated = self.check_keyword(Keyword::NOT)
            && matches!(
                self.peek_nth(1),
                TokenKind::Keyword(Keyword::BETWEEN | Keyword::IN | Keyword::LIKE)
            );
        if negated {
            self.advance();
        }

        let expr = Box::new(expr);
        Ok(match self.peek() {
            TokenKind::Keyword(Keyword::BETWEEN) => {
                self.advance();
                let low = Box::new(self.parse_value_expr(0)?);
                self.must_match_keyword(Keyword::AND)?;
                let high = Box::new(self.parse_value_expr(0)?);

                Expression::Between {
                    expr,
                    low,
                    high,
                    negated,
                }
            }
            TokenKind::Keyword(Keyword::IN) => {
                self.advance();
                match self.looks_like_query(0) {
                    true => Expression::InSubquery {
                        expr,
                        subquery: Box::new(self.parse_parenthesized_query()?),
                        negated,
                    },
                    false => Expression::InList {
                        expr,
                        list: self
                            .parse_comma_separated_within_parentheses(Self::parse_expr, false)?
                            .0,
                        negated,
                    },
                }
            }
            TokenKind::Keyword(Keyword::LIKE) => {
                self.advance();
                let pattern = Box::new(self.parse_value_expr(0)?);
                let escape = match self.try_match_keyword(Keyword::ESCAPE) {
                    true => Some(Box::new(self.parse_value_expr(0)?)),
                    false => None,
                };

                Expression::Like {
                    expr,
                    pattern,
                    escape,
                    negated,
                }
            }
            TokenKind::Keyword(Keyword::IS) => {
                self.advance();
                let negated = self.try_match_keyword(Keyword::NOT);

                match_token!(self, "'NULL' or 'DISTINCT'", {
                    TokenKind::Keyword(Keyword::NULL) => Expression::IsNull { expr, negated },
                    TokenKind::Keyword(Keyword::DISTINCT) => {
                        self.must_match_keyword(Keyword::FROM)?;
                        Expression::IsDistinctFrom {
                            lhs: expr,
                            rhs: Box::new(self.parse_value_expr(0)?),
                            negated,
                        }
                    },
                })
            }
            _ => *expr,
        })
    }

    fn parse_comparison(&mut self, op: ComparisonOperator, lhs: Expression) -> Result<Expression> {
        let quantifier = match self.peek() {
            TokenKind::Keyword(Keyword::ALL) => Some(ComparisonQuantifier::All),
            TokenKind::Keyword(Keyword::ANY) => Some(ComparisonQuantifier::Any),
            TokenKind::Keyword(Keyword::SOME) => Some(ComparisonQuantifier::Some),
            _ => None,
        };

        match quantifier {
            Some(quantifier) if self.looks_like_query(1) => {
                self.advance();
                Ok(Expression::QuantifiedComparison {
                    op,
                    quantifier,
                    lhs: Box::new(lhs),
                    subquery: Box::new(self.parse_parenthesized_query()?),
                })
            }
            _ => Ok(op.build_expr(lhs, self.parse_value_expr(0)?)),
        }
    }

    pub(super) fn parse_value_expr(&mut self, min_prec: u8) -> Result<Expression> {
        let mut expr = match self.try_match_operator::<PrefixOperator>(min_prec) {
            Some(op) => op.build_expr(self.nested(|p| p.parse_value_expr(op.prec()))?),
            None => self.parse_postfix_expr()?,
        };

        while let Some(op) = self.try_match_operator::<ArithmeticOperator>(min_prec) {
            expr = op.build_expr(expr, self.parse_value_expr(op.assoc() + op.prec())?);
        }

        Ok(expr)
    }

    fn try_match_operator<T: Operator>(&mut self, min_prec: u8) -> Option<T> {
        let op = T::from(&self.peek()).filter(|op| op.prec() >= min_prec);

        if op.is_some() {
            self.advance();
        }

        op
    }

    /// Subscripts, field references and `AT TIME ZONE`.
    fn parse_postfix_expr(&mut self) -> Result<Expression> {
        let mut expr = self.parse_primary_expr()?;

        loop {
            expr = match self.peek() {
                TokenKind::LeftBracket => {
                    self.advance();
                    let index = self.parse_value_expr(0)?;
                    self.must_match(TokenKind::RightBracket)?;

                    Expression::Subscript {
                        base: Box::new(expr),
                        index: Box::new(index),
                    }
                }
                // `t.*` belongs to the select item
                TokenKind::Period if self.peek_nth(1) != TokenKind::Asterisk => {
                    self.advance();
                    Expression::Dereference {
                        base: Box::new(expr),
                        field: self.parse_identifier()?,
                    }
                }
                TokenKind::Keyword(Keyword::AT)
                    if self.peek_nth(1).is_keyword(Keyword::TIME)
                        && self.peek_nth(2).is_keyword(Keyword::ZONE) =>
                {
                    self.advance();
                    self.advance();
                    self.advance();

                    Expression::AtTimeZone {
                        expr: Box::new(expr),
                        zone: Box::new(self.parse_primary_expr()?),
                    }
                }
                _ => return Ok(expr),
            };
        }
    }

    fn parse_primary_expr(&mut self) -> Result<Expression> {
        let next = self.peek_nth(1);

        match self.peek() {
            TokenKind::Keyword(Keyword::NULL) => {
                self.advance();
                Ok(Literal::Null.into())
            }
            TokenKind::Keyword(Keyword::TRUE) => {
                self.advance();
                Ok(Literal::Boolean(true).into())
            }
            TokenKind::Keyword(Keyword::FALSE) => {
                self.advance();
                Ok(Literal::Boolean(false).into())
            }
            TokenKind::Integer | TokenKind::Decimal | TokenKind::Double => self.parse_number(),
            TokenKind::String | TokenKind::UnicodeString => {
                Ok(Literal::String(self.parse_string_literal()?).into())
            }
            TokenKind::BinaryLiteral => {
                let token = self.advance();
                Ok(Literal::Binary(Self::string_from_token(&token)).into())
            }
            TokenKind::Question => {
                self.advance();
                self.parameters += 1;
                Ok(Expression::Parameter(self.parameters - 1))
            }
            TokenKind::LeftParen => self.parse_parenthesized_expr(),
            TokenKind::Keyword(Keyword::CASE) => self.parse_case(),
            TokenKind::Keyword(Keyword::CAST) => self.parse_cast(false),
            TokenKind::Keyword(Keyword::TRY_CAST) if next == TokenKind::LeftParen => {
                self.parse_cast(true)
            }
            TokenKind::Keyword(Keyword::EXISTS) => {
                self.advance();
                Ok(Expression::Exists(Box::new(
                    self.parse_parenthesized_query()?,
                )))
            }
            TokenKind::Keyword(Keyword::ARRAY) if next == TokenKind::LeftBracket => {
                self.parse_array_constructor()
            }
            TokenKind::Keyword(Keyword::ROW) if next == TokenKind::LeftParen => {
                self.advance();
                let fields = self.parse_comma_separated_within_parentheses(Self::parse_expr, false)?;
                Ok(Expression::Row(fields.0))
            }
            TokenKind::Keyword(Keyword::INTERVAL)
                if matches!(
                    next,
                    TokenKind::String | TokenKind::Plus | TokenKind::Minus
                ) =>
            {
                Ok(Expression::Interval(self.parse_interval()?))
            }
            TokenKind::Keyword(Keyword::EXTRACT) => self.parse_extract(),
            TokenKind::Keyword(Keyword::POSITION) if next == TokenKind::LeftParen => {
                self.parse_special_form_or_call(Self::parse_position)
            }
            TokenKind::Keyword(Keyword::SUBSTRING) if next == TokenKind::LeftParen => {
                self.parse_special_form_or_call(Self::parse_substring)
            }
            TokenKind::Keyword(Keyword::TRIM) => self.parse_trim(),
            TokenKind::Keyword(Keyword::NORMALIZE) => self.parse_normalize(),
            TokenKind::Keyword(Keyword::GROUPING) => {
                self.advance();
                let columns =
                    self.parse_comma_separated_within_parentheses(Self::parse_qualified_name, true)?;
                Ok(Expression::Grouping(columns.0))
            }
            TokenKind::Keyword(keyword) if current_time(keyword).is_some() => {
                self.parse_current_time(keyword)
            }
            kind if Self::is_identifier(kind) => self.parse_identifier_expr(),
            _ => Err(self.no_viable_alternative()),
        }
    }

    fn parse_number(&mut self) -> Result<Expression> {
        let token = self.advance();

        let literal = match token.kind {
            TokenKind::Integer => match token.text.parse::<i64>() {
                Ok(value) => Literal::Integer(value),
                Err(_) => Literal::Decimal(token.text.to_string()),
            },
            TokenKind::Double => Literal::Double(token.text.parse().unwrap_or(f64::INFINITY)),
            _ => Literal::Decimal(token.text.to_string()),
        };

        Ok(literal.into())
    }

    /// `'...'` or `U&'...' [UESCAPE '...']`
    fn parse_string_literal(&mut self) -> Result<String> {
        let token = self.advance();

        if token.kind == TokenKind::UnicodeString && self.try_match_keyword(Keyword::UESCAPE) {
            self.parse_string()?;
        }

        Ok(Self::string_from_token(&token))
    }

    /// A name, a field reference, a function call, a typed literal or a
    /// single-parameter lambda.
    fn parse_identifier_expr(&mut self) -> Result<Expression> {
        match self.peek_nth(1) {
            TokenKind::Arrow => {
                let param = self.parse_identifier()?;
                self.advance();

                return Ok(Expression::Lambda {
                    params: vec![param],
                    body: Box::new(self.parse_expr()?),
                });
            }
            TokenKind::String => {
                let type_name = self.parse_identifier()?;
                return Ok(Expression::TypedLiteral {
                    type_name,
                    value: self.parse_string()?,
                });
            }
            _ => {}
        }

        // look past `a.b.c` for an opening parenthesis
        let mut n = 0;
        while self.peek_nth(n + 1) == TokenKind::Period && Self::is_identifier(self.peek_nth(n + 2))
        {
            n += 2;
        }

        match self.peek_nth(n + 1) {
            TokenKind::LeftParen => {
                let name = self.parse_qualified_name()?;
                self.parse_function_call(name)
            }
            _ => Ok(Expression::Identifier(self.parse_identifier()?)),
        }
    }

    fn parse_function_call(&mut self, name: QualifiedName) -> Result<Expression> {
        let mut call = FunctionCall::new(name, vec![]);

        self.must_match(TokenKind::LeftParen)?;
        if self.try_match(TokenKind::Asterisk).is_some() {
            call.wildcard = true;
        } else if !self.check(TokenKind::RightParen) {
            if self.try_match_keyword(Keyword::DISTINCT) {
                call.distinct = true;
            } else if self.check_keyword(Keyword::ALL)
                && !matches!(
                    self.peek_nth(1),
                    TokenKind::Comma | TokenKind::RightParen | TokenKind::Period
                )
            {
                self.advance();
            }

            call.args = self.parse_comma_separated(Self::parse_expr)?;

            if self.match_keyword_sequence(&[Keyword::ORDER, Keyword::BY]) {
                call.order_by = self.parse_comma_separated(Self::parse_sort_item)?;
            }
        }
        self.must_match(TokenKind::RightParen)?;

        if self.match_keyword_sequence(&[Keyword::WITHIN, Keyword::GROUP]) {
            self.must_match(TokenKind::LeftParen)?;
            self.must_match_keyword(Keyword::ORDER)?;
            self.must_match_keyword(Keyword::BY)?;
            call.within_group = self.parse_comma_separated(Self::parse_sort_item)?;
            self.must_match(TokenKind::RightParen)?;
        }

        if self.check_keyword(Keyword::FILTER) && self.peek_nth(1) == TokenKind::LeftParen {
            self.advance();
            self.advance();
            self.must_match_keyword(Keyword::WHERE)?;
            call.filter = Some(Box::new(self.parse_expr()?));
            self.must_match(TokenKind::RightParen)?;
        }

        if self.match_keyword_sequence(&[Keyword::IGNORE, Keyword::NULLS]) {
            call.null_treatment = Some(NullTreatment::Ignore);
        } else if self.match_keyword_sequence(&[Keyword::RESPECT, Keyword::NULLS]) {
            call.null_treatment = Some(NullTreatment::Respect);
        }

        if self.try_match_keyword(Keyword::OVER) {
            call.over = Some(match self.check(TokenKind::LeftParen) {
                true => {
                    self.advance();
                    let spec = self.parse_window_specification()?;
                    self.must_match(TokenKind::RightParen)?;
                    Window::Specification(spec)
                }
                false => Window::Named(self.parse_identifier()?),
            });
        }

        Ok(Expression::FunctionCall(call))
    }

    /// A lambda, a subquery, a row constructor or a parenthesized expression.
    fn parse_parenthesized_expr(&mut self) -> Result<Expression> {
        if let Some(count) = self.lambda_parameters_ahead() {
            self.advance();
            let mut params = Vec::with_capacity(count);
            for _ in 0..count {
                params.push(self.parse_identifier()?);
                self.try_match(TokenKind::Comma);
            }
            self.must_match(TokenKind::RightParen)?;
            self.must_match(TokenKind::Arrow)?;

            return Ok(Expression::Lambda {
                params,
                body: Box::new(self.parse_expr()?),
            });
        }

        if self.looks_like_query(1) {
            match self.speculate(Self::parse_parenthesized_query) {
                Ok(query) => return Ok(Expression::Subquery(Box::new(query))),
                Err(error) => return self.parse_row_or_expr().map_err(|e| error.furthest(e)),
            }
        }

        self.parse_row_or_expr()
    }

    /// Number of parameters if a `(a, b) ->` lambda head is next.
    fn lambda_parameters_ahead(&mut self) -> Option<usize> {
        let mut n = 1;
        let mut count = 0;

        if self.peek_nth(n) != TokenKind::RightParen {
            loop {
                if !Self::is_identifier(self.peek_nth(n)) {
                    return None;
                }
                count += 1;
                n += 1;

                match self.peek_nth(n) {
                    TokenKind::Comma => n += 1,
                    TokenKind::RightParen => break,
                    _ => return None,
                }
            }
        }

        (self.peek_nth(n + 1) == TokenKind::Arrow).then_some(count)
    }

    fn parse_row_or_expr(&mut self) -> Result<Expression> {
        self.must_match(TokenKind::LeftParen)?;
        let first = self.parse_expr()?;

        let expr = match self.try_match(TokenKind::Comma) {
            Some(_) => {
                let mut fields = vec![first];
                fields.extend(self.parse_comma_separated(Self::parse_expr)?);
                Expression::Row(fields)
            }
            None => first,
        };
        self.must_match(TokenKind::RightParen)?;

        Ok(expr)
    }

    pub(super) fn parse_parenthesized_query(&mut self) -> Result<Query> {
        self.must_match(TokenKind::LeftParen)?;
        let query = self.parse_query()?;
        self.must_match(TokenKind::RightParen)?;

        Ok(query)
    }

    fn parse_case(&mut self) -> Result<Expression> {
        self.must_match_keyword(Keyword::CASE)?;

        let operand = match self.check_keyword(Keyword::WHEN) {
            true => None,
            false => Some(Box::new(self.parse_expr()?)),
        };

        let mut whens = vec![];
        loop {
            self.must_match_keyword(Keyword::WHEN)?;
            let condition = self.parse_expr()?;
            self.must_match_keyword(Keyword::THEN)?;
            let result = self.parse_expr()?;
            whens.push(WhenClause { condition, result });

            if !self.check_keyword(Keyword::WHEN) {
                break;
            }
        }

        let default = match self.try_match_keyword(Keyword::ELSE) {
            true => Some(Box::new(self.parse_expr()?)),
            false => None,
        };
        self.must_match_keyword(Keyword::END)?;

        Ok(Expression::Case {
            operand,
            whens,
            default,
        })
    }

    fn parse_cast(&mut self, safe: bool) -> Result<Expression> {
        self.advance();
        self.must_match(TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.must_match_keyword(Keyword::AS)?;
        let data_type = self.parse_data_type()?;
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::Cast {
            expr: Box::new(expr),
            data_type,
            safe,
        })
    }

    fn parse_array_constructor(&mut self) -> Result<Expression> {
        self.must_match_keyword(Keyword::ARRAY)?;
        self.must_match(TokenKind::LeftBracket)?;

        let elements = match self.check(TokenKind::RightBracket) {
            true => vec![],
            false => self.parse_comma_separated(Self::parse_expr)?,
        };
        self.must_match(TokenKind::RightBracket)?;

        Ok(Expression::Array(elements))
    }

    pub(super) fn parse_interval(&mut self) -> Result<Interval> {
        self.must_match_keyword(Keyword::INTERVAL)?;

        let negative = match self.peek() {
            TokenKind::Minus => {
                self.advance();
                true
            }
            TokenKind::Plus => {
                self.advance();
                false
            }
            _ => false,
        };
        let value = self.parse_string()?;
        let from = self.parse_interval_field()?;
        let to = match self.try_match_keyword(Keyword::TO) {
            true => Some(self.parse_interval_field()?),
            false => None,
        };

        Ok(Interval {
            negative,
            value,
            from,
            to,
        })
    }

    fn parse_extract(&mut self) -> Result<Expression> {
        self.must_match_keyword(Keyword::EXTRACT)?;
        self.must_match(TokenKind::LeftParen)?;
        let field = self.parse_identifier()?;
        self.must_match_keyword(Keyword::FROM)?;
        let expr = self.parse_value_expr(0)?;
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::Extract {
            field,
            expr: Box::new(expr),
        })
    }

    /// Tries the keyword form of `POSITION` or `SUBSTRING` and falls back to a
    /// plain function call.
    fn parse_special_form_or_call(
        &mut self,
        special_form: fn(&mut Self) -> Result<Expression>,
    ) -> Result<Expression> {
        match self.speculate(special_form) {
            Ok(expr) => Ok(expr),
            Err(error) => {
                let name = QualifiedName(vec![self.parse_identifier()?]);
                self.parse_function_call(name).map_err(|e| error.furthest(e))
            }
        }
    }

    /// `POSITION(needle IN haystack)`
    fn parse_position(&mut self) -> Result<Expression> {
        self.advance();
        self.must_match(TokenKind::LeftParen)?;
        let needle = self.parse_value_expr(0)?;
        self.must_match_keyword(Keyword::IN)?;
        let haystack = self.parse_value_expr(0)?;
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::Position {
            needle: Box::new(needle),
            haystack: Box::new(haystack),
        })
    }

    /// `SUBSTRING(expr FROM start [FOR length])`
    fn parse_substring(&mut self) -> Result<Expression> {
        self.advance();
        self.must_match(TokenKind::LeftParen)?;
        let expr = self.parse_value_expr(0)?;
        self.must_match_keyword(Keyword::FROM)?;
        let from = self.parse_value_expr(0)?;
        let length = match self.try_match_keyword(Keyword::FOR) {
            true => Some(Box::new(self.parse_value_expr(0)?)),
            false => None,
        };
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::Substring {
            expr: Box::new(expr),
            from: Box::new(from),
            length,
        })
    }

    /// `TRIM([BOTH|LEADING|TRAILING] [chars] FROM source)` or
    /// `TRIM(source [, chars])`
    fn parse_trim(&mut self) -> Result<Expression> {
        self.must_match_keyword(Keyword::TRIM)?;
        self.must_match(TokenKind::LeftParen)?;

        let spec = match self.peek() {
            TokenKind::Keyword(Keyword::BOTH) => Some(TrimSpec::Both),
            TokenKind::Keyword(Keyword::LEADING) => Some(TrimSpec::Leading),
            TokenKind::Keyword(Keyword::TRAILING) => Some(TrimSpec::Trailing),
            _ => None,
        };
        if spec.is_some() {
            self.advance();
        }

        let (chars, source) = match spec {
            Some(_) if self.try_match_keyword(Keyword::FROM) => (None, self.parse_value_expr(0)?),
            Some(_) => {
                let chars = self.parse_value_expr(0)?;
                self.must_match_keyword(Keyword::FROM)?;
                (Some(chars), self.parse_value_expr(0)?)
            }
            None => {
                let first = self.parse_value_expr(0)?;
                if self.try_match_keyword(Keyword::FROM) {
                    (Some(first), self.parse_value_expr(0)?)
                } else if self.try_match(TokenKind::Comma).is_some() {
                    (Some(self.parse_value_expr(0)?), first)
                } else {
                    (None, first)
                }
            }
        };
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::Trim {
            spec,
            chars: chars.map(Box::new),
            source: Box::new(source),
        })
    }

    /// `NORMALIZE(value [, form])`, kept as a function call.
    fn parse_normalize(&mut self) -> Result<Expression> {
        let token = self.advance();
        let name = QualifiedName(vec![Self::identifier_from_token(&token)]);

        self.must_match(TokenKind::LeftParen)?;
        let mut args = vec![self.parse_value_expr(0)?];
        if self.try_match(TokenKind::Comma).is_some() {
            args.push(Expression::Identifier(self.parse_identifier()?));
        }
        self.must_match(TokenKind::RightParen)?;

        Ok(Expression::FunctionCall(FunctionCall::new(name, args)))
    }

    fn parse_current_time(&mut self, keyword: Keyword) -> Result<Expression> {
        self.advance();

        let kind = current_time(keyword).unwrap_or(CurrentTime::Date);
        let takes_precision = matches!(
            kind,
            CurrentTime::Time
                | CurrentTime::Timestamp
                | CurrentTime::LocalTime
                | CurrentTime::LocalTimestamp
        );

        let precision = match takes_precision && self.check(TokenKind::LeftParen) {
            true => {
                self.advance();
                let precision = self.parse_integer()?;
                self.must_match(TokenKind::RightParen)?;
                Some(precision)
            }
            false => None,
        };

        Ok(Expression::CurrentTime { kind, precision })
    }
}

fn current_time(keyword: Keyword) -> Option<CurrentTime> {
    Some(match keyword {
        Keyword::CURRENT_DATE => CurrentTime::Date,
        Keyword::CURRENT_TIME => CurrentTime::Time,
        Keyword::CURRENT_TIMESTAMP => CurrentTime::Timestamp,
        Keyword::LOCALTIME => CurrentTime::LocalTime,
        Keyword::LOCALTIMESTAMP => CurrentTime::LocalTimestamp,
        Keyword::CURRENT_USER => CurrentTime::User,
        Keyword::CURRENT_CATALOG => CurrentTime::Catalog,
        Keyword::CURRENT_SCHEMA => CurrentTime::Schema,
        Keyword::CURRENT_PATH => CurrentTime::Path,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::listener::MarkerCollector,
        ast::{identifier_from_str, Spanned},
    };

    fn parse(input: &str) -> Expression {
        let mut parser = Parser::new(input).with_listener(MarkerCollector::new());
        let expr = parser.parse_expr().unwrap();

        assert!(parser.check(TokenKind::Eof), "unconsumed input in {input:?}");
        assert!(parser.listener().is_empty());
        expr
    }

    fn ident(name: &str) -> Expression {
        Expression::Identifier(identifier_from_str(name))
    }

    fn int(value: i64) -> Expression {
        Literal::Integer(value).into()
    }

    #[test]
    fn it_works() {
        let input = "a + b.c + 1 >= -3.5";
        let expected_output = ComparisonOperator::GreaterThanOrEqual.build_expr(
            ArithmeticOperator::Add.build_expr(
                ArithmeticOperator::Add.build_expr(
                    ident("a"),
                    Expression::Dereference {
                        base: Box::new(ident("b")),
                        field: identifier_from_str("c"),
                    },
                ),
                int(1),
            ),
            PrefixOperator::Negative.build_expr(Literal::Decimal("3.5".to_string()).into()),
        );

        assert_eq!(parse(input), expected_output);
    }

    #[test]
    fn precedence() {
        let expected_output = LogicalOperator::Or.build_expr(
            LogicalOperator::And.build_expr(
                ident("a"),
                LogicalNot::Not.build_expr(ident("b")),
            ),
            ComparisonOperator::Equal.build_expr(
                ArithmeticOperator::Add.build_expr(
                    int(1),
                    ArithmeticOperator::Multiply.build_expr(int(2), int(3)),
                ),
                ArithmeticOperator::Concat.build_expr(ident("x"), ident("y")),
            ),
        );

        assert_eq!(parse("a AND NOT b OR 1 + 2 * 3 = x || y"), expected_output);
    }

    #[test]
    fn comparisons_do_not_chain() {
        let mut parser = Parser::new("a = b = c").with_listener(MarkerCollector::new());

        parser.parse_expr().unwrap();
        assert!(parser.check(TokenKind::Equal));
    }

    #[test]
    fn predicates() {
        assert_eq!(
            parse("x NOT BETWEEN 1 AND 2"),
            Expression::Between {
                expr: Box::new(ident("x")),
                low: Box::new(int(1)),
                high: Box::new(int(2)),
                negated: true,
            }
        );
        assert_eq!(
            parse("x IN (1, 2)"),
            Expression::InList {
                expr: Box::new(ident("x")),
                list: vec![int(1), int(2)],
                negated: false,
            }
        );
        assert_eq!(
            parse("name NOT LIKE 'a%' ESCAPE '\\'"),
            Expression::Like {
                expr: Box::new(ident("name")),
                pattern: Box::new(Literal::String("a%".to_string()).into()),
                escape: Some(Box::new(Literal::String("\\".to_string()).into())),
                negated: true,
            }
        );
        assert_eq!(
            parse("x IS NOT NULL"),
            Expression::IsNull {
                expr: Box::new(ident("x")),
                negated: true,
            }
        );
        assert!(matches!(
            parse("a IS DISTINCT FROM b"),
            Expression::IsDistinctFrom { negated: false, .. }
        ));
        assert!(matches!(
            parse("x IN (SELECT id FROM t)"),
            Expression::InSubquery { .. }
        ));
        assert!(matches!(
            parse("x > ALL (SELECT id FROM t)"),
            Expression::QuantifiedComparison {
                quantifier: ComparisonQuantifier::All,
                ..
            }
        ));
    }

    #[test]
    fn literals() {
        assert_eq!(parse("NULL"), Literal::Null.into());
        assert_eq!(parse("'it''s'"), Literal::String("it's".to_string()).into());
        assert_eq!(parse("1e3"), Literal::Double(1000.0).into());
        assert_eq!(
            parse("99999999999999999999"),
            Literal::Decimal("99999999999999999999".to_string()).into()
        );
        assert_eq!(parse("X'0F'"), Literal::Binary("0F".to_string()).into());
        assert_eq!(
            parse("DATE '2023-01-01'"),
            Expression::TypedLiteral {
                type_name: identifier_from_str("DATE"),
                value: "2023-01-01".to_string(),
            }
        );
        assert_eq!(
            parse("INTERVAL '3' DAY"),
            Expression::Interval(Interval {
                negative: false,
                value: "3".to_string(),
                from: ast::data_type::IntervalField::Day,
                to: None,
            })
        );
        assert_eq!(
            parse("CURRENT_TIMESTAMP(3)"),
            Expression::CurrentTime {
                kind: CurrentTime::Timestamp,
                precision: Some("3".to_string()),
            }
        );
    }

    #[test]
    fn parameters_are_numbered() {
        assert_eq!(
            parse("? + ?"),
            ArithmeticOperator::Add.build_expr(Expression::Parameter(0), Expression::Parameter(1))
        );
    }

    #[test]
    fn function_calls() {
        let Expression::FunctionCall(call) =
            parse("count(DISTINCT x) FILTER (WHERE x > 0) OVER (PARTITION BY y ORDER BY z)")
        else {
            panic!("not a function call");
        };

        assert!(call.distinct);
        assert_eq!(call.args, vec![ident("x")]);
        assert!(call.filter.is_some());
        assert!(matches!(call.over, Some(Window::Specification(_))));

        let Expression::FunctionCall(call) = parse("count(*)") else {
            panic!("not a function call");
        };
        assert!(call.wildcard);

        let Expression::FunctionCall(call) = parse("my_catalog.fns.f(1)") else {
            panic!("not a function call");
        };
        assert_eq!(call.name.to_string(), "my_catalog.fns.f");

        let Expression::FunctionCall(call) =
            parse("listagg(a, ',') WITHIN GROUP (ORDER BY a DESC)")
        else {
            panic!("not a function call");
        };
        assert_eq!(call.args.len(), 2);
        assert_eq!(call.within_group.len(), 1);
        assert_eq!(call.within_group[0].ordering, Some(ast::Ordering::Desc));
    }

    #[test]
    fn special_forms() {
        assert!(matches!(
            parse("CASE WHEN a THEN 1 ELSE 2 END"),
            Expression::Case { operand: None, .. }
        ));
        assert!(matches!(
            parse("TRY_CAST(x AS decimal(10, 2))"),
            Expression::Cast { safe: true, .. }
        ));
        assert!(matches!(
            parse("SUBSTRING(s FROM 2 FOR 3)"),
            Expression::Substring { length: Some(_), .. }
        ));
        assert!(matches!(
            parse("substring(s, 2)"),
            Expression::FunctionCall(_)
        ));
        assert!(matches!(
            parse("position('a' IN s)"),
            Expression::Position { .. }
        ));
        assert!(matches!(
            parse("TRIM(LEADING 'x' FROM s)"),
            Expression::Trim {
                spec: Some(TrimSpec::Leading),
                chars: Some(_),
                ..
            }
        ));
        assert!(matches!(
            parse("EXTRACT(YEAR FROM ts)"),
            Expression::Extract { .. }
        ));
        assert!(matches!(
            parse("ts AT TIME ZONE 'UTC'"),
            Expression::AtTimeZone { .. }
        ));
        assert!(matches!(parse("ARRAY[1, 2][1]"), Expression::Subscript { .. }));
        assert!(matches!(parse("ROW(1, 'a')"), Expression::Row(_)));
        assert!(matches!(parse("(1, 'a')"), Expression::Row(_)));
        assert!(matches!(parse("EXISTS (SELECT 1)"), Expression::Exists(_)));
        assert!(matches!(parse("(SELECT 1)"), Expression::Subquery(_)));
        assert!(matches!(
            parse("((SELECT 1) + 1)"),
            Expression::Operation(Operation::Add(..))
        ));
    }

    #[test]
    fn lambdas() {
        assert_eq!(
            parse("x -> x + 1"),
            Expression::Lambda {
                params: vec![identifier_from_str("x")],
                body: Box::new(ArithmeticOperator::Add.build_expr(ident("x"), int(1))),
            }
        );

        let Expression::FunctionCall(call) = parse("reduce(a, 0, (s, x) -> s + x, s -> s)") else {
            panic!("not a function call");
        };
        assert!(matches!(&call.args[2], Expression::Lambda { params, .. } if params.len() == 2));
    }

    #[test]
    fn identifier_spans() {
        let Expression::Identifier(Spanned(name, span)) = parse("  \"Quoted\"") else {
            panic!("not an identifier");
        };

        assert_eq!(name, "Quoted");
        assert_eq!(span, 2..=9);
    }

    #[test]
    fn deep_nesting_is_an_error() {
        let input = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        let mut parser = Parser::new(&input).with_listener(MarkerCollector::new());

        let error = parser.parse_expr().unwrap_err();
        assert!(matches!(error, crate::parser::Error::TooDeep { .. }));
    }
}
