use {
    super::{common::match_token, error::Result, Parser},
    crate::listener::ErrorListener,
    ast::{
        data_type::{DataType, DateTimeKind, IntervalField, RowField, TypeParameter},
        token::{Keyword, TokenKind},
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    pub(super) fn parse_data_type(&mut self) -> Result<DataType> {
        self.nested(|p| p.parse_data_type_no_depth())
    }

    fn parse_data_type_no_depth(&mut self) -> Result<DataType> {
        let next = self.peek_nth(1);

        match self.peek() {
            TokenKind::Keyword(Keyword::ARRAY) if next == TokenKind::LessThan => {
                self.advance();
                self.advance();
                let element = self.parse_data_type()?;
                self.must_match(TokenKind::GreaterThan)?;
                Ok(DataType::Array(Box::new(element)))
            }
            TokenKind::Keyword(Keyword::ARRAY) if next == TokenKind::LeftParen => {
                self.advance();
                self.advance();
                let element = self.parse_data_type()?;
                self.must_match(TokenKind::RightParen)?;
                Ok(DataType::Array(Box::new(element)))
            }
            TokenKind::Keyword(Keyword::MAP)
                if matches!(next, TokenKind::LessThan | TokenKind::LeftParen) =>
            {
                self.advance();
                let closer = match self.advance().kind {
                    TokenKind::LessThan => TokenKind::GreaterThan,
                    _ => TokenKind::RightParen,
                };
                let key = self.parse_data_type()?;
                self.must_match(TokenKind::Comma)?;
                let value = self.parse_data_type()?;
                self.must_match(closer)?;
                Ok(DataType::Map(Box::new(key), Box::new(value)))
            }
            TokenKind::Keyword(Keyword::STRUCT) if next == TokenKind::LessThan => {
                self.advance();
                self.advance();
                let fields = self.parse_comma_separated(Self::parse_struct_field)?;
                self.must_match(TokenKind::GreaterThan)?;
                Ok(DataType::Row(fields))
            }
            TokenKind::Keyword(Keyword::ROW) if next == TokenKind::LeftParen => {
                self.advance();
                let fields =
                    self.parse_comma_separated_within_parentheses(Self::parse_row_field, false)?;
                Ok(DataType::Row(fields.0))
            }
            TokenKind::Keyword(Keyword::TIMESTAMP) => {
                self.advance();
                self.parse_date_time(DateTimeKind::Timestamp)
            }
            TokenKind::Keyword(Keyword::TIME) => {
                self.advance();
                self.parse_date_time(DateTimeKind::Time)
            }
            TokenKind::Keyword(Keyword::DOUBLE) if next.is_keyword(Keyword::PRECISION) => {
                self.advance();
                self.advance();
                Ok(DataType::DoublePrecision)
            }
            TokenKind::Keyword(Keyword::INTERVAL) if Self::is_interval_field(next) => {
                self.advance();
                let from = self.parse_interval_field()?;
                let to = match self.try_match_keyword(Keyword::TO) {
                    true => Some(self.parse_interval_field()?),
                    false => None,
                };
                Ok(DataType::Interval { from, to })
            }
            _ => {
                let name = self.parse_identifier()?;
                let parameters = match self.check(TokenKind::LeftParen) {
                    true => {
                        self.parse_comma_separated_within_parentheses(
                            Self::parse_type_parameter,
                            false,
                        )?
                        .0
                    }
                    false => vec![],
                };
                Ok(DataType::Named { name, parameters })
            }
        }
    }

    fn parse_type_parameter(&mut self) -> Result<TypeParameter> {
        match self.peek() {
            TokenKind::Integer => Ok(TypeParameter::Number(self.parse_integer()?)),
            _ => Ok(TypeParameter::Type(self.parse_data_type()?)),
        }
    }

    /// `name: type` inside `STRUCT<...>`
    fn parse_struct_field(&mut self) -> Result<RowField> {
        let name = self.parse_identifier()?;
        self.must_match(TokenKind::Colon)?;
        let data_type = self.parse_data_type()?;

        Ok(RowField {
            name: Some(name),
            data_type,
        })
    }

    /// `[name] type` inside `ROW(...)`
    fn parse_row_field(&mut self) -> Result<RowField> {
        let (current, next) = (self.peek(), self.peek_nth(1));
        let unnamed = !Self::is_identifier(current)
            || !Self::is_identifier(next)
            || (current.is_keyword(Keyword::DOUBLE) && next.is_keyword(Keyword::PRECISION))
            || (current.is_keyword(Keyword::INTERVAL) && Self::is_interval_field(next));

        let name = match unnamed {
            true => None,
            false => Some(self.parse_identifier()?),
        };

        Ok(RowField {
            name,
            data_type: self.parse_data_type()?,
        })
    }

    /// Everything after `TIME` or `TIMESTAMP`.
    fn parse_date_time(&mut self, kind: DateTimeKind) -> Result<DataType> {
        let precision = match self.try_match(TokenKind::LeftParen) {
            Some(_) => {
                let precision = self.parse_integer()?;
                self.must_match(TokenKind::RightParen)?;
                Some(precision)
            }
            None => None,
        };

        let with_time_zone = match self.peek() {
            TokenKind::Keyword(Keyword::WITH) => {
                self.advance();
                self.must_match_keyword(Keyword::TIME)?;
                self.must_match_keyword(Keyword::ZONE)?;
                true
            }
            TokenKind::Keyword(Keyword::WITHOUT) => {
                self.advance();
                self.must_match_keyword(Keyword::TIME)?;
                self.must_match_keyword(Keyword::ZONE)?;
                false
            }
            _ => false,
        };

        Ok(DataType::DateTime {
            kind,
            precision,
            with_time_zone,
        })
    }

    fn is_interval_field(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Keyword(
                Keyword::YEAR
                    | Keyword::MONTH
                    | Keyword::DAY
                    | Keyword::HOUR
                    | Keyword::MINUTE
                    | Keyword::SECOND
            )
        )
    }

    pub(super) fn parse_interval_field(&mut self) -> Result<IntervalField> {
        Ok(match_token!(self, "'YEAR', 'MONTH', 'DAY', 'HOUR', 'MINUTE' or 'SECOND'", {
            TokenKind::Keyword(Keyword::YEAR) => IntervalField::Year,
            TokenKind::Keyword(Keyword::MONTH) => IntervalField::Month,
            TokenKind::Keyword(Keyword::DAY) => IntervalField::Day,
            TokenKind::Keyword(Keyword::HOUR) => IntervalField::Hour,
            TokenKind::Keyword(Keyword::MINUTE) => IntervalField::Minute,
            TokenKind::Keyword(Keyword::SECOND) => IntervalField::Second,
        }))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{listener::MarkerCollector, parser::Error},
        ast::identifier_from_str,
    };

    fn parse(input: &str) -> DataType {
        let mut parser = Parser::new(input).with_listener(MarkerCollector::new());
        let data_type = parser.parse_data_type().unwrap();

        assert!(parser.check(TokenKind::Eof), "unconsumed input in {input:?}");
        data_type
    }

    fn named(name: &str) -> DataType {
        DataType::Named {
            name: identifier_from_str(name),
            parameters: vec![],
        }
    }

    #[test]
    fn named_types() {
        assert_eq!(parse("bigint"), named("bigint"));
        assert_eq!(
            parse("decimal(10, 2)"),
            DataType::Named {
                name: identifier_from_str("decimal"),
                parameters: vec![
                    TypeParameter::Number("10".to_string()),
                    TypeParameter::Number("2".to_string()),
                ],
            }
        );
        assert_eq!(parse("DOUBLE PRECISION"), DataType::DoublePrecision);
        assert_eq!(parse("double"), named("double"));
    }

    #[test]
    fn hive_collections() {
        assert_eq!(
            parse("map<string,array<struct<a:int,`b c`:string>>>"),
            DataType::Map(
                Box::new(named("string")),
                Box::new(DataType::Array(Box::new(DataType::Row(vec![
                    RowField {
                        name: Some(identifier_from_str("a")),
                        data_type: named("int"),
                    },
                    RowField {
                        name: Some(identifier_from_str("b c")),
                        data_type: named("string"),
                    },
                ])))),
            )
        );
    }

    #[test]
    fn trino_collections() {
        assert_eq!(
            parse("ARRAY(ROW(x bigint, double, y DOUBLE PRECISION))"),
            DataType::Array(Box::new(DataType::Row(vec![
                RowField {
                    name: Some(identifier_from_str("x")),
                    data_type: named("bigint"),
                },
                RowField {
                    name: None,
                    data_type: named("double"),
                },
                RowField {
                    name: Some(identifier_from_str("y")),
                    data_type: DataType::DoublePrecision,
                },
            ])))
        );
        assert_eq!(
            parse("MAP(varchar(3), bigint)"),
            DataType::Map(
                Box::new(DataType::Named {
                    name: identifier_from_str("varchar"),
                    parameters: vec![TypeParameter::Number("3".to_string())],
                }),
                Box::new(named("bigint")),
            )
        );
    }

    #[test]
    fn date_time() {
        assert_eq!(
            parse("timestamp(3) with time zone"),
            DataType::DateTime {
                kind: DateTimeKind::Timestamp,
                precision: Some("3".to_string()),
                with_time_zone: true,
            }
        );
        assert_eq!(
            parse("TIME WITHOUT TIME ZONE"),
            DataType::DateTime {
                kind: DateTimeKind::Time,
                precision: None,
                with_time_zone: false,
            }
        );
        assert_eq!(
            parse("INTERVAL DAY TO SECOND"),
            DataType::Interval {
                from: IntervalField::Day,
                to: Some(IntervalField::Second),
            }
        );
    }

    #[test]
    fn unclosed_type() {
        let mut parser = Parser::new("array<int").with_listener(MarkerCollector::new());

        assert!(matches!(
            parser.parse_data_type(),
            Err(Error::MismatchedInput { .. })
        ));
    }
}
