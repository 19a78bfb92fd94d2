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
    /// Everything after `INSERT`.
    pub(super) fn parse_insert(&mut self) -> Result<Statement> {
        self.must_match_keyword(Keyword::INTO)?;
        let table = self.parse_qualified_name()?;

        let columns = match self.check(TokenKind::LeftParen) && !self.looks_like_query(0) {
            true => Some(self.parse_column_aliases()?),
            false => None,
        };
        let query = self.parse_query()?;

        Ok(Statement::Insert(InsertStmt {
            table,
            columns,
            query: Box::new(query),
        }))
    }

    /// Everything after `DELETE`.
    pub(super) fn parse_delete(&mut self) -> Result<Statement> {
        self.must_match_keyword(Keyword::FROM)?;
        let table = self.parse_qualified_name()?;

        Ok(Statement::Delete(DeleteStmt {
            table,
            filter: self.parse_where()?,
        }))
    }

    /// Everything after `UPDATE`.
    pub(super) fn parse_update(&mut self) -> Result<Statement> {
        let table = self.parse_qualified_name()?;
        self.must_match_keyword(Keyword::SET)?;
        let assignments = self.parse_comma_separated(Self::parse_assignment)?;

        Ok(Statement::Update(UpdateStmt {
            table,
            assignments,
            filter: self.parse_where()?,
        }))
    }

    fn parse_assignment(&mut self) -> Result<Assignment> {
        let column = self.parse_identifier()?;
        self.must_match(TokenKind::Equal)?;

        Ok(Assignment {
            column,
            value: self.parse_expr()?,
        })
    }

    /// Everything after `MERGE`.
    pub(super) fn parse_merge(&mut self) -> Result<Statement> {
        self.must_match_keyword(Keyword::INTO)?;
        let target = self.parse_qualified_name()?;
        let alias = self.parse_alias()?;

        self.must_match_keyword(Keyword::USING)?;
        let source = self.parse_aliased_relation()?;
        self.must_match_keyword(Keyword::ON)?;
        let on = self.parse_expr()?;

        let mut cases = vec![self.parse_merge_case()?];
        while self.check_keyword(Keyword::WHEN) {
            cases.push(self.parse_merge_case()?);
        }

        Ok(Statement::Merge(MergeStmt {
            target,
            alias,
            source,
            on,
            cases,
        }))
    }

    /// `WHEN [NOT] MATCHED [AND condition] THEN action`
    fn parse_merge_case(&mut self) -> Result<MergeCase> {
        self.must_match_keyword(Keyword::WHEN)?;
        let matched = !self.try_match_keyword(Keyword::NOT);
        self.must_match_keyword(Keyword::MATCHED)?;

        let condition = match self.try_match_keyword(Keyword::AND) {
            true => Some(self.parse_expr()?),
            false => None,
        };
        self.must_match_keyword(Keyword::THEN)?;

        let action = match_token!(self, "'UPDATE', 'DELETE' or 'INSERT'", {
            TokenKind::Keyword(Keyword::UPDATE) => {
                self.must_match_keyword(Keyword::SET)?;
                MergeAction::Update(self.parse_comma_separated(Self::parse_assignment)?)
            },
            TokenKind::Keyword(Keyword::DELETE) => MergeAction::Delete,
            TokenKind::Keyword(Keyword::INSERT) => {
                let columns = match self.check(TokenKind::LeftParen) {
                    true => Some(self.parse_column_aliases()?),
                    false => None,
                };
                self.must_match_keyword(Keyword::VALUES)?;
                let values = self.parse_comma_separated_within_parentheses(Self::parse_expr, false)?;

                MergeAction::Insert {
                    columns,
                    values: values.0,
                }
            },
        });

        Ok(MergeCase {
            matched,
            condition,
            action,
        })
    }

    /// Everything after `OPTIMIZE`.
    pub(super) fn parse_optimize(&mut self) -> Result<Statement> {
        let table = self.parse_qualified_name()?;
        self.must_match_keyword(Keyword::REWRITE)?;
        self.must_match_keyword(Keyword::DATA)?;
        self.must_match_keyword(Keyword::USING)?;
        self.must_match_keyword(Keyword::BIN_PACK)?;

        Ok(Statement::Optimize(OptimizeStmt {
            table,
            filter: self.parse_where()?,
        }))
    }

    /// Everything after `VACUUM`.
    pub(super) fn parse_vacuum(&mut self) -> Result<Statement> {
        Ok(Statement::Vacuum {
            table: self.parse_qualified_name()?,
        })
    }

    /// Everything after `UNLOAD`: `(query) TO 'location' [WITH (..)]`.
    pub(super) fn parse_unload(&mut self) -> Result<Statement> {
        let query = self.parse_parenthesized_query()?;
        self.must_match_keyword(Keyword::TO)?;
        let location = self.parse_string()?;

        Ok(Statement::Unload(UnloadStmt {
            query: Box::new(query),
            location,
            properties: self.parse_with_properties()?,
        }))
    }

    fn parse_where(&mut self) -> Result<Option<Expression>> {
        match self.try_match_keyword(Keyword::WHERE) {
            true => Ok(Some(self.parse_expr()?)),
            false => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::listener::MarkerCollector,
        ast::expr::{Literal, Operation},
    };

    fn parse(sql: &str) -> Statement {
        let mut parser = Parser::new(sql).with_listener(MarkerCollector::new());
        let statement = parser.single_statement();

        assert!(
            parser.listener().is_empty(),
            "{sql}: {:?}",
            parser.listener().markers()
        );
        statement.unwrap()
    }

    #[test]
    fn insert() {
        let Statement::Insert(stmt) = parse("INSERT INTO db.t (a, b) SELECT x, y FROM s") else {
            panic!("expected INSERT");
        };
        assert_eq!(stmt.table, QualifiedName::from(vec!["db", "t"]));
        assert_eq!(
            stmt.columns,
            Some(vec![identifier_from_str("a"), identifier_from_str("b")])
        );

        let Statement::Insert(stmt) = parse("INSERT INTO t (SELECT 1) UNION ALL (SELECT 2)") else {
            panic!("expected INSERT");
        };
        assert_eq!(stmt.columns, None);
        assert!(matches!(stmt.query.body, QueryBody::SetOperation { .. }));

        assert!(matches!(
            parse("INSERT INTO t VALUES (1, 'a'), (2, 'b')"),
            Statement::Insert(InsertStmt { columns: None, .. })
        ));
    }

    #[test]
    fn delete_and_update() {
        let Statement::Delete(stmt) = parse("DELETE FROM t WHERE id = 1") else {
            panic!("expected DELETE");
        };
        assert!(matches!(stmt.filter, Some(Expression::Operation(Operation::Equal(..)))));

        let Statement::Update(stmt) = parse("UPDATE t SET a = a + 1, b = 'x' WHERE id > 0") else {
            panic!("expected UPDATE");
        };
        assert_eq!(stmt.assignments.len(), 2);
        assert_eq!(stmt.assignments[1].column, identifier_from_str("b"));
        assert_eq!(
            stmt.assignments[1].value,
            Literal::String("x".to_string()).into()
        );
        assert!(stmt.filter.is_some());
    }

    #[test]
    fn merge() {
        let Statement::Merge(stmt) = parse(
            "MERGE INTO accounts a USING (SELECT * FROM updates) AS u ON a.id = u.id \
             WHEN MATCHED AND u.deleted THEN DELETE \
             WHEN MATCHED THEN UPDATE SET balance = u.balance \
             WHEN NOT MATCHED THEN INSERT (id, balance) VALUES (u.id, u.balance)",
        ) else {
            panic!("expected MERGE");
        };

        assert_eq!(stmt.alias, Some(identifier_from_str("a")));
        assert!(matches!(
            stmt.source,
            Relation::Subquery { alias: Some(_), .. }
        ));
        assert_eq!(stmt.cases.len(), 3);
        assert!(stmt.cases[0].matched && stmt.cases[0].condition.is_some());
        assert_eq!(stmt.cases[0].action, MergeAction::Delete);
        assert!(matches!(&stmt.cases[1].action, MergeAction::Update(assignments) if assignments.len() == 1));
        assert!(!stmt.cases[2].matched);
        assert!(matches!(
            &stmt.cases[2].action,
            MergeAction::Insert { columns: Some(columns), values } if columns.len() == 2 && values.len() == 2
        ));
    }

    #[test]
    fn iceberg_maintenance() {
        assert!(matches!(
            parse("OPTIMIZE iceberg_t REWRITE DATA USING BIN_PACK WHERE category = 'c1'"),
            Statement::Optimize(OptimizeStmt { filter: Some(_), .. })
        ));
        assert_eq!(
            parse("VACUUM iceberg_t"),
            Statement::Vacuum {
                table: QualifiedName::from(vec!["iceberg_t"]),
            }
        );
    }

    #[test]
    fn unload() {
        let Statement::Unload(stmt) = parse(
            "UNLOAD (SELECT * FROM t) TO 's3://b/out/' WITH (format = 'JSON', compression = 'GZIP')",
        ) else {
            panic!("expected UNLOAD");
        };

        assert_eq!(stmt.location, "s3://b/out/");
        assert_eq!(stmt.properties.len(), 2);
        assert_eq!(stmt.properties[0].key, identifier_from_str("format"));

        let Statement::Unload(stmt) = parse("UNLOAD (SELECT 1) TO 's3://b/'") else {
            panic!("expected UNLOAD");
        };
        assert!(stmt.properties.is_empty());
    }
}
