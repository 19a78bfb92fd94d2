use {
    super::{common::match_token, error::Result, Parser},
    crate::listener::ErrorListener,
    ast::{
        token::{Keyword, TokenKind},
        *,
    },
};

impl<'a, L: ErrorListener> Parser<'a, L> {
    /// Everything after `CREATE`.
    pub(super) fn parse_create(&mut self) -> Result<Statement> {
        if self.match_keyword_sequence(&[Keyword::OR, Keyword::REPLACE]) {
            self.must_match_keyword(Keyword::VIEW)?;
            return self.parse_create_view(true);
        }

        Ok(match_token!(self, "'TABLE', 'EXTERNAL', 'VIEW', 'SCHEMA' or 'DATABASE'", {
            TokenKind::Keyword(Keyword::TABLE) => self.parse_create_table(false)?,
            TokenKind::Keyword(Keyword::EXTERNAL) => {
                self.must_match_keyword(Keyword::TABLE)?;
                self.parse_create_table(true)?
            },
            TokenKind::Keyword(Keyword::VIEW) => self.parse_create_view(false)?,
            TokenKind::Keyword(Keyword::SCHEMA | Keyword::DATABASE) => self.parse_create_schema()?,
        }))
    }

    fn parse_create_schema(&mut self) -> Result<Statement> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;
        let comment = self.parse_comment()?;

        let location = match self.try_match_keyword(Keyword::LOCATION) {
            true => Some(self.parse_string()?),
            false => None,
        };

        let db_properties =
            match self.match_keyword_sequence(&[Keyword::WITH, Keyword::DBPROPERTIES]) {
                true => self.parse_hive_properties()?,
                false => vec![],
            };
        let properties = self.parse_with_properties()?;

        Ok(Statement::CreateSchema(CreateSchemaStmt {
            if_not_exists,
            name,
            comment,
            location,
            db_properties,
            properties,
        }))
    }

    /// Hive `CREATE [EXTERNAL] TABLE` with column definitions, or
    /// `CREATE TABLE .. AS query`.
    fn parse_create_table(&mut self, external: bool) -> Result<Statement> {
        let if_not_exists = self.parse_if_not_exists();
        let name = self.parse_qualified_name()?;

        // `(a, b)` lists output columns of a CTAS, `(a int, b string)` defines them.
        let column_aliases_ahead = !self.check(TokenKind::LeftParen)
            || matches!(self.peek_nth(2), TokenKind::Comma | TokenKind::RightParen);
        if !external && column_aliases_ahead {
            return self.parse_create_table_as(if_not_exists, name);
        }

        let columns = self.parse_column_definitions()?;
        let comment = self.parse_comment()?;

        let partitioned_by = match self.match_keyword_sequence(&[Keyword::PARTITIONED, Keyword::BY]) {
            true => {
                self.parse_comma_separated_within_parentheses(Self::parse_partition_column, false)?
                    .0
            }
            false => vec![],
        };

        let clustered_by = match self.match_keyword_sequence(&[Keyword::CLUSTERED, Keyword::BY]) {
            true => Some(self.parse_bucketing()?),
            false => None,
        };

        let row_format = match self.match_keyword_sequence(&[Keyword::ROW, Keyword::FORMAT]) {
            true => Some(self.parse_row_format()?),
            false => None,
        };

        let stored_as = match self.match_keyword_sequence(&[Keyword::STORED, Keyword::AS]) {
            true => Some(self.parse_storage_format()?),
            false => None,
        };

        let location = match self.try_match_keyword(Keyword::LOCATION) {
            true => Some(self.parse_string()?),
            false => None,
        };

        let table_properties = match self.try_match_keyword(Keyword::TBLPROPERTIES) {
            true => self.parse_hive_properties()?,
            false => vec![],
        };
        let properties = self.parse_with_properties()?;

        Ok(Statement::CreateTable(CreateTableStmt {
            external,
            if_not_exists,
            name,
            columns,
            comment,
            partitioned_by,
            clustered_by,
            row_format,
            stored_as,
            location,
            table_properties,
            properties,
        }))
    }

    fn parse_create_table_as(
        &mut self,
        if_not_exists: bool,
        name: QualifiedName,
    ) -> Result<Statement> {
        let columns = match self.check(TokenKind::LeftParen) {
            true => Some(self.parse_column_aliases()?),
            false => None,
        };
        let comment = self.parse_comment()?;
        let properties = self.parse_with_properties()?;

        self.must_match_keyword(Keyword::AS)?;
        let query = self.parse_query()?;

        let with_data = if self.match_keyword_sequence(&[Keyword::WITH, Keyword::NO, Keyword::DATA])
        {
            Some(false)
        } else if self.match_keyword_sequence(&[Keyword::WITH, Keyword::DATA]) {
            Some(true)
        } else {
            None
        };

        Ok(Statement::CreateTableAs(CreateTableAsStmt {
            if_not_exists,
            name,
            columns,
            comment,
            properties,
            query: Box::new(query),
            with_data,
        }))
    }

    fn parse_create_view(&mut self, or_replace: bool) -> Result<Statement> {
        let name = self.parse_qualified_name()?;
        let comment = self.parse_comment()?;

        let security = match self.try_match_keyword(Keyword::SECURITY) {
            true => Some(match_token!(self, "'DEFINER' or 'INVOKER'", {
                TokenKind::Keyword(Keyword::DEFINER) => ViewSecurity::Definer,
                TokenKind::Keyword(Keyword::INVOKER) => ViewSecurity::Invoker,
            })),
            false => None,
        };

        self.must_match_keyword(Keyword::AS)?;
        let query = self.parse_query()?;

        Ok(Statement::CreateView(CreateViewStmt {
            or_replace,
            name,
            comment,
            security,
            query: Box::new(query),
        }))
    }

    /// Everything after `DROP`.
    pub(super) fn parse_drop(&mut self) -> Result<Statement> {
        Ok(match_token!(self, "'TABLE', 'VIEW', 'SCHEMA' or 'DATABASE'", {
            TokenKind::Keyword(Keyword::TABLE) => Statement::DropTable {
                if_exists: self.parse_if_exists(),
                name: self.parse_qualified_name()?,
            },
            TokenKind::Keyword(Keyword::VIEW) => Statement::DropView {
                if_exists: self.parse_if_exists(),
                name: self.parse_qualified_name()?,
            },
            TokenKind::Keyword(Keyword::SCHEMA | Keyword::DATABASE) => Statement::DropSchema {
                if_exists: self.parse_if_exists(),
                name: self.parse_qualified_name()?,
                behavior: self.parse_drop_behavior(),
            },
        }))
    }

    fn parse_drop_behavior(&mut self) -> Option<DropBehavior> {
        let behavior = match self.peek() {
            TokenKind::Keyword(Keyword::CASCADE) => DropBehavior::Cascade,
            TokenKind::Keyword(Keyword::RESTRICT) => DropBehavior::Restrict,
            _ => return None,
        };
        self.advance();

        Some(behavior)
    }

    /// Everything after `ALTER`.
    pub(super) fn parse_alter(&mut self) -> Result<Statement> {
        Ok(match_token!(self, "'TABLE', 'SCHEMA' or 'DATABASE'", {
            TokenKind::Keyword(Keyword::TABLE) => self.parse_alter_table()?,
            TokenKind::Keyword(Keyword::SCHEMA | Keyword::DATABASE) => {
                let name = self.parse_qualified_name()?;
                let action = match_token!(self, "'SET' or 'RENAME'", {
                    TokenKind::Keyword(Keyword::SET) => {
                        self.must_match_keyword(Keyword::DBPROPERTIES)?;
                        AlterSchemaAction::SetDbProperties(self.parse_hive_properties()?)
                    },
                    TokenKind::Keyword(Keyword::RENAME) => {
                        self.must_match_keyword(Keyword::TO)?;
                        AlterSchemaAction::RenameTo(self.parse_identifier()?)
                    },
                });

                Statement::AlterSchema { name, action }
            },
        }))
    }

    fn parse_alter_table(&mut self) -> Result<Statement> {
        let if_exists = self.parse_if_exists();
        let name = self.parse_qualified_name()?;

        let action = match_token!(
            self,
            "'ADD', 'DROP', 'RENAME', 'REPLACE', 'CHANGE', 'PARTITION' or 'SET'",
            {
                TokenKind::Keyword(Keyword::ADD) => self.parse_alter_table_add()?,
                TokenKind::Keyword(Keyword::DROP) => self.parse_alter_table_drop()?,
                TokenKind::Keyword(Keyword::RENAME) => self.parse_alter_table_rename()?,
                TokenKind::Keyword(Keyword::REPLACE) => {
                    self.must_match_keyword(Keyword::COLUMNS)?;
                    AlterTableAction::ReplaceColumns(self.parse_column_definitions()?)
                },
                TokenKind::Keyword(Keyword::CHANGE) => self.parse_alter_table_change()?,
                TokenKind::Keyword(Keyword::PARTITION) => self.parse_alter_partition()?,
                TokenKind::Keyword(Keyword::SET) => self.parse_alter_table_set()?,
            }
        );

        Ok(Statement::AlterTable(AlterTableStmt {
            if_exists,
            name,
            action,
        }))
    }

    /// `ADD COLUMNS (..)`, `ADD COLUMN ..` or one or more
    /// `PARTITION (..) [LOCATION '..']` clauses with no separator.
    fn parse_alter_table_add(&mut self) -> Result<AlterTableAction> {
        if self.try_match_keyword(Keyword::COLUMNS) {
            return Ok(AlterTableAction::AddColumns(self.parse_column_definitions()?));
        }

        if self.try_match_keyword(Keyword::COLUMN) {
            return Ok(AlterTableAction::AddColumn {
                if_not_exists: self.parse_if_not_exists(),
                column: self.parse_column_definition()?,
            });
        }

        let if_not_exists = self.parse_if_not_exists();
        let mut partitions = vec![];
        loop {
            self.must_match_keyword(Keyword::PARTITION)?;
            let partition = self.parse_partition_spec()?;
            let location = match self.try_match_keyword(Keyword::LOCATION) {
                true => Some(self.parse_string()?),
                false => None,
            };
            partitions.push(PartitionLocation {
                partition,
                location,
            });

            if !self.check_keyword(Keyword::PARTITION) {
                break;
            }
        }

        Ok(AlterTableAction::AddPartitions {
            if_not_exists,
            partitions,
        })
    }

    fn parse_alter_table_drop(&mut self) -> Result<AlterTableAction> {
        if self.try_match_keyword(Keyword::COLUMN) {
            return Ok(AlterTableAction::DropColumn {
                if_exists: self.parse_if_exists(),
                column: self.parse_qualified_name()?,
            });
        }

        let if_exists = self.parse_if_exists();
        let partitions = self.parse_comma_separated(|p| {
            p.must_match_keyword(Keyword::PARTITION)?;
            p.parse_partition_spec()
        })?;

        Ok(AlterTableAction::DropPartitions {
            if_exists,
            partitions,
        })
    }

    fn parse_alter_table_rename(&mut self) -> Result<AlterTableAction> {
        Ok(match_token!(self, "'TO' or 'COLUMN'", {
            TokenKind::Keyword(Keyword::TO) => {
                AlterTableAction::RenameTo(self.parse_qualified_name()?)
            },
            TokenKind::Keyword(Keyword::COLUMN) => {
                let if_exists = self.parse_if_exists();
                let from = self.parse_identifier()?;
                self.must_match_keyword(Keyword::TO)?;

                AlterTableAction::RenameColumn {
                    if_exists,
                    from,
                    to: self.parse_identifier()?,
                }
            },
        }))
    }

    /// `CHANGE [COLUMN] old new_type_def [FIRST | AFTER col]`
    fn parse_alter_table_change(&mut self) -> Result<AlterTableAction> {
        self.try_match_keyword(Keyword::COLUMN);
        let from = self.parse_identifier()?;
        let column = self.parse_column_definition()?;

        let position = match self.peek() {
            TokenKind::Keyword(Keyword::FIRST) => {
                self.advance();
                Some(ColumnPosition::First)
            }
            TokenKind::Keyword(Keyword::AFTER) => {
                self.advance();
                Some(ColumnPosition::After(self.parse_identifier()?))
            }
            _ => None,
        };

        Ok(AlterTableAction::ChangeColumn {
            from,
            column,
            position,
        })
    }

    /// `PARTITION (..) RENAME TO PARTITION (..)` or `PARTITION (..) SET LOCATION '..'`
    fn parse_alter_partition(&mut self) -> Result<AlterTableAction> {
        let partition = self.parse_partition_spec()?;

        Ok(match_token!(self, "'RENAME' or 'SET'", {
            TokenKind::Keyword(Keyword::RENAME) => {
                self.must_match_keyword(Keyword::TO)?;
                self.must_match_keyword(Keyword::PARTITION)?;
                AlterTableAction::RenamePartition {
                    from: partition,
                    to: self.parse_partition_spec()?,
                }
            },
            TokenKind::Keyword(Keyword::SET) => {
                self.must_match_keyword(Keyword::LOCATION)?;
                AlterTableAction::SetPartitionLocation {
                    partition,
                    location: self.parse_string()?,
                }
            },
        }))
    }

    fn parse_alter_table_set(&mut self) -> Result<AlterTableAction> {
        Ok(match_token!(self, "'LOCATION', 'TBLPROPERTIES' or 'PROPERTIES'", {
            TokenKind::Keyword(Keyword::LOCATION) => {
                AlterTableAction::SetLocation(self.parse_string()?)
            },
            TokenKind::Keyword(Keyword::TBLPROPERTIES) => {
                AlterTableAction::SetTableProperties(self.parse_hive_properties()?)
            },
            TokenKind::Keyword(Keyword::PROPERTIES) => {
                AlterTableAction::SetProperties(self.parse_comma_separated(Self::parse_property)?)
            },
        }))
    }

    /// Everything after `MSCK`.
    pub(super) fn parse_msck_repair(&mut self) -> Result<Statement> {
        self.must_match_keyword(Keyword::REPAIR)?;
        self.must_match_keyword(Keyword::TABLE)?;

        Ok(Statement::RepairTable {
            name: self.parse_qualified_name()?,
        })
    }

    fn parse_column_definitions(&mut self) -> Result<Vec<ColumnDefinition>> {
        Ok(self
            .parse_comma_separated_within_parentheses(Self::parse_column_definition, false)?
            .0)
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition> {
        let name = self.parse_identifier()?;
        let data_type = self.parse_data_type()?;
        let not_null = self.match_keyword_sequence(&[Keyword::NOT, Keyword::NULL]);
        let comment = self.parse_comment()?;
        let properties = self.parse_with_properties()?;

        Ok(ColumnDefinition {
            name,
            data_type,
            not_null,
            comment,
            properties,
        })
    }

    /// A Hive partition column, or an Iceberg transform such as `day(ts)`.
    fn parse_partition_column(&mut self) -> Result<PartitionColumn> {
        match self.speculate(Self::parse_column_definition) {
            Ok(column) if matches!(self.peek(), TokenKind::Comma | TokenKind::RightParen) => {
                Ok(PartitionColumn::Column(column))
            }
            Ok(_) => Err(self.error_expected("',' or ')'")),
            Err(error) => self
                .parse_expr()
                .map(PartitionColumn::Transform)
                .map_err(|e| error.furthest(e)),
        }
    }

    /// Everything after `CLUSTERED BY`.
    fn parse_bucketing(&mut self) -> Result<Bucketing> {
        let columns = self.parse_column_aliases()?;
        let sorted_by = match self.match_keyword_sequence(&[Keyword::SORTED, Keyword::BY]) {
            true => {
                self.parse_comma_separated_within_parentheses(Self::parse_sort_item, false)?
                    .0
            }
            false => vec![],
        };

        self.must_match_keyword(Keyword::INTO)?;
        let buckets = self.parse_integer()?;
        self.must_match_keyword(Keyword::BUCKETS)?;

        Ok(Bucketing {
            columns,
            sorted_by,
            buckets,
        })
    }

    /// Everything after `ROW FORMAT`.
    fn parse_row_format(&mut self) -> Result<RowFormat> {
        Ok(match_token!(self, "'SERDE' or 'DELIMITED'", {
            TokenKind::Keyword(Keyword::SERDE) => {
                let class = self.parse_string()?;
                let properties =
                    match self.match_keyword_sequence(&[Keyword::WITH, Keyword::SERDEPROPERTIES]) {
                        true => self.parse_hive_properties()?,
                        false => vec![],
                    };

                RowFormat::Serde { class, properties }
            },
            TokenKind::Keyword(Keyword::DELIMITED) => RowFormat::Delimited(self.parse_delimited()?),
        }))
    }

    fn parse_delimited(&mut self) -> Result<DelimitedFormat> {
        let mut format = DelimitedFormat::default();

        if self.match_keyword_sequence(&[Keyword::FIELDS, Keyword::TERMINATED, Keyword::BY]) {
            format.fields_terminated_by = Some(self.parse_string()?);
            if self.match_keyword_sequence(&[Keyword::ESCAPED, Keyword::BY]) {
                format.escaped_by = Some(self.parse_string()?);
            }
        }
        if self.match_keyword_sequence(&[
            Keyword::COLLECTION,
            Keyword::ITEMS,
            Keyword::TERMINATED,
            Keyword::BY,
        ]) {
            format.collection_items_terminated_by = Some(self.parse_string()?);
        }
        if self.match_keyword_sequence(&[Keyword::MAP, Keyword::KEYS, Keyword::TERMINATED, Keyword::BY])
        {
            format.map_keys_terminated_by = Some(self.parse_string()?);
        }
        if self.match_keyword_sequence(&[Keyword::LINES, Keyword::TERMINATED, Keyword::BY]) {
            format.lines_terminated_by = Some(self.parse_string()?);
        }
        if self.match_keyword_sequence(&[Keyword::NULL, Keyword::DEFINED, Keyword::AS]) {
            format.null_defined_as = Some(self.parse_string()?);
        }

        Ok(format)
    }

    /// Everything after `STORED AS`.
    fn parse_storage_format(&mut self) -> Result<StorageFormat> {
        if !self.try_match_keyword(Keyword::INPUTFORMAT) {
            return Ok(StorageFormat::Named(self.parse_identifier()?));
        }

        let input_format = self.parse_string()?;
        self.must_match_keyword(Keyword::OUTPUTFORMAT)?;

        Ok(StorageFormat::Classes {
            input_format,
            output_format: self.parse_string()?,
        })
    }

    /// Everything after `PARTITION`.
    pub(super) fn parse_partition_spec(&mut self) -> Result<PartitionSpec> {
        let values = self.parse_comma_separated_within_parentheses(
            |p| {
                let key = p.parse_identifier()?;
                p.must_match(TokenKind::Equal)?;
                Ok((key, p.parse_value_expr(0)?))
            },
            false,
        )?;

        Ok(PartitionSpec(values.0))
    }

    /// `('key' = 'value', ...)`
    fn parse_hive_properties(&mut self) -> Result<Vec<HiveProperty>> {
        let properties = self.parse_comma_separated_within_parentheses(
            |p| {
                let key = p.parse_string()?;
                p.must_match(TokenKind::Equal)?;
                Ok(HiveProperty {
                    key,
                    value: p.parse_string()?,
                })
            },
            false,
        )?;

        Ok(properties.0)
    }

    /// `WITH (key = value, ...)`, or nothing.
    pub(super) fn parse_with_properties(&mut self) -> Result<Vec<Property>> {
        if !(self.check_keyword(Keyword::WITH) && self.peek_nth(1) == TokenKind::LeftParen) {
            return Ok(vec![]);
        }
        self.advance();

        Ok(self
            .parse_comma_separated_within_parentheses(Self::parse_property, false)?
            .0)
    }

    fn parse_property(&mut self) -> Result<Property> {
        let key = self.parse_identifier()?;
        self.must_match(TokenKind::Equal)?;

        let value = match self.try_match_keyword(Keyword::DEFAULT) {
            true => None,
            false => Some(self.parse_expr()?),
        };

        Ok(Property { key, value })
    }

    fn parse_comment(&mut self) -> Result<Option<String>> {
        match self.try_match_keyword(Keyword::COMMENT) {
            true => Ok(Some(self.parse_string()?)),
            false => Ok(None),
        }
    }

    pub(super) fn parse_if_exists(&mut self) -> bool {
        self.match_keyword_sequence(&[Keyword::IF, Keyword::EXISTS])
    }

    fn parse_if_not_exists(&mut self) -> bool {
        self.match_keyword_sequence(&[Keyword::IF, Keyword::NOT, Keyword::EXISTS])
    }
}
