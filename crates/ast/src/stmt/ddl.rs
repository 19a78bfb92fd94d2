use {
    super::{query::Query, SortItem},
    crate::{
        common::{Identifier, QualifiedName},
        data_type::DataType,
        expr::Expression,
    },
    common::pub_fields_struct,
};

/// `key = value` from a Trino `WITH (...)` list. `None` stands for `DEFAULT`.
#[derive(Debug, PartialEq)]
pub struct Property {
    pub key: Identifier,
    pub value: Option<Expression>,
}

/// `'key' = 'value'` from `TBLPROPERTIES`, `SERDEPROPERTIES` or `DBPROPERTIES`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiveProperty {
    pub key: String,
    pub value: String,
}

/// `(dt = '2016-05-31', country = 'IN')`
#[derive(Debug, PartialEq)]
pub struct PartitionSpec(pub Vec<(Identifier, Expression)>);

#[derive(Debug, PartialEq)]
pub enum PartitionColumn {
    Column(ColumnDefinition),
    /// Iceberg partition transforms such as `bucket(16, id)` or `day(ts)`.
    Transform(Expression),
}

#[derive(Debug, PartialEq)]
pub enum RowFormat {
    Serde {
        class: String,
        properties: Vec<HiveProperty>,
    },
    Delimited(DelimitedFormat),
}

#[derive(Debug, PartialEq)]
pub enum StorageFormat {
    /// `STORED AS PARQUET`
    Named(Identifier),
    Classes {
        input_format: String,
        output_format: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSecurity {
    Definer,
    Invoker,
}

#[derive(Debug, PartialEq)]
pub enum ColumnPosition {
    First,
    After(Identifier),
}

#[derive(Debug, PartialEq)]
pub enum AlterTableAction {
    /// `ADD [IF NOT EXISTS] PARTITION (...) [LOCATION '...'] ...`
    AddPartitions {
        if_not_exists: bool,
        partitions: Vec<PartitionLocation>,
    },
    DropPartitions {
        if_exists: bool,
        partitions: Vec<PartitionSpec>,
    },
    RenamePartition {
        from: PartitionSpec,
        to: PartitionSpec,
    },
    SetPartitionLocation {
        partition: PartitionSpec,
        location: String,
    },
    AddColumns(Vec<ColumnDefinition>),
    ReplaceColumns(Vec<ColumnDefinition>),
    AddColumn {
        if_not_exists: bool,
        column: ColumnDefinition,
    },
    DropColumn {
        if_exists: bool,
        column: QualifiedName,
    },
    RenameColumn {
        if_exists: bool,
        from: Identifier,
        to: Identifier,
    },
    ChangeColumn {
        from: Identifier,
        column: ColumnDefinition,
        position: Option<ColumnPosition>,
    },
    RenameTo(QualifiedName),
    SetLocation(String),
    SetTableProperties(Vec<HiveProperty>),
    SetProperties(Vec<Property>),
}

#[derive(Debug, PartialEq)]
pub enum AlterSchemaAction {
    SetDbProperties(Vec<HiveProperty>),
    RenameTo(Identifier),
}

pub_fields_struct! {
    #[derive(Debug, PartialEq)]
    struct ColumnDefinition {
        name: Identifier,
        data_type: DataType,
        not_null: bool,
        comment: Option<String>,
        properties: Vec<Property>,
    }

    #[derive(Debug, Default, PartialEq)]
    struct DelimitedFormat {
        fields_terminated_by: Option<String>,
        escaped_by: Option<String>,
        collection_items_terminated_by: Option<String>,
        map_keys_terminated_by: Option<String>,
        lines_terminated_by: Option<String>,
        null_defined_as: Option<String>,
    }

    #[derive(Debug, PartialEq)]
    struct Bucketing {
        columns: Vec<Identifier>,
        sorted_by: Vec<SortItem>,
        buckets: String,
    }

    #[derive(Debug, PartialEq)]
    struct PartitionLocation {
        partition: PartitionSpec,
        location: Option<String>,
    }

    #[derive(Debug, PartialEq)]
    struct CreateSchemaStmt {
        if_not_exists: bool,
        name: QualifiedName,
        comment: Option<String>,
        location: Option<String>,
        db_properties: Vec<HiveProperty>,
        properties: Vec<Property>,
    }

    #[derive(Debug, PartialEq)]
    struct CreateTableStmt {
        external: bool,
        if_not_exists: bool,
        name: QualifiedName,
        columns: Vec<ColumnDefinition>,
        comment: Option<String>,
        partitioned_by: Vec<PartitionColumn>,
        clustered_by: Option<Bucketing>,
        row_format: Option<RowFormat>,
        stored_as: Option<StorageFormat>,
        location: Option<String>,
        table_properties: Vec<HiveProperty>,
        properties: Vec<Property>,
    }

    #[derive(Debug, PartialEq)]
    struct CreateTableAsStmt {
        if_not_exists: bool,
        name: QualifiedName,
        columns: Option<Vec<Identifier>>,
        comment: Option<String>,
        properties: Vec<Property>,
        query: Box<Query>,
        /// `WITH DATA` / `WITH NO DATA`
        with_data: Option<bool>,
    }

    #[derive(Debug, PartialEq)]
    struct CreateViewStmt {
        or_replace: bool,
        name: QualifiedName,
        comment: Option<String>,
        security: Option<ViewSecurity>,
        query: Box<Query>,
    }

    #[derive(Debug, PartialEq)]
    struct AlterTableStmt {
        if_exists: bool,
        name: QualifiedName,
        action: AlterTableAction,
    }
}
