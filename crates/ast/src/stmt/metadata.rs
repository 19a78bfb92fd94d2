use {
    super::{ddl::PartitionSpec, query::Query},
    crate::common::{Identifier, QualifiedName},
    common::pub_fields_struct,
};

/// `LIKE 'pattern' [ESCAPE 'c']`, or the bare Hive regular expression form.
#[derive(Debug, Clone, PartialEq)]
pub enum ShowFilter {
    Like {
        pattern: String,
        escape: Option<String>,
    },
    Regex(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCreateKind {
    Table,
    View,
    Schema,
}

#[derive(Debug, PartialEq)]
pub enum ShowStmt {
    /// `SHOW PARTITIONS t`. Unlike the other forms, no `FROM` is accepted.
    Partitions(QualifiedName),
    Tables {
        schema: Option<QualifiedName>,
        filter: Option<ShowFilter>,
    },
    Schemas {
        catalog: Option<Identifier>,
        filter: Option<ShowFilter>,
    },
    Catalogs {
        filter: Option<ShowFilter>,
    },
    Columns {
        table: QualifiedName,
        schema: Option<Identifier>,
        filter: Option<ShowFilter>,
    },
    Create {
        kind: ShowCreateKind,
        name: QualifiedName,
    },
    TableProperties {
        table: QualifiedName,
        property: Option<String>,
    },
    Views {
        schema: Option<QualifiedName>,
        filter: Option<ShowFilter>,
    },
    Functions {
        schema: Option<QualifiedName>,
        filter: Option<ShowFilter>,
    },
    Stats(StatsTarget),
    Session {
        filter: Option<ShowFilter>,
    },
}

#[derive(Debug, PartialEq)]
pub enum StatsTarget {
    Table(QualifiedName),
    Query(Box<Query>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescribeDetail {
    Extended,
    Formatted,
}

#[derive(Debug, PartialEq)]
pub enum ExplainOption {
    Format(Identifier),
    Type(Identifier),
}

pub_fields_struct! {
    #[derive(Debug, PartialEq)]
    struct DescribeStmt {
        detail: Option<DescribeDetail>,
        table: QualifiedName,
        partition: Option<PartitionSpec>,
        column: Option<QualifiedName>,
    }
}
