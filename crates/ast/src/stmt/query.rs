use {
    crate::{
        common::{Identifier, QualifiedName},
        expr::Expression,
    },
    common::pub_fields_struct,
};

#[derive(Debug, PartialEq)]
pub enum QueryBody {
    Specification(Box<QuerySpecification>),
    /// `TABLE t`
    Table(QualifiedName),
    Values(Vec<Expression>),
    Nested(Box<Query>),
    SetOperation {
        op: SetOperator,
        quantifier: Option<SetQuantifier>,
        left: Box<QueryBody>,
        right: Box<QueryBody>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetQuantifier {
    All,
    Distinct,
}

#[derive(Debug, PartialEq)]
pub enum SelectItem {
    Expr {
        expr: Expression,
        alias: Option<Identifier>,
    },
    /// `t.*` and `row_expr.* AS (a, b)`
    QualifiedWildcard {
        prefix: Expression,
        aliases: Option<Vec<Identifier>>,
    },
    Wildcard,
}

#[derive(Debug, PartialEq)]
pub enum Relation {
    Table {
        name: QualifiedName,
        /// Iceberg time travel
        period: Option<QueryPeriod>,
        alias: Option<TableAlias>,
    },
    Subquery {
        query: Box<Query>,
        lateral: bool,
        alias: Option<TableAlias>,
    },
    Unnest {
        exprs: Vec<Expression>,
        with_ordinality: bool,
        alias: Option<TableAlias>,
    },
    Nested {
        relation: Box<Relation>,
        alias: Option<TableAlias>,
    },
    Join {
        join_type: JoinType,
        natural: bool,
        left: Box<Relation>,
        right: Box<Relation>,
        criteria: Option<JoinCriteria>,
    },
    Sampled {
        relation: Box<Relation>,
        method: SampleMethod,
        percentage: Expression,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, PartialEq)]
pub enum JoinCriteria {
    On(Expression),
    Using(Vec<Identifier>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPeriodKind {
    Timestamp,
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleMethod {
    Bernoulli,
    System,
}

#[derive(Debug, PartialEq)]
pub enum GroupingElement {
    Expr(Expression),
    Rollup(Vec<Expression>),
    Cube(Vec<Expression>),
    Sets(Vec<Vec<Expression>>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NullOrdering {
    First,
    Last,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowCount {
    Literal(String),
    Parameter,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    /// `LIMIT ALL`
    All,
    Count(RowCount),
    FetchFirst {
        count: Option<RowCount>,
        with_ties: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameUnit {
    Range,
    Rows,
    Groups,
}

#[derive(Debug, PartialEq)]
pub enum FrameBound {
    UnboundedPreceding,
    UnboundedFollowing,
    CurrentRow,
    Preceding(Box<Expression>),
    Following(Box<Expression>),
}

pub_fields_struct! {
    #[derive(Debug, PartialEq)]
    struct Query {
        with: Option<With>,
        body: QueryBody,
        order_by: Vec<SortItem>,
        offset: Option<RowCount>,
        limit: Option<Limit>,
    }

    #[derive(Debug, PartialEq)]
    struct With {
        recursive: bool,
        queries: Vec<NamedQuery>,
    }

    #[derive(Debug, PartialEq)]
    struct NamedQuery {
        name: Identifier,
        columns: Option<Vec<Identifier>>,
        query: Box<Query>,
    }

    #[derive(Debug, PartialEq)]
    struct QuerySpecification {
        quantifier: Option<SetQuantifier>,
        select: Vec<SelectItem>,
        /// Comma separated relations, each possibly a join tree.
        from: Vec<Relation>,
        filter: Option<Expression>,
        group_by: Option<GroupBy>,
        having: Option<Expression>,
        windows: Vec<WindowDefinition>,
    }

    /// `FOR TIMESTAMP AS OF ...` or `FOR VERSION AS OF ...`
    #[derive(Debug, PartialEq)]
    struct QueryPeriod {
        kind: QueryPeriodKind,
        end: Expression,
    }

    #[derive(Debug, PartialEq)]
    struct TableAlias {
        name: Identifier,
        columns: Option<Vec<Identifier>>,
    }

    #[derive(Debug, PartialEq)]
    struct GroupBy {
        quantifier: Option<SetQuantifier>,
        elements: Vec<GroupingElement>,
    }

    #[derive(Debug, PartialEq)]
    struct SortItem {
        expr: Expression,
        ordering: Option<Ordering>,
        nulls: Option<NullOrdering>,
    }

    #[derive(Debug, PartialEq)]
    struct WindowDefinition {
        name: Identifier,
        spec: WindowSpecification,
    }

    #[derive(Debug, PartialEq)]
    struct WindowSpecification {
        existing: Option<Identifier>,
        partition_by: Vec<Expression>,
        order_by: Vec<SortItem>,
        frame: Option<WindowFrame>,
    }

    #[derive(Debug, PartialEq)]
    struct WindowFrame {
        unit: FrameUnit,
        start: FrameBound,
        end: Option<FrameBound>,
    }
}

impl Query {
    /// A bare query body without `WITH`, `ORDER BY` or row limits.
    pub fn from_body(body: QueryBody) -> Self {
        Self {
            with: None,
            body,
            order_by: vec![],
            offset: None,
            limit: None,
        }
    }
}
