use {
    super::{
        ddl::Property,
        query::{Query, Relation},
    },
    crate::{
        common::{Identifier, QualifiedName},
        expr::Expression,
    },
    common::pub_fields_struct,
};

#[derive(Debug, PartialEq)]
pub enum MergeAction {
    Update(Vec<Assignment>),
    Delete,
    Insert {
        columns: Option<Vec<Identifier>>,
        values: Vec<Expression>,
    },
}

pub_fields_struct! {
    #[derive(Debug, PartialEq)]
    struct InsertStmt {
        table: QualifiedName,
        columns: Option<Vec<Identifier>>,
        query: Box<Query>,
    }

    #[derive(Debug, PartialEq)]
    struct DeleteStmt {
        table: QualifiedName,
        filter: Option<Expression>,
    }

    #[derive(Debug, PartialEq)]
    struct Assignment {
        column: Identifier,
        value: Expression,
    }

    #[derive(Debug, PartialEq)]
    struct UpdateStmt {
        table: QualifiedName,
        assignments: Vec<Assignment>,
        filter: Option<Expression>,
    }

    #[derive(Debug, PartialEq)]
    struct MergeCase {
        matched: bool,
        condition: Option<Expression>,
        action: MergeAction,
    }

    #[derive(Debug, PartialEq)]
    struct MergeStmt {
        target: QualifiedName,
        alias: Option<Identifier>,
        source: Relation,
        on: Expression,
        cases: Vec<MergeCase>,
    }

    #[derive(Debug, PartialEq)]
    struct UnloadStmt {
        query: Box<Query>,
        location: String,
        properties: Vec<Property>,
    }

    #[derive(Debug, PartialEq)]
    struct OptimizeStmt {
        table: QualifiedName,
        filter: Option<Expression>,
    }
}

