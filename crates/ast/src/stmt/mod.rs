mod ddl;
mod dml;
mod metadata;
mod query;

pub use self::{ddl::*, dml::*, metadata::*, query::*};

use crate::{
    common::{Identifier, QualifiedName},
    expr::Expression,
};

#[derive(Debug, PartialEq)]
pub enum Statement {
    Query(Box<Query>),
    Use {
        catalog: Option<Identifier>,
        schema: Identifier,
    },
    CreateSchema(CreateSchemaStmt),
    DropSchema {
        if_exists: bool,
        name: QualifiedName,
        behavior: Option<DropBehavior>,
    },
    AlterSchema {
        name: QualifiedName,
        action: AlterSchemaAction,
    },
    CreateTable(CreateTableStmt),
    CreateTableAs(CreateTableAsStmt),
    DropTable {
        if_exists: bool,
        name: QualifiedName,
    },
    AlterTable(AlterTableStmt),
    /// `MSCK REPAIR TABLE t`
    RepairTable {
        name: QualifiedName,
    },
    CreateView(CreateViewStmt),
    DropView {
        if_exists: bool,
        name: QualifiedName,
    },
    Insert(InsertStmt),
    Delete(DeleteStmt),
    Update(UpdateStmt),
    Merge(MergeStmt),
    Optimize(OptimizeStmt),
    Vacuum {
        table: QualifiedName,
    },
    Unload(UnloadStmt),
    Show(ShowStmt),
    Describe(DescribeStmt),
    DescribeInput {
        name: Identifier,
    },
    DescribeOutput {
        name: Identifier,
    },
    Explain {
        analyze: bool,
        verbose: bool,
        options: Vec<ExplainOption>,
        statement: Box<Statement>,
    },
    Prepare {
        name: Identifier,
        statement: Box<Statement>,
    },
    Execute {
        name: Identifier,
        parameters: Vec<Expression>,
    },
    Deallocate {
        name: Identifier,
    },
}
