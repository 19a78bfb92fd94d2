//! Tables a statement reads or writes, for resolving their metadata.
use {
    ast::{
        expr::{Expression, FunctionCall, Window},
        FrameBound, GroupingElement, JoinCriteria, MergeAction, QualifiedName, Query, QueryBody,
        Relation, SelectItem, ShowCreateKind, ShowStmt, SortItem, Statement, StatsTarget,
        WindowSpecification,
    },
    std::fmt,
};

/// A table named in a statement, split into its `catalog.schema.table` parts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TableReference {
    fn from_name(name: &QualifiedName) -> Option<Self> {
        let parts = name.parts();

        let (catalog, schema, table) = match parts {
            [table] => (None, None, table),
            [schema, table] => (None, Some(schema), table),
            [.., catalog, schema, table] => (Some(catalog), Some(schema), table),
            [] => return None,
        };

        Some(Self {
            catalog: catalog.map(|part| part.0.clone()),
            schema: schema.map(|part| part.0.clone()),
            table: table.0.clone(),
        })
    }

    /// The dotted name with every known part.
    pub fn fully_qualified(&self) -> String {
        [self.catalog.as_deref(), self.schema.as_deref(), Some(self.table.as_str())]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for TableReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fully_qualified())
    }
}

/// Distinct tables referenced by `statement`, in order of first appearance.
/// Names that resolve to a `WITH` query are left out, and so are the targets
/// of `CREATE TABLE` and `CREATE VIEW`, which do not exist yet.
pub fn referenced_tables(statement: &Statement) -> Vec<TableReference> {
    let mut collector = TableCollector::default();
    collector.statement(statement);

    collector.tables
}

#[derive(Default)]
struct TableCollector {
    tables: Vec<TableReference>,
    /// Names of the `WITH` queries in scope, innermost last.
    scopes: Vec<Vec<String>>,
}

impl TableCollector {
    fn add(&mut self, name: &QualifiedName) {
        if let [single] = name.parts() {
            let shadowed = self
                .scopes
                .iter()
                .flatten()
                .any(|cte| cte.eq_ignore_ascii_case(&single.0));
            if shadowed {
                return;
            }
        }

        if let Some(table) = TableReference::from_name(name) {
            if !self.tables.contains(&table) {
                self.tables.push(table);
            }
        }
    }

    fn statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Query(query) => self.query(query),
            Statement::CreateTableAs(stmt) => self.query(&stmt.query),
            Statement::CreateView(stmt) => self.query(&stmt.query),
            Statement::DropTable { name, .. }
            | Statement::DropView { name, .. }
            | Statement::RepairTable { name }
            | Statement::Vacuum { table: name } => self.add(name),
            Statement::AlterTable(stmt) => self.add(&stmt.name),
            Statement::Insert(stmt) => {
                self.add(&stmt.table);
                self.query(&stmt.query);
            }
            Statement::Delete(stmt) => {
                self.add(&stmt.table);
                self.optional_expr(stmt.filter.as_ref());
            }
            Statement::Update(stmt) => {
                self.add(&stmt.table);
                for assignment in &stmt.assignments {
                    self.expr(&assignment.value);
                }
                self.optional_expr(stmt.filter.as_ref());
            }
            Statement::Merge(stmt) => {
                self.add(&stmt.target);
                self.relation(&stmt.source);
                self.expr(&stmt.on);
                for case in &stmt.cases {
                    self.optional_expr(case.condition.as_ref());
                    match &case.action {
                        MergeAction::Update(assignments) => {
                            for assignment in assignments {
                                self.expr(&assignment.value);
                            }
                        }
                        MergeAction::Insert { values, .. } => self.exprs(values),
                        MergeAction::Delete => {}
                    }
                }
            }
            Statement::Optimize(stmt) => {
                self.add(&stmt.table);
                self.optional_expr(stmt.filter.as_ref());
            }
            Statement::Unload(stmt) => self.query(&stmt.query),
            Statement::Show(stmt) => self.show(stmt),
            Statement::Describe(stmt) => self.add(&stmt.table),
            Statement::Explain { statement, .. } | Statement::Prepare { statement, .. } => {
                self.statement(statement)
            }
            Statement::Execute { parameters, .. } => self.exprs(parameters),
            Statement::Use { .. }
            | Statement::CreateSchema(_)
            | Statement::DropSchema { .. }
            | Statement::AlterSchema { .. }
            | Statement::CreateTable(_)
            | Statement::DescribeInput { .. }
            | Statement::DescribeOutput { .. }
            | Statement::Deallocate { .. } => {}
        }
    }

    fn show(&mut self, stmt: &ShowStmt) {
        match stmt {
            ShowStmt::Partitions(table)
            | ShowStmt::Columns { table, .. }
            | ShowStmt::TableProperties { table, .. }
            | ShowStmt::Stats(StatsTarget::Table(table)) => self.add(table),
            ShowStmt::Create {
                kind: ShowCreateKind::Table | ShowCreateKind::View,
                name,
            } => self.add(name),
            ShowStmt::Stats(StatsTarget::Query(query)) => self.query(query),
            ShowStmt::Create { .. }
            | ShowStmt::Tables { .. }
            | ShowStmt::Schemas { .. }
            | ShowStmt::Catalogs { .. }
            | ShowStmt::Views { .. }
            | ShowStmt::Functions { .. }
            | ShowStmt::Session { .. } => {}
        }
    }

    fn query(&mut self, query: &Query) {
        let scoped = query.with.is_some();

        if let Some(with) = &query.with {
            self.scopes.push(vec![]);
            if with.recursive {
                for named in &with.queries {
                    self.define(&named.name.0);
                }
            }
            for named in &with.queries {
                self.query(&named.query);
                self.define(&named.name.0);
            }
        }

        self.query_body(&query.body);
        self.sort_items(&query.order_by);

        if scoped {
            self.scopes.pop();
        }
    }

    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.push(name.to_string());
        }
    }

    fn query_body(&mut self, body: &QueryBody) {
        match body {
            QueryBody::Specification(spec) => {
                for item in &spec.select {
                    match item {
                        SelectItem::Expr { expr, .. } => self.expr(expr),
                        SelectItem::QualifiedWildcard { prefix, .. } => self.expr(prefix),
                        SelectItem::Wildcard => {}
                    }
                }
                for relation in &spec.from {
                    self.relation(relation);
                }
                self.optional_expr(spec.filter.as_ref());
                if let Some(group_by) = &spec.group_by {
                    for element in &group_by.elements {
                        match element {
                            GroupingElement::Expr(expr) => self.expr(expr),
                            GroupingElement::Rollup(exprs) | GroupingElement::Cube(exprs) => {
                                self.exprs(exprs)
                            }
                            GroupingElement::Sets(sets) => {
                                for set in sets {
                                    self.exprs(set);
                                }
                            }
                        }
                    }
                }
                self.optional_expr(spec.having.as_ref());
                for window in &spec.windows {
                    self.window_specification(&window.spec);
                }
            }
            QueryBody::Table(name) => self.add(name),
            QueryBody::Values(rows) => self.exprs(rows),
            QueryBody::Nested(query) => self.query(query),
            QueryBody::SetOperation { left, right, .. } => {
                self.query_body(left);
                self.query_body(right);
            }
        }
    }

    fn relation(&mut self, relation: &Relation) {
        match relation {
            Relation::Table { name, period, .. } => {
                self.add(name);
                if let Some(period) = period {
                    self.expr(&period.end);
                }
            }
            Relation::Subquery { query, .. } => self.query(query),
            Relation::Unnest { exprs, .. } => self.exprs(exprs),
            Relation::Nested { relation, .. } => self.relation(relation),
            Relation::Join {
                left,
                right,
                criteria,
                ..
            } => {
                self.relation(left);
                self.relation(right);
                if let Some(JoinCriteria::On(expr)) = criteria {
                    self.expr(expr);
                }
            }
            Relation::Sampled {
                relation,
                percentage,
                ..
            } => {
                self.relation(relation);
                self.expr(percentage);
            }
        }
    }

    fn sort_items(&mut self, items: &[SortItem]) {
        for item in items {
            self.expr(&item.expr);
        }
    }

    fn window_specification(&mut self, spec: &WindowSpecification) {
        self.exprs(&spec.partition_by);
        self.sort_items(&spec.order_by);

        if let Some(frame) = &spec.frame {
            for bound in [Some(&frame.start), frame.end.as_ref()].into_iter().flatten() {
                if let FrameBound::Preceding(offset) | FrameBound::Following(offset) = bound {
                    self.expr(offset);
                }
            }
        }
    }

    fn function_call(&mut self, call: &FunctionCall) {
        self.exprs(&call.args);
        self.sort_items(&call.order_by);
        self.sort_items(&call.within_group);
        if let Some(filter) = &call.filter {
            self.expr(filter);
        }
        if let Some(Window::Specification(spec)) = &call.over {
            self.window_specification(spec);
        }
    }

    fn optional_expr(&mut self, expr: Option<&Expression>) {
        if let Some(expr) = expr {
            self.expr(expr);
        }
    }

    fn exprs(&mut self, exprs: &[Expression]) {
        for expr in exprs {
            self.expr(expr);
        }
    }

    fn expr(&mut self, expr: &Expression) {
        match expr {
            Expression::Exists(query) | Expression::Subquery(query) => self.query(query),
            Expression::InSubquery { expr, subquery, .. }
            | Expression::QuantifiedComparison {
                lhs: expr,
                subquery,
                ..
            } => {
                self.expr(expr);
                self.query(subquery);
            }
            Expression::Operation(op) => {
                for operand in op.operands() {
                    self.expr(operand);
                }
            }
            Expression::Between {
                expr, low, high, ..
            } => {
                self.expr(expr);
                self.expr(low);
                self.expr(high);
            }
            Expression::InList { expr, list, .. } => {
                self.expr(expr);
                self.exprs(list);
            }
            Expression::Like {
                expr,
                pattern,
                escape,
                ..
            } => {
                self.expr(expr);
                self.expr(pattern);
                self.optional_expr(escape.as_deref());
            }
            Expression::IsDistinctFrom { lhs, rhs, .. } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            Expression::AtTimeZone { expr, zone } => {
                self.expr(expr);
                self.expr(zone);
            }
            Expression::Subscript { base, index } => {
                self.expr(base);
                self.expr(index);
            }
            Expression::Position { needle, haystack } => {
                self.expr(needle);
                self.expr(haystack);
            }
            Expression::Substring { expr, from, length } => {
                self.expr(expr);
                self.expr(from);
                self.optional_expr(length.as_deref());
            }
            Expression::Trim { chars, source, .. } => {
                self.optional_expr(chars.as_deref());
                self.expr(source);
            }
            Expression::Case {
                operand,
                whens,
                default,
            } => {
                self.optional_expr(operand.as_deref());
                for when in whens {
                    self.expr(&when.condition);
                    self.expr(&when.result);
                }
                self.optional_expr(default.as_deref());
            }
            Expression::FunctionCall(call) => self.function_call(call),
            Expression::Row(exprs) | Expression::Array(exprs) => self.exprs(exprs),
            Expression::Dereference { base: expr, .. }
            | Expression::IsNull { expr, .. }
            | Expression::Cast { expr, .. }
            | Expression::Extract { expr, .. }
            | Expression::Lambda { body: expr, .. } => self.expr(expr),
            Expression::Identifier(_)
            | Expression::Literal(_)
            | Expression::TypedLiteral { .. }
            | Expression::Interval(_)
            | Expression::Parameter(_)
            | Expression::CurrentTime { .. }
            | Expression::Grouping(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::Parser, crate::listener::MarkerCollector};

    fn tables(sql: &str) -> Vec<String> {
        let mut parser = Parser::new(sql).with_listener(MarkerCollector::new());
        let statement = parser.single_statement().unwrap();
        assert!(parser.listener().is_empty());

        referenced_tables(&statement)
            .iter()
            .map(TableReference::fully_qualified)
            .collect()
    }

    #[test]
    fn it_works() {
        assert_eq!(
            tables(
                "SELECT * FROM awsdatacatalog.sales.orders o \
                 JOIN customers c ON o.cid = c.id \
                 WHERE o.total > (SELECT avg(total) FROM sales.orders) \
                 AND c.id IN (SELECT id FROM customers)"
            ),
            vec!["awsdatacatalog.sales.orders", "customers", "sales.orders"]
        );
    }

    #[test]
    fn with_queries_are_not_tables() {
        assert_eq!(
            tables("WITH recent AS (SELECT * FROM events) SELECT * FROM recent, RECENT r2"),
            vec!["events"]
        );
        assert_eq!(
            tables("WITH t AS (SELECT * FROM t) SELECT * FROM t"),
            vec!["t"]
        );
        assert_eq!(
            tables("SELECT * FROM (WITH a AS (SELECT 1) SELECT * FROM a) x, a"),
            vec!["a"]
        );
    }

    #[test]
    fn statements() {
        assert_eq!(
            tables("INSERT INTO archive SELECT * FROM events WHERE EXISTS (TABLE flags)"),
            vec!["archive", "events", "flags"]
        );
        assert_eq!(
            tables("MERGE INTO t USING s ON t.id = s.id WHEN MATCHED THEN DELETE"),
            vec!["t", "s"]
        );
        assert_eq!(tables("CREATE TABLE copy AS SELECT * FROM src"), vec!["src"]);
        assert_eq!(tables("SHOW PARTITIONS logs.events"), vec!["logs.events"]);
        assert_eq!(tables("EXPLAIN DELETE FROM t"), vec!["t"]);
        assert!(tables("SHOW TABLES").is_empty());
    }

    #[test]
    fn parts() {
        let table = TableReference::from_name(&QualifiedName::from(vec!["c", "s", "t"])).unwrap();

        assert_eq!(table.catalog.as_deref(), Some("c"));
        assert_eq!(table.schema.as_deref(), Some("s"));
        assert_eq!(table.to_string(), "c.s.t");
    }
}
