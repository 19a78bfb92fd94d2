use parser::{
    parse, parse_script, validate, ErrorStrategy, MarkerCollector, ParseOptions, Parser,
    MAX_NESTING_DEPTH,
};

fn assert_valid(sql: &str) {
    let markers = validate(sql);
    assert!(markers.is_empty(), "{sql}: {markers:?}");
}

fn assert_invalid(sql: &str) {
    assert!(!validate(sql).is_empty(), "{sql} was accepted");
}

#[test]
fn show_partitions() {
    assert_valid("SHOW PARTITIONS t;");
    assert_valid("SHOW PARTITIONS db.t");
    assert_invalid("SHOW PARTITIONS FROM t;");
    assert_invalid("SHOW PARTITIONS IN t;");
}

#[test]
fn alter_table_add_partition() {
    assert_valid("ALTER TABLE t ADD IF NOT EXISTS PARTITION (ds='2023-01-01');");
    assert_valid(
        "ALTER TABLE orders ADD
            PARTITION (dt = '2016-05-14', country = 'IN') LOCATION 's3://mystorage/path/to/INDIA_14_May_2016/'
            PARTITION (dt = '2016-05-15', country = 'IN') LOCATION 's3://mystorage/path/to/INDIA_15_May_2016/';",
    );
    assert_invalid("ALTER TABLE t ADD PARTITION (ds='2023-01-01'), PARTITION (ds='2023-01-02')");
    assert_invalid("ALTER TABLE t ADD IF EXISTS PARTITION (ds='2023-01-01')");
}

#[test]
fn unload() {
    assert_valid("UNLOAD (SELECT * FROM t) TO 's3://b/out/' WITH (format = 'JSON');");
    assert_valid(
        "UNLOAD (SELECT name1, address1, comment1, key1 FROM table1) \
         TO 's3://amzn-s3-demo-bucket/ unload_test_1/' \
         WITH (format = 'TEXTFILE', field_delimiter = ',', partitioned_by = ARRAY['key1'])",
    );
    assert_invalid("UNLOAD SELECT * FROM t TO 's3://b/out/'");
    assert_invalid("UNLOAD (SELECT * FROM t) TO s3_location");
}

#[test]
fn valid_statements() {
    let statements = [
        "SELECT 1",
        "select * from \"my table\" as t (a, b) where a is not null",
        "SELECT a, count(*) AS n FROM t GROUP BY a HAVING count(*) > 1 ORDER BY n DESC LIMIT 10",
        "SELECT * FROM a LEFT JOIN b ON a.id = b.id CROSS JOIN UNNEST(b.items) AS x (item)",
        "WITH x AS (SELECT 1 AS v) SELECT v FROM x UNION ALL SELECT 2",
        "SELECT CASE WHEN a > 0 THEN 'pos' ELSE 'neg' END FROM t",
        "SELECT CAST(a AS varchar), TRY_CAST(b AS decimal(10, 2)) FROM t",
        "SELECT transform(arr, x -> x * 2), reduce(arr, 0, (s, x) -> s + x, s -> s) FROM t",
        "SELECT date_trunc('day', ts) AT TIME ZONE 'UTC', ts + INTERVAL '1' DAY FROM t",
        "SELECT row_number() OVER (PARTITION BY a ORDER BY b ROWS BETWEEN 1 PRECEDING AND CURRENT ROW) FROM t",
        "SELECT * FROM t TABLESAMPLE SYSTEM (10) WHERE x BETWEEN 1 AND 2 AND y NOT IN (1, 2)",
        "SELECT map_col['key'], arr[1], struct_col.field FROM t",
        "CREATE EXTERNAL TABLE IF NOT EXISTS cloudfront_logs (`Date` DATE, Time STRING, uri STRING) \
         ROW FORMAT DELIMITED FIELDS TERMINATED BY '\\t' LOCATION 's3://b/cf/' \
         TBLPROPERTIES ('skip.header.line.count' = '2')",
        "CREATE TABLE ctas WITH (format = 'PARQUET', external_location = 's3://b/') AS SELECT * FROM t",
        "CREATE OR REPLACE VIEW v AS SELECT * FROM t",
        "DROP TABLE IF EXISTS t",
        "DROP DATABASE db CASCADE",
        "MSCK REPAIR TABLE t",
        "INSERT INTO t SELECT * FROM s",
        "DELETE FROM iceberg_table WHERE category = 'c1'",
        "UPDATE iceberg_table SET category = 'c2' WHERE category = 'c1'",
        "OPTIMIZE iceberg_table REWRITE DATA USING BIN_PACK",
        "VACUUM iceberg_table",
        "SHOW TABLES IN db '*orders*'",
        "SHOW COLUMNS IN t",
        "DESCRIBE t",
        "EXPLAIN SELECT 1",
        "PREPARE q FROM SELECT * FROM t WHERE a = ?",
        "EXECUTE q USING 1",
        "DEALLOCATE PREPARE q",
        "USE db",
        "SELECT 1 -- trailing comment",
        "/* leading */ SELECT 1;",
        "SELECT * FROM t FOR TIMESTAMP AS OF TIMESTAMP '2020-01-01 00:00:00'",
        "SELECT * FROM t FOR VERSION AS OF 949530903748831860",
        "SELECT * FROM t FOR TIMESTAMP AS OF (current_timestamp - interval '1' day) AS old JOIN t ON old.id = t.id",
        "SELECT listagg(name, ', ') WITHIN GROUP (ORDER BY name) FROM t",
        "SELECT version, within FROM t",
    ];

    for sql in statements {
        assert_valid(sql);
    }
}

#[test]
fn invalid_statements() {
    let statements = [
        "",
        ";",
        "SELECT",
        "SELECT * FROM",
        "SELECT * FROM t WHERE",
        "SELECT a b c FROM t",
        "SELECT (1 + 2 FROM t",
        "SELECT 1 2",
        "SELECT * FROM t GROUP a",
        "SELECT * FROM a JOIN b",
        "CREATE TABLE",
        "DROP t",
        "INSERT t VALUES (1)",
        "SELECT 'unterminated",
        "SELECT \"unterminated",
        "SELECT /* unterminated",
        "SELECT 1abc FROM t",
        "SELECT # FROM t",
        "SELECT 1; SELECT 2",
    ];

    for sql in statements {
        assert_invalid(sql);
    }
}

#[test]
fn markers_locate_the_error() {
    let markers = validate("SELECT *\nFROM t\nWHERE a = = 1");

    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].line, 3);
    assert_eq!(markers[0].column, 10);
    assert_eq!(markers[0].offending_text.as_deref(), Some("="));
    assert_eq!(markers[0].message, "no viable alternative at input '='");
}

#[test]
fn unclosed_parenthesis_is_conjured() {
    let outcome = parse("SELECT count(*");

    assert!(outcome.statement.is_some());
    assert_eq!(outcome.markers.len(), 1);
    assert_eq!(outcome.markers[0].message, "missing ')' at '<EOF>'");
}

#[test]
fn scripts_recover_per_statement() {
    let sql = "SELECT 1;\nSELECT FROM t;\nSHOW PARTITIONS FROM t;\nSHOW PARTITIONS t;";
    let (statements, markers) = parse_script(sql);

    assert_eq!(statements.len(), 3);
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].line, 2);
    assert_eq!(markers[1].line, 3);
}

#[test]
fn bail_reports_once() {
    let mut parser = Parser::new("SELECT FROM; SELECT # FROM; SELECT (")
        .with_listener(MarkerCollector::new())
        .with_options(ParseOptions {
            strategy: ErrorStrategy::Bail,
        });
    parser.statements();

    assert_eq!(parser.listener().markers().len(), 1);
}

#[test]
fn listeners_can_be_borrowed() {
    let mut collector = MarkerCollector::new();
    {
        let mut parser = Parser::new("SELECT 1 +").with_listener(&mut collector);
        parser.single_statement();
    }

    assert_eq!(collector.markers().len(), 1);
}

#[test]
fn nesting_limit_counts_syntactic_levels() {
    let parenthesized = |n: usize| format!("SELECT {}1{}", "(".repeat(n), ")".repeat(n));

    assert_valid(&parenthesized(MAX_NESTING_DEPTH - 1));

    let markers = validate(&parenthesized(MAX_NESTING_DEPTH + 8));
    let message = format!("input nests deeper than {MAX_NESTING_DEPTH} levels");
    assert!(markers.iter().any(|marker| marker.message == message), "{markers:?}");

    let mut sql = "SELECT 1".to_string();
    for _ in 0..24 {
        sql = format!("SELECT a FROM t WHERE a IN ({sql})");
    }
    assert_valid(&sql);
}

#[test]
fn non_ascii_input_is_reported() {
    assert_invalid("SELECT é FROM t");
    assert_invalid("SELECT\u{3000}1");
    assert_valid("SELECT 'é' FROM t");
}
