use {
    ast::token::Keyword,
    parser::{parse, parse_script, validate},
    proptest::prelude::*,
};

const FRAGMENTS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "BY", "ORDER", "LIMIT", "JOIN", "ON", "AS", "WITH",
    "UNION", "ALL", "(", ")", ",", ".", ";", "*", "=", "<", "+", "-", "'s'", "1", "2.5", "a", "t",
    "\"q\"", "CASE", "WHEN", "THEN", "END", "CAST", "ARRAY", "[", "]", "->", "SHOW", "PARTITIONS",
    "ALTER", "TABLE", "ADD", "PARTITION", "CREATE", "EXTERNAL", "INSERT", "INTO", "VALUES", "?",
];

fn identifier() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("keywords are not plain identifiers", |s| {
        s.parse::<Keyword>().is_err()
    })
}

fn token_soup() -> impl Strategy<Value = String> {
    proptest::collection::vec(proptest::sample::select(FRAGMENTS), 0..40)
        .prop_map(|fragments| fragments.join(" "))
}

fn valid_query() -> impl Strategy<Value = String> {
    (identifier(), identifier(), identifier(), 0..1000i64).prop_map(|(column, table, alias, n)| {
        format!("SELECT {column}, count(*) AS {alias} FROM {table} WHERE {column} > {n} GROUP BY {column}")
    })
}

proptest! {
    #[test]
    fn arbitrary_text_terminates(sql in "\\PC{0,64}") {
        let outcome = parse(&sql);
        let (_, markers) = parse_script(&sql);

        prop_assert!(outcome.statement.is_some() || !outcome.markers.is_empty());
        prop_assert!(markers.iter().all(|marker| marker.line >= 1));
    }

    #[test]
    fn token_soup_terminates(sql in token_soup()) {
        let outcome = parse(&sql);
        let (statements, _) = parse_script(&sql);

        prop_assert!(outcome.statement.is_some() || !outcome.markers.is_empty());
        prop_assert!(statements.len() <= sql.matches(';').count() + 1);
    }

    #[test]
    fn validation_is_deterministic(sql in token_soup()) {
        prop_assert_eq!(validate(&sql), validate(&sql));
    }

    #[test]
    fn simple_queries_are_valid(sql in valid_query()) {
        let markers = validate(&sql);

        prop_assert!(markers.is_empty(), "{}: {:?}", sql, markers);
    }

    #[test]
    fn stray_characters_are_reported(sql in valid_query(), stray in prop_oneof![Just('#'), Just('$'), Just('é'), Just('\u{3000}')]) {
        let broken = format!("{sql} {stray}");
        let markers = validate(&broken);

        prop_assert!(!markers.is_empty());
        prop_assert!(markers.iter().any(|marker| marker.message.contains(stray)));
    }
}
