//! Row-count statements.

use insta::assert_snapshot;
use pathql::compiler::QueryCompiler;
use pathql::model::{AggregateFunction, Locale, Operator, Query, Restriction, Value};

fn filtered_query() -> Query {
    Query::new("Order")
        .column("customer.name")
        .aggregate_column("localeData.label", AggregateFunction::Locale)
        .filter(Restriction::and(vec![
            Restriction::is_in("status", vec!["OPEN".into(), "HELD".into()]),
            Restriction::simple(
                "total",
                Operator::Between,
                vec![Value::Int(10), Value::Int(100)],
            ),
        ]))
        .with_locale(Locale::parse("en_GB"))
        .sort_by(0, false)
}

#[test]
fn test_count_with_id_matches_row_statement_parameters() {
    let compiler = QueryCompiler::new();
    let query = filtered_query();

    let rows = compiler.compile_statement(&query).unwrap();
    let count = compiler.compile_count_statement(&query).unwrap();

    assert_eq!(count.parameters, rows.parameters);
    for (name, value) in &rows.parameters {
        assert!(count.text.contains(&format!(":{}", name)), "missing :{}", name);
        assert_eq!(count.parameters[name].is_list(), value.is_list());
    }
    assert!(count.parameters["objstatus"].is_list());
    assert!(!count.parameters["objtotal"].is_list());
}

#[test]
fn test_count_with_id_statement() {
    let count = QueryCompiler::new()
        .compile_count_statement(&filtered_query())
        .unwrap();

    assert_snapshot!(
        count.text,
        @"SELECT COUNT(DISTINCT obj.id) FROM Order AS obj LEFT OUTER JOIN obj.customer AS customer LEFT OUTER JOIN obj.localeData AS localeData WHERE (obj.status IN (:objstatus) AND obj.total BETWEEN :objtotal AND :objtotal_1) AND (localeData.locale IN (:localeDatalocale) OR localeData.locale IS NULL)"
    );
}

#[test]
fn test_count_drops_group_and_order() {
    let query = Query::new("Order")
        .column("status")
        .aggregate_column("total", AggregateFunction::Sum)
        .sort_by(1, false);

    let count = QueryCompiler::new().compile_count_statement(&query).unwrap();
    assert!(!count.text.contains("GROUP BY"));
    assert!(!count.text.contains("ORDER BY"));
}

#[test]
fn test_count_without_id_rebuilt_from_model() {
    let query = filtered_query().include_id(false);
    let compiler = QueryCompiler::new();

    let rows = compiler.compile_statement(&query).unwrap();
    let count = compiler.compile_count_statement(&query).unwrap();

    assert!(count.text.starts_with("SELECT COUNT(DISTINCT obj.id) FROM Order AS obj"));
    assert_eq!(count.parameters, rows.parameters);
    assert!(!count.text.contains("SUBSTRING"));
}

#[test]
fn test_count_is_idempotent() {
    let compiler = QueryCompiler::new();
    let query = filtered_query();

    let first = compiler.compile_count_statement(&query).unwrap();
    let second = compiler.compile_count_statement(&query).unwrap();
    assert_eq!(first, second);
}
