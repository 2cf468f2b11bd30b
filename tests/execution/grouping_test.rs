//! Per-group row counts for queries sorted on a grouping column.

use insta::assert_snapshot;
use pathql::compiler::{CompileError, CompiledStatement, QueryCompiler};
use pathql::execution::{
    group_count_query, CompilingQueryService, ExecutionError, ExecutionResult, QueryRunner,
    ResultSet, ResultSetRow, StatementExecutor,
};
use pathql::model::{Locale, ParamValue, Query, Restriction, Value};

/// Any statement reaching this executor fails the call.
struct UnreachableExecutor;

impl StatementExecutor for UnreachableExecutor {
    fn fetch_rows(&self, statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>> {
        Err(ExecutionError::Backend(format!("unexpected statement: {}", statement.text)))
    }

    fn fetch_count(&self, statement: &CompiledStatement) -> ExecutionResult<u64> {
        Err(ExecutionError::Backend(format!("unexpected statement: {}", statement.text)))
    }
}

fn by_status() -> Query {
    Query::new("Order").column("status").sort_by(0, true)
}

#[test]
fn test_group_count_query_compiles() {
    let query = Query::new("Order")
        .column("code")
        .column("customer.name")
        .filter(Restriction::eq("status", "OPEN"))
        .sort_by(1, false)
        .with_locale(Locale::parse("en"));

    let counts = group_count_query(&query, vec!["Acme".into(), "Bolt".into()], true).unwrap();
    let compiled = QueryCompiler::new().compile_statement(&counts).unwrap();

    assert_snapshot!(
        compiled.text,
        @"SELECT customer.name, COUNT(*) FROM Order AS obj LEFT OUTER JOIN obj.customer AS customer WHERE (obj.status = :objstatus AND (customer.name IN (:customername) OR customer.name IS NULL)) GROUP BY customer.name ORDER BY 1 DESC, 2"
    );
    assert_eq!(
        compiled.parameters["customername"],
        ParamValue::List(vec![Value::from("Acme"), Value::from("Bolt")])
    );
}

#[test]
fn test_group_count_query_without_primary_sort() {
    let query = Query::new("Order").column("code");
    assert_eq!(
        group_count_query(&query, vec![], false).unwrap_err(),
        CompileError::MissingPrimarySort
    );
}

#[test]
fn test_empty_result_has_no_groups() {
    let runner = QueryRunner::with_service(CompilingQueryService::new(UnreachableExecutor));

    let counts = runner.group_counts(&by_status(), &ResultSet::default()).unwrap();
    assert!(counts.is_empty());
}

#[test]
fn test_bailed_out_result_has_no_groups() {
    let service = CompilingQueryService::new(UnreachableExecutor).with_max_matches(10);
    let runner = QueryRunner::with_service(service);

    let counts = runner
        .group_counts(&by_status(), &ResultSet::bailed_out(5000))
        .unwrap();
    assert!(counts.is_empty());
}

#[test]
fn test_only_null_values_count_the_null_group() {
    struct NullGroupExecutor;

    impl StatementExecutor for NullGroupExecutor {
        fn fetch_rows(&self, statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>> {
            assert!(statement.text.contains("obj.status IS NULL"));
            Ok(vec![vec![Value::Null, Value::Int(4)]])
        }

        fn fetch_count(&self, _statement: &CompiledStatement) -> ExecutionResult<u64> {
            Ok(1)
        }
    }

    let service = CompilingQueryService::new(NullGroupExecutor);
    let results = ResultSet {
        rows: vec![ResultSetRow {
            id: Some(Value::Int(9)),
            values: vec![Value::Null],
        }],
        cached_row_count: 1,
        bailed_out: false,
    };

    let runner = QueryRunner::with_service(service);
    let counts = runner.group_counts(&by_status(), &results).unwrap();
    assert_eq!(counts, vec![(Value::Null, 4)]);
}

#[test]
fn test_string_count_is_a_backend_error() {
    struct StringCountExecutor;

    impl StatementExecutor for StringCountExecutor {
        fn fetch_rows(&self, _statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>> {
            Ok(vec![vec!["OPEN".into(), "3".into()]])
        }

        fn fetch_count(&self, _statement: &CompiledStatement) -> ExecutionResult<u64> {
            Ok(1)
        }
    }

    let runner = QueryRunner::with_service(CompilingQueryService::new(StringCountExecutor));
    let results = ResultSet {
        rows: vec![ResultSetRow {
            id: Some(Value::Int(1)),
            values: vec!["OPEN".into()],
        }],
        cached_row_count: 1,
        bailed_out: false,
    };

    let err = runner.group_counts(&by_status(), &results).unwrap_err();
    assert!(
        matches!(err, ExecutionError::Backend(ref msg) if msg.contains("got '3'")),
        "unexpected error: {}",
        err
    );
}
