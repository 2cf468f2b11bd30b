//! Query execution through a compiling service.

use std::sync::{Arc, Mutex};

use pathql::compiler::CompiledStatement;
use pathql::config::Settings;
use pathql::execution::{
    CompilingQueryService, ExecutionError, ExecutionResult, QueryRunner, QueryService,
    StatementExecutor,
};
use pathql::model::{Query, Restriction, Value};

/// Returns canned rows and records every statement it sees.
#[derive(Clone, Default)]
struct RecordingExecutor {
    count: u64,
    rows: Vec<Vec<Value>>,
    seen: Arc<Mutex<Vec<CompiledStatement>>>,
}

impl StatementExecutor for RecordingExecutor {
    fn fetch_rows(&self, statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>> {
        self.seen.lock().unwrap().push(statement.clone());
        Ok(self.rows.clone())
    }

    fn fetch_count(&self, statement: &CompiledStatement) -> ExecutionResult<u64> {
        self.seen.lock().unwrap().push(statement.clone());
        Ok(self.count)
    }
}

struct FailingExecutor;

impl StatementExecutor for FailingExecutor {
    fn fetch_rows(&self, _statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>> {
        Err(ExecutionError::Backend("connection reset".into()))
    }

    fn fetch_count(&self, _statement: &CompiledStatement) -> ExecutionResult<u64> {
        Err(ExecutionError::Backend("connection reset".into()))
    }
}

fn open_orders() -> Query {
    Query::new("Order")
        .column("code")
        .column("customer.name")
        .filter(Restriction::eq("status", "OPEN"))
        .calculate_total_count(true)
}

#[test]
fn test_count_then_rows_share_parameters() {
    let executor = RecordingExecutor {
        count: 2,
        rows: vec![
            vec![Value::Int(1), "A-1".into(), "Acme".into()],
            vec![Value::Int(2), "A-2".into(), Value::Null],
        ],
        ..Default::default()
    };
    let seen = executor.seen.clone();
    let service = CompilingQueryService::new(executor);

    let results = service.execute(&open_orders()).unwrap();
    assert_eq!(results.row_count(), 2);
    assert_eq!(results.cached_row_count, 2);
    assert_eq!(results.value(1, 1), Some(&Value::Null));
    assert_eq!(results.row(1).unwrap().id, Some(Value::Int(2)));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[0].text.starts_with("SELECT COUNT(DISTINCT obj.id)"));
    assert!(seen[1].text.starts_with("SELECT obj.id, obj.code, customer.name"));
    assert_eq!(seen[0].parameters, seen[1].parameters);
}

#[test]
fn test_max_matches_from_settings() {
    let settings = Settings::from_toml("[execution]\nmax_matches = 10\n").unwrap();
    let executor = RecordingExecutor {
        count: 11,
        ..Default::default()
    };
    let seen = executor.seen.clone();
    let service = CompilingQueryService::from_settings(executor, &settings);

    let results = service
        .execute(&open_orders().calculate_total_count(false))
        .unwrap();
    assert!(results.bailed_out);
    assert_eq!(results.row_count(), 0);
    assert_eq!(results.cached_row_count, 11);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_settings_conventions_reach_the_compiler() {
    let settings =
        Settings::from_toml("[compiler]\nroot_alias = \"o\"\nid_attribute = \"pk\"\n").unwrap();
    let executor = RecordingExecutor::default();
    let seen = executor.seen.clone();
    let service = CompilingQueryService::from_settings(executor, &settings);

    service.execute(&Query::new("Order").column("code")).unwrap();
    assert_eq!(
        seen.lock().unwrap()[0].text,
        "SELECT o.pk, o.code FROM Order AS o ORDER BY 2, 1"
    );
}

#[test]
fn test_backend_errors_surface() {
    let runner = QueryRunner::with_service(CompilingQueryService::new(FailingExecutor));
    let err = runner.execute(&open_orders()).unwrap_err();
    assert!(matches!(err, ExecutionError::Backend(ref msg) if msg == "connection reset"));
}

#[test]
fn test_runner_service_set_late() {
    let mut runner = QueryRunner::new();
    assert!(matches!(
        runner.execute(&open_orders()),
        Err(ExecutionError::MissingService)
    ));

    runner.set_service(CompilingQueryService::new(RecordingExecutor::default()));
    let results = runner.execute(&open_orders()).unwrap();
    assert_eq!(results.row_count(), 0);
    assert!(!results.bailed_out);
}
