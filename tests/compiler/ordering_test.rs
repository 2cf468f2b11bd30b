//! GROUP BY and ORDER BY through the full compiler.

use insta::assert_snapshot;
use pathql::compiler::{CompileError, QueryCompiler};
use pathql::model::{AggregateFunction, Query, SortDescriptor};

fn three_columns() -> Query {
    Query::new("Order")
        .column("code")
        .column("customer.name")
        .column("total")
}

fn compile(query: &Query) -> String {
    QueryCompiler::new().compile_statement(query).unwrap().text
}

#[test]
fn test_no_sort_orders_every_column_then_id() {
    assert_snapshot!(
        compile(&three_columns()),
        @"SELECT obj.id, obj.code, customer.name, obj.total FROM Order AS obj LEFT OUTER JOIN obj.customer AS customer ORDER BY 2, 3, 4, 1"
    );
}

#[test]
fn test_single_sort_descriptor_tie_breaks() {
    let text = compile(&three_columns().sort_by(1, false));
    assert!(text.ends_with("ORDER BY 3 DESC, 2, 4, 1"), "{}", text);
}

#[test]
fn test_multiple_sort_descriptors_only_append_id() {
    let query = three_columns().with_sort(vec![
        SortDescriptor::new(0, true),
        SortDescriptor::new(2, false),
    ]);
    let text = compile(&query);
    assert!(text.ends_with("ORDER BY 2 ASC, 4 DESC, 1"), "{}", text);
}

#[test]
fn test_without_id_ordinals_start_at_one() {
    let text = compile(&three_columns().include_id(false).sort_by(2, true));
    assert!(text.ends_with("ORDER BY 3 ASC, 1, 2"), "{}", text);
    assert!(text.starts_with("SELECT obj.code, customer.name, obj.total FROM"));
}

#[test]
fn test_sum_forces_group_by() {
    let query = Query::new("Order")
        .column("code")
        .column("customer.name")
        .aggregate_column("lines.quantity", AggregateFunction::Sum);

    assert_snapshot!(
        compile(&query),
        @"SELECT obj.id, obj.code, customer.name, SUM(lines.quantity) FROM Order AS obj LEFT OUTER JOIN obj.customer AS customer LEFT OUTER JOIN obj.lines AS lines GROUP BY obj.id, obj.code, customer.name ORDER BY 2, 3, 4, 1"
    );
}

#[test]
fn test_locale_only_emits_no_group_by() {
    let query = Query::new("Product")
        .column("code")
        .aggregate_column("localeData.name", AggregateFunction::Locale);

    assert!(!compile(&query).contains("GROUP BY"));
}

#[test]
fn test_group_by_precedes_order_by() {
    let query = Query::new("Order")
        .include_id(false)
        .column("status")
        .aggregate_column("*", AggregateFunction::Count)
        .sort_by(0, false);

    assert_snapshot!(
        compile(&query),
        @"SELECT obj.status, COUNT(*) FROM Order AS obj GROUP BY obj.status ORDER BY 1 DESC, 2"
    );
}

#[test]
fn test_null_sort_descriptor_is_fatal() {
    let mut query = three_columns();
    query.sort = vec![None];

    let err = QueryCompiler::new().compile_statement(&query).unwrap_err();
    assert_eq!(err, CompileError::NullSortDescriptor { position: 0 });
}

#[test]
fn test_out_of_range_sort_is_fatal() {
    let err = QueryCompiler::new()
        .compile_statement(&three_columns().sort_by(3, true))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::SortColumnOutOfRange {
            index: 3,
            columns: 3
        }
    );
}
