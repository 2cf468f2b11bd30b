//! Join synthesis through the full compiler.

use pathql::compiler::{JoinSynthesizer, QueryCompiler};
use pathql::model::{Query, Restriction};
use pathql::path::DottedPathResolver;

fn alias_count(text: &str, alias: &str) -> usize {
    text.matches(&format!(" AS {} ", alias)).count()
}

#[test]
fn test_column_and_filter_share_one_join() {
    let query = Query::new("Order")
        .column("customer.name")
        .filter(Restriction::eq("customer.code", "C1"));

    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();
    assert_eq!(
        compiled.text.matches("LEFT OUTER JOIN obj.customer AS customer").count(),
        1
    );
}

#[test]
fn test_filter_before_column_order_still_one_join() {
    let query = Query::new("Order")
        .column("code")
        .column("carrier.address.city")
        .filter(Restriction::or(vec![
            Restriction::eq("carrier.name", "DHL"),
            Restriction::eq("carrier.address.country", "DE"),
        ]));

    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();
    assert_eq!(alias_count(&compiled.text, "carrier"), 1);
    assert_eq!(alias_count(&compiled.text, "carrieraddress"), 1);
}

#[test]
fn test_joins_follow_column_then_filter_order() {
    let query = Query::new("Order")
        .column("lines.product.code")
        .filter(Restriction::and(vec![
            Restriction::eq("customer.name", "Acme"),
            Restriction::arbitrary("obj.total > 0"),
        ]));

    let resolver = DottedPathResolver::default();
    let clauses = JoinSynthesizer::new(&resolver).synthesize(&query);
    let rendered: Vec<String> = clauses
        .joins
        .iter()
        .map(|j| j.to_tokens().serialize())
        .collect();

    assert_eq!(
        rendered,
        vec![
            "LEFT OUTER JOIN obj.lines AS lines",
            "LEFT OUTER JOIN lines.product AS linesproduct",
            "LEFT OUTER JOIN obj.customer AS customer",
        ]
    );
    assert_eq!(
        clauses.aliases.iter().collect::<Vec<_>>(),
        vec!["obj", "lines", "linesproduct", "customer"]
    );
}

#[test]
fn test_arbitrary_restriction_adds_no_join() {
    let query = Query::new("Order")
        .column("code")
        .filter(Restriction::arbitrary("obj.customer.name = 'Acme'"));

    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();
    assert!(!compiled.text.contains("JOIN"));
    assert!(compiled.text.contains("WHERE (obj.customer.name = 'Acme')"));
}
