//! Locale-fallback conditions and LOCALE columns.

use insta::assert_snapshot;
use pathql::compiler::{CompileOptions, Diagnostic, QueryCompiler};
use pathql::model::{AggregateFunction, Locale, ParamValue, Query, Restriction, Value};

fn product_query() -> Query {
    Query::new("Product")
        .column("code")
        .aggregate_column("localeData.name", AggregateFunction::Locale)
        .with_locale(Locale::new("en", "US"))
}

#[test]
fn test_locale_column_statement() {
    let compiled = QueryCompiler::new().compile_statement(&product_query()).unwrap();

    assert_snapshot!(
        compiled.text,
        @"SELECT obj.id, obj.code, SUBSTRING(MAX(CONCAT(SUBSTRING(CONCAT(COALESCE(localeData.locale, ''), '          '), 1, 10), localeData.name)), 11) FROM Product AS obj LEFT OUTER JOIN obj.localeData AS localeData WHERE (localeData.locale IN (:localeDatalocale) OR localeData.locale IS NULL) ORDER BY 2, 3, 1"
    );
    assert_eq!(
        compiled.parameters["localeDatalocale"],
        ParamValue::List(vec![Value::from("en_US"), Value::from("en")])
    );
}

#[test]
fn test_locale_condition_deduplicated_across_columns_and_filters() {
    let query = product_query()
        .aggregate_column("localeData.description", AggregateFunction::Locale)
        .filter(Restriction::or(vec![
            Restriction::eq("localeData.name", "Widget"),
            Restriction::eq("localeData.description", "Blue"),
        ]));

    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();
    assert_eq!(compiled.text.matches("localeData.locale IS NULL").count(), 1);

    let locale_params: Vec<_> = compiled
        .parameters
        .keys()
        .filter(|name| name.starts_with("localeDatalocale"))
        .collect();
    assert_eq!(locale_params, vec!["localeDatalocale"]);
}

#[test]
fn test_locale_condition_anded_with_filter() {
    let query = product_query().filter(Restriction::eq("status", "ACTIVE"));
    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();

    assert!(compiled.text.contains(
        "WHERE obj.status = :objstatus AND (localeData.locale IN (:localeDatalocale) OR localeData.locale IS NULL)"
    ));
}

#[test]
fn test_root_locale_emits_only_null_branch() {
    let query = product_query().with_locale(Locale::root());
    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();

    assert!(compiled.text.contains("WHERE (localeData.locale IS NULL)"));
    assert!(compiled.parameters.is_empty());
}

#[test]
fn test_locale_filter_on_nested_relation() {
    let query = Query::new("Order")
        .column("code")
        .filter(Restriction::eq("product.localeData.name", "Widget"))
        .with_locale(Locale::parse("de_CH"));

    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();
    assert!(compiled
        .text
        .contains("LEFT OUTER JOIN product.localeData AS productlocaleData"));
    assert!(compiled
        .text
        .contains("(productlocaleData.locale IN (:productlocaleDatalocale) OR productlocaleData.locale IS NULL)"));
    assert_eq!(
        compiled.parameters["productlocaleDatalocale"],
        ParamValue::List(vec![Value::from("de_CH"), Value::from("de")])
    );
}

#[test]
fn test_locale_column_with_true_aggregate_is_not_grouped() {
    let query = product_query().aggregate_column("stock.quantity", AggregateFunction::Sum);
    let compiled = QueryCompiler::new().compile_statement(&query).unwrap();

    assert!(compiled.text.contains("GROUP BY obj.id, obj.code ORDER BY"));
    assert_eq!(
        compiled.diagnostics,
        vec![Diagnostic::LocaleColumnNotGrouped {
            attribute_path: "localeData.name".into()
        }]
    );
}

#[test]
fn test_custom_locale_conventions() {
    let options = CompileOptions::default()
        .with_locale_marker("translations")
        .with_locale_column("lang")
        .with_locale_prefix_width(4);
    let query = Query::new("Product")
        .include_id(false)
        .aggregate_column("translations.title", AggregateFunction::Locale)
        .with_locale(Locale::parse("fr"));

    let compiled = QueryCompiler::with_options(options)
        .compile_statement(&query)
        .unwrap();

    assert_snapshot!(
        compiled.text,
        @"SELECT SUBSTRING(MAX(CONCAT(SUBSTRING(CONCAT(COALESCE(translations.lang, ''), '    '), 1, 4), translations.title)), 5) FROM Product AS obj LEFT OUTER JOIN obj.translations AS translations WHERE (translations.lang IN (:translationslang) OR translations.lang IS NULL) ORDER BY 1"
    );
}
