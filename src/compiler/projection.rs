//! Select-list compilation.

use crate::hql::{column, func, func_distinct, lit_int, lit_str, Expr};
use crate::model::{AggregateFunction, Query, QueryColumn};
use crate::path::{PathResolver, ResolvedPath};

use super::CompileOptions;

/// Build the select items: the id (if included), then one item per column.
pub fn compile_projection(
    query: &Query,
    resolver: &dyn PathResolver,
    options: &CompileOptions,
) -> Vec<Expr> {
    let mut items = Vec::with_capacity(query.columns.len() + 1);

    if query.include_id {
        let id = column(resolver.root_alias(), &options.id_attribute);
        items.push(if query.distinct_id {
            func("distinct", vec![id])
        } else {
            id
        });
    }

    for col in &query.columns {
        items.push(column_item(col, resolver, options));
    }

    items
}

/// Qualified reference to a column's attribute, `*` passing through bare.
pub fn attribute_expr(resolved: &ResolvedPath) -> Expr {
    if resolved.final_attribute_name == "*" && !resolved.is_related {
        Expr::Star
    } else {
        column(
            &resolved.relation_alias_name,
            &resolved.final_attribute_name,
        )
    }
}

fn column_item(col: &QueryColumn, resolver: &dyn PathResolver, options: &CompileOptions) -> Expr {
    let resolved = resolver.resolve(&col.attribute_path);
    let expr = attribute_expr(&resolved);

    let Some(aggregate) = col.aggregate else {
        return expr;
    };

    match aggregate {
        AggregateFunction::Max => func("max", vec![expr]),
        AggregateFunction::Min => func("min", vec![expr]),
        AggregateFunction::Avg => func("avg", vec![expr]),
        AggregateFunction::Sum => func("sum", vec![expr]),
        AggregateFunction::Count => func("count", vec![expr]),
        AggregateFunction::CountDistinct => func_distinct("count", vec![expr]),
        AggregateFunction::GroupConcat => func("group_concat", vec![expr]),
        AggregateFunction::GroupConcatDistinct => func("group_concat_distinct", vec![expr]),
        AggregateFunction::Locale => locale_select(&resolved, expr, options),
    }
}

/// Value of the best-matching localized row.
///
/// Each row contributes its locale code padded to a fixed-width prefix
/// followed by the value; MAX picks the lexicographically greatest prefix and
/// SUBSTRING strips it off again. Rows without a locale pad to spaces and so
/// lose to any row with an explicit locale.
fn locale_select(resolved: &ResolvedPath, value: Expr, options: &CompileOptions) -> Expr {
    let width = options.locale_prefix_width;
    let locale = column(&resolved.relation_alias_name, &options.locale_column);

    let prefix = func(
        "substring",
        vec![
            func(
                "concat",
                vec![
                    func("coalesce", vec![locale, lit_str("")]),
                    lit_str(&" ".repeat(width)),
                ],
            ),
            lit_int(1),
            lit_int(width as i64),
        ],
    );

    func(
        "substring",
        vec![
            func("max", vec![func("concat", vec![prefix, value])]),
            lit_int(width as i64 + 1),
        ],
    )
}
