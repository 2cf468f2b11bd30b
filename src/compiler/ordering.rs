//! GROUP BY and ORDER BY compilation.
//!
//! Order keys are select-list ordinals. With the id included it occupies
//! ordinal 1 and the columns start at 2; otherwise the columns start at 1.

use crate::hql::{column, Expr, OrderKey, SortDir};
use crate::model::{AggregateFunction, Query, SortDescriptor};
use crate::path::PathResolver;

use super::diagnostics::{Diagnostic, Diagnostics};
use super::CompileOptions;

/// Grouping keys, or an empty list when no column carries a row-combining
/// aggregate.
///
/// LOCALE columns are aggregate expressions and are never grouped; when one
/// coexists with a true aggregate a diagnostic is recorded.
pub fn compile_group_by(
    query: &Query,
    resolver: &dyn PathResolver,
    options: &CompileOptions,
    diagnostics: &mut Diagnostics,
) -> Vec<Expr> {
    if !query.has_grouping_aggregate() {
        return vec![];
    }

    let mut keys = vec![];
    if query.include_id {
        keys.push(column(resolver.root_alias(), &options.id_attribute));
    }

    for col in &query.columns {
        match col.aggregate {
            None => {
                let resolved = resolver.resolve(&col.attribute_path);
                keys.push(column(
                    &resolved.relation_alias_name,
                    &resolved.final_attribute_name,
                ));
            }
            Some(AggregateFunction::Locale) => {
                diagnostics.warn(Diagnostic::LocaleColumnNotGrouped {
                    attribute_path: col.attribute_path.clone(),
                });
            }
            Some(_) => {}
        }
    }

    keys
}

/// Ordinal-based order keys for `column_count` projected columns.
///
/// - no descriptors: every column ordinal, direction left implicit
/// - one descriptor: its ordinal with an explicit direction, then the other
///   column ordinals as implicit tie-breakers
/// - several descriptors: each ordinal with its explicit direction
///
/// The id ordinal is always appended last when the id is included.
pub fn compile_order_by(
    sort: &[SortDescriptor],
    column_count: usize,
    include_id: bool,
) -> Vec<OrderKey> {
    let base = if include_id { 2 } else { 1 };
    let mut keys = Vec::with_capacity(column_count + 1);

    match sort {
        [] => {
            keys.extend((0..column_count).map(|index| OrderKey::implicit(index + base)));
        }
        [primary] => {
            let ordinal = primary.column_index + base;
            log::debug!("Primary sort on ordinal {}", ordinal);
            keys.push(OrderKey::directed(
                ordinal,
                SortDir::from_ascending(primary.ascending),
            ));
            keys.extend(
                (0..column_count)
                    .map(|index| index + base)
                    .filter(|&other| other != ordinal)
                    .map(OrderKey::implicit),
            );
        }
        many => {
            keys.extend(many.iter().map(|descriptor| {
                OrderKey::directed(
                    descriptor.column_index + base,
                    SortDir::from_ascending(descriptor.ascending),
                )
            }));
        }
    }

    if include_id {
        keys.push(OrderKey::implicit(1));
    }

    keys
}
