//! Per-group row counts for a query sorted on its grouping column.

use crate::compiler::CompileError;
use crate::model::{AggregateFunction, Operator, Query, Restriction, Value};

/// Build the query counting rows per distinct value of `query`'s primary
/// sort column.
///
/// `values` are the non-null values observed in that column; `has_null`
/// adds a branch matching rows where the attribute is null. The result
/// projects `(attribute, COUNT(*))`, keeps the source query's filter, entity and
/// locale, and sorts on the attribute in the primary sort direction.
pub fn group_count_query(
    query: &Query,
    values: Vec<Value>,
    has_null: bool,
) -> Result<Query, CompileError> {
    let primary = query
        .sort
        .first()
        .copied()
        .ok_or(CompileError::MissingPrimarySort)?
        .ok_or(CompileError::NullSortDescriptor { position: 0 })?;

    let column = query
        .columns
        .get(primary.column_index)
        .ok_or(CompileError::SortColumnOutOfRange {
            index: primary.column_index,
            columns: query.columns.len(),
        })?;
    let path = column.attribute_path.as_str();

    let null_match = || Restriction::simple(path, Operator::Equals, vec![Value::Null]);
    let group_match = match (values.is_empty(), has_null) {
        (true, true) => null_match(),
        (false, true) => Restriction::or(vec![Restriction::is_in(path, values), null_match()]),
        (_, false) => Restriction::is_in(path, values),
    };

    let filter = Restriction::and(
        query
            .filter
            .iter()
            .cloned()
            .chain(std::iter::once(group_match))
            .collect(),
    );

    Ok(Query::new(&query.entity_name)
        .with_locale(query.locale.clone())
        .column(path)
        .aggregate_column("*", AggregateFunction::Count)
        .filter(filter)
        .sort_by(0, primary.ascending)
        .calculate_total_count(true)
        .include_id(false))
}
