//! The query model: entity, projected columns, filter, sort and flags.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::locale::Locale;
use super::restriction::Restriction;
use crate::compiler::CompileError;

// =============================================================================
// Aggregate Functions
// =============================================================================

/// Aggregate applied to a projected column.
///
/// `Locale` is a pseudo-aggregate: it picks the value of the best-matching
/// localized row instead of combining values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AggregateFunction {
    Max,
    Min,
    Avg,
    Sum,
    Count,
    CountDistinct,
    GroupConcat,
    GroupConcatDistinct,
    Locale,
}

impl AggregateFunction {
    pub fn name(self) -> &'static str {
        match self {
            AggregateFunction::Max => "MAX",
            AggregateFunction::Min => "MIN",
            AggregateFunction::Avg => "AVG",
            AggregateFunction::Sum => "SUM",
            AggregateFunction::Count => "COUNT",
            AggregateFunction::CountDistinct => "COUNT_DISTINCT",
            AggregateFunction::GroupConcat => "GROUP_CONCAT",
            AggregateFunction::GroupConcatDistinct => "GROUP_CONCAT_DISTINCT",
            AggregateFunction::Locale => "LOCALE",
        }
    }

    /// Whether this combines rows, i.e. anything but `Locale`.
    pub fn is_grouping(self) -> bool {
        self != AggregateFunction::Locale
    }
}

impl FromStr for AggregateFunction {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MAX" | "MAXIMUM" => Ok(AggregateFunction::Max),
            "MIN" | "MINIMUM" => Ok(AggregateFunction::Min),
            "AVG" | "AVERAGE" => Ok(AggregateFunction::Avg),
            "SUM" => Ok(AggregateFunction::Sum),
            "COUNT" => Ok(AggregateFunction::Count),
            "COUNT_DISTINCT" => Ok(AggregateFunction::CountDistinct),
            "GROUP_CONCAT" => Ok(AggregateFunction::GroupConcat),
            "GROUP_CONCAT_DISTINCT" => Ok(AggregateFunction::GroupConcatDistinct),
            "LOCALE" => Ok(AggregateFunction::Locale),
            _ => Err(CompileError::UnsupportedAggregate(s.to_string())),
        }
    }
}

impl TryFrom<String> for AggregateFunction {
    type Error = CompileError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<AggregateFunction> for String {
    fn from(func: AggregateFunction) -> Self {
        func.name().to_string()
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// =============================================================================
// Columns and Sort Descriptors
// =============================================================================

/// A projected attribute, optionally aggregated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryColumn {
    pub attribute_path: String,
    #[serde(default)]
    pub aggregate: Option<AggregateFunction>,
}

impl QueryColumn {
    pub fn new(attribute_path: &str) -> Self {
        Self {
            attribute_path: attribute_path.into(),
            aggregate: None,
        }
    }

    pub fn aggregated(attribute_path: &str, aggregate: AggregateFunction) -> Self {
        Self {
            attribute_path: attribute_path.into(),
            aggregate: Some(aggregate),
        }
    }

    /// Whether this column carries a row-combining aggregate.
    pub fn has_grouping_aggregate(&self) -> bool {
        self.aggregate.is_some_and(AggregateFunction::is_grouping)
    }
}

/// Sort on a projected column, by 0-based column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDescriptor {
    pub column_index: usize,
    pub ascending: bool,
}

impl SortDescriptor {
    pub fn new(column_index: usize, ascending: bool) -> Self {
        Self {
            column_index,
            ascending,
        }
    }

    /// Resolve sort descriptors by column identifier.
    ///
    /// `identifiers` names the columns in projection order; `names` and
    /// `ascending` are paired positionally.
    pub fn resolve_by_name(
        identifiers: &[&str],
        names: &[&str],
        ascending: &[bool],
    ) -> Result<Vec<SortDescriptor>, CompileError> {
        names
            .iter()
            .zip(ascending.iter().chain(std::iter::repeat(&true)))
            .map(|(name, asc)| {
                identifiers
                    .iter()
                    .position(|id| id == name)
                    .map(|index| SortDescriptor::new(index, *asc))
                    .ok_or_else(|| CompileError::UnknownColumn(name.to_string()))
            })
            .collect()
    }
}

// =============================================================================
// Query
// =============================================================================

fn default_true() -> bool {
    true
}

/// A query over an entity and its related entities.
///
/// Column order is significant: it determines select-list ordinals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[must_use = "builders have no effect until compiled"]
pub struct Query {
    pub entity_name: String,
    #[serde(default)]
    pub columns: Vec<QueryColumn>,
    #[serde(default)]
    pub filter: Option<Restriction>,
    /// `None` entries are rejected at compile time.
    #[serde(default)]
    pub sort: Vec<Option<SortDescriptor>>,
    #[serde(default)]
    pub locale: Locale,
    #[serde(default = "default_true")]
    pub include_id: bool,
    #[serde(default)]
    pub distinct_id: bool,
    #[serde(default)]
    pub calculate_total_count: bool,
}

impl Query {
    /// Create a query over `entity_name` that includes the id column.
    pub fn new(entity_name: &str) -> Self {
        Self {
            entity_name: entity_name.into(),
            columns: vec![],
            filter: None,
            sort: vec![],
            locale: Locale::root(),
            include_id: true,
            distinct_id: false,
            calculate_total_count: false,
        }
    }

    /// Add a plain projected column.
    pub fn column(mut self, attribute_path: &str) -> Self {
        self.columns.push(QueryColumn::new(attribute_path));
        self
    }

    /// Add an aggregated projected column.
    pub fn aggregate_column(mut self, attribute_path: &str, aggregate: AggregateFunction) -> Self {
        self.columns
            .push(QueryColumn::aggregated(attribute_path, aggregate));
        self
    }

    /// Set the filter restriction.
    pub fn filter(mut self, restriction: Restriction) -> Self {
        self.filter = Some(restriction);
        self
    }

    /// Append a sort descriptor.
    pub fn sort_by(mut self, column_index: usize, ascending: bool) -> Self {
        self.sort
            .push(Some(SortDescriptor::new(column_index, ascending)));
        self
    }

    /// Replace the sort descriptors.
    pub fn with_sort(mut self, sort: Vec<SortDescriptor>) -> Self {
        self.sort = sort.into_iter().map(Some).collect();
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn include_id(mut self, include_id: bool) -> Self {
        self.include_id = include_id;
        self
    }

    pub fn distinct_id(mut self, distinct_id: bool) -> Self {
        self.distinct_id = distinct_id;
        self
    }

    pub fn calculate_total_count(mut self, calculate: bool) -> Self {
        self.calculate_total_count = calculate;
        self
    }

    /// Whether any column carries a row-combining aggregate.
    pub fn has_grouping_aggregate(&self) -> bool {
        self.columns.iter().any(QueryColumn::has_grouping_aggregate)
    }

    /// Check the model invariants: a named entity, no null sort descriptors
    /// and in-range sort column indices.
    pub fn validate(&self) -> Result<(), CompileError> {
        if self.entity_name.trim().is_empty() {
            return Err(CompileError::MissingEntity);
        }

        for (position, descriptor) in self.sort.iter().copied().enumerate() {
            let descriptor = descriptor.ok_or(CompileError::NullSortDescriptor { position })?;
            if descriptor.column_index >= self.columns.len() {
                return Err(CompileError::SortColumnOutOfRange {
                    index: descriptor.column_index,
                    columns: self.columns.len(),
                });
            }
        }

        Ok(())
    }
}
