//! Compilation errors.

use crate::model::Operator;

/// Errors that can occur while compiling a query.
///
/// All of these are configuration or lookup errors in the caller's query
/// model; compilation never returns a partial statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error("Query has no entity name")]
    MissingEntity,

    #[error("Query projects no columns and does not include the id")]
    EmptyProjection,

    #[error("Sort descriptor at position {position} is null")]
    NullSortDescriptor { position: usize },

    #[error("Sort descriptor references column {index} but the query has {columns} columns")]
    SortColumnOutOfRange { index: usize, columns: usize },

    #[error("Unsupported aggregate function: {0}")]
    UnsupportedAggregate(String),

    #[error("Invalid {operator} restriction on '{path}': {message}")]
    InvalidRestriction {
        path: String,
        operator: Operator,
        message: String,
    },

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Query has no primary sort column")]
    MissingPrimarySort,
}

pub type CompileResult<T> = Result<T, CompileError>;
