//! # pathql
//!
//! Compiles query models over an entity graph into parameterized object
//! queries and their row-count variants.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                     Query Model                          │
//! │  (entity, columns, restriction tree, sort, locale)       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [path resolver]
//! ┌─────────────────────────────────────────────────────────┐
//! │          Resolved paths (relation hops, aliases)         │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compiler stages]
//! ┌─────────────────────────────────────────────────────────┐
//! │   joins → where (plain + locale) → select → group/order  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [statement IR]
//! ┌─────────────────────────────────────────────────────────┐
//! │        Statement text + ParameterMap + diagnostics       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [execution boundary]
//! ┌─────────────────────────────────────────────────────────┐
//! │                      ResultSet                           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compiler;
pub mod config;
pub mod execution;
pub mod hql;
pub mod model;
pub mod path;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compiler::{
        CompileError, CompileOptions, CompileResult, CompiledStatement, Diagnostic,
        PredicateCompiler, QueryCompiler, WhereClauseBuilder,
    };
    pub use crate::config::Settings;
    pub use crate::execution::{
        CompilingQueryService, ExecutionError, QueryRunner, QueryService, ResultSet,
        ResultSetRow, StatementExecutor,
    };
    pub use crate::model::{
        AggregateFunction, Locale, Operator, ParamValue, ParameterMap, Query, QueryColumn,
        Restriction, SortDescriptor, Value,
    };
    pub use crate::path::{DottedPathResolver, PathResolver, ResolvedPath};
}

// Also export at crate root for convenience
pub use compiler::{CompileError, CompiledStatement, QueryCompiler};
pub use model::{Query, Restriction};
