//! Query execution boundary.
//!
//! The compiler produces statements; running them against a store is the job
//! of a [`StatementExecutor`]. [`CompilingQueryService`] ties the two together:
//!
//! ```text
//! Query → count statement → (bail out?) → row statement → ResultSet
//! ```

mod grouping;

pub use grouping::group_count_query;

use crate::compiler::{CompileError, CompiledStatement, QueryCompiler};
use crate::config::Settings;
use crate::model::{Query, Value};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while executing a query.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("No query service configured")]
    MissingService,

    #[error("Compilation failed: {0}")]
    Compile(#[from] CompileError),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type ExecutionResult<T> = Result<T, ExecutionError>;

// ============================================================================
// Result Set
// ============================================================================

/// One result row: the entity id (when the query included it) and the
/// projected column values in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSetRow {
    pub id: Option<Value>,
    pub values: Vec<Value>,
}

/// Rows returned by a query, with its total match count.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub rows: Vec<ResultSetRow>,
    /// Total number of matches, which may exceed the rows fetched.
    pub cached_row_count: u64,
    /// Whether rows were skipped because the match count was too high.
    pub bailed_out: bool,
}

impl ResultSet {
    /// A result that fetched no rows because `count` matches were too many.
    pub fn bailed_out(count: u64) -> Self {
        Self {
            rows: vec![],
            cached_row_count: count,
            bailed_out: true,
        }
    }

    /// Rows available; zero for a bailed-out query.
    pub fn row_count(&self) -> usize {
        if self.bailed_out {
            0
        } else {
            self.rows.len()
        }
    }

    pub fn row(&self, index: usize) -> Option<&ResultSetRow> {
        self.rows.get(index)
    }

    /// Value of `column` in row `row`.
    pub fn value(&self, row: usize, column: usize) -> Option<&Value> {
        self.row(row).and_then(|r| r.values.get(column))
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Runs compiled statements against a store.
pub trait StatementExecutor: Send + Sync {
    /// Fetch every row, values in select-list order.
    fn fetch_rows(&self, statement: &CompiledStatement) -> ExecutionResult<Vec<Vec<Value>>>;

    /// Run a count statement and return its single value.
    fn fetch_count(&self, statement: &CompiledStatement) -> ExecutionResult<u64>;
}

/// Executes query models.
pub trait QueryService: Send + Sync {
    fn execute(&self, query: &Query) -> ExecutionResult<ResultSet>;
}

// ============================================================================
// Compiling Service
// ============================================================================

/// A [`QueryService`] that compiles each query and hands the statements to an
/// executor.
///
/// The count statement runs when the query asks for a total count or a
/// bail-out ceiling is set; above the ceiling no rows are fetched.
pub struct CompilingQueryService<E> {
    compiler: QueryCompiler,
    executor: E,
    max_matches: Option<u64>,
}

impl<E: StatementExecutor> CompilingQueryService<E> {
    pub fn new(executor: E) -> Self {
        Self {
            compiler: QueryCompiler::new(),
            executor,
            max_matches: None,
        }
    }

    /// Service configured from settings.
    pub fn from_settings(executor: E, settings: &Settings) -> Self {
        Self {
            compiler: QueryCompiler::with_options(settings.compile_options()),
            executor,
            max_matches: settings.execution.max_matches,
        }
    }

    pub fn with_compiler(mut self, compiler: QueryCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn with_max_matches(mut self, max_matches: u64) -> Self {
        self.max_matches = Some(max_matches);
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn into_row(include_id: bool, mut values: Vec<Value>) -> ResultSetRow {
        let id = if include_id && !values.is_empty() {
            Some(values.remove(0))
        } else {
            None
        };
        ResultSetRow { id, values }
    }
}

impl<E: StatementExecutor> QueryService for CompilingQueryService<E> {
    fn execute(&self, query: &Query) -> ExecutionResult<ResultSet> {
        let count = if query.calculate_total_count || self.max_matches.is_some() {
            let statement = self.compiler.compile_count_statement(query)?;
            Some(self.executor.fetch_count(&statement)?)
        } else {
            None
        };

        if let (Some(count), Some(max)) = (count, self.max_matches) {
            if count > max {
                log::info!(
                    "Query on {} matched {} rows, more than the {} allowed; not fetching",
                    query.entity_name,
                    count,
                    max
                );
                return Ok(ResultSet::bailed_out(count));
            }
        }

        let statement = self.compiler.compile_statement(query)?;
        log::debug!("Executing: {}", statement.text);
        let rows: Vec<ResultSetRow> = self
            .executor
            .fetch_rows(&statement)?
            .into_iter()
            .map(|values| Self::into_row(query.include_id, values))
            .collect();

        Ok(ResultSet {
            cached_row_count: count.unwrap_or(rows.len() as u64),
            rows,
            bailed_out: false,
        })
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Holds the query service used by callers that configure it late.
#[derive(Default)]
pub struct QueryRunner {
    service: Option<Box<dyn QueryService>>,
}

impl QueryRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(service: impl QueryService + 'static) -> Self {
        Self {
            service: Some(Box::new(service)),
        }
    }

    pub fn set_service(&mut self, service: impl QueryService + 'static) {
        self.service = Some(Box::new(service));
    }

    fn service(&self) -> ExecutionResult<&dyn QueryService> {
        self.service
            .as_deref()
            .ok_or(ExecutionError::MissingService)
    }

    pub fn execute(&self, query: &Query) -> ExecutionResult<ResultSet> {
        self.service()?.execute(query)
    }

    /// Row counts per distinct value of the primary sort column in `results`.
    ///
    /// `results` must come from executing `query`. Entries follow the order
    /// the service returns them in. A bailed-out or empty result has no
    /// groups and runs no query.
    pub fn group_counts(&self, query: &Query, results: &ResultSet) -> ExecutionResult<Vec<(Value, u64)>> {
        let primary = query
            .sort
            .first()
            .copied()
            .flatten()
            .ok_or(CompileError::MissingPrimarySort)?;

        if results.bailed_out {
            return Ok(vec![]);
        }

        let mut values: Vec<Value> = vec![];
        let mut has_null = false;
        for index in 0..results.row_count() {
            match results.value(index, primary.column_index) {
                None | Some(Value::Null) => has_null = true,
                Some(value) if !values.contains(value) => values.push(value.clone()),
                Some(_) => {}
            }
        }

        if values.is_empty() && !has_null {
            return Ok(vec![]);
        }

        let counts = self.execute(&group_count_query(query, values, has_null)?)?;
        counts.rows.into_iter().map(group_count_row).collect()
    }
}

/// Split a `(value, COUNT(*))` row.
fn group_count_row(row: ResultSetRow) -> ExecutionResult<(Value, u64)> {
    let mut columns = row.values.into_iter();
    let (Some(value), Some(count)) = (columns.next(), columns.next()) else {
        return Err(ExecutionError::Backend(
            "Group count row is missing its value or count column".into(),
        ));
    };

    match count {
        Value::Int(n) if n >= 0 => Ok((value, n as u64)),
        other => Err(ExecutionError::Backend(format!(
            "Expected a non-negative integer group count for {}, got {}",
            value, other
        ))),
    }
}
