//! Row-count variant of a query.

use crate::hql::{column, func_distinct, Expr};
use crate::model::Query;

use super::error::{CompileError, CompileResult};
use super::params::ParamAllocator;
use super::{CompiledStatement, QueryCompiler};

impl QueryCompiler {
    /// Compile a statement counting the rows `query` would return.
    ///
    /// Both forms count `DISTINCT <root>.id`. With the id included the
    /// compiled statement's source is reused along with its parameters;
    /// without it the source is rebuilt from the model, bypassing the select,
    /// group and order stages.
    pub fn compile_count_statement(&self, query: &Query) -> CompileResult<CompiledStatement> {
        if query.include_id {
            let compiled = self.compile_statement(query)?;
            let statement = compiled
                .statement
                .with_projection_only(self.count_distinct_id());

            return Ok(CompiledStatement::new(
                statement,
                compiled.parameters,
                compiled.diagnostics,
            ));
        }

        if query.entity_name.trim().is_empty() {
            return Err(CompileError::MissingEntity);
        }

        let diagnostics = self.structural_diagnostics(query);
        let mut params = ParamAllocator::new();
        let mut statement = self.source_statement(query, &mut params)?;
        statement.select = vec![self.count_distinct_id()];

        Ok(CompiledStatement::new(
            statement,
            params.into_map(),
            diagnostics.into_vec(),
        ))
    }

    fn count_distinct_id(&self) -> Expr {
        let id = column(self.resolver.root_alias(), &self.options.id_attribute);
        func_distinct("count", vec![id])
    }
}
