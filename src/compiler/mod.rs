//! Query compilation.
//!
//! A [`QueryCompiler`] turns a [`Query`] into a parameterized statement:
//!
//! ```text
//! Query → joins → where (plain + locale) → select → group by → order by → Statement
//! ```
//!
//! Each stage contributes clause fragments to a [`Statement`]; text is only
//! produced once all fragments are in place.
//!
//! # Example
//!
//! ```ignore
//! use pathql::compiler::QueryCompiler;
//! use pathql::model::{Query, Restriction};
//!
//! let query = Query::new("Order")
//!     .column("customer.name")
//!     .filter(Restriction::eq("status", "OPEN"));
//!
//! let compiled = QueryCompiler::new().compile_statement(&query)?;
//! println!("{}", compiled.text);
//! ```

pub mod count;
pub mod diagnostics;
pub mod error;
pub mod joins;
pub mod locale;
pub mod ordering;
pub mod params;
pub mod predicate;
pub mod projection;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{CompileError, CompileResult};
pub use joins::{AliasSet, JoinClauses, JoinSynthesizer};
pub use locale::LocalePredicateInjector;
pub use ordering::{compile_group_by, compile_order_by};
pub use params::ParamAllocator;
pub use predicate::{PredicateCompiler, WhereClauseBuilder};
pub use projection::compile_projection;

use serde::Serialize;

use crate::hql::{EntityRef, Expr, Statement};
use crate::model::{ParameterMap, Query};
use crate::path::{DottedPathResolver, PathResolver};

// ============================================================================
// Options
// ============================================================================

/// Naming conventions the compiler relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Alias bound to the root entity.
    pub root_alias: String,
    /// Identity attribute of the root entity.
    pub id_attribute: String,
    /// Relation segment that marks localized rows.
    pub locale_marker: String,
    /// Locale-code attribute on localized rows.
    pub locale_column: String,
    /// Width of the locale prefix used by LOCALE columns.
    pub locale_prefix_width: usize,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            root_alias: "obj".into(),
            id_attribute: "id".into(),
            locale_marker: "localeData".into(),
            locale_column: "locale".into(),
            locale_prefix_width: 10,
        }
    }
}

impl CompileOptions {
    pub fn with_root_alias(mut self, alias: &str) -> Self {
        self.root_alias = alias.into();
        self
    }

    pub fn with_id_attribute(mut self, attribute: &str) -> Self {
        self.id_attribute = attribute.into();
        self
    }

    pub fn with_locale_marker(mut self, segment: &str) -> Self {
        self.locale_marker = segment.into();
        self
    }

    pub fn with_locale_column(mut self, attribute: &str) -> Self {
        self.locale_column = attribute.into();
        self
    }

    pub fn with_locale_prefix_width(mut self, width: usize) -> Self {
        self.locale_prefix_width = width;
        self
    }
}

// ============================================================================
// Result Types
// ============================================================================

/// A compiled statement with its bound parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    /// The statement text.
    pub text: String,

    /// Values for every `:name` placeholder in `text`.
    pub parameters: ParameterMap,

    /// Warnings raised while compiling.
    #[serde(serialize_with = "serialize_diagnostics")]
    pub diagnostics: Vec<Diagnostic>,

    /// The statement IR, for callers that derive further statements.
    #[serde(skip)]
    pub statement: Statement,
}

impl CompiledStatement {
    fn new(statement: Statement, parameters: ParameterMap, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            text: statement.to_hql(),
            parameters,
            diagnostics,
            statement,
        }
    }
}

fn serialize_diagnostics<S: serde::Serializer>(
    diagnostics: &[Diagnostic],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(diagnostics.iter().map(ToString::to_string))
}

// ============================================================================
// Compiler
// ============================================================================

/// Compiles query models into statements.
///
/// Holds no per-call state; alias sets, parameters and diagnostics are
/// created fresh for every compile.
pub struct QueryCompiler {
    options: CompileOptions,
    resolver: Box<dyn PathResolver>,
    predicates: Box<dyn PredicateCompiler>,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::with_options(CompileOptions::default())
    }
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler with the default collaborators, resolving paths against
    /// `options.root_alias`.
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            resolver: Box::new(DottedPathResolver::new(&options.root_alias)),
            predicates: Box::new(WhereClauseBuilder),
            options,
        }
    }

    pub fn with_path_resolver(mut self, resolver: impl PathResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_predicate_compiler(mut self, predicates: impl PredicateCompiler + 'static) -> Self {
        self.predicates = Box::new(predicates);
        self
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile the row query.
    pub fn compile_statement(&self, query: &Query) -> CompileResult<CompiledStatement> {
        query.validate()?;
        if query.columns.is_empty() && !query.include_id {
            return Err(CompileError::EmptyProjection);
        }

        let mut diagnostics = self.structural_diagnostics(query);
        let mut params = ParamAllocator::new();

        let mut statement = self.source_statement(query, &mut params)?;
        statement.select = compile_projection(query, self.resolver.as_ref(), &self.options);
        statement.group_by = compile_group_by(
            query,
            self.resolver.as_ref(),
            &self.options,
            &mut diagnostics,
        );

        // validate() has ruled out null descriptors.
        let sort: Vec<_> = query.sort.iter().flatten().copied().collect();
        statement.order_by = compile_order_by(&sort, query.columns.len(), query.include_id);

        Ok(CompiledStatement::new(
            statement,
            params.into_map(),
            diagnostics.into_vec(),
        ))
    }

    /// Warnings about the shape of the query that do not stop compilation.
    fn structural_diagnostics(&self, query: &Query) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        if let Some(filter) = &query.filter {
            for location in filter.null_child_locations() {
                diagnostics.warn(Diagnostic::SkippedNullRestriction { location });
            }
        }
        diagnostics
    }

    /// Statement with FROM, JOIN and WHERE fragments filled in.
    fn source_statement(
        &self,
        query: &Query,
        params: &mut ParamAllocator,
    ) -> CompileResult<Statement> {
        let resolver = self.resolver.as_ref();
        let mut statement = Statement::new(EntityRef::new(
            &query.entity_name,
            resolver.root_alias(),
        ));

        statement.joins = JoinSynthesizer::new(resolver).synthesize(query).joins;
        statement.where_clause = self.compile_where(query, params)?;

        Ok(statement)
    }

    /// Top-level WHERE conjuncts: the plain filter, then one locale condition
    /// per locale column.
    fn compile_where(&self, query: &Query, params: &mut ParamAllocator) -> CompileResult<Vec<Expr>> {
        let resolver = self.resolver.as_ref();
        let mut conjuncts = vec![];

        if let Some(filter) = &query.filter {
            if let Some(expr) = self.predicates.compile(filter, query, resolver, params)? {
                conjuncts.push(expr);
            }
        }

        conjuncts.extend(
            LocalePredicateInjector::new(resolver, &self.options, query).inject(query, params),
        );

        Ok(conjuncts)
    }
}
