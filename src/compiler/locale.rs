//! Locale-fallback predicate injection.
//!
//! Localized values live in related rows carrying a locale code. For every
//! LOCALE column and every filter on a locale-bearing relation, the candidate
//! rows are limited to the query locale's fallback hierarchy plus rows with
//! no locale at all.

use std::collections::HashSet;

use crate::hql::{column, Expr};
use crate::model::{AggregateFunction, ParamValue, Query, Restriction, Value};
use crate::path::{PathResolver, ResolvedPath};

use super::params::{base_name, ParamAllocator};
use super::CompileOptions;

/// Produces one locale condition per distinct locale column.
pub struct LocalePredicateInjector<'a> {
    resolver: &'a dyn PathResolver,
    options: &'a CompileOptions,
    hierarchy: Vec<String>,
    seen: HashSet<String>,
    conditions: Vec<Expr>,
}

impl<'a> LocalePredicateInjector<'a> {
    pub fn new(resolver: &'a dyn PathResolver, options: &'a CompileOptions, query: &Query) -> Self {
        Self {
            resolver,
            options,
            hierarchy: query.locale.fallback_hierarchy(),
            seen: HashSet::new(),
            conditions: vec![],
        }
    }

    /// Walk LOCALE columns, then locale-bearing filter leaves, returning the
    /// parenthesized conditions to AND onto the WHERE clause.
    pub fn inject(mut self, query: &Query, params: &mut ParamAllocator) -> Vec<Expr> {
        for col in &query.columns {
            if col.aggregate == Some(AggregateFunction::Locale) {
                let resolved = self.resolver.resolve(&col.attribute_path);
                self.add_condition(&resolved, params);
            }
        }

        if let Some(filter) = &query.filter {
            self.visit_restriction(filter, params);
        }

        self.conditions
    }

    fn visit_restriction(&mut self, restriction: &Restriction, params: &mut ParamAllocator) {
        match restriction {
            Restriction::Simple { attribute_path, .. } => {
                let resolved = self.resolver.resolve(attribute_path);
                if self.is_locale_bearing(&resolved) {
                    self.add_condition(&resolved, params);
                }
            }
            Restriction::And { children } | Restriction::Or { children } => {
                for child in children.iter().flatten() {
                    self.visit_restriction(child, params);
                }
            }
            Restriction::Not { child } => self.visit_restriction(child, params),
            Restriction::Arbitrary { .. } => {}
        }
    }

    fn is_locale_bearing(&self, resolved: &ResolvedPath) -> bool {
        resolved
            .segments
            .iter()
            .any(|segment| *segment == self.options.locale_marker)
    }

    fn add_condition(&mut self, resolved: &ResolvedPath, params: &mut ParamAllocator) {
        let alias = &resolved.relation_alias_name;
        let qualified = format!("{}.{}", alias, self.options.locale_column);
        if !self.seen.insert(qualified.clone()) {
            return;
        }

        let locale_column = column(alias, &self.options.locale_column);
        let is_null = Expr::IsNull {
            expr: Box::new(locale_column.clone()),
            negated: false,
        };

        let condition = if self.hierarchy.is_empty() {
            is_null
        } else {
            let values = self.hierarchy.iter().cloned().map(Value::String).collect();
            let name = params.bind(&base_name(&qualified), ParamValue::List(values));
            Expr::Or(vec![
                Expr::In {
                    expr: Box::new(locale_column),
                    param: name,
                    negated: false,
                },
                is_null,
            ])
        };

        self.conditions.push(condition.paren());
    }
}
