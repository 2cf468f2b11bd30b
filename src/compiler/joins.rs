//! Join synthesis over projected columns and the filter tree.

use std::collections::HashSet;

use crate::hql::Join;
use crate::model::{Query, Restriction};
use crate::path::PathResolver;

/// Aliases already bound in the statement being compiled.
///
/// Append-only; seeded with the root alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet {
    ordered: Vec<String>,
    seen: HashSet<String>,
}

impl AliasSet {
    pub fn new(root_alias: &str) -> Self {
        let mut aliases = Self {
            ordered: vec![],
            seen: HashSet::new(),
        };
        aliases.insert(root_alias);
        aliases
    }

    /// Returns `true` if the alias was not present before.
    pub fn insert(&mut self, alias: &str) -> bool {
        if self.seen.insert(alias.to_string()) {
            self.ordered.push(alias.to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.seen.contains(alias)
    }

    /// Aliases in the order they were bound.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ordered.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Joins required by a query, with the aliases they bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinClauses {
    pub joins: Vec<Join>,
    pub aliases: AliasSet,
}

/// Emits one `LEFT OUTER JOIN` per distinct relation prefix.
pub struct JoinSynthesizer<'a> {
    resolver: &'a dyn PathResolver,
    aliases: AliasSet,
    joins: Vec<Join>,
}

impl<'a> JoinSynthesizer<'a> {
    pub fn new(resolver: &'a dyn PathResolver) -> Self {
        Self {
            resolver,
            aliases: AliasSet::new(resolver.root_alias()),
            joins: vec![],
        }
    }

    /// Walk the columns, then the filter tree.
    pub fn synthesize(mut self, query: &Query) -> JoinClauses {
        for column in &query.columns {
            self.visit_path(&column.attribute_path);
        }

        match &query.filter {
            Some(filter) => self.visit_restriction(filter),
            None => log::debug!("No filter criteria specified for the query"),
        }

        JoinClauses {
            joins: self.joins,
            aliases: self.aliases,
        }
    }

    fn visit_restriction(&mut self, restriction: &Restriction) {
        match restriction {
            Restriction::Simple { attribute_path, .. } => self.visit_path(attribute_path),
            Restriction::And { children } | Restriction::Or { children } => {
                for child in children.iter().flatten() {
                    self.visit_restriction(child);
                }
            }
            Restriction::Not { child } => self.visit_restriction(child),
            Restriction::Arbitrary { .. } => {}
        }
    }

    fn visit_path(&mut self, attribute_path: &str) {
        let resolved = self.resolver.resolve(attribute_path);
        if !resolved.is_related {
            return;
        }

        for len in 1..=resolved.hop_count {
            let alias = resolved.prefix_alias(len);
            if self.aliases.contains(&alias) {
                continue;
            }

            let parent = if len == 1 {
                self.resolver.root_alias().to_string()
            } else {
                resolved.prefix_alias(len - 1)
            };
            log::debug!("Joining {}.{} as {}", parent, resolved.segments[len - 1], alias);
            self.joins
                .push(Join::new(&parent, &resolved.segments[len - 1], &alias));
            self.aliases.insert(&alias);
        }
    }
}
