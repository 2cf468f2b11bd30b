//! Statement IR - an ordered set of clause fragments rendered to text at the end.

use super::expr::Expr;
use super::token::{Token, TokenStream};

// =============================================================================
// Entity Reference
// =============================================================================

/// The root entity of a statement, bound to an alias.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRef {
    pub entity: String,
    pub alias: String,
}

impl EntityRef {
    pub fn new(entity: &str, alias: &str) -> Self {
        Self {
            entity: entity.into(),
            alias: alias.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.entity.clone()))
            .space()
            .push(Token::As)
            .space()
            .push(Token::Ident(self.alias.clone()));
        ts
    }
}

// =============================================================================
// Joins
// =============================================================================

/// A `LEFT OUTER JOIN <parent>.<relation> AS <alias>` clause.
///
/// Joins navigate a relation from an already-bound alias, so no ON
/// condition is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub parent_alias: String,
    pub relation: String,
    pub alias: String,
}

impl Join {
    pub fn new(parent_alias: &str, relation: &str, alias: &str) -> Self {
        Self {
            parent_alias: parent_alias.into(),
            relation: relation.into(),
            alias: alias.into(),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::LeftOuterJoin)
            .space()
            .push(Token::Ident(self.parent_alias.clone()))
            .push(Token::Dot)
            .push(Token::Ident(self.relation.clone()))
            .space()
            .push(Token::As)
            .space()
            .push(Token::Ident(self.alias.clone()));
        ts
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDir::Asc
        } else {
            SortDir::Desc
        }
    }
}

/// An ORDER BY key referencing a 1-based select-list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderKey {
    pub ordinal: usize,
    pub dir: Option<SortDir>,
}

impl OrderKey {
    /// Ordinal with no explicit direction.
    pub fn implicit(ordinal: usize) -> Self {
        Self { ordinal, dir: None }
    }

    pub fn directed(ordinal: usize, dir: SortDir) -> Self {
        Self {
            ordinal,
            dir: Some(dir),
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        // Ordinals are bounded by the select list length.
        ts.push(Token::LitInt(self.ordinal as i64));
        if let Some(dir) = self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }
        ts
    }
}

// =============================================================================
// Statement
// =============================================================================

/// A compiled SELECT statement.
///
/// `where_clause` holds top-level conjuncts; they are joined with `AND`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "Statement has no effect until rendered with to_hql()"]
pub struct Statement {
    pub select: Vec<Expr>,
    pub from: EntityRef,
    pub joins: Vec<Join>,
    pub where_clause: Vec<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderKey>,
}

impl Statement {
    /// Create a statement over the given root entity with empty clauses.
    pub fn new(from: EntityRef) -> Self {
        Self {
            select: vec![],
            from,
            joins: vec![],
            where_clause: vec![],
            group_by: vec![],
            order_by: vec![],
        }
    }

    /// Derive a statement that keeps this one's FROM, JOIN and WHERE fragments
    /// but selects only `projection`, with no grouping or ordering.
    pub fn with_projection_only(&self, projection: Expr) -> Statement {
        Statement {
            select: vec![projection],
            from: self.from.clone(),
            joins: self.joins.clone(),
            where_clause: self.where_clause.clone(),
            group_by: vec![],
            order_by: vec![],
        }
    }

    /// Tokens for the `<Entity> AS <alias> [joins] [WHERE ...]` portion.
    pub fn source_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.append(&self.from.to_tokens());

        for join in &self.joins {
            ts.space();
            ts.append(&join.to_tokens());
        }

        if !self.where_clause.is_empty() {
            ts.space().push(Token::Where).space();
            for (i, conjunct) in self.where_clause.iter().enumerate() {
                if i > 0 {
                    ts.space().push(Token::And).space();
                }
                ts.append(&conjunct.to_tokens());
            }
        }

        ts
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select).space();
        for (i, item) in self.select.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.append(&item.to_tokens());
        }

        ts.space().push(Token::From).space();
        ts.append(&self.source_tokens());

        if !self.group_by.is_empty() {
            ts.space().push(Token::GroupBy).space();
            for (i, key) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&key.to_tokens());
            }
        }

        if !self.order_by.is_empty() {
            ts.space().push(Token::OrderBy).space();
            for (i, key) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&key.to_tokens());
            }
        }

        ts
    }

    /// Render to statement text.
    pub fn to_hql(&self) -> String {
        self.to_tokens().serialize()
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hql())
    }
}
