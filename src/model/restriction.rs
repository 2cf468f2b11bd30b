//! Filter restriction tree.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::Value;

/// Comparison operator of a simple restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Like,
    StartsWith,
    Contains,
    In,
    NotIn,
    Between,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "EQUALS",
            Operator::NotEquals => "NOT_EQUALS",
            Operator::GreaterThan => "GREATER_THAN",
            Operator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            Operator::LessThan => "LESS_THAN",
            Operator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            Operator::Like => "LIKE",
            Operator::StartsWith => "STARTS_WITH",
            Operator::Contains => "CONTAINS",
            Operator::In => "IN",
            Operator::NotIn => "NOT_IN",
            Operator::Between => "BETWEEN",
        };
        write!(f, "{}", name)
    }
}

/// A node of the filter tree.
///
/// Composite children are `Option`s: a `None` placeholder is skipped with a
/// warning by every traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Restriction {
    /// Leaf predicate over one attribute path.
    Simple {
        attribute_path: String,
        operator: Operator,
        #[serde(default)]
        values: Vec<Value>,
    },

    And {
        children: Vec<Option<Restriction>>,
    },

    Or {
        children: Vec<Option<Restriction>>,
    },

    Not {
        child: Box<Restriction>,
    },

    /// Pre-rendered predicate text with no attribute path.
    Arbitrary {
        text: String,
    },
}

impl Restriction {
    pub fn simple(attribute_path: &str, operator: Operator, values: Vec<Value>) -> Self {
        Restriction::Simple {
            attribute_path: attribute_path.into(),
            operator,
            values,
        }
    }

    pub fn eq(attribute_path: &str, value: impl Into<Value>) -> Self {
        Self::simple(attribute_path, Operator::Equals, vec![value.into()])
    }

    pub fn is_in(attribute_path: &str, values: Vec<Value>) -> Self {
        Self::simple(attribute_path, Operator::In, values)
    }

    pub fn and(children: Vec<Restriction>) -> Self {
        Restriction::And {
            children: children.into_iter().map(Some).collect(),
        }
    }

    pub fn or(children: Vec<Restriction>) -> Self {
        Restriction::Or {
            children: children.into_iter().map(Some).collect(),
        }
    }

    pub fn negate(child: Restriction) -> Self {
        Restriction::Not {
            child: Box::new(child),
        }
    }

    pub fn arbitrary(text: &str) -> Self {
        Restriction::Arbitrary { text: text.into() }
    }

    /// Locations of null children, in traversal order.
    ///
    /// Locations read like `and[1]` or `or[0].not.and[2]`.
    pub fn null_child_locations(&self) -> Vec<String> {
        let mut found = vec![];
        collect_null_children(self, "", &mut found);
        found
    }
}

fn collect_null_children(restriction: &Restriction, prefix: &str, found: &mut Vec<String>) {
    let (kind, children) = match restriction {
        Restriction::Simple { .. } | Restriction::Arbitrary { .. } => return,
        Restriction::Not { child } => {
            collect_null_children(child, &join_location(prefix, "not"), found);
            return;
        }
        Restriction::And { children } => ("and", children),
        Restriction::Or { children } => ("or", children),
    };

    for (i, child) in children.iter().enumerate() {
        let location = join_location(prefix, &format!("{}[{}]", kind, i));
        match child {
            Some(child) => collect_null_children(child, &location, found),
            None => found.push(location),
        }
    }
}

fn join_location(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", prefix, segment)
    }
}
