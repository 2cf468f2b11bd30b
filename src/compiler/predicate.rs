//! Plain (non-locale) predicate compilation.

use crate::hql::{compare, param, CompareOp, Expr};
use crate::model::{Operator, ParamValue, Query, Restriction, Value};
use crate::path::PathResolver;

use super::error::{CompileError, CompileResult};
use super::params::{base_name, ParamAllocator};
use super::projection::attribute_expr;

/// Turns a restriction tree into a boolean expression with bound parameters.
///
/// Returns `None` when the tree renders to nothing (e.g. only null children).
pub trait PredicateCompiler: Send + Sync {
    fn compile(
        &self,
        restriction: &Restriction,
        query: &Query,
        resolver: &dyn PathResolver,
        params: &mut ParamAllocator,
    ) -> CompileResult<Option<Expr>>;
}

/// Default predicate compiler.
///
/// Parameters are named after the qualified attribute with dots removed.
/// Composites with more than one rendered operand are parenthesized so the
/// result can be ANDed with further conditions safely.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhereClauseBuilder;

impl PredicateCompiler for WhereClauseBuilder {
    fn compile(
        &self,
        restriction: &Restriction,
        _query: &Query,
        resolver: &dyn PathResolver,
        params: &mut ParamAllocator,
    ) -> CompileResult<Option<Expr>> {
        compile_restriction(restriction, resolver, params)
    }
}

fn compile_restriction(
    restriction: &Restriction,
    resolver: &dyn PathResolver,
    params: &mut ParamAllocator,
) -> CompileResult<Option<Expr>> {
    match restriction {
        Restriction::Simple {
            attribute_path,
            operator,
            values,
        } => compile_simple(attribute_path, *operator, values, resolver, params).map(Some),

        Restriction::And { children } => {
            compile_composite(children, resolver, params, Expr::And)
        }

        Restriction::Or { children } => compile_composite(children, resolver, params, Expr::Or),

        Restriction::Not { child } => Ok(compile_restriction(child, resolver, params)?
            .map(|inner| Expr::Not(Box::new(parenthesize(inner))))),

        Restriction::Arbitrary { text } => Ok(Some(Expr::Raw(text.clone()).paren())),
    }
}

fn compile_composite(
    children: &[Option<Restriction>],
    resolver: &dyn PathResolver,
    params: &mut ParamAllocator,
    combine: fn(Vec<Expr>) -> Expr,
) -> CompileResult<Option<Expr>> {
    let mut operands = Vec::with_capacity(children.len());
    for child in children.iter().flatten() {
        if let Some(expr) = compile_restriction(child, resolver, params)? {
            operands.push(expr);
        }
    }

    Ok(match operands.len() {
        0 => None,
        1 => operands.pop(),
        _ => Some(combine(operands).paren()),
    })
}

fn parenthesize(expr: Expr) -> Expr {
    match expr {
        Expr::Paren(_) => expr,
        other => other.paren(),
    }
}

fn compile_simple(
    path: &str,
    operator: Operator,
    values: &[Value],
    resolver: &dyn PathResolver,
    params: &mut ParamAllocator,
) -> CompileResult<Expr> {
    let resolved = resolver.resolve(path);
    let attribute = attribute_expr(&resolved);
    let base = base_name(&resolved.qualified_identifier());

    let invalid = |message: &str| CompileError::InvalidRestriction {
        path: path.to_string(),
        operator,
        message: message.to_string(),
    };

    match operator {
        Operator::In | Operator::NotIn => {
            if values.is_empty() {
                return Err(invalid("requires at least one value"));
            }
            let name = params.bind(&base, ParamValue::List(values.to_vec()));
            Ok(Expr::In {
                expr: Box::new(attribute),
                param: name,
                negated: operator == Operator::NotIn,
            })
        }

        Operator::Between => {
            let [low, high] = values else {
                return Err(invalid("requires exactly two values"));
            };
            let low = params.bind(&base, ParamValue::Scalar(low.clone()));
            let high = params.bind(&base, ParamValue::Scalar(high.clone()));
            Ok(Expr::Between {
                expr: Box::new(attribute),
                low: Box::new(param(&low)),
                high: Box::new(param(&high)),
            })
        }

        _ => {
            let [value] = values else {
                return Err(invalid("requires exactly one value"));
            };
            compile_scalar(attribute, operator, value, &base, params)
                .ok_or_else(|| invalid("cannot compare against null"))
        }
    }
}

fn compile_scalar(
    attribute: Expr,
    operator: Operator,
    value: &Value,
    base: &str,
    params: &mut ParamAllocator,
) -> Option<Expr> {
    if value.is_null() {
        return match operator {
            Operator::Equals | Operator::NotEquals => Some(Expr::IsNull {
                expr: Box::new(attribute),
                negated: operator == Operator::NotEquals,
            }),
            _ => None,
        };
    }

    let op = match operator {
        Operator::Equals => CompareOp::Eq,
        Operator::NotEquals => CompareOp::Ne,
        Operator::GreaterThan => CompareOp::Gt,
        Operator::GreaterThanOrEqual => CompareOp::Gte,
        Operator::LessThan => CompareOp::Lt,
        Operator::LessThanOrEqual => CompareOp::Lte,
        Operator::Like | Operator::StartsWith | Operator::Contains => {
            let pattern = like_pattern(operator, value);
            let name = params.bind(base, ParamValue::Scalar(pattern));
            return Some(Expr::Like {
                expr: Box::new(attribute),
                pattern: Box::new(param(&name)),
            });
        }
        Operator::In | Operator::NotIn | Operator::Between => return None,
    };

    let name = params.bind(base, ParamValue::Scalar(value.clone()));
    Some(compare(attribute, op, param(&name)))
}

fn like_pattern(operator: Operator, value: &Value) -> Value {
    let text = match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    match operator {
        Operator::StartsWith => Value::String(format!("{}%", text)),
        Operator::Contains => Value::String(format!("%{}%", text)),
        _ => Value::String(text),
    }
}
