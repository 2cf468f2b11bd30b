//! Object query statement representation.
//!
//! Compiled queries are assembled as clause fragments and only rendered to
//! text at the end:
//!
//! - [`token`] - Token types and the token stream serializer
//! - [`expr`] - Expression AST for select items, predicates and group keys
//! - [`statement`] - The statement IR (select, joins, where, group by, order by)

pub mod expr;
pub mod statement;
pub mod token;

pub use expr::{
    column, compare, func, func_distinct, lit_int, lit_str, param, CompareOp, Expr, Literal,
};
pub use statement::{EntityRef, Join, OrderKey, SortDir, Statement};
pub use token::{Token, TokenStream};
