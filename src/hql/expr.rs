//! Expression AST for select items, predicates and group keys.
//!
//! Every variant must be handled in `to_tokens()` - the compiler enforces this.

use super::token::{Token, TokenStream};

/// An object query expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Qualified attribute reference: alias.attribute
    Column { alias: String, attribute: String },

    /// Wildcard `*` (as in `COUNT(*)`).
    Star,

    /// Literal values
    Literal(Literal),

    /// Named parameter placeholder
    Param(String),

    /// Function call: name(args...), optionally `name(DISTINCT args...)`
    Function {
        name: String,
        args: Vec<Expr>,
        distinct: bool,
    },

    /// Comparison: left op right
    Compare {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },

    /// LIKE: expr LIKE pattern
    Like { expr: Box<Expr>, pattern: Box<Expr> },

    /// IN over a multi-valued parameter: expr [NOT] IN (:param)
    In {
        expr: Box<Expr>,
        param: String,
        negated: bool,
    },

    /// BETWEEN: expr BETWEEN low AND high
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
    },

    /// IS NULL / IS NOT NULL
    IsNull { expr: Box<Expr>, negated: bool },

    /// Conjunction of operands, rendered without surrounding parentheses.
    And(Vec<Expr>),

    /// Disjunction of operands, rendered without surrounding parentheses.
    Or(Vec<Expr>),

    /// NOT expr
    Not(Box<Expr>),

    /// Parenthesized expression
    Paren(Box<Expr>),

    /// Opaque predicate text supplied by the caller.
    Raw(String),
}

/// Literal values that can appear inline in a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    String(String),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
}

impl CompareOp {
    fn token(self) -> Token {
        match self {
            CompareOp::Eq => Token::Eq,
            CompareOp::Ne => Token::Ne,
            CompareOp::Lt => Token::Lt,
            CompareOp::Gt => Token::Gt,
            CompareOp::Lte => Token::Lte,
            CompareOp::Gte => Token::Gte,
        }
    }
}

impl Expr {
    /// Convert to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Column { alias, attribute } => {
                ts.push(Token::Ident(alias.clone()))
                    .push(Token::Dot)
                    .push(Token::Ident(attribute.clone()));
            }

            Expr::Star => {
                ts.push(Token::Star);
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::String(s) => Token::LitString(s.clone()),
                });
            }

            Expr::Param(name) => {
                ts.push(Token::Param(name.clone()));
            }

            Expr::Function {
                name,
                args,
                distinct,
            } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                if *distinct {
                    ts.push(Token::Distinct).space();
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        ts.comma().space();
                    }
                    ts.append(&arg.to_tokens());
                }
                ts.rparen();
            }

            Expr::Compare { left, op, right } => {
                ts.append(&left.to_tokens());
                ts.space().push(op.token()).space();
                ts.append(&right.to_tokens());
            }

            Expr::Like { expr, pattern } => {
                ts.append(&expr.to_tokens());
                ts.space().push(Token::Like).space();
                ts.append(&pattern.to_tokens());
            }

            Expr::In {
                expr,
                param,
                negated,
            } => {
                ts.append(&expr.to_tokens());
                ts.space();
                if *negated {
                    ts.push(Token::Not).space();
                }
                ts.push(Token::In)
                    .space()
                    .lparen()
                    .push(Token::Param(param.clone()))
                    .rparen();
            }

            Expr::Between { expr, low, high } => {
                ts.append(&expr.to_tokens());
                ts.space().push(Token::Between).space();
                ts.append(&low.to_tokens());
                ts.space().push(Token::And).space();
                ts.append(&high.to_tokens());
            }

            Expr::IsNull { expr, negated } => {
                ts.append(&expr.to_tokens());
                ts.space().push(if *negated {
                    Token::IsNotNull
                } else {
                    Token::IsNull
                });
            }

            Expr::And(operands) => append_joined(&mut ts, operands, Token::And),

            Expr::Or(operands) => append_joined(&mut ts, operands, Token::Or),

            Expr::Not(inner) => {
                ts.push(Token::Not).space();
                ts.append(&inner.to_tokens());
            }

            Expr::Paren(inner) => {
                ts.lparen();
                ts.append(&inner.to_tokens());
                ts.rparen();
            }

            Expr::Raw(text) => {
                ts.push(Token::Raw(text.clone()));
            }
        }

        ts
    }

    /// Render to statement text.
    pub fn to_hql(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Wrap in parentheses.
    pub fn paren(self) -> Expr {
        Expr::Paren(Box::new(self))
    }
}

fn append_joined(ts: &mut TokenStream, operands: &[Expr], keyword: Token) {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            ts.space().push(keyword.clone()).space();
        }
        ts.append(&operand.to_tokens());
    }
}

// =============================================================================
// Constructors
// =============================================================================

/// Qualified attribute reference.
pub fn column(alias: &str, attribute: &str) -> Expr {
    Expr::Column {
        alias: alias.into(),
        attribute: attribute.into(),
    }
}

/// Named parameter placeholder.
pub fn param(name: &str) -> Expr {
    Expr::Param(name.into())
}

pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: false,
    }
}

/// Function call with `DISTINCT` applied to its arguments.
pub fn func_distinct(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
        distinct: true,
    }
}

/// Comparison between two expressions.
pub fn compare(left: Expr, op: CompareOp, right: Expr) -> Expr {
    Expr::Compare {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}
