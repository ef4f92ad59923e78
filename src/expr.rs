//! Expression tree.
//!
//! `generate_ast!` emits the `Expr` enum, one struct per node shape, a
//! `new_*` constructor for each, and the `Visitor<T>` trait that
//! `Expr::accept` dispatches to. A pass over the tree (printing, evaluation,
//! type-checking) implements `Visitor<T>` for its own result type; the
//! compiler rejects any visitor that misses a node.

use crate::token::Token;
use crate::value::Literal as Value;
use astgen::generate_ast;

generate_ast!(
    Expr,
    [
        Binary   => { left: Box<Expr>, op: Token, right: Box<Expr> };
        Grouping => { expression: Box<Expr> };
        Literal  => { value: Value };
        Unary    => { op: Token, right: Box<Expr> };
    ]
);
