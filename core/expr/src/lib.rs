//! FILENAME: core/expr/src/lib.rs
//! PURPOSE: Library root for the Relato expression language.
//! CONTEXT: This crate exposes the lexer, parser, and evaluator used for
//! calculated fields and conditional texts in report templates.
//!
//! PIPELINE: Expression String --> Lexer --> Tokens --> Parser --> AST --> Evaluator
//!
//! SUPPORTED FEATURES:
//! - Arithmetic: +, -, *, /
//! - Comparison: ==, !=, <, >, <=, >=
//! - Logical: &&, || (value-returning), cond ? a : b
//! - Context paths: amount, customer.name, params.from_date
//! - Function calls: IF, SUM, AVG, MIN, MAX, ROUND, CONCAT, DATE_DIFF
//! - Parentheses for grouping, unary negation
//!
//! The grammar is closed: expressions can read the context handed to them
//! and nothing else. Failures never escape - the `evaluate` boundary turns
//! them into null.

pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod token;


// Re-export commonly used types for convenience
pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use evaluator::{evaluate, EvalError, Evaluator};
pub use lexer::Lexer;
pub use parser::{parse, ParseError, ParseResult, Parser};
pub use token::Token;
