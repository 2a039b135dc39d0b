//! FILENAME: core/expr/src/ast.rs
//! PURPOSE: Defines the Abstract Syntax Tree (AST) for expressions.
//! CONTEXT: After the Lexer tokenizes an expression string, the Parser
//! converts those tokens into this tree structure. The Evaluator then
//! traverses the tree to compute the final value.
//!
//! SUPPORTED EXPRESSIONS:
//! - Literals: numbers, strings, booleans, null
//! - Context paths: amount, customer.name, items.0.sku
//! - Binary operations: + - * / == != < > <= >= && ||
//! - Unary negation: -x
//! - Ternary conditionals: cond ? a : b
//! - Function calls: SUM(a, b), IF(x > 0, 'yes', 'no')

use model::Value;

/// A parsed expression. This is the structure the evaluator traverses.
#[derive(Debug, PartialEq, Clone)]
pub enum Expression {
    /// A literal value: number, string, boolean or null.
    Literal(Value),

    /// A dotted lookup path into the evaluation context. An absent path
    /// evaluates to null, never an error.
    Path(String),

    /// A binary operation: left op right.
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// A unary operation: op operand (e.g. -5).
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// A conditional: condition ? then_branch : else_branch.
    Ternary {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },

    /// A function call like SUM(2, 3) or IF(a > b, 'hi', 'lo').
    FunctionCall { name: String, args: Vec<Expression> },
}

/// Binary operators, listed by precedence group (|| is lowest).
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BinaryOperator {
    // Logical (lowest precedence)
    Or,  // ||
    And, // &&

    // Equality
    Equal,    // ==
    NotEqual, // !=

    // Comparison
    LessThan,     // <
    GreaterThan,  // >
    LessEqual,    // <=
    GreaterEqual, // >=

    // Arithmetic
    Add,      // + (concatenates when either side is non-numeric text)
    Subtract, // -
    Multiply, // *
    Divide,   // / (highest precedence among binary ops)
}

/// Unary operators.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum UnaryOperator {
    Negate, // -
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinaryOperator::Or => write!(f, "||"),
            BinaryOperator::And => write!(f, "&&"),
            BinaryOperator::Equal => write!(f, "=="),
            BinaryOperator::NotEqual => write!(f, "!="),
            BinaryOperator::LessThan => write!(f, "<"),
            BinaryOperator::GreaterThan => write!(f, ">"),
            BinaryOperator::LessEqual => write!(f, "<="),
            BinaryOperator::GreaterEqual => write!(f, ">="),
            BinaryOperator::Add => write!(f, "+"),
            BinaryOperator::Subtract => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::Divide => write!(f, "/"),
        }
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOperator::Negate => write!(f, "-"),
        }
    }
}
