//! FILENAME: core/expr/src/evaluator.rs
//! PURPOSE: Evaluates AST expressions against a record context.
//! CONTEXT: After an expression is parsed into an AST, this module traverses
//! the tree and computes the final value. Context paths resolve against the
//! record handed in by the caller; absent paths yield null. The public
//! `evaluate` entry point absorbs every parse or evaluation failure into
//! null, so a broken calculated field degrades one field, never a render.
//!
//! SUPPORTED FEATURES:
//! - Literal evaluation: numbers, strings, booleans, null
//! - Context path lookup: amount, customer.name, params.from_date
//! - Binary operations: + - * / == != < > <= >= && ||
//! - Unary negation
//! - Ternary conditionals
//! - Functions: IF, SUM, AVG, MIN, MAX, ROUND, CONCAT, DATE_DIFF

use crate::ast::{BinaryOperator, Expression, UnaryOperator};
use crate::parser::parse;
use chrono::NaiveDate;
use model::{lookup_path, Record, Value};

/// Evaluation errors with descriptive messages. Internal only: the public
/// `evaluate` boundary converts them to null.
#[derive(Debug, PartialEq, Clone)]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        EvalError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Eval error: {}", self.message)
    }
}

impl std::error::Error for EvalError {}

pub type EvalResult<T> = Result<T, EvalError>;

// ============================================================================
// EVALUATOR
// ============================================================================

/// The expression evaluator. Holds a reference to the context record for
/// path lookups.
pub struct Evaluator<'a> {
    context: &'a Record,
}

impl<'a> Evaluator<'a> {
    pub fn new(context: &'a Record) -> Self {
        Evaluator { context }
    }

    /// Evaluates an expression tree to a value.
    pub fn eval(&self, expr: &Expression) -> EvalResult<Value> {
        match expr {
            Expression::Literal(value) => Ok(value.clone()),

            // Absent paths are null, never an error.
            Expression::Path(path) => Ok(lookup_path(self.context, path)
                .cloned()
                .unwrap_or(Value::Null)),

            Expression::UnaryOp { op, operand } => {
                let value = self.eval(operand)?;
                self.eval_unary(*op, value)
            }

            Expression::BinaryOp { left, op, right } => self.eval_binary(left, *op, right),

            Expression::Ternary {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition)?.is_truthy() {
                    self.eval(then_branch)
                } else {
                    self.eval(else_branch)
                }
            }

            Expression::FunctionCall { name, args } => self.eval_function(name, args),
        }
    }

    fn eval_unary(&self, op: UnaryOperator, value: Value) -> EvalResult<Value> {
        match op {
            UnaryOperator::Negate => Ok(value
                .as_number()
                .map(|n| Value::Number(-n))
                .unwrap_or(Value::Null)),
        }
    }

    fn eval_binary(
        &self,
        left: &Expression,
        op: BinaryOperator,
        right: &Expression,
    ) -> EvalResult<Value> {
        // && and || short-circuit and yield the deciding operand, so
        // "nickname || name" works as a fallback chain.
        match op {
            BinaryOperator::Or => {
                let left_value = self.eval(left)?;
                if left_value.is_truthy() {
                    return Ok(left_value);
                }
                return self.eval(right);
            }
            BinaryOperator::And => {
                let left_value = self.eval(left)?;
                if !left_value.is_truthy() {
                    return Ok(left_value);
                }
                return self.eval(right);
            }
            _ => {}
        }

        let left_value = self.eval(left)?;
        let right_value = self.eval(right)?;

        match op {
            BinaryOperator::Add => Ok(add_values(&left_value, &right_value)),
            BinaryOperator::Subtract => Ok(numeric_op(&left_value, &right_value, |a, b| a - b)),
            BinaryOperator::Multiply => Ok(numeric_op(&left_value, &right_value, |a, b| a * b)),
            BinaryOperator::Divide => {
                match (left_value.as_number(), right_value.as_number()) {
                    // Division by zero degrades to null rather than infinity.
                    (Some(_), Some(b)) if b == 0.0 => Ok(Value::Null),
                    (Some(a), Some(b)) => Ok(Value::Number(a / b)),
                    _ => Ok(Value::Null),
                }
            }

            BinaryOperator::Equal => Ok(Value::Bool(values_equal(&left_value, &right_value))),
            BinaryOperator::NotEqual => Ok(Value::Bool(!values_equal(&left_value, &right_value))),

            BinaryOperator::LessThan => Ok(compare_op(&left_value, &right_value, |o| {
                o == std::cmp::Ordering::Less
            })),
            BinaryOperator::GreaterThan => Ok(compare_op(&left_value, &right_value, |o| {
                o == std::cmp::Ordering::Greater
            })),
            BinaryOperator::LessEqual => Ok(compare_op(&left_value, &right_value, |o| {
                o != std::cmp::Ordering::Greater
            })),
            BinaryOperator::GreaterEqual => Ok(compare_op(&left_value, &right_value, |o| {
                o != std::cmp::Ordering::Less
            })),

            // Handled above.
            BinaryOperator::Or | BinaryOperator::And => unreachable!(),
        }
    }

    // ------------------------------------------------------------------------
    // FUNCTIONS
    // ------------------------------------------------------------------------

    /// Evaluates a function call. Dispatch is case-insensitive.
    fn eval_function(&self, name: &str, args: &[Expression]) -> EvalResult<Value> {
        let name_upper = name.to_uppercase();

        match name_upper.as_str() {
            "IF" => self.fn_if(args),
            "SUM" => self.fn_arithmetic(args, |values| values.iter().sum()),
            "AVG" | "AVERAGE" => self.fn_avg(args),
            "MIN" => self.fn_arithmetic(args, |values| {
                values.iter().cloned().fold(f64::INFINITY, f64::min)
            }),
            "MAX" => self.fn_arithmetic(args, |values| {
                values.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
            }),
            "ROUND" => self.fn_round(args),
            "CONCAT" => self.fn_concat(args),
            "DATE_DIFF" => self.fn_date_diff(args),
            _ => Err(EvalError::new(format!("Unknown function: {}", name))),
        }
    }

    /// IF(condition, then, else?) - else defaults to null.
    fn fn_if(&self, args: &[Expression]) -> EvalResult<Value> {
        if args.len() < 2 {
            return Err(EvalError::new("IF expects at least 2 arguments"));
        }
        if self.eval(&args[0])?.is_truthy() {
            self.eval(&args[1])
        } else if let Some(else_arg) = args.get(2) {
            self.eval(else_arg)
        } else {
            Ok(Value::Null)
        }
    }

    /// Shared body of SUM/MIN/MAX: coerce every argument (non-numeric
    /// arguments count as 0) and fold.
    fn fn_arithmetic(
        &self,
        args: &[Expression],
        fold: impl Fn(&[f64]) -> f64,
    ) -> EvalResult<Value> {
        if args.is_empty() {
            return Ok(Value::Null);
        }
        let values = self.coerce_args(args)?;
        Ok(Value::Number(fold(&values)))
    }

    fn fn_avg(&self, args: &[Expression]) -> EvalResult<Value> {
        if args.is_empty() {
            return Ok(Value::Null);
        }
        let values = self.coerce_args(args)?;
        let sum: f64 = values.iter().sum();
        Ok(Value::Number(sum / values.len() as f64))
    }

    /// ROUND(value, decimals?) - decimals defaults to 0.
    fn fn_round(&self, args: &[Expression]) -> EvalResult<Value> {
        if args.is_empty() {
            return Err(EvalError::new("ROUND expects at least 1 argument"));
        }
        let value = match self.eval(&args[0])?.as_number() {
            Some(n) => n,
            None => return Ok(Value::Null),
        };
        let decimals = match args.get(1) {
            Some(arg) => self.eval(arg)?.as_number().unwrap_or(0.0) as i32,
            None => 0,
        };
        let factor = 10f64.powi(decimals);
        Ok(Value::Number((value * factor).round() / factor))
    }

    fn fn_concat(&self, args: &[Expression]) -> EvalResult<Value> {
        let mut result = String::new();
        for arg in args {
            result.push_str(&self.eval(arg)?.display_text());
        }
        Ok(Value::Text(result))
    }

    /// DATE_DIFF(from, to) - whole days from `from` to `to`.
    fn fn_date_diff(&self, args: &[Expression]) -> EvalResult<Value> {
        if args.len() != 2 {
            return Err(EvalError::new("DATE_DIFF expects 2 arguments"));
        }
        let from = self.eval(&args[0])?;
        let to = self.eval(&args[1])?;
        match (parse_date(&from), parse_date(&to)) {
            (Some(from), Some(to)) => {
                Ok(Value::Number(to.signed_duration_since(from).num_days() as f64))
            }
            _ => Ok(Value::Null),
        }
    }

    fn coerce_args(&self, args: &[Expression]) -> EvalResult<Vec<f64>> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?.as_number().unwrap_or(0.0));
        }
        Ok(values)
    }
}

// ============================================================================
// VALUE SEMANTICS
// ============================================================================

/// `+` adds numerically when both sides coerce to numbers, otherwise
/// concatenates display text (so 'WO-' + code builds labels).
fn add_values(left: &Value, right: &Value) -> Value {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Value::Number(a + b),
        _ => Value::Text(format!("{}{}", left.display_text(), right.display_text())),
    }
}

fn numeric_op(left: &Value, right: &Value, op: impl Fn(f64, f64) -> f64) -> Value {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Value::Number(op(a, b)),
        _ => Value::Null,
    }
}

/// Equality compares numerically when both sides coerce (1 == '1'),
/// otherwise on display text.
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => a == b,
        _ => left.display_text() == right.display_text(),
    }
}

/// Ordering compares numerically when both sides coerce, otherwise
/// lexicographically on display text.
fn compare_op(left: &Value, right: &Value, test: impl Fn(std::cmp::Ordering) -> bool) -> Value {
    let ordering = match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => match a.partial_cmp(&b) {
            Some(ordering) => ordering,
            None => return Value::Null,
        },
        _ => left.display_text().cmp(&right.display_text()),
    };
    Value::Bool(test(ordering))
}

/// Accepts ISO dates (2026-03-01) and RFC 3339 datetimes.
fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.display_text();
    let trimmed = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|dt| dt.date_naive())
}

// ============================================================================
// PUBLIC BOUNDARY
// ============================================================================

/// Evaluates an expression string against a context record. Never panics
/// and never returns an error: any parse or evaluation failure yields
/// `Value::Null` and is logged at debug level.
pub fn evaluate(expression: &str, context: &Record) -> Value {
    let ast = match parse(expression) {
        Ok(ast) => ast,
        Err(err) => {
            log::debug!("expression {:?} failed to parse: {}", expression, err);
            return Value::Null;
        }
    };
    match Evaluator::new(context).eval(&ast) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("expression {:?} failed to evaluate: {}", expression, err);
            Value::Null
        }
    }
}
