//! Condition evaluation
//!
//! Conditions are boolean expressions over event field names, e.g.
//! `temp > 40 && zone == "A"`. Parsing and evaluation are delegated to
//! `evalexpr`; event fields are bound as variables.
//!
//! All numbers are compared and computed as floats: event integers and
//! integer literals in the condition are widened, so `used / total` is a
//! fraction and `temp == 45` matches a reading of `45.0`.
//!
//! Evaluation is fail-closed: [`matches`] turns every parse or evaluation
//! failure into `false`.

use crate::domain::{Event, FieldValue};
use crate::error::EvaluationError;
use evalexpr::{ContextWithMutableVariables, HashMapContext, Node, Operator, Value};

/// Evaluates a textual condition against an event
pub trait ConditionEvaluator: Send + Sync {
    /// Evaluate the condition, reporting why it could not be evaluated
    fn evaluate(&self, condition: &str, event: &Event) -> Result<bool, EvaluationError>;
}

/// Evaluator backed by the `evalexpr` expression language
///
/// Supports comparison (`> >= < <= == !=`), logical (`&& || !`) and
/// arithmetic (`+ - * / %`) operators, parentheses, and string, number
/// and boolean literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprEvaluator;

impl ExprEvaluator {
    /// Create a new evaluator
    pub fn new() -> Self {
        Self
    }

    fn context_for(event: &Event) -> Result<HashMapContext, EvaluationError> {
        let mut context = HashMapContext::new();
        for (name, value) in event.iter() {
            context
                .set_value(name.clone(), to_value(value))
                .map_err(|e| EvaluationError::Evaluate(e.to_string()))?;
        }
        Ok(context)
    }
}

impl ConditionEvaluator for ExprEvaluator {
    fn evaluate(&self, condition: &str, event: &Event) -> Result<bool, EvaluationError> {
        let tree = evalexpr::build_operator_tree(&float_literals(condition))
            .map_err(|e| EvaluationError::Parse(e.to_string()))?;
        let context = Self::context_for(event)?;

        check_divisors(&tree, &context)?;
        tree.eval_boolean_with_context(&context)
            .map_err(|e| EvaluationError::Evaluate(e.to_string()))
    }
}

fn to_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(v) => Value::Boolean(*v),
        FieldValue::Int(v) => Value::Float(*v as f64),
        FieldValue::Float(v) => Value::Float(*v),
        FieldValue::Text(v) => Value::String(v.clone()),
    }
}

/// Rewrite bare integer literals as float literals
///
/// Digits inside string literals or identifiers are left alone, as are
/// numbers that already carry a fraction or exponent.
fn float_literals(condition: &str) -> String {
    let mut out = String::with_capacity(condition.len() + 8);
    let mut chars = condition.chars().peekable();
    let mut prev: Option<char> = None;
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            } else if c == '"' {
                in_string = false;
            }
            prev = Some(c);
            continue;
        }

        let starts_number = c.is_ascii_digit()
            && !prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '.');
        if !starts_number {
            in_string = c == '"';
            out.push(c);
            prev = Some(c);
            continue;
        }

        out.push(c);
        let mut last = c;
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            out.push(d);
            last = d;
            chars.next();
        }

        let continues = chars
            .peek()
            .is_some_and(|&n| n == '.' || n.is_alphanumeric() || n == '_');
        if !continues {
            out.push_str(".0");
        }
        prev = Some(last);
    }

    out
}

/// Reject a division or remainder whose divisor evaluates to zero
///
/// Float division would otherwise yield infinity or NaN and compare as if
/// it were a reading. The right side of `&&` and `||` is only inspected
/// when the left side does not decide the result, so a guard such as
/// `count != 0 && total / count > 2` still evaluates.
fn check_divisors(node: &Node, context: &HashMapContext) -> Result<(), EvaluationError> {
    let operator = node.operator();

    if let (Operator::And | Operator::Or, [left, right]) = (operator, node.children()) {
        check_divisors(left, context)?;
        let decided = left
            .eval_boolean_with_context(context)
            .map_err(|e| EvaluationError::Evaluate(e.to_string()))?;
        if matches!(operator, Operator::And) == decided {
            check_divisors(right, context)?;
        }
        return Ok(());
    }

    for child in node.children() {
        check_divisors(child, context)?;
    }

    if matches!(operator, Operator::Div | Operator::Mod) {
        if let Some(divisor) = node.children().get(1) {
            let value = divisor
                .eval_with_context(context)
                .map_err(|e| EvaluationError::Evaluate(e.to_string()))?;
            let zero = match value {
                Value::Float(v) => v == 0.0,
                Value::Int(v) => v == 0,
                _ => false,
            };
            if zero {
                return Err(EvaluationError::Evaluate("division by zero".to_string()));
            }
        }
    }

    Ok(())
}
