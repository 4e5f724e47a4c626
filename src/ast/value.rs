use crate::ast::EvalError;
use std::fmt;

/// Intermediate value produced while walking an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Boolean(bool),
    Text(String),
    List(Vec<Value>),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }

    /// Numeric view of the value. Booleans count as `1` and `0`.
    pub fn as_number(&self) -> Result<f64, EvalError> {
        match self {
            Value::Number(n) => Ok(*n),
            Value::Boolean(b) => Ok(*b as i32 as f64),
            other => Err(EvalError::TypeMismatch {
                expected: "number",
                got: other.type_name(),
            }),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::Boolean(b) => *b,
            Value::Text(s) => !s.is_empty(),
            Value::List(_) => true,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// Renders a number the way formula templates expect: integers without a
/// fractional part, and `NaN` / `Infinity` spelled out.
///
/// Magnitudes of `1e21` and above, or below `1e-6`, use exponent notation with
/// an explicit sign: `1e+21`, `1.5e-7`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n == 0.0 {
        // Drops the sign of negative zero.
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        let exponential = format!("{:e}", n);
        match exponential.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => exponential,
        }
    } else {
        n.to_string()
    }
}

/// Outcome of evaluating one expression.
///
/// `Number` is always finite. Anything that could not be turned into a finite
/// number or a piece of text is `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    Number(f64),
    Text(String),
    Failure,
}

impl Evaluation {
    pub fn as_number(&self) -> Option<f64> {
        if let Evaluation::Number(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        if let Evaluation::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Evaluation::Failure)
    }
}

impl From<Value> for Evaluation {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) if n.is_finite() => Evaluation::Number(n),
            Value::Number(_) => Evaluation::Failure,
            Value::Boolean(b) => Evaluation::Number(b as i32 as f64),
            Value::Text(s) => Evaluation::Text(s),
            Value::List(_) => Evaluation::Failure,
        }
    }
}

impl From<Result<Value, EvalError>> for Evaluation {
    fn from(result: Result<Value, EvalError>) -> Self {
        result.map_or(Evaluation::Failure, Evaluation::from)
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evaluation::Number(n) => write!(f, "{}", format_number(*n)),
            Evaluation::Text(s) => write!(f, "{}", s),
            Evaluation::Failure => write!(f, "Error"),
        }
    }
}
