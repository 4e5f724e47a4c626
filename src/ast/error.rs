use thiserror::Error;

/// Why an expression could not be evaluated.
///
/// Only the diagnostic entry points hand this out; `Evaluator::evaluate`
/// folds every variant into `Evaluation::Failure`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Expression is {length} bytes long, limit is {limit}")]
    TooLong { length: usize, limit: usize },
    #[error("Expression nesting exceeds depth {0}")]
    TooDeep(usize),
    #[error("Identifier '{0}' not found in context")]
    UnknownVariable(String),
    #[error("Function {0} not registered")]
    UnknownFunction(String),
    #[error("Function {name} failed: {message}")]
    Function { name: String, message: String },
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        expected: &'static str,
        got: &'static str,
    },
}
