use crate::ast::{
    ASTNode, EvalError, Evaluation, EvaluatorConfig, LogicalOperator, Operator, Parser, Scope,
    UnaryOperator, Value,
};
use crate::functions::{self, register_functions};
use log::debug;
use lru::LruCache;
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

pub type Function = Arc<dyn Fn(&[f64]) -> Result<f64, String> + Send + Sync>;

pub struct Evaluator {
    pub(crate) functions: HashMap<String, Function>,
    cache: Option<LruCache<String, Arc<ASTNode>>>,
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Creates an `Evaluator` with the built-in math functions and a parse
    /// cache holding up to `max_cache_size` expressions.
    pub fn new(max_cache_size: usize) -> Self {
        Self::with_config(EvaluatorConfig::default().with_cache_capacity(max_cache_size))
    }

    pub fn with_config(config: EvaluatorConfig) -> Self {
        let mut evaluator = Self::without_builtins(config);
        register_functions(&mut evaluator);
        evaluator
    }

    /// An evaluator with an empty function registry.
    pub fn without_builtins(config: EvaluatorConfig) -> Self {
        Self {
            functions: HashMap::new(),
            cache: NonZeroUsize::new(config.cache_capacity).map(LruCache::new),
            config,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Registers a function with the evaluator.
    pub fn register_function<F>(&mut self, name: &str, function: F)
    where
        F: Fn(&[f64]) -> Result<f64, String> + Send + Sync + 'static,
    {
        self.functions.insert(name.to_string(), Arc::new(function));
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Parse an expression string into an AST, reusing a cached tree when the
    /// same text was parsed recently.
    pub fn parse_expression(&mut self, expression: &str) -> Result<Arc<ASTNode>, EvalError> {
        if let Some(ast) = self.cache.as_mut().and_then(|cache| cache.get(expression)) {
            return Ok(Arc::clone(ast));
        }

        let ast = Arc::new(Parser::parse_with_config(expression, &self.config)?);
        if let Some(cache) = self.cache.as_mut() {
            cache.put(expression.to_string(), Arc::clone(&ast));
        }
        Ok(ast)
    }

    /// Evaluates `expression` against `bindings`, keeping the reason for any
    /// failure.
    pub fn try_evaluate(
        &mut self,
        expression: &str,
        bindings: &HashMap<String, f64>,
    ) -> Result<Value, EvalError> {
        let ast = self.parse_expression(expression)?;
        self.evaluate_ast(&ast, bindings)
    }

    /// Evaluates `expression` against `bindings`. Never fails: every fault,
    /// non-finite number and list result comes back as
    /// [`Evaluation::Failure`].
    pub fn evaluate(&mut self, expression: &str, bindings: &HashMap<String, f64>) -> Evaluation {
        match self.try_evaluate(expression, bindings) {
            Ok(value) => Evaluation::from(value),
            Err(err) => {
                debug!("Evaluation of '{}' failed: {}", expression, err);
                Evaluation::Failure
            }
        }
    }

    /// Evaluates an `ASTNode` with a given scope.
    pub fn evaluate_ast<S: Scope + ?Sized>(
        &self,
        ast: &ASTNode,
        scope: &S,
    ) -> Result<Value, EvalError> {
        match ast {
            ASTNode::Number(n) => Ok(Value::Number(*n)),
            ASTNode::Boolean(b) => Ok(Value::Boolean(*b)),
            ASTNode::Text(s) => Ok(Value::Text(s.clone())),

            ASTNode::Identifier(ident) => scope
                .get_var(ident)
                .or_else(|| functions::constant(ident))
                .map(Value::Number)
                .ok_or_else(|| EvalError::UnknownVariable(ident.clone())),

            ASTNode::List(items) => items
                .iter()
                .map(|item| self.evaluate_ast(item, scope))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::List),

            ASTNode::UnaryOperation { operator, operand } => {
                let value = self.evaluate_ast(operand, scope)?;
                match operator {
                    UnaryOperator::Negate => Ok(Value::Number(-value.as_number()?)),
                    UnaryOperator::Plus => Ok(Value::Number(value.as_number()?)),
                    UnaryOperator::Not => Ok(Value::Boolean(!value.is_truthy())),
                }
            }

            ASTNode::BinaryOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate_ast(left, scope)?;
                let right_value = self.evaluate_ast(right, scope)?;
                apply_binary(*operator, left_value, right_value)
            }

            ASTNode::LogicalOperation {
                left,
                operator,
                right,
            } => {
                let left_value = self.evaluate_ast(left, scope)?.is_truthy();
                let result = match operator {
                    LogicalOperator::And => {
                        left_value && self.evaluate_ast(right, scope)?.is_truthy()
                    }
                    LogicalOperator::Or => {
                        left_value || self.evaluate_ast(right, scope)?.is_truthy()
                    }
                };
                Ok(Value::Boolean(result))
            }

            ASTNode::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate_ast(condition, scope)?.is_truthy() {
                    self.evaluate_ast(then_branch, scope)
                } else {
                    self.evaluate_ast(else_branch, scope)
                }
            }

            ASTNode::FunctionCall { name, args } => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| EvalError::UnknownFunction(name.clone()))?;

                let arguments = args
                    .iter()
                    .map(|arg| self.evaluate_ast(arg, scope)?.as_number())
                    .collect::<Result<Vec<f64>, _>>()?;

                function(&arguments)
                    .map(Value::Number)
                    .map_err(|message| EvalError::Function {
                        name: name.clone(),
                        message,
                    })
            }

            ASTNode::Group(inner) => self.evaluate_ast(inner, scope),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::with_config(EvaluatorConfig::default())
    }
}

/// `+` concatenates as soon as either side is text, equality compares text with
/// text, and everything else is numeric.
fn apply_binary(operator: Operator, left: Value, right: Value) -> Result<Value, EvalError> {
    match (operator, &left, &right) {
        (Operator::Add, Value::Text(_), _) | (Operator::Add, _, Value::Text(_)) => {
            Ok(Value::Text(format!("{}{}", left, right)))
        }
        (Operator::Equal, Value::Text(a), Value::Text(b)) => Ok(Value::Boolean(a == b)),
        (Operator::NotEqual, Value::Text(a), Value::Text(b)) => Ok(Value::Boolean(a != b)),
        (Operator::Equal, Value::Text(_), _) | (Operator::Equal, _, Value::Text(_)) => {
            Ok(Value::Boolean(false))
        }
        (Operator::NotEqual, Value::Text(_), _) | (Operator::NotEqual, _, Value::Text(_)) => {
            Ok(Value::Boolean(true))
        }
        _ => {
            let result = operator.apply(left.as_number()?, right.as_number()?);
            if operator.is_comparison() {
                Ok(Value::Boolean(result != 0.0))
            } else {
                Ok(Value::Number(result))
            }
        }
    }
}
