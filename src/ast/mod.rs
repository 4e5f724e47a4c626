use std::collections::BTreeSet;

mod config;
mod error;
mod evaluator;
mod parser;
mod scope;
mod value;

pub use config::*;
pub use error::*;
pub use evaluator::*;
pub use parser::ExpressionParser as Parser;
pub use scope::*;
pub use value::*;

use crate::functions;

#[derive(Debug, Clone, PartialEq)]
pub enum ASTNode {
    Number(f64),
    Boolean(bool),
    Text(String),
    Identifier(String),
    List(Vec<ASTNode>),
    UnaryOperation {
        operator: UnaryOperator,
        operand: Box<ASTNode>,
    },
    BinaryOperation {
        left: Box<ASTNode>,
        operator: Operator,
        right: Box<ASTNode>,
    },
    LogicalOperation {
        left: Box<ASTNode>,
        operator: LogicalOperator,
        right: Box<ASTNode>,
    },
    Conditional {
        condition: Box<ASTNode>,
        then_branch: Box<ASTNode>,
        else_branch: Box<ASTNode>,
    },
    Group(Box<ASTNode>),
    FunctionCall {
        name: String,
        args: Vec<ASTNode>,
    },
}

impl ASTNode {
    /// Collects the identifiers a binding has to supply for this expression.
    ///
    /// Built-in constants are left out, and function names never appear because
    /// they are only resolved in call position.
    pub fn free_variables(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_identifiers(&mut names);
        names
    }

    fn collect_identifiers(&self, names: &mut BTreeSet<String>) {
        match self {
            ASTNode::Identifier(ident) => {
                if functions::constant(ident).is_none() {
                    names.insert(ident.clone());
                }
            }
            ASTNode::List(items) | ASTNode::FunctionCall { args: items, .. } => {
                for item in items {
                    item.collect_identifiers(names);
                }
            }
            ASTNode::UnaryOperation { operand, .. } => operand.collect_identifiers(names),
            ASTNode::BinaryOperation { left, right, .. }
            | ASTNode::LogicalOperation { left, right, .. } => {
                left.collect_identifiers(names);
                right.collect_identifiers(names);
            }
            ASTNode::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                condition.collect_identifiers(names);
                then_branch.collect_identifiers(names);
                else_branch.collect_identifiers(names);
            }
            ASTNode::Group(inner) => inner.collect_identifiers(names),
            ASTNode::Number(_) | ASTNode::Boolean(_) | ASTNode::Text(_) => {}
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
    Plus,
    Not,
}

impl TryFrom<&str> for UnaryOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "-" => Ok(UnaryOperator::Negate),
            "+" => Ok(UnaryOperator::Plus),
            "!" => Ok(UnaryOperator::Not),
            _ => Err(format!("Unknown unary operator: {}", value)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    And,
    Or,
}

impl TryFrom<&str> for LogicalOperator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "&&" => Ok(LogicalOperator::And),
            "||" => Ok(LogicalOperator::Or),
            _ => Err(format!("Unknown logical operator: {}", value)),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Equal,
    NotEqual,
}

impl Operator {
    /// IEEE-754 semantics throughout: `1 / 0` is `inf`, `0 / 0` is `NaN`.
    /// Comparisons yield `1.0` or `0.0`.
    pub fn apply(&self, left: f64, right: f64) -> f64 {
        match self {
            Operator::Add => left + right,
            Operator::Subtract => left - right,
            Operator::Multiply => left * right,
            Operator::Divide => left / right,
            Operator::Modulo => left % right,
            Operator::Power => left.powf(right),
            Operator::GreaterThan => (left > right) as i32 as f64,
            Operator::LessThan => (left < right) as i32 as f64,
            Operator::GreaterThanOrEqual => (left >= right) as i32 as f64,
            Operator::LessThanOrEqual => (left <= right) as i32 as f64,
            Operator::Equal => (left == right) as i32 as f64,
            Operator::NotEqual => (left != right) as i32 as f64,
        }
    }

    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operator::GreaterThan
                | Operator::LessThan
                | Operator::GreaterThanOrEqual
                | Operator::LessThanOrEqual
                | Operator::Equal
                | Operator::NotEqual
        )
    }
}

impl TryFrom<&str> for Operator {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            "%" => Ok(Operator::Modulo),
            "^" | "**" => Ok(Operator::Power),
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            ">=" => Ok(Operator::GreaterThanOrEqual),
            "<=" => Ok(Operator::LessThanOrEqual),
            "==" | "===" => Ok(Operator::Equal),
            "!=" | "!==" => Ok(Operator::NotEqual),
            _ => Err(format!("Unknown operator: {}", value)),
        }
    }
}
