pub mod elementary;
pub mod rounding;
pub mod trigonometry;

use crate::ast::Evaluator;
use std::f64::consts;

/// Named constants visible to every expression.
pub const CONSTANTS: &[(&str, f64)] = &[("PI", consts::PI), ("E", consts::E)];

pub fn constant(name: &str) -> Option<f64> {
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

pub fn register_functions(evaluator: &mut Evaluator) {
    trigonometry::register(evaluator);
    elementary::register(evaluator);
    rounding::register(evaluator);
}
