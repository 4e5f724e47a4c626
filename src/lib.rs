pub mod ast;
pub mod functions;
pub mod sampler;
pub mod template;

use ast::Evaluator;
use std::collections::HashMap;

pub use ast::{Evaluation, EvaluatorConfig};
pub use sampler::{Domain, SamplePoint, SampleSeries, DEFAULT_STEPS};

/// Evaluates `expression` with the built-in math vocabulary and `bindings`.
pub fn evaluate(expression: &str, bindings: &HashMap<String, f64>) -> Evaluation {
    Evaluator::new(0).evaluate(expression, bindings)
}

/// Samples `expression` at `steps + 1` evenly spaced values of
/// `independent_var` between `x_min` and `x_max`, keeping the finite results.
pub fn sample(
    expression: &str,
    bindings: &HashMap<String, f64>,
    independent_var: &str,
    x_min: f64,
    x_max: f64,
    steps: usize,
) -> SampleSeries {
    Evaluator::new(0).sample(
        expression,
        bindings,
        independent_var,
        Domain::new(x_min, x_max, steps),
    )
}

/// [`sample`] on the rayon thread pool.
pub fn sample_par(
    expression: &str,
    bindings: &HashMap<String, f64>,
    independent_var: &str,
    x_min: f64,
    x_max: f64,
    steps: usize,
) -> SampleSeries {
    Evaluator::new(0).sample_par(
        expression,
        bindings,
        independent_var,
        Domain::new(x_min, x_max, steps),
    )
}

/// Replaces each `{{ expression }}` in `template` with its evaluated result.
pub fn render_template(template: &str, bindings: &HashMap<String, f64>) -> String {
    Evaluator::new(0).render_template(template, bindings)
}
