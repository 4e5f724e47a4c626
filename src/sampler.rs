use crate::ast::{ASTNode, Evaluation, Evaluator, Override};
use log::{debug, log_enabled, trace, Level};
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_STEPS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
}

/// Plottable points in sweep order. Steps that failed to evaluate are absent.
pub type SampleSeries = Vec<SamplePoint>;

/// A closed interval cut into `steps` equal parts, giving `steps + 1` sample
/// positions from `min` to `max`. `max < min` sweeps downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
    pub steps: usize,
}

impl Domain {
    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        Self { min, max, steps }
    }

    /// Position of step `i`. With zero steps the only position is `min`.
    pub fn x_at(&self, i: usize) -> f64 {
        if self.steps == 0 {
            return self.min;
        }
        self.min + (i as f64 / self.steps as f64) * (self.max - self.min)
    }

    /// Number of sample positions, saturating at `usize::MAX`.
    pub fn sample_count(&self) -> usize {
        self.steps.saturating_add(1)
    }

    pub fn positions(&self) -> impl Iterator<Item = f64> {
        let domain = *self;
        (0..domain.sample_count()).map(move |i| domain.x_at(i))
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::new(-10.0, 10.0, DEFAULT_STEPS)
    }
}

impl Evaluator {
    /// Sweeps `independent_var` across `domain` and returns the finite points.
    ///
    /// The expression is parsed once. A parse failure gives an empty series,
    /// as does an expression that fails at every step. `bindings` is only read;
    /// the independent variable overrides any value it holds.
    pub fn sample(
        &mut self,
        expression: &str,
        bindings: &HashMap<String, f64>,
        independent_var: &str,
        domain: Domain,
    ) -> SampleSeries {
        let Some(ast) = self.parse_for_sampling(expression, independent_var) else {
            return Vec::new();
        };

        let series: SampleSeries = domain
            .positions()
            .filter_map(|x| self.sample_point(&ast, bindings, independent_var, x))
            .collect();
        debug!(
            "Sampled '{}' over {:?}: {} of {} points kept",
            expression,
            domain,
            series.len(),
            domain.sample_count()
        );
        series
    }

    /// Same contract and output as [`Evaluator::sample`], with the steps spread
    /// over the rayon thread pool.
    pub fn sample_par(
        &mut self,
        expression: &str,
        bindings: &HashMap<String, f64>,
        independent_var: &str,
        domain: Domain,
    ) -> SampleSeries {
        let Some(ast) = self.parse_for_sampling(expression, independent_var) else {
            return Vec::new();
        };

        let evaluator: &Evaluator = self;
        let series: SampleSeries = (0..domain.sample_count())
            .into_par_iter()
            .filter_map(|i| evaluator.sample_point(&ast, bindings, independent_var, domain.x_at(i)))
            .collect();
        debug!(
            "Sampled '{}' in parallel over {:?}: {} of {} points kept",
            expression,
            domain,
            series.len(),
            domain.sample_count()
        );
        series
    }

    fn parse_for_sampling(
        &mut self,
        expression: &str,
        independent_var: &str,
    ) -> Option<Arc<ASTNode>> {
        match self.parse_expression(expression) {
            Ok(ast) => {
                if log_enabled!(Level::Debug) && !ast.free_variables().contains(independent_var) {
                    debug!(
                        "'{}' does not reference '{}', the series will be flat",
                        expression, independent_var
                    );
                }
                Some(ast)
            }
            Err(err) => {
                debug!("Cannot sample '{}': {}", expression, err);
                None
            }
        }
    }

    fn sample_point(
        &self,
        ast: &ASTNode,
        bindings: &HashMap<String, f64>,
        independent_var: &str,
        x: f64,
    ) -> Option<SamplePoint> {
        let scope = Override::new(bindings, independent_var, x);
        match Evaluation::from(self.evaluate_ast(ast, &scope)) {
            Evaluation::Number(y) => Some(SamplePoint { x, y }),
            other => {
                trace!("Dropping sample at {} = {}: {:?}", independent_var, x, other);
                None
            }
        }
    }
}
