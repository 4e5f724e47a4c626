use crate::ast::Evaluator;
use mathviz_macros::math_fn;

pub fn register(evaluator: &mut Evaluator) {
    evaluator.register_function("floor", floor);
    evaluator.register_function("ceil", ceil);
    evaluator.register_function("round", round);
    evaluator.register_function("min", min);
    evaluator.register_function("max", max);
}

#[math_fn]
fn floor(x: f64) -> Result<f64, String> {
    Ok(x.floor())
}

#[math_fn]
fn ceil(x: f64) -> Result<f64, String> {
    Ok(x.ceil())
}

/// Rounds half-way cases towards positive infinity, so `round(-2.5)` is `-2`
/// where `f64::round` would give `-3`.
#[math_fn]
fn round(x: f64) -> Result<f64, String> {
    let floor = x.floor();
    Ok(if x - floor >= 0.5 { floor + 1.0 } else { floor })
}

/// With no arguments the result is `+inf`, which callers see as a failure.
#[math_fn]
fn min(values: Vec<f64>) -> Result<f64, String> {
    if values.iter().any(|v| v.is_nan()) {
        return Ok(f64::NAN);
    }
    Ok(values.into_iter().fold(f64::INFINITY, f64::min))
}

/// With no arguments the result is `-inf`.
#[math_fn]
fn max(values: Vec<f64>) -> Result<f64, String> {
    if values.iter().any(|v| v.is_nan()) {
        return Ok(f64::NAN);
    }
    Ok(values.into_iter().fold(f64::NEG_INFINITY, f64::max))
}
