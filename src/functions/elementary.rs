use crate::ast::Evaluator;
use mathviz_macros::math_fn;

pub fn register(evaluator: &mut Evaluator) {
    evaluator.register_function("pow", pow);
    evaluator.register_function("sqrt", sqrt);
    evaluator.register_function("abs", abs);
    evaluator.register_function("log", log);
    evaluator.register_function("exp", exp);
}

#[math_fn]
fn pow(base: f64, exponent: f64) -> Result<f64, String> {
    Ok(base.powf(exponent))
}

#[math_fn]
fn sqrt(x: f64) -> Result<f64, String> {
    Ok(x.sqrt())
}

#[math_fn]
fn abs(x: f64) -> Result<f64, String> {
    Ok(x.abs())
}

/// Natural logarithm.
#[math_fn]
fn log(x: f64) -> Result<f64, String> {
    Ok(x.ln())
}

#[math_fn]
fn exp(x: f64) -> Result<f64, String> {
    Ok(x.exp())
}
