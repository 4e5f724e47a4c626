use crate::ast::Evaluator;
use mathviz_macros::math_fn;

pub fn register(evaluator: &mut Evaluator) {
    evaluator.register_function("sin", sin);
    evaluator.register_function("cos", cos);
    evaluator.register_function("tan", tan);
    evaluator.register_function("asin", asin);
    evaluator.register_function("acos", acos);
    evaluator.register_function("atan", atan);
}

#[math_fn]
fn sin(x: f64) -> Result<f64, String> {
    Ok(x.sin())
}

#[math_fn]
fn cos(x: f64) -> Result<f64, String> {
    Ok(x.cos())
}

#[math_fn]
fn tan(x: f64) -> Result<f64, String> {
    Ok(x.tan())
}

#[math_fn]
fn asin(x: f64) -> Result<f64, String> {
    Ok(x.asin())
}

#[math_fn]
fn acos(x: f64) -> Result<f64, String> {
    Ok(x.acos())
}

#[math_fn]
fn atan(x: f64) -> Result<f64, String> {
    Ok(x.atan())
}
