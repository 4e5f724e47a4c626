use mathviz_core::ast::Evaluator;
use std::collections::HashMap;
use std::env::args;

const USAGE: &str = r"Evaluate a formula.

Usage: evaluate EXPR [NAME=VALUE ...]

Example: evaluate '2 * PI * r' r=3";

fn main() {
    pretty_env_logger::init();

    let mut args = args().skip(1);
    let Some(expression) = args.next() else {
        return println!("{}", USAGE);
    };

    let mut bindings = HashMap::new();
    for arg in args {
        match arg.split_once('=').map(|(name, value)| (name, value.parse::<f64>())) {
            Some((name, Ok(value))) => {
                bindings.insert(name.to_string(), value);
            }
            _ => return println!("Invalid binding `{}`, expected NAME=VALUE", arg),
        }
    }

    let mut evaluator = Evaluator::default();
    match evaluator.try_evaluate(&expression, &bindings) {
        Ok(value) => println!("Result: {}", mathviz_core::Evaluation::from(value)),
        Err(err) => println!("Error: {}", err),
    }
}
