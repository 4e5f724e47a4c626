use crate::ast::Evaluator;
use log::debug;
use std::collections::HashMap;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

impl Evaluator {
    /// Replaces every `{{ expression }}` in `template` with the displayed result
    /// of evaluating it: a number, pass-through text, or `Error`.
    ///
    /// Text outside placeholders is copied as is, and so is everything from an
    /// unterminated `{{` onwards.
    pub fn render_template(&mut self, template: &str, bindings: &HashMap<String, f64>) -> String {
        let mut output = String::with_capacity(template.len());
        let mut rest = template;

        while let Some(start) = rest.find(OPEN) {
            let after_open = &rest[start + OPEN.len()..];
            let Some(end) = after_open.find(CLOSE) else {
                break;
            };

            output.push_str(&rest[..start]);
            let expression = after_open[..end].trim();
            let evaluation = self.evaluate(expression, bindings);
            debug!("Template placeholder '{}' -> {}", expression, evaluation);
            output.push_str(&evaluation.to_string());

            rest = &after_open[end + CLOSE.len()..];
        }

        output.push_str(rest);
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    #[test]
    fn test_substitutes_numbers() {
        let mut evaluator = Evaluator::default();
        let svg = r#"<circle cx="{{ 50 + r * cos(t) }}" cy="{{50}}" r="{{ r }}"/>"#;
        assert_eq!(
            evaluator.render_template(svg, &bindings(&[("r", 10.0), ("t", 0.0)])),
            r#"<circle cx="60" cy="50" r="10"/>"#
        );
    }

    #[test]
    fn test_passes_text_through() {
        let mut evaluator = Evaluator::default();
        let template = "fill: {{ v > 0 ? 'green' : 'red' }};";
        assert_eq!(
            evaluator.render_template(template, &bindings(&[("v", -1.0)])),
            "fill: red;"
        );
    }

    #[test]
    fn test_failures_render_as_error() {
        let mut evaluator = Evaluator::default();
        assert_eq!(
            evaluator.render_template("a={{ 1/0 }} b={{ missing }}", &HashMap::new()),
            "a=Error b=Error"
        );
    }

    #[test]
    fn test_plain_and_unterminated_text() {
        let mut evaluator = Evaluator::default();
        assert_eq!(evaluator.render_template("no placeholders", &HashMap::new()), "no placeholders");
        assert_eq!(
            evaluator.render_template("{{1}} then {{ 2 +", &HashMap::new()),
            "1 then {{ 2 +"
        );
        assert_eq!(evaluator.render_template("", &HashMap::new()), "");
    }

    #[test]
    fn test_adjacent_placeholders() {
        let mut evaluator = Evaluator::default();
        assert_eq!(
            evaluator.render_template("{{x}}{{x*2}}", &bindings(&[("x", 1.5)])),
            "1.53"
        );
    }

    #[test]
    fn test_extreme_magnitudes_use_exponents() {
        let mut evaluator = Evaluator::default();
        assert_eq!(
            evaluator.render_template("{{ 1e-7 }} {{ 'v=' + 1e21 }}", &HashMap::new()),
            "1e-7 v=1e+21"
        );
    }
}
