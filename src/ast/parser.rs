use crate::ast::{ASTNode, EvalError, EvaluatorConfig, LogicalOperator, Operator, UnaryOperator};
use crate::functions;
use log::debug;
use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "./expression.pest"] // Link to the grammar file
pub struct ExpressionParser;

impl ExpressionParser {
    pub fn parse_expression(input: &str) -> Result<ASTNode, EvalError> {
        Self::parse_with_config(input, &EvaluatorConfig::default())
    }

    /// Parses `input`, rejecting it up front when it exceeds the length or
    /// nesting budget of `config`.
    pub fn parse_with_config(input: &str, config: &EvaluatorConfig) -> Result<ASTNode, EvalError> {
        debug!("Parsing expression: {}", input);
        if input.len() > config.max_length {
            return Err(EvalError::TooLong {
                length: input.len(),
                limit: config.max_length,
            });
        }
        if bracket_depth(input) > config.max_depth {
            return Err(EvalError::TooDeep(config.max_depth));
        }

        let parse_result = ExpressionParser::parse(Rule::expression, input)
            .map_err(|e| EvalError::Parse(e.to_string()))?
            .next()
            .ok_or_else(|| EvalError::Parse("Failed to parse expression".to_string()))?;

        let builder = AstBuilder {
            max_depth: config.max_depth,
        };
        let ast = builder.build(next_pair(&mut parse_result.into_inner())?, 0)?;
        debug!("Parse result: {:?}", ast);
        Ok(ast)
    }
}

struct AstBuilder {
    max_depth: usize,
}

impl AstBuilder {
    fn build(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        if depth > self.max_depth {
            return Err(EvalError::TooDeep(self.max_depth));
        }

        match pair.as_rule() {
            Rule::conditional => self.build_conditional(pair, depth),
            Rule::or_expression | Rule::and_expression => self.build_logical_expression(pair, depth),
            Rule::equality | Rule::comparison | Rule::additive | Rule::term => {
                self.build_binary_expression(pair, depth)
            }
            Rule::unary => self.build_unary(pair, depth),
            Rule::power => self.build_power(pair, depth),
            Rule::number => {
                let text = pair.as_str();
                text.parse::<f64>()
                    .map(ASTNode::Number)
                    .map_err(|e| EvalError::Parse(format!("Invalid number '{}': {}", text, e)))
            }
            Rule::string => Ok(ASTNode::Text(
                pair.into_inner()
                    .next()
                    .map_or_else(String::new, |inner| inner.as_str().to_string()),
            )),
            Rule::boolean => Ok(ASTNode::Boolean(pair.as_str() == "true")),
            Rule::identifier => Ok(ASTNode::Identifier(pair.as_str().to_string())),
            Rule::math_member => {
                let name = member_name(pair)?;
                functions::constant(&name)
                    .map(ASTNode::Number)
                    .ok_or_else(|| EvalError::Parse(format!("Unknown constant Math.{}", name)))
            }
            Rule::group => {
                let inner = next_pair(&mut pair.into_inner())?;
                Ok(ASTNode::Group(Box::new(self.build(inner, depth + 1)?)))
            }
            Rule::list => {
                let items = self.build_arguments(pair.into_inner().next(), depth)?;
                Ok(ASTNode::List(items))
            }
            Rule::function_call => self.build_function_call(pair, depth),
            rule => Err(EvalError::Parse(format!("Unexpected rule: {:?}", rule))),
        }
    }

    fn build_conditional(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let condition = self.build(next_pair(&mut pairs)?, depth)?;

        if pairs.next().is_none() {
            return Ok(condition);
        }

        let then_branch = self.build(next_pair(&mut pairs)?, depth + 1)?;
        next_pair(&mut pairs)?; // COLON
        let else_branch = self.build(next_pair(&mut pairs)?, depth + 1)?;
        Ok(ASTNode::Conditional {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    fn build_logical_expression(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let mut node = self.build(next_pair(&mut pairs)?, depth)?;

        while let Some(operator_pair) = pairs.next() {
            let operator =
                LogicalOperator::try_from(operator_pair.as_str()).map_err(EvalError::Parse)?;
            let right = self.build(next_pair(&mut pairs)?, depth)?;
            node = ASTNode::LogicalOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    /// Left-associative chain of operands at one precedence level.
    fn build_binary_expression(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let mut node = self.build(next_pair(&mut pairs)?, depth)?;

        while let Some(operator_pair) = pairs.next() {
            let operator = Operator::try_from(operator_pair.as_str()).map_err(EvalError::Parse)?;
            let right = self.build(next_pair(&mut pairs)?, depth)?;
            node = ASTNode::BinaryOperation {
                left: Box::new(node),
                operator,
                right: Box::new(right),
            };
        }

        Ok(node)
    }

    fn build_unary(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut pairs: Vec<Pair<Rule>> = pair.into_inner().collect();
        let operand = pairs
            .pop()
            .ok_or_else(|| EvalError::Parse("Expected an operand".to_string()))?;

        // Every prefix adds one level of nesting.
        let depth = depth + pairs.len();
        if depth > self.max_depth {
            return Err(EvalError::TooDeep(self.max_depth));
        }
        let mut node = self.build(operand, depth)?;

        // Prefixes apply innermost first: `-!x` is `-(!x)`.
        for prefix in pairs.iter().rev() {
            let operator = UnaryOperator::try_from(prefix.as_str()).map_err(EvalError::Parse)?;
            node = ASTNode::UnaryOperation {
                operator,
                operand: Box::new(node),
            };
        }

        Ok(node)
    }

    /// `a ^ b` is right-associative and its exponent may carry a sign: `2 ^ -1`.
    fn build_power(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut pairs = pair.into_inner();
        let base = self.build(next_pair(&mut pairs)?, depth)?;

        match pairs.next() {
            None => Ok(base),
            Some(operator_pair) => {
                let operator =
                    Operator::try_from(operator_pair.as_str()).map_err(EvalError::Parse)?;
                let exponent = self.build(next_pair(&mut pairs)?, depth + 1)?;
                Ok(ASTNode::BinaryOperation {
                    left: Box::new(base),
                    operator,
                    right: Box::new(exponent),
                })
            }
        }
    }

    fn build_function_call(&self, pair: Pair<Rule>, depth: usize) -> Result<ASTNode, EvalError> {
        let mut inner = pair.into_inner();
        let callee = next_pair(&mut inner)?;
        let name = match callee.as_rule() {
            Rule::math_member => member_name(callee)?,
            _ => callee.as_str().to_string(),
        };
        let args = self.build_arguments(inner.next(), depth)?;
        Ok(ASTNode::FunctionCall { name, args })
    }

    fn build_arguments(
        &self,
        pair: Option<Pair<Rule>>,
        depth: usize,
    ) -> Result<Vec<ASTNode>, EvalError> {
        match pair {
            Some(arguments) => arguments
                .into_inner()
                .map(|argument| self.build(argument, depth + 1))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}

fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>) -> Result<Pair<'i, Rule>, EvalError> {
    pairs
        .next()
        .ok_or_else(|| EvalError::Parse("Unexpected end of expression".to_string()))
}

/// `Math.sin` -> `sin`
fn member_name(pair: Pair<Rule>) -> Result<String, EvalError> {
    Ok(next_pair(&mut pair.into_inner())?.as_str().to_string())
}

/// Deepest `(`/`[` nesting outside of string literals.
fn bracket_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => {
                    depth += 1;
                    deepest = deepest.max(depth);
                }
                ')' | ']' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }

    deepest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn ident(name: &str) -> Box<ASTNode> {
        Box::new(ASTNode::Identifier(name.to_string()))
    }

    fn num(value: f64) -> Box<ASTNode> {
        Box::new(ASTNode::Number(value))
    }

    #[test]
    fn test_simple_binary_expression() {
        let ast = ExpressionParser::parse_expression("2 * r").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: num(2.0),
            operator: Operator::Multiply,
            right: ident("r"),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_precedence() {
        let ast = ExpressionParser::parse_expression("a + b * c").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: ident("a"),
            operator: Operator::Add,
            right: Box::new(ASTNode::BinaryOperation {
                left: ident("b"),
                operator: Operator::Multiply,
                right: ident("c"),
            }),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let ast = ExpressionParser::parse_expression("a - b - c").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::BinaryOperation {
                left: ident("a"),
                operator: Operator::Subtract,
                right: ident("b"),
            }),
            operator: Operator::Subtract,
            right: ident("c"),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_power_is_right_associative_and_binds_tighter_than_negation() {
        let ast = ExpressionParser::parse_expression("-x ^ 2 ** y").unwrap();
        let expected_ast = ASTNode::UnaryOperation {
            operator: UnaryOperator::Negate,
            operand: Box::new(ASTNode::BinaryOperation {
                left: ident("x"),
                operator: Operator::Power,
                right: Box::new(ASTNode::BinaryOperation {
                    left: num(2.0),
                    operator: Operator::Power,
                    right: ident("y"),
                }),
            }),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_negative_exponent() {
        let ast = ExpressionParser::parse_expression("2^-1").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: num(2.0),
            operator: Operator::Power,
            right: Box::new(ASTNode::UnaryOperation {
                operator: UnaryOperator::Negate,
                operand: num(1.0),
            }),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_conditional_and_logic() {
        let ast = ExpressionParser::parse_expression("x > 0 && !flag ? 'up' : 'down'").unwrap();
        let expected_ast = ASTNode::Conditional {
            condition: Box::new(ASTNode::LogicalOperation {
                left: Box::new(ASTNode::BinaryOperation {
                    left: ident("x"),
                    operator: Operator::GreaterThan,
                    right: num(0.0),
                }),
                operator: LogicalOperator::And,
                right: Box::new(ASTNode::UnaryOperation {
                    operator: UnaryOperator::Not,
                    operand: ident("flag"),
                }),
            }),
            then_branch: Box::new(ASTNode::Text("up".to_string())),
            else_branch: Box::new(ASTNode::Text("down".to_string())),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_nested_conditional_is_right_associative() {
        let ast = ExpressionParser::parse_expression("a ? 1 : b ? 2 : 3").unwrap();
        let expected_ast = ASTNode::Conditional {
            condition: ident("a"),
            then_branch: num(1.0),
            else_branch: Box::new(ASTNode::Conditional {
                condition: ident("b"),
                then_branch: num(2.0),
                else_branch: num(3.0),
            }),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_equality_operators() {
        for (input, operator) in [
            ("a == b", Operator::Equal),
            ("a === b", Operator::Equal),
            ("a != b", Operator::NotEqual),
            ("a !== b", Operator::NotEqual),
            ("a <= b", Operator::LessThanOrEqual),
            ("a >= b", Operator::GreaterThanOrEqual),
        ] {
            let ast = ExpressionParser::parse_expression(input).unwrap();
            let expected_ast = ASTNode::BinaryOperation {
                left: ident("a"),
                operator,
                right: ident("b"),
            };
            assert_eq!(ast, expected_ast, "{}", input);
        }
    }

    #[test]
    fn test_function_call() {
        let ast = ExpressionParser::parse_expression("max(a, 2, Math.sqrt(b))").unwrap();
        let expected_ast = ASTNode::FunctionCall {
            name: "max".to_string(),
            args: vec![
                ASTNode::Identifier("a".to_string()),
                ASTNode::Number(2.0),
                ASTNode::FunctionCall {
                    name: "sqrt".to_string(),
                    args: vec![ASTNode::Identifier("b".to_string())],
                },
            ],
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_empty_call_and_list() {
        assert_eq!(
            ExpressionParser::parse_expression("min()").unwrap(),
            ASTNode::FunctionCall {
                name: "min".to_string(),
                args: Vec::new(),
            }
        );
        assert_eq!(
            ExpressionParser::parse_expression("[1, x]").unwrap(),
            ASTNode::List(vec![
                ASTNode::Number(1.0),
                ASTNode::Identifier("x".to_string())
            ])
        );
    }

    #[test]
    fn test_math_constant_member() {
        let ast = ExpressionParser::parse_expression("Math.PI").unwrap();
        assert_eq!(ast, ASTNode::Number(PI));
        assert!(ExpressionParser::parse_expression("Math.TAU").is_err());
    }

    #[test]
    fn test_number_forms() {
        for (input, value) in [("3", 3.0), ("2.5", 2.5), (".5", 0.5), ("1e3", 1000.0), ("2.5E-1", 0.25)] {
            assert_eq!(
                ExpressionParser::parse_expression(input).unwrap(),
                ASTNode::Number(value),
                "{}",
                input
            );
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            ExpressionParser::parse_expression("true").unwrap(),
            ASTNode::Boolean(true)
        );
        assert_eq!(
            ExpressionParser::parse_expression("trueish").unwrap(),
            ASTNode::Identifier("trueish".to_string())
        );
        assert_eq!(
            ExpressionParser::parse_expression("\"a (b\"").unwrap(),
            ASTNode::Text("a (b".to_string())
        );
        assert_eq!(
            ExpressionParser::parse_expression("''").unwrap(),
            ASTNode::Text(String::new())
        );
    }

    #[test]
    fn test_grouped_expression() {
        let ast = ExpressionParser::parse_expression("(a + 1) * 2").unwrap();
        let expected_ast = ASTNode::BinaryOperation {
            left: Box::new(ASTNode::Group(Box::new(ASTNode::BinaryOperation {
                left: ident("a"),
                operator: Operator::Add,
                right: num(1.0),
            }))),
            operator: Operator::Multiply,
            right: num(2.0),
        };
        assert_eq!(ast, expected_ast);
    }

    #[test]
    fn test_excess_whitespace() {
        let ast = ExpressionParser::parse_expression("  (  a  +  1 )  *\n 2  ").unwrap();
        assert_eq!(ast, ExpressionParser::parse_expression("(a+1)*2").unwrap());
    }

    #[test]
    fn test_invalid_syntax() {
        for input in ["", "price +", "a = 1", "2x", "(1", "1)", "a @ b", "sin(1,)", "a ? b"] {
            assert!(
                matches!(ExpressionParser::parse_expression(input), Err(EvalError::Parse(_))),
                "{:?} should not parse",
                input
            );
        }
    }

    #[test]
    fn test_limits() {
        let config = EvaluatorConfig::default().with_max_length(8).with_max_depth(3);
        assert!(matches!(
            ExpressionParser::parse_with_config("1 + 2 + 3 + 4", &config),
            Err(EvalError::TooLong { length: 13, limit: 8 })
        ));
        assert_eq!(
            ExpressionParser::parse_with_config("((((1))))", &config),
            Err(EvalError::TooDeep(3))
        );
        assert!(ExpressionParser::parse_with_config("(((1)))", &config).is_ok());

        let config = EvaluatorConfig::default().with_max_depth(4);
        assert_eq!(
            ExpressionParser::parse_with_config("2^2^2^2^2^2", &config),
            Err(EvalError::TooDeep(4))
        );

        assert_eq!(
            ExpressionParser::parse_with_config("-----1", &config),
            Err(EvalError::TooDeep(4))
        );
        assert!(ExpressionParser::parse_with_config("-!-!1", &config).is_ok());
        assert_eq!(
            ExpressionParser::parse_expression(&format!("{}1", "-".repeat(1023))),
            Err(EvalError::TooDeep(64))
        );
        assert_eq!(
            ExpressionParser::parse_expression(&format!("{}1", "!".repeat(1023))),
            Err(EvalError::TooDeep(64))
        );
    }

    #[test]
    fn test_bracket_depth_ignores_strings() {
        assert_eq!(bracket_depth("f((x), [1])"), 2);
        assert_eq!(bracket_depth("'((((' + (1)"), 1);
    }
}
