//! Recursive-descent parser and evaluator for formula expressions.
//!
//! The grammar, lowest to highest precedence:
//!
//! ```text
//! Expression := Term (('+' | '-') Term)*
//! Term       := Factor (('*' | '/' | '%') Factor)*
//! Factor     := '-' Factor
//!             | NUMBER
//!             | '(' Expression ')'
//!             | Identifier
//! Identifier := IDENT '(' (Expression (',' Expression)*)? ')'   function call
//!             | IDENT '.' IDENT                                 metric path
//!             | IDENT                                           context variable
//! ```
//!
//! Parsing and evaluation are fused: the walker keeps one cursor over the
//! token stream, needs one token of lookahead, and produces the numeric
//! result directly. There is no AST and no backtracking.

mod context_vars;
mod error;

pub use context_vars::{ContextVariable, resolve_context_variable};
pub use error::{FormulaError, FormulaResult};

use log::trace;

use crate::model::EvaluationContext;
use crate::parser::{Token, tokenize};
use crate::path::resolve_metric_value;
use crate::registry;

/// One-shot recursive-descent evaluator over a token stream.
///
/// Holds the cursor position, the evaluation context, and the optionally
/// bound target metric for context variables. Create one per evaluation via
/// [`FormulaEvaluator::evaluate`]; nothing is retained between calls.
pub struct FormulaEvaluator<'a> {
    tokens: Vec<Token>,
    pos: usize,
    /// `None` puts the walker in syntax-check mode: the grammar is still
    /// enforced, but nothing is resolved against a session.
    context: Option<&'a EvaluationContext>,
    target: Option<&'a str>,
}

impl<'a> FormulaEvaluator<'a> {
    /// Tokenize, parse, and evaluate `formula` against `context`.
    ///
    /// `target` binds the metric that context variables resolve; formulas
    /// without context variables do not need one. Trailing tokens after a
    /// complete expression are an error.
    pub fn evaluate(
        formula: &str,
        context: &'a EvaluationContext,
        target: Option<&'a str>,
    ) -> FormulaResult<f64> {
        let tokens = tokenize(formula);
        trace!("formula {formula:?} lexed to {} tokens", tokens.len());
        let mut evaluator = Self {
            tokens,
            pos: 0,
            context: Some(context),
            target,
        };
        evaluator.run()
    }

    /// Parse `formula` without a context, validating syntax only.
    ///
    /// Metric paths and context variables are accepted structurally (no
    /// target metric is required here); function names are still checked
    /// against the whitelist, which needs no session data. Intended for
    /// validating report templates before any session exists.
    pub fn check(formula: &str) -> FormulaResult<()> {
        let tokens = tokenize(formula);
        let mut evaluator = Self {
            tokens,
            pos: 0,
            context: None,
            target: None,
        };
        evaluator.run().map(|_| ())
    }

    fn run(&mut self) -> FormulaResult<f64> {
        let value = self.expression()?;
        if let Some(token) = self.peek() {
            return Err(FormulaError::UnexpectedToken(token.to_string()));
        }
        Ok(value)
    }

    #[inline]
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    #[inline]
    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume the next token, which must be an identifier.
    fn expect_identifier(&mut self) -> FormulaResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(FormulaError::ExpectedToken {
                expected: "identifier",
                found: other.to_string(),
            }),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn expression(&mut self) -> FormulaResult<f64> {
        let mut value = self.term()?;
        while let Some(&Token::Operator(op @ ('+' | '-'))) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = if op == '+' { value + rhs } else { value - rhs };
        }
        Ok(value)
    }

    fn term(&mut self) -> FormulaResult<f64> {
        let mut value = self.factor()?;
        while let Some(&Token::Operator(op @ ('*' | '/' | '%'))) = self.peek() {
            self.pos += 1;
            let rhs = self.factor()?;
            value = match op {
                '*' => value * rhs,
                // A zero divisor evaluates to 0 rather than NaN/inf; the
                // report layer depends on this.
                '/' if rhs == 0.0 => 0.0,
                '/' => value / rhs,
                '%' if rhs == 0.0 => 0.0,
                _ => value % rhs,
            };
        }
        Ok(value)
    }

    fn factor(&mut self) -> FormulaResult<f64> {
        match self.advance() {
            None => Err(FormulaError::UnexpectedEnd),
            Some(Token::Operator('-')) => Ok(-self.factor()?),
            Some(Token::Number(value)) => Ok(value),
            Some(Token::LeftParen) => {
                let value = self.expression()?;
                match self.advance() {
                    Some(Token::RightParen) => Ok(value),
                    Some(other) => Err(FormulaError::ExpectedToken {
                        expected: "')'",
                        found: other.to_string(),
                    }),
                    None => Err(FormulaError::UnexpectedEnd),
                }
            }
            Some(Token::Identifier(name)) => self.identifier(name),
            Some(other) => Err(FormulaError::UnexpectedToken(other.to_string())),
        }
    }

    /// Disambiguate the three identifier forms with one token of lookahead.
    fn identifier(&mut self, name: String) -> FormulaResult<f64> {
        match self.peek() {
            Some(Token::LeftParen) => {
                self.pos += 1;
                // Whitelist check comes before the arguments, so a bad call
                // reports the function name rather than whatever fails
                // first inside its argument list.
                let function =
                    registry::lookup(&name).ok_or(FormulaError::UnknownFunction(name))?;
                let args = self.arguments()?;
                Ok(function(&args))
            }
            Some(Token::Dot) => {
                self.pos += 1;
                let field = self.expect_identifier()?;
                let Some(context) = self.context else {
                    return Ok(0.0);
                };
                let path = format!("{name}.{field}");
                resolve_metric_value(&path, &context.current)
                    .ok_or(FormulaError::InvalidMetricPath(path))
            }
            _ => {
                let variable = ContextVariable::from_name(&name)
                    .ok_or_else(|| FormulaError::UnknownContextVariable(name.clone()))?;
                let Some(context) = self.context else {
                    return Ok(0.0);
                };
                let target = self
                    .target
                    .ok_or(FormulaError::MissingTargetMetric(name))?;
                resolve_context_variable(variable, target, context)
            }
        }
    }

    /// Zero or more comma-separated argument expressions, consuming the
    /// closing parenthesis.
    fn arguments(&mut self) -> FormulaResult<Vec<f64>> {
        let mut args = Vec::new();
        if matches!(self.peek(), Some(Token::RightParen)) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expression()?);
            match self.advance() {
                Some(Token::Comma) => continue,
                Some(Token::RightParen) => break,
                Some(other) => {
                    return Err(FormulaError::ExpectedToken {
                        expected: "',' or ')'",
                        found: other.to_string(),
                    });
                }
                None => return Err(FormulaError::UnexpectedEnd),
            }
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BilateralMetrics, LegMetrics, MovementType, SessionMetrics};
    use chrono::{Duration, Utc};
    use rstest::rstest;

    fn session(peak_flexion: f64, offset_days: i64) -> SessionMetrics {
        let leg = LegMetrics {
            max_range_of_motion: 120.0,
            avg_range_of_motion: 110.0,
            peak_flexion,
            peak_extension: -5.0,
            peak_angular_velocity: 310.0,
            explosiveness_concentric: 7.2,
            explosiveness_eccentric: 6.8,
            rms_jerk: 0.42,
            range_cv: 4.1,
        };
        SessionMetrics {
            left_leg: leg.clone(),
            right_leg: LegMetrics {
                peak_flexion: peak_flexion - 2.5,
                ..leg
            },
            bilateral: BilateralMetrics {
                asymmetry_index: 3.5,
                correlation: 0.97,
                timing_offset: 12.0,
            },
            opi_score: Some(82.0),
            movement_type: MovementType::Squat,
            recorded_at: Utc::now() + Duration::days(offset_days),
        }
    }

    fn context() -> EvaluationContext {
        EvaluationContext::new(session(50.0, 1)).with_previous(session(40.0, 0))
    }

    fn eval(formula: &str) -> FormulaResult<f64> {
        FormulaEvaluator::evaluate(formula, &context(), Some("leftLeg.peakFlexion"))
    }

    #[rstest]
    #[case("1 + 2 * 3", 7.0)]
    #[case("(1 + 2) * 3", 9.0)]
    #[case("10 - 4 - 3", 3.0)]
    #[case("-2 * 3", -6.0)]
    #[case("--2", 2.0)]
    #[case("7 % 4", 3.0)]
    #[case("1.5 + 2.25", 3.75)]
    fn arithmetic_precedence(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(eval(formula).unwrap(), expected);
    }

    #[rstest]
    #[case("1 / 0", 0.0)]
    #[case("5 % 0", 0.0)]
    #[case("3 + 4 / 0", 3.0)]
    fn zero_divisor_guard(#[case] formula: &str, #[case] expected: f64) {
        assert_eq!(eval(formula).unwrap(), expected);
    }

    #[test]
    fn metric_paths_read_the_current_session() {
        assert_eq!(eval("leftLeg.peakFlexion").unwrap(), 50.0);
        assert_eq!(eval("leftLeg.peakFlexion - rightLeg.peakFlexion").unwrap(), 2.5);
    }

    #[test]
    fn unresolvable_metric_path_is_an_error() {
        assert_eq!(
            eval("leftLeg.bogus").unwrap_err(),
            FormulaError::InvalidMetricPath("leftLeg.bogus".into())
        );
        assert_eq!(
            eval("torso.peakFlexion").unwrap_err(),
            FormulaError::InvalidMetricPath("torso.peakFlexion".into())
        );
    }

    #[test]
    fn context_variables_resolve_against_the_bound_target() {
        assert_eq!(eval("current - previous").unwrap(), 10.0);
        assert_eq!(eval("baseline").unwrap(), 0.0);
    }

    #[test]
    fn context_variable_without_target_fails() {
        let err = FormulaEvaluator::evaluate("current", &context(), None).unwrap_err();
        assert_eq!(err, FormulaError::MissingTargetMetric("current".into()));
    }

    #[test]
    fn unknown_bare_identifier_fails() {
        assert_eq!(
            eval("delta").unwrap_err(),
            FormulaError::UnknownContextVariable("delta".into())
        );
    }

    #[test]
    fn function_calls_go_through_the_whitelist() {
        assert_eq!(eval("abs(0 - 3)").unwrap(), 3.0);
        assert_eq!(
            eval("max(leftLeg.peakFlexion, rightLeg.peakFlexion)").unwrap(),
            50.0
        );
        assert_eq!(eval("pow(2, 10)").unwrap(), 1024.0);
        assert_eq!(eval("min(1 + 1, 5, 3)").unwrap(), 2.0);
    }

    #[test]
    fn unknown_function_fails() {
        assert_eq!(
            eval("foo(1)").unwrap_err(),
            FormulaError::UnknownFunction("foo".into())
        );
    }

    #[test]
    fn unknown_function_is_reported_before_its_arguments() {
        // The call itself is the problem; a broken argument inside it
        // must not win the error race.
        assert_eq!(
            eval("foo(leftLeg.bogus)").unwrap_err(),
            FormulaError::UnknownFunction("foo".into())
        );
    }

    #[test]
    fn bare_min_max_are_context_variables_not_calls() {
        // With empty history they fall back to the current target value.
        assert_eq!(eval("max").unwrap(), 50.0);
        assert_eq!(eval("min").unwrap(), 50.0);
    }

    #[rstest]
    #[case("1 +")]
    #[case("(1 + 2")]
    #[case("max(1, 2")]
    #[case("leftLeg.")]
    #[case("")]
    fn premature_end_is_an_error(#[case] formula: &str) {
        assert_eq!(eval(formula).unwrap_err(), FormulaError::UnexpectedEnd);
    }

    #[test]
    fn trailing_tokens_are_an_error() {
        assert_eq!(
            eval("1 + 2 3").unwrap_err(),
            FormulaError::UnexpectedToken("3".into())
        );
        assert_eq!(
            eval("1 2").unwrap_err(),
            FormulaError::UnexpectedToken("2".into())
        );
    }

    #[test]
    fn stray_operator_is_an_error() {
        assert_eq!(
            eval("* 2").unwrap_err(),
            FormulaError::UnexpectedToken("*".into())
        );
    }

    #[test]
    fn syntax_check_passes_well_formed_formulas_without_a_context() {
        for formula in [
            "1 + 2 * 3",
            "current - previous",
            "leftLeg.peakFlexion - rightLeg.peakFlexion",
            "max(leftLeg.peakFlexion, rightLeg.peakFlexion)",
            "round((current - baseline) / baseline * 100)",
        ] {
            assert_eq!(FormulaEvaluator::check(formula), Ok(()), "{formula}");
        }
    }

    #[rstest]
    #[case("1 +", FormulaError::UnexpectedEnd)]
    #[case("(1 + 2", FormulaError::UnexpectedEnd)]
    #[case("1 2", FormulaError::UnexpectedToken("2".into()))]
    #[case("foo(1)", FormulaError::UnknownFunction("foo".into()))]
    #[case("delta", FormulaError::UnknownContextVariable("delta".into()))]
    fn syntax_check_reports_malformed_formulas(
        #[case] formula: &str,
        #[case] expected: FormulaError,
    ) {
        assert_eq!(FormulaEvaluator::check(formula).unwrap_err(), expected);
    }

    #[test]
    fn nested_calls_and_paths_compose() {
        // round(|47.5 - 50|) = round(2.5) = 3
        assert_eq!(
            eval("round(abs(rightLeg.peakFlexion - leftLeg.peakFlexion))").unwrap(),
            3.0
        );
    }
}
