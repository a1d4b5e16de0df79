//! # Arithmetic Evaluator
//!
//! The pure-arithmetic primitive the generator hands its output to. The
//! grammar covers exactly what generated text can contain:
//!
//! - numeric literals with optional fraction and exponent parts
//! - the four operators `+ - * /` with conventional precedence
//! - parentheses and unary minus
//! - the `null` marker substituted for absent values
//!
//! There are no identifiers, functions or symbolic references: by the time
//! text reaches this module every reference has been substituted away, and
//! anything else is a malformed expression.
//!
//! ## Error contract
//!
//! - [`EvaluationError::MalformedExpression`] - the text does not parse
//! - [`EvaluationError::MissingValue`] - a `null` marker was evaluated
//! - [`EvaluationError::DivisionByZero`] - the divisor evaluated to zero
//! - [`EvaluationError::NonFinite`] - the result overflowed `f64`

use atrius_indicator_support::EvaluationError;
use chumsky::Parser;
use chumsky::error::Rich;
use chumsky::prelude::*;

/// AST for generated arithmetic text.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Number(f64),
    /// The marker substituted for an absent value.
    Null,
    /// Unary negation.
    Neg(Box<Expr>),
    /// Addition.
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction.
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication.
    Mul(Box<Expr>, Box<Expr>),
    /// Division.
    Div(Box<Expr>, Box<Expr>),
}

/// Parser for the arithmetic grammar.
///
/// Anchored to end of input: trailing garbage is a parse error, not a
/// shorter parse.
pub fn parser<'src>()
-> impl Parser<'src, &'src str, Expr, extra::Err<Rich<'src, char>>> + Clone + 'src {
    let digits = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>();

    // Numeric literal: digits, optional fraction, optional exponent.
    // The exponent part accepts what `f64`'s shortest display form can
    // produce for large magnitudes (e.g. `1e300`).
    let number = digits
        .clone()
        .then(just('.').ignore_then(digits.clone()).or_not())
        .then(
            one_of("eE")
                .ignore_then(one_of("+-").or_not().then(digits.clone()))
                .or_not(),
        )
        .try_map(|((int, frac), exp), span| {
            let mut literal = int;
            if let Some(frac) = frac {
                literal.push('.');
                literal.push_str(&frac);
            }
            if let Some((sign, exp)) = exp {
                literal.push('e');
                if let Some(sign) = sign {
                    literal.push(sign);
                }
                literal.push_str(&exp);
            }
            match literal.parse::<f64>() {
                Ok(value) => Ok(Expr::Number(value)),
                Err(_) => Err(Rich::custom(span, format!("Invalid number: {}", literal))),
            }
        });

    let null = text::keyword("null").to(Expr::Null);

    let expr = recursive(|expr| {
        let atom = choice((
            number,
            null,
            expr.delimited_by(just('('), just(')')),
        ))
        .padded();

        let op = |c: char| just(c).padded();

        let unary = op('-')
            .repeated()
            .foldr(atom, |_minus, rhs| Expr::Neg(Box::new(rhs)));

        let product = unary.clone().foldl(
            choice((
                op('*').to(Expr::Mul as fn(Box<Expr>, Box<Expr>) -> Expr),
                op('/').to(Expr::Div as fn(Box<Expr>, Box<Expr>) -> Expr),
            ))
            .then(unary)
            .repeated(),
            |lhs, (build, rhs)| build(Box::new(lhs), Box::new(rhs)),
        );

        product.clone().foldl(
            choice((
                op('+').to(Expr::Add as fn(Box<Expr>, Box<Expr>) -> Expr),
                op('-').to(Expr::Sub as fn(Box<Expr>, Box<Expr>) -> Expr),
            ))
            .then(product)
            .repeated(),
            |lhs, (build, rhs)| build(Box::new(lhs), Box::new(rhs)),
        )
    });

    expr.padded().then_ignore(end())
}

/// Check that `text` parses under the arithmetic grammar.
///
/// Used by the validator on residual text after all four passes replaced
/// references with a dummy literal.
pub fn check_syntax(text: &str) -> Result<(), String> {
    parser()
        .parse(text)
        .into_result()
        .map(|_| ())
        .map_err(join_errors)
}

/// Parse and evaluate generated arithmetic text.
pub fn evaluate(text: &str) -> Result<f64, EvaluationError> {
    let parsed = parser()
        .parse(text)
        .into_result()
        .map_err(|errs| EvaluationError::MalformedExpression(join_errors(errs)))?;
    let value = eval_expr(&parsed)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite)
    }
}

fn join_errors(errs: Vec<Rich<'_, char>>) -> String {
    errs.into_iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn eval_expr(expr: &Expr) -> Result<f64, EvaluationError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Null => Err(EvaluationError::MissingValue),
        Expr::Neg(inner) => Ok(-eval_expr(inner)?),
        Expr::Add(lhs, rhs) => Ok(eval_expr(lhs)? + eval_expr(rhs)?),
        Expr::Sub(lhs, rhs) => Ok(eval_expr(lhs)? - eval_expr(rhs)?),
        Expr::Mul(lhs, rhs) => Ok(eval_expr(lhs)? * eval_expr(rhs)?),
        Expr::Div(lhs, rhs) => {
            let divisor = eval_expr(rhs)?;
            if divisor == 0.0 {
                return Err(EvaluationError::DivisionByZero);
            }
            Ok(eval_expr(lhs)? / divisor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_with_precedence_and_parentheses() {
        assert_eq!(evaluate("1+2*3"), Ok(7.0));
        assert_eq!(evaluate("(1+2)*3"), Ok(9.0));
        assert_eq!(evaluate("10.0+5.0"), Ok(15.0));
        assert_eq!(evaluate("-4/2"), Ok(-2.0));
    }

    #[test]
    fn accepts_exponent_literals() {
        assert_eq!(evaluate("1e2+1"), Ok(101.0));
        assert_eq!(evaluate("2.5e-1*4"), Ok(1.0));
    }

    #[test]
    fn null_marker_is_a_missing_value() {
        assert_eq!(evaluate("null"), Err(EvaluationError::MissingValue));
        assert_eq!(evaluate("1+null*3"), Err(EvaluationError::MissingValue));
    }

    #[test]
    fn division_by_zero_is_reported() {
        assert_eq!(evaluate("1/0"), Err(EvaluationError::DivisionByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(EvaluationError::DivisionByZero));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            evaluate("#{deA.cocA}+1"),
            Err(EvaluationError::MalformedExpression(_))
        ));
        assert!(matches!(
            evaluate("(1+2"),
            Err(EvaluationError::MalformedExpression(_))
        ));
        assert!(matches!(
            evaluate(""),
            Err(EvaluationError::MalformedExpression(_))
        ));
    }

    #[test]
    fn syntax_check_matches_evaluation_grammar() {
        assert!(check_syntax("(1+1)*1/1-1").is_ok());
        assert!(check_syntax("1+)").is_err());
    }
}
