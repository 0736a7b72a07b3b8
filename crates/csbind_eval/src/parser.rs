//! Grammar for the right-hand side of object-like `#define`s.

use chumsky::prelude::*;

use crate::ast::{BinaryOp, CastType, Expr, UnaryOp};
use crate::error::EvalError;
use crate::value::{Value, parse_number};

/// Parses a complete macro body.
pub fn parse_expression(source: &str) -> Result<Expr, EvalError> {
    expression()
        .padded()
        .then_ignore(end())
        .parse(source)
        .map_err(|errors| match errors.into_iter().next() {
            Some(error) => EvalError::from(error),
            None => EvalError::Syntax {
                message: "malformed expression".to_string(),
                span: 0..source.len(),
            },
        })
}

fn escape() -> impl Parser<char, char, Error = Simple<char>> + Clone {
    just('\\').ignore_then(choice((
        just('\\'),
        just('"'),
        just('\''),
        just('n').to('\n'),
        just('t').to('\t'),
        just('r').to('\r'),
        just('0').to('\0'),
    )))
}

fn literal() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    let exponent = one_of("eE")
        .then(one_of("+-"))
        .map(|(e, sign)| vec![e, sign]);
    let number = filter(|c: &char| c.is_ascii_digit())
        .chain(
            exponent
                .or(filter(|c: &char| c.is_ascii_alphanumeric() || *c == '.' || *c == '_')
                    .map(|c| vec![c]))
                .repeated()
                .flatten(),
        )
        .collect::<String>()
        .try_map(|text, span| {
            parse_number(&text)
                .map(Expr::Literal)
                .map_err(|message| Simple::custom(span, message))
        });

    let character = filter(|c: &char| *c != '\\' && *c != '\'')
        .or(escape())
        .delimited_by(just('\''), just('\''))
        .map(|c| Expr::Literal(Value::Int(c as i32)));

    let string = filter(|c: &char| *c != '\\' && *c != '"')
        .or(escape())
        .repeated()
        .delimited_by(just('"'), just('"'))
        .collect::<String>();
    // adjacent literals concatenate
    let strings = string
        .padded()
        .repeated()
        .at_least(1)
        .map(|parts| Expr::Literal(Value::Str(parts.concat())));

    choice((number, character, strings))
}

fn expression() -> impl Parser<char, Expr, Error = Simple<char>> + Clone {
    recursive(|expr| {
        let identifier = text::ident().map(|name: String| match name.as_str() {
            "true" => Expr::Literal(Value::Bool(true)),
            "false" => Expr::Literal(Value::Bool(false)),
            _ => Expr::Ident(name),
        });

        let atom = choice((
            literal(),
            identifier,
            expr.clone().delimited_by(just('('), just(')')),
        ))
        .padded();

        let unary = recursive(|unary| {
            let cast_type = text::ident()
                .padded()
                .repeated()
                .at_least(1)
                .delimited_by(just('('), just(')'))
                .try_map(|words: Vec<String>, span| {
                    CastType::from_words(&words)
                        .ok_or_else(|| Simple::custom(span, "not a type name"))
                });
            let cast = cast_type
                .padded()
                .then(unary.clone())
                .map(|(ty, operand)| Expr::cast(ty, operand));

            let prefix = choice((
                just('-').to(UnaryOp::Neg),
                just('+').to(UnaryOp::Plus),
                just('~').to(UnaryOp::BitNot),
                just('!').to(UnaryOp::Not),
            ))
            .padded()
            .then(unary)
            .map(|(op, operand)| Expr::unary(op, operand));

            choice((cast, prefix, atom))
        });

        let product = unary
            .clone()
            .then(
                choice((
                    just('*').to(BinaryOp::Mul),
                    just('/').to(BinaryOp::Div),
                    just('%').to(BinaryOp::Rem),
                ))
                .padded()
                .then(unary)
                .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let sum = product
            .clone()
            .then(
                choice((just('+').to(BinaryOp::Add), just('-').to(BinaryOp::Sub)))
                    .padded()
                    .then(product)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let shift = sum
            .clone()
            .then(
                choice((just("<<").to(BinaryOp::Shl), just(">>").to(BinaryOp::Shr)))
                    .padded()
                    .then(sum)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let relational = shift
            .clone()
            .then(
                choice((
                    just("<=").to(BinaryOp::Le),
                    just(">=").to(BinaryOp::Ge),
                    just('<').to(BinaryOp::Lt),
                    just('>').to(BinaryOp::Gt),
                ))
                .padded()
                .then(shift)
                .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let equality = relational
            .clone()
            .then(
                choice((just("==").to(BinaryOp::Eq), just("!=").to(BinaryOp::Ne)))
                    .padded()
                    .then(relational)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        // `&` followed by another `&` belongs to the logical operator, so the
        // single-character operators refuse a doubled symbol.
        let bit_and = equality
            .clone()
            .then(
                just('&')
                    .then_ignore(just('&').not().rewind())
                    .to(BinaryOp::BitAnd)
                    .padded()
                    .then(equality)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let bit_xor = bit_and
            .clone()
            .then(just('^').to(BinaryOp::BitXor).padded().then(bit_and).repeated())
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let bit_or = bit_xor
            .clone()
            .then(
                just('|')
                    .then_ignore(just('|').not().rewind())
                    .to(BinaryOp::BitOr)
                    .padded()
                    .then(bit_xor)
                    .repeated(),
            )
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let and = bit_or
            .clone()
            .then(just("&&").to(BinaryOp::And).padded().then(bit_or).repeated())
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        let or = and
            .clone()
            .then(just("||").to(BinaryOp::Or).padded().then(and).repeated())
            .foldl(|lhs, (op, rhs)| Expr::binary(op, lhs, rhs));

        or.clone()
            .then(
                just('?')
                    .padded()
                    .ignore_then(expr.clone())
                    .then_ignore(just(':').padded())
                    .then(expr)
                    .or_not(),
            )
            .map(|(cond, branches)| match branches {
                Some((then, otherwise)) => Expr::conditional(cond, then, otherwise),
                None => cond,
            })
    })
}
