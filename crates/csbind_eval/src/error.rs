use std::ops::Range;

use chumsky::error::{Simple, SimpleReason};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("syntax error at {}..{}: {message}", span.start, span.end)]
    Syntax { message: String, span: Range<usize> },
    #[error("unknown identifier `{0}`")]
    UnknownIdentifier(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator `{op}` cannot be applied to {operand}")]
    InvalidOperand { op: String, operand: String },
    #[error("`{0}` is defined in terms of itself")]
    Cycle(String),
}

impl EvalError {
    pub(crate) fn invalid(op: impl Into<String>, operand: impl Into<String>) -> Self {
        Self::InvalidOperand {
            op: op.into(),
            operand: operand.into(),
        }
    }
}

impl From<Simple<char>> for EvalError {
    fn from(value: Simple<char>) -> Self {
        let message = match value.reason() {
            SimpleReason::Custom(message) => message.clone(),
            _ => match value.found() {
                Some(found) => format!("unexpected character {found:?}"),
                None => "unexpected end of input".to_string(),
            },
        };
        Self::Syntax {
            message,
            span: value.span(),
        }
    }
}
