//! Evaluation of object-like macro bodies as C# constant expressions.

pub mod ast;
pub mod error;
pub mod eval;
pub mod parser;
pub mod value;

pub use ast::{BinaryOp, CastType, Expr, UnaryOp};
pub use error::EvalError;
pub use eval::{EmptyScope, Scope, evaluate, evaluate_str};
pub use parser::parse_expression;
pub use value::{NumKind, Value, parse_number};
