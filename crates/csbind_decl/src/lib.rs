//! Declaration graph model and the header parser interface.

pub mod dump;
pub mod graph;
pub mod source;

pub use dump::{GraphDumpParser, file_matches, parse_dump};
pub use graph::{
    DeclRef, DeclarationGraph, EnumItem, Enumeration, Field, Function, IntLiteral, Macro,
    Parameter, PrimitiveKind, Struct, TranslationUnit, Type, Typedef,
};
pub use source::{
    HeaderParser, ParseFailure, ParseOutcome, ParseRequest, ParserDiagnostic, StaticParser,
};
