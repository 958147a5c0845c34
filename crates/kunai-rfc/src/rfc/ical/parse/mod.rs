//! iCalendar parsing (RFC 5545).
//!
//! - Lexer: line unfolding and content line tokenization
//! - Parser: component tree construction

mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use lexer::{parse_content_line, split_lines};
pub use parser::parse;
