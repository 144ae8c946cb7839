//! Java source scanning.
//!
//! Only declarations are recognised; statement bodies are carried as raw
//! text. The scanner reports what it finds through
//! [`ModelEvents`](crate::import::ModelEvents) and never touches the model.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with TokenKind
//!     ↓
//! Scanner → package, imports, classifiers, members, javadoc
//!     ↓
//! ModelEvents → Modeller
//! ```

mod java;
mod lexer;

pub use java::{ParseError, SourceError, parse_source};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
