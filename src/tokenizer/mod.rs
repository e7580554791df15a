//! # Tokenizer Component
//!
//! The tokenizer turns raw spec source into a lazy, finite stream of tokens for the
//! [`analyzer`](crate::analyzer) to consume.
//!
//! ## Design Principles
//!
//! * **Total coverage**: every byte of input belongs to exactly one token. Anything that is
//!   not a keyword, a quoted literal, a comment marker or a newline falls back to a
//!   single-character token, so body code survives as a plain concatenation of tokens.
//! * **Boundary-aware keywords**: keywords and literals must be followed by whitespace, a
//!   newline or the end of input, and keywords must not be glued to a preceding identifier
//!   character. `friend ` therefore never yields an `end` keyword.
//! * **Laziness**: [`Tokenizer::tokenize`](token::Tokenizer::tokenize) returns an iterator.
//!   Calling it again restarts from the beginning of the input.
//!
//! ## Component Structure
//!
//! * [`token`]: token types, spans and the iterator
//! * [`keyword`]: structural keywords (`describe`, `it`, hooks, `end`, `__END__`)
//! * [`literal`]: single-quoted literals used for descriptions
//! * [`comment`]: the `//` marker and newlines
//!
//! ## Usage Example
//!
//! ```rust
//! use speckle::tokenizer::token::{Token, Tokenizer};
//! use speckle::tokenizer::keyword::Keyword;
//!
//! let tokens: Vec<_> = Tokenizer::new().tokenize("describe 'math' end").collect();
//! assert_eq!(tokens[0].token, Token::Keyword(Keyword::Describe));
//! assert_eq!(tokens[2].token, Token::Literal("'math'"));
//! ```

pub mod comment;
pub mod keyword;
pub mod literal;
pub mod token;
