/*!
# Rust Language Module

This Rust module turns BASIC source text into the compact token
encoding that is stored and executed, and back again for LIST.

*/

#[macro_use]
mod error;
mod keyword;
mod lex;
mod line;
mod unlex;

pub mod token;

pub use error::Error;
pub use error::ErrorCode;
pub use error::ErrorKind;
pub use keyword::Keyword;
pub use lex::tokenize;
pub use line::Line;
pub use unlex::untokenize;

/// `None` is a direct (immediate) line, never stored.
pub type LineNumber = Option<u16>;

/// Longest accepted source line and longest encoded line, in bytes.
pub const MAX_LINE_LEN: usize = 256;
