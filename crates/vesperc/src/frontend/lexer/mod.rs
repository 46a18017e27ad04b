//! Lexer module for tokenizing Vesper source code

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Token, TokenKind};
