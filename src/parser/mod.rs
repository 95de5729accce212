//! Lexing for the formula expression language.

mod tokenizer;

pub use tokenizer::{Token, Tokenizer, tokenize};
