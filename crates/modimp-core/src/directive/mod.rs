//! Directive files: the per-mod `modfile.txt` instructions
//!
//! Text is split into tokens by [`tokenizer`] and turned into mod records
//! and deployments by [`Interpreter`].

pub mod interpreter;
pub mod tokenizer;

pub use interpreter::{Interpretation, Interpreter};
pub use tokenizer::{Span, split_lines, tokenize, tokenize_line};
