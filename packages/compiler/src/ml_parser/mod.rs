//! ML (Markup Language) Parser Module
//!
//! Tokenizer, structural parser and tree builder for templates.

pub mod ast;
pub mod entities;
pub mod lexer;
pub mod parser;
pub mod tags;
pub mod tokens;
pub mod tree_builder;

pub use ast::*;
pub use entities::decode_html;
pub use lexer::{tokenize, tokenize_with_options, TokenizeOptions, TokenizeResult};
pub use parser::{parse, ParseTreeResult, Parser};
pub use tags::*;
pub use tokens::*;
pub use tree_builder::{build_tree, parse_tokens};
