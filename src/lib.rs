#[macro_use]
extern crate lazy_static;

pub mod chart;
pub mod chunk;
pub mod error;
pub mod forest;
pub mod grammar;
pub mod parse_grammar;
pub mod pipeline;
pub mod rules;
pub mod syntree;
pub mod tokenize;
pub mod utils;

pub use crate::chart::{ParseLimits, Parser};
pub use crate::chunk::{Chunk, ChunkStrategy, Chunker, extract_chunks, extract_chunks_with};
pub use crate::error::{GrammarError, Limit, ParseError};
pub use crate::forest::Forest;
pub use crate::grammar::{DEFAULT_GRAMMAR, Grammar, SymbolKind};
pub use crate::pipeline::{Analysis, ParsedTree, Pipeline};
pub use crate::rules::{Production, Rule, Symbol};
pub use crate::syntree::{ParseTree, SynTree};
pub use crate::utils::Err;

impl Grammar {
  /// Every parse of `tokens` from the start symbol, with default limits
  pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Forest, ParseError> {
    Parser::new(self).parse(tokens)
  }
}

/// Parses `tokens` from `start` under `grammar`
pub fn parse<S: AsRef<str>>(grammar: &Grammar, start: &str, tokens: &[S]) -> Result<Forest, ParseError> {
  Parser::new(grammar).parse_symbol(start, tokens)
}

#[test]
fn test_he_sat() {
  let g: Grammar = r#"
    S -> NP V
    NP -> N
    N -> "he"
    V -> "sat"
  "#
  .parse()
  .unwrap();

  let forest = g.parse(&["he", "sat"]).unwrap();
  assert_eq!(forest.len(), 1);

  let chunks = extract_chunks(&forest.trees()[0]);
  assert_eq!(chunks.len(), 1);
  assert_eq!(chunks[0].words(), vec!["he"]);

  assert!(parse(&g, "S", &["sat", "he"]).unwrap().is_empty());
}
