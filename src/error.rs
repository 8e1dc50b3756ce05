/// Errors raised while loading or validating a grammar. Any of these is fatal:
/// nothing can be parsed without a well-formed grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
  #[error("malformed grammar: syntax error: {0}")]
  Syntax(String),

  #[error("malformed grammar: empty ruleset")]
  EmptyRuleset,

  #[error("malformed grammar: rule for {0} has an empty right-hand side")]
  EmptyProduction(String),

  #[error("malformed grammar: {symbol} references undeclared symbol {referenced}")]
  UndeclaredSymbol { symbol: String, referenced: String },

  /// The symbol has both word rules and symbol rules.
  #[error("malformed grammar: {0} is declared as both a terminal and a nonterminal")]
  DualKind(String),

  #[error("malformed grammar: start symbol {0} is not a declared nonterminal")]
  BadStart(String),

  /// Unit rules that loop back to their own symbol, e.g. `A -> B; B -> A;`
  #[error("malformed grammar: cyclic unit rules through {}", .0.join(" -> "))]
  UnitCycle(Vec<String>),
}

/// Errors raised for a single input sentence. These are local to that sentence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
  #[error("invalid token sequence: no tokens")]
  EmptyInput,

  #[error("invalid token sequence: token {index} is empty")]
  EmptyToken { index: usize },

  #[error("invalid token sequence: token {index} ({token:?}) has no alphabetic character")]
  NonAlphabetic { index: usize, token: String },

  #[error("invalid start symbol {0}")]
  UnknownStart(String),

  #[error("could not parse within limits: {0}")]
  ResourceExceeded(Limit),
}

impl ParseError {
  /// True for input contract violations, as opposed to limit failures.
  pub fn is_invalid_input(&self) -> bool {
    matches!(
      self,
      Self::EmptyInput | Self::EmptyToken { .. } | Self::NonAlphabetic { .. }
    )
  }
}

/// The bound that was crossed when a parse was aborted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Limit {
  #[error("{actual} tokens exceeds the maximum of {max}")]
  Tokens { max: usize, actual: usize },

  #[error("more than {max} trees for a single span")]
  Trees { max: usize },
}
