use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
  pub name: String,
}

impl Symbol {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into() }
  }
}

impl fmt::Display for Symbol {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.name)
  }
}

/// One element of a rule's right-hand side: a literal word or another symbol
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Production {
  Terminal(String),
  Nonterminal(Symbol),
}

impl Production {
  pub fn word(w: impl Into<String>) -> Self {
    Self::Terminal(w.into())
  }

  pub fn symbol(name: impl Into<String>) -> Self {
    Self::Nonterminal(Symbol::new(name))
  }

  pub fn symbol_str(&self) -> &str {
    match self {
      Self::Terminal(s) => s,
      Self::Nonterminal(s) => &s.name,
    }
  }

  pub fn is_terminal(&self) -> bool {
    matches!(self, Self::Terminal(_))
  }
}

impl fmt::Display for Production {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Terminal(s) => write!(f, "{:?}", s),
      Self::Nonterminal(s) => write!(f, "{}", s),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
  pub symbol: Symbol,
  pub productions: Vec<Production>,
}

impl Rule {
  pub fn new(symbol: impl Into<String>, productions: Vec<Production>) -> Self {
    Self {
      symbol: Symbol::new(symbol),
      productions,
    }
  }

  /// Shorthand for a word rule, `N -> "door"`
  pub fn lexical(symbol: impl Into<String>, word: impl Into<String>) -> Self {
    Self::new(symbol, vec![Production::word(word)])
  }

  /// Shorthand for a rule over symbols, `NP -> Det N`
  pub fn phrasal(symbol: impl Into<String>, rhs: &[&str]) -> Self {
    Self::new(symbol, rhs.iter().map(|s| Production::symbol(*s)).collect())
  }

  pub fn len(&self) -> usize {
    self.productions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn symbol_str(&self) -> &str {
    &self.symbol.name
  }

  /// The matched word, if this rule is a word rule
  pub fn word(&self) -> Option<&str> {
    match self.productions.as_slice() {
      [Production::Terminal(w)] => Some(w.as_str()),
      _ => None,
    }
  }

  pub fn is_lexical(&self) -> bool {
    self.word().is_some()
  }

  /// True for a word rule whose word is `token`, ignoring case
  pub fn matches_word(&self, token: &str) -> bool {
    self
      .word()
      .is_some_and(|w| w == token || w.to_lowercase() == token.to_lowercase())
  }
}

impl fmt::Display for Rule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ->", self.symbol)?;
    for p in self.productions.iter() {
      write!(f, " {}", p)?;
    }
    Ok(())
  }
}

#[test]
fn test_rule_kinds() {
  let lexical = Rule::lexical("N", "door");
  assert!(lexical.is_lexical());
  assert_eq!(lexical.word(), Some("door"));
  assert!(lexical.matches_word("Door"));
  assert!(!lexical.matches_word("doors"));
  assert_eq!(lexical.to_string(), r#"N -> "door""#);

  let phrasal = Rule::phrasal("NP", &["Det", "N"]);
  assert!(!phrasal.is_lexical());
  assert!(!phrasal.matches_word("det"));
  assert_eq!(phrasal.len(), 2);
  assert_eq!(phrasal.to_string(), "NP -> Det N");
}
