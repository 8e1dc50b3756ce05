use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::GrammarError;
use crate::rules::{Production, Rule};
use crate::utils::Err;

/// The sentence grammar bundled with the crate
pub const DEFAULT_GRAMMAR: &str = include_str!("../grammars/sentences.cfg");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
  /// A part of speech that matches a single word, such as `N`
  Terminal,
  /// A phrase category built out of other symbols, such as `NP`
  Nonterminal,
}

/// An immutable, validated set of production rules.
///
/// Rules are kept per left-hand symbol in declaration order, which is the order
/// the parser tries them in.
#[derive(Debug, Clone)]
pub struct Grammar {
  start: String,
  rules: HashMap<String, Vec<Rule>>,
  /// symbols in the order they were first declared
  symbols: Vec<String>,
  kinds: HashMap<String, SymbolKind>,
}

impl fmt::Display for Grammar {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "// start: {}", self.start)?;
    for symbol in self.symbols.iter() {
      for rule in self.rules_for(symbol) {
        writeln!(f, "{};", rule)?;
      }
    }
    Ok(())
  }
}

impl Grammar {
  /// Builds a grammar whose start symbol is the first rule's symbol
  pub fn new(rules: Vec<Rule>) -> Result<Self, GrammarError> {
    let start = rules
      .first()
      .map(|r| r.symbol_str().to_string())
      .ok_or(GrammarError::EmptyRuleset)?;
    Self::with_start(rules, start)
  }

  pub fn with_start(rules: Vec<Rule>, start: impl Into<String>) -> Result<Self, GrammarError> {
    let start = start.into();
    if rules.is_empty() {
      return Err(GrammarError::EmptyRuleset);
    }

    let mut symbols = Vec::new();
    let mut kinds = HashMap::new();
    for rule in rules.iter() {
      if rule.is_empty() {
        return Err(GrammarError::EmptyProduction(rule.symbol_str().to_string()));
      }
      let kind = if rule.is_lexical() {
        SymbolKind::Terminal
      } else if let Some(word) = rule.productions.iter().find(|p| p.is_terminal()) {
        // words only ever appear alone, as the whole right-hand side of a word rule
        return Err(GrammarError::Syntax(format!(
          "word {} mixed with symbols in rule {}",
          word, rule
        )));
      } else {
        SymbolKind::Nonterminal
      };

      match kinds.get(rule.symbol_str()) {
        None => {
          symbols.push(rule.symbol_str().to_string());
          kinds.insert(rule.symbol_str().to_string(), kind);
        }
        Some(existing) if *existing != kind => {
          return Err(GrammarError::DualKind(rule.symbol_str().to_string()));
        }
        Some(_) => {}
      }
    }

    for rule in rules.iter() {
      for p in rule.productions.iter() {
        if let Production::Nonterminal(s) = p {
          if !kinds.contains_key(&s.name) {
            return Err(GrammarError::UndeclaredSymbol {
              symbol: rule.symbol_str().to_string(),
              referenced: s.name.clone(),
            });
          }
        }
      }
    }

    if kinds.get(&start) != Some(&SymbolKind::Nonterminal) {
      return Err(GrammarError::BadStart(start));
    }

    // a rule declared twice is kept once, so no two rules derive the same tree
    let rules: HashMap<String, Vec<Rule>> =
      rules.into_iter().fold(HashMap::new(), |mut map, rule| {
        let alts = map.entry(rule.symbol_str().to_string()).or_insert_with(Vec::new);
        if alts.contains(&rule) {
          tracing::trace!(rule = %rule, "dropped repeated rule");
        } else {
          alts.push(rule);
        }
        map
      });

    if let Some(cycle) = find_unit_cycle(&symbols, &rules) {
      return Err(GrammarError::UnitCycle(cycle));
    }

    tracing::debug!(
      start = %start,
      symbols = symbols.len(),
      rules = rules.values().map(Vec::len).sum::<usize>(),
      "built grammar"
    );

    Ok(Self {
      start,
      rules,
      symbols,
      kinds,
    })
  }

  /// The grammar in [`DEFAULT_GRAMMAR`]
  pub fn default_grammar() -> Result<Self, GrammarError> {
    DEFAULT_GRAMMAR.parse()
  }

  pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, Err> {
    let src = fs::read_to_string(path)?;
    Ok(src.parse()?)
  }

  pub fn start(&self) -> &str {
    &self.start
  }

  /// All right-hand sides for `symbol`, in declaration order. Empty for an
  /// unknown symbol.
  pub fn rules_for(&self, symbol: &str) -> &[Rule] {
    self.rules.get(symbol).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn kind_of(&self, symbol: &str) -> Option<SymbolKind> {
    self.kinds.get(symbol).copied()
  }

  pub fn is_terminal(&self, symbol: &str) -> bool {
    self.kind_of(symbol) == Some(SymbolKind::Terminal)
  }

  pub fn is_nonterminal(&self, symbol: &str) -> bool {
    self.kind_of(symbol) == Some(SymbolKind::Nonterminal)
  }

  /// Declared symbols in declaration order
  pub fn symbols(&self) -> impl Iterator<Item = &str> {
    self.symbols.iter().map(String::as_str)
  }
}

/// Looks for a chain of unit rules (`A -> B`) that leads back to where it started,
/// returning the symbols along it.
fn find_unit_cycle(symbols: &[String], rules: &HashMap<String, Vec<Rule>>) -> Option<Vec<String>> {
  fn unit_targets<'a>(rules: &'a HashMap<String, Vec<Rule>>, symbol: &str) -> Vec<&'a str> {
    rules
      .get(symbol)
      .into_iter()
      .flatten()
      .filter_map(|r| match r.productions.as_slice() {
        [Production::Nonterminal(s)] => Some(s.name.as_str()),
        _ => None,
      })
      .collect()
  }

  fn visit<'a>(
    rules: &'a HashMap<String, Vec<Rule>>,
    symbol: &'a str,
    path: &mut Vec<&'a str>,
    done: &mut HashSet<&'a str>,
  ) -> Option<Vec<String>> {
    if let Some(pos) = path.iter().position(|s| *s == symbol) {
      let mut cycle: Vec<String> = path[pos..].iter().map(|s| s.to_string()).collect();
      cycle.push(symbol.to_string());
      return Some(cycle);
    }
    if done.contains(symbol) {
      return None;
    }

    path.push(symbol);
    for target in unit_targets(rules, symbol) {
      if let Some(cycle) = visit(rules, target, path, done) {
        return Some(cycle);
      }
    }
    path.pop();
    done.insert(symbol);
    None
  }

  let mut done = HashSet::new();
  symbols
    .iter()
    .find_map(|s| visit(rules, s, &mut Vec::new(), &mut done))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  fn toy_rules() -> Vec<Rule> {
    vec![
      Rule::phrasal("S", &["NP", "V"]),
      Rule::phrasal("NP", &["N"]),
      Rule::phrasal("NP", &["Det", "N"]),
      Rule::lexical("N", "he"),
      Rule::lexical("N", "door"),
      Rule::lexical("Det", "the"),
      Rule::lexical("V", "sat"),
    ]
  }

  #[test]
  fn test_rules_for_keeps_declaration_order() {
    let g = Grammar::new(toy_rules()).unwrap();
    assert_eq!(g.start(), "S");

    let nps = g.rules_for("NP");
    assert_eq!(nps.len(), 2);
    assert_eq!(nps[0], Rule::phrasal("NP", &["N"]));
    assert_eq!(nps[1], Rule::phrasal("NP", &["Det", "N"]));

    assert!(g.rules_for("Adj").is_empty());
    assert_eq!(g.kind_of("N"), Some(SymbolKind::Terminal));
    assert_eq!(g.kind_of("NP"), Some(SymbolKind::Nonterminal));
    assert_eq!(g.symbols().collect::<Vec<_>>(), vec!["S", "NP", "N", "Det", "V"]);
  }

  #[test]
  fn test_undeclared_symbol() {
    let mut rules = toy_rules();
    rules.push(Rule::phrasal("VP", &["V", "Adv"]));
    assert_eq!(
      Grammar::new(rules).unwrap_err(),
      GrammarError::UndeclaredSymbol {
        symbol: "VP".to_string(),
        referenced: "Adv".to_string()
      }
    );
  }

  #[test]
  fn test_dual_kind() {
    let mut rules = toy_rules();
    rules.push(Rule::phrasal("N", &["Det", "N"]));
    assert_eq!(
      Grammar::new(rules).unwrap_err(),
      GrammarError::DualKind("N".to_string())
    );
  }

  #[test]
  fn test_bad_start() {
    assert_eq!(
      Grammar::with_start(toy_rules(), "N").unwrap_err(),
      GrammarError::BadStart("N".to_string())
    );
    assert_eq!(
      Grammar::with_start(toy_rules(), "sentence").unwrap_err(),
      GrammarError::BadStart("sentence".to_string())
    );
    assert!(Grammar::with_start(toy_rules(), "NP").is_ok());
  }

  #[test]
  fn test_empty() {
    assert_eq!(Grammar::new(Vec::new()).unwrap_err(), GrammarError::EmptyRuleset);

    let mut rules = toy_rules();
    rules.push(Rule::new("NP", Vec::new()));
    assert_eq!(
      Grammar::new(rules).unwrap_err(),
      GrammarError::EmptyProduction("NP".to_string())
    );
  }

  #[test]
  fn test_unit_cycle() {
    let mut rules = toy_rules();
    rules.push(Rule::phrasal("NP", &["X"]));
    rules.push(Rule::phrasal("X", &["NP"]));
    assert_eq!(
      Grammar::new(rules).unwrap_err(),
      GrammarError::UnitCycle(vec!["NP".to_string(), "X".to_string(), "NP".to_string()])
    );

    // recursion that consumes input on every step is fine
    let mut rules = toy_rules();
    rules.push(Rule::phrasal("NP", &["NP", "NP"]));
    assert!(Grammar::new(rules).is_ok());
  }

  #[test]
  fn test_repeated_rules_kept_once() {
    let mut rules = toy_rules();
    rules.push(Rule::phrasal("NP", &["N"]));
    rules.push(Rule::lexical("N", "he"));
    let g = Grammar::new(rules).unwrap();
    assert_eq!(g.rules_for("NP"), Grammar::new(toy_rules()).unwrap().rules_for("NP"));
    assert_eq!(g.rules_for("N").len(), 2);
  }

  #[test]
  fn test_read_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "S -> N V\nN -> \"he\"\nV -> \"sat\"\n").unwrap();
    let g = Grammar::read_from_file(file.path()).unwrap();
    assert_eq!(g.start(), "S");
    assert_eq!(g.rules_for("N"), &[Rule::lexical("N", "he")]);

    let mut bad = tempfile::NamedTempFile::new().unwrap();
    write!(bad, "S -> N V\n").unwrap();
    let err = Grammar::read_from_file(bad.path()).unwrap_err();
    assert!(err.downcast_ref::<GrammarError>().is_some());

    let missing = file.path().with_extension("missing");
    let err = Grammar::read_from_file(&missing).unwrap_err();
    assert!(err.downcast_ref::<std::io::Error>().is_some());
  }

  #[test]
  fn test_grammar_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Grammar>();
  }
}
