use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{Limit, ParseError};
use crate::forest::Forest;
use crate::grammar::{Grammar, SymbolKind};
use crate::rules::Production;
use crate::syntree::{Constituent, ParseTree, SynTree, Word};
use crate::utils::{combination_count, combinations};

/// Bounds on a single parse, so that a badly ambiguous grammar fails cleanly
/// instead of exhausting memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
  /// Longest token sequence that will be parsed
  pub max_tokens: usize,
  /// Most trees that may be derived for any one symbol over any one span
  pub max_trees: usize,
}

impl Default for ParseLimits {
  fn default() -> Self {
    Self {
      max_tokens: 64,
      max_trees: 10_000,
    }
  }
}

impl ParseLimits {
  pub fn unlimited() -> Self {
    Self {
      max_tokens: usize::MAX,
      max_trees: usize::MAX,
    }
  }

  pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
    self.max_tokens = max_tokens;
    self
  }

  pub fn with_max_trees(mut self, max_trees: usize) -> Self {
    self.max_trees = max_trees;
    self
  }
}

/// Memo table of every (symbol, start, end) the parser has solved, with the
/// trees it found. Scoped to a single parse.
#[derive(Debug, Default)]
pub struct Chart<'g>(HashMap<(&'g str, usize, usize), Rc<[ParseTree]>>);

impl<'g> Chart<'g> {
  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn get(&self, symbol: &'g str, start: usize, end: usize) -> Option<&[ParseTree]> {
    self.0.get(&(symbol, start, end)).map(|trees| &trees[..])
  }

  fn lookup(&self, symbol: &'g str, start: usize, end: usize) -> Option<Rc<[ParseTree]>> {
    self.0.get(&(symbol, start, end)).cloned()
  }

  fn add(&mut self, symbol: &'g str, start: usize, end: usize, trees: Rc<[ParseTree]>) {
    self.0.insert((symbol, start, end), trees);
  }
}

impl fmt::Display for Chart<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut entries = self
      .0
      .iter()
      .filter(|(_, trees)| !trees.is_empty())
      .map(|((symbol, start, end), trees)| (*start, *end, *symbol, trees.len()))
      .collect::<Vec<_>>();
    entries.sort();

    for (start, end, symbol, count) in entries {
      writeln!(
        f,
        "  {}..{}: {} ({} tree{})",
        start,
        end,
        symbol,
        count,
        if count == 1 { "" } else { "s" }
      )?;
    }
    Ok(())
  }
}

/// Finds every parse tree for a token sequence by memoized recursion over
/// (symbol, span) pairs.
#[derive(Debug, Clone, Copy)]
pub struct Parser<'g> {
  grammar: &'g Grammar,
  limits: ParseLimits,
}

impl<'g> Parser<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    Self {
      grammar,
      limits: ParseLimits::default(),
    }
  }

  pub fn with_limits(mut self, limits: ParseLimits) -> Self {
    self.limits = limits;
    self
  }

  pub fn limits(&self) -> ParseLimits {
    self.limits
  }

  pub fn grammar(&self) -> &'g Grammar {
    self.grammar
  }

  /// Parses `tokens` from the grammar's start symbol
  pub fn parse<S: AsRef<str>>(&self, tokens: &[S]) -> Result<Forest, ParseError> {
    self.parse_symbol(self.grammar.start(), tokens)
  }

  /// Parses `tokens` from an arbitrary nonterminal
  pub fn parse_symbol<S: AsRef<str>>(&self, start: &str, tokens: &[S]) -> Result<Forest, ParseError> {
    self.parse_chart(start, tokens).map(|(forest, _)| forest)
  }

  /// Like `parse_symbol`, but also hands back the filled memo table
  pub fn parse_chart<S: AsRef<str>>(
    &self,
    start: &str,
    tokens: &[S],
  ) -> Result<(Forest, Chart<'g>), ParseError> {
    let tokens = tokens.iter().map(AsRef::as_ref).collect::<Vec<_>>();
    check_tokens(&tokens)?;
    if tokens.len() > self.limits.max_tokens {
      return Err(ParseError::ResourceExceeded(Limit::Tokens {
        max: self.limits.max_tokens,
        actual: tokens.len(),
      }));
    }

    // resolve the start symbol to the grammar's own copy so the chart can borrow it
    let start = self
      .grammar
      .symbols()
      .find(|s| *s == start)
      .filter(|s| self.grammar.is_nonterminal(s))
      .ok_or_else(|| ParseError::UnknownStart(start.to_string()))?;

    let mut search = SpanSearch {
      grammar: self.grammar,
      limits: self.limits,
      tokens: &tokens,
      chart: Chart::default(),
    };

    let trees = match search.parse_span(start, 0, tokens.len()) {
      Ok(trees) => trees,
      Err(e) => {
        tracing::warn!(tokens = tokens.len(), error = %e, "parse aborted");
        return Err(e);
      }
    };

    tracing::debug!(
      start,
      tokens = tokens.len(),
      trees = trees.len(),
      chart_entries = search.chart.len(),
      "parsed"
    );

    Ok((Forest::new(trees.to_vec()), search.chart))
  }
}

/// Rejects token sequences that break the input contract: empty, or containing
/// a token with no alphabetic character.
pub fn check_tokens(tokens: &[&str]) -> Result<(), ParseError> {
  if tokens.is_empty() {
    return Err(ParseError::EmptyInput);
  }
  for (index, token) in tokens.iter().enumerate() {
    if token.is_empty() {
      return Err(ParseError::EmptyToken { index });
    }
    if !token.chars().any(char::is_alphabetic) {
      return Err(ParseError::NonAlphabetic {
        index,
        token: token.to_string(),
      });
    }
  }
  Ok(())
}

struct SpanSearch<'g, 't> {
  grammar: &'g Grammar,
  limits: ParseLimits,
  tokens: &'t [&'t str],
  chart: Chart<'g>,
}

impl<'g> SpanSearch<'g, '_> {
  /// All trees for `symbol` covering exactly `tokens[start..end]`
  fn parse_span(
    &mut self,
    symbol: &'g str,
    start: usize,
    end: usize,
  ) -> Result<Rc<[ParseTree]>, ParseError> {
    if let Some(trees) = self.chart.lookup(symbol, start, end) {
      return Ok(trees);
    }

    let trees: Rc<[ParseTree]> = match self.grammar.kind_of(symbol) {
      Some(SymbolKind::Terminal) => self.scan(symbol, start, end).into_iter().collect(),
      Some(SymbolKind::Nonterminal) => self.expand(symbol, start, end)?.into(),
      None => Vec::new().into(),
    };

    tracing::trace!(symbol, start, end, trees = trees.len(), "solved span");
    self.chart.add(symbol, start, end, trees.clone());
    Ok(trees)
  }

  /// A part of speech matches a single token, if any of its words is that token
  fn scan(&self, symbol: &'g str, start: usize, end: usize) -> Option<ParseTree> {
    if end - start != 1 {
      return None;
    }

    let token = self.tokens[start];
    let matches = self
      .grammar
      .rules_for(symbol)
      .iter()
      .any(|r| r.matches_word(token));

    matches.then(|| {
      SynTree::Branch(
        Constituent {
          value: symbol.to_string(),
          span: (start, end),
        },
        vec![SynTree::Leaf(Word {
          value: token.to_string(),
          span: (start, end),
        })],
      )
    })
  }

  fn expand(&mut self, symbol: &'g str, start: usize, end: usize) -> Result<Vec<ParseTree>, ParseError> {
    let grammar = self.grammar;
    let mut trees: Vec<ParseTree> = Vec::new();

    for rule in grammar.rules_for(symbol) {
      for children in self.extend_out(&rule.productions, start, end)? {
        let count = combination_count(&children).unwrap_or(usize::MAX);
        if count > self.limits.max_trees.saturating_sub(trees.len()) {
          return Err(ParseError::ResourceExceeded(Limit::Trees {
            max: self.limits.max_trees,
          }));
        }

        for set in combinations(&children) {
          let tree = SynTree::Branch(
            Constituent {
              value: symbol.to_string(),
              span: (start, end),
            },
            set,
          );
          trees.push(tree);
        }
      }
    }

    Ok(trees)
  }

  /// Splits `start..end` into one non-empty sub-span per production, trying
  /// shorter first sub-spans first, and returns the trees found for each
  /// sub-span of every split where all of them parse.
  fn extend_out(
    &mut self,
    productions: &'g [Production],
    start: usize,
    end: usize,
  ) -> Result<Vec<Vec<Rc<[ParseTree]>>>, ParseError> {
    let Some((first, rest)) = productions.split_first() else {
      // consumed the whole rule; only a split that also consumed the whole span counts
      return Ok(if start == end { vec![Vec::new()] } else { Vec::new() });
    };
    if end - start < productions.len() {
      return Ok(Vec::new());
    }

    // the last production has to take whatever is left
    let first_ends = if rest.is_empty() {
      end..=end
    } else {
      (start + 1)..=(end - rest.len())
    };

    let mut out = Vec::new();
    for mid in first_ends {
      let head = self.parse_span(first.symbol_str(), start, mid)?;
      if head.is_empty() {
        continue;
      }
      for mut seq in self.extend_out(rest, mid, end)? {
        seq.insert(0, head.clone());
        out.push(seq);
      }
    }
    Ok(out)
  }
}
