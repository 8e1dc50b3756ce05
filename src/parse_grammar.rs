//! Simple recursive-descent parsing of grammar files.
//!
//! ```text
//! S -> NP VP | S Conj S      // alternatives become separate rules
//! NP -> N | Det NP;          # a rule ends at a newline or a semicolon
//! N -> "holmes" | "pipe"
//! ```
//!
//! Quoted strings are words, bare names are symbols.

use regex::Regex;
use std::str::FromStr;

use crate::error::GrammarError;
use crate::grammar::Grammar;
use crate::rules::{Production, Rule};

impl FromStr for Grammar {
  type Err = GrammarError;

  /// Parses a grammar from a string. Assumes the first rule's symbol
  /// is the start symbol.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let (rules, rest) = parse_rules(s)?;
    debug_assert!(rest.is_empty());
    Grammar::new(rules)
  }
}

type Infallible<'a, T> = (T, &'a str);
type ParseResult<'a, T> = Result<(T, &'a str), GrammarError>;

/// helper macro for initializing a regex with lazy_static!
macro_rules! regex_static {
  ($name:ident, $pattern:expr) => {
    lazy_static! {
      static ref $name: Regex = Regex::new($pattern).unwrap();
    }
  };
}

fn syntax_error(msg: impl Into<String>, at: &str) -> GrammarError {
  let snippet = at.lines().next().unwrap_or("").trim();
  if snippet.is_empty() {
    GrammarError::Syntax(format!("{} at end of line", msg.into()))
  } else {
    GrammarError::Syntax(format!("{} at {:?}", msg.into(), snippet))
  }
}

/// Try to consume a regex, returning None if it doesn't match
fn optional_re<'a>(re: &'static Regex, s: &'a str) -> Infallible<'a, Option<&'a str>> {
  match re.find(s) {
    Some(m) if m.start() == 0 => (Some(m.as_str()), &s[m.end()..]),
    _ => (None, s),
  }
}

/// Try to consume a regex, failing if it doesn't match
fn needed_re<'a>(re: &'static Regex, what: &str, s: &'a str) -> ParseResult<'a, &'a str> {
  if let (Some(c), rest) = optional_re(re, s) {
    Ok((c, rest))
  } else {
    Err(syntax_error(format!("expected {}", what), s))
  }
}

/// Try to consume a char, returning None if it doesn't match
fn optional_char(c: char, s: &str) -> Infallible<'_, Option<char>> {
  match s.strip_prefix(c) {
    Some(rest) => (Some(c), rest),
    None => (None, s),
  }
}

/// Skips whitespace, comments and blank lines between rules
fn skip_whitespace(s: &str) -> &str {
  regex_static!(WHITESPACE_OR_COMMENT, r"^(\s+|//[^\n]*|#[^\n]*)*");
  optional_re(&WHITESPACE_OR_COMMENT, s).1
}

/// Skips spaces and tabs, but not line breaks, which end a rule
fn skip_inline_whitespace(s: &str) -> &str {
  s.trim_start_matches([' ', '\t', '\r'])
}

/// Tries to parse a name made of letters, numbers, - and _
fn parse_name(s: &str) -> ParseResult<'_, &str> {
  regex_static!(NAME, r"^[a-zA-Z0-9\-_]+");
  needed_re(&NAME, "symbol name", s)
}

/// A double-quoted word, without the quotes
fn parse_word(s: &str) -> ParseResult<'_, &str> {
  regex_static!(WORD, r#"^"[^"\n]*""#);
  let (quoted, s) = needed_re(&WORD, "quoted word", s)?;
  let word = &quoted[1..quoted.len() - 1];
  if word.is_empty() {
    return Err(syntax_error("empty word", s));
  }
  Ok((word, s))
}

fn parse_production(s: &str) -> ParseResult<'_, Production> {
  if s.starts_with('"') {
    let (word, s) = parse_word(s)?;
    Ok((Production::word(word.to_lowercase()), s))
  } else {
    let (name, s) = parse_name(s)?;
    Ok((Production::symbol(name), s))
  }
}

/// True at the end of a rule: newline, semicolon, comment or end of input
fn at_rule_end(s: &str) -> bool {
  s.is_empty() || s.starts_with(['\n', ';', '#']) || s.starts_with("//")
}

/// Symbol, arrow, and one or more `|`-separated alternatives. Each alternative
/// becomes its own rule.
fn parse_rule(s: &str) -> ParseResult<'_, Vec<Rule>> {
  #![allow(clippy::trivial_regex)]
  regex_static!(ARROW, "^->");

  let (symbol, s) = parse_name(s)?;
  let s = skip_inline_whitespace(s);
  let (_, s) = needed_re(&ARROW, "->", s)?;

  let mut rules = Vec::new();
  let mut productions = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_inline_whitespace(rem);
    if at_rule_end(rem) || rem.starts_with('|') {
      if productions.is_empty() {
        return Err(syntax_error(format!("empty alternative for {}", symbol), rem));
      }
      rules.push(Rule::new(symbol, std::mem::take(&mut productions)));

      if let (Some(_), s) = optional_char('|', rem) {
        rem = s;
        continue;
      }
      let (_, s) = optional_char(';', rem);
      return Ok((rules, s));
    }

    let (prod, s) = parse_production(rem)?;
    productions.push(prod);
    rem = s;
  }
}

fn parse_rules(s: &str) -> ParseResult<'_, Vec<Rule>> {
  let mut rules = Vec::new();
  let mut rem = s;
  loop {
    rem = skip_whitespace(rem);
    if rem.is_empty() {
      return Ok((rules, rem));
    }
    let (mut rule, s) = parse_rule(rem)?;
    rules.append(&mut rule);
    rem = s;
  }
}
