use std::fmt;

use crate::syntree::ParseTree;

/// Every distinct parse tree of one input under one grammar, in the order the
/// parser found them. An empty forest means the input has no parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest(Vec<ParseTree>);

impl Forest {
  pub fn new(trees: Vec<ParseTree>) -> Self {
    Self(trees)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn trees(&self) -> &[ParseTree] {
    &self.0
  }

  pub fn iter(&self) -> std::slice::Iter<'_, ParseTree> {
    self.0.iter()
  }
}

impl IntoIterator for Forest {
  type Item = ParseTree;
  type IntoIter = std::vec::IntoIter<ParseTree>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}

impl<'a> IntoIterator for &'a Forest {
  type Item = &'a ParseTree;
  type IntoIter = std::slice::Iter<'a, ParseTree>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl fmt::Display for Forest {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "Parsed {} tree{}",
      self.len(),
      if self.len() == 1 { "" } else { "s" }
    )?;
    for tree in self.iter() {
      writeln!(f, "{}\n", tree)?;
    }
    Ok(())
  }
}
