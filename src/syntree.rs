use std::fmt;

/// Half-open range of token positions, `(start, end)`
pub type Span = (usize, usize);

/// True if two half-open spans share no position
pub fn spans_disjoint(a: Span, b: Span) -> bool {
  a.1 <= b.0 || b.1 <= a.0
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Constituent<T> {
  pub value: T,
  pub span: Span,
}

impl<T> fmt::Display for Constituent<T>
where
  T: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub struct Word<U> {
  pub value: U,
  pub span: Span,
}

impl<U> fmt::Display for Word<U>
where
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}..{}: {}", self.span.0, self.span.1, self.value)
  }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone)]
pub enum SynTree<T, U> {
  Branch(Constituent<T>, Vec<SynTree<T, U>>),
  Leaf(Word<U>),
}

/// A parse tree labeled with symbol names, with the input words at its leaves
pub type ParseTree = SynTree<String, String>;

impl<T, U> SynTree<T, U> {
  pub fn is_leaf(&self) -> bool {
    matches!(self, Self::Leaf(_))
  }

  pub fn get_branch(&self) -> Option<(&Constituent<T>, &Vec<SynTree<T, U>>)> {
    match self {
      Self::Branch(c, cs) => Some((c, cs)),
      _ => None,
    }
  }

  /// The branch label, or None for a leaf
  pub fn label(&self) -> Option<&T> {
    self.get_branch().map(|(c, _)| &c.value)
  }

  pub fn children(&self) -> &[SynTree<T, U>] {
    match self {
      Self::Branch(_, cs) => cs,
      Self::Leaf(_) => &[],
    }
  }

  pub fn span(&self) -> Span {
    match self {
      Self::Branch(c, _) => c.span,
      Self::Leaf(w) => w.span,
    }
  }

  /// Leaves have height 0, a branch is one taller than its tallest child
  pub fn height(&self) -> usize {
    match self {
      Self::Leaf(_) => 0,
      Self::Branch(_, cs) => 1 + cs.iter().map(Self::height).max().unwrap_or(0),
    }
  }

  /// Leaf values, left to right
  pub fn leaves(&self) -> Vec<&U> {
    let mut out = Vec::new();
    self.collect_leaves(&mut out);
    out
  }

  fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a U>) {
    match self {
      Self::Leaf(w) => out.push(&w.value),
      Self::Branch(_, cs) => cs.iter().for_each(|c| c.collect_leaves(out)),
    }
  }

  /// Every branch in the tree, in pre-order, starting with `self`
  pub fn subtrees(&self) -> Subtrees<'_, T, U> {
    Subtrees { stack: vec![self] }
  }
}

pub struct Subtrees<'a, T, U> {
  stack: Vec<&'a SynTree<T, U>>,
}

impl<'a, T, U> Iterator for Subtrees<'a, T, U> {
  type Item = &'a SynTree<T, U>;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(node) = self.stack.pop() {
      if let SynTree::Branch(_, children) = node {
        self.stack.extend(children.iter().rev());
        return Some(node);
      }
    }
    None
  }
}

impl<T, U> fmt::Display for SynTree<T, U>
where
  T: fmt::Display,
  U: fmt::Display,
{
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Leaf(t) => write!(f, "{}", t.value),
      Self::Branch(t, ts) => {
        write!(f, "({}", t)?;
        if ts.len() == 1 && ts[0].height() <= 1 {
          write!(f, " {})", ts[0])
        } else {
          for t in ts.iter() {
            let fmt = format!("{}", t);
            for line in fmt.lines() {
              write!(f, "\n  {}", line)?;
            }
          }
          write!(f, ")")
        }
      }
    }
  }
}
