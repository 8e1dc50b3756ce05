//! Noun phrase chunking over a finished parse tree.
//!
//! A chunk is an `NP` subtree picked so that no two chunks share a token
//! position. Heights are walked one level at a time; every `NP` at the current
//! height is accepted unless its span overlaps a chunk accepted earlier.

use std::fmt;

use crate::syntree::{ParseTree, Span, spans_disjoint};

/// Label of the subtrees that are chunked
pub const NOUN_PHRASE: &str = "NP";

/// Which end of the tree the height walk starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkStrategy {
  /// From the root's height down to the leaves. An `NP` is always accepted
  /// before any `NP` nested inside it, so nested phrases come out whole.
  #[default]
  Outermost,
  /// From the leaves up to the root. Only `NP`s with no `NP` beneath them are
  /// accepted.
  Innermost,
}

/// A noun phrase borrowed from the tree it was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'t> {
  pub tree: &'t ParseTree,
  pub span: Span,
}

impl<'t> Chunk<'t> {
  pub fn words(&self) -> Vec<&'t str> {
    self.tree.leaves().into_iter().map(String::as_str).collect()
  }

  /// The chunk's words joined by single spaces
  pub fn text(&self) -> String {
    self.words().join(" ")
  }
}

impl fmt::Display for Chunk<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.text())
  }
}

#[derive(Debug, Clone)]
pub struct Chunker {
  label: String,
  strategy: ChunkStrategy,
}

impl Default for Chunker {
  fn default() -> Self {
    Self::new()
  }
}

impl Chunker {
  pub fn new() -> Self {
    Self {
      label: NOUN_PHRASE.to_string(),
      strategy: ChunkStrategy::default(),
    }
  }

  pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
    self.strategy = strategy;
    self
  }

  /// Chunk subtrees with another label instead of `NP`
  pub fn with_label(mut self, label: impl Into<String>) -> Self {
    self.label = label.into();
    self
  }

  /// Chunks of `tree`, in the order they were accepted
  pub fn extract<'t>(&self, tree: &'t ParseTree) -> Vec<Chunk<'t>> {
    let mut levels: Vec<Vec<&'t ParseTree>> = Vec::new();
    collect_by_height(tree, &mut levels);

    let heights: Box<dyn Iterator<Item = usize>> = match self.strategy {
      ChunkStrategy::Outermost => Box::new((0..levels.len()).rev()),
      ChunkStrategy::Innermost => Box::new(0..levels.len()),
    };

    let mut chunks: Vec<Chunk<'t>> = Vec::new();
    for h in heights {
      for &node in levels[h].iter() {
        if node.label() != Some(&self.label) {
          continue;
        }
        let span = node.span();
        if chunks.iter().all(|c| spans_disjoint(c.span, span)) {
          chunks.push(Chunk { tree: node, span });
        }
      }
    }
    chunks
  }
}

/// Buckets every branch by height. Branches of equal height never nest, so
/// each bucket ends up in left-to-right order.
fn collect_by_height<'t>(node: &'t ParseTree, levels: &mut Vec<Vec<&'t ParseTree>>) -> usize {
  if node.is_leaf() {
    return 0;
  }
  let height = 1 + node
    .children()
    .iter()
    .map(|c| collect_by_height(c, levels))
    .max()
    .unwrap_or(0);

  if levels.len() <= height {
    levels.resize_with(height + 1, Vec::new);
  }
  levels[height].push(node);
  height
}

/// `NP` chunks of `tree`, outermost first
pub fn extract_chunks(tree: &ParseTree) -> Vec<Chunk<'_>> {
  Chunker::new().extract(tree)
}

pub fn extract_chunks_with(tree: &ParseTree, strategy: ChunkStrategy) -> Vec<Chunk<'_>> {
  Chunker::new().with_strategy(strategy).extract(tree)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntree::tests::{branch, leaf};

  fn texts(chunks: &[Chunk]) -> Vec<String> {
    chunks.iter().map(Chunk::text).collect()
  }

  fn np(det: &str, noun: &str, pos: usize) -> ParseTree {
    branch(
      "NP",
      vec![
        branch("Det", vec![leaf(det, pos)]),
        branch("N", vec![leaf(noun, pos + 1)]),
      ],
    )
  }

  /// (S (NP (NP the door) (NP the armchair)) (V sat))
  fn nested() -> ParseTree {
    branch(
      "S",
      vec![
        branch("NP", vec![np("the", "door", 0), np("the", "armchair", 2)]),
        branch("V", vec![leaf("sat", 4)]),
      ],
    )
  }

  #[test]
  fn test_outermost_takes_the_enclosing_phrase() {
    let tree = nested();
    let chunks = extract_chunks(&tree);
    assert_eq!(texts(&chunks), vec!["the door the armchair"]);
    assert_eq!(chunks[0].span, (0, 4));
  }

  #[test]
  fn test_innermost_takes_the_nested_phrases() {
    let tree = nested();
    let chunks = extract_chunks_with(&tree, ChunkStrategy::Innermost);
    assert_eq!(texts(&chunks), vec!["the door", "the armchair"]);
  }

  #[test]
  fn test_acceptance_order_is_by_height() {
    // (S (NP (N holmes)) (VP (V lit) (NP (Det a) (NP (N pipe)))))
    let tree = branch(
      "S",
      vec![
        branch("NP", vec![branch("N", vec![leaf("holmes", 0)])]),
        branch(
          "VP",
          vec![
            branch("V", vec![leaf("lit", 1)]),
            branch(
              "NP",
              vec![
                branch("Det", vec![leaf("a", 2)]),
                branch("NP", vec![branch("N", vec![leaf("pipe", 3)])]),
              ],
            ),
          ],
        ),
      ],
    );

    assert_eq!(texts(&extract_chunks(&tree)), vec!["a pipe", "holmes"]);
    assert_eq!(
      texts(&extract_chunks_with(&tree, ChunkStrategy::Innermost)),
      vec!["holmes", "pipe"]
    );
  }

  #[test]
  fn test_repeated_words_are_told_apart_by_position() {
    // (S (NP (N he)) (V saw) (NP (N he)))
    let tree = branch(
      "S",
      vec![
        branch("NP", vec![branch("N", vec![leaf("he", 0)])]),
        branch("V", vec![leaf("saw", 1)]),
        branch("NP", vec![branch("N", vec![leaf("he", 2)])]),
      ],
    );
    let chunks = extract_chunks(&tree);
    assert_eq!(texts(&chunks), vec!["he", "he"]);
    assert_eq!(chunks[0].span, (0, 1));
    assert_eq!(chunks[1].span, (2, 3));
  }

  #[test]
  fn test_no_noun_phrase() {
    let tree = branch("S", vec![branch("V", vec![leaf("sat", 0)])]);
    assert!(extract_chunks(&tree).is_empty());
  }

  #[test]
  fn test_single_word_phrase() {
    let tree = branch("NP", vec![branch("N", vec![leaf("holmes", 0)])]);
    let chunks = extract_chunks(&tree);
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].words(), vec!["holmes"]);
    assert!(std::ptr::eq(chunks[0].tree, &tree));
  }

  #[test]
  fn test_extraction_is_idempotent() {
    let tree = nested();
    for strategy in [ChunkStrategy::Outermost, ChunkStrategy::Innermost] {
      assert_eq!(
        extract_chunks_with(&tree, strategy),
        extract_chunks_with(&tree, strategy)
      );
    }
  }

  #[test]
  fn test_custom_label() {
    let tree = nested();
    let chunks = Chunker::new().with_label("V").extract(&tree);
    assert_eq!(texts(&chunks), vec!["sat"]);
  }
}
