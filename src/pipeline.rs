use crate::chart::{Chart, ParseLimits, Parser};
use crate::chunk::{ChunkStrategy, Chunker};
use crate::error::ParseError;
use crate::grammar::Grammar;
use crate::syntree::ParseTree;
use crate::tokenize::tokenize;

/// One parse of a sentence and the chunks found in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTree {
  pub tree: ParseTree,
  /// Each chunk as its words, in acceptance order
  pub chunks: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
  pub tokens: Vec<String>,
  /// Empty when the sentence could not be parsed
  pub parses: Vec<ParsedTree>,
}

impl Analysis {
  pub fn is_parsed(&self) -> bool {
    !self.parses.is_empty()
  }
}

/// Tokenize, parse, chunk.
#[derive(Debug, Clone)]
pub struct Pipeline<'g> {
  parser: Parser<'g>,
  chunker: Chunker,
}

impl<'g> Pipeline<'g> {
  pub fn new(grammar: &'g Grammar) -> Self {
    Self {
      parser: Parser::new(grammar),
      chunker: Chunker::new(),
    }
  }

  pub fn with_limits(mut self, limits: ParseLimits) -> Self {
    self.parser = self.parser.with_limits(limits);
    self
  }

  pub fn with_strategy(mut self, strategy: ChunkStrategy) -> Self {
    self.chunker = self.chunker.with_strategy(strategy);
    self
  }

  pub fn analyze(&self, sentence: &str) -> Result<Analysis, ParseError> {
    self.analyze_charted(sentence).map(|(analysis, _)| analysis)
  }

  /// Like `analyze`, but also hands back the memo table the parse filled
  pub fn analyze_charted(&self, sentence: &str) -> Result<(Analysis, Chart<'g>), ParseError> {
    let tokens = tokenize(sentence);
    let start = self.parser.grammar().start();
    let (forest, chart) = self.parser.parse_chart(start, &tokens)?;

    let parses = forest
      .into_iter()
      .map(|tree| {
        let chunks = self
          .chunker
          .extract(&tree)
          .iter()
          .map(|c| c.words().into_iter().map(str::to_string).collect())
          .collect();
        ParsedTree { tree, chunks }
      })
      .collect::<Vec<_>>();

    tracing::debug!(sentence, parses = parses.len(), "analyzed");
    Ok((Analysis { tokens, parses }, chart))
  }

  /// Analyzes each sentence independently; an error for one sentence leaves
  /// the others unaffected.
  pub fn analyze_batch<'s, I>(&self, sentences: I) -> Vec<Result<Analysis, ParseError>>
  where
    I: IntoIterator<Item = &'s str>,
  {
    sentences.into_iter().map(|s| self.analyze(s)).collect()
  }
}
