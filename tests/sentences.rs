use std::thread;

use npchunk::{
  ChunkStrategy, Grammar, ParseError, ParseTree, Pipeline, SynTree, extract_chunks,
  extract_chunks_with,
};

const SENTENCES: &[&str] = &[
  "Holmes sat.",
  "Holmes lit a pipe.",
  "We arrived the day before Thursday.",
  "Holmes chuckled to himself.",
  "My companion smiled an enigmatical smile.",
  "Holmes sat down and lit his pipe.",
  "Holmes sat in the red armchair and he chuckled.",
];

fn grammar() -> Grammar {
  Grammar::default_grammar().unwrap()
}

fn tokens(sentence: &str) -> Vec<String> {
  npchunk::tokenize::tokenize(sentence)
}

/// Every branch's children line up with one of its symbol's rules
fn conforms(g: &Grammar, tree: &ParseTree) -> bool {
  let SynTree::Branch(cons, children) = tree else {
    return true;
  };
  let label = &cons.value;

  if g.is_terminal(label) {
    return match children.as_slice() {
      [SynTree::Leaf(w)] => g.rules_for(label).iter().any(|r| r.word() == Some(w.value.as_str())),
      _ => false,
    };
  }

  let child_labels = children
    .iter()
    .map(|c| c.label().map(String::as_str))
    .collect::<Vec<_>>();
  let matches_rule = g.rules_for(label).iter().any(|r| {
    r.productions.len() == child_labels.len()
      && r
        .productions
        .iter()
        .zip(child_labels.iter())
        .all(|(p, l)| Some(p.symbol_str()) == *l)
  });

  matches_rule && children.iter().all(|c| conforms(g, c))
}

#[test]
fn every_sentence_parses() {
  let g = grammar();
  for sentence in SENTENCES {
    let forest = g.parse(&tokens(sentence)).unwrap();
    assert!(!forest.is_empty(), "no parse for {:?}", sentence);
  }
}

#[test]
fn trees_preserve_leaves_and_follow_rules() {
  let g = grammar();
  for sentence in SENTENCES {
    let toks = tokens(sentence);
    for tree in g.parse(&toks).unwrap().iter() {
      assert_eq!(tree.leaves(), toks.iter().collect::<Vec<_>>());
      assert_eq!(tree.label().map(String::as_str), Some("S"));
      assert_eq!(tree.span(), (0, toks.len()));
      assert!(conforms(&g, tree), "tree breaks the grammar:\n{}", tree);
    }
  }
}

#[test]
fn forests_have_no_duplicates() {
  let g = grammar();
  for sentence in SENTENCES {
    let forest = g.parse(&tokens(sentence)).unwrap();
    let trees = forest.trees();
    for (i, a) in trees.iter().enumerate() {
      assert!(!trees[i + 1..].contains(a), "duplicate tree for {:?}", sentence);
    }
  }
}

#[test]
fn parsing_is_deterministic() {
  let g = grammar();
  for sentence in SENTENCES {
    let toks = tokens(sentence);
    assert_eq!(g.parse(&toks).unwrap(), g.parse(&toks).unwrap());
  }
}

#[test]
fn chunks_never_overlap() {
  let g = grammar();
  for sentence in SENTENCES {
    for tree in g.parse(&tokens(sentence)).unwrap().iter() {
      for strategy in [ChunkStrategy::Outermost, ChunkStrategy::Innermost] {
        let chunks = extract_chunks_with(tree, strategy);
        for (i, a) in chunks.iter().enumerate() {
          for b in chunks[i + 1..].iter() {
            assert!(a.span.1 <= b.span.0 || b.span.1 <= a.span.0);
          }
        }
        assert_eq!(chunks, extract_chunks_with(tree, strategy));
      }
    }
  }
}

#[test]
fn innermost_chunks_are_minimal() {
  let g = grammar();
  for sentence in SENTENCES {
    for tree in g.parse(&tokens(sentence)).unwrap().iter() {
      for chunk in extract_chunks_with(tree, ChunkStrategy::Innermost) {
        assert!(
          chunk
            .tree
            .subtrees()
            .skip(1)
            .all(|t| t.label().map(String::as_str) != Some("NP")),
          "chunk {} has a nested NP",
          chunk
        );
      }
    }
  }
}

#[test]
fn holmes_lit_a_pipe() {
  let g = grammar();
  let forest = g.parse(&tokens("Holmes lit a pipe.")).unwrap();
  assert_eq!(forest.len(), 1);

  let tree = &forest.trees()[0];
  let outer = extract_chunks(tree).iter().map(|c| c.text()).collect::<Vec<_>>();
  assert_eq!(outer, vec!["a pipe", "holmes"]);

  let inner = extract_chunks_with(tree, ChunkStrategy::Innermost)
    .iter()
    .map(|c| c.text())
    .collect::<Vec<_>>();
  assert_eq!(inner, vec!["holmes", "pipe"]);
}

#[test]
fn unparseable_and_invalid_input() {
  let g = grammar();
  let pipeline = Pipeline::new(&g);

  let analysis = pipeline.analyze("Holmes sat the.").unwrap();
  assert!(!analysis.is_parsed());

  let analysis = pipeline.analyze("Holmes ate.").unwrap();
  assert!(!analysis.is_parsed());

  assert_eq!(pipeline.analyze("... 42 !").unwrap_err(), ParseError::EmptyInput);
}

#[test]
fn grammar_is_shared_across_threads() {
  let g = grammar();
  let expected = SENTENCES
    .iter()
    .map(|s| g.parse(&tokens(s)).unwrap().len())
    .collect::<Vec<_>>();

  let counts = thread::scope(|scope| {
    let handles = SENTENCES
      .iter()
      .map(|s| {
        let g = &g;
        scope.spawn(move || g.parse(&tokens(s)).unwrap().len())
      })
      .collect::<Vec<_>>();
    handles
      .into_iter()
      .map(|h| h.join().unwrap())
      .collect::<Vec<_>>()
  });

  assert_eq!(counts, expected);
}
