use regex::Regex;

lazy_static! {
  /// Runs of word characters, or runs of anything else that isn't whitespace
  static ref WORD_OR_PUNCT: Regex = Regex::new(r"\w+|[^\w\s]+").unwrap();
}

/// Lowercases `sentence`, splits it into word and punctuation runs, and keeps
/// only the pieces that contain at least one alphabetic character.
///
/// ```
/// assert_eq!(
///   npchunk::tokenize::tokenize("Holmes sat in the red armchair, at 10."),
///   vec!["holmes", "sat", "in", "the", "red", "armchair", "at"],
/// );
/// ```
pub fn tokenize(sentence: &str) -> Vec<String> {
  let lowered = sentence.to_lowercase();
  WORD_OR_PUNCT
    .find_iter(&lowered)
    .map(|m| m.as_str())
    .filter(|w| w.chars().any(char::is_alphabetic))
    .map(str::to_string)
    .collect()
}

#[test]
fn test_tokenize() {
  assert_eq!(tokenize("Holmes sat."), vec!["holmes", "sat"]);
  assert_eq!(tokenize("  "), Vec::<String>::new());
  // consecutive dropped tokens are all dropped
  assert_eq!(tokenize("he said 1 2 3 ... ok"), vec!["he", "said", "ok"]);
  assert_eq!(tokenize("don't"), vec!["don", "t"]);
  assert_eq!(tokenize("R2D2 arrived"), vec!["r2d2", "arrived"]);
}
