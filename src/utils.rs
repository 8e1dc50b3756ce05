use std::error::Error;

/// Boxed static error type
pub type Err = Box<dyn Error + 'static>;

/// Takes a list where each element is a set of choices, and returns all the possible
/// sequences that pick one element from each set, in lexicographic order (the last
/// set varies fastest). Will clone the elements.
///
/// ```
/// let v = vec![
///   vec![1],
///   vec![2, 3],
///   vec![4, 5],
/// ];
///
/// assert_eq!(npchunk::utils::combinations(&v), vec![
///   vec![1, 2, 4],
///   vec![1, 2, 5],
///   vec![1, 3, 4],
///   vec![1, 3, 5],
/// ]);
/// ```
pub fn combinations<T, S>(list: &[S]) -> Vec<Vec<T>>
where
  T: Clone,
  S: AsRef<[T]>,
{
  if list.is_empty() {
    return Vec::new();
  }

  let mut out: Vec<Vec<T>> = vec![Vec::with_capacity(list.len())];
  for choices in list.iter().map(AsRef::as_ref) {
    out = out
      .into_iter()
      .flat_map(|prefix| {
        // extend every prefix so far with every choice for this position
        choices.iter().map(move |v| {
          let mut seq = prefix.clone();
          seq.push(v.clone());
          seq
        })
      })
      .collect();
  }
  out
}

/// Number of sequences `combinations` would produce, or None on overflow
pub fn combination_count<T, S>(list: &[S]) -> Option<usize>
where
  S: AsRef<[T]>,
{
  if list.is_empty() {
    return Some(0);
  }
  list
    .iter()
    .try_fold(1usize, |acc, choices| acc.checked_mul(choices.as_ref().len()))
}

#[test]
fn test_combinations_with_empty_choice() {
  let v: Vec<Vec<u8>> = vec![vec![1, 2], vec![], vec![3]];
  assert!(combinations(&v).is_empty());
  assert_eq!(combination_count(&v), Some(0));
  assert_eq!(combination_count(&[vec![1, 2], vec![3, 4, 5]]), Some(6));
}
