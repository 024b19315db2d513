//! Normalized string similarity scores in the range 0-100.
//!
//! - [`ratio`]: indel similarity, `2 * LCS / (len_a + len_b)`.
//! - [`partial_ratio`]: best [`ratio`] of the shorter string against any equally long window of
//!   the longer one. Containment scores 100.
//! - [`token_set_ratio`]: compares the sorted token intersection and differences of both strings,
//!   so word order and repeated words do not matter.
//!
//! Scores are computed on characters, not bytes, with the indel metric from
//! `rapidfuzz`. Either string being empty scores 0.

/// [`ratio`] over character slices.
fn ratio_chars(a: &[char], b: &[char]) -> u8 {
  if a.is_empty() || b.is_empty() {
    return 0;
  }
  (rapidfuzz::fuzz::ratio(a.iter().copied(), b.iter().copied()) * 100.0).round() as u8
}

/// Indel similarity of two strings.
///
/// ```
/// use papercat::fuzz::ratio;
///
/// assert_eq!(ratio("quantum", "quantum"), 100);
/// assert_eq!(ratio("abcd", "abef"), 50);
/// assert_eq!(ratio("", "abc"), 0);
/// ```
pub fn ratio(a: &str, b: &str) -> u8 {
  let a: Vec<char> = a.chars().collect();
  let b: Vec<char> = b.chars().collect();
  ratio_chars(&a, &b)
}

/// Best [`ratio`] of the shorter string against windows of the longer one.
///
/// Windows that hang off either end of the longer string are scored too, so a
/// needle that only partly overlaps the start or end still gets credit.
///
/// ```
/// use papercat::fuzz::partial_ratio;
///
/// assert_eq!(partial_ratio("entangle", "smith 2020 quantum entanglement"), 100);
/// assert!(partial_ratio("xyzzyq", "smith 2020 quantum entanglement") < 70);
/// ```
pub fn partial_ratio(a: &str, b: &str) -> u8 {
  let (short, long) = if a.chars().count() <= b.chars().count() { (a, b) } else { (b, a) };
  if short.is_empty() {
    return 0;
  }
  if long.contains(short) {
    return 100;
  }

  let short: Vec<char> = short.chars().collect();
  let long: Vec<char> = long.chars().collect();
  let width = short.len();
  let mut best = 0;

  for end in 1..width.min(long.len() + 1) {
    best = best.max(ratio_chars(&short, &long[..end]));
  }
  for start in 0..=long.len() - width {
    best = best.max(ratio_chars(&short, &long[start..start + width]));
    if best == 100 {
      return best;
    }
  }
  for start in (long.len() - width + 1)..long.len() {
    best = best.max(ratio_chars(&short, &long[start..]));
  }
  best
}

/// Lowercases, replaces everything but letters and digits with spaces, and
/// splits into words.
fn tokens(s: &str) -> Vec<String> {
  let cleaned: String = s.chars().map(|c| if c.is_alphanumeric() { c } else { ' ' }).collect();
  cleaned.to_lowercase().split_whitespace().map(str::to_string).collect()
}

/// Token-set similarity of two strings.
///
/// Both strings are tokenized and deduplicated. The sorted intersection `t0`
/// is compared with `t0` plus each side's sorted leftovers, and the leftovers
/// with each other; the best of the three comparisons wins. When one token set
/// contains the other, the score is 100.
///
/// ```
/// use papercat::fuzz::token_set_ratio;
///
/// assert_eq!(token_set_ratio("entanglement quantum", "Quantum Entanglement, 2020"), 100);
/// assert!(token_set_ratio("smit entangle", "smith 2020 quantum entanglement") < 70);
/// ```
pub fn token_set_ratio(a: &str, b: &str) -> u8 {
  let a: std::collections::BTreeSet<String> = tokens(a).into_iter().collect();
  let b: std::collections::BTreeSet<String> = tokens(b).into_iter().collect();
  if a.is_empty() || b.is_empty() {
    return 0;
  }

  let join = |set: Vec<&String>| set.into_iter().map(String::as_str).collect::<Vec<_>>().join(" ");
  let intersection = join(a.intersection(&b).collect());
  let only_a = join(a.difference(&b).collect());
  let only_b = join(b.difference(&a).collect());

  let combine = |rest: &str| format!("{intersection} {rest}").trim().to_string();
  let t0 = intersection.clone();
  let t1 = combine(&only_a);
  let t2 = combine(&only_b);

  ratio(&t0, &t1).max(ratio(&t0, &t2)).max(ratio(&t1, &t2))
}
