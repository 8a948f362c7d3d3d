use itertools::Itertools;

use super::constants::UPPERCASE_WORDS;

/// Derives a human-readable label from an identifier.
///
/// ```text
/// NameWithNoSpaces            => Name With No Spaces
/// name.with.dots              => Name With Dots
/// []Mix_things.up url and ids => Mix Things Up URL And IDs
/// ```
#[must_use]
pub fn display_name(name: &str) -> String {
  let cleaned = name.replace(['_', '.'], " ").replace("[]", "");

  split_case_boundaries(&cleaned)
    .split_whitespace()
    .map(normalize_word)
    .join(" ")
}

/// Inserts a space wherever a lowercase letter is followed by an uppercase one. Runs of
/// uppercase letters stay together, so `getURLList` becomes `get URLList`.
fn split_case_boundaries(text: &str) -> String {
  let mut spaced = String::with_capacity(text.len() + 8);
  let mut previous: Option<char> = None;

  for ch in text.chars() {
    if let Some(prev) = previous
      && prev.is_lowercase()
      && ch.is_uppercase()
    {
      spaced.push(' ');
    }
    spaced.push(ch);
    previous = Some(ch);
  }

  spaced
}

fn normalize_word(word: &str) -> String {
  if UPPERCASE_WORDS.contains(&word) {
    return word.to_uppercase();
  }
  if word == "ids" || word == "IDS" {
    return "IDs".to_string();
  }
  title_case(word)
}

/// Uppercases every letter that starts a word; letters, digits and `_` continue a word.
fn title_case(word: &str) -> String {
  let mut titled = String::with_capacity(word.len());
  let mut at_word_start = true;

  for ch in word.chars() {
    if at_word_start {
      titled.extend(ch.to_uppercase());
    } else {
      titled.push(ch);
    }
    at_word_start = !(ch.is_alphanumeric() || ch == '_');
  }

  titled
}
