//! Text extraction and word counting

use crate::extract::WordFrequency;
use scraper::Html;

/// Concatenates every text node of an HTML document in document order
///
/// The body is decoded as UTF-8 with invalid sequences replaced. Parsing never
/// fails: malformed or truncated markup yields whatever text the parser
/// recovered. No separator is inserted between adjacent text nodes.
pub fn extract_text(html: &[u8]) -> String {
    let source = String::from_utf8_lossy(html);
    let document = Html::parse_document(&source);

    document.root_element().text().collect()
}

/// Counts valid words in a piece of text
///
/// Tokens are split on whitespace and lowercased. A token counts only if it
/// consists entirely of ASCII letters; anything with digits or punctuation is
/// dropped rather than stripped.
///
/// # Example
///
/// ```
/// use word_ripple::extract::count_words;
///
/// let freq = count_words("Cat dog Cat dog2 it's");
/// assert_eq!(freq.get("cat"), Some(&2));
/// assert_eq!(freq.get("dog"), Some(&1));
/// assert_eq!(freq.len(), 2);
/// ```
pub fn count_words(text: &str) -> WordFrequency {
    let mut counts = WordFrequency::new();

    for token in text.split_whitespace() {
        let word = token.trim().to_lowercase();
        if is_valid_word(&word) {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    counts
}

/// Returns true if `word` is one or more ASCII alphabetic characters
pub fn is_valid_word(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_ascii_alphabetic())
}

/// Extracts text from an HTML body and counts its words
pub fn word_frequency(html: &[u8]) -> WordFrequency {
    count_words(&extract_text(html))
}
